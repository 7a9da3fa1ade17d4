use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the library.
///
/// Chunk-local decode problems (missing NUL separator, a zTXt payload that
/// fails to inflate, invalid UTF-8 in an iTXt) are deliberately *not* here:
/// those chunks are skipped during load so that as much metadata as possible
/// survives an imperfect file.
#[derive(Debug, Error)]
pub enum PngTextError {
    /// The source path does not exist.
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The first 8 bytes are not the PNG signature.
    #[error("not a valid PNG file: {}", path.display())]
    InvalidFormat { path: PathBuf },

    /// A chunk declared more payload bytes than remain in the stream.
    #[error("truncated `{chunk_type}` chunk: declares {declared} bytes, {remaining} remain")]
    TruncatedChunk {
        chunk_type: String,
        declared: u32,
        remaining: usize,
    },

    /// A metadata value cannot be represented in the target chunk's charset.
    #[error("value for keyword `{keyword}` cannot be encoded as Latin-1")]
    Encoding { keyword: String },

    /// Filesystem error while reading or writing the PNG.
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, PngTextError>;
