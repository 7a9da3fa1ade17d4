//! # pngtext
//!
//! Read and write PNG text metadata — the `tEXt`, `zTXt`, and `iTXt`
//! ancillary chunks, plus embedded XMP packets carried in an `iTXt` chunk
//! under the reserved `XML:com.adobe.xmp` keyword.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pngtext::PngText;
//!
//! fn main() -> pngtext::Result<()> {
//!     // Load and inspect
//!     let mut meta = PngText::open("photo.png")?;
//!     for (key, value) in meta.iter() {
//!         println!("{key}: {value}");
//!     }
//!
//!     // Edit and save — every non-text chunk is preserved byte-for-byte
//!     meta.set("Title", "Beautiful Landscape");
//!     meta.set("Author", "Jane Photographer");
//!     meta.set_xmp("<x:xmpmeta xmlns:x=\"adobe:ns:meta/\"/>");
//!     meta.save()?;
//!
//!     // Or write to a new file, leaving the original untouched
//!     meta.save_as("photo-tagged.png")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Behavior
//!
//! - Values that fit printable ASCII are written as `tEXt`; anything with
//!   code points above 127 — and the XMP packet — goes out as UTF-8 `iTXt`.
//! - `zTXt` chunks in existing files are read; the writer never emits them.
//! - Text chunks that cannot be decoded (missing separator, broken zlib
//!   stream, invalid UTF-8) are skipped individually so the rest of the
//!   file's metadata still loads.
//! - Saving re-reads the source file and rewrites its chunk stream: old
//!   text chunks are dropped, the store's entries are injected before the
//!   first `IDAT`, and every other chunk passes through unchanged, original
//!   CRC included.
//!
//! ## Modules
//!
//! - [`store`] — [`PngText`], the metadata store and save rewriter
//! - [`chunk`] — the low-level chunk-stream codec
//! - [`text`] — tEXt/zTXt/iTXt payload decoding and encoding
//! - [`error`] — the error taxonomy

pub mod chunk;
pub mod error;
pub mod store;
pub mod text;

pub use error::{PngTextError, Result};
pub use store::PngText;
pub use text::XMP_KEYWORD;
