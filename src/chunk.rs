//! PNG chunk-stream codec.
//!
//! Splits a raw PNG byte stream (everything after the 8-byte signature) into
//! typed [`ChunkRecord`]s and reassembles records back into bytes. Payloads
//! are never interpreted here; text-chunk semantics live in [`crate::text`].

use crate::error::{PngTextError, Result};

/// The fixed 8-byte PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Image-data chunk tag. Metadata is injected immediately before the first one.
pub const IDAT: [u8; 4] = *b"IDAT";

/// End-of-stream chunk tag.
pub const IEND: [u8; 4] = *b"IEND";

/// One PNG chunk as read from (or destined for) the wire:
/// `{u32 length}{4-byte type}{payload}{u32 CRC}`, all big-endian.
///
/// `length` is the declared length as read from the stream. On write the
/// length prefix is always recomputed from `data.len()`, so a freshly
/// authored payload can never go out with a stale length. The CRC is carried
/// as opaque bytes and echoed verbatim for pass-through chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRecord {
    pub chunk_type: [u8; 4],
    pub length: u32,
    pub data: Vec<u8>,
    pub crc: [u8; 4],
}

impl ChunkRecord {
    /// Author a new chunk, computing its CRC-32 (IEEE/zlib polynomial) over
    /// the type tag followed by the payload.
    pub fn new(chunk_type: [u8; 4], data: Vec<u8>) -> Self {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&chunk_type);
        hasher.update(&data);
        let crc = hasher.finalize().to_be_bytes();

        ChunkRecord {
            chunk_type,
            length: data.len() as u32,
            data,
            crc,
        }
    }

    /// Append the full wire encoding of this chunk to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(self.data.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.chunk_type);
        out.extend_from_slice(&self.data);
        out.extend_from_slice(&self.crc);
    }
}

/// Render a type tag for logs and error messages. Non-graphic bytes (seen in
/// corrupt files) come out as `?`.
pub fn type_name(tag: &[u8; 4]) -> String {
    tag.iter()
        .map(|&b| if b.is_ascii_graphic() { b as char } else { '?' })
        .collect()
}

/// Strip the PNG signature, returning the chunk stream that follows it, or
/// `None` if the first 8 bytes are not the signature.
pub fn strip_signature(bytes: &[u8]) -> Option<&[u8]> {
    bytes.strip_prefix(&PNG_SIGNATURE)
}

/// Streaming reader over a chunk sequence.
///
/// `buf` must start at the first chunk (i.e. after the signature). Reading
/// stops after `IEND`, or benignly when fewer than 4 bytes remain where the
/// next length field belongs — truncated tails parse as "no more chunks".
pub struct ChunkReader<'a> {
    buf: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> ChunkReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        ChunkReader {
            buf,
            pos: 0,
            done: false,
        }
    }

    /// Read the next chunk, or `Ok(None)` at end of stream.
    ///
    /// A chunk that declares more payload than the stream holds is a hard
    /// [`PngTextError::TruncatedChunk`]; reading never runs past the buffer.
    pub fn next_chunk(&mut self) -> Result<Option<ChunkRecord>> {
        if self.done {
            return Ok(None);
        }

        let rest = &self.buf[self.pos..];
        if rest.len() < 4 {
            return Ok(None);
        }

        let mut word = [0u8; 4];
        word.copy_from_slice(&rest[..4]);
        let declared = u32::from_be_bytes(word);

        let mut chunk_type = [0u8; 4];
        if rest.len() >= 8 {
            chunk_type.copy_from_slice(&rest[4..8]);
        }

        // length + type + payload + CRC
        let total = 8 + declared as usize + 4;
        if rest.len() < total {
            return Err(PngTextError::TruncatedChunk {
                chunk_type: type_name(&chunk_type),
                declared,
                remaining: rest.len().saturating_sub(8),
            });
        }

        let data = rest[8..8 + declared as usize].to_vec();
        let mut crc = [0u8; 4];
        crc.copy_from_slice(&rest[8 + declared as usize..total]);

        self.pos += total;
        if chunk_type == IEND {
            self.done = true;
        }

        Ok(Some(ChunkRecord {
            chunk_type,
            length: declared,
            data,
            crc,
        }))
    }
}
