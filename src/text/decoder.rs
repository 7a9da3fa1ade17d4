use flate2::read::ZlibDecoder;
use std::io::Read;

use super::{ITXT, TEXT, XMP_KEYWORD, ZTXT};
use crate::chunk::{ChunkRecord, type_name};

/// A decoded (keyword, text) pair from one text-family chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEntry {
    pub keyword: String,
    pub text: String,
}

impl TextEntry {
    /// Whether this entry carries an embedded XMP packet.
    pub fn is_xmp(&self) -> bool {
        self.keyword == XMP_KEYWORD
    }
}

/// Decode one text-family chunk into a (keyword, text) pair.
///
/// Returns `None` for non-text chunk types and for payloads that cannot be
/// decoded (missing NUL separator, inflate failure). An undecodable chunk
/// contributes nothing to the store; it never aborts the surrounding parse.
pub fn decode_text_chunk(chunk: &ChunkRecord) -> Option<TextEntry> {
    let entry = match chunk.chunk_type {
        TEXT => decode_text(&chunk.data),
        ZTXT => decode_ztxt(&chunk.data),
        ITXT => decode_itxt(&chunk.data),
        _ => return None,
    };
    if entry.is_none() {
        log::debug!(
            "skipping undecodable {} chunk ({} bytes)",
            type_name(&chunk.chunk_type),
            chunk.data.len()
        );
    }
    entry
}

/// Latin-1 maps each byte to the Unicode code point of the same value.
fn latin1_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn inflate(bytes: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    match ZlibDecoder::new(bytes).read_to_end(&mut out) {
        Ok(_) => Some(out),
        Err(e) => {
            log::debug!("zlib inflate failed: {e}");
            None
        }
    }
}

/// tEXt: `keyword` NUL `text`, both Latin-1, uncompressed.
fn decode_text(data: &[u8]) -> Option<TextEntry> {
    let null = data.iter().position(|&b| b == 0)?;
    Some(TextEntry {
        keyword: latin1_string(&data[..null]),
        text: latin1_string(&data[null + 1..]),
    })
}

/// zTXt: `keyword` NUL `method` (1 byte) `compressed text`, Latin-1 after
/// inflation.
fn decode_ztxt(data: &[u8]) -> Option<TextEntry> {
    let null = data.iter().position(|&b| b == 0)?;
    let keyword = latin1_string(&data[..null]);
    // One compression-method byte sits between the NUL and the zlib stream.
    let compressed = data.get(null + 2..)?;
    let text = latin1_string(&inflate(compressed)?);
    Some(TextEntry { keyword, text })
}

/// iTXt: `keyword` NUL `flag` `method` `language tag` NUL
/// `translated keyword` NUL `text`, UTF-8, inflated first when flag is 1.
fn decode_itxt(data: &[u8]) -> Option<TextEntry> {
    let null = data.iter().position(|&b| b == 0)?;
    let keyword = latin1_string(&data[..null]);

    let compression_flag = *data.get(null + 1)?;
    // Method byte at null + 2; deflate (0) is the only defined value.
    let mut pos = null + 3;

    // Language tag and translated keyword, each NUL-terminated.
    for _ in 0..2 {
        let terminator = data.get(pos..)?.iter().position(|&b| b == 0)?;
        pos += terminator + 1;
    }

    let raw = data.get(pos..)?;
    let text_bytes = if compression_flag == 1 {
        inflate(raw)?
    } else {
        raw.to_vec()
    };

    // Lossy: a bad UTF-8 run degrades to replacement characters instead of
    // costing the whole entry.
    let text = String::from_utf8_lossy(&text_bytes).into_owned();
    Some(TextEntry { keyword, text })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::ZlibEncoder;
    use std::io::Write;

    fn deflated(bytes: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes).unwrap();
        encoder.finish().unwrap()
    }

    fn chunk(tag: &[u8; 4], data: Vec<u8>) -> ChunkRecord {
        ChunkRecord::new(*tag, data)
    }

    // ── tEXt ──────────────────────────────────────────────────────────

    #[test]
    fn text_basic() {
        let entry = decode_text_chunk(&chunk(b"tEXt", b"Title\0Sunset".to_vec())).unwrap();
        assert_eq!(entry.keyword, "Title");
        assert_eq!(entry.text, "Sunset");
    }

    #[test]
    fn text_latin1_high_bytes() {
        // 0xE9 is é in Latin-1
        let entry = decode_text_chunk(&chunk(b"tEXt", b"Author\0Ren\xE9".to_vec())).unwrap();
        assert_eq!(entry.text, "René");
    }

    #[test]
    fn text_empty_value() {
        let entry = decode_text_chunk(&chunk(b"tEXt", b"Comment\0".to_vec())).unwrap();
        assert_eq!(entry.text, "");
    }

    #[test]
    fn text_missing_nul_is_skipped() {
        assert!(decode_text_chunk(&chunk(b"tEXt", b"no separator here".to_vec())).is_none());
    }

    // ── zTXt ──────────────────────────────────────────────────────────

    #[test]
    fn ztxt_inflates_latin1() {
        let mut data = b"Description\0\0".to_vec();
        data.extend_from_slice(&deflated(b"a legacy compressed value"));

        let entry = decode_text_chunk(&chunk(b"zTXt", data)).unwrap();
        assert_eq!(entry.keyword, "Description");
        assert_eq!(entry.text, "a legacy compressed value");
    }

    #[test]
    fn ztxt_bad_stream_is_skipped() {
        let data = b"Description\0\0not zlib at all".to_vec();
        assert!(decode_text_chunk(&chunk(b"zTXt", data)).is_none());
    }

    // ── iTXt ──────────────────────────────────────────────────────────

    #[test]
    fn itxt_uncompressed_with_language_fields() {
        let data = b"Comment\0\0\0en\0Kommentar\0caf\xC3\xA9".to_vec();
        let entry = decode_text_chunk(&chunk(b"iTXt", data)).unwrap();
        assert_eq!(entry.keyword, "Comment");
        assert_eq!(entry.text, "café");
    }

    #[test]
    fn itxt_compressed() {
        let mut data = b"Comment\0\x01\0\0\0".to_vec();
        data.extend_from_slice(&deflated("日本語テキスト".as_bytes()));

        let entry = decode_text_chunk(&chunk(b"iTXt", data)).unwrap();
        assert_eq!(entry.text, "日本語テキスト");
    }

    #[test]
    fn itxt_invalid_utf8_is_lossy() {
        let data = b"Comment\0\0\0\0\0ab\xFF\xFEcd".to_vec();
        let entry = decode_text_chunk(&chunk(b"iTXt", data)).unwrap();
        assert_eq!(entry.text, "ab\u{FFFD}\u{FFFD}cd");
    }

    #[test]
    fn itxt_missing_separators_is_skipped() {
        // Keyword and flag bytes but no language/translated-keyword NULs.
        let data = b"Comment\0\0\0".to_vec();
        assert!(decode_text_chunk(&chunk(b"iTXt", data)).is_none());
    }

    #[test]
    fn itxt_xmp_sentinel_detected() {
        let data = b"XML:com.adobe.xmp\0\0\0\0\0<x:xmpmeta/>".to_vec();
        let entry = decode_text_chunk(&chunk(b"iTXt", data)).unwrap();
        assert!(entry.is_xmp());
        assert_eq!(entry.text, "<x:xmpmeta/>");
    }

    // ── Non-text chunks ───────────────────────────────────────────────

    #[test]
    fn non_text_chunk_decodes_to_none() {
        assert!(decode_text_chunk(&chunk(b"gAMA", vec![0, 0, 0, 1])).is_none());
    }
}
