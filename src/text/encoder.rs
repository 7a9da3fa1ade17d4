use flate2::Compression;
use flate2::write::ZlibEncoder;
use std::io::Write;

use super::{ITXT, TEXT};
use crate::chunk::ChunkRecord;
use crate::error::{PngTextError, Result};

/// Encode a (keyword, text) pair as an uncompressed Latin-1 `tEXt` chunk.
///
/// Fails with [`PngTextError::Encoding`] if either string contains a code
/// point above U+00FF. Values with such code points belong in `iTXt`; the
/// store's save path routes them there automatically.
pub fn encode_text(keyword: &str, text: &str) -> Result<ChunkRecord> {
    let mut data = latin1_bytes(keyword, keyword)?;
    data.push(0);
    data.extend_from_slice(&latin1_bytes(text, keyword)?);
    Ok(ChunkRecord::new(TEXT, data))
}

/// Encode a (keyword, text) pair as an `iTXt` chunk with UTF-8 text,
/// optionally zlib-compressed.
///
/// Language tag and translated keyword are always written empty; localized
/// variants are not supported. The keyword itself must still fit Latin-1.
pub fn encode_itxt(keyword: &str, text: &str, compress: bool) -> Result<ChunkRecord> {
    let text_bytes = if compress {
        deflate(text.as_bytes())?
    } else {
        text.as_bytes().to_vec()
    };

    let keyword_bytes = latin1_bytes(keyword, keyword)?;
    let mut data = Vec::with_capacity(keyword_bytes.len() + text_bytes.len() + 5);
    data.extend_from_slice(&keyword_bytes);
    data.push(0); // keyword terminator
    data.push(if compress { 1 } else { 0 }); // compression flag
    data.push(0); // compression method: deflate
    data.push(0); // empty language tag
    data.push(0); // empty translated keyword
    data.extend_from_slice(&text_bytes);

    Ok(ChunkRecord::new(ITXT, data))
}

fn latin1_bytes(s: &str, keyword: &str) -> Result<Vec<u8>> {
    s.chars()
        .map(|c| {
            u8::try_from(c as u32).map_err(|_| PngTextError::Encoding {
                keyword: keyword.to_string(),
            })
        })
        .collect()
}

fn deflate(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::decode_text_chunk;

    // ── tEXt ──────────────────────────────────────────────────────────

    #[test]
    fn text_payload_layout() {
        let chunk = encode_text("Title", "Sunset").unwrap();
        assert_eq!(chunk.chunk_type, TEXT);
        assert_eq!(chunk.data, b"Title\0Sunset");
    }

    #[test]
    fn text_latin1_high_code_points() {
        let chunk = encode_text("Author", "René").unwrap();
        assert_eq!(chunk.data, b"Author\0Ren\xE9");
    }

    #[test]
    fn text_rejects_non_latin1_value() {
        match encode_text("Title", "emoji \u{1F600}") {
            Err(PngTextError::Encoding { keyword }) => assert_eq!(keyword, "Title"),
            other => panic!("expected Encoding error, got {other:?}"),
        }
    }

    #[test]
    fn text_rejects_non_latin1_keyword() {
        assert!(encode_text("Tïtle\u{0394}", "v").is_err());
    }

    // ── iTXt ──────────────────────────────────────────────────────────

    #[test]
    fn itxt_payload_layout() {
        let chunk = encode_itxt("Comment", "café", false).unwrap();
        assert_eq!(chunk.chunk_type, ITXT);
        // keyword NUL, flag 0, method 0, empty lang NUL, empty translated NUL
        assert_eq!(chunk.data, b"Comment\0\0\0\0\0caf\xC3\xA9");
    }

    #[test]
    fn itxt_compressed_round_trips_through_decoder() {
        let chunk = encode_itxt("Comment", "日本語テキスト", true).unwrap();
        assert_eq!(chunk.data[8], 1); // compression flag, after "Comment\0"

        let entry = decode_text_chunk(&chunk).unwrap();
        assert_eq!(entry.keyword, "Comment");
        assert_eq!(entry.text, "日本語テキスト");
    }

    #[test]
    fn itxt_rejects_non_latin1_keyword() {
        assert!(encode_itxt("ключ", "v", false).is_err());
    }

    // ── CRC ───────────────────────────────────────────────────────────

    #[test]
    fn authored_chunk_crc_is_masked_crc32_of_type_and_payload() {
        let chunk = encode_text("k", "v").unwrap();
        let expected = {
            let mut bytes = b"tEXt".to_vec();
            bytes.extend_from_slice(&chunk.data);
            crc32fast::hash(&bytes)
        };
        assert_eq!(chunk.crc, expected.to_be_bytes());
    }
}
