//! Text-chunk decoding and encoding.
//!
//! PNG carries ancillary text in three chunk kinds:
//!
//! - `tEXt` — uncompressed Latin-1
//! - `zTXt` — zlib-compressed Latin-1 (read-only here; the writer never emits it)
//! - `iTXt` — UTF-8 with optional compression and language metadata
//!
//! Decoding is deliberately forgiving: a chunk that cannot be decoded is
//! skipped so that the rest of the file's metadata still loads. Encoding is
//! strict — see [`encode_text`] and [`encode_itxt`].

mod decoder;
mod encoder;

pub use decoder::{TextEntry, decode_text_chunk};
pub use encoder::{encode_itxt, encode_text};

/// Reserved iTXt keyword under which an embedded XMP packet travels.
pub const XMP_KEYWORD: &str = "XML:com.adobe.xmp";

pub const TEXT: [u8; 4] = *b"tEXt";
pub const ZTXT: [u8; 4] = *b"zTXt";
pub const ITXT: [u8; 4] = *b"iTXt";

/// Whether a chunk type tag is one of the three text-family kinds.
pub fn is_text_chunk(tag: &[u8; 4]) -> bool {
    *tag == TEXT || *tag == ZTXT || *tag == ITXT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_family_detection() {
        assert!(is_text_chunk(b"tEXt"));
        assert!(is_text_chunk(b"zTXt"));
        assert!(is_text_chunk(b"iTXt"));
        assert!(!is_text_chunk(b"IDAT"));
        assert!(!is_text_chunk(b"gAMA"));
    }
}
