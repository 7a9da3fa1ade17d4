//! The metadata store and save rewriter.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::ops::Index;
use std::path::{Path, PathBuf};

use crate::chunk::{self, ChunkReader, IDAT, IEND, PNG_SIGNATURE};
use crate::error::{PngTextError, Result};
use crate::text::{self, XMP_KEYWORD, decode_text_chunk, encode_itxt, encode_text};

/// Read and write PNG text metadata (`tEXt`, `iTXt`, `zTXt` chunks).
///
/// ```rust,no_run
/// use pngtext::PngText;
///
/// # fn main() -> pngtext::Result<()> {
/// let mut meta = PngText::open("image.png")?;
///
/// // Read
/// if let Some(title) = meta.get("Title") {
///     println!("Title: {title}");
/// }
///
/// // Write
/// meta.set("Author", "Jane Photographer");
/// meta.set("Copyright", "Copyright 2026");
/// meta.save()?;
///
/// // XMP packet (stored under the reserved iTXt keyword)
/// if let Some(xmp) = meta.xmp() {
///     println!("{xmp}");
/// }
/// # Ok(())
/// # }
/// ```
///
/// Keys keep the order they were first seen in (file order on load, call
/// order for new keys), and that order is what `save` writes back. Setting
/// an existing key replaces its value in place.
///
/// Each `PngText` is an independent in-memory store over one source file.
/// Nothing is locked: two instances saving to the same path race at the
/// filesystem level and the last writer wins.
pub struct PngText {
    path: PathBuf,
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl PngText {
    /// Load and parse a PNG file's text metadata.
    ///
    /// # Errors
    ///
    /// - [`PngTextError::NotFound`] if `path` does not exist
    /// - [`PngTextError::InvalidFormat`] if the PNG signature is missing
    /// - [`PngTextError::TruncatedChunk`] if a chunk over-declares its length
    ///
    /// Individual text chunks that fail to decode are skipped, not surfaced;
    /// a clean file with no text chunks loads as an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(PngTextError::NotFound { path });
        }

        let bytes = fs::read(&path)?;
        let mut meta = PngText {
            path,
            entries: Vec::new(),
            index: HashMap::new(),
        };
        meta.read_chunks(&bytes)?;
        Ok(meta)
    }

    fn read_chunks(&mut self, bytes: &[u8]) -> Result<()> {
        let body = chunk::strip_signature(bytes).ok_or_else(|| PngTextError::InvalidFormat {
            path: self.path.clone(),
        })?;

        let mut reader = ChunkReader::new(body);
        while let Some(record) = reader.next_chunk()? {
            if !text::is_text_chunk(&record.chunk_type) {
                continue;
            }
            // Later occurrences of a keyword overwrite earlier ones.
            if let Some(entry) = decode_text_chunk(&record) {
                self.set(&entry.keyword, &entry.text);
            }
        }

        log::debug!(
            "loaded {} metadata entries from {}",
            self.entries.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Get a metadata value by keyword.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&i| self.entries[i].1.as_str())
    }

    /// Set a metadata value. Last write wins; an existing key keeps its
    /// position in iteration order.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 = value.to_string(),
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), value.to_string()));
            }
        }
    }

    /// Whether a keyword is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// The embedded XMP packet, if any.
    ///
    /// This is a view over the entry stored under [`XMP_KEYWORD`], not a
    /// second copy: `meta.xmp()` and `meta.get(pngtext::XMP_KEYWORD)` always
    /// agree.
    pub fn xmp(&self) -> Option<&str> {
        self.get(XMP_KEYWORD)
    }

    /// Set the embedded XMP packet (an XML document).
    pub fn set_xmp(&mut self, xmp: &str) {
        self.set(XMP_KEYWORD, xmp);
    }

    /// Keywords in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// (keyword, value) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of metadata entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The source path this store was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save back to the source path, overwriting it in place.
    pub fn save(&self) -> Result<()> {
        let dest = self.path.clone();
        self.write_rewritten(&dest)
    }

    /// Save to a different path, leaving the source file untouched.
    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<()> {
        self.write_rewritten(path.as_ref())
    }

    /// Re-walk the original chunk stream and write it out with metadata
    /// edits applied:
    ///
    /// 1. before the first `IDAT` — or before `IEND` in a file that has no
    ///    image data at all — emit one chunk per store entry, in order;
    /// 2. drop every original text-family chunk (the store's contents fully
    ///    replace them);
    /// 3. pass every other chunk through byte-for-byte, original CRC
    ///    included;
    /// 4. stop after `IEND`.
    fn write_rewritten(&self, dest: &Path) -> Result<()> {
        let bytes = fs::read(&self.path)?;
        let body = chunk::strip_signature(&bytes).ok_or_else(|| PngTextError::InvalidFormat {
            path: self.path.clone(),
        })?;

        let mut out = Vec::with_capacity(bytes.len());
        out.extend_from_slice(&PNG_SIGNATURE);

        let mut reader = ChunkReader::new(body);
        let mut injected = false;
        while let Some(record) = reader.next_chunk()? {
            if !injected && (record.chunk_type == IDAT || record.chunk_type == IEND) {
                self.write_entries(&mut out)?;
                injected = true;
            }
            if text::is_text_chunk(&record.chunk_type) {
                continue;
            }
            record.write_to(&mut out);
            if record.chunk_type == IEND {
                break;
            }
        }

        fs::write(dest, &out)?;
        log::debug!(
            "saved {} metadata entries to {}",
            self.entries.len(),
            dest.display()
        );
        Ok(())
    }

    /// Encode the current entries as fresh chunks: `iTXt` for XMP and for
    /// any value with code points above U+007F, plain `tEXt` otherwise.
    fn write_entries(&self, out: &mut Vec<u8>) -> Result<()> {
        for (key, value) in &self.entries {
            let record = if key == XMP_KEYWORD || !value.is_ascii() {
                encode_itxt(key, value, false)?
            } else {
                encode_text(key, value)?
            };
            record.write_to(out);
        }
        Ok(())
    }
}

/// `meta["Title"]` — panics if the keyword is absent, like map indexing.
/// Use [`PngText::get`] for fallible access.
impl Index<&str> for PngText {
    type Output = str;

    fn index(&self, key: &str) -> &str {
        self.get(key)
            .unwrap_or_else(|| panic!("no metadata entry for keyword `{key}`"))
    }
}

impl fmt::Debug for PngText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PngText")
            .field("path", &self.path)
            .field("entries", &self.entries.len())
            .finish()
    }
}
