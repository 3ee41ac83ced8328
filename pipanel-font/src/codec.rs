//! `.gtmfont` binary format
//!
//! All integers are little-endian `i32`:
//!
//! ```text
//! ┌───────────┬─────────────┬──────────────────────────────────────┐
//! │ dataPerY  │ glyphCount  │ glyphCount × record                  │
//! │ i32       │ i32         │                                      │
//! └───────────┴─────────────┴──────────────────────────────────────┘
//!
//! record:
//! ┌──────────────┬──────────┬─────────────────┐
//! │ key          │ length   │ length × i32    │
//! │ UTF-8, 1–3 B │ i32      │ glyph words     │
//! └──────────────┴──────────┴─────────────────┘
//! ```
//!
//! The key is one 16-bit character encoded as UTF-8, so only characters of
//! the Basic Multilingual Plane can be stored. Glyphs are written in
//! character order. Bytes after the last record are ignored.

use alloc::vec::Vec;

use crate::error::FontError;
use crate::font::{Font, Glyph};

/// Size of the file header in bytes
pub const HEADER_SIZE: usize = 8;

/// Cursor over an encoded font
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], FontError> {
        let end = self.pos.checked_add(n).ok_or(FontError::Truncated)?;
        let bytes = self.buf.get(self.pos..end).ok_or(FontError::Truncated)?;
        self.pos = end;
        Ok(bytes)
    }

    fn read_i32(&mut self) -> Result<i32, FontError> {
        let bytes = self.take(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_char(&mut self) -> Result<char, FontError> {
        let lead = *self.take(1)?.first().ok_or(FontError::Truncated)?;
        let width = match lead {
            0x00..=0x7F => 1,
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            _ => return Err(FontError::InvalidCharKey),
        };
        let start = self.pos - 1;
        self.take(width - 1)?;
        core::str::from_utf8(&self.buf[start..self.pos])
            .ok()
            .and_then(|s| s.chars().next())
            .ok_or(FontError::InvalidCharKey)
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }
}

/// Decode a font from its binary form
pub fn decode(bytes: &[u8]) -> Result<Font, FontError> {
    let mut reader = Reader::new(bytes);

    let data_per_y = reader.read_i32()?;
    if data_per_y <= 0 {
        return Err(FontError::InvalidDataPerY(data_per_y));
    }
    let count = reader.read_i32()?;
    if count < 0 {
        return Err(FontError::NegativeGlyphCount(count));
    }

    let mut font = Font::new(data_per_y as u32)?;
    for _ in 0..count {
        let key = reader.read_char()?;
        let length = reader.read_i32()?;
        if length < 0 {
            return Err(FontError::NegativeGlyphLength(key, length));
        }
        // Reject before allocating when the input cannot hold the words
        let length = length as usize;
        if reader.remaining() / 4 < length {
            return Err(FontError::Truncated);
        }

        let mut data = Vec::with_capacity(length);
        for _ in 0..length {
            data.push(reader.read_i32()?);
        }

        if font.insert(key, Glyph::new(data))?.is_some() {
            return Err(FontError::DuplicateGlyph(key));
        }
    }

    if reader.remaining() > 0 {
        log::debug!("ignoring {} trailing bytes after font", reader.remaining());
    }
    Ok(font)
}

/// Append the binary form of a font to `out`
pub fn encode_into(font: &Font, out: &mut Vec<u8>) -> Result<(), FontError> {
    out.extend_from_slice(&(font.data_per_y() as i32).to_le_bytes());
    out.extend_from_slice(&(font.len() as i32).to_le_bytes());

    let mut key = [0u8; 4];
    for (c, glyph) in font.iter() {
        if u32::from(c) > 0xFFFF {
            return Err(FontError::UnsupportedChar(c));
        }
        out.extend_from_slice(c.encode_utf8(&mut key).as_bytes());
        out.extend_from_slice(&(glyph.len() as i32).to_le_bytes());
        for word in glyph.data() {
            out.extend_from_slice(&word.to_le_bytes());
        }
    }
    Ok(())
}

/// Encode a font to a fresh buffer
pub fn encode(font: &Font) -> Result<Vec<u8>, FontError> {
    let mut out = Vec::with_capacity(encoded_len(font));
    encode_into(font, &mut out)?;
    Ok(out)
}

/// Exact size of the binary form of a font
pub fn encoded_len(font: &Font) -> usize {
    HEADER_SIZE
        + font
            .iter()
            .map(|(c, g)| c.len_utf8() + 4 + g.len() * 4)
            .sum::<usize>()
}

impl Font {
    /// Decode a font from its binary form
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FontError> {
        decode(bytes)
    }

    /// Encode this font to its binary form
    pub fn to_bytes(&self) -> Result<Vec<u8>, FontError> {
        encode(self)
    }
}

#[cfg(feature = "std")]
impl Font {
    /// Read a font file
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, FontError> {
        let path = path.as_ref();
        log::info!("Reading font from file: {}", path.display());
        let bytes = std::fs::read(path)?;
        let font = decode(&bytes)?;
        log::debug!(
            "Loaded {} glyphs, {} bands per column",
            font.len(),
            font.data_per_y()
        );
        Ok(font)
    }

    /// Write this font to a file, replacing any existing one
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), FontError> {
        let path = path.as_ref();
        log::info!("Saving font to file: {}", path.display());
        let bytes = encode(self)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
