//! In-memory glyph store

use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;

use crate::error::FontError;
use crate::raster::{rasterize, GlyphRaster};

/// Printable ASCII, the starting alphabet of a new font
pub const DEFAULT_ALPHABET: &str = " !\"#$%&'()*+,-./0123456789:;<=>?@\
ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~";

/// Largest bands-per-column value the file header can hold
pub const MAX_DATA_PER_Y: u32 = i32::MAX as u32;

/// One character's packed pixel data
///
/// Words are laid out column-major: `data[column * data_per_y + band]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Glyph {
    data: Vec<i32>,
}

impl Glyph {
    /// Wrap raw glyph words
    pub fn new(data: Vec<i32>) -> Self {
        Self { data }
    }

    /// An all-clear glyph `columns` wide
    pub fn blank(columns: usize, data_per_y: u32) -> Self {
        Self::new(vec![0; columns * data_per_y as usize])
    }

    /// Raw words
    pub fn data(&self) -> &[i32] {
        &self.data
    }

    /// Raw words, mutable
    pub fn data_mut(&mut self) -> &mut [i32] {
        &mut self.data
    }

    /// Number of words
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True for a zero-width glyph
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Width in unscaled pixels for the given bands per column
    pub fn columns(&self, data_per_y: u32) -> usize {
        self.data.len() / data_per_y.max(1) as usize
    }
}

impl From<Vec<i32>> for Glyph {
    fn from(data: Vec<i32>) -> Self {
        Self::new(data)
    }
}

/// A bitmap font: a shared column height plus a character → glyph map
///
/// Glyphs are kept ordered by character, which is also the order they are
/// written to disk in. Every glyph length is a multiple of
/// [`data_per_y`](Self::data_per_y); [`insert`](Self::insert) refuses
/// anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    data_per_y: u32,
    glyphs: BTreeMap<char, Glyph>,
}

impl Font {
    /// Create an empty font with `data_per_y` bands of 8 pixels per column
    pub fn new(data_per_y: u32) -> Result<Self, FontError> {
        if data_per_y == 0 || data_per_y > MAX_DATA_PER_Y {
            return Err(FontError::InvalidDataPerY(data_per_y as i32));
        }
        Ok(Self {
            data_per_y,
            glyphs: BTreeMap::new(),
        })
    }

    /// Create a font with an all-clear glyph `columns` wide for every
    /// character of `alphabet`
    pub fn blank(data_per_y: u32, columns: usize, alphabet: &str) -> Result<Self, FontError> {
        let mut font = Self::new(data_per_y)?;
        for c in alphabet.chars() {
            font.insert(c, Glyph::blank(columns, data_per_y))?;
        }
        Ok(font)
    }

    /// Bands of 8 vertical pixels per glyph column
    pub fn data_per_y(&self) -> u32 {
        self.data_per_y
    }

    /// Unscaled glyph height in pixels
    pub fn height(&self) -> u32 {
        self.data_per_y.saturating_mul(8)
    }

    /// Add or replace a glyph, returning the previous one
    ///
    /// Fails if the glyph length does not divide into whole columns or if
    /// the character does not fit the file format's 16-bit key.
    pub fn insert(&mut self, c: char, glyph: impl Into<Glyph>) -> Result<Option<Glyph>, FontError> {
        let glyph = glyph.into();
        if u32::from(c) > 0xFFFF {
            return Err(FontError::UnsupportedChar(c));
        }
        if glyph.len() % self.data_per_y as usize != 0 {
            return Err(FontError::MisalignedGlyph(c));
        }
        Ok(self.glyphs.insert(c, glyph))
    }

    /// Remove a glyph
    pub fn remove(&mut self, c: char) -> Option<Glyph> {
        self.glyphs.remove(&c)
    }

    /// Look up a glyph
    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&c)
    }

    /// Look up a glyph for in-place editing
    ///
    /// Only the words can be changed through this, never the length, so the
    /// column invariant holds.
    pub fn glyph_words_mut(&mut self, c: char) -> Option<&mut [i32]> {
        self.glyphs.get_mut(&c).map(Glyph::data_mut)
    }

    /// True if the font has a glyph for `c`
    pub fn contains(&self, c: char) -> bool {
        self.glyphs.contains_key(&c)
    }

    /// Number of glyphs
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// True if the font has no glyphs
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Characters in storage order
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.glyphs.keys().copied()
    }

    /// `(character, glyph)` pairs in storage order
    pub fn iter(&self) -> impl Iterator<Item = (char, &Glyph)> + '_ {
        self.glyphs.iter().map(|(c, g)| (*c, g))
    }

    /// Character at a storage-order position
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.glyphs.keys().nth(index).copied()
    }

    /// Unscaled width of a glyph in pixels
    pub fn columns(&self, c: char) -> Option<usize> {
        self.glyph(c).map(|g| g.columns(self.data_per_y))
    }

    /// Expand a glyph into pixels at `scale`
    pub fn rasterize(&self, c: char, scale: u8) -> Option<GlyphRaster<'_>> {
        self.glyph(c)
            .map(|g| rasterize(g.data(), self.data_per_y, scale))
    }

    /// Read one unscaled pixel of a glyph
    pub fn pixel(&self, c: char, x: usize, y: usize) -> Option<bool> {
        let (index, bit) = self.locate(c, x, y)?;
        let word = self.glyph(c)?.data().get(index)?;
        Some((word >> bit) & 1 == 1)
    }

    /// Write one unscaled pixel of a glyph
    ///
    /// Returns `false` if the glyph or coordinate does not exist.
    pub fn set_pixel(&mut self, c: char, x: usize, y: usize, on: bool) -> bool {
        let Some((index, bit)) = self.locate(c, x, y) else {
            return false;
        };
        match self.glyph_words_mut(c).and_then(|w| w.get_mut(index)) {
            Some(word) => {
                if on {
                    *word |= 1 << bit;
                } else {
                    *word &= !(1 << bit);
                }
                true
            }
            None => false,
        }
    }

    /// Flip one unscaled pixel of a glyph
    pub fn toggle_pixel(&mut self, c: char, x: usize, y: usize) -> bool {
        match self.pixel(c, x, y) {
            Some(on) => self.set_pixel(c, x, y, !on),
            None => false,
        }
    }

    /// Word index and bit for pixel `(x, y)` of glyph `c`
    fn locate(&self, c: char, x: usize, y: usize) -> Option<(usize, u32)> {
        let dpy = self.data_per_y as usize;
        if x >= self.columns(c)? || y >= dpy * 8 {
            return None;
        }
        Some((x * dpy + y / 8, (y % 8) as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_bands() {
        assert_eq!(Font::new(0), Err(FontError::InvalidDataPerY(0)));
        assert!(Font::new(1).is_ok());
    }

    #[test]
    fn test_insert_checks_alignment() {
        let mut font = Font::new(2).unwrap();
        assert_eq!(
            font.insert('A', vec![1, 2, 3]),
            Err(FontError::MisalignedGlyph('A'))
        );
        assert_eq!(font.insert('A', vec![1, 2, 3, 4]), Ok(None));
        assert_eq!(font.columns('A'), Some(2));
    }

    #[test]
    fn test_insert_rejects_astral_chars() {
        let mut font = Font::new(1).unwrap();
        assert_eq!(
            font.insert('\u{1F600}', vec![0]),
            Err(FontError::UnsupportedChar('\u{1F600}'))
        );
        assert!(font.insert('\u{FFFD}', vec![0]).is_ok());
    }

    #[test]
    fn test_blank_font_covers_alphabet() {
        let font = Font::blank(1, 5, DEFAULT_ALPHABET).unwrap();
        assert_eq!(font.len(), 95);
        assert_eq!(font.columns(' '), Some(5));
        assert_eq!(font.glyph('~').unwrap().data(), &[0; 5]);
    }

    #[test]
    fn test_pixel_addressing_across_bands() {
        let mut font = Font::blank(2, 3, "x").unwrap();

        assert!(font.set_pixel('x', 1, 9, true));
        // column 1, band 1, bit 1
        assert_eq!(font.glyph('x').unwrap().data(), &[0, 0, 0, 0b10, 0, 0]);
        assert_eq!(font.pixel('x', 1, 9), Some(true));

        assert!(font.toggle_pixel('x', 1, 9));
        assert_eq!(font.pixel('x', 1, 9), Some(false));

        assert!(!font.set_pixel('x', 3, 0, true));
        assert!(!font.set_pixel('x', 0, 16, true));
        assert!(!font.set_pixel('y', 0, 0, true));
    }

    #[test]
    fn test_storage_order_is_sorted() {
        let mut font = Font::new(1).unwrap();
        font.insert('b', vec![0]).unwrap();
        font.insert('a', vec![0]).unwrap();
        font.insert(' ', vec![0]).unwrap();

        let chars: Vec<char> = font.chars().collect();
        assert_eq!(chars, vec![' ', 'a', 'b']);
        assert_eq!(font.char_at(1), Some('a'));
    }
}
