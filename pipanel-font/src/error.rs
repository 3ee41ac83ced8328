//! Font errors

use core::fmt;

/// Errors raised while building, loading or saving a font
///
/// Everything here belongs to the I/O class: the font could not be read
/// or written as asked. None of it is recovered from internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontError {
    /// The underlying file could not be opened, read or written
    #[cfg(feature = "std")]
    Io(std::io::ErrorKind),
    /// Input ended in the middle of a header or glyph record
    Truncated,
    /// Header declares a negative glyph count
    NegativeGlyphCount(i32),
    /// A glyph record declares a negative length
    NegativeGlyphLength(char, i32),
    /// Bands per column must be at least 1
    InvalidDataPerY(i32),
    /// Glyph length is not a multiple of the font's bands per column
    MisalignedGlyph(char),
    /// A glyph key is not a valid UTF-8 encoded BMP character
    InvalidCharKey,
    /// Character cannot be stored as a 16-bit code unit
    UnsupportedChar(char),
    /// The same character appears twice in one file
    DuplicateGlyph(char),
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "std")]
            FontError::Io(kind) => write!(f, "font file I/O failed: {kind}"),
            FontError::Truncated => f.write_str("font data truncated"),
            FontError::NegativeGlyphCount(n) => write!(f, "negative glyph count {n}"),
            FontError::NegativeGlyphLength(c, n) => {
                write!(f, "glyph {c:?} has negative length {n}")
            }
            FontError::InvalidDataPerY(n) => write!(f, "invalid bands per column {n}"),
            FontError::MisalignedGlyph(c) => {
                write!(f, "glyph {c:?} length is not a multiple of bands per column")
            }
            FontError::InvalidCharKey => f.write_str("invalid glyph character key"),
            FontError::UnsupportedChar(c) => {
                write!(f, "character {c:?} is outside the basic multilingual plane")
            }
            FontError::DuplicateGlyph(c) => write!(f, "glyph {c:?} appears twice"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FontError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            #[cfg(feature = "std")]
            FontError::Io(_) => defmt::write!(f, "Io"),
            FontError::Truncated => defmt::write!(f, "Truncated"),
            FontError::NegativeGlyphCount(n) => defmt::write!(f, "NegativeGlyphCount({})", n),
            FontError::NegativeGlyphLength(c, n) => {
                defmt::write!(f, "NegativeGlyphLength({}, {})", c, n)
            }
            FontError::InvalidDataPerY(n) => defmt::write!(f, "InvalidDataPerY({})", n),
            FontError::MisalignedGlyph(c) => defmt::write!(f, "MisalignedGlyph({})", c),
            FontError::InvalidCharKey => defmt::write!(f, "InvalidCharKey"),
            FontError::UnsupportedChar(c) => defmt::write!(f, "UnsupportedChar({})", c),
            FontError::DuplicateGlyph(c) => defmt::write!(f, "DuplicateGlyph({})", c),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FontError {}

#[cfg(feature = "std")]
impl From<std::io::Error> for FontError {
    fn from(e: std::io::Error) -> Self {
        FontError::Io(e.kind())
    }
}
