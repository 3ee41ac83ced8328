//! Glyph rasterization
//!
//! Turns a glyph's packed words into one [`RasterPixel`] per scaled
//! physical pixel. The walk is column by column, band by band, bit 0 (top)
//! to bit 7, and each source pixel expands into a `scale × scale` block:
//!
//! ```text
//! x = column * scale + dx
//! y = (band * 8 + bit) * scale + dy        dx, dy ∈ [0, scale)
//! ```
//!
//! Clear pixels are produced too; callers filter on [`RasterPixel::on`].

/// One scaled pixel of a glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RasterPixel {
    /// Column, relative to the glyph origin
    pub x: u32,
    /// Row, relative to the glyph origin
    pub y: u32,
    /// Whether the source bit is set
    pub on: bool,
}

/// Lazy, finite pixel sequence for one glyph
///
/// Cloning the iterator restarts nothing; call [`rasterize`] again (or
/// clone before consuming) to walk the glyph a second time.
#[derive(Debug, Clone)]
pub struct GlyphRaster<'a> {
    data: &'a [i32],
    data_per_y: usize,
    scale: usize,
    /// Next pixel to produce, in walk order
    index: usize,
    /// Total pixels this glyph produces
    total: usize,
}

/// Rasterize glyph words at an integer scale
///
/// Trailing words that do not make a whole column are ignored. A scale of
/// 0 is treated as 1.
pub fn rasterize(data: &[i32], data_per_y: u32, scale: u8) -> GlyphRaster<'_> {
    let data_per_y = data_per_y.max(1) as usize;
    let scale = usize::from(scale.max(1));
    let columns = data.len() / data_per_y;
    GlyphRaster {
        data,
        data_per_y,
        scale,
        index: 0,
        total: columns * data_per_y * 8 * scale * scale,
    }
}

impl<'a> GlyphRaster<'a> {
    /// Scaled glyph width in pixels
    pub fn width(&self) -> u32 {
        (self.data.len() / self.data_per_y * self.scale) as u32
    }

    /// Scaled glyph height in pixels
    pub fn height(&self) -> u32 {
        (self.data_per_y * 8 * self.scale) as u32
    }

    /// Only the set pixels
    pub fn set_pixels(self) -> impl Iterator<Item = (u32, u32)> + 'a {
        self.filter(|p| p.on).map(|p| (p.x, p.y))
    }

    fn pixel_at(&self, index: usize) -> RasterPixel {
        let per_bit = self.scale * self.scale;
        let bit_index = index / per_bit;
        let within = index % per_bit;
        let dx = within / self.scale;
        let dy = within % self.scale;

        // Words are column-major, so the word index is column * bands + band
        let word_index = bit_index / 8;
        let bit = bit_index % 8;
        let column = word_index / self.data_per_y;
        let band = word_index % self.data_per_y;

        let word = self.data[word_index];
        RasterPixel {
            x: (column * self.scale + dx) as u32,
            y: ((band * 8 + bit) * self.scale + dy) as u32,
            on: (word >> bit) & 1 == 1,
        }
    }
}

impl Iterator for GlyphRaster<'_> {
    type Item = RasterPixel;

    fn next(&mut self) -> Option<RasterPixel> {
        if self.index >= self.total {
            return None;
        }
        let pixel = self.pixel_at(self.index);
        self.index += 1;
        Some(pixel)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GlyphRaster<'_> {}

impl core::iter::FusedIterator for GlyphRaster<'_> {}
