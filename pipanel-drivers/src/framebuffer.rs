//! 1-bit-per-pixel framebuffer
//!
//! Pixels are packed vertically: byte `(x, y / 8)` holds the 8 rows of
//! column `x` starting at `y / 8 * 8`, bit 0 on top. That is the PCD8544's
//! display RAM layout, so a push is a straight copy in band order.

/// Packed monochrome framebuffer, `W` columns by `BANDS * 8` rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonoFramebuffer<const W: usize, const BANDS: usize> {
    columns: [[u8; BANDS]; W],
}

impl<const W: usize, const BANDS: usize> Default for MonoFramebuffer<W, BANDS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const BANDS: usize> MonoFramebuffer<W, BANDS> {
    /// Width in pixels
    pub const WIDTH: usize = W;
    /// Height in pixels
    pub const HEIGHT: usize = BANDS * 8;
    /// Bytes per full push
    pub const SIZE: usize = W * BANDS;

    /// Create an all-clear framebuffer
    pub const fn new() -> Self {
        Self {
            columns: [[0; BANDS]; W],
        }
    }

    /// Clear every pixel
    pub fn clear(&mut self) {
        self.columns = [[0; BANDS]; W];
    }

    /// Set or clear one pixel
    ///
    /// Only the target bit changes. Returns `false` (and changes nothing)
    /// for a coordinate off the buffer.
    pub fn set(&mut self, x: usize, y: usize, on: bool) -> bool {
        let Some(byte) = self.columns.get_mut(x).and_then(|c| c.get_mut(y / 8)) else {
            return false;
        };
        let mask = 1u8 << (y % 8);
        *byte = (*byte & !mask) | (u8::from(on) << (y % 8));
        true
    }

    /// Read one pixel
    pub fn get(&self, x: usize, y: usize) -> Option<bool> {
        let byte = self.columns.get(x)?.get(y / 8)?;
        Some(byte & (1 << (y % 8)) != 0)
    }

    /// Raw byte for column `x`, band `band`
    pub fn byte(&self, x: usize, band: usize) -> Option<u8> {
        self.columns.get(x)?.get(band).copied()
    }

    /// Bytes in transmit order: band by band, left to right within a band
    pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        (0..BANDS).flat_map(move |band| self.columns.iter().map(move |column| column[band]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Fb = MonoFramebuffer<4, 2>;

    #[test]
    fn test_set_touches_one_bit() {
        let mut fb = Fb::new();
        assert!(fb.set(1, 9, true));
        assert_eq!(fb.byte(1, 1), Some(0b10));
        assert!(fb.set(1, 8, true));
        assert!(fb.set(1, 9, false));
        assert_eq!(fb.byte(1, 1), Some(0b01));
        assert_eq!(fb.get(1, 8), Some(true));
        assert_eq!(fb.get(1, 9), Some(false));
    }

    #[test]
    fn test_out_of_range_ignored() {
        let mut fb = Fb::new();
        assert!(!fb.set(4, 0, true));
        assert!(!fb.set(0, 16, true));
        assert_eq!(fb.get(4, 0), None);
        assert_eq!(fb, Fb::new());
    }

    #[test]
    fn test_bytes_band_major() {
        let mut fb = Fb::new();
        fb.set(0, 0, true); // band 0, column 0
        fb.set(3, 15, true); // band 1, column 3

        let mut bytes = [0u8; Fb::SIZE];
        for (slot, b) in bytes.iter_mut().zip(fb.bytes()) {
            *slot = b;
        }
        assert_eq!(fb.bytes().count(), 8);
        assert_eq!(bytes, [0x01, 0, 0, 0, 0, 0, 0, 0x80]);
    }

    #[test]
    fn test_clear() {
        let mut fb = Fb::new();
        fb.set(2, 3, true);
        fb.clear();
        assert_eq!(fb, Fb::default());
    }
}
