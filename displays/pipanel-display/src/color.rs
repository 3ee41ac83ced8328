//! Colors and device encodings

/// An 8-bit-per-channel RGB color
///
/// Backends convert to their native encoding: [`to_rgb565`](Self::to_rgb565)
/// for color TFTs, [`is_dark`](Self::is_dark) for 1-bit LCDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack into 16-bit 5-6-5, red in the top bits
    ///
    /// Each channel is scaled with truncating integer math
    /// (`r * 31 / 255` etc.), so only full-scale input reaches the top code.
    pub const fn to_rgb565(self) -> u16 {
        let r = self.r as u16 * 31 / 255;
        let g = self.g as u16 * 63 / 255;
        let b = self.b as u16 * 31 / 255;
        (r << 11) | (g << 5) | b
    }

    /// 1-bit encoding: dark colors turn the pixel on
    ///
    /// A color is dark when its channel sum is below half of full scale.
    pub const fn is_dark(self) -> bool {
        (self.r as u16 + self.g as u16 + self.b as u16) < 384
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl core::fmt::Display for Rgb {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
