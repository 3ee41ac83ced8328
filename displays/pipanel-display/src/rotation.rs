//! Logical to physical coordinate mapping
//!
//! With `W × H` the panel size:
//!
//! | rotation        | physical `(x, y)`      |
//! |-----------------|------------------------|
//! | `Identity`      | `(x, y)`               |
//! | `Flip`          | `(W-1-x, H-1-y)`       |
//! | `Transpose`     | `(y, x)`               |
//! | `TransposeFlip` | `(W-1-y, H-1-x)`       |
//!
//! The transposing rotations swap the logical axes, so a `W × H` panel is
//! `H × W` logically. Mapping back uses the same formula with the swapped
//! size: `apply(apply(p, W, H), H, W) == p` for every rotation.

/// Panel orientation, fixed per surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Rotation {
    /// Native orientation
    #[default]
    Identity,
    /// Rotated by 180°
    Flip,
    /// Rows and columns swapped
    Transpose,
    /// Rows and columns swapped, then rotated by 180°
    TransposeFlip,
}

impl Rotation {
    /// All rotations
    pub const ALL: [Rotation; 4] = [
        Rotation::Identity,
        Rotation::Flip,
        Rotation::Transpose,
        Rotation::TransposeFlip,
    ];

    /// Map logical `(x, y)` onto a `width × height` panel
    ///
    /// The result is not bounds-checked; off-panel input maps off-panel.
    /// Work in `i64` so any `i32` logical coordinate maps without overflow.
    pub const fn apply(self, x: i64, y: i64, width: i64, height: i64) -> (i64, i64) {
        match self {
            Rotation::Identity => (x, y),
            Rotation::Flip => (width - 1 - x, height - 1 - y),
            Rotation::Transpose => (y, x),
            Rotation::TransposeFlip => (width - 1 - y, height - 1 - x),
        }
    }

    /// Whether logical width and height are swapped relative to the panel
    pub const fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Transpose | Rotation::TransposeFlip)
    }

    /// Logical size of a `width × height` panel under this rotation
    pub const fn logical_size(self, width: u16, height: u16) -> (u16, u16) {
        if self.swaps_axes() {
            (height, width)
        } else {
            (width, height)
        }
    }
}
