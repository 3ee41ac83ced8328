//! Bitmap fonts for character displays
//!
//! A font is a set of glyphs that share one column height. Each glyph is
//! stored column by column; a column is `data_per_y` stacked bands and each
//! band packs 8 vertical pixels into the low byte of an `i32`, bit 0 on top.
//!
//! ```text
//!            column 0    column 1
//!          ┌──────────┬──────────┐
//!  band 0  │ data[0]  │ data[2]  │   rows 0..8   (bit 0 = row 0)
//!  band 1  │ data[1]  │ data[3]  │   rows 8..16
//!          └──────────┴──────────┘   data_per_y = 2
//! ```
//!
//! This crate provides:
//! - [`Font`] / [`Glyph`] - the in-memory glyph store
//! - [`codec`] - the `.gtmfont` binary format (load/save)
//! - [`raster`] - glyph to pixel expansion at an integer scale
//! - [`editor`] - the glyph editor's input model

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod codec;
pub mod editor;
pub mod error;
pub mod font;
pub mod raster;

// Re-export key types
pub use editor::{EditMode, EditorAction, EditorKey, GlyphEditor, DEFAULT_GLYPH_COLUMNS};
pub use error::FontError;
pub use font::{Font, Glyph, DEFAULT_ALPHABET};
pub use raster::{rasterize, GlyphRaster, RasterPixel};
