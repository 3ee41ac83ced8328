//! Display abstraction and drawing surface for PiPanel
//!
//! This crate provides:
//! - `DisplayBackend` trait implemented by each panel controller driver
//! - `Rgb` colors and their device encodings (RGB565, 1 bit per pixel)
//! - `Rotation`, the logical-to-physical coordinate transform
//! - `Surface`, which draws pixels, rectangles and bitmap-font text through
//!   a backend
//! - `PanelConfig`, the panel selection and timing configuration
//!
//! # Architecture
//!
//! The surface is the only caller of a backend. Logical coordinates are
//! signed; the surface rotates them into panel space and drops anything
//! that lands off the panel before the backend sees it.
//!
//! ```text
//! Font ──► GlyphRaster ──► Surface ──► DisplayBackend ──► ILI9327 / PCD8544
//! ```

#![no_std]
#![deny(unsafe_code)]

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod backend;
pub mod color;
pub mod config;
pub mod gfx;
pub mod rotation;

// Re-export key types
pub use backend::{BackendState, DisplayBackend, DisplayError};
pub use color::Rgb;
pub use config::{ConfigError, Controller, PanelConfig, TimingConfig};
pub use gfx::{GfxError, Surface};
pub use rotation::Rotation;
