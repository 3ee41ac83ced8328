//! Panel controller drivers for PiPanel
//!
//! Both drivers implement [`pipanel_display::DisplayBackend`] over the
//! capability traits in `pipanel-hal`:
//!
//! - [`ili9327::Ili9327`] - 240x400 RGB565 TFT on an 8-bit parallel bus
//!   with chip-select, register-select, write and read strobes. Writes go
//!   straight to panel memory.
//! - [`pcd8544::Pcd8544`] - 84x48 monochrome LCD on SPI. Drawing only
//!   touches a local framebuffer; `flush` pushes it to the panel.
//!
//! Pin and bus failures surface as `DisplayError::Communication`.

#![no_std]
#![deny(unsafe_code)]

pub mod framebuffer;
pub mod ili9327;
pub mod pcd8544;

// Re-export key types
pub use framebuffer::MonoFramebuffer;
pub use ili9327::{Ili9327, Ili9327Pins, Step};
pub use pcd8544::{Pcd8544, Pcd8544Config, Pcd8544Pins};
