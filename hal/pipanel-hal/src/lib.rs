//! PiPanel Hardware Abstraction Layer
//!
//! This crate defines the hardware capabilities the display drivers need:
//! digital output pins and a blocking SPI write primitive. Board support
//! (a Raspberry Pi GPIO library, a Linux spidev handle, ...) implements
//! these traits, or wraps an existing `embedded-hal` 1.0 implementation
//! with the adapters in [`eh`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  pipanel-drivers (ILI9327, PCD8544)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pipanel-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ embedded-hal  │       │  board GPIO / │
//! │  via eh::*    │       │  spidev impls │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital output
//! - [`spi::SpiBus`] - SPI bus operations
//!
//! Delays are taken straight from `embedded-hal` / `embedded-hal-async`
//! (`DelayNs`), which `embassy_time::Delay` implements.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]

pub mod eh;
pub mod gpio;
#[cfg(feature = "mock")]
pub mod mock;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use gpio::OutputPin;
pub use spi::SpiBus;
