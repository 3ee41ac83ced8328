//! Panel configuration
//!
//! Which controller is fitted, how the panel is mounted, the font to draw
//! with and the controller timing. Read from TOML on the host and stored as
//! postcard binary, like the rest of the configuration.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::rotation::Rotation;

/// Maximum font path length
pub const MAX_PATH_LEN: usize = 64;

/// Default PCD8544 contrast (Vop) command
pub const DEFAULT_CONTRAST: u8 = 0xBF;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// TOML parsing failed
    Toml,
    /// Binary deserialization failed
    Deserialize,
    /// Binary serialization failed (buffer too small)
    Serialize,
    /// Font scale must be at least 1
    InvalidScale,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::Toml => f.write_str("invalid TOML panel config"),
            ConfigError::Deserialize => f.write_str("invalid binary panel config"),
            ConfigError::Serialize => f.write_str("panel config does not fit the buffer"),
            ConfigError::InvalidScale => f.write_str("font scale must be at least 1"),
        }
    }
}

/// Supported panel controllers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Controller {
    /// 240x400 RGB565 TFT on an 8-bit parallel bus
    #[default]
    Ili9327,
    /// 84x48 monochrome LCD on SPI
    Pcd8544,
}

/// Controller timing
///
/// These are correctness limits, not tuning knobs: a panel driven with
/// shorter holds or pulses shows a corrupt image without reporting an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingConfig {
    /// Reset line hold time, for each of the low and high halves
    pub reset_hold_ms: u32,
    /// Delay between the first framebuffer push and display-on
    pub settle_ms: u32,
    /// Minimum parallel-bus write strobe low time
    pub write_pulse_ns: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            reset_hold_ms: 100,
            settle_ms: 100,
            write_pulse_ns: 150,
        }
    }
}

/// Panel configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PanelConfig {
    /// Controller driving the panel
    pub controller: Controller,
    /// Mounting orientation
    pub rotation: Rotation,
    /// Integer glyph scale (>= 1)
    pub font_scale: u8,
    /// Font file to load at startup
    pub font_path: String<MAX_PATH_LEN>,
    /// Controller timing
    pub timing: TimingConfig,
    /// Contrast command byte (PCD8544 only)
    pub contrast: u8,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::new(Controller::default())
    }
}

impl PanelConfig {
    /// Default configuration for a controller
    pub fn new(controller: Controller) -> Self {
        let mut font_path = String::new();
        let _ = font_path.push_str("font.gtmfont");
        Self {
            controller,
            rotation: Rotation::Identity,
            font_scale: 1,
            font_path,
            timing: TimingConfig::default(),
            contrast: DEFAULT_CONTRAST,
        }
    }

    /// Check values the type system does not
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.font_scale == 0 {
            return Err(ConfigError::InvalidScale);
        }
        Ok(())
    }

    /// Parse and validate a TOML panel config
    ///
    /// ```toml
    /// controller = "pcd8544"
    /// rotation = "transpose_flip"
    /// font_scale = 2
    ///
    /// [timing]
    /// reset_hold_ms = 120
    /// ```
    #[cfg(feature = "std")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: PanelConfig = toml::from_str(s).map_err(|e| {
            log::warn!("TOML parse error: {e}");
            ConfigError::Toml
        })?;
        config.validate()?;
        log::info!(
            "Panel config: {:?}, {:?}, scale {}",
            config.controller,
            config.rotation,
            config.font_scale
        );
        Ok(config)
    }

    /// Serialize to postcard binary in `buf`, returning the used part
    #[cfg(feature = "serde")]
    pub fn to_postcard<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }

    /// Deserialize and validate postcard binary
    #[cfg(feature = "serde")]
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: PanelConfig =
            postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }
}
