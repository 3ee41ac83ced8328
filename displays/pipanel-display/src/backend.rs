//! Display backend trait
//!
//! Defines the interface every panel controller driver implements.

use crate::color::Rgb;

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// A pin or bus write was rejected by the hardware layer
    Communication,
    /// Drawing or flushing before setup completed
    NotInitialized,
}

impl core::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DisplayError::Communication => f.write_str("display communication failed"),
            DisplayError::NotInitialized => f.write_str("display not initialized"),
        }
    }
}

/// Backend lifecycle
///
/// `Unconfigured → Resetting → Ready`. A reset from `Ready` goes back to
/// `Resetting`; only a completed setup makes the backend `Ready` again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BackendState {
    /// Constructed, nothing sent to the panel yet
    #[default]
    Unconfigured,
    /// Reset pulsed, setup not finished
    Resetting,
    /// Setup complete; drawing allowed
    Ready,
}

impl BackendState {
    /// `Ok` only in the `Ready` state
    pub fn ensure_ready(self) -> Result<(), DisplayError> {
        match self {
            BackendState::Ready => Ok(()),
            _ => Err(DisplayError::NotInitialized),
        }
    }
}

/// Display backend trait
///
/// Provides a hardware-agnostic pixel interface over one panel controller.
/// Coordinates are physical panel coordinates; rotation is the surface's
/// job. `pixel`, `rect` and `flush` are only valid once [`setup`] has
/// completed and return [`DisplayError::NotInitialized`] otherwise.
///
/// [`setup`]: DisplayBackend::setup
#[allow(async_fn_in_trait)]
pub trait DisplayBackend {
    /// Panel width in pixels
    const WIDTH: u16;
    /// Panel height in pixels
    const HEIGHT: u16;

    /// Pulse the reset line low then high, holding each level for the
    /// configured minimum time
    ///
    /// Must be followed by [`setup`](Self::setup) before drawing again.
    async fn reset(&mut self) -> Result<(), DisplayError>;

    /// Bring the panel up: reset, then the controller's init sequence
    ///
    /// Runs to completion; dropping the future part-way leaves the backend
    /// out of the `Ready` state.
    async fn setup(&mut self) -> Result<(), DisplayError>;

    /// Write one pixel
    ///
    /// Coordinates outside the panel are ignored.
    fn pixel(&mut self, x: u16, y: u16, color: Rgb) -> Result<(), DisplayError>;

    /// Fill the inclusive rectangle `(x1, y1)..=(x2, y2)`
    ///
    /// `x2`/`y2` past the panel edge are clamped to the last column/row; a
    /// start point off the panel draws nothing.
    fn rect(&mut self, x1: u16, y1: u16, x2: u16, y2: u16, color: Rgb) -> Result<(), DisplayError>;

    /// Make buffered drawing visible
    ///
    /// Backends that write straight to panel memory have nothing to do.
    fn flush(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    /// Current lifecycle state
    fn state(&self) -> BackendState;

    /// Check if the display is ready
    fn is_ready(&self) -> bool {
        self.state() == BackendState::Ready
    }

    /// Panel size as `(width, height)`
    fn dimensions(&self) -> (u16, u16) {
        (Self::WIDTH, Self::HEIGHT)
    }
}

/// Clamp an inclusive rectangle to a `width × height` panel
///
/// Returns `None` when the start point is off the panel or the corners are
/// reversed.
pub fn clamp_rect(
    x1: u16,
    y1: u16,
    x2: u16,
    y2: u16,
    width: u16,
    height: u16,
) -> Option<(u16, u16, u16, u16)> {
    if x1 >= width || y1 >= height {
        return None;
    }
    let (x2, y2) = (x2.min(width - 1), y2.min(height - 1));
    if x2 < x1 || y2 < y1 {
        return None;
    }
    Some((x1, y1, x2, y2))
}
