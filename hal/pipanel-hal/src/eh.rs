//! Adapters from `embedded-hal` 1.0
//!
//! Any HAL that already implements the `embedded-hal` digital and SPI
//! traits can be handed to the display drivers by wrapping its pins in
//! [`EhPin`] and its bus in [`EhSpi`].

use crate::gpio::OutputPin;
use crate::spi::SpiBus;

/// Wraps an `embedded_hal::digital::OutputPin`
#[derive(Debug)]
pub struct EhPin<P>(pub P);

impl<P> EhPin<P> {
    /// Wrap a pin
    pub fn new(pin: P) -> Self {
        Self(pin)
    }

    /// Unwrap the pin
    pub fn into_inner(self) -> P {
        self.0
    }
}

impl<P: embedded_hal::digital::OutputPin> OutputPin for EhPin<P> {
    type Error = P::Error;

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set_high()
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set_low()
    }
}

/// Wraps an `embedded_hal::spi::SpiBus<u8>`
///
/// Writes are flushed before returning, so a chip-select released right
/// after `write` never cuts off the last byte.
#[derive(Debug)]
pub struct EhSpi<S>(pub S);

impl<S> EhSpi<S> {
    /// Wrap a bus
    pub fn new(bus: S) -> Self {
        Self(bus)
    }

    /// Unwrap the bus
    pub fn into_inner(self) -> S {
        self.0
    }
}

impl<S: embedded_hal::spi::SpiBus<u8>> SpiBus for EhSpi<S> {
    type Error = S::Error;

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        self.0.transfer(read, write)?;
        self.0.flush()
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.0.write(data)?;
        self.0.flush()
    }
}
