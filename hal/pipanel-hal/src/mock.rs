//! Recording test doubles
//!
//! Every pin edge, SPI write and delay issued through these mocks is
//! appended to one shared [`MockLog`], so tests can assert on the exact
//! order in which a driver touches the hardware.

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use crate::gpio::OutputPin;
use crate::spi::SpiBus;

/// Error returned by mocks built with failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

/// One recorded hardware interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEvent {
    /// A pin was driven
    Pin {
        /// Name the pin was created with
        name: &'static str,
        /// New level
        high: bool,
    },
    /// Bytes written over SPI
    Spi(Vec<u8>),
    /// A delay was requested
    Delay {
        /// Requested duration in nanoseconds
        ns: u64,
        /// True for the blocking (`embedded_hal`) delay
        blocking: bool,
    },
}

/// Shared, ordered event log
#[derive(Debug, Clone, Default)]
pub struct MockLog {
    events: Rc<RefCell<Vec<MockEvent>>>,
}

impl MockLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: MockEvent) {
        self.events.borrow_mut().push(event);
    }

    /// Snapshot of all events so far
    pub fn events(&self) -> Vec<MockEvent> {
        self.events.borrow().clone()
    }

    /// Number of events so far
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// True if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// All bytes written over SPI, concatenated
    pub fn spi_bytes(&self) -> Vec<u8> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                MockEvent::Spi(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Non-blocking delays in milliseconds, in request order
    pub fn async_delays_ms(&self) -> Vec<u64> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                MockEvent::Delay { ns, blocking: false } => Some(ns / 1_000_000),
                _ => None,
            })
            .collect()
    }

    /// Create a pin that records into this log
    pub fn pin(&self, name: &'static str) -> MockPin {
        MockPin {
            name,
            log: self.clone(),
            high: false,
            fail: false,
        }
    }

    /// Create a pin whose every write fails
    pub fn failing_pin(&self, name: &'static str) -> MockPin {
        MockPin {
            fail: true,
            ..self.pin(name)
        }
    }

    /// Create an SPI bus that records into this log
    pub fn spi(&self) -> MockSpi {
        MockSpi {
            log: self.clone(),
            fail: false,
        }
    }

    /// Create an SPI bus whose every write fails
    pub fn failing_spi(&self) -> MockSpi {
        MockSpi {
            log: self.clone(),
            fail: true,
        }
    }

    /// Create a delay that records into this log and returns immediately
    pub fn delay(&self) -> MockDelay {
        MockDelay { log: self.clone() }
    }
}

/// Recording output pin
#[derive(Debug)]
pub struct MockPin {
    name: &'static str,
    log: MockLog,
    high: bool,
    fail: bool,
}

impl MockPin {
    /// Current level
    pub fn is_set_high(&self) -> bool {
        self.high
    }

    /// Name the pin was created with
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl OutputPin for MockPin {
    type Error = MockError;

    fn set_high(&mut self) -> Result<(), MockError> {
        self.set_state(true)
    }

    fn set_low(&mut self) -> Result<(), MockError> {
        self.set_state(false)
    }

    fn set_state(&mut self, high: bool) -> Result<(), MockError> {
        if self.fail {
            return Err(MockError);
        }
        self.high = high;
        self.log.push(MockEvent::Pin {
            name: self.name,
            high,
        });
        Ok(())
    }
}

/// Recording SPI bus
#[derive(Debug)]
pub struct MockSpi {
    log: MockLog,
    fail: bool,
}

impl SpiBus for MockSpi {
    type Error = MockError;

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), MockError> {
        read.fill(0);
        self.write(write)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), MockError> {
        if self.fail {
            return Err(MockError);
        }
        self.log.push(MockEvent::Spi(data.to_vec()));
        Ok(())
    }
}

/// Recording delay, usable as both the blocking and the async `DelayNs`
#[derive(Debug, Clone)]
pub struct MockDelay {
    log: MockLog,
}

impl MockDelay {
    fn record(&self, ns: u64, blocking: bool) {
        self.log.push(MockEvent::Delay { ns, blocking });
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.record(u64::from(ns), true);
    }

    fn delay_us(&mut self, us: u32) {
        self.record(u64::from(us) * 1_000, true);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.record(u64::from(ms) * 1_000_000, true);
    }
}

impl embedded_hal_async::delay::DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.record(u64::from(ns), false);
    }

    async fn delay_us(&mut self, us: u32) {
        self.record(u64::from(us) * 1_000, false);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.record(u64::from(ms) * 1_000_000, false);
    }
}
