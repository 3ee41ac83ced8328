//! ILI9327 TFT Driver
//!
//! Driver for 240x400 ILI9327 panels on an 8-bit 8080-style parallel bus,
//! bit-banged over GPIO. Pixels are RGB565 and are written straight into
//! panel memory, so there is nothing to flush.
//!
//! # Bus cycle
//!
//! ```text
//!  CS  ‾‾\___________________________/‾‾
//!  RS  ====X  0 = command, 1 = data  X==
//!  D0-7 ========X   byte    X============
//!  WR  ‾‾‾‾‾‾‾‾‾‾‾\______/‾‾‾‾‾‾‾‾‾‾‾‾‾‾   low for >= write_pulse_ns
//! ```
//!
//! A 16-bit word is two strobes inside one chip-select, high byte first.

use embedded_hal::delay::DelayNs as BlockingDelay;
use embedded_hal_async::delay::DelayNs as AsyncDelay;
use log::{debug, info, trace};
use pipanel_display::backend::clamp_rect;
use pipanel_display::{BackendState, DisplayBackend, DisplayError, Rgb, TimingConfig};
use pipanel_hal::OutputPin;

/// Panel width in pixels
pub const WIDTH: u16 = 240;
/// Panel height in pixels
pub const HEIGHT: u16 = 400;

/// Wait after software reset and after sleep-out
pub const WAKE_DELAY_MS: u32 = 150;

/// ILI9327 commands
#[allow(dead_code)]
mod cmd {
    pub const SOFT_RESET: u8 = 0x01;
    pub const SLEEP_OUT: u8 = 0x11;
    pub const DISPLAY_OFF: u8 = 0x28;
    pub const DISPLAY_ON: u8 = 0x29;
    pub const COLUMN_ADDRESS_SET: u8 = 0x2A;
    pub const PAGE_ADDRESS_SET: u8 = 0x2B;
    pub const MEMORY_WRITE: u8 = 0x2C;
    pub const MEMORY_ACCESS_CONTROL: u8 = 0x36;
    pub const PIXEL_FORMAT_SET: u8 = 0x3A;
    pub const PANEL_DRIVING: u8 = 0xC0;
    pub const DISPLAY_TIMING: u8 = 0xC1;
    pub const FRAME_RATE: u8 = 0xC5;
    pub const GAMMA: u8 = 0xC8;
    pub const POWER: u8 = 0xD0;
    pub const VCOM: u8 = 0xD1;
    pub const POWER_NORMAL: u8 = 0xD2;
}

/// One init table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Command byte followed by its parameter bytes
    Write { opcode: u8, params: &'static [u8] },
    /// Wait this many milliseconds before the next entry
    Delay(u32),
}

impl Step {
    const fn cmd(opcode: u8, params: &'static [u8]) -> Self {
        Step::Write { opcode, params }
    }
}

/// Software reset, display off, 16-bit pixels
pub const RESET_OFF: &[Step] = &[
    Step::cmd(cmd::SOFT_RESET, &[]),
    Step::Delay(WAKE_DELAY_MS),
    Step::cmd(cmd::DISPLAY_OFF, &[]),
    Step::cmd(cmd::PIXEL_FORMAT_SET, &[0x55]),
];

/// Panel register configuration
pub const REG_VALUES: &[Step] = &[
    Step::cmd(cmd::MEMORY_ACCESS_CONTROL, &[0x08]),
    Step::cmd(cmd::PIXEL_FORMAT_SET, &[0x05]),
    Step::cmd(cmd::PANEL_DRIVING, &[0x00, 0x35, 0x00, 0x00, 0x01, 0x02]),
    Step::cmd(cmd::DISPLAY_TIMING, &[0x10, 0x10, 0x02, 0x02]),
    Step::cmd(cmd::FRAME_RATE, &[0x04]),
    Step::cmd(
        cmd::GAMMA,
        &[
            0x04, 0x67, 0x35, 0x04, 0x08, 0x06, 0x24, 0x01, 0x37, 0x40, 0x03, 0x10, 0x08, 0x80,
            0x00,
        ],
    ),
    Step::cmd(cmd::POWER, &[0x07, 0x04, 0x00]),
    Step::cmd(cmd::VCOM, &[0x00, 0x0C, 0x0F]),
    Step::cmd(cmd::POWER_NORMAL, &[0x01, 0x44]),
];

/// Sleep out, display on
pub const WAKE_ON: &[Step] = &[
    Step::cmd(cmd::SLEEP_OUT, &[]),
    Step::Delay(WAKE_DELAY_MS),
    Step::cmd(cmd::DISPLAY_ON, &[]),
];

/// Control and data lines of the parallel bus
///
/// All lines are plain outputs. `rd` is held high; the driver never reads.
pub struct Ili9327Pins<P> {
    pub rst: P,
    pub cs: P,
    /// Register select: low for commands, high for data
    pub rs: P,
    pub wr: P,
    pub rd: P,
    /// D0..D7
    pub data: [P; 8],
}

/// ILI9327 parallel-bus driver
pub struct Ili9327<P, D> {
    pins: Ili9327Pins<P>,
    delay: D,
    timing: TimingConfig,
    state: BackendState,
}

fn bus<E>(_: E) -> DisplayError {
    DisplayError::Communication
}

impl<P, D> Ili9327<P, D>
where
    P: OutputPin,
    D: AsyncDelay + BlockingDelay,
{
    /// Take the bus lines and drive them to idle: reset, chip-select,
    /// register-select and both strobes high
    pub fn new(
        mut pins: Ili9327Pins<P>,
        delay: D,
        timing: TimingConfig,
    ) -> Result<Self, DisplayError> {
        pins.rst.set_high().map_err(bus)?;
        pins.cs.set_high().map_err(bus)?;
        pins.rs.set_high().map_err(bus)?;
        pins.wr.set_high().map_err(bus)?;
        pins.rd.set_high().map_err(bus)?;
        Ok(Self {
            pins,
            delay,
            timing,
            state: BackendState::Unconfigured,
        })
    }

    /// Release the pins and delay
    pub fn release(self) -> (Ili9327Pins<P>, D) {
        (self.pins, self.delay)
    }

    /// Play one init table
    pub async fn play(&mut self, table: &[Step]) -> Result<(), DisplayError> {
        for step in table {
            trace!("init step {step:02X?}");
            match *step {
                Step::Delay(ms) => AsyncDelay::delay_ms(&mut self.delay, ms).await,
                Step::Write { opcode, params } => {
                    self.write_byte(false, opcode)?;
                    for &p in params {
                        self.write_byte(true, p)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Assert chip-select and set up the control lines for a write cycle
    fn begin(&mut self, is_data: bool) -> Result<(), DisplayError> {
        self.pins.cs.set_low().map_err(bus)?;
        self.pins.rs.set_state(is_data).map_err(bus)?;
        self.pins.rd.set_high().map_err(bus)?;
        self.pins.wr.set_high().map_err(bus)
    }

    /// Drive D0..D7 and pulse WR low for the minimum strobe width
    fn strobe(&mut self, byte: u8) -> Result<(), DisplayError> {
        for (bit, pin) in self.pins.data.iter_mut().enumerate() {
            pin.set_state(byte & (1 << bit) != 0).map_err(bus)?;
        }
        self.pins.wr.set_low().map_err(bus)?;
        BlockingDelay::delay_ns(&mut self.delay, self.timing.write_pulse_ns);
        self.pins.wr.set_high().map_err(bus)
    }

    fn write_byte(&mut self, is_data: bool, byte: u8) -> Result<(), DisplayError> {
        trace!("write {} {byte:02X}", if is_data { "data" } else { "cmd" });
        self.begin(is_data)?;
        self.strobe(byte)?;
        self.pins.cs.set_high().map_err(bus)
    }

    fn write_word(&mut self, is_data: bool, word: u16) -> Result<(), DisplayError> {
        self.begin(is_data)?;
        let [hi, lo] = word.to_be_bytes();
        self.strobe(hi)?;
        self.strobe(lo)?;
        self.pins.cs.set_high().map_err(bus)
    }
}

impl<P, D> DisplayBackend for Ili9327<P, D>
where
    P: OutputPin,
    D: AsyncDelay + BlockingDelay,
{
    const WIDTH: u16 = WIDTH;
    const HEIGHT: u16 = HEIGHT;

    async fn reset(&mut self) -> Result<(), DisplayError> {
        self.state = BackendState::Resetting;
        let hold = self.timing.reset_hold_ms;
        self.pins.rst.set_low().map_err(bus)?;
        AsyncDelay::delay_ms(&mut self.delay, hold).await;
        self.pins.rst.set_high().map_err(bus)?;
        AsyncDelay::delay_ms(&mut self.delay, hold).await;
        Ok(())
    }

    async fn setup(&mut self) -> Result<(), DisplayError> {
        info!("ILI9327 setup");
        self.reset().await?;
        self.play(RESET_OFF).await?;
        self.play(REG_VALUES).await?;
        self.play(WAKE_ON).await?;
        self.state = BackendState::Ready;
        debug!("ILI9327 ready");
        Ok(())
    }

    fn pixel(&mut self, x: u16, y: u16, color: Rgb) -> Result<(), DisplayError> {
        self.state.ensure_ready()?;
        if x >= WIDTH || y >= HEIGHT {
            return Ok(());
        }
        self.rect(x, y, x, y, color)
    }

    fn rect(&mut self, x1: u16, y1: u16, x2: u16, y2: u16, color: Rgb) -> Result<(), DisplayError> {
        self.state.ensure_ready()?;
        let Some((x1, y1, x2, y2)) = clamp_rect(x1, y1, x2, y2, WIDTH, HEIGHT) else {
            return Ok(());
        };

        self.write_byte(false, cmd::COLUMN_ADDRESS_SET)?;
        self.write_word(true, x1)?;
        self.write_word(true, x2)?;
        self.write_byte(false, cmd::PAGE_ADDRESS_SET)?;
        self.write_word(true, y1)?;
        self.write_word(true, y2)?;
        self.write_byte(false, cmd::MEMORY_WRITE)?;

        let word = color.to_rgb565();
        let count = u32::from(x2 - x1 + 1) * u32::from(y2 - y1 + 1);
        for _ in 0..count {
            self.write_word(true, word)?;
        }
        Ok(())
    }

    fn state(&self) -> BackendState {
        self.state
    }
}
