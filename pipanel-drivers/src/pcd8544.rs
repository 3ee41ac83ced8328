//! PCD8544 LCD Driver
//!
//! Driver for 84x48 monochrome PCD8544 panels (Nokia 5110) over SPI with
//! separate reset, data/command and chip-select lines.
//!
//! Drawing only changes the local framebuffer. Nothing reaches the panel
//! until [`Pcd8544::push_framebuffer`] (or `flush`) copies the whole buffer
//! across.
//!
//! The board must run the bus in SPI mode 0 at no more than 4 MHz.

use embedded_hal_async::delay::DelayNs;
use log::{debug, info, trace};
use pipanel_display::backend::clamp_rect;
use pipanel_display::config::DEFAULT_CONTRAST;
use pipanel_display::{BackendState, DisplayBackend, DisplayError, PanelConfig, Rgb, TimingConfig};
use pipanel_hal::{OutputPin, SpiBus};

use crate::framebuffer::MonoFramebuffer;

/// Panel width in pixels
pub const WIDTH: u16 = 84;
/// Panel height in pixels
pub const HEIGHT: u16 = 48;
/// 8-row bands
pub const BANDS: usize = HEIGHT as usize / 8;

/// Framebuffer matching the panel's display RAM
pub type Framebuffer = MonoFramebuffer<{ WIDTH as usize }, BANDS>;

/// PCD8544 commands
#[allow(dead_code)]
mod cmd {
    /// Function set: chip active, horizontal addressing, basic instructions
    pub const FUNCTION_BASIC: u8 = 0x20;
    /// Function set: chip active, horizontal addressing, extended instructions
    pub const FUNCTION_EXTENDED: u8 = 0x21;
    /// Display control: blank
    pub const DISPLAY_BLANK: u8 = 0x08;
    /// Display control: all segments on
    pub const DISPLAY_ALL_ON: u8 = 0x09;
    /// Display control: normal mode
    pub const DISPLAY_NORMAL: u8 = 0x0C;
    /// Set Y address (band), OR'd with 0..5
    pub const SET_Y: u8 = 0x40;
    /// Set X address (column), OR'd with 0..83
    pub const SET_X: u8 = 0x80;
    /// Extended: bias system 1:48
    pub const BIAS_1_48: u8 = 0x13;
}

/// Control lines besides the SPI bus
pub struct Pcd8544Pins<P> {
    pub rst: P,
    /// Data/command select: low for commands, high for data
    pub dc: P,
    pub cs: P,
}

/// PCD8544 driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pcd8544Config {
    pub timing: TimingConfig,
    /// Operating voltage command (`0x80 | Vop`), sent in extended mode
    pub contrast: u8,
}

impl Default for Pcd8544Config {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            contrast: DEFAULT_CONTRAST,
        }
    }
}

impl From<&PanelConfig> for Pcd8544Config {
    fn from(config: &PanelConfig) -> Self {
        Self {
            timing: config.timing,
            contrast: config.contrast,
        }
    }
}

/// PCD8544 SPI framebuffer driver
pub struct Pcd8544<S, P, D> {
    spi: S,
    pins: Pcd8544Pins<P>,
    delay: D,
    config: Pcd8544Config,
    framebuffer: Framebuffer,
    state: BackendState,
}

fn bus<E>(_: E) -> DisplayError {
    DisplayError::Communication
}

/// One framed byte: DC level, then the byte inside chip-select
fn send<S: SpiBus, P: OutputPin>(
    spi: &mut S,
    pins: &mut Pcd8544Pins<P>,
    is_data: bool,
    byte: u8,
) -> Result<(), DisplayError> {
    trace!("write {} {byte:02X}", if is_data { "data" } else { "cmd" });
    pins.dc.set_state(is_data).map_err(bus)?;
    pins.cs.set_low().map_err(bus)?;
    spi.write_byte(byte).map_err(bus)?;
    pins.cs.set_high().map_err(bus)
}

impl<S, P, D> Pcd8544<S, P, D>
where
    S: SpiBus,
    P: OutputPin,
    D: DelayNs,
{
    /// Create the driver; nothing is sent until [`setup`](DisplayBackend::setup)
    pub fn new(spi: S, pins: Pcd8544Pins<P>, delay: D, config: Pcd8544Config) -> Self {
        Self {
            spi,
            pins,
            delay,
            config,
            framebuffer: Framebuffer::new(),
            state: BackendState::Unconfigured,
        }
    }

    /// Release the bus, pins and delay
    pub fn release(self) -> (S, Pcd8544Pins<P>, D) {
        (self.spi, self.pins, self.delay)
    }

    /// Local framebuffer
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Copy the framebuffer to the panel
    ///
    /// Sends `WIDTH * BANDS` data bytes band by band and leaves the panel's
    /// address counter at the origin.
    pub fn push_framebuffer(&mut self) -> Result<(), DisplayError> {
        self.state.ensure_ready()?;
        self.push()
    }

    fn push(&mut self) -> Result<(), DisplayError> {
        trace!("push framebuffer");
        self.reset_cursor()?;
        for byte in self.framebuffer.bytes() {
            send(&mut self.spi, &mut self.pins, true, byte)?;
        }
        self.reset_cursor()
    }

    fn reset_cursor(&mut self) -> Result<(), DisplayError> {
        self.write_byte(false, cmd::SET_X)?;
        self.write_byte(false, cmd::SET_Y)
    }

    fn write_byte(&mut self, is_data: bool, byte: u8) -> Result<(), DisplayError> {
        send(&mut self.spi, &mut self.pins, is_data, byte)
    }

    fn commands(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        for &b in bytes {
            self.write_byte(false, b)?;
        }
        Ok(())
    }
}

impl<S, P, D> DisplayBackend for Pcd8544<S, P, D>
where
    S: SpiBus,
    P: OutputPin,
    D: DelayNs,
{
    const WIDTH: u16 = WIDTH;
    const HEIGHT: u16 = HEIGHT;

    async fn reset(&mut self) -> Result<(), DisplayError> {
        self.state = BackendState::Resetting;
        let hold = self.config.timing.reset_hold_ms;
        self.pins.rst.set_low().map_err(bus)?;
        self.delay.delay_ms(hold).await;
        self.pins.rst.set_high().map_err(bus)?;
        self.delay.delay_ms(hold).await;
        Ok(())
    }

    async fn setup(&mut self) -> Result<(), DisplayError> {
        info!("PCD8544 setup, contrast {:#04X}", self.config.contrast);
        self.framebuffer.clear();
        self.pins.rst.set_high().map_err(bus)?;
        self.pins.cs.set_high().map_err(bus)?;
        self.reset().await?;

        self.commands(&[
            cmd::FUNCTION_EXTENDED,
            cmd::BIAS_1_48,
            self.config.contrast,
            cmd::FUNCTION_BASIC,
            cmd::DISPLAY_ALL_ON,
        ])?;
        self.push()?;
        self.commands(&[cmd::DISPLAY_BLANK, cmd::DISPLAY_NORMAL])?;

        self.delay.delay_ms(self.config.timing.settle_ms).await;
        self.reset_cursor()?;

        self.state = BackendState::Ready;
        debug!("PCD8544 ready");
        Ok(())
    }

    fn pixel(&mut self, x: u16, y: u16, color: Rgb) -> Result<(), DisplayError> {
        self.state.ensure_ready()?;
        self.framebuffer
            .set(usize::from(x), usize::from(y), color.is_dark());
        Ok(())
    }

    fn rect(&mut self, x1: u16, y1: u16, x2: u16, y2: u16, color: Rgb) -> Result<(), DisplayError> {
        self.state.ensure_ready()?;
        let Some((x1, y1, x2, y2)) = clamp_rect(x1, y1, x2, y2, WIDTH, HEIGHT) else {
            return Ok(());
        };
        for x in x1..=x2 {
            for y in y1..=y2 {
                self.pixel(x, y, color)?;
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.push_framebuffer()
    }

    fn state(&self) -> BackendState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use embassy_futures::block_on;
    use pipanel_hal::mock::{MockDelay, MockEvent, MockLog, MockPin, MockSpi};
    use std::vec::Vec;

    type Driver = Pcd8544<MockSpi, MockPin, MockDelay>;

    fn driver(log: &MockLog) -> Driver {
        let pins = Pcd8544Pins {
            rst: log.pin("rst"),
            dc: log.pin("dc"),
            cs: log.pin("cs"),
        };
        Pcd8544::new(log.spi(), pins, log.delay(), Pcd8544Config::default())
    }

    fn ready(log: &MockLog) -> Driver {
        let mut drv = driver(log);
        block_on(drv.setup()).unwrap();
        log.clear();
        drv
    }

    /// `(is_data, byte)` for every SPI write, tagged with the DC level
    fn decode(events: &[MockEvent]) -> Vec<(bool, u8)> {
        let mut dc = false;
        let mut out = Vec::new();
        for event in events {
            match event {
                MockEvent::Pin { name: "dc", high } => dc = *high,
                MockEvent::Spi(bytes) => out.extend(bytes.iter().map(|&b| (dc, b))),
                _ => {}
            }
        }
        out
    }

    #[test]
    fn test_setup_sequence() {
        let log = MockLog::new();
        let mut drv = driver(&log);
        block_on(drv.setup()).unwrap();
        assert!(drv.is_ready());

        let bytes = decode(&log.events());
        let commands: Vec<u8> = bytes.iter().filter(|(d, _)| !d).map(|&(_, b)| b).collect();
        assert_eq!(
            commands,
            [0x21, 0x13, 0xBF, 0x20, 0x09, 0x80, 0x40, 0x80, 0x40, 0x08, 0x0C, 0x80, 0x40]
        );
        assert_eq!(bytes.iter().filter(|(d, _)| *d).count(), 504);
        assert!(bytes.iter().filter(|(d, _)| *d).all(|&(_, b)| b == 0));

        // reset holds, then the settle delay
        assert_eq!(log.async_delays_ms(), [100, 100, 100]);
    }

    #[test]
    fn test_drawing_does_not_transmit() {
        let log = MockLog::new();
        let mut drv = ready(&log);

        drv.pixel(5, 9, Rgb::BLACK).unwrap();
        drv.rect(0, 0, 3, 3, Rgb::BLACK).unwrap();
        assert!(log.is_empty());
        assert_eq!(drv.framebuffer().byte(5, 1), Some(0b10));
    }

    #[test]
    fn test_pixel_clear_then_set() {
        let log = MockLog::new();
        let mut drv = ready(&log);

        drv.rect(0, 0, 0, 7, Rgb::BLACK).unwrap();
        drv.pixel(0, 3, Rgb::WHITE).unwrap();
        assert_eq!(drv.framebuffer().byte(0, 0), Some(0b1111_0111));

        // off the panel: ignored
        drv.pixel(84, 0, Rgb::BLACK).unwrap();
        drv.pixel(0, 48, Rgb::BLACK).unwrap();
    }

    #[test]
    fn test_rect_is_inclusive_and_clamped() {
        let log = MockLog::new();
        let mut drv = ready(&log);

        drv.rect(80, 44, 200, 200, Rgb::BLACK).unwrap();
        let fb = drv.framebuffer();
        let lit = (0..84)
            .flat_map(|x| (0..48).map(move |y| (x, y)))
            .filter(|&(x, y)| fb.get(x, y) == Some(true))
            .count();
        assert_eq!(lit, 4 * 4);
        assert_eq!(fb.get(83, 47), Some(true));
    }

    #[test]
    fn test_push_framebuffer() {
        let log = MockLog::new();
        let mut drv = ready(&log);
        drv.pixel(0, 0, Rgb::BLACK).unwrap();
        drv.pixel(83, 47, Rgb::BLACK).unwrap();

        drv.push_framebuffer().unwrap();

        let bytes = decode(&log.events());
        assert_eq!(bytes.len(), 2 + 504 + 2);
        assert_eq!(bytes[..2], [(false, 0x80), (false, 0x40)]);
        assert_eq!(bytes[2], (true, 0x01));
        assert_eq!(bytes[505], (true, 0x80));
        assert_eq!(bytes[506..], [(false, 0x80), (false, 0x40)]);
    }

    #[test]
    fn test_push_sends_framebuffer_bytes_in_band_order() {
        let log = MockLog::new();
        let mut drv = ready(&log);
        drv.pixel(0, 8, Rgb::BLACK).unwrap();
        drv.pixel(1, 0, Rgb::BLACK).unwrap();

        drv.push_framebuffer().unwrap();

        let data: Vec<u8> = decode(&log.events())
            .into_iter()
            .filter(|&(d, _)| d)
            .map(|(_, b)| b)
            .collect();
        let expected: Vec<u8> = drv.framebuffer().bytes().collect();
        assert_eq!(data, expected);
        // band 1 starts after a full row of band 0
        assert_eq!(data[1], 0x01);
        assert_eq!(data[WIDTH as usize], 0x01);
    }

    #[test]
    fn test_each_byte_framed_by_chip_select() {
        let log = MockLog::new();
        let mut drv = ready(&log);
        drv.flush().unwrap();

        let events = log.events();
        for (i, event) in events.iter().enumerate() {
            if matches!(event, MockEvent::Spi(_)) {
                assert_eq!(events[i - 1], MockEvent::Pin { name: "cs", high: false });
                assert_eq!(events[i + 1], MockEvent::Pin { name: "cs", high: true });
            }
        }
    }

    #[test]
    fn test_not_ready_guard() {
        let log = MockLog::new();
        let mut drv = driver(&log);

        assert_eq!(drv.pixel(0, 0, Rgb::BLACK), Err(DisplayError::NotInitialized));
        assert_eq!(drv.flush(), Err(DisplayError::NotInitialized));
        assert!(log.is_empty());
    }

    #[test]
    fn test_spi_failure_reported() {
        let log = MockLog::new();
        let pins = Pcd8544Pins {
            rst: log.pin("rst"),
            dc: log.pin("dc"),
            cs: log.pin("cs"),
        };
        let mut drv = Pcd8544::new(log.failing_spi(), pins, log.delay(), Pcd8544Config::default());

        assert_eq!(block_on(drv.setup()), Err(DisplayError::Communication));
        assert!(!drv.is_ready());
    }

    #[test]
    fn test_config_from_panel() {
        let mut panel = PanelConfig::new(pipanel_display::Controller::Pcd8544);
        panel.contrast = 0xB8;
        panel.timing.settle_ms = 20;
        let config = Pcd8544Config::from(&panel);
        assert_eq!(config.contrast, 0xB8);
        assert_eq!(config.timing.settle_ms, 20);
    }
}
