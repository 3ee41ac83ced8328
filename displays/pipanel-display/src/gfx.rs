//! Drawing surface
//!
//! [`Surface`] owns a backend and borrows a font. It is the only thing that
//! talks to the backend: every logical coordinate goes through the active
//! [`Rotation`] and off-panel pixels are dropped before the backend sees
//! them.

use log::{debug, trace};
use pipanel_font::Font;

use crate::backend::{DisplayBackend, DisplayError};
use crate::color::Rgb;
use crate::config::{ConfigError, PanelConfig};
use crate::rotation::Rotation;

/// Drawing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GfxError {
    /// The font has no glyph for this character
    MissingGlyph(char),
    /// The backend rejected a write
    Display(DisplayError),
}

impl From<DisplayError> for GfxError {
    fn from(e: DisplayError) -> Self {
        GfxError::Display(e)
    }
}

impl core::fmt::Display for GfxError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GfxError::MissingGlyph(c) => write!(f, "no glyph for {c:?}"),
            GfxError::Display(e) => write!(f, "{e}"),
        }
    }
}

/// Rotation-aware drawing on top of a [`DisplayBackend`]
///
/// Logical coordinates are signed so that text and rectangles may start or
/// run off the panel; those pixels are clipped, not errors.
pub struct Surface<'f, B> {
    backend: B,
    font: &'f Font,
    rotation: Rotation,
    scale: u8,
}

impl<'f, B: DisplayBackend> Surface<'f, B> {
    /// Create a surface with identity rotation and font scale 1
    pub fn new(backend: B, font: &'f Font) -> Self {
        Self {
            backend,
            font,
            rotation: Rotation::Identity,
            scale: 1,
        }
    }

    /// Apply rotation and font scale from a panel configuration
    pub fn configure(&mut self, config: &PanelConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.rotation = config.rotation;
        self.scale = config.font_scale;
        Ok(())
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    pub fn font_scale(&self) -> u8 {
        self.scale
    }

    /// Set the integer font scale; 0 is treated as 1
    pub fn set_font_scale(&mut self, scale: u8) {
        self.scale = scale.max(1);
    }

    pub fn font(&self) -> &'f Font {
        self.font
    }

    /// Switch fonts between frames
    pub fn set_font(&mut self, font: &'f Font) {
        self.font = font;
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Give the backend back
    pub fn into_inner(self) -> B {
        self.backend
    }

    /// Width and height in logical (rotated) pixels
    pub fn logical_size(&self) -> (u16, u16) {
        self.rotation.logical_size(B::WIDTH, B::HEIGHT)
    }

    /// Push buffered drawing to the panel
    pub fn flush(&mut self) -> Result<(), GfxError> {
        self.backend.flush()?;
        Ok(())
    }

    /// Set one logical pixel
    ///
    /// Pixels that rotate off the panel are dropped without error.
    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Rgb) -> Result<(), GfxError> {
        let (w, h) = (i64::from(B::WIDTH), i64::from(B::HEIGHT));
        let (px, py) = self.rotation.apply(i64::from(x), i64::from(y), w, h);
        if !(0..w).contains(&px) || !(0..h).contains(&py) {
            trace!("drop pixel ({x}, {y}) -> ({px}, {py})");
            return Ok(());
        }
        // Both coordinates are in 0..u16::MAX here
        self.backend.pixel(px as u16, py as u16, color)?;
        Ok(())
    }

    /// Draw the set pixels of one glyph with its top-left at `(x, y)`
    ///
    /// Fails with [`GfxError::MissingGlyph`] before touching the backend if
    /// the font has no glyph for `c`.
    pub fn draw_char(&mut self, c: char, x: i32, y: i32, color: Rgb) -> Result<(), GfxError> {
        let font = self.font;
        let raster = font
            .rasterize(c, self.scale)
            .ok_or(GfxError::MissingGlyph(c))?;
        for (gx, gy) in raster.set_pixels() {
            self.draw_pixel(offset(x, gx), offset(y, gy), color)?;
        }
        Ok(())
    }

    /// Horizontal distance between character origins
    ///
    /// Cells are monospaced on the space glyph's width:
    /// `(space_columns + scale * spacing) * scale`.
    pub fn advance(&self, spacing: u8) -> Result<i32, GfxError> {
        let columns = self
            .font
            .columns(' ')
            .ok_or(GfxError::MissingGlyph(' '))?;
        let columns = i32::try_from(columns).unwrap_or(i32::MAX);
        let scale = i32::from(self.scale);
        Ok(columns
            .saturating_add(scale * i32::from(spacing))
            .saturating_mul(scale))
    }

    /// Width in logical pixels that [`draw_string`](Self::draw_string)
    /// lays `text` out over
    pub fn string_width(&self, text: &str, spacing: u8) -> Result<i32, GfxError> {
        let count = i32::try_from(text.chars().count()).unwrap_or(i32::MAX);
        Ok(self.advance(spacing)?.saturating_mul(count))
    }

    /// Draw `text` left to right from `(x, y)`
    ///
    /// Every glyph is looked up before anything is drawn, so a missing
    /// glyph leaves the panel untouched.
    pub fn draw_string(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        color: Rgb,
        spacing: u8,
    ) -> Result<(), GfxError> {
        let advance = self.advance(spacing)?;
        if let Some(c) = text.chars().find(|&c| !self.font.contains(c)) {
            return Err(GfxError::MissingGlyph(c));
        }
        debug!("draw_string {text:?} at ({x}, {y}), advance {advance}");
        let mut cx = x;
        for c in text.chars() {
            self.draw_char(c, cx, y, color)?;
            cx = cx.saturating_add(advance);
        }
        Ok(())
    }

    /// Fill `x1 <= x < x2`, `y1 <= y < y2` pixel by pixel
    pub fn fill_rect(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Rgb,
    ) -> Result<(), GfxError> {
        debug!("fill_rect ({x1}, {y1}) -> ({x2}, {y2}) {color}");
        for sx in x1..x2 {
            for sy in y1..y2 {
                self.draw_pixel(sx, sy, color)?;
            }
        }
        Ok(())
    }

    /// Fill the whole panel in one backend rectangle, ignoring rotation
    pub fn fill_screen(&mut self, color: Rgb) -> Result<(), GfxError> {
        debug!("fill_screen {color}");
        self.backend.rect(0, 0, B::WIDTH, B::HEIGHT, color)?;
        Ok(())
    }

    /// Highlighted text: fill the string's box with `fg`, then draw the
    /// string over it in `bg`
    ///
    /// The box is [`string_width`](Self::string_width) wide at spacing 1
    /// and one scaled glyph tall.
    pub fn fill_draw_string(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        fg: Rgb,
        bg: Rgb,
    ) -> Result<(), GfxError> {
        if let Some(c) = text.chars().find(|&c| !self.font.contains(c)) {
            return Err(GfxError::MissingGlyph(c));
        }
        let width = self.string_width(text, 1)?;
        let height = self.font.height().saturating_mul(u32::from(self.scale));
        let height = i32::try_from(height).unwrap_or(i32::MAX);
        self.fill_rect(x, y, x.saturating_add(width), y.saturating_add(height), fg)?;
        self.draw_string(text, x, y, bg, 1)
    }
}

/// Glyph pixel offset from an origin, pinned at the `i32` range
fn offset(origin: i32, delta: u32) -> i32 {
    origin.saturating_add(i32::try_from(delta).unwrap_or(i32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendState;
    use crate::config::Controller;
    use pipanel_font::Glyph;
    use std::vec;

    const W: usize = 12;
    const H: usize = 8;

    /// In-memory panel recording every call
    struct GridBackend {
        grid: [[Option<Rgb>; W]; H],
        rects: usize,
        state: BackendState,
    }

    impl GridBackend {
        fn ready() -> Self {
            Self {
                grid: [[None; W]; H],
                rects: 0,
                state: BackendState::Ready,
            }
        }

        fn lit(&self) -> usize {
            self.grid.iter().flatten().filter(|p| p.is_some()).count()
        }
    }

    impl DisplayBackend for GridBackend {
        const WIDTH: u16 = W as u16;
        const HEIGHT: u16 = H as u16;

        async fn reset(&mut self) -> Result<(), DisplayError> {
            self.state = BackendState::Resetting;
            Ok(())
        }

        async fn setup(&mut self) -> Result<(), DisplayError> {
            self.state = BackendState::Ready;
            Ok(())
        }

        fn pixel(&mut self, x: u16, y: u16, color: Rgb) -> Result<(), DisplayError> {
            self.state.ensure_ready()?;
            self.grid[y as usize][x as usize] = Some(color);
            Ok(())
        }

        fn rect(
            &mut self,
            x1: u16,
            y1: u16,
            x2: u16,
            y2: u16,
            color: Rgb,
        ) -> Result<(), DisplayError> {
            self.state.ensure_ready()?;
            self.rects += 1;
            let clamped = crate::backend::clamp_rect(x1, y1, x2, y2, W as u16, H as u16);
            let Some((x1, y1, x2, y2)) = clamped else {
                return Ok(());
            };
            for y in y1..=y2 {
                for x in x1..=x2 {
                    self.grid[y as usize][x as usize] = Some(color);
                }
            }
            Ok(())
        }

        fn state(&self) -> BackendState {
            self.state
        }
    }

    /// One band high, two columns wide; 'I' is a full-height bar in column 0
    fn font() -> Font {
        let mut font = Font::new(1).unwrap();
        font.insert(' ', Glyph::new(vec![0, 0])).unwrap();
        font.insert('I', Glyph::new(vec![0xFF, 0])).unwrap();
        font.insert('.', Glyph::new(vec![0x80, 0])).unwrap();
        font
    }

    #[test]
    fn test_pixel_rotation_and_clipping() {
        let font = font();
        let mut surface = Surface::new(GridBackend::ready(), &font);
        surface.set_rotation(Rotation::Flip);

        surface.draw_pixel(0, 0, Rgb::RED).unwrap();
        assert_eq!(surface.backend().grid[H - 1][W - 1], Some(Rgb::RED));

        for (x, y) in [(-1, 0), (W as i32, 0), (0, -1), (0, H as i32)] {
            surface.draw_pixel(x, y, Rgb::BLUE).unwrap();
        }
        assert_eq!(surface.backend().lit(), 1);
    }

    #[test]
    fn test_extreme_coordinates_are_clipped() {
        let font = font();
        let mut surface = Surface::new(GridBackend::ready(), &font);

        for rotation in Rotation::ALL {
            surface.set_rotation(rotation);
            for (x, y) in [
                (i32::MIN, 0),
                (0, i32::MIN),
                (i32::MAX, i32::MAX),
                (i32::MIN, i32::MAX),
            ] {
                surface.draw_pixel(x, y, Rgb::RED).unwrap();
            }
            surface.draw_char('I', i32::MAX - 1, 0, Rgb::RED).unwrap();
            surface.draw_char('I', 0, i32::MAX - 3, Rgb::RED).unwrap();
            surface.draw_string("II", i32::MAX - 3, 0, Rgb::RED, 1).unwrap();
            let edge = i32::MAX - 2;
            surface.fill_draw_string("II", edge, edge, Rgb::RED, Rgb::BLUE).unwrap();
        }
        assert_eq!(surface.backend().lit(), 0);
    }

    #[test]
    fn test_logical_size_follows_rotation() {
        let font = font();
        let mut surface = Surface::new(GridBackend::ready(), &font);
        assert_eq!(surface.logical_size(), (12, 8));
        surface.set_rotation(Rotation::TransposeFlip);
        assert_eq!(surface.logical_size(), (8, 12));
    }

    #[test]
    fn test_draw_char_scaled() {
        let font = font();
        let mut surface = Surface::new(GridBackend::ready(), &font);
        surface.set_font_scale(2);

        // '.' is the bottom pixel of column 0; at scale 2 it is the 2x2
        // block at rows 14..16, drawn 10 rows up
        surface.draw_char('.', 0, -10, Rgb::WHITE).unwrap();
        let grid = &surface.backend().grid;
        assert_eq!(grid[4][0], Some(Rgb::WHITE));
        assert_eq!(grid[5][1], Some(Rgb::WHITE));
        assert_eq!(surface.backend().lit(), 4);
    }

    #[test]
    fn test_missing_glyph_leaves_backend_untouched() {
        let font = font();
        let mut surface = Surface::new(GridBackend::ready(), &font);

        assert_eq!(
            surface.draw_char('X', 0, 0, Rgb::WHITE),
            Err(GfxError::MissingGlyph('X'))
        );
        assert_eq!(
            surface.draw_string("IXI", 0, 0, Rgb::WHITE, 1),
            Err(GfxError::MissingGlyph('X'))
        );
        assert_eq!(surface.backend().lit(), 0);
    }

    #[test]
    fn test_draw_string_advance() {
        let font = font();
        let mut surface = Surface::new(GridBackend::ready(), &font);

        // space is 2 columns wide, spacing 1: advance 3
        assert_eq!(surface.advance(1), Ok(3));
        surface.draw_string("III", 0, 0, Rgb::GREEN, 1).unwrap();
        let grid = &surface.backend().grid;
        for x in 0..W {
            assert_eq!(grid[0][x].is_some(), x % 3 == 0 && x < 9, "column {x}");
        }

        surface.set_font_scale(2);
        assert_eq!(surface.advance(1), Ok(8));
        assert_eq!(surface.string_width("ab", 1), Ok(16));
    }

    #[test]
    fn test_fill_rect_is_half_open() {
        let font = font();
        let mut surface = Surface::new(GridBackend::ready(), &font);

        surface.fill_rect(2, 1, 5, 3, Rgb::RED).unwrap();
        let grid = &surface.backend().grid;
        assert_eq!(surface.backend().lit(), 6);
        assert_eq!(grid[1][2], Some(Rgb::RED));
        assert_eq!(grid[2][4], Some(Rgb::RED));
        assert_eq!(grid[3][4], None);
        assert_eq!(grid[1][5], None);
    }

    #[test]
    fn test_fill_screen_ignores_rotation() {
        let font = font();
        let mut surface = Surface::new(GridBackend::ready(), &font);
        surface.set_rotation(Rotation::Transpose);

        surface.fill_screen(Rgb::BLUE).unwrap();
        assert_eq!(surface.backend().rects, 1);
        assert_eq!(surface.backend().lit(), W * H);
    }

    #[test]
    fn test_fill_draw_string_inverts() {
        let font = font();
        let mut surface = Surface::new(GridBackend::ready(), &font);

        surface.fill_draw_string("I", 1, 0, Rgb::WHITE, Rgb::BLACK).unwrap();
        let grid = &surface.backend().grid;
        for y in 0..H {
            assert_eq!(grid[y][1], Some(Rgb::BLACK));
            assert_eq!(grid[y][2], Some(Rgb::WHITE));
            assert_eq!(grid[y][3], Some(Rgb::WHITE));
            assert_eq!(grid[y][4], None);
        }
    }

    #[test]
    fn test_backend_errors_propagate() {
        let font = font();
        let mut backend = GridBackend::ready();
        backend.state = BackendState::Unconfigured;
        let mut surface = Surface::new(backend, &font);

        assert_eq!(
            surface.draw_pixel(0, 0, Rgb::RED),
            Err(GfxError::Display(DisplayError::NotInitialized))
        );
        // clipped pixels never reach the backend
        assert_eq!(surface.draw_pixel(-1, 0, Rgb::RED), Ok(()));
    }

    #[test]
    fn test_setup_then_draw() {
        let font = font();
        let mut backend = GridBackend::ready();
        backend.state = BackendState::Unconfigured;
        let mut surface = Surface::new(backend, &font);

        embassy_futures::block_on(surface.backend_mut().setup()).unwrap();
        assert!(surface.backend().is_ready());
        surface.draw_pixel(0, 0, Rgb::RED).unwrap();
    }

    #[test]
    fn test_configure() {
        let font = font();
        let mut surface = Surface::new(GridBackend::ready(), &font);
        let mut config = PanelConfig::new(Controller::Pcd8544);
        config.rotation = Rotation::Transpose;
        config.font_scale = 3;

        surface.configure(&config).unwrap();
        assert_eq!(surface.rotation(), Rotation::Transpose);
        assert_eq!(surface.font_scale(), 3);

        config.font_scale = 0;
        assert_eq!(surface.configure(&config), Err(ConfigError::InvalidScale));
        assert_eq!(surface.font_scale(), 3);
    }
}
