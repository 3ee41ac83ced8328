//! Glyph editor input model
//!
//! The interactive font tool keeps a little state between key presses:
//! which list entry is selected, whether the user is scrolling the glyph
//! list or painting pixels, and where the pixel cursor is. That state lives
//! in [`GlyphEditor`]; rendering and key capture are up to the caller.

use crate::font::{Font, Glyph};

/// Width of a glyph added when neither the selection nor the space glyph
/// has any columns
pub const DEFAULT_GLYPH_COLUMNS: usize = 5;

/// What the arrow keys act on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditMode {
    /// Up/Down move the glyph selection
    #[default]
    GlyphList,
    /// Arrows move the pixel cursor, Toggle flips the pixel under it
    EditGlyph,
}

/// Editor input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditorKey {
    Up,
    Down,
    Left,
    Right,
    /// Switch between list and pixel editing
    Tab,
    /// Flip the pixel under the cursor
    Toggle,
    /// Add an empty glyph for a character
    Add(char),
    Save,
    Quit,
}

/// What the caller should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditorAction {
    /// Nothing changed
    None,
    /// Selection, cursor or glyph data changed; redraw
    Redraw,
    /// Write the font to its file
    Save,
    /// Leave the editor
    Quit,
}

/// Editor state carried between key presses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphEditor {
    mode: EditMode,
    selected: usize,
    cursor_x: usize,
    cursor_y: usize,
}

impl GlyphEditor {
    /// Start in list mode with the first glyph selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// Storage-order index of the selected glyph
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Selected character, if the font has any glyphs
    pub fn selected_char(&self, font: &Font) -> Option<char> {
        font.char_at(self.selected)
    }

    /// Pixel cursor `(x, y)` in unscaled glyph coordinates
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_x, self.cursor_y)
    }

    /// Index of the glyph word under the cursor
    pub fn cursor_word(&self, font: &Font) -> usize {
        self.cursor_x * font.data_per_y() as usize + self.cursor_y / 8
    }

    /// Apply one key press
    ///
    /// The cursor is pulled back inside the selected glyph afterwards, so a
    /// narrower selection never leaves it past the last column.
    pub fn handle(&mut self, font: &mut Font, key: EditorKey) -> EditorAction {
        let action = self.apply(font, key);
        self.cursor_x = self.cursor_x.min(self.glyph_width(font).saturating_sub(1));
        self.cursor_y = self.cursor_y.min((font.height() as usize).saturating_sub(1));
        action
    }

    fn apply(&mut self, font: &mut Font, key: EditorKey) -> EditorAction {
        match key {
            EditorKey::Quit => EditorAction::Quit,
            EditorKey::Save => EditorAction::Save,
            EditorKey::Tab => {
                self.mode = match self.mode {
                    EditMode::GlyphList => EditMode::EditGlyph,
                    EditMode::EditGlyph => EditMode::GlyphList,
                };
                EditorAction::Redraw
            }
            EditorKey::Up => match self.mode {
                EditMode::GlyphList => Self::step_down(&mut self.selected),
                EditMode::EditGlyph => Self::step_down(&mut self.cursor_y),
            },
            EditorKey::Down => match self.mode {
                EditMode::GlyphList => Self::step_up(&mut self.selected, font.len()),
                EditMode::EditGlyph => {
                    Self::step_up(&mut self.cursor_y, font.height() as usize)
                }
            },
            EditorKey::Left if self.mode == EditMode::EditGlyph => {
                Self::step_down(&mut self.cursor_x)
            }
            EditorKey::Right if self.mode == EditMode::EditGlyph => {
                let width = self.glyph_width(font);
                Self::step_up(&mut self.cursor_x, width)
            }
            EditorKey::Left | EditorKey::Right => EditorAction::None,
            EditorKey::Toggle => {
                if self.mode != EditMode::EditGlyph {
                    return EditorAction::None;
                }
                match self.selected_char(font) {
                    Some(c) if font.toggle_pixel(c, self.cursor_x, self.cursor_y) => {
                        EditorAction::Redraw
                    }
                    _ => EditorAction::None,
                }
            }
            EditorKey::Add(c) => {
                if font.contains(c) {
                    return EditorAction::None;
                }
                let columns = self.new_glyph_width(font);
                let dpy = font.data_per_y();
                match font.insert(c, Glyph::blank(columns, dpy)) {
                    Ok(_) => EditorAction::Redraw,
                    Err(e) => {
                        log::warn!("cannot add glyph {c:?}: {e}");
                        EditorAction::None
                    }
                }
            }
        }
    }

    /// Width of the selected glyph, which bounds the cursor
    fn glyph_width(&self, font: &Font) -> usize {
        self.selected_char(font)
            .and_then(|c| font.columns(c))
            .unwrap_or(0)
    }

    /// Width for an added glyph: the selection's, else the space glyph's
    fn new_glyph_width(&self, font: &Font) -> usize {
        [self.glyph_width(font), font.columns(' ').unwrap_or(0)]
            .into_iter()
            .find(|&w| w > 0)
            .unwrap_or(DEFAULT_GLYPH_COLUMNS)
    }

    fn step_down(value: &mut usize) -> EditorAction {
        if *value > 0 {
            *value -= 1;
            EditorAction::Redraw
        } else {
            EditorAction::None
        }
    }

    fn step_up(value: &mut usize, limit: usize) -> EditorAction {
        if *value + 1 < limit {
            *value += 1;
            EditorAction::Redraw
        } else {
            EditorAction::None
        }
    }
}
