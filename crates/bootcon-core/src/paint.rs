//! Menu painting over either a pixel console or a firmware text console.

use argbframe::color;

use crate::console::{ConsoleError, ConsoleSession};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RowStyle {
    Default,
    Highlighted,
}

/// Draws menu rows without knowing what selects them.
pub trait MenuPainter {
    type Error;

    /// Blanks the menu surface.
    fn clear(&mut self) -> Result<(), Self::Error>;

    fn paint_row(&mut self, row: usize, label: &str, style: RowStyle) -> Result<(), Self::Error>;

    /// Full repaint with one highlighted row.
    fn paint_all(&mut self, labels: &[&str], highlighted: usize) -> Result<(), Self::Error> {
        self.clear()?;
        for (row, label) in labels.iter().enumerate() {
            let style = if row == highlighted {
                RowStyle::Highlighted
            } else {
                RowStyle::Default
            };
            self.paint_row(row, label, style)?;
        }
        Ok(())
    }
}

/// Menu colors, highlight swaps foreground and background.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Palette {
    pub fg: u32,
    pub bg: u32,
}

impl Palette {
    pub fn colors(&self, style: RowStyle) -> (u32, u32) {
        match style {
            RowStyle::Default => (self.fg, self.bg),
            RowStyle::Highlighted => (self.bg, self.fg),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            fg: color::LIGHT_GRAY,
            bg: color::BLUE,
        }
    }
}

/// Rasterizes menu rows through a [`ConsoleSession`], one text line per row.
pub struct PixelPainter<'a, 'p> {
    session: ConsoleSession<'a, 'p>,
    palette: Palette,
}

impl<'a, 'p> PixelPainter<'a, 'p> {
    pub fn new(session: ConsoleSession<'a, 'p>, palette: Palette) -> Self {
        Self { session, palette }
    }

    /// Actions draw through the same session the menu paints with.
    pub fn session_mut(&mut self) -> &mut ConsoleSession<'a, 'p> {
        &mut self.session
    }
}

impl MenuPainter for PixelPainter<'_, '_> {
    type Error = ConsoleError;

    fn clear(&mut self) -> Result<(), Self::Error> {
        let (fg, bg) = self.palette.colors(RowStyle::Default);
        self.session.set_colors(fg, bg);
        self.session.clear();
        Ok(())
    }

    fn paint_row(&mut self, row: usize, label: &str, style: RowStyle) -> Result<(), Self::Error> {
        let (fg, bg) = self.palette.colors(style);
        self.session.set_colors(fg, bg);
        self.session.move_to(0, row as u32 * self.session.font_height())?;
        self.session.print_str(label)
    }
}

/// Firmware text console surface: attribute + cursor + string output.
/// Backends implement this, the menu never drives the console directly.
pub trait TextDisplay {
    type Error;

    fn clear(&mut self) -> Result<(), Self::Error>;
    fn set_style(&mut self, style: RowStyle) -> Result<(), Self::Error>;
    fn set_cursor(&mut self, row: usize) -> Result<(), Self::Error>;
    fn write_str(&mut self, text: &str) -> Result<(), Self::Error>;
}

/// Menu painter over a [`TextDisplay`].
pub struct TextPainter<T> {
    display: T,
}

impl<T: TextDisplay> TextPainter<T> {
    pub fn new(display: T) -> Self {
        Self { display }
    }

    pub fn display_mut(&mut self) -> &mut T {
        &mut self.display
    }
}

impl<T: TextDisplay> MenuPainter for TextPainter<T> {
    type Error = T::Error;

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.display.set_style(RowStyle::Default)?;
        self.display.clear()
    }

    fn paint_row(&mut self, row: usize, label: &str, style: RowStyle) -> Result<(), Self::Error> {
        self.display.set_style(style)?;
        self.display.set_cursor(row)?;
        self.display.write_str(label)
    }
}
