//! Pixel-console rasterizer with framebuffer-backed scrolling.
//!
//! There is no character grid behind the console: the framebuffer itself is
//! the document. A line feed that runs out of room shifts the text region up
//! with one bulk copy and blanks the vacated last line.

use argbframe::{Frame, color};
use log::warn;

use crate::emit::CharSink;
use crate::font::{Font, OutOfRangeGlyph};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConsoleError {
    /// Pixel scale of zero.
    ZeroScale,
    /// Frame cannot fit one text line at the configured scale.
    FrameTooSmall {
        logical_width: u32,
        logical_height: u32,
    },
    /// Requested cursor position outside the logical frame.
    CursorOutOfRange { x: u32, y: u32 },
    /// Neither the requested code point nor the replacement glyph exists.
    Glyph(OutOfRangeGlyph),
}

impl From<OutOfRangeGlyph> for ConsoleError {
    fn from(err: OutOfRangeGlyph) -> Self {
        Self::Glyph(err)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ConsoleConfig {
    pub fg: u32,
    pub bg: u32,
    /// Each logical pixel paints a `scale x scale` block; 2 doubles a
    /// low-resolution font on a high-resolution display.
    pub scale: u32,
    /// Substituted for out-of-table code points.
    pub replacement: u32,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            fg: color::LIGHT_GRAY,
            bg: color::DARK_GRAY,
            scale: 1,
            replacement: b'?' as u32,
        }
    }
}

/// Exclusive owner of the frame, font and cursor for one console session.
///
/// The cursor lives in logical pixels and starts at the origin; the session
/// never clears the frame on its own, callers start with [`clear`].
///
/// [`clear`]: ConsoleSession::clear
pub struct ConsoleSession<'a, 'p> {
    frame: &'a mut Frame<'p>,
    font: &'a Font<'a>,
    config: ConsoleConfig,
    x: u32,
    y: u32,
}

impl<'a, 'p> ConsoleSession<'a, 'p> {
    pub fn new(
        frame: &'a mut Frame<'p>,
        font: &'a Font<'a>,
        config: ConsoleConfig,
    ) -> Result<Self, ConsoleError> {
        if config.scale == 0 {
            return Err(ConsoleError::ZeroScale);
        }

        let logical_width = frame.width() as u32 / config.scale;
        let logical_height = frame.height() as u32 / config.scale;
        if logical_width < font.width() || logical_height < font.height() {
            return Err(ConsoleError::FrameTooSmall {
                logical_width,
                logical_height,
            });
        }

        Ok(Self {
            frame,
            font,
            config,
            x: 0,
            y: 0,
        })
    }

    pub fn cursor(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    pub fn font_width(&self) -> u32 {
        self.font.width()
    }

    pub fn font_height(&self) -> u32 {
        self.font.height()
    }

    pub fn colors(&self) -> (u32, u32) {
        (self.config.fg, self.config.bg)
    }

    pub fn set_colors(&mut self, fg: u32, bg: u32) {
        self.config.fg = fg;
        self.config.bg = bg;
    }

    pub fn frame(&self) -> &Frame<'p> {
        self.frame
    }

    fn logical_width(&self) -> u32 {
        self.frame.width() as u32 / self.config.scale
    }

    fn logical_height(&self) -> u32 {
        self.frame.height() as u32 / self.config.scale
    }

    /// Fills the frame with the background color and homes the cursor.
    pub fn clear(&mut self) {
        self.frame.fill(self.config.bg);
        self.x = 0;
        self.y = 0;
    }

    /// Moves the cursor to a logical pixel position.
    pub fn move_to(&mut self, x: u32, y: u32) -> Result<(), ConsoleError> {
        if x >= self.logical_width() || y >= self.logical_height() {
            return Err(ConsoleError::CursorOutOfRange { x, y });
        }

        self.x = x;
        self.y = y;
        Ok(())
    }

    /// Prints one character at a time. `\r` returns to column zero, `\n`
    /// feeds a line; everything else rasterizes a glyph and advances the
    /// cursor, wrapping at the right margin.
    pub fn print_str(&mut self, text: &str) -> Result<(), ConsoleError> {
        for c in text.chars() {
            match c {
                '\r' => self.x = 0,
                '\n' => self.line_feed(),
                _ => self.put_glyph(c as u32)?,
            }
        }
        Ok(())
    }

    /// Advances one text line, or scrolls the text region up by one line
    /// when no full line fits below the cursor. Scrolling leaves the cursor
    /// where it was.
    pub fn line_feed(&mut self) {
        let height = self.font.height();
        if self.y + height < self.logical_height() - height {
            self.y += height;
            return;
        }

        let line_rows = (height * self.config.scale) as usize;
        let text_lines = (self.logical_height() / height) as usize;
        self.frame
            .scroll_rows_up(text_lines * line_rows, line_rows, self.config.bg);
    }

    fn put_glyph(&mut self, code: u32) -> Result<(), ConsoleError> {
        let glyph = match self.font.glyph(code) {
            Ok(glyph) => glyph,
            Err(missing) => {
                warn!(
                    "code point {} outside {} glyph table, substituting",
                    missing.code,
                    self.font.name()
                );
                self.font
                    .glyph(self.config.replacement)
                    .map_err(|_| ConsoleError::Glyph(missing))?
            }
        };

        let width = self.font.width();
        for row in 0..self.font.height() {
            // Rows iterate within the font's own height.
            let bits = glyph.row(row).unwrap_or(0);
            let mut mask = 1u64 << 63;
            for col in 0..width {
                let argb = if bits & mask != 0 {
                    self.config.fg
                } else {
                    self.config.bg
                };
                self.paint_cell(self.x + col, self.y + row, argb);
                mask >>= 1;
            }
        }

        // One glyph width of right margin stays reserved; wrapping is an
        // implicit CR/LF, uncoupled from whitespace.
        if self.x + width < self.logical_width() - width {
            self.x += width;
        } else {
            self.x = 0;
            self.line_feed();
        }
        Ok(())
    }

    fn paint_cell(&mut self, lx: u32, ly: u32, argb: u32) {
        let scale = self.config.scale as usize;
        let px = lx as usize * scale;
        let py = ly as usize * scale;
        for dy in 0..scale {
            for dx in 0..scale {
                let _ = self.frame.set_pixel(px + dx, py + dy, argb);
            }
        }
    }
}

impl CharSink for ConsoleSession<'_, '_> {
    type Error = ConsoleError;

    fn write_str(&mut self, text: &str) -> Result<(), Self::Error> {
        self.print_str(text)
    }
}
