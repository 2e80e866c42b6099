//! Presents a render target in the terminal

use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use sr3d_core::color::{channels, luminance};
use sr3d_core::RenderTarget;
use std::io::{self, Write};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Upper half block: foreground paints the top pixel, background the bottom
const HALF_BLOCK: char = '▀';

/// How pixels map to terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellMode {
    /// Two pixels per cell, stacked, in 24-bit color
    HalfBlock,
    /// One pixel per cell, as a character from the luminosity ramp
    Ascii,
}

/// Writes framebuffers to a terminal, leaving the top row for a status line
pub struct TerminalRenderer {
    mode: CellMode,
}

impl TerminalRenderer {
    pub fn new(mode: CellMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> CellMode {
        self.mode
    }

    /// Pixel size of a render target filling a terminal of `cols`×`rows`
    /// cells below the status line. At least 1×1.
    pub fn target_size(&self, cols: u16, rows: u16) -> (u32, u32) {
        let rows = rows.saturating_sub(1).max(1) as u32;
        let cols = cols.max(1) as u32;
        match self.mode {
            CellMode::HalfBlock => (cols, rows * 2),
            CellMode::Ascii => (cols, rows),
        }
    }

    /// Queues the whole target, starting on the second terminal row. The
    /// caller flushes.
    pub fn draw<W: Write>(&self, target: &RenderTarget, out: &mut W) -> io::Result<()> {
        let (w, h) = (target.width() as i32, target.height() as i32);
        let rows = match self.mode {
            CellMode::HalfBlock => (h + 1) / 2,
            CellMode::Ascii => h,
        };

        for row in 0..rows {
            out.queue(cursor::MoveTo(0, row as u16 + 1))?;
            let mut last: Option<(Color, Color)> = None;
            for x in 0..w {
                match self.mode {
                    CellMode::HalfBlock => {
                        let top = target.pixel(x, row * 2).map_or(Color::Black, rgb);
                        let bottom = target.pixel(x, row * 2 + 1).map_or(Color::Black, rgb);
                        if last != Some((top, bottom)) {
                            out.queue(SetForegroundColor(top))?;
                            out.queue(SetBackgroundColor(bottom))?;
                            last = Some((top, bottom));
                        }
                        out.queue(Print(HALF_BLOCK))?;
                    }
                    CellMode::Ascii => {
                        let c = target.pixel(x, row).unwrap_or_default();
                        let fg = rgb(c);
                        if last.map(|(f, _)| f) != Some(fg) {
                            out.queue(SetForegroundColor(fg))?;
                            last = Some((fg, Color::Reset));
                        }
                        out.queue(Print(ramp_char(c)))?;
                    }
                }
            }
            out.queue(ResetColor)?;
        }
        Ok(())
    }
}

/// Maps a packed color to a crossterm color
fn rgb(color: u32) -> Color {
    let [r, g, b, _] = channels(color);
    Color::Rgb { r, g, b }
}

/// The ramp character for the luminance of `color`
pub fn ramp_char(color: u32) -> char {
    let i = (luminance(color) * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
    LUMINOSITY_RAMP[i.min(LUMINOSITY_RAMP.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use sr3d_core::color::{self, rgb as pack};

    #[test]
    fn test_ramp_ends() {
        assert_eq!(ramp_char(color::BLACK), ' ');
        assert_eq!(ramp_char(color::WHITE), '@');
        assert_eq!(ramp_char(pack(128, 128, 128)), '+');
    }

    #[test]
    fn test_target_size() {
        let half = TerminalRenderer::new(CellMode::HalfBlock);
        assert_eq!(half.target_size(80, 25), (80, 48));
        assert_eq!(half.target_size(0, 0), (1, 2));

        let ascii = TerminalRenderer::new(CellMode::Ascii);
        assert_eq!(ascii.target_size(80, 25), (80, 24));
    }

    #[test]
    fn test_draw_half_blocks() {
        let mut target = RenderTarget::new(3, 4);
        target.set_pixel(0, 0, pack(255, 0, 0));
        let mut out = Vec::new();
        TerminalRenderer::new(CellMode::HalfBlock)
            .draw(&target, &mut out)
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(HALF_BLOCK).count(), 6);
        // 24-bit foreground red for the first cell
        assert!(text.contains("38;2;255;0;0"));
    }

    #[test]
    fn test_draw_ascii() {
        let mut target = RenderTarget::new(2, 1);
        target.set_pixel(1, 0, color::WHITE);
        let mut out = Vec::new();
        TerminalRenderer::new(CellMode::Ascii)
            .draw(&target, &mut out)
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(" "));
        assert!(text.contains('@'));
    }
}
