//! Terminal surface over the shared text frame
//!
//! The host renders the terminal: it polls the frame counter, reads the
//! character cells out of the console region, and paints them with its
//! own font. This side only mutates cells and publishes frames. The
//! cursor is an ordinary glyph drawn into its cell, so writing a space
//! over that cell erases it.

use sideband_core::terminal::{TERM_COLUMNS, TERM_ROWS};
use sideband_core::traits::TermDisplay;

use crate::shared_mem::{TextFrame, DISPLAY_CMD_DESKTOP, DISPLAY_CMD_TERMINAL};

/// Block glyph the host font shows at the cursor cell
const CURSOR_GLYPH: u8 = 0x7F;

/// Terminal display backed by the host-visible text frame
pub struct FbDisplay {
    frame: TextFrame,
}

impl FbDisplay {
    pub fn new(mut frame: TextFrame) -> Self {
        frame.configure(TERM_COLUMNS as u8, TERM_ROWS as u8);
        Self { frame }
    }
}

impl TermDisplay for FbDisplay {
    fn put_char(&mut self, x: u8, y: u8, ch: u8) {
        self.frame.set_cell(x, y, ch);
    }

    fn draw_cursor(&mut self, x: u8, y: u8) {
        self.frame.set_cell(x, y, CURSOR_GLYPH);
    }

    fn scroll_up(&mut self) {
        self.frame.scroll_up();
    }

    fn clear(&mut self) {
        self.frame.clear();
    }

    fn refresh(&mut self) {
        self.frame.publish();
    }

    fn enter_terminal(&mut self, columns: u8, rows: u8) {
        self.frame.configure(columns, rows);
    }

    fn show_terminal(&mut self) {
        self.frame.write_display_command(DISPLAY_CMD_TERMINAL);
    }

    fn show_desktop(&mut self) {
        self.frame.write_display_command(DISPLAY_CMD_DESKTOP);
    }
}
