//! Terminal emulator core
//!
//! Escape handling follows the classic VT52 terminals, reduced to the
//! sequences the host-side console driver actually emits: relative
//! cursor motion, home, direct addressing, and clearing.
//!
//! Escape sequences must arrive whole within one [`Terminal::print_str`]
//! call. The recognizer carries no state across calls; a string that
//! ends mid-sequence renders the accumulated bytes literally.

use heapless::Vec;

use super::screen::{Screen, TERM_COLUMNS, TERM_ROWS};
use crate::traits::display::TermDisplay;

/// Escape lead-in byte
pub const ESC_CHAR: u8 = 0x1B;

/// Bias added to direct cursor address parameter bytes
/// Offset added to row/column bytes in ESC `Y` direct addressing
pub const DIRECT_ADDR_BIAS: i32 = 0x20;

const ESC_BUFFER_SIZE: usize = 8;

#[derive(Clone, Copy, PartialEq, Eq)]
enum PrintState {
    Normal,
    Escape,
}

/// Terminal emulator over a display surface
///
/// Owns the character grid and the cursor. All drawing goes through
/// the [`TermDisplay`] implementation; exactly one display refresh is
/// issued per `print_str` call.
pub struct Terminal<D: TermDisplay> {
    display: D,
    screen: Screen,
    cursor_x: u8,
    cursor_y: u8,
    prev_cursor_x: u8,
    prev_cursor_y: u8,
    clear_generation: u32,
}

impl<D: TermDisplay> Terminal<D> {
    pub fn new(display: D) -> Self {
        Self {
            display,
            screen: Screen::new(),
            cursor_x: 0,
            cursor_y: 0,
            prev_cursor_x: 0,
            prev_cursor_y: 0,
            clear_generation: 0,
        }
    }

    /// Current cursor position as (column, row)
    pub fn cursor(&self) -> (u8, u8) {
        (self.cursor_x, self.cursor_y)
    }

    /// Character grid contents
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Counter bumped every time the whole grid is cleared
    ///
    /// Callers that cache screen locations (like the status panel) use
    /// it to detect that their rows are gone.
    pub fn clear_generation(&self) -> u32 {
        self.clear_generation
    }

    /// Access the display, for surface switching
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Clear grid and display, home the cursor
    pub fn clear_screen(&mut self) {
        self.screen.clear();
        self.cursor_x = 0;
        self.cursor_y = 0;
        self.clear_generation = self.clear_generation.wrapping_add(1);
        self.display.clear();
    }

    /// Push buffered drawing to the display
    pub fn refresh(&mut self) {
        self.display.refresh();
    }

    /// Print a string, interpreting escape sequences
    pub fn print_str(&mut self, text: &str) {
        let mut state = PrintState::Normal;
        let mut esc: Vec<u8, ESC_BUFFER_SIZE> = Vec::new();

        for byte in text.bytes() {
            match state {
                PrintState::Normal => {
                    if byte == ESC_CHAR {
                        state = PrintState::Escape;
                        esc.clear();
                        let _ = esc.push(byte);
                    } else {
                        self.render_char(byte);
                    }
                }
                PrintState::Escape => {
                    let _ = esc.push(byte);
                    let complete = (esc.len() == 2 && esc[1] != b'Y')
                        || (esc.len() == 4 && esc[1] == b'Y');
                    if complete {
                        self.process_escape(&esc);
                        state = PrintState::Normal;
                    } else if esc.is_full() {
                        // Not a sequence we recognize, show it as-is
                        for &accumulated in esc.iter() {
                            self.render_char(accumulated);
                        }
                        state = PrintState::Normal;
                    }
                }
            }
        }

        if state == PrintState::Escape {
            for &accumulated in esc.iter() {
                self.render_char(accumulated);
            }
        }
        self.display.refresh();
    }

    /// Render one byte at the cursor and move the cursor mark
    ///
    /// Zero renders nothing but still redraws the cursor, which is how
    /// escape handlers reposition the mark after moving the cursor.
    pub(crate) fn render_char(&mut self, byte: u8) {
        self.display
            .put_char(self.prev_cursor_x, self.prev_cursor_y, b' ');
        if byte == b'\n' || byte == b'\r' {
            self.cursor_x = 0;
            self.advance_row();
        } else if byte != 0 {
            self.put_char(byte);
        }
        self.mark_cursor();
    }

    /// Step the cursor back one cell, wrapping to the previous row end
    ///
    /// Returns false if the cursor was already at the origin.
    pub(crate) fn retreat_cursor(&mut self) -> bool {
        if self.cursor_x == 0 {
            if self.cursor_y == 0 {
                return false;
            }
            self.cursor_y -= 1;
            self.cursor_x = TERM_COLUMNS as u8 - 1;
        } else {
            self.cursor_x -= 1;
        }
        true
    }

    /// Erase the cursor mark at its last drawn position
    pub(crate) fn erase_cursor_glyph(&mut self) {
        self.display
            .put_char(self.prev_cursor_x, self.prev_cursor_y, b' ');
    }

    /// Blank the grid cell under the cursor
    pub(crate) fn blank_cursor_cell(&mut self) {
        self.screen
            .set(self.cursor_x as usize, self.cursor_y as usize, 0);
        self.display.put_char(self.cursor_x, self.cursor_y, b' ');
    }

    /// Draw the cursor mark at the current position and remember it
    pub(crate) fn mark_cursor(&mut self) {
        self.display.draw_cursor(self.cursor_x, self.cursor_y);
        self.prev_cursor_x = self.cursor_x;
        self.prev_cursor_y = self.cursor_y;
    }

    fn put_char(&mut self, byte: u8) {
        self.screen
            .set(self.cursor_x as usize, self.cursor_y as usize, byte);
        self.display.put_char(self.cursor_x, self.cursor_y, byte);
        self.cursor_x += 1;
        if self.cursor_x as usize >= TERM_COLUMNS {
            self.cursor_x = 0;
            self.advance_row();
        }
    }

    fn advance_row(&mut self) {
        self.cursor_y += 1;
        if self.cursor_y as usize >= TERM_ROWS {
            self.scroll_up();
            self.cursor_y = TERM_ROWS as u8 - 1;
        }
    }

    fn scroll_up(&mut self) {
        self.screen.scroll_up();
        self.display.scroll_up();
    }

    fn process_escape(&mut self, seq: &[u8]) {
        if seq.len() < 2 {
            return;
        }
        match seq[1] {
            b'A' => {
                if self.cursor_y > 0 {
                    self.cursor_y -= 1;
                }
                self.render_char(0);
            }
            b'B' => {
                if (self.cursor_y as usize) < TERM_ROWS - 1 {
                    self.cursor_y += 1;
                }
                self.render_char(0);
            }
            b'C' => {
                if (self.cursor_x as usize) < TERM_COLUMNS - 1 {
                    self.cursor_x += 1;
                }
                self.render_char(0);
            }
            b'D' => {
                if self.cursor_x > 0 {
                    self.cursor_x -= 1;
                }
                self.render_char(0);
            }
            b'E' => {
                self.cursor_x = 0;
                self.cursor_y = 0;
                self.render_char(0);
                for y in 0..TERM_ROWS {
                    for x in 0..TERM_COLUMNS {
                        self.screen.set(x, y, 0);
                        self.display.put_char(x as u8, y as u8, b' ');
                    }
                }
                self.clear_generation = self.clear_generation.wrapping_add(1);
            }
            b'H' => {
                self.cursor_x = 0;
                self.cursor_y = 0;
                self.render_char(0);
            }
            b'J' => {
                // Every affected row clears from the cursor column, not
                // just the first; the host-side driver relies on this.
                for y in self.cursor_y as usize..TERM_ROWS {
                    for x in self.cursor_x as usize..TERM_COLUMNS {
                        self.screen.set(x, y, 0);
                        self.display.put_char(x as u8, y as u8, b' ');
                    }
                }
            }
            b'K' => {
                let y = self.cursor_y as usize;
                for x in self.cursor_x as usize..TERM_COLUMNS {
                    self.screen.set(x, y, 0);
                    self.display.put_char(x as u8, self.cursor_y, b' ');
                }
            }
            b'Y' => {
                if seq.len() == 4 {
                    let row = seq[2] as i32 - DIRECT_ADDR_BIAS;
                    let col = seq[3] as i32 - DIRECT_ADDR_BIAS;
                    if (0..TERM_ROWS as i32).contains(&row)
                        && (0..TERM_COLUMNS as i32).contains(&col)
                    {
                        self.cursor_y = row as u8;
                        self.cursor_x = col as u8;
                    }
                    self.render_char(0);
                }
            }
            _ => {}
        }
    }
}

/// Formatted output for command handlers
///
/// `write!` may split its output across several `write_str` calls at
/// argument boundaries, so escape sequences have to be composed into a
/// single fragment (or a buffer) before printing.
impl<D: TermDisplay> core::fmt::Write for Terminal<D> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.print_str(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingDisplay;
    use core::fmt::Write;
    use proptest::prelude::*;

    fn term() -> Terminal<RecordingDisplay> {
        Terminal::new(RecordingDisplay::default())
    }

    /// Fill rows 0..TERM_ROWS with '#' in columns 0..39 via direct
    /// addressing, leaving the last column empty so nothing wraps.
    fn fill_grid(term: &mut Terminal<RecordingDisplay>) {
        for y in 0..TERM_ROWS {
            let mut line: heapless::String<64> = heapless::String::new();
            let _ = line.push(ESC_CHAR as char);
            let _ = line.push('Y');
            let _ = line.push((0x20 + y as u8) as char);
            let _ = line.push(' ');
            for _ in 0..TERM_COLUMNS - 1 {
                let _ = line.push('#');
            }
            term.print_str(&line);
        }
    }

    #[test]
    fn plain_text_fills_grid_and_advances_cursor() {
        let mut term = term();
        term.print_str("AB");
        assert_eq!(term.screen().get(0, 0), b'A');
        assert_eq!(term.screen().get(1, 0), b'B');
        assert_eq!(term.cursor(), (2, 0));
    }

    #[test]
    fn newline_moves_to_start_of_next_row() {
        let mut term = term();
        term.print_str("AB\nC");
        assert_eq!(term.screen().get(0, 1), b'C');
        assert_eq!(term.cursor(), (1, 1));
    }

    #[test]
    fn carriage_return_acts_like_newline() {
        let mut term = term();
        term.print_str("A\rB");
        assert_eq!(term.screen().get(0, 1), b'B');
        assert_eq!(term.cursor(), (1, 1));
    }

    #[test]
    fn long_line_wraps_at_last_column() {
        let mut term = term();
        for _ in 0..TERM_COLUMNS {
            term.print_str("x");
        }
        assert_eq!(term.cursor(), (0, 1));
        assert_eq!(term.screen().get(TERM_COLUMNS - 1, 0), b'x');
    }

    #[test]
    fn newline_on_last_row_scrolls() {
        let mut term = term();
        for _ in 0..TERM_ROWS {
            term.print_str("x\n");
        }
        assert_eq!(term.cursor(), (0, TERM_ROWS as u8 - 1));
        assert_eq!(term.display_mut().scrolls, 1);
        assert_eq!(term.screen().get(0, TERM_ROWS - 2), b'x');
        for x in 0..TERM_COLUMNS {
            assert_eq!(term.screen().get(x, TERM_ROWS - 1), 0);
        }
    }

    #[test]
    fn direct_addressing_moves_cursor() {
        let mut term = term();
        // Row 2, column 5: parameter bytes 0x22 and 0x25
        term.print_str("\x1bY\x22\x25");
        assert_eq!(term.cursor(), (5, 2));
    }

    #[test]
    fn direct_addressing_out_of_range_is_consumed_but_ignored() {
        let mut term = term();
        term.print_str("\x1bY\x22\x25");
        // Row 95 is far outside the grid; column byte below the bias
        // gives a negative column
        term.print_str("\x1bY\x7f\x25");
        term.print_str("\x1bY\x22\x1f");
        assert_eq!(term.cursor(), (5, 2));
        // The parameter bytes were not rendered as text
        assert_eq!(term.screen().get(5, 2), 0);
    }

    #[test]
    fn relative_motion_clamps_at_edges() {
        let mut term = term();
        term.print_str("\x1bA\x1bD");
        assert_eq!(term.cursor(), (0, 0));

        term.print_str("\x1bY\x38\x47"); // bottom-right corner
        assert_eq!(term.cursor(), (TERM_COLUMNS as u8 - 1, TERM_ROWS as u8 - 1));
        term.print_str("\x1bB\x1bC");
        assert_eq!(term.cursor(), (TERM_COLUMNS as u8 - 1, TERM_ROWS as u8 - 1));

        term.print_str("\x1bA\x1bD");
        assert_eq!(term.cursor(), (TERM_COLUMNS as u8 - 2, TERM_ROWS as u8 - 2));
    }

    #[test]
    fn home_moves_without_clearing() {
        let mut term = term();
        term.print_str("hello");
        term.print_str("\x1bH");
        assert_eq!(term.cursor(), (0, 0));
        assert_eq!(term.screen().get(0, 0), b'h');
    }

    #[test]
    fn clear_sequence_blanks_grid_and_homes() {
        let mut term = term();
        let before = term.clear_generation();
        term.print_str("hello\x1bY\x22\x25");
        term.print_str("\x1bE");
        assert_eq!(term.cursor(), (0, 0));
        for x in 0..TERM_COLUMNS {
            assert_eq!(term.screen().get(x, 0), 0);
        }
        assert_eq!(term.clear_generation(), before + 1);
    }

    #[test]
    fn clear_screen_homes_and_bumps_generation() {
        let mut term = term();
        term.print_str("hello");
        let before = term.clear_generation();
        term.clear_screen();
        assert_eq!(term.cursor(), (0, 0));
        assert_eq!(term.screen().get(0, 0), 0);
        assert_eq!(term.clear_generation(), before + 1);
        assert_eq!(term.display_mut().clears, 1);
    }

    #[test]
    fn clear_below_starts_at_cursor_column_in_every_row() {
        let mut term = term();
        fill_grid(&mut term);
        term.print_str("\x1bY\x21\x25"); // row 1, column 5
        term.print_str("\x1bJ");

        // Row 0 untouched
        assert_eq!(term.screen().get(20, 0), b'#');
        // Row 1 keeps columns left of the cursor
        assert_eq!(term.screen().get(4, 1), b'#');
        assert_eq!(term.screen().get(5, 1), 0);
        assert_eq!(term.screen().get(38, 1), 0);
        // Rows below also keep the left columns
        assert_eq!(term.screen().get(4, 2), b'#');
        assert_eq!(term.screen().get(5, 2), 0);
        assert_eq!(term.screen().get(4, TERM_ROWS - 1), b'#');
        // Cursor does not move
        assert_eq!(term.cursor(), (5, 1));
    }

    #[test]
    fn clear_to_end_of_line_leaves_other_rows() {
        let mut term = term();
        fill_grid(&mut term);
        term.print_str("\x1bY\x22\x25"); // row 2, column 5
        term.print_str("\x1bK");

        assert_eq!(term.screen().get(4, 2), b'#');
        assert_eq!(term.screen().get(5, 2), 0);
        assert_eq!(term.screen().get(38, 2), 0);
        assert_eq!(term.screen().get(5, 1), b'#');
        assert_eq!(term.screen().get(5, 3), b'#');
        assert_eq!(term.cursor(), (5, 2));
    }

    #[test]
    fn unknown_escape_is_ignored() {
        let mut term = term();
        term.print_str("\x1bQ");
        assert_eq!(term.cursor(), (0, 0));
        assert_eq!(term.screen().get(0, 0), 0);
    }

    #[test]
    fn truncated_sequence_renders_literally() {
        let mut term = term();
        term.print_str("\x1bY\x22");
        assert_eq!(term.screen().get(0, 0), ESC_CHAR);
        assert_eq!(term.screen().get(1, 0), b'Y');
        assert_eq!(term.screen().get(2, 0), 0x22);
        assert_eq!(term.cursor(), (3, 0));
    }

    #[test]
    fn lone_escape_at_end_renders_literally() {
        let mut term = term();
        term.print_str("AB\x1b");
        assert_eq!(term.screen().get(2, 0), ESC_CHAR);
        assert_eq!(term.cursor(), (3, 0));
    }

    #[test]
    fn exactly_one_refresh_per_print() {
        let mut term = term();
        term.print_str("abc\x1bH\x1bY\x22\x25def\n");
        assert_eq!(term.display_mut().refreshes, 1);
        term.print_str("");
        assert_eq!(term.display_mut().refreshes, 2);
    }

    #[test]
    fn formatted_output_goes_through_print() {
        let mut term = term();
        let _ = write!(term, "n={}", 42);
        assert_eq!(term.screen().get(0, 0), b'n');
        assert_eq!(term.screen().get(2, 0), b'4');
        assert_eq!(term.screen().get(3, 0), b'2');
    }

    #[test]
    fn split_render_matches_whole_render() {
        let text = "Hi\x1bY\x22\x25there\n\x1bKdone";
        // Split points that do not bisect an escape sequence
        for split in [0, 1, 2, 6, 11, 12, 14, text.len()] {
            let mut whole = term();
            whole.print_str(text);

            let mut halves = term();
            halves.print_str(&text[..split]);
            halves.print_str(&text[split..]);

            assert!(whole.screen() == halves.screen(), "split at {}", split);
            assert_eq!(whole.cursor(), halves.cursor(), "split at {}", split);
        }
    }

    proptest! {
        /// The cursor stays inside the grid no matter what mix of
        /// text, newlines, and motion sequences is printed.
        #[test]
        fn cursor_stays_in_bounds(script in proptest::collection::vec(0..8usize, 0..200)) {
            let mut term = Terminal::new(RecordingDisplay::default());
            let mut text: heapless::String<2048> = heapless::String::new();
            for op in script {
                let fragment = match op {
                    0 => "a",
                    1 => "\n",
                    2 => "\x1bA",
                    3 => "\x1bB",
                    4 => "\x1bC",
                    5 => "\x1bD",
                    6 => "\x1bH",
                    _ => "\x1bY\x25\x30",
                };
                let _ = text.push_str(fragment);
            }
            term.print_str(&text);
            let (x, y) = term.cursor();
            prop_assert!((x as usize) < TERM_COLUMNS);
            prop_assert!((y as usize) < TERM_ROWS);
        }
    }
}
