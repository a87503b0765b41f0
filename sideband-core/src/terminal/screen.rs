//! Terminal character grid

/// Terminal width in character cells
pub const TERM_COLUMNS: usize = 40;

/// Terminal height in character cells
pub const TERM_ROWS: usize = 25;

/// Flat character grid backing the terminal
///
/// A cell value of zero means empty. The display draws empty cells as
/// blanks.
#[derive(Clone, PartialEq, Eq)]
pub struct Screen {
    cells: [u8; TERM_COLUMNS * TERM_ROWS],
}

impl Screen {
    pub const fn new() -> Self {
        Self {
            cells: [0; TERM_COLUMNS * TERM_ROWS],
        }
    }

    pub fn clear(&mut self) {
        self.cells = [0; TERM_COLUMNS * TERM_ROWS];
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.cells[y * TERM_COLUMNS + x]
    }

    pub fn set(&mut self, x: usize, y: usize, ch: u8) {
        self.cells[y * TERM_COLUMNS + x] = ch;
    }

    /// Shift every row up by one, blanking the bottom row
    pub fn scroll_up(&mut self) {
        self.cells.copy_within(TERM_COLUMNS.., 0);
        let last_row = (TERM_ROWS - 1) * TERM_COLUMNS;
        self.cells[last_row..].fill(0);
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_shifts_rows_and_blanks_bottom() {
        let mut screen = Screen::new();
        screen.set(3, 0, b'a');
        screen.set(7, 1, b'b');
        screen.set(0, TERM_ROWS - 1, b'z');

        screen.scroll_up();

        assert_eq!(screen.get(3, 0), 0);
        assert_eq!(screen.get(7, 0), b'b');
        assert_eq!(screen.get(0, TERM_ROWS - 2), b'z');
        for x in 0..TERM_COLUMNS {
            assert_eq!(screen.get(x, TERM_ROWS - 1), 0);
        }
    }
}
