//! Terminal display trait

/// Trait for the display surface the terminal emulator draws on
///
/// Implementations own the pixel- or cell-level representation. The
/// emulator only issues character-cell operations; coordinates are
/// always within the grid dimensions it was configured with.
///
/// Drawing calls may buffer freely. Nothing is required to become
/// visible until [`refresh`](TermDisplay::refresh) is called.
pub trait TermDisplay {
    /// Draw `ch` at character cell (`x`, `y`)
    ///
    /// `ch` is a byte from the terminal character set. Drawing `b' '`
    /// over a cell erases whatever was there, including a cursor mark.
    fn put_char(&mut self, x: u8, y: u8, ch: u8);

    /// Draw the cursor mark at character cell (`x`, `y`)
    fn draw_cursor(&mut self, x: u8, y: u8);

    /// Shift the whole surface up one character row
    ///
    /// The bottom row is left blank.
    fn scroll_up(&mut self);

    /// Erase the whole surface
    fn clear(&mut self);

    /// Make buffered drawing visible
    fn refresh(&mut self);

    /// Prepare a terminal surface of `columns` x `rows` character cells
    ///
    /// Called once when the host requests the console. May allocate or
    /// reconfigure; the surface does not have to be shown yet.
    fn enter_terminal(&mut self, columns: u8, rows: u8);

    /// Switch the visible output to the terminal surface
    fn show_terminal(&mut self);

    /// Switch the visible output back to the host desktop
    fn show_desktop(&mut self);
}
