//! Line editor and command registry
//!
//! Collects keystrokes into a line buffer, echoing them through the
//! terminal, and dispatches completed lines against an ordered command
//! registry.

use heapless::String;

use crate::terminal::Terminal;
use crate::traits::display::TermDisplay;

/// Line buffer capacity, including the slot the editor keeps free
pub const LINE_CAPACITY: usize = 64;

/// Handler invoked for a matching command line
///
/// Receives the argument remainder of the line, or the whole raw line
/// when invoked as a fallback.
pub type CommandHandler<D, S> = fn(&mut Terminal<D>, &mut S, &str);

/// One entry in the ordered command registry
///
/// Entries are scanned in order and every name match is invoked, so
/// duplicate names stack. An empty name makes the entry a fallback: it
/// matches an empty input line directly, and it receives the whole raw
/// line when no other entry matched.
pub struct CommandEntry<D: TermDisplay, S> {
    pub name: &'static str,
    pub handler: CommandHandler<D, S>,
}

/// Keystroke-driven line editor
///
/// The editor owns only the text buffer. Cursor movement and echo go
/// through the terminal, so the visible line always tracks the buffer.
pub struct LineEditor {
    buffer: String<LINE_CAPACITY>,
}

impl LineEditor {
    pub const fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Feed one keystroke
    ///
    /// Printable bytes append to the buffer and echo at the cursor.
    /// Backspace erases; newline or carriage return submits the line
    /// to the registry and prints a fresh prompt.
    pub fn input_char<D: TermDisplay, S>(
        &mut self,
        ch: u8,
        term: &mut Terminal<D>,
        services: &mut S,
        registry: &[CommandEntry<D, S>],
    ) {
        if ch == 0x08 {
            term.erase_cursor_glyph();
            if !self.buffer.is_empty() {
                self.buffer.pop();
                if !term.retreat_cursor() {
                    // Already at the origin; the mark stays erased
                    return;
                }
                term.blank_cursor_cell();
            }
            term.mark_cursor();
            term.refresh();
        } else if ch == b'\n' || ch == b'\r' {
            term.render_char(b'\n');
            let line = self.buffer.as_str();
            let (token, arg) = split_line(line);
            let mut matched = false;
            for entry in registry {
                if entry.name == token {
                    (entry.handler)(term, services, arg);
                    matched = true;
                }
            }
            if !matched && !token.is_empty() {
                for entry in registry {
                    if entry.name.is_empty() {
                        (entry.handler)(term, services, line);
                    }
                }
            }
            self.buffer.clear();
            term.print_str("> ");
        } else if self.buffer.len() + (ch as char).len_utf8() <= LINE_CAPACITY - 1 {
            if self.buffer.push(ch as char).is_ok() {
                term.render_char(ch);
                term.refresh();
            }
        }
        // A full buffer drops further input on the floor. High-bit
        // bytes store as two UTF-8 bytes, so the bound is on encoded
        // width, never on keystroke count.
    }
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a line into its command token and argument remainder
///
/// Leading whitespace is skipped, the token runs to the next
/// whitespace, and the argument is everything after the separator run,
/// trailing whitespace included.
fn split_line(line: &str) -> (&str, &str) {
    let trimmed = line.trim_start();
    match trimmed.find(|c: char| c.is_whitespace()) {
        Some(idx) => {
            let (token, rest) = trimmed.split_at(idx);
            (token, rest.trim_start())
        }
        None => (trimmed, ""),
    }
}
