//! Emulated ROM window and the host-visible console region
//!
//! Host reads are served out of a RAM image of the cartridge window.
//! The top pages of that image double as the console region the host
//! driver polls: handshake token slots, shared variables, and the
//! terminal text frame.
//!
//! All 32-bit values are stored as two 16-bit halves with the high
//! half first; the bus hardware swaps bytes per 16-bit lane, so each
//! half sits native-endian in RAM. This layout is the host contract,
//! do not rearrange.

use core::cell::UnsafeCell;

use portable_atomic::{AtomicBool, Ordering};

use sideband_protocol::commands::u32_halves;

/// Size of the emulated ROM window
pub const ROM_WINDOW_SIZE: usize = 64 * 1024;

/// Token of the last handled command, echoed back to the host
pub const ECHO_TOKEN_OFFSET: usize = 0xF000;
/// Token the host must fold into its next command
pub const SEED_TOKEN_OFFSET: usize = 0xF004;
/// Counter the host polls to learn the text frame changed
pub const FRAME_COUNTER_OFFSET: usize = 0xF008;
/// Shared variable slots, 32-bit each
pub const SHARED_VARS_OFFSET: usize = 0xF010;
/// Terminal text frame, row-major character cells
pub const TEXT_FRAME_OFFSET: usize = 0xF100;

/// Hardware type reported to the host driver
pub const VAR_HARDWARE_TYPE: usize = 0;
/// Hardware version reported to the host driver
pub const VAR_HARDWARE_VERSION: usize = 1;
/// Display command word: which surface the host should show
pub const VAR_DISPLAY_COMMAND: usize = 2;

/// Display command: show the terminal text frame
pub const DISPLAY_CMD_TERMINAL: u32 = 1;
/// Display command: give the screen back to the desktop
pub const DISPLAY_CMD_DESKTOP: u32 = 2;

/// Cells available to the text frame
const MAX_FRAME_CELLS: usize = ROM_WINDOW_SIZE - TEXT_FRAME_OFFSET;

#[repr(C, align(4))]
struct WindowStorage(UnsafeCell<[u8; ROM_WINDOW_SIZE]>);

// The two handles carve out disjoint offsets, and every access goes
// through volatile pointer writes; the other reader is the host bus.
unsafe impl Sync for WindowStorage {}

static WINDOW: WindowStorage = WindowStorage(UnsafeCell::new([0u8; ROM_WINDOW_SIZE]));

static WINDOW_TAKEN: AtomicBool = AtomicBool::new(false);

/// Claim the console region handles. Returns `None` after the first call.
pub fn take() -> Option<(TokenRegion, TextFrame)> {
    if WINDOW_TAKEN.swap(true, Ordering::AcqRel) {
        return None;
    }
    Some((
        TokenRegion { _priv: () },
        TextFrame {
            columns: 0,
            rows: 0,
            frame: 0,
        },
    ))
}

fn write_byte(offset: usize, value: u8) {
    let base = WINDOW.0.get() as *mut u8;
    unsafe { base.add(offset).write_volatile(value) }
}

fn read_byte(offset: usize) -> u8 {
    let base = WINDOW.0.get() as *const u8;
    unsafe { base.add(offset).read_volatile() }
}

fn write_u32(offset: usize, value: u32) {
    let halves = u32_halves(value);
    let base = WINDOW.0.get() as *mut u8;
    unsafe {
        let slot = base.add(offset) as *mut u16;
        slot.write_volatile(halves[0]);
        slot.add(1).write_volatile(halves[1]);
    }
}

/// Writer for the handshake tokens and hardware shared variables
pub struct TokenRegion {
    _priv: (),
}

impl TokenRegion {
    /// Zero the hardware type/version slots the host inspects at boot
    pub fn reset_hardware_info(&mut self) {
        write_u32(SHARED_VARS_OFFSET + VAR_HARDWARE_TYPE * 4, 0);
        write_u32(SHARED_VARS_OFFSET + VAR_HARDWARE_VERSION * 4, 0);
    }

    /// Publish the token of the command just handled
    pub fn write_echo_token(&mut self, token: u32) {
        write_u32(ECHO_TOKEN_OFFSET, token);
    }

    /// Publish the token required on the next command
    pub fn write_seed_token(&mut self, token: u32) {
        write_u32(SEED_TOKEN_OFFSET, token);
    }
}

/// Writer for the terminal text frame and the display command word
pub struct TextFrame {
    columns: u8,
    rows: u8,
    frame: u32,
}

impl TextFrame {
    /// Set the frame geometry and blank it
    ///
    /// Dimensions that do not fit the frame region are ignored.
    pub fn configure(&mut self, columns: u8, rows: u8) {
        if columns as usize * rows as usize > MAX_FRAME_CELLS {
            return;
        }
        self.columns = columns;
        self.rows = rows;
        self.clear();
    }

    /// Write one character cell. Out-of-range cells are ignored.
    pub fn set_cell(&mut self, x: u8, y: u8, ch: u8) {
        if x >= self.columns || y >= self.rows {
            return;
        }
        let offset = y as usize * self.columns as usize + x as usize;
        write_byte(TEXT_FRAME_OFFSET + offset, ch);
    }

    /// Move every row up by one and blank the bottom row
    pub fn scroll_up(&mut self) {
        let columns = self.columns as usize;
        for y in 1..self.rows as usize {
            for x in 0..columns {
                let ch = read_byte(TEXT_FRAME_OFFSET + y * columns + x);
                write_byte(TEXT_FRAME_OFFSET + (y - 1) * columns + x, ch);
            }
        }
        if self.rows > 0 {
            let last = (self.rows as usize - 1) * columns;
            for x in 0..columns {
                write_byte(TEXT_FRAME_OFFSET + last + x, b' ');
            }
        }
    }

    /// Blank the whole frame
    pub fn clear(&mut self) {
        for offset in 0..self.columns as usize * self.rows as usize {
            write_byte(TEXT_FRAME_OFFSET + offset, b' ');
        }
    }

    /// Bump the frame counter so the host repaints
    pub fn publish(&mut self) {
        self.frame = self.frame.wrapping_add(1);
        write_u32(FRAME_COUNTER_OFFSET, self.frame);
    }

    /// Write the display command word
    pub fn write_display_command(&mut self, command: u32) {
        write_u32(SHARED_VARS_OFFSET + VAR_DISPLAY_COMMAND * 4, command);
    }
}
