//! Terminal emulator
//!
//! A fixed character grid with a cursor, driven by plain bytes plus a
//! small escape-sequence subset for cursor motion and clearing.

pub mod emulator;
pub mod screen;

pub use emulator::{Terminal, DIRECT_ADDR_BIAS, ESC_CHAR};
pub use screen::{Screen, TERM_COLUMNS, TERM_ROWS};
