//! PIO-based cartridge bus tap
//!
//! Uses RP2040's Programmable I/O to watch the cartridge address bus.
//! Every ROM read latches the 16 address lines plus the command-window
//! select into the RX FIFO, without any CPU involvement. The CPU only
//! wakes when a capture is waiting, checks the window-select bit and
//! feeds the address word to the protocol decoder.
//!
//! # Pin mapping
//!
//! The tap samples 18 consecutive GPIOs starting at GPIO0:
//!
//! - GPIO0-15 - address lines A0-A15 (through the bus transceivers)
//! - GPIO16 - command-window select (active high after the decode logic)
//! - GPIO17 - read strobe (active low, follows the host's /RD)
//!
//! A15 arrives inverted from the level shifters, so the captured word
//! needs its high bit flipped before it means anything.

/// Number of address lines sampled per capture
pub const ADDRESS_PIN_COUNT: u8 = 16;

/// In-pin offset of the command-window select line
pub const WINDOW_SELECT_PIN: u8 = 16;

/// In-pin offset of the read strobe line
pub const READ_STROBE_PIN: u8 = 17;

/// Bits shifted into the ISR per capture (address lines + window select)
pub const CAPTURE_BITS: u8 = 17;

/// Window-select bit in a captured FIFO word
pub const WINDOW_SELECT_MASK: u32 = 0x0001_0000;

/// A15 is wired through an inverting transceiver stage
pub const ADDRESS_HIGH_BIT: u16 = 0x8000;

/// PIO program for the bus tap
///
/// Three instructions: block until the read strobe asserts, shift the
/// address lines and window select into the ISR (autopush at 17 bits),
/// then block until the strobe releases so one read gives one capture.
#[rustfmt::skip]
pub const BUS_TAP_PROGRAM: &[u16] = &[
    // .wrap_target
    0x2031, // wait 0 pin, 17   ; read strobe asserts (active low)
    0x4011, // in pins, 17      ; capture A0-A15 plus the window select
    0x20B1, // wait 1 pin, 17   ; hold until the strobe releases
    // .wrap
];

/// Extract the trap word from a captured FIFO entry
///
/// Returns `None` for reads outside the command window. For command-window
/// reads, returns the 16-bit address with the inverted high bit restored.
/// Most bus traffic is ordinary ROM fetches, so `None` is the common case.
pub fn trap_word(capture: u32) -> Option<u16> {
    if capture & WINDOW_SELECT_MASK == 0 {
        return None;
    }
    Some((capture as u16) ^ ADDRESS_HIGH_BIT)
}
