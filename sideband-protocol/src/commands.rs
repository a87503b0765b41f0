//! Command semantics on top of decoded records.
//!
//! Command ids, the packed keystroke word, and the 32-bit parameter
//! helpers. All 32-bit values on the wire (the random token included) are
//! carried as two 16-bit halves with the high half first; the host side of
//! the bus is big-endian word-oriented, so a flat little-endian `u32` read
//! of the payload would come out with its halves swapped. Host-contract
//! constant, do not change.

use crate::record::CommandRecord;

/// Open the terminal surface and hand the console the screen
pub const CMD_CONSOLE_START: u16 = 0x0001;
/// Deliver one keyboard event to the console
pub const CMD_CONSOLE_KEYSTROKE: u16 = 0x0002;

/// ASCII code mask in a keystroke word
pub const KEYSTROKE_ASCII_MASK: u32 = 0x0000_00FF;
/// Scan code field in a keystroke word
pub const KEYSTROKE_SCAN_MASK: u32 = 0x00FF_0000;
/// Scan code field shift
pub const KEYSTROKE_SCAN_SHIFT: u32 = 16;
/// Shift-key flag in a keystroke word
pub const KEYSTROKE_SHIFT_MASK: u32 = 0x0100_0000;
/// Shift-key flag shift
pub const KEYSTROKE_SHIFT_SHIFT: u32 = 24;

/// One keyboard event as packed by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Keystroke {
    /// ASCII code of the key
    pub ascii: u8,
    /// Shift key held
    pub shift: bool,
    /// Hardware scan code
    pub scan_code: u8,
}

impl Keystroke {
    /// Unpack a keystroke from its 32-bit payload word
    pub fn from_word(word: u32) -> Self {
        Self {
            ascii: (word & KEYSTROKE_ASCII_MASK) as u8,
            shift: (word & KEYSTROKE_SHIFT_MASK) >> KEYSTROKE_SHIFT_SHIFT != 0,
            scan_code: ((word & KEYSTROKE_SCAN_MASK) >> KEYSTROKE_SCAN_SHIFT) as u8,
        }
    }

    /// Pack this keystroke into its 32-bit payload word
    pub fn to_word(&self) -> u32 {
        (self.ascii as u32)
            | ((self.scan_code as u32) << KEYSTROKE_SCAN_SHIFT)
            | ((self.shift as u32) << KEYSTROKE_SHIFT_SHIFT)
    }
}

/// A command record interpreted by the console dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsoleCommand {
    /// Start (or restart) the terminal session
    Start,
    /// One keyboard event
    Keystroke(Keystroke),
    /// Id the dispatcher does not recognize; carried for logging
    Unknown(u16),
}

impl ConsoleCommand {
    /// Interpret a decoded record.
    ///
    /// The first payload parameter after the token carries the keystroke
    /// word; a short payload reads as zero, matching the zero-filled slots
    /// the channel hands out.
    pub fn from_record(record: &CommandRecord) -> Self {
        match record.command_id {
            CMD_CONSOLE_START => Self::Start,
            CMD_CONSOLE_KEYSTROKE => {
                let word = payload_param_u32(&record.payload, 1).unwrap_or(0);
                Self::Keystroke(Keystroke::from_word(word))
            }
            other => Self::Unknown(other),
        }
    }
}

/// Read the 32-bit parameter at `index` from a payload (index 0 is the
/// random token). Returns `None` when the payload is too short.
pub fn payload_param_u32(payload: &[u8], index: usize) -> Option<u32> {
    let offset = index.checked_mul(4)?;
    let bytes = payload.get(offset..offset + 4)?;
    let high = u16::from_le_bytes([bytes[0], bytes[1]]);
    let low = u16::from_le_bytes([bytes[2], bytes[3]]);
    Some(u32_from_halves([high, low]))
}

/// Read the random token from the first 4 payload bytes
pub fn random_token(payload: &[u8]) -> Option<u32> {
    payload_param_u32(payload, 0)
}

/// Split a 32-bit value into its wire halves, high half first
pub fn u32_halves(value: u32) -> [u16; 2] {
    [(value >> 16) as u16, (value & 0xFFFF) as u16]
}

/// Rebuild a 32-bit value from its wire halves
pub fn u32_from_halves(halves: [u16; 2]) -> u32 {
    ((halves[0] as u32) << 16) | halves[1] as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keystroke_roundtrip() {
        let stroke = Keystroke {
            ascii: b'a',
            shift: true,
            scan_code: 0x1E,
        };
        assert_eq!(Keystroke::from_word(stroke.to_word()), stroke);
    }

    #[test]
    fn test_keystroke_field_placement() {
        // ascii 'x', scan 0x2D, shift set
        let word = 0x012D_0078;
        let stroke = Keystroke::from_word(word);
        assert_eq!(stroke.ascii, b'x');
        assert_eq!(stroke.scan_code, 0x2D);
        assert!(stroke.shift);

        let unshifted = Keystroke::from_word(0x002D_0078);
        assert!(!unshifted.shift);
    }

    #[test]
    fn test_token_half_order() {
        // Token 0xDEADBEEF arrives as 0xDEAD then 0xBEEF
        let payload = [0xAD, 0xDE, 0xEF, 0xBE];
        assert_eq!(random_token(&payload), Some(0xDEAD_BEEF));
        assert_eq!(u32_halves(0xDEAD_BEEF), [0xDEAD, 0xBEEF]);
        assert_eq!(u32_from_halves([0xDEAD, 0xBEEF]), 0xDEAD_BEEF);
    }

    #[test]
    fn test_short_payload_has_no_token() {
        assert_eq!(random_token(&[1, 2, 3]), None);
        assert_eq!(payload_param_u32(&[0; 7], 1), None);
    }

    #[test]
    fn test_console_command_from_record() {
        let mut payload = [0u8; 8];
        // Token in the first parameter slot, keystroke word in the second
        let word = Keystroke {
            ascii: b'h',
            shift: false,
            scan_code: 0x23,
        }
        .to_word();
        payload[4..6].copy_from_slice(&((word >> 16) as u16).to_le_bytes());
        payload[6..8].copy_from_slice(&((word & 0xFFFF) as u16).to_le_bytes());

        let record = CommandRecord::new(CMD_CONSOLE_KEYSTROKE, &payload).unwrap();
        match ConsoleCommand::from_record(&record) {
            ConsoleCommand::Keystroke(stroke) => {
                assert_eq!(stroke.ascii, b'h');
                assert_eq!(stroke.scan_code, 0x23);
                assert!(!stroke.shift);
            }
            other => panic!("expected keystroke, got {other:?}"),
        }

        let start = CommandRecord::new(CMD_CONSOLE_START, &[0; 4]).unwrap();
        assert_eq!(ConsoleCommand::from_record(&start), ConsoleCommand::Start);

        let strange = CommandRecord::new(0x7777, &[]).unwrap();
        assert_eq!(
            ConsoleCommand::from_record(&strange),
            ConsoleCommand::Unknown(0x7777)
        );
    }
}
