//! Bus-Sideband Command Protocol
//!
//! This crate defines the command protocol between the host computer and the
//! Sideband board. The host has no writable bus to the board; instead it
//! *reads* from a reserved window of the emulated ROM, and the address lines
//! of those reads carry the data. Every trapped access delivers one 16-bit
//! word to the firmware.
//!
//! # Protocol Overview
//!
//! A command is a sequence of trap words:
//! ```text
//! ┌────────┬────────────┬──────────────┬───────────────┬──────────┐
//! │ HEADER │ COMMAND ID │ PAYLOAD SIZE │ PAYLOAD WORDS │ CHECKSUM │
//! │ 0xABCD │ 1 word     │ 1 word       │ ⌈size/2⌉ words│ 1 word   │
//! └────────┴────────────┴──────────────┴───────────────┴──────────┘
//! ```
//!
//! The checksum is the wrapping 16-bit sum of every word after the header.
//! Payload bytes travel low byte first within each word; 32-bit payload
//! parameters (the random token included) travel high 16-bit half first,
//! because the host pushes big-endian bus words. The first 4 payload bytes
//! of every command carry the random handshake token.

#![no_std]
#![deny(unsafe_code)]

pub mod commands;
pub mod decoder;
pub mod record;

pub use commands::{ConsoleCommand, Keystroke, CMD_CONSOLE_KEYSTROKE, CMD_CONSOLE_START};
pub use decoder::{DecodeError, RecordSummary, TrapDecoder, PROTOCOL_HEADER};
pub use record::{CommandRecord, RecordError, MAX_PAYLOAD_SIZE, MAX_RECORD_WORDS};
