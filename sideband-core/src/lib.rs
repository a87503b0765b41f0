//! Board-agnostic console logic for the Sideband cartridge firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (display, settings store, host handshake)
//! - Latest-wins command mailbox between the bus trap ISR and the main loop
//! - Terminal emulator (fixed character grid plus escape sequences)
//! - Line editor and ordered command registry
//! - Console session glue (command dispatch, token handshake)
//! - Settings command handlers
//! - Status readout with live row refresh
//! - SELECT button debounce and press classification

#![no_std]
#![deny(unsafe_code)]

pub mod button;
pub mod commands;
pub mod editor;
pub mod mailbox;
pub mod rng;
pub mod session;
pub mod status;
pub mod terminal;
pub mod traits;

#[cfg(test)]
pub(crate) mod test_support;
