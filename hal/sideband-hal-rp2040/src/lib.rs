//! RP2040-specific HAL for the Sideband cartridge firmware
//!
//! This crate provides RP2040-specific implementations of the shared
//! `sideband-hal` traits, plus RP2040-specific functionality:
//!
//! - PIO-based cartridge bus tap (address capture on ROM reads)
//! - Flash storage driver (implements `sideband_hal::FlashStorage`)

#![no_std]

pub mod bus_tap;
pub mod flash;
pub mod pio;

// Re-export shared traits from sideband-hal for convenience
pub use sideband_hal::{FlashStorage as FlashStorageTrait, StorageKey};
