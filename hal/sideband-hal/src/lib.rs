//! Sideband Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that can be implemented
//! by chip-specific HALs. The console core and firmware tasks talk to these
//! traits, so the same application code can move to a different MCU by
//! swapping the implementation crate.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (sideband-firmware)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  sideband-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  sideband-hal-rp2040                    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`flash::FlashStorage`] - Persistent storage for console settings

#![no_std]
#![deny(unsafe_code)]

pub mod flash;

// Re-export key traits at crate root for convenience
pub use flash::{FlashError, FlashStorage, StorageKey};
