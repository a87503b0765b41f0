//! Hardware abstraction traits
//!
//! These traits define the interface between the console logic and
//! hardware-specific implementations.

pub mod display;
pub mod handshake;
pub mod settings;

pub use display::TermDisplay;
pub use handshake::TokenHandshake;
pub use settings::{SettingEntry, SettingValue, SettingsError, SettingsStore};
