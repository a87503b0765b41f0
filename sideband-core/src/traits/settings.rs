//! Persistent settings store trait

use core::fmt;

use heapless::String;

/// Maximum length of a settings key, in bytes
pub const MAX_KEY_LEN: usize = 32;

/// Maximum length of a string setting value, in bytes
pub const MAX_VALUE_LEN: usize = 64;

/// Errors that can occur when manipulating the settings store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Key exceeds [`MAX_KEY_LEN`]
    KeyTooLong,
    /// String value exceeds [`MAX_VALUE_LEN`]
    ValueTooLong,
    /// No slot left for a new entry
    StoreFull,
    /// Backing storage failed
    Storage,
}

/// A typed setting value
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SettingValue {
    Int(i32),
    Bool(bool),
    Str(String<MAX_VALUE_LEN>),
}

impl SettingValue {
    /// Type tag used when printing entries
    pub fn type_name(&self) -> &'static str {
        match self {
            SettingValue::Int(_) => "INT",
            SettingValue::Bool(_) => "BOOL",
            SettingValue::Str(_) => "STRING",
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Int(value) => write!(f, "{}", value),
            SettingValue::Bool(value) => write!(f, "{}", value),
            SettingValue::Str(value) => f.write_str(value),
        }
    }
}

/// One key/value pair in the store
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SettingEntry {
    pub key: String<MAX_KEY_LEN>,
    pub value: SettingValue,
}

/// Trait for the persistent key/value settings store
///
/// Mutations touch only the RAM image; nothing hits backing storage
/// until [`save`](SettingsStore::save). A `put_*` with an existing key
/// replaces the old value, whatever its previous type.
pub trait SettingsStore {
    /// Look up an entry by exact key
    fn get(&self, key: &str) -> Option<SettingEntry>;

    /// Insert or replace an integer setting
    fn put_int(&mut self, key: &str, value: i32) -> Result<(), SettingsError>;

    /// Insert or replace a boolean setting
    fn put_bool(&mut self, key: &str, value: bool) -> Result<(), SettingsError>;

    /// Insert or replace a string setting
    fn put_str(&mut self, key: &str, value: &str) -> Result<(), SettingsError>;

    /// Commit the RAM image to backing storage
    fn save(&mut self) -> Result<(), SettingsError>;

    /// Drop every entry and erase backing storage
    fn erase(&mut self) -> Result<(), SettingsError>;

    /// Visit every entry in storage order
    fn for_each(&self, visit: &mut dyn FnMut(&SettingEntry));
}
