//! Flash-backed settings store
//!
//! A RAM table serves the console's lookups and puts; `save` serializes
//! the whole table with postcard and commits the blob under a single
//! storage key, `erase` wipes the settings partition. The table is
//! loaded once at boot.

use defmt::*;
use embassy_futures::block_on;
use heapless::{String, Vec};

use sideband_core::traits::settings::{
    SettingEntry, SettingValue, SettingsError, SettingsStore, MAX_KEY_LEN, MAX_VALUE_LEN,
};
use sideband_hal_rp2040::flash::{FlashError, FlashStorage, StorageKey, MAX_VALUE_SIZE};
use sideband_hal_rp2040::FlashStorageTrait;

/// Maximum number of stored settings
pub const MAX_SETTINGS: usize = 16;

/// Version tag of the serialized table format
const SETTINGS_VERSION: u32 = 1;

/// Serialized settings table
#[derive(serde::Serialize, serde::Deserialize)]
struct SettingsTable {
    version: u32,
    entries: Vec<SettingEntry, MAX_SETTINGS>,
}

/// Settings store over the flash config partition
pub struct FlashSettings {
    cache: Vec<SettingEntry, MAX_SETTINGS>,
    storage: FlashStorage<'static>,
}

impl FlashSettings {
    /// Load the stored table, or start empty when there is none
    pub async fn load(storage: FlashStorage<'static>) -> Self {
        let mut settings = Self {
            cache: Vec::new(),
            storage,
        };
        match settings.read_table().await {
            Ok(count) => info!("Loaded {} settings from flash", count),
            Err(FlashError::NotFound) => info!("No settings in flash, starting empty"),
            Err(e) => warn!("Failed to load settings: {}, starting empty", e),
        }
        settings
    }

    async fn read_table(&mut self) -> Result<usize, FlashError> {
        let mut buffer = [0u8; MAX_VALUE_SIZE];
        let len = self.storage.read(StorageKey::Settings, &mut buffer).await?;
        let table: SettingsTable =
            postcard::from_bytes(&buffer[..len]).map_err(|_| FlashError::Corrupted)?;
        if table.version != SETTINGS_VERSION {
            warn!(
                "Settings version mismatch: found {}, expected {}",
                table.version, SETTINGS_VERSION
            );
            return Err(FlashError::Corrupted);
        }
        let count = table.entries.len();
        self.cache = table.entries;
        Ok(count)
    }

    fn put(&mut self, key: &str, value: SettingValue) -> Result<(), SettingsError> {
        let key: String<MAX_KEY_LEN> =
            String::try_from(key).map_err(|_| SettingsError::KeyTooLong)?;
        if let Some(entry) = self.cache.iter_mut().find(|e| e.key == key) {
            entry.value = value;
            return Ok(());
        }
        self.cache
            .push(SettingEntry { key, value })
            .map_err(|_| SettingsError::StoreFull)
    }
}

fn storage_error(e: FlashError) -> SettingsError {
    warn!("Flash operation failed: {}", e);
    SettingsError::Storage
}

impl SettingsStore for FlashSettings {
    fn get(&self, key: &str) -> Option<SettingEntry> {
        self.cache.iter().find(|e| e.key == key).cloned()
    }

    fn put_int(&mut self, key: &str, value: i32) -> Result<(), SettingsError> {
        self.put(key, SettingValue::Int(value))
    }

    fn put_bool(&mut self, key: &str, value: bool) -> Result<(), SettingsError> {
        self.put(key, SettingValue::Bool(value))
    }

    fn put_str(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let value: String<MAX_VALUE_LEN> =
            String::try_from(value).map_err(|_| SettingsError::ValueTooLong)?;
        self.put(key, SettingValue::Str(value))
    }

    fn save(&mut self) -> Result<(), SettingsError> {
        let table = SettingsTable {
            version: SETTINGS_VERSION,
            entries: self.cache.clone(),
        };
        let mut buffer = [0u8; MAX_VALUE_SIZE];
        let blob = postcard::to_slice(&table, &mut buffer).map_err(|_| SettingsError::Storage)?;
        // Flash writes stall XIP for both cores; nothing else runs
        // while this commits.
        block_on(self.storage.write(StorageKey::Settings, blob)).map_err(storage_error)
    }

    fn erase(&mut self) -> Result<(), SettingsError> {
        block_on(self.storage.erase_all()).map_err(storage_error)?;
        self.cache.clear();
        Ok(())
    }

    fn for_each(&self, visit: &mut dyn FnMut(&SettingEntry)) {
        for entry in &self.cache {
            visit(entry);
        }
    }
}
