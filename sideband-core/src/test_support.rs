//! Shared test doubles

use heapless::{String, Vec};

use crate::traits::display::TermDisplay;
use crate::traits::handshake::TokenHandshake;
use crate::traits::settings::{
    SettingEntry, SettingValue, SettingsError, SettingsStore, MAX_KEY_LEN, MAX_VALUE_LEN,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShownSurface {
    Terminal,
    Desktop,
}

/// Display that records calls instead of drawing
#[derive(Default)]
pub(crate) struct RecordingDisplay {
    pub refreshes: usize,
    pub scrolls: usize,
    pub clears: usize,
    pub cursor_draws: usize,
    pub terminal_size: Option<(u8, u8)>,
    pub shown: Option<ShownSurface>,
}

impl TermDisplay for RecordingDisplay {
    fn put_char(&mut self, _x: u8, _y: u8, _ch: u8) {}

    fn draw_cursor(&mut self, _x: u8, _y: u8) {
        self.cursor_draws += 1;
    }

    fn scroll_up(&mut self) {
        self.scrolls += 1;
    }

    fn clear(&mut self) {
        self.clears += 1;
    }

    fn refresh(&mut self) {
        self.refreshes += 1;
    }

    fn enter_terminal(&mut self, columns: u8, rows: u8) {
        self.terminal_size = Some((columns, rows));
    }

    fn show_terminal(&mut self) {
        self.shown = Some(ShownSurface::Terminal);
    }

    fn show_desktop(&mut self) {
        self.shown = Some(ShownSurface::Desktop);
    }
}

/// Handshake sink plus a handler-invocation log
#[derive(Default)]
pub(crate) struct TestServices {
    pub echoes: Vec<u32, 16>,
    pub seeds: Vec<u32, 16>,
    pub calls: Vec<(&'static str, String<64>), 8>,
}

impl TestServices {
    pub fn record_call(&mut self, name: &'static str, arg: &str) {
        let mut owned: String<64> = String::new();
        let _ = owned.push_str(arg);
        let _ = self.calls.push((name, owned));
    }
}

impl TokenHandshake for TestServices {
    fn write_echo(&mut self, token: u32) {
        let _ = self.echoes.push(token);
    }

    fn write_seed(&mut self, token: u32) {
        let _ = self.seeds.push(token);
    }
}

/// In-memory settings store
#[derive(Default)]
pub(crate) struct MemorySettings {
    pub entries: Vec<SettingEntry, 16>,
    pub saves: usize,
    pub erases: usize,
    pub fail_save: bool,
}

impl MemorySettings {
    fn put(&mut self, key: &str, value: SettingValue) -> Result<(), SettingsError> {
        let key: String<MAX_KEY_LEN> =
            String::try_from(key).map_err(|_| SettingsError::KeyTooLong)?;
        if let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) {
            entry.value = value;
            return Ok(());
        }
        self.entries
            .push(SettingEntry { key, value })
            .map_err(|_| SettingsError::StoreFull)
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<SettingEntry> {
        self.entries.iter().find(|e| e.key.as_str() == key).cloned()
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
        if self.fail_save {
            return Err(SettingsError::Storage);
        }
        self.saves += 1;
        Ok(())
    }

    fn erase(&mut self) -> Result<(), SettingsError> {
        self.entries.clear();
        self.erases += 1;
        Ok(())
    }

    fn for_each(&self, visit: &mut dyn FnMut(&SettingEntry)) {
        for entry in &self.entries {
            visit(entry);
        }
    }
}
