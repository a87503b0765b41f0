//! Console command registry and board services
//!
//! `Services` is the state the command handlers reach through the
//! registry: the handshake token writer, the flash settings store, the
//! status panel, and the board identity. Stock handlers come from
//! sideband-core; `help` and `status` are board-level and live here.

use core::fmt::Write;

use portable_atomic::Ordering;

use sideband_core::commands::{
    cmd_clear, cmd_erase, cmd_exit, cmd_get, cmd_print, cmd_put_bool, cmd_put_int, cmd_put_str,
    cmd_save, cmd_settings, cmd_unknown,
};
use sideband_core::editor::CommandEntry;
use sideband_core::status::{StatusPanel, StatusSnapshot};
use sideband_core::terminal::Terminal;
use sideband_core::traits::settings::{SettingEntry, SettingsError, SettingsStore};
use sideband_core::traits::TokenHandshake;

use crate::channels::SELECT_STATE;
use crate::display::FbDisplay;
use crate::settings::FlashSettings;
use crate::shared_mem::TokenRegion;

/// MCU architecture shown by the status readout
pub const MCU_TYPE: &str = "RP2040";

/// Board identity: the 8-byte flash unique id as uppercase hex
pub type McuId = heapless::String<16>;

/// Format the flash unique id for the status readout
pub fn format_mcu_id(uid: &[u8; 8]) -> McuId {
    let mut id = McuId::new();
    for byte in uid {
        let _ = write!(id, "{:02X}", byte);
    }
    id
}

/// Shared state the command handlers operate on
pub struct Services {
    pub tokens: TokenRegion,
    pub settings: FlashSettings,
    pub panel: StatusPanel,
    pub mcu_id: McuId,
}

impl Services {
    pub fn new(tokens: TokenRegion, settings: FlashSettings, mcu_id: McuId) -> Self {
        Self {
            tokens,
            settings,
            panel: StatusPanel::new(),
            mcu_id,
        }
    }
}

impl TokenHandshake for Services {
    fn write_echo(&mut self, token: u32) {
        self.tokens.write_echo_token(token);
    }

    fn write_seed(&mut self, token: u32) {
        self.tokens.write_seed_token(token);
    }
}

// Delegation so the stock settings handlers reach the flash store.
impl SettingsStore for Services {
    fn get(&self, key: &str) -> Option<SettingEntry> {
        self.settings.get(key)
    }

    fn put_int(&mut self, key: &str, value: i32) -> Result<(), SettingsError> {
        self.settings.put_int(key, value)
    }

    fn put_bool(&mut self, key: &str, value: bool) -> Result<(), SettingsError> {
        self.settings.put_bool(key, value)
    }

    fn put_str(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.settings.put_str(key, value)
    }

    fn save(&mut self) -> Result<(), SettingsError> {
        self.settings.save()
    }

    fn erase(&mut self) -> Result<(), SettingsError> {
        self.settings.erase()
    }

    fn for_each(&self, visit: &mut dyn FnMut(&SettingEntry)) {
        self.settings.for_each(visit)
    }
}

/// Build a snapshot of the live state the status readout shows
pub fn live_snapshot(mcu_id: &str) -> StatusSnapshot<'_> {
    StatusSnapshot {
        mcu_arch: Some(MCU_TYPE),
        mcu_id: if mcu_id.is_empty() { None } else { Some(mcu_id) },
        select_pressed: SELECT_STATE.load(Ordering::Relaxed),
    }
}

/// Top-level command list
fn cmd_help(term: &mut Terminal<FbDisplay>, _services: &mut Services, _arg: &str) {
    term.print_str("\u{1b}EAvailable commands:\n");
    term.print_str("  clear   - Clear the screen\n");
    term.print_str("  exit    - Exit the terminal\n");
    term.print_str("  help    - Show this help\n");
    term.print_str("  settings- Show settings commands\n");
    term.print_str("  status  - Show device status\n");
    term.print_str("\n");
}

/// Full status readout with live rows
fn cmd_status(term: &mut Terminal<FbDisplay>, services: &mut Services, _arg: &str) {
    term.print_str("\u{1b}E");
    let snapshot = live_snapshot(services.mcu_id.as_str());
    services.panel.render(term, &services.settings, &snapshot);
}

/// Ordered command registry. First match wins; the empty-named entry
/// at the end is the fallback for everything else.
pub static REGISTRY: [CommandEntry<FbDisplay, Services>; 13] = [
    CommandEntry {
        name: "clear",
        handler: cmd_clear,
    },
    CommandEntry {
        name: "exit",
        handler: cmd_exit,
    },
    CommandEntry {
        name: "help",
        handler: cmd_help,
    },
    CommandEntry {
        name: "settings",
        handler: cmd_settings,
    },
    CommandEntry {
        name: "print",
        handler: cmd_print,
    },
    CommandEntry {
        name: "save",
        handler: cmd_save,
    },
    CommandEntry {
        name: "erase",
        handler: cmd_erase,
    },
    CommandEntry {
        name: "get",
        handler: cmd_get,
    },
    CommandEntry {
        name: "put_int",
        handler: cmd_put_int,
    },
    CommandEntry {
        name: "put_bool",
        handler: cmd_put_bool,
    },
    CommandEntry {
        name: "put_str",
        handler: cmd_put_str,
    },
    CommandEntry {
        name: "status",
        handler: cmd_status,
    },
    CommandEntry {
        name: "",
        handler: cmd_unknown,
    },
];
