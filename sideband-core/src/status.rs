//! Status readout and live row refresh
//!
//! The `status` command prints a full readout of board and network state.
//! Three of its lines can change while the readout is on screen (SSID,
//! SELECT button, SD card), so their grid rows are recorded at render
//! time. A periodic pass rebuilds just those lines and, when any differ
//! from the previous pass, repaints the changed rows in place: cursor
//! moves and erase-to-end sequences are composed with the new text into
//! one string and rendered in a single call, ending with a cursor move
//! back to the recorded prompt position. Recorded positions go stale
//! when the screen is cleared, and the refresh stops until the next
//! full render.
//!
//! This board has no radio and no card slot, so the network and SD
//! fields all take their fallback values; they still go through the
//! same formatting path.

use core::fmt::Write;

use heapless::String;

use crate::terminal::{Terminal, DIRECT_ADDR_BIAS, ESC_CHAR};
use crate::traits::settings::MAX_VALUE_LEN;
use crate::traits::{SettingsStore, TermDisplay};

/// Settings keys consulted by the readout
pub const KEY_HOSTNAME: &str = "HOSTNAME";
pub const KEY_WIFI_IP: &str = "WIFI_IP";
pub const KEY_WIFI_NETMASK: &str = "WIFI_NETMASK";
pub const KEY_WIFI_GATEWAY: &str = "WIFI_GATEWAY";

const VALUE_NA: &str = "N/A";

/// Capacity of one rebuilt live line
const LIVE_LINE_MAX: usize = 64;

/// Capacity of the composed repaint string
const UPDATE_BUFFER_MAX: usize = 512;

/// Live hardware state sampled just before a render or refresh pass
#[derive(Debug, Clone, Copy)]
pub struct StatusSnapshot<'a> {
    pub mcu_arch: Option<&'a str>,
    pub mcu_id: Option<&'a str>,
    pub select_pressed: bool,
}

#[derive(Clone, Copy)]
struct PanelRows {
    ssid: u8,
    select: u8,
    sd: u8,
    generation: u32,
}

#[derive(Clone, Copy)]
struct PromptMark {
    x: u8,
    y: u8,
    generation: u32,
}

/// Recorded row positions plus the previously painted live lines
pub struct StatusPanel {
    rows: Option<PanelRows>,
    prompt: Option<PromptMark>,
    prev_ssid: String<LIVE_LINE_MAX>,
    prev_select: String<LIVE_LINE_MAX>,
    prev_sd: String<LIVE_LINE_MAX>,
}

impl StatusPanel {
    pub const fn new() -> Self {
        Self {
            rows: None,
            prompt: None,
            prev_ssid: String::new(),
            prev_select: String::new(),
            prev_sd: String::new(),
        }
    }

    /// Print the full status readout and record the live rows
    pub fn render<D: TermDisplay, S: SettingsStore>(
        &mut self,
        term: &mut Terminal<D>,
        settings: &S,
        snapshot: &StatusSnapshot<'_>,
    ) {
        let host_name = value_or_na(settings, KEY_HOSTNAME);
        let ip_address = value_or_na(settings, KEY_WIFI_IP);
        let netmask = value_or_na(settings, KEY_WIFI_NETMASK);
        let gateway = value_or_na(settings, KEY_WIFI_GATEWAY);
        let mcu_arch = snapshot.mcu_arch.unwrap_or(VALUE_NA);
        let mcu_id = snapshot.mcu_id.unwrap_or(VALUE_NA);

        self.rows = None;

        term.print_str("Network status: ");
        term.print_str("Unavailable\n");

        let _ = write!(term, "MCU type  : {} ({})\n", mcu_arch, mcu_id);
        let _ = write!(term, "Host name : {}\n", host_name);
        let _ = write!(term, "WiFi      : {} ({})\n", VALUE_NA, VALUE_NA);
        let _ = write!(term, "IP        : {} ({})\n", ip_address, VALUE_NA);
        let _ = write!(term, "Netmask   : {}\n", netmask);
        let _ = write!(term, "Gateway   : {}\n", gateway);
        let _ = write!(term, "DNS       : {}, {}\n", VALUE_NA, VALUE_NA);
        let _ = write!(term, "WiFi MAC  : {}\n", VALUE_NA);

        let ssid_row = term.cursor().1;
        let _ = write!(term, "SSID      : {} ({})\n", VALUE_NA, VALUE_NA);

        let _ = write!(term, "BSSID     : {}\n", VALUE_NA);
        let _ = write!(term, "Auth mode : {}\n", VALUE_NA);

        term.print_str("\n");
        let select_row = term.cursor().1;
        let _ = write!(term, "SELECT  : {}\n", select_state(snapshot.select_pressed));

        term.print_str("\n");
        let sd_row = term.cursor().1;
        let _ = write!(term, "SD card   : {} ({})\n", "Not mounted", VALUE_NA);

        self.rows = Some(PanelRows {
            ssid: ssid_row,
            select: select_row,
            sd: sd_row,
            generation: term.clear_generation(),
        });
    }

    /// Record the input prompt position the refresh restores the cursor to
    pub fn mark_prompt<D: TermDisplay>(&mut self, term: &Terminal<D>) {
        let (x, y) = term.cursor();
        self.prompt = Some(PromptMark {
            x,
            y,
            generation: term.clear_generation(),
        });
    }

    /// Repaint live rows that changed since the last pass
    ///
    /// Returns whether anything was painted. Does nothing when no render
    /// happened yet or the screen was cleared since the last one.
    pub fn refresh<D: TermDisplay>(
        &mut self,
        term: &mut Terminal<D>,
        snapshot: &StatusSnapshot<'_>,
    ) -> bool {
        let rows = match self.rows {
            Some(rows) if rows.generation == term.clear_generation() => rows,
            _ => return false,
        };

        let (ssid_line, select_line, sd_line) = build_live_lines(snapshot);

        let update_ssid = ssid_line != self.prev_ssid;
        let update_select = select_line != self.prev_select;
        let update_sd = sd_line != self.prev_sd;

        if !update_ssid && !update_select && !update_sd {
            return false;
        }

        let mut update: String<UPDATE_BUFFER_MAX> = String::new();

        if update_ssid {
            append_move_and_clear(&mut update, rows.ssid);
            let _ = update.push_str(&ssid_line);
        }

        if update_select {
            append_move_and_clear(&mut update, rows.select);
            let _ = update.push_str(&select_line);
        }

        if update_sd {
            append_move_and_clear(&mut update, rows.sd);
            let _ = update.push_str(&sd_line);
        }

        // Put the cursor back where input continues
        if let Some(prompt) = self.prompt {
            if prompt.generation == term.clear_generation() {
                let _ = update.push(ESC_CHAR as char);
                let _ = update.push('Y');
                let _ = update.push(bias(prompt.y) as char);
                let _ = update.push(bias(prompt.x) as char);
            }
        }

        self.prev_ssid = ssid_line;
        self.prev_select = select_line;
        self.prev_sd = sd_line;

        term.print_str(&update);
        true
    }
}

impl Default for StatusPanel {
    fn default() -> Self {
        Self::new()
    }
}

fn bias(coord: u8) -> u8 {
    DIRECT_ADDR_BIAS as u8 + coord
}

fn select_state(pressed: bool) -> &'static str {
    if pressed {
        "Pressed"
    } else {
        "Released"
    }
}

fn value_or_na<S: SettingsStore>(settings: &S, key: &str) -> String<MAX_VALUE_LEN> {
    let mut out = String::new();
    match settings.get(key) {
        Some(entry) => {
            let _ = write!(out, "{}", entry.value);
        }
        None => {
            let _ = out.push_str(VALUE_NA);
        }
    }
    out
}

fn build_live_lines(
    snapshot: &StatusSnapshot<'_>,
) -> (
    String<LIVE_LINE_MAX>,
    String<LIVE_LINE_MAX>,
    String<LIVE_LINE_MAX>,
) {
    let mut ssid = String::new();
    let _ = write!(ssid, "SSID      : {} ({})", VALUE_NA, VALUE_NA);

    let mut select = String::new();
    let _ = write!(select, "SELECT  : {}", select_state(snapshot.select_pressed));

    let mut sd = String::new();
    let _ = write!(sd, "SD card   : {} ({})", "Not mounted", VALUE_NA);

    (ssid, select, sd)
}

/// Move to column 0 of `row` and erase the line, ready for new text
fn append_move_and_clear(buffer: &mut String<UPDATE_BUFFER_MAX>, row: u8) {
    let _ = buffer.push(ESC_CHAR as char);
    let _ = buffer.push('Y');
    let _ = buffer.push(bias(row) as char);
    let _ = buffer.push(bias(0) as char);
    let _ = buffer.push(ESC_CHAR as char);
    let _ = buffer.push('K');
}
