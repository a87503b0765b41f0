//! Stock console command handlers
//!
//! Plain functions shaped for the command registry: screen control,
//! session exit, the unknown-command fallback, and the settings
//! commands. The firmware assembles these into its registry next to
//! its board-specific entries.

use core::fmt::Write;

use crate::terminal::Terminal;
use crate::traits::display::TermDisplay;
use crate::traits::settings::{SettingsStore, MAX_KEY_LEN};

/// Clear the screen
pub fn cmd_clear<D: TermDisplay, S>(term: &mut Terminal<D>, _services: &mut S, _arg: &str) {
    term.clear_screen();
}

/// Leave the console and hand the screen back to the desktop
pub fn cmd_exit<D: TermDisplay, S>(term: &mut Terminal<D>, _services: &mut S, _arg: &str) {
    term.print_str("Exiting terminal...\n");
    term.display_mut().show_desktop();
}

/// Fallback for unmatched input
///
/// Registered under the empty name, so it also receives blank line
/// submissions; those stay silent.
pub fn cmd_unknown<D: TermDisplay, S>(term: &mut Terminal<D>, _services: &mut S, arg: &str) {
    if arg.is_empty() {
        return;
    }
    term.print_str("Unknown command. Type 'help' for a list of commands.\n");
}

/// Settings submenu
pub fn cmd_settings<D: TermDisplay, S>(term: &mut Terminal<D>, _services: &mut S, _arg: &str) {
    term.print_str("\u{1b}EAvailable settings commands:\n");
    term.print_str("  print   - Show settings\n");
    term.print_str("  save    - Save settings\n");
    term.print_str("  erase   - Erase settings\n");
    term.print_str("  get     - Get setting (requires key)\n");
    term.print_str("  put_int - Set integer (key and value)\n");
    term.print_str("  put_bool- Set boolean (key and value)\n");
    term.print_str("  put_str - Set string (key and value)\n");
    term.print_str("\n");
}

/// Print every stored setting
pub fn cmd_print<D: TermDisplay, S: SettingsStore>(
    term: &mut Terminal<D>,
    services: &mut S,
    _arg: &str,
) {
    services.for_each(&mut |entry| {
        let _ = write!(
            term,
            "{} ({}): {}\n",
            entry.key,
            entry.value.type_name(),
            entry.value
        );
    });
}

/// Commit settings to backing storage
pub fn cmd_save<D: TermDisplay, S: SettingsStore>(
    term: &mut Terminal<D>,
    services: &mut S,
    _arg: &str,
) {
    match services.save() {
        Ok(()) => term.print_str("Settings saved.\n"),
        Err(_) => term.print_str("Error saving settings.\n"),
    }
}

/// Drop all settings
pub fn cmd_erase<D: TermDisplay, S: SettingsStore>(
    term: &mut Terminal<D>,
    services: &mut S,
    _arg: &str,
) {
    match services.erase() {
        Ok(()) => term.print_str("Settings erased.\n"),
        Err(_) => term.print_str("Error erasing settings.\n"),
    }
}

/// Look up one setting; the whole argument is the key
pub fn cmd_get<D: TermDisplay, S: SettingsStore>(
    term: &mut Terminal<D>,
    services: &mut S,
    arg: &str,
) {
    if arg.is_empty() {
        term.print_str("No key provided for 'get' command.\n");
        return;
    }
    match services.get(arg) {
        Some(entry) => {
            let _ = write!(term, "Key: {}\n", entry.key);
            let _ = write!(term, "Type: {}\n", entry.value.type_name());
            let _ = write!(term, "Value: {}\n", entry.value);
        }
        None => term.print_str("Key not found.\n"),
    }
}

/// Store an integer setting
pub fn cmd_put_int<D: TermDisplay, S: SettingsStore>(
    term: &mut Terminal<D>,
    services: &mut S,
    arg: &str,
) {
    let parsed = parse_key_and_tail(arg)
        .filter(|(_, value)| !value.is_empty())
        .and_then(|(key, value)| parse_int(value).map(|v| (key, v)));
    match parsed {
        Some((key, value)) => match services.put_int(key, value) {
            Ok(()) => {
                let _ = write!(term, "Key: {}\n", key);
                let _ = write!(term, "Value: {}\n", value);
            }
            Err(_) => {
                let _ = write!(term, "Error setting integer value for key: {}\n", key);
            }
        },
        None => term.print_str("Invalid arguments for 'put_int' command.\n"),
    }
}

/// Store a boolean setting
pub fn cmd_put_bool<D: TermDisplay, S: SettingsStore>(
    term: &mut Terminal<D>,
    services: &mut S,
    arg: &str,
) {
    let parsed = parse_key_and_tail(arg)
        .and_then(|(key, value)| parse_bool_token(value).map(|v| (key, v)));
    match parsed {
        Some((key, value)) => match services.put_bool(key, value) {
            Ok(()) => {
                let _ = write!(term, "Key: {}\n", key);
                let _ = write!(term, "Value: {}\n", if value { "true" } else { "false" });
            }
            Err(_) => {
                let _ = write!(term, "Error setting boolean value for key: {}\n", key);
            }
        },
        None => term.print_str(
            "Invalid arguments for 'put_bool' command. Usage: put_bool <key> <true/false>\n",
        ),
    }
}

/// Store a string setting; the value is the rest of the line
pub fn cmd_put_str<D: TermDisplay, S: SettingsStore>(
    term: &mut Terminal<D>,
    services: &mut S,
    arg: &str,
) {
    match parse_key_and_tail(arg) {
        Some((key, value)) => match services.put_str(key, value) {
            Ok(()) => {
                let _ = write!(term, "Key: {}\n", key);
                let shown = if value.is_empty() { "<EMPTY>" } else { value };
                let _ = write!(term, "Value: {}\n", shown);
            }
            Err(_) => {
                let _ = write!(term, "Error setting string value for key: {}\n", key);
            }
        },
        None => term.print_str("Invalid arguments for 'put_string' command.\n"),
    }
}

/// Split an argument string into a key and the remaining tail
///
/// The key is the first whitespace-delimited word and must fit a
/// settings key. The tail is everything after the separator run, with
/// trailing whitespace kept; it is empty when only a key was given.
fn parse_key_and_tail(arg: &str) -> Option<(&str, &str)> {
    let trimmed = arg.trim_start();
    if trimmed.is_empty() {
        return None;
    }
    let (key, tail) = match trimmed.find(|c: char| c.is_whitespace()) {
        Some(idx) => {
            let (key, rest) = trimmed.split_at(idx);
            (key, rest.trim_start())
        }
        None => (trimmed, ""),
    };
    if key.len() >= MAX_KEY_LEN {
        return None;
    }
    Some((key, tail))
}

/// Parse the first whitespace-delimited token of `value` as a boolean
///
/// Accepts true/t/1 and false/f/0, case-insensitive. Anything after
/// the first token is ignored.
fn parse_bool_token(value: &str) -> Option<bool> {
    let token = value.split_whitespace().next()?;
    if token.eq_ignore_ascii_case("true") || token.eq_ignore_ascii_case("t") || token == "1" {
        Some(true)
    } else if token.eq_ignore_ascii_case("false")
        || token.eq_ignore_ascii_case("f")
        || token == "0"
    {
        Some(false)
    } else {
        None
    }
}

/// Whole-tail integer parse: trailing whitespace is fine, any other
/// trailing text is not
fn parse_int(value: &str) -> Option<i32> {
    value.trim_end().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::TERM_COLUMNS;
    use crate::test_support::{MemorySettings, RecordingDisplay, ShownSurface};
    use crate::traits::settings::SettingValue;

    fn term() -> Terminal<RecordingDisplay> {
        Terminal::new(RecordingDisplay::default())
    }

    fn row_string(term: &Terminal<RecordingDisplay>, y: usize) -> heapless::String<40> {
        let mut out = heapless::String::new();
        for x in 0..TERM_COLUMNS {
            let ch = term.screen().get(x, y);
            if ch == 0 {
                break;
            }
            let _ = out.push(ch as char);
        }
        out
    }

    #[test]
    fn parse_key_and_tail_splits_and_bounds() {
        assert_eq!(parse_key_and_tail("foo bar baz "), Some(("foo", "bar baz ")));
        assert_eq!(parse_key_and_tail("  foo"), Some(("foo", "")));
        assert_eq!(parse_key_and_tail(""), None);
        assert_eq!(parse_key_and_tail("   "), None);

        let long_key = "kkkkkkkkkkkkkkkkkkkkkkkkkkkkkkkkkkkk v";
        assert_eq!(parse_key_and_tail(long_key), None);
    }

    #[test]
    fn parse_bool_token_accepts_the_usual_spellings() {
        assert_eq!(parse_bool_token("true"), Some(true));
        assert_eq!(parse_bool_token("T"), Some(true));
        assert_eq!(parse_bool_token("1"), Some(true));
        assert_eq!(parse_bool_token("FALSE"), Some(false));
        assert_eq!(parse_bool_token("f"), Some(false));
        assert_eq!(parse_bool_token("0"), Some(false));
        assert_eq!(parse_bool_token("true trailing junk"), Some(true));
        assert_eq!(parse_bool_token("yes"), None);
        assert_eq!(parse_bool_token(""), None);
    }

    #[test]
    fn parse_int_requires_a_clean_number() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("-5"), Some(-5));
        assert_eq!(parse_int("+7"), Some(7));
        assert_eq!(parse_int("42  "), Some(42));
        assert_eq!(parse_int("4 2"), None);
        assert_eq!(parse_int("42abc"), None);
        assert_eq!(parse_int("0x10"), None);
        assert_eq!(parse_int("99999999999"), None);
    }

    #[test]
    fn put_int_stores_and_echoes() {
        let mut term = term();
        let mut store = MemorySettings::default();
        cmd_put_int(&mut term, &mut store, "answer 42");

        assert_eq!(
            store.get("answer").map(|e| e.value),
            Some(SettingValue::Int(42))
        );
        assert_eq!(row_string(&term, 0).as_str(), "Key: answer");
        assert_eq!(row_string(&term, 1).as_str(), "Value: 42");
    }

    #[test]
    fn put_int_rejects_malformed_input_without_touching_store() {
        let mut store = MemorySettings::default();
        for arg in ["", "keyonly", "key 4x2", "key 4 2", "key 99999999999"] {
            let mut term = term();
            cmd_put_int(&mut term, &mut store, arg);
            assert_eq!(
                row_string(&term, 0).as_str(),
                "Invalid arguments for 'put_int' command."
            );
        }
        assert!(store.entries.is_empty());
    }

    #[test]
    fn put_bool_stores_and_replaces_other_types() {
        let mut term = term();
        let mut store = MemorySettings::default();
        cmd_put_int(&mut term, &mut store, "flag 1");
        cmd_put_bool(&mut term, &mut store, "flag true");

        assert_eq!(
            store.get("flag").map(|e| e.value),
            Some(SettingValue::Bool(true))
        );
        assert_eq!(store.entries.len(), 1);
    }

    #[test]
    fn put_bool_rejects_unknown_spelling() {
        let mut term = term();
        let mut store = MemorySettings::default();
        cmd_put_bool(&mut term, &mut store, "flag maybe");

        assert!(store.entries.is_empty());
        assert!(row_string(&term, 0)
            .as_str()
            .starts_with("Invalid arguments for 'put_bool'"));
    }

    #[test]
    fn put_str_empty_value_echoes_placeholder() {
        let mut term = term();
        let mut store = MemorySettings::default();
        cmd_put_str(&mut term, &mut store, "name");

        assert_eq!(row_string(&term, 1).as_str(), "Value: <EMPTY>");
        match store.get("name").map(|e| e.value) {
            Some(SettingValue::Str(s)) => assert_eq!(s.as_str(), ""),
            other => panic!("unexpected value: {:?}", other),
        }
    }

    #[test]
    fn put_str_keeps_spaces_in_the_tail() {
        let mut term = term();
        let mut store = MemorySettings::default();
        cmd_put_str(&mut term, &mut store, "greeting hello  there ");

        match store.get("greeting").map(|e| e.value) {
            Some(SettingValue::Str(s)) => assert_eq!(s.as_str(), "hello  there "),
            other => panic!("unexpected value: {:?}", other),
        }
    }

    #[test]
    fn get_without_key_and_with_missing_key() {
        let mut store = MemorySettings::default();

        let mut term1 = term();
        cmd_get(&mut term1, &mut store, "");
        assert_eq!(
            row_string(&term1, 0).as_str(),
            "No key provided for 'get' command."
        );

        let mut term2 = term();
        cmd_get(&mut term2, &mut store, "nope");
        assert_eq!(row_string(&term2, 0).as_str(), "Key not found.");
    }

    #[test]
    fn get_prints_key_type_and_value() {
        let mut term = term();
        let mut store = MemorySettings::default();
        store.put_bool("flag", false).unwrap();
        cmd_get(&mut term, &mut store, "flag");

        assert_eq!(row_string(&term, 0).as_str(), "Key: flag");
        assert_eq!(row_string(&term, 1).as_str(), "Type: BOOL");
        assert_eq!(row_string(&term, 2).as_str(), "Value: false");
    }

    #[test]
    fn print_lists_every_entry() {
        let mut term = term();
        let mut store = MemorySettings::default();
        store.put_int("a", 1).unwrap();
        store.put_str("b", "x y").unwrap();
        cmd_print(&mut term, &mut store, "");

        assert_eq!(row_string(&term, 0).as_str(), "a (INT): 1");
        assert_eq!(row_string(&term, 1).as_str(), "b (STRING): x y");
    }

    #[test]
    fn save_reports_success_and_failure() {
        let mut store = MemorySettings::default();

        let mut term1 = term();
        cmd_save(&mut term1, &mut store, "");
        assert_eq!(row_string(&term1, 0).as_str(), "Settings saved.");
        assert_eq!(store.saves, 1);

        store.fail_save = true;
        let mut term2 = term();
        cmd_save(&mut term2, &mut store, "");
        assert_eq!(row_string(&term2, 0).as_str(), "Error saving settings.");
    }

    #[test]
    fn erase_drops_entries() {
        let mut term = term();
        let mut store = MemorySettings::default();
        store.put_int("a", 1).unwrap();
        cmd_erase(&mut term, &mut store, "");

        assert!(store.entries.is_empty());
        assert_eq!(row_string(&term, 0).as_str(), "Settings erased.");
    }

    #[test]
    fn clear_blanks_screen_and_homes() {
        let mut term = term();
        let mut store = MemorySettings::default();
        term.print_str("junk");
        cmd_clear(&mut term, &mut store, "");

        assert_eq!(term.cursor(), (0, 0));
        assert_eq!(term.screen().get(0, 0), 0);
    }

    #[test]
    fn exit_prints_and_switches_surface() {
        let mut term = term();
        let mut store = MemorySettings::default();
        cmd_exit(&mut term, &mut store, "");

        assert_eq!(row_string(&term, 0).as_str(), "Exiting terminal...");
        assert_eq!(term.display_mut().shown, Some(ShownSurface::Desktop));
    }

    #[test]
    fn unknown_stays_silent_on_empty_input() {
        let mut term = term();
        let mut store = MemorySettings::default();
        cmd_unknown(&mut term, &mut store, "");
        assert_eq!(term.screen().get(0, 0), 0);

        cmd_unknown(&mut term, &mut store, "frobnicate");
        assert!(row_string(&term, 0).as_str().starts_with("Unknown command."));
    }

    #[test]
    fn settings_submenu_clears_then_lists() {
        let mut term = term();
        let mut store = MemorySettings::default();
        term.print_str("old content");
        cmd_settings(&mut term, &mut store, "");

        assert_eq!(
            row_string(&term, 0).as_str(),
            "Available settings commands:"
        );
        assert_eq!(row_string(&term, 1).as_str(), "  print   - Show settings");
        assert_eq!(
            row_string(&term, 7).as_str(),
            "  put_str - Set string (key and value)"
        );
    }
}
