//! Console session
//!
//! Owns the terminal, line editor, and token generator, and dispatches
//! the commands the host smuggles over the bus. The firmware main loop
//! drives [`ConsoleSession::poll`] and logs the returned summaries.

use sideband_protocol::commands::random_token;
use sideband_protocol::ConsoleCommand;

use crate::editor::{CommandEntry, LineEditor};
use crate::mailbox::CommandMailbox;
use crate::rng::TokenRng;
use crate::terminal::{Terminal, TERM_COLUMNS, TERM_ROWS};
use crate::traits::display::TermDisplay;
use crate::traits::handshake::TokenHandshake;

/// Summary of one handled command, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PolledCommand {
    pub command: ConsoleCommand,
    pub command_id: u16,
    pub payload_size: u16,
    pub token: u32,
    pub final_checksum: u16,
    pub overwrites: u32,
}

/// The console: terminal, editor, registry, and host handshake
pub struct ConsoleSession<'a, D: TermDisplay, S: TokenHandshake> {
    terminal: Terminal<D>,
    editor: LineEditor,
    registry: &'a [CommandEntry<D, S>],
    services: S,
    rng: TokenRng,
}

impl<'a, D: TermDisplay, S: TokenHandshake> ConsoleSession<'a, D, S> {
    pub fn new(display: D, services: S, registry: &'a [CommandEntry<D, S>], seed: u32) -> Self {
        Self {
            terminal: Terminal::new(display),
            editor: LineEditor::new(),
            registry,
            services,
            rng: TokenRng::new(seed),
        }
    }

    /// Publish the first handshake token and show the boot banner
    pub fn init(&mut self) {
        let seed = self.rng.next_token();
        self.services.write_seed(seed);
        self.terminal.clear_screen();
        self.terminal.print_str("Welcome to the terminal!\n");
        self.terminal.print_str("Press ESC to enter the terminal.\n");
        self.terminal.print_str("or any SHIFT key to boot the desktop.\n");
    }

    /// Handle one pending command from the mailbox, if any
    ///
    /// After every handled command, known or not, the echoed token and
    /// a fresh seed are written back for the host to poll.
    pub fn poll(&mut self, mailbox: &CommandMailbox) -> Option<PolledCommand> {
        let drained = mailbox.try_take()?;
        let record = drained.record;
        let token = random_token(&record.payload).unwrap_or(0);
        let command = ConsoleCommand::from_record(&record);

        match command {
            ConsoleCommand::Start => {
                self.terminal
                    .display_mut()
                    .enter_terminal(TERM_COLUMNS as u8, TERM_ROWS as u8);
                self.terminal.clear_screen();
                self.terminal
                    .print_str("Type 'help' for available commands.\n");
                // An empty submission prints the first prompt
                self.input_char(b'\n');
                self.terminal.display_mut().show_terminal();
            }
            ConsoleCommand::Keystroke(key) => {
                self.input_char(key.ascii);
            }
            ConsoleCommand::Unknown(_) => {}
        }

        self.services.write_echo(token);
        let seed = self.rng.next_token();
        self.services.write_seed(seed);

        Some(PolledCommand {
            command,
            command_id: record.command_id,
            payload_size: record.payload_size,
            token,
            final_checksum: record.final_checksum,
            overwrites: drained.overwrites,
        })
    }

    /// Feed one keystroke straight into the line editor
    pub fn input_char(&mut self, ch: u8) {
        self.editor
            .input_char(ch, &mut self.terminal, &mut self.services, self.registry);
    }

    pub fn terminal(&mut self) -> &mut Terminal<D> {
        &mut self.terminal
    }

    /// Split borrow for callers that need terminal and services at once
    pub fn parts(&mut self) -> (&mut Terminal<D>, &mut S) {
        (&mut self.terminal, &mut self.services)
    }
}
