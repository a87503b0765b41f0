//! Inter-task communication channels
//!
//! Defines the statics shared between the bus trap executor, the console
//! task, and the SELECT watch on core 1. Uses embassy-sync primitives for
//! safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::AtomicBool;

use sideband_core::button::SelectPress;
use sideband_core::mailbox::CommandMailbox;

/// Decoded host commands (bus trap executor -> console task)
///
/// Latest-wins: the console only ever wants the newest outstanding
/// command, and overwrites are counted rather than queued.
pub static COMMAND_MAILBOX: CommandMailbox = CommandMailbox::new();

/// Classified SELECT press (core 1 watch -> console task)
pub static SELECT_PRESS: Signal<CriticalSectionRawMutex, SelectPress> = Signal::new();

/// Watch completion flag, armed by core 0 at boot
///
/// Written only by the core 1 watch after that; the console polls for
/// the falling edge to learn a press was reported.
pub static WATCH_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Raw SELECT level, sampled by the core 1 watch for the status readout
pub static SELECT_STATE: AtomicBool = AtomicBool::new(false);
