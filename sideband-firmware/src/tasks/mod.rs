//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod console;
pub mod select_watch;
pub mod trap;

pub use console::console_task;
pub use select_watch::select_watch_task;
pub use trap::bus_trap_task;
