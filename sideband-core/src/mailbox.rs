//! Latest-wins command mailbox
//!
//! Depth-one handoff between the bus trap ISR (producer) and the
//! console loop (consumer). The producer never blocks and never sees a
//! full mailbox: publishing while the previous record is still pending
//! replaces it and bumps the overwrite counter. Two slots are swapped
//! by role on every publish so the producer always writes a slot the
//! consumer is not reading.
//!
//! Both sides take a short interrupt-masking critical section, which
//! makes the swap and the snapshot atomic with respect to each other.

use core::cell::RefCell;

use critical_section::Mutex;
use sideband_protocol::{CommandRecord, MAX_PAYLOAD_SIZE};

/// A record taken from the mailbox, with channel diagnostics
#[derive(Debug, Clone)]
pub struct DrainedCommand {
    /// The most recently published record
    pub record: CommandRecord,
    /// Cumulative overwrite count at the time of the drain
    pub overwrites: u32,
}

struct Slots {
    slots: [CommandRecord; 2],
    read_slot: usize,
    write_slot: usize,
    ready: bool,
    overwrites: u32,
}

/// Depth-one latest-wins channel for decoded command records
pub struct CommandMailbox {
    inner: Mutex<RefCell<Slots>>,
}

impl CommandMailbox {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Slots {
                slots: [CommandRecord::empty(), CommandRecord::empty()],
                read_slot: 0,
                write_slot: 1,
                ready: false,
                overwrites: 0,
            })),
        }
    }

    /// Publish a record, replacing any still-pending one
    ///
    /// The declared payload size is clamped to [`MAX_PAYLOAD_SIZE`], so
    /// a consumer can trust `payload_size` as a byte count. Called from
    /// interrupt context.
    pub fn publish(&self, mut record: CommandRecord) {
        record.payload_size = record.payload_size.min(MAX_PAYLOAD_SIZE as u16);
        record.payload.truncate(record.payload_size as usize);
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            let write_slot = inner.write_slot;
            inner.slots[write_slot] = record;
            if inner.ready {
                inner.overwrites = inner.overwrites.wrapping_add(1);
            }
            inner.write_slot = inner.read_slot;
            inner.read_slot = write_slot;
            inner.ready = true;
        });
    }

    /// Take the pending record, if any
    ///
    /// Clears the ready flag, so each published record is observed at
    /// most once. The returned snapshot is stable even if the producer
    /// publishes again immediately.
    pub fn try_take(&self) -> Option<DrainedCommand> {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            if !inner.ready {
                return None;
            }
            let record = inner.slots[inner.read_slot].clone();
            inner.ready = false;
            Some(DrainedCommand {
                record,
                overwrites: inner.overwrites,
            })
        })
    }

    /// Cumulative count of records lost to overwrites
    pub fn overwrites(&self) -> u32 {
        critical_section::with(|cs| self.inner.borrow_ref(cs).overwrites)
    }
}

impl Default for CommandMailbox {
    fn default() -> Self {
        Self::new()
    }
}
