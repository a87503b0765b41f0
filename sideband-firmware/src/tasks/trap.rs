//! Bus trap task
//!
//! Runs on the interrupt executor so command decoding preempts the
//! console. Every trapped read of the command window delivers one
//! 16-bit word; completed records go into the mailbox, checksum
//! failures are logged and dropped.

use defmt::*;
use embassy_rp::peripherals::PIO0;

use sideband_hal_rp2040::bus_tap::PioBusTap;
use sideband_protocol::{DecodeError, TrapDecoder};

use crate::channels::COMMAND_MAILBOX;

#[embassy_executor::task]
pub async fn bus_trap_task(mut tap: PioBusTap<'static, PIO0, 0>) {
    info!("Bus trap task started");

    let mut decoder = TrapDecoder::new();

    loop {
        let word = tap.next_trap().await;
        match decoder.feed(word) {
            Ok(Some(record)) => COMMAND_MAILBOX.publish(record),
            Ok(None) => {}
            Err(DecodeError::Checksum(summary)) => {
                warn!(
                    "Checksum mismatch: id={} size={} received={} computed={}",
                    summary.command_id, summary.payload_size, summary.received, summary.computed
                );
            }
        }
        if tap.take_fifo_overrun() {
            warn!("Bus capture FIFO overran, trapped reads were lost");
        }
    }
}
