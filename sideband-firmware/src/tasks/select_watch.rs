//! SELECT button watch, pinned to core 1
//!
//! Samples the button at a fixed period and feeds the debouncing
//! tracker. One press is classified per arming: after reporting it the
//! watch clears the active flag and parks, since every response to a
//! press ends in a device reset.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Instant, Ticker};
use portable_atomic::Ordering;

use sideband_core::button::{PressTracker, SAMPLE_PERIOD_MS};

use crate::channels::{SELECT_PRESS, SELECT_STATE, WATCH_ACTIVE};

#[embassy_executor::task]
pub async fn select_watch_task(button: Input<'static>) {
    info!("SELECT watch started on core 1");

    let mut tracker = PressTracker::new();
    let mut ticker = Ticker::every(Duration::from_millis(SAMPLE_PERIOD_MS));

    while WATCH_ACTIVE.load(Ordering::Relaxed) {
        let pressed = button.is_high();
        SELECT_STATE.store(pressed, Ordering::Relaxed);

        if let Some(press) = tracker.update(Instant::now().as_millis(), pressed) {
            info!("SELECT press classified: {}", press);
            // Signal first; the cleared flag is what the console polls.
            SELECT_PRESS.signal(press);
            WATCH_ACTIVE.store(false, Ordering::Release);
        }

        ticker.next().await;
    }

    info!("SELECT watch done");
}
