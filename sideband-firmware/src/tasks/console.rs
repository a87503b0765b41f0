//! Console task
//!
//! Main-loop consumer of the command mailbox. Each pass polls the
//! session once, repaints the status readout's live rows on an
//! interval, and answers SELECT presses reported by the core 1 watch.
//! The loop never blocks on the mailbox; it polls and yields.

use defmt::*;
use embassy_futures::yield_now;
use embassy_time::{Duration, Instant};
use portable_atomic::Ordering;

use sideband_core::button::SelectPress;
use sideband_core::session::ConsoleSession;
use sideband_core::traits::SettingsStore;

use crate::channels::{COMMAND_MAILBOX, SELECT_PRESS, WATCH_ACTIVE};
use crate::commands::{live_snapshot, Services};
use crate::display::FbDisplay;

/// Period of the live status row repaint
const STATUS_REFRESH: Duration = Duration::from_millis(1000);

#[embassy_executor::task]
pub async fn console_task(mut session: ConsoleSession<'static, FbDisplay, Services>) {
    info!("Console task started");

    session.init();

    let mut watch_armed = true;
    let mut next_refresh = Instant::now() + STATUS_REFRESH;

    loop {
        if let Some(polled) = session.poll(&COMMAND_MAILBOX) {
            info!(
                "Handled command {}: id={} size={} token={} checksum={} overwrites={}",
                polled.command,
                polled.command_id,
                polled.payload_size,
                polled.token,
                polled.final_checksum,
                polled.overwrites
            );
            let (term, services) = session.parts();
            services.panel.mark_prompt(term);
        }

        if watch_armed && !WATCH_ACTIVE.load(Ordering::Acquire) {
            watch_armed = false;
            if let Some(press) = SELECT_PRESS.try_take() {
                respond_to_select(press, &mut session);
            }
        }

        if Instant::now() >= next_refresh {
            next_refresh = Instant::now() + STATUS_REFRESH;
            let (term, services) = session.parts();
            let snapshot = live_snapshot(services.mcu_id.as_str());
            services.panel.refresh(term, &snapshot);
        }

        yield_now().await;
    }
}

/// Act on a classified SELECT press. Both variants end in a reset.
fn respond_to_select(
    press: SelectPress,
    session: &mut ConsoleSession<'static, FbDisplay, Services>,
) -> ! {
    match press {
        SelectPress::Short => info!("SELECT short press, resetting"),
        SelectPress::Long => {
            warn!("SELECT long press, erasing settings before reset");
            let (_, services) = session.parts();
            if services.erase().is_err() {
                error!("Settings erase failed, resetting anyway");
            }
        }
    }
    cortex_m::peripheral::SCB::sys_reset()
}
