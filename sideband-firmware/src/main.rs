//! Sideband - cartridge bus console firmware
//!
//! Main firmware binary for RP2040-based cartridge boards. The board
//! sits on the host's expansion bus emulating ROM; reads of a reserved
//! window double as a command channel for a virtual terminal that the
//! host driver renders.
//!
//! Named after out-of-band signalling: the console rides on bus
//! activity the host performs anyway.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{Executor, InterruptExecutor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::multicore::{spawn_core1, Stack};
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::Pio;
use embassy_time::{Instant, Timer};
use portable_atomic::Ordering;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use sideband_core::session::ConsoleSession;
use sideband_hal_rp2040::bus_tap::{BusTapPins, PioBusTap};
use sideband_hal_rp2040::flash::FlashStorage;

use crate::commands::{McuId, Services, REGISTRY};
use crate::display::FbDisplay;
use crate::settings::FlashSettings;

mod channels;
mod commands;
mod display;
mod settings;
mod shared_mem;
mod tasks;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => embassy_rp::pio::InterruptHandler<PIO0>;
});

/// High-priority executor the bus trap task runs on
static TRAP_EXECUTOR: InterruptExecutor = InterruptExecutor::new();

/// Core 1 executor for the SELECT watch
static CORE1_EXECUTOR: StaticCell<Executor> = StaticCell::new();

static mut CORE1_STACK: Stack<4096> = Stack::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    TRAP_EXECUTOR.on_interrupt()
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Sideband firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Bus tap on PIO0: 16 address pins, window select, read strobe
    let Pio {
        mut common, sm0, ..
    } = Pio::new(p.PIO0, Irqs);
    let pins = BusTapPins {
        a0: p.PIN_0,
        a1: p.PIN_1,
        a2: p.PIN_2,
        a3: p.PIN_3,
        a4: p.PIN_4,
        a5: p.PIN_5,
        a6: p.PIN_6,
        a7: p.PIN_7,
        a8: p.PIN_8,
        a9: p.PIN_9,
        a10: p.PIN_10,
        a11: p.PIN_11,
        a12: p.PIN_12,
        a13: p.PIN_13,
        a14: p.PIN_14,
        a15: p.PIN_15,
        window_select: p.PIN_16,
        read_strobe: p.PIN_17,
    };
    let tap = PioBusTap::new(&mut common, sm0, pins);
    info!("PIO bus tap initialized");

    // Trap decoding preempts the console; a burst of host reads must
    // never wait behind a command handler.
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let trap_spawner = TRAP_EXECUTOR.start(interrupt::SWI_IRQ_1);
    trap_spawner.spawn(tasks::bus_trap_task(tap)).unwrap();

    // Flash-backed settings, plus the board id for the status readout
    let mut storage = FlashStorage::new(p.FLASH, p.DMA_CH0);
    let mcu_id = read_mcu_id(&mut storage);
    let settings = FlashSettings::load(storage).await;

    // Host-visible console region at the top of the emulated window
    let (mut tokens, frame) = shared_mem::take().unwrap();
    tokens.reset_hardware_info();
    let display = FbDisplay::new(frame);

    let services = Services::new(tokens, settings, mcu_id);
    let seed = Instant::now().as_micros() as u32;
    let session = ConsoleSession::new(display, services, &REGISTRY, seed);

    // SELECT watch on core 1, armed exactly once per boot
    channels::WATCH_ACTIVE.store(true, Ordering::Release);
    let select_button = Input::new(p.PIN_22, Pull::Down);
    spawn_core1(
        p.CORE1,
        unsafe { &mut *core::ptr::addr_of_mut!(CORE1_STACK) },
        move || {
            let executor = CORE1_EXECUTOR.init(Executor::new());
            executor.run(|spawner| {
                spawner.spawn(tasks::select_watch_task(select_button)).unwrap()
            })
        },
    );

    spawner.spawn(tasks::console_task(session)).unwrap();
    info!("All tasks spawned, console running");

    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Read the flash unique id for the status readout
///
/// An empty string is returned when the id cannot be read; the status
/// readout shows its fallback value instead.
fn read_mcu_id(storage: &mut FlashStorage<'static>) -> McuId {
    let mut uid = [0u8; 8];
    match storage.flash().blocking_unique_id(&mut uid) {
        Ok(()) => commands::format_mcu_id(&uid),
        Err(_) => McuId::new(),
    }
}
