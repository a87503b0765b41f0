//! PIO bus tap driver
//!
//! Owns one PIO state machine running the capture program from
//! [`crate::pio`]. The state machine blocks on the read strobe, so the
//! RX FIFO only ever holds real bus reads. With the FIFOs joined on the
//! RX side there is room for eight captures before anything is lost,
//! which covers the decode latency of the consumer comfortably.

use embassy_rp::peripherals::{
    PIN_0, PIN_1, PIN_10, PIN_11, PIN_12, PIN_13, PIN_14, PIN_15, PIN_16, PIN_17, PIN_2, PIN_3,
    PIN_4, PIN_5, PIN_6, PIN_7, PIN_8, PIN_9,
};
use embassy_rp::pio::{
    Common, Config, Direction as PioDirection, FifoJoin, Instance, ShiftConfig, ShiftDirection,
    StateMachine,
};
use embassy_rp::Peri;

use crate::pio::{trap_word, CAPTURE_BITS};

/// The fixed 18-pin capture window of the cartridge board
///
/// See [`crate::pio`] for the pin mapping.
pub struct BusTapPins<'d> {
    pub a0: Peri<'d, PIN_0>,
    pub a1: Peri<'d, PIN_1>,
    pub a2: Peri<'d, PIN_2>,
    pub a3: Peri<'d, PIN_3>,
    pub a4: Peri<'d, PIN_4>,
    pub a5: Peri<'d, PIN_5>,
    pub a6: Peri<'d, PIN_6>,
    pub a7: Peri<'d, PIN_7>,
    pub a8: Peri<'d, PIN_8>,
    pub a9: Peri<'d, PIN_9>,
    pub a10: Peri<'d, PIN_10>,
    pub a11: Peri<'d, PIN_11>,
    pub a12: Peri<'d, PIN_12>,
    pub a13: Peri<'d, PIN_13>,
    pub a14: Peri<'d, PIN_14>,
    pub a15: Peri<'d, PIN_15>,
    pub window_select: Peri<'d, PIN_16>,
    pub read_strobe: Peri<'d, PIN_17>,
}

/// PIO bus tap
///
/// Captures one FIFO word per ROM read. Callers usually want
/// [`Self::next_trap`], which skips ordinary fetches and yields only
/// command-window addresses.
pub struct PioBusTap<'d, PIO: Instance, const SM: usize> {
    sm: StateMachine<'d, PIO, SM>,
}

impl<'d, PIO: Instance, const SM: usize> PioBusTap<'d, PIO, SM> {
    /// Create a new bus tap and start capturing
    ///
    /// # Arguments
    /// * `common` - PIO common resources (for loading the program)
    /// * `sm` - State machine to use
    /// * `pins` - The 18-pin capture window
    pub fn new(
        common: &mut Common<'d, PIO>,
        mut sm: StateMachine<'d, PIO, SM>,
        pins: BusTapPins<'d>,
    ) -> Self {
        // Capture program: block on the strobe, shift in 17 bits, autopush
        let prg = pio::pio_asm!(
            ".wrap_target",
            "wait 0 pin, 17", // read strobe asserts (active low)
            "in pins, 17",    // capture A0-A15 plus the window select
            "wait 1 pin, 17", // hold until the strobe releases
            ".wrap"
        );

        let installed = common.load_program(&prg.program);

        let a0 = common.make_pio_pin(pins.a0);
        let a1 = common.make_pio_pin(pins.a1);
        let a2 = common.make_pio_pin(pins.a2);
        let a3 = common.make_pio_pin(pins.a3);
        let a4 = common.make_pio_pin(pins.a4);
        let a5 = common.make_pio_pin(pins.a5);
        let a6 = common.make_pio_pin(pins.a6);
        let a7 = common.make_pio_pin(pins.a7);
        let a8 = common.make_pio_pin(pins.a8);
        let a9 = common.make_pio_pin(pins.a9);
        let a10 = common.make_pio_pin(pins.a10);
        let a11 = common.make_pio_pin(pins.a11);
        let a12 = common.make_pio_pin(pins.a12);
        let a13 = common.make_pio_pin(pins.a13);
        let a14 = common.make_pio_pin(pins.a14);
        let a15 = common.make_pio_pin(pins.a15);
        let window_select = common.make_pio_pin(pins.window_select);
        let read_strobe = common.make_pio_pin(pins.read_strobe);

        let in_pins = [
            &a0, &a1, &a2, &a3, &a4, &a5, &a6, &a7, &a8, &a9, &a10, &a11, &a12, &a13, &a14, &a15,
            &window_select, &read_strobe,
        ];

        let mut cfg = Config::default();
        cfg.use_program(&installed, &[]);
        cfg.set_in_pins(&in_pins);
        cfg.shift_in = ShiftConfig {
            auto_fill: true,
            threshold: CAPTURE_BITS,
            direction: ShiftDirection::Left,
        };
        // TX side is unused; join both FIFOs for capture depth
        cfg.fifo_join = FifoJoin::RxOnly;

        sm.set_config(&cfg);
        sm.set_pin_dirs(PioDirection::In, &in_pins);
        sm.set_enable(true);

        Self { sm }
    }

    /// Wait for the next command-window read
    ///
    /// Ordinary ROM fetches are consumed and dropped here.
    pub async fn next_trap(&mut self) -> u16 {
        loop {
            let capture = self.sm.rx().wait_pull().await;
            if let Some(word) = trap_word(capture) {
                return word;
            }
        }
    }

    /// Whether captures were dropped to a full RX FIFO, clearing the flag
    pub fn take_fifo_overrun(&mut self) -> bool {
        // embassy-rp's `stalled()` reads FDEBUG.RXSTALL and clears it when set
        self.sm.rx().stalled()
    }
}
