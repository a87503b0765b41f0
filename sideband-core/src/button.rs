//! SELECT button debounce and press classification
//!
//! Poll-driven: the watch loop samples the button at a fixed period and
//! feeds each sample here with a timestamp. A press only counts once the
//! pin has held its new state for the debounce interval, and a press is
//! classified on the stable release, not on the press itself. Press
//! duration is measured from the stable press; time spent bouncing on
//! release does not extend it.

/// A state must hold this long before a transition is accepted
pub const DEBOUNCE_MS: u64 = 50;

/// Hold threshold separating a short press from a long press
pub const LONG_PRESS_MS: u64 = 2000;

/// Suggested sampling period for the watch loop
pub const SAMPLE_PERIOD_MS: u64 = 100;

/// A classified SELECT button press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SelectPress {
    Short,
    Long,
}

#[derive(Debug, Clone, Copy)]
enum TrackState {
    Released,
    PressPending { since_ms: u64 },
    Held { held_since_ms: u64, long_latched: bool },
    ReleasePending { since_ms: u64, long_latched: bool },
}

/// Debounced press classifier fed by periodic samples
pub struct PressTracker {
    state: TrackState,
    debounce_ms: u64,
    long_press_ms: u64,
}

impl PressTracker {
    /// Tracker with the stock thresholds
    pub const fn new() -> Self {
        Self::with_thresholds(DEBOUNCE_MS, LONG_PRESS_MS)
    }

    pub const fn with_thresholds(debounce_ms: u64, long_press_ms: u64) -> Self {
        Self {
            state: TrackState::Released,
            debounce_ms,
            long_press_ms,
        }
    }

    /// Feed one sample
    ///
    /// `now_ms` must be monotonic across calls. Returns the classified
    /// press when a stable release ends one.
    pub fn update(&mut self, now_ms: u64, pressed: bool) -> Option<SelectPress> {
        match self.state {
            TrackState::Released => {
                if pressed {
                    self.state = TrackState::PressPending { since_ms: now_ms };
                }
                None
            }
            TrackState::PressPending { since_ms } => {
                if !pressed {
                    self.state = TrackState::Released;
                } else if now_ms - since_ms >= self.debounce_ms {
                    self.state = TrackState::Held {
                        held_since_ms: now_ms,
                        long_latched: false,
                    };
                }
                None
            }
            TrackState::Held {
                held_since_ms,
                long_latched,
            } => {
                if pressed {
                    if !long_latched && now_ms - held_since_ms >= self.long_press_ms {
                        self.state = TrackState::Held {
                            held_since_ms,
                            long_latched: true,
                        };
                    }
                } else {
                    self.state = TrackState::ReleasePending {
                        since_ms: now_ms,
                        long_latched: long_latched
                            || now_ms - held_since_ms >= self.long_press_ms,
                    };
                }
                None
            }
            TrackState::ReleasePending {
                since_ms,
                long_latched,
            } => {
                if pressed {
                    // Bounce during release; the duration is already frozen
                    self.state = TrackState::ReleasePending {
                        since_ms: now_ms,
                        long_latched,
                    };
                    None
                } else if now_ms - since_ms >= self.debounce_ms {
                    self.state = TrackState::Released;
                    Some(if long_latched {
                        SelectPress::Long
                    } else {
                        SelectPress::Short
                    })
                } else {
                    None
                }
            }
        }
    }
}

impl Default for PressTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(tracker: &mut PressTracker, samples: &[(u64, bool)]) -> Option<SelectPress> {
        let mut result = None;
        for &(now, pressed) in samples {
            if let Some(press) = tracker.update(now, pressed) {
                assert!(result.is_none(), "press reported twice");
                result = Some(press);
            }
        }
        result
    }

    #[test]
    fn short_press_classifies_on_stable_release() {
        let mut tracker = PressTracker::new();
        let press = feed(
            &mut tracker,
            &[
                (0, true),
                (50, true),    // stable press
                (150, true),
                (300, false),  // release observed
                (350, false),  // stable release
            ],
        );
        assert_eq!(press, Some(SelectPress::Short));
    }

    #[test]
    fn long_hold_latches_at_threshold() {
        let mut tracker = PressTracker::new();
        let press = feed(
            &mut tracker,
            &[
                (0, true),
                (50, true),     // stable press, duration counts from here
                (1000, true),
                (2050, true),   // 2000ms held
                (2100, false),
                (2150, false),
            ],
        );
        assert_eq!(press, Some(SelectPress::Long));
    }

    #[test]
    fn bounce_shorter_than_debounce_is_rejected() {
        let mut tracker = PressTracker::new();
        let press = feed(&mut tracker, &[(0, true), (20, false), (70, false), (500, false)]);
        assert_eq!(press, None);
    }

    #[test]
    fn release_below_long_threshold_stays_short() {
        let mut tracker = PressTracker::new();
        // Released just before the latch would fire
        let press = feed(
            &mut tracker,
            &[(0, true), (50, true), (1950, true), (2040, false), (2100, false)],
        );
        assert_eq!(press, Some(SelectPress::Short));
    }

    #[test]
    fn release_bounce_does_not_extend_the_press() {
        let mut tracker = PressTracker::new();
        // Re-press during the release window keeps the frozen (short) class
        let press = feed(
            &mut tracker,
            &[
                (0, true),
                (50, true),
                (500, false),
                (520, true),   // bounce back
                (560, false),
                (620, false),  // stable release at last
            ],
        );
        assert_eq!(press, Some(SelectPress::Short));
    }

    #[test]
    fn nothing_fires_while_held() {
        let mut tracker = PressTracker::new();
        for now in 0..30u64 {
            assert_eq!(tracker.update(now * 100, true), None);
        }
    }
}
