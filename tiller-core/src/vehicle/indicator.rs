//! Indicator blink state machine
//!
//! The lamp is a slow oscillator gated by stalk activity: while a
//! direction is (or was most recently) selected, an internal counter
//! toggles the lamp every [`BLINK_DIVIDER`] processing calls. At the
//! nominal 100 ms call cadence that is a 300 ms half-period.

use tiller_protocol::{IndicatorLamp, IndicatorSwitch};

/// Processing calls per lamp toggle
pub const BLINK_DIVIDER: u8 = 3;

/// Persisted blink state, one instance per vehicle
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndicatorBlink {
    lamp_on: bool,
    ticks: u8,
    active: bool,
    last_direction: IndicatorSwitch,
}

impl IndicatorBlink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the oscillator one processing call and produce the lamp
    /// command to transmit, if any.
    ///
    /// Returns `None` in exactly one case: the lamp-on phase was reached
    /// with no recorded direction. That combination indicates stale
    /// state and nothing is sent for it.
    pub fn update(&mut self, stalk: IndicatorSwitch) -> Option<IndicatorLamp> {
        // A released stalk keeps the last direction blinking
        if stalk == IndicatorSwitch::Center && self.last_direction != IndicatorSwitch::Center {
            self.active = true;
        }

        if stalk != IndicatorSwitch::Center {
            self.last_direction = stalk;
            self.active = true;
        }

        if self.active {
            self.ticks += 1;
            if self.ticks >= BLINK_DIVIDER {
                self.ticks = 0;
                self.lamp_on = !self.lamp_on;
            }
        }

        let lamp = if self.lamp_on {
            // Stale-state guard: on-phase with no direction recorded
            IndicatorLamp::for_direction(self.last_direction)?
        } else {
            IndicatorLamp::Off
        };

        if stalk == IndicatorSwitch::Center {
            self.active = false;
        }

        Some(lamp)
    }
}
