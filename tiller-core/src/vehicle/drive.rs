//! Ride mode and speed
//!
//! `DriveState` is the pair reported on the 0x306 frame. `ModeToggle`
//! turns start-button presses into mode changes; `SpeedControl` derives
//! the speed from throttle and mode each call and owns the sidestand
//! immobilization latch.

use tiller_protocol::{RideMode, VehicleSignals};

/// Speed commanded while driving forward with throttle applied (km/h)
pub const FORWARD_SPEED_KPH: u8 = 5;

/// Speed commanded while reversing with throttle applied (km/h)
pub const REVERSE_SPEED_KPH: u8 = 3;

/// Current drive direction and speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriveState {
    /// Drive direction; starts in Neutral
    pub mode: RideMode,
    /// Speed in km/h; always recomputed before transmit
    pub speed_kph: u8,
}

/// Start-button press handling
///
/// From Neutral, successive presses alternate Reverse, Forward, Reverse…;
/// from Forward or Reverse a press returns to Neutral. Presses are
/// ignored while hill hold is active, which is what keeps the hold modes
/// unreachable and unexitable from the button.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeToggle {
    next_is_reverse: bool,
}

impl Default for ModeToggle {
    fn default() -> Self {
        // First press out of Neutral selects Reverse
        Self {
            next_is_reverse: true,
        }
    }
}

impl ModeToggle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one rising edge of the start button
    pub fn on_press(&mut self, drive: &mut DriveState, hold_active: bool) {
        if hold_active {
            return;
        }

        if drive.mode == RideMode::Neutral {
            drive.mode = if self.next_is_reverse {
                RideMode::Reverse
            } else {
                RideMode::Forward
            };
            self.next_is_reverse = !self.next_is_reverse;
        } else {
            drive.mode = RideMode::Neutral;
        }
    }
}

/// Per-call speed derivation with the sidestand latch
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpeedControl {
    sidestand_stop: bool,
}

impl SpeedControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute speed (and possibly force Neutral) from the current
    /// signals. Deterministic for constant input: no hidden accumulation.
    pub fn update(&mut self, drive: &mut DriveState, signals: &VehicleSignals) {
        if signals.sidestand_engaged && signals.throttle == 0 {
            drive.speed_kph = 0;
            drive.mode = RideMode::Neutral;
            self.sidestand_stop = true;
        } else if !signals.sidestand_engaged || signals.throttle > 0 {
            self.sidestand_stop = false;

            if signals.throttle > 0 {
                drive.speed_kph = match drive.mode {
                    RideMode::Forward => FORWARD_SPEED_KPH,
                    RideMode::Reverse => REVERSE_SPEED_KPH,
                    _ => 0,
                };
            } else {
                drive.speed_kph = 0;
            }
        }

        // Latch re-assertion: covers the call on which the latch was set
        if self.sidestand_stop {
            drive.speed_kph = 0;
            drive.mode = RideMode::Neutral;
        }
    }
}
