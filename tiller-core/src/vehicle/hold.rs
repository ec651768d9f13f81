//! Hill hold
//!
//! Braking on a slope while driving arms a stop request; once the
//! vehicle is stationary the mode latches to HoldUp or HoldDown and
//! only positive throttle releases it, restoring the mode that was
//! active before the hold.

use tiller_protocol::RideMode;

use super::drive::DriveState;

/// Uphill pitch at or above which hold can engage (degrees)
pub const INCLINE_THRESHOLD: i16 = 10;

/// Downhill pitch at or below which hold can engage (degrees)
pub const DECLINE_THRESHOLD: i16 = -10;

/// Hill-hold state machine
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HillHold {
    active: bool,
    brake_requested: bool,
    previous_mode: RideMode,
}

impl Default for HillHold {
    fn default() -> Self {
        Self {
            active: false,
            brake_requested: false,
            previous_mode: RideMode::Forward,
        }
    }
}

impl HillHold {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while the vehicle is being held on a slope
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Run one hold-processing call against the current drive state
    pub fn update(&mut self, drive: &mut DriveState, brake: bool, pitch: i16, throttle: i8) {
        // Arm: braking on a slope while driving forces the vehicle to a stop
        if drive.mode.is_drive() && brake && !self.active {
            if pitch >= INCLINE_THRESHOLD || pitch <= DECLINE_THRESHOLD {
                drive.speed_kph = 0;
                self.brake_requested = true;
                self.previous_mode = drive.mode;
            }
        }

        // Latch: once stationary, hold in the slope direction
        if self.brake_requested && drive.speed_kph == 0 {
            if pitch >= INCLINE_THRESHOLD {
                drive.mode = RideMode::HoldUp;
            } else if pitch <= DECLINE_THRESHOLD {
                drive.mode = RideMode::HoldDown;
            }

            self.active = true;
            self.brake_requested = false;
        }

        // Release: only throttle input lets the vehicle move again
        if self.active && throttle > 0 {
            drive.mode = self.previous_mode;
            self.active = false;
        }

        // Failsafe: a hold mode with a Neutral history is inconsistent;
        // repair to Neutral rather than stay stuck
        if drive.mode.is_hold() && self.previous_mode == RideMode::Neutral {
            drive.mode = RideMode::Neutral;
            self.active = false;
            self.brake_requested = false;
        }
    }
}
