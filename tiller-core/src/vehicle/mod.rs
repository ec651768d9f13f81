//! Vehicle state machine
//!
//! Decodes inbound rider signals into behavior and status frames. All
//! persisted state lives in explicit structs owned by
//! [`controller::VehicleControl`]; every update is a deterministic
//! per-call function of the current signals and that state.

pub mod controller;
pub mod drive;
pub mod hold;
pub mod indicator;

pub use controller::{LinkStats, VehicleControl};
pub use drive::{DriveState, ModeToggle, SpeedControl, FORWARD_SPEED_KPH, REVERSE_SPEED_KPH};
pub use hold::{HillHold, DECLINE_THRESHOLD, INCLINE_THRESHOLD};
pub use indicator::{IndicatorBlink, BLINK_DIVIDER};
