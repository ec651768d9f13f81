//! CAN application protocol for the Tiller vehicle control unit
//!
//! This crate defines the small fixed protocol spoken on the vehicle bus:
//! classic CAN frames with 11-bit identifiers and up to 8 data bytes.
//!
//! # Message map
//!
//! ```text
//! ┌───────┬─────┬──────────────────────────────────────────────────────┐
//! │ ID    │ Dir │ Contents                                             │
//! ├───────┼─────┼──────────────────────────────────────────────────────┤
//! │ 0x300 │ Rx  │ rider signals: horn, brake, indicator, throttle,     │
//! │       │     │ sidestand, start button                              │
//! │ 0x301 │ Rx  │ attitude echo: mode, speed, roll, pitch, yaw         │
//! │ 0x305 │ Tx  │ status: 0x01 horn / 0x03 brake / 0x04 indicator      │
//! │ 0x306 │ Tx  │ drive status: ride mode, speed (km/h)                │
//! │ 0x400 │ Tx  │ heartbeat, fixed 0x55/0xAA pattern                   │
//! └───────┴─────┴──────────────────────────────────────────────────────┘
//! ```
//!
//! Decoding produces typed signal structs; encoding produces ready-to-send
//! [`CanFrame`] values. All transport concerns (queues, interrupts, bus-off)
//! live behind the `tiller-core` transport trait.

#![no_std]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;
pub mod signals;

pub use frame::{CanFrame, FrameError, MAX_DLC, STANDARD_ID_MAX};
pub use messages::{
    heartbeat, DriveStatus, IndicatorLamp, RideMode, StatusMessage, DRIVE_STATUS_ID, HEARTBEAT_ID,
    STATUS_ID,
};
pub use signals::{
    AttitudeReport, DecodeError, IndicatorSwitch, VehicleSignals, ATTITUDE_ID, SIGNALS_ID,
};
