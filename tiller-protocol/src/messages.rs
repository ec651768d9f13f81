//! Outbound frame encoding
//!
//! Status frames (0x305) share one identifier and are distinguished by a
//! tag byte; the drive-status frame (0x306) reports ride mode and speed;
//! the heartbeat (0x400) is a fixed pattern.

use heapless::Vec;

use crate::frame::CanFrame;
use crate::signals::IndicatorSwitch;

/// Identifier of the outbound status frame (horn/brake/indicator)
pub const STATUS_ID: u16 = 0x305;

/// Identifier of the outbound drive-status frame
pub const DRIVE_STATUS_ID: u16 = 0x306;

/// Identifier of the outbound heartbeat frame
pub const HEARTBEAT_ID: u16 = 0x400;

/// Tag byte of a horn status message
const TAG_HORN: u8 = 0x01;

/// Tag byte of a brake status message
const TAG_BRAKE: u8 = 0x03;

/// Tag byte of an indicator status message
const TAG_INDICATOR: u8 = 0x04;

/// Fixed heartbeat payload
const HEARTBEAT_PATTERN: [u8; 8] = [0x55, 0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x55, 0xAA];

/// Drive-direction state of the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RideMode {
    /// No drive direction engaged
    #[default]
    Neutral = 0,
    /// Forward drive
    Forward = 1,
    /// Reverse drive
    Reverse = 2,
    /// Held stationary facing uphill
    HoldUp = 3,
    /// Held stationary facing downhill
    HoldDown = 4,
}

impl RideMode {
    /// True for the directly rideable directions (Forward/Reverse)
    pub fn is_drive(self) -> bool {
        matches!(self, RideMode::Forward | RideMode::Reverse)
    }

    /// True while the vehicle is held on a slope
    pub fn is_hold(self) -> bool {
        matches!(self, RideMode::HoldUp | RideMode::HoldDown)
    }
}

/// Indicator lamp command as it appears on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndicatorLamp {
    /// Lamp dark (blink-off phase or no direction)
    Off,
    /// Left lamp lit
    Left,
    /// Right lamp lit
    Right,
}

impl IndicatorLamp {
    /// Lamp matching a stalk direction
    pub fn for_direction(direction: IndicatorSwitch) -> Option<Self> {
        match direction {
            IndicatorSwitch::Left => Some(IndicatorLamp::Left),
            IndicatorSwitch::Right => Some(IndicatorLamp::Right),
            IndicatorSwitch::Center => None,
        }
    }

    fn as_byte(self) -> u8 {
        match self {
            IndicatorLamp::Off => 0x00,
            IndicatorLamp::Left => 0x01,
            IndicatorLamp::Right => 0x02,
        }
    }
}

/// A tagged status message on the 0x305 identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusMessage {
    /// Horn on/off
    Horn(bool),
    /// Brake on/off
    Brake(bool),
    /// Indicator lamp command
    Indicator(IndicatorLamp),
}

impl StatusMessage {
    /// Encode into a ready-to-send frame
    pub fn encode(self) -> CanFrame {
        let (tag, value) = match self {
            StatusMessage::Horn(on) => (TAG_HORN, if on { 0x01 } else { 0x00 }),
            StatusMessage::Brake(on) => (TAG_BRAKE, if on { 0x02 } else { 0x00 }),
            StatusMessage::Indicator(lamp) => (TAG_INDICATOR, lamp.as_byte()),
        };

        let mut data = Vec::new();
        let _ = data.push(tag);
        let _ = data.push(value);
        CanFrame {
            id: STATUS_ID,
            data,
        }
    }
}

/// Ride mode and speed as transmitted on 0x306
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriveStatus {
    /// Current ride mode
    pub mode: RideMode,
    /// Current speed in km/h
    pub speed_kph: u8,
}

impl DriveStatus {
    /// Encode into a ready-to-send frame
    pub fn encode(self) -> CanFrame {
        let mut data = Vec::new();
        let _ = data.push(self.mode as u8);
        let _ = data.push(self.speed_kph);
        CanFrame {
            id: DRIVE_STATUS_ID,
            data,
        }
    }
}

/// The fixed keep-alive frame sent from the transmit pump
pub fn heartbeat() -> CanFrame {
    let mut data = Vec::new();
    let _ = data.extend_from_slice(&HEARTBEAT_PATTERN);
    CanFrame {
        id: HEARTBEAT_ID,
        data,
    }
}
