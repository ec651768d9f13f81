//! Inbound frame decoding
//!
//! Two frames arrive from the rider controls and the attitude sensor unit:
//!
//! - 0x300 carries the rider signals, one byte per signal
//! - 0x301 echoes drive state and carries roll/pitch/yaw, one signed byte
//!   each at offsets 2, 4 and 6

use crate::frame::CanFrame;

/// Identifier of the inbound rider-signal frame
pub const SIGNALS_ID: u16 = 0x300;

/// Identifier of the inbound attitude frame
pub const ATTITUDE_ID: u16 = 0x301;

/// Minimum DLC of a rider-signal frame (bytes 0..=5 are used)
const SIGNALS_MIN_DLC: usize = 6;

/// Minimum DLC of an attitude frame (bytes 0..=6 are used)
const ATTITUDE_MIN_DLC: usize = 7;

/// Errors that can occur while decoding an inbound frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Frame identifier does not match the expected message
    UnexpectedId,
    /// Frame is shorter than the message layout requires
    ShortFrame,
}

/// Indicator stalk position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndicatorSwitch {
    /// Stalk released, no direction selected
    #[default]
    Center,
    /// Left turn selected
    Left,
    /// Right turn selected
    Right,
}

impl IndicatorSwitch {
    /// Decode a raw stalk byte; unknown codes read as `Center`
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0x01 => IndicatorSwitch::Left,
            0x02 => IndicatorSwitch::Right,
            _ => IndicatorSwitch::Center,
        }
    }
}

/// Rider signals decoded from a 0x300 frame
///
/// Overwritten wholesale on every new frame; no history is kept here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VehicleSignals {
    /// Horn button held
    pub horn: bool,
    /// Brake lever pulled
    pub brake: bool,
    /// Indicator stalk position
    pub indicator: IndicatorSwitch,
    /// Throttle position; 0-127 meaningful, negative values are ignored
    pub throttle: i8,
    /// Sidestand deployed
    pub sidestand_engaged: bool,
    /// Start button held
    pub start_button: bool,
}

impl VehicleSignals {
    /// Decode the rider-signal frame
    pub fn decode(frame: &CanFrame) -> Result<Self, DecodeError> {
        if frame.id != SIGNALS_ID {
            return Err(DecodeError::UnexpectedId);
        }
        if frame.dlc() < SIGNALS_MIN_DLC {
            return Err(DecodeError::ShortFrame);
        }

        Ok(Self {
            horn: frame.data[0] != 0,
            brake: frame.data[1] != 0,
            indicator: IndicatorSwitch::from_raw(frame.data[2]),
            throttle: frame.data[3] as i8,
            sidestand_engaged: frame.data[4] != 0,
            start_button: frame.data[5] != 0,
        })
    }
}

/// Attitude and drive-state echo decoded from a 0x301 frame
///
/// The angle bytes are sign-extended so downhill pitch reads negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AttitudeReport {
    /// Ride mode as reported back by the peer
    pub mode_echo: u8,
    /// Vehicle speed as reported back by the peer (km/h)
    pub speed_echo: u8,
    /// Roll angle (degrees)
    pub roll: i16,
    /// Pitch angle (degrees); positive uphill, negative downhill
    pub pitch: i16,
    /// Yaw angle (degrees)
    pub yaw: i16,
}

impl AttitudeReport {
    /// Decode the attitude frame
    pub fn decode(frame: &CanFrame) -> Result<Self, DecodeError> {
        if frame.id != ATTITUDE_ID {
            return Err(DecodeError::UnexpectedId);
        }
        if frame.dlc() < ATTITUDE_MIN_DLC {
            return Err(DecodeError::ShortFrame);
        }

        Ok(Self {
            mode_echo: frame.data[0],
            speed_echo: frame.data[1],
            roll: frame.data[2] as i8 as i16,
            pitch: frame.data[4] as i8 as i16,
            yaw: frame.data[6] as i8 as i16,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals_frame(bytes: &[u8]) -> CanFrame {
        CanFrame::new(SIGNALS_ID, bytes).unwrap()
    }

    #[test]
    fn test_decode_signals() {
        let frame = signals_frame(&[1, 1, 0x02, 10, 0, 0]);
        let signals = VehicleSignals::decode(&frame).unwrap();

        assert!(signals.horn);
        assert!(signals.brake);
        assert_eq!(signals.indicator, IndicatorSwitch::Right);
        assert_eq!(signals.throttle, 10);
        assert!(!signals.sidestand_engaged);
        assert!(!signals.start_button);
    }

    #[test]
    fn test_decode_signals_all_idle() {
        let frame = signals_frame(&[0; 6]);
        let signals = VehicleSignals::decode(&frame).unwrap();
        assert_eq!(signals, VehicleSignals::default());
    }

    #[test]
    fn test_nonzero_bytes_read_as_true() {
        let frame = signals_frame(&[0xFF, 7, 0, 0, 3, 1]);
        let signals = VehicleSignals::decode(&frame).unwrap();
        assert!(signals.horn);
        assert!(signals.brake);
        assert!(signals.sidestand_engaged);
        assert!(signals.start_button);
    }

    #[test]
    fn test_unknown_indicator_code_reads_center() {
        let frame = signals_frame(&[0, 0, 0x03, 0, 0, 0]);
        let signals = VehicleSignals::decode(&frame).unwrap();
        assert_eq!(signals.indicator, IndicatorSwitch::Center);
    }

    #[test]
    fn test_signals_wrong_id() {
        let frame = CanFrame::new(ATTITUDE_ID, &[0; 6]).unwrap();
        assert_eq!(
            VehicleSignals::decode(&frame),
            Err(DecodeError::UnexpectedId)
        );
    }

    #[test]
    fn test_signals_short_frame() {
        let frame = signals_frame(&[0; 5]);
        assert_eq!(VehicleSignals::decode(&frame), Err(DecodeError::ShortFrame));
    }

    #[test]
    fn test_decode_attitude() {
        // pitch byte 0xF4 = -12 once sign-extended
        let frame = CanFrame::new(ATTITUDE_ID, &[1, 5, 2, 0, 0xF4, 0, 30, 0]).unwrap();
        let report = AttitudeReport::decode(&frame).unwrap();

        assert_eq!(report.mode_echo, 1);
        assert_eq!(report.speed_echo, 5);
        assert_eq!(report.roll, 2);
        assert_eq!(report.pitch, -12);
        assert_eq!(report.yaw, 30);
    }

    #[test]
    fn test_attitude_short_frame() {
        let frame = CanFrame::new(ATTITUDE_ID, &[0; 6]).unwrap();
        assert_eq!(AttitudeReport::decode(&frame), Err(DecodeError::ShortFrame));
    }
}
