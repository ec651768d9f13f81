//! Vehicle control orchestration
//!
//! [`VehicleControl`] owns the decoded signal shadow, every state-machine
//! piece and the bus-off recovery driver. One `poll` call performs, in
//! order: recovery, receive drain, and (when any frame arrived since the
//! last call) the fixed dispatch sequence. The dispatch order is part of
//! the bus contract: observers see horn, brake and indicator status
//! before the drive-status frame within the same pass.

use tiller_protocol::{
    AttitudeReport, CanFrame, DriveStatus, StatusMessage, VehicleSignals, ATTITUDE_ID, SIGNALS_ID,
};

use crate::config::CanBusConfig;
use crate::recovery::BusOffRecovery;
use crate::traits::{CanTransport, TransportError};

use super::drive::{DriveState, ModeToggle, SpeedControl};
use super::hold::HillHold;
use super::indicator::IndicatorBlink;

/// Diagnostic counters, snapshot via [`VehicleControl::stats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStats {
    /// Completed bus-off deinit+init cycles
    pub bus_off_recoveries: u32,
    /// Outbound frames dropped because the transport refused them
    pub send_failures: u32,
    /// Inbound frames that failed to decode
    pub decode_errors: u32,
    /// Recovery attempts that themselves failed
    pub recovery_failures: u32,
}

/// The vehicle-control state machine and its collaborator glue
#[derive(Debug)]
pub struct VehicleControl {
    config: CanBusConfig,
    signals: VehicleSignals,
    attitude: AttitudeReport,
    msg_received: bool,
    prev_start_button: bool,
    blink: IndicatorBlink,
    toggle: ModeToggle,
    speed: SpeedControl,
    hold: HillHold,
    drive: DriveState,
    recovery: BusOffRecovery,
    send_failures: u32,
    decode_errors: u32,
    recovery_failures: u32,
}

impl VehicleControl {
    /// Create a controller in Neutral with everything idle.
    ///
    /// `config` must be the configuration the transport was initialized
    /// with; it is replayed verbatim during bus-off recovery.
    pub fn new(config: CanBusConfig) -> Self {
        Self {
            config,
            signals: VehicleSignals::default(),
            attitude: AttitudeReport::default(),
            msg_received: false,
            prev_start_button: false,
            blink: IndicatorBlink::new(),
            toggle: ModeToggle::new(),
            speed: SpeedControl::new(),
            hold: HillHold::new(),
            drive: DriveState::default(),
            recovery: BusOffRecovery::new(),
            send_failures: 0,
            decode_errors: 0,
            recovery_failures: 0,
        }
    }

    /// Current drive state (mode and speed)
    pub fn drive(&self) -> DriveState {
        self.drive
    }

    /// Most recently decoded rider signals
    pub fn signals(&self) -> &VehicleSignals {
        &self.signals
    }

    /// Most recently decoded attitude report
    pub fn attitude(&self) -> &AttitudeReport {
        &self.attitude
    }

    /// Diagnostic counter snapshot
    pub fn stats(&self) -> LinkStats {
        LinkStats {
            bus_off_recoveries: self.recovery.recoveries(),
            send_failures: self.send_failures,
            decode_errors: self.decode_errors,
            recovery_failures: self.recovery_failures,
        }
    }

    /// Record a failed recovery attempt observed by the caller
    pub fn note_recovery_failure(&mut self) {
        self.recovery_failures += 1;
    }

    /// Record a dropped outbound frame observed by the caller
    pub fn note_send_failure(&mut self) {
        self.send_failures += 1;
    }

    /// One application iteration: recover the link if needed, drain the
    /// receive queue, and run the dispatch sequence when anything arrived.
    pub fn poll<T: CanTransport>(&mut self, can: &mut T) -> Result<(), TransportError> {
        self.recovery.poll(can, &self.config)?;

        while let Some(frame) = can.try_receive() {
            self.ingest(&frame);
        }

        if self.msg_received {
            self.msg_received = false;
            self.dispatch(can);
        }

        Ok(())
    }

    /// Hill-hold processing: separate entry point, scheduled by the
    /// integrator as its own task. Always transmits the drive status.
    pub fn process_hold<T: CanTransport>(&mut self, can: &mut T) {
        self.hold.update(
            &mut self.drive,
            self.signals.brake,
            self.attitude.pitch,
            self.signals.throttle,
        );

        let status = self.drive_status();
        self.transmit(can, &status.encode());
    }

    fn ingest(&mut self, frame: &CanFrame) {
        // Any accepted frame triggers a dispatch pass, even when only the
        // attitude echo arrived; the previous signals are reused then.
        self.msg_received = true;

        match frame.id {
            SIGNALS_ID => match VehicleSignals::decode(frame) {
                Ok(signals) => self.signals = signals,
                Err(_) => self.decode_errors += 1,
            },
            ATTITUDE_ID => match AttitudeReport::decode(frame) {
                Ok(attitude) => self.attitude = attitude,
                Err(_) => self.decode_errors += 1,
            },
            _ => {}
        }
    }

    fn dispatch<T: CanTransport>(&mut self, can: &mut T) {
        self.transmit(can, &StatusMessage::Horn(self.signals.horn).encode());
        self.transmit(can, &StatusMessage::Brake(self.signals.brake).encode());

        if let Some(lamp) = self.blink.update(self.signals.indicator) {
            self.transmit(can, &StatusMessage::Indicator(lamp).encode());
        }

        if self.signals.start_button && !self.prev_start_button {
            self.toggle.on_press(&mut self.drive, self.hold.is_active());
        }
        self.prev_start_button = self.signals.start_button;

        self.speed.update(&mut self.drive, &self.signals);

        let status = self.drive_status();
        self.transmit(can, &status.encode());
    }

    fn drive_status(&self) -> DriveStatus {
        DriveStatus {
            mode: self.drive.mode,
            speed_kph: self.drive.speed_kph,
        }
    }

    /// Send with the documented drop policy: a refused frame is counted
    /// and the dispatch continues; the next pass retransmits fresh state.
    fn transmit<T: CanTransport>(&mut self, can: &mut T, frame: &CanFrame) {
        if can.send(frame).is_err() {
            self.note_send_failure();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use crate::traits::LinkStatus;
    use tiller_protocol::{RideMode, DRIVE_STATUS_ID, STATUS_ID};

    fn controller() -> VehicleControl {
        VehicleControl::new(CanBusConfig::default())
    }

    fn signals_frame(bytes: [u8; 6]) -> CanFrame {
        CanFrame::new(SIGNALS_ID, &bytes).unwrap()
    }

    #[test]
    fn test_no_frames_no_dispatch() {
        let mut ctrl = controller();
        let mut can = MockTransport::new();

        ctrl.poll(&mut can).unwrap();
        assert!(can.sent.is_empty());
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut ctrl = controller();
        let mut can = MockTransport::new();

        // Ride forward, then receive horn+brake+right-indicator+throttle
        ctrl.drive.mode = RideMode::Forward;
        can.push_rx(signals_frame([1, 1, 0x02, 10, 0, 0]));

        ctrl.poll(&mut can).unwrap();

        assert_eq!(can.sent.len(), 4);

        assert_eq!(can.sent[0].id, STATUS_ID);
        assert_eq!(&can.sent[0].data[..], &[0x01, 0x01]); // horn on

        assert_eq!(can.sent[1].id, STATUS_ID);
        assert_eq!(&can.sent[1].data[..], &[0x03, 0x02]); // brake on

        assert_eq!(can.sent[2].id, STATUS_ID);
        assert_eq!(can.sent[2].data[0], 0x04); // indicator, phase-dependent
        assert!(can.sent[2].data[1] == 0x00 || can.sent[2].data[1] == 0x02);

        assert_eq!(can.sent[3].id, DRIVE_STATUS_ID);
        assert_eq!(&can.sent[3].data[..], &[1, 5]); // Forward, 5 km/h

        // No start edge, so the mode is untouched
        assert_eq!(ctrl.drive().mode, RideMode::Forward);
    }

    #[test]
    fn test_start_button_edge_toggles_mode() {
        let mut ctrl = controller();
        let mut can = MockTransport::new();

        // Rising edge: Neutral -> Reverse
        can.push_rx(signals_frame([0, 0, 0, 0, 0, 1]));
        ctrl.poll(&mut can).unwrap();
        assert_eq!(ctrl.drive().mode, RideMode::Reverse);

        // Button held: no new edge, mode stays
        can.push_rx(signals_frame([0, 0, 0, 0, 0, 1]));
        ctrl.poll(&mut can).unwrap();
        assert_eq!(ctrl.drive().mode, RideMode::Reverse);

        // Release, then press again: Reverse -> Neutral
        can.push_rx(signals_frame([0, 0, 0, 0, 0, 0]));
        ctrl.poll(&mut can).unwrap();
        can.push_rx(signals_frame([0, 0, 0, 0, 0, 1]));
        ctrl.poll(&mut can).unwrap();
        assert_eq!(ctrl.drive().mode, RideMode::Neutral);

        // Next press from Neutral alternates to Forward
        can.push_rx(signals_frame([0, 0, 0, 0, 0, 0]));
        ctrl.poll(&mut can).unwrap();
        can.push_rx(signals_frame([0, 0, 0, 0, 0, 1]));
        ctrl.poll(&mut can).unwrap();
        assert_eq!(ctrl.drive().mode, RideMode::Forward);
    }

    #[test]
    fn test_attitude_frame_triggers_dispatch() {
        let mut ctrl = controller();
        let mut can = MockTransport::new();

        // Only the attitude echo arrives; dispatch still runs on the
        // previous (default) signals
        can.push_rx(CanFrame::new(ATTITUDE_ID, &[0, 0, 0, 0, 15, 0, 0, 0]).unwrap());
        ctrl.poll(&mut can).unwrap();

        assert_eq!(ctrl.attitude().pitch, 15);
        assert_eq!(can.sent.len(), 4);
        assert_eq!(&can.sent[0].data[..], &[0x01, 0x00]); // horn off
    }

    #[test]
    fn test_short_frame_counts_decode_error() {
        let mut ctrl = controller();
        let mut can = MockTransport::new();

        can.push_rx(CanFrame::new(SIGNALS_ID, &[1, 1]).unwrap());
        ctrl.poll(&mut can).unwrap();

        assert_eq!(ctrl.stats().decode_errors, 1);
        // The malformed frame still triggered a pass on the old signals
        assert_eq!(can.sent.len(), 4);
        assert!(!ctrl.signals().horn);
    }

    #[test]
    fn test_bus_off_recovered_before_processing() {
        let mut ctrl = controller();
        let mut can = MockTransport::new();

        can.link = LinkStatus::BusOff;
        can.push_rx(signals_frame([0, 0, 0, 0, 0, 0]));

        ctrl.poll(&mut can).unwrap();

        assert_eq!(can.deinit_calls, 1);
        assert_eq!(can.init_calls, 1);
        assert_eq!(ctrl.stats().bus_off_recoveries, 1);
        // Frame processing still happened on the same pass
        assert_eq!(can.sent.len(), 4);

        // Clean link: no further recovery
        ctrl.poll(&mut can).unwrap();
        assert_eq!(can.init_calls, 1);
    }

    #[test]
    fn test_send_failures_counted_not_fatal() {
        let mut ctrl = controller();
        let mut can = MockTransport::new();
        can.fail_sends = true;

        can.push_rx(signals_frame([1, 0, 0, 0, 0, 0]));
        ctrl.poll(&mut can).unwrap();

        // All four dispatch sends were attempted and counted
        assert_eq!(ctrl.stats().send_failures, 4);
    }

    #[test]
    fn test_sidestand_immobilizes_via_frames() {
        let mut ctrl = controller();
        let mut can = MockTransport::new();
        ctrl.drive.mode = RideMode::Forward;

        can.push_rx(signals_frame([0, 0, 0, 0, 1, 0]));
        ctrl.poll(&mut can).unwrap();

        assert_eq!(ctrl.drive().mode, RideMode::Neutral);
        assert_eq!(ctrl.drive().speed_kph, 0);
        let last = can.sent.last().unwrap();
        assert_eq!(last.id, DRIVE_STATUS_ID);
        assert_eq!(&last.data[..], &[0, 0]);
    }

    #[test]
    fn test_process_hold_full_cycle() {
        let mut ctrl = controller();
        let mut can = MockTransport::new();

        // Drive forward, then brake on a 15-degree incline
        ctrl.drive.mode = RideMode::Forward;
        ctrl.drive.speed_kph = 5;
        can.push_rx(CanFrame::new(ATTITUDE_ID, &[1, 5, 0, 0, 15, 0, 0, 0]).unwrap());
        can.push_rx(signals_frame([0, 1, 0, 0, 0, 0]));
        ctrl.poll(&mut can).unwrap();

        ctrl.process_hold(&mut can);
        assert_eq!(ctrl.drive().mode, RideMode::HoldUp);

        let held = can.sent.last().unwrap();
        assert_eq!(held.id, DRIVE_STATUS_ID);
        assert_eq!(held.data[0], RideMode::HoldUp as u8);

        // Throttle releases the hold and restores Forward
        can.push_rx(signals_frame([0, 0, 0, 10, 0, 0]));
        ctrl.poll(&mut can).unwrap();
        ctrl.process_hold(&mut can);
        assert_eq!(ctrl.drive().mode, RideMode::Forward);

        assert!(!ctrl.hold.is_active());
    }

    #[test]
    fn test_start_press_ignored_while_held() {
        let mut ctrl = controller();
        let mut can = MockTransport::new();

        ctrl.drive.mode = RideMode::Forward;
        ctrl.drive.speed_kph = 5;
        can.push_rx(CanFrame::new(ATTITUDE_ID, &[1, 5, 0, 0, 15, 0, 0, 0]).unwrap());
        can.push_rx(signals_frame([0, 1, 0, 0, 0, 0]));
        ctrl.poll(&mut can).unwrap();
        ctrl.process_hold(&mut can);
        assert_eq!(ctrl.drive().mode, RideMode::HoldUp);

        // Press the start button while held: mode must not change
        can.push_rx(signals_frame([0, 1, 0, 0, 0, 1]));
        ctrl.poll(&mut can).unwrap();
        assert_eq!(ctrl.drive().mode, RideMode::HoldUp);
    }
}
