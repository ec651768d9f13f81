//! CAN transport trait
//!
//! The vehicle-control core never touches CAN hardware. It talks to a
//! transport that owns the controller, its queues and its interrupts, and
//! exposes the polling surface below. The transport latches a bus-off
//! condition into [`LinkStatus::BusOff`]; a successful [`CanTransport::init`]
//! returns the link to [`LinkStatus::Operational`].

use tiller_protocol::CanFrame;

use crate::config::CanBusConfig;

/// Errors surfaced by a transport operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Transmit path busy; the frame was not queued
    Busy,
    /// Controller or driver fault
    Hardware,
}

/// Health of the CAN link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkStatus {
    /// Link up, frames flowing
    #[default]
    Operational,
    /// Controller entered bus-off; reinitialization required
    BusOff,
}

/// A CAN controller with software transmit/receive queues.
pub trait CanTransport {
    /// Queue a frame for transmission
    fn send(&mut self, frame: &CanFrame) -> Result<(), TransportError>;

    /// Fetch the next received frame, if any
    fn try_receive(&mut self) -> Option<CanFrame>;

    /// True while the hardware transmit mailbox is draining
    fn is_tx_busy(&self) -> bool;

    /// Current link health; `BusOff` stays latched until `init` succeeds
    fn status(&self) -> LinkStatus;

    /// Move frames between the software queues and the controller.
    /// Called every loop pass from the always-run task.
    fn service(&mut self) {}

    /// Shut the controller down; first half of bus-off recovery
    fn deinit(&mut self) -> Result<(), TransportError>;

    /// Bring the controller up with the given configuration; clears a
    /// latched bus-off condition on success
    fn init(&mut self, config: &CanBusConfig) -> Result<(), TransportError>;
}
