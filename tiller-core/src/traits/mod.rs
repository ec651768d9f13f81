//! Collaborator abstraction traits
//!
//! These traits define the interface between the control logic and the
//! platform layer (CAN controller driver, hardware timer). Chip-specific
//! implementations live out of tree; tests supply doubles.

pub mod timer;
pub mod transport;

pub use timer::MillisTimer;
pub use transport::{CanTransport, LinkStatus, TransportError};
