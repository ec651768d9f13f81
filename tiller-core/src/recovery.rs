//! CAN bus-off recovery
//!
//! The transport latches a bus-off condition asynchronously; on the next
//! application iteration the channel is torn down and brought back up
//! with its original configuration. Recovery is unconditional and
//! immediate; if the bus condition persists, the cycle repeats on every
//! iteration until the bus heals.

use crate::config::CanBusConfig;
use crate::traits::{CanTransport, LinkStatus, TransportError};

/// Recovery driver with its diagnostic counter
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusOffRecovery {
    recoveries: u32,
}

impl BusOffRecovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed deinit+init cycles since power-on
    pub fn recoveries(&self) -> u32 {
        self.recoveries
    }

    /// Perform one recovery cycle if the link is bus-off.
    ///
    /// Returns `Ok(true)` when a cycle ran, `Ok(false)` when the link was
    /// healthy. `deinit`/`init` failures propagate; they are the same
    /// class of fault as a failed boot.
    pub fn poll<T: CanTransport>(
        &mut self,
        can: &mut T,
        config: &CanBusConfig,
    ) -> Result<bool, TransportError> {
        if can.status() != LinkStatus::BusOff {
            return Ok(false);
        }

        can.deinit()?;
        can.init(config)?;
        self.recoveries += 1;

        Ok(true)
    }
}
