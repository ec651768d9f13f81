//! Bus configuration types
//!
//! The configuration handed to [`crate::traits::CanTransport::init`] at
//! boot is kept by the vehicle controller so bus-off recovery can
//! re-initialize the channel identically.

use heapless::Vec;
use tiller_protocol::{ATTITUDE_ID, SIGNALS_ID};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum number of hardware acceptance-filter entries
pub const MAX_RX_FILTERS: usize = 8;

/// Nominal bit rate of the vehicle bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CanBitrate {
    /// 125 kbit/s
    Kbps125,
    /// 250 kbit/s
    Kbps250,
    /// 500 kbit/s
    #[default]
    Kbps500,
    /// 1 Mbit/s
    Kbps1000,
}

/// CAN channel configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CanBusConfig {
    /// Nominal bit rate
    pub bitrate: CanBitrate,
    /// Standard identifiers accepted by the receive filter
    pub rx_accept_ids: Vec<u16, MAX_RX_FILTERS>,
}

impl Default for CanBusConfig {
    fn default() -> Self {
        let mut rx_accept_ids = Vec::new();
        let _ = rx_accept_ids.push(SIGNALS_ID);
        let _ = rx_accept_ids.push(ATTITUDE_ID);
        Self {
            bitrate: CanBitrate::Kbps500,
            rx_accept_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CanBusConfig::default();
        assert_eq!(config.bitrate, CanBitrate::Kbps500);
        assert_eq!(&config.rx_accept_ids[..], &[SIGNALS_ID, ATTITUDE_ID]);
    }
}
