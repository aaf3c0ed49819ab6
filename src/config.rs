//! Timing and policy configuration
//!
//! The chips are synchronized with fixed waits after state-changing strobes rather than
//! by polling a ready flag. The waits, transfer timeouts and capture policy live here so
//! they can be tuned per dongle instead of being baked into the algorithms.

use core::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bulk IN endpoint the CC2540 sniffer streams captured frames on.
pub const CAPTURE_ENDPOINT: u8 = 0x83;

/// Default capture buffer size in bytes.
pub const CAPTURE_BUFFER_LEN: usize = 1024;

/// Number of `GET_POWER` polls before power negotiation gives up.
pub const POWER_RETRIES: usize = 10;

/// Power level requested from the sniffer during setup.
pub const DEFAULT_POWER: u8 = 0x04;

/// Fixed delays inserted between chip operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timing {
    /// Wait after entering RX or TX before sampling status or leaving the state
    pub settle: Duration,
    /// Wait between two fuzz packets
    pub inter_packet: Duration,
    /// Wait after the reset strobe
    pub reset: Duration,
    /// Timeout handed to every transfer
    pub timeout: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(10),
            inter_packet: Duration::from_millis(100),
            reset: Duration::from_millis(100),
            timeout: Duration::from_millis(1000),
        }
    }
}

/// What the capture loop does when a bulk read fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorPolicy {
    /// Stop capturing and report the error
    #[default]
    Abort,
    /// Count the error and read again
    Retry,
}

/// Bulk capture parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CaptureConfig {
    /// Bulk IN endpoint address
    pub endpoint: u8,
    /// Size of the read buffer handed to each bulk transfer, must be non-zero
    pub buffer_len: usize,
    /// Reaction to failed reads
    pub policy: ErrorPolicy,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            endpoint: CAPTURE_ENDPOINT,
            buffer_len: CAPTURE_BUFFER_LEN,
            policy: ErrorPolicy::default(),
        }
    }
}

/// Sniffer setup parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionConfig {
    /// Power level written with `SET_POWER`
    pub power: u8,
    /// Maximum number of `GET_POWER` polls
    pub power_retries: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            power: DEFAULT_POWER,
            power_retries: POWER_RETRIES,
        }
    }
}

/// Complete sniffer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    pub timing: Timing,
    pub session: SessionConfig,
    pub capture: CaptureConfig,
}
