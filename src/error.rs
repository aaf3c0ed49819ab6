//! Driver errors
//!
//! Hard failures are reported through [`Error`]. Outcomes the driver tolerates, such as
//! a power level that never reads back or a start request the sniffer did not
//! acknowledge, are returned as values alongside success instead
//! (see [`PowerNegotiation`](crate::PowerNegotiation) and [`StartStatus`](crate::StartStatus)).

use core::fmt;

use thiserror::Error;

use crate::sniffer::session::Phase;
use crate::transport::TransportError;

/// Errors returned by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A transfer failed
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// A register read returned fewer bytes than the register holds
    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },
    /// Register contents could not be decoded
    #[error("failed to decode register contents")]
    Deserialization,
    /// A mandatory sniffer setup step failed
    #[error("{step} failed: {source}")]
    SetupStepFailed {
        step: SetupStep,
        #[source]
        source: TransportError,
    },
    /// One half of the 16-bit sniffer channel could not be written
    #[error("setting channel ({byte} byte) failed: {source}")]
    ChannelByteWriteFailed {
        byte: ChannelByte,
        #[source]
        source: TransportError,
    },
    /// The capture buffer length is zero
    #[error("capture buffer length must be non-zero")]
    EmptyCaptureBuffer,
    /// The capture session is not in a phase that allows the operation
    #[error("operation not allowed in phase {phase:?}")]
    InvalidPhase { phase: Phase },
}

/// Sniffer setup steps that abort the setup when their transfer fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetupStep {
    Identify,
    NegotiatePower,
    Calibrate,
}

impl fmt::Display for SetupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Identify => "getting identity",
            Self::NegotiatePower => "setting power",
            Self::Calibrate => "setting reg 0xC9",
        })
    }
}

/// Which byte of the channel number a `SET_CHAN` request carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelByte {
    /// Bits 7:0, request index 0
    Low = 0,
    /// Bits 15:8, request index 1
    High = 1,
}

impl fmt::Display for ChannelByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::High => "high",
        })
    }
}
