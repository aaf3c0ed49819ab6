//! Byte transport
//!
//! The radios sit behind a USB bridge that exposes vendor control requests and a bulk
//! IN endpoint. This module describes that bridge as a trait so the driver stays
//! independent of any particular USB stack; device discovery, interface claiming and
//! the transfers themselves belong to the implementor.
//!
//! Every call blocks until the transfer completes or `timeout` elapses. Implementors
//! must enforce the timeout, the driver never cancels a transfer in flight.

use core::time::Duration;

use thiserror::Error;

/// `bmRequestType` for a host-to-device vendor request addressed to the device.
pub const VENDOR_OUT: u8 = 0x40;

/// `bmRequestType` for a device-to-host vendor request addressed to the device.
pub const VENDOR_IN: u8 = 0xC0;

/// Failure reported by a [`Transport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// The transfer did not complete within its timeout
    #[error("transfer timed out")]
    Timeout,
    /// The device rejected the request (STALL / NAK)
    #[error("request rejected by device")]
    Rejected,
    /// The device is no longer attached
    #[error("device disconnected")]
    Disconnected,
    /// Any other failure of the underlying stack
    #[error("transport failure")]
    Other,
}

/// Setup stage of a control transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlSetup {
    /// `bmRequestType`
    pub request_type: u8,
    /// `bRequest`
    pub request: u8,
    /// `wValue`
    pub value: u16,
    /// `wIndex`
    pub index: u16,
}

impl ControlSetup {
    /// Host-to-device vendor request.
    pub const fn vendor_out(request: u8, value: u16, index: u16) -> Self {
        Self {
            request_type: VENDOR_OUT,
            request,
            value,
            index,
        }
    }

    /// Device-to-host vendor request.
    pub const fn vendor_in(request: u8, value: u16, index: u16) -> Self {
        Self {
            request_type: VENDOR_IN,
            request,
            value,
            index,
        }
    }
}

/// Blocking request/response transport to a radio dongle.
pub trait Transport {
    /// Performs a device-to-host control transfer into `buf`.
    ///
    /// Returns the number of bytes the device sent, which may be fewer than `buf.len()`.
    fn control_in(
        &mut self,
        setup: ControlSetup,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, TransportError>;

    /// Performs a host-to-device control transfer carrying `data`.
    ///
    /// Returns the number of bytes written.
    fn control_out(
        &mut self,
        setup: ControlSetup,
        data: &[u8],
        timeout: Duration,
    ) -> Result<usize, TransportError>;

    /// Reads from a bulk IN `endpoint` into `buf`.
    fn bulk_in(
        &mut self,
        endpoint: u8,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn control_in(
        &mut self,
        setup: ControlSetup,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, TransportError> {
        (**self).control_in(setup, buf, timeout)
    }

    fn control_out(
        &mut self,
        setup: ControlSetup,
        data: &[u8],
        timeout: Duration,
    ) -> Result<usize, TransportError> {
        (**self).control_out(setup, data, timeout)
    }

    fn bulk_in(
        &mut self,
        endpoint: u8,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, TransportError> {
        (**self).bulk_in(endpoint, buf, timeout)
    }
}
