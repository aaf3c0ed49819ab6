//! CC2540 BLE sniffer
//!
//! The CC2540 sniffer firmware is driven entirely with vendor control requests and
//! streams captured frames on a bulk IN endpoint. [`Cc2540`] wraps the individual
//! requests; [`session::CaptureSession`] sequences them into a working capture.
//!
//! # Requests
//! | request         | code   | direction | parameters                     |
//! |-----------------|--------|-----------|--------------------------------|
//! | `GET_IDENT`     | `0xC0` | IN        | up to 32 identity bytes        |
//! | `SET_POWER`     | `0xC5` | OUT       | `wIndex` = power level         |
//! | `GET_POWER`     | `0xC6` | IN        | one byte, the current level    |
//! | `0xC9`          | `0xC9` | OUT       | none, purpose unknown          |
//! | `SET_START`     | `0xD0` | OUT       | none                           |
//! | `SET_END`       | `0xD1` | OUT       | none                           |
//! | `SET_CHAN`      | `0xD2` | OUT       | `wIndex` = byte index, 1 byte payload |

use core::time::Duration;

use crate::config::Timing;
use crate::error::ChannelByte;
use crate::transport::{ControlSetup, Transport, TransportError};

pub mod capture;
pub mod session;

/// Maximum identity block length.
pub const IDENT_LEN: usize = 32;

/// Vendor request codes understood by the sniffer firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Request {
    GetIdent = 0xC0,
    SetPower = 0xC5,
    GetPower = 0xC6,
    /// Undocumented; every known host tool issues it between power and channel setup
    Calibrate = 0xC9,
    SetStart = 0xD0,
    SetEnd = 0xD1,
    SetChan = 0xD2,
}

impl Request {
    fn out(self, index: u16) -> ControlSetup {
        ControlSetup::vendor_out(self as u8, 0, index)
    }

    fn input(self) -> ControlSetup {
        ControlSetup::vendor_in(self as u8, 0, 0)
    }
}

/// Identity block returned by `GET_IDENT`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ident {
    bytes: [u8; IDENT_LEN],
    len: usize,
}

impl Ident {
    /// The bytes the firmware actually sent.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl core::fmt::Debug for Ident {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Ident({:02X?})", self.as_bytes())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Ident {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Ident({=[u8]:02x})", self.as_bytes());
    }
}

/// Request-level interface to the sniffer.
pub struct Cc2540<T> {
    transport: T,
    timeout: Duration,
}

impl<T> Cc2540<T> {
    pub fn new(transport: T) -> Self {
        Self::with_timeout(transport, Timing::default().timeout)
    }

    pub fn with_timeout(transport: T, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// Releases the underlying transport.
    pub fn release(self) -> T {
        self.transport
    }
}

impl<T: Transport> Cc2540<T> {
    /// Reads the identity block.
    pub fn get_ident(&mut self) -> Result<Ident, TransportError> {
        let mut bytes = [0u8; IDENT_LEN];
        let len = self
            .transport
            .control_in(Request::GetIdent.input(), &mut bytes, self.timeout)?;

        Ok(Ident {
            bytes,
            len: len.min(IDENT_LEN),
        })
    }

    /// Requests a transmit power level.
    pub fn set_power(&mut self, level: u8) -> Result<(), TransportError> {
        self.transport
            .control_out(Request::SetPower.out(u16::from(level)), &[], self.timeout)?;
        Ok(())
    }

    /// Reads the current power level, `None` if the firmware sent nothing.
    pub fn get_power(&mut self) -> Result<Option<u8>, TransportError> {
        let mut level = [0u8; 1];
        let len = self
            .transport
            .control_in(Request::GetPower.input(), &mut level, self.timeout)?;

        Ok((len > 0).then_some(level[0]))
    }

    /// Issues the undocumented `0xC9` request.
    pub fn calibrate(&mut self) -> Result<(), TransportError> {
        self.transport
            .control_out(Request::Calibrate.out(0), &[], self.timeout)?;
        Ok(())
    }

    /// Writes one byte of the 16-bit capture channel.
    pub fn set_channel_byte(&mut self, byte: ChannelByte, value: u8) -> Result<(), TransportError> {
        self.transport
            .control_out(Request::SetChan.out(byte as u16), &[value], self.timeout)?;
        Ok(())
    }

    /// Starts streaming captured frames.
    pub fn start(&mut self) -> Result<(), TransportError> {
        self.transport
            .control_out(Request::SetStart.out(0), &[], self.timeout)?;
        Ok(())
    }

    /// Stops streaming captured frames.
    pub fn stop(&mut self) -> Result<(), TransportError> {
        self.transport
            .control_out(Request::SetEnd.out(0), &[], self.timeout)?;
        Ok(())
    }

    /// Reads captured bytes from `endpoint`.
    pub fn read_bulk(&mut self, endpoint: u8, buf: &mut [u8]) -> Result<usize, TransportError> {
        self.transport.bulk_in(endpoint, buf, self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use std::vec;

    use super::*;
    use crate::test::{Call, MockTransport};

    #[test]
    fn ident_keeps_only_received_bytes() {
        let transport = MockTransport::scripted([Ok(vec![0x25, 0x40, 0x01])]);
        let mut sniffer = Cc2540::new(transport);

        let ident = sniffer.get_ident().unwrap();
        assert_eq!(ident.as_bytes(), &[0x25, 0x40, 0x01]);

        let transport = sniffer.release();
        assert_eq!(
            transport.calls,
            vec![Call::ControlIn(ControlSetup::vendor_in(0xC0, 0, 0), IDENT_LEN)]
        );
    }

    #[test]
    fn power_level_travels_in_index() {
        let mut sniffer = Cc2540::new(MockTransport::silent());
        sniffer.set_power(0x04).unwrap();

        let transport = sniffer.release();
        assert_eq!(
            transport.calls,
            vec![Call::ControlOut(ControlSetup::vendor_out(0xC5, 0, 0x04), vec![])]
        );
    }

    #[test]
    fn channel_byte_index_and_payload() {
        let mut sniffer = Cc2540::new(MockTransport::silent());
        sniffer.set_channel_byte(ChannelByte::High, 0x01).unwrap();

        let transport = sniffer.release();
        assert_eq!(
            transport.calls,
            vec![Call::ControlOut(ControlSetup::vendor_out(0xD2, 0, 1), vec![0x01])]
        );
    }
}
