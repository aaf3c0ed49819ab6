//! Status registers
//!
//! Read-only registers reporting chip identity and receiver state:
//! - Part and version numbers
//! - Received signal strength
//! - Packet status flags
//! - RX FIFO fill level
//!
//! RSSI and RXBYTES are only meaningful while the receiver is running.

use core::convert::Infallible;

use bitflags::bitflags;
use regiface::{register, FromByteArray, ReadableRegister};

/// Part number register PARTNUM (address: 0x30)
///
/// Reads 0x80 on a CC2500. A zero means no chip answered.
#[register(0x30u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PartNumber {
    pub value: u8,
}

impl FromByteArray for PartNumber {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

/// Version register VERSION (address: 0x31)
#[register(0x31u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Version {
    pub value: u8,
}

impl FromByteArray for Version {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

/// Received signal strength register RSSI (address: 0x34)
///
/// The chip reports a two's complement value in half-dB steps. The scanner compares the
/// raw byte against an unsigned threshold and never converts it; [`Rssi::dbm`] exists
/// for reporting.
#[register(0x34u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rssi {
    /// Raw register byte
    pub raw: u8,
}

impl Rssi {
    /// Offset between the register scale and dBm at 2.4 GHz.
    pub const OFFSET_DBM: f32 = 74.0;

    /// Signal strength in dBm.
    pub fn dbm(self) -> f32 {
        f32::from(self.raw as i8) / 2.0 - Self::OFFSET_DBM
    }
}

impl FromByteArray for Rssi {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { raw: bytes[0] })
    }
}

bitflags! {
    /// Packet status flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PacketStatusFlags: u8 {
        /// Last received packet had a valid CRC
        const CRC_OK = 1 << 7;
        /// Carrier sense
        const CARRIER_SENSE = 1 << 6;
        /// Preamble quality threshold reached
        const PQT_REACHED = 1 << 5;
        /// Channel is clear
        const CCA = 1 << 4;
        /// Sync word found
        const SFD = 1 << 3;
        /// Current GDO2 value
        const GDO2 = 1 << 2;
        /// Current GDO0 value
        const GDO0 = 1;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PacketStatusFlags {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "PacketStatusFlags({=u8:#04x})", self.bits());
    }
}

/// Packet status register PKTSTATUS (address: 0x38)
#[register(0x38u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PacketStatus {
    pub flags: PacketStatusFlags,
}

impl PacketStatus {
    /// Whether the receiver currently senses a carrier.
    pub fn carrier_sense(&self) -> bool {
        self.flags.contains(PacketStatusFlags::CARRIER_SENSE)
    }
}

impl FromByteArray for PacketStatus {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            flags: PacketStatusFlags::from_bits_retain(bytes[0]),
        })
    }
}

/// RX FIFO status register RXBYTES (address: 0x3B)
///
/// # Byte Format
/// - Bit 7: RX FIFO overflow
/// - Bits 6:0: Number of bytes in the RX FIFO
#[register(0x3Bu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxBytes {
    /// RX FIFO overflowed
    pub overflow: bool,
    /// Bytes waiting in the RX FIFO
    pub count: u8,
}

impl FromByteArray for RxBytes {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            overflow: bytes[0] & 0x80 != 0,
            count: bytes[0] & 0x7F,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rx_bytes_masks_overflow_flag() {
        let status = RxBytes::from_bytes([0xFF]).unwrap();
        assert!(status.overflow);
        assert_eq!(status.count, 0x7F);

        let status = RxBytes::from_bytes([0x05]).unwrap();
        assert!(!status.overflow);
        assert_eq!(status.count, 5);
    }

    #[test]
    fn rssi_reports_dbm() {
        assert_eq!(Rssi { raw: 0x00 }.dbm(), -74.0);
        assert_eq!(Rssi { raw: 0x14 }.dbm(), -64.0);
        // 0x80 is -128 half-dB steps
        assert_eq!(Rssi { raw: 0x80 }.dbm(), -138.0);
    }

    #[test]
    fn packet_status_carrier_sense() {
        let status = PacketStatus::from_bytes([0x40]).unwrap();
        assert!(status.carrier_sense());
        assert!(!PacketStatus::from_bytes([0x90]).unwrap().carrier_sense());
    }
}
