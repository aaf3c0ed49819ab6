//! Configuration registers
//!
//! This module contains the read/write registers touched by the driver directly:
//! - Channel number selection
//! - Base frequency control word
//!
//! Everything else is programmed from a [`Profile`](crate::Profile) as raw address/value pairs.

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// Crystal frequency of the CC2500 reference design in kHz.
pub const XOSC_KHZ: u64 = 26_000;

/// Channel number register CHANNR (address: 0x0A)
///
/// The carrier is the base frequency plus `number` times the channel spacing.
/// Channel 255 is never selected by the scanner, see [`ScanOutcome`](crate::ScanOutcome).
#[register(0x0Au8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Channel {
    /// Channel index
    pub number: u8,
}

impl FromByteArray for Channel {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { number: bytes[0] })
    }
}

impl ToByteArray for Channel {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.number])
    }
}

/// Frequency control word FREQ2..FREQ0 (address: 0x0D, 3 bytes, burst)
///
/// `f_carrier = f_xosc / 2^16 * word`, with a 26 MHz crystal.
#[register(0x0Du8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frequency {
    /// 24-bit frequency control word
    pub word: u32,
}

impl Frequency {
    /// Computes the control word closest below `khz`.
    pub fn from_khz(khz: u32) -> Self {
        let word = (u64::from(khz) << 16) / XOSC_KHZ;
        Self {
            word: (word & 0x00FF_FFFF) as u32,
        }
    }

    /// Carrier frequency selected by this word, in kHz.
    pub fn khz(self) -> u32 {
        ((u64::from(self.word) * XOSC_KHZ) >> 16) as u32
    }
}

impl FromByteArray for Frequency {
    type Error = Infallible;
    type Array = [u8; 3];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            word: u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]),
        })
    }
}

impl ToByteArray for Frequency {
    type Error = Infallible;
    type Array = [u8; 3];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let [_, freq2, freq1, freq0] = self.word.to_be_bytes();
        Ok([freq2, freq1, freq0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_word_for_2433_mhz() {
        let freq = Frequency::from_khz(2_433_000);

        // 2433 MHz * 65536 / 26 MHz = 6132657.23
        assert_eq!(freq.word, 0x5D_93B1);
        assert_eq!(freq.to_bytes().unwrap(), [0x5D, 0x93, 0xB1]);
        assert_eq!(freq.khz(), 2_432_999);
    }

    #[test]
    fn frequency_bytes_are_big_endian() {
        let freq = Frequency::from_bytes([0x10, 0xB0, 0x71]).unwrap();
        assert_eq!(freq.word, 0x10B071);
    }
}
