//! CC2500 Device Interface
//!
//! This module provides the register-level interface to a CC2500 behind its USB bridge.
//! The bridge understands three vendor requests:
//!
//! | request          | direction | payload                    |
//! |------------------|-----------|----------------------------|
//! | [`CMD_STROBE`]   | OUT       | `[opcode, params...]`      |
//! | [`CMD_WRITE`]    | OUT       | `[address, value...]`      |
//! | [`CMD_READ`]     | IN        | register contents; `wIndex` = address |
//!
//! The interface is built around the `Cc2500<T, D>` struct which wraps a [`Transport`]
//! and a delay provider and offers:
//! - Reading and writing typed registers
//! - Burst writes (the TX FIFO)
//! - Executing command strobes
//! - Applying register profiles
//!
//! # Example
//! ```no_run
//! # use cc25xx::{Cc2500, Channel, EnterRx, Error, Rssi, Transport};
//! # fn demo<T: Transport, D: embedded_hal::delay::DelayNs>(transport: T, delay: D) -> Result<(), Error> {
//! let mut radio = Cc2500::new(transport, delay);
//!
//! radio.write_register(Channel { number: 12 })?;
//! radio.execute_command(EnterRx)?;
//! let rssi: Rssi = radio.read_register()?;
//! # Ok(())
//! # }
//! ```

use alloc::vec::Vec;
use core::convert::Infallible;
use core::time::Duration;

use embedded_hal::delay::DelayNs;
use log::{debug, info};
use regiface::{ByteArray, Command, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use crate::commands::Reset;
use crate::config::Timing;
use crate::error::Error;
use crate::profile::Profile;
use crate::registers::{Frequency, PartNumber, Version};
use crate::transport::{ControlSetup, Transport};

/// Vendor request carrying a command strobe.
pub const CMD_STROBE: u8 = 0x30;

/// Vendor request carrying a register write.
pub const CMD_WRITE: u8 = 0x40;

/// Vendor request reading a register.
pub const CMD_READ: u8 = 0x80;

/// Identity reported by the chip's status registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChipInfo {
    pub part_number: u8,
    pub version: u8,
}

impl ChipInfo {
    /// A zero part number means nothing answered on the other side of the bridge.
    pub fn is_present(&self) -> bool {
        self.part_number != 0
    }
}

/// Main device interface for the CC2500.
///
/// Owns the transport exclusively; scanning, fuzzing and configuration are run one
/// at a time through `&mut self`.
pub struct Cc2500<T, D> {
    transport: T,
    delay: D,
    timing: Timing,
}

impl<T, D> Cc2500<T, D> {
    /// Creates a new device with default [`Timing`].
    pub fn new(transport: T, delay: D) -> Self {
        Self::with_timing(transport, delay, Timing::default())
    }

    /// Creates a new device with explicit delays and transfer timeout.
    pub fn with_timing(transport: T, delay: D, timing: Timing) -> Self {
        Self {
            transport,
            delay,
            timing,
        }
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Releases the transport and delay provider.
    pub fn release(self) -> (T, D) {
        (self.transport, self.delay)
    }
}

impl<T, D> Cc2500<T, D>
where
    T: Transport,
    D: DelayNs,
{
    /// Reads a register value from the device.
    ///
    /// # Errors
    /// * `Error::Transport` - the read request failed
    /// * `Error::ShortRead` - the bridge returned fewer bytes than the register holds
    /// * `Error::Deserialization` - the register contents could not be decoded
    pub fn read_register<R>(&mut self) -> Result<R, Error>
    where
        R: ReadableRegister<IdType = u8>,
    {
        let mut raw_value = R::Array::new();
        let expected = raw_value.as_ref().len();

        let actual = self.transport.control_in(
            ControlSetup::vendor_in(CMD_READ, 0, u16::from(R::id())),
            raw_value.as_mut(),
            self.timing.timeout,
        )?;
        if actual < expected {
            return Err(Error::ShortRead { expected, actual });
        }

        R::from_bytes(raw_value).map_err(|_| Error::Deserialization)
    }

    /// Writes a value to a device register.
    pub fn write_register<R>(&mut self, register: R) -> Result<(), Error>
    where
        R: WritableRegister<IdType = u8, Error = Infallible>,
    {
        let raw_value = register.to_bytes().unwrap_or_else(|never| match never {});
        self.write_burst(R::id(), raw_value.as_ref())
    }

    /// Writes a single register by address.
    pub fn write_raw(&mut self, address: u8, value: u8) -> Result<(), Error> {
        self.write_burst(address, &[value])
    }

    /// Writes `bytes` starting at `address`.
    ///
    /// For the TX FIFO every byte lands in the FIFO; for configuration registers the
    /// address auto-increments.
    pub fn write_burst(&mut self, address: u8, bytes: &[u8]) -> Result<(), Error> {
        let mut frame = Vec::with_capacity(bytes.len() + 1);
        frame.push(address);
        frame.extend_from_slice(bytes);

        self.transport.control_out(
            ControlSetup::vendor_out(CMD_WRITE, 0, 0),
            &frame,
            self.timing.timeout,
        )?;
        Ok(())
    }

    /// Executes a command strobe on the device.
    ///
    /// If the command defines response parameters they are read back with a
    /// [`CMD_READ`] request addressed at the strobe opcode.
    pub fn execute_command<C>(&mut self, command: C) -> Result<C::ResponseParameters, Error>
    where
        C: Command<IdType = u8>,
        C::CommandParameters: ToByteArray<Error = Infallible>,
    {
        let request = command
            .invoking_parameters()
            .to_bytes()
            .unwrap_or_else(|never| match never {});

        let mut frame = Vec::with_capacity(request.as_ref().len() + 1);
        frame.push(C::id());
        frame.extend_from_slice(request.as_ref());

        self.transport.control_out(
            ControlSetup::vendor_out(CMD_STROBE, 0, 0),
            &frame,
            self.timing.timeout,
        )?;

        let mut raw_response = <C::ResponseParameters as FromByteArray>::Array::new();
        if !raw_response.as_ref().is_empty() {
            self.transport.control_in(
                ControlSetup::vendor_in(CMD_READ, 0, u16::from(C::id())),
                raw_response.as_mut(),
                self.timing.timeout,
            )?;
        }

        C::ResponseParameters::from_bytes(raw_response).map_err(|_| Error::Deserialization)
    }

    /// Resets the chip and waits for it to come back.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.execute_command(Reset)?;
        self.wait(self.timing.reset);
        Ok(())
    }

    /// Reads the part and version numbers.
    pub fn identify(&mut self) -> Result<ChipInfo, Error> {
        let part: PartNumber = self.read_register()?;
        let version: Version = self.read_register()?;

        let info = ChipInfo {
            part_number: part.value,
            version: version.value,
        };
        info!(
            "CC2500 part number 0x{:02X}, version 0x{:02X}",
            info.part_number, info.version
        );
        Ok(info)
    }

    /// Applies every write of `profile` in order.
    pub fn apply_profile(&mut self, profile: &Profile) -> Result<(), Error> {
        debug!("Applying {} profile", profile.name());
        for &(address, value) in profile.writes() {
            self.write_raw(address, value)?;
        }
        Ok(())
    }

    /// Programs the base frequency, in kHz.
    pub fn set_frequency(&mut self, khz: u32) -> Result<(), Error> {
        let frequency = Frequency::from_khz(khz);
        debug!(
            "Setting frequency to {} kHz (word 0x{:06X})",
            khz, frequency.word
        );
        self.write_register(frequency)
    }

    /// Blocks for `duration`.
    pub(crate) fn wait(&mut self, duration: Duration) {
        let micros = u32::try_from(duration.as_micros()).unwrap_or(u32::MAX);
        self.delay.delay_us(micros);
    }
}
