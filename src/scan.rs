//! Channel scanner
//!
//! Locates the first channel carrying traffic. Each channel is probed by tuning to it,
//! running the receiver for the settle delay and sampling RSSI and the RX FIFO level.
//! A channel is active when the raw RSSI byte is at least [`RSSI_THRESHOLD`] and the
//! FIFO holds at least one byte.
//!
//! Channels are probed in ascending order from 0 to [`LAST_CHANNEL`]; channel 255 is
//! reserved as the "not found" marker of the channel space and is never probed.

use embedded_hal::delay::DelayNs;
use log::{info, trace};

use crate::commands::{EnterRx, Idle};
use crate::device::Cc2500;
use crate::error::Error;
use crate::profile::Profile;
use crate::registers::{Channel, Rssi, RxBytes};
use crate::transport::Transport;

/// Raw RSSI value at or above which a channel may be active.
pub const RSSI_THRESHOLD: u8 = 0x80;

/// Highest channel the scanner probes.
pub const LAST_CHANNEL: u8 = 254;

/// Raw channel value meaning no active channel was found.
pub const NOT_FOUND: u8 = 0xFF;

/// Receiver state sampled on one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelProbe {
    pub channel: u8,
    pub rssi: Rssi,
    pub rx_bytes: RxBytes,
}

impl ChannelProbe {
    /// Signal above threshold and data in the FIFO.
    pub fn is_active(&self) -> bool {
        self.rssi.raw >= RSSI_THRESHOLD && self.rx_bytes.count > 0
    }
}

/// Result of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanOutcome {
    /// First active channel, in `0..=254`
    Found(u8),
    NotFound,
}

impl ScanOutcome {
    /// The channel as a raw byte, [`NOT_FOUND`] when nothing was found.
    pub fn as_raw(self) -> u8 {
        match self {
            Self::Found(channel) => channel,
            Self::NotFound => NOT_FOUND,
        }
    }
}

impl<T, D> Cc2500<T, D>
where
    T: Transport,
    D: DelayNs,
{
    /// Applies `profile` and returns the first active channel.
    ///
    /// # Errors
    /// Any failed transfer aborts the scan; it is never reported as
    /// [`ScanOutcome::NotFound`].
    pub fn scan(&mut self, profile: &Profile) -> Result<ScanOutcome, Error> {
        self.apply_profile(profile)?;

        for channel in 0..=LAST_CHANNEL {
            let probe = self.probe(channel)?;
            if probe.is_active() {
                info!(
                    "Found activity on channel {} (RSSI 0x{:02X}, {} bytes)",
                    channel, probe.rssi.raw, probe.rx_bytes.count
                );
                return Ok(ScanOutcome::Found(channel));
            }
        }

        info!("No active channel in {} profile", profile.name());
        Ok(ScanOutcome::NotFound)
    }

    /// Applies `profile`, probes every channel and hands each probe to `report`.
    ///
    /// Returns the active probe with the strongest signal.
    pub fn sweep<F>(&mut self, profile: &Profile, mut report: F) -> Result<Option<ChannelProbe>, Error>
    where
        F: FnMut(&ChannelProbe),
    {
        self.apply_profile(profile)?;

        let mut strongest: Option<ChannelProbe> = None;
        for channel in 0..=LAST_CHANNEL {
            let probe = self.probe(channel)?;
            report(&probe);

            let stronger = strongest.map_or(true, |best| probe.rssi.dbm() > best.rssi.dbm());
            if probe.is_active() && stronger {
                strongest = Some(probe);
            }
        }
        Ok(strongest)
    }

    /// Tunes to `channel`, samples the receiver and returns to IDLE.
    ///
    /// The IDLE strobe is issued even when sampling fails.
    pub fn probe(&mut self, channel: u8) -> Result<ChannelProbe, Error> {
        self.write_register(Channel { number: channel })?;
        self.execute_command(EnterRx)?;
        self.wait(self.timing().settle);

        let sample = self.sample_receiver();
        let idle = self.execute_command(Idle);
        let (rssi, rx_bytes) = sample?;
        idle?;

        let probe = ChannelProbe {
            channel,
            rssi,
            rx_bytes,
        };
        trace!(
            "Channel {}: RSSI 0x{:02X}, RXBYTES {}",
            channel,
            rssi.raw,
            rx_bytes.count
        );
        Ok(probe)
    }

    fn sample_receiver(&mut self) -> Result<(Rssi, RxBytes), Error> {
        let rssi: Rssi = self.read_register()?;
        let rx_bytes: RxBytes = self.read_register()?;
        Ok((rssi, rx_bytes))
    }
}
