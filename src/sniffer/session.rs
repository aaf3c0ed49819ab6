//! Capture session setup
//!
//! Brings the sniffer from power-up to streaming in a fixed order, each step gated on
//! the previous one:
//!
//! 1. **Identify**: read the identity block; any response counts, its content is only logged
//! 2. **Negotiate power**: write the target level, then poll it back up to
//!    [`SessionConfig::power_retries`](crate::SessionConfig) times
//! 3. **Calibrate**: the undocumented `0xC9` request
//! 4. **Set channel**: low byte at index 0, then high byte at index 1
//! 5. **Start**: `SET_START`
//!
//! ```text
//! Idle -> Identifying -> NegotiatingPower -> Calibrating -> SettingChannel -> Starting -> Capturing -> Stopped
//!              |               |  ^  |              |               |
//!              |               +--+  |              |               |
//!              +-------------------+-+--------------+---------------+--> Failed
//! ```
//!
//! A power level that never reads back and an unacknowledged start are tolerated: both
//! are reported in [`Started`] and the session still reaches [`Phase::Capturing`].

use log::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{ChannelByte, Error, SetupStep};
use crate::sniffer::{Cc2540, Ident};
use crate::transport::{Transport, TransportError};

/// Session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    Idle,
    Identifying,
    NegotiatingPower,
    Calibrating,
    SettingChannel,
    Starting,
    Capturing,
    Stopped,
    Failed,
}

/// Outcome of the power read-back loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerNegotiation {
    /// The level read back matched after `polls` reads
    Confirmed { polls: usize },
    /// No read matched; `last` is what the final poll returned
    Exhausted { polls: usize, last: Option<u8> },
}

impl PowerNegotiation {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }
}

/// Result of the final `SET_START` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartStatus {
    Acknowledged,
    /// The request failed; capture may still work
    Failed(TransportError),
}

/// Report of a completed setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Started {
    pub ident: Ident,
    pub power: PowerNegotiation,
    pub start: StartStatus,
}

impl Started {
    /// No soft failure happened along the way.
    pub fn is_clean(&self) -> bool {
        self.power.is_confirmed() && self.start == StartStatus::Acknowledged
    }
}

/// A sniffer together with its setup state.
pub struct CaptureSession<T> {
    pub(crate) sniffer: Cc2540<T>,
    pub(crate) config: Config,
    phase: Phase,
    channel: u16,
    power: Option<u8>,
}

impl<T> CaptureSession<T> {
    /// Creates an idle session.
    pub fn new(transport: T, config: Config) -> Self {
        Self {
            sniffer: Cc2540::with_timeout(transport, config.timing.timeout),
            config,
            phase: Phase::Idle,
            channel: 0,
            power: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Channel programmed by [`setup`](Self::setup).
    pub fn channel(&self) -> u16 {
        self.channel
    }

    /// Last power level read back during negotiation.
    pub fn power(&self) -> Option<u8> {
        self.power
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Releases the underlying transport.
    pub fn release(self) -> T {
        self.sniffer.release()
    }

    fn enter(&mut self, phase: Phase) {
        debug!("Capture session: {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }
}

impl<T: Transport> CaptureSession<T> {
    /// Runs the setup sequence for `channel`.
    ///
    /// # Errors
    /// * `Error::InvalidPhase` - the session is not idle
    /// * `Error::SetupStepFailed` - identify, power polling or calibration failed
    /// * `Error::ChannelByteWriteFailed` - either half of the channel could not be written;
    ///   `SET_START` is not sent
    ///
    /// Any error leaves the session in [`Phase::Failed`].
    pub fn setup(&mut self, channel: u16) -> Result<Started, Error> {
        if self.phase != Phase::Idle {
            return Err(Error::InvalidPhase { phase: self.phase });
        }

        match self.run_setup(channel) {
            Ok(started) => Ok(started),
            Err(err) => {
                error!("Sniffer setup failed: {}", err);
                self.enter(Phase::Failed);
                Err(err)
            }
        }
    }

    /// Sends `SET_END` and leaves the capturing phase.
    pub fn stop(&mut self) -> Result<(), Error> {
        if self.phase != Phase::Capturing {
            return Err(Error::InvalidPhase { phase: self.phase });
        }

        self.sniffer.stop()?;
        self.enter(Phase::Stopped);
        Ok(())
    }

    fn run_setup(&mut self, channel: u16) -> Result<Started, Error> {
        self.enter(Phase::Identifying);
        let ident = self
            .sniffer
            .get_ident()
            .map_err(|source| Error::SetupStepFailed {
                step: SetupStep::Identify,
                source,
            })?;
        info!("IDENT: {:02X?}", ident.as_bytes());

        self.enter(Phase::NegotiatingPower);
        let power = self.negotiate_power()?;

        self.enter(Phase::Calibrating);
        self.sniffer
            .calibrate()
            .map_err(|source| Error::SetupStepFailed {
                step: SetupStep::Calibrate,
                source,
            })?;

        self.enter(Phase::SettingChannel);
        self.set_channel(channel)?;

        self.enter(Phase::Starting);
        let start = match self.sniffer.start() {
            Ok(()) => StartStatus::Acknowledged,
            Err(err) => {
                warn!("SET_START failed ({}), capturing anyway", err);
                StartStatus::Failed(err)
            }
        };

        self.enter(Phase::Capturing);
        info!("Sniffing on channel {}", channel);
        Ok(Started {
            ident,
            power,
            start,
        })
    }

    fn negotiate_power(&mut self) -> Result<PowerNegotiation, Error> {
        let target = self.config.session.power;
        let retries = self.config.session.power_retries;

        // The read-back below decides whether the level took effect
        if let Err(err) = self.sniffer.set_power(target) {
            warn!("SET_POWER 0x{:02X} failed: {}", target, err);
        }

        for poll in 1..=retries {
            let level = self
                .sniffer
                .get_power()
                .map_err(|source| Error::SetupStepFailed {
                    step: SetupStep::NegotiatePower,
                    source,
                })?;
            self.power = level;

            if level == Some(target) {
                debug!("Power 0x{:02X} confirmed after {} polls", target, poll);
                return Ok(PowerNegotiation::Confirmed { polls: poll });
            }
        }

        warn!(
            "Power 0x{:02X} not confirmed after {} polls, last read {:?}",
            target, retries, self.power
        );
        Ok(PowerNegotiation::Exhausted {
            polls: retries,
            last: self.power,
        })
    }

    fn set_channel(&mut self, channel: u16) -> Result<(), Error> {
        let [low, high] = channel.to_le_bytes();

        for (byte, value) in [(ChannelByte::Low, low), (ChannelByte::High, high)] {
            self.sniffer
                .set_channel_byte(byte, value)
                .map_err(|source| Error::ChannelByteWriteFailed { byte, source })?;
        }

        self.channel = channel;
        Ok(())
    }
}
