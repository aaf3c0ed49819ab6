#![no_std]
//! CC25xx USB Radio Driver
//!
//! This crate drives two Texas Instruments radio dongles through the register-oriented
//! vendor protocol their USB bridges expose:
//!
//! - **CC2500**: a 2.4 GHz ISM/SRD transceiver. The host writes configuration registers,
//!   issues command strobes and reads status registers over control transfers.
//! - **CC2540**: a BLE-band packet sniffer. The host negotiates identity, power and
//!   channel with vendor requests, then receives captured frames on a bulk endpoint.
//!
//! # Architecture
//! The driver is organized into several modules:
//!
//! - [`transport`]: The byte transport the driver is generic over
//!   - Vendor control transfers in both directions
//!   - Bulk reads for captured data
//!
//! - [`device`]: The CC2500 device interface
//!   - Register reads and writes, burst writes into the TX FIFO
//!   - Command strobe execution
//!   - Register profile application
//!
//! - [`registers`] / [`commands`]: Typed CC2500 registers and strobes
//!
//! - [`scan`]: Channel scanner locating the first active channel
//!
//! - [`fuzz`]: Random payload transmit loop
//!
//! - [`sniffer`]: The CC2540 sniffer
//!   - [`sniffer::session`]: setup negotiation state machine
//!   - [`sniffer::capture`]: the continuous bulk capture loop
//!
//! - [`sink`]: Where captured bytes go
//!
//! # Timing
//! All I/O is blocking. The only suspension points besides transport calls are the
//! settle delays configured in [`Timing`], performed through an
//! [`embedded_hal::delay::DelayNs`] implementation supplied by the caller.
//!
//! # Example
//! ```no_run
//! use core::sync::atomic::AtomicBool;
//! use cc25xx::{Band, Cc2500, Error, ScanOutcome, Transport};
//! use embedded_hal::delay::DelayNs;
//! use rand_core::RngCore;
//!
//! fn hunt<T: Transport, D: DelayNs, R: RngCore>(
//!     transport: T,
//!     delay: D,
//!     rng: &mut R,
//!     stop: &AtomicBool,
//! ) -> Result<(), Error> {
//!     let mut radio = Cc2500::new(transport, delay);
//!     radio.reset()?;
//!
//!     if let ScanOutcome::Found(channel) = radio.scan(Band::Ism.profile())? {
//!         log::info!("fuzzing with channel {} tuned", channel);
//!         radio.fuzz(rng, stop)?;
//!     }
//!     Ok(())
//! }
//! ```

extern crate alloc;

#[cfg(test)]
extern crate std;

use regiface::*;

pub mod commands;
pub mod config;
pub mod device;
pub mod error;
pub mod fuzz;
pub mod profile;
pub mod registers;
pub mod scan;
pub mod sink;
pub mod sniffer;
pub mod transport;

pub use commands::*;
pub use config::*;
pub use device::Cc2500;
pub use error::{ChannelByte, Error, SetupStep};
pub use fuzz::{FuzzPacket, FuzzStats};
pub use profile::{Band, Profile};
pub use registers::*;
pub use scan::{ChannelProbe, ScanOutcome};
pub use sink::{CaptureLog, CapturedFrame, DeviceRecord, DeviceTable, FrameSink, MacAddress};
pub use sniffer::{
    capture::CaptureStats,
    session::{CaptureSession, Phase, PowerNegotiation, StartStatus, Started},
    Cc2540, Ident,
};
pub use transport::{ControlSetup, Transport, TransportError};

#[cfg(test)]
pub(crate) mod test {
    //! Scripted transport shared by the unit tests.

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::vec::Vec;

    use core::time::Duration;

    use crate::transport::{ControlSetup, Transport, TransportError};

    /// One call observed by [`MockTransport`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        ControlIn(ControlSetup, usize),
        ControlOut(ControlSetup, Vec<u8>),
        BulkIn(u8, usize),
    }

    type Responder = dyn FnMut(&Call) -> Result<Vec<u8>, TransportError>;

    /// A transport that records every call and answers through a closure.
    ///
    /// The responder returns the bytes an IN transfer yields; for OUT transfers the
    /// returned bytes are ignored and the payload length is reported as written.
    pub struct MockTransport {
        pub calls: Vec<Call>,
        responder: std::boxed::Box<Responder>,
        stop: Option<(usize, Arc<AtomicBool>)>,
    }

    impl MockTransport {
        pub fn new(responder: impl FnMut(&Call) -> Result<Vec<u8>, TransportError> + 'static) -> Self {
            Self {
                calls: Vec::new(),
                responder: std::boxed::Box::new(responder),
                stop: None,
            }
        }

        /// Accepts every write and answers every read with zeroes.
        pub fn silent() -> Self {
            Self::new(|_| Ok(Vec::new()))
        }

        /// Answers reads from a queue; writes always succeed.
        pub fn scripted(reads: impl IntoIterator<Item = Result<Vec<u8>, TransportError>>) -> Self {
            let mut queue: VecDeque<_> = reads.into_iter().collect();
            Self::new(move |call| match call {
                Call::ControlOut(..) => Ok(Vec::new()),
                _ => queue.pop_front().unwrap_or(Err(TransportError::Timeout)),
            })
        }

        /// Raises `flag` once `calls` transfers have been made.
        pub fn stop_after(mut self, calls: usize, flag: Arc<AtomicBool>) -> Self {
            self.stop = Some((calls, flag));
            self
        }

        pub fn control_outs(&self) -> impl Iterator<Item = (&ControlSetup, &Vec<u8>)> {
            self.calls.iter().filter_map(|call| match call {
                Call::ControlOut(setup, data) => Some((setup, data)),
                _ => None,
            })
        }

        fn record(&mut self, call: Call) -> Result<Vec<u8>, TransportError> {
            let response = (self.responder)(&call);
            self.calls.push(call);
            if let Some((limit, flag)) = &self.stop {
                if self.calls.len() >= *limit {
                    flag.store(true, Ordering::Relaxed);
                }
            }
            response
        }
    }

    impl Transport for MockTransport {
        fn control_in(
            &mut self,
            setup: ControlSetup,
            buf: &mut [u8],
            _timeout: Duration,
        ) -> Result<usize, TransportError> {
            let bytes = self.record(Call::ControlIn(setup, buf.len()))?;
            let n = if bytes.is_empty() { buf.len() } else { bytes.len().min(buf.len()) };
            buf[..n].fill(0);
            buf[..bytes.len().min(n)].copy_from_slice(&bytes[..bytes.len().min(n)]);
            Ok(n)
        }

        fn control_out(
            &mut self,
            setup: ControlSetup,
            data: &[u8],
            _timeout: Duration,
        ) -> Result<usize, TransportError> {
            self.record(Call::ControlOut(setup, data.to_vec()))?;
            Ok(data.len())
        }

        fn bulk_in(
            &mut self,
            endpoint: u8,
            buf: &mut [u8],
            _timeout: Duration,
        ) -> Result<usize, TransportError> {
            let bytes = self.record(Call::BulkIn(endpoint, buf.len()))?;
            let n = bytes.len().min(buf.len());
            buf[..n].copy_from_slice(&bytes[..n]);
            Ok(n)
        }
    }
}
