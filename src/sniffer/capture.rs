//! Bulk capture loop
//!
//! Once a session is capturing, the sniffer streams raw frames on its bulk IN endpoint.
//! The loop reads into a fixed buffer and hands every non-empty read to the caller's
//! [`FrameSink`] tagged with the session channel. What happens on a failed read is
//! decided by [`ErrorPolicy`].

use alloc::vec;
use core::sync::atomic::{AtomicBool, Ordering};

use log::{info, trace, warn};

use crate::config::ErrorPolicy;
use crate::error::Error;
use crate::sink::FrameSink;
use crate::sniffer::session::{CaptureSession, Phase};
use crate::transport::{Transport, TransportError};

/// Totals of a capture run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CaptureStats {
    /// Non-empty reads forwarded to the sink
    pub reads: u64,
    pub bytes: u64,
    /// Failed reads skipped under [`ErrorPolicy::Retry`]
    pub errors: u64,
    pub last_error: Option<TransportError>,
}

impl<T: Transport> CaptureSession<T> {
    /// Reads captured frames into `sink` until `stop` is raised.
    ///
    /// The session stays [`Phase::Capturing`] afterwards; call
    /// [`stop`](CaptureSession::stop) to end streaming on the device.
    ///
    /// # Errors
    /// * `Error::InvalidPhase` - setup has not completed
    /// * `Error::EmptyCaptureBuffer` - `buffer_len` is zero
    /// * `Error::Transport` - a read failed under [`ErrorPolicy::Abort`]
    pub fn capture<S>(&mut self, sink: &mut S, stop: &AtomicBool) -> Result<CaptureStats, Error>
    where
        S: FrameSink + ?Sized,
    {
        if self.phase() != Phase::Capturing {
            return Err(Error::InvalidPhase {
                phase: self.phase(),
            });
        }

        let channel = self.channel();
        let capture = self.config.capture;
        if capture.buffer_len == 0 {
            return Err(Error::EmptyCaptureBuffer);
        }
        let mut buf = vec![0u8; capture.buffer_len];
        let mut stats = CaptureStats::default();

        while !stop.load(Ordering::Relaxed) {
            match self.sniffer.read_bulk(capture.endpoint, &mut buf) {
                Ok(0) => {}
                Ok(len) => {
                    // the transport may over-report
                    let len = len.min(buf.len());
                    trace!("Captured {} bytes on channel {}", len, channel);
                    sink.on_captured_bytes(channel, &buf[..len]);
                    stats.reads += 1;
                    stats.bytes += len as u64;
                }
                Err(err) => match capture.policy {
                    ErrorPolicy::Abort => {
                        warn!("Capture aborted after {} reads: {}", stats.reads, err);
                        return Err(err.into());
                    }
                    ErrorPolicy::Retry => {
                        trace!("Bulk read failed: {}", err);
                        stats.errors += 1;
                        stats.last_error = Some(err);
                    }
                },
            }
        }

        info!(
            "Capture stopped: {} reads, {} bytes, {} errors",
            stats.reads, stats.bytes, stats.errors
        );
        Ok(stats)
    }
}
