//! Random payload transmitter
//!
//! Stress generator for a device under test: every iteration draws a payload of 1 to
//! [`MAX_PAYLOAD_LEN`] random bytes, loads it into the TX FIFO and pulses the
//! transmitter. Responses are never inspected, so the only failure is a transport error.
//!
//! The loop runs until the caller raises the stop flag. The flag is checked at the top
//! of every iteration, after the previous packet has been followed by IDLE, so a
//! cancelled loop always leaves the chip idle.

use alloc::vec;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;
use log::{debug, info};
use rand_core::RngCore;

use crate::commands::{EnterTx, Idle};
use crate::device::Cc2500;
use crate::error::Error;
use crate::registers::TX_FIFO;
use crate::transport::Transport;

/// Largest payload the fuzzer draws.
pub const MAX_PAYLOAD_LEN: usize = 64;

/// A random payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzPacket {
    payload: Vec<u8>,
}

impl FuzzPacket {
    /// Draws a length uniformly from `1..=64` and fills that many random bytes.
    pub fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        // 64 divides 2^32, so the modulo is unbiased
        let len = (rng.next_u32() % MAX_PAYLOAD_LEN as u32) as usize + 1;
        let mut payload = vec![0u8; len];
        rng.fill_bytes(&mut payload);
        Self { payload }
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Always false, a packet carries at least one byte.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Totals of a finished fuzz run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FuzzStats {
    pub packets: u64,
    pub bytes: u64,
}

impl<T, D> Cc2500<T, D>
where
    T: Transport,
    D: DelayNs,
{
    /// Transmits random packets until `stop` is raised.
    ///
    /// # Errors
    /// The first failed transfer ends the loop.
    pub fn fuzz<R: RngCore + ?Sized>(
        &mut self,
        rng: &mut R,
        stop: &AtomicBool,
    ) -> Result<FuzzStats, Error> {
        let mut stats = FuzzStats::default();

        loop {
            if stop.load(Ordering::Relaxed) {
                info!(
                    "Fuzzing stopped after {} packets ({} bytes)",
                    stats.packets, stats.bytes
                );
                return Ok(stats);
            }

            let packet = FuzzPacket::random(rng);
            self.transmit(&packet)?;
            stats.packets += 1;
            stats.bytes += packet.len() as u64;

            self.wait(self.timing().inter_packet);
        }
    }

    /// Sends one packet: FIFO load, TX, settle, IDLE.
    ///
    /// Once the TX strobe has been attempted, IDLE is issued even if it failed.
    pub fn transmit(&mut self, packet: &FuzzPacket) -> Result<(), Error> {
        debug!("Transmitting {} byte packet", packet.len());

        self.write_burst(TX_FIFO, packet.payload())?;
        let tx = self.execute_command(EnterTx);
        if tx.is_ok() {
            self.wait(self.timing().settle);
        }
        let idle = self.execute_command(Idle);
        tx?;
        idle?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::vec;
    use std::vec::Vec;

    use embedded_hal_mock::eh1::delay::NoopDelay;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::device::{CMD_STROBE, CMD_WRITE};
    use crate::test::{Call, MockTransport};
    use crate::transport::{ControlSetup, TransportError};

    /// Records every requested delay in microseconds.
    #[derive(Default)]
    struct RecordingDelay(Vec<u32>);

    impl DelayNs for RecordingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.0.push(ns / 1_000);
        }

        fn delay_us(&mut self, us: u32) {
            self.0.push(us);
        }
    }

    #[test]
    fn packet_lengths_are_uniform_over_1_to_64() {
        let mut rng = StdRng::seed_from_u64(0x00C0_FFEE);
        let mut counts = [0u32; MAX_PAYLOAD_LEN + 1];

        for _ in 0..10_000 {
            let packet = FuzzPacket::random(&mut rng);
            assert!((1..=MAX_PAYLOAD_LEN).contains(&packet.len()));
            counts[packet.len()] += 1;
        }

        assert_eq!(counts[0], 0);
        let expected = 10_000.0 / MAX_PAYLOAD_LEN as f64;
        let chi_squared: f64 = counts[1..]
            .iter()
            .map(|&observed| {
                let diff = f64::from(observed) - expected;
                diff * diff / expected
            })
            .sum();
        // 63 degrees of freedom, p = 0.001
        assert!(chi_squared < 103.4, "chi^2 = {chi_squared}");
        assert!(counts[1..].iter().all(|&observed| observed > 0));
    }

    #[test]
    fn loop_transmits_until_stopped() {
        let stop = Arc::new(AtomicBool::new(false));
        // three transfers per packet
        let transport = MockTransport::silent().stop_after(9, stop.clone());
        let mut radio = Cc2500::new(transport, RecordingDelay::default());
        let mut rng = StdRng::seed_from_u64(7);

        let stats = radio.fuzz(&mut rng, &stop).unwrap();
        assert_eq!(stats.packets, 3);

        let (transport, delay) = radio.release();
        assert_eq!(transport.calls.len(), 9);

        let mut bytes = 0;
        for chunk in transport.calls.chunks(3) {
            let Call::ControlOut(setup, data) = &chunk[0] else {
                panic!("expected FIFO write, got {:?}", chunk[0]);
            };
            assert_eq!(setup.request, CMD_WRITE);
            assert_eq!(data[0], TX_FIFO);
            assert!((1..=MAX_PAYLOAD_LEN).contains(&(data.len() - 1)));
            bytes += data.len() as u64 - 1;

            let strobe = |opcode| Call::ControlOut(ControlSetup::vendor_out(CMD_STROBE, 0, 0), vec![opcode]);
            assert_eq!(chunk[1], strobe(0x35));
            assert_eq!(chunk[2], strobe(0x36));
        }
        assert_eq!(stats.bytes, bytes);

        // settle after TX, then the inter-packet gap
        assert_eq!(delay.0, vec![10_000, 100_000, 10_000, 100_000, 10_000, 100_000]);
    }

    #[test]
    fn transmitted_bytes_match_drawn_payload() {
        let mut radio = Cc2500::new(MockTransport::silent(), NoopDelay);
        let packet = FuzzPacket::random(&mut StdRng::seed_from_u64(42));
        radio.transmit(&packet).unwrap();

        let (transport, _) = radio.release();
        let (_, data) = transport.control_outs().next().unwrap();
        assert_eq!(&data[1..], packet.payload());
    }

    #[test]
    fn raised_flag_sends_nothing() {
        let stop = AtomicBool::new(true);
        let mut radio = Cc2500::new(MockTransport::silent(), NoopDelay);

        let stats = radio.fuzz(&mut StdRng::seed_from_u64(1), &stop).unwrap();
        assert_eq!(stats, FuzzStats::default());

        let (transport, _) = radio.release();
        assert!(transport.calls.is_empty());
    }

    #[test]
    fn transport_error_ends_loop() {
        let transport = MockTransport::new(|call| match call {
            Call::ControlOut(setup, data) if setup.request == CMD_STROBE && data[0] == 0x35 => {
                Err(TransportError::Disconnected)
            }
            _ => Ok(Vec::new()),
        });
        let mut radio = Cc2500::new(transport, NoopDelay);
        let stop = AtomicBool::new(false);

        assert_eq!(
            radio.fuzz(&mut StdRng::seed_from_u64(3), &stop),
            Err(Error::Transport(TransportError::Disconnected))
        );
    }

    #[test]
    fn failed_tx_strobe_still_idles() {
        let transport = MockTransport::new(|call| match call {
            Call::ControlOut(setup, data) if setup.request == CMD_STROBE && data[0] == 0x35 => {
                Err(TransportError::Rejected)
            }
            _ => Ok(Vec::new()),
        });
        let mut radio = Cc2500::new(transport, RecordingDelay::default());
        let packet = FuzzPacket::random(&mut StdRng::seed_from_u64(5));

        assert_eq!(
            radio.transmit(&packet),
            Err(Error::Transport(TransportError::Rejected))
        );

        let (transport, delay) = radio.release();
        assert_eq!(transport.calls.len(), 3);
        assert_eq!(
            transport.calls.last(),
            Some(&Call::ControlOut(
                ControlSetup::vendor_out(CMD_STROBE, 0, 0),
                vec![0x36]
            ))
        );
        // no settle wait after a failed TX
        assert!(delay.0.is_empty());
    }
}
