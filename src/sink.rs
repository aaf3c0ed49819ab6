//! Captured data destinations
//!
//! The capture loop hands every non-empty bulk read to a [`FrameSink`] together with
//! the channel it was captured on. The bytes are passed on uninterpreted: framing and
//! dissection belong to the sink.
//!
//! Two ready-made destinations are provided. [`CaptureLog`] keeps every read in memory.
//! [`DeviceTable`] is the caller-owned record of devices seen on air, keyed by MAC
//! address, for callers that dissect frames into advertisements.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Consumer of captured bytes.
pub trait FrameSink {
    /// Called once per non-empty bulk read.
    fn on_captured_bytes(&mut self, channel: u16, bytes: &[u8]);
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn on_captured_bytes(&mut self, channel: u16, bytes: &[u8]) {
        (**self).on_captured_bytes(channel, bytes);
    }
}

/// One bulk read as it came off the sniffer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CapturedFrame {
    pub channel: u16,
    pub bytes: Vec<u8>,
}

/// In-memory sink keeping every read in arrival order.
#[derive(Debug, Clone, Default)]
pub struct CaptureLog {
    frames: Vec<CapturedFrame>,
}

impl CaptureLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[CapturedFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Total captured bytes over all frames.
    pub fn byte_count(&self) -> usize {
        self.frames.iter().map(|frame| frame.bytes.len()).sum()
    }

    /// Drains the log.
    pub fn take(&mut self) -> Vec<CapturedFrame> {
        core::mem::take(&mut self.frames)
    }
}

impl FrameSink for CaptureLog {
    fn on_captured_bytes(&mut self, channel: u16, bytes: &[u8]) {
        self.frames.push(CapturedFrame {
            channel,
            bytes: bytes.to_vec(),
        });
    }
}

/// 48-bit device address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MacAddress(pub [u8; 6]);

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

/// A device observed on air.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceRecord {
    pub vendor_id: u16,
    pub product_id: u16,
    pub name: String,
    pub mac_address: MacAddress,
    /// Signal strength of the latest sighting, dBm
    pub rssi: i8,
    pub channel: u16,
}

/// Devices seen so far, one record per MAC address.
///
/// Owned by the caller and never shared with the driver.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceTable {
    records: Vec<DeviceRecord>,
}

impl DeviceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `record`, replacing an existing record with the same MAC address.
    ///
    /// Returns the replaced record.
    pub fn upsert(&mut self, record: DeviceRecord) -> Option<DeviceRecord> {
        match self
            .records
            .iter_mut()
            .find(|existing| existing.mac_address == record.mac_address)
        {
            Some(existing) => Some(core::mem::replace(existing, record)),
            None => {
                self.records.push(record);
                None
            }
        }
    }

    pub fn get(&self, mac_address: &MacAddress) -> Option<&DeviceRecord> {
        self.records
            .iter()
            .find(|record| &record.mac_address == mac_address)
    }

    /// Records in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &DeviceRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::string::ToString;
    use std::vec;

    use super::*;

    fn record(last: u8, rssi: i8) -> DeviceRecord {
        DeviceRecord {
            vendor_id: 0x0451,
            product_id: 0x16B3,
            name: "tag".to_string(),
            mac_address: MacAddress([0xC0, 0xFF, 0xEE, 0x00, 0x00, last]),
            rssi,
            channel: 37,
        }
    }

    #[test]
    fn log_keeps_reads_in_order() {
        let mut log = CaptureLog::new();
        log.on_captured_bytes(37, &[1, 2, 3]);
        log.on_captured_bytes(38, &[4]);

        assert_eq!(log.len(), 2);
        assert_eq!(log.byte_count(), 4);
        assert_eq!(
            log.frames()[1],
            CapturedFrame {
                channel: 38,
                bytes: vec![4]
            }
        );

        let frames = log.take();
        assert_eq!(frames.len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn sink_by_reference() {
        fn feed<S: FrameSink>(mut sink: S) {
            sink.on_captured_bytes(1, &[0xAA]);
        }

        let mut log = CaptureLog::new();
        feed(&mut log);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn mac_address_display() {
        let mac = MacAddress([0x00, 0x1A, 0x7D, 0xDA, 0x71, 0x13]);
        assert_eq!(mac.to_string(), "00:1A:7D:DA:71:13");
    }

    #[test]
    fn table_upserts_by_mac() {
        let mut table = DeviceTable::new();
        assert_eq!(table.upsert(record(1, -60)), None);
        assert_eq!(table.upsert(record(2, -70)), None);

        let replaced = table.upsert(record(1, -40)).unwrap();
        assert_eq!(replaced.rssi, -60);

        assert_eq!(table.len(), 2);
        let mac = MacAddress([0xC0, 0xFF, 0xEE, 0x00, 0x00, 1]);
        assert_eq!(table.get(&mac).map(|r| r.rssi), Some(-40));
        assert_eq!(
            table.iter().map(|r| r.mac_address.0[5]).collect::<std::vec::Vec<_>>(),
            vec![1, 2]
        );
    }
}
