//! Register definitions for the CC2500
//! Addresses from the CC2500 datasheet (SWRS040)
//!
//! The USB bridge reads and writes registers by address with the `0x80` and `0x40`
//! vendor requests, so the SPI header bits (burst, read) never appear here.

mod config;
mod status;

pub use config::*;
pub use status::*;

/// Address of the TX FIFO, the target of burst writes carrying packet payloads.
pub const TX_FIFO: u8 = 0x3F;
