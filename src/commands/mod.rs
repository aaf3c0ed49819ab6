//! Command strobes
//!
//! A strobe is a one-byte command that triggers a chip action instead of storing a
//! value. The USB bridge forwards them with the `0x30` vendor request.
//!
//! # Timing
//! State-changing strobes need time to take effect:
//! - [`Reset`] is followed by the reset delay before any other access
//! - [`EnterRx`] and [`EnterTx`] are followed by the settle delay
//!
//! See [`Timing`](crate::Timing) for the values.

mod strobe;

pub use strobe::*;
