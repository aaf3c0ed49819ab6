//! Strobe command implementations

use crate::{Command, NoParameters};

/// SRES strobe (0x30)
///
/// Resets the chip.
///
/// # Important Notes
/// - All registers return to their reset values
/// - Must be followed by the reset delay
/// - A [`Profile`](crate::Profile) has to be applied again afterwards
#[derive(Debug, Clone)]
pub struct Reset;

impl Command for Reset {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x30
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// SFSTXON strobe (0x31)
///
/// Enables and calibrates the frequency synthesizer so a following [`EnterTx`] starts
/// without the calibration delay.
#[derive(Debug, Clone)]
pub struct FastTxOn;

impl Command for FastTxOn {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x31
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// SXOFF strobe (0x32)
///
/// Turns off the crystal oscillator.
#[derive(Debug, Clone)]
pub struct XoscOff;

impl Command for XoscOff {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x32
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// SCAL strobe (0x33)
///
/// Calibrates the frequency synthesizer and turns it off.
///
/// # Important Notes
/// - Only valid from IDLE
#[derive(Debug, Clone)]
pub struct Calibrate;

impl Command for Calibrate {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x33
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// SRX strobe (0x34)
///
/// Enables the receiver.
///
/// # Important Notes
/// - Calibrates first if coming from IDLE with autocal enabled
/// - RSSI becomes valid after the settle delay
#[derive(Debug, Clone)]
pub struct EnterRx;

impl Command for EnterRx {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x34
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// STX strobe (0x35)
///
/// Enables the transmitter and sends the TX FIFO contents.
///
/// # Important Notes
/// - Payload must be written to the TX FIFO beforehand
#[derive(Debug, Clone)]
pub struct EnterTx;

impl Command for EnterTx {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x35
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// SIDLE strobe (0x36)
///
/// Exits RX/TX and turns off the frequency synthesizer.
#[derive(Debug, Clone)]
pub struct Idle;

impl Command for Idle {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x36
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// SFRX strobe (0x3A)
///
/// Flushes the RX FIFO.
///
/// # Important Notes
/// - Only issue in IDLE or RXFIFO_OVERFLOW states
#[derive(Debug, Clone)]
pub struct FlushRx;

impl Command for FlushRx {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x3A
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// SFTX strobe (0x3B)
///
/// Flushes the TX FIFO.
///
/// # Important Notes
/// - Only issue in IDLE or TXFIFO_UNDERFLOW states
#[derive(Debug, Clone)]
pub struct FlushTx;

impl Command for FlushTx {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x3B
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// SNOP strobe (0x3D)
///
/// No operation.
#[derive(Debug, Clone)]
pub struct Nop;

impl Command for Nop {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x3D
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}
