//! Driver error type

use core::fmt;

use embedded_hal::{digital, spi};

/// Error using the RFM69
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// SPI transaction failed
    Bus(spi::ErrorKind),
    /// Unable to drive the reset pin
    Pin(digital::ErrorKind),
    /// The chip answered with an unexpected `RegVersion` value
    HardwareVersion {
        /// Version reported by the chip
        actual: u16,
        /// Version this driver supports
        expected: u16,
    },
    /// Register content could not be decoded
    Deserialization,
    /// Register value could not be encoded
    Encoding,
    /// The transport was used after being closed
    Closed,
    /// More data than the FIFO can hold
    FifoOverflow,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(kind) => write!(f, "SPI bus error: {kind}"),
            Error::Pin(kind) => write!(f, "reset pin error: {kind:?}"),
            Error::HardwareVersion { actual, expected } => write!(
                f,
                "unexpected hardware version {actual:#06x} (expected {expected:#06x})"
            ),
            Error::Deserialization => f.write_str("invalid register content"),
            Error::Encoding => f.write_str("register value cannot be encoded"),
            Error::Closed => f.write_str("transport is closed"),
            Error::FifoOverflow => f.write_str("data does not fit in the FIFO"),
        }
    }
}

impl core::error::Error for Error {}
