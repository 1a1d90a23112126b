//! Interrupt status registers
//!
//! `RegIrqFlags1` and `RegIrqFlags2` sit at consecutive addresses and are read together
//! in a single burst. Most flags are cleared automatically by the chip when the
//! condition ends or when the mode changes.

use core::convert::Infallible;

use bitflags::bitflags;
use regiface::{register, FromByteArray, ReadableRegister};

bitflags! {
    /// Mode and synthesizer status (`RegIrqFlags1`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ModeFlags: u8 {
        /// Requested operating mode is reached
        const MODE_READY = 1 << 7;
        /// RX mode ready (RSSI, AGC and AFC done)
        const RX_READY = 1 << 6;
        /// TX mode ready (PA ramped up)
        const TX_READY = 1 << 5;
        /// PLL locked
        const PLL_LOCK = 1 << 4;
        /// RSSI above threshold
        const RSSI = 1 << 3;
        /// Receiver timeout elapsed
        const TIMEOUT = 1 << 2;
        /// Entered intermediate auto mode
        const AUTO_MODE = 1 << 1;
        /// Sync word and address matched
        const SYNC_ADDRESS_MATCH = 1;
    }
}

bitflags! {
    /// FIFO and packet engine status (`RegIrqFlags2`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FifoFlags: u8 {
        /// FIFO holds 66 bytes
        const FIFO_FULL = 1 << 7;
        /// FIFO holds at least one byte
        const FIFO_NOT_EMPTY = 1 << 6;
        /// FIFO level above the FifoThreshold
        const FIFO_LEVEL = 1 << 5;
        /// FIFO overrun happened, cleared by writing 1
        const FIFO_OVERRUN = 1 << 4;
        /// Complete packet sent
        const PACKET_SENT = 1 << 3;
        /// Payload ready to be read from the FIFO
        const PAYLOAD_READY = 1 << 2;
        /// CRC of the received payload is valid
        const CRC_OK = 1 << 1;
    }
}

/// Interrupt flags registers (address: 0x27-0x28)
///
/// Read-only snapshot of both status registers.
#[register(0x27u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct IrqFlags {
    /// `RegIrqFlags1`
    pub mode: ModeFlags,
    /// `RegIrqFlags2`
    pub fifo: FifoFlags,
}

impl FromByteArray for IrqFlags {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            mode: ModeFlags::from_bits_truncate(bytes[0]),
            fifo: FifoFlags::from_bits_truncate(bytes[1]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_from_both_registers() {
        let flags = IrqFlags::from_bytes([0xB0, 0x46]).unwrap();
        assert_eq!(
            flags.mode,
            ModeFlags::MODE_READY | ModeFlags::TX_READY | ModeFlags::PLL_LOCK
        );
        assert!(flags.fifo.contains(FifoFlags::FIFO_NOT_EMPTY | FifoFlags::PAYLOAD_READY));
        assert!(flags.fifo.contains(FifoFlags::CRC_OK));
    }

    #[test]
    fn unused_bit_is_dropped() {
        assert!(IrqFlags::from_bytes([0, 0x01]).unwrap().fifo.is_empty());
    }
}
