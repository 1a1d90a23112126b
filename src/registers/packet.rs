//! Packet engine registers
//!
//! This module contains registers for the packet handler:
//! - Preamble length
//! - Sync word recognition
//! - Packet format, whitening and CRC
//! - Payload length and FIFO threshold
//!
//! These registers only matter in packet data mode.

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// Maximum length of the sync word
pub const MAX_SYNC_SIZE: usize = 8;

/// Preamble length registers (address: 0x2C-0x2D)
#[register(0x2Cu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct Preamble {
    /// Number of preamble bytes sent before the sync word
    pub length: u16,
}

impl Default for Preamble {
    fn default() -> Self {
        Self { length: 3 }
    }
}

/// Sync word recognition register (address: 0x2E)
///
/// # Important Notes
/// - `size` is the number of sync bytes, from 1 to 8
/// - A sync word made of 0x00 bytes is not allowed by the chip
#[register(0x2Eu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct SyncConfig {
    /// Enable sync word generation and detection
    pub sync_on: bool,
    /// Fill the FIFO while the FifoFillCondition bit is set rather than on sync address interrupt
    pub fifo_fill_condition: bool,
    /// Sync word length in bytes
    pub size: u8,
    /// Number of tolerated bit errors
    pub tolerance: u8,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            sync_on: true,
            fifo_fill_condition: false,
            size: 2,
            tolerance: 0,
        }
    }
}

/// Sync word value registers (address: 0x2F-0x36)
///
/// Always written as a whole, bytes past the configured size are ignored by the chip.
#[register(0x2Fu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct SyncValue {
    /// Sync word, first byte sent first
    pub bytes: [u8; MAX_SYNC_SIZE],
}

impl Default for SyncValue {
    fn default() -> Self {
        Self {
            bytes: [0x2D, 0xD4, 0, 0, 0, 0, 0, 0],
        }
    }
}

/// DC-free encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DcFree {
    #[default]
    None = 0b00,
    Manchester = 0b01,
    Whitening = 0b10,
}

/// Address based filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressFiltering {
    #[default]
    None = 0b00,
    /// Node address must match
    Node = 0b01,
    /// Node or broadcast address must match
    NodeOrBroadcast = 0b10,
}

/// Error type for a reserved packet configuration encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPacketConfig(pub u8);

/// Packet configuration register 1 (address: 0x37)
#[register(0x37u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PacketConfig1 {
    /// Length byte leads the payload. Fixed length otherwise.
    pub variable_length: bool,
    /// DC-free encoding
    pub dc_free: DcFree,
    /// CRC calculation and check
    pub crc_on: bool,
    /// Keep packets failing the CRC in the FIFO
    pub crc_auto_clear_off: bool,
    /// Address filtering
    pub address_filtering: AddressFiltering,
}

impl Default for PacketConfig1 {
    /// Variable length packets with CRC
    fn default() -> Self {
        Self {
            variable_length: true,
            dc_free: DcFree::None,
            crc_on: true,
            crc_auto_clear_off: false,
            address_filtering: AddressFiltering::None,
        }
    }
}

/// Payload length register (address: 0x38)
///
/// Payload length in fixed mode, maximum accepted length in variable mode.
#[register(0x38u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PayloadLength {
    pub length: u8,
}

impl Default for PayloadLength {
    fn default() -> Self {
        Self {
            length: super::FIFO_SIZE as u8,
        }
    }
}

/// FIFO threshold register (address: 0x3C)
#[register(0x3Cu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct FifoThresh {
    /// Start transmitting as soon as the FIFO is not empty rather than on FifoLevel
    pub tx_start_on_not_empty: bool,
    /// FifoLevel interrupt threshold, 7 bits
    pub threshold: u8,
}

impl Default for FifoThresh {
    fn default() -> Self {
        Self {
            tx_start_on_not_empty: true,
            threshold: 0x0F,
        }
    }
}

impl FromByteArray for Preamble {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            length: u16::from_be_bytes(bytes),
        })
    }
}

impl ToByteArray for Preamble {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.length.to_be_bytes())
    }
}

impl FromByteArray for SyncConfig {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            sync_on: bytes[0] & 0x80 != 0,
            fifo_fill_condition: bytes[0] & 0x40 != 0,
            size: ((bytes[0] >> 3) & 0x07) + 1,
            tolerance: bytes[0] & 0x07,
        })
    }
}

impl ToByteArray for SyncConfig {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let size = self.size.clamp(1, MAX_SYNC_SIZE as u8) - 1;
        Ok([(self.sync_on as u8) << 7
            | (self.fifo_fill_condition as u8) << 6
            | size << 3
            | (self.tolerance & 0x07)])
    }
}

impl FromByteArray for SyncValue {
    type Error = Infallible;
    type Array = [u8; MAX_SYNC_SIZE];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { bytes })
    }
}

impl ToByteArray for SyncValue {
    type Error = Infallible;
    type Array = [u8; MAX_SYNC_SIZE];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.bytes)
    }
}

impl FromByteArray for PacketConfig1 {
    type Error = InvalidPacketConfig;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let dc_free = match (bytes[0] >> 5) & 0x03 {
            0b00 => DcFree::None,
            0b01 => DcFree::Manchester,
            0b10 => DcFree::Whitening,
            _ => return Err(InvalidPacketConfig(bytes[0])),
        };
        let address_filtering = match (bytes[0] >> 1) & 0x03 {
            0b00 => AddressFiltering::None,
            0b01 => AddressFiltering::Node,
            0b10 => AddressFiltering::NodeOrBroadcast,
            _ => return Err(InvalidPacketConfig(bytes[0])),
        };
        Ok(Self {
            variable_length: bytes[0] & 0x80 != 0,
            dc_free,
            crc_on: bytes[0] & 0x10 != 0,
            crc_auto_clear_off: bytes[0] & 0x08 != 0,
            address_filtering,
        })
    }
}

impl ToByteArray for PacketConfig1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.variable_length as u8) << 7
            | (self.dc_free as u8) << 5
            | (self.crc_on as u8) << 4
            | (self.crc_auto_clear_off as u8) << 3
            | (self.address_filtering as u8) << 1])
    }
}

impl FromByteArray for PayloadLength {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { length: bytes[0] })
    }
}

impl ToByteArray for PayloadLength {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.length])
    }
}

impl FromByteArray for FifoThresh {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            tx_start_on_not_empty: bytes[0] & 0x80 != 0,
            threshold: bytes[0] & 0x7F,
        })
    }
}

impl ToByteArray for FifoThresh {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.tx_start_on_not_empty as u8) << 7 | (self.threshold & 0x7F)])
    }
}
