//! Register definitions for the RFM69HCW
//! Generated from the RFM69HCW-V1.1 datasheet
//!
//! Every register address is 7 bits wide. Typed registers carry their address through
//! `#[register]`; registers spanning several consecutive bytes are accessed with a
//! single burst transaction.

mod irq;
mod packet;
mod rf;
mod system;

pub use irq::*;
pub use packet::*;
pub use rf::*;
pub use system::*;

/// Crystal oscillator frequency in Hz
pub const FXOSC: u64 = 32_000_000;

/// Size of the packet FIFO in bytes
pub const FIFO_SIZE: usize = 66;

/// Packet FIFO, accessed in bursts that do not auto-increment
pub const REG_FIFO: u8 = 0x00;
pub const REG_OP_MODE: u8 = 0x01;
pub const REG_DATA_MODUL: u8 = 0x02;
pub const REG_BITRATE_MSB: u8 = 0x03;
pub const REG_FDEV_MSB: u8 = 0x05;
pub const REG_FRF_MSB: u8 = 0x07;
/// Silicon version, read-only
pub const REG_VERSION: u8 = 0x10;
pub const REG_PA_LEVEL: u8 = 0x11;
pub const REG_RX_BW: u8 = 0x19;
pub const REG_IRQ_FLAGS1: u8 = 0x27;
pub const REG_PREAMBLE_MSB: u8 = 0x2C;
pub const REG_SYNC_CONFIG: u8 = 0x2E;
pub const REG_SYNC_VALUE1: u8 = 0x2F;
pub const REG_PACKET_CONFIG1: u8 = 0x37;
pub const REG_PAYLOAD_LENGTH: u8 = 0x38;
pub const REG_FIFO_THRESH: u8 = 0x3C;
