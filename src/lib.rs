#![cfg_attr(not(test), no_std)]
//! RFM69HCW Radio Driver
//!
//! This crate provides a type-safe interface for the HopeRF RFM69HCW sub-GHz radio
//! transceiver module. The RFM69HCW is the high power version of the RFM69 family,
//! built around the Semtech SX1231H.
//!
//! # Features
//! - Frequency bands: 315, 433, 868 and 915MHz modules
//! - Modulation support: FSK, GFSK, OOK
//! - Bit rate: 1.2 to 300kbps
//! - Output power up to +20dBm (PA1 + PA2)
//! - 66 byte packet FIFO with CRC, whitening and Manchester encoding
//!
//! # Architecture
//! The driver is organized into several modules:
//!
//! - [`flavor`]: Static hardware descriptors
//!   - Wiring and bus speed of the chip
//!   - SPI address encoding for single and burst accesses
//!
//! - [`hardware`]: Chip-agnostic register transport
//!   - Single and burst register reads and writes over SPI
//!   - Typed register access, sync and async
//!
//! - [`device`]: Device handle and lifecycle
//!   - Open with silicon version check
//!   - Reset, RF initialization, sleep and close
//!   - FIFO access and traffic statistics
//!
//! - [`registers`]: Register definitions for direct hardware access
//!   - [`registers::Version`], [`registers::OpMode`]: Identification and operating mode
//!   - [`registers::Frequency`], [`registers::PaLevel`], ...: RF configuration
//!   - [`registers::PacketConfig1`], [`registers::SyncConfig`], ...: Packet engine
//!   - [`registers::IrqFlags`]: Interrupt status
//!
//! # Usage
//! The driver uses the `regiface` crate to describe registers. The main entry point is
//! the [`Rfm69`] struct which owns the SPI device, the RESET pin and a delay source.
//!
//! Bring-up follows a fixed sequence:
//!
//! 1. [`Rfm69::open`] reads the silicon version and takes the RESET pin
//! 2. [`Rfm69::init`] resets the chip, programs the RF registers and enters sleep mode
//! 3. Higher level code switches modes and moves packets through the FIFO
//! 4. [`Rfm69::close`] enters sleep mode and returns the peripherals
//!
//! # Important Notes
//! - `open` never fails outright, always check [`Rfm69::error`] afterwards
//! - Once an operation fails, the handle refuses further gated operations
//! - Reset timing is fixed by the datasheet and uses blocking delays
//!
//! # Example
//! ```no_run
//! use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};
//! use rfm69hcw::{registers::Mode, Error, Rfm69};
//!
//! fn listen<SPI, RESET, DELAY>(spi: SPI, reset: RESET, delay: DELAY) -> Result<(), Error>
//! where
//!     SPI: SpiDevice,
//!     RESET: OutputPin,
//!     DELAY: DelayNs,
//! {
//!     let mut radio = Rfm69::open(spi, reset, delay);
//!     if let Some(err) = radio.error() {
//!         return Err(err);
//!     }
//!     radio.init(915_000_000)?;
//!     radio.set_mode(Mode::Receive)
//! }
//! ```

pub mod device;
pub mod error;
pub mod flavor;
pub mod hardware;
pub mod registers;
pub mod rf;
pub mod stats;

#[cfg(test)]
mod mock;

pub use device::{Rfm69, State, HW_VERSION};
pub use error::Error;
pub use flavor::{Flavor, Rfm69hcw};
pub use hardware::Hardware;
pub use rf::RfConfig;
pub use stats::Statistics;
