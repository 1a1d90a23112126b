//! SPI register transport
//!
//! This module provides the chip-agnostic layer used to access radio registers over SPI.
//! It supports both synchronous and asynchronous operations.
//!
//! The transport is built around the `Hardware<SPI, F>` struct, which wraps an SPI device
//! and learns everything chip-specific from its [`Flavor`]:
//! - Address byte encoding for single and burst accesses
//! - Bus parameters advertised to the platform layer
//!
//! Each register access is a single SPI transaction: the encoded address byte followed
//! by the data bytes. NSS stays asserted for the whole transaction so burst accesses
//! walk through consecutive registers.
//!
//! # Example
//! ```no_run
//! use rfm69hcw::{hardware::Hardware, registers::Version};
//!
//! # fn demo<SPI: embedded_hal::spi::SpiDevice>(spi: SPI) -> Result<(), rfm69hcw::Error> {
//! let mut hw: Hardware<SPI> = Hardware::open(spi);
//! let version: Version = hw.read()?;
//! hw.write_register(0x01, 0x04)?;
//! # Ok(())
//! # }
//! ```

use core::marker::PhantomData;

use embedded_hal::spi::Error as _;
use regiface::{ByteArray, ReadableRegister, WritableRegister};

use crate::error::Error;
use crate::flavor::{Flavor, Rfm69hcw};

/// Register transport for one radio.
///
/// Failed SPI transactions are recorded in a sticky error slot which stays set until
/// overwritten through [`set_error`](Hardware::set_error).
pub struct Hardware<SPI, F = Rfm69hcw> {
    spi: SPI,
    error: Option<Error>,
    open: bool,
    _flavor: PhantomData<F>,
}

impl<SPI, F: Flavor> Hardware<SPI, F> {
    /// Creates a transport on an SPI device configured for `F`.
    ///
    /// The device should run in SPI mode 0 at no more than [`Flavor::SPEED`].
    pub fn open(spi: SPI) -> Self {
        Self {
            spi,
            error: None,
            open: true,
            _flavor: PhantomData,
        }
    }

    /// Name of the radio
    pub fn name(&self) -> &'static str {
        F::NAME
    }

    /// Path of the SPI device the radio is expected on
    pub fn spi_device(&self) -> &'static str {
        F::SPI_DEVICE
    }

    /// Maximum SPI clock in Hz
    pub fn speed(&self) -> u32 {
        F::SPEED
    }

    /// GPIO used as chip-select
    pub fn custom_cs(&self) -> u8 {
        F::CUSTOM_CS
    }

    /// GPIO receiving the radio interrupt
    pub fn interrupt_pin(&self) -> u8 {
        F::INTERRUPT_PIN
    }

    /// GPIO wired to the RESET line
    pub fn reset_pin(&self) -> u8 {
        F::RESET_PIN
    }

    /// Last recorded transport error
    pub fn error(&self) -> Option<Error> {
        self.error
    }

    /// Overwrites the recorded transport error
    pub fn set_error(&mut self, error: Option<Error>) {
        self.error = error;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Marks the transport closed. Any further access fails with [`Error::Closed`].
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Releases the underlying SPI device.
    ///
    /// This method consumes the transport and returns the wrapped SPI interface.
    pub fn release(self) -> SPI {
        self.spi
    }

    fn check_open(&self) -> Result<(), Error> {
        if self.open {
            Ok(())
        } else {
            Err(Error::Closed)
        }
    }

    fn record<T>(&mut self, result: Result<T, Error>) -> Result<T, Error> {
        if let Err(err) = &result {
            self.error = Some(*err);
        }
        result
    }
}

impl<SPI, F> Hardware<SPI, F>
where
    SPI: embedded_hal::spi::SpiDevice,
    F: Flavor,
{
    /// Reads a single register.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    /// * `Error::Closed` - The transport was closed
    pub fn read_register(&mut self, addr: u8) -> Result<u8, Error> {
        self.check_open()?;
        let mut value = [0u8];
        let result = self
            .spi
            .transaction(&mut [
                embedded_hal::spi::Operation::Write(&[F::read_single_address(addr)]),
                embedded_hal::spi::Operation::Read(&mut value),
            ])
            .map_err(|e| Error::Bus(e.kind()));
        self.record(result)?;
        Ok(value[0])
    }

    /// Reads `bytes.len()` consecutive registers starting at `addr`.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    /// * `Error::Closed` - The transport was closed
    pub fn read_burst(&mut self, addr: u8, bytes: &mut [u8]) -> Result<(), Error> {
        self.check_open()?;
        let result = self
            .spi
            .transaction(&mut [
                embedded_hal::spi::Operation::Write(&[F::read_burst_address(addr)]),
                embedded_hal::spi::Operation::Read(bytes),
            ])
            .map_err(|e| Error::Bus(e.kind()));
        self.record(result)
    }

    /// Writes a single register.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    /// * `Error::Closed` - The transport was closed
    pub fn write_register(&mut self, addr: u8, value: u8) -> Result<(), Error> {
        self.check_open()?;
        let result = self
            .spi
            .transaction(&mut [embedded_hal::spi::Operation::Write(&[
                F::write_single_address(addr),
                value,
            ])])
            .map_err(|e| Error::Bus(e.kind()));
        self.record(result)
    }

    /// Writes consecutive registers starting at `addr`.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    /// * `Error::Closed` - The transport was closed
    pub fn write_burst(&mut self, addr: u8, bytes: &[u8]) -> Result<(), Error> {
        self.check_open()?;
        let result = self
            .spi
            .transaction(&mut [
                embedded_hal::spi::Operation::Write(&[F::write_burst_address(addr)]),
                embedded_hal::spi::Operation::Write(bytes),
            ])
            .map_err(|e| Error::Bus(e.kind()));
        self.record(result)
    }

    /// Reads a typed register.
    ///
    /// Registers spanning more than one byte are read in a single burst.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    /// * `Error::Deserialization` - Failed to parse register value
    pub fn read<R>(&mut self) -> Result<R, Error>
    where
        R: ReadableRegister<IdType = u8>,
    {
        let mut raw_value = R::Array::new();
        let bytes = raw_value.as_mut();
        if bytes.len() == 1 {
            bytes[0] = self.read_register(R::id())?;
        } else {
            self.read_burst(R::id(), bytes)?;
        }
        R::from_bytes(raw_value).map_err(|_| Error::Deserialization)
    }

    /// Writes a typed register.
    ///
    /// Registers spanning more than one byte are written in a single burst.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    /// * `Error::Encoding` - Failed to serialize register value
    pub fn write<R>(&mut self, register: R) -> Result<(), Error>
    where
        R: WritableRegister<IdType = u8>,
    {
        let raw_value = register.to_bytes().map_err(|_| Error::Encoding)?;
        match raw_value.as_ref() {
            [value] => self.write_register(R::id(), *value),
            bytes => self.write_burst(R::id(), bytes),
        }
    }
}

impl<SPI, F> Hardware<SPI, F>
where
    SPI: embedded_hal_async::spi::SpiDevice,
    F: Flavor,
{
    /// Asynchronously reads a single register.
    ///
    /// This is the async version of [`read_register`](Hardware::read_register).
    pub async fn read_register_async(&mut self, addr: u8) -> Result<u8, Error> {
        self.check_open()?;
        let mut value = [0u8];
        let result = self
            .spi
            .transaction(&mut [
                embedded_hal_async::spi::Operation::Write(&[F::read_single_address(addr)]),
                embedded_hal_async::spi::Operation::Read(&mut value),
            ])
            .await
            .map_err(|e| Error::Bus(e.kind()));
        self.record(result)?;
        Ok(value[0])
    }

    /// Asynchronously reads consecutive registers.
    ///
    /// This is the async version of [`read_burst`](Hardware::read_burst).
    pub async fn read_burst_async(&mut self, addr: u8, bytes: &mut [u8]) -> Result<(), Error> {
        self.check_open()?;
        let result = self
            .spi
            .transaction(&mut [
                embedded_hal_async::spi::Operation::Write(&[F::read_burst_address(addr)]),
                embedded_hal_async::spi::Operation::Read(bytes),
            ])
            .await
            .map_err(|e| Error::Bus(e.kind()));
        self.record(result)
    }

    /// Asynchronously writes a single register.
    ///
    /// This is the async version of [`write_register`](Hardware::write_register).
    pub async fn write_register_async(&mut self, addr: u8, value: u8) -> Result<(), Error> {
        self.check_open()?;
        let result = self
            .spi
            .transaction(&mut [embedded_hal_async::spi::Operation::Write(&[
                F::write_single_address(addr),
                value,
            ])])
            .await
            .map_err(|e| Error::Bus(e.kind()));
        self.record(result)
    }

    /// Asynchronously writes consecutive registers.
    ///
    /// This is the async version of [`write_burst`](Hardware::write_burst).
    pub async fn write_burst_async(&mut self, addr: u8, bytes: &[u8]) -> Result<(), Error> {
        self.check_open()?;
        let result = self
            .spi
            .transaction(&mut [
                embedded_hal_async::spi::Operation::Write(&[F::write_burst_address(addr)]),
                embedded_hal_async::spi::Operation::Write(bytes),
            ])
            .await
            .map_err(|e| Error::Bus(e.kind()));
        self.record(result)
    }

    /// Asynchronously reads a typed register.
    ///
    /// This is the async version of [`read`](Hardware::read).
    pub async fn read_async<R>(&mut self) -> Result<R, Error>
    where
        R: ReadableRegister<IdType = u8>,
    {
        let mut raw_value = R::Array::new();
        let bytes = raw_value.as_mut();
        if bytes.len() == 1 {
            bytes[0] = self.read_register_async(R::id()).await?;
        } else {
            self.read_burst_async(R::id(), bytes).await?;
        }
        R::from_bytes(raw_value).map_err(|_| Error::Deserialization)
    }

    /// Asynchronously writes a typed register.
    ///
    /// This is the async version of [`write`](Hardware::write).
    pub async fn write_async<R>(&mut self, register: R) -> Result<(), Error>
    where
        R: WritableRegister<IdType = u8>,
    {
        let raw_value = register.to_bytes().map_err(|_| Error::Encoding)?;
        match raw_value.as_ref() {
            [value] => self.write_register_async(R::id(), *value).await,
            bytes => self.write_burst_async(R::id(), bytes).await,
        }
    }
}
