//! RFM69 device handle and lifecycle
//!
//! This module provides the [`Rfm69`] handle which owns everything needed to drive one
//! radio: the register transport, the RESET pin, a delay source, a receive buffer and
//! traffic counters.
//!
//! The lifecycle follows a fixed order:
//!
//! 1. [`Rfm69::open`] checks the silicon version and takes the RESET pin
//! 2. [`Rfm69::init`] resets the chip, programs the RF registers and puts it to sleep
//! 3. Higher level code drives modes and the FIFO
//! 4. [`Rfm69::close`] puts the chip to sleep and hands the peripherals back
//!
//! # Error handling
//! Every operation returns a `Result`. On top of that the handle keeps the first failure
//! in its [`State`]: once errored, gated operations (reset, init, mode and FIFO access)
//! return the recorded error without touching the bus or the pin. The state can be
//! polled through [`Rfm69::error`].
//!
//! # Example
//! ```no_run
//! use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};
//! use rfm69hcw::{Error, Rfm69};
//!
//! fn bring_up<SPI, RESET, DELAY>(spi: SPI, reset: RESET, delay: DELAY) -> Result<Rfm69<SPI, RESET, DELAY>, Error>
//! where
//!     SPI: SpiDevice,
//!     RESET: OutputPin,
//!     DELAY: DelayNs,
//! {
//!     let mut radio = Rfm69::open(spi, reset, delay);
//!     if let Some(err) = radio.error() {
//!         return Err(err);
//!     }
//!     radio.init(868_300_000)?;
//!     Ok(radio)
//! }
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, OutputPin};

use crate::error::Error;
use crate::flavor::Rfm69hcw;
use crate::hardware::Hardware;
use crate::registers::{IrqFlags, Mode, OpMode, Version, FIFO_SIZE, REG_FIFO};
use crate::rf::RfConfig;
use crate::stats::Statistics;

/// Silicon version supported by this driver
pub const HW_VERSION: u16 = 0x0204;

/// Time RESET is held high, see section 7.2.2 of the datasheet
pub const RESET_PULSE_US: u32 = 100;

/// Time to wait after releasing RESET before the chip accepts commands
pub const RESET_SETTLE_MS: u32 = 5;

/// Lifecycle state of a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Operations are allowed
    Ready,
    /// An operation failed, gated operations are no-ops
    Errored(Error),
}

impl State {
    /// Error recorded by the handle, if any
    pub fn error(self) -> Option<Error> {
        match self {
            State::Ready => None,
            State::Errored(err) => Some(err),
        }
    }
}

/// Packet bytes read out of the FIFO
struct ReceiveBuffer {
    data: [u8; FIFO_SIZE],
    len: usize,
}

impl ReceiveBuffer {
    fn new() -> Self {
        Self {
            data: [0; FIFO_SIZE],
            len: 0,
        }
    }

    fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    fn clear(&mut self) {
        self.len = 0;
    }

    /// Free space right after the buffered bytes, at most `n` bytes long
    fn spare(&mut self, n: usize) -> &mut [u8] {
        let end = (self.len + n).min(FIFO_SIZE);
        &mut self.data[self.len..end]
    }

    fn commit(&mut self, n: usize) {
        self.len = (self.len + n).min(FIFO_SIZE);
    }
}

/// Main device interface for the RFM69HCW radio.
///
/// Single owner, no internal locking: wrap the handle in a mutex to share it.
pub struct Rfm69<SPI, RESET, DELAY> {
    hw: Hardware<SPI, Rfm69hcw>,
    reset: RESET,
    delay: DELAY,
    receive_buffer: ReceiveBuffer,
    stats: Statistics,
    state: State,
}

impl<SPI, RESET, DELAY> Rfm69<SPI, RESET, DELAY> {
    /// Current lifecycle state
    pub fn state(&self) -> State {
        self.state
    }

    /// Error state of the radio.
    ///
    /// The transport error takes precedence over the one recorded by the handle.
    pub fn error(&self) -> Option<Error> {
        self.hw.error().or(self.state.error())
    }

    /// Overwrites the error state of both the transport and the handle.
    ///
    /// `Some` moves the handle to [`State::Errored`], `None` clears both slots.
    pub fn set_error(&mut self, error: Option<Error>) {
        self.hw.set_error(error);
        self.state = match error {
            Some(err) => State::Errored(err),
            None => State::Ready,
        };
    }

    /// Byte and packet counts for the radio
    pub fn statistics(&self) -> Statistics {
        self.stats
    }

    /// Zero the byte and packet counters
    pub fn reset_statistics(&mut self) {
        self.stats = Statistics::default();
    }

    /// Bytes read from the FIFO since the buffer was last cleared
    pub fn receive_buffer(&self) -> &[u8] {
        self.receive_buffer.as_slice()
    }

    /// Drop all buffered FIFO bytes
    pub fn clear_receive_buffer(&mut self) {
        self.receive_buffer.clear();
    }

    /// Register transport, for collaborators needing raw register access
    pub fn hardware(&self) -> &Hardware<SPI, Rfm69hcw> {
        &self.hw
    }

    /// Mutable register transport
    pub fn hardware_mut(&mut self) -> &mut Hardware<SPI, Rfm69hcw> {
        &mut self.hw
    }

    /// Fails with the current error, from either the transport or the handle
    fn check(&self) -> Result<(), Error> {
        self.error().map_or(Ok(()), Err)
    }

    /// Runs `op` if no error is recorded and records its failure
    pub(crate) fn gated<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        self.check()?;
        let result = op(self);
        if let Err(err) = result {
            self.state = State::Errored(err);
        }
        result
    }
}

impl<SPI, RESET, DELAY> Rfm69<SPI, RESET, DELAY>
where
    SPI: embedded_hal::spi::SpiDevice,
    RESET: OutputPin,
    DELAY: DelayNs,
{
    /// Opens the radio device.
    ///
    /// Always returns a handle, check [`error`](Rfm69::error) to know whether the radio
    /// is usable. On a version mismatch or when RESET cannot be driven the transport is
    /// closed and the only meaningful operations left are the accessors and
    /// [`close`](Rfm69::close).
    pub fn open(spi: SPI, reset: RESET, delay: DELAY) -> Self {
        let mut radio = Self {
            hw: Hardware::open(spi),
            reset,
            delay,
            receive_buffer: ReceiveBuffer::new(),
            stats: Statistics::default(),
            state: State::Ready,
        };
        let version = match radio.version() {
            Ok(version) => version,
            Err(err) => {
                #[cfg(feature = "defmt")]
                defmt::error!("RFM69: version read failed: {}", err);
                radio.state = State::Errored(err);
                return radio;
            }
        };
        if version != HW_VERSION {
            #[cfg(feature = "defmt")]
            defmt::error!(
                "RFM69: unexpected version {=u16:#x} (expected {=u16:#x})",
                version,
                HW_VERSION
            );
            radio.hw.close();
            radio.set_error(Some(Error::HardwareVersion {
                actual: version,
                expected: HW_VERSION,
            }));
            return radio;
        }
        if let Err(err) = radio.reset.set_low() {
            #[cfg(feature = "defmt")]
            defmt::error!("RFM69: unable to drive RESET");
            radio.hw.close();
            radio.set_error(Some(Error::Pin(err.kind())));
            return radio;
        }
        #[cfg(feature = "defmt")]
        defmt::info!("RFM69: opened, version {=u16:#x}", version);
        radio
    }

    /// Closes the radio device.
    ///
    /// Puts the radio to sleep whenever the transport is still usable, then releases
    /// the peripherals. A failure to enter sleep does not prevent the release and is
    /// only logged.
    pub fn close(mut self) -> (SPI, RESET, DELAY) {
        if self.hw.is_open() && self.hw.error().is_none() {
            if let Err(_err) = self.hw.write(OpMode::new(Mode::Sleep)) {
                #[cfg(feature = "defmt")]
                defmt::warn!("RFM69: sleep on close failed: {}", _err);
            }
        }
        self.hw.close();
        (self.hw.release(), self.reset, self.delay)
    }

    /// Returns the radio's hardware version.
    ///
    /// `RegVersion` holds the revision in its upper nibble and the mask in the lower one,
    /// the result has them in separate bytes. Not gated by the handle state.
    pub fn version(&mut self) -> Result<u16, Error> {
        Ok(self.hw.read::<Version>()?.composite())
    }

    /// Resets the radio device. See section 7.2.2 of the datasheet.
    ///
    /// RESET is held high for 100µs, then released. The chip needs 5ms afterwards,
    /// this delay is always observed even when releasing RESET failed.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.check()?;
        #[cfg(feature = "defmt")]
        defmt::debug!("RFM69: reset");
        let asserted = self.reset.set_high().map_err(|e| Error::Pin(e.kind()));
        self.delay.delay_us(RESET_PULSE_US);
        let released = self.reset.set_low().map_err(|e| Error::Pin(e.kind()));
        self.delay.delay_ms(RESET_SETTLE_MS);
        if let Err(err) = released.and(asserted) {
            self.state = State::Errored(err);
            return Err(err);
        }
        Ok(())
    }

    /// Initializes the radio on a carrier of `frequency` Hz with the default [`RfConfig`].
    pub fn init(&mut self, frequency: u32) -> Result<(), Error> {
        self.init_with(frequency, &RfConfig::default())
    }

    /// Initializes the radio with a custom RF configuration.
    ///
    /// Resets the chip, programs the RF registers, and leaves the radio in sleep mode.
    pub fn init_with(&mut self, frequency: u32, config: &RfConfig) -> Result<(), Error> {
        self.reset()?;
        self.init_rf(frequency, config)?;
        self.set_mode(Mode::Sleep)
    }

    /// Requests an operating mode
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error> {
        self.gated(|radio| radio.hw.write(OpMode::new(mode)))
    }

    /// Reads back the operating mode
    pub fn mode(&mut self) -> Result<Mode, Error> {
        self.gated(|radio| Ok(radio.hw.read::<OpMode>()?.mode))
    }

    /// Reads both interrupt flag registers
    pub fn irq_flags(&mut self) -> Result<IrqFlags, Error> {
        self.gated(|radio| radio.hw.read::<IrqFlags>())
    }

    /// Burst-writes `data` into the FIFO.
    ///
    /// Counts as one packet in the [`Statistics`]. Fails with [`Error::FifoOverflow`]
    /// when `data` does not fit in the FIFO, without changing the state.
    pub fn write_fifo(&mut self, data: &[u8]) -> Result<(), Error> {
        if data.len() > FIFO_SIZE {
            return Err(Error::FifoOverflow);
        }
        self.gated(|radio| {
            radio.hw.write_burst(REG_FIFO, data)?;
            radio.stats.record(data.len());
            Ok(())
        })
    }

    /// Burst-reads up to `n` bytes from the FIFO into the receive buffer.
    ///
    /// `n` is capped to the free space of the buffer. Returns the number of bytes read,
    /// a non-empty read counts as one packet in the [`Statistics`].
    pub fn read_fifo(&mut self, n: usize) -> Result<usize, Error> {
        self.gated(|radio| {
            let spare = radio.receive_buffer.spare(n);
            let len = spare.len();
            if len == 0 {
                return Ok(0);
            }
            radio.hw.read_burst(REG_FIFO, spare)?;
            radio.receive_buffer.commit(len);
            radio.stats.record(len);
            Ok(len)
        })
    }
}
