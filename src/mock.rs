//! Test doubles for the embedded-hal traits used by the driver.
//!
//! Every mock shares one [`Bench`] so tests can check the relative order of bus
//! transactions, pin levels and delays.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use embedded_hal::digital;
use embedded_hal::spi::{self, Operation};

use crate::flavor::SPI_WRITE_MODE;
use crate::registers::{REG_FIFO, REG_VERSION};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Read { addr: u8, len: usize },
    Write { addr: u8, data: Vec<u8> },
    Pin(bool),
    PinFailed(bool),
    Delay(u64),
}

pub struct Bench {
    pub regs: [u8; 0x80],
    /// Bytes served by reads of `RegFifo`
    pub fifo: VecDeque<u8>,
    /// Bytes written to `RegFifo`
    pub sent: Vec<u8>,
    pub spi_fail: Option<spi::ErrorKind>,
    pub pin_fail_high: bool,
    pub pin_fail_low: bool,
    pub events: Vec<Event>,
}

pub type SharedBench = Rc<RefCell<Bench>>;

impl Bench {
    /// A bench whose chip reports the RFM69 silicon version
    pub fn new() -> SharedBench {
        Self::with_version(0x24)
    }

    pub fn with_version(raw: u8) -> SharedBench {
        let mut regs = [0u8; 0x80];
        regs[REG_VERSION as usize] = raw;
        Rc::new(RefCell::new(Bench {
            regs,
            fifo: VecDeque::new(),
            sent: Vec::new(),
            spi_fail: None,
            pin_fail_high: false,
            pin_fail_low: false,
            events: Vec::new(),
        }))
    }

    pub fn devices(bench: &SharedBench) -> (MockSpi, MockPin, MockDelay) {
        (
            MockSpi(bench.clone()),
            MockPin(bench.clone()),
            MockDelay(bench.clone()),
        )
    }

    pub fn writes(&self) -> Vec<(u8, Vec<u8>)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Write { addr, data } => Some((*addr, data.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn pin_events(&self) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Pin(_) | Event::PinFailed(_)))
            .cloned()
            .collect()
    }

    fn transact(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), spi::ErrorKind> {
        if let Some(kind) = self.spi_fail {
            return Err(kind);
        }
        let mut header = None;
        let mut payload = Vec::new();
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    let mut bytes = bytes.iter().copied();
                    if header.is_none() {
                        header = bytes.next();
                    }
                    payload.extend(bytes);
                }
                Operation::Read(buf) => {
                    let addr = header.unwrap_or_default() & !SPI_WRITE_MODE;
                    self.events.push(Event::Read {
                        addr,
                        len: buf.len(),
                    });
                    let mut cursor = addr as usize;
                    for b in buf.iter_mut() {
                        if addr == REG_FIFO {
                            *b = self.fifo.pop_front().unwrap_or_default();
                        } else {
                            *b = self.regs[cursor % 0x80];
                            cursor += 1;
                        }
                    }
                }
                _ => {}
            }
        }
        if let Some(header) = header {
            if header & SPI_WRITE_MODE != 0 {
                let addr = header & !SPI_WRITE_MODE;
                if addr == REG_FIFO {
                    self.sent.extend_from_slice(&payload);
                } else {
                    for (i, b) in payload.iter().enumerate() {
                        self.regs[(addr as usize + i) % 0x80] = *b;
                    }
                }
                self.events.push(Event::Write {
                    addr,
                    data: payload,
                });
            }
        }
        Ok(())
    }
}

pub struct MockSpi(pub SharedBench);

impl spi::ErrorType for MockSpi {
    type Error = spi::ErrorKind;
}

impl spi::SpiDevice<u8> for MockSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        self.0.borrow_mut().transact(operations)
    }
}

impl embedded_hal_async::spi::SpiDevice<u8> for MockSpi {
    async fn transaction(
        &mut self,
        operations: &mut [Operation<'_, u8>],
    ) -> Result<(), Self::Error> {
        self.0.borrow_mut().transact(operations)
    }
}

pub struct MockPin(pub SharedBench);

impl MockPin {
    fn drive(&mut self, level: bool) -> Result<(), digital::ErrorKind> {
        let mut bench = self.0.borrow_mut();
        let fail = if level {
            bench.pin_fail_high
        } else {
            bench.pin_fail_low
        };
        if fail {
            bench.events.push(Event::PinFailed(level));
            Err(digital::ErrorKind::Other)
        } else {
            bench.events.push(Event::Pin(level));
            Ok(())
        }
    }
}

impl digital::ErrorType for MockPin {
    type Error = digital::ErrorKind;
}

impl digital::OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true)
    }
}

pub struct MockDelay(pub SharedBench);

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().events.push(Event::Delay(ns as u64));
    }

    fn delay_us(&mut self, us: u32) {
        self.0.borrow_mut().events.push(Event::Delay(us as u64 * 1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().events.push(Event::Delay(ms as u64 * 1_000_000));
    }
}

/// Drive a future whose I/O completes immediately
pub fn block_on<F: Future>(fut: F) -> F::Output {
    let mut fut = pin!(fut);
    let mut cx = Context::from_waker(Waker::noop());
    loop {
        if let Poll::Ready(out) = fut.as_mut().poll(&mut cx) {
            return out;
        }
    }
}
