//! RF-related registers
//!
//! This module contains registers related to RF configuration:
//! - Bit rate
//! - FSK frequency deviation
//! - Carrier frequency
//! - Power amplifier selection and output power
//! - Receiver channel filter bandwidth
//!
//! All frequencies are derived from the 32MHz crystal. The synthesizer step is
//! `FXOSC / 2^19`, about 61Hz.

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use super::FXOSC;

/// Bit rate register pair (address: 0x03-0x04)
///
/// `bitrate = FXOSC / value`
#[register(0x03u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct Bitrate {
    /// Divider applied to the crystal frequency
    pub value: u16,
}

impl Bitrate {
    /// Divider closest to `bps`, saturating at the register limits
    pub fn from_bps(bps: u32) -> Self {
        let value = FXOSC / u64::from(bps.max(1));
        Self {
            value: value.clamp(1, u64::from(u16::MAX)) as u16,
        }
    }

    /// Bit rate in bits per second
    pub fn bps(self) -> u32 {
        (FXOSC / u64::from(self.value.max(1))) as u32
    }
}

impl Default for Bitrate {
    /// 4.8kbps, the value after reset
    fn default() -> Self {
        Self { value: 0x1A0B }
    }
}

/// Frequency deviation register pair (address: 0x05-0x06)
///
/// `fdev = Fstep * value` where only the 14 lower bits are used.
#[register(0x05u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct FrequencyDeviation {
    /// Deviation in synthesizer steps
    pub value: u16,
}

impl FrequencyDeviation {
    /// Deviation of `hz` rounded down to a synthesizer step
    pub fn from_hz(hz: u32) -> Self {
        let value = (u64::from(hz) << 19) / FXOSC;
        Self {
            value: value.min(0x3FFF) as u16,
        }
    }
}

impl Default for FrequencyDeviation {
    /// 5kHz, the value after reset
    fn default() -> Self {
        Self { value: 0x0052 }
    }
}

/// Carrier frequency registers (address: 0x07-0x09)
///
/// # Important Notes
/// - The frequency change only takes effect once the LSB is written,
///   so the three bytes are always written together in a burst
#[register(0x07u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct Frequency {
    /// 24-bit synthesizer word
    pub frf: u32,
}

impl Frequency {
    /// Largest synthesizer word
    pub const MAX_FRF: u32 = 0x00FF_FFFF;

    /// Synthesizer word for a carrier of `hz`, saturated to the 24-bit range
    pub fn from_hz(hz: u32) -> Self {
        let frf = (u64::from(hz) << 19) / FXOSC;
        Self {
            frf: frf.min(u64::from(Self::MAX_FRF)) as u32,
        }
    }

    /// Carrier frequency in Hz
    pub fn hz(self) -> u32 {
        ((u64::from(self.frf) * FXOSC) >> 19) as u32
    }
}

/// PA selection and output power register (address: 0x11)
///
/// # Important Notes
/// - On the high power RFM69HCW module only PA1 and PA2 are wired to the antenna pin,
///   leaving PA0 enabled yields no output
/// - Output power is `-18dBm + output_power` with PA1 alone,
///   `-14dBm + output_power` with PA1 and PA2
#[register(0x11u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PaLevel {
    /// Enable PA0
    pub pa0_on: bool,
    /// Enable PA1
    pub pa1_on: bool,
    /// Enable PA2
    pub pa2_on: bool,
    /// Output power setting, 5 bits
    pub output_power: u8,
}

impl Default for PaLevel {
    /// PA1 at full scale (+13dBm)
    fn default() -> Self {
        Self {
            pa0_on: false,
            pa1_on: true,
            pa2_on: false,
            output_power: 0x1F,
        }
    }
}

/// Channel filter mantissa
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxBwMant {
    Mant16 = 0b00,
    Mant20 = 0b01,
    Mant24 = 0b10,
}

/// Error type for a reserved bandwidth mantissa
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidRxBw(pub u8);

/// Channel filter bandwidth register (address: 0x19)
///
/// In FSK mode: `RxBw = FXOSC / (mantissa * 2^(exponent + 2))`
#[register(0x19u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct RxBw {
    /// DC canceller cutoff, 3 bits
    pub dcc_freq: u8,
    /// Filter mantissa
    pub mantissa: RxBwMant,
    /// Filter exponent, 3 bits
    pub exponent: u8,
}

impl RxBw {
    /// FSK channel filter bandwidth in Hz
    pub fn fsk_hz(self) -> u32 {
        let mant: u64 = match self.mantissa {
            RxBwMant::Mant16 => 16,
            RxBwMant::Mant20 => 20,
            RxBwMant::Mant24 => 24,
        };
        (FXOSC / (mant << (u32::from(self.exponent & 0x07) + 2))) as u32
    }
}

impl Default for RxBw {
    /// 10.4kHz, 4% DCC
    fn default() -> Self {
        Self {
            dcc_freq: 2,
            mantissa: RxBwMant::Mant24,
            exponent: 5,
        }
    }
}

impl FromByteArray for Bitrate {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            value: u16::from_be_bytes(bytes),
        })
    }
}

impl ToByteArray for Bitrate {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.value.to_be_bytes())
    }
}

impl FromByteArray for FrequencyDeviation {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            value: u16::from_be_bytes(bytes) & 0x3FFF,
        })
    }
}

impl ToByteArray for FrequencyDeviation {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok((self.value & 0x3FFF).to_be_bytes())
    }
}

impl FromByteArray for Frequency {
    type Error = Infallible;
    type Array = [u8; 3];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            frf: u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]),
        })
    }
}

impl ToByteArray for Frequency {
    type Error = Infallible;
    type Array = [u8; 3];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let [_, msb, mid, lsb] = self.frf.to_be_bytes();
        Ok([msb, mid, lsb])
    }
}

impl FromByteArray for PaLevel {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            pa0_on: bytes[0] & 0x80 != 0,
            pa1_on: bytes[0] & 0x40 != 0,
            pa2_on: bytes[0] & 0x20 != 0,
            output_power: bytes[0] & 0x1F,
        })
    }
}

impl ToByteArray for PaLevel {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.pa0_on as u8) << 7
            | (self.pa1_on as u8) << 6
            | (self.pa2_on as u8) << 5
            | (self.output_power & 0x1F)])
    }
}

impl FromByteArray for RxBw {
    type Error = InvalidRxBw;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let mantissa = match (bytes[0] >> 3) & 0x03 {
            0b00 => RxBwMant::Mant16,
            0b01 => RxBwMant::Mant20,
            0b10 => RxBwMant::Mant24,
            _ => return Err(InvalidRxBw(bytes[0])),
        };
        Ok(Self {
            dcc_freq: bytes[0] >> 5,
            mantissa,
            exponent: bytes[0] & 0x07,
        })
    }
}

impl ToByteArray for RxBw {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.dcc_freq & 0x07) << 5 | (self.mantissa as u8) << 3 | (self.exponent & 0x07)])
    }
}
