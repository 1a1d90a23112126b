//! Operating mode and chip identification registers
//!
//! This module contains registers controlling the top-level state of the radio:
//! - Operating mode (sleep, standby, frequency synthesis, TX, RX)
//! - Data processing mode and modulation scheme
//! - Silicon version
//!
//! The operating mode is the central piece of the RFM69 state machine. Most configuration
//! registers should only be changed while the chip sits in standby.

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// Error type for an unknown operating mode value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidMode(pub u8);

/// Transceiver operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Lowest power mode, register content is retained
    Sleep = 0,
    /// Crystal oscillator running
    #[default]
    Standby = 1,
    /// PLL locked on the carrier frequency
    FrequencySynthesizer = 2,
    /// Transmitting
    Transmit = 3,
    /// Receiving
    Receive = 4,
}

impl TryFrom<u8> for Mode {
    type Error = InvalidMode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Sleep),
            1 => Ok(Self::Standby),
            2 => Ok(Self::FrequencySynthesizer),
            3 => Ok(Self::Transmit),
            4 => Ok(Self::Receive),
            invalid => Err(InvalidMode(invalid)),
        }
    }
}

/// Operating mode register (address: 0x01)
///
/// See section 4.2 of the datasheet.
///
/// # Important Notes
/// - The sequencer should stay enabled, it handles the PLL and PA ramping
/// - Listen mode is not driven by this crate and is always written as disabled
#[register(0x01u8)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct OpMode {
    /// Disable the automatic sequencer
    pub sequencer_off: bool,
    /// Listen mode enabled
    pub listen_on: bool,
    /// Requested operating mode
    pub mode: Mode,
}

impl OpMode {
    /// Register value selecting `mode` with the sequencer enabled
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }
}

/// Data processing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataMode {
    /// FIFO based packet handling
    #[default]
    Packet = 0b00,
    /// Continuous mode with bit synchronizer
    ContinuousSync = 0b10,
    /// Continuous mode without bit synchronizer
    Continuous = 0b11,
}

/// Modulation scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModulationType {
    /// Frequency shift keying
    #[default]
    Fsk = 0b00,
    /// On-off keying
    Ook = 0b01,
}

/// Error type for a reserved data modulation encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDataModul(pub u8);

/// Data modulation register (address: 0x02)
#[register(0x02u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister, Default)]
pub struct DataModul {
    /// Data processing mode
    pub data_mode: DataMode,
    /// Modulation scheme
    pub modulation: ModulationType,
    /// Modulation shaping, 0 = none.
    /// Meaning of 1..=3 depends on the modulation type.
    pub shaping: u8,
}

/// Version register (address: 0x10)
///
/// Read-only. The upper nibble holds the full revision number, the lower
/// nibble the metal mask revision.
#[register(0x10u8)]
#[derive(Debug, Clone, Copy, ReadableRegister)]
pub struct Version {
    /// Raw register content
    pub raw: u8,
}

impl Version {
    /// Revision and mask spread over the two bytes of a `u16`:
    /// `0x24` reads as `0x0204`.
    pub fn composite(self) -> u16 {
        u16::from(self.raw >> 4) << 8 | u16::from(self.raw & 0x0F)
    }
}

impl FromByteArray for OpMode {
    type Error = InvalidMode;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            sequencer_off: bytes[0] & 0x80 != 0,
            listen_on: bytes[0] & 0x40 != 0,
            mode: Mode::try_from((bytes[0] >> 2) & 0x07)?,
        })
    }
}

impl ToByteArray for OpMode {
    type Error = core::convert::Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.sequencer_off as u8) << 7 | (self.listen_on as u8) << 6 | (self.mode as u8) << 2])
    }
}

impl FromByteArray for DataModul {
    type Error = InvalidDataModul;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let data_mode = match (bytes[0] >> 5) & 0x03 {
            0b00 => DataMode::Packet,
            0b10 => DataMode::ContinuousSync,
            0b11 => DataMode::Continuous,
            _ => return Err(InvalidDataModul(bytes[0])),
        };
        let modulation = match (bytes[0] >> 3) & 0x03 {
            0b00 => ModulationType::Fsk,
            0b01 => ModulationType::Ook,
            _ => return Err(InvalidDataModul(bytes[0])),
        };
        Ok(Self {
            data_mode,
            modulation,
            shaping: bytes[0] & 0x03,
        })
    }
}

impl ToByteArray for DataModul {
    type Error = core::convert::Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.data_mode as u8) << 5 | (self.modulation as u8) << 3 | (self.shaping & 0x03)])
    }
}

impl FromByteArray for Version {
    type Error = core::convert::Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { raw: bytes[0] })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_nibbles_are_spread() {
        assert_eq!(Version { raw: 0x24 }.composite(), 0x0204);
        assert_eq!(Version { raw: 0x15 }.composite(), 0x0105);
        for raw in 0..=u8::MAX {
            let expected = u16::from(raw >> 4) << 8 | u16::from(raw & 0xF);
            assert_eq!(Version { raw }.composite(), expected);
        }
    }

    #[test]
    fn op_mode_layout() {
        assert_eq!(OpMode::new(Mode::Sleep).to_bytes().unwrap(), [0x00]);
        assert_eq!(OpMode::new(Mode::Standby).to_bytes().unwrap(), [0x04]);
        assert_eq!(OpMode::new(Mode::Receive).to_bytes().unwrap(), [0x10]);

        let reg = OpMode::from_bytes([0x8C]).unwrap();
        assert!(reg.sequencer_off);
        assert!(!reg.listen_on);
        assert_eq!(reg.mode, Mode::Transmit);
    }

    #[test]
    fn op_mode_rejects_reserved_modes() {
        assert_eq!(OpMode::from_bytes([0x14]).unwrap_err(), InvalidMode(5));
    }

    #[test]
    fn data_modul_layout() {
        let reg = DataModul {
            data_mode: DataMode::ContinuousSync,
            modulation: ModulationType::Ook,
            shaping: 1,
        };
        assert_eq!(reg.to_bytes().unwrap(), [0x49]);
        assert!(DataModul::from_bytes([0x20]).is_err());
    }
}
