//! RF register initialization
//!
//! Programs the modem, synthesizer, PA and packet engine in one pass. The chip is put in
//! standby first since most of these registers must not change while the PLL is running.
//! The sequence is only reachable through [`Rfm69::init`](crate::Rfm69::init), which
//! resets the chip before and puts it to sleep after.

use crate::registers::{
    Bitrate, DataModul, FifoThresh, Frequency, FrequencyDeviation, Mode, OpMode, PaLevel,
    PacketConfig1, PayloadLength, Preamble, RxBw, SyncConfig, SyncValue, FIFO_SIZE,
};
use crate::{Error, Rfm69};

/// Modem and packet engine settings applied by [`Rfm69::init_with`](crate::Rfm69::init_with).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RfConfig {
    /// Data mode and modulation scheme
    pub modulation: DataModul,
    /// Bit rate in bits per second
    pub bitrate: u32,
    /// FSK frequency deviation in Hz
    pub deviation: u32,
    /// Power amplifier selection and output power
    pub pa_level: PaLevel,
    /// Receiver channel filter
    pub rx_bandwidth: RxBw,
    /// Preamble length in bytes
    pub preamble_length: u16,
    /// Sync word detection
    pub sync: SyncConfig,
    /// Sync word, only the first `sync.size` bytes are used
    pub sync_word: SyncValue,
    /// Packet format, encoding and CRC
    pub packet: PacketConfig1,
    /// Fixed payload length, or maximum length of variable packets
    pub payload_length: u8,
    /// FIFO threshold and TX start condition
    pub fifo_threshold: FifoThresh,
}

impl Default for RfConfig {
    /// FSK, 4.8kbps, 5kHz deviation, variable length packets with CRC
    fn default() -> Self {
        Self {
            modulation: DataModul::default(),
            bitrate: 4_800,
            deviation: 5_000,
            pa_level: PaLevel::default(),
            rx_bandwidth: RxBw::default(),
            preamble_length: Preamble::default().length,
            sync: SyncConfig::default(),
            sync_word: SyncValue::default(),
            packet: PacketConfig1::default(),
            payload_length: FIFO_SIZE as u8,
            fifo_threshold: FifoThresh::default(),
        }
    }
}

impl<SPI, RESET, DELAY> Rfm69<SPI, RESET, DELAY>
where
    SPI: embedded_hal::spi::SpiDevice,
{
    /// Writes the RF registers for a carrier of `frequency` Hz.
    pub(crate) fn init_rf(&mut self, frequency: u32, config: &RfConfig) -> Result<(), Error> {
        self.gated(|radio| {
            let hw = radio.hardware_mut();
            hw.write(OpMode::new(Mode::Standby))?;
            hw.write(config.modulation)?;
            hw.write(Bitrate::from_bps(config.bitrate))?;
            hw.write(FrequencyDeviation::from_hz(config.deviation))?;
            hw.write(Frequency::from_hz(frequency))?;
            hw.write(config.pa_level)?;
            hw.write(config.rx_bandwidth)?;
            hw.write(Preamble {
                length: config.preamble_length,
            })?;
            hw.write(config.sync)?;
            hw.write(config.sync_word)?;
            hw.write(config.packet)?;
            hw.write(PayloadLength {
                length: config.payload_length,
            })?;
            hw.write(config.fifo_threshold)
        })
    }
}

#[cfg(test)]
mod tests {
    use regiface::FromByteArray;

    use super::*;
    use crate::mock::Bench;
    use crate::registers::{
        DcFree, ModulationType, REG_BITRATE_MSB, REG_DATA_MODUL, REG_FDEV_MSB, REG_FIFO_THRESH, REG_FRF_MSB,
        REG_OP_MODE, REG_PACKET_CONFIG1, REG_PAYLOAD_LENGTH, REG_PA_LEVEL, REG_PREAMBLE_MSB,
        REG_RX_BW, REG_SYNC_CONFIG, REG_SYNC_VALUE1,
    };

    #[test]
    fn registers_written_in_order() {
        let bench = Bench::new();
        let (spi, pin, delay) = Bench::devices(&bench);
        let mut radio = Rfm69::open(spi, pin, delay);
        bench.borrow_mut().events.clear();

        radio.init_rf(868_300_000, &RfConfig::default()).unwrap();

        let addrs: Vec<u8> = bench.borrow().writes().iter().map(|(a, _)| *a).collect();
        assert_eq!(
            addrs,
            vec![
                REG_OP_MODE,
                REG_DATA_MODUL,
                REG_BITRATE_MSB,
                REG_FDEV_MSB,
                REG_FRF_MSB,
                REG_PA_LEVEL,
                REG_RX_BW,
                REG_PREAMBLE_MSB,
                REG_SYNC_CONFIG,
                REG_SYNC_VALUE1,
                REG_PACKET_CONFIG1,
                REG_PAYLOAD_LENGTH,
                REG_FIFO_THRESH,
            ]
        );

        let bench = bench.borrow();
        assert_eq!(&bench.regs[0x03..0x05], &[0x1A, 0x0A]);
        assert_eq!(&bench.regs[0x05..0x07], &[0x00, 0x51]);
        assert_eq!(&bench.regs[0x07..0x0A], &[0xD9, 0x13, 0x33]);
        assert_eq!(&bench.regs[0x2E..0x31], &[0x88, 0x2D, 0xD4]);
        assert_eq!(bench.regs[REG_PACKET_CONFIG1 as usize], 0x90);
        assert_eq!(bench.regs[REG_PAYLOAD_LENGTH as usize], 66);
    }

    #[test]
    fn configs_compare_by_value() {
        let ook = RfConfig {
            modulation: DataModul {
                modulation: ModulationType::Ook,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(RfConfig::default(), RfConfig::default());
        assert_ne!(ook, RfConfig::default());
        assert_eq!(ook.modulation, DataModul::from_bytes([0x08]).unwrap());
    }

    #[test]
    fn custom_config_is_applied() {
        let bench = Bench::new();
        let (spi, pin, delay) = Bench::devices(&bench);
        let mut radio = Rfm69::open(spi, pin, delay);

        let config = RfConfig {
            bitrate: 250_000,
            packet: PacketConfig1 {
                dc_free: DcFree::Whitening,
                ..Default::default()
            },
            payload_length: 32,
            ..Default::default()
        };
        radio.init_with(433_920_000, &config).unwrap();

        let bench = bench.borrow();
        assert_eq!(&bench.regs[0x03..0x05], &[0x00, 0x80]);
        assert_eq!(bench.regs[REG_PACKET_CONFIG1 as usize], 0xD0);
        assert_eq!(bench.regs[REG_PAYLOAD_LENGTH as usize], 32);
        assert_eq!(bench.regs[REG_OP_MODE as usize], 0x00);
    }
}
