//! Hardware descriptors
//!
//! A [`Flavor`] tells the chip-agnostic [`Hardware`](crate::hardware::Hardware) transport
//! everything it needs to talk to one particular radio: where the chip is wired, how fast
//! the bus may run, and how a register address is put on the wire for each kind of access.
//!
//! Radios sharing the same SPI framing differ mostly in the address byte. Some need a bit
//! set for reads, some for writes, some have a dedicated burst bit. Keeping that knowledge
//! in the flavor lets the transport be written once.

/// Bit set in the address byte of a write access
pub const SPI_WRITE_MODE: u8 = 0x80;

/// Static description of a radio chip variant.
pub trait Flavor {
    /// Human readable name of the radio
    const NAME: &'static str;
    /// Path of the SPI device the radio is attached to
    const SPI_DEVICE: &'static str;
    /// Maximum SPI clock in Hz
    const SPEED: u32;
    /// GPIO used as a custom chip-select line
    const CUSTOM_CS: u8;
    /// GPIO receiving the radio interrupt (DIO0)
    const INTERRUPT_PIN: u8;
    /// GPIO wired to the radio RESET input
    const RESET_PIN: u8;

    /// Address byte for a single register read
    fn read_single_address(addr: u8) -> u8;
    /// Address byte for a burst read starting at `addr`
    fn read_burst_address(addr: u8) -> u8;
    /// Address byte for a single register write
    fn write_single_address(addr: u8) -> u8;
    /// Address byte for a burst write starting at `addr`
    fn write_burst_address(addr: u8) -> u8;
}

/// HopeRF RFM69HCW module.
///
/// The address byte carries no read-mode bit: reads send the address unchanged and
/// writes set [`SPI_WRITE_MODE`]. Burst and single accesses share the same encoding,
/// the chip auto-increments the address while NSS stays low.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rfm69hcw;

impl Flavor for Rfm69hcw {
    const NAME: &'static str = "RFM69HCW";
    const SPI_DEVICE: &'static str = "/dev/spidev0.1";
    const SPEED: u32 = 10_000_000;
    const CUSTOM_CS: u8 = 7;
    const INTERRUPT_PIN: u8 = 24;
    const RESET_PIN: u8 = 25;

    fn read_single_address(addr: u8) -> u8 {
        addr
    }

    fn read_burst_address(addr: u8) -> u8 {
        addr
    }

    fn write_single_address(addr: u8) -> u8 {
        SPI_WRITE_MODE | addr
    }

    fn write_burst_address(addr: u8) -> u8 {
        SPI_WRITE_MODE | addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_pass_address_through() {
        for addr in 0..=0x7Fu8 {
            assert_eq!(Rfm69hcw::read_single_address(addr), addr);
            assert_eq!(Rfm69hcw::read_burst_address(addr), addr);
        }
    }

    #[test]
    fn writes_set_write_mode_bit() {
        for addr in 0..=0x7Fu8 {
            assert_eq!(Rfm69hcw::write_single_address(addr), addr | SPI_WRITE_MODE);
            assert_eq!(Rfm69hcw::write_burst_address(addr), addr | SPI_WRITE_MODE);
        }
        assert_eq!(Rfm69hcw::write_single_address(0x01), 0x81);
    }

    #[test]
    fn descriptor_values() {
        assert_eq!(Rfm69hcw::NAME, "RFM69HCW");
        assert_eq!(Rfm69hcw::SPEED, 10_000_000);
        assert!(Rfm69hcw::SPI_DEVICE.starts_with("/dev/spidev"));
    }
}
