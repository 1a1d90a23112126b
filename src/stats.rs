//! Traffic counters

/// Byte and packet counts moved through the FIFO
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Statistics {
    /// Bytes written to or read from the FIFO
    pub bytes: u64,
    /// FIFO bursts, one per packet
    pub packets: u64,
}

impl Statistics {
    pub(crate) fn record(&mut self, bytes: usize) {
        self.bytes = self.bytes.saturating_add(bytes as u64);
        self.packets = self.packets.saturating_add(1);
    }
}
