//! Register access to the ATPL230.
//!
//! The engine talks to the modem only through [`PhyBus`]: raw buffer reads and writes at a
//! 16-bit address, plus typed helpers built on top of them. Registers wider than a byte
//! are big-endian, so the lowest address holds the most significant byte.
//!
//! With the `spi` feature, [`SpiPhyBus`] implements the trait over an `embedded-hal`
//! [`SpiDevice`](embedded_hal::spi::SpiDevice).

use crate::error::PhyError;

/// Byte, word and buffer access to the modem's address space.
///
/// Only [`read_buf`](PhyBus::read_buf) and [`write_buf`](PhyBus::write_buf) are required.
/// The bit operations default to read-modify-write; buses with native commands for them
/// should override.
pub trait PhyBus {
    /// Reads `buf.len()` bytes starting at `addr`.
    fn read_buf(&mut self, addr: u16, buf: &mut [u8]);

    /// Writes `data` starting at `addr`.
    fn write_buf(&mut self, addr: u16, data: &[u8]);

    /// Reads one byte.
    fn read8(&mut self, addr: u16) -> u8 {
        let mut b = [0u8; 1];
        self.read_buf(addr, &mut b);
        b[0]
    }

    /// Reads a big-endian 16-bit register.
    fn read16(&mut self, addr: u16) -> u16 {
        let mut b = [0u8; 2];
        self.read_buf(addr, &mut b);
        u16::from_be_bytes(b)
    }

    /// Reads a big-endian 32-bit register.
    fn read32(&mut self, addr: u16) -> u32 {
        let mut b = [0u8; 4];
        self.read_buf(addr, &mut b);
        u32::from_be_bytes(b)
    }

    /// Writes one byte.
    fn write8(&mut self, addr: u16, value: u8) {
        self.write_buf(addr, &[value]);
    }

    /// Writes a big-endian 16-bit register.
    fn write16(&mut self, addr: u16, value: u16) {
        self.write_buf(addr, &value.to_be_bytes());
    }

    /// Writes a big-endian 32-bit register.
    fn write32(&mut self, addr: u16, value: u32) {
        self.write_buf(addr, &value.to_be_bytes());
    }

    /// `reg &= mask`
    fn and8(&mut self, addr: u16, mask: u8) {
        let v = self.read8(addr);
        self.write8(addr, v & mask);
    }

    /// `reg |= mask`
    fn or8(&mut self, addr: u16, mask: u8) {
        let v = self.read8(addr);
        self.write8(addr, v | mask);
    }

    /// `reg ^= mask`
    fn xor8(&mut self, addr: u16, mask: u8) {
        let v = self.read8(addr);
        self.write8(addr, v ^ mask);
    }

    /// Reports (and clears) a fault recorded by the bus since the last call.
    ///
    /// Buses that cannot fail keep the default.
    fn take_error(&mut self) -> Result<(), PhyError> {
        Ok(())
    }
}

#[cfg(feature = "spi")]
pub use spi::SpiPhyBus;

#[cfg(feature = "spi")]
mod spi {
    use super::PhyBus;
    use crate::error::PhyError;
    use embedded_hal::spi::{Error as _, ErrorKind, Operation, SpiDevice};

    const CMD_READ: u8 = 0x63;
    const CMD_WRITE: u8 = 0x2A;
    const CMD_AND: u8 = 0x5A;
    const CMD_OR: u8 = 0x3C;
    const CMD_XOR: u8 = 0x1E;

    /// [`PhyBus`] over an SPI device using the PPLC serial framing.
    ///
    /// Every access is one SPI transaction: a command byte, the 16-bit address, the 16-bit
    /// length, then the data. Bit operations use the modem's native AND/OR/XOR commands.
    ///
    /// The register paths of the engine cannot fail, so the first SPI error is latched
    /// here and reported by [`PhyBus::take_error`].
    #[derive(Debug)]
    pub struct SpiPhyBus<SPI> {
        spi: SPI,
        error: Option<ErrorKind>,
    }

    impl<SPI: SpiDevice> SpiPhyBus<SPI> {
        /// Wraps an SPI device.
        pub fn new(spi: SPI) -> Self {
            Self { spi, error: None }
        }

        /// Gives the SPI device back.
        pub fn release(self) -> SPI {
            self.spi
        }

        fn header(cmd: u8, addr: u16, len: usize) -> [u8; 5] {
            let [a_hi, a_lo] = addr.to_be_bytes();
            let [l_hi, l_lo] = (len as u16).to_be_bytes();
            [cmd, a_hi, a_lo, l_hi, l_lo]
        }

        fn record(&mut self, result: Result<(), SPI::Error>) {
            if let Err(e) = result {
                if self.error.is_none() {
                    warn!("spi transfer failed");
                    self.error = Some(e.kind());
                }
            }
        }

        fn bit_op(&mut self, cmd: u8, addr: u16, mask: u8) {
            let header = Self::header(cmd, addr, 1);
            let result = self
                .spi
                .transaction(&mut [Operation::Write(&header), Operation::Write(&[mask])]);
            self.record(result);
        }
    }

    impl<SPI: SpiDevice> PhyBus for SpiPhyBus<SPI> {
        fn read_buf(&mut self, addr: u16, buf: &mut [u8]) {
            let header = Self::header(CMD_READ, addr, buf.len());
            let result = self
                .spi
                .transaction(&mut [Operation::Write(&header), Operation::Read(buf)]);
            self.record(result);
        }

        fn write_buf(&mut self, addr: u16, data: &[u8]) {
            let header = Self::header(CMD_WRITE, addr, data.len());
            let result = self
                .spi
                .transaction(&mut [Operation::Write(&header), Operation::Write(data)]);
            self.record(result);
        }

        fn and8(&mut self, addr: u16, mask: u8) {
            self.bit_op(CMD_AND, addr, mask);
        }

        fn or8(&mut self, addr: u16, mask: u8) {
            self.bit_op(CMD_OR, addr, mask);
        }

        fn xor8(&mut self, addr: u16, mask: u8) {
            self.bit_op(CMD_XOR, addr, mask);
        }

        fn take_error(&mut self) -> Result<(), PhyError> {
            match self.error.take() {
                Some(kind) => Err(PhyError::Bus(kind)),
                None => Ok(()),
            }
        }
    }
}

/// Flat 64 KiB register file standing in for the modem in tests.
#[cfg(test)]
pub(crate) struct MemBus {
    pub(crate) mem: Vec<u8>,
    /// Start address of every read, in order.
    pub(crate) reads: Vec<u16>,
}

#[cfg(test)]
impl MemBus {
    pub(crate) fn new() -> Self {
        Self {
            mem: vec![0u8; 0x1_0000],
            reads: Vec::new(),
        }
    }
}

#[cfg(test)]
impl PhyBus for MemBus {
    fn read_buf(&mut self, addr: u16, buf: &mut [u8]) {
        self.reads.push(addr);
        let start = addr as usize;
        buf.copy_from_slice(&self.mem[start..start + buf.len()]);
    }

    fn write_buf(&mut self, addr: u16, data: &[u8]) {
        let start = addr as usize;
        self.mem[start..start + data.len()].copy_from_slice(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    #[test]
    fn test_default_helpers_are_big_endian() {
        let mut bus = MemBus::new();
        bus.write32(0x1000, 0x1122_3344);
        assert_eq!(&bus.mem[0x1000..0x1004], &[0x11, 0x22, 0x33, 0x44]);
        assert_eq!(bus.read16(0x1002), 0x3344);
        bus.write16(0x2000, 0xABCD);
        assert_eq!(bus.read8(0x2000), 0xAB);
        assert_eq!(bus.read32(0x1000), 0x1122_3344);
    }

    #[test]
    fn test_default_bit_operations() {
        let mut bus = MemBus::new();
        bus.write8(0x10, 0b1010_1010);
        bus.and8(0x10, 0x0F);
        assert_eq!(bus.read8(0x10), 0b0000_1010);
        bus.or8(0x10, 0x80);
        assert_eq!(bus.read8(0x10), 0b1000_1010);
        bus.xor8(0x10, 0x82);
        assert_eq!(bus.read8(0x10), 0b0000_1000);
        assert!(bus.take_error().is_ok());
    }

    #[test]
    fn test_spi_read_framing() {
        let expectations = [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![0x63, 0xFE, 0x47, 0x00, 0x04]),
            SpiTransaction::read_vec(vec![0x00, 0x01, 0x02, 0x03]),
            SpiTransaction::transaction_end(),
        ];
        let spi = SpiMock::new(&expectations);
        let mut bus = SpiPhyBus::new(spi);

        assert_eq!(bus.read32(0xFE47), 0x0001_0203);
        assert!(bus.take_error().is_ok());
        bus.release().done();
    }

    #[test]
    fn test_spi_write_and_bit_commands() {
        let expectations = [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![0x2A, 0xFD, 0x40, 0x00, 0x02]),
            SpiTransaction::write_vec(vec![0x02, 0x00]),
            SpiTransaction::transaction_end(),
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![0x3C, 0xFD, 0x3C, 0x00, 0x01]),
            SpiTransaction::write_vec(vec![0x04]),
            SpiTransaction::transaction_end(),
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![0x5A, 0xFD, 0x52, 0x00, 0x01]),
            SpiTransaction::write_vec(vec![0xFE]),
            SpiTransaction::transaction_end(),
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![0x1E, 0xFE, 0x90, 0x00, 0x01]),
            SpiTransaction::write_vec(vec![0x01]),
            SpiTransaction::transaction_end(),
        ];
        let spi = SpiMock::new(&expectations);
        let mut bus = SpiPhyBus::new(spi);

        bus.write16(0xFD40, 0x0200);
        bus.or8(0xFD3C, 0x04);
        bus.and8(0xFD52, 0xFE);
        bus.xor8(0xFE90, 0x01);

        bus.release().done();
    }
}
