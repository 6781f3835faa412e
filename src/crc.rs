//! PRIME CRC engine.
//!
//! Computes the 8, 16, 24 and 32-bit CRCs used by PRIME frames. All four are MSB-first,
//! non-reflected, with no final XOR. Frames with a Generic MAC header start from a seed
//! derived from the 6-byte subnetwork address (SNA); every other header type starts from
//! zero.

use crate::codec::HeaderType;
use crate::error::CrcError;

/// Supported CRC widths.
///
/// The discriminant is the width code used by host tooling and by the Type A trailer
/// length (`code + 1` bytes).
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum CrcWidth {
    /// CRC-8, polynomial `0x07`.
    Crc8 = 0,
    /// CRC-16, polynomial `0x0107`.
    Crc16 = 1,
    /// CRC-24, polynomial `0x010107`.
    Crc24 = 2,
    /// CRC-32, polynomial `0x04C11DB7`.
    Crc32 = 3,
}

impl CrcWidth {
    /// All widths, in code order.
    pub const ALL: [CrcWidth; 4] = [Self::Crc8, Self::Crc16, Self::Crc24, Self::Crc32];

    /// Register width in bits.
    pub const fn bits(self) -> u32 {
        match self {
            Self::Crc8 => 8,
            Self::Crc16 => 16,
            Self::Crc24 => 24,
            Self::Crc32 => 32,
        }
    }

    /// Generator polynomial without its leading term.
    pub const fn polynomial(self) -> u32 {
        match self {
            Self::Crc8 => 0x0000_0007,
            Self::Crc16 => 0x0000_0107,
            Self::Crc24 => 0x0001_0107,
            Self::Crc32 => 0x04C1_1DB7,
        }
    }

    /// Mask applied to the result.
    pub const fn mask(self) -> u32 {
        match self {
            Self::Crc8 => 0x0000_00FF,
            Self::Crc16 => 0x0000_FFFF,
            Self::Crc24 => 0x00FF_FFFF,
            Self::Crc32 => 0xFFFF_FFFF,
        }
    }

    /// Number of CRC bytes a Type A frame carries after its MAC payload.
    pub const fn trailer_len(self) -> usize {
        self as usize + 1
    }

    /// CRC protecting a Type A frame with the given MAC header type.
    pub const fn for_header(header_type: HeaderType) -> Self {
        match header_type {
            HeaderType::Promotion => Self::Crc8,
            HeaderType::Generic | HeaderType::Beacon => Self::Crc32,
        }
    }
}

impl TryFrom<u8> for CrcWidth {
    type Error = CrcError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or(CrcError::InvalidCrcWidth)
    }
}

/// Runs the CRC of `width` over `data` starting from `seed`.
pub fn crc(width: CrcWidth, data: &[u8], seed: u32) -> u32 {
    let bits = width.bits();
    let top = 1u32 << (bits - 1);
    let poly = width.polynomial();
    let mask = width.mask();

    let mut reg = seed & mask;
    for &byte in data {
        reg ^= u32::from(byte) << (bits - 8);
        for _ in 0..8 {
            reg = if reg & top != 0 {
                (reg << 1) ^ poly
            } else {
                reg << 1
            };
        }
        reg &= mask;
    }
    reg
}

/// Seeds derived from the subnetwork address, one per width.
///
/// Must be refreshed with [`update`](Self::update) every time the SNA changes; the engine
/// does this whenever the SNA registers are written through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SnaCrcSeed {
    seeds: [u32; 4],
}

impl SnaCrcSeed {
    /// Derives the seeds for `sna`.
    pub fn new(sna: &[u8; 6]) -> Self {
        let mut seed = Self::default();
        seed.update(sna);
        seed
    }

    /// Recomputes every seed as the zero-seeded CRC of the six address bytes.
    pub fn update(&mut self, sna: &[u8; 6]) {
        for width in CrcWidth::ALL {
            self.seeds[width as usize] = crc(width, sna, 0);
        }
    }

    /// SNA seed of one width.
    pub fn seed(&self, width: CrcWidth) -> u32 {
        self.seeds[width as usize]
    }

    /// Initial register value for a frame of `header_type`.
    pub fn seed_for(&self, width: CrcWidth, header_type: HeaderType) -> u32 {
        match header_type {
            HeaderType::Generic => self.seed(width),
            HeaderType::Promotion | HeaderType::Beacon => 0,
        }
    }

    /// CRC of `data` for a frame of `header_type`.
    pub fn compute(&self, width: CrcWidth, data: &[u8], header_type: HeaderType) -> u32 {
        crc(width, data, self.seed_for(width, header_type))
    }

    /// Like [`compute`](Self::compute), with the width given as its numeric code.
    ///
    /// # Errors
    /// [`CrcError::InvalidCrcWidth`] if `code` is not `0..=3`.
    pub fn compute_code(
        &self,
        code: u8,
        data: &[u8],
        header_type: HeaderType,
    ) -> Result<u32, CrcError> {
        let width = CrcWidth::try_from(code)?;
        Ok(self.compute(width, data, header_type))
    }
}
