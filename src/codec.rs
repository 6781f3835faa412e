//! PRIME physical frame codec.
//!
//! Builds the bytes written into a transmit slot for each frame mode and parses the
//! bytes the modem leaves in a receive slot.
//!
//! ## Slot layout
//!
//! | Mode    | `0..16`                                   | `16..32`        | then            |
//! |---------|-------------------------------------------|-----------------|-----------------|
//! | Type A  | 2-byte PHY header, MAC header bytes 0..7, CRC placeholder, flush | MAC bytes 7..9 at 11..13, then MAC payload from 16 | flush, padding |
//! | Type B  | 3-byte PHY header, CRC/flush placeholder  | payload         | flush, padding  |
//! | Type BC | Type A shaped legacy header               | Type B header   | payload at 32   |
//!
//! Everything after the written bytes is zero: the modem needs the flush byte and the
//! symbol padding to be present.
//!
//! On reception the modem strips the legacy header of a Type BC frame, so Type B and BC
//! receive slots share one layout: the Type B header at 0 and the payload at 16.

use crate::consts::{
    BC_MODE_CONFIG, HEADER_CRC_PLACEHOLDER, MAC_GEN_HEADER_SIZE, MAC_HEADER_SIZE, PHY_DMA_OFFSET,
    PHY_MAX_PPDU_SIZE, PHY_MAX_TX_PAYLOAD, PHY_MIN_RX_LEN,
};
#[cfg(not(feature = "std"))]
use crate::consts::RX_PAYLOAD_CAPACITY;
use crate::crc::CrcWidth;
use crate::error::{RxError, TxError};

/// Owned payload of a received frame or noise capture.
#[cfg(feature = "std")]
pub type Payload = Vec<u8>;

/// Owned payload of a received frame or noise capture.
#[cfg(not(feature = "std"))]
pub type Payload = heapless::Vec<u8, RX_PAYLOAD_CAPACITY>;

/// Largest symbol count a Type A header can carry.
const TYPE_A_MAX_SYMBOLS: u16 = 0x3F;
/// Largest symbol count a Type B header can carry.
const TYPE_B_MAX_SYMBOLS: u16 = 0xFF;
/// Symbols of the Type B header a Type BC legacy header accounts for.
const BC_HEADER_SYMBOLS: u16 = 8;

/// Modulation schemes, by their 4-bit header code.
///
/// Bit 2 of the code marks convolutional coding, bit 3 marks the robust (4× repeated)
/// schemes. Robust schemes are convolutional too.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Scheme {
    /// Differential BPSK.
    #[default]
    Dbpsk = 0x00,
    /// Differential QPSK.
    Dqpsk = 0x01,
    /// Differential 8PSK.
    D8psk = 0x02,
    /// DBPSK with convolutional coding.
    DbpskVtb = 0x04,
    /// DQPSK with convolutional coding.
    DqpskVtb = 0x05,
    /// D8PSK with convolutional coding.
    D8pskVtb = 0x06,
    /// Robust DBPSK (PRIME 1.4 only).
    DbpskRobo = 0x0C,
    /// Robust DQPSK (PRIME 1.4 only).
    DqpskRobo = 0x0D,
}

impl Scheme {
    /// Looks a scheme up by its header code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(Self::Dbpsk),
            0x01 => Some(Self::Dqpsk),
            0x02 => Some(Self::D8psk),
            0x04 => Some(Self::DbpskVtb),
            0x05 => Some(Self::DqpskVtb),
            0x06 => Some(Self::D8pskVtb),
            0x0C => Some(Self::DbpskRobo),
            0x0D => Some(Self::DqpskRobo),
            _ => None,
        }
    }

    /// Header code.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Payload bytes carried by one symbol.
    pub const fn bytes_per_symbol(self) -> u16 {
        match self {
            Self::Dbpsk => 12,
            Self::Dqpsk => 24,
            Self::D8psk => 36,
            Self::DbpskVtb => 6,
            Self::DqpskVtb => 12,
            Self::D8pskVtb => 18,
            Self::DbpskRobo => 6,
            Self::DqpskRobo => 12,
        }
    }

    /// Convolutional coding needs one extra flush byte.
    pub const fn is_convolutional(self) -> bool {
        self.code() & 0x04 != 0
    }

    /// Each symbol is sent four times.
    pub const fn is_robust(self) -> bool {
        self.code() & 0x08 != 0
    }

    /// Per-slot emission gain.
    pub const fn emit_gain(self) -> u8 {
        0x24
    }

    /// Per-slot peak cut gain.
    pub const fn peak_cut_gain(self) -> u8 {
        match self {
            Self::Dbpsk | Self::Dqpsk | Self::D8psk => 0xFF,
            Self::DbpskVtb | Self::DbpskRobo => 0xC0,
            Self::DqpskVtb | Self::DqpskRobo => 0xA0,
            Self::D8pskVtb => 0x60,
        }
    }

    /// Whether peak cut may be switched on for this scheme.
    pub const fn peak_cut_allowed(self) -> bool {
        self.is_convolutional()
    }
}

/// Physical frame formats.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum FrameMode {
    /// PRIME 1.3 frame.
    #[default]
    TypeA = 0x00,
    /// PRIME 1.4 frame.
    TypeB = 0x02,
    /// PRIME 1.4 frame behind a PRIME 1.3 compatible header.
    TypeBC = 0x03,
    /// Noise capture (receive only).
    Noise = 0xFE,
    /// Continuous raw emission for lab tests (transmit only).
    Test = 0xFF,
}

impl FrameMode {
    /// Looks a mode up by its numeric code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(Self::TypeA),
            0x02 => Some(Self::TypeB),
            0x03 => Some(Self::TypeBC),
            0xFE => Some(Self::Noise),
            0xFF => Some(Self::Test),
            _ => None,
        }
    }

    /// Numeric code, also the two-bit slot mode field for Type A, B and BC.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// MAC header type of a PRIME 1.3 frame.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum HeaderType {
    /// Generic MAC header.
    #[default]
    Generic = 0,
    /// Promotion needed header.
    Promotion = 1,
    /// Beacon header.
    Beacon = 2,
}

impl HeaderType {
    /// Looks a header type up by its numeric code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Generic),
            1 => Some(Self::Promotion),
            2 => Some(Self::Beacon),
            _ => None,
        }
    }

    /// Header type field (bits 5:4) of the first MAC header byte.
    pub const fn from_mac_byte(byte: u8) -> Option<Self> {
        Self::from_code((byte >> 4) & 0x03)
    }
}

/// Symbols and padding needed for `total_len` bytes.
///
/// Returns `(symbols, pad_len)` with `symbols * bytes_per_symbol - pad_len == total_len`
/// and `pad_len < bytes_per_symbol`.
pub fn symbol_math(total_len: usize, bytes_per_symbol: u16) -> (u16, u16) {
    let bps = usize::from(bytes_per_symbol);
    let mut symbols = total_len / bps;
    let mut pad = bps - total_len % bps;
    if pad == bps {
        pad = 0;
    } else {
        symbols += 1;
    }
    (symbols as u16, pad as u16)
}

/// Length a frame occupies on the line before padding.
///
/// For Type A only the bytes after the 7 embedded MAC header bytes count, plus the MAC
/// CRC when the coprocessor adds one. Convolutional schemes add a flush byte.
///
/// # Errors
/// [`TxError::InvalidLength`] if a Type A frame with MAC CRC carries an unknown header
/// type (its CRC length is undefined).
pub fn tx_total_len(
    mode: FrameMode,
    scheme: Scheme,
    payload: &[u8],
    mac_crc: bool,
) -> Result<usize, TxError> {
    let mut total = payload.len();
    if mode == FrameMode::TypeA {
        total = total.saturating_sub(MAC_HEADER_SIZE);
        if mac_crc {
            let header_type = payload
                .first()
                .and_then(|&b| HeaderType::from_mac_byte(b))
                .ok_or(TxError::InvalidLength)?;
            total += CrcWidth::for_header(header_type).trailer_len();
        }
    }
    if scheme.is_convolutional() {
        total += 1;
    }
    Ok(total)
}

/// Checks that `scheme` may be sent as `mode` and that `payload` has a sendable length.
pub fn validate(mode: FrameMode, scheme: Scheme, payload: &[u8]) -> Result<(), TxError> {
    match mode {
        FrameMode::TypeA if scheme.is_robust() => return Err(TxError::InvalidScheme),
        FrameMode::TypeA | FrameMode::TypeB | FrameMode::TypeBC => {}
        FrameMode::Noise | FrameMode::Test => return Err(TxError::InvalidMode),
    }
    if payload.len() < MAC_HEADER_SIZE || payload.len() > PHY_MAX_TX_PAYLOAD {
        return Err(TxError::InvalidLength);
    }
    Ok(())
}

/// Frame ready to be copied into a transmit slot.
#[derive(Clone, Debug)]
pub struct EncodedFrame {
    bytes: [u8; PHY_MAX_PPDU_SIZE],
    len: usize,
    /// Symbol count written in the header (already multiplied by 4 for robust schemes).
    pub symbols: u16,
    /// Padding bytes appended after the payload.
    pub pad_len: u16,
}

impl EncodedFrame {
    /// Bytes to write at the start of the slot.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Number of bytes to write.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether there is nothing to write.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

fn write_type_b_header(buf: &mut [u8], scheme: Scheme, symbols: u16, pad: u16) {
    buf[0] = ((scheme.code() << 4) & 0xF0) | ((symbols >> 4) as u8 & 0x0F);
    buf[1] = ((symbols << 4) as u8 & 0xF0) | ((pad >> 5) as u8 & 0x0F);
    buf[2] = (pad << 3) as u8 & 0xF8;
    buf[3] = HEADER_CRC_PLACEHOLDER;
    buf[4] = 0xA0;
    buf[5] = 0x00;
}

/// Encodes a Type A, B or BC frame.
///
/// # Arguments
/// * `mode` - frame format
/// * `scheme` - modulation scheme
/// * `payload` - MAC header and payload (at least [`MAC_HEADER_SIZE`] bytes)
/// * `mac_crc` - whether the modem's MAC coprocessor appends a CRC (Type A only)
///
/// # Errors
/// * [`TxError::InvalidScheme`] for robust schemes in Type A.
/// * [`TxError::InvalidMode`] for Noise and Test.
/// * [`TxError::InvalidLength`] for payloads outside `7..=496` bytes, or frames whose
///   symbols, flush byte and padding do not fit the header fields or the slot.
pub fn encode(
    mode: FrameMode,
    scheme: Scheme,
    payload: &[u8],
    mac_crc: bool,
) -> Result<EncodedFrame, TxError> {
    validate(mode, scheme, payload)?;

    let total = tx_total_len(mode, scheme, payload, mac_crc)?;
    let (mut symbols, pad) = symbol_math(total, scheme.bytes_per_symbol());
    if scheme.is_robust() {
        symbols <<= 2;
    }

    let data_len = payload.len();
    let mut bytes = [0u8; PHY_MAX_PPDU_SIZE];
    let mut len = match mode {
        FrameMode::TypeA => {
            if symbols > TYPE_A_MAX_SYMBOLS {
                return Err(TxError::InvalidLength);
            }
            bytes[0] = ((scheme.code() << 4) & 0xF0) | ((symbols >> 2) as u8 & 0x0F);
            bytes[1] = ((symbols << 6) as u8 & 0xC0) | (pad as u8 & 0x3F);
            bytes[2..2 + MAC_HEADER_SIZE].copy_from_slice(&payload[..MAC_HEADER_SIZE]);
            bytes[9] = HEADER_CRC_PLACEHOLDER;
            bytes[10] = 0;
            if let Some(&b) = payload.get(MAC_HEADER_SIZE) {
                bytes[11] = b;
            }
            if let Some(&b) = payload.get(MAC_HEADER_SIZE + 1) {
                bytes[12] = b;
            }
            if data_len > MAC_GEN_HEADER_SIZE {
                bytes[PHY_DMA_OFFSET..PHY_DMA_OFFSET + data_len - MAC_GEN_HEADER_SIZE]
                    .copy_from_slice(&payload[MAC_GEN_HEADER_SIZE..]);
            }
            (PHY_DMA_OFFSET + data_len).saturating_sub(MAC_GEN_HEADER_SIZE)
        }
        FrameMode::TypeB => {
            if symbols > TYPE_B_MAX_SYMBOLS {
                return Err(TxError::InvalidLength);
            }
            write_type_b_header(&mut bytes, scheme, symbols, pad);
            bytes[PHY_DMA_OFFSET..PHY_DMA_OFFSET + data_len].copy_from_slice(payload);
            PHY_DMA_OFFSET + data_len
        }
        FrameMode::TypeBC => {
            let start = PHY_DMA_OFFSET << 1;
            if symbols > TYPE_B_MAX_SYMBOLS || start + data_len > PHY_MAX_PPDU_SIZE {
                return Err(TxError::InvalidLength);
            }
            let legacy = symbols + BC_HEADER_SYMBOLS;
            bytes[0] = 0x40 | ((legacy >> 2) as u8 & 0x0F);
            bytes[1] = ((legacy << 6) as u8 & 0xC0) | 0x04;
            bytes[2] = 0x1A;
            bytes[3..9].copy_from_slice(&BC_MODE_CONFIG[2..8]);
            bytes[9] = HEADER_CRC_PLACEHOLDER;
            bytes[10] = 0;
            write_type_b_header(&mut bytes[PHY_DMA_OFFSET..], scheme, symbols, pad);
            bytes[start..start + data_len].copy_from_slice(payload);
            start + data_len
        }
        FrameMode::Noise | FrameMode::Test => return Err(TxError::InvalidMode),
    };

    if scheme.is_convolutional() {
        len += 1;
    }
    len += usize::from(pad);
    if len > PHY_MAX_PPDU_SIZE {
        return Err(TxError::InvalidLength);
    }

    Ok(EncodedFrame {
        bytes,
        len,
        symbols,
        pad_len: pad,
    })
}

/// Fields of a received physical header.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct RxHeader {
    /// Raw 4-bit scheme code.
    pub scheme_code: u8,
    /// Symbol count as received (before the robust division).
    pub symbols: u16,
    /// Padding bytes.
    pub pad_len: u16,
}

impl RxHeader {
    /// Parses the first bytes of a receive slot.
    ///
    /// # Errors
    /// [`RxError::InvalidMode`] for modes that carry no PHY header.
    pub fn parse(mode: FrameMode, header: &[u8; PHY_DMA_OFFSET]) -> Result<Self, RxError> {
        let scheme_code = (header[0] >> 4) & 0x0F;
        match mode {
            FrameMode::TypeA => Ok(Self {
                scheme_code,
                symbols: (u16::from(header[0] & 0x0F) << 2) | u16::from(header[1] >> 6),
                pad_len: u16::from(header[1] & 0x3F),
            }),
            FrameMode::TypeB | FrameMode::TypeBC => {
                let pad = (u16::from(header[1] & 0x0F) << 5) | u16::from(header[2] >> 3);
                Ok(Self {
                    scheme_code,
                    symbols: (u16::from(header[0] & 0x0F) << 4) | u16::from(header[1] >> 4),
                    pad_len: pad & 0x3F,
                })
            }
            FrameMode::Noise | FrameMode::Test => Err(RxError::InvalidMode),
        }
    }

    /// Scheme and coded payload length (padding and flush removed).
    ///
    /// # Errors
    /// [`RxError::InvalidLength`] if the scheme is unknown or the length falls outside
    /// `[2, 512]`.
    pub fn data_len(&self) -> Result<(Scheme, usize), RxError> {
        let scheme = Scheme::from_code(self.scheme_code).ok_or(RxError::InvalidLength)?;
        let mut symbols = usize::from(self.symbols);
        if scheme.is_robust() {
            symbols >>= 2;
        }
        let mut len = (symbols * usize::from(scheme.bytes_per_symbol()))
            .checked_sub(usize::from(self.pad_len))
            .ok_or(RxError::InvalidLength)?;
        if scheme.is_convolutional() {
            len = len.checked_sub(1).ok_or(RxError::InvalidLength)?;
        }
        if !(PHY_MIN_RX_LEN..=PHY_MAX_PPDU_SIZE).contains(&len) {
            return Err(RxError::InvalidLength);
        }
        Ok((scheme, len))
    }
}

/// Decoded layout of a received frame, before its bulk bytes are read.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct RxLayout {
    /// Frame format.
    pub mode: FrameMode,
    /// Modulation scheme.
    pub scheme: Scheme,
    /// Header type (Type A only).
    pub header_type: Option<HeaderType>,
    /// Symbol count as received.
    pub symbols: u16,
    /// Length of the reassembled message.
    pub len: usize,
    /// MAC header rebuilt from the PHY header (Type A only).
    pub mac_header: Option<[u8; MAC_GEN_HEADER_SIZE]>,
}

impl RxLayout {
    /// Decodes the PHY header of a receive slot.
    ///
    /// For Type A frames the 9-byte MAC header is put back together from the two
    /// fragments stored in the PHY header, and the MAC CRC trailer is removed when the
    /// coprocessor is enabled.
    pub fn from_header(
        mode: FrameMode,
        header: &[u8; PHY_DMA_OFFSET],
        mac_crc: bool,
    ) -> Result<Self, RxError> {
        let parsed = RxHeader::parse(mode, header)?;
        let (scheme, data_len) = parsed.data_len()?;

        let mut layout = Self {
            mode,
            scheme,
            header_type: None,
            symbols: parsed.symbols,
            len: data_len,
            mac_header: None,
        };

        if mode == FrameMode::TypeA {
            let mut mac = [0u8; MAC_GEN_HEADER_SIZE];
            mac[..MAC_HEADER_SIZE].copy_from_slice(&header[2..2 + MAC_HEADER_SIZE]);
            mac[7] = header[11];
            mac[8] = header[12];
            let header_type = HeaderType::from_mac_byte(mac[0]).ok_or(RxError::InvalidHeaderType)?;

            let mut len = data_len + MAC_HEADER_SIZE;
            if mac_crc {
                len = len
                    .checked_sub(CrcWidth::for_header(header_type).trailer_len())
                    .ok_or(RxError::InvalidLength)?;
            }
            layout.len = len;
            layout.header_type = Some(header_type);
            layout.mac_header = Some(mac);
        }

        Ok(layout)
    }

    /// Number of bytes to read from [`PHY_DMA_OFFSET`] onward.
    pub fn bulk_len(&self) -> usize {
        match self.mac_header {
            Some(_) => self.len.saturating_sub(MAC_GEN_HEADER_SIZE),
            None => self.len,
        }
    }

    /// Builds the message from the bytes read at [`PHY_DMA_OFFSET`].
    pub fn assemble(&self, bulk: &[u8]) -> Result<Payload, RxError> {
        let mut payload = Payload::new();
        if let Some(mac) = &self.mac_header {
            let head = self.len.min(MAC_GEN_HEADER_SIZE);
            extend(&mut payload, &mac[..head])?;
        }
        let body = bulk.get(..self.bulk_len()).ok_or(RxError::InvalidLength)?;
        extend(&mut payload, body)?;
        Ok(payload)
    }
}

/// Appends `bytes` to a payload.
#[cfg(feature = "std")]
pub(crate) fn extend(payload: &mut Payload, bytes: &[u8]) -> Result<(), RxError> {
    payload.extend_from_slice(bytes);
    Ok(())
}

/// Appends `bytes` to a payload.
#[cfg(not(feature = "std"))]
pub(crate) fn extend(payload: &mut Payload, bytes: &[u8]) -> Result<(), RxError> {
    payload
        .extend_from_slice(bytes)
        .map_err(|_| RxError::InvalidLength)
}

/// Decodes a whole receive slot held in memory.
pub fn decode(mode: FrameMode, slot: &[u8], mac_crc: bool) -> Result<(RxLayout, Payload), RxError> {
    let header: &[u8; PHY_DMA_OFFSET] = slot
        .get(..PHY_DMA_OFFSET)
        .and_then(|h| h.try_into().ok())
        .ok_or(RxError::InvalidLength)?;
    let layout = RxLayout::from_header(mode, header, mac_crc)?;
    let payload = layout.assemble(&slot[PHY_DMA_OFFSET..])?;
    Ok((layout, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mac_frame(len: usize, header_type: u8) -> Vec<u8> {
        (0..len)
            .map(|i| match i {
                0 => header_type << 4,
                _ => (i as u8).wrapping_mul(7),
            })
            .collect()
    }

    #[test]
    fn test_symbol_math_covers_total() {
        for bps in [6u16, 12, 18, 24, 36] {
            for total in 0..600usize {
                let (symbols, pad) = symbol_math(total, bps);
                assert!(pad < bps);
                assert_eq!(usize::from(symbols) * usize::from(bps) - usize::from(pad), total);
            }
        }
    }

    #[test]
    fn test_symbol_math_nine_byte_total_pads_three() {
        // Raw arithmetic only. Type A encode feeds it the length after the 7 header bytes.
        assert_eq!(symbol_math(9, Scheme::Dbpsk.bytes_per_symbol()), (1, 3));
    }

    #[test]
    fn test_type_a_minimum_mac_header() {
        // 7 of the 9 header bytes ride in the PHY header, 2 remain for the payload area.
        let payload = mac_frame(9, 0);
        let frame = encode(FrameMode::TypeA, Scheme::Dbpsk, &payload, false).unwrap();
        assert_eq!(frame.symbols, 1);
        assert_eq!(frame.pad_len, 10);
        assert_eq!(frame.as_bytes()[0], 0x00);
        assert_eq!(frame.as_bytes()[1], 0x40 | 10);
        assert_eq!(&frame.as_bytes()[2..9], &payload[..7]);
        assert_eq!(frame.as_bytes()[9], HEADER_CRC_PLACEHOLDER);
        assert_eq!(frame.as_bytes()[11], payload[7]);
        assert_eq!(frame.as_bytes()[12], payload[8]);
        assert_eq!(frame.len(), 16 + 10);
    }

    #[test]
    fn test_type_b_robust_symbols_are_quadrupled() {
        let payload = mac_frame(50, 0);
        let frame = encode(FrameMode::TypeB, Scheme::DqpskRobo, &payload, false).unwrap();
        // 50 bytes plus the flush byte need 5 symbols of 12 bytes.
        assert_eq!(frame.symbols, 20);
        assert_eq!(frame.pad_len, 9);
        let bytes = frame.as_bytes();
        assert_eq!(bytes[0], 0xD1);
        assert_eq!(bytes[1], 0x40);
        assert_eq!(bytes[2], 9 << 3);
        assert_eq!(&bytes[3..6], &[0xAA, 0xA0, 0x00]);
        assert_eq!(&bytes[16..66], &payload[..]);
        assert_eq!(frame.len(), 16 + 50 + 1 + 9);
    }

    #[test]
    fn test_type_bc_nests_type_b_header() {
        let payload = mac_frame(30, 0);
        let frame = encode(FrameMode::TypeBC, Scheme::Dqpsk, &payload, false).unwrap();
        let bytes = frame.as_bytes();
        assert_eq!(frame.symbols, 2);
        assert_eq!(bytes[0], 0x40 | ((2 + 8) >> 2));
        assert_eq!(bytes[1], (((2u16 + 8) << 6) as u8 & 0xC0) | 0x04);
        assert_eq!(bytes[2], 0x1A);
        assert_eq!(&bytes[3..9], &BC_MODE_CONFIG[2..8]);
        assert_eq!(bytes[16] >> 4, Scheme::Dqpsk.code());
        assert_eq!(&bytes[32..62], &payload[..]);
    }

    #[test]
    fn test_robust_rejected_in_type_a() {
        let payload = mac_frame(20, 0);
        assert_eq!(
            encode(FrameMode::TypeA, Scheme::DbpskRobo, &payload, false).unwrap_err(),
            TxError::InvalidScheme
        );
        assert!(encode(FrameMode::TypeB, Scheme::DbpskRobo, &payload, false).is_ok());
    }

    #[test]
    fn test_length_bounds_on_encode() {
        assert_eq!(
            encode(FrameMode::TypeB, Scheme::Dbpsk, &mac_frame(6, 0), false).unwrap_err(),
            TxError::InvalidLength
        );
        assert_eq!(
            encode(FrameMode::TypeB, Scheme::Dbpsk, &mac_frame(497, 0), false).unwrap_err(),
            TxError::InvalidLength
        );
        // Fits the length check but not the slot once padded.
        assert_eq!(
            encode(FrameMode::TypeB, Scheme::Dbpsk, &mac_frame(496, 0), false).unwrap_err(),
            TxError::InvalidLength
        );
        assert_eq!(
            encode(FrameMode::Noise, Scheme::Dbpsk, &mac_frame(20, 0), false).unwrap_err(),
            TxError::InvalidMode
        );
    }

    #[test]
    fn test_mac_crc_extends_type_a() {
        let generic = mac_frame(20, 0);
        let promotion = mac_frame(20, 1);
        assert_eq!(
            tx_total_len(FrameMode::TypeA, Scheme::Dbpsk, &generic, true).unwrap(),
            13 + 4
        );
        assert_eq!(
            tx_total_len(FrameMode::TypeA, Scheme::Dbpsk, &promotion, true).unwrap(),
            13 + 1
        );
        assert_eq!(
            tx_total_len(FrameMode::TypeA, Scheme::DbpskVtb, &promotion, false).unwrap(),
            13 + 1
        );
        assert_eq!(
            tx_total_len(FrameMode::TypeA, Scheme::Dbpsk, &mac_frame(20, 3), true).unwrap_err(),
            TxError::InvalidLength
        );
    }

    #[test]
    fn test_round_trip_all_modes() {
        let cases = [
            (FrameMode::TypeA, Scheme::Dbpsk, 9usize, false),
            (FrameMode::TypeA, Scheme::D8pskVtb, 100, false),
            (FrameMode::TypeA, Scheme::DqpskVtb, 64, true),
            (FrameMode::TypeB, Scheme::Dqpsk, 7, false),
            (FrameMode::TypeB, Scheme::DbpskRobo, 120, false),
            (FrameMode::TypeBC, Scheme::D8psk, 200, false),
            (FrameMode::TypeBC, Scheme::DqpskRobo, 33, false),
        ];
        for (mode, scheme, len, mac_crc) in cases {
            for header_type in [0u8, 1, 2] {
                let payload = mac_frame(len, header_type);
                let frame = encode(mode, scheme, &payload, mac_crc).unwrap();
                // The modem consumes the legacy header of a Type BC frame.
                let received = match mode {
                    FrameMode::TypeBC => &frame.as_bytes()[PHY_DMA_OFFSET..],
                    _ => frame.as_bytes(),
                };
                let mut slot = vec![0u8; PHY_MAX_PPDU_SIZE + PHY_DMA_OFFSET];
                slot[..received.len()].copy_from_slice(received);

                let (layout, decoded) = decode(mode, &slot, mac_crc).unwrap();
                assert_eq!(layout.scheme, scheme);
                assert_eq!(layout.len, len, "{mode:?} {scheme:?}");
                assert_eq!(&decoded[..], &payload[..]);
                if mode == FrameMode::TypeA {
                    assert_eq!(layout.header_type, HeaderType::from_code(header_type));
                } else {
                    assert_eq!(layout.header_type, None);
                }
            }
        }
    }

    #[test]
    fn test_decode_rejects_short_frame() {
        // Type A header announcing 1 symbol of DBPSK with 11 bytes of padding: 1 byte.
        let mut slot = [0u8; 64];
        slot[0] = 0x00;
        slot[1] = 0x40 | 11;
        assert_eq!(
            decode(FrameMode::TypeA, &slot, false).unwrap_err(),
            RxError::InvalidLength
        );
    }

    #[test]
    fn test_decode_rejects_unknown_header_type() {
        let mut slot = [0u8; 64];
        slot[0] = 0x00;
        slot[1] = 0x40 | 2;
        slot[2] = 0x30;
        assert_eq!(
            decode(FrameMode::TypeA, &slot, false).unwrap_err(),
            RxError::InvalidHeaderType
        );
    }

    #[test]
    fn test_decode_rejects_unknown_scheme_and_mode() {
        let mut slot = [0u8; 64];
        slot[0] = 0x30;
        slot[1] = 0x40;
        assert_eq!(
            decode(FrameMode::TypeB, &slot, false).unwrap_err(),
            RxError::InvalidLength
        );
        assert_eq!(
            decode(FrameMode::Noise, &slot, false).unwrap_err(),
            RxError::InvalidMode
        );
    }

    #[test]
    fn test_robust_symbol_count_is_divided_on_decode() {
        let header = RxHeader {
            scheme_code: Scheme::DqpskRobo.code(),
            symbols: 20,
            pad_len: 9,
        };
        assert_eq!(header.data_len().unwrap(), (Scheme::DqpskRobo, 50));
    }
}
