//! Statistics and last-frame information.
//!
//! Everything here is readable through the information block of the parameter table
//! (`0x01xx`). Only the two quality-report flags can be written.

use crate::codec::{FrameMode, HeaderType, Scheme};
use crate::config::{InfoParam, ParamValue};
use crate::consts::{MODEL_NUM, PRODUCT_ID, VERSION_NUM};
use crate::error::ConfigError;

/// Cumulative TX and RX counters.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct PhyStats {
    /// Frames sent successfully.
    pub tx_total: u32,
    /// Bytes sent successfully.
    pub tx_total_bytes: u32,
    /// Emissions that ended in any error.
    pub tx_total_errors: u32,
    /// Submissions to a busy slot, or emissions refused because another was in progress.
    pub tx_bad_busy_tx: u32,
    /// Emissions refused because the channel or the receiver was busy.
    pub tx_bad_busy_channel: u32,
    /// Length errors, at submission or reported by the modem.
    pub tx_bad_len: u32,
    /// Scheme errors, at submission or reported by the modem.
    pub tx_bad_format: u32,
    /// Emissions that timed out.
    pub tx_timeout: u32,
    /// Frames received.
    pub rx_total: u32,
    /// Bytes received.
    pub rx_total_bytes: u32,
    /// Frames dropped.
    pub rx_total_errors: u32,
    /// Frames dropped for an out of range length.
    pub rx_bad_len: u32,
    /// Frames dropped for a bad CRC.
    pub rx_bad_crc: u32,
}

/// Last submitted frame.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct TxInfo {
    /// Slot.
    pub buffer_id: u8,
    /// Attenuation level.
    pub level: u8,
    /// Scheme.
    pub scheme: Scheme,
    /// Frame mode.
    pub mode: FrameMode,
    /// Raw timing value (`0` for immediate).
    pub tdelay: u32,
    /// Reception disabled while emitting.
    pub disable_rx: bool,
    /// Symbols of the payload.
    pub payload_len_sym: u16,
}

/// Last received frame.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct RxInfo {
    /// Slot.
    pub buffer_id: u8,
    /// Scheme.
    pub scheme: Scheme,
    /// MAC header type (Type A only).
    pub header_type: Option<HeaderType>,
    /// Frame mode.
    pub mode: FrameMode,
    /// Message length.
    pub payload_len: u16,
    /// Symbols of the payload as received.
    pub payload_len_sym: u16,
}

/// Counters, last-frame info and quality-report flags.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct PhyInfo {
    /// Counters.
    pub stats: PhyStats,
    /// Last submitted frame.
    pub tx: TxInfo,
    /// Last received frame.
    pub rx: RxInfo,
    /// Attach RSSI, CINR and EVM to received frames.
    pub rx_qr_mode: bool,
    /// Attach the measured RMS to TX outcomes.
    pub tx_qr_mode: bool,
}

impl PhyInfo {
    /// Reads an information parameter.
    pub fn get(&self, param: InfoParam) -> ParamValue {
        use InfoParam as I;
        let s = &self.stats;
        match param {
            I::ProductId => ParamValue::Text(PRODUCT_ID),
            I::Model => ParamValue::U16(MODEL_NUM),
            I::Version => ParamValue::U32(VERSION_NUM),
            I::RxBufferId => ParamValue::U8(self.rx.buffer_id),
            I::RxQrMode => ParamValue::U8(u8::from(self.rx_qr_mode)),
            I::RxScheme => ParamValue::U8(self.rx.scheme.code()),
            I::RxHeaderReceived => {
                ParamValue::U8(self.rx.header_type.map_or(0, |h| h as u8))
            }
            I::RxMode => ParamValue::U8(self.rx.mode.code()),
            I::TxBufferId => ParamValue::U8(self.tx.buffer_id),
            I::TxLevel => ParamValue::U8(self.tx.level),
            I::TxScheme => ParamValue::U8(self.tx.scheme.code()),
            I::TxQrMode => ParamValue::U8(u8::from(self.tx_qr_mode)),
            I::TxMode => ParamValue::U8(self.tx.mode.code()),
            I::TxDisableRx => ParamValue::U8(u8::from(self.tx.disable_rx)),
            I::RxPayloadLen => ParamValue::U16(self.rx.payload_len),
            I::RxPayloadLenSym => ParamValue::U16(self.rx.payload_len_sym),
            I::TxPayloadLenSym => ParamValue::U16(self.tx.payload_len_sym),
            I::TxTdelay => ParamValue::U32(self.tx.tdelay),
            I::TxTotal => ParamValue::U32(s.tx_total),
            I::TxTotalBytes => ParamValue::U32(s.tx_total_bytes),
            I::TxTotalErrors => ParamValue::U32(s.tx_total_errors),
            I::TxBadBusyTx => ParamValue::U32(s.tx_bad_busy_tx),
            I::TxBadBusyChannel => ParamValue::U32(s.tx_bad_busy_channel),
            I::TxBadLen => ParamValue::U32(s.tx_bad_len),
            I::TxBadFormat => ParamValue::U32(s.tx_bad_format),
            I::TxTimeout => ParamValue::U32(s.tx_timeout),
            I::RxTotal => ParamValue::U32(s.rx_total),
            I::RxTotalBytes => ParamValue::U32(s.rx_total_bytes),
            I::RxTotalErrors => ParamValue::U32(s.rx_total_errors),
            I::RxBadLen => ParamValue::U32(s.rx_bad_len),
            I::RxBadCrc => ParamValue::U32(s.rx_bad_crc),
        }
    }

    /// Writes an information parameter.
    ///
    /// # Errors
    /// * [`ConfigError::ReadOnly`] for everything but the quality-report flags.
    /// * [`ConfigError::InvalidInput`] for a flag value that is not a byte.
    pub fn set(&mut self, param: InfoParam, value: ParamValue) -> Result<(), ConfigError> {
        match param {
            InfoParam::RxQrMode => self.rx_qr_mode = value.as_u8()? != 0,
            InfoParam::TxQrMode => self.tx_qr_mode = value.as_u8()? != 0,
            _ => return Err(ConfigError::ReadOnly),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_fields() {
        let info = PhyInfo::default();
        assert_eq!(info.get(InfoParam::ProductId), ParamValue::Text(*b"ATPL230PHY"));
        assert_eq!(info.get(InfoParam::Model), ParamValue::U16(MODEL_NUM));
        assert_eq!(info.get(InfoParam::Version), ParamValue::U32(VERSION_NUM));
    }

    #[test]
    fn test_counters_and_last_frame() {
        let mut info = PhyInfo::default();
        info.stats.tx_bad_len = 3;
        info.stats.rx_total_bytes = 1200;
        info.tx.tdelay = 0xDEAD_BEEF;
        info.rx.header_type = Some(HeaderType::Beacon);
        info.rx.mode = FrameMode::TypeBC;

        assert_eq!(info.get(InfoParam::TxBadLen), ParamValue::U32(3));
        assert_eq!(info.get(InfoParam::RxTotalBytes), ParamValue::U32(1200));
        assert_eq!(info.get(InfoParam::TxTdelay), ParamValue::U32(0xDEAD_BEEF));
        assert_eq!(info.get(InfoParam::RxHeaderReceived), ParamValue::U8(2));
        assert_eq!(info.get(InfoParam::RxMode), ParamValue::U8(3));
    }

    #[test]
    fn test_only_qr_flags_are_writable() {
        let mut info = PhyInfo::default();
        info.set(InfoParam::RxQrMode, ParamValue::U8(1)).unwrap();
        info.set(InfoParam::TxQrMode, ParamValue::U8(1)).unwrap();
        assert!(info.rx_qr_mode && info.tx_qr_mode);
        assert_eq!(
            info.set(InfoParam::TxQrMode, ParamValue::U16(0)),
            Err(ConfigError::InvalidInput)
        );
        assert_eq!(
            info.set(InfoParam::TxTotal, ParamValue::U32(0)),
            Err(ConfigError::ReadOnly)
        );
        assert_eq!(
            info.set(InfoParam::ProductId, ParamValue::Text([0; 10])),
            Err(ConfigError::ReadOnly)
        );
    }
}
