//! ATPL230 register map.
//!
//! Addresses of the registers the engine touches and the bit masks inside them. Per-slot
//! registers are given for slot 0; [`slot8`], [`slot16`] and [`slot32`] compute the
//! address for another slot of an 8, 16 or 32 bit bank.
//!
//! Multi-byte registers are big-endian: the lowest address holds the most significant byte.

/// Scheduled emission time (32 bit, per slot).
pub const EMITIME_TX0: u16 = 0xFD00;
/// Guard time after emission (16 bit, per slot).
pub const TXRX_TA_TX0: u16 = 0xFD10;
/// Guard time before emission (16 bit, per slot).
pub const TXRX_TB_TX0: u16 = 0xFD18;
/// Global amplitude (8 bit, per slot).
pub const GLOBAL_AMP_TX0: u16 = 0xFD20;
/// Signal amplitude (8 bit, per slot).
pub const SIGNAL_AMP_TX0: u16 = 0xFD24;
/// Chirp amplitude (8 bit, per slot).
pub const CHIRP_AMP_TX0: u16 = 0xFD28;
/// Emission timeout (32 bit, per slot).
pub const TIMEOUT_TX0: u16 = 0xFD2C;
/// Transmit configuration (8 bit, per slot).
pub const TXCONF_TX0: u16 = 0xFD3C;
/// Transmit buffer start address (16 bit, per slot).
pub const INITAD_TX0: u16 = 0xFD40;
/// RMS measured during the last emission (16 bit, per slot).
pub const RMSCALC_TX0: u16 = 0xFD48;
/// Packed transmit results of all four slots (16 bit).
pub const RESULT_TX10: u16 = 0xFD50;
/// Transmit and noise interrupt flags.
pub const TX_INT: u16 = 0xFD52;
/// Average RSSI (8 bit, per slot).
pub const RSSIAVG_RX0: u16 = 0xFD6F;
/// Minimum CINR (8 bit, per slot).
pub const CINRMIN_RX0: u16 = 0xFD77;
/// Average CINR (8 bit, per slot).
pub const CINRAVG_RX0: u16 = 0xFD7B;
/// Reception time stamp (32 bit, per slot).
pub const RECTIME_RX0: u16 = 0xFD83;
/// Header EVM (16 bit, per slot).
pub const EVM_HEADER_RX0: u16 = 0xFDA3;
/// Payload EVM (16 bit, per slot).
pub const EVM_PAYLOAD_RX0: u16 = 0xFDAB;
/// Accumulated header EVM (32 bit, per slot).
pub const EVM_HEADACUM_RX0: u16 = 0xFDB3;
/// Accumulated payload EVM (32 bit, per slot).
pub const EVM_PAYLACUM_RX0: u16 = 0xFDC3;
/// Receive buffer enables.
pub const SELECT_BUFF_RX: u16 = 0xFDD3;
/// Receive interrupt flags: header bits 0..3, payload bits 4..7.
pub const RX_INT: u16 = 0xFDD4;
/// Receive configuration.
pub const RXCONF: u16 = 0xFDD5;
/// Receive buffer start address (16 bit, per slot).
pub const INITAD_RX0: u16 = 0xFDD6;
/// Frame mode of each transmit slot, two bits per slot.
pub const TXCONF_ROBO_CTL: u16 = 0xFDF2;
/// Frame mode of each receive slot, two bits per slot.
pub const RXCONF_INFO_ROBO_MODE: u16 = 0xFDF3;
/// Noise capture buffer start address (16 bit).
pub const INIT_NOISE: u16 = 0xFDF8;
/// Noise capture configuration and result.
pub const NOISECONF: u16 = 0xFDFA;
/// Driver branch of each transmit slot, two bits per slot.
pub const TXCONF_SELBRANCH: u16 = 0xFDFB;

/// Status flags of the PHY.
pub const PHY_SFR: u16 = 0xFE2A;
/// System configuration.
pub const SYS_CONFIG: u16 = 0xFE2C;
/// Peak cut gain (8 bit, per slot).
pub const PEAK_CUT_GAIN_TX0: u16 = 0xFE38;
/// Emission gain (8 bit, per slot).
pub const EMIT_GAIN_TX0: u16 = 0xFE3C;
/// Free running 10 µs timer used as the scheduling reference (32 bit).
pub const VHIGH_TIMER_BEACON_REF: u16 = 0xFE47;
/// Autocorrelation filter minimum, high byte.
pub const FILTER_MIN_HIGH: u16 = 0xFE53;
/// Autocorrelation filter minimum, medium and low bytes (16 bit).
pub const FILTER_MIN_MED: u16 = 0xFE54;
/// AGC 0 RSSI offset.
pub const AGC0_KRSSI: u16 = 0xFE5C;
/// AGC 1 RSSI offset.
pub const AGC1_KRSSI: u16 = 0xFE5D;
/// AGC 2 RSSI offset.
pub const AGC2_KRSSI: u16 = 0xFE5F;
/// AGC 3 RSSI offset.
pub const AGC3_KRSSI: u16 = 0xFE60;
/// First byte of the 6-byte subnetwork address.
pub const SNA0: u16 = 0xFE62;
/// PHY configuration.
pub const PHY_CONFIG: u16 = 0xFE68;
/// Emitter configuration (internal or external driver per branch).
pub const EMIT_CONFIG: u16 = 0xFE8F;
/// Analog front end control (TX/RX polarity per branch).
pub const AFE_CTL: u16 = 0xFE90;
/// Branch 1 N transistor delay.
pub const N1_DELAY: u16 = 0xFE9F;
/// Branch 1 P transistor delay.
pub const P1_DELAY: u16 = 0xFEA0;
/// Branch 2 N transistor delay.
pub const N2_DELAY: u16 = 0xFEA1;
/// Branch 2 P transistor delay.
pub const P2_DELAY: u16 = 0xFEA2;
/// Emitter 1 active mask.
pub const EMIT1_ACTIVE: u16 = 0xFEA3;
/// Emitter 2 active mask.
pub const EMIT2_ACTIVE: u16 = 0xFEA4;
/// Emitter 3 active mask.
pub const EMIT3_ACTIVE: u16 = 0xFEA5;
/// Emitter 4 active mask.
pub const EMIT4_ACTIVE: u16 = 0xFEA6;
/// FFT test mode control.
pub const FFT_MODE: u16 = 0xFEB0;
/// AGC threshold (16 bit).
pub const AGC_THRESHOLD_HIGH: u16 = 0xFEB2;
/// Reception time offset.
pub const RX_TIME_OFFSET: u16 = 0xFEB4;
/// MAC CRC32 error counter (16 bit).
pub const CRC32_MAC_HIGH: u16 = 0xFEBA;
/// MAC CRC8 error counter (16 bit).
pub const CRC8_MAC_HIGH: u16 = 0xFEBC;
/// MAC header CRC8 error counter (16 bit).
pub const CRC8_MAC_HD_HIGH: u16 = 0xFEC0;
/// PHY header CRC8 error counter (16 bit).
pub const CRC8_PHY_HIGH: u16 = 0xFEC2;
/// Prime v1.3 maximum symbol length, DBPSK.
pub const MAX_LEN_DBPSK: u16 = 0xFEC8;
/// Prime v1.3 maximum symbol length, DBPSK with convolutional coding.
pub const MAX_LEN_DBPSK_VTB: u16 = 0xFEC9;
/// Prime v1.3 maximum symbol length, DQPSK.
pub const MAX_LEN_DQPSK: u16 = 0xFECA;
/// Prime v1.3 maximum symbol length, DQPSK with convolutional coding.
pub const MAX_LEN_DQPSK_VTB: u16 = 0xFECB;
/// Prime v1.3 maximum symbol length, D8PSK.
pub const MAX_LEN_D8PSK: u16 = 0xFECC;
/// Prime v1.3 maximum symbol length, D8PSK with convolutional coding.
pub const MAX_LEN_D8PSK_VTB: u16 = 0xFECD;
/// MAC coprocessor positive fail configuration.
pub const POSITIVE_FAIL_CONFIG: u16 = 0xFEC4;
/// MAC coprocessor positive fail counter (16 bit).
pub const POSITIVE_FAIL_HIGH: u16 = 0xFEC5;
/// Soft stop time (16 bit).
pub const SOFT_STOP_TIMEH: u16 = 0xFECE;
/// IIR filter configuration.
pub const IIR_CONFIG: u16 = 0xFED3;
/// Emitter frequency mode.
pub const EMITTER_FREC: u16 = 0xFEDB;
/// Prime and robust chirp mode.
pub const MODE_CONJ: u16 = 0xFEE0;
/// Carrier CORDIC phase step (32 bit).
pub const PASO_FASE_CORDIC_TX_VH: u16 = 0xFEFA;
/// Type BC configuration block (8 bytes).
pub const BC_CONFIG: u16 = 0xFF00;
/// Soft time X1 (16 bit).
pub const SOFT_TIME_X1_H: u16 = 0xFF33;
/// Soft time X2 (16 bit).
pub const SOFT_TIME_X2_H: u16 = 0xFF35;
/// Soft time Y1.
pub const SOFT_TIME_Y1: u16 = 0xFF37;
/// Soft time Y2.
pub const SOFT_TIME_Y2: u16 = 0xFF38;
/// RSSI offset.
pub const RSSI_OFFSET: u16 = 0xFF4C;
/// Prime chirp initial RAM address.
pub const INI_CHIRP1: u16 = 0xFF52;
/// Robust chirp initial RAM address.
pub const INI_CHIRP2: u16 = 0xFF53;
/// Factor threshold 4 and 1.
pub const FACTOR_THRESHOLD_4_AND_1: u16 = 0xFF51;
/// Factor threshold 3 and 2.
pub const FACTOR_THRESHOLD_3_AND_2: u16 = 0xFF55;
/// Factor threshold 2/3 and 1/3.
pub const FACTOR_THRESHOLD_2_3_AND_1_3: u16 = 0xFF56;
/// Robust factor 3/2.
pub const FACTOR_ROBUST_3_2: u16 = 0xFF58;
/// Equalization, high byte.
pub const EQUALIZE_H: u16 = 0xFF5E;
/// Equalization, low byte.
pub const EQUALIZE_L: u16 = 0xFF5F;
/// Noise AGC control.
pub const AGC_CTL_AUX: u16 = 0xFF75;
/// Filter RAM load control.
pub const LOAD_CTL: u16 = 0xFF80;
/// Carrier detect modulation count.
pub const N_MOD: u16 = 0xFF81;
/// Carrier detect ramp (16 bit).
pub const N_RAMPH: u16 = 0xFF82;
/// Carrier detect chirp count.
pub const N_CHIRP: u16 = 0xFF84;
/// Carrier detect M step up.
pub const STEP_M_UP: u16 = 0xFF85;
/// Carrier detect M step down.
pub const STEP_M_DOWN: u16 = 0xFF86;
/// Carrier detect M minimum threshold (16 bit).
pub const MIN_M_TH_HIGH: u16 = 0xFF87;
/// Carrier detect R step up.
pub const STEP_R_UP: u16 = 0xFF89;
/// Carrier detect R step down.
pub const STEP_R_DOWN: u16 = 0xFF8A;
/// Carrier detect R minimum threshold.
pub const MIN_R_TH: u16 = 0xFF8B;
/// Carrier detect R margin.
pub const R_MARGIN: u16 = 0xFF8C;
/// Carrier detect control.
pub const CD_CONTROL: u16 = 0xFF8D;
/// Automatic factor threshold adder configuration.
pub const FT_SUMADOR_CONF: u16 = 0xFF93;
/// Factor threshold compensation down.
pub const FACTOR_COMP_DOWN: u16 = 0xFF94;
/// Factor threshold control.
pub const FACTOR_THR_CTL: u16 = 0xFF95;
/// Factor threshold compensation up.
pub const FACTOR_COMP_UP: u16 = 0xFF97;
/// Factor threshold time down.
pub const FT_TIME_DOWN: u16 = 0xFF98;
/// Factor threshold time up.
pub const FT_TIME_UP: u16 = 0xFF99;
/// Factor threshold step up.
pub const FT_STEP_UP: u16 = 0xFF9A;
/// Factor threshold step up (fast detection).
pub const FT_STEP_UP_FD: u16 = 0xFF9B;
/// Factor threshold step down.
pub const FT_STEP_DOWN: u16 = 0xFF9C;
/// Factor threshold minimum.
pub const FT_MIN_FACTOR_TH: u16 = 0xFF9D;
/// Factor threshold maximum.
pub const FT_MAX_FACTOR_TH: u16 = 0xFF9E;
/// Factor threshold correlation minimum.
pub const FT_CORR_MIN: u16 = 0xFF9F;
/// Robust factor threshold compensation down.
pub const FACTOR_COMP_DOWN_ROBO: u16 = 0xFF3A;
/// Robust factor threshold compensation up.
pub const FACTOR_COMP_UP_ROBO: u16 = 0xFF3B;
/// Robust factor threshold time down.
pub const FT_TIME_DOWN_ROBO: u16 = 0xFF3C;
/// Robust factor threshold time up.
pub const FT_TIME_UP_ROBO: u16 = 0xFF3D;
/// Robust factor threshold step up.
pub const FT_STEP_UP_ROBO: u16 = 0xFF3E;
/// Robust factor threshold step up (fast detection).
pub const FT_STEP_UP_FD_ROBO: u16 = 0xFF3F;
/// Robust factor threshold step down.
pub const FT_STEP_DOWN_ROBO: u16 = 0xFF40;
/// Robust factor threshold minimum.
pub const FT_MIN_FACTOR_TH_ROBO: u16 = 0xFF41;
/// Robust factor threshold maximum.
pub const FT_MAX_FACTOR_TH_ROBO: u16 = 0xFF42;
/// Robust factor threshold correlation minimum.
pub const FT_CORR_MIN_ROBO: u16 = 0xFF43;
/// Chip configuration key.
pub const CFG_KEY: u16 = 0xFFBF;

/// `PHY_SFR`: global interrupt flag (write one to clear).
pub const SFR_PHY_INT: u8 = 0x01;
/// `PHY_SFR`: payload length error.
pub const SFR_ERR_PYL: u8 = 0x10;
/// `PHY_SFR`: busy channel error (write one to clear).
pub const SFR_BCH_ERR: u8 = 0x80;

/// `SYS_CONFIG`: PHY reset.
pub const SYS_CONFIG_RST: u8 = 0x01;
/// `SYS_CONFIG`: watchdog enable.
pub const SYS_CONFIG_WDG_EN: u8 = 0x04;
/// `LOAD_CTL`: filter RAM output enable.
pub const LOAD_CTL_ENRAM: u8 = 0x80;

/// `PHY_CONFIG`: MAC coprocessor CRC enable.
pub const PHY_CONFIG_MAC_EN: u8 = 0x01;
/// `PHY_CONFIG`: carrier detect enable.
pub const PHY_CONFIG_CD_EN: u8 = 0x04;
/// `PHY_CONFIG`: encryption enable.
pub const PHY_CONFIG_AES_EN: u8 = 0x08;
/// `PHY_CONFIG`: pad length given after coding.
pub const PHY_CONFIG_PAD_CODED: u8 = 0x10;
/// `PHY_CONFIG`: CINR mode.
pub const PHY_CONFIG_CINR: u8 = 0x20;

/// `TXCONF`: reception disabled while emitting.
pub const TXCONF_DR: u8 = 0x01;
/// `TXCONF`: carrier detect disabled while emitting.
pub const TXCONF_DC: u8 = 0x02;
/// `TXCONF`: buffer enabled (armed).
pub const TXCONF_EB: u8 = 0x04;
/// `TXCONF`: forced emission.
pub const TXCONF_FE: u8 = 0x08;
/// `TXCONF`: bit flipping.
pub const TXCONF_BF: u8 = 0x10;
/// `TXCONF`: peak cut on.
pub const TXCONF_PCO: u8 = 0x80;

/// Two-bit field mask of `TXCONF_SELBRANCH` and `TXCONF_ROBO_CTL`.
pub const SLOT_FIELD_MASK: u8 = 0x03;

/// `TX_INT`: noise capture complete.
pub const TX_INT_NOISE: u8 = 0x10;
/// `TX_INT`: transmit slot bits.
pub const TX_INT_SLOTS: u8 = 0x0F;
/// `RX_INT`: header received bits.
pub const RX_INT_HEADER: u8 = 0x0F;
/// `RX_INT`: payload received bits.
pub const RX_INT_PAYLOAD: u8 = 0xF0;

/// `FFT_MODE`: test mode enable.
pub const FFT_MODE_EN: u8 = 0x01;
/// `FFT_MODE`: continuous mode.
pub const FFT_MODE_CONT: u8 = 0x02;

/// `AFE_CTL`: branch 1 polarity.
pub const AFE_CTL_POL1: u8 = 0x01;
/// `AFE_CTL`: branch 2 polarity.
pub const AFE_CTL_POL2: u8 = 0x02;
/// `EMIT_CONFIG`: branch 1 external driver.
pub const EMIT_CONFIG_EXT1: u8 = 0x01;
/// `EMIT_CONFIG`: branch 2 external driver.
pub const EMIT_CONFIG_EXT2: u8 = 0x02;

/// Address of an 8-bit per-slot register.
pub const fn slot8(base: u16, slot: u8) -> u16 {
    base + slot as u16
}

/// Address of a 16-bit per-slot register.
pub const fn slot16(base: u16, slot: u8) -> u16 {
    base + ((slot as u16) << 1)
}

/// Address of a 32-bit per-slot register.
pub const fn slot32(base: u16, slot: u8) -> u16 {
    base + ((slot as u16) << 2)
}

/// Shift of a slot's two-bit field in `TXCONF_SELBRANCH`, `TXCONF_ROBO_CTL` and
/// `RXCONF_INFO_ROBO_MODE`.
pub const fn slot_field_shift(slot: u8) -> u8 {
    slot << 1
}
