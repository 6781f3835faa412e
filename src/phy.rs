//! The PHY engine.
//!
//! [`Phy`] owns the register bus and every piece of engine state: configuration,
//! impedance controller, transmit slots, interrupt bookkeeping, statistics and the SNA
//! CRC seeds. It has two kinds of entry points:
//!
//! - [`handle_interrupt`](Phy::handle_interrupt), called from the modem interrupt. It only
//!   latches flags, caches receive headers and never fails.
//! - Everything else, called from the application's polling loop: [`submit`](Phy::submit),
//!   [`poll_tx_result`](Phy::poll_tx_result), [`poll_rx`](Phy::poll_rx) and the parameter
//!   accessors.
//!
//! A transmit timeout is the only error the engine recovers from by itself, with a soft
//! reset of the modem.

use crate::bus::PhyBus;
use crate::codec::{self, FrameMode, HeaderType, Payload, RxLayout, Scheme};
use crate::config::{
    ConfigParam, DriverMode, ParamCmd, ParamId, ParamValue, PhyConfig, Polarity,
};
use crate::consts::{
    ATTENUATION_TABLE, BC_MODE_CONFIG, CHANNEL_TX_ID, EMIT_FREQ_TABLE, MAX_ATTENUATION_LEVEL,
    NOISE_BYTES_PER_SYMBOL, PHY_DMA_OFFSET, PHY_MAX_NOISE_SIZE, PHY_MAX_PPDU_SIZE,
    PHY_MIN_RX_LEN, PHY_NOISE_INIT_ADDRESS, PHY_NUM_RX_BUFFERS, PHY_NUM_TX_BUFFERS,
    PHY_TX_TIMEOUT_IMMEDIATE_10US, SOFT_STOP_TIME, SOFT_TIME_X1, SOFT_TIME_X2, VALID_CFG_KEY,
};
use crate::crc::SnaCrcSeed;
use crate::dispatcher::{Dispatcher, rx_slot_address};
use crate::error::{ConfigError, CrcError, PhyError, RxError, TxError};
use crate::impedance::{Impedance, ImpedanceController};
use crate::regs::*;
use crate::scheduler::{
    SlotState, TxOutcome, TxRequest, TxResult, TxScheduler, result_field, tx_slot_address,
};
use crate::stats::{PhyInfo, RxInfo, TxInfo};

/// Carrier detection and automatic factor threshold defaults, written at every reset.
const RX_DEFAULTS: [(u16, u8); 39] = [
    (IIR_CONFIG, 0x00),
    (SOFT_TIME_Y1, 0x77),
    (SOFT_TIME_Y2, 0x77),
    (FACTOR_THR_CTL, 0x30),
    (FACTOR_THRESHOLD_4_AND_1, 0xDA),
    (FACTOR_THRESHOLD_3_AND_2, 0xBD),
    (FACTOR_THRESHOLD_2_3_AND_1_3, 0xBA),
    (FACTOR_ROBUST_3_2, 0x23),
    (FT_SUMADOR_CONF, 0x11),
    (FACTOR_COMP_DOWN, 0x60),
    (FACTOR_COMP_UP, 0x50),
    (FT_TIME_DOWN, 0xC8),
    (FT_TIME_UP, 0x18),
    (FT_STEP_UP, 0x02),
    (FT_STEP_UP_FD, 0x04),
    (FT_STEP_DOWN, 0x01),
    (FT_MIN_FACTOR_TH, 0x06),
    (FT_MAX_FACTOR_TH, 0x20),
    (FT_CORR_MIN, 0x00),
    (FACTOR_COMP_DOWN_ROBO, 0x60),
    (FACTOR_COMP_UP_ROBO, 0x50),
    (FT_TIME_DOWN_ROBO, 0xC8),
    (FT_TIME_UP_ROBO, 0x18),
    (FT_STEP_UP_ROBO, 0x02),
    (FT_STEP_UP_FD_ROBO, 0x04),
    (FT_STEP_DOWN_ROBO, 0x01),
    (FT_MIN_FACTOR_TH_ROBO, 0x06),
    (FT_MAX_FACTOR_TH_ROBO, 0x17),
    (FT_CORR_MIN_ROBO, 0x00),
    (N_MOD, 0x30),
    (N_CHIRP, 0x58),
    (STEP_M_UP, 0x99),
    (STEP_M_DOWN, 0x79),
    (STEP_R_UP, 0x03),
    (STEP_R_DOWN, 0x01),
    (MIN_R_TH, 0x02),
    (R_MARGIN, 0x04),
    (CD_CONTROL, 0x3F),
    (EQUALIZE_H, 0x00),
];

/// RSSI offset and PRIME 1.3 length limits.
const LEN_DEFAULTS: [(u16, u8); 8] = [
    (EQUALIZE_L, 0x00),
    (RSSI_OFFSET, 0x88),
    (MAX_LEN_DBPSK, 39),
    (MAX_LEN_DBPSK_VTB, 63),
    (MAX_LEN_DQPSK, 18),
    (MAX_LEN_DQPSK_VTB, 39),
    (MAX_LEN_D8PSK, 11),
    (MAX_LEN_D8PSK_VTB, 25),
];

const AGC_KRSSI: [u16; 4] = [AGC0_KRSSI, AGC1_KRSSI, AGC2_KRSSI, AGC3_KRSSI];

/// Kind of reset.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ResetKind {
    /// Clears statistics and returns the impedance state to the configured default.
    Hard,
    /// Keeps the SNA, the MAC CRC setting, the impedance state and the statistics.
    Soft,
}

/// Where a received message came from.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum RxSource {
    /// A receive slot, `0..4`.
    Slot(u8),
    /// The noise capture buffer.
    Noise,
}

/// Link quality of a received frame.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct RxQuality {
    /// Average RSSI.
    pub rssi_avg: u8,
    /// Average CINR (minimum CINR for frames shorter than four symbols).
    pub cinr_avg: u8,
    /// Header EVM.
    pub evm_header: u16,
    /// Payload EVM.
    pub evm_payload: u16,
    /// Accumulated header EVM.
    pub evm_header_acum: u32,
    /// Accumulated payload EVM.
    pub evm_payload_acum: u32,
}

/// A received frame or noise capture.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct RxMessage {
    /// Slot or noise buffer.
    pub source: RxSource,
    /// Frame format ([`FrameMode::Noise`] for captures).
    pub mode: FrameMode,
    /// Modulation scheme.
    pub scheme: Scheme,
    /// MAC header type (Type A only).
    pub header_type: Option<HeaderType>,
    /// Message bytes.
    pub payload: Payload,
    /// Reception time stamp, in 10 µs units.
    pub rx_time: u32,
    /// Capture result code (noise only).
    pub noise_result: Option<u8>,
    /// Link quality, in quality-report mode.
    pub quality: Option<RxQuality>,
}

/// PRIME PHY engine for one ATPL230.
#[derive(Debug)]
pub struct Phy<B> {
    bus: B,
    cfg: PhyConfig,
    impedance: ImpedanceController,
    scheduler: TxScheduler,
    dispatcher: Dispatcher,
    info: PhyInfo,
    sna_seed: SnaCrcSeed,
}

impl<B: PhyBus> Phy<B> {
    /// Takes over the modem behind `bus` and hard resets it with `cfg`.
    pub fn new(bus: B, cfg: PhyConfig) -> Self {
        let profile = cfg.profile(cfg.channel).copied().unwrap_or_default();
        let mut phy = Self {
            bus,
            impedance: ImpedanceController::new(cfg.impedance, profile),
            cfg,
            scheduler: TxScheduler::new(),
            dispatcher: Dispatcher::new(),
            info: PhyInfo::default(),
            sna_seed: SnaCrcSeed::default(),
        };
        phy.reset(ResetKind::Hard);
        phy
    }

    /// Resets the modem and the engine state.
    ///
    /// Pending events and slot states are dropped in both cases.
    pub fn reset(&mut self, kind: ResetKind) {
        debug!("phy {:?} reset", kind);
        let kept = match kind {
            ResetKind::Hard => {
                self.info = PhyInfo::default();
                self.impedance.set_state(self.cfg.impedance);
                None
            }
            ResetKind::Soft => {
                let mut sna = [0u8; 6];
                self.bus.read_buf(SNA0, &mut sna);
                let mac_en = self.bus.read8(PHY_CONFIG) & PHY_CONFIG_MAC_EN != 0;
                Some((sna, mac_en))
            }
        };

        self.pulse_reset();
        match kept {
            None => self.pulse_reset(),
            Some((sna, mac_en)) => {
                self.bus.write_buf(SNA0, &sna);
                set_bits(&mut self.bus, PHY_CONFIG, PHY_CONFIG_MAC_EN, mac_en);
            }
        }

        self.init_registers();
        self.refresh_sna_seed();
    }

    fn pulse_reset(&mut self) {
        self.bus.or8(SYS_CONFIG, SYS_CONFIG_RST);
        self.bus.and8(SYS_CONFIG, !SYS_CONFIG_RST);
    }

    fn init_registers(&mut self) {
        let bus = &mut self.bus;
        bus.or8(LOAD_CTL, LOAD_CTL_ENRAM);
        bus.write16(SOFT_STOP_TIMEH, SOFT_STOP_TIME[0]);
        bus.write16(SOFT_TIME_X1_H, SOFT_TIME_X1[0]);
        bus.write16(SOFT_TIME_X2_H, SOFT_TIME_X2[0]);
        for (addr, value) in RX_DEFAULTS {
            bus.write8(addr, value);
        }
        bus.write16(N_RAMPH, 0x0600);
        bus.write16(MIN_M_TH_HIGH, 0x0021);
        bus.write_buf(BC_CONFIG, &BC_MODE_CONFIG);
        bus.write8(INI_CHIRP1, 0xC0);
        bus.write8(INI_CHIRP2, 0x00);
        bus.write8(MODE_CONJ, 0x02);
        bus.and8(PHY_CONFIG, !PHY_CONFIG_PAD_CODED);
        bus.and8(PHY_CONFIG, !PHY_CONFIG_CINR);

        let channel = self.cfg.channel;
        if let Err(e) = self.set_channel(channel) {
            warn!("channel {} not applied: {:?}", channel, e);
        }

        let bus = &mut self.bus;
        bus.or8(PHY_CONFIG, PHY_CONFIG_CD_EN);
        bus.and8(SYS_CONFIG, !SYS_CONFIG_WDG_EN);
        bus.and8(PHY_CONFIG, !PHY_CONFIG_AES_EN);
        self.apply_polarity();
        self.apply_emit_mode();

        let bus = &mut self.bus;
        for (addr, value) in LEN_DEFAULTS {
            bus.write8(addr, value);
        }
        for addr in [CRC8_PHY_HIGH, CRC32_MAC_HIGH, CRC8_MAC_HIGH, CRC8_MAC_HD_HIGH] {
            bus.write16(addr, 0);
        }
        bus.write8(POSITIVE_FAIL_CONFIG, 0x3F);
        bus.write16(POSITIVE_FAIL_HIGH, 0);

        for slot in 0..PHY_NUM_TX_BUFFERS as u8 {
            bus.write16(slot16(INITAD_TX0, slot), tx_slot_address(slot));
            bus.write32(slot32(TIMEOUT_TX0, slot), PHY_TX_TIMEOUT_IMMEDIATE_10US);
        }

        bus.write8(RXCONF, 0x01);
        bus.and8(SELECT_BUFF_RX, 0xF0);
        bus.or8(SELECT_BUFF_RX, 0x0F);
        bus.write8(FILTER_MIN_HIGH, 0);
        bus.write16(FILTER_MIN_MED, self.cfg.rx_corr_threshold);
        bus.write16(AGC_THRESHOLD_HIGH, 0x01FF);
        for (addr, value) in AGC_KRSSI.into_iter().zip(self.cfg.agc_krssi) {
            bus.write8(addr, value);
        }
        bus.write8(RX_TIME_OFFSET, 0);
        for slot in 0..PHY_NUM_RX_BUFFERS as u8 {
            bus.write16(slot16(INITAD_RX0, slot), rx_slot_address(slot));
        }
        bus.write16(INIT_NOISE, PHY_NOISE_INIT_ADDRESS);
        bus.write8(AGC_CTL_AUX, 0x28);
        bus.write8(CFG_KEY, VALID_CFG_KEY);

        bus.write8(TX_INT, 0);
        bus.write8(RX_INT, 0);
        bus.or8(PHY_SFR, SFR_PHY_INT);
        self.dispatcher.reset();
        self.scheduler.reset();
    }

    fn apply_polarity(&mut self) {
        let bus = &mut self.bus;
        set_bits(bus, AFE_CTL, AFE_CTL_POL1, self.cfg.txrx1_polarity == Polarity::Tx1Rx0);
        set_bits(bus, AFE_CTL, AFE_CTL_POL2, self.cfg.txrx2_polarity == Polarity::Tx1Rx0);
    }

    fn apply_emit_mode(&mut self) {
        let bus = &mut self.bus;
        let cfg = &self.cfg;

        let ext1 = cfg.driver1_mode == DriverMode::External;
        set_bits(bus, EMIT_CONFIG, EMIT_CONFIG_EXT1, ext1);
        if ext1 {
            bus.write8(N1_DELAY, cfg.n1_delay);
            bus.write8(P1_DELAY, cfg.p1_delay);
        }
        bus.write8(EMIT1_ACTIVE, cfg.emit_active[0]);
        bus.write8(EMIT2_ACTIVE, cfg.emit_active[1]);

        let ext2 = cfg.driver2_mode == DriverMode::External;
        set_bits(bus, EMIT_CONFIG, EMIT_CONFIG_EXT2, ext2);
        if ext2 {
            bus.write8(N2_DELAY, cfg.n2_delay);
            bus.write8(P2_DELAY, cfg.p2_delay);
        }
        bus.write8(EMIT3_ACTIVE, cfg.emit_active[2]);
        bus.write8(EMIT4_ACTIVE, cfg.emit_active[3]);
    }

    /// Tunes the modem to `channel` (`1..=8`) and loads its impedance profile.
    ///
    /// The impedance state is kept.
    ///
    /// # Errors
    /// [`ConfigError::InvalidChannel`] outside `1..=8`.
    pub fn set_channel(&mut self, channel: u8) -> Result<(), ConfigError> {
        let profile = *self.cfg.profile(channel)?;
        let idx = usize::from(channel - 1);
        self.bus.write32(PASO_FASE_CORDIC_TX_VH, CHANNEL_TX_ID[idx]);
        self.bus.write8(EMITTER_FREC, EMIT_FREQ_TABLE[idx]);
        self.impedance.load_channel(profile);
        self.cfg.channel = channel;
        debug!("channel {}", channel);
        Ok(())
    }

    /// Writes the 6-byte subnetwork address and derives the CRC seeds from it.
    pub fn set_network_address(&mut self, sna: [u8; 6]) {
        self.bus.write_buf(SNA0, &sna);
        self.sna_seed.update(&sna);
    }

    fn refresh_sna_seed(&mut self) {
        let mut sna = [0u8; 6];
        self.bus.read_buf(SNA0, &mut sna);
        self.sna_seed.update(&sna);
    }

    fn mac_crc(&mut self) -> bool {
        self.bus.read8(PHY_CONFIG) & PHY_CONFIG_MAC_EN != 0
    }

    /// Writes a frame into its slot and arms it.
    ///
    /// A slot that still holds a frame is overwritten; the overwrite is counted in
    /// `tx_bad_busy_tx`.
    ///
    /// # Errors
    /// Any [`TxError`]; rejected requests are counted and leave the slot untouched.
    pub fn submit(&mut self, req: &TxRequest<'_>) -> Result<(), TxError> {
        self.info.tx = TxInfo {
            buffer_id: req.buffer_id,
            level: req.attenuation_level,
            scheme: req.scheme,
            mode: req.mode,
            tdelay: req.schedule.tdelay(),
            disable_rx: req.disable_rx,
            payload_len_sym: 0,
        };
        if usize::from(req.buffer_id) >= PHY_NUM_TX_BUFFERS {
            return Err(TxError::InvalidBuffer);
        }
        if self.scheduler.is_busy(&mut self.bus, req.buffer_id) {
            bump(&mut self.info.stats.tx_bad_busy_tx);
            warn!("tx slot {} busy, overwriting", req.buffer_id);
        }

        let profile = self.impedance.tx_profile(req.scheme, &self.cfg);
        let mac_crc = self.mac_crc();
        match self.scheduler.arm(&mut self.bus, req, &profile, &self.cfg, mac_crc) {
            Ok(symbols) => {
                self.info.tx.payload_len_sym = symbols;
                let level = req.attenuation_level.min(MAX_ATTENUATION_LEVEL);
                self.cfg.global_attenuation = ATTENUATION_TABLE[usize::from(level)];
                Ok(())
            }
            Err(e) => {
                let stats = &mut self.info.stats;
                match e {
                    TxError::InvalidLength => bump(&mut stats.tx_bad_len),
                    TxError::InvalidScheme | TxError::InvalidMode => {
                        bump(&mut stats.tx_bad_format)
                    }
                    TxError::InvalidBuffer => {}
                }
                warn!("tx rejected: {:?}", e);
                Err(e)
            }
        }
    }

    /// Services the modem interrupt.
    pub fn handle_interrupt(&mut self) {
        self.dispatcher.handle_interrupt(&mut self.bus);
        for slot in 0..PHY_NUM_TX_BUFFERS as u8 {
            if self.dispatcher.tx_event_pending(slot) {
                self.scheduler.complete(slot);
            }
        }
    }

    /// Whether a transmit outcome is waiting.
    pub fn has_tx_result(&self) -> bool {
        self.dispatcher.has_tx_event()
    }

    /// Whether a received frame or noise capture is waiting.
    pub fn has_rx(&self) -> bool {
        self.dispatcher.has_rx_event()
    }

    /// Takes the next transmit outcome, serving slots round robin.
    pub fn poll_tx_result(&mut self) -> Option<TxOutcome> {
        let slot = self.dispatcher.next_tx_event()?;
        Some(self.tx_outcome(slot))
    }

    /// Takes the outcome of one slot, `None` until the modem reported it.
    pub fn poll_result(&mut self, slot: u8) -> Option<TxOutcome> {
        if !self.dispatcher.take_tx_event(slot) {
            return None;
        }
        Some(self.tx_outcome(slot))
    }

    fn tx_outcome(&mut self, slot: u8) -> TxOutcome {
        let result = result_field(self.bus.read16(RESULT_TX10), slot);
        let success = result == TxResult::Success;
        let adapt = success && self.cfg.auto_detect_impedance;
        // RMSCALC costs a bus transaction, so it is only read when someone uses it.
        let rms = (adapt || self.info.tx_qr_mode)
            .then(|| self.bus.read16(slot16(RMSCALC_TX0, slot)));
        let len = self.scheduler.release(slot);

        if success {
            if let Some(rms) = rms.filter(|_| adapt) {
                let _ = self.impedance.on_success(rms, self.cfg.enable_vlow_peak_cut);
            }
            let stats = &mut self.info.stats;
            bump(&mut stats.tx_total);
            stats.tx_total_bytes = stats.tx_total_bytes.wrapping_add(len as u32);
        } else {
            self.tx_failed(slot, result);
        }

        TxOutcome {
            buffer_id: slot,
            result,
            measured_rms: rms.filter(|_| self.info.tx_qr_mode),
        }
    }

    fn tx_failed(&mut self, slot: u8, result: TxResult) {
        let stats = &mut self.info.stats;
        bump(&mut stats.tx_total_errors);
        match result {
            TxResult::Success => {}
            TxResult::InProcess | TxResult::BusyPrevTx => bump(&mut stats.tx_bad_busy_tx),
            TxResult::WrongLength => bump(&mut stats.tx_bad_len),
            TxResult::BusyChannel => {
                bump(&mut stats.tx_bad_busy_channel);
                self.bus.or8(PHY_SFR, SFR_BCH_ERR);
            }
            TxResult::BusyRx => bump(&mut stats.tx_bad_busy_channel),
            TxResult::InvalidScheme => bump(&mut stats.tx_bad_format),
            TxResult::Timeout => {
                bump(&mut stats.tx_timeout);
                warn!("tx slot {} timed out, soft reset", slot);
                self.reset(ResetKind::Soft);
                return;
            }
        }
        warn!("tx slot {} failed: {:?}", slot, result);
    }

    /// Takes the next received frame, or the noise capture when no frame is waiting.
    ///
    /// Frames that cannot be decoded are counted, handed back to the modem and skipped.
    pub fn poll_rx(&mut self) -> Option<RxMessage> {
        while let Some(slot) = self.dispatcher.next_rx_event() {
            match self.receive(slot) {
                Ok(msg) => return Some(msg),
                Err(e) => self.drop_rx(slot, e),
            }
        }
        if self.dispatcher.take_noise() {
            return self.noise_capture();
        }
        None
    }

    fn receive(&mut self, slot: u8) -> Result<RxMessage, RxError> {
        let header = *self.dispatcher.header(slot);
        let mac_crc = self.mac_crc();
        let code = (self.bus.read8(RXCONF_INFO_ROBO_MODE) >> slot_field_shift(slot)) & SLOT_FIELD_MASK;
        let mode = FrameMode::from_code(code).ok_or(RxError::InvalidMode)?;
        let layout = RxLayout::from_header(mode, &header, mac_crc)?;
        if !(PHY_MIN_RX_LEN..=PHY_MAX_PPDU_SIZE).contains(&layout.len) {
            return Err(RxError::InvalidLength);
        }

        let mut bulk = [0u8; PHY_MAX_PPDU_SIZE];
        let bulk = &mut bulk[..layout.bulk_len().min(PHY_MAX_PPDU_SIZE)];
        self.bus
            .read_buf(rx_slot_address(slot) + PHY_DMA_OFFSET as u16, bulk);
        let payload = layout.assemble(bulk)?;

        let quality = self
            .info
            .rx_qr_mode
            .then(|| self.read_quality(slot, layout.symbols));
        let rx_time = self.bus.read32(slot32(RECTIME_RX0, slot));
        self.dispatcher.release_rx(&mut self.bus, slot);

        let stats = &mut self.info.stats;
        bump(&mut stats.rx_total);
        stats.rx_total_bytes = stats.rx_total_bytes.wrapping_add(layout.len as u32);
        self.info.rx = RxInfo {
            buffer_id: slot,
            scheme: layout.scheme,
            header_type: layout.header_type,
            mode,
            payload_len: layout.len as u16,
            payload_len_sym: layout.symbols,
        };

        Ok(RxMessage {
            source: RxSource::Slot(slot),
            mode,
            scheme: layout.scheme,
            header_type: layout.header_type,
            payload,
            rx_time,
            noise_result: None,
            quality,
        })
    }

    fn read_quality(&mut self, slot: u8, symbols: u16) -> RxQuality {
        let bus = &mut self.bus;
        let cinr = if symbols < 4 { CINRMIN_RX0 } else { CINRAVG_RX0 };
        RxQuality {
            rssi_avg: bus.read8(slot8(RSSIAVG_RX0, slot)),
            cinr_avg: bus.read8(slot8(cinr, slot)),
            evm_header: bus.read16(slot16(EVM_HEADER_RX0, slot)),
            evm_payload: bus.read16(slot16(EVM_PAYLOAD_RX0, slot)),
            evm_header_acum: bus.read32(slot32(EVM_HEADACUM_RX0, slot)),
            evm_payload_acum: bus.read32(slot32(EVM_PAYLACUM_RX0, slot)),
        }
    }

    fn drop_rx(&mut self, slot: u8, err: RxError) {
        let stats = &mut self.info.stats;
        bump(&mut stats.rx_total_errors);
        if err == RxError::InvalidLength {
            bump(&mut stats.rx_bad_len);
        }
        warn!("rx slot {} dropped: {:?}", slot, err);
        self.dispatcher.release_rx(&mut self.bus, slot);
    }

    fn noise_capture(&mut self) -> Option<RxMessage> {
        let conf = self.bus.read8(NOISECONF);
        let len = (usize::from(conf & 0x07) + 1) * NOISE_BYTES_PER_SYMBOL;
        let mut samples = [0u8; PHY_MAX_NOISE_SIZE];
        let samples = &mut samples[..len];
        self.bus.read_buf(PHY_NOISE_INIT_ADDRESS, samples);

        let mut payload = Payload::new();
        codec::extend(&mut payload, samples).ok()?;
        Some(RxMessage {
            source: RxSource::Noise,
            mode: FrameMode::Noise,
            scheme: Scheme::default(),
            header_type: None,
            payload,
            rx_time: 0,
            noise_result: Some((conf >> 5) & 0x07),
            quality: None,
        })
    }

    /// Reads a parameter by its numeric identifier.
    ///
    /// Register identifiers read one byte.
    ///
    /// # Errors
    /// * [`ConfigError::InvalidInput`] for an unknown identifier.
    /// * [`ConfigError::InvalidChannel`] for an attenuation field of a missing channel.
    pub fn get_param(&mut self, id: u16) -> Result<ParamValue, ConfigError> {
        match ParamId::from_id(id)? {
            ParamId::Info(p) => Ok(self.info.get(p)),
            ParamId::Attenuation(p) => self.cfg.get_attenuation(p),
            ParamId::Config(ConfigParam::Impedance) => {
                Ok(ParamValue::U8(self.impedance.state() as u8))
            }
            ParamId::Config(p) => Ok(self.cfg.get(p)),
            ParamId::Register(addr) => Ok(ParamValue::U8(self.bus.read8(addr))),
        }
    }

    /// Writes a parameter by its numeric identifier and applies it to the modem.
    ///
    /// # Errors
    /// * [`ConfigError::InvalidInput`] for an unknown identifier or a value of the wrong
    ///   width.
    /// * [`ConfigError::ReadOnly`] for statistics and identity fields.
    /// * [`ConfigError::InvalidChannel`] for a channel outside `1..=8`.
    pub fn set_param(&mut self, id: u16, value: ParamValue) -> Result<(), ConfigError> {
        match ParamId::from_id(id)? {
            ParamId::Info(p) => self.info.set(p, value),
            ParamId::Attenuation(p) => {
                self.cfg.set_attenuation(p, value)?;
                if let Ok(profile) = self.cfg.profile(self.cfg.channel) {
                    self.impedance.load_channel(*profile);
                }
                Ok(())
            }
            ParamId::Config(ConfigParam::Impedance) => {
                let state = Impedance::from_code(value.as_u8()?).ok_or(ConfigError::InvalidInput)?;
                self.impedance.set_state(state);
                Ok(())
            }
            ParamId::Config(p) => self.set_config(p, value),
            ParamId::Register(addr) => self.write_register(addr, value),
        }
    }

    fn set_config(&mut self, param: ConfigParam, value: ParamValue) -> Result<(), ConfigError> {
        use ConfigParam as P;
        self.cfg.set(param, value)?;
        match param {
            P::Txrx1Polarity | P::Txrx2Polarity => self.apply_polarity(),
            P::Driver1Mode
            | P::Driver2Mode
            | P::N1Delay
            | P::P1Delay
            | P::N2Delay
            | P::P2Delay
            | P::Emit1Active
            | P::Emit2Active
            | P::Emit3Active
            | P::Emit4Active => self.apply_emit_mode(),
            P::Channel => {
                let channel = self.cfg.channel;
                self.set_channel(channel)?;
            }
            P::CouplingBoard => {
                self.cfg = PhyConfig::for_board(self.cfg.coupling_board);
                let channel = self.cfg.channel;
                self.set_channel(channel)?;
                self.apply_polarity();
                self.apply_emit_mode();
            }
            _ => {}
        }
        Ok(())
    }

    /// Applies `reg = reg <op> mask` to a register parameter.
    ///
    /// # Errors
    /// [`ConfigError::InvalidInput`] for anything but a register identifier.
    pub fn cmd_param(&mut self, id: u16, cmd: ParamCmd, mask: u8) -> Result<(), ConfigError> {
        let ParamId::Register(addr) = ParamId::from_id(id)? else {
            return Err(ConfigError::InvalidInput);
        };
        match cmd {
            ParamCmd::And => self.bus.and8(addr, mask),
            ParamCmd::Or => self.bus.or8(addr, mask),
            ParamCmd::Xor => self.bus.xor8(addr, mask),
        }
        if touches_sna(addr, 1) {
            self.refresh_sna_seed();
        }
        Ok(())
    }

    /// Reads one register byte.
    pub fn read_register(&mut self, addr: u16) -> u8 {
        self.bus.read8(addr)
    }

    /// Writes a register with the width of `value`.
    ///
    /// Writes that reach the SNA registers re-derive the CRC seeds.
    ///
    /// # Errors
    /// [`ConfigError::InvalidInput`] for a text value.
    pub fn write_register(&mut self, addr: u16, value: ParamValue) -> Result<(), ConfigError> {
        let width = match value {
            ParamValue::U8(v) => {
                self.bus.write8(addr, v);
                1
            }
            ParamValue::U16(v) => {
                self.bus.write16(addr, v);
                2
            }
            ParamValue::U32(v) => {
                self.bus.write32(addr, v);
                4
            }
            ParamValue::Text(_) => return Err(ConfigError::InvalidInput),
        };
        if touches_sna(addr, width) {
            self.refresh_sna_seed();
        }
        Ok(())
    }

    /// PRIME CRC of `data`, seeded with the SNA for generic headers.
    ///
    /// `width` is the numeric width code (`0` = 8, `1` = 16, `2` = 24, `3` = 32 bits).
    ///
    /// # Errors
    /// [`CrcError::InvalidCrcWidth`] for any other code.
    pub fn compute_crc(
        &self,
        width: u8,
        data: &[u8],
        header_type: HeaderType,
    ) -> Result<u32, CrcError> {
        self.sna_seed.compute_code(width, data, header_type)
    }

    /// Counters, last-frame info and quality-report flags.
    pub fn info(&self) -> &PhyInfo {
        &self.info
    }

    /// Current configuration.
    pub fn config(&self) -> &PhyConfig {
        &self.cfg
    }

    /// Current impedance state.
    pub fn impedance(&self) -> Impedance {
        self.impedance.state()
    }

    /// State of transmit `slot`.
    pub fn slot_state(&self, slot: u8) -> Option<SlotState> {
        self.scheduler.state(slot)
    }

    /// Reports a bus fault recorded since the last call.
    pub fn take_error(&mut self) -> Result<(), PhyError> {
        self.bus.take_error()
    }

    /// Gives the bus back.
    pub fn release(self) -> B {
        self.bus
    }
}

fn set_bits<B: PhyBus>(bus: &mut B, addr: u16, mask: u8, on: bool) {
    if on {
        bus.or8(addr, mask);
    } else {
        bus.and8(addr, !mask);
    }
}

fn touches_sna(addr: u16, width: u32) -> bool {
    let start = u32::from(addr);
    let sna = u32::from(SNA0);
    start < sna + 6 && start + width > sna
}

fn bump(counter: &mut u32) {
    *counter = counter.wrapping_add(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::MemBus;
    use crate::config::InfoParam;
    use crate::crc::CrcWidth;
    use crate::scheduler::Schedule;

    fn phy() -> Phy<MemBus> {
        Phy::new(MemBus::new(), PhyConfig::default())
    }

    fn request(buffer_id: u8, payload: &[u8]) -> TxRequest<'_> {
        TxRequest {
            buffer_id,
            attenuation_level: 0,
            scheme: Scheme::Dbpsk,
            mode: FrameMode::TypeB,
            disable_rx: false,
            payload,
            schedule: Schedule::Immediate,
        }
    }

    fn put_rx_frame(phy: &mut Phy<MemBus>, slot: u8, mode: FrameMode, bytes: &[u8]) {
        phy.bus.write_buf(rx_slot_address(slot), bytes);
        phy.bus
            .or8(RXCONF_INFO_ROBO_MODE, mode.code() << slot_field_shift(slot));
        phy.bus.or8(RX_INT, 0x11 << slot);
    }

    #[test]
    fn test_init_programs_modem() {
        let mut phy = phy();
        let cfg = phy.config().clone();
        let bus = &mut phy.bus;

        assert_eq!(bus.read8(CFG_KEY), VALID_CFG_KEY);
        assert_eq!(bus.read8(SYS_CONFIG) & SYS_CONFIG_RST, 0);
        assert_eq!(bus.read8(PHY_CONFIG) & PHY_CONFIG_CD_EN, PHY_CONFIG_CD_EN);
        assert_eq!(bus.read16(slot16(INITAD_TX0, 3)), 1536);
        assert_eq!(bus.read32(slot32(TIMEOUT_TX0, 2)), PHY_TX_TIMEOUT_IMMEDIATE_10US);
        assert_eq!(bus.read16(slot16(INITAD_RX0, 1)), 2048 + 512);
        assert_eq!(bus.read8(SELECT_BUFF_RX), 0x0F);
        assert_eq!(bus.read16(FILTER_MIN_MED), cfg.rx_corr_threshold);
        assert_eq!(bus.read8(AGC2_KRSSI), cfg.agc_krssi[2]);
        assert_eq!(bus.read8(FT_MAX_FACTOR_TH_ROBO), 0x17);
        assert_eq!(bus.read16(N_RAMPH), 0x0600);
        assert_eq!(&bus.mem[0xFF00..0xFF08], &BC_MODE_CONFIG);
        assert_eq!(bus.read32(PASO_FASE_CORDIC_TX_VH), CHANNEL_TX_ID[0]);
        assert_eq!(bus.read8(EMITTER_FREC), EMIT_FREQ_TABLE[0]);
        assert_eq!(bus.read8(PHY_SFR), SFR_PHY_INT);
    }

    #[test]
    fn test_polarity_and_emit_mode() {
        let mut cfg = PhyConfig::default();
        cfg.txrx1_polarity = Polarity::Tx1Rx0;
        cfg.txrx2_polarity = Polarity::Tx0Rx1;
        cfg.driver1_mode = DriverMode::External;
        cfg.driver2_mode = DriverMode::Internal;
        cfg.n1_delay = 0x12;
        cfg.emit_active = [1, 2, 3, 4];
        let mut phy = Phy::new(MemBus::new(), cfg);
        phy.bus.write8(AFE_CTL, 0xFF);
        phy.apply_polarity();
        phy.apply_emit_mode();

        let bus = &mut phy.bus;
        assert_eq!(bus.read8(AFE_CTL), 0xFD);
        assert_eq!(bus.read8(EMIT_CONFIG) & 0x03, EMIT_CONFIG_EXT1);
        assert_eq!(bus.read8(N1_DELAY), 0x12);
        assert_eq!(bus.read8(EMIT4_ACTIVE), 4);
    }

    #[test]
    fn test_submit_records_symbols() {
        let mut phy = phy();

        let mut req = request(0, &[0u8; 9]);
        req.mode = FrameMode::TypeA;
        phy.submit(&req).unwrap();
        assert_eq!(phy.info().tx.payload_len_sym, 1);

        let payload = [0u8; 50];
        let mut req = request(1, &payload);
        req.scheme = Scheme::DqpskRobo;
        req.attenuation_level = 3;
        phy.submit(&req).unwrap();
        assert_eq!(phy.info().tx.payload_len_sym, 20);
        assert_eq!(phy.info().tx.buffer_id, 1);
        assert_eq!(phy.config().global_attenuation, ATTENUATION_TABLE[3]);
        assert_eq!(phy.slot_state(1), Some(SlotState::InFlight));
    }

    #[test]
    fn test_submit_rejections_are_counted() {
        let mut phy = phy();

        assert_eq!(phy.submit(&request(0, &[0u8; 3])), Err(TxError::InvalidLength));
        let mut robust = request(0, &[0u8; 20]);
        robust.mode = FrameMode::TypeA;
        robust.scheme = Scheme::DbpskRobo;
        assert_eq!(phy.submit(&robust), Err(TxError::InvalidScheme));
        assert_eq!(phy.submit(&request(4, &[0u8; 20])), Err(TxError::InvalidBuffer));

        let stats = phy.info().stats;
        assert_eq!(stats.tx_bad_len, 1);
        assert_eq!(stats.tx_bad_format, 1);
        assert_eq!(phy.slot_state(0), Some(SlotState::Idle));
    }

    #[test]
    fn test_busy_slot_is_overwritten_and_counted() {
        let mut phy = phy();
        let mut req = request(2, &[0u8; 20]);
        req.schedule = Schedule::AbsoluteTime(5000);
        phy.submit(&req).unwrap();
        phy.submit(&req).unwrap();
        assert_eq!(phy.info().stats.tx_bad_busy_tx, 1);
        assert_eq!(phy.slot_state(2), Some(SlotState::Armed));
    }

    #[test]
    fn test_tx_success_feeds_impedance() {
        let mut phy = phy();
        phy.set_param(InfoParam::TxQrMode as u16, ParamValue::U8(1)).unwrap();
        phy.submit(&request(1, &[0u8; 30])).unwrap();

        phy.bus.write16(slot16(RMSCALC_TX0, 1), 5000);
        phy.bus.write16(RESULT_TX10, 0x1000);
        phy.bus.write8(TX_INT, 0x02);
        phy.handle_interrupt();
        assert_eq!(phy.slot_state(1), Some(SlotState::Done));
        assert!(phy.has_tx_result());

        let outcome = phy.poll_tx_result().unwrap();
        assert_eq!(outcome.buffer_id, 1);
        assert_eq!(outcome.result, TxResult::Success);
        assert_eq!(outcome.measured_rms, Some(5000));
        assert_eq!(phy.poll_tx_result(), None);

        assert_eq!(phy.slot_state(1), Some(SlotState::Idle));
        assert_eq!(phy.info().stats.tx_total, 1);
        assert_eq!(phy.info().stats.tx_total_bytes, 30);
        // Below threshold 2 with peak cut enabled on the default board.
        assert_eq!(phy.impedance(), Impedance::LowPeakCut);
    }

    #[test]
    fn test_poll_result_for_one_slot() {
        let mut phy = phy();
        phy.submit(&request(0, &[0u8; 10])).unwrap();
        phy.submit(&request(3, &[0u8; 10])).unwrap();
        assert_eq!(phy.poll_result(3), None);

        phy.bus.write16(RESULT_TX10, 0x0110);
        phy.bus.write8(TX_INT, 0x09);
        phy.handle_interrupt();
        assert_eq!(phy.poll_result(3).map(|o| o.buffer_id), Some(3));
        assert_eq!(phy.poll_result(3), None);
        assert_eq!(phy.poll_tx_result().map(|o| o.buffer_id), Some(0));
    }

    #[test]
    fn test_in_process_result_leaves_impedance() {
        let mut phy = phy();
        phy.submit(&request(0, &[0u8; 30])).unwrap();
        phy.bus.write16(slot16(RMSCALC_TX0, 0), 5000);
        phy.bus.write16(RESULT_TX10, 0x0000);
        phy.bus.write8(TX_INT, 0x01);
        phy.handle_interrupt();

        let outcome = phy.poll_tx_result().unwrap();
        assert_eq!(outcome.result, TxResult::InProcess);
        let stats = phy.info().stats;
        assert_eq!(stats.tx_total, 0);
        assert_eq!(stats.tx_total_errors, 1);
        assert_eq!(stats.tx_bad_busy_tx, 1);
        assert_eq!(phy.impedance(), Impedance::High);
    }

    #[test]
    fn test_rms_read_only_when_used() {
        let mut cfg = PhyConfig::default();
        cfg.auto_detect_impedance = false;
        let mut phy = Phy::new(MemBus::new(), cfg);
        let rms_addr = slot16(RMSCALC_TX0, 2);

        phy.submit(&request(2, &[0u8; 10])).unwrap();
        phy.bus.write16(RESULT_TX10, 0x0010);
        phy.bus.write8(TX_INT, 0x04);
        phy.handle_interrupt();
        phy.bus.reads.clear();
        assert_eq!(phy.poll_tx_result().map(|o| o.measured_rms), Some(None));
        assert!(!phy.bus.reads.contains(&rms_addr));

        phy.set_param(InfoParam::TxQrMode as u16, ParamValue::U8(1)).unwrap();
        phy.bus.write16(rms_addr, 1234);
        phy.submit(&request(2, &[0u8; 10])).unwrap();
        phy.bus.write8(TX_INT, 0x04);
        phy.handle_interrupt();
        assert_eq!(phy.poll_tx_result().map(|o| o.measured_rms), Some(Some(1234)));
    }

    #[test]
    fn test_busy_channel_result() {
        let mut phy = phy();
        phy.submit(&request(2, &[0u8; 10])).unwrap();
        phy.bus.write16(RESULT_TX10, 0x0003);
        phy.bus.write8(TX_INT, 0x04);
        phy.handle_interrupt();

        let outcome = phy.poll_tx_result().unwrap();
        assert_eq!(outcome.result, TxResult::BusyChannel);
        assert_eq!(outcome.measured_rms, None);
        let stats = phy.info().stats;
        assert_eq!(stats.tx_bad_busy_channel, 1);
        assert_eq!(stats.tx_total_errors, 1);
        assert_eq!(stats.tx_total, 0);
        assert_eq!(phy.bus.read8(PHY_SFR) & SFR_BCH_ERR, SFR_BCH_ERR);
        assert_eq!(phy.impedance(), Impedance::High);
    }

    #[test]
    fn test_timeout_soft_resets() {
        let mut phy = phy();
        phy.set_network_address([1, 2, 3, 4, 5, 6]);
        phy.set_param(ConfigParam::Impedance as u16, ParamValue::U8(2)).unwrap();
        phy.submit(&request(0, &[0u8; 10])).unwrap();
        phy.submit(&request(1, &[0u8; 10])).unwrap();

        phy.bus.write16(RESULT_TX10, 0x0700);
        phy.bus.write8(CFG_KEY, 0);
        phy.bus.write8(TX_INT, 0x01);
        phy.handle_interrupt();

        let outcome = phy.poll_tx_result().unwrap();
        assert_eq!(outcome.result, TxResult::Timeout);
        assert_eq!(phy.info().stats.tx_timeout, 1);
        assert_eq!(phy.info().stats.tx_total_errors, 1);
        assert_eq!(phy.bus.read8(CFG_KEY), VALID_CFG_KEY);
        assert_eq!(&phy.bus.mem[usize::from(SNA0)..usize::from(SNA0) + 6], &[1, 2, 3, 4, 5, 6]);
        assert_eq!(phy.impedance(), Impedance::VeryLow);
        assert_eq!(phy.slot_state(1), Some(SlotState::Idle));
    }

    #[test]
    fn test_reset_kinds() {
        let mut phy = phy();
        phy.bus.or8(PHY_CONFIG, PHY_CONFIG_MAC_EN);
        let _ = phy.submit(&request(0, &[0u8; 3]));
        phy.set_param(ConfigParam::Impedance as u16, ParamValue::U8(1)).unwrap();

        phy.reset(ResetKind::Soft);
        assert_eq!(phy.info().stats.tx_bad_len, 1);
        assert_eq!(phy.impedance(), Impedance::Low);
        assert_eq!(phy.bus.read8(PHY_CONFIG) & PHY_CONFIG_MAC_EN, PHY_CONFIG_MAC_EN);

        phy.reset(ResetKind::Hard);
        assert_eq!(phy.info().stats.tx_bad_len, 0);
        assert_eq!(phy.impedance(), phy.config().impedance);
    }

    #[test]
    fn test_rx_frame_is_decoded_and_released() {
        let mut phy = phy();
        let payload: Vec<u8> = (0..40u8).collect();
        let frame = codec::encode(FrameMode::TypeB, Scheme::Dqpsk, &payload, false).unwrap();
        put_rx_frame(&mut phy, 1, FrameMode::TypeB, frame.as_bytes());
        phy.bus.write32(slot32(RECTIME_RX0, 1), 0x0102_0304);

        phy.handle_interrupt();
        assert!(phy.has_rx());
        let msg = phy.poll_rx().unwrap();

        assert_eq!(msg.source, RxSource::Slot(1));
        assert_eq!(msg.mode, FrameMode::TypeB);
        assert_eq!(msg.scheme, Scheme::Dqpsk);
        assert_eq!(&msg.payload[..], &payload[..]);
        assert_eq!(msg.rx_time, 0x0102_0304);
        assert_eq!(msg.quality, None);
        assert_eq!(phy.bus.read8(RX_INT), 0);
        assert_eq!(phy.info().stats.rx_total, 1);
        assert_eq!(phy.info().stats.rx_total_bytes, 40);
        assert_eq!(phy.info().rx.buffer_id, 1);
        assert_eq!(phy.poll_rx(), None);
    }

    #[test]
    fn test_rx_type_a_with_quality() {
        let mut phy = phy();
        phy.set_param(InfoParam::RxQrMode as u16, ParamValue::U8(1)).unwrap();
        let mut payload = vec![0x10u8];
        payload.extend((1..60u8).map(|b| b.wrapping_mul(3)));
        let frame = codec::encode(FrameMode::TypeA, Scheme::DbpskVtb, &payload, false).unwrap();
        put_rx_frame(&mut phy, 0, FrameMode::TypeA, frame.as_bytes());
        phy.bus.write8(RSSIAVG_RX0, 71);
        phy.bus.write8(CINRAVG_RX0, 22);
        phy.bus.write16(EVM_PAYLOAD_RX0, 0x0300);
        phy.bus.write32(EVM_PAYLACUM_RX0, 0x0001_0000);

        phy.handle_interrupt();
        let msg = phy.poll_rx().unwrap();

        assert_eq!(msg.header_type, Some(HeaderType::Promotion));
        assert_eq!(&msg.payload[..], &payload[..]);
        let quality = msg.quality.unwrap();
        assert_eq!(quality.rssi_avg, 71);
        assert_eq!(quality.cinr_avg, 22);
        assert_eq!(quality.evm_payload, 0x0300);
        assert_eq!(quality.evm_payload_acum, 0x0001_0000);
    }

    #[test]
    fn test_rx_bad_length_is_dropped() {
        let mut phy = phy();
        let mut header = [0u8; 16];
        header[1] = 0x40 | 11;
        put_rx_frame(&mut phy, 0, FrameMode::TypeA, &header);

        phy.handle_interrupt();
        assert_eq!(phy.poll_rx(), None);
        let stats = phy.info().stats;
        assert_eq!(stats.rx_total_errors, 1);
        assert_eq!(stats.rx_bad_len, 1);
        assert_eq!(stats.rx_total, 0);
        assert_eq!(phy.bus.read8(RX_INT), 0);
    }

    #[test]
    fn test_noise_capture_after_frames() {
        let mut phy = phy();
        let frame = codec::encode(FrameMode::TypeB, Scheme::Dbpsk, &[7u8; 12], false).unwrap();
        put_rx_frame(&mut phy, 2, FrameMode::TypeB, frame.as_bytes());
        for (i, b) in phy.bus.mem[..194].iter_mut().enumerate() {
            *b = i as u8;
        }
        phy.bus.write8(NOISECONF, (5 << 5) | 1);
        phy.bus.write8(TX_INT, TX_INT_NOISE);

        phy.handle_interrupt();
        assert_eq!(phy.poll_rx().map(|m| m.source), Some(RxSource::Slot(2)));

        let noise = phy.poll_rx().unwrap();
        assert_eq!(noise.source, RxSource::Noise);
        assert_eq!(noise.mode, FrameMode::Noise);
        assert_eq!(noise.noise_result, Some(5));
        assert_eq!(noise.payload.len(), 2 * NOISE_BYTES_PER_SYMBOL);
        assert_eq!(noise.payload[193], 193);
        assert_eq!(phy.poll_rx(), None);
    }

    #[test]
    fn test_channel_parameter() {
        let mut phy = phy();
        assert_eq!(phy.get_param(ConfigParam::Channel as u16), Ok(ParamValue::U8(1)));
        assert_eq!(
            phy.set_param(ConfigParam::Channel as u16, ParamValue::U8(9)),
            Err(ConfigError::InvalidChannel)
        );

        phy.set_param(ConfigParam::Channel as u16, ParamValue::U8(3)).unwrap();
        assert_eq!(phy.bus.read8(EMITTER_FREC), EMIT_FREQ_TABLE[2]);
        assert_eq!(phy.bus.read32(PASO_FASE_CORDIC_TX_VH), CHANNEL_TX_ID[2]);
        assert_eq!(phy.impedance.profile(), &phy.cfg.channels[2]);
        assert_eq!(phy.set_channel(0), Err(ConfigError::InvalidChannel));
    }

    #[test]
    fn test_config_side_effects() {
        let mut phy = phy();
        phy.set_param(ConfigParam::Txrx2Polarity as u16, ParamValue::U8(1)).unwrap();
        assert_eq!(phy.bus.read8(AFE_CTL) & AFE_CTL_POL2, AFE_CTL_POL2);

        phy.set_param(ConfigParam::Impedance as u16, ParamValue::U8(2)).unwrap();
        assert_eq!(phy.get_param(ConfigParam::Impedance as u16), Ok(ParamValue::U8(2)));

        assert_eq!(
            phy.set_param(InfoParam::TxTotal as u16, ParamValue::U32(1)),
            Err(ConfigError::ReadOnly)
        );
        assert_eq!(phy.get_param(0x0001), Err(ConfigError::InvalidInput));
    }

    #[test]
    fn test_attenuation_write_reloads_active_profile() {
        let mut phy = phy();
        // Channel 1, threshold 1.
        phy.set_param(0x0202 + 6, ParamValue::U16(4321)).unwrap();
        assert_eq!(phy.impedance.profile().thresholds[0], 4321);
        assert_eq!(phy.get_param(0x0202 + 6), Ok(ParamValue::U16(4321)));
    }

    #[test]
    fn test_register_parameters_and_sna_seed() {
        let mut phy = phy();
        phy.set_param(SNA0, ParamValue::U32(0x0A0B_0C0D)).unwrap();
        phy.set_param(SNA0 + 4, ParamValue::U16(0x0E0F)).unwrap();
        let expected = SnaCrcSeed::new(&[0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F]);
        assert_eq!(
            phy.compute_crc(3, b"abc", HeaderType::Generic),
            Ok(expected.compute(CrcWidth::Crc32, b"abc", HeaderType::Generic))
        );

        phy.cmd_param(SNA0 + 5, ParamCmd::Xor, 0xFF).unwrap();
        assert_eq!(phy.get_param(SNA0 + 5), Ok(ParamValue::U8(0xF0)));
        let expected = SnaCrcSeed::new(&[0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0xF0]);
        assert_eq!(
            phy.compute_crc(0, b"abc", HeaderType::Generic),
            Ok(expected.compute(CrcWidth::Crc8, b"abc", HeaderType::Generic))
        );

        assert_eq!(
            phy.cmd_param(ConfigParam::Channel as u16, ParamCmd::Or, 1),
            Err(ConfigError::InvalidInput)
        );
        assert_eq!(phy.compute_crc(4, b"abc", HeaderType::Generic), Err(CrcError::InvalidCrcWidth));
    }

    #[test]
    fn test_network_address() {
        let mut phy = phy();
        let sna = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66];
        phy.set_network_address(sna);
        assert_eq!(&phy.bus.mem[usize::from(SNA0)..usize::from(SNA0) + 6], &sna);
        assert_eq!(phy.sna_seed, SnaCrcSeed::new(&sna));
        // Beacons are never seeded.
        assert_eq!(
            phy.compute_crc(3, b"x", HeaderType::Beacon),
            Ok(crate::crc::crc(CrcWidth::Crc32, b"x", 0))
        );
    }
}
