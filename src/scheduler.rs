//! Transmit slot scheduling.
//!
//! The modem has four transmit slots. [`TxScheduler`] writes a frame into one of them,
//! programs the slot's attenuation, gains, driver branch and guard times, then arms it
//! either at once or for a point on the modem's 10 µs timer.
//!
//! Each slot moves through [`SlotState`]:
//!
//! ```text
//! Idle ──submit──▶ Armed (scheduled) ──┐
//!   │                                  ├──interrupt──▶ Done ──outcome polled──▶ Idle
//!   └────submit──▶ InFlight (forced) ──┘
//! ```
//!
//! Submitting to a slot that is still armed or in flight is allowed. The new frame replaces
//! the old one and the busy counter goes up.

use crate::bus::PhyBus;
use crate::codec::{self, FrameMode, Scheme};
use crate::config::{Driver, DriverMode, PhyConfig};
use crate::consts::{
    self, ATTENUATION_TABLE, EMIT_FREQ_EF10, EMIT_FREQ_TABLE, MAX_ATTENUATION_LEVEL,
    PHY_MAX_PPDU_SIZE, PHY_NUM_TX_BUFFERS, PHY_TX_FORCED_OFFSET, PHY_TX_INIT_ADDRESS,
    PHY_TX_MIN_DELAY, SOFT_STOP_TIME, SOFT_TIME_X1, SOFT_TIME_X2, TX_TIMEOUT_PER_SYMBOL,
    TX_TIMEOUT_TICK_SCALE,
};
use crate::error::TxError;
use crate::impedance::TxProfile;
use crate::regs::*;

/// When a frame leaves the slot.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Schedule {
    /// Force the emission now.
    #[default]
    Immediate,
    /// Emit this many 10 µs ticks from now (at least [`PHY_TX_MIN_DELAY`]).
    RelativeDelay(u32),
    /// Emit when the modem timer reaches this value.
    AbsoluteTime(u32),
}

impl Schedule {
    /// Raw timing value, `0` for [`Schedule::Immediate`].
    pub fn tdelay(self) -> u32 {
        match self {
            Self::Immediate => 0,
            Self::RelativeDelay(t) | Self::AbsoluteTime(t) => t,
        }
    }
}

/// A frame to send.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct TxRequest<'a> {
    /// Slot, `0..4`.
    pub buffer_id: u8,
    /// Attenuation in dB, `0..=21`. Larger values are clamped.
    pub attenuation_level: u8,
    /// Modulation scheme.
    pub scheme: Scheme,
    /// Frame format.
    pub mode: FrameMode,
    /// Disable reception and carrier detection while this slot emits.
    pub disable_rx: bool,
    /// MAC header and payload, or raw samples in [`FrameMode::Test`].
    pub payload: &'a [u8],
    /// Emission time.
    pub schedule: Schedule,
}

/// Life cycle of a transmit slot.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum SlotState {
    /// Free.
    #[default]
    Idle,
    /// Waiting for its scheduled time.
    Armed,
    /// Forced emission under way.
    InFlight,
    /// The modem reported a result that has not been polled yet.
    Done,
}

/// Per-slot result codes reported by the modem.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum TxResult {
    /// Emission still in progress.
    InProcess = 0,
    /// Frame sent.
    Success = 1,
    /// Length rejected by the modem.
    WrongLength = 2,
    /// Carrier detected on the line.
    BusyChannel = 3,
    /// Previous emission still in progress.
    BusyPrevTx = 4,
    /// Reception in progress.
    BusyRx = 5,
    /// Scheme rejected by the modem.
    InvalidScheme = 6,
    /// No emission before the slot timeout.
    Timeout = 7,
}

impl TxResult {
    /// Decodes a 3-bit result field.
    pub const fn from_code(code: u8) -> Self {
        match code & 0x07 {
            0 => Self::InProcess,
            1 => Self::Success,
            2 => Self::WrongLength,
            3 => Self::BusyChannel,
            4 => Self::BusyPrevTx,
            5 => Self::BusyRx,
            6 => Self::InvalidScheme,
            _ => Self::Timeout,
        }
    }
}

/// Result of one emission, produced once per completed slot.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct TxOutcome {
    /// Slot.
    pub buffer_id: u8,
    /// What the modem reported.
    pub result: TxResult,
    /// RMS measured on the line, in quality-report mode.
    pub measured_rms: Option<u16>,
}

/// Extracts the result of `slot` from the packed `RESULT_TX10` register.
///
/// Slots 0 and 1 live in the high byte, slots 2 and 3 in the low byte, each as a 3-bit
/// field in its own nibble.
pub fn result_field(raw: u16, slot: u8) -> TxResult {
    let shift = match slot & 0x03 {
        0 => 8,
        1 => 12,
        2 => 0,
        _ => 4,
    };
    TxResult::from_code((raw >> shift) as u8)
}

/// Slot timeout in 10 µs units for a frame of `symbols` payload symbols.
pub const fn tx_timeout(mode: FrameMode, symbols: u16) -> u32 {
    let base = match mode {
        FrameMode::TypeB => 18,
        FrameMode::TypeBC => 25,
        _ => 7,
    };
    (base + symbols as u32 * TX_TIMEOUT_PER_SYMBOL) * TX_TIMEOUT_TICK_SCALE
}

/// Address of a transmit slot in modem memory.
pub const fn tx_slot_address(slot: u8) -> u16 {
    PHY_TX_INIT_ADDRESS + slot as u16 * PHY_MAX_PPDU_SIZE as u16
}

/// Owner of the four transmit slots.
#[derive(Debug, Default, Clone)]
pub struct TxScheduler {
    slots: [SlotState; PHY_NUM_TX_BUFFERS],
    last_len: [usize; PHY_NUM_TX_BUFFERS],
}

impl TxScheduler {
    /// All slots idle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets every slot.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// State of `slot`, `None` outside `0..4`.
    pub fn state(&self, slot: u8) -> Option<SlotState> {
        self.slots.get(usize::from(slot)).copied()
    }

    /// Whether `slot` still holds a frame the modem may send, by software state or by its
    /// buffer enable bit.
    pub fn is_busy<B: PhyBus>(&self, bus: &mut B, slot: u8) -> bool {
        matches!(
            self.state(slot),
            Some(SlotState::Armed | SlotState::InFlight)
        ) || bus.read8(slot8(TXCONF_TX0, slot)) & TXCONF_EB != 0
    }

    /// Writes `req` into its slot and arms it.
    ///
    /// `tx` carries the impedance dependent settings for this frame. Returns the symbol
    /// count written in the header (`0` in [`FrameMode::Test`]).
    ///
    /// # Errors
    /// * [`TxError::InvalidBuffer`] for a slot outside `0..4`.
    /// * Any validation error of [`codec::encode`]; nothing is written in that case.
    /// * [`TxError::InvalidLength`] for an empty or oversized test payload.
    pub fn arm<B: PhyBus>(
        &mut self,
        bus: &mut B,
        req: &TxRequest<'_>,
        tx: &TxProfile,
        cfg: &PhyConfig,
        mac_crc: bool,
    ) -> Result<u16, TxError> {
        let idx = usize::from(req.buffer_id);
        if idx >= PHY_NUM_TX_BUFFERS {
            return Err(TxError::InvalidBuffer);
        }
        let id = req.buffer_id;

        if req.mode == FrameMode::Test {
            if req.payload.is_empty() || req.payload.len() > PHY_MAX_PPDU_SIZE {
                return Err(TxError::InvalidLength);
            }
            self.last_len[idx] = req.payload.len();
            Self::arm_test(bus, req, tx, cfg);
            self.slots[idx] = SlotState::InFlight;
            return Ok(0);
        }

        self.last_len[idx] = req.payload.len();
        let frame = codec::encode(req.mode, req.scheme, req.payload, mac_crc)?;

        bus.write32(slot32(TIMEOUT_TX0, id), tx_timeout(req.mode, frame.symbols));
        bus.write_buf(tx_slot_address(id), frame.as_bytes());

        let shift = slot_field_shift(id);
        bus.and8(TXCONF_ROBO_CTL, !(SLOT_FIELD_MASK << shift));
        if req.mode != FrameMode::TypeA {
            bus.or8(TXCONF_ROBO_CTL, req.mode.code() << shift);
        }

        write_gains(bus, id, req.scheme, req.attenuation_level);
        write_impedance(bus, id, tx, true);
        let mode = select_branch(bus, id, tx.driver, cfg);
        write_soft_times(bus, cfg, mode);

        if req.disable_rx {
            bus.or8(slot8(TXCONF_TX0, id), TXCONF_DC | TXCONF_DR);
        }

        self.slots[idx] = Self::start(bus, id, req.schedule);
        Ok(frame.symbols)
    }

    fn arm_test<B: PhyBus>(bus: &mut B, req: &TxRequest<'_>, tx: &TxProfile, cfg: &PhyConfig) {
        let id = req.buffer_id;
        bus.write_buf(tx_slot_address(id), req.payload);
        write_gains(bus, id, req.scheme, req.attenuation_level);
        write_impedance(bus, id, tx, false);
        let _ = select_branch(bus, id, tx.driver, cfg);
        bus.or8(slot8(TXCONF_TX0, id), TXCONF_EB);
        bus.or8(FFT_MODE, FFT_MODE_CONT);
        bus.or8(FFT_MODE, FFT_MODE_EN);
        bus.or8(slot8(TXCONF_TX0, id), TXCONF_FE);
    }

    fn start<B: PhyBus>(bus: &mut B, id: u8, schedule: Schedule) -> SlotState {
        let emitime = slot32(EMITIME_TX0, id);
        let txconf = slot8(TXCONF_TX0, id);
        match schedule {
            Schedule::Immediate => {
                // Past time so the forced emission cannot also fire as a scheduled one.
                let now = bus.read32(VHIGH_TIMER_BEACON_REF);
                bus.write32(emitime, now.wrapping_sub(PHY_TX_FORCED_OFFSET));
                bus.or8(txconf, TXCONF_EB);
                bus.or8(txconf, TXCONF_FE);
                SlotState::InFlight
            }
            Schedule::RelativeDelay(delay) => {
                let now = bus.read32(VHIGH_TIMER_BEACON_REF);
                bus.write32(emitime, now.wrapping_add(delay.max(PHY_TX_MIN_DELAY)));
                bus.or8(txconf, TXCONF_EB);
                SlotState::Armed
            }
            Schedule::AbsoluteTime(time) => {
                bus.write32(emitime, time);
                bus.or8(txconf, TXCONF_EB);
                SlotState::Armed
            }
        }
    }

    /// Records that the modem reported a result for `slot`.
    pub fn complete(&mut self, slot: u8) {
        if let Some(state) = self.slots.get_mut(usize::from(slot)) {
            *state = SlotState::Done;
        }
    }

    /// Frees `slot` after its outcome was consumed. Returns the length of the frame it held.
    pub fn release(&mut self, slot: u8) -> usize {
        let idx = usize::from(slot);
        match self.slots.get_mut(idx) {
            Some(state) => {
                *state = SlotState::Idle;
                self.last_len[idx]
            }
            None => 0,
        }
    }
}

fn write_gains<B: PhyBus>(bus: &mut B, id: u8, scheme: Scheme, level: u8) {
    let level = usize::from(level.min(MAX_ATTENUATION_LEVEL));
    bus.write8(slot8(GLOBAL_AMP_TX0, id), ATTENUATION_TABLE[level]);
    bus.write8(slot8(EMIT_GAIN_TX0, id), scheme.emit_gain());
    bus.write8(slot8(PEAK_CUT_GAIN_TX0, id), scheme.peak_cut_gain());
    bus.and8(slot8(TXCONF_TX0, id), !TXCONF_PCO);
}

fn write_impedance<B: PhyBus>(bus: &mut B, id: u8, tx: &TxProfile, guard_times: bool) {
    let txconf = slot8(TXCONF_TX0, id);
    if tx.peak_cut {
        bus.or8(txconf, TXCONF_PCO);
    }
    bus.write8(slot8(CHIRP_AMP_TX0, id), tx.chirp_amp);
    bus.write8(slot8(SIGNAL_AMP_TX0, id), tx.signal_amp);
    if guard_times {
        bus.write16(slot16(TXRX_TB_TX0, id), tx.time_before);
        bus.write16(slot16(TXRX_TA_TX0, id), tx.time_after);
    }
    if tx.bit_flip {
        bus.or8(txconf, TXCONF_BF);
    } else {
        bus.and8(txconf, !TXCONF_BF);
    }
}

/// Routes `id` to the branch(es) of `driver` and returns the drive mode that applies.
fn select_branch<B: PhyBus>(bus: &mut B, id: u8, driver: Driver, cfg: &PhyConfig) -> DriverMode {
    let shift = slot_field_shift(id);
    match driver {
        Driver::Driver1 | Driver::Driver2 => {
            bus.and8(TXCONF_SELBRANCH, !(SLOT_FIELD_MASK << shift));
            bus.or8(TXCONF_SELBRANCH, (driver as u8) << shift);
        }
        // Both branches are added to whatever is selected already.
        Driver::Both => bus.or8(TXCONF_SELBRANCH, SLOT_FIELD_MASK << shift),
    }
    match driver {
        Driver::Driver2 => cfg.driver2_mode,
        Driver::Driver1 | Driver::Both => cfg.driver1_mode,
    }
}

fn write_soft_times<B: PhyBus>(bus: &mut B, cfg: &PhyConfig, mode: DriverMode) {
    let ef = usize::from(
        usize::from(cfg.channel)
            .checked_sub(1)
            .and_then(|idx| EMIT_FREQ_TABLE.get(idx))
            .copied()
            .unwrap_or(EMIT_FREQ_EF10),
    );
    bus.write16(SOFT_STOP_TIMEH, SOFT_STOP_TIME[ef]);
    bus.write16(SOFT_TIME_X1_H, SOFT_TIME_X1[ef]);
    bus.write16(SOFT_TIME_X2_H, SOFT_TIME_X2[ef]);
    if mode == DriverMode::External {
        bus.write8(SOFT_TIME_Y1, consts::SOFT_TIME_Y1[ef]);
        bus.write8(SOFT_TIME_Y2, consts::SOFT_TIME_Y2[ef]);
    }
}
