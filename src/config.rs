//! Engine configuration.
//!
//! [`PhyConfig`] holds everything the engine needs to know about the board it runs on:
//! how the two emitter branches are wired, which branch drives each impedance state, the
//! guard times around an emission and, per channel, the attenuation pairs and RMS
//! thresholds used by the impedance controller.
//!
//! Ready-made configurations for the Atmel coupling boards come from
//! [`PhyConfig::for_board`]. The rest of this module maps the numeric parameter identifiers
//! used by host tooling onto typed fields ([`ParamId`]).

use crate::consts::PHY_NUM_CHANNELS;
use crate::error::ConfigError;
use crate::impedance::Impedance;

/// How an emitter branch is driven.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum DriverMode {
    /// The modem's own output stage.
    #[default]
    Internal = 1,
    /// External transistors switched by the modem.
    External = 2,
}

impl DriverMode {
    /// Looks a mode up by its numeric code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Internal),
            2 => Some(Self::External),
            _ => None,
        }
    }
}

/// Emitter branch selection.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Driver {
    /// Branch 1.
    #[default]
    Driver1 = 1,
    /// Branch 2.
    Driver2 = 2,
    /// Both branches at once.
    Both = 3,
}

impl Driver {
    /// Looks a driver up by its numeric code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Driver1),
            2 => Some(Self::Driver2),
            3 => Some(Self::Both),
            _ => None,
        }
    }
}

/// Level of the TXRX pin of a branch while emitting.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Polarity {
    /// Low while transmitting, high while receiving.
    #[default]
    Tx0Rx1 = 0,
    /// High while transmitting, low while receiving.
    Tx1Rx0 = 1,
}

impl Polarity {
    /// Looks a polarity up by its numeric code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Tx0Rx1),
            1 => Some(Self::Tx1Rx0),
            _ => None,
        }
    }
}

/// Attenuation pairs and load thresholds of one channel.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct ChannelProfile {
    /// Chirp amplitude in high impedance.
    pub chirp_high_z: u8,
    /// Signal amplitude in high impedance.
    pub signal_high_z: u8,
    /// Chirp amplitude in low impedance.
    pub chirp_low_z: u8,
    /// Signal amplitude in low impedance.
    pub signal_low_z: u8,
    /// Chirp amplitude in very low impedance.
    pub chirp_vlow_z: u8,
    /// Signal amplitude in very low impedance.
    pub signal_vlow_z: u8,
    /// RMS thresholds 1 to 4 used to classify the line load.
    pub thresholds: [u16; 4],
}

impl ChannelProfile {
    const fn new(att: [u8; 6], thresholds: [u16; 4]) -> Self {
        Self {
            chirp_high_z: att[0],
            signal_high_z: att[1],
            chirp_low_z: att[2],
            signal_low_z: att[3],
            chirp_vlow_z: att[4],
            signal_vlow_z: att[5],
            thresholds,
        }
    }
}

/// Atmel coupling boards with a known configuration.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum CouplingBoard {
    /// ATPLCOUP000 v1, CENELEC-A, two external branches.
    #[default]
    Atplcoup000V1 = 0x01,
    /// ATPLCOUP000 v2.
    Atplcoup000V2 = 0x02,
    /// ATPLCOUP001 v1, single external branch.
    Atplcoup001V1 = 0x11,
    /// ATPLCOUP002 v1, FCC band.
    Atplcoup002V1 = 0x21,
    /// ATPLCOUP002 v2, FCC band.
    Atplcoup002V2 = 0x22,
    /// ATPLCOUP003 v1.
    Atplcoup003V1 = 0x31,
    /// ATPLCOUP004 v1.
    Atplcoup004V1 = 0x41,
    /// ATPLCOUP005 v1.
    Atplcoup005V1 = 0x51,
    /// ATPLCOUP006 v1, multi-channel.
    Atplcoup006V1 = 0x61,
}

impl CouplingBoard {
    /// Looks a board up by its numeric code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::Atplcoup000V1),
            0x02 => Some(Self::Atplcoup000V2),
            0x11 => Some(Self::Atplcoup001V1),
            0x21 => Some(Self::Atplcoup002V1),
            0x22 => Some(Self::Atplcoup002V2),
            0x31 => Some(Self::Atplcoup003V1),
            0x41 => Some(Self::Atplcoup004V1),
            0x51 => Some(Self::Atplcoup005V1),
            0x61 => Some(Self::Atplcoup006V1),
            _ => None,
        }
    }

    /// Numeric board code.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Everything the engine is configured with.
///
/// Owned by [`Phy`](crate::phy::Phy); changes made through
/// [`Phy::set_param`](crate::phy::Phy::set_param) are pushed to the modem as needed.
#[derive(PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct PhyConfig {
    /// Branch 1 driver mode.
    pub driver1_mode: DriverMode,
    /// Branch 2 driver mode.
    pub driver2_mode: DriverMode,
    /// Branch 1 TXRX polarity.
    pub txrx1_polarity: Polarity,
    /// Branch 2 TXRX polarity.
    pub txrx2_polarity: Polarity,
    /// Adapt the impedance state from the RMS measured after each emission.
    pub auto_detect_impedance: bool,
    /// Impedance state after a hard reset.
    pub impedance: Impedance,
    /// Branch used in high impedance.
    pub high_z_driver: Driver,
    /// Branch used in low impedance.
    pub low_z_driver: Driver,
    /// Branch used in very low impedance.
    pub vlow_z_driver: Driver,
    /// RSSI offsets of AGC steps 0 to 3.
    pub agc_krssi: [u8; 4],
    /// Branch 1 N transistor delay.
    pub n1_delay: u8,
    /// Branch 1 P transistor delay.
    pub p1_delay: u8,
    /// Branch 2 N transistor delay.
    pub n2_delay: u8,
    /// Branch 2 P transistor delay.
    pub p2_delay: u8,
    /// Emitter 1 to 4 active masks.
    pub emit_active: [u8; 4],
    /// Active channel, `1..=8`.
    pub channel: u8,
    /// Board this configuration was built for.
    pub coupling_board: CouplingBoard,
    /// PRIME mode flag kept for host tooling.
    pub prime_mode: u8,
    /// TXRX guard before emitting in high impedance (10 µs units).
    pub time_before_tx_high_z: u16,
    /// TXRX guard before emitting in low impedance (10 µs units).
    pub time_before_tx_low_z: u16,
    /// TXRX guard after emitting in high impedance (10 µs units).
    pub time_after_tx_high_z: u16,
    /// TXRX guard after emitting in low impedance (10 µs units).
    pub time_after_tx_low_z: u16,
    /// Autocorrelation filter threshold.
    pub rx_corr_threshold: u16,
    /// Use the low-with-peak-cut state instead of low impedance.
    pub enable_vlow_peak_cut: bool,
    /// Global attenuation parameter kept for host tooling.
    pub global_attenuation: u8,
    /// Per-channel attenuation and thresholds, channel 1 first.
    pub channels: [ChannelProfile; PHY_NUM_CHANNELS],
}

impl Default for PhyConfig {
    fn default() -> Self {
        Self::for_board(CouplingBoard::default())
    }
}

impl PhyConfig {
    /// Values shared by every board before its own settings are applied.
    const fn base(board: CouplingBoard) -> Self {
        Self {
            driver1_mode: DriverMode::Internal,
            driver2_mode: DriverMode::Internal,
            txrx1_polarity: Polarity::Tx0Rx1,
            txrx2_polarity: Polarity::Tx0Rx1,
            auto_detect_impedance: true,
            impedance: Impedance::High,
            high_z_driver: Driver::Driver1,
            low_z_driver: Driver::Driver1,
            vlow_z_driver: Driver::Driver1,
            agc_krssi: [0x0B, 0x16, 0x23, 0x29],
            n1_delay: 0,
            p1_delay: 0,
            n2_delay: 0,
            p2_delay: 0,
            emit_active: [0; 4],
            channel: 1,
            coupling_board: board,
            prime_mode: 0,
            time_before_tx_high_z: 10,
            time_before_tx_low_z: 10,
            time_after_tx_high_z: 10,
            time_after_tx_low_z: 10,
            rx_corr_threshold: 0x200,
            enable_vlow_peak_cut: false,
            global_attenuation: 0xFF,
            channels: [ChannelProfile::new([0; 6], [0; 4]); PHY_NUM_CHANNELS],
        }
    }

    /// Configuration recommended for `board`.
    pub fn for_board(board: CouplingBoard) -> Self {
        use CouplingBoard::*;

        let mut cfg = Self::base(board);

        // Branch wiring.
        cfg.driver1_mode = DriverMode::External;
        cfg.n1_delay = 0x21;
        cfg.p1_delay = 0x20;
        cfg.emit_active = [0x77; 4];
        match board {
            Atplcoup001V1 => {
                cfg.emit_active = [0x77, 0x77, 0, 0];
            }
            Atplcoup002V1 => {
                cfg.emit_active = [0x77, 0x77, 0x33, 0x33];
            }
            Atplcoup002V2 => {
                cfg.n2_delay = 0x21;
                cfg.p2_delay = 0x20;
            }
            Atplcoup006V1 => {
                cfg.driver2_mode = DriverMode::External;
                cfg.n2_delay = 0x10;
                cfg.p2_delay = 0x10;
            }
            _ => {
                cfg.driver2_mode = DriverMode::External;
                cfg.n2_delay = 0x21;
                cfg.p2_delay = 0x20;
            }
        }

        cfg.high_z_driver = match board {
            Atplcoup001V1 | Atplcoup004V1 | Atplcoup005V1 => Driver::Driver1,
            _ => Driver::Driver2,
        };
        cfg.enable_vlow_peak_cut = matches!(board, Atplcoup000V1 | Atplcoup000V2);
        cfg.channel = match board {
            Atplcoup002V1 | Atplcoup002V2 => 4,
            Atplcoup005V1 => 2,
            Atplcoup006V1 => 3,
            _ => 1,
        };

        let fcc = |th1_ch7: u16, vlow: [u8; 3]| {
            let att = |vlow_signal: u8| [0x38, 0x38, 0x60, 0xA0, 0xFF, vlow_signal];
            [
                (4, ChannelProfile::new(att(0xFF), [1477, 448, 7000, 3900])),
                (5, ChannelProfile::new(att(vlow[0]), [1417, 448, 5250, 3700])),
                (6, ChannelProfile::new(att(vlow[1]), [1417, 448, 4900, 3700])),
                (7, ChannelProfile::new(att(vlow[2]), [th1_ch7, 448, 5100, 3700])),
            ]
        };

        match board {
            Atplcoup000V1 | Atplcoup000V2 => {
                cfg.set_profile(
                    1,
                    ChannelProfile::new(
                        [0xC0, 0xE0, 0xA0, 0xA0, 0xFF, 0xFF],
                        [12000, 12000, 20500, 13000],
                    ),
                );
            }
            Atplcoup001V1 | Atplcoup004V1 => {
                cfg.set_profile(
                    1,
                    ChannelProfile::new([0x5A, 0x78, 0xFF, 0xFF, 0xFF, 0xFF], [8000, 0, 0, 0]),
                );
            }
            Atplcoup002V1 => {
                for (ch, profile) in fcc(1417, [0xFF; 3]) {
                    cfg.set_profile(ch, profile);
                }
            }
            Atplcoup002V2 => {
                for (ch, mut profile) in fcc(1300, [0x00, 0x00, 0x90]) {
                    if ch == 7 {
                        profile.chirp_vlow_z = 0x90;
                    }
                    cfg.set_profile(ch, profile);
                }
            }
            Atplcoup003V1 => {
                cfg.set_profile(
                    1,
                    ChannelProfile::new([0xC0, 0xE0, 0xFF, 0xFF, 0xFF, 0xFF], [12000, 0, 0, 0]),
                );
            }
            Atplcoup005V1 => {
                cfg.set_profile(2, ChannelProfile::new([0xFF; 6], [600, 270, 1475, 1100]));
            }
            Atplcoup006V1 => {
                let att = |vlow_signal: u8| [0x70, 0x70, 0xFF, 0xFF, 0xFF, vlow_signal];
                let wide = [600, 270, 1475, 1100];
                cfg.set_profile(3, ChannelProfile::new(att(0xFF), wide));
                cfg.set_profile(4, ChannelProfile::new(att(0xFF), [1477, 448, 7000, 3900]));
                cfg.set_profile(5, ChannelProfile::new(att(0x00), [1417, 448, 5250, 3700]));
                cfg.set_profile(6, ChannelProfile::new(att(0xFF), [1417, 448, 4900, 3700]));
                cfg.set_profile(7, ChannelProfile::new(att(0xFF), [1300, 448, 5100, 3700]));
                cfg.set_profile(8, ChannelProfile::new(att(0xFF), wide));
            }
        }

        cfg
    }

    fn set_profile(&mut self, channel: u8, profile: ChannelProfile) {
        if let Some(slot) = self.channels.get_mut(usize::from(channel).wrapping_sub(1)) {
            *slot = profile;
        }
    }

    /// Profile of `channel` (`1..=8`).
    ///
    /// # Errors
    /// [`ConfigError::InvalidChannel`] outside `1..=8`.
    pub fn profile(&self, channel: u8) -> Result<&ChannelProfile, ConfigError> {
        usize::from(channel)
            .checked_sub(1)
            .and_then(|idx| self.channels.get(idx))
            .ok_or(ConfigError::InvalidChannel)
    }

    /// Reads a configuration block field.
    ///
    /// [`ConfigParam::Impedance`] reports the configured default; the engine answers it
    /// with the live state instead.
    pub fn get(&self, param: ConfigParam) -> ParamValue {
        use ConfigParam as P;
        match param {
            P::Driver1Mode => ParamValue::U8(self.driver1_mode as u8),
            P::Driver2Mode => ParamValue::U8(self.driver2_mode as u8),
            P::Txrx1Polarity => ParamValue::U8(self.txrx1_polarity as u8),
            P::Txrx2Polarity => ParamValue::U8(self.txrx2_polarity as u8),
            P::AutoDetectImpedance => ParamValue::U8(u8::from(self.auto_detect_impedance)),
            P::Impedance => ParamValue::U8(self.impedance as u8),
            P::HighZDriver => ParamValue::U8(self.high_z_driver as u8),
            P::LowZDriver => ParamValue::U8(self.low_z_driver as u8),
            P::VlowZDriver => ParamValue::U8(self.vlow_z_driver as u8),
            P::Agc0Krssi => ParamValue::U8(self.agc_krssi[0]),
            P::Agc1Krssi => ParamValue::U8(self.agc_krssi[1]),
            P::Agc2Krssi => ParamValue::U8(self.agc_krssi[2]),
            P::Agc3Krssi => ParamValue::U8(self.agc_krssi[3]),
            P::N1Delay => ParamValue::U8(self.n1_delay),
            P::P1Delay => ParamValue::U8(self.p1_delay),
            P::N2Delay => ParamValue::U8(self.n2_delay),
            P::P2Delay => ParamValue::U8(self.p2_delay),
            P::Emit1Active => ParamValue::U8(self.emit_active[0]),
            P::Emit2Active => ParamValue::U8(self.emit_active[1]),
            P::Emit3Active => ParamValue::U8(self.emit_active[2]),
            P::Emit4Active => ParamValue::U8(self.emit_active[3]),
            P::Channel => ParamValue::U8(self.channel),
            P::CouplingBoard => ParamValue::U8(self.coupling_board.code()),
            P::PrimeMode => ParamValue::U8(self.prime_mode),
            P::TimeBeforeTxHighZ => ParamValue::U16(self.time_before_tx_high_z),
            P::TimeBeforeTxLowZ => ParamValue::U16(self.time_before_tx_low_z),
            P::TimeAfterTxHighZ => ParamValue::U16(self.time_after_tx_high_z),
            P::TimeAfterTxLowZ => ParamValue::U16(self.time_after_tx_low_z),
            P::RxCorrThreshold => ParamValue::U16(self.rx_corr_threshold),
            P::EnableVlowPeakCut => ParamValue::U8(u8::from(self.enable_vlow_peak_cut)),
        }
    }

    /// Writes a configuration block field.
    ///
    /// Only the stored value changes; pushing it to the modem is up to the engine.
    ///
    /// # Errors
    /// * [`ConfigError::InvalidInput`] for a value of the wrong width or an unknown code.
    /// * [`ConfigError::InvalidChannel`] for a channel outside `1..=8`.
    pub fn set(&mut self, param: ConfigParam, value: ParamValue) -> Result<(), ConfigError> {
        use ConfigParam as P;
        let code = || value.as_u8();
        let bad = ConfigError::InvalidInput;
        match param {
            P::Driver1Mode => self.driver1_mode = DriverMode::from_code(code()?).ok_or(bad)?,
            P::Driver2Mode => self.driver2_mode = DriverMode::from_code(code()?).ok_or(bad)?,
            P::Txrx1Polarity => self.txrx1_polarity = Polarity::from_code(code()?).ok_or(bad)?,
            P::Txrx2Polarity => self.txrx2_polarity = Polarity::from_code(code()?).ok_or(bad)?,
            P::AutoDetectImpedance => self.auto_detect_impedance = code()? != 0,
            P::Impedance => {
                self.impedance = Impedance::from_code(code()?).ok_or(bad)?
            }
            P::HighZDriver => self.high_z_driver = Driver::from_code(code()?).ok_or(bad)?,
            P::LowZDriver => self.low_z_driver = Driver::from_code(code()?).ok_or(bad)?,
            P::VlowZDriver => self.vlow_z_driver = Driver::from_code(code()?).ok_or(bad)?,
            P::Agc0Krssi => self.agc_krssi[0] = code()?,
            P::Agc1Krssi => self.agc_krssi[1] = code()?,
            P::Agc2Krssi => self.agc_krssi[2] = code()?,
            P::Agc3Krssi => self.agc_krssi[3] = code()?,
            P::N1Delay => self.n1_delay = code()?,
            P::P1Delay => self.p1_delay = code()?,
            P::N2Delay => self.n2_delay = code()?,
            P::P2Delay => self.p2_delay = code()?,
            P::Emit1Active => self.emit_active[0] = code()?,
            P::Emit2Active => self.emit_active[1] = code()?,
            P::Emit3Active => self.emit_active[2] = code()?,
            P::Emit4Active => self.emit_active[3] = code()?,
            P::Channel => {
                let channel = code()?;
                let _ = self.profile(channel)?;
                self.channel = channel;
            }
            P::CouplingBoard => {
                self.coupling_board = CouplingBoard::from_code(code()?).ok_or(bad)?
            }
            P::PrimeMode => self.prime_mode = code()?,
            P::TimeBeforeTxHighZ => self.time_before_tx_high_z = value.as_u16()?,
            P::TimeBeforeTxLowZ => self.time_before_tx_low_z = value.as_u16()?,
            P::TimeAfterTxHighZ => self.time_after_tx_high_z = value.as_u16()?,
            P::TimeAfterTxLowZ => self.time_after_tx_low_z = value.as_u16()?,
            P::RxCorrThreshold => self.rx_corr_threshold = value.as_u16()?,
            P::EnableVlowPeakCut => self.enable_vlow_peak_cut = code()? != 0,
        }
        Ok(())
    }

    /// Reads an attenuation block field.
    ///
    /// # Errors
    /// [`ConfigError::InvalidChannel`] for a channel outside `1..=8`.
    pub fn get_attenuation(&self, param: AttenuationParam) -> Result<ParamValue, ConfigError> {
        let (channel, field) = match param {
            AttenuationParam::Global => return Ok(ParamValue::U8(self.global_attenuation)),
            AttenuationParam::Channel { channel, field } => (channel, field),
        };
        let p = self.profile(channel)?;
        Ok(match field {
            ChannelField::ChirpHighZ => ParamValue::U8(p.chirp_high_z),
            ChannelField::SignalHighZ => ParamValue::U8(p.signal_high_z),
            ChannelField::ChirpLowZ => ParamValue::U8(p.chirp_low_z),
            ChannelField::SignalLowZ => ParamValue::U8(p.signal_low_z),
            ChannelField::ChirpVlowZ => ParamValue::U8(p.chirp_vlow_z),
            ChannelField::SignalVlowZ => ParamValue::U8(p.signal_vlow_z),
            ChannelField::Threshold(n) => ParamValue::U16(
                *p.thresholds
                    .get(usize::from(n))
                    .ok_or(ConfigError::InvalidInput)?,
            ),
        })
    }

    /// Writes an attenuation block field.
    ///
    /// # Errors
    /// * [`ConfigError::InvalidInput`] for a value of the wrong width.
    /// * [`ConfigError::InvalidChannel`] for a channel outside `1..=8`.
    pub fn set_attenuation(
        &mut self,
        param: AttenuationParam,
        value: ParamValue,
    ) -> Result<(), ConfigError> {
        let (channel, field) = match param {
            AttenuationParam::Global => {
                self.global_attenuation = value.as_u8()?;
                return Ok(());
            }
            AttenuationParam::Channel { channel, field } => (channel, field),
        };
        let p = usize::from(channel)
            .checked_sub(1)
            .and_then(|idx| self.channels.get_mut(idx))
            .ok_or(ConfigError::InvalidChannel)?;
        match field {
            ChannelField::ChirpHighZ => p.chirp_high_z = value.as_u8()?,
            ChannelField::SignalHighZ => p.signal_high_z = value.as_u8()?,
            ChannelField::ChirpLowZ => p.chirp_low_z = value.as_u8()?,
            ChannelField::SignalLowZ => p.signal_low_z = value.as_u8()?,
            ChannelField::ChirpVlowZ => p.chirp_vlow_z = value.as_u8()?,
            ChannelField::SignalVlowZ => p.signal_vlow_z = value.as_u8()?,
            ChannelField::Threshold(n) => {
                *p.thresholds
                    .get_mut(usize::from(n))
                    .ok_or(ConfigError::InvalidInput)? = value.as_u16()?
            }
        }
        Ok(())
    }
}

/// A typed parameter value.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ParamValue {
    /// One byte.
    U8(u8),
    /// 16-bit word.
    U16(u16),
    /// 32-bit word.
    U32(u32),
    /// Product identifier text.
    Text([u8; 10]),
}

impl ParamValue {
    /// The byte held, if this is a [`ParamValue::U8`].
    pub fn as_u8(self) -> Result<u8, ConfigError> {
        match self {
            Self::U8(v) => Ok(v),
            _ => Err(ConfigError::InvalidInput),
        }
    }

    /// The word held, if this is a [`ParamValue::U16`].
    pub fn as_u16(self) -> Result<u16, ConfigError> {
        match self {
            Self::U16(v) => Ok(v),
            _ => Err(ConfigError::InvalidInput),
        }
    }

    /// The word held, if this is a [`ParamValue::U32`].
    pub fn as_u32(self) -> Result<u32, ConfigError> {
        match self {
            Self::U32(v) => Ok(v),
            _ => Err(ConfigError::InvalidInput),
        }
    }
}

/// Bit operation applied by [`Phy::cmd_param`](crate::phy::Phy::cmd_param).
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ParamCmd {
    /// `reg &= mask`
    And = 0,
    /// `reg |= mask`
    Or = 1,
    /// `reg ^= mask`
    Xor = 2,
}

impl ParamCmd {
    /// Looks a command up by its numeric code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::And),
            1 => Some(Self::Or),
            2 => Some(Self::Xor),
            _ => None,
        }
    }
}

/// Information, last-frame and statistics parameters (`0x01xx`).
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum InfoParam {
    ProductId = 0x0100,
    Model = 0x010A,
    Version = 0x010C,
    RxBufferId = 0x0111,
    RxQrMode = 0x0112,
    RxScheme = 0x0113,
    RxHeaderReceived = 0x0114,
    RxMode = 0x0115,
    TxBufferId = 0x0117,
    TxLevel = 0x0118,
    TxScheme = 0x0119,
    TxQrMode = 0x011A,
    TxMode = 0x011B,
    TxDisableRx = 0x011C,
    RxPayloadLen = 0x011E,
    RxPayloadLenSym = 0x0120,
    TxPayloadLenSym = 0x0122,
    TxTdelay = 0x0128,
    TxTotal = 0x012C,
    TxTotalBytes = 0x0130,
    TxTotalErrors = 0x0134,
    TxBadBusyTx = 0x0138,
    TxBadBusyChannel = 0x013C,
    TxBadLen = 0x0140,
    TxBadFormat = 0x0144,
    TxTimeout = 0x0148,
    RxTotal = 0x014C,
    RxTotalBytes = 0x0150,
    RxTotalErrors = 0x0154,
    RxBadLen = 0x0158,
    RxBadCrc = 0x015C,
}

impl InfoParam {
    const ALL: [InfoParam; 31] = {
        use InfoParam::*;
        [
            ProductId,
            Model,
            Version,
            RxBufferId,
            RxQrMode,
            RxScheme,
            RxHeaderReceived,
            RxMode,
            TxBufferId,
            TxLevel,
            TxScheme,
            TxQrMode,
            TxMode,
            TxDisableRx,
            RxPayloadLen,
            RxPayloadLenSym,
            TxPayloadLenSym,
            TxTdelay,
            TxTotal,
            TxTotalBytes,
            TxTotalErrors,
            TxBadBusyTx,
            TxBadBusyChannel,
            TxBadLen,
            TxBadFormat,
            TxTimeout,
            RxTotal,
            RxTotalBytes,
            RxTotalErrors,
            RxBadLen,
            RxBadCrc,
        ]
    };

    fn from_id(id: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|p| *p as u16 == id)
    }
}

/// Configuration block parameters (`0x04xx`).
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum ConfigParam {
    Driver1Mode = 0x0400,
    Driver2Mode = 0x0401,
    Txrx1Polarity = 0x0402,
    Txrx2Polarity = 0x0403,
    AutoDetectImpedance = 0x0404,
    Impedance = 0x0405,
    HighZDriver = 0x0406,
    LowZDriver = 0x0407,
    VlowZDriver = 0x0408,
    Agc0Krssi = 0x0409,
    Agc1Krssi = 0x040A,
    Agc2Krssi = 0x040B,
    Agc3Krssi = 0x040C,
    N1Delay = 0x040D,
    P1Delay = 0x040E,
    N2Delay = 0x040F,
    P2Delay = 0x0410,
    Emit1Active = 0x0411,
    Emit2Active = 0x0412,
    Emit3Active = 0x0413,
    Emit4Active = 0x0414,
    Channel = 0x0415,
    CouplingBoard = 0x0416,
    PrimeMode = 0x0417,
    TimeBeforeTxHighZ = 0x0418,
    TimeBeforeTxLowZ = 0x041A,
    TimeAfterTxHighZ = 0x041C,
    TimeAfterTxLowZ = 0x041E,
    RxCorrThreshold = 0x0420,
    EnableVlowPeakCut = 0x0422,
}

impl ConfigParam {
    const ALL: [ConfigParam; 30] = {
        use ConfigParam::*;
        [
            Driver1Mode,
            Driver2Mode,
            Txrx1Polarity,
            Txrx2Polarity,
            AutoDetectImpedance,
            Impedance,
            HighZDriver,
            LowZDriver,
            VlowZDriver,
            Agc0Krssi,
            Agc1Krssi,
            Agc2Krssi,
            Agc3Krssi,
            N1Delay,
            P1Delay,
            N2Delay,
            P2Delay,
            Emit1Active,
            Emit2Active,
            Emit3Active,
            Emit4Active,
            Channel,
            CouplingBoard,
            PrimeMode,
            TimeBeforeTxHighZ,
            TimeBeforeTxLowZ,
            TimeAfterTxHighZ,
            TimeAfterTxLowZ,
            RxCorrThreshold,
            EnableVlowPeakCut,
        ]
    };

    fn from_id(id: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|p| *p as u16 == id)
    }
}

/// Field of a [`ChannelProfile`].
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum ChannelField {
    ChirpHighZ,
    SignalHighZ,
    ChirpLowZ,
    SignalLowZ,
    ChirpVlowZ,
    SignalVlowZ,
    /// Threshold index `0..4`.
    Threshold(u8),
}

impl ChannelField {
    const fn offset(self) -> u16 {
        match self {
            Self::ChirpHighZ => 0,
            Self::SignalHighZ => 1,
            Self::ChirpLowZ => 2,
            Self::SignalLowZ => 3,
            Self::ChirpVlowZ => 4,
            Self::SignalVlowZ => 5,
            Self::Threshold(n) => 6 + 2 * n as u16,
        }
    }

    const fn from_offset(offset: u16) -> Option<Self> {
        match offset {
            0 => Some(Self::ChirpHighZ),
            1 => Some(Self::SignalHighZ),
            2 => Some(Self::ChirpLowZ),
            3 => Some(Self::SignalLowZ),
            4 => Some(Self::ChirpVlowZ),
            5 => Some(Self::SignalVlowZ),
            6 | 8 | 10 | 12 => Some(Self::Threshold(((offset - 6) / 2) as u8)),
            _ => None,
        }
    }
}

/// Attenuation block parameters (`0x02xx`).
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum AttenuationParam {
    /// Global attenuation.
    Global,
    /// A field of one channel's profile.
    Channel {
        /// Channel, `1..=8`.
        channel: u8,
        /// Field within the profile.
        field: ChannelField,
    },
}

const ATT_GLOBAL_ID: u16 = 0x0200;
const ATT_CHANNEL_BASE: u16 = 0x0202;
const ATT_CHANNEL_STRIDE: u16 = 0x0E;

/// A parameter in the uniform identifier space.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ParamId {
    /// Information, last-frame info and statistics.
    Info(InfoParam),
    /// Attenuation and load thresholds.
    Attenuation(AttenuationParam),
    /// Board and driver configuration.
    Config(ConfigParam),
    /// A modem register, addressed directly.
    Register(u16),
}

impl ParamId {
    /// Classifies a numeric identifier.
    ///
    /// Identifiers with any of the top four bits set address a register directly.
    ///
    /// # Errors
    /// [`ConfigError::InvalidInput`] for identifiers that name no parameter.
    pub fn from_id(id: u16) -> Result<Self, ConfigError> {
        let param = if id & 0xF000 != 0 {
            Some(Self::Register(id))
        } else if id & 0xF200 == 0x0200 {
            Self::attenuation_from_id(id).map(Self::Attenuation)
        } else if id & 0xF400 == 0x0400 {
            ConfigParam::from_id(id).map(Self::Config)
        } else if id & 0xF100 == 0x0100 {
            InfoParam::from_id(id).map(Self::Info)
        } else {
            None
        };
        param.ok_or(ConfigError::InvalidInput)
    }

    fn attenuation_from_id(id: u16) -> Option<AttenuationParam> {
        if id == ATT_GLOBAL_ID {
            return Some(AttenuationParam::Global);
        }
        let offset = id.checked_sub(ATT_CHANNEL_BASE)?;
        let channel = offset / ATT_CHANNEL_STRIDE + 1;
        if channel > PHY_NUM_CHANNELS as u16 {
            return None;
        }
        let field = ChannelField::from_offset(offset % ATT_CHANNEL_STRIDE)?;
        Some(AttenuationParam::Channel {
            channel: channel as u8,
            field,
        })
    }

    /// Numeric identifier.
    pub fn id(self) -> u16 {
        match self {
            Self::Info(p) => p as u16,
            Self::Config(p) => p as u16,
            Self::Attenuation(AttenuationParam::Global) => ATT_GLOBAL_ID,
            Self::Attenuation(AttenuationParam::Channel { channel, field }) => {
                ATT_CHANNEL_BASE + u16::from(channel - 1) * ATT_CHANNEL_STRIDE + field.offset()
            }
            Self::Register(addr) => addr,
        }
    }
}

impl TryFrom<u16> for ParamId {
    type Error = ConfigError;

    fn try_from(id: u16) -> Result<Self, Self::Error> {
        Self::from_id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_coup000() {
        let cfg = PhyConfig::default();
        assert_eq!(cfg.coupling_board, CouplingBoard::Atplcoup000V1);
        assert_eq!(cfg.high_z_driver, Driver::Driver2);
        assert_eq!(cfg.low_z_driver, Driver::Driver1);
        assert!(cfg.enable_vlow_peak_cut);
        assert_eq!(cfg.channel, 1);
        assert_eq!(cfg.channels[0].thresholds, [12000, 12000, 20500, 13000]);
        assert_eq!(cfg.channels[1], ChannelProfile::default());
        assert_eq!(cfg.impedance, Impedance::High);
        assert_eq!(cfg.agc_krssi, [0x0B, 0x16, 0x23, 0x29]);
    }

    #[test]
    fn test_board_presets() {
        let cfg = PhyConfig::for_board(CouplingBoard::Atplcoup002V2);
        assert_eq!(cfg.channel, 4);
        assert_eq!(cfg.driver2_mode, DriverMode::Internal);
        assert_eq!(cfg.channels[4].signal_vlow_z, 0x00);
        assert_eq!(cfg.channels[6].chirp_vlow_z, 0x90);
        assert_eq!(cfg.channels[6].signal_vlow_z, 0x90);
        assert_eq!(cfg.channels[6].thresholds[0], 1300);

        let cfg = PhyConfig::for_board(CouplingBoard::Atplcoup006V1);
        assert_eq!(cfg.channel, 3);
        assert_eq!((cfg.n2_delay, cfg.p2_delay), (0x10, 0x10));
        assert_eq!(cfg.channels[7].thresholds, [600, 270, 1475, 1100]);
        assert_eq!(cfg.channels[4].signal_vlow_z, 0x00);

        let cfg = PhyConfig::for_board(CouplingBoard::Atplcoup001V1);
        assert_eq!(cfg.emit_active, [0x77, 0x77, 0, 0]);
        assert_eq!(cfg.high_z_driver, Driver::Driver1);
        assert!(!cfg.enable_vlow_peak_cut);

        for code in [0x01, 0x02, 0x11, 0x21, 0x22, 0x31, 0x41, 0x51, 0x61] {
            let board = CouplingBoard::from_code(code).unwrap();
            assert_eq!(board.code(), code);
            let cfg = PhyConfig::for_board(board);
            assert!(cfg.profile(cfg.channel).unwrap().chirp_high_z != 0);
        }
    }

    #[test]
    fn test_param_id_classification() {
        assert_eq!(ParamId::from_id(0xFE2A), Ok(ParamId::Register(0xFE2A)));
        assert_eq!(
            ParamId::from_id(0x0200),
            Ok(ParamId::Attenuation(AttenuationParam::Global))
        );
        assert_eq!(
            ParamId::from_id(0x0210),
            Ok(ParamId::Attenuation(AttenuationParam::Channel {
                channel: 2,
                field: ChannelField::ChirpHighZ,
            }))
        );
        assert_eq!(
            ParamId::from_id(0x0270),
            Ok(ParamId::Attenuation(AttenuationParam::Channel {
                channel: 8,
                field: ChannelField::Threshold(3),
            }))
        );
        assert_eq!(ParamId::from_id(0x0415), Ok(ParamId::Config(ConfigParam::Channel)));
        assert_eq!(ParamId::from_id(0x015C), Ok(ParamId::Info(InfoParam::RxBadCrc)));
        assert_eq!(ParamId::from_id(0x0009), Err(ConfigError::InvalidInput));
        assert_eq!(ParamId::from_id(0x0201), Err(ConfigError::InvalidInput));
        assert_eq!(ParamId::from_id(0x0209), Err(ConfigError::InvalidInput));
        assert_eq!(ParamId::from_id(0x0272), Err(ConfigError::InvalidInput));
        assert_eq!(ParamId::from_id(0x0419), Err(ConfigError::InvalidInput));
    }

    #[test]
    fn test_param_id_round_trips() {
        for id in 0x0000u16..0x1000 {
            if let Ok(param) = ParamId::from_id(id) {
                assert_eq!(param.id(), id);
            }
        }
    }

    #[test]
    fn test_config_set_validates() {
        let mut cfg = PhyConfig::default();
        assert_eq!(
            cfg.set(ConfigParam::Channel, ParamValue::U8(9)),
            Err(ConfigError::InvalidChannel)
        );
        assert_eq!(
            cfg.set(ConfigParam::Channel, ParamValue::U16(2)),
            Err(ConfigError::InvalidInput)
        );
        assert_eq!(
            cfg.set(ConfigParam::Driver1Mode, ParamValue::U8(0)),
            Err(ConfigError::InvalidInput)
        );
        cfg.set(ConfigParam::Channel, ParamValue::U8(2)).unwrap();
        cfg.set(ConfigParam::TimeAfterTxLowZ, ParamValue::U16(42)).unwrap();
        assert_eq!(cfg.channel, 2);
        assert_eq!(cfg.get(ConfigParam::TimeAfterTxLowZ), ParamValue::U16(42));
    }

    #[test]
    fn test_attenuation_access() {
        let mut cfg = PhyConfig::default();
        let th3 = AttenuationParam::Channel {
            channel: 1,
            field: ChannelField::Threshold(2),
        };
        assert_eq!(cfg.get_attenuation(th3), Ok(ParamValue::U16(20500)));
        cfg.set_attenuation(th3, ParamValue::U16(100)).unwrap();
        assert_eq!(cfg.channels[0].thresholds[2], 100);
        assert_eq!(
            cfg.set_attenuation(AttenuationParam::Global, ParamValue::U16(1)),
            Err(ConfigError::InvalidInput)
        );
    }
}
