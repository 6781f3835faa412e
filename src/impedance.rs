//! Transmit impedance adaptation.
//!
//! After every successful emission the modem reports the RMS level it measured on the
//! line. [`ImpedanceController`] compares it with the four load thresholds of the active
//! channel and moves between [`Impedance`] states. The state picks the attenuation pair,
//! bit flipping, peak cut and the emitter branch used for the *next* frame.
//!
//! ```text
//!            th2 < rms < th1                      (peak cut off)
//!   High ───────────────────▶ VeryLow
//!    │  ▲                       ▲
//!    │  │ rms > th3             │ rms < th4
//!    │  └──────── Low ──────────┘
//!    └─ rms < th2 ──▶
//!
//!            th2 < rms < th1                      (peak cut on)
//!   High ───────────────────▶ VeryLow ── rms > th3 ──▶ High
//!    │                          ▲
//!    └─ rms < th2 ─▶ LowPeakCut ┘ rms < th4
//! ```

use crate::codec::Scheme;
use crate::config::{ChannelProfile, Driver, PhyConfig};

/// Line load classes.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Impedance {
    /// High impedance (light load).
    #[default]
    High = 0,
    /// Low impedance.
    Low = 1,
    /// Very low impedance (heavy load).
    VeryLow = 2,
    /// Low impedance with peak cut.
    LowPeakCut = 3,
}

impl Impedance {
    /// Looks a state up by its numeric code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::High),
            1 => Some(Self::Low),
            2 => Some(Self::VeryLow),
            3 => Some(Self::LowPeakCut),
            _ => None,
        }
    }
}

/// Per-frame emission settings derived from the impedance state.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct TxProfile {
    /// Chirp amplitude.
    pub chirp_amp: u8,
    /// Signal amplitude.
    pub signal_amp: u8,
    /// Bit flipping enabled.
    pub bit_flip: bool,
    /// Peak cut enabled.
    pub peak_cut: bool,
    /// Emitter branch.
    pub driver: Driver,
    /// TXRX guard before emitting.
    pub time_before: u16,
    /// TXRX guard after emitting.
    pub time_after: u16,
}

/// Impedance state machine of the active channel.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct ImpedanceController {
    state: Impedance,
    profile: ChannelProfile,
}

impl ImpedanceController {
    /// Starts in `state` with the attenuation and thresholds of `profile`.
    pub fn new(state: Impedance, profile: ChannelProfile) -> Self {
        Self { state, profile }
    }

    /// Current state.
    pub fn state(&self) -> Impedance {
        self.state
    }

    /// Forces the state.
    pub fn set_state(&mut self, state: Impedance) {
        self.state = state;
    }

    /// Profile of the active channel.
    pub fn profile(&self) -> &ChannelProfile {
        &self.profile
    }

    /// Switches to another channel's profile. The state is kept.
    pub fn load_channel(&mut self, profile: ChannelProfile) {
        self.profile = profile;
    }

    /// Feeds the RMS measured after a successful emission.
    ///
    /// Returns the new state when it changed.
    pub fn on_success(&mut self, rms: u16, peak_cut_mode: bool) -> Option<Impedance> {
        let [th1, th2, th3, th4] = self.profile.thresholds;
        let low = if peak_cut_mode {
            Impedance::LowPeakCut
        } else {
            Impedance::Low
        };

        let next = match (self.state, peak_cut_mode) {
            (Impedance::High, _) => {
                if rms < th1 && rms > th2 {
                    Impedance::VeryLow
                } else if rms < th2 {
                    low
                } else {
                    Impedance::High
                }
            }
            (Impedance::Low, false) => {
                let mut next = Impedance::Low;
                if rms > th3 {
                    next = Impedance::High;
                }
                if rms < th4 {
                    next = Impedance::VeryLow;
                }
                next
            }
            (Impedance::LowPeakCut, true) if rms < th4 => Impedance::VeryLow,
            (Impedance::VeryLow, true) if rms > th3 => Impedance::High,
            (state, _) => state,
        };

        if next == self.state {
            return None;
        }
        debug!("impedance {:?} -> {:?} (rms {})", self.state, next, rms);
        self.state = next;
        Some(next)
    }

    /// Emission settings for the next frame sent with `scheme`.
    pub fn tx_profile(&self, scheme: Scheme, cfg: &PhyConfig) -> TxProfile {
        let p = &self.profile;
        let peak_cut = scheme.peak_cut_allowed();
        match self.state {
            Impedance::High => TxProfile {
                chirp_amp: p.chirp_high_z,
                signal_amp: p.signal_high_z,
                bit_flip: false,
                peak_cut: false,
                driver: cfg.high_z_driver,
                time_before: cfg.time_before_tx_high_z,
                time_after: cfg.time_after_tx_high_z,
            },
            Impedance::Low => TxProfile {
                chirp_amp: p.chirp_low_z,
                signal_amp: p.signal_low_z,
                bit_flip: true,
                peak_cut: false,
                driver: cfg.low_z_driver,
                time_before: cfg.time_before_tx_low_z,
                time_after: cfg.time_after_tx_low_z,
            },
            Impedance::LowPeakCut => TxProfile {
                chirp_amp: p.chirp_low_z,
                signal_amp: p.signal_low_z,
                bit_flip: true,
                peak_cut,
                driver: cfg.vlow_z_driver,
                time_before: cfg.time_before_tx_low_z,
                time_after: cfg.time_after_tx_low_z,
            },
            Impedance::VeryLow => TxProfile {
                chirp_amp: p.chirp_vlow_z,
                signal_amp: p.signal_vlow_z,
                bit_flip: true,
                peak_cut,
                driver: cfg.vlow_z_driver,
                time_before: cfg.time_before_tx_low_z,
                time_after: cfg.time_after_tx_low_z,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(state: Impedance) -> ImpedanceController {
        let profile = ChannelProfile {
            chirp_high_z: 0xC0,
            signal_high_z: 0xE0,
            chirp_low_z: 0xA0,
            signal_low_z: 0xA1,
            chirp_vlow_z: 0xF0,
            signal_vlow_z: 0xF1,
            thresholds: [8000, 4000, 9000, 2000],
        };
        ImpedanceController::new(state, profile)
    }

    #[test]
    fn test_high_entry_rules() {
        let mut c = controller(Impedance::High);
        assert_eq!(c.on_success(8000, false), None);
        assert_eq!(c.on_success(4000, false), None);
        assert_eq!(c.on_success(5000, false), Some(Impedance::VeryLow));

        let mut c = controller(Impedance::High);
        assert_eq!(c.on_success(3999, false), Some(Impedance::Low));

        let mut c = controller(Impedance::High);
        assert_eq!(c.on_success(3999, true), Some(Impedance::LowPeakCut));
    }

    #[test]
    fn test_below_threshold2_lands_in_low_after_one_step() {
        for peak_cut in [false, true] {
            let mut c = controller(Impedance::High);
            let _ = c.on_success(100, peak_cut);
            let expected = if peak_cut {
                Impedance::LowPeakCut
            } else {
                Impedance::Low
            };
            assert_eq!(c.state(), expected);
        }
    }

    #[test]
    fn test_low_state_rules() {
        let mut c = controller(Impedance::Low);
        assert_eq!(c.on_success(9001, false), Some(Impedance::High));

        let mut c = controller(Impedance::Low);
        assert_eq!(c.on_success(1999, false), Some(Impedance::VeryLow));

        let mut c = controller(Impedance::Low);
        assert_eq!(c.on_success(5000, false), None);
    }

    #[test]
    fn test_very_low_is_terminal_without_peak_cut() {
        let mut c = controller(Impedance::VeryLow);
        for rms in [0, 1999, 5000, 9001, u16::MAX] {
            assert_eq!(c.on_success(rms, false), None);
        }
        assert_eq!(c.state(), Impedance::VeryLow);
    }

    #[test]
    fn test_peak_cut_cycle() {
        let mut c = controller(Impedance::LowPeakCut);
        assert_eq!(c.on_success(2000, true), None);
        assert_eq!(c.on_success(1999, true), Some(Impedance::VeryLow));
        assert_eq!(c.on_success(9000, true), None);
        assert_eq!(c.on_success(9001, true), Some(Impedance::High));
    }

    #[test]
    fn test_high_holds_above_threshold_one() {
        let mut c = controller(Impedance::High);
        let th1 = c.profile().thresholds[0];
        assert_eq!(c.on_success(th1 + 1, false), None);
        assert_eq!(c.on_success(th1, false), None);
        assert_eq!(c.state(), Impedance::High);
    }

    #[test]
    fn test_high_to_very_low_then_stays() {
        let mut c = controller(Impedance::High);
        let [th1, th2, _, th4] = c.profile().thresholds;
        let _ = c.on_success(th1 - 1, false);
        assert_eq!(c.state(), Impedance::VeryLow);
        let _ = c.on_success(th2 - 1, false);
        assert_eq!(c.state(), Impedance::VeryLow);
        let _ = c.on_success(th4 - 1, false);
        assert_eq!(c.state(), Impedance::VeryLow);
    }

    #[test]
    fn test_load_channel_keeps_state() {
        let mut c = controller(Impedance::Low);
        c.load_channel(ChannelProfile::default());
        assert_eq!(c.state(), Impedance::Low);
        assert_eq!(c.profile(), &ChannelProfile::default());
    }

    #[test]
    fn test_tx_profile_per_state() {
        let cfg = PhyConfig::default();

        let high = controller(Impedance::High).tx_profile(Scheme::DbpskVtb, &cfg);
        assert_eq!((high.chirp_amp, high.signal_amp), (0xC0, 0xE0));
        assert!(!high.bit_flip && !high.peak_cut);
        assert_eq!(high.driver, cfg.high_z_driver);

        let low = controller(Impedance::Low).tx_profile(Scheme::DbpskVtb, &cfg);
        assert!(low.bit_flip && !low.peak_cut);
        assert_eq!(low.driver, cfg.low_z_driver);

        let pk = controller(Impedance::LowPeakCut).tx_profile(Scheme::DbpskVtb, &cfg);
        assert_eq!((pk.chirp_amp, pk.signal_amp), (0xA0, 0xA1));
        assert!(pk.peak_cut);
        assert_eq!(pk.driver, cfg.vlow_z_driver);

        let vlow = controller(Impedance::VeryLow).tx_profile(Scheme::Dbpsk, &cfg);
        assert_eq!((vlow.chirp_amp, vlow.signal_amp), (0xF0, 0xF1));
        assert!(vlow.bit_flip && !vlow.peak_cut);
        assert_eq!(vlow.time_before, cfg.time_before_tx_low_z);
    }
}
