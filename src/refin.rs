///! Input reference config
///! Input band check / spread spectrum pre-divider

use crate::{ config::*, errors::*, profile::* };


/// PLL input reference, validated for one operating mode
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub struct RefIn {
    /// Input frequency
    f: u32,
    /// Pre-divider dictated by the input band, 1 in integer mode
    n: u32,
    /// True in spread spectrum (fractional) mode
    fractional: bool,
}

impl RefIn {

    /// Check the input frequency against the band of the selected mode.
    ///
    /// Integer mode accepts `in_min` up to [PllProfile::in_max] for the
    /// feedback factor in use.
    /// Spread spectrum mode needs the pre-divided input in the
    /// `in_ss_min .. in_ss_max` window, so the pre-divider is fixed here.
    pub fn new(
        profile: &PllProfile,
        f: u32,
        flags: &PllFlags,
    ) -> Result<Self, PllError> {
        let fractional = flags.fractional;
        if fractional {
            (if f < profile.in_ss_min { Err(PllError::InputTooLow) } else { Ok(()) })?;

            let mid = (profile.in_ss_min + profile.in_ss_max) / 2;
            let n = (f / mid).max(1);
            (if n > profile.n_max { Err(PllError::InputTooHigh) } else { Ok(()) })?;

            Ok(RefIn { f, n, fractional })
        } else {
            (if f < profile.in_min { Err(PllError::InputTooLow) } else { Ok(()) })?;
            (if f > profile.in_max(flags.feedback_factor()) { Err(PllError::InputTooHigh) } else { Ok(()) })?;

            Ok(RefIn { f, n: 1, fractional })
        }
    }

    /// Input frequency
    pub fn f(self: &Self) -> u32 {
        self.f
    }

    /// Pre-divider required by the input band
    pub fn n(self: &Self) -> u32 {
        self.n
    }

    pub fn fractional(self: &Self) -> bool {
        self.fractional
    }

    /// Input is high enough for a GCD based pre-divider search
    pub fn can_predivide(self: &Self, profile: &PllProfile) -> bool {
        !self.fractional && self.f > profile.in_min
    }
}
