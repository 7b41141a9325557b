//! PLL hardware profiles
//!
//! Several LPC families carry the same system PLL with a different CCO window.
//! A [PllProfile] holds everything the planner and the register codec need to
//! know about one of them.

use crate::{ codec::*, constants::*, filter::* };


/// System PLL description of one chip family
#[derive(Debug,Copy,Clone)]
pub struct PllProfile {
    pub name: &'static str,
    /// CCO window
    pub cco_min: u32,
    /// See [PllProfile::cco_min]
    pub cco_max: u32,
    /// Lowest input in integer mode
    pub in_min: u32,
    /// Input window in spread spectrum mode, the pre-divider targets its middle
    pub in_ss_min: u32,
    /// See [PllProfile::in_ss_min]
    pub in_ss_max: u32,
    /// Pre-divider is only used when gcd(CCO, input) is above this
    pub gcd_min: u32,
    pub n_max: u32,
    pub p_max: u32,
    pub m_max: u32,
    /// MD_FRACT width
    pub frac_bits: u8,
    /// MD_INT width
    pub md_int_bits: u8,
    pub filter: FilterTable,
    pub codecs: &'static DividerCodecs,
}

impl PllProfile {

    /// Lowest output, CCO minimum through the largest post divider
    #[inline]
    pub fn out_min(self: &Self) -> u32 {
        self.cco_min / (self.p_max << 1)
    }

    /// Highest output, post divider bypassed
    #[inline]
    pub fn out_max(self: &Self) -> u32 {
        self.cco_max
    }

    /// Highest input in integer mode for feedback factor `k`.
    ///
    /// One CCO step (`k * F IN`) fits the CCO window, so one of the two
    /// multipliers around the target always lands inside it.
    #[inline]
    pub fn in_max(self: &Self, k: u32) -> u32 {
        (self.cco_max - self.cco_min) / k.max(1)
    }

    /// Largest integer multiplier in spread spectrum mode
    #[inline]
    pub fn ss_m_max(self: &Self) -> u32 {
        !(0xFFFF_FFFFu32 << self.md_int_bits)
    }
}


/// LPC546xx / LPC540xx system PLL
pub static LPC546XX: PllProfile = PllProfile {
    name: "LPC546xx",
    cco_min: CCO_FREQ_MIN,
    cco_max: CCO_FREQ_MAX,
    in_min: IN_FREQ_MIN,
    in_ss_min: IN_FREQ_SS_MIN,
    in_ss_max: IN_FREQ_SS_MAX,
    gcd_min: GCD_MIN,
    n_max: N_MAX,
    p_max: P_MAX,
    m_max: M_MAX,
    frac_bits: FRAC_BITS,
    md_int_bits: MD_INT_BITS,
    filter: SYSPLL_FILTER,
    codecs: &SYSPLL_CODECS,
};

/// LPC5411x system PLL, same block with a slower CCO
pub static LPC5411X: PllProfile = PllProfile {
    name: "LPC5411x",
    cco_min: CCO_FREQ_MIN_5411X,
    cco_max: CCO_FREQ_MAX_5411X,
    in_min: IN_FREQ_MIN,
    in_ss_min: IN_FREQ_SS_MIN,
    in_ss_max: IN_FREQ_SS_MAX,
    gcd_min: GCD_MIN,
    n_max: N_MAX,
    p_max: P_MAX,
    m_max: M_MAX,
    frac_bits: FRAC_BITS,
    md_int_bits: MD_INT_BITS,
    filter: SYSPLL_FILTER,
    codecs: &SYSPLL_CODECS,
};
