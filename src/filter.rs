//! Loop filter (charge pump bandwidth) coefficients

use crate::constants::*;

/// SELP / SELI / SELR control bits
#[derive(Debug,Copy,Clone,PartialEq,Eq,Default)]
pub struct FilterBits {
    pub selp: u32,
    pub seli: u32,
    pub selr: u32,
}

/// Fractional mode coefficients, used for multipliers up to and including `m_max`
#[derive(Debug,Copy,Clone)]
pub struct FilterStep {
    pub m_max: u32,
    pub bits: FilterBits,
}

/// Per silicon filter limits
#[derive(Debug,Copy,Clone)]
pub struct FilterTable {
    pub selp_max: u32,
    pub seli_max: u32,
    /// Ordered by `m_max`, last step catches everything above
    pub fractional: &'static [FilterStep],
}

/// Loop configuration the coefficients are selected for
#[derive(Debug,Copy,Clone,PartialEq,Eq,Default)]
pub struct FilterMode {
    /// Spread spectrum / fractional multiplier in use
    pub fractional: bool,
    /// CCO feedback divide-by-2 bypassed.
    /// The system PLL coefficients do not depend on it.
    pub bypass_feedback_div2: bool,
}

/// The spread spectrum generator drives the loop filter of the system PLL
pub const SYSPLL_FRACTIONAL_FILTER: [FilterStep; 1] = [
    FilterStep { m_max: u32::MAX, bits: FilterBits { selp: 0, seli: 0, selr: 0 } },
];

/// System PLL filter limits
pub const SYSPLL_FILTER: FilterTable = FilterTable {
    selp_max: SELP_MAX,
    seli_max: SELI_MAX,
    fractional: &SYSPLL_FRACTIONAL_FILTER,
};


/// Select filter coefficients for multiplier `m`.
///
/// Integer mode values are empirical and come from the SYSPLLCTRL
/// programming tables:
///
/// | M            | SELI              |
/// |--------------|-------------------|
/// | > 16384      | 1                 |
/// | 8193..=16384 | 2                 |
/// | 2049..=8192  | 4                 |
/// | 501..=2048   | 8                 |
/// | 60..=500     | 4 * (1024/(M+9))  |
/// | < 60         | (M & 0x3C) + 4    |
///
/// SELP is M/2 + 1 below 60, maximum above. SELR is 0.
pub fn select_filter(table: &FilterTable, m: u32, mode: FilterMode) -> FilterBits {
    if mode.fractional {
        return table.fractional.iter()
            .find(|s| m <= s.m_max)
            .or(table.fractional.last())
            .map(|s| s.bits)
            .unwrap_or_default();
    }

    let selp = if m < 60 { (m >> 1) + 1 } else { table.selp_max };

    let seli =
        if m > 16384 { 1 }
        else if m > 8192 { 2 }
        else if m > 2048 { 4 }
        else if m >= 501 { 8 }
        else if m >= 60 { 4 * (1024 / (m + 9)) }
        else { (m & 0x3C) + 4 };

    FilterBits {
        selp: selp.min(table.selp_max),
        seli: seli.min(table.seli_max),
        selr: 0,
    }
}
