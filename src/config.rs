///! PLL configuration / frequency calculations

use crate::{ errors::*, filter::*, profile::*, refin::* };


/// Spread spectrum modulation settings (SYSPLLSSCTRL1).
/// Only written in fractional mode. All zero is plain fractional synthesis.
#[derive(Debug,Copy,Clone,PartialEq,Eq,Default)]
pub struct SpreadSpectrum {
    /// Modulation frequency, 3 bits
    pub mf: u8,
    /// Modulation depth, 3 bits
    pub mr: u8,
    /// Modulation waveform compensation, 2 bits
    pub mc: u8,
    /// Dither the modulation
    pub dither: bool,
}

/// Planner mode flags, part of the cache key
#[derive(Debug,Copy,Clone,PartialEq,Eq,Default)]
pub struct PllFlags {
    /// Spread spectrum mode with a fractional multiplier.
    /// `false` forces integer mode.
    pub fractional: bool,
    /// Use the CCO feedback divide-by-2, doubling the effective multiplier
    pub feedback_div2: bool,
    pub spread: SpreadSpectrum,
}

impl PllFlags {
    pub fn integer() -> Self {
        PllFlags::default()
    }

    pub fn fractional() -> Self {
        PllFlags { fractional: true, ..PllFlags::default() }
    }

    pub fn with_feedback_div2(mut self: Self) -> Self {
        self.feedback_div2 = true;
        self
    }

    pub fn with_spread(mut self: Self, spread: SpreadSpectrum) -> Self {
        self.spread = spread;
        self
    }

    /// Feedback factor k
    #[inline]
    pub fn feedback_factor(self: &Self) -> u32 {
        if self.feedback_div2 { 2 } else { 1 }
    }
}


/// Feedback multiplier
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum Multiplier {
    /// MDEC, integer mode
    Integer(u32),
    /// MD_INT + MD_FRACT / 2^FRAC_BITS, spread spectrum mode
    Fractional { int: u32, frac: u32 },
}

impl Multiplier {
    /// Integer part
    pub fn int(self: &Self) -> u32 {
        match *self {
            Multiplier::Integer(m) => m,
            Multiplier::Fractional { int, .. } => int,
        }
    }

    /// Multiplier as a `FRAC_BITS` fixed point number
    pub fn fixed(self: &Self, frac_bits: u8) -> u64 {
        match *self {
            Multiplier::Integer(m) => (m as u64) << frac_bits,
            Multiplier::Fractional { int, frac } => ((int as u64) << frac_bits) | frac as u64,
        }
    }
}


/// Computed system PLL setup
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub struct PllConfig {
    /// Pre-divider
    pub n: u32,
    /// Post-divider register value, the CCO is divided by 2 * p
    /// unless `direct_output` is set
    pub p: u32,
    pub multiplier: Multiplier,
    pub filter: FilterBits,
    /// Pre-divider bypassed (n == 1)
    pub direct_input: bool,
    /// Post-divider bypassed
    pub direct_output: bool,
    /// Whole PLL bypassed, output is the input
    pub bypass: bool,
    /// CCO feedback divide-by-2 bypassed
    pub bypass_feedback_div2: bool,
    pub spread: SpreadSpectrum,
    /// Output frequency this setup produces, Hz
    pub achieved_rate: u32,
}

impl PllConfig {

    /// PLL bypass, the input passes straight through
    pub fn bypassed(f_in: u32) -> Self {
        PllConfig {
            n: 1,
            p: 1,
            multiplier: Multiplier::Integer(1),
            filter: FilterBits::default(),
            direct_input: true,
            direct_output: true,
            bypass: true,
            bypass_feedback_div2: true,
            spread: SpreadSpectrum::default(),
            achieved_rate: f_in,
        }
    }

    pub fn fractional(self: &Self) -> bool {
        matches!(self.multiplier, Multiplier::Fractional { .. })
    }

    /// Post-divide factor, 1 or 2 * p
    #[inline]
    pub fn post_divider(self: &Self) -> u32 {
        if self.direct_output { 1 } else { self.p << 1 }
    }

    /// Feedback factor k
    #[inline]
    pub fn feedback_factor(self: &Self) -> u32 {
        if self.bypass_feedback_div2 { 1 } else { 2 }
    }

    /// CCO frequency for input `f_in`, Hz
    pub fn cco_hz(self: &Self, f_in: u32, frac_bits: u8) -> u64 {
        (f_in as u64 / self.n as u64) * self.feedback_factor() as u64 * self.multiplier.fixed(frac_bits) >> frac_bits
    }
}


/// Output frequency of a PLL setup
///
/// F OUT = F IN × k × M / (N × post divider)
///
/// where M is a `frac_bits` fixed point multiplier and k is 2 when the CCO
/// feedback divide-by-2 is in use.
pub fn output_hz(f_in: u32, n: u32, k: u32, m_fixed: u64, post: u32, frac_bits: u8) -> u64 {
    let num = f_in as u64 * k as u64 * m_fixed;
    let den = ((n as u64) * (post as u64)) << frac_bits;
    if den == 0 { 0 } else { num / den }
}


fn gcd(mut m: u32, mut n: u32) -> u32 {
    while n != 0 {
        let t = n;
        n = m % n;
        m = t;
    }
    m
}


impl PllProfile {

    /// Compute N, M, P and filter settings for `f_out_hz` from `f_in_hz`.
    ///
    /// The CCO is kept inside the profile window by raising the post divider,
    /// integer mode uses a GCD based pre-divider to make the multiplier exact,
    /// spread spectrum mode adds a fractional multiplier part instead.
    /// Pure function, the first violated constraint is returned.
    pub fn plan(
        self: &Self,
        f_in_hz: u32,
        f_out_hz: u32,
        flags: PllFlags,
    ) -> Result<PllConfig, PllError> {
        (if f_out_hz > self.out_max() { Err(PllError::OutputTooHigh) } else { Ok(()) })?;
        (if f_out_hz < self.out_min() { Err(PllError::OutputTooLow) } else { Ok(()) })?;

        let refin = RefIn::new(self, f_in_hz, &flags)?;
        let k = flags.feedback_factor();

        // Post divider brings the CCO up into its window
        let mut fcco = f_out_hz;
        let mut p = 0;
        while fcco < self.cco_min {
            p += 1;
            (if p > self.p_max { Err(PllError::OutsideIntLimit) } else { Ok(()) })?;
            fcco = f_out_hz * (p << 1);
        }
        let direct_output = p == 0;

        let mut n = refin.n();
        if refin.can_predivide(self) && fcco >= f_in_hz {
            let kf = k * f_in_hz;
            let g = gcd(fcco, kf);
            if g > self.gcd_min {
                let a = kf / g;
                if a != 0 && a < self.n_max {
                    n = a;
                }
            }
        }

        let ndiv = f_in_hz / n;
        let mut m = fcco / ndiv / k;

        let multiplier = if flags.fractional {
            let den = (k * ndiv) as u64;
            let frac = ((fcco as u64 % den) << self.frac_bits) / den;
            (if frac >> self.frac_bits != 0 { Err(PllError::OutsideIntLimit) } else { Ok(()) })?;
            (if m == 0 || m > self.ss_m_max() { Err(PllError::OutsideIntLimit) } else { Ok(()) })?;
            Multiplier::Fractional { int: m, frac: frac as u32 }
        } else {
            // nearest multiplier, or its other neighbour if that one leaves the CCO window
            let up = (ndiv as u64) * ((2 * k * m) as u64 + 1) < (fcco as u64) * 2;
            let (near, far) = if up { (m + 1, m) } else { (m, m + 1) };
            let step = (k * ndiv) as u64;
            let in_window = |m: u32| {
                let cco = step * m as u64;
                cco >= self.cco_min as u64 && cco <= self.cco_max as u64
            };
            m = if in_window(near) {
                near
            } else if in_window(far) {
                far
            } else {
                return Err(PllError::OutsideIntLimit);
            };
            (if m == 0 || m > self.m_max { Err(PllError::OutsideIntLimit) } else { Ok(()) })?;
            Multiplier::Integer(m)
        };

        let filter = select_filter(&self.filter, m, FilterMode {
            fractional: flags.fractional,
            bypass_feedback_div2: !flags.feedback_div2,
        });

        let p = p.max(1);
        let post = if direct_output { 1 } else { p << 1 };
        let achieved = output_hz(f_in_hz, n, k, multiplier.fixed(self.frac_bits), post, self.frac_bits);

        log::trace!(
            "{}: {} Hz -> {} Hz: N={} M={:?} P={} (direct in {}, direct out {}) CCO={} Hz, achieved {} Hz",
            self.name, f_in_hz, f_out_hz, n, multiplier, p, n == 1, direct_output, fcco, achieved
        );

        Ok(PllConfig {
            n,
            p,
            multiplier,
            filter,
            direct_input: n == 1,
            direct_output,
            bypass: false,
            bypass_feedback_div2: !flags.feedback_div2,
            spread: if flags.fractional { flags.spread } else { SpreadSpectrum::default() },
            achieved_rate: achieved as u32,
        })
    }
}
