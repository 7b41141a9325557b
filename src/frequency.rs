///! Register image <-> frequency

use crate::{ config::*, errors::*, profile::*, register::* };


impl PllRegisters {

    /// Register image for a computed setup.
    ///
    /// Integer mode selects MDEC and the manual loop filter and powers the
    /// spread spectrum generator down. Spread spectrum mode writes MD and the
    /// modulation settings and lifts the upper frequency limiter.
    pub fn from_config(profile: &PllProfile, c: &PllConfig) -> Result<Self, PllError> {
        let codecs = profile.codecs;

        let n = if c.direct_input { 1 } else { c.n };
        let p = if c.direct_output { 0 } else { c.p };
        let ndec = codecs.encode_n(n).ok_or(PllError::CodecEncodeFailed)?;
        let pdec = codecs.encode_p(p).ok_or(PllError::CodecEncodeFailed)?;

        let rs = PllRegisters::default()
            .set(SelR(c.filter.selr as u8))
            .set(SelI(c.filter.seli as u8))
            .set(SelP(c.filter.selp as u8))
            .set(Bypass::from(c.bypass))
            .set(BypassCcoDiv2::from(c.bypass_feedback_div2))
            .set(DirectI::from(c.direct_input))
            .set(DirectO::from(c.direct_output))
            .set(NDecVal(ndec as u16))
            .set(PDecVal(pdec as u8));

        let rs = match c.multiplier {
            Multiplier::Integer(m) => {
                let mdec = codecs.encode_m(m).ok_or(PllError::CodecEncodeFailed)?;
                rs.set(BandSel::Enabled)
                  .set(MDecVal(mdec))
                  .set(SelExt::Enabled)
                  .set(SsPowerDown::Enabled)
            }
            Multiplier::Fractional { int, frac } => {
                (if int > profile.ss_m_max() { Err(PllError::CodecEncodeFailed) } else { Ok(()) })?;
                rs.set(UpLimOff::Enabled)
                  .set(MdVal((int << profile.frac_bits) | frac))
                  .set(ModFreq(c.spread.mf))
                  .set(ModDepth(c.spread.mr))
                  .set(ModComp(c.spread.mc))
                  .set(Dither::from(c.spread.dither))
            }
        };

        Ok(rs)
    }

    /// Pre-divider in use
    pub fn pre_divider(self: &Self, profile: &PllProfile) -> Result<u32, PllError> {
        let directi: DirectI = self.get();
        if directi.is_enabled() {
            return Ok(1);
        }
        let ndec: NDecVal = self.get();
        let n = profile.codecs.decode_n(ndec.0 as u32).ok_or(PllError::CodecDecodeFailed)?;
        Ok(n.max(1))
    }

    /// Post-divide factor in use, 1 or 2 * P
    pub fn post_divider(self: &Self, profile: &PllProfile) -> Result<u32, PllError> {
        let directo: DirectO = self.get();
        if directo.is_enabled() {
            return Ok(1);
        }
        let pdec: PDecVal = self.get();
        let p = profile.codecs.decode_p(pdec.0 as u32).ok_or(PllError::CodecDecodeFailed)?;
        Ok(p.max(1) << 1)
    }

    /// Multiplier in use as a `frac_bits` fixed point number,
    /// including the CCO feedback divide-by-2.
    pub fn multiplier(self: &Self, profile: &PllProfile) -> Result<u64, PllError> {
        let sel_ext: SelExt = self.get();
        let m = if sel_ext.is_enabled() {
            let mdec: MDecVal = self.get();
            let m = profile.codecs.decode_m(mdec.0).ok_or(PllError::CodecDecodeFailed)?;
            // MDEC of 0 runs the loop at M = 1
            (m.max(1) as u64) << profile.frac_bits
        } else {
            let md: MdVal = self.get();
            md.0 as u64
        };

        let bypass_div2: BypassCcoDiv2 = self.get();
        Ok(if bypass_div2.is_enabled() { m } else { m << 1 })
    }

    /// Output frequency for input `f_in`.
    ///
    /// F OUT = F IN × M / (N × post divider), or F IN when bypassed
    pub fn output_rate(self: &Self, profile: &PllProfile, f_in: u32) -> Result<u32, PllError> {
        let bypass: Bypass = self.get();
        if bypass.is_enabled() {
            return Ok(f_in);
        }

        let n = self.pre_divider(profile)?;
        let post = self.post_divider(profile)?;
        let m = self.multiplier(profile)?;

        Ok(output_hz(f_in, n, 1, m, post, profile.frac_bits) as u32)
    }
}
