//! Divider register codec
//!
//! The N, P and M dividers are not stored as plain binary numbers. Values 0, 1
//! and 2 have fixed encodings, every other value is the state of a shift
//! register (LFSR) after `MAX - value + 1` steps from a seed.
//! Lookup tables for both directions are generated at compile time.

use core::fmt;

use crate::constants::*;

/// LFSR divider field description
#[derive(Debug,Copy,Clone)]
pub struct LfsrField {
    /// Largest value the field encodes
    pub max: u32,
    /// Shift register length
    pub state_bits: u8,
    /// Feedback tap mask, feedback bit is the parity of `state & taps`
    pub taps: u32,
    /// Shift register state the recurrence starts from
    pub seed: u32,
    /// Register field width
    pub width: u8,
    /// Encodings of 0, 1 and 2
    pub special: [u32; 3],
}

impl LfsrField {
    /// One shift register step
    #[inline]
    pub const fn step(self: &Self, x: u32) -> u32 {
        let feedback = (x & self.taps).count_ones() & 1;
        let low = !(0xFFFF_FFFFu32 << (self.state_bits - 1));
        (feedback << (self.state_bits - 1)) | ((x >> 1) & low)
    }

    /// Register field mask
    #[inline]
    pub const fn mask(self: &Self) -> u32 {
        !(0xFFFF_FFFFu32 << self.width)
    }

    /// Encode by running the recurrence, O(max).
    pub fn search_encode(self: &Self, value: u32) -> Option<u32> {
        match value {
            0 ..= 2 => Some(self.special[value as usize]),
            v if v > self.max => None,
            v => {
                let mut x = self.seed;
                for _ in v ..= self.max {
                    x = self.step(x);
                }
                Some(x & self.mask())
            }
        }
    }

    /// Decode by running the recurrence from `max` downwards, O(max).
    pub fn search_decode(self: &Self, bits: u32) -> Option<u32> {
        if let Some(v) = self.special.iter().position(|s| *s == bits) {
            return Some(v as u32);
        }
        let mut x = self.seed;
        for v in (3 ..= self.max).rev() {
            x = self.step(x);
            if x & self.mask() == bits {
                return Some(v);
            }
        }
        None
    }
}


/// Pre-divider field, NDEC
pub const N_FIELD: LfsrField = LfsrField {
    max: N_MAX,
    state_bits: 8,
    taps: 0x1D,
    seed: 0x080,
    width: NDEC_BITS,
    special: [0x3FF, 0x302, 0x202],
};

/// Post-divider field, PDEC
pub const P_FIELD: LfsrField = LfsrField {
    max: P_MAX,
    state_bits: 5,
    taps: 0x05,
    seed: 0x010,
    width: PDEC_BITS,
    special: [0x7F, 0x62, 0x42],
};

/// Multiplier field, MDEC
pub const M_FIELD: LfsrField = LfsrField {
    max: M_MAX,
    state_bits: 15,
    taps: 0x03,
    seed: 0x04000,
    width: MDEC_BITS,
    special: [0x1FFFF, 0x18003, 0x10003],
};


/// Bijection table for one LFSR field.
///
/// `VALUES` is `max + 1`, `STATES` is `1 << state_bits`.
#[derive(Clone)]
pub struct LfsrCodec<const VALUES: usize, const STATES: usize> {
    field: LfsrField,
    encode: [u32; VALUES],
    // 0 marks a state no value maps to
    decode: [u16; STATES],
}

impl<const VALUES: usize, const STATES: usize> LfsrCodec<VALUES, STATES> {

    /// Build both tables. Runs `max` recurrence steps, meant for const context.
    pub const fn new(field: LfsrField) -> Self {
        assert!(VALUES == field.max as usize + 1);
        assert!(STATES == 1 << field.state_bits);
        assert!(field.max <= u16::MAX as u32);

        let mut encode = [0u32; VALUES];
        let mut decode = [0u16; STATES];
        encode[0] = field.special[0];
        encode[1] = field.special[1];
        encode[2] = field.special[2];

        let mut x = field.seed;
        let mut v = field.max;
        while v >= 3 {
            x = field.step(x);
            encode[v as usize] = x & field.mask();
            decode[x as usize] = v as u16;
            v -= 1;
        }

        LfsrCodec { field, encode, decode }
    }

    pub fn field(self: &Self) -> &LfsrField {
        &self.field
    }

    /// Register bits for `value`, `None` above the field maximum
    #[inline]
    pub fn encode(self: &Self, value: u32) -> Option<u32> {
        self.encode.get(value as usize).copied()
    }

    /// Value for register `bits`, `None` if no value encodes to `bits`
    #[inline]
    pub fn decode(self: &Self, bits: u32) -> Option<u32> {
        if let Some(v) = self.field.special.iter().position(|s| *s == bits) {
            return Some(v as u32);
        }
        match self.decode.get(bits as usize).copied() {
            Some(0) | None => None,
            Some(v) => Some(v as u32),
        }
    }
}


// tables left out, the M codec alone is 192 KiB
impl<const VALUES: usize, const STATES: usize> fmt::Debug for LfsrCodec<VALUES, STATES> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfsrCodec").field("field", &self.field).finish_non_exhaustive()
    }
}


const N_VALUES: usize = N_MAX as usize + 1;
const N_STATES: usize = 1 << 8;
const P_VALUES: usize = P_MAX as usize + 1;
const P_STATES: usize = 1 << 5;
const M_VALUES: usize = M_MAX as usize + 1;
const M_STATES: usize = 1 << 15;

/// N, P and M codecs of one PLL
pub struct DividerCodecs {
    pub n: LfsrCodec<N_VALUES, N_STATES>,
    pub p: LfsrCodec<P_VALUES, P_STATES>,
    pub m: LfsrCodec<M_VALUES, M_STATES>,
}

impl fmt::Debug for DividerCodecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DividerCodecs")
            .field("n", self.n.field())
            .field("p", self.p.field())
            .field("m", self.m.field())
            .finish()
    }
}

impl DividerCodecs {
    #[inline] pub fn encode_n(self: &Self, n: u32) -> Option<u32> { self.n.encode(n) }
    #[inline] pub fn encode_p(self: &Self, p: u32) -> Option<u32> { self.p.encode(p) }
    #[inline] pub fn encode_m(self: &Self, m: u32) -> Option<u32> { self.m.encode(m) }
    #[inline] pub fn decode_n(self: &Self, bits: u32) -> Option<u32> { self.n.decode(bits) }
    #[inline] pub fn decode_p(self: &Self, bits: u32) -> Option<u32> { self.p.decode(bits) }
    #[inline] pub fn decode_m(self: &Self, bits: u32) -> Option<u32> { self.m.decode(bits) }
}

/// Codec tables of the LPC541xx / LPC546xx system PLL
pub static SYSPLL_CODECS: DividerCodecs = DividerCodecs {
    n: LfsrCodec::new(N_FIELD),
    p: LfsrCodec::new(P_FIELD),
    m: LfsrCodec::new(M_FIELD),
};


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_encodings() {
        let c = &SYSPLL_CODECS;
        assert_eq!(c.encode_n(0), Some(0x3FF));
        assert_eq!(c.encode_n(1), Some(0x302));
        assert_eq!(c.encode_n(2), Some(0x202));
        assert_eq!(c.encode_p(0), Some(0x7F));
        assert_eq!(c.encode_p(1), Some(0x62));
        assert_eq!(c.encode_p(2), Some(0x42));
        assert_eq!(c.encode_m(0), Some(0x1FFFF));
        assert_eq!(c.encode_m(1), Some(0x18003));
        assert_eq!(c.encode_m(2), Some(0x10003));
        assert_eq!(c.decode_m(0x18003), Some(1));
        assert_eq!(c.decode_p(0x42), Some(2));
    }

    #[test]
    fn known_vectors() {
        let c = &SYSPLL_CODECS;
        assert_eq!(c.encode_n(256), Some(0x40));
        assert_eq!(c.encode_n(255), Some(0x20));
        assert_eq!(c.encode_n(3), Some(0x01));
        assert_eq!(c.encode_n(4), Some(0x02));
        assert_eq!(c.encode_p(32), Some(0x08));
        assert_eq!(c.encode_p(31), Some(0x04));
        assert_eq!(c.encode_p(17), Some(0x03));
        assert_eq!(c.encode_p(3), Some(0x01));
        assert_eq!(c.encode_m(32768), Some(0x2000));
        assert_eq!(c.encode_m(32767), Some(0x1000));
        assert_eq!(c.encode_m(22), Some(0x7FEA));
        assert_eq!(c.encode_m(18), Some(0x7FFE));
    }

    #[test]
    fn out_of_range_does_not_encode() {
        let c = &SYSPLL_CODECS;
        assert_eq!(c.encode_n(N_MAX + 1), None);
        assert_eq!(c.encode_p(P_MAX + 1), None);
        assert_eq!(c.encode_m(M_MAX + 1), None);
    }

    #[test]
    fn unknown_pattern_does_not_decode() {
        let c = &SYSPLL_CODECS;
        // shift register never reaches the all zero state
        assert_eq!(c.decode_n(0), None);
        assert_eq!(c.decode_p(0), None);
        assert_eq!(c.decode_m(0), None);
        // above the shift register, not a special encoding
        assert_eq!(c.decode_n(0x300), None);
        assert_eq!(c.decode_p(0x60), None);
        assert_eq!(c.decode_m(0x1_0000), None);
        assert_eq!(N_FIELD.search_decode(0x300), None);
    }

    fn check_bijection<const V: usize, const S: usize>(codec: &LfsrCodec<V, S>) {
        let max = codec.field().max;
        let mut seen = [false; S];
        for v in 0 ..= max {
            let bits = codec.encode(v).unwrap();
            assert_eq!(codec.decode(bits), Some(v), "value {}", v);
            assert_eq!(bits & !codec.field().mask(), 0);
            if v >= 3 {
                assert!(!seen[bits as usize], "value {} collides", v);
                seen[bits as usize] = true;
            }
        }
    }

    #[test]
    fn tables_are_bijective() {
        check_bijection(&SYSPLL_CODECS.n);
        check_bijection(&SYSPLL_CODECS.p);
        check_bijection(&SYSPLL_CODECS.m);
    }

    #[test]
    fn tables_match_recurrence() {
        for v in 0 ..= N_MAX {
            assert_eq!(SYSPLL_CODECS.encode_n(v), N_FIELD.search_encode(v));
        }
        for v in 0 ..= P_MAX {
            let bits = P_FIELD.search_encode(v).unwrap();
            assert_eq!(SYSPLL_CODECS.encode_p(v), Some(bits));
            assert_eq!(P_FIELD.search_decode(bits), Some(v));
        }
        for v in [3, 4, 22, 100, 1000, 16384, M_MAX - 1, M_MAX] {
            let bits = M_FIELD.search_encode(v).unwrap();
            assert_eq!(SYSPLL_CODECS.encode_m(v), Some(bits));
            assert_eq!(M_FIELD.search_decode(bits), Some(v));
        }
    }

    #[test]
    fn debug_leaves_tables_out() {
        let s = format!("{:?}", SYSPLL_CODECS);
        assert!(s.starts_with("DividerCodecs"));
        assert!(s.contains("taps: 29"));
        assert!(s.len() < 1024, "{} bytes", s.len());

        let s = format!("{:?}", SYSPLL_CODECS.m);
        assert!(s.contains("state_bits: 15") && s.ends_with(".. }"));
        assert!(format!("{:?}", crate::profile::LPC546XX).len() < 4096);
    }
}
