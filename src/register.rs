//! SYSCON system PLL registers

use core::marker::PhantomData;

/// Register marker types
macro_rules! gen_register_marker {
    ($(#[$meta:meta])*, $r:ident) => {
        $(#[$meta])*
        #[derive(Debug,Copy,Clone,PartialEq,Eq)]
        pub struct $r {}

        impl Default for Reg<$r> { #[inline] fn default() -> Self { Reg::new(0) } }
    }
}

gen_register_marker!(
    /// SYSPLLCTRL, filter and bypass control
    , Ctrl
);
gen_register_marker!(
    /// SYSPLLNDEC, encoded pre-divider
    , NDec
);
gen_register_marker!(
    /// SYSPLLPDEC, encoded post-divider
    , PDec
);
gen_register_marker!(
    /// SYSPLLSSCTRL0, encoded multiplier
    , SsCtrl0
);
gen_register_marker!(
    /// SYSPLLSSCTRL1, spread spectrum / fractional multiplier
    , SsCtrl1
);
gen_register_marker!(
    /// SYSPLLSTAT, lock status
    , Stat
);


/// Single config register
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub struct Reg<R> {
    /// Config register word
    pub w: u32,
    phantom: PhantomData<R>,
}

/// Bit operations on 32bit words
impl<R> Reg<R> {
    #[inline]
    pub fn new(w: u32) -> Self {
        Reg { w, phantom: PhantomData }
    }

    #[inline]
    pub fn get<F>(self: &Self) -> F
    where F: Sized + BitField<R> + From<u32>
    {
        F::from(
            (self.w >> F::offset()) & F::mask()
        )
    }

    #[inline]
    pub fn set<F>(mut self: Self, f: F) -> Self
    where F: Sized + BitField<R> + Into<u32>
    {
        let fbits = (f.into() & F::mask()) << F::offset();
        let rbits = self.w & (! ( F::mask() << F::offset() ));
        self.w = rbits | fbits;
        self
    }
}


/// System PLL register image.
/// Defaults to all config bits set to 0.
///
/// Written in field order; the NREQ / PREQ / MREQ / MDREQ latch bits are
/// not part of the image, the driver pulses them after the writes.
#[derive(Debug,Copy,Clone,Default,PartialEq,Eq)]
pub struct PllRegisters {
    pub ctrl: Reg<Ctrl>,
    pub ndec: Reg<NDec>,
    pub pdec: Reg<PDec>,
    pub ssctrl0: Reg<SsCtrl0>,
    pub ssctrl1: Reg<SsCtrl1>,
}

/// Type-indexed register access
pub trait RIdx<R> {
    fn r(self: &Self) -> Reg<R>;
    fn update_r<F>(self: Self, f: F) -> Self where F: FnOnce(Reg<R>) -> Reg<R>;
}

macro_rules! gen_register_index {
    ($r:ident, $f:tt) => {
        impl RIdx<$r> for PllRegisters {
            #[inline]
            fn r(self: &Self) -> Reg<$r> { self.$f }
            #[inline]
            fn update_r<F>(mut self: Self, f: F) -> Self where F: FnOnce(Reg<$r>) -> Reg<$r> {
                self.$f = f(self.$f);
                self
            }
        }
    }
}

gen_register_index!(Ctrl, ctrl);
gen_register_index!(NDec, ndec);
gen_register_index!(PDec, pdec);
gen_register_index!(SsCtrl0, ssctrl0);
gen_register_index!(SsCtrl1, ssctrl1);


impl PllRegisters {

    /// Register words in write order
    #[inline]
    pub fn to_words(self: &Self) -> [(SysPllReg, u32); 5] {
        [
            (SysPllReg::Ctrl, self.ctrl.w),
            (SysPllReg::NDec, self.ndec.w),
            (SysPllReg::PDec, self.pdec.w),
            (SysPllReg::SsCtrl0, self.ssctrl0.w),
            (SysPllReg::SsCtrl1, self.ssctrl1.w),
        ]
    }

    /// Get register bitfield value
    #[inline]
    pub fn get<F,R>(self: &Self) -> F
    where F: Sized + BitField<R> + From<u32>,
          Self: RIdx<R>
    {
        self.r().get()
    }

    /// Update register bitfield
    #[inline]
    pub fn set<F,R>(self: Self, f: F) -> Self
    where F: Sized + BitField<R> + Into<u32>,
          Self: RIdx<R>
    {
        self.update_r(|r| r.set(f))
    }
}


/// SYSCON registers of the system PLL
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum SysPllReg {
    Ctrl,
    Stat,
    NDec,
    PDec,
    SsCtrl0,
    SsCtrl1,
}

impl SysPllReg {
    /// Offset from the SYSCON base
    pub fn offset(self: Self) -> u32 {
        match self {
            SysPllReg::Ctrl => 0x580,
            SysPllReg::Stat => 0x584,
            SysPllReg::NDec => 0x588,
            SysPllReg::PDec => 0x58C,
            SysPllReg::SsCtrl0 => 0x590,
            SysPllReg::SsCtrl1 => 0x594,
        }
    }
}



/// Bit operations on 32bit words
pub trait BitField<R> {
    /// Number of bits in the bit field
    fn num_bits() -> u8;

    /// Offset from 0
    fn offset() -> u8;

    #[inline]
    fn mask() -> u32 {
        !(0xFFFFFFFFu32 << Self::num_bits())
    }
}

/// Generate BitField implementation
macro_rules! gen_bitfield_impl {
	($r:ty, $n:ident, $nb:tt, $off:tt) => {
        impl BitField<$r> for $n {
            #[inline] fn num_bits() -> u8 { $nb }
            #[inline] fn offset() -> u8 { $off }
        }
    }
}

/// Small bitfield-encoded numbers boilerplate
macro_rules! gen_bitfield_struct {
	($(#[$meta:meta])*, $r:ty, $n:ident, $v:ty, $nb:tt, $off:tt) => {
        $(#[$meta])*
        #[derive(Debug,Copy,Clone,PartialEq,Eq)]
        pub struct $n(pub $v);

        gen_bitfield_impl!($r, $n, $nb, $off);

        impl From<u32> for $n { #[inline] fn from(x: u32) -> Self { $n(x as $v) } }
        impl From<$n> for u32 { #[inline] fn from(f: $n) -> u32 { f.0 as u32 } }
	};
}

/// Single bit on / off fields
macro_rules! gen_bitfield_flag {
	($(#[$meta:meta])*, $r:ty, $n:ident, $off:tt) => {
        $(#[$meta])*
        #[derive(Debug,Copy,Clone,PartialEq,Eq)]
        pub enum $n {
            Disabled,
            Enabled,
        }

        gen_bitfield_impl!($r, $n, 1, $off);

        impl From<u32> for $n {
            #[inline] fn from(x: u32) -> Self { if x & 1 == 0 { $n::Disabled } else { $n::Enabled } }
        }
        impl From<$n> for u32 { #[inline] fn from(f: $n) -> u32 { f as u32 } }
        impl From<bool> for $n {
            #[inline] fn from(b: bool) -> Self { if b { $n::Enabled } else { $n::Disabled } }
        }
        impl $n {
            #[inline] pub fn is_enabled(self: Self) -> bool { self == $n::Enabled }
        }
    }
}


gen_bitfield_struct!(
    /// Bandwidth select R value, SELR[3:0]
    , Ctrl, SelR, u8, 4, 0
);

gen_bitfield_struct!(
    /// Bandwidth select I value, SELI[9:4]
    , Ctrl, SelI, u8, 6, 4
);

gen_bitfield_struct!(
    /// Bandwidth select P value, SELP[14:10]
    , Ctrl, SelP, u8, 5, 10
);

gen_bitfield_flag!(
    /// PLL bypass, the PLL input clock is sent directly to the PLL output
    , Ctrl, Bypass, 15
);

gen_bitfield_flag!(
    /// Bypass the feedback clock divide-by-2 of the CCO.
    /// When disabled the multiplier in MDEC is doubled.
    , Ctrl, BypassCcoDiv2, 16
);

gen_bitfield_flag!(
    /// Disable the upper frequency limiter, required in spread spectrum mode
    , Ctrl, UpLimOff, 17
);

gen_bitfield_flag!(
    /// Bandwidth select: use SELP/SELI/SELR and MDEC (integer mode).
    /// Cleared in spread spectrum mode.
    , Ctrl, BandSel, 18
);

gen_bitfield_flag!(
    /// Pre-divider bypass
    , Ctrl, DirectI, 19
);

gen_bitfield_flag!(
    /// Post-divider bypass
    , Ctrl, DirectO, 20
);


gen_bitfield_struct!(
    /// Encoded pre-divider, NDEC[9:0]
    , NDec, NDecVal, u16, 10, 0
);

gen_bitfield_flag!(
    /// Latch NDEC
    , NDec, NReq, 10
);


gen_bitfield_struct!(
    /// Encoded post-divider, PDEC[6:0]
    , PDec, PDecVal, u8, 7, 0
);

gen_bitfield_flag!(
    /// Latch PDEC
    , PDec, PReq, 7
);


gen_bitfield_struct!(
    /// Encoded multiplier, MDEC[16:0]
    , SsCtrl0, MDecVal, u32, 17, 0
);

gen_bitfield_flag!(
    /// Latch MDEC
    , SsCtrl0, MReq, 17
);

gen_bitfield_flag!(
    /// Use MDEC (integer mode) rather than the spread spectrum MD value
    , SsCtrl0, SelExt, 18
);


gen_bitfield_struct!(
    /// Spread spectrum multiplier MD[18:0]:
    /// MD_INT[18:11] integer part, MD_FRACT[10:0] fraction
    , SsCtrl1, MdVal, u32, 19, 0
);

gen_bitfield_flag!(
    /// Latch MD
    , SsCtrl1, MdReq, 19
);

gen_bitfield_struct!(
    /// Modulation frequency, MF[22:20]
    , SsCtrl1, ModFreq, u8, 3, 20
);

gen_bitfield_struct!(
    /// Modulation depth, MR[25:23]
    , SsCtrl1, ModDepth, u8, 3, 23
);

gen_bitfield_struct!(
    /// Modulation waveform compensation, MC[27:26]
    , SsCtrl1, ModComp, u8, 2, 26
);

gen_bitfield_flag!(
    /// Spread spectrum generator power down
    , SsCtrl1, SsPowerDown, 28
);

gen_bitfield_flag!(
    /// Dither the modulation
    , SsCtrl1, Dither, 29
);


gen_bitfield_flag!(
    /// PLL lock indicator
    , Stat, Lock, 0
);
