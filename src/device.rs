///! System PLL driver

use embedded_hal::blocking::delay::DelayUs;

use crate::{ cache::*, config::*, constants::*, errors::*, profile::*, register::* };


/// SYSCON register access
pub trait SysconBus {
    type Error;

    fn write(self: &mut Self, reg: SysPllReg, w: u32) -> Result<(), Self::Error>;

    fn read(self: &mut Self, reg: SysPllReg) -> Result<u32, Self::Error>;
}


/// Programming options
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub struct SetupFlags {
    /// Block until the PLL reports lock (bounded)
    pub wait_lock: bool,
}

impl Default for SetupFlags {
    fn default() -> Self {
        SetupFlags { wait_lock: true }
    }
}

/// PLL input rate used for planning
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum InputRate {
    /// Rate of the selected PLL clock source
    Source,
    /// Caller supplied rate
    Override(u32),
}


/// System PLL
pub struct SysPll<BUS> {
    bus: BUS,
    profile: &'static PllProfile,
    /// Rate of the PLL clock source
    f_source: u32,
}


impl<BUS> SysPll<BUS>
where BUS: SysconBus,
{
    /// `bus` - SYSCON register access
    /// `profile` - PLL of the chip family
    /// `f_source` - rate of the clock feeding the PLL
    pub fn new(
        bus: BUS,
        profile: &'static PllProfile,
        f_source: u32,
    ) -> Self {
        SysPll { bus, profile, f_source }
    }

    /// Give the bus back
    pub fn release(self) -> BUS {
        self.bus
    }

    pub fn profile(self: &Self) -> &'static PllProfile {
        self.profile
    }

    fn input(self: &Self, input: InputRate) -> u32 {
        match input {
            InputRate::Source => self.f_source,
            InputRate::Override(f) => f,
        }
    }

    /// Plan (or reuse a cached plan) for `f_out_hz` and program it.
    /// Returns the applied setup.
    pub fn set_output_rate<Delay, const CAP: usize>(
        self: &mut Self,
        delay: &mut Delay,
        cache: &mut ConfigCache<CAP>,
        input: InputRate,
        f_out_hz: u32,
        flags: PllFlags,
        setup: SetupFlags,
    ) -> Result<PllConfig, HwError>
    where Delay: DelayUs<u16>,
    {
        let f_in = self.input(input);
        let c = cache.get_or_plan(self.profile, f_in, f_out_hz, flags)?;
        self.apply(delay, &c, setup)?;
        Ok(c)
    }

    /// Writes the register image, latches the dividers and optionally waits
    /// for lock. Blocking call.
    pub fn apply<Delay>(
        self: &mut Self,
        delay: &mut Delay,
        c: &PllConfig,
        setup: SetupFlags,
    ) -> Result<(), HwError>
    where Delay: DelayUs<u16>,
    {
        let rs = PllRegisters::from_config(self.profile, c)?;

        for (reg, w) in rs.to_words().iter() {
            self.write(*reg, *w)?;
        }

        // Dividers only take effect on the rising edge of their request bits
        self.write(SysPllReg::NDec, rs.ndec.set(NReq::Enabled).w)?;
        self.write(SysPllReg::PDec, rs.pdec.set(PReq::Enabled).w)?;
        if c.fractional() {
            self.write(SysPllReg::SsCtrl1, rs.ssctrl1.set(MdReq::Enabled).w)?;
        } else {
            self.write(SysPllReg::SsCtrl0, rs.ssctrl0.set(MReq::Enabled).w)?;
        }

        if setup.wait_lock && !c.bypass {
            self.wait_lock(delay)?;
        }
        Ok(())
    }

    /// Non-blocking lock check
    pub fn poll_lock(self: &mut Self) -> nb::Result<(), HwError> {
        let stat = Reg::<Stat>::new(self.read(SysPllReg::Stat)?);
        let lock: Lock = stat.get();
        if lock.is_enabled() { Ok(()) } else { Err(nb::Error::WouldBlock) }
    }

    /// Poll lock up to `LOCK_POLL_RETRIES` times, `LOCK_POLL_DELAY_US` apart
    pub fn wait_lock<Delay>(self: &mut Self, delay: &mut Delay) -> Result<(), HwError>
    where Delay: DelayUs<u16>,
    {
        for _ in 0 .. LOCK_POLL_RETRIES {
            match self.poll_lock() {
                Ok(()) => return Ok(()),
                Err(nb::Error::WouldBlock) => delay.delay_us(LOCK_POLL_DELAY_US),
                Err(nb::Error::Other(e)) => return Err(e),
            }
        }
        log::warn!("{} PLL: no lock after {} polls", self.profile.name, LOCK_POLL_RETRIES);
        Err(HwError::LockTimeout)
    }

    /// Current register image, request bits stripped
    pub fn registers(self: &mut Self) -> Result<PllRegisters, HwError> {
        Ok(PllRegisters {
            ctrl: Reg::new(self.read(SysPllReg::Ctrl)?),
            ndec: Reg::new(self.read(SysPllReg::NDec)?).set(NReq::Disabled),
            pdec: Reg::new(self.read(SysPllReg::PDec)?).set(PReq::Disabled),
            ssctrl0: Reg::new(self.read(SysPllReg::SsCtrl0)?).set(MReq::Disabled),
            ssctrl1: Reg::new(self.read(SysPllReg::SsCtrl1)?).set(MdReq::Disabled),
        })
    }

    /// Output rate decoded from the running configuration
    pub fn output_rate(self: &mut Self, input: InputRate) -> Result<u32, HwError> {
        let f_in = self.input(input);
        let rs = self.registers()?;
        Ok(rs.output_rate(self.profile, f_in)?)
    }

    #[inline]
    fn write(self: &mut Self, reg: SysPllReg, w: u32) -> Result<(), HwError> {
        log::debug!("SYSCON[{:#05x}] <- {:#010x}", reg.offset(), w);
        self.bus.write(reg, w).map_err(|_| HwError::Bus)
    }

    #[inline]
    fn read(self: &mut Self, reg: SysPllReg) -> Result<u32, HwError> {
        self.bus.read(reg).map_err(|_| HwError::Bus)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    /// Register file, reports lock after `lock_after` status reads
    #[derive(Default)]
    struct FakeSyscon {
        ctrl: u32,
        ndec: u32,
        pdec: u32,
        ssctrl0: u32,
        ssctrl1: u32,
        writes: Vec<(SysPllReg, u32)>,
        stat_reads: u32,
        lock_after: Option<u32>,
        fail: bool,
    }

    impl SysconBus for FakeSyscon {
        type Error = ();

        fn write(self: &mut Self, reg: SysPllReg, w: u32) -> Result<(), ()> {
            if self.fail { return Err(()); }
            self.writes.push((reg, w));
            match reg {
                SysPllReg::Ctrl => self.ctrl = w,
                SysPllReg::NDec => self.ndec = w,
                SysPllReg::PDec => self.pdec = w,
                SysPllReg::SsCtrl0 => self.ssctrl0 = w,
                SysPllReg::SsCtrl1 => self.ssctrl1 = w,
                SysPllReg::Stat => return Err(()),
            }
            Ok(())
        }

        fn read(self: &mut Self, reg: SysPllReg) -> Result<u32, ()> {
            if self.fail { return Err(()); }
            Ok(match reg {
                SysPllReg::Ctrl => self.ctrl,
                SysPllReg::NDec => self.ndec,
                SysPllReg::PDec => self.pdec,
                SysPllReg::SsCtrl0 => self.ssctrl0,
                SysPllReg::SsCtrl1 => self.ssctrl1,
                SysPllReg::Stat => {
                    self.stat_reads += 1;
                    match self.lock_after {
                        Some(n) if self.stat_reads > n => 1,
                        _ => 0,
                    }
                }
            })
        }
    }

    #[derive(Default)]
    struct FakeDelay {
        us: u32,
    }

    impl DelayUs<u16> for FakeDelay {
        fn delay_us(&mut self, us: u16) {
            self.us += us as u32;
        }
    }

    fn pll(lock_after: Option<u32>) -> SysPll<FakeSyscon> {
        SysPll::new(FakeSyscon { lock_after, ..Default::default() }, &LPC546XX, 24_000_000)
    }

    #[test]
    fn programs_and_locks() {
        let mut pll = pll(Some(3));
        let mut delay = FakeDelay::default();
        let mut cache: ConfigCache = ConfigCache::new();

        let c = pll.set_output_rate(
            &mut delay, &mut cache, InputRate::Source, 528_000_000, PllFlags::integer(), SetupFlags::default()
        ).unwrap();
        assert_eq!(c.achieved_rate, 528_000_000);
        assert_eq!(delay.us, 3 * LOCK_POLL_DELAY_US as u32);
        assert!(cache.lookup(24_000_000, 528_000_000, PllFlags::integer()).is_some());

        let bus = pll.release();
        let regs: Vec<SysPllReg> = bus.writes.iter().map(|(r, _)| *r).collect();
        assert_eq!(regs, [
            SysPllReg::Ctrl, SysPllReg::NDec, SysPllReg::PDec, SysPllReg::SsCtrl0, SysPllReg::SsCtrl1,
            SysPllReg::NDec, SysPllReg::PDec, SysPllReg::SsCtrl0,
        ]);
        assert_eq!(bus.writes[5].1, 0x302 | (1 << 10));
        assert_eq!(bus.writes[6].1, 0x7F | (1 << 7));
        assert_eq!(bus.writes[7].1, 0x7FEA | (1 << 17) | (1 << 18));
    }

    #[test]
    fn readback_decodes_running_rate() {
        let mut pll = pll(Some(0));
        let mut delay = FakeDelay::default();
        let mut cache: ConfigCache = ConfigCache::new();

        pll.set_output_rate(
            &mut delay, &mut cache, InputRate::Override(16_000_000), 48_000_000, PllFlags::integer(), SetupFlags::default()
        ).unwrap();
        assert_eq!(pll.output_rate(InputRate::Override(16_000_000)), Ok(48_000_000));
        // same dividers on the 24 MHz source
        assert_eq!(pll.output_rate(InputRate::Source), Ok(72_000_000));
        assert!(cache.lookup(16_000_000, 48_000_000, PllFlags::integer()).is_some());
    }

    #[test]
    fn fractional_latches_md() {
        let mut pll = pll(Some(0));
        let mut delay = FakeDelay::default();
        let c = LPC546XX.plan(24_000_000, 301_500_000, PllFlags::fractional()).unwrap();
        pll.apply(&mut delay, &c, SetupFlags::default()).unwrap();
        assert_eq!(pll.output_rate(InputRate::Source), Ok(301_500_000));

        let bus = pll.release();
        let (reg, w) = *bus.writes.last().unwrap();
        assert_eq!(reg, SysPllReg::SsCtrl1);
        assert_ne!(w & (1 << 19), 0);
    }

    #[test]
    fn lock_timeout_is_bounded() {
        let mut pll = pll(None);
        let mut delay = FakeDelay::default();
        let c = LPC546XX.plan(24_000_000, 528_000_000, PllFlags::integer()).unwrap();
        assert_eq!(pll.apply(&mut delay, &c, SetupFlags::default()), Err(HwError::LockTimeout));
        assert_eq!(delay.us, LOCK_POLL_RETRIES * LOCK_POLL_DELAY_US as u32);
        assert_eq!(pll.release().stat_reads, LOCK_POLL_RETRIES);
    }

    #[test]
    fn no_wait_without_lock_request() {
        let mut pll = pll(None);
        let mut delay = FakeDelay::default();
        let c = LPC546XX.plan(24_000_000, 528_000_000, PllFlags::integer()).unwrap();
        assert_eq!(pll.apply(&mut delay, &c, SetupFlags { wait_lock: false }), Ok(()));
        assert_eq!(pll.poll_lock(), Err(nb::Error::WouldBlock));

        let bypass = PllConfig::bypassed(24_000_000);
        assert_eq!(pll.apply(&mut delay, &bypass, SetupFlags::default()), Ok(()));
        assert_eq!(pll.output_rate(InputRate::Source), Ok(24_000_000));
        assert_eq!(delay.us, 0);
    }

    #[test]
    fn errors_propagate() {
        let mut pll = pll(Some(0));
        let mut delay = FakeDelay::default();
        let mut cache: ConfigCache = ConfigCache::new();
        assert_eq!(
            pll.set_output_rate(&mut delay, &mut cache, InputRate::Source, 600_000_000, PllFlags::integer(), SetupFlags::default()),
            Err(HwError::Pll(PllError::OutputTooHigh))
        );
        assert!(pll.release().writes.is_empty());

        let mut pll = SysPll::new(FakeSyscon { fail: true, ..Default::default() }, &LPC546XX, 24_000_000);
        let c = LPC546XX.plan(24_000_000, 528_000_000, PllFlags::integer()).unwrap();
        assert_eq!(pll.apply(&mut delay, &c, SetupFlags::default()), Err(HwError::Bus));
        assert_eq!(pll.output_rate(InputRate::Source), Err(HwError::Bus));
    }
}
