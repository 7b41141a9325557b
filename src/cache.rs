//! Recently computed PLL setups
//!
//! Planning is cheap but not free, and firmware tends to switch between the
//! same two or three frequencies. Entries are replaced round-robin.

use spin::Mutex;

use crate::{ config::*, errors::*, profile::* };


/// One cached planner result
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub struct ConfigCacheEntry {
    pub f_in: u32,
    pub f_out: u32,
    pub flags: PllFlags,
    pub config: PllConfig,
}

/// Fixed capacity round-robin cache of planner results.
///
/// Single context only (`&mut self` to insert), see [SharedConfigCache] for
/// use from several threads or interrupt handlers.
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct ConfigCache<const CAP: usize = 2> {
    entries: [Option<ConfigCacheEntry>; CAP],
    next: usize,
}

impl<const CAP: usize> ConfigCache<CAP> {

    pub const fn new() -> Self {
        ConfigCache { entries: [None; CAP], next: 0 }
    }

    pub const fn capacity(self: &Self) -> usize {
        CAP
    }

    /// Exact match on every key field
    pub fn lookup(self: &Self, f_in: u32, f_out: u32, flags: PllFlags) -> Option<PllConfig> {
        self.entries.iter()
            .flatten()
            .find(|e| e.f_in == f_in && e.f_out == f_out && e.flags == flags)
            .map(|e| e.config)
    }

    /// Store into the next slot, overwriting whatever is there
    pub fn insert(self: &mut Self, f_in: u32, f_out: u32, flags: PllFlags, config: PllConfig) {
        if CAP == 0 {
            return;
        }
        self.entries[self.next] = Some(ConfigCacheEntry { f_in, f_out, flags, config });
        self.next = (self.next + 1) % CAP;
    }

    /// Cached setup, or plan a new one. Failed plans are not cached.
    pub fn get_or_plan(
        self: &mut Self,
        profile: &PllProfile,
        f_in: u32,
        f_out: u32,
        flags: PllFlags,
    ) -> Result<PllConfig, PllError> {
        if let Some(config) = self.lookup(f_in, f_out, flags) {
            log::debug!("PLL setup cache hit: {} Hz -> {} Hz", f_in, f_out);
            return Ok(config);
        }
        log::debug!("PLL setup cache miss: {} Hz -> {} Hz", f_in, f_out);

        let config = profile.plan(f_in, f_out, flags)?;
        self.insert(f_in, f_out, flags, config);
        Ok(config)
    }
}

impl<const CAP: usize> Default for ConfigCache<CAP> {
    fn default() -> Self {
        Self::new()
    }
}


/// [ConfigCache] behind a spin lock, lookup and insert happen under one
/// lock so concurrent callers cannot race the round-robin slot.
#[derive(Debug)]
pub struct SharedConfigCache<const CAP: usize = 2> {
    inner: Mutex<ConfigCache<CAP>>,
}

impl<const CAP: usize> SharedConfigCache<CAP> {

    pub const fn new() -> Self {
        SharedConfigCache { inner: Mutex::new(ConfigCache::new()) }
    }

    pub fn lookup(self: &Self, f_in: u32, f_out: u32, flags: PllFlags) -> Option<PllConfig> {
        self.inner.lock().lookup(f_in, f_out, flags)
    }

    pub fn insert(self: &Self, f_in: u32, f_out: u32, flags: PllFlags, config: PllConfig) {
        self.inner.lock().insert(f_in, f_out, flags, config)
    }

    pub fn get_or_plan(
        self: &Self,
        profile: &PllProfile,
        f_in: u32,
        f_out: u32,
        flags: PllFlags,
    ) -> Result<PllConfig, PllError> {
        self.inner.lock().get_or_plan(profile, f_in, f_out, flags)
    }
}

impl<const CAP: usize> Default for SharedConfigCache<CAP> {
    fn default() -> Self {
        Self::new()
    }
}
