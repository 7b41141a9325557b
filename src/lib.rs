#![cfg_attr(not(test), no_std)]

//! LPC system PLL frequency planner, divider codec and driver.
//!
//! ```ignore
//! use syspll::{ cache::*, config::*, profile::* };
//!
//! let mut cache: ConfigCache = ConfigCache::new();
//! let c = cache.get_or_plan(&LPC546XX, 12_000_000, 180_000_000, PllFlags::integer())?;
//! ```

pub mod constants;
pub mod errors;
pub mod codec;
pub mod filter;
pub mod profile;
pub mod refin;
pub mod config;
pub mod cache;
pub mod register;
pub mod frequency;
pub mod device;
