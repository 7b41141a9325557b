//! Constants

/// Minimum CCO frequency, LPC546xx system PLL
pub const CCO_FREQ_MIN: u32 = 275_000_000;

/// Maximum CCO frequency, LPC546xx system PLL
pub const CCO_FREQ_MAX: u32 = 550_000_000;

/// Minimum CCO frequency, LPC5411x system PLL
pub const CCO_FREQ_MIN_5411X: u32 = 75_000_000;

/// Maximum CCO frequency, LPC5411x system PLL
pub const CCO_FREQ_MAX_5411X: u32 = 150_000_000;

/// Lowest PLL input frequency in integer mode
pub const IN_FREQ_MIN: u32 = 4_000;

/// PLL input window in spread spectrum (fractional) mode.
/// The input is pre-divided to land in the middle of this window.
pub const IN_FREQ_SS_MIN: u32 = 2_000_000;

/// See [IN_FREQ_SS_MIN]
pub const IN_FREQ_SS_MAX: u32 = 4_000_000;

/// Greatest common divisor of the CCO and the input rate has to be above this
/// before a pre-divider is used to make the multiplier exact.
pub const GCD_MIN: u32 = 20_000;

/// Largest pre-divider (N) value
pub const N_MAX: u32 = 0x100;

/// Largest post-divider (P) value, the post divider divides by 2 * P
pub const P_MAX: u32 = 0x20;

/// Largest multiplier (M) value
pub const M_MAX: u32 = 0x8000;

/// Fractional part width of the SSCG multiplier (MD_FRACT)
pub const FRAC_BITS: u8 = 11;

/// Integer part width of the SSCG multiplier (MD_INT)
pub const MD_INT_BITS: u8 = 8;

/// Largest SELP filter value
pub const SELP_MAX: u32 = P_MAX - 1;

/// Largest SELI filter value (6 bit field)
pub const SELI_MAX: u32 = 0x3F;

/// Largest SELR filter value (4 bit field)
pub const SELR_MAX: u32 = 0xF;

/// Register field widths of the encoded dividers
pub const NDEC_BITS: u8 = 10;
/// See [NDEC_BITS]
pub const PDEC_BITS: u8 = 7;
/// See [NDEC_BITS]
pub const MDEC_BITS: u8 = 17;

/// Lock status polls before giving up
pub const LOCK_POLL_RETRIES: u32 = 10_000;

/// Delay between two lock status polls, microseconds
pub const LOCK_POLL_DELAY_US: u16 = 10;
