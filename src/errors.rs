//! Errors

use thiserror::Error;

/// Frequency planning and register decoding errors.
/// Planning stops at the first violated constraint.
#[derive(Debug,Copy,Clone,PartialEq,Eq,Error)]
pub enum PllError {
    /// Output is below CCO_MIN / (2 * P_MAX)
    #[error("PLL output frequency too low")]
    OutputTooLow,

    /// Output is above the CCO maximum
    #[error("PLL output frequency too high")]
    OutputTooHigh,

    /// Input is below the band of the selected mode
    #[error("PLL input frequency too low")]
    InputTooLow,

    /// Input is above the band of the selected mode
    #[error("PLL input frequency too high")]
    InputTooHigh,

    /// No divider / multiplier combination inside the register limits
    #[error("PLL setup outside of integer limits")]
    OutsideIntLimit,

    /// Register bit pattern is not a valid divider encoding
    #[error("PLL divider bit pattern does not decode")]
    CodecDecodeFailed,

    /// Divider value has no register encoding
    #[error("PLL divider value does not encode")]
    CodecEncodeFailed,
}


/// PLL programming errors
#[derive(Debug,Copy,Clone,PartialEq,Eq,Error)]
pub enum HwError {
    /// Register bus access failed
    #[error("SYSCON register access failed")]
    Bus,

    /// PLL did not report lock within the retry budget
    #[error("PLL lock timeout")]
    LockTimeout,

    #[error(transparent)]
    Pll(#[from] PllError),
}
