//! Rounding at the reporting boundary.
//!
//! Calculations run in `f64`; reported quantities are converted to
//! [`Decimal`] rounded to a fixed number of places so that serialized
//! results are stable.

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

/// Decimal places for areas and diameters.
pub const AREA_DP: u32 = 2;
/// Decimal places for velocities and airflows.
pub const FLOW_DP: u32 = 0;
/// Decimal places for shaft pressures.
pub const PRESSURE_DP: u32 = 5;
/// Decimal places for fan static pressures.
pub const FAN_SP_DP: u32 = 4;
/// Decimal places for percentages.
pub const PERCENT_DP: u32 = 1;

/// Converts a computed value to a [`Decimal`] rounded to `dp` places, with
/// trailing zeros removed.
///
/// Non-finite values become zero.
///
/// # Examples
///
/// ```
/// use shaft_sizer::calculation::round_dp;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_dp(0.064874123, 5), Decimal::from_str("0.06487").unwrap());
/// assert_eq!(round_dp(f64::NAN, 2), Decimal::ZERO);
/// ```
pub fn round_dp(value: f64, dp: u32) -> Decimal {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(dp).normalize())
        .unwrap_or(Decimal::ZERO)
}

/// Converts a reported [`Decimal`] back to `f64` for further calculation.
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}
