//! Duct cross-section geometry.

use std::f64::consts::PI;

/// Circular diameter with the same friction loss as a rectangular duct
/// (Huebscher): `1.30·(ab)^0.625 / (a+b)^0.25`.
///
/// # Examples
///
/// ```
/// use shaft_sizer::calculation::huebscher_equivalent_diameter;
///
/// let de = huebscher_equivalent_diameter(24.0, 12.0);
/// assert!((de - 18.2805).abs() < 1e-4);
/// ```
pub fn huebscher_equivalent_diameter(a_in: f64, b_in: f64) -> f64 {
    1.30 * (a_in * b_in).powf(0.625) / (a_in + b_in).powf(0.25)
}

/// Hydraulic diameter `4A/P` of a rectangular duct, in inches.
pub fn hydraulic_diameter_rect(a_in: f64, b_in: f64) -> f64 {
    let area = a_in * b_in;
    let perimeter = 2.0 * (a_in + b_in);
    4.0 * area / perimeter
}

/// Cross-section area of a round duct, in square inches.
pub fn circular_area(d_in: f64) -> f64 {
    let r = d_in / 2.0;
    PI * r * r
}
