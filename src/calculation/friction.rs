//! Duct friction and velocity pressure.
//!
//! This module implements the Darcy-Weisbach pressure drop with the
//! Colebrook friction factor, in the inch-pound units used for duct design:
//! velocities in FPM, diameters in inches and pressures in inches of water
//! column (in. WC).

use crate::config::AirProperties;

/// Reynolds number below which flow is treated as laminar.
pub const LAMINAR_REYNOLDS: f64 = 2300.0;

/// Velocity (FPM) at which the velocity pressure of standard air is 1 in. WC.
const VP_VELOCITY_FACTOR: f64 = 1096.2;

const INITIAL_FRICTION_FACTOR: f64 = 0.02;
const MAX_ITERATIONS: usize = 80;
const TOLERANCE: f64 = 1e-10;

/// Computes the Reynolds number for a duct.
///
/// # Arguments
///
/// * `dh_ft` - Hydraulic diameter in feet
/// * `velocity_fpm` - Mean velocity in FPM
/// * `air` - Air properties providing the kinematic viscosity
pub fn reynolds_number(dh_ft: f64, velocity_fpm: f64, air: &AirProperties) -> f64 {
    (velocity_fpm / 60.0) * dh_ft / air.kinematic_viscosity
}

/// Computes the Darcy friction factor from the Colebrook equation.
///
/// Flow with a Reynolds number below 1 has no friction, laminar flow uses
/// `64 / Re`, and turbulent flow iterates
/// `1/√f = −2 log10(ε/(3.7 Dh) + 2.51/(Re √f))` from `f = 0.02`.
///
/// # Arguments
///
/// * `dh_ft` - Hydraulic diameter in feet
/// * `velocity_fpm` - Mean velocity in FPM
/// * `air` - Air properties (roughness and kinematic viscosity)
///
/// # Examples
///
/// ```
/// use shaft_sizer::calculation::colebrook_friction_factor;
/// use shaft_sizer::config::AirProperties;
///
/// let air = AirProperties { density: 0.075, roughness_ft: 0.0003, kinematic_viscosity: 1.63e-4 };
/// let f = colebrook_friction_factor(1.0, 1000.0, &air);
/// assert!((f - 0.0194027).abs() < 1e-6);
/// ```
pub fn colebrook_friction_factor(dh_ft: f64, velocity_fpm: f64, air: &AirProperties) -> f64 {
    let re = reynolds_number(dh_ft, velocity_fpm, air);
    if re.is_nan() || re < 1.0 {
        return 0.0;
    }
    if re < LAMINAR_REYNOLDS {
        return 64.0 / re;
    }

    let relative_roughness = air.roughness_ft / (3.7 * dh_ft);
    let mut f = INITIAL_FRICTION_FACTOR;
    for _ in 0..MAX_ITERATIONS {
        let rhs = -2.0 * (relative_roughness + 2.51 / (re * f.sqrt())).log10();
        let f_new = 1.0 / (rhs * rhs);
        if (f_new - f).abs() < TOLERANCE {
            break;
        }
        f = f_new;
    }
    f
}

/// Computes the velocity pressure in in. WC: `ρ·(V/1096.2)²`.
///
/// # Examples
///
/// ```
/// use shaft_sizer::calculation::velocity_pressure;
///
/// assert!((velocity_pressure(1000.0, 0.075) - 0.0624139).abs() < 1e-6);
/// ```
pub fn velocity_pressure(velocity_fpm: f64, density: f64) -> f64 {
    let ratio = velocity_fpm / VP_VELOCITY_FACTOR;
    density * ratio * ratio
}

/// Computes the combined friction and fitting loss of a duct run.
///
/// `Δp = [f·L/Dh + ΣK]·VP`, in in. WC. Returns 0 when the diameter or the
/// velocity is not positive.
///
/// # Arguments
///
/// * `length_ft` - Length of the run in feet
/// * `dh_in` - Hydraulic diameter in inches
/// * `sum_k` - Sum of fitting loss coefficients
/// * `velocity_fpm` - Mean velocity in FPM
/// * `air` - Air properties
pub fn darcy_pressure_drop(
    length_ft: f64,
    dh_in: f64,
    sum_k: f64,
    velocity_fpm: f64,
    air: &AirProperties,
) -> f64 {
    if dh_in <= 0.0 || velocity_fpm <= 0.0 {
        return 0.0;
    }
    let dh_ft = dh_in / 12.0;
    let f = colebrook_friction_factor(dh_ft, velocity_fpm, air);
    let vp = velocity_pressure(velocity_fpm, air.density);
    (f * length_ft / dh_ft + sum_k) * vp
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn standard_air() -> AirProperties {
        AirProperties {
            density: 0.075,
            roughness_ft: 0.0003,
            kinematic_viscosity: 1.63e-4,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_turbulent_friction_factor() {
        let air = standard_air();
        assert_close(
            colebrook_friction_factor(1.0, 1000.0, &air),
            0.019402706314983566,
        );
        assert_close(
            colebrook_friction_factor(2.0, 1500.0, &air),
            0.0158119592742728,
        );
    }

    #[test]
    fn test_laminar_friction_factor() {
        let air = standard_air();
        let re = reynolds_number(0.01, 10.0, &air);
        assert!(re < LAMINAR_REYNOLDS);
        assert_close(colebrook_friction_factor(0.01, 10.0, &air), 64.0 / re);
    }

    #[test]
    fn test_no_flow_has_no_friction() {
        let air = standard_air();
        assert_eq!(colebrook_friction_factor(1.0, 0.0, &air), 0.0);
        assert_eq!(colebrook_friction_factor(0.0, 1000.0, &air), 0.0);
    }

    #[test]
    fn test_velocity_pressure() {
        assert_close(velocity_pressure(1000.0, 0.075), 0.06241394988729039);
        assert_eq!(velocity_pressure(0.0, 0.075), 0.0);
    }

    #[test]
    fn test_darcy_friction_only() {
        let air = standard_air();
        assert_close(
            darcy_pressure_drop(100.0, 24.0, 0.0, 1000.0, &air),
            0.05214352581458014,
        );
    }

    #[test]
    fn test_darcy_with_fittings() {
        let air = standard_air();
        assert_close(
            darcy_pressure_drop(100.0, 24.0, 1.2, 1000.0, &air),
            0.1270402656793286,
        );
    }

    #[test]
    fn test_darcy_degenerate_inputs() {
        let air = standard_air();
        assert_eq!(darcy_pressure_drop(100.0, 0.0, 1.0, 1000.0, &air), 0.0);
        assert_eq!(darcy_pressure_drop(100.0, 24.0, 1.0, 0.0, &air), 0.0);
        assert_eq!(darcy_pressure_drop(100.0, -6.0, 1.0, 1000.0, &air), 0.0);
    }

    proptest! {
        #[test]
        fn prop_turbulent_friction_factor_in_physical_range(
            dh_ft in 0.5f64..4.0,
            velocity in 500.0f64..3000.0,
        ) {
            let f = colebrook_friction_factor(dh_ft, velocity, &standard_air());
            prop_assert!(f > 0.005 && f < 0.05);
        }

        #[test]
        fn prop_pressure_drop_grows_with_length(
            length in 1.0f64..500.0,
            extra in 1.0f64..100.0,
            velocity in 200.0f64..3000.0,
        ) {
            let air = standard_air();
            let short = darcy_pressure_drop(length, 12.0, 0.0, velocity, &air);
            let long = darcy_pressure_drop(length + extra, 12.0, 0.0, velocity, &air);
            prop_assert!(long > short);
        }

        #[test]
        fn prop_velocity_pressure_never_negative(velocity in -5000.0f64..5000.0) {
            prop_assert!(velocity_pressure(velocity, 0.075) >= 0.0);
        }
    }
}
