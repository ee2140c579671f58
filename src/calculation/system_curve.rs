//! System resistance curve and performance chart data.

use crate::config::FanSpec;
use crate::models::{CurvePoint, FanSelection, PerformanceChart};

use super::precision::{FAN_SP_DP, FLOW_DP, round_dp};

/// Computes the system resistance curve.
///
/// Static pressure follows the square law `SP = SP_design·(Q/Q_design)²`,
/// sampled at `points + 1` evenly spaced airflows from zero to `span` times
/// the design airflow.
///
/// # Examples
///
/// ```
/// use shaft_sizer::calculation::system_curve;
///
/// let curve = system_curve(1000.0, 0.5, 20, 1.2);
/// assert_eq!(curve.len(), 21);
/// assert_eq!(curve[20].cfm.to_string(), "1200");
/// assert_eq!(curve[20].sp.to_string(), "0.72");
/// ```
pub fn system_curve(design_cfm: f64, design_sp: f64, points: u32, span: f64) -> Vec<CurvePoint> {
    let points = points.max(1);
    (0..=points)
        .map(|i| {
            let frac = i as f64 / points as f64 * span;
            CurvePoint {
                cfm: round_dp(design_cfm * frac, FLOW_DP),
                sp: round_dp(design_sp * frac * frac, FAN_SP_DP),
            }
        })
        .collect()
}

/// Builds the chart data for a fan selection.
///
/// Parallel fans add their airflow at equal pressure, so the fan curve's
/// airflow is scaled by the number of fans.
pub fn performance_chart(
    fan: &FanSelection,
    spec: &FanSpec,
    system: Vec<CurvePoint>,
) -> PerformanceChart {
    let scale = fan.quantity.max(1) as f64;
    let fan_curve = spec
        .curve
        .iter()
        .map(|p| CurvePoint {
            cfm: round_dp(p.cfm * scale, FLOW_DP),
            sp: round_dp(p.sp, FAN_SP_DP),
        })
        .collect();

    let fan_label = if fan.parallel {
        format!("{} (parallel)", fan.display_model())
    } else {
        fan.model.clone()
    };

    PerformanceChart {
        fan_label,
        fan_curve,
        system_curve: system,
        operating_point: CurvePoint {
            cfm: fan.design_cfm,
            sp: fan.system_sp,
        },
    }
}
