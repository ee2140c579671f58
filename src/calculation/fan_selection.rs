//! Exhaust fan selection.
//!
//! Fans are tried smallest first; the first whose curve delivers the design
//! airflow at the system static pressure is selected. When even the largest
//! fan falls short, enough of the largest fans are run in parallel to share
//! the airflow.

use crate::config::{FanCurvePoint, FanSpec};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, FanSelection};

use super::precision::{FAN_SP_DP, FLOW_DP, PERCENT_DP, round_dp};

/// The result of a fan selection, including the audit step.
#[derive(Debug, Clone)]
pub struct FanSelectionResult {
    /// The selected fan.
    pub selection: FanSelection,
    /// The audit step recording the selection.
    pub audit_step: AuditStep,
}

/// Interpolates the airflow a fan delivers at a static pressure.
///
/// The curve is ordered by static pressure ascending. Pressures outside the
/// curve are clamped to its end points.
///
/// # Examples
///
/// ```
/// use shaft_sizer::calculation::cfm_at_sp;
/// use shaft_sizer::config::FanCurvePoint;
///
/// let curve = [
///     FanCurvePoint { cfm: 840.0, sp: 0.50 },
///     FanCurvePoint { cfm: 780.0, sp: 0.75 },
/// ];
/// assert!((cfm_at_sp(&curve, 0.6) - 816.0).abs() < 1e-9);
/// assert_eq!(cfm_at_sp(&curve, 0.1), 840.0);
/// ```
pub fn cfm_at_sp(curve: &[FanCurvePoint], sp: f64) -> f64 {
    let (Some(first), Some(last)) = (curve.first(), curve.last()) else {
        return 0.0;
    };
    if sp <= first.sp {
        return first.cfm;
    }
    if sp >= last.sp {
        return last.cfm;
    }
    curve
        .windows(2)
        .find(|w| w[0].sp <= sp && sp <= w[1].sp)
        .map(|w| {
            let frac = (sp - w[0].sp) / (w[1].sp - w[0].sp);
            w[0].cfm + frac * (w[1].cfm - w[0].cfm)
        })
        .unwrap_or(last.cfm)
}

/// Interpolates the static pressure a fan develops at an airflow.
///
/// This is the inverse of [`cfm_at_sp`]: airflow above the free-air point
/// gives the lowest pressure, airflow below the last point the highest.
pub fn sp_at_cfm(curve: &[FanCurvePoint], cfm: f64) -> f64 {
    let (Some(first), Some(last)) = (curve.first(), curve.last()) else {
        return 0.0;
    };
    if cfm >= first.cfm {
        return first.sp;
    }
    if cfm <= last.cfm {
        return last.sp;
    }
    curve
        .windows(2)
        .find(|w| w[0].cfm >= cfm && cfm >= w[1].cfm)
        .map(|w| {
            let frac = (w[0].cfm - cfm) / (w[0].cfm - w[1].cfm);
            w[0].sp + frac * (w[1].sp - w[0].sp)
        })
        .unwrap_or(last.sp)
}

/// Selects the exhaust fan for a design airflow and system pressure.
///
/// # Arguments
///
/// * `design_cfm` - The design airflow (CFM)
/// * `system_sp` - The total system pressure drop (in. WC)
/// * `fans` - The fan catalog, smallest first
/// * `step_number` - The audit step number to assign
///
/// # Returns
///
/// Returns the selection and its audit step, or `CalculationError` if the
/// catalog is empty, the design airflow is not positive, or the largest fan
/// delivers no airflow at the system pressure.
pub fn select_fan(
    design_cfm: f64,
    system_sp: f64,
    fans: &[FanSpec],
    step_number: u32,
) -> EngineResult<FanSelectionResult> {
    if design_cfm <= 0.0 {
        return Err(EngineError::CalculationError {
            message: format!("Design airflow must be positive, got {}", design_cfm),
        });
    }

    let single = fans
        .iter()
        .map(|fan| (fan, cfm_at_sp(&fan.curve, system_sp)))
        .find(|(_, available)| *available >= design_cfm);

    let (fan, quantity, available_cfm, cfm_per_fan) = match single {
        Some((fan, available)) => (fan, 1, available, None),
        None => {
            let largest = fans.last().ok_or_else(|| EngineError::CalculationError {
                message: "Fan catalog is empty".to_string(),
            })?;
            let per_fan_max = cfm_at_sp(&largest.curve, system_sp);
            if per_fan_max <= 0.0 {
                return Err(EngineError::CalculationError {
                    message: format!(
                        "{} delivers no airflow at {:.4} in. WC",
                        largest.model, system_sp
                    ),
                });
            }
            let quantity = (design_cfm / per_fan_max).ceil() as u32;
            let per_fan = design_cfm / quantity as f64;
            (largest, quantity, per_fan_max * quantity as f64, Some(per_fan))
        }
    };

    let operating_sp = sp_at_cfm(&fan.curve, cfm_per_fan.unwrap_or(design_cfm));
    let margin_pct = (available_cfm - design_cfm) / design_cfm * 100.0;
    let parallel = quantity > 1;

    let selection = FanSelection {
        model: fan.model.clone(),
        quantity,
        parallel,
        design_cfm: round_dp(design_cfm, FLOW_DP),
        cfm_per_fan: cfm_per_fan.map(|c| round_dp(c, FLOW_DP)),
        system_sp: round_dp(system_sp, FAN_SP_DP),
        available_cfm: round_dp(available_cfm, FLOW_DP),
        operating_sp: round_dp(operating_sp, FAN_SP_DP),
        margin_pct: round_dp(margin_pct, PERCENT_DP),
        specs: fan.clone(),
    };

    let reasoning = if parallel {
        format!(
            "No single fan delivers {} CFM at {} in. WC; {} × {} in parallel deliver {} CFM",
            selection.design_cfm,
            selection.system_sp,
            quantity,
            fan.model,
            selection.available_cfm
        )
    } else {
        format!(
            "{} is the smallest fan delivering {} CFM at {} in. WC ({} CFM available, {}% margin)",
            fan.model,
            selection.design_cfm,
            selection.system_sp,
            selection.available_cfm,
            selection.margin_pct
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "fan_selection".to_string(),
        rule_name: "Fan Selection".to_string(),
        reference: "Fan performance curves".to_string(),
        input: serde_json::json!({
            "design_cfm": selection.design_cfm.to_string(),
            "system_sp": selection.system_sp.to_string(),
        }),
        output: serde_json::json!({
            "model": selection.model,
            "quantity": quantity,
            "available_cfm": selection.available_cfm.to_string(),
            "operating_sp": selection.operating_sp.to_string(),
            "margin_pct": selection.margin_pct.to_string(),
        }),
        reasoning,
    };

    tracing::debug!(
        model = %selection.model,
        quantity,
        design_cfm,
        system_sp,
        "Selected exhaust fan"
    );

    Ok(FanSelectionResult {
        selection,
        audit_step,
    })
}
