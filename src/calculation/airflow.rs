//! Floor aggregation and offset fittings.
//!
//! This module reduces the per-floor penetration data to the quantities the
//! shaft evaluation needs: connected and design airflow, the subduct area
//! deducted from the shaft, the shaft height, and the loss coefficient of an
//! offset above the top floor.

use crate::config::{FittingCoefficients, SizerConfig};
use crate::error::EngineResult;
use crate::models::{AuditStep, OffsetConfig, SizingInput};

use super::precision::{AREA_DP, FLOW_DP, round_dp};

/// Airflow and geometry totals for a building.
#[derive(Debug, Clone, PartialEq)]
pub struct FloorAggregation {
    /// Connected airflow of every penetration (CFM).
    pub total_cfm: f64,
    /// Number of penetrations.
    pub total_penetrations: u32,
    /// Shaft area taken up by subducts on the worst floor (sq.in.).
    pub subduct_deduction_sq_in: f64,
    /// Airflow after diversity (CFM).
    pub design_cfm: f64,
    /// Airflow each floor adds after diversity, bottom floor first (CFM).
    pub floor_design_cfm: Vec<f64>,
    /// Shaft height (ft).
    pub total_height_ft: f64,
}

/// The result of aggregating the floors, including the audit step.
#[derive(Debug, Clone)]
pub struct FloorAggregationResult {
    /// The aggregated totals.
    pub aggregation: FloorAggregation,
    /// The audit step recording the aggregation.
    pub audit_step: AuditStep,
}

/// Aggregates per-floor penetrations into shaft totals.
///
/// The subduct deduction is the largest `penetrations × subduct area` of any
/// single floor, since only one floor's subducts occupy a given section of
/// the shaft. Floors without subducts deduct nothing.
///
/// # Arguments
///
/// * `input` - The building and shaft input
/// * `config` - The sizing configuration providing subduct areas
/// * `step_number` - The audit step number to assign
///
/// # Returns
///
/// Returns the aggregated totals, or `UnknownSubductSize` if a floor names a
/// subduct diameter that is not in the catalog.
pub fn aggregate_floors(
    input: &SizingInput,
    config: &SizerConfig,
    step_number: u32,
) -> EngineResult<FloorAggregationResult> {
    let factor = input.diversity_pct / 100.0;

    let mut total_cfm = 0.0;
    let mut total_penetrations = 0;
    let mut deduction: f64 = 0.0;
    let mut floor_design_cfm = Vec::with_capacity(input.floors.len());

    for floor in &input.floors {
        let floor_cfm = floor.penetrations as f64 * floor.cfm_per_penetration;
        total_cfm += floor_cfm;
        total_penetrations += floor.penetrations;

        if let Some(size) = floor.subduct_size_in {
            let area = floor.penetrations as f64 * config.subduct_area(size)?;
            deduction = deduction.max(area);
        }

        floor_design_cfm.push(floor_cfm * factor);
    }

    let aggregation = FloorAggregation {
        total_cfm,
        total_penetrations,
        subduct_deduction_sq_in: deduction,
        design_cfm: total_cfm * factor,
        floor_design_cfm,
        total_height_ft: input.floor_count() as f64 * input.floor_height_ft,
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "floor_aggregation".to_string(),
        rule_name: "Floor Aggregation".to_string(),
        reference: "Diversity factor and subduct deduction".to_string(),
        input: serde_json::json!({
            "floors": input.floor_count(),
            "floor_height_ft": input.floor_height_ft,
            "diversity_pct": input.diversity_pct,
            "has_subducts": input.has_subducts(),
        }),
        output: serde_json::json!({
            "total_cfm": round_dp(aggregation.total_cfm, FLOW_DP).to_string(),
            "design_cfm": round_dp(aggregation.design_cfm, FLOW_DP).to_string(),
            "total_penetrations": aggregation.total_penetrations,
            "subduct_deduction_sq_in": round_dp(deduction, AREA_DP).to_string(),
            "total_height_ft": aggregation.total_height_ft,
        }),
        reasoning: format!(
            "{} penetrations connect {} CFM; {}% diversity gives a design airflow of {} CFM",
            aggregation.total_penetrations,
            round_dp(aggregation.total_cfm, FLOW_DP),
            input.diversity_pct,
            round_dp(aggregation.design_cfm, FLOW_DP)
        ),
    };

    Ok(FloorAggregationResult {
        aggregation,
        audit_step,
    })
}

/// Returns the summed loss coefficient of the offset elbows.
///
/// Elbows at or above the steep-elbow threshold use the 90° coefficient,
/// shallower ones the 45° coefficient.
///
/// # Examples
///
/// ```
/// use shaft_sizer::calculation::offset_loss_coefficient;
/// use shaft_sizer::config::FittingCoefficients;
/// use shaft_sizer::models::{ElbowAngle, OffsetConfig};
///
/// let fittings = FittingCoefficients {
///     elbow_90: 0.6, elbow_45: 0.3, tee_branch: 0.5, exit: 1.0,
///     entry_bellmouth: 0.03, entry_abrupt: 0.5, steep_elbow_threshold_deg: 60,
/// };
/// let offset = OffsetConfig { elbows: 2, length_ft: 10.0, angle: ElbowAngle::Deg45 };
/// assert!((offset_loss_coefficient(Some(&offset), &fittings) - 0.6).abs() < 1e-12);
/// assert_eq!(offset_loss_coefficient(None, &fittings), 0.0);
/// ```
pub fn offset_loss_coefficient(
    offset: Option<&OffsetConfig>,
    fittings: &FittingCoefficients,
) -> f64 {
    match offset {
        Some(offset) if offset.elbows > 0 => {
            let per_elbow = if offset.angle.degrees() >= fittings.steep_elbow_threshold_deg {
                fittings.elbow_90
            } else {
                fittings.elbow_45
            };
            offset.elbows as f64 * per_elbow
        }
        _ => 0.0,
    }
}

/// The result of the offset fitting calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct OffsetFittingsResult {
    /// Summed loss coefficient of the offset elbows.
    pub k_offset: f64,
    /// The audit step recording the calculation.
    pub audit_step: AuditStep,
}

/// Computes the offset loss coefficient and records it in an audit step.
pub fn calculate_offset_fittings(
    offset: Option<&OffsetConfig>,
    fittings: &FittingCoefficients,
    step_number: u32,
) -> OffsetFittingsResult {
    let k_offset = offset_loss_coefficient(offset, fittings);

    let reasoning = match offset {
        Some(o) => format!(
            "{} elbows at {}° over {} ft give ΣK = {:.2}",
            o.elbows,
            o.angle.degrees(),
            o.length_ft,
            k_offset
        ),
        None => "No offset above the top floor".to_string(),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "offset_fittings".to_string(),
        rule_name: "Offset Fitting Losses".to_string(),
        reference: "ASHRAE fitting loss coefficients".to_string(),
        input: serde_json::json!({
            "elbows": offset.map(|o| o.elbows).unwrap_or(0),
            "angle_deg": offset.map(|o| o.angle.degrees()),
            "length_ft": offset.map(|o| o.length_ft).unwrap_or(0.0),
        }),
        output: serde_json::json!({ "k_offset": k_offset }),
        reasoning,
    };

    OffsetFittingsResult {
        k_offset,
        audit_step,
    }
}
