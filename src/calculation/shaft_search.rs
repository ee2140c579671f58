//! Shaft size search.
//!
//! Automatic modes walk the standard size table, keep the candidates whose
//! velocity is in the practical window, and pick the smallest passing size.
//! User modes evaluate the single size that was asked for.

use crate::config::{DesignLimits, SizeTable};
use crate::models::{AuditStep, ShaftEvaluation, ShaftShape, SizingMode, SizingOutcome};

use super::precision::to_f64;
use super::shaft_evaluation::ShaftEvaluator;

/// The result of a shaft size search, including the audit step.
#[derive(Debug, Clone)]
pub struct ShaftSearchResult {
    /// The recommended size and passing alternatives.
    pub outcome: SizingOutcome,
    /// The audit step recording the search.
    pub audit_step: AuditStep,
}

/// Lists the cross-sections a sizing mode considers, in search order.
///
/// Rectangular candidates have the long side first and skip aspect ratios
/// above `max_aspect_ratio`.
///
/// # Examples
///
/// ```
/// use shaft_sizer::calculation::candidate_shapes;
/// use shaft_sizer::config::SizeTable;
/// use shaft_sizer::models::{ShaftShape, SizingMode};
///
/// let sizes = SizeTable { round_diameters_in: vec![8, 10], rect_sides_in: vec![6, 8, 30] };
/// let shapes = candidate_shapes(&SizingMode::RectAuto, &sizes, 4.0);
/// assert_eq!(shapes.len(), 5);
/// assert_eq!(shapes[1], ShaftShape::rectangular(8.0, 6.0));
/// ```
pub fn candidate_shapes(
    mode: &SizingMode,
    sizes: &SizeTable,
    max_aspect_ratio: f64,
) -> Vec<ShaftShape> {
    match *mode {
        SizingMode::RoundAuto => sizes
            .round_diameters_in
            .iter()
            .map(|&d| ShaftShape::Round {
                diameter_in: d as f64,
            })
            .collect(),
        SizingMode::RectAuto => {
            let mut shapes = Vec::new();
            for &a in &sizes.rect_sides_in {
                for &b in &sizes.rect_sides_in {
                    if b > a || a as f64 / b as f64 > max_aspect_ratio {
                        continue;
                    }
                    shapes.push(ShaftShape::Rectangular {
                        width_in: a as f64,
                        height_in: b as f64,
                    });
                }
            }
            shapes
        }
        SizingMode::RoundUser { diameter_in } => vec![ShaftShape::Round { diameter_in }],
        SizingMode::RectUser {
            width_in,
            height_in,
        } => vec![ShaftShape::rectangular(width_in, height_in)],
    }
}

/// Searches for the recommended shaft size.
///
/// In the automatic modes, viable candidates are kept only when their
/// rounded velocity lies strictly inside the candidate velocity window, then
/// ordered by gross area (ties keep search order). The best size is the
/// smallest passing candidate, or the largest candidate when none passes.
/// Alternatives are the first passing candidates, up to `max_alternatives`.
///
/// In the user modes the single requested size is evaluated and, when
/// viable, is both the best size and the only alternative.
///
/// # Arguments
///
/// * `evaluator` - The evaluator bound to the building input
/// * `mode` - How the cross-section is chosen
/// * `sizes` - The standard size table
/// * `limits` - Design limits (velocity window, aspect ratio, alternatives)
/// * `step_number` - The audit step number to assign
pub fn size_shaft(
    evaluator: &ShaftEvaluator<'_>,
    mode: &SizingMode,
    sizes: &SizeTable,
    limits: &DesignLimits,
    step_number: u32,
) -> ShaftSearchResult {
    let shapes = candidate_shapes(mode, sizes, limits.max_aspect_ratio);
    let candidates_evaluated = shapes.len();

    let (best, alternatives, viable) = match mode {
        SizingMode::RoundAuto | SizingMode::RectAuto => {
            let mut results: Vec<ShaftEvaluation> = shapes
                .into_iter()
                .filter_map(|shape| evaluator.evaluate(shape))
                .filter(|e| {
                    let velocity = to_f64(e.velocity_fpm);
                    velocity > limits.candidate_velocity_min_fpm
                        && velocity < limits.candidate_velocity_max_fpm
                })
                .collect();
            results.sort_by_key(|e| e.gross_area_sq_in);

            let passing: Vec<ShaftEvaluation> =
                results.iter().filter(|e| e.passes).cloned().collect();
            let best = passing.first().or(results.last()).cloned();
            let viable = results.len();
            let alternatives = passing.into_iter().take(limits.max_alternatives).collect();
            (best, alternatives, viable)
        }
        SizingMode::RoundUser { .. } | SizingMode::RectUser { .. } => {
            let best = shapes.into_iter().next().and_then(|s| evaluator.evaluate(s));
            let alternatives: Vec<ShaftEvaluation> = best.iter().cloned().collect();
            let viable = alternatives.len();
            (best, alternatives, viable)
        }
    };

    let reasoning = match &best {
        Some(b) if b.passes => format!(
            "{} is the smallest of {} viable sizes with ΔP {} ≤ {} in. WC",
            b.label,
            viable,
            b.delta_p,
            evaluator.max_delta_p()
        ),
        Some(b) => format!(
            "No size meets the ΔP limit; {} is the largest viable size with ΔP {} in. WC",
            b.label, b.delta_p
        ),
        None => format!("None of the {} candidate sizes is viable", candidates_evaluated),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "shaft_search".to_string(),
        rule_name: "Shaft Size Search".to_string(),
        reference: "Darcy-Weisbach with Colebrook friction factor".to_string(),
        input: serde_json::json!({
            "mode": mode.keyword(),
            "flow_model": evaluator.flow_model(),
            "candidates": candidates_evaluated,
        }),
        output: serde_json::json!({
            "best": best.as_ref().map(|b| b.label.clone()),
            "passes": best.as_ref().map(|b| b.passes),
            "delta_p": best.as_ref().map(|b| b.delta_p.to_string()),
            "viable": viable,
            "alternatives": alternatives.iter().map(|a| a.label.clone()).collect::<Vec<_>>(),
        }),
        reasoning,
    };

    ShaftSearchResult {
        outcome: SizingOutcome {
            best,
            alternatives,
            candidates_evaluated,
        },
        audit_step,
    }
}
