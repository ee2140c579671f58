//! The complete sizing run.
//!
//! [`run_sizing`] validates the input, sizes the shaft and selects the
//! equipment for it, recording one audit step per rule applied.

use std::time::Instant;

use chrono::Utc;
use uuid::Uuid;

use crate::config::SizerConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditTrace, AuditWarning, SizingInput, SizingMode, SizingResult};

use super::airflow::{aggregate_floors, calculate_offset_fittings};
use super::controller_selection::select_controller;
use super::fan_selection::select_fan;
use super::precision::to_f64;
use super::shaft_evaluation::ShaftEvaluator;
use super::shaft_search::size_shaft;
use super::system_curve::{performance_chart, system_curve};

/// Sizes a shaft and selects its fan and controller.
///
/// # Arguments
///
/// * `input` - The building and shaft input
/// * `config` - The sizing configuration
///
/// # Returns
///
/// Returns the complete [`SizingResult`], or an error if:
/// - The input is invalid (`InvalidInput`)
/// - No candidate size is viable (`NoViableShaft`)
/// - The equipment catalog cannot serve the shaft (`CalculationError`)
///
/// A best size that exceeds the ΔP limit is still returned, with a warning
/// in the audit trace.
pub fn run_sizing(input: &SizingInput, config: &SizerConfig) -> EngineResult<SizingResult> {
    let start_time = Instant::now();
    input.validate(config)?;

    let mut steps = Vec::new();
    let mut warnings = Vec::new();
    let mut step_number: u32 = 1;

    let aggregation_result = aggregate_floors(input, config, step_number)?;
    let aggregation = aggregation_result.aggregation;
    steps.push(aggregation_result.audit_step);
    step_number += 1;

    let offset_result =
        calculate_offset_fittings(input.offset.as_ref(), config.fittings(), step_number);
    steps.push(offset_result.audit_step);
    step_number += 1;

    let evaluator = ShaftEvaluator::new(input, config, &aggregation, offset_result.k_offset);
    let search = size_shaft(
        &evaluator,
        &input.sizing,
        config.sizes(),
        config.limits(),
        step_number,
    );
    steps.push(search.audit_step);
    step_number += 1;

    let shaft = search
        .outcome
        .best
        .ok_or_else(|| no_viable_shaft(&input.sizing, config))?;
    let alternatives = search.outcome.alternatives;

    if !shaft.passes {
        warnings.push(AuditWarning {
            code: "DELTA_P_EXCEEDED".to_string(),
            message: format!(
                "{} has a bottom-to-top ΔP of {} in. WC, above the {} in. WC limit",
                shaft.label, shaft.delta_p, input.max_delta_p
            ),
            severity: "high".to_string(),
        });
    }

    let design_cfm = to_f64(shaft.design_cfm);
    let system_sp = to_f64(shaft.dp_total);

    let fan_result = select_fan(design_cfm, system_sp, config.fans(), step_number)?;
    let fan = fan_result.selection;
    steps.push(fan_result.audit_step);
    step_number += 1;

    if fan.parallel {
        warnings.push(AuditWarning {
            code: "PARALLEL_FANS".to_string(),
            message: format!(
                "{} fans are required in parallel; each carries {} CFM",
                fan.display_model(),
                fan.cfm_per_fan.unwrap_or_default()
            ),
            severity: "medium".to_string(),
        });
    }

    let controller_result = select_controller(input.floor_count(), config, step_number)?;
    steps.push(controller_result.audit_step);

    let limits = config.limits();
    let curve = system_curve(
        design_cfm,
        system_sp,
        limits.system_curve_points,
        limits.system_curve_span,
    );
    let chart = performance_chart(&fan, &fan.specs, curve);

    let duration_us = start_time.elapsed().as_micros() as u64;

    tracing::info!(
        shaft = %shaft.label,
        passes = shaft.passes,
        delta_p = %shaft.delta_p,
        fan = %fan.display_model(),
        controller = %controller_result.selection.model,
        duration_us,
        "Sizing completed"
    );

    Ok(SizingResult {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        input: input.clone(),
        shaft,
        alternatives,
        fan,
        controller: controller_result.selection,
        chart,
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us,
        },
    })
}

fn no_viable_shaft(mode: &SizingMode, config: &SizerConfig) -> EngineError {
    let limits = config.limits();
    let reason = match mode {
        SizingMode::RoundAuto | SizingMode::RectAuto => format!(
            "no standard size gives a shaft velocity between {} and {} FPM",
            limits.candidate_velocity_min_fpm, limits.candidate_velocity_max_fpm
        ),
        SizingMode::RoundUser { .. } | SizingMode::RectUser { .. } => format!(
            "the requested size leaves no free area after subducts or runs below {} FPM",
            limits.min_velocity_fpm
        ),
    };
    EngineError::NoViableShaft { reason }
}
