//! Constant pressure controller selection.

use crate::config::SizerConfig;
use crate::error::EngineResult;
use crate::models::{AuditStep, ControllerSelection};

/// The result of a controller selection, including the audit step.
#[derive(Debug, Clone)]
pub struct ControllerSelectionResult {
    /// The selected controller.
    pub selection: ControllerSelection,
    /// The audit step recording the selection.
    pub audit_step: AuditStep,
}

/// Selects the constant pressure controller for a building height.
///
/// Low-rise buildings get the single-sensor controller; taller buildings
/// need the dual-sensor controller to deal with stack effect. The floor
/// limits come from the controller catalog.
///
/// # Arguments
///
/// * `floors` - Number of floors served by the shaft
/// * `config` - The sizing configuration providing the controller catalog
/// * `step_number` - The audit step number to assign
pub fn select_controller(
    floors: u32,
    config: &SizerConfig,
    step_number: u32,
) -> EngineResult<ControllerSelectionResult> {
    let spec = config.controller_for(floors)?;
    let reason = format!("{} stories ({})", floors, spec.selection_note);

    let selection = ControllerSelection {
        model: spec.model.clone(),
        name: spec.name.clone(),
        system: spec.system.clone(),
        accessories: spec.accessories.clone(),
        listings: spec.listings.clone(),
        transducers: spec.transducers,
        reason: reason.clone(),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "controller_selection".to_string(),
        rule_name: "Controller Selection".to_string(),
        reference: "Controller catalog floor limits".to_string(),
        input: serde_json::json!({ "floors": floors }),
        output: serde_json::json!({
            "model": selection.model,
            "max_floors": spec.max_floors,
        }),
        reasoning: reason,
    };

    Ok(ControllerSelectionResult {
        selection,
        audit_step,
    })
}
