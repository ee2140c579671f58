//! Sizing result models for the shaft sizing engine.
//!
//! This module contains the [`SizingResult`] type and the audit structures
//! that record every rule applied while sizing a shaft.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ControllerSelection, FanSelection, PerformanceChart, ShaftEvaluation, SizingInput};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The engineering basis for this rule (e.g., "ASHRAE Fundamentals Ch. 21").
    pub reference: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during sizing.
///
/// Warnings flag results that are usable but need an engineer's attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a sizing run.
///
/// # Example
///
/// ```
/// use shaft_sizer::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     duration_us: 1234,
/// };
/// assert!(trace.steps.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during sizing.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The complete result of sizing one shaft.
///
/// Holds the recommended shaft, the passing alternatives, the equipment
/// selected for it and the data needed to plot its operating point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizingResult {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The input the shaft was sized for.
    pub input: SizingInput,
    /// The recommended shaft.
    pub shaft: ShaftEvaluation,
    /// Passing alternatives, smallest first.
    pub alternatives: Vec<ShaftEvaluation>,
    /// The exhaust fan selection.
    pub fan: FanSelection,
    /// The constant pressure controller selection.
    pub controller: ControllerSelection,
    /// Fan and system curves.
    pub chart: PerformanceChart,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

impl SizingResult {
    /// Returns the warnings raised while sizing.
    pub fn warnings(&self) -> &[AuditWarning] {
        &self.audit_trace.warnings
    }
}
