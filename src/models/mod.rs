//! Core data models for the shaft sizing engine.
//!
//! This module contains all the domain models used throughout the engine.

mod building;
mod equipment;
mod evaluation;
mod sizing_result;

pub use building::{
    ElbowAngle, ExhaustType, FloorConfig, FlowModel, OffsetConfig, ProjectInfo, SizingInput,
    SizingMode,
};
pub use equipment::{ControllerSelection, CurvePoint, FanSelection, PerformanceChart};
pub use evaluation::{FloorSection, ShaftEvaluation, ShaftShape, SizingOutcome};
pub use sizing_result::{AuditStep, AuditTrace, AuditWarning, SizingResult};
