//! Calculation logic for the shaft sizing engine.
//!
//! This module contains the duct friction and geometry functions, floor
//! aggregation, shaft evaluation under the cumulative and uniform airflow
//! models, the shaft size search, fan and controller selection, the system
//! curve, and [`run_sizing`] which ties them together.

mod airflow;
mod controller_selection;
mod fan_selection;
mod friction;
mod geometry;
mod precision;
mod shaft_evaluation;
mod shaft_search;
mod sizing;
mod system_curve;

pub use airflow::{
    FloorAggregation, FloorAggregationResult, OffsetFittingsResult, aggregate_floors,
    calculate_offset_fittings, offset_loss_coefficient,
};
pub use controller_selection::{ControllerSelectionResult, select_controller};
pub use fan_selection::{FanSelectionResult, cfm_at_sp, select_fan, sp_at_cfm};
pub use friction::{
    LAMINAR_REYNOLDS, colebrook_friction_factor, darcy_pressure_drop, reynolds_number,
    velocity_pressure,
};
pub use geometry::{circular_area, huebscher_equivalent_diameter, hydraulic_diameter_rect};
pub use precision::{AREA_DP, FAN_SP_DP, FLOW_DP, PERCENT_DP, PRESSURE_DP, round_dp, to_f64};
pub use shaft_evaluation::ShaftEvaluator;
pub use shaft_search::{ShaftSearchResult, candidate_shapes, size_shaft};
pub use sizing::run_sizing;
pub use system_curve::{performance_chart, system_curve};
