//! Equipment selection models.
//!
//! This module defines the fan and controller selections made for a sized
//! shaft, and the curve data used to plot fan performance against the
//! system resistance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::FanSpec;

/// The exhaust fan chosen for a shaft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanSelection {
    /// Catalog model.
    pub model: String,
    /// Number of fans.
    pub quantity: u32,
    /// Whether several fans run in parallel.
    pub parallel: bool,
    /// Design airflow (CFM).
    pub design_cfm: Decimal,
    /// Airflow each fan carries when running in parallel (CFM).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cfm_per_fan: Option<Decimal>,
    /// System static pressure at design airflow (in. WC).
    pub system_sp: Decimal,
    /// Airflow the selection delivers at the system static pressure (CFM).
    pub available_cfm: Decimal,
    /// Static pressure on the fan curve at the airflow per fan (in. WC).
    pub operating_sp: Decimal,
    /// Spare capacity over the design airflow (%).
    pub margin_pct: Decimal,
    /// Catalog data for the fan.
    pub specs: FanSpec,
}

impl FanSelection {
    /// Returns the model with its quantity prefix (e.g., `3x DEF050`).
    pub fn display_model(&self) -> String {
        if self.quantity > 1 {
            format!("{}x {}", self.quantity, self.model)
        } else {
            self.model.clone()
        }
    }
}

/// The constant pressure controller chosen for a shaft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerSelection {
    /// Catalog model.
    pub model: String,
    /// Descriptive name.
    pub name: String,
    /// The system this controller belongs to.
    pub system: String,
    /// Accessories shipped with the controller.
    pub accessories: String,
    /// Agency listings.
    pub listings: String,
    /// Pressure transducers installed.
    pub transducers: u32,
    /// Why this controller was selected.
    pub reason: String,
}

/// A point on a fan or system curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Airflow (CFM).
    pub cfm: Decimal,
    /// Static pressure (in. WC).
    pub sp: Decimal,
}

/// Data for plotting the fan curve against the system curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceChart {
    /// Legend label of the fan curve.
    pub fan_label: String,
    /// Fan curve, airflow scaled by the number of parallel fans.
    pub fan_curve: Vec<CurvePoint>,
    /// System resistance curve.
    pub system_curve: Vec<CurvePoint>,
    /// Design operating point.
    pub operating_point: CurvePoint,
}
