//! Shaft evaluation models.
//!
//! A [`ShaftEvaluation`] captures every reported quantity for one candidate
//! cross-section; a [`SizingOutcome`] holds the recommended size and the
//! passing alternatives found by the search.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The cross-section of a shaft.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShaftShape {
    /// Round shaft.
    Round {
        /// Diameter in inches.
        diameter_in: f64,
    },
    /// Rectangular shaft, long side first.
    Rectangular {
        /// Long side in inches.
        width_in: f64,
        /// Short side in inches.
        height_in: f64,
    },
}

impl ShaftShape {
    /// Builds a rectangular shape with the long side first.
    pub fn rectangular(a: f64, b: f64) -> Self {
        Self::Rectangular {
            width_in: a.max(b),
            height_in: a.min(b),
        }
    }

    /// Returns true for round shafts.
    pub fn is_round(&self) -> bool {
        matches!(self, Self::Round { .. })
    }

    /// Returns the label used in reports.
    ///
    /// # Examples
    ///
    /// ```
    /// use shaft_sizer::models::ShaftShape;
    ///
    /// assert_eq!(ShaftShape::Round { diameter_in: 12.0 }.label(), "12\" Round");
    /// assert_eq!(ShaftShape::rectangular(12.0, 24.0).label(), "24\" × 12\" Rect");
    /// ```
    pub fn label(&self) -> String {
        match self {
            Self::Round { diameter_in } => format!("{}\" Round", format_inches(*diameter_in)),
            Self::Rectangular {
                width_in,
                height_in,
            } => format!(
                "{}\" × {}\" Rect",
                format_inches(*width_in),
                format_inches(*height_in)
            ),
        }
    }
}

fn format_inches(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

/// Airflow and pressure in the shaft at one floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorSection {
    /// Floor number, 1 at the bottom.
    pub floor: u32,
    /// Airflow carried by the shaft section above this floor (CFM).
    pub cumulative_cfm: Decimal,
    /// Velocity in the section above this floor (FPM).
    pub velocity_fpm: Decimal,
    /// Friction loss across the section above this floor (in. WC).
    pub section_dp: Decimal,
    /// Pressure drop accumulated at this floor (in. WC).
    pub accumulated_dp: Decimal,
}

/// The evaluation of one candidate shaft size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaftEvaluation {
    /// Display label (e.g., `14" Round`).
    pub label: String,
    /// The cross-section.
    pub shape: ShaftShape,
    /// Gross cross-section area (sq.in.).
    pub gross_area_sq_in: Decimal,
    /// Area left after subduct deductions (sq.in.).
    pub effective_area_sq_in: Decimal,
    /// Hydraulic diameter used for friction (in).
    pub hydraulic_diameter_in: Decimal,
    /// Round duct of equal friction (Huebscher) for rectangular shafts (in).
    pub equivalent_diameter_in: Decimal,
    /// Maximum shaft velocity (FPM).
    pub velocity_fpm: Decimal,
    /// Velocity pressure at the maximum velocity (in. WC).
    pub velocity_pressure: Decimal,
    /// Shaft friction loss (in. WC).
    pub dp_shaft: Decimal,
    /// Loss in the duct after the last penetration (in. WC).
    pub dp_after: Decimal,
    /// Offset friction and fitting loss (in. WC).
    pub dp_offset: Decimal,
    /// Entry loss at the shaft base (in. WC).
    pub dp_entry: Decimal,
    /// Exit / fan entry loss (in. WC).
    pub dp_exit: Decimal,
    /// Total system pressure drop the fan must overcome (in. WC).
    pub dp_total: Decimal,
    /// Pressure drop seen at the bottom floor (in. WC).
    pub dp_bottom: Decimal,
    /// Pressure drop seen at the top floor (in. WC).
    pub dp_top: Decimal,
    /// Bottom-to-top pressure difference (in. WC).
    pub delta_p: Decimal,
    /// Whether `delta_p` is within the allowed difference.
    pub passes: bool,
    /// Connected airflow of all penetrations (CFM).
    pub total_cfm: Decimal,
    /// Airflow after diversity (CFM).
    pub design_cfm: Decimal,
    /// Number of penetrations.
    pub total_penetrations: u32,
    /// Shaft height (ft).
    pub total_height_ft: Decimal,
    /// Per-floor breakdown, bottom floor first.
    pub floors: Vec<FloorSection>,
}

/// The result of a shaft size search.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SizingOutcome {
    /// The recommended size, if any candidate was viable.
    pub best: Option<ShaftEvaluation>,
    /// Passing alternatives, smallest first.
    pub alternatives: Vec<ShaftEvaluation>,
    /// Number of candidate sizes evaluated.
    pub candidates_evaluated: usize,
}
