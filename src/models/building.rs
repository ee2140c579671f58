//! Building and shaft input models.
//!
//! This module defines the [`SizingInput`] struct and the types that make it
//! up: the exhaust type, per-floor penetrations, the optional offset above the
//! top floor, and how the shaft should be sized.

use serde::{Deserialize, Serialize};

use crate::config::SizerConfig;
use crate::error::{EngineError, EngineResult};

/// The kind of exhaust the shaft serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustType {
    /// Clothes dryer exhaust.
    ClothesDryers,
    /// Bathroom exhaust.
    BathroomExhaust,
    /// Kitchen hood exhaust.
    KitchenHoodExhaust,
}

impl ExhaustType {
    /// Recognizes an exhaust type from free text ("dryers", "bath", "hood").
    ///
    /// # Examples
    ///
    /// ```
    /// use shaft_sizer::models::ExhaustType;
    ///
    /// assert_eq!(ExhaustType::from_keyword("Dryers"), Some(ExhaustType::ClothesDryers));
    /// assert_eq!(ExhaustType::from_keyword("range hood"), Some(ExhaustType::KitchenHoodExhaust));
    /// assert_eq!(ExhaustType::from_keyword("garage"), None);
    /// ```
    pub fn from_keyword(text: &str) -> Option<Self> {
        let lc = text.to_lowercase();
        if lc.contains("dryer") {
            Some(Self::ClothesDryers)
        } else if lc.contains("bath") {
            Some(Self::BathroomExhaust)
        } else if lc.contains("kitchen") || lc.contains("hood") {
            Some(Self::KitchenHoodExhaust)
        } else {
            None
        }
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ClothesDryers => "Clothes Dryers",
            Self::BathroomExhaust => "Bathroom Exhaust",
            Self::KitchenHoodExhaust => "Kitchen Hood Exhaust",
        }
    }

    /// Returns the recommended exhaust fan family for this exhaust type.
    pub fn recommended_fan(&self) -> &'static str {
        match self {
            Self::ClothesDryers => "DEF (Dryer Exhaust Fan)",
            Self::BathroomExhaust => "DEF or inline exhaust fan",
            Self::KitchenHoodExhaust => "DEF or rated kitchen hood exhaust fan",
        }
    }

    /// Returns the recommended booster, if the exhaust type uses one.
    pub fn recommended_booster(&self) -> Option<&'static str> {
        match self {
            Self::ClothesDryers => Some("DBF (Dryer Booster Fan) - if needed"),
            _ => None,
        }
    }
}

/// Penetrations into the shaft on a single floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorConfig {
    /// Number of penetrations (openings) on this floor.
    pub penetrations: u32,
    /// Subduct diameter in inches; `None` for plain wall openings.
    #[serde(default)]
    pub subduct_size_in: Option<u32>,
    /// Airflow per penetration in CFM.
    pub cfm_per_penetration: f64,
}

/// Elbow angle used in a shaft offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ElbowAngle {
    /// 45° elbows.
    Deg45,
    /// 90° elbows.
    Deg90,
}

impl ElbowAngle {
    /// Returns the angle in degrees.
    pub fn degrees(&self) -> u32 {
        match self {
            Self::Deg45 => 45,
            Self::Deg90 => 90,
        }
    }
}

impl TryFrom<u32> for ElbowAngle {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            45 => Ok(Self::Deg45),
            90 => Ok(Self::Deg90),
            other => Err(format!("elbow angle must be 45 or 90, got {}", other)),
        }
    }
}

impl From<ElbowAngle> for u32 {
    fn from(angle: ElbowAngle) -> Self {
        angle.degrees()
    }
}

/// A shaft offset above the highest floor penetration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffsetConfig {
    /// Number of elbows in the offset.
    pub elbows: u32,
    /// Total length of the offset section in feet.
    pub length_ft: f64,
    /// Elbow angle.
    #[serde(default = "default_elbow_angle")]
    pub angle: ElbowAngle,
}

fn default_elbow_angle() -> ElbowAngle {
    ElbowAngle::Deg90
}

/// How the shaft cross-section is chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SizingMode {
    /// Search the standard round diameters.
    RoundAuto,
    /// Search the standard rectangular sizes.
    RectAuto,
    /// Evaluate a user-specified round diameter.
    RoundUser {
        /// Diameter in inches.
        diameter_in: f64,
    },
    /// Evaluate a user-specified rectangular size.
    RectUser {
        /// First side in inches.
        width_in: f64,
        /// Second side in inches.
        height_in: f64,
    },
}

impl SizingMode {
    /// Returns the keyword used for this mode by the conversational front end.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::RoundAuto => "round_auto",
            Self::RectAuto => "rect_auto",
            Self::RoundUser { .. } => "round_user",
            Self::RectUser { .. } => "rect_user",
        }
    }
}

/// How airflow is distributed along the shaft height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowModel {
    /// Fan on the roof; each floor adds its airflow, so the shaft carries
    /// the cumulative airflow of the floors below each section.
    #[default]
    Cumulative,
    /// The full design airflow travels the whole shaft height.
    Uniform,
}

/// Project identification printed on reports.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectInfo {
    /// Project name.
    pub name: String,
    /// City and state.
    #[serde(default)]
    pub location: String,
    /// Contact of the person preparing the sizing.
    #[serde(default)]
    pub prepared_by: String,
}

/// Everything needed to size one exhaust shaft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingInput {
    /// Optional project identification.
    #[serde(default)]
    pub project: Option<ProjectInfo>,
    /// The exhaust served by the shaft.
    pub exhaust_type: ExhaustType,
    /// Floors with penetrations, bottom floor first.
    pub floors: Vec<FloorConfig>,
    /// Floor-to-floor height in feet.
    pub floor_height_ft: f64,
    /// Duct length from the top penetration to the fan in feet.
    #[serde(default)]
    pub duct_after_last_ft: f64,
    /// Percentage of penetrations active simultaneously.
    #[serde(default = "default_diversity_pct")]
    pub diversity_pct: f64,
    /// Offset above the top floor, if any.
    #[serde(default)]
    pub offset: Option<OffsetConfig>,
    /// How the cross-section is chosen.
    pub sizing: SizingMode,
    /// Allowed pressure difference between bottom and top floors (in. WC).
    #[serde(default = "default_max_delta_p")]
    pub max_delta_p: f64,
    /// Airflow distribution model.
    #[serde(default)]
    pub flow_model: FlowModel,
}

fn default_diversity_pct() -> f64 {
    100.0
}

fn default_max_delta_p() -> f64 {
    0.25
}

impl SizingInput {
    /// Returns the number of floors served.
    pub fn floor_count(&self) -> u32 {
        self.floors.len() as u32
    }

    /// Returns true if any floor connects through subducts.
    pub fn has_subducts(&self) -> bool {
        self.floors.iter().any(|f| f.subduct_size_in.is_some())
    }

    /// Checks every field against the design limits and the subduct table.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] naming the first offending field.
    pub fn validate(&self, config: &SizerConfig) -> EngineResult<()> {
        let limits = config.limits();

        if self.floors.is_empty() {
            return Err(EngineError::invalid("floors", "at least one floor is required"));
        }
        if self.floors.len() > limits.max_floors as usize {
            return Err(EngineError::invalid(
                "floors",
                format!("at most {} floors are supported", limits.max_floors),
            ));
        }

        for (i, floor) in self.floors.iter().enumerate() {
            if floor.penetrations == 0 || floor.penetrations > limits.max_penetrations_per_floor
            {
                return Err(EngineError::invalid(
                    format!("floors[{}].penetrations", i),
                    format!(
                        "must be between 1 and {}",
                        limits.max_penetrations_per_floor
                    ),
                ));
            }
            if let Some(size) = floor.subduct_size_in {
                if !config.subducts().contains_key(&size) {
                    let sizes: Vec<String> =
                        config.subducts().keys().map(|s| s.to_string()).collect();
                    return Err(EngineError::invalid(
                        format!("floors[{}].subduct_size_in", i),
                        format!("must be one of {}", sizes.join(", ")),
                    ));
                }
            }
            if !(floor.cfm_per_penetration.is_finite() && floor.cfm_per_penetration > 0.0) {
                return Err(EngineError::invalid(
                    format!("floors[{}].cfm_per_penetration", i),
                    "must be greater than 0",
                ));
            }
        }

        if !(self.floor_height_ft.is_finite() && self.floor_height_ft > 0.0) {
            return Err(EngineError::invalid(
                "floor_height_ft",
                "must be greater than 0",
            ));
        }
        if !(self.duct_after_last_ft.is_finite() && self.duct_after_last_ft >= 0.0) {
            return Err(EngineError::invalid(
                "duct_after_last_ft",
                "must be 0 or greater",
            ));
        }
        if !(limits.min_diversity_pct..=limits.max_diversity_pct).contains(&self.diversity_pct) {
            return Err(EngineError::invalid(
                "diversity_pct",
                format!(
                    "must be between {} and {}",
                    limits.min_diversity_pct, limits.max_diversity_pct
                ),
            ));
        }

        if let Some(offset) = &self.offset {
            if offset.elbows == 0 {
                return Err(EngineError::invalid("offset.elbows", "must be at least 1"));
            }
            if !(offset.length_ft.is_finite() && offset.length_ft >= 0.0) {
                return Err(EngineError::invalid("offset.length_ft", "must be 0 or greater"));
            }
        }

        match self.sizing {
            SizingMode::RoundUser { diameter_in } => {
                let range = limits.min_user_diameter_in..=limits.max_user_diameter_in;
                if !range.contains(&diameter_in) {
                    return Err(EngineError::invalid(
                        "sizing.diameter_in",
                        format!(
                            "must be between {} and {} inches",
                            limits.min_user_diameter_in, limits.max_user_diameter_in
                        ),
                    ));
                }
            }
            SizingMode::RectUser {
                width_in,
                height_in,
            } => {
                let min = limits.min_user_rect_side_in;
                if !(width_in >= min && height_in >= min) {
                    return Err(EngineError::invalid(
                        "sizing",
                        format!("both sides must be at least {} inches", min),
                    ));
                }
            }
            SizingMode::RoundAuto | SizingMode::RectAuto => {}
        }

        if !(limits.min_delta_p..=limits.max_delta_p).contains(&self.max_delta_p) {
            return Err(EngineError::invalid(
                "max_delta_p",
                format!(
                    "must be between {} and {} in. WC",
                    limits.min_delta_p, limits.max_delta_p
                ),
            ));
        }

        Ok(())
    }
}
