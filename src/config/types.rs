//! Configuration types for shaft sizing.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{EngineError, EngineResult};

/// Metadata about the exhaust system product line.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SystemMetadata {
    /// Short system code (e.g., "MES").
    pub code: String,
    /// The human-readable name of the system.
    pub name: String,
    /// The manufacturer of the fans and controllers.
    pub manufacturer: String,
    /// Manufacturer website.
    pub website: String,
    /// Manufacturer phone number.
    pub phone: String,
    /// Manufacturer street address.
    pub address: String,
}

/// Properties of the exhaust air and duct wall.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct AirProperties {
    /// Air density in lb/ft³.
    pub density: f64,
    /// Absolute duct roughness in feet.
    pub roughness_ft: f64,
    /// Kinematic viscosity in ft²/s.
    pub kinematic_viscosity: f64,
}

/// Design limits applied to inputs and to the candidate search.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DesignLimits {
    /// Largest allowed bottom-to-top pressure difference target (in. WC).
    pub max_delta_p: f64,
    /// Smallest allowed pressure difference target (in. WC).
    pub min_delta_p: f64,
    /// Maximum number of floors served by one shaft.
    pub max_floors: u32,
    /// Lowest accepted diversity percentage.
    pub min_diversity_pct: f64,
    /// Highest accepted diversity percentage.
    pub max_diversity_pct: f64,
    /// Maximum penetrations per floor.
    pub max_penetrations_per_floor: u32,
    /// Smallest user-specified round diameter (in).
    pub min_user_diameter_in: f64,
    /// Largest user-specified round diameter (in).
    pub max_user_diameter_in: f64,
    /// Smallest user-specified rectangular side (in).
    pub min_user_rect_side_in: f64,
    /// Velocity below which a shaft is not evaluated (FPM).
    pub min_velocity_fpm: f64,
    /// Lower bound (exclusive) of the auto-search velocity window (FPM).
    pub candidate_velocity_min_fpm: f64,
    /// Upper bound (exclusive) of the auto-search velocity window (FPM).
    pub candidate_velocity_max_fpm: f64,
    /// Largest long-side to short-side ratio for rectangular candidates.
    pub max_aspect_ratio: f64,
    /// Number of passing alternatives reported.
    pub max_alternatives: usize,
    /// Number of intervals in the system curve.
    pub system_curve_points: u32,
    /// System curve span as a fraction of design airflow.
    pub system_curve_span: f64,
}

/// System configuration file structure (system.yaml).
#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    /// Product line metadata.
    pub system: SystemMetadata,
    /// Air and duct properties.
    pub air: AirProperties,
    /// Design limits.
    pub limits: DesignLimits,
}

/// Fitting loss coefficients (dimensionless K values).
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct FittingCoefficients {
    /// 90° elbow in a shaft offset.
    pub elbow_90: f64,
    /// 45° elbow in a shaft offset.
    pub elbow_45: f64,
    /// Tee branch entry from a subduct.
    pub tee_branch: f64,
    /// Abrupt exit / fan entry.
    pub exit: f64,
    /// Bellmouth entry at the shaft base.
    pub entry_bellmouth: f64,
    /// Abrupt entry.
    pub entry_abrupt: f64,
    /// Elbow angles at or above this use the 90° coefficient.
    pub steep_elbow_threshold_deg: u32,
}

/// Fittings configuration file structure (fittings.yaml).
#[derive(Debug, Clone, Deserialize)]
pub struct FittingsConfig {
    /// Loss coefficients.
    pub fittings: FittingCoefficients,
}

/// Subduct configuration file structure (subducts.yaml).
#[derive(Debug, Clone, Deserialize)]
pub struct SubductsConfig {
    /// Map of subduct diameter (in) to shaft area removed per penetration (sq.in.).
    pub subducts: BTreeMap<u32, f64>,
}

/// Standard shaft sizes tried by the automatic search.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SizeTable {
    /// Round diameters in inches, ascending.
    pub round_diameters_in: Vec<u32>,
    /// Rectangular side lengths in inches, ascending.
    pub rect_sides_in: Vec<u32>,
}

/// Sizes configuration file structure (sizes.yaml).
#[derive(Debug, Clone, Deserialize)]
pub struct SizesConfig {
    /// The size table.
    pub sizes: SizeTable,
}

/// A constant pressure controller in the catalog.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ControllerSpec {
    /// Catalog model (e.g., "L150.H").
    pub model: String,
    /// Descriptive name.
    pub name: String,
    /// The system this controller belongs to.
    pub system: String,
    /// Accessories shipped with the controller.
    pub accessories: String,
    /// Agency listings.
    pub listings: String,
    /// Highest floor count this controller covers; `None` covers any height.
    #[serde(default)]
    pub max_floors: Option<u32>,
    /// Pressure transducers installed; two straddle the neutral pressure plane.
    #[serde(default = "default_transducers")]
    pub transducers: u32,
    /// Short note explaining the selection rule.
    pub selection_note: String,
}

fn default_transducers() -> u32 {
    1
}

/// Controllers configuration file structure (controllers.yaml).
#[derive(Debug, Clone, Deserialize)]
pub struct ControllersConfig {
    /// Controllers ordered from the smallest coverage upward.
    pub controllers: Vec<ControllerSpec>,
}

/// A single point on a fan performance curve.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct FanCurvePoint {
    /// Airflow in CFM.
    pub cfm: f64,
    /// Static pressure in in. WC.
    pub sp: f64,
}

/// An exhaust fan in the catalog (one file under `fans/`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FanSpec {
    /// Catalog model (e.g., "DEF015").
    pub model: String,
    /// Position in the size order, smallest first.
    pub order: u32,
    /// Supply voltage and phase.
    pub voltage: String,
    /// Motor horsepower.
    pub hp: String,
    /// Motor type.
    pub motor: String,
    /// Full load amps.
    pub amps: String,
    /// Shipping weight.
    pub weight: String,
    /// Inlet diameter.
    pub inlet: String,
    /// Impeller type.
    pub impeller: String,
    /// Nominal speed.
    pub rpm: String,
    /// Performance curve, static pressure ascending.
    pub curve: Vec<FanCurvePoint>,
}

/// The complete sizing configuration loaded from YAML files.
///
/// This struct aggregates all configuration loaded from the various
/// YAML files in a configuration directory.
#[derive(Debug, Clone)]
pub struct SizerConfig {
    metadata: SystemMetadata,
    air: AirProperties,
    limits: DesignLimits,
    fittings: FittingCoefficients,
    subducts: BTreeMap<u32, f64>,
    sizes: SizeTable,
    controllers: Vec<ControllerSpec>,
    /// Fans sorted by `order` (smallest first).
    fans: Vec<FanSpec>,
}

impl SizerConfig {
    /// Creates a new SizerConfig from its component parts.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        metadata: SystemMetadata,
        air: AirProperties,
        limits: DesignLimits,
        fittings: FittingCoefficients,
        subducts: BTreeMap<u32, f64>,
        sizes: SizeTable,
        controllers: Vec<ControllerSpec>,
        fans: Vec<FanSpec>,
    ) -> Self {
        let mut sorted_fans = fans;
        sorted_fans.sort_by_key(|f| f.order);
        Self {
            metadata,
            air,
            limits,
            fittings,
            subducts,
            sizes,
            controllers,
            fans: sorted_fans,
        }
    }

    /// Returns the product line metadata.
    pub fn system(&self) -> &SystemMetadata {
        &self.metadata
    }

    /// Returns the air properties.
    pub fn air(&self) -> &AirProperties {
        &self.air
    }

    /// Returns the design limits.
    pub fn limits(&self) -> &DesignLimits {
        &self.limits
    }

    /// Returns the fitting loss coefficients.
    pub fn fittings(&self) -> &FittingCoefficients {
        &self.fittings
    }

    /// Returns the subduct area table.
    pub fn subducts(&self) -> &BTreeMap<u32, f64> {
        &self.subducts
    }

    /// Returns the standard size table.
    pub fn sizes(&self) -> &SizeTable {
        &self.sizes
    }

    /// Returns the controllers in catalog order.
    pub fn controllers(&self) -> &[ControllerSpec] {
        &self.controllers
    }

    /// Returns the fans, smallest first.
    pub fn fans(&self) -> &[FanSpec] {
        &self.fans
    }

    /// Gets a fan by its catalog model, ignoring case.
    pub fn get_fan(&self, model: &str) -> EngineResult<&FanSpec> {
        self.fans
            .iter()
            .find(|f| f.model.eq_ignore_ascii_case(model))
            .ok_or_else(|| EngineError::FanNotFound {
                model: model.to_string(),
            })
    }

    /// Gets the shaft area removed by one subduct of the given diameter.
    pub fn subduct_area(&self, size: u32) -> EngineResult<f64> {
        self.subducts
            .get(&size)
            .copied()
            .ok_or(EngineError::UnknownSubductSize { size })
    }

    /// Gets the controller covering a building with `floors` floors.
    ///
    /// The first controller whose `max_floors` covers the floor count wins;
    /// otherwise the entry without a limit is used.
    pub fn controller_for(&self, floors: u32) -> EngineResult<&ControllerSpec> {
        self.controllers
            .iter()
            .find(|c| c.max_floors.is_some_and(|max| floors <= max))
            .or_else(|| self.controllers.iter().find(|c| c.max_floors.is_none()))
            .ok_or_else(|| EngineError::CalculationError {
                message: format!("No controller covers a {}-floor building", floors),
            })
    }
}
