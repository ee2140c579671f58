//! Configuration loading and management for the shaft sizing engine.
//!
//! This module provides functionality to load the equipment catalog and
//! design constants from YAML files: air properties, fitting coefficients,
//! subduct deductions, standard sizes, controllers and fan curves.
//!
//! # Example
//!
//! ```no_run
//! use shaft_sizer::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/lf_systems").unwrap();
//! println!("Loaded system: {}", config.system().name);
//! ```

#[cfg(test)]
pub(crate) mod fixtures;
mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AirProperties, ControllerSpec, DesignLimits, FanCurvePoint, FanSpec, FittingCoefficients,
    SizeTable, SizerConfig, SystemMetadata,
};
