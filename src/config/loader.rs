//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the equipment
//! catalog and design constants from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{
    ControllerSpec, ControllersConfig, FanSpec, FittingsConfig, SizerConfig, SizesConfig,
    SubductsConfig, SystemConfig, SystemMetadata,
};

/// Loads and provides access to the sizing configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and provides methods to query fans, subducts and controllers.
///
/// # Directory Structure
///
/// ```text
/// config/lf_systems/
/// ├── system.yaml       # Product line metadata, air properties, design limits
/// ├── fittings.yaml     # Fitting loss coefficients
/// ├── subducts.yaml     # Subduct area deductions
/// ├── sizes.yaml        # Standard round and rectangular sizes
/// ├── controllers.yaml  # Constant pressure controllers
/// └── fans/
///     └── DEF004.yaml   # One file per fan, with its performance curve
/// ```
///
/// # Example
///
/// ```no_run
/// use shaft_sizer::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/lf_systems").unwrap();
/// let fan = loader.get_fan("DEF015").unwrap();
/// println!("{} draws {} at {}", fan.model, fan.amps, fan.voltage);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: SizerConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The `fans/` directory holds no fan files
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let system = Self::load_yaml::<SystemConfig>(&path.join("system.yaml"))?;
        let fittings = Self::load_yaml::<FittingsConfig>(&path.join("fittings.yaml"))?;
        let subducts = Self::load_yaml::<SubductsConfig>(&path.join("subducts.yaml"))?;
        let sizes = Self::load_yaml::<SizesConfig>(&path.join("sizes.yaml"))?;
        let controllers = Self::load_yaml::<ControllersConfig>(&path.join("controllers.yaml"))?;
        let fans = Self::load_fans(&path.join("fans"))?;

        let config = SizerConfig::new(
            system.system,
            system.air,
            system.limits,
            fittings.fittings,
            subducts.subducts,
            sizes.sizes,
            controllers.controllers,
            fans,
        );

        tracing::debug!(
            path = %path.display(),
            fans = config.fans().len(),
            controllers = config.controllers().len(),
            "Loaded sizing configuration"
        );

        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: SizerConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all fan files from the fans directory.
    fn load_fans(fans_dir: &Path) -> EngineResult<Vec<FanSpec>> {
        let fans_dir_str = fans_dir.display().to_string();

        let entries = fs::read_dir(fans_dir).map_err(|_| EngineError::ConfigNotFound {
            path: fans_dir_str.clone(),
        })?;

        let mut fans = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: fans_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let fan = Self::load_yaml::<FanSpec>(&path)?;
                if fan.curve.is_empty() {
                    return Err(EngineError::ConfigParseError {
                        path: path.display().to_string(),
                        message: "fan curve has no points".to_string(),
                    });
                }
                fans.push(fan);
            }
        }

        if fans.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no fan files found)", fans_dir_str),
            });
        }

        Ok(fans)
    }

    /// Returns the underlying sizing configuration.
    pub fn config(&self) -> &SizerConfig {
        &self.config
    }

    /// Returns the product line metadata.
    pub fn system(&self) -> &SystemMetadata {
        self.config.system()
    }

    /// Gets a fan by its catalog model.
    pub fn get_fan(&self, model: &str) -> EngineResult<&FanSpec> {
        self.config.get_fan(model)
    }

    /// Gets the shaft area removed by one subduct of the given diameter.
    pub fn subduct_area(&self, size: u32) -> EngineResult<f64> {
        self.config.subduct_area(size)
    }

    /// Gets the controller covering a building with `floors` floors.
    pub fn controller_for(&self, floors: u32) -> EngineResult<&ControllerSpec> {
        self.config.controller_for(floors)
    }
}
