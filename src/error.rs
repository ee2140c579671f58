//! Error types for the shaft sizing engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while sizing an exhaust shaft.

use thiserror::Error;

/// The main error type for the shaft sizing engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use shaft_sizer::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/system.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/system.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Fan model was not found in the equipment catalog.
    #[error("Fan model not found: {model}")]
    FanNotFound {
        /// The fan model that was not found.
        model: String,
    },

    /// Subduct size has no area deduction in the catalog.
    #[error("Unknown subduct size: {size}\"")]
    UnknownSubductSize {
        /// The subduct diameter in inches.
        size: u32,
    },

    /// A sizing input was missing, out of range or inconsistent.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The input field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// No shaft size could carry the design airflow.
    #[error("No viable shaft size: {reason}")]
    NoViableShaft {
        /// Why every candidate was rejected.
        reason: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidInput`].
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
