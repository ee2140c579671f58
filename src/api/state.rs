//! Application state for the shaft sizing API.

use std::sync::Arc;

use crate::config::ConfigLoader;

/// Shared application state.
///
/// Holds the equipment catalog, loaded once at startup and shared by every
/// request handler.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fixtures::standard_config;

    #[test]
    fn test_clones_share_config() {
        let state = AppState::new(ConfigLoader::from_config(standard_config()));
        let clone = state.clone();
        assert!(std::ptr::eq(state.config(), clone.config()));
    }
}
