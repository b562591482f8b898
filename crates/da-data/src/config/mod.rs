//! Configuration for analysis and the initial query view

pub mod analysis;
pub mod view;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::DataError;
pub use analysis::AnalysisConfig;
pub use view::ViewConfig;

/// Top-level configuration file: `{"analysis": {...}, "view": {...}}`.
///
/// Every field is optional and falls back to its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub view: ViewConfig,
}

impl Config {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(text: &str) -> Result<Self, DataError> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DataError> {
        self.analysis.validate()?;
        self.view.validate()
    }
}
