//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading leave rule
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{EngineConfig, LeaveRules, RegimeMetadata, ValuationRules};

/// Loads and provides access to the leave rule configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/assmat/
/// ├── regime.yaml     # Regime metadata
/// ├── leave.yaml      # Accrual cap, monthly rate, reference period, rounding
/// └── valuation.yaml  # One-tenth rate, mensualisation, money rounding
/// ```
///
/// # Example
///
/// ```no_run
/// use assmat_leave_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/assmat").unwrap();
/// println!("Loaded regime: {}", loader.regime().name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any required file is missing
    /// (`ConfigNotFound`), contains invalid YAML, or holds values the engine
    /// cannot work with (`ConfigParseError`).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use assmat_leave_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/assmat")?;
    /// # Ok::<(), assmat_leave_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<RegimeMetadata>(&path.join("regime.yaml"))?;

        let leave_path = path.join("leave.yaml");
        let leave = Self::load_yaml::<LeaveRules>(&leave_path)?;
        leave
            .validate()
            .map_err(|message| EngineError::ConfigParseError {
                path: leave_path.display().to_string(),
                message,
            })?;

        let valuation_path = path.join("valuation.yaml");
        let valuation = Self::load_yaml::<ValuationRules>(&valuation_path)?;
        valuation
            .validate()
            .map_err(|message| EngineError::ConfigParseError {
                path: valuation_path.display().to_string(),
                message,
            })?;

        Ok(Self {
            config: EngineConfig::new(metadata, leave, valuation),
        })
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

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Consumes the loader and returns the engine configuration.
    pub fn into_config(self) -> EngineConfig {
        self.config
    }

    /// Returns the regime metadata.
    pub fn regime(&self) -> &RegimeMetadata {
        self.config.regime()
    }
}
