//! Run configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file
//! at all) yields the standard 1 mW analysis with CSV export.
//!
//! ```toml
//! [analysis]
//! reference_power_mw = 1.0
//! max_paths = 100000   # 0 disables the cap
//!
//! [export]
//! format = "csv"
//! path_separator = "->"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use lightpath_core::{AnalysisConfig, DEFAULT_MAX_PATHS};

use crate::ExportFormat;

/// Errors from loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub analysis: AnalysisSection,
    #[serde(default)]
    pub export: ExportSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSection {
    /// Probe launch power in milliwatts
    #[serde(default = "default_reference_power_mw")]
    pub reference_power_mw: f64,
    /// Cap on the number of analysed paths; 0 means unlimited
    #[serde(default = "default_max_paths")]
    pub max_paths: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSection {
    #[serde(default)]
    pub format: ExportFormat,
    #[serde(default = "default_path_separator")]
    pub path_separator: String,
}

fn default_reference_power_mw() -> f64 {
    1.0
}

fn default_max_paths() -> usize {
    DEFAULT_MAX_PATHS
}

fn default_path_separator() -> String {
    "->".to_string()
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            reference_power_mw: default_reference_power_mw(),
            max_paths: default_max_paths(),
        }
    }
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            path_separator: default_path_separator(),
        }
    }
}

impl SimulationConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a configuration file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Engine parameters derived from the analysis section
    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            reference_power: self.analysis.reference_power_mw * 1e-3,
            max_paths: match self.analysis.max_paths {
                0 => None,
                n => Some(n),
            },
        }
    }
}
