//! Pipeline configuration
//!
//! Loaded from TOML. Every field has a default, so an empty or partial file
//! is valid:
//!
//! ```toml
//! [paths]
//! data_dir = "data/PDFs and abstracts"
//! processed_dir = "data/processed"
//!
//! [validation.thresholds]
//! high_methb = 70.0
//! ```

use std::path::{Path, PathBuf};

use methb_core::validation::{ValidationThresholds, DEFAULT_SPOT_CHECK_SEED};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File looked up under the user config directory when `--config` is absent.
const CONFIG_FILE: &str = "methb-miner/config.toml";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub paths: PathsConfig,
    pub validation: ValidationConfig,
}

/// Input directory and output file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding `abstract_<pmid>.txt` files and PDFs
    pub data_dir: PathBuf,
    /// Directory all outputs are written to
    pub processed_dir: PathBuf,
    pub documents_file: String,
    pub records_file: String,
    pub manifest_file: String,
    pub issues_file: String,
    pub spot_check_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/PDFs and abstracts"),
            processed_dir: PathBuf::from("data/processed"),
            documents_file: "extracted_texts.csv".to_string(),
            records_file: "meth_structured_data.csv".to_string(),
            manifest_file: "extraction_manifest.json".to_string(),
            issues_file: "validation_issues.csv".to_string(),
            spot_check_file: "spot_check_sample.csv".to_string(),
        }
    }
}

impl PathsConfig {
    pub fn documents_path(&self) -> PathBuf {
        self.processed_dir.join(&self.documents_file)
    }

    pub fn records_path(&self) -> PathBuf {
        self.processed_dir.join(&self.records_file)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.processed_dir.join(&self.manifest_file)
    }

    pub fn issues_path(&self) -> PathBuf {
        self.processed_dir.join(&self.issues_file)
    }

    pub fn spot_check_path(&self) -> PathBuf {
        self.processed_dir.join(&self.spot_check_file)
    }
}

/// Validation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub thresholds: ValidationThresholds,
    /// Seed for the spot-check sample
    pub spot_check_seed: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            thresholds: ValidationThresholds::default(),
            spot_check_seed: DEFAULT_SPOT_CHECK_SEED,
        }
    }
}

impl PipelineConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load and validate configuration.
    ///
    /// An explicit path must exist. Without one, the user config file is used
    /// if present, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|p| p.is_file()),
        };

        let config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?;
                tracing::debug!(path = %path.display(), "loaded config");
                Self::from_toml(&content)?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.validation.thresholds;

        if !(t.low_methb > 0.0 && t.high_methb <= 100.0) {
            return Err(ConfigError::Invalid(
                "MetHb thresholds must lie within (0, 100]".to_string(),
            ));
        }
        if t.low_methb >= t.high_methb {
            return Err(ConfigError::Invalid(
                "low_methb must be below high_methb".to_string(),
            ));
        }
        if t.max_age == 0 {
            return Err(ConfigError::Invalid("max_age must be positive".to_string()));
        }
        if t.low_quality > 100 {
            return Err(ConfigError::Invalid(
                "low_quality must be at most 100".to_string(),
            ));
        }

        let p = &self.paths;
        for (name, value) in [
            ("documents_file", &p.documents_file),
            ("records_file", &p.records_file),
            ("manifest_file", &p.manifest_file),
            ("issues_file", &p.issues_file),
            ("spot_check_file", &p.spot_check_file),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{name} must not be empty")));
            }
        }

        Ok(())
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_FILE))
}
