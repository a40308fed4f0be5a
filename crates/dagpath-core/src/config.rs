//! `dagpath.toml` configuration.
//!
//! Every field has a default, so a missing file and an empty file are the
//! same thing. Lookup order: an explicit `--config` path, then
//! `./dagpath.toml`, then defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ErrorCode;

/// File name searched for in the working directory.
pub const CONFIG_FILE_NAME: &str = "dagpath.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } => ErrorCode::ConfigReadFailed,
            Self::Parse { .. } => ErrorCode::ConfigParseError,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DagpathConfig {
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// How an explicit zero edge weight is treated during ingestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroWeightPolicy {
    /// Keep `0` as a real zero-cost edge.
    #[default]
    Keep,
    /// Treat `0` as "unweighted" and store weight 1.
    AsOne,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    #[serde(default)]
    pub zero_weight: ZeroWeightPolicy,
    #[serde(default = "default_weight")]
    pub default_weight: f64,
    #[serde(default = "default_true")]
    pub default_directed: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            zero_weight: ZeroWeightPolicy::default(),
            default_weight: default_weight(),
            default_directed: default_true(),
        }
    }
}

impl IngestConfig {
    /// Weight stored for an edge whose document weight is `raw`.
    #[must_use]
    pub fn normalize_weight(&self, raw: Option<f64>) -> f64 {
        match raw {
            None => self.default_weight,
            Some(w) if w == 0.0 && self.zero_weight == ZeroWeightPolicy::AsOne => 1.0,
            Some(w) => w,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Source vertex used when neither the CLI nor the graph file names one.
    #[serde(default)]
    pub default_source: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_weight() -> f64 {
    1.0
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("results.csv")
}

/// Parse configuration text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] when `text` is not valid for the schema;
/// `origin` is used only for the message.
pub fn parse_config(text: &str, origin: &Path) -> Result<DagpathConfig, ConfigError> {
    toml::from_str(text).map_err(|source| ConfigError::Parse {
        path: origin.to_path_buf(),
        source,
    })
}

/// Load configuration from `explicit` if given, else from
/// `<dir>/dagpath.toml` if it exists, else defaults.
///
/// # Errors
///
/// An explicit path that cannot be read is an error; a missing implicit file
/// is not. Parse failures are errors either way.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<DagpathConfig, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let implicit = dir.join(CONFIG_FILE_NAME);
            if !implicit.is_file() {
                debug!("no {CONFIG_FILE_NAME} in {}, using defaults", dir.display());
                return Ok(DagpathConfig::default());
            }
            implicit
        }
    };

    let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path.display(), "loaded config");
    parse_config(&text, &path)
}
