use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// What to do with a row whose structured fields cannot be decoded or whose
/// rectangle falls outside the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowErrorPolicy {
    /// Abort the run; no output is written.
    #[default]
    Fail,
    /// Drop the row with a warning and keep going.
    Skip,
}

impl std::fmt::Display for RowErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowErrorPolicy::Fail => write!(f, "fail"),
            RowErrorPolicy::Skip => write!(f, "skip"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TesseractConfig {
    /// Directory holding `*.traineddata`; `None` lets Tesseract use its default.
    pub data_path: Option<String>,
    pub language: String,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self { data_path: None, language: "eng".to_string() }
    }
}

/// Run configuration, loadable from a TOML file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub on_invalid_row: RowErrorPolicy,
    pub tesseract: TesseractConfig,
}

impl ExtractConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }
}
