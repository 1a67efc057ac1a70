use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Options handed to the renderer on every call.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    #[serde(default)]
    pub minify_output: bool,

    #[serde(default)]
    pub validation_level: ValidationLevel,

    /// Explicit renderer executable. When unset the executable is discovered.
    #[serde(default)]
    pub bin_path: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            minify_output: false,
            validation_level: ValidationLevel::default(),
            bin_path: None,
        }
    }
}

/// How strictly the renderer validates a template before rendering it.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ValidationLevel {
    Strict,
    #[default]
    Soft,
    Skip,
}

impl ValidationLevel {
    /// The literal value passed on the renderer command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationLevel::Strict => "strict",
            ValidationLevel::Soft => "soft",
            ValidationLevel::Skip => "skip",
        }
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ValidationLevel::Strict),
            "soft" => Ok(ValidationLevel::Soft),
            "skip" => Ok(ValidationLevel::Skip),
            _ => Err(ConfigError::InvalidValidationLevel(s.to_string())),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid validation level '{0}', expected one of: strict, soft, skip")]
    InvalidValidationLevel(String),
}

impl RenderConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty document is a config with every default.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: RenderConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn with_minify(mut self, minify_output: bool) -> Self {
        self.minify_output = minify_output;
        self
    }

    pub fn with_validation_level(mut self, validation_level: ValidationLevel) -> Self {
        self.validation_level = validation_level;
        self
    }

    pub fn with_bin_path(mut self, bin_path: impl Into<PathBuf>) -> Self {
        self.bin_path = Some(bin_path.into());
        self
    }
}
