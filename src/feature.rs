use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::config::ValidationLevel;

/// Matches the first `major.minor.patch` triple in `mjml --version` output.
static VERSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?P<major>\d+)\.(?P<minor>\d+)\.(?P<patch>\d+)").unwrap());

/// Optional renderer capabilities that depend on the installed version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// The legacy `--level=<level>` flag of the 3.x command line.
    ValidationLevel,
}

impl Feature {
    /// First renderer release that shipped the feature.
    fn introduced_in(&self) -> RendererVersion {
        match self {
            Feature::ValidationLevel => RendererVersion::new(3, 2, 0),
        }
    }
}

/// Version of the detected renderer executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RendererVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl RendererVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parses the output of `mjml --version`.
    ///
    /// 4.x prints `mjml-cli: 4.15.3` followed by `mjml-core: 4.15.3`, older
    /// releases print the bare version. The first version triple wins.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = VERSION_PATTERN.captures(text)?;
        let part = |name: &str| caps.name(name)?.as_str().parse::<u32>().ok();
        Some(Self::new(part("major")?, part("minor")?, part("patch")?))
    }

    pub fn supports(&self, feature: Feature) -> bool {
        *self >= feature.introduced_in()
    }

    /// The command-line dialect spoken by this version.
    pub fn dialect(&self) -> CliDialect {
        if self.major >= 4 {
            CliDialect::Modern
        } else {
            CliDialect::Legacy {
                validation_level: self.supports(Feature::ValidationLevel),
            }
        }
    }
}

impl fmt::Display for RendererVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Flag spelling of a renderer generation.
///
/// The 4.x command line moved every option under `--config.*`; 3.x used short
/// standalone flags and only later gained a validation level flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliDialect {
    Legacy { validation_level: bool },
    Modern,
}

impl CliDialect {
    pub fn minify_flags(&self, minify_output: bool) -> Vec<String> {
        if !minify_output {
            return Vec::new();
        }
        match self {
            CliDialect::Modern => vec!["--config.minify".to_string(), "true".to_string()],
            CliDialect::Legacy { .. } => vec!["--min".to_string()],
        }
    }

    pub fn validation_flags(&self, level: ValidationLevel) -> Vec<String> {
        match self {
            CliDialect::Modern => vec![
                "--config.validationLevel".to_string(),
                level.as_str().to_string(),
            ],
            CliDialect::Legacy {
                validation_level: true,
            } => vec![format!("--level={}", level)],
            CliDialect::Legacy {
                validation_level: false,
            } => Vec::new(),
        }
    }
}

impl fmt::Display for CliDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliDialect::Modern => f.write_str("modern (--config.*)"),
            CliDialect::Legacy {
                validation_level: true,
            } => f.write_str("legacy (--min, --level)"),
            CliDialect::Legacy {
                validation_level: false,
            } => f.write_str("legacy (--min)"),
        }
    }
}
