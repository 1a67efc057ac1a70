use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

use crate::config::RenderConfig;
use crate::feature::RendererVersion;

const DEFAULT_BIN_NAME: &str = "mjml";

/// Fallback location of a project-local npm install.
const NODE_MODULES_BIN: &str = "node_modules/.bin/mjml";

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("No usable mjml executable found (tried: {})", format_tried(.tried))]
    ExecutableNotFound { tried: Vec<PathBuf> },
}

fn format_tried(tried: &[PathBuf]) -> String {
    if tried.is_empty() {
        return "nothing".to_string();
    }
    tried
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A renderer executable whose version has been detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renderer {
    pub path: PathBuf,
    pub version: RendererVersion,
}

impl Renderer {
    pub fn new(path: impl Into<PathBuf>, version: RendererVersion) -> Self {
        Self {
            path: path.into(),
            version,
        }
    }

    /// Locates the renderer and detects its version.
    ///
    /// A configured `bin_path` is the only candidate when set. Otherwise `mjml`
    /// on `PATH` is tried, then `node_modules/.bin/mjml` in the working directory.
    pub fn detect(config: &RenderConfig) -> Result<Self, SetupError> {
        let tried = candidates(config);
        for candidate in &tried {
            if let Some(version) = probe_version(candidate) {
                debug!("Using renderer {:?} ({})", candidate, version);
                return Ok(Self::new(candidate, version));
            }
        }
        Err(SetupError::ExecutableNotFound { tried })
    }
}

impl fmt::Display for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.path.display(), self.version)
    }
}

fn candidates(config: &RenderConfig) -> Vec<PathBuf> {
    if let Some(bin_path) = &config.bin_path {
        return vec![bin_path.clone()];
    }
    let mut found = Vec::new();
    if let Ok(path) = which::which(DEFAULT_BIN_NAME) {
        found.push(path);
    }
    let local = Path::new(NODE_MODULES_BIN);
    if local.is_file() {
        found.push(local.to_path_buf());
    }
    found
}

/// Runs `<bin> --version` and parses what it prints.
pub fn probe_version(bin: &Path) -> Option<RendererVersion> {
    let output = match Command::new(bin)
        .arg("--version")
        .stdin(Stdio::null())
        .output()
    {
        Ok(o) => o,
        Err(e) => {
            debug!("Failed to run {:?} --version: {}", bin, e);
            return None;
        }
    };
    if !output.status.success() {
        debug!("{:?} --version exited with {}", bin, output.status);
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let version = RendererVersion::parse(&stdout);
    if version.is_none() {
        debug!("Unrecognised version output from {:?}: {}", bin, stdout.trim());
    }
    version
}
