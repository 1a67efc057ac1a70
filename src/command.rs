use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::RenderConfig;
use crate::feature::RendererVersion;

/// Where the renderer sends the rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IoMode {
    /// Template on stdin, HTML on stdout (`-is`).
    Stream,
    /// Template on stdin, HTML written to the given file (`-i -o <path>`).
    File(PathBuf),
}

/// A fully resolved renderer command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub io: IoMode,
}

impl Invocation {
    /// Builds the command line for one render call.
    ///
    /// Flags are emitted in a fixed order: minify, validation level, then the
    /// I/O mode. Which spelling is used depends on the renderer version.
    pub fn build(
        program: &Path,
        config: &RenderConfig,
        version: &RendererVersion,
        io: IoMode,
    ) -> Self {
        let dialect = version.dialect();
        let mut args = dialect.minify_flags(config.minify_output);
        args.extend(dialect.validation_flags(config.validation_level));
        match &io {
            IoMode::Stream => args.push("-is".to_string()),
            IoMode::File(path) => {
                args.push("-i".to_string());
                args.push("-o".to_string());
                args.push(path.to_string_lossy().into_owned());
            }
        }
        Self {
            program: program.to_path_buf(),
            args,
            io,
        }
    }

    pub fn is_file_backed(&self) -> bool {
        matches!(self.io, IoMode::File(_))
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationLevel;

    fn build(config: &RenderConfig, version: RendererVersion, io: IoMode) -> Vec<String> {
        Invocation::build(Path::new("mjml"), config, &version, io).args
    }

    #[test]
    fn test_v4_minify_stream() {
        let config = RenderConfig::default().with_minify(true);
        let args = build(&config, RendererVersion::new(4, 15, 3), IoMode::Stream);
        assert_eq!(
            args,
            vec![
                "--config.minify",
                "true",
                "--config.validationLevel",
                "soft",
                "-is"
            ]
        );
        assert!(!args.contains(&"--min".to_string()));
    }

    #[test]
    fn test_v4_without_minify_keeps_validation() {
        let config = RenderConfig::default().with_validation_level(ValidationLevel::Strict);
        let args = build(&config, RendererVersion::new(4, 0, 0), IoMode::Stream);
        assert_eq!(args, vec!["--config.validationLevel", "strict", "-is"]);
    }

    #[test]
    fn test_v3_legacy_flags() {
        let config = RenderConfig::default().with_minify(true);
        let args = build(&config, RendererVersion::new(3, 3, 5), IoMode::Stream);
        assert_eq!(args, vec!["--min", "--level=soft", "-is"]);
    }

    #[test]
    fn test_v2_without_validation_support() {
        let config = RenderConfig::default()
            .with_minify(true)
            .with_validation_level(ValidationLevel::Strict);
        let args = build(&config, RendererVersion::new(2, 4, 1), IoMode::Stream);
        assert_eq!(args, vec!["--min", "-is"]);
        assert!(!args.iter().any(|a| a.starts_with("--config.")));
        assert!(!args.iter().any(|a| a.starts_with("--level")));
    }

    #[test]
    fn test_file_backed_output() {
        let config = RenderConfig::default();
        let invocation = Invocation::build(
            Path::new("/usr/bin/mjml"),
            &config,
            &RendererVersion::new(4, 1, 0),
            IoMode::File(PathBuf::from("/tmp/mjml-template123")),
        );
        assert!(invocation.is_file_backed());
        assert_eq!(
            invocation.args,
            vec![
                "--config.validationLevel",
                "soft",
                "-i",
                "-o",
                "/tmp/mjml-template123"
            ]
        );
        assert_eq!(
            invocation.to_string(),
            "/usr/bin/mjml --config.validationLevel soft -i -o /tmp/mjml-template123"
        );
    }
}
