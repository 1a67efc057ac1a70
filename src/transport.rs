use log::debug;
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempPath;
use thiserror::Error;

use crate::command::{Invocation, IoMode};

/// Templates longer than this many characters have their HTML routed through
/// a temporary file instead of the stdout pipe.
pub const FILE_OUTPUT_THRESHOLD: usize = 20_000;

const TEMP_FILE_PREFIX: &str = "mjml-template";

/// Text captured from one renderer run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    /// Rendered output: the stdout stream, or the output file when file-backed.
    pub stdout: String,
    pub stderr: String,
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Failed to spawn renderer {program:?}: {source}")]
    Spawn { program: PathBuf, source: io::Error },
    #[error("Failed to write template to renderer stdin: {0}")]
    Stdin(io::Error),
    #[error("Failed to wait for renderer: {0}")]
    Wait(io::Error),
    #[error("Failed to create temporary output file: {0}")]
    CreateOutputFile(io::Error),
    #[error("Failed to read renderer output file {path:?}: {source}")]
    ReadOutputFile { path: PathBuf, source: io::Error },
}

/// Runs a renderer invocation and collects what it printed.
///
/// Implementations block until the renderer has exited. No timeout is applied,
/// so a renderer that never exits blocks the caller.
pub trait Transport: Send + Sync {
    fn execute(&self, invocation: &Invocation, input: &str) -> Result<RawOutput, TransportError>;
}

/// Output destination chosen for a template, owning the temporary file if any.
///
/// The file is removed when the target is dropped.
#[derive(Debug)]
pub enum OutputTarget {
    Stream,
    File(TempPath),
}

impl OutputTarget {
    pub fn for_template(template: &str) -> Result<Self, TransportError> {
        if !needs_file_output(template) {
            return Ok(OutputTarget::Stream);
        }
        let file = tempfile::Builder::new()
            .prefix(TEMP_FILE_PREFIX)
            .tempfile()
            .map_err(TransportError::CreateOutputFile)?;
        // Close our handle so the renderer can open the path for writing.
        Ok(OutputTarget::File(file.into_temp_path()))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            OutputTarget::Stream => None,
            OutputTarget::File(path) => Some(&**path),
        }
    }

    pub fn io_mode(&self) -> IoMode {
        match self.path() {
            Some(path) => IoMode::File(path.to_path_buf()),
            None => IoMode::Stream,
        }
    }
}

pub fn needs_file_output(template: &str) -> bool {
    template.chars().count() > FILE_OUTPUT_THRESHOLD
}

/// Spawns the renderer as a child process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessTransport;

impl Transport for ProcessTransport {
    fn execute(&self, invocation: &Invocation, input: &str) -> Result<RawOutput, TransportError> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!("Running renderer: {}", invocation);

        let mut child = cmd.spawn().map_err(|source| TransportError::Spawn {
            program: invocation.program.clone(),
            source,
        })?;

        // Stdin is dropped at the end of this block, closing the pipe.
        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(input.as_bytes()) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                    debug!("Renderer closed stdin early: {}", e);
                }
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(TransportError::Stdin(e));
                }
            }
        }

        let output = child.wait_with_output().map_err(TransportError::Wait)?;
        debug!("Renderer exited with {}", output.status);

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let stdout = match &invocation.io {
            IoMode::Stream => String::from_utf8_lossy(&output.stdout).into_owned(),
            IoMode::File(path) => read_output_file(path)?,
        };

        Ok(RawOutput { stdout, stderr })
    }
}

fn read_output_file(path: &Path) -> Result<String, TransportError> {
    let bytes = fs::read(path).map_err(|source| TransportError::ReadOutputFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
