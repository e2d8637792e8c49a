//! Publishing outputs to the calling pipeline

use std::ffi::OsString;
use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Result, TriggerError};

pub const ENVMAN_PROGRAM: &str = "envman";

/// Sink for the values published by the step
pub trait Exporter {
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Exports through `envman add --key <KEY>`, passing the value on stdin
#[derive(Debug, Clone)]
pub struct EnvmanExporter {
    program: PathBuf,
    leading_args: Vec<OsString>,
}

impl Default for EnvmanExporter {
    fn default() -> Self {
        Self {
            program: PathBuf::from(ENVMAN_PROGRAM),
            leading_args: Vec::new(),
        }
    }
}

impl EnvmanExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use another executable with the same command line contract
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Arguments placed before `add --key <KEY>`, e.g. a script path when the program is a shell
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    fn export_error(key: &str, message: String) -> TriggerError {
        TriggerError::Export {
            key: key.to_string(),
            message,
        }
    }
}

impl Exporter for EnvmanExporter {
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        debug!("Running: {} add --key {}", self.program.display(), key);
        let mut child = Command::new(&self.program)
            .args(&self.leading_args)
            .arg("add")
            .arg("--key")
            .arg(key)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                Self::export_error(
                    key,
                    format!("{} failed to start: {}", self.program.display(), e),
                )
            })?;

        // Stdin is closed when the handle drops so the tool sees EOF.
        let write_result = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(value.as_bytes()).await,
            None => Ok(()),
        };

        let output = child.wait_with_output().await.map_err(|e| {
            Self::export_error(
                key,
                format!("{} did not finish: {}", self.program.display(), e),
            )
        })?;

        if !output.status.success() {
            return Err(Self::export_error(
                key,
                format!(
                    "{} add failed ({}): {}",
                    self.program.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        write_result.map_err(|e| {
            Self::export_error(key, format!("failed to write value to stdin: {}", e))
        })?;

        Ok(())
    }
}
