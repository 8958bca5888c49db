//! Command execution against the host interpreter.
//!
//! [`ShellExecutor`] hands the command text to `sh -c` (or `cmd /C` on
//! Windows) and waits for the process to exit. There is no timeout and the
//! child is not killed if the caller goes away.

use std::io::{self, Read};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::{RelayConfig, default_shell};
use crate::error::ExecError;

/// Result of running one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOutcome {
    /// The process ran to completion. Exit status does not matter.
    Completed {
        /// Standard output and standard error, interleaved as written.
        output: String,
        /// Exit code, `None` if the process was terminated by a signal.
        exit_code: Option<i32>,
    },
    /// The process could not be launched or its output could not be read.
    Failed {
        /// Display text of the underlying [`ExecError`].
        error: String,
    },
}

impl ExecOutcome {
    /// Text delivered to the channel for this outcome.
    #[must_use]
    pub fn into_message(self) -> String {
        match self {
            Self::Completed { output, .. } => output,
            Self::Failed { error } => error,
        }
    }

    /// Returns `true` for [`ExecOutcome::Failed`].
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl From<ExecError> for ExecOutcome {
    fn from(err: ExecError) -> Self {
        Self::Failed {
            error: err.to_string(),
        }
    }
}

/// Runs free-text commands and reports what happened.
///
/// Implementations must not fail: every problem is folded into
/// [`ExecOutcome::Failed`].
#[async_trait]
pub trait CommandExecutor: std::fmt::Debug + Send + Sync {
    /// Runs `command` and waits for it to finish.
    async fn execute(&self, command: &str) -> ExecOutcome;
}

/// Executor backed by the host's command interpreter.
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    program: String,
    flag: String,
}

impl ShellExecutor {
    /// Creates an executor that runs `<program> <flag> <command>`.
    #[must_use]
    pub fn new(program: impl Into<String>, flag: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            flag: flag.into(),
        }
    }

    /// Creates an executor from the configured interpreter.
    #[must_use]
    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(config.shell_program.clone(), config.shell_flag.clone())
    }

    async fn run(&self, command: &str) -> Result<ExecOutcome, ExecError> {
        // stdout and stderr share one pipe so their writes stay in order.
        let (mut reader, writer) = io::pipe().map_err(ExecError::Capture)?;
        let writer_err = writer.try_clone().map_err(ExecError::Capture)?;

        let mut child = {
            let mut cmd = Command::new(&self.program);
            cmd.arg(&self.flag)
                .arg(command)
                .stdin(Stdio::null())
                .stdout(writer)
                .stderr(writer_err);
            cmd.spawn().map_err(|source| ExecError::Launch {
                program: self.program.clone(),
                source,
            })?
            // `cmd` drops here, closing our copies of the write end.
        };

        let capture = tokio::task::spawn_blocking(move || {
            let mut buf = Vec::new();
            reader.read_to_end(&mut buf).map(|_| buf)
        });

        let status = child.wait().await.map_err(ExecError::Capture)?;
        let bytes = capture
            .await
            .map_err(|e| ExecError::Capture(io::Error::other(e)))?
            .map_err(ExecError::Capture)?;

        Ok(ExecOutcome::Completed {
            output: String::from_utf8_lossy(&bytes).into_owned(),
            exit_code: status.code(),
        })
    }
}

impl Default for ShellExecutor {
    fn default() -> Self {
        let (program, flag) = default_shell();
        Self::new(program, flag)
    }
}

#[async_trait]
impl CommandExecutor for ShellExecutor {
    async fn execute(&self, command: &str) -> ExecOutcome {
        match self.run(command).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(program = %self.program, error = %err, "command execution failed");
                err.into()
            }
        }
    }
}
