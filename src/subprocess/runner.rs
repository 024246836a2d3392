use async_trait::async_trait;
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::watch;

use super::error::ProcessError;

const REDACTED: &str = "***";

/// A program invocation
///
/// Program, arguments and environment values are `OsString`s so paths reach
/// the child byte for byte, whatever their encoding.
#[derive(Debug, Clone)]
pub struct ProcessCommand {
    pub program: OsString,
    pub args: Vec<OsString>,
    pub env: HashMap<String, OsString>,
    pub working_dir: Option<PathBuf>,
    /// Values masked whenever the command line is rendered for humans
    pub secrets: Vec<OsString>,
}

impl ProcessCommand {
    /// Render the command as a shell-quoted line with secrets masked.
    ///
    /// Rendering is lossy for non-UTF-8 words; the command itself is not.
    pub fn display_line(&self) -> String {
        let words = std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|word| self.redact(word));
        shell_words::join(words)
    }

    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    fn redact(&self, word: &OsStr) -> String {
        self.secrets
            .iter()
            .filter(|secret| !secret.is_empty())
            .fold(word.to_string_lossy().into_owned(), |acc, secret| {
                acc.replace(secret.to_string_lossy().as_ref(), REDACTED)
            })
    }
}

#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Error(i32),
    Signal(i32),
}

impl ExitStatus {
    pub fn success(&self) -> bool {
        matches!(self, ExitStatus::Success)
    }

    /// Exit code as a POSIX shell would report it (`128 + N` for signal N).
    pub fn code(&self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Error(code) => *code,
            ExitStatus::Signal(signal) => 128 + signal,
        }
    }
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError>;
}

/// Runs commands with the terminal's stdio
///
/// With a shutdown receiver attached, a `true` on the channel kills the
/// running child and waits for it to exit before `run` returns
/// [`ProcessError::Interrupted`]. Commands started after shutdown are not
/// spawned at all.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner {
    shutdown: Option<watch::Receiver<bool>>,
}

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self { shutdown: None }
    }

    pub fn with_shutdown(shutdown: watch::Receiver<bool>) -> Self {
        Self {
            shutdown: Some(shutdown),
        }
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown
            .as_ref()
            .map(|rx| *rx.borrow())
            .unwrap_or(false)
    }

    /// Resolves once shutdown is requested; never resolves without a receiver
    async fn wait_for_shutdown(shutdown: Option<watch::Receiver<bool>>) {
        if let Some(mut rx) = shutdown {
            let requested = rx.wait_for(|stop| *stop).await.is_ok();
            if requested {
                return;
            }
        }
        std::future::pending::<()>().await
    }

    /// Log command execution details
    fn log_command_start(command: &ProcessCommand) {
        tracing::debug!("Executing subprocess: {}", command.display_line());

        if !command.env.is_empty() {
            tracing::trace!("Environment overrides: {:?}", command.env);
        }

        if let Some(ref dir) = command.working_dir {
            tracing::trace!("Working directory: {:?}", dir);
        }
    }

    /// Configure the command with environment, working directory and stdio
    fn configure_command(command: &ProcessCommand) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args);

        // Explicit variables are layered over the inherited environment
        for (key, value) in &command.env {
            cmd.env(key, value);
        }

        if let Some(dir) = &command.working_dir {
            cmd.current_dir(dir);
        }

        // The child must not outlive a dropped run
        cmd.kill_on_drop(true);

        cmd.stdin(std::process::Stdio::inherit());
        cmd.stdout(std::process::Stdio::inherit());
        cmd.stderr(std::process::Stdio::inherit());
        cmd
    }

    /// Convert process exit status to our ExitStatus enum
    fn parse_exit_status(status: std::process::ExitStatus) -> ExitStatus {
        if status.success() {
            ExitStatus::Success
        } else if let Some(code) = status.code() {
            ExitStatus::Error(code)
        } else {
            Self::parse_signal_status(status)
        }
    }

    #[cfg(unix)]
    fn parse_signal_status(status: std::process::ExitStatus) -> ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            ExitStatus::Signal(signal)
        } else {
            ExitStatus::Error(1)
        }
    }

    #[cfg(not(unix))]
    fn parse_signal_status(_status: std::process::ExitStatus) -> ExitStatus {
        ExitStatus::Error(1)
    }

    /// Log the process execution result
    fn log_result(result: &ProcessOutput, command: &ProcessCommand) {
        let command_str = command.display_line();

        match &result.status {
            ExitStatus::Success => {
                tracing::debug!(
                    "Subprocess completed successfully in {:?}: {}",
                    result.duration,
                    command_str
                );
            }
            ExitStatus::Error(code) => {
                tracing::debug!(
                    "Subprocess failed with exit code {} in {:?}: {}",
                    code,
                    result.duration,
                    command_str
                );
            }
            ExitStatus::Signal(signal) => {
                tracing::warn!(
                    "Subprocess terminated by signal {} in {:?}: {}",
                    signal,
                    result.duration,
                    command_str
                );
            }
        }
    }

    /// Map spawn error to ProcessError
    fn map_spawn_error(error: std::io::Error, command: &ProcessCommand) -> ProcessError {
        tracing::error!(
            "Failed to spawn '{}': {} (kind: {:?})",
            command.program_name(),
            error,
            error.kind()
        );

        match error.kind() {
            std::io::ErrorKind::NotFound => ProcessError::CommandNotFound(command.program_name()),
            std::io::ErrorKind::PermissionDenied => {
                ProcessError::PermissionDenied(command.program_name())
            }
            _ => ProcessError::Io {
                command: command.display_line(),
                source: error,
            },
        }
    }

    /// Kill the child and reap it so nothing is still writing afterwards
    async fn stop_child(child: &mut tokio::process::Child, command: &ProcessCommand) {
        tracing::warn!("Interrupted, stopping {}", command.program_name());

        if let Err(e) = child.start_kill() {
            tracing::debug!("Kill of {} failed: {}", command.program_name(), e);
        }
        if let Err(e) = child.wait().await {
            tracing::warn!("Failed to reap {}: {}", command.program_name(), e);
        }
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError> {
        if self.shutdown_requested() {
            tracing::debug!("Shutdown requested, not starting {}", command.program_name());
            return Err(ProcessError::Interrupted);
        }

        let start = std::time::Instant::now();

        Self::log_command_start(&command);

        let mut cmd = Self::configure_command(&command);
        let mut child = cmd
            .spawn()
            .map_err(|e| Self::map_spawn_error(e, &command))?;

        let status = tokio::select! {
            status = child.wait() => status.map_err(|source| ProcessError::Io {
                command: command.display_line(),
                source,
            })?,
            _ = Self::wait_for_shutdown(self.shutdown.clone()) => {
                Self::stop_child(&mut child, &command).await;
                return Err(ProcessError::Interrupted);
            }
        };

        let result = ProcessOutput {
            status: Self::parse_exit_status(status),
            duration: start.elapsed(),
        };

        Self::log_result(&result, &command);

        Ok(result)
    }
}
