use std::fmt;
use thiserror::Error;

use crate::subprocess::ProcessError;

/// Exit code reported when the run is skipped for a missing prerequisite
pub const EXIT_SKIPPED: i32 = 8;
/// Exit code for invalid configuration
pub const EXIT_CONFIG: i32 = 2;
/// Exit code after Ctrl-C, as a shell reports SIGINT
pub const EXIT_INTERRUPTED: i32 = 130;

/// The external steps of a harness run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ingest,
    DiffCheck,
    EvaluationCopy,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Ingest => "ingest",
            Stage::DiffCheck => "expected-output diff",
            Stage::EvaluationCopy => "evaluation copy",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("{var} env var is not set")]
    MissingCredential { var: &'static str },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{stage} step exited with code {code}")]
    StageFailed { stage: Stage, code: i32 },

    #[error("Failed to run {stage} step: {source}")]
    Spawn {
        stage: Stage,
        #[source]
        source: ProcessError,
    },

    #[error("Interrupted")]
    Interrupted,
}

impl HarnessError {
    pub fn exit_code(&self) -> i32 {
        match self {
            HarnessError::MissingCredential { .. } => EXIT_SKIPPED,
            HarnessError::Config(_) => EXIT_CONFIG,
            HarnessError::StageFailed { code, .. } => *code,
            HarnessError::Spawn { source, .. } => source.exit_code(),
            HarnessError::Interrupted => EXIT_INTERRUPTED,
        }
    }

    /// Message shown to the person running the harness
    pub fn user_message(&self) -> String {
        match self {
            HarnessError::MissingCredential { .. } => format!("Skipping embedding test: {self}."),
            _ => format!("Error: {self}"),
        }
    }

    /// A skip is an expected outcome, not a failure
    pub fn is_skip(&self) -> bool {
        matches!(self, HarnessError::MissingCredential { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_is_a_skip() {
        let err = HarnessError::MissingCredential {
            var: "OCTOAI_API_KEY",
        };
        assert!(err.is_skip());
        assert_eq!(err.exit_code(), 8);
        assert_eq!(
            err.user_message(),
            "Skipping embedding test: OCTOAI_API_KEY env var is not set."
        );
    }

    #[test]
    fn test_stage_failure_propagates_code() {
        let err = HarnessError::StageFailed {
            stage: Stage::Ingest,
            code: 3,
        };
        assert!(!err.is_skip());
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.to_string(), "ingest step exited with code 3");
    }

    #[test]
    fn test_spawn_failure_uses_shell_codes() {
        let err = HarnessError::Spawn {
            stage: Stage::Ingest,
            source: ProcessError::CommandNotFound("unstructured-ingest".into()),
        };
        assert_eq!(err.exit_code(), 127);
        assert_eq!(HarnessError::Interrupted.exit_code(), 130);
        assert_eq!(HarnessError::Config("bad".into()).exit_code(), 2);
    }
}
