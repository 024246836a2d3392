#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Permission denied executing: {0}")]
    PermissionDenied(String),

    #[error("IO error running '{command}': {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Interrupted")]
    Interrupted,

    #[error("Mock expectation not met: {0}")]
    MockExpectationNotMet(String),
}

impl ProcessError {
    /// Exit code a POSIX shell reports when the program cannot be run.
    pub fn exit_code(&self) -> i32 {
        match self {
            ProcessError::CommandNotFound(_) => 127,
            ProcessError::PermissionDenied(_) | ProcessError::Io { .. } => 126,
            ProcessError::Interrupted => 130,
            ProcessError::MockExpectationNotMet(_) => 1,
        }
    }
}
