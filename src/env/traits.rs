//! Environment trait definitions for dependency injection and testing

use std::ffi::OsString;
use std::path::PathBuf;

/// Host facts the harness configuration is derived from
///
/// Configuration is resolved from this trait alone, so tests can describe a
/// host without touching the real process environment.
///
/// # Examples
///
/// ```
/// use ingest_e2e::env::{MockEnv, SystemEnv};
///
/// let env = MockEnv::new().with_var("MAX_PROCESSES", "2");
/// assert_eq!(env.var_os("MAX_PROCESSES"), Some("2".into()));
/// assert_eq!(env.var_os("OUTPUT_ROOT"), None);
/// ```
pub trait SystemEnv: Send + Sync {
    /// Read an environment variable as raw bytes; only unset is `None`
    fn var_os(&self, key: &str) -> Option<OsString>;

    /// Number of logical CPUs available to this process
    fn logical_cpus(&self) -> usize;

    /// Directory containing the running executable
    fn executable_dir(&self) -> std::io::Result<PathBuf>;

    /// Current working directory, used to absolutize relative paths
    fn current_dir(&self) -> std::io::Result<PathBuf>;
}
