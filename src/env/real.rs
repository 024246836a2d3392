//! Real environment implementation backed by the running process

use super::traits::SystemEnv;
use std::ffi::OsString;
use std::path::PathBuf;

/// Reads from `std::env` and the host's CPU topology
#[derive(Debug, Clone, Default)]
pub struct RealEnv;

impl RealEnv {
    pub fn new() -> Self {
        Self
    }
}

impl SystemEnv for RealEnv {
    fn var_os(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }

    fn logical_cpus(&self) -> usize {
        std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(1)
    }

    fn executable_dir(&self) -> std::io::Result<PathBuf> {
        let exe = std::env::current_exe()?;
        exe.parent().map(PathBuf::from).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("executable path has no parent: {}", exe.display()),
            )
        })
    }

    fn current_dir(&self) -> std::io::Result<PathBuf> {
        std::env::current_dir()
    }
}
