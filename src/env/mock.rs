//! In-memory environment for tests

use super::traits::SystemEnv;
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct MockEnv {
    vars: HashMap<String, OsString>,
    cpus: usize,
    executable_dir: PathBuf,
    current_dir: PathBuf,
}

impl MockEnv {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
            cpus: 4,
            executable_dir: PathBuf::from("/opt/harness/bin"),
            current_dir: PathBuf::from("/work"),
        }
    }

    pub fn with_var(mut self, key: &str, value: impl AsRef<OsStr>) -> Self {
        self.vars.insert(key.to_string(), value.as_ref().to_os_string());
        self
    }

    pub fn with_cpus(mut self, cpus: usize) -> Self {
        self.cpus = cpus;
        self
    }

    pub fn with_executable_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.executable_dir = dir.into();
        self
    }

    pub fn with_current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = dir.into();
        self
    }
}

impl Default for MockEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemEnv for MockEnv {
    fn var_os(&self, key: &str) -> Option<OsString> {
        self.vars.get(key).cloned()
    }

    fn logical_cpus(&self) -> usize {
        self.cpus
    }

    fn executable_dir(&self) -> std::io::Result<PathBuf> {
        Ok(self.executable_dir.clone())
    }

    fn current_dir(&self) -> std::io::Result<PathBuf> {
        Ok(self.current_dir.clone())
    }
}
