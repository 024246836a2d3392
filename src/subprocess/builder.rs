use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::Path;

use crate::subprocess::ProcessCommand;

pub struct ProcessCommandBuilder {
    command: ProcessCommand,
}

impl ProcessCommandBuilder {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            command: ProcessCommand {
                program: program.as_ref().to_os_string(),
                args: Vec::new(),
                env: HashMap::new(),
                working_dir: None,
                secrets: Vec::new(),
            },
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.command.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.command
            .args
            .extend(args.into_iter().map(|s| s.as_ref().to_os_string()));
        self
    }

    /// Append a `--flag value` pair
    pub fn flag(self, flag: &str, value: impl AsRef<OsStr>) -> Self {
        self.arg(flag).arg(value)
    }

    /// Append a `--flag value` pair whose value is masked in rendered output
    pub fn secret_flag(mut self, flag: &str, value: impl AsRef<OsStr>) -> Self {
        self.command.secrets.push(value.as_ref().to_os_string());
        self.flag(flag, value)
    }

    pub fn env(mut self, key: &str, value: impl AsRef<OsStr>) -> Self {
        self.command
            .env
            .insert(key.to_string(), value.as_ref().to_os_string());
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.command.working_dir = Some(dir.to_path_buf());
        self
    }

    pub fn build(self) -> ProcessCommand {
        self.command
    }
}
