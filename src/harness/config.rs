//! Harness configuration, resolved once at startup
//!
//! Everything a run needs is computed here from [`SystemEnv`] and the command
//! line, then passed by reference to each stage.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Component, Path, PathBuf};

use super::case::IngestCase;
use crate::env::SystemEnv;
use crate::error::HarnessError;

pub const OUTPUT_ROOT_VAR: &str = "OUTPUT_ROOT";
pub const MAX_PROCESSES_VAR: &str = "MAX_PROCESSES";
pub const PYTHONPATH_VAR: &str = "PYTHONPATH";
pub const DEFAULT_INGEST_PROGRAM: &str = "unstructured-ingest";

/// Values supplied on the command line that take precedence over discovery
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub script_dir: Option<PathBuf>,
    pub ingest_program: Option<OsString>,
}

#[derive(Clone)]
pub struct HarnessConfig {
    pub case: IngestCase,
    /// Directory holding the diff and copy scripts
    pub script_dir: PathBuf,
    /// Parent of `script_dir`; the ingestion tool runs from here
    pub repo_root: PathBuf,
    pub output_root: PathBuf,
    pub output_dir: PathBuf,
    pub work_dir: PathBuf,
    /// Forwarded verbatim as `--num-processes`; the tool judges its validity
    pub max_processes: OsString,
    pub python_path: OsString,
    pub ingest_program: OsString,
    api_key: Option<OsString>,
}

impl HarnessConfig {
    /// Resolve the OctoAI embedding case against the given environment
    pub fn resolve(env: &dyn SystemEnv, overrides: &Overrides) -> Result<Self, HarnessError> {
        Self::resolve_case(IngestCase::octoai(), env, overrides)
    }

    pub fn resolve_case(
        case: IngestCase,
        env: &dyn SystemEnv,
        overrides: &Overrides,
    ) -> Result<Self, HarnessError> {
        let script_dir = match &overrides.script_dir {
            Some(dir) => dir.clone(),
            None => env.executable_dir().map_err(|e| {
                HarnessError::Config(format!("cannot locate the harness directory: {e}"))
            })?,
        };
        let script_dir = absolutize(env, &script_dir)?;

        let repo_root = script_dir
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                HarnessError::Config(format!(
                    "harness directory {} has no parent directory",
                    script_dir.display()
                ))
            })?;

        let output_root = match non_empty(env.var_os(OUTPUT_ROOT_VAR)) {
            Some(root) => absolutize(env, Path::new(&root))?,
            None => script_dir.clone(),
        };
        let output_dir = output_root.join("structured-output").join(case.folder_name);
        let work_dir = output_root.join("workdir").join(case.folder_name);

        let max_processes = non_empty(env.var_os(MAX_PROCESSES_VAR))
            .unwrap_or_else(|| env.logical_cpus().max(1).to_string().into());
        let python_path = non_empty(env.var_os(PYTHONPATH_VAR)).unwrap_or_else(|| ".".into());
        let ingest_program = overrides
            .ingest_program
            .clone()
            .unwrap_or_else(|| DEFAULT_INGEST_PROGRAM.into());
        let api_key = non_empty(env.var_os(case.credential_var));

        let config = Self {
            case,
            script_dir,
            repo_root,
            output_root,
            output_dir,
            work_dir,
            max_processes,
            python_path,
            ingest_program,
            api_key,
        };
        tracing::debug!("Resolved harness configuration: {:?}", config);
        Ok(config)
    }

    /// The provider credential, or the skip error when it is unset or empty
    pub fn api_key(&self) -> Result<&OsStr, HarnessError> {
        self.api_key
            .as_deref()
            .ok_or(HarnessError::MissingCredential {
                var: self.case.credential_var,
            })
    }

    /// Directories owned by a run and removed when it ends
    pub fn scratch_dirs(&self) -> [PathBuf; 2] {
        [self.output_dir.clone(), self.work_dir.clone()]
    }

    pub fn diff_script(&self) -> PathBuf {
        self.script_dir.join("check-diff-expected-output.sh")
    }

    pub fn copy_script(&self) -> PathBuf {
        self.script_dir.join("evaluation-ingest-cp.sh")
    }
}

impl fmt::Debug for HarnessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HarnessConfig")
            .field("case", &self.case.folder_name)
            .field("script_dir", &self.script_dir)
            .field("repo_root", &self.repo_root)
            .field("output_dir", &self.output_dir)
            .field("work_dir", &self.work_dir)
            .field("max_processes", &self.max_processes)
            .field("python_path", &self.python_path)
            .field("ingest_program", &self.ingest_program)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

fn non_empty(value: Option<OsString>) -> Option<OsString> {
    value.filter(|v| !v.is_empty())
}

/// Make `path` absolute and fold away `.` and `..` components
fn absolutize(env: &dyn SystemEnv, path: &Path) -> Result<PathBuf, HarnessError> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = env.current_dir().map_err(|e| {
            HarnessError::Config(format!("cannot read the current directory: {e}"))
        })?;
        cwd.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}
