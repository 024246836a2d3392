//! Command lines for the three external steps

use std::ffi::OsStr;

use super::config::{HarnessConfig, PYTHONPATH_VAR};
use crate::error::Stage;
use crate::subprocess::{ProcessCommand, ProcessCommandBuilder};

/// The commands of one run, in execution order
#[derive(Debug, Clone)]
pub struct StagePlan {
    pub ingest: ProcessCommand,
    pub diff: ProcessCommand,
    pub copy: ProcessCommand,
}

impl StagePlan {
    pub fn new(config: &HarnessConfig, api_key: &OsStr) -> Self {
        Self {
            ingest: ingest_command(config, api_key),
            diff: diff_command(config),
            copy: copy_command(config),
        }
    }

    pub fn steps(&self) -> [(Stage, &ProcessCommand); 3] {
        [
            (Stage::Ingest, &self.ingest),
            (Stage::DiffCheck, &self.diff),
            (Stage::EvaluationCopy, &self.copy),
        ]
    }
}

/// Invocation of the ingestion tool, run from the repository root
pub fn ingest_command(config: &HarnessConfig, api_key: &OsStr) -> ProcessCommand {
    let case = &config.case;

    ProcessCommandBuilder::new(&config.ingest_program)
        .arg(case.connector)
        .flag("--num-processes", &config.max_processes)
        .flag("--metadata-exclude", case.metadata_exclude_arg())
        .flag("--output-dir", &config.output_dir)
        .arg("--verbose")
        .arg("--reprocess")
        .flag("--input-path", case.input_path)
        .flag("--work-dir", &config.work_dir)
        .flag("--embedding-provider", case.embedding_provider)
        .secret_flag("--embedding-api-key", api_key)
        .env(PYTHONPATH_VAR, &config.python_path)
        .current_dir(&config.repo_root)
        .build()
}

/// Compares the produced output against the checked-in baseline
pub fn diff_command(config: &HarnessConfig) -> ProcessCommand {
    ProcessCommandBuilder::new(config.diff_script())
        .arg(config.case.folder_name)
        .current_dir(&config.repo_root)
        .build()
}

/// Copies the produced output into the evaluation area
pub fn copy_command(config: &HarnessConfig) -> ProcessCommand {
    ProcessCommandBuilder::new(config.copy_script())
        .arg(&config.output_dir)
        .arg(config.case.folder_name)
        .current_dir(&config.repo_root)
        .build()
}
