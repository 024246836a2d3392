//! Orchestration of a single harness run
//!
//! A run has two phases. The ingest phase is strict: a failure ends the run
//! with that step's exit code. The verification phase is relaxed: the diff
//! and copy steps always both run and the run's exit code is that of the
//! copy step.
//!
//! An interrupted step ends the run in either phase.

use tracing::{info, warn};

use super::cleanup::CleanupGuard;
use super::config::HarnessConfig;
use super::stages::StagePlan;
use crate::error::{HarnessError, Stage};
use crate::subprocess::{ProcessCommand, ProcessError, SubprocessManager};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Print the planned commands instead of running them
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutcome {
    pub stage: Stage,
    pub exit_code: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    pub stages: Vec<StageOutcome>,
    pub exit_code: i32,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

pub struct Harness {
    subprocess: SubprocessManager,
}

impl Harness {
    pub fn new(subprocess: SubprocessManager) -> Self {
        Self { subprocess }
    }

    pub async fn run(
        &self,
        config: &HarnessConfig,
        options: RunOptions,
    ) -> Result<RunOutcome, HarnessError> {
        // Registered first so every exit path below, the skip included, removes the dirs
        let _cleanup = CleanupGuard::register(config.scratch_dirs());

        let api_key = config.api_key()?;
        let plan = StagePlan::new(config, api_key);

        if options.dry_run {
            for (stage, command) in plan.steps() {
                println!("# {stage}");
                println!("{}", command.display_line());
            }
            return Ok(RunOutcome::default());
        }

        let mut outcome = RunOutcome::default();

        let ingest_code = self.run_strict(Stage::Ingest, &plan.ingest).await?;
        outcome.stages.push(StageOutcome {
            stage: Stage::Ingest,
            exit_code: ingest_code,
        });

        for (stage, command) in [
            (Stage::DiffCheck, &plan.diff),
            (Stage::EvaluationCopy, &plan.copy),
        ] {
            let exit_code = self.run_relaxed(stage, command).await?;
            outcome.stages.push(StageOutcome { stage, exit_code });
            outcome.exit_code = exit_code;
        }

        if outcome.success() {
            info!("Harness run for {} completed", config.case.folder_name);
        } else {
            warn!(
                "Harness run for {} finished with exit code {}",
                config.case.folder_name, outcome.exit_code
            );
        }

        Ok(outcome)
    }

    async fn run_strict(&self, stage: Stage, command: &ProcessCommand) -> Result<i32, HarnessError> {
        info!("Running {} step", stage);

        let output = self
            .subprocess
            .runner()
            .run(command.clone())
            .await
            .map_err(|source| match source {
                ProcessError::Interrupted => HarnessError::Interrupted,
                source => HarnessError::Spawn { stage, source },
            })?;

        let code = output.status.code();
        if code != 0 {
            return Err(HarnessError::StageFailed { stage, code });
        }
        Ok(code)
    }

    async fn run_relaxed(&self, stage: Stage, command: &ProcessCommand) -> Result<i32, HarnessError> {
        info!("Running {} step", stage);

        match self.subprocess.runner().run(command.clone()).await {
            Ok(output) if output.status.success() => Ok(0),
            Ok(output) => {
                let code = output.status.code();
                warn!("{} step exited with code {}, continuing", stage, code);
                Ok(code)
            }
            Err(ProcessError::Interrupted) => Err(HarnessError::Interrupted),
            Err(e) => {
                warn!("Could not run {} step: {}, continuing", stage, e);
                Ok(e.exit_code())
            }
        }
    }
}
