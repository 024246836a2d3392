//! The embedding ingest harness
//!
//! - `case` - the fixed description of what is ingested
//! - `config` - host-dependent paths, process count and credential
//! - `cleanup` - scoped removal of the output and work directories
//! - `stages` - command lines for the ingest, diff and copy steps
//! - `pipeline` - runs the steps under the strict/relaxed failure policy

pub mod case;
pub mod cleanup;
pub mod config;
pub mod pipeline;
pub mod stages;


pub use case::IngestCase;
pub use cleanup::{cleanup_dir, CleanupGuard};
pub use config::{HarnessConfig, Overrides};
pub use pipeline::{Harness, RunOptions, RunOutcome, StageOutcome};
pub use stages::StagePlan;
