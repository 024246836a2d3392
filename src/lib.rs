//! # ingest-e2e
//!
//! End-to-end harness for the OctoAI embedding ingest case. It runs the
//! `unstructured-ingest` CLI against a fixed document, then diffs the result
//! against the expected output and copies it for evaluation.
//!
//! ## Usage
//!
//! ```bash
//! OCTOAI_API_KEY=... ingest-e2e [-v] [--script-dir DIR] [--ingest-program PROGRAM] [--dry-run]
//! ```
//!
//! ## Modules
//!
//! - `app` - Logging, error reporting and the runtime entry point
//! - `env` - Trait-based access to environment variables and host facts
//! - `error` - Harness error type and exit codes
//! - `harness` - Configuration, cleanup and the staged run itself
//! - `subprocess` - Subprocess abstraction layer for testing
pub mod app;
pub mod env;
pub mod error;
pub mod harness;
pub mod subprocess;
