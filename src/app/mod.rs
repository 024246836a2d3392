//! Application module
//!
//! Process-level concerns around a harness run:
//! - Configuration of verbosity
//! - Logging setup
//! - Error reporting and exit codes
//! - Runtime entry point

pub mod config;
pub mod error_handling;
pub mod logging;
pub mod runtime;

pub use config::AppConfig;
pub use error_handling::report_error;
pub use logging::init_logging;
pub use runtime::run_app;
