//! Error handling utilities

use crate::error::HarnessError;
use tracing::{error, info};

/// Report an error and return the process exit code for it
///
/// - `HarnessError`: the user message, with the exit code it carries
/// - anything else: the message and exit code 1
///
/// With `verbose >= 1` the full error chain is printed as well.
pub fn report_error(error: &anyhow::Error, verbose: u8) -> i32 {
    if let Some(harness_err) = error.downcast_ref::<HarnessError>() {
        if harness_err.is_skip() {
            info!("Run skipped: {}", harness_err);
            // A skip goes to stdout like any other status line of the run
            println!("{}", harness_err.user_message());
            return harness_err.exit_code();
        }

        error!("Fatal error: {}", harness_err);
        eprintln!("{}", harness_err.user_message());
        print_chain(error, verbose);
        return harness_err.exit_code();
    }

    error!("Fatal error: {}", error);
    eprintln!("Error: {error}");
    print_chain(error, verbose);
    1
}

fn print_chain(error: &anyhow::Error, verbose: u8) {
    if verbose >= 1 {
        eprintln!("\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            eprintln!("  {}: {}", i, cause);
        }
    }
}
