use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use ingest_e2e::app::{init_logging, report_error, run_app, AppConfig};
use ingest_e2e::harness::{Overrides, RunOptions};

/// Run the OctoAI embedding ingest end-to-end test
///
/// Configuration comes from the environment: OCTOAI_API_KEY (required),
/// OUTPUT_ROOT and MAX_PROCESSES (optional).
#[derive(Parser)]
#[command(name = "ingest-e2e", version)]
#[command(about = "Run the OctoAI embedding ingest end-to-end test", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Directory holding the diff and copy scripts (default: this executable's directory)
    #[arg(long, value_name = "DIR")]
    script_dir: Option<PathBuf>,

    /// Ingestion executable to invoke
    #[arg(long, value_name = "PROGRAM")]
    ingest_program: Option<OsString>,

    /// Print the commands that would run, without running them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = AppConfig::new(cli.verbose);
    init_logging(&config);

    let overrides = Overrides {
        script_dir: cli.script_dir,
        ingest_program: cli.ingest_program,
    };
    let options = RunOptions {
        dry_run: cli.dry_run,
    };

    // The run (and its cleanup guard) has finished by the time we exit
    let code = match run_app(overrides, options).await {
        Ok(code) => code,
        Err(e) => report_error(&e, cli.verbose),
    };
    std::process::exit(code);
}
