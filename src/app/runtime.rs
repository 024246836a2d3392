//! Runtime entry point for a harness run

use anyhow::Result;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::env::RealEnv;
use crate::harness::{Harness, HarnessConfig, Overrides, RunOptions};
use crate::subprocess::SubprocessManager;

/// Resolve configuration from the real environment and run the harness.
///
/// Returns the exit code of a completed run. Ctrl-C kills and reaps the
/// running step; the run then ends with [`crate::error::HarnessError::Interrupted`]
/// after its cleanup guard has removed the scratch directories.
pub async fn run_app(overrides: Overrides, options: RunOptions) -> Result<i32> {
    let config = HarnessConfig::resolve(&RealEnv::new(), &overrides)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let listener = listen_for_interrupt(shutdown_tx)?;

    let harness = Harness::new(SubprocessManager::interruptible(shutdown_rx));
    let outcome = harness.run(&config, options).await;

    listener.abort();
    Ok(outcome?.exit_code)
}

/// Install the SIGINT handler now and flip `shutdown` when it fires
#[cfg(unix)]
fn listen_for_interrupt(shutdown: watch::Sender<bool>) -> Result<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupts = signal(SignalKind::interrupt())?;
    Ok(tokio::spawn(async move {
        if interrupts.recv().await.is_some() {
            info!("Received Ctrl-C, stopping");
            let _ = shutdown.send(true);
        }
    }))
}

#[cfg(not(unix))]
fn listen_for_interrupt(shutdown: watch::Sender<bool>) -> Result<JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl-C, stopping");
                let _ = shutdown.send(true);
            }
            Err(e) => tracing::warn!("Could not listen for Ctrl-C: {}", e),
        }
    }))
}
