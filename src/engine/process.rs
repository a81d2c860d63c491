//! Engine child process
//!
//! Runs the engine binary with the materialized configuration, inheriting
//! the bootstrapper's stdio so engine output lands on the same terminal. The
//! child is supervised until it exits or the bootstrapper receives a
//! shutdown signal; there is no restart policy.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;
use tokio::signal;
use tracing::info;

use crate::error::{LunodeError, Result};

pub struct EngineProcess {
    binary: PathBuf,
    profile: PathBuf,
}

impl EngineProcess {
    pub fn new(binary: PathBuf, profile: PathBuf) -> Self {
        Self { binary, profile }
    }

    /// Build the engine invocation: `<binary> run -c <profile>` with
    /// inherited stdio.
    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("run")
            .arg("-c")
            .arg(&self.profile)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }

    /// Spawn the engine and wait for it to exit. A non-zero exit status is
    /// an error; Ctrl+C or SIGTERM stops the engine and returns cleanly.
    pub async fn run(&self) -> Result<()> {
        info!("Starting engine: {} run -c {}", self.binary.display(), self.profile.display());
        let mut child = self.command().spawn()?;

        tokio::select! {
            status = child.wait() => {
                let status = status?;
                if status.success() {
                    info!("Engine exited cleanly");
                    Ok(())
                } else {
                    Err(LunodeError::EngineFailed(status))
                }
            }
            _ = shutdown_signal() => {
                info!("Shutdown signal received, stopping engine");
                child.kill().await?;
                Ok(())
            }
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
