//! Lunode - Entry Point
//!
//! Loads configuration, initializes tracing, and runs the bootstrap
//! sequence. Any error is logged and terminates the process with exit
//! status 1; no failure is recovered past.

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lunode::{Bootstrapper, Config};

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize tracing (RUST_LOG wins over LOG_LEVEL)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("lunode={}", config.log.level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Lunode bootstrapper");

    if let Err(e) = Bootstrapper::new(config).run().await {
        if e.is_fetch_failure() {
            error!("Engine acquisition failed: {}", e);
        } else {
            error!("Deployment failed: {}", e);
        }
        std::process::exit(1);
    }

    info!("Lunode bootstrapper stopped");
}
