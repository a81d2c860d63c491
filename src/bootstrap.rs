//! Node bootstrap sequence
//!
//! Runs the five deployment steps in order: resolve parameters, ensure the
//! engine binary is present, materialize its configuration, report the
//! connection link, and run the engine until it exits. The link is printed
//! before the engine starts so it is visible for the engine's whole
//! lifetime.

use tracing::info;

use crate::config::Config;
use crate::engine::{EngineFetcher, EngineProcess, EngineProfile};
use crate::error::Result;
use crate::link::VlessLink;

pub struct Bootstrapper {
    config: Config,
}

impl Bootstrapper {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the full deployment. Returns when the engine process exits; any
    /// failure along the way aborts the run.
    pub async fn run(&self) -> Result<()> {
        let node = &self.config.node;
        info!(
            "Deploying node: port {}, identifier {}, domain {}, ws path {}",
            node.port, node.identifier, node.domain, node.ws_path
        );

        let fetcher = EngineFetcher::new(self.config.engine.clone());
        fetcher.ensure_present().await?;

        let profile = EngineProfile::for_node(node);
        profile.write_to(&self.config.engine.profile_path).await?;

        let link = VlessLink::from_node(node);
        info!("Node configured, share this link with the client:");
        println!("{}", link);

        let engine = EngineProcess::new(
            self.config.engine.binary_path(),
            self.config.engine.profile_path.clone(),
        );
        engine.run().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EngineSourceConfig, LogConfig, NodeConfig};
    use std::path::Path;

    fn test_config(dir: &Path) -> Config {
        Config {
            node: NodeConfig {
                port: 3256,
                identifier: "11111111-1111-1111-1111-111111111111".to_string(),
                domain: "node70.lunes.host".to_string(),
                ws_path: "/lunes".to_string(),
                label: "lunes_node".to_string(),
            },
            engine: EngineSourceConfig {
                version: "1.8.10".to_string(),
                // Unroutable on purpose; the fetch must fail.
                download_url: url::Url::parse("https://127.0.0.1:1/xray.zip").unwrap(),
                sha256: None,
                install_dir: dir.join("xray"),
                archive_path: dir.join("xray.zip"),
                profile_path: dir.join("config.json"),
            },
            log: LogConfig {
                level: "info".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_failed_fetch_aborts_before_writing_profile() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let profile_path = config.engine.profile_path.clone();

        let err = Bootstrapper::new(config).run().await.unwrap_err();

        assert!(err.is_fetch_failure());
        // A failed acquisition must leave no configuration file behind.
        assert!(!profile_path.exists());
    }
}
