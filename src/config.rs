use std::env;
use std::path::{Path, PathBuf};

use url::Url;
use uuid::Uuid;

use crate::error::{LunodeError, Result};

/// Default listener port handed out when the panel sets none.
pub const DEFAULT_PORT: u16 = 3256;
/// Default public hostname of the node.
pub const DEFAULT_DOMAIN: &str = "node70.lunes.host";
/// Default WebSocket path.
pub const DEFAULT_WS_PATH: &str = "/lunes";
/// Default fragment label on the emitted link.
pub const DEFAULT_LABEL: &str = "lunes_node";
/// Pinned Xray release version.
pub const DEFAULT_ENGINE_VERSION: &str = "1.8.10";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Node parameters (port, client id, public host, ws path)
    pub node: NodeConfig,
    /// Engine acquisition and filesystem layout
    pub engine: EngineSourceConfig,
    /// Logging configuration
    pub log: LogConfig,
}

/// Runtime parameters of the node being deployed.
///
/// Resolved once at startup and never mutated. Fields are passed through to
/// the engine without cross-field validation; the engine decides whether to
/// reject them.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Listener port for the engine and the emitted link (default: 3256)
    pub port: u16,
    /// Client identifier, a UUID string (default: freshly generated)
    pub identifier: String,
    /// Host component of the emitted link (default: node70.lunes.host)
    pub domain: String,
    /// WebSocket path, engine config and link (default: /lunes)
    pub ws_path: String,
    /// Fragment label on the emitted link (default: lunes_node)
    pub label: String,
}

/// Where the engine binary comes from and where it lives on disk.
#[derive(Debug, Clone)]
pub struct EngineSourceConfig {
    /// Pinned engine release version
    pub version: String,
    /// Release-archive URL for the pinned version
    pub download_url: Url,
    /// Expected SHA-256 of the archive, lowercase hex (unset = unverified)
    pub sha256: Option<String>,
    /// Directory the archive is extracted into
    pub install_dir: PathBuf,
    /// Transient archive path, removed after extraction
    pub archive_path: PathBuf,
    /// Engine configuration file, overwritten every run
    pub profile_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level (debug, info, warn, error)
    pub level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let version = get_env_or("XRAY_VERSION", DEFAULT_ENGINE_VERSION);
        let download_url = match env::var("XRAY_DOWNLOAD_URL") {
            Ok(raw) => raw,
            Err(_) => format!(
                "https://github.com/XTLS/Xray-core/releases/download/v{}/Xray-linux-64.zip",
                version
            ),
        };
        let download_url = Url::parse(&download_url).map_err(|e| {
            LunodeError::InvalidConfig(format!("XRAY_DOWNLOAD_URL must be a valid URL: {}", e))
        })?;

        let sha256 = env::var("XRAY_SHA256")
            .ok()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let base = base_dir()?;

        Ok(Config {
            node: NodeConfig {
                port: get_env_or("SERVER_PORT", "3256")
                    .parse()
                    .unwrap_or(DEFAULT_PORT),
                identifier: env::var("UUID").unwrap_or_else(|_| Uuid::new_v4().to_string()),
                domain: get_env_or("DOMAIN", DEFAULT_DOMAIN),
                ws_path: get_env_or("WS_PATH", DEFAULT_WS_PATH),
                label: get_env_or("NODE_LABEL", DEFAULT_LABEL),
            },
            engine: EngineSourceConfig {
                version,
                download_url,
                sha256,
                install_dir: base.join("xray"),
                archive_path: base.join("xray.zip"),
                profile_path: base.join("config.json"),
            },
            log: LogConfig {
                level: get_env_or("LOG_LEVEL", "info"),
            },
        })
    }
}

impl EngineSourceConfig {
    /// Path of the engine executable inside the install directory
    pub fn binary_path(&self) -> PathBuf {
        self.install_dir.join("xray")
    }
}

/// Directory the bootstrapper executable lives in. The engine, archive, and
/// configuration are laid out next to the binary, not the working directory,
/// so re-runs from anywhere find the same installation.
fn base_dir() -> Result<PathBuf> {
    let exe = env::current_exe()?;
    Ok(exe.parent().unwrap_or(Path::new(".")).to_path_buf())
}

/// Get environment variable with a default value
fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
