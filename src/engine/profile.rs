//! Engine configuration profile
//!
//! Mirrors the subset of Xray's JSON config schema this deployment uses: one
//! VLESS inbound over WebSocket and one freedom outbound. The profile is
//! serialized pretty-printed to disk, consumed by the engine process, and
//! never read back.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::NodeConfig;
use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineProfile {
    pub log: LogSettings,
    pub inbounds: Vec<Inbound>,
    pub outbounds: Vec<Outbound>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    pub loglevel: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inbound {
    pub port: u16,
    pub protocol: String,
    pub settings: InboundSettings,
    #[serde(rename = "streamSettings")]
    pub stream_settings: StreamSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundSettings {
    pub clients: Vec<Client>,
    pub decryption: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub level: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamSettings {
    pub network: String,
    #[serde(rename = "wsSettings")]
    pub ws_settings: WsSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsSettings {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outbound {
    pub protocol: String,
}

impl EngineProfile {
    /// Build the single-client profile for a node: one VLESS inbound on the
    /// node's port with the node's identifier as the only allowed client,
    /// WebSocket transport on the node's path, direct passthrough egress.
    pub fn for_node(node: &NodeConfig) -> Self {
        Self {
            log: LogSettings {
                loglevel: "warning".to_string(),
            },
            inbounds: vec![Inbound {
                port: node.port,
                protocol: "vless".to_string(),
                settings: InboundSettings {
                    clients: vec![Client {
                        id: node.identifier.clone(),
                        level: 0,
                    }],
                    decryption: "none".to_string(),
                },
                stream_settings: StreamSettings {
                    network: "ws".to_string(),
                    ws_settings: WsSettings {
                        path: node.ws_path.clone(),
                    },
                },
            }],
            outbounds: vec![Outbound {
                protocol: "freedom".to_string(),
            }],
        }
    }

    /// Overwrite `path` with the pretty-printed profile. Stale contents from
    /// a previous run are replaced unconditionally.
    pub async fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        info!("Engine configuration written to {}", path.display());
        Ok(())
    }
}
