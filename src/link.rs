//! VLESS connection link for the deployed node.
//!
//! The link is the sole machine-consumable output of a run: one URI a client
//! pastes into their VLESS client to reach the configured engine instance.

use std::fmt;

use crate::config::NodeConfig;

/// Shareable connection descriptor for a deployed node.
///
/// Formats as
/// `vless://<id>@<domain>:<port>?encryption=none&security=none&type=ws&path=<path>#<label>`.
/// The transport is a plain WebSocket stream with no encryption or security
/// layer; the query string is fixed apart from the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VlessLink {
    identifier: String,
    domain: String,
    port: u16,
    ws_path: String,
    label: String,
}

impl VlessLink {
    pub fn from_node(node: &NodeConfig) -> Self {
        Self {
            identifier: node.identifier.clone(),
            domain: node.domain.clone(),
            port: node.port,
            ws_path: node.ws_path.clone(),
            label: node.label.clone(),
        }
    }
}

impl fmt::Display for VlessLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "vless://{}@{}:{}?encryption=none&security=none&type=ws&path={}#{}",
            self.identifier, self.domain, self.port, self.ws_path, self.label
        )
    }
}
