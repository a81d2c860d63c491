//! Lunode - Xray Node Bootstrapper
//!
//! A small deployment tool for panel-hosted VLESS nodes. It resolves node
//! parameters from environment variables, downloads the pinned Xray release
//! on first run, writes the engine's JSON configuration, prints a shareable
//! VLESS link, and runs the engine as a supervised child process.
//!
//! ## Features
//!
//! - Environment-driven configuration with documented defaults
//! - Version-pinned engine download with optional SHA-256 verification
//! - Idempotent re-runs (an installed engine skips the network entirely)
//! - Single-client VLESS-over-WebSocket engine profile generation

pub mod bootstrap;
pub mod config;
pub mod engine;
pub mod error;
pub mod link;

pub use bootstrap::Bootstrapper;
pub use config::Config;
pub use error::{LunodeError, Result};
pub use link::VlessLink;
