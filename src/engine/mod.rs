//! Engine acquisition, configuration, and process supervision

pub mod fetch;
pub mod process;
pub mod profile;

pub use fetch::EngineFetcher;
pub use process::EngineProcess;
pub use profile::EngineProfile;
