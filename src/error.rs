use thiserror::Error;

/// Unified error type for the Lunode bootstrapper
#[derive(Error, Debug)]
pub enum LunodeError {
    // Engine acquisition errors
    #[error("Engine download failed: {0}")]
    Fetch(String),

    #[error("Engine archive digest mismatch (expected {expected}, got {actual})")]
    DigestMismatch { expected: String, actual: String },

    #[error("Engine archive extraction failed: {0}")]
    Extract(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // Engine runtime errors
    #[error("Engine exited with {0}")]
    EngineFailed(std::process::ExitStatus),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Lunode operations
pub type Result<T> = std::result::Result<T, LunodeError>;

impl LunodeError {
    /// True for any failure during binary acquisition (network, digest,
    /// archive). These all abort the run before a configuration is written.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            LunodeError::Fetch(_)
                | LunodeError::DigestMismatch { .. }
                | LunodeError::Extract(_)
                | LunodeError::Http(_)
                | LunodeError::Zip(_)
        )
    }
}
