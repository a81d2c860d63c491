//! Engine binary acquisition
//!
//! Downloads the version-pinned release archive on first run, verifies its
//! digest when a pin is configured, extracts it into the install directory,
//! and marks the binary executable. Re-runs with the binary already on disk
//! skip the network entirely. Failures abort the run; there is no retry.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{info, warn};
use zip::ZipArchive;

use crate::config::EngineSourceConfig;
use crate::error::{LunodeError, Result};

/// Fetches and installs the engine binary.
pub struct EngineFetcher {
    config: EngineSourceConfig,
}

/// Removes the transient archive when dropped, so a failed extraction does
/// not leave `xray.zip` behind.
struct ArchiveGuard {
    path: PathBuf,
}

impl Drop for ArchiveGuard {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove archive {}: {}", self.path.display(), e);
            }
        }
    }
}

impl EngineFetcher {
    pub fn new(config: EngineSourceConfig) -> Self {
        Self { config }
    }

    /// Whether the engine executable is already on disk. Existence only; no
    /// version or integrity check is made against an installed binary.
    pub fn is_installed(&self) -> bool {
        self.config.binary_path().exists()
    }

    /// Make sure the engine binary exists locally, downloading and
    /// extracting the pinned release if it does not.
    pub async fn ensure_present(&self) -> Result<()> {
        if self.is_installed() {
            info!(
                "Engine already present at {}, skipping download",
                self.config.binary_path().display()
            );
            return Ok(());
        }
        self.fetch_and_install().await
    }

    async fn fetch_and_install(&self) -> Result<()> {
        info!(
            "Downloading engine v{} from {}",
            self.config.version, self.config.download_url
        );

        let response = reqwest::get(self.config.download_url.clone())
            .await?
            .error_for_status()?;
        let bytes = response.bytes().await?;

        self.verify_digest(&bytes)?;
        self.install(&bytes)?;

        info!(
            "Engine v{} installed at {}",
            self.config.version,
            self.config.binary_path().display()
        );
        Ok(())
    }

    /// Check the downloaded archive against the pinned digest, if one is
    /// configured. A mismatch is a fetch failure.
    fn verify_digest(&self, bytes: &[u8]) -> Result<()> {
        let Some(expected) = &self.config.sha256 else {
            warn!("No XRAY_SHA256 pin configured, skipping digest verification");
            return Ok(());
        };

        let digest = Sha256::digest(bytes);
        let actual: String = digest.iter().map(|b| format!("{:02x}", b)).collect();

        if &actual != expected {
            return Err(LunodeError::DigestMismatch {
                expected: expected.clone(),
                actual,
            });
        }
        Ok(())
    }

    /// Persist the archive, extract it into the install directory, and make
    /// the binary executable. The archive is removed whether or not
    /// extraction succeeds.
    fn install(&self, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.config.install_dir)?;
        let _archive = ArchiveGuard {
            path: self.config.archive_path.clone(),
        };
        fs::write(&self.config.archive_path, bytes)?;

        let mut zip = ZipArchive::new(Cursor::new(bytes))?;
        zip.extract(&self.config.install_dir)?;

        let binary = self.config.binary_path();
        if !binary.exists() {
            return Err(LunodeError::Extract(format!(
                "archive did not contain {}",
                binary.display()
            )));
        }
        mark_executable(&binary)?;
        Ok(())
    }
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn source_config(dir: &Path) -> EngineSourceConfig {
        EngineSourceConfig {
            version: "1.8.10".to_string(),
            // Unroutable on purpose; tests must never hit the network.
            download_url: url::Url::parse("https://127.0.0.1:1/xray.zip").unwrap(),
            sha256: None,
            install_dir: dir.join("xray"),
            archive_path: dir.join("xray.zip"),
            profile_path: dir.join("config.json"),
        }
    }

    fn engine_archive() -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            writer
                .start_file("xray", zip::write::FileOptions::default())
                .unwrap();
            writer.write_all(b"#!/bin/sh\nexit 0\n").unwrap();
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[tokio::test]
    async fn test_ensure_present_skips_download_when_installed() {
        let dir = tempfile::tempdir().unwrap();
        let config = source_config(dir.path());

        fs::create_dir_all(&config.install_dir).unwrap();
        fs::write(config.binary_path(), b"stub").unwrap();

        // The download URL is unroutable, so this only succeeds if the
        // existing binary short-circuits the fetch.
        let fetcher = EngineFetcher::new(config);
        fetcher.ensure_present().await.unwrap();
    }

    #[test]
    fn test_install_extracts_and_removes_archive() {
        let dir = tempfile::tempdir().unwrap();
        let config = source_config(dir.path());
        let fetcher = EngineFetcher::new(config.clone());

        fetcher.install(&engine_archive()).unwrap();

        let binary = config.binary_path();
        assert!(binary.exists());
        assert!(!config.archive_path.exists());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&binary).unwrap().permissions().mode();
            assert_eq!(mode & 0o755, 0o755);
        }
    }

    #[test]
    fn test_install_rejects_archive_without_binary() {
        let dir = tempfile::tempdir().unwrap();
        let config = source_config(dir.path());
        let fetcher = EngineFetcher::new(config.clone());

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            writer
                .start_file("README", zip::write::FileOptions::default())
                .unwrap();
            writer.write_all(b"not an engine").unwrap();
            writer.finish().unwrap();
        }

        let err = fetcher.install(&cursor.into_inner()).unwrap_err();
        assert!(matches!(err, LunodeError::Extract(_)));
        // Cleanup happens on the failure path too.
        assert!(!config.archive_path.exists());
    }

    #[test]
    fn test_verify_digest_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = source_config(dir.path());
        config.sha256 = Some("0".repeat(64));

        let fetcher = EngineFetcher::new(config);
        let err = fetcher.verify_digest(b"archive bytes").unwrap_err();
        assert!(matches!(err, LunodeError::DigestMismatch { .. }));
        assert!(err.is_fetch_failure());
    }

    #[test]
    fn test_verify_digest_match() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = source_config(dir.path());
        // sha256 of the empty string.
        config.sha256 = Some(
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855".to_string(),
        );

        let fetcher = EngineFetcher::new(config);
        fetcher.verify_digest(b"").unwrap();
    }
}
