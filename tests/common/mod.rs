//! Shared utilities for integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use email_gate::allowlist::FileSource;
use email_gate::Validator;
use tempfile::TempDir;

/// Allow-list file in a private temp directory.
///
/// Rewrites go through a rename so the refresh task never reads a
/// half-written file.
pub struct EmailsFile {
    _dir: TempDir,
    path: PathBuf,
}

#[allow(dead_code)]
impl EmailsFile {
    pub fn new(emails: &[&str]) -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("authenticated_emails.csv");
        let file = Self { _dir: dir, path };
        file.write_emails(emails);
        file
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_emails(&self, emails: &[&str]) {
        self.write_raw(&emails.join("\n"));
    }

    pub fn write_raw(&self, content: &str) {
        let staging = self.path.with_extension("staging");
        fs::write(&staging, content).unwrap();
        fs::rename(&staging, &self.path).unwrap();
    }

    pub fn remove(&self) {
        fs::remove_file(&self.path).unwrap();
    }

    pub fn validator(&self, domains: &[&str], interval: Duration) -> Validator {
        Validator::with_source(domains, Arc::new(FileSource::new(self.path())), interval).unwrap()
    }
}

/// Poll `condition` until it holds, panicking after five seconds.
#[allow(dead_code)]
pub async fn eventually<F: Fn() -> bool>(what: &str, condition: F) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(tokio::time::Instant::now() < deadline, "timed out waiting for: {what}");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
