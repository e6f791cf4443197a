//! Session recording
//!
//! Persists every request/response pair as pretty-printed JSON. Recording is
//! observational: a failed write is logged and never fails the command.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::error::Result;
use crate::protocol::{Request, Response};

/// Writes `{command}-request.json` / `{command}-response.json` files
#[derive(Debug, Clone)]
pub struct SessionRecorder {
    dir: PathBuf,
}

impl SessionRecorder {
    /// Start a session under `{root}/{unix_seconds}/`
    pub fn create(root: &Path) -> Result<Self> {
        let started = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Self::create_at(root.join(started.to_string()))
    }

    /// Start a session in an explicit directory
    pub fn create_at(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        tracing::info!("Recording session to {}", dir.display());
        Ok(Self { dir })
    }

    /// Directory this session writes into
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn request_path(&self, command: &str) -> PathBuf {
        self.dir.join(format!("{}-request.json", command))
    }

    pub fn response_path(&self, command: &str) -> PathBuf {
        self.dir.join(format!("{}-response.json", command))
    }

    pub fn record_request(&self, request: &Request) {
        let path = self.request_path(&request.command);
        if let Err(e) = write_pretty(&path, request) {
            tracing::warn!("Failed to record {}: {}", path.display(), e);
        }
    }

    pub fn record_response(&self, command: &str, response: &Response) {
        let path = self.response_path(command);
        if let Err(e) = write_pretty(&path, response) {
            tracing::warn!("Failed to record {}: {}", path.display(), e);
        }
    }
}

fn write_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text)?;
    Ok(())
}
