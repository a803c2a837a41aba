//! On-disk persistence of the active session.
//!
//! The service hands out one secret per sign-in and the mobile SDKs keep it
//! in a cookie jar. A CLI process has no cookie jar, so the secret lives in
//! a dotfile under the home directory between runs.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session fields worth keeping between processes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub secret: String,
    pub saved_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            saved_at: Utc::now(),
        }
    }
}

/// Handle to the session file.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    /// Default location: `~/.vireo/session.json`.
    pub fn default_path() -> Option<Self> {
        dirs::home_dir().map(|home| Self {
            path: home.join(".vireo").join("session.json"),
        })
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the stored session, if one exists and still parses.
    pub fn load(&self) -> Option<StoredSession> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!("cannot read session file: {err}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(err) => {
                tracing::warn!("ignoring malformed session file: {err}");
                None
            }
        }
    }

    pub fn save(&self, session: &StoredSession) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(session).map_err(io::Error::other)?;
        fs::write(&self.path, raw)
    }

    /// Forget the stored session. A missing file is fine.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
