//! On-disk session persistence so a restart does not log the user out.

use std::fs;
use std::path::PathBuf;
use tracing::warn;

use super::models::Session;

/// Stores the active session as JSON under the user's home directory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Default location: `~/.stexam/session.json`.
    pub fn from_home() -> Option<Self> {
        home::home_dir().map(|h| Self::at(h.join(".stexam").join("session.json")))
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Option<Session> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Discarding unreadable session file");
                None
            }
        }
    }

    pub fn save(&self, session: &Session) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!(path = %parent.display(), error = %e, "Failed to create session directory");
                return;
            }
        }
        match serde_json::to_string(session) {
            Ok(raw) => {
                if let Err(e) = fs::write(&self.path, raw) {
                    warn!(path = %self.path.display(), error = %e, "Failed to persist session");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize session"),
        }
    }

    pub fn clear(&self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                warn!(path = %self.path.display(), error = %e, "Failed to remove session file");
            }
        }
    }
}
