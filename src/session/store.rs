//! Session cache file
//!
//! The session lives in the user cache directory
//! (`~/.cache/hosp-locate/session.json`). A missing, unreadable or corrupt
//! file loads as a signed-out session rather than an error.

use crate::config::defaults::APP_DIR_NAME;
use crate::constants::session::SESSION_CACHE_FILE;
use crate::error::{Error, Result};
use crate::session::Session;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Reads and writes the session cache
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store at the default cache path
    pub fn new() -> Result<Self> {
        let path = dirs::cache_dir()
            .map(|p| p.join(APP_DIR_NAME).join(SESSION_CACHE_FILE))
            .ok_or_else(|| Error::Session("Could not determine cache directory".to_string()))?;
        Ok(Self { path })
    }

    /// Store at a specific path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the configured path, or the default one
    pub fn from_config_path(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Ok(Self::with_path(path)),
            None => Self::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached session
    pub fn load(&self) -> Session {
        if !self.path.exists() {
            return Session::new();
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read session cache {}: {}", self.path.display(), e);
                return Session::new();
            }
        };

        match serde_json::from_str::<Session>(&content) {
            Ok(session) => {
                debug!(signed_in = session.is_signed_in(), "Loaded session cache");
                session
            }
            Err(e) => {
                warn!("Ignoring corrupt session cache {}: {}", self.path.display(), e);
                Session::new()
            }
        }
    }

    /// Save the session
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Session(format!("Failed to create cache directory: {}", e))
            })?;
        }

        let content = serde_json::to_string_pretty(session)?;

        fs::write(&self.path, content).map_err(|e| {
            Error::Session(format!("Failed to write session cache: {}", e))
        })?;

        Ok(())
    }

    /// Delete the cache file
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Session(format!("Failed to remove session cache: {}", e))),
        }
    }
}
