use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::Session;

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The saved session between runs (session.json in the state directory)
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        SessionStore { path }
    }

    /// Store under the default state directory
    pub fn default_location() -> Self {
        SessionStore::new(super::state_dir().join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The saved session. Missing or unreadable files read as none.
    pub fn load(&self) -> Option<Session> {
        let content = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring corrupt session file");
                None
            }
        }
    }

    /// Write atomically: temp file in the same directory, then rename
    pub fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        let write_err = |source| SessionStoreError::WriteError {
            path: self.path.clone(),
            source,
        };
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(write_err)?;
        let content = serde_json::to_string_pretty(session)?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(content.as_bytes()).map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionStoreError::WriteError {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
