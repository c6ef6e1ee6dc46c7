//! Durable single-slot credential persistence. The browser original kept the
//! access token under one localStorage key; here it is one file under the
//! state directory. Absence of the file means logged out.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(state_dir: &Path) -> Self {
        Self { path: state_dir.join("credential") }
    }

    /// Read the persisted credential, if any. Unreadable or empty files are
    /// treated the same as absence.
    pub fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// `save(Some(tok))` overwrites the slot; `save(None)` removes it.
    /// Synchronous: callers rely on the write being durable before any
    /// dependent async work is started.
    pub fn save(&self, token: Option<&str>) -> io::Result<()> {
        match token {
            Some(tok) => {
                if let Some(dir) = self.path.parent() {
                    fs::create_dir_all(dir)?;
                }
                fs::write(&self.path, tok)
            }
            None => match fs::remove_file(&self.path) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
                _ => Ok(()),
            },
        }
    }
}
