//! File-backed session state.
//!
//! Persists the session key/value pairs to `~/.assethub/session.toml` so a
//! login survives across invocations. Writes are best-effort, matching the
//! infallible `SessionState` contract; a failed write keeps the in-memory
//! view and logs a warning.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use assethub_core::session::SessionState;

/// On-disk form of the session file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default)]
    values: BTreeMap<String, String>,
}

/// Return the path to the session file (`~/.assethub/session.toml`).
pub fn session_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".assethub").join("session.toml"))
}

/// `SessionState` persisted to a TOML file.
pub struct FileSessionState {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileSessionState {
    /// Open the session file, starting empty if it is missing or unreadable.
    pub fn open(path: PathBuf) -> Self {
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<SessionFile>(&content) {
                Ok(file) => file.values,
                Err(error) => {
                    warn!(%error, path = %path.display(), "session file is malformed, starting empty");
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };

        Self {
            path,
            values: Mutex::new(values),
        }
    }

    fn persist(&self, values: &BTreeMap<String, String>) {
        let file = SessionFile {
            values: values.clone(),
        };
        let content = match toml::to_string_pretty(&file) {
            Ok(content) => content,
            Err(error) => {
                warn!(%error, "failed to serialize session file");
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            if let Err(error) = std::fs::create_dir_all(parent) {
                warn!(%error, path = %parent.display(), "failed to create session directory");
                return;
            }
        }
        if let Err(error) = std::fs::write(&self.path, content) {
            warn!(%error, path = %self.path.display(), "failed to write session file");
        }
    }
}

impl SessionState for FileSessionState {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = self.values.lock();
        values.insert(key.to_string(), value.to_string());
        self.persist(&values);
    }

    fn remove(&self, key: &str) {
        let mut values = self.values.lock();
        if values.remove(key).is_some() {
            self.persist(&values);
        }
    }

    fn clear(&self) {
        let mut values = self.values.lock();
        values.clear();
        self.persist(&values);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use assethub_core::session::keys;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");

        let state = FileSessionState::open(path.clone());
        state.set(keys::TOKEN, "tok");
        state.set(keys::ROLE_CODE, "asset_manager");
        drop(state);

        let reopened = FileSessionState::open(path);
        assert_eq!(reopened.get(keys::TOKEN), Some("tok".to_string()));
        assert_eq!(reopened.get(keys::ROLE_CODE), Some("asset_manager".to_string()));
    }

    #[test]
    fn test_remove_and_clear_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");

        let state = FileSessionState::open(path.clone());
        state.set(keys::TOKEN, "tok");
        state.remove(keys::TOKEN);
        drop(state);
        assert_eq!(FileSessionState::open(path.clone()).get(keys::TOKEN), None);

        let state = FileSessionState::open(path.clone());
        state.set(keys::USERNAME, "alice");
        state.clear();
        drop(state);
        assert_eq!(FileSessionState::open(path).get(keys::USERNAME), None);
    }

    #[test]
    fn test_malformed_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        std::fs::write(&path, "not [valid toml").unwrap();

        let state = FileSessionState::open(path);
        assert_eq!(state.get(keys::TOKEN), None);
    }
}
