//! Persisted session state abstraction.
//!
//! The client core never talks to a storage backend directly. Everything it
//! persists goes through `SessionState`, a process-wide string key/value
//! contract with browser-storage semantics: infallible, last write wins.
//! Implementations decide durability; `MemorySessionState` is the in-process
//! default and the test double.

use std::collections::HashMap;

use parking_lot::RwLock;

/// Well-known session state keys.
pub mod keys {
    /// The opaque bearer credential.
    pub const TOKEN: &str = "token";
    /// Login name of the authenticated user.
    pub const USERNAME: &str = "username";
    /// Display name of the authenticated user.
    pub const FULL_NAME: &str = "fullName";
    /// Role code derived from the credential claim.
    pub const ROLE_CODE: &str = "roleCode";
    /// JSON array of granted `resource:action` pairs.
    pub const PERMISSIONS: &str = "assethub_permissions";
    /// Department scope preference for the assets landing redirect.
    pub const DEPT_SCOPE: &str = "assetDeptScope";
}

/// Process-wide persisted key/value state.
pub trait SessionState: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str);

    /// Remove a single key.
    fn remove(&self, key: &str);

    /// Remove every key.
    fn clear(&self);
}

/// In-memory session state.
#[derive(Default)]
pub struct MemorySessionState {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySessionState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionState for MemorySessionState {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values.write().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.write().remove(key);
    }

    fn clear(&self) {
        self.values.write().clear();
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let state = MemorySessionState::new();
        assert_eq!(state.get(keys::TOKEN), None);

        state.set(keys::TOKEN, "abc");
        state.set(keys::TOKEN, "def");
        assert_eq!(state.get(keys::TOKEN), Some("def".to_string()));

        state.remove(keys::TOKEN);
        assert_eq!(state.get(keys::TOKEN), None);
    }

    #[test]
    fn test_clear_removes_everything() {
        let state = MemorySessionState::new();
        state.set(keys::TOKEN, "abc");
        state.set(keys::DEPT_SCOPE, "office");
        state.clear();
        assert_eq!(state.get(keys::TOKEN), None);
        assert_eq!(state.get(keys::DEPT_SCOPE), None);
    }
}
