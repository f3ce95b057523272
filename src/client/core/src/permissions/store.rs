//! Capability store: answers capability queries against the persisted
//! session state.
//!
//! Resolution rule, in order:
//! 1. The unrestricted role code satisfies everything.
//! 2. No capability list recorded, or a recorded empty list → satisfied
//!    (fail-open; supports first paint before permissions load).
//! 3. A recorded list that fails to parse → denied, uniformly for every
//!    query, until the list is rewritten or cleared.
//! 4. Otherwise, exact (resource, action) membership.

use std::sync::Arc;

use tracing::warn;

use super::models::{Capability, CapabilityRequirement, RoleCode, DEFAULT_ACTION};
use crate::error::{AssetHubError, Result};
use crate::session::{keys, SessionState};

/// Answers yes/no capability queries for the current actor.
#[derive(Clone)]
pub struct CapabilityStore {
    state: Arc<dyn SessionState>,
}

impl CapabilityStore {
    /// Create a store over the given session state.
    pub fn new(state: Arc<dyn SessionState>) -> Self {
        Self { state }
    }

    /// The actor's current role code (empty when none is recorded).
    pub fn role_code(&self) -> RoleCode {
        self.state
            .get(keys::ROLE_CODE)
            .map(RoleCode::from)
            .unwrap_or_default()
    }

    /// Whether the capability list has been recorded for this session.
    pub fn is_loaded(&self) -> bool {
        self.state.get(keys::PERMISSIONS).is_some()
    }

    /// The recorded capability list. `Ok(None)` when nothing is recorded yet;
    /// `MalformedPermissions` when a recorded list cannot be parsed.
    pub fn recorded_capabilities(&self) -> Result<Option<Vec<Capability>>> {
        let raw = match self.state.get(keys::PERMISSIONS) {
            Some(raw) => raw,
            None => return Ok(None),
        };
        let pairs: Vec<String> = serde_json::from_str(&raw)
            .map_err(|error| AssetHubError::MalformedPermissions(error.to_string()))?;
        Ok(Some(
            pairs.iter().filter_map(|p| Capability::parse(p)).collect(),
        ))
    }

    /// Whether the actor may perform `action` on `resource`.
    pub fn has_capability(&self, resource: &str, action: &str) -> bool {
        if self.role_code().is_unrestricted() {
            return true;
        }

        let raw = match self.state.get(keys::PERMISSIONS) {
            Some(raw) => raw,
            // Nothing recorded yet: fail-open until permissions load.
            None => return true,
        };

        let pairs: Vec<String> = match serde_json::from_str(&raw) {
            Ok(pairs) => pairs,
            Err(error) => {
                warn!(%error, "stored permission list is malformed, denying capability queries");
                return false;
            }
        };

        if pairs.is_empty() {
            return true;
        }

        let wanted = format!("{}:{}", resource, action);
        pairs.iter().any(|pair| pair == &wanted)
    }

    /// Whether the actor may view `resource`.
    pub fn has_view_capability(&self, resource: &str) -> bool {
        self.has_capability(resource, DEFAULT_ACTION)
    }

    /// Whether any of the listed capabilities is granted.
    pub fn has_any_capability(&self, capabilities: &[Capability]) -> bool {
        capabilities
            .iter()
            .any(|capability| self.has_capability(&capability.resource, &capability.action))
    }

    /// Whether a resolved route requirement is satisfied.
    pub fn satisfies(&self, requirement: &CapabilityRequirement) -> bool {
        self.has_any_capability(requirement.capabilities())
    }
}

impl std::fmt::Debug for CapabilityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityStore")
            .field("role_code", &self.role_code())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::models::UNRESTRICTED_ROLE;
    use crate::session::MemorySessionState;

    fn store_with(entries: &[(&str, &str)]) -> CapabilityStore {
        let state = Arc::new(MemorySessionState::new());
        for (key, value) in entries {
            state.set(key, value);
        }
        CapabilityStore::new(state)
    }

    #[test]
    fn test_unrestricted_role_satisfies_everything() {
        let store = store_with(&[
            (keys::ROLE_CODE, UNRESTRICTED_ROLE),
            (keys::PERMISSIONS, "[]"),
        ]);
        assert!(store.has_capability("office_hardware_assets", "delete"));
        assert!(store.has_capability("anything", "anything"));
    }

    #[test]
    fn test_fail_open_before_permissions_load() {
        let store = store_with(&[(keys::ROLE_CODE, "it_operator")]);
        assert!(!store.is_loaded());
        assert!(store.has_capability("assets", "update"));
        assert!(store.has_view_capability("logs"));
    }

    #[test]
    fn test_recorded_empty_list_is_permissive() {
        let store = store_with(&[(keys::ROLE_CODE, "it_operator"), (keys::PERMISSIONS, "[]")]);
        assert!(store.has_capability("assets", "update"));
    }

    #[test]
    fn test_exact_membership_once_loaded() {
        let store = store_with(&[
            (keys::ROLE_CODE, "it_operator"),
            (
                keys::PERMISSIONS,
                r#"["maintenance:view","office_hardware_assets:view"]"#,
            ),
        ]);
        assert!(store.has_capability("maintenance", "view"));
        assert!(store.has_view_capability("office_hardware_assets"));
        assert!(!store.has_capability("assets", "update"));
        assert!(!store.has_capability("maintenance", "update"));
        assert_eq!(store.recorded_capabilities().unwrap().unwrap().len(), 2);
    }

    #[test]
    fn test_malformed_list_denies_uniformly() {
        let store = store_with(&[
            (keys::ROLE_CODE, "it_operator"),
            (keys::PERMISSIONS, "{not json"),
        ]);
        assert!(!store.has_capability("maintenance", "view"));
        assert!(!store.has_view_capability("dashboard"));
        assert!(matches!(
            store.recorded_capabilities(),
            Err(AssetHubError::MalformedPermissions(_))
        ));
        // The unrestricted role is unaffected by corruption.
        let admin = store_with(&[
            (keys::ROLE_CODE, UNRESTRICTED_ROLE),
            (keys::PERMISSIONS, "{not json"),
        ]);
        assert!(admin.has_capability("maintenance", "view"));
    }

    #[test]
    fn test_any_of_disjunction() {
        let store = store_with(&[
            (keys::ROLE_CODE, "dc_operator"),
            (keys::PERMISSIONS, r#"["datacenter_hardware_assets:view"]"#),
        ]);
        let requirement = CapabilityRequirement::AnyOf(vec![
            Capability::view("office_hardware_assets"),
            Capability::view("datacenter_hardware_assets"),
        ]);
        assert!(store.satisfies(&requirement));
        assert!(!store.satisfies(&CapabilityRequirement::One(Capability::new(
            "office_hardware_assets",
            "view"
        ))));
    }
}
