//! Navigation guard: the per-attempt allow/redirect decision.
//!
//! The guard composes its collaborators (route table, permission resolver,
//! capability store, persisted session state) into one synchronous decision.
//! It holds no state of its own; every attempt is decided from scratch
//! against already-loaded session data.

use std::sync::Arc;

use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{AssetHubError, Result};
use crate::permissions::{CapabilityStore, PermissionResolver};
use crate::routes::{RouteTable, RouteTarget, ViewId};
use crate::session::{keys, SessionState};

/// The generic assets landing path, resolved to a department-scoped variant.
pub const ASSETS_LANDING: &str = "/assets";

// ═══════════════════════════════════════════════════════════════════════════════
// Decision
// ═══════════════════════════════════════════════════════════════════════════════

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Proceed to the requested path.
    Allow,
    /// Go to the given path instead.
    Redirect(String),
}

impl NavigationDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// The redirect target, if any.
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::Allow => None,
            Self::Redirect(path) => Some(path),
        }
    }

    fn redirect(path: &str) -> Self {
        Self::Redirect(path.to_string())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Department Scope
// ═══════════════════════════════════════════════════════════════════════════════

/// Department scope preference for hardware asset screens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DepartmentScope {
    #[default]
    Office,
    Datacenter,
}

impl DepartmentScope {
    /// Persisted marker selecting the datacenter scope. Any other stored
    /// value, or none, selects the office scope.
    pub const DATACENTER_MARKER: &'static str = "数据中心";

    /// Interpret the persisted preference value.
    pub fn from_preference(value: Option<&str>) -> Self {
        match value {
            Some(Self::DATACENTER_MARKER) => Self::Datacenter,
            _ => Self::Office,
        }
    }

    /// The scoped asset list path for this preference.
    pub fn asset_path(&self) -> &'static str {
        match self {
            Self::Office => "/assets/office",
            Self::Datacenter => "/assets/datacenter",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Navigation Guard
// ═══════════════════════════════════════════════════════════════════════════════

/// Decides, for each navigation attempt, whether to allow it or where to
/// redirect instead.
pub struct NavigationGuard {
    routes: RouteTable,
    resolver: PermissionResolver,
    store: CapabilityStore,
    state: Arc<dyn SessionState>,
    login_path: String,
    landing_path: String,
}

impl NavigationGuard {
    /// Create a guard from its collaborators, with the standard login and
    /// landing paths.
    pub fn new(
        routes: RouteTable,
        resolver: PermissionResolver,
        store: CapabilityStore,
        state: Arc<dyn SessionState>,
    ) -> Self {
        Self::with_config(routes, resolver, store, state, &ClientConfig::default())
    }

    /// Create a guard taking the login and landing paths from configuration.
    pub fn with_config(
        routes: RouteTable,
        resolver: PermissionResolver,
        store: CapabilityStore,
        state: Arc<dyn SessionState>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            routes,
            resolver,
            store,
            state,
            login_path: config.login_path.clone(),
            landing_path: config.landing_path.clone(),
        }
    }

    /// Guard over the standard route surface and resolution ladder.
    pub fn standard(state: Arc<dyn SessionState>) -> Self {
        Self::new(
            RouteTable::standard(),
            PermissionResolver::standard(),
            CapabilityStore::new(state.clone()),
            state,
        )
    }

    /// The view a path renders, for the embedding layer.
    pub fn view_for(&self, path: &str) -> Option<ViewId> {
        self.routes.view_for(path)
    }

    /// Decide a navigation attempt.
    pub fn decide(&self, target: &str) -> NavigationDecision {
        let authenticated = self.state.get(keys::TOKEN).is_some();

        if target != self.login_path && !authenticated {
            return NavigationDecision::redirect(&self.login_path);
        }
        if target == self.login_path && authenticated {
            return NavigationDecision::redirect(&self.landing_path);
        }

        if target != self.login_path {
            if let Some(requirement) = self.resolver.resolve(target) {
                if !self.store.satisfies(&requirement) {
                    debug!(
                        path = target,
                        requirement = %requirement.describe(),
                        "capability requirement not satisfied, redirecting to landing"
                    );
                    return NavigationDecision::redirect(&self.landing_path);
                }
            }
        }

        if let Some(entry) = self.routes.lookup(target) {
            if let RouteTarget::Redirect(static_target) = entry.target {
                if target == ASSETS_LANDING {
                    let scope = DepartmentScope::from_preference(
                        self.state.get(keys::DEPT_SCOPE).as_deref(),
                    );
                    return NavigationDecision::redirect(scope.asset_path());
                }
                return NavigationDecision::redirect(static_target);
            }
        }

        NavigationDecision::Allow
    }

    /// Error-returning form of the permission check, for callers that want a
    /// `PermissionDenied` instead of a redirect decision.
    pub fn authorize(&self, path: &str) -> Result<()> {
        if let Some(requirement) = self.resolver.resolve(path) {
            if !self.store.satisfies(&requirement) {
                return Err(AssetHubError::permission_denied(requirement.describe()));
            }
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
