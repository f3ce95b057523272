//! Capability data model: Capability, CapabilityRequirement, and RoleCode.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Action assumed when a call site does not name one.
pub const DEFAULT_ACTION: &str = "view";

/// Role code granted unrestricted access.
pub const UNRESTRICTED_ROLE: &str = "super_admin";

// ═══════════════════════════════════════════════════════════════════════════════
// Capability
// ═══════════════════════════════════════════════════════════════════════════════

/// A capability is an action on a resource.
///
/// Capabilities follow the format `resource:action`, for example:
/// - `office_hardware_assets:view`
/// - `asset_types:update`
/// - `stocktakes:create`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capability {
    /// The resource (e.g., "maintenance", "users").
    pub resource: String,
    /// The action (e.g., "view", "create", "update").
    pub action: String,
}

impl Capability {
    /// Create a new capability.
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }

    /// Create a `view` capability for the given resource.
    pub fn view(resource: impl Into<String>) -> Self {
        Self::new(resource, DEFAULT_ACTION)
    }

    /// Parse a capability from a colon-separated string like
    /// `"maintenance:update"`.
    pub fn parse(s: &str) -> Option<Self> {
        let (resource, action) = s.split_once(':')?;
        if resource.is_empty() || action.is_empty() {
            return None;
        }
        Some(Self::new(resource, action))
    }

    /// Return the canonical string form `"resource:action"`.
    pub fn as_string(&self) -> String {
        format!("{}:{}", self.resource, self.action)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.action)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Capability Requirement
// ═══════════════════════════════════════════════════════════════════════════════

/// The capability a route demands: a single pair, or a disjunction where any
/// listed capability suffices (e.g., screens reachable via either the office
/// or the datacenter asset permission).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityRequirement {
    One(Capability),
    AnyOf(Vec<Capability>),
}

impl CapabilityRequirement {
    /// The capabilities this requirement accepts, in declaration order.
    pub fn capabilities(&self) -> &[Capability] {
        match self {
            Self::One(capability) => std::slice::from_ref(capability),
            Self::AnyOf(capabilities) => capabilities,
        }
    }

    /// Human-readable form, used in denial messages.
    pub fn describe(&self) -> String {
        match self {
            Self::One(capability) => capability.as_string(),
            Self::AnyOf(capabilities) => capabilities
                .iter()
                .map(Capability::as_string)
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Role Code
// ═══════════════════════════════════════════════════════════════════════════════

/// The actor's primary role code, derived from the credential claim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleCode(String);

impl RoleCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The empty role code (no role could be derived).
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this role satisfies every capability requirement.
    pub fn is_unrestricted(&self) -> bool {
        self.0 == UNRESTRICTED_ROLE
    }
}

impl fmt::Display for RoleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RoleCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RoleCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
