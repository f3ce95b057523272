//! Path-to-capability resolution.
//!
//! Resolution is an ordered table of `(matcher, requirement)` rules evaluated
//! top-to-bottom; the first matching rule wins. Within each path family the
//! most specific rules come first: nested `fields` sub-resources before their
//! parent, `new`/`edit` forms before the generic prefix. Paths no rule
//! matches require nothing (open by default).

use super::models::{Capability, CapabilityRequirement};

// ═══════════════════════════════════════════════════════════════════════════════
// Matchers
// ═══════════════════════════════════════════════════════════════════════════════

/// How a rule recognizes a path.
#[derive(Debug, Clone, Copy)]
enum PathMatcher {
    Exact(&'static str),
    Prefix(&'static str),
    PrefixSuffix(&'static str, &'static str),
    PrefixInfix(&'static str, &'static str),
    PrefixInfixSuffix(&'static str, &'static str, &'static str),
}

impl PathMatcher {
    fn matches(&self, path: &str) -> bool {
        match *self {
            Self::Exact(exact) => path == exact,
            Self::Prefix(prefix) => path.starts_with(prefix),
            Self::PrefixSuffix(prefix, suffix) => {
                path.starts_with(prefix) && path.ends_with(suffix)
            }
            Self::PrefixInfix(prefix, infix) => path.starts_with(prefix) && path.contains(infix),
            Self::PrefixInfixSuffix(prefix, infix, suffix) => {
                path.starts_with(prefix) && path.contains(infix) && path.ends_with(suffix)
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rules
// ═══════════════════════════════════════════════════════════════════════════════

/// Static form of a requirement, const-friendly for the rule table.
#[derive(Debug, Clone, Copy)]
enum RequirementSpec {
    One(&'static str, &'static str),
    Any(&'static [(&'static str, &'static str)]),
}

impl RequirementSpec {
    fn to_requirement(self) -> CapabilityRequirement {
        match self {
            Self::One(resource, action) => {
                CapabilityRequirement::One(Capability::new(resource, action))
            }
            Self::Any(pairs) => CapabilityRequirement::AnyOf(
                pairs
                    .iter()
                    .map(|&(resource, action)| Capability::new(resource, action))
                    .collect(),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ResolveRule {
    matcher: PathMatcher,
    requirement: RequirementSpec,
}

const fn rule(matcher: PathMatcher, requirement: RequirementSpec) -> ResolveRule {
    ResolveRule {
        matcher,
        requirement,
    }
}

// Asset list/create/update screens accept either the office or the
// datacenter scoped resource.
const HARDWARE_VIEW: &[(&str, &str)] = &[
    ("office_hardware_assets", "view"),
    ("datacenter_hardware_assets", "view"),
];
const HARDWARE_CREATE: &[(&str, &str)] = &[
    ("office_hardware_assets", "create"),
    ("datacenter_hardware_assets", "create"),
];
const HARDWARE_UPDATE: &[(&str, &str)] = &[
    ("office_hardware_assets", "update"),
    ("datacenter_hardware_assets", "update"),
];

use PathMatcher::{Exact, Prefix, PrefixInfix, PrefixInfixSuffix, PrefixSuffix};
use RequirementSpec::{Any, One};

/// The standard resolution ladder. Order is load-bearing.
static RULES: &[ResolveRule] = &[
    rule(Exact("/"), One("dashboard", "view")),
    rule(Exact("/assets"), Any(HARDWARE_VIEW)),
    rule(Prefix("/assets/office"), One("office_hardware_assets", "view")),
    rule(
        Prefix("/assets/datacenter"),
        One("datacenter_hardware_assets", "view"),
    ),
    rule(Exact("/assets/new"), Any(HARDWARE_CREATE)),
    rule(PrefixSuffix("/assets/", "/edit"), Any(HARDWARE_UPDATE)),
    rule(
        PrefixInfixSuffix("/asset-types/", "/fields/", "/edit"),
        One("asset_types", "update"),
    ),
    rule(
        PrefixSuffix("/asset-types/", "/fields/new"),
        One("asset_types", "create"),
    ),
    rule(PrefixSuffix("/asset-types/", "/edit"), One("asset_types", "update")),
    rule(Exact("/asset-types/new"), One("asset_types", "create")),
    rule(PrefixInfix("/asset-types/", "/fields"), One("asset_types", "view")),
    rule(Prefix("/asset-types"), One("asset_types", "view")),
    rule(Exact("/assets/import"), Any(HARDWARE_CREATE)),
    rule(Exact("/assets/flow"), Any(HARDWARE_UPDATE)),
    rule(PrefixSuffix("/maintenance", "/new"), One("maintenance", "create")),
    rule(PrefixSuffix("/maintenance", "/edit"), One("maintenance", "update")),
    rule(Prefix("/maintenance"), One("maintenance", "view")),
    rule(Prefix("/scrap"), One("scrap", "view")),
    rule(Exact("/licenses/new"), One("software_assets", "create")),
    rule(PrefixSuffix("/licenses", "/edit"), One("software_assets", "update")),
    rule(Prefix("/licenses"), One("software_assets", "view")),
    rule(
        PrefixInfixSuffix("/software-field-categories/", "/fields/", "/edit"),
        One("software_fields", "update"),
    ),
    rule(
        PrefixSuffix("/software-field-categories/", "/fields/new"),
        One("software_fields", "create"),
    ),
    rule(
        PrefixSuffix("/software-field-categories/", "/edit"),
        One("software_fields", "update"),
    ),
    rule(
        Exact("/software-field-categories/new"),
        One("software_fields", "create"),
    ),
    rule(
        PrefixInfix("/software-field-categories/", "/fields"),
        One("software_fields", "view"),
    ),
    rule(Prefix("/software-field-categories"), One("software_fields", "view")),
    rule(Exact("/systems/new"), One("system_assets", "create")),
    rule(PrefixSuffix("/systems", "/edit"), One("system_assets", "update")),
    rule(Prefix("/systems"), One("system_assets", "view")),
    rule(
        PrefixInfixSuffix("/system-field-categories/", "/fields/", "/edit"),
        One("system_fields", "update"),
    ),
    rule(
        PrefixSuffix("/system-field-categories/", "/fields/new"),
        One("system_fields", "create"),
    ),
    rule(
        PrefixSuffix("/system-field-categories/", "/edit"),
        One("system_fields", "update"),
    ),
    rule(
        Exact("/system-field-categories/new"),
        One("system_fields", "create"),
    ),
    rule(
        PrefixInfix("/system-field-categories/", "/fields"),
        One("system_fields", "view"),
    ),
    rule(Prefix("/system-field-categories"), One("system_fields", "view")),
    rule(Exact("/stocktakes/new"), One("stocktakes", "create")),
    rule(PrefixSuffix("/stocktakes", "/edit"), One("stocktakes", "update")),
    rule(Prefix("/stocktakes"), One("stocktakes", "view")),
    rule(Prefix("/scan"), One("scan", "view")),
    rule(Exact("/departments/new"), One("departments", "create")),
    rule(PrefixSuffix("/departments", "/edit"), One("departments", "update")),
    rule(Prefix("/departments"), One("departments", "view")),
    rule(Exact("/people/new"), One("people", "create")),
    rule(PrefixSuffix("/people", "/edit"), One("people", "update")),
    rule(Prefix("/people"), One("people", "view")),
    rule(Exact("/users/new"), One("users", "create")),
    rule(PrefixSuffix("/users", "/edit"), One("users", "update")),
    rule(Prefix("/users"), One("users", "view")),
    rule(Prefix("/roles"), One("roles", "view")),
    rule(Prefix("/notifications"), One("notifications", "view")),
    rule(Prefix("/logs"), One("logs", "view")),
    rule(Prefix("/reports"), One("reports", "view")),
    rule(Prefix("/settings"), One("settings", "view")),
    rule(Prefix("/dictionaries"), One("dictionaries", "view")),
];

// ═══════════════════════════════════════════════════════════════════════════════
// Resolver
// ═══════════════════════════════════════════════════════════════════════════════

/// Pure, total mapping from a navigation path to the capability it requires.
#[derive(Debug, Clone, Copy)]
pub struct PermissionResolver {
    rules: &'static [ResolveRule],
}

impl PermissionResolver {
    /// The standard AssetHub resolution ladder.
    pub fn standard() -> Self {
        Self { rules: RULES }
    }

    /// Resolve a path to its requirement. `None` means the path requires no
    /// capability.
    pub fn resolve(&self, path: &str) -> Option<CapabilityRequirement> {
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(path))
            .map(|rule| rule.requirement.to_requirement())
    }
}

impl Default for PermissionResolver {
    fn default() -> Self {
        Self::standard()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
