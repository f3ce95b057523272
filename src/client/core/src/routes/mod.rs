//! Static route surface of the AssetHub client.
//!
//! A `RouteTable` maps URL path patterns to logical view identifiers. It is
//! leaf data: entries are declared once at startup and never change. Dynamic
//! segments (`:id`, `:fieldId`) match any single path segment and are passed
//! through to the view layer opaque.

use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════════
// View Identifiers
// ═══════════════════════════════════════════════════════════════════════════════

/// Logical identifier of a client view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewId {
    Dashboard,
    Assets,
    AssetCreate,
    AssetEdit,
    AssetImport,
    AssetFlow,
    AssetTypes,
    AssetTypeCreate,
    AssetTypeEdit,
    AssetFields,
    AssetFieldCreate,
    AssetFieldEdit,
    SystemAssets,
    SystemTopologyOverview,
    SystemAssetCreate,
    SystemAssetEdit,
    SystemFieldCategories,
    SystemFieldCategoryCreate,
    SystemFieldCategoryEdit,
    SystemFields,
    SystemFieldCreate,
    SystemFieldEdit,
    Maintenance,
    RepairCreate,
    RepairEdit,
    MaintenanceInfo,
    Scrap,
    Licenses,
    LicenseCreate,
    LicenseEdit,
    SoftwareFieldCategories,
    SoftwareFieldCategoryCreate,
    SoftwareFieldCategoryEdit,
    SoftwareFields,
    SoftwareFieldCreate,
    SoftwareFieldEdit,
    Stocktakes,
    StocktakeCreate,
    StocktakeEdit,
    Scan,
    Users,
    UserCreate,
    UserEdit,
    LdapSettings,
    Departments,
    DepartmentCreate,
    DepartmentEdit,
    People,
    PersonCreate,
    PersonEdit,
    Roles,
    RoleCreate,
    RoleEdit,
    Logs,
    Reports,
    Settings,
    Notifications,
    Dictionaries,
    DictionaryCreate,
    DictionaryEdit,
    Login,
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Route Entries
// ═══════════════════════════════════════════════════════════════════════════════

/// Where a matched route leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget {
    /// Render the given view.
    View(ViewId),
    /// Redirect to another path. Only the generic assets landing uses this;
    /// the navigation guard may override the static target with the
    /// department-scoped variant.
    Redirect(&'static str),
}

/// A single route table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    /// Path pattern; `:`-prefixed segments match any single segment.
    pub pattern: &'static str,
    /// The view or redirect the pattern resolves to.
    pub target: RouteTarget,
}

impl RouteEntry {
    const fn view(pattern: &'static str, view: ViewId) -> Self {
        Self {
            pattern,
            target: RouteTarget::View(view),
        }
    }

    const fn redirect(pattern: &'static str, to: &'static str) -> Self {
        Self {
            pattern,
            target: RouteTarget::Redirect(to),
        }
    }
}

/// The full route surface, in declaration order. First match wins.
static ROUTES: &[RouteEntry] = &[
    RouteEntry::view("/", ViewId::Dashboard),
    RouteEntry::redirect("/assets", "/assets/office"),
    RouteEntry::view("/assets/office", ViewId::Assets),
    RouteEntry::view("/assets/datacenter", ViewId::Assets),
    RouteEntry::view("/assets/new", ViewId::AssetCreate),
    RouteEntry::view("/assets/:id/edit", ViewId::AssetEdit),
    RouteEntry::view("/asset-types", ViewId::AssetTypes),
    RouteEntry::view("/asset-types/new", ViewId::AssetTypeCreate),
    RouteEntry::view("/asset-types/:id/edit", ViewId::AssetTypeEdit),
    RouteEntry::view("/asset-types/:id/fields", ViewId::AssetFields),
    RouteEntry::view("/asset-types/:id/fields/new", ViewId::AssetFieldCreate),
    RouteEntry::view("/asset-types/:id/fields/:fieldId/edit", ViewId::AssetFieldEdit),
    RouteEntry::view("/systems", ViewId::SystemAssets),
    RouteEntry::view("/systems/topology", ViewId::SystemTopologyOverview),
    RouteEntry::view("/systems/new", ViewId::SystemAssetCreate),
    RouteEntry::view("/systems/:id/edit", ViewId::SystemAssetEdit),
    RouteEntry::view("/system-field-categories", ViewId::SystemFieldCategories),
    RouteEntry::view("/system-field-categories/new", ViewId::SystemFieldCategoryCreate),
    RouteEntry::view("/system-field-categories/:id/edit", ViewId::SystemFieldCategoryEdit),
    RouteEntry::view("/system-field-categories/:id/fields", ViewId::SystemFields),
    RouteEntry::view("/system-field-categories/:id/fields/new", ViewId::SystemFieldCreate),
    RouteEntry::view(
        "/system-field-categories/:id/fields/:fieldId/edit",
        ViewId::SystemFieldEdit,
    ),
    RouteEntry::view("/assets/import", ViewId::AssetImport),
    RouteEntry::view("/assets/flow", ViewId::AssetFlow),
    RouteEntry::view("/maintenance", ViewId::Maintenance),
    RouteEntry::view("/maintenance/repairs/new", ViewId::RepairCreate),
    RouteEntry::view("/maintenance/repairs/:id/edit", ViewId::RepairEdit),
    RouteEntry::view("/maintenance/info", ViewId::MaintenanceInfo),
    RouteEntry::view("/scrap", ViewId::Scrap),
    RouteEntry::view("/licenses", ViewId::Licenses),
    RouteEntry::view("/licenses/new", ViewId::LicenseCreate),
    RouteEntry::view("/licenses/:id/edit", ViewId::LicenseEdit),
    RouteEntry::view("/software-field-categories", ViewId::SoftwareFieldCategories),
    RouteEntry::view("/software-field-categories/new", ViewId::SoftwareFieldCategoryCreate),
    RouteEntry::view("/software-field-categories/:id/edit", ViewId::SoftwareFieldCategoryEdit),
    RouteEntry::view("/software-field-categories/:id/fields", ViewId::SoftwareFields),
    RouteEntry::view("/software-field-categories/:id/fields/new", ViewId::SoftwareFieldCreate),
    RouteEntry::view(
        "/software-field-categories/:id/fields/:fieldId/edit",
        ViewId::SoftwareFieldEdit,
    ),
    RouteEntry::view("/stocktakes", ViewId::Stocktakes),
    RouteEntry::view("/stocktakes/new", ViewId::StocktakeCreate),
    RouteEntry::view("/stocktakes/:id/edit", ViewId::StocktakeEdit),
    RouteEntry::view("/scan", ViewId::Scan),
    RouteEntry::view("/users", ViewId::Users),
    RouteEntry::view("/users/ldap", ViewId::LdapSettings),
    RouteEntry::view("/users/new", ViewId::UserCreate),
    RouteEntry::view("/users/:id/edit", ViewId::UserEdit),
    RouteEntry::view("/departments", ViewId::Departments),
    RouteEntry::view("/departments/new", ViewId::DepartmentCreate),
    RouteEntry::view("/departments/:id/edit", ViewId::DepartmentEdit),
    RouteEntry::view("/people", ViewId::People),
    RouteEntry::view("/people/new", ViewId::PersonCreate),
    RouteEntry::view("/people/:id/edit", ViewId::PersonEdit),
    RouteEntry::view("/roles", ViewId::Roles),
    RouteEntry::view("/roles/new", ViewId::RoleCreate),
    RouteEntry::view("/roles/:id/edit", ViewId::RoleEdit),
    RouteEntry::view("/logs", ViewId::Logs),
    RouteEntry::view("/reports", ViewId::Reports),
    RouteEntry::view("/settings", ViewId::Settings),
    RouteEntry::view("/dictionaries", ViewId::Dictionaries),
    RouteEntry::view("/dictionaries/new", ViewId::DictionaryCreate),
    RouteEntry::view("/dictionaries/:id/edit", ViewId::DictionaryEdit),
    RouteEntry::view("/notifications", ViewId::Notifications),
    RouteEntry::view("/login", ViewId::Login),
];

// ═══════════════════════════════════════════════════════════════════════════════
// Route Table
// ═══════════════════════════════════════════════════════════════════════════════

/// Lookup over the static route surface.
#[derive(Debug, Clone, Copy)]
pub struct RouteTable {
    entries: &'static [RouteEntry],
}

impl RouteTable {
    /// The standard AssetHub route surface.
    pub fn standard() -> Self {
        Self { entries: ROUTES }
    }

    /// Find the first entry whose pattern matches the given path.
    pub fn lookup(&self, path: &str) -> Option<&'static RouteEntry> {
        self.entries
            .iter()
            .find(|entry| pattern_matches(entry.pattern, path))
    }

    /// Resolve a path to the view it renders, following a redirect entry's
    /// static target one step.
    pub fn view_for(&self, path: &str) -> Option<ViewId> {
        match self.lookup(path)?.target {
            RouteTarget::View(view) => Some(view),
            RouteTarget::Redirect(to) => match self.lookup(to)?.target {
                RouteTarget::View(view) => Some(view),
                RouteTarget::Redirect(_) => None,
            },
        }
    }

    /// Whether any entry matches the path.
    pub fn is_known(&self, path: &str) -> bool {
        self.lookup(path).is_some()
    }

    /// All entries, in declaration order.
    pub fn entries(&self) -> &'static [RouteEntry] {
        self.entries
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Segment-wise pattern match. `:`-prefixed pattern segments match any
/// non-empty path segment.
fn pattern_matches(pattern: &str, path: &str) -> bool {
    let mut pattern_segments = pattern.split('/').filter(|s| !s.is_empty());
    let mut path_segments = path.split('/').filter(|s| !s.is_empty());

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return true,
            (Some(p), Some(s)) if p.starts_with(':') || p == s => continue,
            _ => return false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_matches_dashboard_only() {
        let table = RouteTable::standard();
        assert_eq!(table.view_for("/"), Some(ViewId::Dashboard));
        assert!(!table.is_known("/nowhere"));
    }

    #[test]
    fn test_dynamic_segments() {
        let table = RouteTable::standard();
        assert_eq!(table.view_for("/assets/42/edit"), Some(ViewId::AssetEdit));
        assert_eq!(
            table.view_for("/asset-types/7/fields/13/edit"),
            Some(ViewId::AssetFieldEdit)
        );
        // A dynamic segment must be present.
        assert!(!table.is_known("/assets//edit"));
    }

    #[test]
    fn test_literal_segments_win_by_declaration_order() {
        let table = RouteTable::standard();
        assert_eq!(table.view_for("/users/ldap"), Some(ViewId::LdapSettings));
        assert_eq!(table.view_for("/users/new"), Some(ViewId::UserCreate));
        assert_eq!(table.view_for("/systems/topology"), Some(ViewId::SystemTopologyOverview));
    }

    #[test]
    fn test_assets_landing_redirects_to_office() {
        let table = RouteTable::standard();
        let entry = table.lookup("/assets").expect("assets landing");
        assert_eq!(entry.target, RouteTarget::Redirect("/assets/office"));
        assert_eq!(table.view_for("/assets"), Some(ViewId::Assets));
    }

    #[test]
    fn test_trailing_slash_is_normalized() {
        let table = RouteTable::standard();
        assert_eq!(table.view_for("/licenses/"), Some(ViewId::Licenses));
    }

    #[test]
    fn test_every_pattern_matches_itself() {
        let table = RouteTable::standard();
        for entry in table.entries() {
            let probe = entry
                .pattern
                .split('/')
                .map(|s| if s.starts_with(':') { "99" } else { s })
                .collect::<Vec<_>>()
                .join("/");
            assert!(table.is_known(&probe), "pattern {} unreachable", entry.pattern);
        }
    }
}
