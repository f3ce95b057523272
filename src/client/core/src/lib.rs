//! # AssetHub Client Core
//!
//! The decision core of the AssetHub IT asset management client.
//!
//! ## Architecture
//!
//! - **Route Table**: static mapping from URL path patterns to logical view
//!   identifiers
//! - **Permission Resolver**: ordered rule table mapping a navigation path to
//!   the capability it requires
//! - **Capability Store**: answers capability queries against the persisted
//!   session state
//! - **Navigation Guard**: composes the three above with the
//!   credential-presence check to allow or redirect each navigation attempt
//! - **Session Client**: login/logout and permission loading against the
//!   remote API, with a single authentication-rejected redirect cycle
//!
//! Rendering, state persistence backends, and the remote API itself are
//! collaborators behind the `SessionState` and `Navigator` seams.

pub mod config;
pub mod error;
pub mod guard;
pub mod permissions;
pub mod routes;
pub mod session;

pub use error::{AssetHubError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::ClientConfig;
    pub use crate::error::{AssetHubError, Result};
    pub use crate::guard::{DepartmentScope, NavigationDecision, NavigationGuard};
    pub use crate::permissions::{
        Capability, CapabilityRequirement, CapabilityStore, PermissionResolver, RoleCode,
    };
    pub use crate::routes::{RouteEntry, RouteTable, RouteTarget, ViewId};
    pub use crate::session::{
        derive_role_code, keys, AuthClient, LoginResponse, MemorySessionState, Navigator,
        PermissionGrant, SessionState,
    };
}
