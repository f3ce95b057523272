//! Permission resolution and capability queries.
//!
//! This module provides:
//! - **Models**: Capability, CapabilityRequirement, RoleCode
//! - **Resolver**: ordered-rule mapping from a navigation path to the
//!   capability it requires
//! - **Store**: yes/no capability answers for the current actor, backed by
//!   the persisted session state

pub mod models;
pub mod resolver;
pub mod store;

pub use models::{
    Capability, CapabilityRequirement, RoleCode, DEFAULT_ACTION, UNRESTRICTED_ROLE,
};
pub use resolver::PermissionResolver;
pub use store::CapabilityStore;
