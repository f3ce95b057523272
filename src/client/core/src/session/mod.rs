//! Session management: persisted state, credential claim decoding, and the
//! authenticated API client.

pub mod client;
pub mod state;
pub mod token;

pub use client::{AuthClient, LoginResponse, Navigator, PermissionGrant};
pub use state::{keys, MemorySessionState, SessionState};
pub use token::derive_role_code;
