//! Credential claim decoding.
//!
//! The credential is opaque to this client except for one thing: the role
//! claim embedded in its payload segment. Decoding never validates the
//! signature; the remote API is the authority, this is display/authorization
//! hinting only.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;

use crate::permissions::{RoleCode, UNRESTRICTED_ROLE};

/// Role-bearing subset of the credential claims.
#[derive(Debug, Default, Deserialize)]
struct RoleClaims {
    #[serde(default)]
    role_code: Option<String>,
    #[serde(default)]
    role_codes: Option<Vec<String>>,
}

/// Derive the actor's primary role code from a bearer credential.
///
/// Fallback order: the unrestricted marker anywhere in `role_codes`, then the
/// explicit `role_code` claim, then the first entry of `role_codes`, then
/// empty. Tokens that cannot be decoded yield the empty role code.
pub fn derive_role_code(token: &str) -> RoleCode {
    let claims = match decode_claims(token) {
        Some(claims) => claims,
        None => return RoleCode::empty(),
    };

    if let Some(codes) = claims.role_codes {
        if codes.iter().any(|code| code == UNRESTRICTED_ROLE) {
            return RoleCode::from(UNRESTRICTED_ROLE);
        }
        if let Some(code) = claims.role_code.filter(|code| !code.is_empty()) {
            return RoleCode::from(code);
        }
        return codes
            .into_iter()
            .next()
            .filter(|code| !code.is_empty())
            .map(RoleCode::from)
            .unwrap_or_default();
    }

    claims
        .role_code
        .filter(|code| !code.is_empty())
        .map(RoleCode::from)
        .unwrap_or_default()
}

fn decode_claims(token: &str) -> Option<RoleClaims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Assemble an unsigned token whose payload is the given claims JSON.
#[cfg(test)]
pub(crate) fn token_with_claims(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
    format!("{}.{}.sig", header, payload)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrestricted_marker_wins() {
        let token = token_with_claims(&serde_json::json!({
            "role_code": "it_operator",
            "role_codes": ["it_operator", "super_admin"],
        }));
        assert!(derive_role_code(&token).is_unrestricted());
    }

    #[test]
    fn test_explicit_role_code_preferred_over_list_head() {
        let token = token_with_claims(&serde_json::json!({
            "role_code": "asset_manager",
            "role_codes": ["it_operator", "asset_manager"],
        }));
        assert_eq!(derive_role_code(&token).as_str(), "asset_manager");
    }

    #[test]
    fn test_first_listed_role_as_fallback() {
        let token = token_with_claims(&serde_json::json!({
            "role_codes": ["it_operator", "asset_manager"],
        }));
        assert_eq!(derive_role_code(&token).as_str(), "it_operator");
    }

    #[test]
    fn test_single_role_code_claim() {
        let token = token_with_claims(&serde_json::json!({ "role_code": "viewer" }));
        assert_eq!(derive_role_code(&token).as_str(), "viewer");
    }

    #[test]
    fn test_malformed_tokens_yield_empty() {
        assert!(derive_role_code("").is_empty());
        assert!(derive_role_code("no-dots-here").is_empty());
        assert!(derive_role_code("a.%%%.c").is_empty());
        let token = token_with_claims(&serde_json::json!({}));
        assert!(derive_role_code(&token).is_empty());
    }
}
