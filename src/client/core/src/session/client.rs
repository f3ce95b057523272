//! Session client: login, logout, and permission loading against the remote
//! API.
//!
//! Every call that sees an authentication-rejected status forces a logout and
//! at most one redirect to the login path. Concurrent rejections while a
//! redirect is underway are suppressed by a single in-flight flag, so racing
//! requests cannot produce a redirect storm.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::state::{keys, SessionState};
use super::token::derive_role_code;
use crate::config::ClientConfig;
use crate::error::{AssetHubError, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// Navigator
// ═══════════════════════════════════════════════════════════════════════════════

/// The redirect sink for forced navigation. Implemented by the embedding
/// layer over its router.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// The path currently displayed.
    fn current_path(&self) -> String;

    /// Replace the current location; resolves once the navigation settled.
    async fn replace(&self, path: &str);
}

// ═══════════════════════════════════════════════════════════════════════════════
// Wire Types
// ═══════════════════════════════════════════════════════════════════════════════

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// The issued bearer credential.
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// One granted capability as returned by `GET /roles/me/permissions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub resource: String,
    pub action: String,
}

#[derive(Debug, Serialize)]
struct ChangePasswordRequest<'a> {
    old_password: &'a str,
    new_password: &'a str,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Auth Client
// ═══════════════════════════════════════════════════════════════════════════════

/// Authenticated HTTP client for the AssetHub API.
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    login_path: String,
    state: Arc<dyn SessionState>,
    navigator: Arc<dyn Navigator>,
    auth_redirecting: AtomicBool,
}

impl AuthClient {
    /// Create a client over the given session state and navigator.
    pub fn new(
        config: &ClientConfig,
        state: Arc<dyn SessionState>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            login_path: config.login_path.clone(),
            state,
            navigator,
            auth_redirecting: AtomicBool::new(false),
        })
    }

    /// Return the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a credential is currently present.
    pub fn has_credential(&self) -> bool {
        self.state.get(keys::TOKEN).is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Authenticate against the remote API and populate the session.
    ///
    /// On success the credential, user names, and derived role code are
    /// persisted, then the capability list is loaded. Failures propagate
    /// unchanged; nothing is persisted on a failed login.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let url = format!("{}/auth/login", self.base_url);
        let form = [("username", username), ("password", password)];
        let response = self.http.post(&url).form(&form).send().await?;
        let response = self.check_status(response).await?;
        let body: LoginResponse = response.json().await?;

        self.state.set(keys::TOKEN, &body.access_token);
        self.state
            .set(keys::USERNAME, body.username.as_deref().unwrap_or(username));
        self.state
            .set(keys::FULL_NAME, body.full_name.as_deref().unwrap_or(""));
        let role = derive_role_code(&body.access_token);
        self.state.set(keys::ROLE_CODE, role.as_str());
        debug!(username, role = %role, "login succeeded");

        self.load_permissions().await?;
        Ok(body)
    }

    /// Fetch the actor's capability list and persist it.
    ///
    /// A no-op without a credential. A response that arrives after the
    /// credential was cleared (logout during flight) is discarded.
    pub async fn load_permissions(&self) -> Result<()> {
        let token = match self.state.get(keys::TOKEN) {
            Some(token) => token,
            None => return Ok(()),
        };

        let url = format!("{}/roles/me/permissions", self.base_url);
        let response = self.http.get(&url).bearer_auth(&token).send().await?;
        let response = self.check_status(response).await?;
        let grants: Vec<PermissionGrant> = response.json().await?;

        if self.state.get(keys::TOKEN).as_deref() != Some(token.as_str()) {
            debug!("discarding permission response for a cleared session");
            return Ok(());
        }

        let pairs: BTreeSet<String> = grants
            .iter()
            .map(|grant| format!("{}:{}", grant.resource, grant.action))
            .collect();
        let serialized = serde_json::to_string(&pairs.iter().collect::<Vec<_>>())?;
        self.state.set(keys::PERMISSIONS, &serialized);
        debug!(count = pairs.len(), "capability list loaded");
        Ok(())
    }

    /// Clear the session: credential, user names, role code, and capability
    /// list, together. The department scope preference survives.
    pub fn logout(&self) {
        self.state.remove(keys::TOKEN);
        self.state.remove(keys::USERNAME);
        self.state.remove(keys::FULL_NAME);
        self.state.remove(keys::ROLE_CODE);
        self.state.remove(keys::PERMISSIONS);
    }

    /// Change the authenticated user's password.
    pub async fn change_password(&self, old_password: &str, new_password: &str) -> Result<()> {
        let token = self
            .state
            .get(keys::TOKEN)
            .ok_or(AssetHubError::AuthenticationRejected)?;

        let url = format!("{}/auth/change-password", self.base_url);
        let body = ChangePasswordRequest {
            old_password,
            new_password,
        };
        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;
        self.check_status(response).await?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Response handling
    // ─────────────────────────────────────────────────────────────────────────

    /// Classify a response, driving the authentication-rejected cycle on 401.
    async fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.handle_auth_rejected().await;
            return Err(AssetHubError::AuthenticationRejected);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AssetHubError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    /// Forced logout plus at most one redirect to the login path.
    async fn handle_auth_rejected(&self) {
        if self.has_credential() {
            warn!("credential rejected by the remote API, clearing session");
            self.logout();
        }

        if self
            .auth_redirecting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            if self.navigator.current_path() != self.login_path {
                self.navigator.replace(&self.login_path).await;
            }
            self.auth_redirecting.store(false, Ordering::SeqCst);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::token::token_with_claims;
    use crate::session::MemorySessionState;
    use parking_lot::Mutex;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct RecordingNavigator {
        current: Mutex<String>,
        replacements: Mutex<Vec<String>>,
        replace_delay_ms: u64,
    }

    impl RecordingNavigator {
        fn at(path: &str) -> Arc<Self> {
            Arc::new(Self {
                current: Mutex::new(path.to_string()),
                replacements: Mutex::new(Vec::new()),
                replace_delay_ms: 0,
            })
        }

        fn slow(path: &str, delay_ms: u64) -> Arc<Self> {
            Arc::new(Self {
                current: Mutex::new(path.to_string()),
                replacements: Mutex::new(Vec::new()),
                replace_delay_ms: delay_ms,
            })
        }

        fn replacements(&self) -> Vec<String> {
            self.replacements.lock().clone()
        }
    }

    #[async_trait]
    impl Navigator for RecordingNavigator {
        fn current_path(&self) -> String {
            self.current.lock().clone()
        }

        async fn replace(&self, path: &str) {
            if self.replace_delay_ms > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(self.replace_delay_ms)).await;
            }
            self.replacements.lock().push(path.to_string());
            *self.current.lock() = path.to_string();
        }
    }

    fn client_for(
        server: &MockServer,
        state: Arc<MemorySessionState>,
        navigator: Arc<RecordingNavigator>,
    ) -> AuthClient {
        let config = ClientConfig::with_base_url(server.uri());
        AuthClient::new(&config, state, navigator).expect("client")
    }

    #[tokio::test]
    async fn test_login_populates_session_and_loads_permissions() {
        let server = MockServer::start().await;
        let token = token_with_claims(&serde_json::json!({
            "role_codes": ["asset_manager"],
        }));

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": token,
                "token_type": "bearer",
                "username": "alice",
                "full_name": "Alice Zhang",
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/roles/me/permissions"))
            .and(header("Authorization", format!("Bearer {}", token).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "resource": "maintenance", "action": "view" },
                { "resource": "office_hardware_assets", "action": "view" },
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let state = Arc::new(MemorySessionState::new());
        let navigator = RecordingNavigator::at("/login");
        let client = client_for(&server, state.clone(), navigator.clone());

        let body = client.login("alice", "secret").await.expect("login");
        assert_eq!(body.full_name.as_deref(), Some("Alice Zhang"));

        assert_eq!(state.get(keys::TOKEN), Some(token));
        assert_eq!(state.get(keys::USERNAME), Some("alice".to_string()));
        assert_eq!(state.get(keys::FULL_NAME), Some("Alice Zhang".to_string()));
        assert_eq!(state.get(keys::ROLE_CODE), Some("asset_manager".to_string()));
        assert_eq!(
            state.get(keys::PERMISSIONS),
            Some(r#"["maintenance:view","office_hardware_assets:view"]"#.to_string())
        );
        assert!(navigator.replacements().is_empty());
    }

    #[tokio::test]
    async fn test_failed_login_persists_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let state = Arc::new(MemorySessionState::new());
        let navigator = RecordingNavigator::at("/login");
        let client = client_for(&server, state.clone(), navigator.clone());

        let error = client.login("alice", "wrong").await.unwrap_err();
        assert!(error.is_auth_rejected());
        assert_eq!(state.get(keys::TOKEN), None);
        assert_eq!(state.get(keys::ROLE_CODE), None);
        // Already on the login path, so the rejection does not redirect.
        assert!(navigator.replacements().is_empty());
    }

    #[tokio::test]
    async fn test_permission_persistence_is_order_independent() {
        let state_a = Arc::new(MemorySessionState::new());
        let state_b = Arc::new(MemorySessionState::new());

        for (state, grants) in [
            (
                state_a.clone(),
                serde_json::json!([
                    { "resource": "stocktakes", "action": "view" },
                    { "resource": "scan", "action": "view" },
                ]),
            ),
            (
                state_b.clone(),
                serde_json::json!([
                    { "resource": "scan", "action": "view" },
                    { "resource": "stocktakes", "action": "view" },
                ]),
            ),
        ] {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/roles/me/permissions"))
                .respond_with(ResponseTemplate::new(200).set_body_json(grants))
                .mount(&server)
                .await;

            state.set(keys::TOKEN, "tok");
            let client = client_for(&server, state, RecordingNavigator::at("/"));
            client.load_permissions().await.expect("load");
        }

        assert_eq!(state_a.get(keys::PERMISSIONS), state_b.get(keys::PERMISSIONS));
        assert_eq!(
            state_a.get(keys::PERMISSIONS),
            Some(r#"["scan:view","stocktakes:view"]"#.to_string())
        );
    }

    #[tokio::test]
    async fn test_load_permissions_without_credential_is_noop() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/roles/me/permissions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let state = Arc::new(MemorySessionState::new());
        let client = client_for(&server, state.clone(), RecordingNavigator::at("/"));
        client.load_permissions().await.expect("noop");
        assert_eq!(state.get(keys::PERMISSIONS), None);
    }

    #[tokio::test]
    async fn test_stale_permission_response_after_logout_is_discarded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/roles/me/permissions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([
                        { "resource": "logs", "action": "view" },
                    ]))
                    .set_delay(std::time::Duration::from_millis(200)),
            )
            .mount(&server)
            .await;

        let state = Arc::new(MemorySessionState::new());
        state.set(keys::TOKEN, "tok");
        let client = Arc::new(client_for(
            &server,
            state.clone(),
            RecordingNavigator::at("/"),
        ));

        let in_flight = tokio::spawn({
            let client = client.clone();
            async move { client.load_permissions().await }
        });
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        client.logout();

        in_flight.await.expect("join").expect("load");
        assert_eq!(state.get(keys::PERMISSIONS), None);
    }

    #[tokio::test]
    async fn test_concurrent_rejections_redirect_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/roles/me/permissions"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let state = Arc::new(MemorySessionState::new());
        state.set(keys::TOKEN, "tok");
        let navigator = RecordingNavigator::slow("/", 150);
        let client = client_for(&server, state.clone(), navigator.clone());

        let (first, second) = tokio::join!(client.load_permissions(), client.load_permissions());
        assert!(first.unwrap_err().is_auth_rejected());
        assert!(second.unwrap_err().is_auth_rejected());

        assert_eq!(navigator.replacements(), vec!["/login".to_string()]);
        assert_eq!(state.get(keys::TOKEN), None);
        assert_eq!(state.get(keys::ROLE_CODE), None);
    }

    #[tokio::test]
    async fn test_non_auth_api_errors_propagate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/roles/me/permissions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let state = Arc::new(MemorySessionState::new());
        state.set(keys::TOKEN, "tok");
        let navigator = RecordingNavigator::at("/");
        let client = client_for(&server, state.clone(), navigator.clone());

        match client.load_permissions().await.unwrap_err() {
            AssetHubError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
        // A non-auth failure neither clears the session nor redirects.
        assert_eq!(state.get(keys::TOKEN), Some("tok".to_string()));
        assert!(navigator.replacements().is_empty());
    }
}
