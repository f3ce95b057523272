//! Session commands: login, logout, whoami, passwd.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use assethub_core::session::{keys, AuthClient, SessionState};

use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct LoginArgs {
    /// Login name
    pub username: String,

    /// Password
    pub password: String,
}

#[derive(Args)]
pub struct PasswdArgs {
    /// Current password
    pub old_password: String,

    /// New password
    pub new_password: String,
}

/// Current session details as shown by `whoami`.
#[derive(Debug, Serialize)]
struct SessionInfo {
    username: String,
    full_name: String,
    role_code: String,
    permissions_loaded: bool,
}

pub async fn login(
    args: LoginArgs,
    client: &AuthClient,
    state: Arc<dyn SessionState>,
    format: OutputFormat,
) -> Result<()> {
    let body = client.login(&args.username, &args.password).await?;

    let display_name = body
        .full_name
        .filter(|name| !name.is_empty())
        .or(body.username)
        .unwrap_or(args.username);
    let role = state.get(keys::ROLE_CODE).unwrap_or_default();

    match format {
        OutputFormat::Table => {
            if role.is_empty() {
                output::print_success(&format!("Logged in as {}", display_name));
            } else {
                output::print_success(&format!("Logged in as {} ({})", display_name, role));
            }
        }
        _ => output::print_item(
            &serde_json::json!({ "username": display_name, "role_code": role }),
            format,
        ),
    }
    Ok(())
}

pub fn logout(client: &AuthClient, format: OutputFormat) -> Result<()> {
    if !client.has_credential() {
        output::print_info("No session stored.");
        return Ok(());
    }
    client.logout();
    match format {
        OutputFormat::Table => output::print_success("Logged out"),
        _ => output::print_item(&serde_json::json!({ "logged_out": true }), format),
    }
    Ok(())
}

pub fn whoami(state: Arc<dyn SessionState>, format: OutputFormat) -> Result<()> {
    if state.get(keys::TOKEN).is_none() {
        output::print_info("Not logged in.");
        return Ok(());
    }

    let info = SessionInfo {
        username: state.get(keys::USERNAME).unwrap_or_default(),
        full_name: state.get(keys::FULL_NAME).unwrap_or_default(),
        role_code: state.get(keys::ROLE_CODE).unwrap_or_default(),
        permissions_loaded: state.get(keys::PERMISSIONS).is_some(),
    };

    match format {
        OutputFormat::Table => {
            output::print_detail("Username", &info.username);
            output::print_detail("Full name", &info.full_name);
            output::print_detail("Role", &info.role_code);
            output::print_detail(
                "Permissions",
                if info.permissions_loaded {
                    "loaded"
                } else {
                    "not loaded"
                },
            );
        }
        _ => output::print_item(&info, format),
    }
    Ok(())
}

pub async fn passwd(args: PasswdArgs, client: &AuthClient, format: OutputFormat) -> Result<()> {
    client
        .change_password(&args.old_password, &args.new_password)
        .await?;
    match format {
        OutputFormat::Table => output::print_success("Password updated"),
        _ => output::print_item(&serde_json::json!({ "updated": true }), format),
    }
    Ok(())
}
