//! AssetHub CLI - terminal client for the AssetHub IT asset management API.
//!
//! Provides commands for session management, permission inspection, route
//! guard decisions, and configuration.

mod commands;
mod output;
mod session;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use parking_lot::Mutex;

use assethub_core::config::ClientConfig;
use assethub_core::session::{keys, AuthClient, Navigator, SessionState};

use commands::{auth, config, permissions, route};
use output::OutputFormat;
use session::FileSessionState;

/// AssetHub - IT asset management CLI
#[derive(Parser)]
#[command(
    name = "assethub",
    version = "0.1.0",
    about = "AssetHub - IT asset management CLI",
    long_about = "Terminal client for the AssetHub API: sessions, permissions, and route guard decisions.",
    propagate_version = true
)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    output: OutputFormat,

    /// API base URL
    #[arg(long, global = true, env = "ASSETHUB_API_URL")]
    api_url: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and load the permission list
    Login(auth::LoginArgs),

    /// Clear the stored session
    Logout,

    /// Show the current session
    Whoami,

    /// Change the current user's password
    Passwd(auth::PasswdArgs),

    /// Permission inspection and checks
    #[command(subcommand)]
    Permissions(permissions::PermissionCommands),

    /// Show the navigation guard's decision for a path
    Route(route::RouteArgs),

    /// Show or set the department scope for asset screens
    Scope(route::ScopeArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(config::ConfigCommands),
}

/// Navigator bound to the terminal: tracks a virtual location and reports
/// forced redirects to the user.
struct TerminalNavigator {
    current: Mutex<String>,
}

impl TerminalNavigator {
    /// Start at the login screen unless a credential is already stored.
    fn from_session(state: &dyn SessionState) -> Self {
        let start = if state.get(keys::TOKEN).is_some() {
            "/"
        } else {
            "/login"
        };
        Self {
            current: Mutex::new(start.to_string()),
        }
    }
}

#[async_trait]
impl Navigator for TerminalNavigator {
    fn current_path(&self) -> String {
        self.current.lock().clone()
    }

    async fn replace(&self, path: &str) {
        *self.current.lock() = path.to_string();
        output::print_info(&format!("Session expired; returned to {}", path));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let mut client_config = ClientConfig::load()?;
    if let Some(api_url) = cli.api_url.clone().or_else(config::load_api_url) {
        client_config.base_url = api_url;
    }

    let state = Arc::new(FileSessionState::open(session::session_path()?));
    let navigator = Arc::new(TerminalNavigator::from_session(state.as_ref()));
    let client = AuthClient::new(&client_config, state.clone(), navigator)?;
    tracing::debug!(base_url = client.base_url(), "client ready");
    let format = cli.output;

    let result = match cli.command {
        Commands::Login(args) => auth::login(args, &client, state.clone(), format).await,
        Commands::Logout => auth::logout(&client, format),
        Commands::Whoami => auth::whoami(state.clone(), format),
        Commands::Passwd(args) => auth::passwd(args, &client, format).await,
        Commands::Permissions(cmd) => {
            permissions::execute(cmd, &client, state.clone(), format).await
        }
        Commands::Route(args) => route::execute(args, state.clone(), format),
        Commands::Scope(args) => route::scope(args, state.clone(), format),
        Commands::Config(cmd) => config::execute(cmd, format),
    };

    if let Err(e) = result {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
