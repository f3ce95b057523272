//! Permission inspection commands.

use std::sync::Arc;

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use assethub_core::permissions::CapabilityStore;
use assethub_core::session::{AuthClient, SessionState};

use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum PermissionCommands {
    /// List the recorded permission grants
    List,

    /// Re-fetch the permission list from the API
    Refresh,

    /// Check a single capability
    Can {
        /// Resource key (e.g., office_hardware_assets)
        resource: String,

        /// Action (view, create, update, delete)
        #[arg(default_value = "view")]
        action: String,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct GrantRow {
    resource: String,
    action: String,
}

pub async fn execute(
    cmd: PermissionCommands,
    client: &AuthClient,
    state: Arc<dyn SessionState>,
    format: OutputFormat,
) -> Result<()> {
    let store = CapabilityStore::new(state);

    match cmd {
        PermissionCommands::List => match store.recorded_capabilities()? {
            Some(capabilities) => {
                let rows: Vec<GrantRow> = capabilities
                    .into_iter()
                    .map(|capability| GrantRow {
                        resource: capability.resource,
                        action: capability.action,
                    })
                    .collect();
                output::print_list(&rows, format);
            }
            None => {
                output::print_info(
                    "No permission list recorded. Run `assethub permissions refresh`.",
                );
            }
        },

        PermissionCommands::Refresh => {
            if !client.has_credential() {
                output::print_info("Not logged in.");
                return Ok(());
            }
            client.load_permissions().await?;
            let count = store
                .recorded_capabilities()?
                .map_or(0, |capabilities| capabilities.len());
            output::print_success(&format!("Loaded {} permission grants", count));
        }

        PermissionCommands::Can { resource, action } => {
            let granted = store.has_capability(&resource, &action);
            match format {
                OutputFormat::Table => {
                    if granted {
                        output::print_success(&format!("{}:{} granted", resource, action));
                    } else {
                        output::print_denied(&format!("{}:{} not granted", resource, action));
                    }
                }
                _ => output::print_item(
                    &serde_json::json!({
                        "resource": resource,
                        "action": action,
                        "granted": granted,
                    }),
                    format,
                ),
            }
        }
    }

    Ok(())
}
