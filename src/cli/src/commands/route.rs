//! Navigation guard decision command.

use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Args;

use assethub_core::guard::{DepartmentScope, NavigationDecision, NavigationGuard};
use assethub_core::permissions::PermissionResolver;
use assethub_core::session::{keys, SessionState};

use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct RouteArgs {
    /// Navigation path to evaluate (e.g., /assets/office)
    pub path: String,
}

#[derive(Args)]
pub struct ScopeArgs {
    /// New scope (office or datacenter); omit to show the current one
    pub scope: Option<String>,
}

pub fn execute(args: RouteArgs, state: Arc<dyn SessionState>, format: OutputFormat) -> Result<()> {
    let guard = NavigationGuard::standard(state);
    let requirement = PermissionResolver::standard().resolve(&args.path);
    let decision = guard.decide(&args.path);

    match format {
        OutputFormat::Table => {
            if let Some(requirement) = &requirement {
                output::print_detail("Requires", &requirement.describe());
            } else {
                output::print_detail("Requires", "nothing");
            }
            if let Some(view) = guard.view_for(&args.path) {
                output::print_detail("View", &view.to_string());
            }
            match &decision {
                NavigationDecision::Allow => output::print_success(&format!("{} allowed", args.path)),
                NavigationDecision::Redirect(to) => {
                    output::print_info(&format!("{} redirects to {}", args.path, to))
                }
            }
        }
        _ => {
            output::print_item(
                &serde_json::json!({
                    "path": args.path,
                    "requires": requirement.as_ref().map(|r| r.describe()),
                    "view": guard.view_for(&args.path).map(|v| v.to_string()),
                    "allowed": decision.is_allowed(),
                    "redirect": decision.redirect_target(),
                }),
                format,
            );
        }
    }

    Ok(())
}

/// Show or set the department scope preference for the assets landing.
pub fn scope(args: ScopeArgs, state: Arc<dyn SessionState>, format: OutputFormat) -> Result<()> {
    if let Some(scope) = args.scope {
        match scope.as_str() {
            "office" => state.remove(keys::DEPT_SCOPE),
            "datacenter" => state.set(keys::DEPT_SCOPE, DepartmentScope::DATACENTER_MARKER),
            other => bail!("Unknown scope '{}' (expected office or datacenter)", other),
        }
    }

    let current = DepartmentScope::from_preference(state.get(keys::DEPT_SCOPE).as_deref());
    let name = match current {
        DepartmentScope::Office => "office",
        DepartmentScope::Datacenter => "datacenter",
    };

    match format {
        OutputFormat::Table => {
            output::print_detail("Scope", name);
            output::print_detail("Assets landing", current.asset_path());
        }
        _ => output::print_item(
            &serde_json::json!({ "scope": name, "assets_landing": current.asset_path() }),
            format,
        ),
    }
    Ok(())
}
