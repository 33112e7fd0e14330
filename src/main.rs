//! ChargeDesk - access model inspector
//!
//! Answers permission, menu and route questions against the configured
//! access model without a running portal.

#![allow(missing_docs)]

use anyhow::Context;
use chargedesk::{
    Action, Feature, GrantSource, MenuItem, PermissionMatrix, PortalConfig, Role, RoleCatalog,
    RoleGroup,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "chargedesk", version, about = "Inspect the portal access model")]
struct Cli {
    /// YAML configuration file; `CHARGEDESK_*` variables are used when absent
    #[arg(short, long, global = true, env = "CHARGEDESK_CONFIG")]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check one permission
    Check {
        #[arg(long)]
        role: Role,
        #[arg(long)]
        feature: Feature,
        #[arg(long)]
        action: Action,
    },
    /// Action map of a role for a feature
    Permissions {
        #[arg(long)]
        role: Role,
        #[arg(long)]
        feature: Feature,
    },
    /// Menu entries visible to a role
    Menu {
        #[arg(long)]
        role: Role,
    },
    /// Whether a role may open a path
    Access {
        #[arg(long)]
        role: Role,
        #[arg(long)]
        path: String,
    },
    /// Group membership, for every group or for one role
    Groups {
        #[arg(long)]
        role: Option<Role>,
    },
    /// Validate configuration and the role catalog
    Validate,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.log_json);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => PortalConfig::from_file(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None => PortalConfig::from_env().context("loading configuration from environment")?,
    };

    let catalog = RoleCatalog::global().clone();
    let mut matrix = PermissionMatrix::default();
    matrix.extend(config.load_permission_rules().await?);
    let menu = config.load_menu(catalog.clone()).await?;

    match cli.command {
        Command::Check {
            role,
            feature,
            action,
        } => {
            let check = matrix.check(role, feature, action);
            if cli.json {
                let granted_by = check.granted_by.map(describe_grant);
                print_json(&serde_json::json!({
                    "role": role,
                    "feature": feature,
                    "action": action,
                    "granted": check.granted,
                    "grantedBy": granted_by,
                    "reason": check.denial_reason,
                }))?;
            } else if check.granted {
                let source = check.granted_by.map(describe_grant).unwrap_or_default();
                println!("granted ({})", source);
            } else {
                println!(
                    "denied: {}",
                    check.denial_reason.unwrap_or_else(|| "no grant".to_string())
                );
            }
        }
        Command::Permissions { role, feature } => {
            let actions = matrix.permissions_for(role, feature);
            if cli.json {
                print_json(&actions)?;
            } else {
                for (action, granted) in actions {
                    println!("{:<12} {}", action, if granted { "yes" } else { "no" });
                }
            }
        }
        Command::Menu { role } => {
            let visible = menu.visible_items(role);
            if cli.json {
                print_json(&visible)?;
            } else {
                for item in visible {
                    print_item(item, 0);
                }
            }
        }
        Command::Access { role, path } => {
            let allowed = menu.can_access_path(role, &path);
            if cli.json {
                print_json(&serde_json::json!({
                    "role": role,
                    "path": path,
                    "allowed": allowed,
                }))?;
            } else {
                println!("{}", if allowed { "allowed" } else { "not authorized" });
            }
        }
        Command::Groups { role } => match role {
            Some(role) => {
                let groups = catalog.groups_of(role);
                if cli.json {
                    print_json(&groups)?;
                } else {
                    for group in groups {
                        println!("{}", group);
                    }
                }
            }
            None => {
                let table: Vec<(RoleGroup, Vec<Role>)> = RoleGroup::ALL
                    .into_iter()
                    .map(|group| (group, catalog.roles_in_group(group).iter().collect()))
                    .collect();
                if cli.json {
                    print_json(&table)?;
                } else {
                    for (group, roles) in table {
                        let names: Vec<&str> = roles.iter().map(|role| role.as_str()).collect();
                        println!("{:<18} {}", group, names.join(", "));
                    }
                }
            }
        },
        Command::Validate => {
            catalog.validate()?;
            println!(
                "ok: {} roles, {} groups, {} menu entries",
                Role::ALL.len(),
                RoleGroup::ALL.len(),
                menu.items().len()
            );
        }
    }

    Ok(())
}

fn describe_grant(source: GrantSource) -> String {
    match source {
        GrantSource::Bypass => "bypass".to_string(),
        GrantSource::Literal => "listed".to_string(),
        GrantSource::Group(group) => format!("via {}", group),
    }
}

fn print_item(item: &MenuItem, depth: usize) {
    let marker = item
        .badge
        .as_deref()
        .map(|badge| format!(" [{}]", badge))
        .unwrap_or_default();
    println!("{}{:<24} {}{}", "  ".repeat(depth), item.path, item.label, marker);
    for child in &item.children {
        print_item(child, depth + 1);
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
