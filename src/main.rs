//! rolegate CLI
//!
//! Loads an admin manifest and inspects the resolved permissions.

use anyhow::Context;
use clap::{Parser, Subcommand};
use rolegate::{
    AdminRegistry,
    config::{AppConfig, LogFormat, load_config},
};
use serde_json::json;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Resolve and inspect admin permissions from a manifest
#[derive(Parser, Debug)]
#[command(name = "rolegate")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "ROLEGATE_CONFIG")]
    config: Option<String>,

    /// Path to the admin manifest (overrides the configuration)
    #[arg(short, long)]
    manifest: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ROLEGATE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List admins with their immunity and permission counts
    Admins,

    /// Show an admin's rules and resolved permissions
    Show {
        /// Admin identity
        identity: u64,
    },

    /// Check whether an admin holds a permission (non-zero exit if not)
    Check {
        /// Admin identity
        identity: u64,
        /// Concrete permission, e.g. System:Kick
        permission: String,
    },

    /// List the concrete permissions a pattern selects
    Expand {
        /// Pattern, e.g. System:*
        pattern: String,
    },

    /// Resolve ad-hoc rules against the manifest's permission sets and roles
    Resolve {
        /// Rules, e.g. @Mod System:Ban '!System:Kick'
        #[arg(required = true)]
        rules: Vec<String>,
    },
}

fn init_logging(config: &AppConfig, level: Option<&str>) {
    let level = level.unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    match config.logging.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

fn print_permissions<'a>(permissions: impl IntoIterator<Item = &'a rolegate::PermissionKey>) {
    for permission in permissions {
        println!("{}", permission);
    }
}

fn run(args: &Args, registry: &AdminRegistry) -> anyhow::Result<ExitCode> {
    match &args.command {
        Command::Admins => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(registry.admins())?);
            } else {
                for admin in registry.admins() {
                    println!(
                        "{}\t{}\timmunity={}\tpermissions={}",
                        admin.identity(),
                        admin.name(),
                        admin.immunity(),
                        admin.permissions().len()
                    );
                }
            }
        }
        Command::Show { identity } => {
            let admin = registry
                .get(*identity)
                .with_context(|| format!("No admin with identity {}", identity))?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(admin)?);
            } else {
                println!(
                    "{} ({}) immunity={}",
                    admin.name(),
                    admin.identity(),
                    admin.immunity()
                );
                println!("rules: {}", admin.rules().join(" "));
                print_permissions(admin.permissions());
            }
        }
        Command::Check {
            identity,
            permission,
        } => {
            let allowed = match registry.require(*identity, permission) {
                Ok(()) => true,
                Err(denied) => {
                    info!(error = %denied, "Permission check failed");
                    false
                }
            };

            if args.json {
                println!(
                    "{}",
                    json!({ "identity": identity, "permission": permission, "allowed": allowed })
                );
            } else {
                println!("{}", if allowed { "allowed" } else { "denied" });
            }

            if !allowed {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Expand { pattern } => {
            let matched = registry.expand(pattern);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&matched)?);
            } else {
                print_permissions(&matched);
            }
        }
        Command::Resolve { rules } => {
            let resolved = registry.resolve(rules);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&resolved)?);
            } else {
                print_permissions(&resolved);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> anyhow::Result<ExitCode> {
    // .env is optional
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    init_logging(&config, args.log_level.as_deref());

    info!(version = env!("CARGO_PKG_VERSION"), "Starting rolegate");

    let manifest_path = args.manifest.as_deref().unwrap_or(&config.manifest.path);
    let registry = AdminRegistry::from_file(manifest_path).inspect_err(
        |e| error!(error = %e, path = manifest_path, "Failed to load admin manifest"),
    )?;

    run(&args, &registry)
}
