//! Admin permission resolution
//!
//! Resolves a declarative admin manifest into flattened, concrete permission
//! sets, computed once at load time.
//!
//! ## Features
//!
//! - **Permission sets** declare the closed universe of concrete permissions
//! - **Roles** bundle rules and may reference other roles (`@Role`)
//! - **Wildcards** (`System:*`, `*`) act as segment-wise prefix filters
//! - **Deny rules** (`!System:Ban`) always win over allows
//! - **Command registry facades** gate per-namespace commands on resolved permissions
//!
//! ## Example Manifest
//!
//! ```toml
//! [permission_sets]
//! Admin = ["System:Kick", "System:Ban", "System:Role:Create"]
//!
//! [[roles]]
//! name = "Mod"
//! permissions = ["System:Kick"]
//!
//! [[admins]]
//! name = "alice"
//! identity = 76561198000000001
//! immunity = 50
//! permissions = ["@Mod", "System:*", "!System:Role:*"]
//! ```

pub mod access_control;
pub mod admin;
pub mod commands;
pub mod config;
pub mod error;

// Re-export main types
pub use access_control::{AccessDecision, PermissionKey, Rule};
pub use admin::{Admin, AdminManager, AdminRegistry};
pub use config::{AppConfig, load_config, load_manifest};
pub use error::{AppError, Result};
