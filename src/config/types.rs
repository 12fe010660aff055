//! Configuration types for rolegate
//!
//! Two documents are described here: the application configuration (where
//! the manifest lives, how to log) and the admin manifest itself (permission
//! sets, roles and admins).

use crate::access_control::PermissionKey;
use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Admin manifest location
    pub manifest: ManifestConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Manifest location
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Path to the manifest file (`.toml`, `.json`, `.jsonc` or `.json5`)
    pub path: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            path: "admin.toml".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directive (e.g. `info`, `rolegate=debug`)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}

/// The admin manifest
///
/// ```toml
/// [permission_sets]
/// Admin = ["System:Kick", "System:Ban"]
///
/// [[roles]]
/// name = "Mod"
/// permissions = ["System:Kick"]
///
/// [[admins]]
/// name = "alice"
/// identity = 76561198000000001
/// immunity = 50
/// permissions = ["@Mod", "System:Ban"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminTableManifest {
    /// Named permission sets; their union is the permission universe
    pub permission_sets: HashMap<String, Vec<String>>,

    /// Reusable rule bundles
    pub roles: Vec<RoleManifest>,

    /// Principals and their rules
    pub admins: Vec<AdminManifest>,
}

/// A role entry
#[derive(Debug, Clone, Deserialize)]
pub struct RoleManifest {
    pub name: String,

    #[serde(default)]
    pub permissions: Vec<String>,
}

/// An admin entry
#[derive(Debug, Clone, Deserialize)]
pub struct AdminManifest {
    pub name: String,

    pub identity: u64,

    /// Compared by consumers deciding whether one admin may target another
    #[serde(default)]
    pub immunity: u8,

    #[serde(default)]
    pub permissions: Vec<String>,
}

impl AdminTableManifest {
    /// Check structural rules the deserializer cannot express.
    ///
    /// Duplicate admin identities are allowed; lookups return the first entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut set_names = HashSet::new();
        for name in self.permission_sets.keys() {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    message: "permission set name must not be blank".to_string(),
                });
            }
            if !set_names.insert(PermissionKey::new(name.as_str())) {
                return Err(ConfigError::Invalid {
                    message: format!("Duplicate permission set: {}", name),
                });
            }
        }

        let mut role_names = HashSet::new();
        for (index, role) in self.roles.iter().enumerate() {
            if role.name.trim().is_empty() {
                return Err(ConfigError::Missing {
                    field: format!("roles[{}].name", index),
                });
            }
            if !role_names.insert(PermissionKey::new(role.name.as_str())) {
                return Err(ConfigError::Invalid {
                    message: format!("Duplicate role: {}", role.name),
                });
            }
        }

        for (index, admin) in self.admins.iter().enumerate() {
            if admin.name.trim().is_empty() {
                return Err(ConfigError::Missing {
                    field: format!("admins[{}].name", index),
                });
            }
        }

        Ok(())
    }
}
