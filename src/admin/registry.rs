//! Admin registry
//!
//! Holds every admin from the manifest with permissions already flattened.
//! Wildcards and role references are expanded once at load; runtime checks
//! are plain set lookups.

use crate::access_control::{
    AccessDecision, PermissionKey, PermissionUniverse, RoleTable, RuleResolver, WildcardMatcher,
};
use crate::config::{AdminTableManifest, load_manifest};
use crate::error::{AccessDeniedError, ConfigError};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info, warn};

/// An administrator with resolved permissions
#[derive(Debug, Clone, Serialize)]
pub struct Admin {
    name: String,
    identity: u64,
    immunity: u8,
    rules: Vec<String>,
    permissions: BTreeSet<PermissionKey>,
}

impl Admin {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identity(&self) -> u64 {
        self.identity
    }

    pub fn immunity(&self) -> u8 {
        self.immunity
    }

    /// Rules as written in the manifest
    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    /// Flattened concrete permissions
    pub fn permissions(&self) -> &BTreeSet<PermissionKey> {
        &self.permissions
    }

    /// Exact, case-insensitive membership test. Patterns are not expanded here.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(&PermissionKey::new(permission))
    }
}

/// Resolved admins plus the universe and roles they were resolved against
#[derive(Debug, Clone, Default)]
pub struct AdminRegistry {
    universe: PermissionUniverse,
    roles: RoleTable,
    admins: Vec<Admin>,
}

impl AdminRegistry {
    /// Build the registry from a manifest, resolving every admin's rules.
    pub fn load(manifest: &AdminTableManifest) -> Result<Self, ConfigError> {
        manifest.validate()?;

        // Sorted so the spelling kept for duplicate permissions is stable
        let mut sets: Vec<_> = manifest.permission_sets.iter().collect();
        sets.sort_by_key(|(name, _)| PermissionKey::new(name.as_str()));
        let universe = PermissionUniverse::from_sets(sets.iter().map(|(_, set)| set.as_slice()));

        let mut roles = RoleTable::new();
        for role in &manifest.roles {
            roles.insert(&role.name, &role.permissions)?;
        }

        let resolver = RuleResolver::new(&universe, &roles);
        let mut seen = HashSet::new();
        let mut admins = Vec::with_capacity(manifest.admins.len());

        for entry in &manifest.admins {
            if !seen.insert(entry.identity) {
                warn!(
                    identity = entry.identity,
                    admin = %entry.name,
                    "Duplicate admin identity, lookups return the first entry"
                );
            }

            let permissions = resolver.resolve_raw(&entry.permissions);
            debug!(
                admin = %entry.name,
                identity = entry.identity,
                rules = entry.permissions.len(),
                permissions = permissions.len(),
                "Resolved admin permissions"
            );

            admins.push(Admin {
                name: entry.name.clone(),
                identity: entry.identity,
                immunity: entry.immunity,
                rules: entry.permissions.clone(),
                permissions,
            });
        }

        info!(
            admins = admins.len(),
            roles = roles.len(),
            permissions = universe.len(),
            "Loaded admin manifest"
        );

        Ok(Self {
            universe,
            roles,
            admins,
        })
    }

    /// Load the manifest file at `path` and build the registry
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::load(&load_manifest(path)?)
    }

    /// First admin with this identity
    pub fn get(&self, identity: u64) -> Option<&Admin> {
        self.admins.iter().find(|admin| admin.identity == identity)
    }

    /// Whether the admin with this identity holds `permission`.
    ///
    /// Unknown identities hold nothing.
    pub fn has_permission(&self, identity: u64, permission: &str) -> bool {
        self.get(identity)
            .is_some_and(|admin| admin.has_permission(permission))
    }

    /// Check a permission, returning the reason when denied
    pub fn check(&self, identity: u64, permission: &str) -> AccessDecision {
        match self.get(identity) {
            None => AccessDecision::Denied(format!("No admin with identity {}", identity)),
            Some(admin) if admin.has_permission(permission) => AccessDecision::Allowed,
            Some(admin) => AccessDecision::Denied(format!(
                "Admin '{}' does not hold '{}'",
                admin.name, permission
            )),
        }
    }

    /// Check a permission, returning an error if denied
    pub fn require(&self, identity: u64, permission: &str) -> Result<(), AccessDeniedError> {
        match self.get(identity) {
            None => Err(AccessDeniedError::unknown_admin(identity, permission)),
            Some(admin) if admin.has_permission(permission) => Ok(()),
            Some(_) => Err(AccessDeniedError::missing_permission(identity, permission)),
        }
    }

    /// Concrete permissions a pattern selects from this registry's universe
    pub fn expand(&self, pattern: &str) -> BTreeSet<PermissionKey> {
        WildcardMatcher::expand_str(pattern, &self.universe)
    }

    /// Resolve ad-hoc rules against this registry's universe and roles
    pub fn resolve<I, S>(&self, rules: I) -> BTreeSet<PermissionKey>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        RuleResolver::new(&self.universe, &self.roles).resolve_raw(rules)
    }

    pub fn admins(&self) -> &[Admin] {
        &self.admins
    }

    pub fn universe(&self) -> &PermissionUniverse {
        &self.universe
    }

    pub fn roles(&self) -> &RoleTable {
        &self.roles
    }

    pub fn len(&self) -> usize {
        self.admins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.admins.is_empty()
    }
}
