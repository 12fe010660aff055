//! Permission rule resolver
//!
//! Flattens a list of permission rules into concrete permissions:
//! 1. Deny rules (`!pattern`) collect permissions to remove
//! 2. Role references (`@role`) expand the role's rules recursively
//! 3. Direct rules and wildcards are expanded against the universe
//!
//! Denials are subtracted last, so they win over any allow regardless of
//! rule order or how deeply the allow was inherited.

use crate::access_control::patterns::{PermissionUniverse, WildcardMatcher};
use crate::access_control::types::{PermissionKey, Rule};
use crate::error::ConfigError;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, trace, warn};

/// Role name to parsed rules
#[derive(Debug, Clone, Default)]
pub struct RoleTable {
    roles: HashMap<PermissionKey, Vec<Rule>>,
}

impl RoleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a role. Names differing only by case collide.
    pub fn insert<I, S>(&mut self, name: &str, rules: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let key = PermissionKey::new(name);
        if self.roles.contains_key(&key) {
            return Err(ConfigError::Invalid {
                message: format!("Duplicate role: {}", name),
            });
        }

        self.roles.insert(key, Rule::parse_all(rules));
        Ok(())
    }

    pub fn get(&self, name: &PermissionKey) -> Option<&[Rule]> {
        self.roles.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.roles.contains_key(&PermissionKey::new(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &PermissionKey> {
        self.roles.keys()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

/// Resolves rule lists against a universe and role table
pub struct RuleResolver<'a> {
    universe: &'a PermissionUniverse,
    roles: &'a RoleTable,
}

impl<'a> RuleResolver<'a> {
    pub fn new(universe: &'a PermissionUniverse, roles: &'a RoleTable) -> Self {
        Self { universe, roles }
    }

    /// Resolve parsed rules into concrete permissions
    pub fn resolve(&self, rules: &[Rule]) -> BTreeSet<PermissionKey> {
        let mut path = Vec::new();
        self.resolve_on_path(rules, &mut path)
    }

    /// Parse and resolve raw rule strings
    pub fn resolve_raw<I, S>(&self, rules: I) -> BTreeSet<PermissionKey>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.resolve(&Rule::parse_all(rules))
    }

    /// `path` holds the roles currently being expanded. A role already on the
    /// path contributes nothing, which makes cyclic role graphs terminate.
    fn resolve_on_path(
        &self,
        rules: &[Rule],
        path: &mut Vec<PermissionKey>,
    ) -> BTreeSet<PermissionKey> {
        let mut allowed = BTreeSet::new();
        let mut denied = BTreeSet::new();

        for rule in rules {
            match rule {
                Rule::Deny(pattern) => {
                    let matched = WildcardMatcher::expand(pattern, self.universe);
                    trace!(pattern = %pattern, matched = matched.len(), "Deny rule");
                    denied.extend(matched);
                }
                Rule::Role(name) => {
                    let Some(role_rules) = self.roles.get(name) else {
                        debug!(role = %name, "Skipping reference to unknown role");
                        continue;
                    };

                    if path.contains(name) {
                        warn!(
                            role = %name,
                            path = ?path.iter().map(PermissionKey::as_str).collect::<Vec<_>>(),
                            "Role reference cycle, not expanding again"
                        );
                        continue;
                    }

                    path.push(name.clone());
                    let inherited = self.resolve_on_path(role_rules, path);
                    path.pop();

                    trace!(role = %name, inherited = inherited.len(), "Role rule");
                    allowed.extend(inherited);
                }
                Rule::Grant(pattern) => {
                    let matched = WildcardMatcher::expand(pattern, self.universe);
                    trace!(pattern = %pattern, matched = matched.len(), "Grant rule");
                    allowed.extend(matched);
                }
            }
        }

        allowed.retain(|permission| !denied.contains(permission));
        allowed
    }
}
