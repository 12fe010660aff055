//! Wildcard pattern matching for access control
//!
//! Expands permission patterns against the closed universe of concrete
//! permissions declared in the manifest's permission sets.

use crate::access_control::types::{Pattern, PatternKind, PermissionKey};
use std::collections::BTreeSet;

/// The closed set of concrete permissions
///
/// Only strings declared in some permission set are ever granted; patterns
/// and direct rules are always resolved against this set.
#[derive(Debug, Clone, Default)]
pub struct PermissionUniverse {
    permissions: BTreeSet<PermissionKey>,
}

impl PermissionUniverse {
    /// Build the universe from the values of every permission set
    pub fn from_sets<'a, I, S>(sets: I) -> Self
    where
        I: IntoIterator<Item = &'a [S]>,
        S: AsRef<str> + 'a,
    {
        let permissions = sets
            .into_iter()
            .flat_map(|set| set.iter())
            .map(|permission| PermissionKey::new(permission.as_ref()))
            .collect();

        Self { permissions }
    }

    pub fn contains(&self, permission: &str) -> bool {
        self.permissions.contains(&PermissionKey::new(permission))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PermissionKey> {
        self.permissions.iter()
    }

    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}

impl FromIterator<PermissionKey> for PermissionUniverse {
    fn from_iter<T: IntoIterator<Item = PermissionKey>>(iter: T) -> Self {
        Self {
            permissions: iter.into_iter().collect(),
        }
    }
}

/// Stateless matcher selecting concrete permissions for a pattern
#[derive(Debug, Clone, Copy, Default)]
pub struct WildcardMatcher;

impl WildcardMatcher {
    /// Select every permission in the universe matched by `pattern`.
    ///
    /// Exact patterns return themselves only if declared in the universe;
    /// `*` returns the whole universe; segment patterns act as a prefix
    /// filter that never matches permissions shorter than the pattern.
    pub fn expand(pattern: &Pattern, universe: &PermissionUniverse) -> BTreeSet<PermissionKey> {
        match pattern.kind() {
            PatternKind::Exact(key) => universe
                .permissions
                .get(key)
                .cloned()
                .into_iter()
                .collect(),
            PatternKind::Global => universe.permissions.clone(),
            PatternKind::Segments(_) => universe
                .permissions
                .iter()
                .filter(|permission| pattern.matches(permission))
                .cloned()
                .collect(),
        }
    }

    /// Parse `pattern` and expand it
    pub fn expand_str(pattern: &str, universe: &PermissionUniverse) -> BTreeSet<PermissionKey> {
        Self::expand(&Pattern::parse(pattern), universe)
    }
}
