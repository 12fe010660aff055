//! Access control module
//!
//! Resolves permission rules into concrete, flattened permission sets.
//!
//! ## Rule Grammar
//!
//! A rule is a single token, optionally prefixed by one marker:
//!
//! - `System:Kick` - grant an exact permission (only if declared in a permission set)
//! - `System:*` - grant every permission whose leading segments match
//! - `*` - grant every declared permission
//! - `@Moderator` - inherit the resolved permissions of a role
//! - `!System:Ban` - deny; removes matches from the result, always wins
//!
//! Wildcards are full segments and act as a prefix filter: `A:*` matches
//! `A:B` and `A:B:C`, while `A:B:*` does not match `A:B`.
//!
//! ## Example
//!
//! ```
//! use rolegate::access_control::{PermissionUniverse, RoleTable, RuleResolver};
//!
//! let sets = [vec!["System:Kick".to_string(), "System:Ban".to_string()]];
//! let universe = PermissionUniverse::from_sets(sets.iter().map(Vec::as_slice));
//!
//! let mut roles = RoleTable::new();
//! roles.insert("Mod", ["System:Kick"]).unwrap();
//!
//! let resolver = RuleResolver::new(&universe, &roles);
//! let resolved = resolver.resolve_raw(["@Mod", "System:Ban", "!System:Kick"]);
//! assert_eq!(resolved.len(), 1);
//! ```

pub mod patterns;
pub mod resolver;
pub mod types;

pub use patterns::{PermissionUniverse, WildcardMatcher};
pub use resolver::{RoleTable, RuleResolver};
pub use types::{
    AccessDecision, DENY_MARKER, Pattern, PatternKind, PermissionKey, ROLE_MARKER, Rule, SEPARATOR,
    Segment, WILDCARD,
};
