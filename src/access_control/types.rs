//! Access control types
//!
//! Core types used by the access control system: case-insensitive permission
//! keys, compiled wildcard patterns, and parsed permission rules.

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Separates the segments of a permission path (`System:Role:Create`)
pub const SEPARATOR: char = ':';

/// Full-segment wildcard; on its own it selects every concrete permission
pub const WILDCARD: char = '*';

/// Prefix marking a rule that removes permissions
pub const DENY_MARKER: char = '!';

/// Prefix marking a rule that pulls in another role
pub const ROLE_MARKER: char = '@';

/// Case-insensitive name used for permissions, roles, permission sets and namespaces.
///
/// The key is normalized once at construction. Equality, ordering and hashing
/// use the normalized form; `Display` keeps the spelling it was created with.
#[derive(Debug, Clone)]
pub struct PermissionKey {
    display: String,
    normalized: String,
}

impl PermissionKey {
    pub fn new(name: impl Into<String>) -> Self {
        let display = name.into();
        let normalized = display.to_lowercase();
        Self {
            display,
            normalized,
        }
    }

    /// The name as written in the manifest
    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// Lowercased form used for comparisons
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Normalized path segments
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.normalized.split(SEPARATOR)
    }

    pub fn is_empty(&self) -> bool {
        self.display.is_empty()
    }
}

impl PartialEq for PermissionKey {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized
    }
}

impl Eq for PermissionKey {}

impl Hash for PermissionKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized.hash(state);
    }
}

impl PartialOrd for PermissionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PermissionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.normalized.cmp(&other.normalized)
    }
}

impl fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl From<&str> for PermissionKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for PermissionKey {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl Serialize for PermissionKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.display)
    }
}

/// One segment of a wildcard pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// `*`: any value at this position
    Any,
    /// Lowercased literal segment
    Literal(String),
}

/// Shape of a compiled pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternKind {
    /// The lone `*` token
    Global,
    /// No wildcard anywhere; selects at most one permission
    Exact(PermissionKey),
    /// Bounded-length prefix filter
    Segments(Vec<Segment>),
}

/// A permission pattern compiled from its textual form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    kind: PatternKind,
}

impl Pattern {
    pub fn parse(source: &str) -> Self {
        let kind = if !source.contains(WILDCARD) {
            PatternKind::Exact(PermissionKey::new(source))
        } else if is_wildcard(source) {
            PatternKind::Global
        } else {
            PatternKind::Segments(
                source
                    .split(SEPARATOR)
                    .map(|segment| {
                        if is_wildcard(segment) {
                            Segment::Any
                        } else {
                            Segment::Literal(segment.to_lowercase())
                        }
                    })
                    .collect(),
            )
        };

        Self {
            source: source.to_string(),
            kind,
        }
    }

    pub fn kind(&self) -> &PatternKind {
        &self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check a single concrete permission against this pattern.
    ///
    /// Segment patterns match when every pattern segment lines up with the
    /// permission's segment at the same index; extra permission segments are
    /// unconstrained, but a permission shorter than the pattern never matches.
    pub fn matches(&self, permission: &PermissionKey) -> bool {
        match &self.kind {
            PatternKind::Global => true,
            PatternKind::Exact(key) => key == permission,
            PatternKind::Segments(pattern) => {
                let mut actual = permission.segments();
                pattern.iter().all(|expected| match actual.next() {
                    None => false,
                    Some(value) => match expected {
                        Segment::Any => true,
                        Segment::Literal(literal) => literal == value,
                    },
                })
            }
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn is_wildcard(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next() == Some(WILDCARD) && chars.next().is_none()
}

/// A raw permission rule parsed into its kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// `!pattern`: subtract matches from the allow set
    Deny(Pattern),
    /// `@role`: union in the named role's resolved permissions
    Role(PermissionKey),
    /// `pattern`: union in matches
    Grant(Pattern),
}

impl Rule {
    /// Parse a raw rule. Blank rules yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let rule = if let Some(pattern) = raw.strip_prefix(DENY_MARKER) {
            Rule::Deny(Pattern::parse(pattern))
        } else if let Some(role) = raw.strip_prefix(ROLE_MARKER) {
            Rule::Role(PermissionKey::new(role))
        } else {
            Rule::Grant(Pattern::parse(raw))
        };

        Some(rule)
    }

    /// Parse a list of raw rules, dropping blank entries
    pub fn parse_all<I, S>(raw: I) -> Vec<Rule>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw.into_iter()
            .filter_map(|rule| Rule::parse(rule.as_ref()))
            .collect()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Deny(pattern) => write!(f, "{}{}", DENY_MARKER, pattern),
            Rule::Role(role) => write!(f, "{}{}", ROLE_MARKER, role),
            Rule::Grant(pattern) => write!(f, "{}", pattern),
        }
    }
}

/// Result of an access check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Access is allowed
    Allowed,
    /// Access is denied with a reason
    Denied(String),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, AccessDecision::Denied(_))
    }
}
