//! Permission resolution integration tests
//!
//! Covers:
//! - End-to-end manifests resolved into admin permission sets
//! - Wildcard prefix matching against the permission universe
//! - Deny precedence across direct rules and inherited roles
//! - Role inheritance, unknown roles and role cycles
//! - Determinism and idempotence of resolution

use config::FileFormat;
use rolegate::AdminRegistry;
use rolegate::access_control::{
    PermissionKey, PermissionUniverse, RoleTable, RuleResolver, WildcardMatcher,
};
use rolegate::config::load_manifest_from_str;
use std::collections::BTreeSet;

// =============================================================================
// Test Helpers
// =============================================================================

fn registry(toml: &str) -> AdminRegistry {
    let manifest = load_manifest_from_str(toml, FileFormat::Toml).unwrap();
    AdminRegistry::load(&manifest).unwrap()
}

fn universe(permissions: &[&str]) -> PermissionUniverse {
    permissions.iter().map(|p| PermissionKey::new(*p)).collect()
}

fn keys(permissions: &[&str]) -> BTreeSet<PermissionKey> {
    permissions.iter().map(|p| PermissionKey::new(*p)).collect()
}

const SERVER_MANIFEST: &str = r#"
[permission_sets]
System = ["System:Kick", "System:Ban", "System:Slay", "System:Role:Create", "System:Role:Delete"]
Chat = ["Chat:Mute", "Chat:Gag", "Chat:Say:All"]

[[roles]]
name = "Helper"
permissions = ["Chat:Mute"]

[[roles]]
name = "Mod"
permissions = ["@Helper", "Chat:*", "System:Kick"]

[[roles]]
name = "Admin"
permissions = ["@Mod", "System:*", "!System:Role:*"]

[[admins]]
name = "owner"
identity = 76561198000000001
immunity = 100
permissions = ["*"]

[[admins]]
name = "admin"
identity = 76561198000000002
immunity = 80
permissions = ["@Admin"]

[[admins]]
name = "moderator"
identity = 76561198000000003
immunity = 50
permissions = ["@Mod", "!Chat:Gag"]

[[admins]]
name = "ghost"
identity = 76561198000000004
permissions = ["@Ghost", "Nothing:Here"]
"#;

// =============================================================================
// 1. End-to-end scenarios
// =============================================================================

mod scenarios {
    use super::*;

    #[test]
    fn test_wildcard_admin_gets_all_system_permissions() {
        let registry = registry(
            r#"
[permission_sets]
Admin = ["System:Kick", "System:Ban"]

[[admins]]
name = "alice"
identity = 1
permissions = ["System:*"]
"#,
        );

        let alice = registry.get(1).unwrap();
        assert_eq!(*alice.permissions(), keys(&["System:Kick", "System:Ban"]));
    }

    #[test]
    fn test_deny_removes_role_granted_permission() {
        let registry = registry(
            r#"
[permission_sets]
Admin = ["System:Kick", "System:Ban"]

[[roles]]
name = "Mod"
permissions = ["System:Kick"]

[[admins]]
name = "bob"
identity = 2
permissions = ["@Mod", "System:Ban", "!System:Kick"]
"#,
        );

        assert_eq!(*registry.get(2).unwrap().permissions(), keys(&["System:Ban"]));
    }

    #[test]
    fn test_unknown_role_yields_empty_set_without_failing() {
        let registry = registry(
            r#"
[permission_sets]
Admin = ["System:Kick"]

[[admins]]
name = "carol"
identity = 3
permissions = ["@Ghost"]
"#,
        );

        assert!(registry.get(3).unwrap().permissions().is_empty());
    }

    #[test]
    fn test_server_manifest() {
        let registry = registry(SERVER_MANIFEST);
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.universe().len(), 8);

        let owner = registry.get(76561198000000001).unwrap();
        assert_eq!(owner.permissions().len(), 8);
        assert_eq!(owner.immunity(), 100);

        let admin = registry.get(76561198000000002).unwrap();
        assert_eq!(
            *admin.permissions(),
            keys(&[
                "System:Kick",
                "System:Ban",
                "System:Slay",
                "Chat:Mute",
                "Chat:Gag",
                "Chat:Say:All"
            ])
        );

        let moderator = registry.get(76561198000000003).unwrap();
        assert_eq!(
            *moderator.permissions(),
            keys(&["System:Kick", "Chat:Mute", "Chat:Say:All"])
        );

        let ghost = registry.get(76561198000000004).unwrap();
        assert!(ghost.permissions().is_empty());
        assert_eq!(ghost.immunity(), 0);
    }

    #[test]
    fn test_runtime_checks_are_case_insensitive() {
        let registry = registry(SERVER_MANIFEST);
        assert!(registry.has_permission(76561198000000003, "system:kick"));
        assert!(registry.has_permission(76561198000000003, "CHAT:SAY:ALL"));
        assert!(!registry.has_permission(76561198000000003, "Chat:Gag"));
        assert!(!registry.has_permission(12345, "Chat:Mute"));
    }
}

// =============================================================================
// 2. Wildcard matching properties
// =============================================================================

mod wildcard_matching {
    use super::*;

    #[test]
    fn test_prefix_slack() {
        let universe = universe(&["A:B:C", "A:B", "A:D"]);

        let longer = WildcardMatcher::expand_str("A:B:*", &universe);
        assert!(!longer.contains(&PermissionKey::new("A:B")));
        assert_eq!(longer, keys(&["A:B:C"]));

        assert_eq!(
            WildcardMatcher::expand_str("A:*", &universe),
            keys(&["A:B:C", "A:B", "A:D"])
        );
        assert_eq!(WildcardMatcher::expand_str("A:B", &universe), keys(&["A:B"]));
    }

    #[test]
    fn test_every_concrete_permission_resolves_to_itself() {
        let registry = registry(SERVER_MANIFEST);
        for permission in registry.universe().iter() {
            let resolved = registry.resolve([permission.as_str()]);
            assert_eq!(resolved, BTreeSet::from([permission.clone()]));
        }
    }

    #[test]
    fn test_all_wildcard_patterns_match_expand() {
        let registry = registry(SERVER_MANIFEST);
        for pattern in ["*", "*:*", "*:*:*", "*:*:*:*"] {
            assert_eq!(registry.resolve([pattern]), registry.expand(pattern));
        }
        assert_eq!(registry.resolve(["*"]).len(), registry.universe().len());
        assert_eq!(
            registry.expand("*:*:*"),
            keys(&["System:Role:Create", "System:Role:Delete", "Chat:Say:All"])
        );
        assert!(registry.expand("*:*:*:*").is_empty());
    }
}

// =============================================================================
// 3. Deny precedence
// =============================================================================

mod deny_precedence {
    use super::*;

    fn resolver_fixture() -> (PermissionUniverse, RoleTable) {
        let universe = universe(&["A:B", "A:C", "A:B:D"]);
        let mut roles = RoleTable::new();
        roles.insert("Grants", ["A:B"]).unwrap();
        roles.insert("Nested", ["@Grants"]).unwrap();
        (universe, roles)
    }

    #[test]
    fn test_deny_beats_wildcard_and_role() {
        let (universe, roles) = resolver_fixture();
        let resolver = RuleResolver::new(&universe, &roles);

        for rules in [
            vec!["A:*", "!A:B"],
            vec!["!A:B", "A:*"],
            vec!["A:*", "@Grants", "!A:B"],
            vec!["!A:B", "@Nested", "A:B"],
        ] {
            let resolved = resolver.resolve_raw(&rules);
            assert!(
                !resolved.contains(&PermissionKey::new("A:B")),
                "rules {:?} leaked A:B",
                rules
            );
        }
    }

    #[test]
    fn test_deny_pattern_is_prefix_filter() {
        let (universe, roles) = resolver_fixture();
        let resolver = RuleResolver::new(&universe, &roles);

        let resolved = resolver.resolve_raw(["*", "!A:B:*"]);
        assert_eq!(resolved, keys(&["A:B", "A:C"]));
    }

    #[test]
    fn test_order_independent() {
        let registry = registry(SERVER_MANIFEST);
        let forward = registry.resolve(["@Mod", "System:*", "!Chat:*"]);
        let reverse = registry.resolve(["!Chat:*", "System:*", "@Mod"]);
        assert_eq!(forward, reverse);
        assert!(forward.iter().all(|p| !p.normalized().starts_with("chat:")));
    }
}

// =============================================================================
// 4. Role inheritance
// =============================================================================

mod role_inheritance {
    use super::*;

    #[test]
    fn test_role_reference_equals_inline_rules() {
        let universe = universe(&["X:Y", "X:Z"]);
        let mut roles = RoleTable::new();
        roles.insert("R", ["X:Y"]).unwrap();
        let resolver = RuleResolver::new(&universe, &roles);

        assert_eq!(resolver.resolve_raw(["@R"]), resolver.resolve_raw(["X:Y"]));
    }

    #[test]
    fn test_role_names_case_insensitive() {
        let registry = registry(SERVER_MANIFEST);
        assert_eq!(registry.resolve(["@mod"]), registry.resolve(["@MOD"]));
        assert!(!registry.resolve(["@helper"]).is_empty());
    }

    #[test]
    fn test_cyclic_roles_load() {
        let registry = registry(
            r#"
[permission_sets]
All = ["A:One", "B:Two"]

[[roles]]
name = "A"
permissions = ["@B", "A:One"]

[[roles]]
name = "B"
permissions = ["@A", "B:Two"]

[[admins]]
name = "looper"
identity = 9
permissions = ["@A"]
"#,
        );

        assert_eq!(
            *registry.get(9).unwrap().permissions(),
            keys(&["A:One", "B:Two"])
        );
    }
}

// =============================================================================
// 5. Determinism
// =============================================================================

mod determinism {
    use super::*;

    #[test]
    fn test_resolution_is_idempotent() {
        let registry = registry(SERVER_MANIFEST);
        let rules = ["@Admin", "Chat:Gag", "!System:Slay"];
        assert_eq!(registry.resolve(rules), registry.resolve(rules));
    }

    #[test]
    fn test_reloading_manifest_gives_same_sets() {
        let first = registry(SERVER_MANIFEST);
        let second = registry(SERVER_MANIFEST);

        for (a, b) in first.admins().iter().zip(second.admins()) {
            assert_eq!(a.identity(), b.identity());
            assert_eq!(a.permissions(), b.permissions());
        }
    }

    #[test]
    fn test_duplicate_identity_first_match() {
        let registry = registry(
            r#"
[permission_sets]
All = ["A:One", "B:Two"]

[[admins]]
name = "first"
identity = 5
permissions = ["A:One"]

[[admins]]
name = "second"
identity = 5
permissions = ["*"]
"#,
        );

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(5).unwrap().name(), "first");
        assert!(!registry.has_permission(5, "B:Two"));
    }
}
