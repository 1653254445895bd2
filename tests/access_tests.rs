//! Effective-visibility scenarios: AND down the ancestor chain, OR across
//! the principal's id set, no runtime inheritance.

use treegate::access::AccessEngine;
use treegate::config::GroupsConfig;
use treegate::entity::EntityKind;
use treegate::grants::GrantStore;
use treegate::tree::TreeStore;
use treegate::TreegateError;

fn catalog() -> (TreeStore, GrantStore, GroupsConfig) {
    let tree = TreeStore::new("/categories");
    tree.create(EntityKind::Category, "c-photo", "Photo", "/categories")
        .unwrap();
    tree.create(EntityKind::Category, "c-cameras", "Cameras", "/categories/photo")
        .unwrap();
    tree.create(
        EntityKind::Product,
        "p-canon",
        "Canon 1",
        "/categories/photo/cameras",
    )
    .unwrap();
    let groups = GroupsConfig::from_members(&[("g", &["member"])]);
    (tree, GrantStore::new(), groups)
}

// ---------------------------------------------------------------------------
// The canonical revoke-at-the-top scenario
// ---------------------------------------------------------------------------

#[test]
fn revoking_parent_blocks_product_without_touching_lower_grants() {
    let (tree, grants, groups) = catalog();
    grants.create(EntityKind::Category, "c-photo", "g");
    grants.create(EntityKind::Category, "c-cameras", "g");
    grants.create(EntityKind::Product, "p-canon", "g");

    let engine = AccessEngine::new(&tree, &grants, &groups);
    assert!(engine.is_visible("member", EntityKind::Product, "p-canon"));

    engine.revoke(EntityKind::Category, "c-photo", "g").unwrap();

    assert!(!engine.is_visible("member", EntityKind::Product, "p-canon"));
    assert!(!engine.is_visible("member", EntityKind::Category, "c-cameras"));
    // The grants on cameras and canon-1 are untouched.
    assert!(grants.get(EntityKind::Category, "c-cameras", "g").is_some());
    assert!(grants.get(EntityKind::Product, "p-canon", "g").is_some());
}

#[test]
fn independent_direct_grants_survive_a_parent_revoke_for_other_principals() {
    let (tree, grants, groups) = catalog();
    // Group g gets the full chain; "solo" holds independent grants on the
    // same chain.
    for principal in ["g", "solo"] {
        grants.create(EntityKind::Category, "c-photo", principal);
        grants.create(EntityKind::Category, "c-cameras", principal);
        grants.create(EntityKind::Product, "p-canon", principal);
    }

    let engine = AccessEngine::new(&tree, &grants, &groups);
    engine.revoke(EntityKind::Category, "c-photo", "g").unwrap();

    assert!(!engine.is_visible("member", EntityKind::Product, "p-canon"));
    assert!(engine.is_visible("solo", EntityKind::Product, "p-canon"));
}

// ---------------------------------------------------------------------------
// No inheritance in either direction
// ---------------------------------------------------------------------------

#[test]
fn ungranted_category_is_invisible_even_with_all_ancestors_granted() {
    let (tree, grants, groups) = catalog();
    grants.create(EntityKind::Category, "c-photo", "g");
    // c-cameras itself has no grant.
    let engine = AccessEngine::new(&tree, &grants, &groups);
    assert!(!engine.is_visible("member", EntityKind::Category, "c-cameras"));
}

#[test]
fn product_grant_alone_is_not_enough() {
    let (tree, grants, groups) = catalog();
    grants.create(EntityKind::Product, "p-canon", "g");
    let engine = AccessEngine::new(&tree, &grants, &groups);
    assert!(!engine.is_visible("member", EntityKind::Product, "p-canon"));
}

// ---------------------------------------------------------------------------
// Write-time guard mirrors the read-time rule
// ---------------------------------------------------------------------------

#[test]
fn grant_names_the_blocking_ancestor() {
    let (tree, grants, groups) = catalog();
    grants.create(EntityKind::Category, "c-photo", "g");
    let engine = AccessEngine::new(&tree, &grants, &groups);

    // cameras is granted, photo is granted, product grant goes through.
    grants.create(EntityKind::Category, "c-cameras", "g");
    engine.grant(EntityKind::Product, "p-canon", "g").unwrap();

    // A principal with no chain is blocked at the shallowest gap.
    let err = engine
        .grant(EntityKind::Product, "p-canon", "outsider")
        .unwrap_err();
    match err {
        TreegateError::ParentBlocked { ancestor, principal } => {
            assert_eq!(ancestor, "Photo");
            assert_eq!(principal, "outsider");
        }
        other => panic!("expected ParentBlocked, got {other}"),
    }
}

#[test]
fn grant_on_unknown_entity_is_a_hard_error() {
    let (tree, grants, groups) = catalog();
    let engine = AccessEngine::new(&tree, &grants, &groups);
    let err = engine
        .grant(EntityKind::Product, "p-ghost", "g")
        .unwrap_err();
    assert!(matches!(err, TreegateError::NotFound { .. }));
}

#[test]
fn read_of_unknown_entity_is_just_not_visible() {
    let (tree, grants, groups) = catalog();
    let engine = AccessEngine::new(&tree, &grants, &groups);
    assert!(!engine.is_visible("member", EntityKind::Category, "c-ghost"));
}

// ---------------------------------------------------------------------------
// Group membership is the OR side of the rule
// ---------------------------------------------------------------------------

#[test]
fn chain_links_may_come_from_different_principal_ids() {
    let (tree, grants, groups) = catalog();
    grants.create(EntityKind::Category, "c-photo", "g");
    grants.create(EntityKind::Category, "c-cameras", "member");
    grants.create(EntityKind::Product, "p-canon", "g");

    let engine = AccessEngine::new(&tree, &grants, &groups);
    // photo via group, cameras via the user's own id, product via group.
    assert!(engine.is_visible("member", EntityKind::Product, "p-canon"));
    // Another member of g lacks the cameras link.
    assert!(!engine.is_visible("g", EntityKind::Product, "p-canon"));
}
