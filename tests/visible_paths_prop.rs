//! The two visibility computations must always agree: the per-entity
//! ancestor walk and the one-pass visible-path set, over random trees and
//! random grant subsets.

use proptest::prelude::*;

use treegate::access::AccessEngine;
use treegate::config::GroupsConfig;
use treegate::entity::EntityKind;
use treegate::grants::GrantStore;
use treegate::tree::{path, TreeStore};

const PRINCIPALS: [&str; 3] = ["u", "grp", "other"];

/// Build a random catalog: categories wired to earlier categories (or the
/// root), products hung off random categories, grants dealt from a bitmask
/// per node (bit i = grant for PRINCIPALS[i]). The parent draw for a
/// product includes the root prefix itself; the store must reject that
/// placement, and the rejected product is left out of the catalog.
fn build(
    cats: &[(usize, u8)],
    prods: &[(usize, u8)],
) -> (TreeStore, GrantStore, Vec<String>, Vec<String>) {
    let tree = TreeStore::new("/categories");
    let grants = GrantStore::new();
    let mut cat_paths: Vec<String> = Vec::with_capacity(cats.len());

    for (i, (parent_choice, mask)) in cats.iter().enumerate() {
        let parent = if i == 0 {
            "/categories".to_string()
        } else {
            cat_paths[parent_choice % i].clone()
        };
        let id = format!("c{i}");
        let node = tree
            .create(EntityKind::Category, &id, &format!("C{i}"), &parent)
            .unwrap();
        cat_paths.push(node.path);
        for (bit, principal) in PRINCIPALS.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                grants.create(EntityKind::Category, &id, principal);
            }
        }
    }

    let mut prod_ids = Vec::with_capacity(prods.len());
    for (i, (cat_choice, mask)) in prods.iter().enumerate() {
        let slot = cat_choice % (cat_paths.len() + 1);
        let parent = if slot == cat_paths.len() {
            "/categories".to_string()
        } else {
            cat_paths[slot].clone()
        };
        let id = format!("p{i}");
        match tree.create(EntityKind::Product, &id, &format!("P{i}"), &parent) {
            Ok(_) => assert_ne!(slot, cat_paths.len(), "product accepted at the root prefix"),
            Err(_) => {
                assert_eq!(slot, cat_paths.len(), "product rejected under a category");
                continue;
            }
        }
        for (bit, principal) in PRINCIPALS.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                grants.create(EntityKind::Product, &id, principal);
            }
        }
        prod_ids.push(id);
    }

    let cat_ids = (0..cats.len()).map(|i| format!("c{i}")).collect();
    (tree, grants, cat_ids, prod_ids)
}

proptest! {
    #[test]
    fn ancestor_walk_agrees_with_one_pass_set(
        cats in prop::collection::vec((0usize..8, 0u8..8), 1..10),
        prods in prop::collection::vec((0usize..8, 0u8..8), 0..8),
    ) {
        let (tree, grants, cat_ids, prod_ids) = build(&cats, &prods);
        // "u" belongs to "grp"; "other" is unrelated.
        let groups = GroupsConfig::from_members(&[("grp", &["u"])]);
        let engine = AccessEngine::new(&tree, &grants, &groups);

        for principal in ["u", "other"] {
            let visible = engine.visible_paths(principal);

            for id in &cat_ids {
                let p = tree.path_of(EntityKind::Category, id).unwrap();
                prop_assert_eq!(
                    engine.is_visible(principal, EntityKind::Category, id),
                    visible.contains(&p),
                    "category {} path {} principal {}", id, p, principal
                );
            }

            for id in &prod_ids {
                let p = tree.path_of(EntityKind::Product, id).unwrap();
                let parent = path::parent(&p).unwrap().to_string();
                let direct = grants.get(EntityKind::Product, id, principal).is_some()
                    || (principal == "u"
                        && grants.get(EntityKind::Product, id, "grp").is_some());
                prop_assert_eq!(
                    engine.is_visible(principal, EntityKind::Product, id),
                    direct && visible.contains(&parent),
                    "product {} path {} principal {}", id, p, principal
                );
            }
        }
    }

    #[test]
    fn propagation_then_walk_shows_the_whole_subtree(
        cats in prop::collection::vec((0usize..6, 0u8..8), 2..8),
    ) {
        let (tree, grants, _, _) = build(&cats, &[]);
        let groups = GroupsConfig::from_members(&[]);

        // Grant the root-most category to "u" and sync everything under it.
        grants.create(EntityKind::Category, "c0", "u");
        treegate::access::propagate::Propagator::new(&tree, &grants)
            .sync_to_descendants("c0", Some("u"))
            .unwrap();

        let engine = AccessEngine::new(&tree, &grants, &groups);
        let root_path = tree.path_of(EntityKind::Category, "c0").unwrap();
        for node in tree.descendants_of(&root_path) {
            prop_assert!(
                engine.is_visible("u", node.kind, &node.id),
                "descendant {} invisible after propagation", node.path
            );
        }
    }
}
