pub mod propagate;
pub mod visible;

use std::collections::BTreeSet;

use crate::entity::{EntityKind, Grant};
use crate::error::{Result, TreegateError};
use crate::grants::GrantStore;
use crate::principals::{principal_id_set, PrincipalDirectory};
use crate::tree::TreeStore;

/// Computes effective visibility: a grant must reach the principal (OR
/// across the principal's own id and its groups) on the entity itself AND
/// on every category ancestor. There is no inheritance shortcut: a grant
/// on a parent does not cover the child, which is why propagation exists
/// as an explicit materialization step.
///
/// Stateless between calls: every decision recomputes from current
/// storage, so no cached decision can go stale.
pub struct AccessEngine<'a> {
    tree: &'a TreeStore,
    grants: &'a GrantStore,
    directory: &'a dyn PrincipalDirectory,
}

impl<'a> AccessEngine<'a> {
    pub fn new(
        tree: &'a TreeStore,
        grants: &'a GrantStore,
        directory: &'a dyn PrincipalDirectory,
    ) -> Self {
        Self {
            tree,
            grants,
            directory,
        }
    }

    /// Any grant on the entity reaching one of `principal_ids`.
    pub(crate) fn directly_allowed(
        &self,
        kind: EntityKind,
        entity_id: &str,
        principal_ids: &BTreeSet<String>,
    ) -> bool {
        self.grants
            .list_by_entity(kind, entity_id)
            .iter()
            .any(|g| principal_ids.contains(&g.key.principal_id))
    }

    /// The boolean effective-access decision. Unknown entities are simply
    /// not visible; reads never fail on missing ids, so callers can
    /// filter uniformly.
    pub fn is_visible(&self, principal_id: &str, kind: EntityKind, entity_id: &str) -> bool {
        let ids = principal_id_set(self.directory, principal_id);

        let path = match self.tree.path_of(kind, entity_id) {
            Ok(p) => p,
            Err(_) => return false,
        };
        if !self.directly_allowed(kind, entity_id, &ids) {
            tracing::debug!(principal = principal_id, %kind, entity_id, "no direct grant");
            return false;
        }

        let chain = match self.tree.ancestor_chain(&path) {
            Ok(c) => c,
            Err(_) => return false,
        };
        for ancestor in &chain {
            if !self.directly_allowed(EntityKind::Category, &ancestor.id, &ids) {
                tracing::debug!(
                    principal = principal_id,
                    %kind,
                    entity_id,
                    blocked_at = %ancestor.path,
                    "ancestor chain broken"
                );
                return false;
            }
        }
        true
    }

    /// The full set of category paths visible to the principal, computed
    /// in one pass. See [`visible::visible_paths`].
    pub fn visible_paths(&self, principal_id: &str) -> BTreeSet<String> {
        visible::visible_paths(self.tree, self.grants, self.directory, principal_id)
    }

    /// Create a grant, enforcing the write-time mirror of the read-time
    /// rule: every existing category ancestor must already be granted to
    /// the principal, otherwise the new grant would be unreachable and the
    /// call fails with `ParentBlocked` naming the offending ancestor.
    /// Re-creating an identical grant is a no-op success.
    pub fn grant(&self, kind: EntityKind, entity_id: &str, principal_id: &str) -> Result<Grant> {
        let path = self.tree.path_of(kind, entity_id)?;
        let ids = principal_id_set(self.directory, principal_id);

        for ancestor in self.tree.ancestor_chain(&path)? {
            if !self.directly_allowed(EntityKind::Category, &ancestor.id, &ids) {
                return Err(TreegateError::ParentBlocked {
                    ancestor: ancestor.name,
                    principal: principal_id.to_string(),
                });
            }
        }

        let grant = self.grants.create(kind, entity_id, principal_id);
        tracing::info!(%kind, entity_id, principal = principal_id, grant_id = grant.id, "grant created");
        Ok(grant)
    }

    /// Revoke a grant. Never fans out: the ancestor AND-chain already
    /// blocks every descendant at read time, so a parent revoke needs no
    /// explicit descendant deletes. Missing entity is a hard error for
    /// writes.
    pub fn revoke(&self, kind: EntityKind, entity_id: &str, principal_id: &str) -> Result<bool> {
        self.tree.path_of(kind, entity_id)?;
        let removed = self.grants.delete_by_key(kind, entity_id, principal_id);
        if removed {
            tracing::info!(%kind, entity_id, principal = principal_id, "grant revoked");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::principals::testutil::StaticDirectory;

    fn fixture() -> (TreeStore, GrantStore, StaticDirectory) {
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
        let grants = GrantStore::new();
        let dir = StaticDirectory::new(&[("g", &["user"])]);
        (tree, grants, dir)
    }

    #[test]
    fn product_needs_full_chain() {
        let (tree, grants, dir) = fixture();
        grants.create(EntityKind::Category, "c-photo", "g");
        grants.create(EntityKind::Category, "c-cameras", "g");
        grants.create(EntityKind::Product, "p-canon", "g");

        let engine = AccessEngine::new(&tree, &grants, &dir);
        assert!(engine.is_visible("user", EntityKind::Product, "p-canon"));

        // Revoking the top of the chain blocks the product with no change
        // to the grants on cameras or canon-1.
        grants.delete_by_key(EntityKind::Category, "c-photo", "g");
        assert!(!engine.is_visible("user", EntityKind::Product, "p-canon"));
        assert!(grants.get(EntityKind::Product, "p-canon", "g").is_some());
    }

    #[test]
    fn grant_on_parent_does_not_cover_child() {
        let (tree, grants, dir) = fixture();
        grants.create(EntityKind::Category, "c-photo", "g");

        let engine = AccessEngine::new(&tree, &grants, &dir);
        assert!(engine.is_visible("user", EntityKind::Category, "c-photo"));
        assert!(!engine.is_visible("user", EntityKind::Category, "c-cameras"));
    }

    #[test]
    fn unknown_entity_is_not_visible_not_an_error() {
        let (tree, grants, dir) = fixture();
        let engine = AccessEngine::new(&tree, &grants, &dir);
        assert!(!engine.is_visible("user", EntityKind::Product, "p-ghost"));
    }

    #[test]
    fn grant_under_ungranted_ancestor_is_parent_blocked() {
        let (tree, grants, dir) = fixture();
        let engine = AccessEngine::new(&tree, &grants, &dir);

        let err = engine
            .grant(EntityKind::Product, "p-canon", "g")
            .unwrap_err();
        match err {
            TreegateError::ParentBlocked { ancestor, .. } => assert_eq!(ancestor, "Photo"),
            other => panic!("expected ParentBlocked, got {other}"),
        }

        // After granting the chain top-down, the same call succeeds.
        engine.grant(EntityKind::Category, "c-photo", "g").unwrap();
        engine.grant(EntityKind::Category, "c-cameras", "g").unwrap();
        engine.grant(EntityKind::Product, "p-canon", "g").unwrap();
        assert!(engine.is_visible("user", EntityKind::Product, "p-canon"));
    }

    #[test]
    fn group_grant_reaches_member_not_stranger() {
        let (tree, grants, dir) = fixture();
        grants.create(EntityKind::Category, "c-photo", "g");
        let engine = AccessEngine::new(&tree, &grants, &dir);
        assert!(engine.is_visible("user", EntityKind::Category, "c-photo"));
        assert!(!engine.is_visible("stranger", EntityKind::Category, "c-photo"));
    }

    #[test]
    fn user_grant_under_group_granted_ancestor_is_not_blocked() {
        let (tree, grants, dir) = fixture();
        grants.create(EntityKind::Category, "c-photo", "g");
        let engine = AccessEngine::new(&tree, &grants, &dir);
        // "user" is in g, so the ancestor check passes via the group.
        engine
            .grant(EntityKind::Category, "c-cameras", "user")
            .unwrap();
    }
}
