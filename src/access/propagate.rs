//! Explicit push-down of grants onto a subtree.
//!
//! Access is an AND-chain with no runtime inheritance, so granting a
//! parent category exposes nothing below it. Propagation materializes the
//! source category's grants onto every descendant so the subtree "looks
//! like" inherited access without changing the composition rule.
//!
//! The reverse direction never fans out: revoking a parent already blocks
//! every descendant through the AND-chain at read time.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::entity::EntityKind;
use crate::error::{Result, TreegateError};
use crate::grants::GrantStore;
use crate::tree::{path, TreeStore};

/// What a propagation run did.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    /// Descendant nodes covered by the run.
    pub descendants: usize,
    /// Principals holding a grant on the source category.
    pub principals: usize,
    /// Grants newly created.
    pub created: usize,
    /// Grants that already existed (the run is idempotent).
    pub skipped: usize,
}

/// Bulk-materializes grants from one category onto its descendants.
pub struct Propagator<'a> {
    tree: &'a TreeStore,
    grants: &'a GrantStore,
}

impl<'a> Propagator<'a> {
    pub fn new(tree: &'a TreeStore, grants: &'a GrantStore) -> Self {
        Self { tree, grants }
    }

    /// For each principal granted on the source category (or only
    /// `principal_filter` when given), create a matching grant on every
    /// descendant category and product. Additive and idempotent: existing
    /// grants are skipped, sibling subtrees are untouched, and nothing is
    /// ever revoked.
    ///
    /// The whole fan-out commits as one batch. Every descendant is
    /// validated before the first insert; a bad descendant aborts the run
    /// with `PropagationFailed` naming it, leaving the grant set as it
    /// was.
    pub fn sync_to_descendants(
        &self,
        category_id: &str,
        principal_filter: Option<&str>,
    ) -> Result<SyncReport> {
        let source_path = self.tree.path_of(EntityKind::Category, category_id)?;

        let principals: BTreeSet<String> = self
            .grants
            .list_by_entity(EntityKind::Category, category_id)
            .into_iter()
            .map(|g| g.key.principal_id)
            .filter(|p| principal_filter.map_or(true, |f| f == p))
            .collect();

        let descendants = self.tree.descendants_of(&source_path);

        // Validate the whole batch up front; the store commits it under a
        // single write guard, so a reader sees none or all of it.
        for node in &descendants {
            path::validate(&node.path).map_err(|e| TreegateError::PropagationFailed {
                path: node.path.clone(),
                reason: e.to_string(),
            })?;
        }

        let mut batch = Vec::with_capacity(descendants.len() * principals.len());
        for node in &descendants {
            for principal in &principals {
                batch.push((node.kind, node.id.clone(), principal.clone()));
            }
        }
        let (created, skipped) = self.grants.insert_batch(&batch);

        tracing::info!(
            source = %source_path,
            descendants = descendants.len(),
            principals = principals.len(),
            created,
            skipped,
            "propagated grants to descendants"
        );
        Ok(SyncReport {
            descendants: descendants.len(),
            principals: principals.len(),
            created,
            skipped,
        })
    }
}
