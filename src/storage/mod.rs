pub mod jsonl;

use crate::entity::{Grant, Node};
use crate::error::Result;
use crate::grants::GrantStore;
use crate::tree::TreeStore;

/// Backend for loading and saving the catalog snapshot.
pub trait StorageBackend: Send + Sync {
    /// Load all tree nodes from storage.
    fn load_nodes(&self) -> Result<Vec<Node>>;

    /// Load all grants from storage.
    fn load_grants(&self) -> Result<Vec<Grant>>;

    /// Replace stored nodes with the given set.
    fn save_nodes(&self, nodes: &[Node]) -> Result<()>;

    /// Replace stored grants with the given set.
    fn save_grants(&self, grants: &[Grant]) -> Result<()>;
}

/// Populate in-memory stores from a backend. Nodes that fail tree
/// invariants (duplicate path, malformed path) are skipped with a warning
/// rather than poisoning the whole load.
pub fn load_stores(backend: &dyn StorageBackend, root_prefix: &str) -> Result<(TreeStore, GrantStore)> {
    let tree = TreeStore::new(root_prefix);
    for node in backend.load_nodes()? {
        if let Err(e) = tree.load(node) {
            tracing::warn!("skipping stored node: {e}");
        }
    }
    let grants = GrantStore::new();
    for grant in backend.load_grants()? {
        grants.load(grant);
    }
    Ok((tree, grants))
}

/// Write both stores back to a backend.
pub fn save_stores(
    backend: &dyn StorageBackend,
    tree: &TreeStore,
    grants: &GrantStore,
) -> Result<()> {
    let mut nodes = tree.all_of(crate::entity::EntityKind::Category);
    nodes.extend(tree.all_of(crate::entity::EntityKind::Product));
    backend.save_nodes(&nodes)?;
    backend.save_grants(&grants.all())
}
