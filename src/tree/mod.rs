pub mod path;

use std::collections::HashMap;
use std::sync::RwLock;

use crate::entity::{slugify, EntityKind, Node};
use crate::error::{Result, TreegateError};

#[derive(Default)]
struct Inner {
    /// Nodes keyed by (kind, id). Ids are unique within a kind.
    nodes: HashMap<(EntityKind, String), Node>,
    /// Path index. Paths are unique across both kinds: products live in
    /// the same namespace as their sibling categories.
    by_path: HashMap<String, (EntityKind, String)>,
}

/// In-memory store for the category/product tree. Pure tree storage plus
/// path-rewrite operations; no access logic.
///
/// `rewrite_prefix` and `delete_subtree` mutate the whole affected subtree
/// under one write guard: a concurrent reader observes either the fully-old
/// or fully-new state, never a mix. Validation runs before any mutation so
/// a failed call leaves the store untouched.
pub struct TreeStore {
    root_prefix: String,
    inner: RwLock<Inner>,
}

impl TreeStore {
    pub fn new(root_prefix: &str) -> Self {
        Self {
            root_prefix: root_prefix.to_string(),
            inner: RwLock::new(Inner::default()),
        }
    }

    /// The fixed prefix all paths live under (e.g. `/categories`). The
    /// root itself is not a node and never bears grants.
    pub fn root_prefix(&self) -> &str {
        &self.root_prefix
    }

    /// Create a node under `parent_path`. The path segment is derived from
    /// the name. Enforces: parent exists (or is the root prefix, for
    /// categories only), parent is a category, sibling segments unique,
    /// id unique within kind.
    pub fn create(
        &self,
        kind: EntityKind,
        id: &str,
        name: &str,
        parent_path: &str,
    ) -> Result<Node> {
        let segment = slugify(name);
        if segment.is_empty() {
            return Err(TreegateError::InconsistentPrefix {
                path: parent_path.to_string(),
                reason: format!("name \"{name}\" slugifies to nothing"),
            });
        }
        let node_path = path::join(parent_path, &segment);
        path::validate(&node_path)?;
        if !path::is_same_or_descendant(parent_path, &self.root_prefix) {
            return Err(TreegateError::InconsistentPrefix {
                path: parent_path.to_string(),
                reason: format!("outside root prefix {}", self.root_prefix),
            });
        }

        if kind == EntityKind::Product && parent_path == self.root_prefix {
            return Err(TreegateError::InconsistentPrefix {
                path: node_path,
                reason: "a product's parent must be a category, not the root prefix".to_string(),
            });
        }

        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if parent_path != self.root_prefix {
            match inner.by_path.get(parent_path) {
                None => {
                    return Err(TreegateError::PathNotFound {
                        path: parent_path.to_string(),
                    })
                }
                Some((EntityKind::Product, _)) => {
                    return Err(TreegateError::ProductNotLeaf {
                        path: parent_path.to_string(),
                    })
                }
                Some((EntityKind::Category, _)) => {}
            }
        }
        if inner.by_path.contains_key(&node_path) {
            return Err(TreegateError::DuplicateSegment { path: node_path });
        }
        let key = (kind, id.to_string());
        if inner.nodes.contains_key(&key) {
            return Err(TreegateError::Storage {
                reason: format!("{kind} id already exists: {id}"),
            });
        }

        let node = Node {
            id: id.to_string(),
            kind,
            name: name.to_string(),
            path: node_path.clone(),
        };
        inner.by_path.insert(node_path, key.clone());
        inner.nodes.insert(key, node.clone());
        Ok(node)
    }

    /// Load a node verbatim (used when restoring a snapshot from storage).
    /// Skips derivation and parent checks but still rejects path clashes.
    pub fn load(&self, node: Node) -> Result<()> {
        path::validate(&node.path)?;
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if inner.by_path.contains_key(&node.path) {
            return Err(TreegateError::DuplicateSegment {
                path: node.path.clone(),
            });
        }
        let key = (node.kind, node.id.clone());
        inner.by_path.insert(node.path.clone(), key.clone());
        inner.nodes.insert(key, node);
        Ok(())
    }

    pub fn get(&self, kind: EntityKind, id: &str) -> Option<Node> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.nodes.get(&(kind, id.to_string())).cloned()
    }

    /// Resolve an entity's path, or `NotFound`.
    pub fn path_of(&self, kind: EntityKind, id: &str) -> Result<String> {
        self.get(kind, id)
            .map(|n| n.path)
            .ok_or_else(|| TreegateError::NotFound {
                kind: kind.to_string(),
                id: id.to_string(),
            })
    }

    pub fn node_at(&self, path: &str) -> Option<Node> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let key = inner.by_path.get(path)?;
        inner.nodes.get(key).cloned()
    }

    /// Direct children of `path`, one segment deeper, both kinds.
    pub fn children_of(&self, path: &str) -> Vec<Node> {
        let want_depth = path::depth(path) + 1;
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let mut out: Vec<Node> = inner
            .nodes
            .values()
            .filter(|n| path::is_strict_descendant(&n.path, path) && path::depth(&n.path) == want_depth)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.path.cmp(&b.path));
        out
    }

    /// Every node strictly below `path`, shallowest first.
    pub fn descendants_of(&self, path: &str) -> Vec<Node> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let mut out: Vec<Node> = inner
            .nodes
            .values()
            .filter(|n| path::is_strict_descendant(&n.path, path))
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            path::depth(&a.path)
                .cmp(&path::depth(&b.path))
                .then_with(|| a.path.cmp(&b.path))
        });
        out
    }

    /// The category nodes from just below the root down to (but excluding)
    /// the node at `path`, shallowest first. Errors if a link is missing.
    pub fn ancestor_chain(&self, path: &str) -> Result<Vec<Node>> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let mut chain = Vec::new();
        for ancestor_path in path::ancestors_below_root(path, &self.root_prefix) {
            let key = inner
                .by_path
                .get(ancestor_path)
                .ok_or_else(|| TreegateError::PathNotFound {
                    path: ancestor_path.to_string(),
                })?;
            let node = inner.nodes.get(key).cloned().ok_or_else(|| {
                TreegateError::PathNotFound {
                    path: ancestor_path.to_string(),
                }
            })?;
            chain.push(node);
        }
        Ok(chain)
    }

    /// All nodes of one kind, path-sorted.
    pub fn all_of(&self, kind: EntityKind) -> Vec<Node> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let mut out: Vec<Node> = inner
            .nodes
            .values()
            .filter(|n| n.kind == kind)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.path.cmp(&b.path));
        out
    }

    /// Rewrite `old_prefix` to `new_prefix` on every node under it, on
    /// segment boundaries, across both kinds, as one atomic batch.
    /// Returns the number of nodes rewritten.
    pub fn rewrite_prefix(&self, old_prefix: &str, new_prefix: &str) -> Result<usize> {
        path::validate(old_prefix)?;
        path::validate(new_prefix)?;
        if old_prefix == new_prefix {
            return Ok(0);
        }
        if path::is_strict_descendant(new_prefix, old_prefix) {
            return Err(TreegateError::InconsistentPrefix {
                path: new_prefix.to_string(),
                reason: format!("target lies inside source {old_prefix}"),
            });
        }

        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());

        // Validate the whole batch before touching anything.
        let mut moves: Vec<(String, String, (EntityKind, String))> = Vec::new();
        for (p, key) in inner.by_path.iter() {
            if let Some(new_path) = path::rewrite_prefix(p, old_prefix, new_prefix) {
                moves.push((p.clone(), new_path, key.clone()));
            }
        }
        for (_, new_path, _) in &moves {
            if let Some(occupant) = inner.by_path.get(new_path) {
                // Occupied is fine only if the occupant is itself moving.
                let occupant_moving = moves.iter().any(|(old, _, key)| old == new_path && key == occupant);
                if !occupant_moving {
                    return Err(TreegateError::DuplicateSegment {
                        path: new_path.clone(),
                    });
                }
            }
        }

        for (old_path, _, _) in &moves {
            inner.by_path.remove(old_path);
        }
        for (_, new_path, key) in &moves {
            inner.by_path.insert(new_path.clone(), key.clone());
            if let Some(node) = inner.nodes.get_mut(key) {
                node.path = new_path.clone();
            }
        }
        Ok(moves.len())
    }

    /// Update a node's display name. Path rewriting is the caller's job
    /// (renames go through `rewrite_prefix` so descendants follow).
    pub fn set_name(&self, kind: EntityKind, id: &str, name: &str) -> Result<()> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let node = inner
            .nodes
            .get_mut(&(kind, id.to_string()))
            .ok_or_else(|| TreegateError::NotFound {
                kind: kind.to_string(),
                id: id.to_string(),
            })?;
        node.name = name.to_string();
        Ok(())
    }

    /// Remove the node at `path` and everything strictly below it, as one
    /// atomic batch. Returns the removed nodes so the caller can purge the
    /// grants that referenced them.
    pub fn delete_subtree(&self, path: &str) -> Result<Vec<Node>> {
        path::validate(path)?;
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if !inner.by_path.contains_key(path) {
            return Err(TreegateError::PathNotFound {
                path: path.to_string(),
            });
        }

        let doomed: Vec<String> = inner
            .by_path
            .keys()
            .filter(|p| path::is_same_or_descendant(p, path))
            .cloned()
            .collect();
        let mut removed = Vec::with_capacity(doomed.len());
        for p in doomed {
            if let Some(key) = inner.by_path.remove(&p) {
                if let Some(node) = inner.nodes.remove(&key) {
                    removed.push(node);
                }
            }
        }
        removed.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(removed)
    }
}
