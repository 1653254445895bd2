use crate::entity::{slugify, EntityKind};
use crate::error::{Result, TreegateError};
use crate::tree::path;

use super::Workspace;

/// Create a category or product under a parent path.
pub fn add(ws: &Workspace, kind: EntityKind, id: &str, name: &str, parent: &str) -> Result<()> {
    let node = ws.tree.create(kind, id, name, parent)?;
    println!("created {} {} at {}", node.kind, node.id, node.path);
    ws.save()
}

/// Move a node (and its whole subtree) under a new parent category. The
/// subtree's paths are rewritten in one atomic batch; grants reference
/// entities by id and are untouched. Visibility under the new ancestors
/// is whatever the AND-chain says at read time.
pub fn mv(ws: &Workspace, kind: EntityKind, id: &str, new_parent: &str) -> Result<()> {
    let old_path = ws.tree.path_of(kind, id)?;
    ensure_parent_category(ws, kind, new_parent)?;

    let new_path = path::join(new_parent, path::last_segment(&old_path));
    let rewritten = ws.tree.rewrite_prefix(&old_path, &new_path)?;
    println!("moved {kind} {id}: {old_path} -> {new_path} ({rewritten} path(s) rewritten)");
    ws.save()
}

/// Rename a node. The path segment follows the new name, so every
/// descendant path is rewritten along with it.
pub fn rename(ws: &Workspace, kind: EntityKind, id: &str, new_name: &str) -> Result<()> {
    let old_path = ws.tree.path_of(kind, id)?;
    let parent = path::parent(&old_path).ok_or_else(|| TreegateError::InconsistentPrefix {
        path: old_path.clone(),
        reason: "node has no parent".to_string(),
    })?;
    let segment = slugify(new_name);
    if segment.is_empty() {
        eprintln!("treegate: name \"{new_name}\" slugifies to nothing");
        std::process::exit(1);
    }

    let new_path = path::join(parent, &segment);
    let rewritten = ws.tree.rewrite_prefix(&old_path, &new_path)?;
    ws.tree.set_name(kind, id, new_name)?;
    println!("renamed {kind} {id}: {old_path} -> {new_path} ({rewritten} path(s) rewritten)");
    ws.save()
}

/// Delete the node at a path together with its subtree, cascading to
/// every grant that referenced a removed entity.
pub fn rm(ws: &Workspace, target: &str) -> Result<()> {
    let removed = ws.tree.delete_subtree(target)?;
    let mut purged = 0;
    for node in &removed {
        purged += ws.grants.delete_for_entity(node.kind, &node.id);
    }
    println!("removed {} node(s), purged {purged} grant(s)", removed.len());
    ws.save()
}

/// List direct children of a path (default: the root prefix).
pub fn ls(ws: &Workspace, target: Option<&str>) -> Result<()> {
    let target = target.unwrap_or_else(|| ws.tree.root_prefix());
    if target != ws.tree.root_prefix() && ws.tree.node_at(target).is_none() {
        return Err(TreegateError::PathNotFound {
            path: target.to_string(),
        });
    }
    for node in ws.tree.children_of(target) {
        let grants = ws.grants.list_by_entity(node.kind, &node.id);
        println!("{}\t{}\t{}\t{} grant(s)", node.kind, node.id, node.path, grants.len());
    }
    Ok(())
}

fn ensure_parent_category(ws: &Workspace, kind: EntityKind, parent: &str) -> Result<()> {
    if parent == ws.tree.root_prefix() {
        if kind == EntityKind::Product {
            return Err(TreegateError::InconsistentPrefix {
                path: parent.to_string(),
                reason: "a product's parent must be a category, not the root prefix".to_string(),
            });
        }
        return Ok(());
    }
    match ws.tree.node_at(parent) {
        Some(node) if node.kind == EntityKind::Category => Ok(()),
        Some(node) => Err(TreegateError::ProductNotLeaf { path: node.path }),
        None => Err(TreegateError::PathNotFound {
            path: parent.to_string(),
        }),
    }
}
