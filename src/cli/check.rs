use crate::access::AccessEngine;
use crate::entity::EntityKind;
use crate::error::Result;

use super::Workspace;

/// Print the effective-access decision for one entity. Exit code 0 when
/// visible, 2 when not, so scripts can branch on it.
pub fn run(ws: &Workspace, principal: &str, kind: EntityKind, entity_id: &str) -> Result<()> {
    let engine = AccessEngine::new(&ws.tree, &ws.grants, &ws.groups);
    if engine.is_visible(principal, kind, entity_id) {
        println!("visible");
        Ok(())
    } else {
        println!("not visible");
        std::process::exit(2);
    }
}

/// Print every category path visible to the principal, one per line.
pub fn paths(ws: &Workspace, principal: &str) -> Result<()> {
    let engine = AccessEngine::new(&ws.tree, &ws.grants, &ws.groups);
    for path in engine.visible_paths(principal) {
        println!("{path}");
    }
    Ok(())
}
