use crate::access::propagate::Propagator;
use crate::access::AccessEngine;
use crate::entity::EntityKind;
use crate::error::Result;

use super::Workspace;

/// Grant an entity to a principal. With `recursive`, also materialize the
/// grant onto every descendant (categories only).
pub fn run(
    ws: &Workspace,
    kind: EntityKind,
    entity_id: &str,
    principal: &str,
    recursive: bool,
) -> Result<()> {
    if recursive && kind != EntityKind::Category {
        eprintln!("treegate: --recursive only applies to category grants");
        std::process::exit(1);
    }

    let engine = AccessEngine::new(&ws.tree, &ws.grants, &ws.groups);
    let grant = engine.grant(kind, entity_id, principal)?;
    println!("granted {kind} {entity_id} to {principal} (grant {})", grant.id);

    if recursive {
        let report = Propagator::new(&ws.tree, &ws.grants)
            .sync_to_descendants(entity_id, Some(principal))?;
        println!(
            "propagated to {} descendant(s): {} created, {} already present",
            report.descendants, report.created, report.skipped
        );
    }

    ws.save()
}

/// Revoke a grant. Never fans out: descendants lose inherited access
/// through the ancestor chain at read time.
pub fn revoke(ws: &Workspace, kind: EntityKind, entity_id: &str, principal: &str) -> Result<()> {
    let engine = AccessEngine::new(&ws.tree, &ws.grants, &ws.groups);
    if engine.revoke(kind, entity_id, principal)? {
        println!("revoked {kind} {entity_id} from {principal}");
    } else {
        println!("no grant on {kind} {entity_id} for {principal}");
    }
    ws.save()
}
