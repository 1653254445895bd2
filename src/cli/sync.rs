use crate::access::propagate::Propagator;
use crate::error::Result;

use super::Workspace;

/// Re-materialize a category's grants onto its whole subtree, for every
/// principal granted at the source or just one with `--principal`.
pub fn run(ws: &Workspace, category_id: &str, principal: Option<&str>) -> Result<()> {
    let report = Propagator::new(&ws.tree, &ws.grants).sync_to_descendants(category_id, principal)?;
    println!(
        "synced {} principal(s) to {} descendant(s): {} created, {} already present",
        report.principals, report.descendants, report.created, report.skipped
    );
    ws.save()
}
