use crate::error::Result;
use crate::search::search;

use super::Workspace;

pub fn run(
    ws: &Workspace,
    principal: &str,
    query: &str,
    page: usize,
    page_size: Option<usize>,
    json: bool,
) -> Result<()> {
    let page_size = page_size.unwrap_or(ws.config.default_page_size).max(1);
    let result = search(&ws.tree, &ws.grants, &ws.groups, principal, query, page, page_size);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    for item in &result.items {
        println!("{}\t{}\t{}", item.kind, item.name, item.path);
    }
    println!(
        "page {}/{} ({} result(s){})",
        result.page,
        result.total.div_ceil(result.page_size).max(1),
        result.total,
        if result.has_more { ", more available" } else { "" }
    );
    Ok(())
}
