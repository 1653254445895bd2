//! Keyword search across permitted catalog entries.
//!
//! The only consumer-facing read path besides `is_visible`: one
//! `visible_paths` computation gates everything, then name matching and
//! pagination are plain in-memory work.

use serde::Serialize;

use crate::access::AccessEngine;
use crate::entity::{EntityKind, Node};
use crate::grants::GrantStore;
use crate::principals::{principal_id_set, PrincipalDirectory};
use crate::tree::{path, TreeStore};

/// One search hit.
#[derive(Debug, Clone, Serialize)]
pub struct SearchItem {
    pub kind: EntityKind,
    pub id: String,
    pub name: String,
    pub path: String,
}

impl From<Node> for SearchItem {
    fn from(n: Node) -> Self {
        Self {
            kind: n.kind,
            id: n.id,
            name: n.name,
            path: n.path,
        }
    }
}

/// One page of ranked results. Categories sort before products; each
/// group is name-ordered.
#[derive(Debug, Clone, Serialize)]
pub struct SearchPage {
    pub items: Vec<SearchItem>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub has_more: bool,
}

impl SearchPage {
    fn empty(page: usize, page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page,
            page_size,
            has_more: false,
        }
    }
}

/// Search the catalog as `principal_id` sees it. `query` matches names
/// case-insensitively as a substring; an empty query is browse mode and
/// returns every visible item. `page` is 1-based.
pub fn search(
    tree: &TreeStore,
    grants: &GrantStore,
    directory: &dyn PrincipalDirectory,
    principal_id: &str,
    query: &str,
    page: usize,
    page_size: usize,
) -> SearchPage {
    let page = page.max(1);
    let engine = AccessEngine::new(tree, grants, directory);
    let visible = engine.visible_paths(principal_id);
    if visible.is_empty() {
        return SearchPage::empty(page, page_size);
    }

    let needle = query.to_lowercase();
    let matches = |name: &str| needle.is_empty() || name.to_lowercase().contains(&needle);

    let mut categories: Vec<SearchItem> = tree
        .all_of(EntityKind::Category)
        .into_iter()
        .filter(|n| visible.contains(&n.path) && matches(&n.name))
        .map(SearchItem::from)
        .collect();
    categories.sort_by(|a, b| a.name.cmp(&b.name));

    let ids = principal_id_set(directory, principal_id);
    let mut products: Vec<SearchItem> = tree
        .all_of(EntityKind::Product)
        .into_iter()
        .filter(|n| {
            // Direct grant on the product, enclosing category visible.
            path::parent(&n.path).is_some_and(|parent| visible.contains(parent))
                && engine.directly_allowed(EntityKind::Product, &n.id, &ids)
                && matches(&n.name)
        })
        .map(SearchItem::from)
        .collect();
    products.sort_by(|a, b| a.name.cmp(&b.name));

    let total = categories.len() + products.len();
    let offset = (page - 1) * page_size;
    let items: Vec<SearchItem> = categories
        .into_iter()
        .chain(products)
        .skip(offset)
        .take(page_size)
        .collect();

    SearchPage {
        items,
        total,
        page,
        page_size,
        has_more: offset + page_size < total,
    }
}
