pub mod check;
pub mod grant;
pub mod search_cmd;
pub mod sync;
pub mod tree_cmd;

use std::path::Path;

use crate::config::{CatalogConfig, GroupsConfig};
use crate::error::Result;
use crate::grants::GrantStore;
use crate::storage::jsonl::JsonlStorage;
use crate::storage::{load_stores, save_stores};
use crate::tree::TreeStore;

/// Everything a subcommand needs: config, group directory, and the
/// in-memory stores loaded from the JSONL snapshot. Commands mutate the
/// stores and call [`Workspace::save`] to write the snapshot back.
pub struct Workspace {
    pub config: CatalogConfig,
    pub groups: GroupsConfig,
    pub tree: TreeStore,
    pub grants: GrantStore,
    storage: JsonlStorage,
}

impl Workspace {
    pub fn open(project_root: &Path) -> Result<Self> {
        let config = CatalogConfig::load_project(project_root)?;
        let groups = GroupsConfig::load_project(project_root)?;
        let storage = JsonlStorage::new(project_root.join(&config.data_dir));
        let (tree, grants) = load_stores(&storage, &config.root_prefix)?;
        Ok(Self {
            config,
            groups,
            tree,
            grants,
            storage,
        })
    }

    pub fn save(&self) -> Result<()> {
        save_stores(&self.storage, &self.tree, &self.grants)
    }
}
