use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, TreegateError};

/// Catalog configuration from `.treegate/catalog.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Fixed prefix all node paths live under. The root itself is not a
    /// node and never bears grants. Default: `/categories`.
    #[serde(default = "default_root_prefix")]
    pub root_prefix: String,

    /// Page size used by search when the caller gives none. Default: 20.
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Where nodes.jsonl / grants.jsonl live, relative to the project
    /// root. Default: `.treegate/data`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_root_prefix() -> String {
    "/categories".to_string()
}
fn default_page_size() -> usize {
    20
}
fn default_data_dir() -> PathBuf {
    PathBuf::from(".treegate").join("data")
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            root_prefix: default_root_prefix(),
            default_page_size: default_page_size(),
            data_dir: default_data_dir(),
        }
    }
}

impl CatalogConfig {
    /// Load config from a YAML file. Returns default if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&contents).map_err(|e| TreegateError::ConfigParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load config from the project root. Checks `.treegate/catalog.yml`.
    pub fn load_project(project_root: &Path) -> Result<Self> {
        let path = super::project_dir(project_root).join("catalog.yml");
        Self::load_from(&path)
    }
}
