use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::error::{Result, TreegateError};
use crate::principals::PrincipalDirectory;

/// A group definition from `groups.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDefinition {
    /// Natural language description of the group.
    #[serde(default)]
    pub description: String,

    /// Ordered member user ids.
    pub members: Vec<String>,
}

/// Groups configuration loaded from groups.yml, keyed by group id. Doubles
/// as the principal directory for the access engine: membership lookup is
/// the only thing the engine needs from group management.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupsConfig {
    pub groups: HashMap<String, GroupDefinition>,
}

impl GroupsConfig {
    /// Load groups from a YAML file. Missing file means no groups.
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

    /// Load groups from the project root. Checks `.treegate/groups.yml`.
    pub fn load_project(project_root: &Path) -> Result<Self> {
        let path = super::project_dir(project_root).join("groups.yml");
        Self::load_from(&path)
    }

    /// Build a config in memory (tests, embedding callers).
    pub fn from_members(groups: &[(&str, &[&str])]) -> Self {
        Self {
            groups: groups
                .iter()
                .map(|(id, members)| {
                    (
                        id.to_string(),
                        GroupDefinition {
                            description: String::new(),
                            members: members.iter().map(|m| m.to_string()).collect(),
                        },
                    )
                })
                .collect(),
        }
    }

    pub fn get_group(&self, id: &str) -> Option<&GroupDefinition> {
        self.groups.get(id)
    }
}

impl PrincipalDirectory for GroupsConfig {
    fn groups_containing(&self, user_id: &str) -> BTreeSet<String> {
        self.groups
            .iter()
            .filter(|(_, def)| def.members.iter().any(|m| m == user_id))
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn members(&self, group_id: &str) -> Vec<String> {
        self.groups
            .get(group_id)
            .map(|def| def.members.clone())
            .unwrap_or_default()
    }
}
