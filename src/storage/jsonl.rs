use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::entity::{Grant, Node};
use crate::error::Result;

use super::StorageBackend;

/// JSONL-based storage: `nodes.jsonl` and `grants.jsonl` in one data
/// directory, one record per line.
pub struct JsonlStorage {
    data_dir: PathBuf,
}

impl JsonlStorage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn nodes_path(&self) -> PathBuf {
        self.data_dir.join("nodes.jsonl")
    }

    fn grants_path(&self) -> PathBuf {
        self.data_dir.join("grants.jsonl")
    }

    /// Read all records from a JSONL file, skipping malformed lines.
    fn read_jsonl_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let file = fs::File::open(path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<T>(trimmed) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(
                        "skipping malformed line {} in {}: {}",
                        line_num + 1,
                        path.display(),
                        e
                    );
                }
            }
        }

        Ok(records)
    }

    /// Rewrite a JSONL file with the given records.
    fn write_jsonl_file<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(path)?;
        for record in records {
            let json = serde_json::to_string(record)?;
            writeln!(file, "{}", json)?;
        }
        Ok(())
    }
}

impl StorageBackend for JsonlStorage {
    fn load_nodes(&self) -> Result<Vec<Node>> {
        Self::read_jsonl_file(&self.nodes_path())
    }

    fn load_grants(&self) -> Result<Vec<Grant>> {
        Self::read_jsonl_file(&self.grants_path())
    }

    fn save_nodes(&self, nodes: &[Node]) -> Result<()> {
        Self::write_jsonl_file(&self.nodes_path(), nodes)
    }

    fn save_grants(&self, grants: &[Grant]) -> Result<()> {
        Self::write_jsonl_file(&self.grants_path(), grants)
    }
}
