use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::entity::{EntityKind, Grant, GrantKey};
use crate::error::{Result, TreegateError};

/// Flat collection of allow records. Pure storage and simple queries;
/// no composition semantics live here.
pub struct GrantStore {
    entries: RwLock<HashMap<GrantKey, Grant>>,
    next_id: AtomicU64,
}

impl Default for GrantStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GrantStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a grant, or return the existing one unchanged: grant
    /// creation is idempotent and duplicates are a no-op success.
    pub fn create(&self, kind: EntityKind, entity_id: &str, principal_id: &str) -> Grant {
        let key = GrantKey {
            entity_kind: kind,
            entity_id: entity_id.to_string(),
            principal_id: principal_id.to_string(),
        };
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = entries.get(&key) {
            return existing.clone();
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let grant = Grant::new(id, kind, entity_id, principal_id);
        entries.insert(key, grant.clone());
        grant
    }

    /// Load a grant verbatim from storage, keeping the id counter ahead of
    /// every loaded id.
    pub fn load(&self, grant: Grant) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        self.next_id.fetch_max(grant.id + 1, Ordering::Relaxed);
        entries.insert(grant.key.clone(), grant);
    }

    pub fn delete(&self, id: u64) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let key = entries
            .iter()
            .find(|(_, g)| g.id == id)
            .map(|(k, _)| k.clone())
            .ok_or_else(|| TreegateError::NotFound {
                kind: "grant".to_string(),
                id: id.to_string(),
            })?;
        entries.remove(&key);
        Ok(())
    }

    /// Remove the grant matching (kind, entity, principal) if present.
    /// Returns whether anything was removed.
    pub fn delete_by_key(&self, kind: EntityKind, entity_id: &str, principal_id: &str) -> bool {
        let key = GrantKey {
            entity_kind: kind,
            entity_id: entity_id.to_string(),
            principal_id: principal_id.to_string(),
        };
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(&key).is_some()
    }

    /// Cascade hook: deleting an entity deletes every grant referencing
    /// it, so no orphan grants survive a subtree delete.
    pub fn delete_for_entity(&self, kind: EntityKind, entity_id: &str) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|k, _| !(k.entity_kind == kind && k.entity_id == entity_id));
        before - entries.len()
    }

    pub fn get(&self, kind: EntityKind, entity_id: &str, principal_id: &str) -> Option<Grant> {
        let key = GrantKey {
            entity_kind: kind,
            entity_id: entity_id.to_string(),
            principal_id: principal_id.to_string(),
        };
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(&key).cloned()
    }

    pub fn list_by_entity(&self, kind: EntityKind, entity_id: &str) -> Vec<Grant> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let mut out: Vec<Grant> = entries
            .values()
            .filter(|g| g.key.entity_kind == kind && g.key.entity_id == entity_id)
            .cloned()
            .collect();
        out.sort_by_key(|g| g.id);
        out
    }

    /// What a given user or group has been allowed, across both kinds.
    pub fn list_by_principal(&self, principal_id: &str) -> Vec<Grant> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let mut out: Vec<Grant> = entries
            .values()
            .filter(|g| g.key.principal_id == principal_id)
            .cloned()
            .collect();
        out.sort_by_key(|g| g.id);
        out
    }

    pub fn list_by_kind(&self, kind: EntityKind) -> Vec<Grant> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let mut out: Vec<Grant> = entries
            .values()
            .filter(|g| g.key.entity_kind == kind)
            .cloned()
            .collect();
        out.sort_by_key(|g| g.id);
        out
    }

    pub fn all(&self) -> Vec<Grant> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let mut out: Vec<Grant> = entries.values().cloned().collect();
        out.sort_by_key(|g| g.id);
        out
    }

    /// Insert a batch of (kind, entity id, principal id) triples under one
    /// write guard. Existing grants are skipped; everything else commits
    /// together, so a reader sees none or all of the batch. Returns
    /// (created, skipped).
    pub fn insert_batch(&self, batch: &[(EntityKind, String, String)]) -> (usize, usize) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let mut created = 0;
        let mut skipped = 0;
        for (kind, entity_id, principal_id) in batch {
            let key = GrantKey {
                entity_kind: *kind,
                entity_id: entity_id.clone(),
                principal_id: principal_id.clone(),
            };
            if entries.contains_key(&key) {
                skipped += 1;
                continue;
            }
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            entries.insert(key, Grant::new(id, *kind, entity_id, principal_id));
            created += 1;
        }
        (created, skipped)
    }
}
