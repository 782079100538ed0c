//! In-memory implementation of Backend for testing and development

use crate::core::entity::PRIMARY_KEY;
use crate::core::error::{StorageError, StorageResult};
use crate::core::query::SortOrder;
use crate::core::service::{AssociationKey, Backend, Record, record_id};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Tables {
    /// kind -> id -> record
    records: HashMap<String, BTreeMap<u64, Record>>,

    /// kind -> last allocated id
    sequences: HashMap<String, u64>,

    /// (association, root id) -> target ids
    associations: HashMap<(AssociationKey, u64), Vec<u64>>,
}

/// In-memory backend implementation
///
/// Useful for testing and development. A single RwLock guards all tables so
/// every primitive is atomic.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryBackend {
    /// Create a new, empty in-memory backend
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| StorageError::Lock("read"))
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| StorageError::Lock("write"))
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn save(&self, kind: &str, mut record: Record) -> StorageResult<Record> {
        let mut tables = self.write()?;

        let last = tables.sequences.entry(kind.to_string()).or_insert(0);
        let id = match record_id(&record) {
            Some(id) => {
                *last = (*last).max(id);
                id
            }
            None => {
                *last += 1;
                *last
            }
        };

        record.insert(PRIMARY_KEY.to_string(), Value::from(id));
        tables
            .records
            .entry(kind.to_string())
            .or_default()
            .insert(id, record.clone());

        Ok(record)
    }

    async fn find(&self, kind: &str, id: u64) -> StorageResult<Option<Record>> {
        let tables = self.read()?;
        Ok(tables
            .records
            .get(kind)
            .and_then(|table| table.get(&id))
            .cloned())
    }

    async fn find_all(&self, kind: &str) -> StorageResult<Vec<Record>> {
        let tables = self.read()?;
        Ok(tables
            .records
            .get(kind)
            .map(|table| table.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn find_page(
        &self,
        kind: &str,
        offset: usize,
        limit: usize,
        order: SortOrder,
    ) -> StorageResult<Vec<Record>> {
        let tables = self.read()?;
        let Some(table) = tables.records.get(kind) else {
            return Ok(Vec::new());
        };

        let page = match order {
            SortOrder::Asc => table.values().skip(offset).take(limit).cloned().collect(),
            SortOrder::Desc => table
                .values()
                .rev()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect(),
        };

        Ok(page)
    }

    async fn count(&self, kind: &str) -> StorageResult<usize> {
        let tables = self.read()?;
        Ok(tables.records.get(kind).map(BTreeMap::len).unwrap_or(0))
    }

    async fn delete(&self, kind: &str, id: u64) -> StorageResult<bool> {
        let mut tables = self.write()?;

        let removed = tables
            .records
            .get_mut(kind)
            .and_then(|table| table.remove(&id))
            .is_some();

        // Drop rows where the record was the root, then detach it as a target
        tables
            .associations
            .retain(|(key, root_id), _| !(key.kind == kind && *root_id == id));
        for ((key, _), targets) in tables.associations.iter_mut() {
            if key.target == kind {
                targets.retain(|target_id| *target_id != id);
            }
        }

        Ok(removed)
    }

    async fn association_targets(
        &self,
        key: &AssociationKey,
        root_id: u64,
    ) -> StorageResult<Vec<u64>> {
        let tables = self.read()?;
        Ok(tables
            .associations
            .get(&(*key, root_id))
            .cloned()
            .unwrap_or_default())
    }

    async fn association_append(
        &self,
        key: &AssociationKey,
        root_id: u64,
        target_id: u64,
    ) -> StorageResult<()> {
        let mut tables = self.write()?;
        let targets = tables.associations.entry((*key, root_id)).or_default();

        if !targets.contains(&target_id) {
            targets.push(target_id);
        }

        Ok(())
    }

    async fn association_delete(
        &self,
        key: &AssociationKey,
        root_id: u64,
        target_id: u64,
    ) -> StorageResult<()> {
        let mut tables = self.write()?;

        if let Some(targets) = tables.associations.get_mut(&(*key, root_id)) {
            targets.retain(|id| *id != target_id);
        }

        Ok(())
    }
}
