//! Fault-injecting backend wrapping [`InMemoryBackend`]
//!
//! Faults are armed per (operation, kind) and fail every matching call with
//! `StorageError::Database`. Association operations match on the root kind
//! of their key. A detach can also be queued to run right before the next
//! association count, standing in for a concurrent unlink.

use mapcrud::core::query::SortOrder;
use mapcrud::prelude::*;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

pub const INJECTED: &str = "injected fault";

/// The message a failed call reports
pub fn injected_message() -> String {
    StorageError::Database(INJECTED.to_string()).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Save,
    Find,
    FindAll,
    FindPage,
    Count,
    Delete,
    AssociationTargets,
    AssociationCount,
    AssociationAppend,
    AssociationDelete,
}

#[derive(Clone, Default)]
pub struct FaultyBackend {
    inner: InMemoryBackend,
    faults: Arc<Mutex<HashSet<(Op, String)>>>,
    pending_detach: Arc<Mutex<Vec<(AssociationKey, u64, u64)>>>,
}

impl FaultyBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The wrapped backend, never faulty
    pub fn inner(&self) -> &InMemoryBackend {
        &self.inner
    }

    pub fn fail(&self, op: Op, kind: &str) {
        self.faults.lock().unwrap().insert((op, kind.to_string()));
    }

    pub fn heal(&self) {
        self.faults.lock().unwrap().clear();
    }

    /// Remove `(root_id, target_id)` from `key` before the next association count
    pub fn detach_before_count(&self, key: AssociationKey, root_id: u64, target_id: u64) {
        self.pending_detach
            .lock()
            .unwrap()
            .push((key, root_id, target_id));
    }

    fn check(&self, op: Op, kind: &str) -> StorageResult<()> {
        if self.faults.lock().unwrap().contains(&(op, kind.to_string())) {
            return Err(StorageError::Database(INJECTED.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for FaultyBackend {
    async fn save(&self, kind: &str, record: Record) -> StorageResult<Record> {
        self.check(Op::Save, kind)?;
        self.inner.save(kind, record).await
    }

    async fn find(&self, kind: &str, id: u64) -> StorageResult<Option<Record>> {
        self.check(Op::Find, kind)?;
        self.inner.find(kind, id).await
    }

    async fn find_all(&self, kind: &str) -> StorageResult<Vec<Record>> {
        self.check(Op::FindAll, kind)?;
        self.inner.find_all(kind).await
    }

    async fn find_page(
        &self,
        kind: &str,
        offset: usize,
        limit: usize,
        order: SortOrder,
    ) -> StorageResult<Vec<Record>> {
        self.check(Op::FindPage, kind)?;
        self.inner.find_page(kind, offset, limit, order).await
    }

    async fn count(&self, kind: &str) -> StorageResult<usize> {
        self.check(Op::Count, kind)?;
        self.inner.count(kind).await
    }

    async fn delete(&self, kind: &str, id: u64) -> StorageResult<bool> {
        self.check(Op::Delete, kind)?;
        self.inner.delete(kind, id).await
    }

    async fn association_targets(
        &self,
        key: &AssociationKey,
        root_id: u64,
    ) -> StorageResult<Vec<u64>> {
        self.check(Op::AssociationTargets, key.kind)?;
        self.inner.association_targets(key, root_id).await
    }

    async fn association_count(&self, key: &AssociationKey, root_id: u64) -> StorageResult<usize> {
        let pending: Vec<_> = self.pending_detach.lock().unwrap().drain(..).collect();
        for (detach_key, detach_root, detach_target) in pending {
            self.inner
                .association_delete(&detach_key, detach_root, detach_target)
                .await?;
        }

        self.check(Op::AssociationCount, key.kind)?;
        self.inner.association_count(key, root_id).await
    }

    async fn association_append(
        &self,
        key: &AssociationKey,
        root_id: u64,
        target_id: u64,
    ) -> StorageResult<()> {
        self.check(Op::AssociationAppend, key.kind)?;
        self.inner.association_append(key, root_id, target_id).await
    }

    async fn association_delete(
        &self,
        key: &AssociationKey,
        root_id: u64,
        target_id: u64,
    ) -> StorageResult<()> {
        self.check(Op::AssociationDelete, key.kind)?;
        self.inner.association_delete(key, root_id, target_id).await
    }
}
