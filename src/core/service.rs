//! Backend trait for record and association persistence

use crate::core::entity::{AssociationDef, PRIMARY_KEY};
use crate::core::error::StorageResult;
use crate::core::query::SortOrder;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// A stored record: a JSON object without association fields
pub type Record = Map<String, Value>;

/// Identifies one association relation in storage
///
/// Associations are stored as ordered rows `(root_id, target_id)` per key,
/// independently of the records themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssociationKey {
    /// Kind of the root entity
    pub kind: &'static str,

    /// Association field on the root entity
    pub field: &'static str,

    /// Kind of the target entity
    pub target: &'static str,
}

impl AssociationKey {
    /// Key of association `def` declared on entities of `kind`
    pub fn of(kind: &'static str, def: &AssociationDef) -> Self {
        Self {
            kind,
            field: def.field,
            target: def.target,
        }
    }
}

/// Persistence primitives the handlers are built on
///
/// Implementations must be safe for concurrent use: one instance is shared
/// by every request of every mapped entity. The mapper is agnostic to the
/// underlying storage mechanism.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Insert or update a record
    ///
    /// A missing or zero primary key allocates the next id for the kind;
    /// otherwise the record under that id is replaced (or created).
    /// Returns the stored record with its primary key set.
    async fn save(&self, kind: &str, record: Record) -> StorageResult<Record>;

    /// Get a record by primary key
    async fn find(&self, kind: &str, id: u64) -> StorageResult<Option<Record>>;

    /// List all records of a kind, ordered by primary key ascending
    async fn find_all(&self, kind: &str) -> StorageResult<Vec<Record>>;

    /// List a window of records ordered by primary key
    async fn find_page(
        &self,
        kind: &str,
        offset: usize,
        limit: usize,
        order: SortOrder,
    ) -> StorageResult<Vec<Record>>;

    /// Count records of a kind
    async fn count(&self, kind: &str) -> StorageResult<usize>;

    /// Delete a record and every association row it takes part in
    ///
    /// Returns whether a record was removed.
    async fn delete(&self, kind: &str, id: u64) -> StorageResult<bool>;

    /// Target ids associated with a root, in insertion order
    async fn association_targets(
        &self,
        key: &AssociationKey,
        root_id: u64,
    ) -> StorageResult<Vec<u64>>;

    /// Number of targets associated with a root
    async fn association_count(&self, key: &AssociationKey, root_id: u64) -> StorageResult<usize> {
        Ok(self.association_targets(key, root_id).await?.len())
    }

    /// Append one target to a root's association
    ///
    /// Existing rows are left in place. Appending a target that is already
    /// associated changes nothing.
    async fn association_append(
        &self,
        key: &AssociationKey,
        root_id: u64,
        target_id: u64,
    ) -> StorageResult<()>;

    /// Remove one target from a root's association
    ///
    /// Removing a target that is not associated is not an error.
    async fn association_delete(
        &self,
        key: &AssociationKey,
        root_id: u64,
        target_id: u64,
    ) -> StorageResult<()>;
}

/// Read the primary key of a record, `None` when missing or zero
pub fn record_id(record: &Record) -> Option<u64> {
    record
        .get(PRIMARY_KEY)
        .and_then(Value::as_u64)
        .filter(|id| *id > 0)
}
