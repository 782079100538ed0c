//! Typed store facade over a Backend
//!
//! The store is the handle handlers and validators receive. It turns
//! entities into records and back, preloads associations one level deep on
//! every read, and manages timestamps for descriptors that ask for them.

use crate::core::entity::{Cardinality, Entity, EntityDescriptor};
use crate::core::error::{StorageError, StorageResult};
use crate::core::query::{PageRequest, Paginator, SortOrder};
use crate::core::service::{AssociationKey, Backend, Record, record_id};
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::sync::Arc;

const CREATED_AT: &str = "created_at";
const UPDATED_AT: &str = "updated_at";

/// Cloneable handle over a shared [`Backend`]
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn Backend>,
}

impl Store {
    /// Create a store over the given backend
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Create a store over an already shared backend
    pub fn from_arc(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// The underlying backend
    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    // === Typed access ===

    /// Get an entity by id, associations preloaded
    pub async fn find<T: Entity>(&self, id: u64) -> StorageResult<Option<T>> {
        match self.find_record(&T::descriptor(), id).await? {
            Some(value) => decode(value).map(Some),
            None => Ok(None),
        }
    }

    /// List every entity of a kind, ordered by id ascending
    pub async fn all<T: Entity>(&self) -> StorageResult<Vec<T>> {
        let descriptor = T::descriptor();
        let mut entities = Vec::new();

        for record in self.backend.find_all(descriptor.kind).await? {
            entities.push(decode(self.hydrate(&descriptor, record).await?)?);
        }

        Ok(entities)
    }

    /// Load one page of entities ordered by id descending
    pub async fn paginate<T: Entity>(&self, request: PageRequest) -> StorageResult<Paginator<T>> {
        let descriptor = T::descriptor();
        let total = self.backend.count(descriptor.kind).await?;

        let records = self
            .backend
            .find_page(
                descriptor.kind,
                request.offset(),
                request.limit,
                SortOrder::Desc,
            )
            .await?;

        let mut entities = Vec::with_capacity(records.len());
        for record in records {
            entities.push(decode(self.hydrate(&descriptor, record).await?)?);
        }

        Ok(Paginator::new(request, total, entities))
    }

    /// Insert or update an entity, ignoring its association fields
    ///
    /// Returns the entity as persisted (id and timestamps filled in).
    pub async fn save<T: Entity>(&self, entity: &T) -> StorageResult<T> {
        let descriptor = T::descriptor();
        let value = serde_json::to_value(entity)
            .map_err(|e| StorageError::encode(descriptor.kind, e))?;

        let saved = self.save_record(&descriptor, value).await?;
        decode(saved)
    }

    /// Delete an entity by id; returns whether it existed
    pub async fn delete<T: Entity>(&self, id: u64) -> StorageResult<bool> {
        self.backend.delete(T::kind(), id).await
    }

    // === Record access ===

    /// Get a record by id with its associations preloaded
    pub async fn find_record(
        &self,
        descriptor: &EntityDescriptor,
        id: u64,
    ) -> StorageResult<Option<Value>> {
        match self.backend.find(descriptor.kind, id).await? {
            Some(record) => self.hydrate(descriptor, record).await.map(Some),
            None => Ok(None),
        }
    }

    /// Get a record of any kind as stored (no preloading)
    pub async fn find_stored(&self, kind: &str, id: u64) -> StorageResult<Option<Value>> {
        Ok(self.backend.find(kind, id).await?.map(Value::Object))
    }

    /// Persist a record of the described kind
    ///
    /// Association fields are not stored; the returned value is the stored
    /// record with the association fields of `value` put back in place.
    pub async fn save_record(
        &self,
        descriptor: &EntityDescriptor,
        value: Value,
    ) -> StorageResult<Value> {
        let kind = descriptor.kind;
        let Value::Object(mut record) = value else {
            return Err(StorageError::invalid_record(kind, "expected a JSON object"));
        };

        let mut associations = Vec::new();
        for def in &descriptor.associations {
            if let Some(value) = record.remove(def.field) {
                associations.push((def, value));
            }
        }

        if descriptor.timestamps {
            self.stamp(kind, &mut record).await?;
        }

        let mut stored = self.backend.save(kind, record).await?;

        for (def, value) in associations {
            stored.insert(def.field.to_string(), value);
        }

        Ok(Value::Object(stored))
    }

    /// Current number of targets in an association
    pub async fn association_count(&self, key: &AssociationKey, root_id: u64) -> StorageResult<usize> {
        self.backend.association_count(key, root_id).await
    }

    /// Attach one target to an association, keeping every existing row
    pub async fn association_append(
        &self,
        key: &AssociationKey,
        root_id: u64,
        target_id: u64,
    ) -> StorageResult<()> {
        self.backend
            .association_append(key, root_id, target_id)
            .await
    }

    /// Detach one target from an association
    pub async fn association_delete(
        &self,
        key: &AssociationKey,
        root_id: u64,
        target_id: u64,
    ) -> StorageResult<()> {
        self.backend
            .association_delete(key, root_id, target_id)
            .await
    }

    // === Internals ===

    async fn hydrate(&self, descriptor: &EntityDescriptor, mut record: Record) -> StorageResult<Value> {
        let Some(root_id) = record_id(&record) else {
            return Ok(Value::Object(record));
        };

        for def in &descriptor.associations {
            let key = AssociationKey::of(descriptor.kind, def);
            let mut targets = Vec::new();

            for target_id in self.backend.association_targets(&key, root_id).await? {
                // Rows pointing at vanished targets are skipped
                if let Some(target) = self.backend.find(def.target, target_id).await? {
                    targets.push(Value::Object(target));
                }
            }

            let value = match def.cardinality {
                Cardinality::Many => Value::Array(targets),
                Cardinality::One => targets.into_iter().next().unwrap_or(Value::Null),
            };
            record.insert(def.field.to_string(), value);
        }

        Ok(Value::Object(record))
    }

    async fn stamp(&self, kind: &str, record: &mut Record) -> StorageResult<()> {
        let now = Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true));

        let created_at = match record_id(record) {
            Some(id) => self
                .backend
                .find(kind, id)
                .await?
                .and_then(|mut existing| existing.remove(CREATED_AT))
                .filter(|value| !value.is_null()),
            None => None,
        };

        record.insert(
            CREATED_AT.to_string(),
            created_at.unwrap_or_else(|| now.clone()),
        );
        record.insert(UPDATED_AT.to_string(), now);
        Ok(())
    }
}

/// Decode a record into an entity
pub fn decode<T: Entity>(value: Value) -> StorageResult<T> {
    serde_json::from_value(value).map_err(|e| StorageError::decode(T::kind(), e))
}
