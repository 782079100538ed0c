//! Association index used by the link handler
//!
//! Query keys of a link request name association fields case-insensitively.
//! Instead of scanning the entity's fields per request, each mapped entity
//! gets an [`AssociationIndex`] built once at registration time.

use crate::core::entity::{AssociationDef, Cardinality, EntityDescriptor};
use crate::core::error::StorageResult;
use crate::core::service::AssociationKey;
use crate::core::store::Store;
use serde_json::Value;
use std::collections::HashMap;

/// Typed handle on one association of a root kind
#[derive(Debug, Clone)]
pub struct AssociationAccessor {
    def: AssociationDef,
    key: AssociationKey,
}

impl AssociationAccessor {
    pub fn new(kind: &'static str, def: AssociationDef) -> Self {
        let key = AssociationKey::of(kind, &def);
        Self { def, key }
    }

    /// Field name as declared on the root entity
    pub fn field(&self) -> &'static str {
        self.def.field
    }

    /// Kind of the entities this association points at
    pub fn target_kind(&self) -> &'static str {
        self.def.target
    }

    pub fn cardinality(&self) -> Cardinality {
        self.def.cardinality
    }

    pub fn key(&self) -> &AssociationKey {
        &self.key
    }

    /// Look up a target entity by id, as stored
    pub async fn resolve_target(&self, store: &Store, id: u64) -> StorageResult<Option<Value>> {
        store.find_stored(self.def.target, id).await
    }

    /// Number of targets currently associated with `root_id`
    pub async fn count(&self, store: &Store, root_id: u64) -> StorageResult<usize> {
        store.association_count(&self.key, root_id).await
    }

    /// Attach `target_id` to `root_id`; other rows are untouched
    pub async fn append(&self, store: &Store, root_id: u64, target_id: u64) -> StorageResult<()> {
        store.association_append(&self.key, root_id, target_id).await
    }

    /// Detach `target_id` from `root_id`
    pub async fn remove(&self, store: &Store, root_id: u64, target_id: u64) -> StorageResult<()> {
        store.association_delete(&self.key, root_id, target_id).await
    }
}

/// Lower-cased field name -> accessor, for one root kind
#[derive(Debug, Clone, Default)]
pub struct AssociationIndex {
    accessors: HashMap<String, AssociationAccessor>,
}

impl AssociationIndex {
    /// Build the index from an entity descriptor
    pub fn from_descriptor(descriptor: &EntityDescriptor) -> Self {
        let accessors = descriptor
            .associations
            .iter()
            .map(|def| {
                (
                    def.field.to_lowercase(),
                    AssociationAccessor::new(descriptor.kind, def.clone()),
                )
            })
            .collect();

        Self { accessors }
    }

    /// Find the accessor whose field name equals `name`, ignoring case
    pub fn resolve(&self, name: &str) -> Option<&AssociationAccessor> {
        self.accessors.get(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }
}
