//! Shared state of the handlers of one mapped entity

use crate::core::association::AssociationIndex;
use crate::core::entity::{Entity, EntityDescriptor};
use crate::core::query::DEFAULT_PAGE_LIMIT;
use crate::core::store::Store;
use crate::core::validation::Capabilities;
use std::sync::Arc;

/// Application state for the routes of entity `T`
pub struct CrudState<T> {
    pub store: Store,
    pub descriptor: Arc<EntityDescriptor>,
    /// Association fields, resolved once at registration
    pub index: Arc<AssociationIndex>,
    pub capabilities: Capabilities<T>,
    /// Page size used when a page request omits `limit`
    pub default_limit: usize,
}

impl<T: Entity> CrudState<T> {
    pub fn new(store: Store) -> Self {
        let descriptor = T::descriptor();
        let index = AssociationIndex::from_descriptor(&descriptor);

        Self {
            store,
            descriptor: Arc::new(descriptor),
            index: Arc::new(index),
            capabilities: Capabilities::default(),
            default_limit: DEFAULT_PAGE_LIMIT,
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities<T>) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_default_limit(mut self, default_limit: usize) -> Self {
        self.default_limit = default_limit;
        self
    }
}

impl<T> Clone for CrudState<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            descriptor: self.descriptor.clone(),
            index: self.index.clone(),
            capabilities: self.capabilities.clone(),
            default_limit: self.default_limit,
        }
    }
}
