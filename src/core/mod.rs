//! Core module containing fundamental traits and types for the mapper

pub mod association;
pub mod entity;
pub mod error;
pub mod query;
pub mod service;
pub mod store;
pub mod validation;

pub use association::{AssociationAccessor, AssociationIndex};
pub use entity::{AssociationDef, Cardinality, Entity, EntityDescriptor, PRIMARY_KEY};
pub use error::{CrudError, StorageError, StorageResult};
pub use query::{PageQuery, PageRequest, Paginator, QueryResult, SortOrder};
pub use service::{AssociationKey, Backend, Record};
pub use store::Store;
pub use validation::{Capabilities, ValidateDelete, ValidateSave, Validator, validate_fields};
