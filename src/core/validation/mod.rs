//! Validation capabilities for save and delete
//!
//! An entity opts into validation by implementing [`ValidateSave`] and/or
//! [`ValidateDelete`]. The choice is made once, when the entity is mapped
//! (`with_save_validation()` / `with_delete_validation()`), and stored as a
//! [`Capabilities`] value in the handler state. Handlers never inspect the
//! entity type at request time.

pub mod validators;

pub use validators::validate_fields;

use crate::core::entity::Entity;
use crate::core::error::CrudError;
use crate::core::store::Store;
use async_trait::async_trait;
use std::sync::Arc;

/// Check run before an entity is saved
#[async_trait]
pub trait ValidateSave: Entity {
    async fn validate_save(&self, store: &Store) -> Result<(), CrudError>;
}

/// Check run before an entity is deleted
#[async_trait]
pub trait ValidateDelete: Entity {
    async fn validate_delete(&self, store: &Store) -> Result<(), CrudError>;
}

/// A validation hook for entities of type `T`
///
/// Implemented by the adapters below, and by any custom validator passed to
/// `with_save_validator` / `with_delete_validator`.
#[async_trait]
pub trait Validator<T>: Send + Sync {
    async fn validate(&self, entity: &T, store: &Store) -> Result<(), CrudError>;
}

/// Routes [`Validator`] to [`ValidateSave::validate_save`]
pub struct SaveValidation;

#[async_trait]
impl<T: ValidateSave> Validator<T> for SaveValidation {
    async fn validate(&self, entity: &T, store: &Store) -> Result<(), CrudError> {
        entity.validate_save(store).await
    }
}

/// Routes [`Validator`] to [`ValidateDelete::validate_delete`]
pub struct DeleteValidation;

#[async_trait]
impl<T: ValidateDelete> Validator<T> for DeleteValidation {
    async fn validate(&self, entity: &T, store: &Store) -> Result<(), CrudError> {
        entity.validate_delete(store).await
    }
}

/// Validation hooks resolved for one mapped entity
pub struct Capabilities<T> {
    pub save: Option<Arc<dyn Validator<T>>>,
    pub delete: Option<Arc<dyn Validator<T>>>,
}

impl<T> Default for Capabilities<T> {
    fn default() -> Self {
        Self {
            save: None,
            delete: None,
        }
    }
}

impl<T> Clone for Capabilities<T> {
    fn clone(&self) -> Self {
        Self {
            save: self.save.clone(),
            delete: self.delete.clone(),
        }
    }
}

impl<T: Entity> Capabilities<T> {
    /// Run the save hook, if any
    pub async fn check_save(&self, entity: &T, store: &Store) -> Result<(), CrudError> {
        match &self.save {
            Some(validator) => validator.validate(entity, store).await,
            None => Ok(()),
        }
    }

    /// Run the delete hook, if any
    pub async fn check_delete(&self, entity: &T, store: &Store) -> Result<(), CrudError> {
        match &self.delete {
            Some(validator) => validator.validate(entity, store).await,
            None => Ok(()),
        }
    }
}
