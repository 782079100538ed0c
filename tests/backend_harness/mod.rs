//! Shared test harness for backend testing
//!
//! Provides the fixture entities `Author`, `Category`, `Tag` and `Note`,
//! a router builder mapping them the way a real service would, and helper
//! functions for creating test data.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod backend_harness;
//! use backend_harness::*;
//!
//! backend_tests!(InMemoryBackend::new());
//! rest_tests!(InMemoryBackend::new());
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod rest_tests;
pub mod faulty;

use axum::Router;
use axum_test::TestServer;
use mapcrud::prelude::*;
use serde_json::{Value, json};

// ---------------------------------------------------------------------------
// Fixture entities
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub id: u64,
    pub name: String,
    pub notes: Vec<Note>,
}

impl_crud_entity!(Author, "author", {
    many notes: "note",
});

#[async_trait]
impl ValidateSave for Author {
    async fn validate_save(&self, _store: &Store) -> Result<(), CrudError> {
        if self.name.trim().is_empty() {
            return Err(CrudError::new("name: is required", 400));
        }
        Ok(())
    }
}

/// Categories hang off the root category (id 1)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub category_id: Option<u64>,
    pub categories: Vec<Category>,
    pub notes: Vec<Note>,
}

impl_crud_entity!(Category, "category", {
    many categories: "category",
    many notes: "note",
});

pub const ROOT_CATEGORY_ID: u64 = 1;

#[async_trait]
impl ValidateSave for Category {
    async fn validate_save(&self, _store: &Store) -> Result<(), CrudError> {
        match self.category_id {
            Some(_) => Ok(()),
            None => Err(CrudError::new("CategoryID can't not be null", 500)),
        }
    }
}

#[async_trait]
impl ValidateDelete for Category {
    async fn validate_delete(&self, _store: &Store) -> Result<(), CrudError> {
        if self.id == ROOT_CATEGORY_ID {
            return Err(CrudError::new("Root category can't be deleted", 500));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
    pub id: u64,
    pub name: String,
}

impl_crud_entity!(Tag, "tag");

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Note {
    pub id: u64,
    pub title: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub author: Option<Author>,
    pub tags: Vec<Tag>,
}

impl_crud_entity!(Note, "note", timestamps, {
    one author: "author",
    many tags: "tag",
});

// ---------------------------------------------------------------------------
// Router and server helpers
// ---------------------------------------------------------------------------

pub const AUTHOR_PATH: &str = "/api/v1/author";
pub const CATEGORY_PATH: &str = "/api/v1/category";
pub const TAG_PATH: &str = "/api/v1/tag";
pub const NOTE_PATH: &str = "/api/v1/note";

/// Map the fixture entities
///
/// `Tag` only gets the base routes (no list, no link).
pub fn build_mapper(store: Store, config: &CrudConfig) -> CrudMapper {
    CrudMapper::new(store)
        .with_config(config)
        .map::<Author>(AUTHOR_PATH)
        .full()
        .with_save_validation()
        .map::<Category>(CATEGORY_PATH)
        .full()
        .with_save_validation()
        .with_delete_validation()
        .map::<Tag>(TAG_PATH)
        .base()
        .map::<Note>(NOTE_PATH)
        .full()
        .done()
}

pub fn build_router(store: Store, config: &CrudConfig) -> Router {
    build_mapper(store, config).build()
}

/// Test server over `store` with the root category in place
pub async fn seeded_server(store: Store, config: &CrudConfig) -> TestServer {
    seed_root(&store).await;
    TestServer::new(build_router(store, config))
}

// ---------------------------------------------------------------------------
// Helper functions: data creation
// ---------------------------------------------------------------------------

/// Save the root category (id 1), bypassing validation
pub async fn seed_root(store: &Store) -> Category {
    store
        .save(&Category {
            id: ROOT_CATEGORY_ID,
            name: "root".to_string(),
            ..Default::default()
        })
        .await
        .unwrap()
}

pub async fn create_category(store: &Store, name: &str) -> Category {
    store
        .save(&Category {
            name: name.to_string(),
            category_id: Some(ROOT_CATEGORY_ID),
            ..Default::default()
        })
        .await
        .unwrap()
}

pub async fn create_tags(store: &Store, n: usize) -> Vec<Tag> {
    let mut tags = Vec::with_capacity(n);
    for i in 0..n {
        let tag = store
            .save(&Tag {
                id: 0,
                name: format!("tag_{}", i),
            })
            .await
            .unwrap();
        tags.push(tag);
    }
    tags
}

/// Build a stored record from a JSON object literal
pub fn record(value: Value) -> Record {
    value.as_object().cloned().unwrap_or_default()
}

pub fn named(name: &str) -> Record {
    record(json!({ "name": name }))
}

pub fn category_key() -> AssociationKey {
    AssociationKey {
        kind: "category",
        field: "categories",
        target: "category",
    }
}

pub fn notes_key() -> AssociationKey {
    AssociationKey {
        kind: "category",
        field: "notes",
        target: "note",
    }
}

// ---------------------------------------------------------------------------
// Assertions helpers
// ---------------------------------------------------------------------------

/// Assert the 404 body shared by Get, Delete and Link
pub fn assert_not_found_body(body: &Value) {
    assert_eq!(
        body,
        &json!({"message": "Status Not Found", "code": 404}),
        "Expected not-found body, got {}",
        body
    );
}

/// Assert that a list contains exactly `n` entries.
pub fn assert_count<T>(list: &[T], expected: usize) {
    assert_eq!(
        list.len(),
        expected,
        "Expected {} items, got {}",
        expected,
        list.len()
    );
}
