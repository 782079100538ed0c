//! # mapcrud
//!
//! A generic CRUD-over-REST mapper for relational entities, built on axum.
//!
//! ## Features
//!
//! - **Generated Handlers**: Save, List, Page, Get and Delete for any entity type
//! - **Association Linking**: attach and detach existing records with
//!   `LINK` / `UNLINK` or `GET B/{id}/link` / `GET B/{id}/unlink`
//! - **Per-target Outcomes**: every linked target is reported on its own
//! - **Pluggable Backends**: in-memory by default, PostgreSQL behind the `postgres` feature
//! - **Opt-in Validation**: `ValidateSave` / `ValidateDelete` chosen at registration
//! - **Preloading**: reads return association fields filled one level deep
//! - **Automatic Timestamps**: created_at and updated_at managed on request
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mapcrud::prelude::*;
//!
//! #[derive(Clone, Debug, Default, Serialize, Deserialize)]
//! #[serde(default)]
//! pub struct Tag {
//!     pub id: u64,
//!     pub name: String,
//!     pub notes: Vec<Note>,
//! }
//!
//! impl_crud_entity!(Tag, "tag", { many notes: "note" });
//!
//! let app = CrudMapper::new(Store::new(InMemoryBackend::new()))
//!     .map::<Tag>("/api/v1/tag").full()
//!     .map::<Note>("/api/v1/note").full()
//!     .build();
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod links;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        association::{AssociationAccessor, AssociationIndex},
        entity::{AssociationDef, Cardinality, Entity, EntityDescriptor},
        error::{CrudError, StorageError, StorageResult},
        query::{PageQuery, PageRequest, Paginator, QueryResult},
        service::{AssociationKey, Backend, Record},
        store::Store,
        validation::{Capabilities, ValidateDelete, ValidateSave, Validator, validate_fields},
    };

    // === Macros ===
    pub use crate::impl_crud_entity;

    // === Links ===
    pub use crate::links::{
        LinkFailure, LinkFault, LinkOperation, LinkOutcome, LinkReport, OutcomeStatus,
    };

    // === Storage ===
    pub use crate::storage::InMemoryBackend;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresBackend;

    // === Config ===
    pub use crate::config::{CrudConfig, LinkMethodPlacement};

    // === Server ===
    pub use crate::server::{CrudMapper, CrudOperation, EntityMapping, RouteInfo, serve};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};

    // === Axum ===
    pub use axum::Router;
}
