//! Server module mapping entities onto HTTP routes
//!
//! This module provides a `CrudMapper` that registers, per entity:
//! - Save, List, Page, Get and Delete handlers
//! - Link / Unlink handlers, by URL and by the `LINK` / `UNLINK` methods
//! - Route introspection through `CrudMapper::routes()`

pub mod builder;
pub mod handlers;
pub mod router;
pub mod state;

pub use builder::{CrudMapper, EntityMapping, serve};
pub use router::{CrudOperation, RouteInfo, RouteSet};
pub use state::CrudState;
