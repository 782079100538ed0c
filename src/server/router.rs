//! Route table of one mapped entity
//!
//! For a base path `B` the handlers land on:
//! - POST `B` - Save
//! - GET `B` - List
//! - GET `B.page` - Page
//! - GET / DELETE `B/{id}` - Get / Delete
//! - GET `B/{id}/link`, GET `B/{id}/unlink` - Link / Unlink by URL
//! - LINK / UNLINK on `B/{id}` or on the link URLs, per [`LinkMethodPlacement`]

use crate::config::LinkMethodPlacement;
use crate::core::entity::Entity;
use crate::links::handlers::{link, link_by_method, link_method_only, unlink, unlink_method_only};
use crate::server::handlers;
use crate::server::state::CrudState;
use axum::{
    Router,
    routing::{MethodRouter, delete, get, post},
};
use indexmap::IndexMap;
use serde::Serialize;

/// Operation served by a registered route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrudOperation {
    Save,
    List,
    Page,
    Get,
    Delete,
    Link,
    Unlink,
}

/// One registered (method, path) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub method: String,
    pub path: String,
    pub operation: CrudOperation,
}

/// Which handler groups a mapping asked for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteSet {
    pub save: bool,
    pub all: bool,
    pub page: bool,
    pub get: bool,
    pub delete: bool,
    pub link_method: bool,
    pub link_url: bool,
}

impl RouteSet {
    /// delete + get + page + save
    pub fn base() -> Self {
        Self {
            save: true,
            page: true,
            get: true,
            delete: true,
            ..Default::default()
        }
    }

    /// Every handler, both link variants included
    pub fn full() -> Self {
        Self {
            all: true,
            link_method: true,
            link_url: true,
            ..Self::base()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Normalize a base path: leading slash, no trailing slash
pub fn normalize_base(base: &str) -> String {
    let trimmed = base.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Build the routes of entity `T` under `base`
///
/// Returns the router (state already applied) and the list of registered
/// routes.
pub fn build_entity_routes<T: Entity>(
    state: CrudState<T>,
    base: &str,
    set: RouteSet,
    placement: LinkMethodPlacement,
) -> (Router, Vec<RouteInfo>) {
    let base = normalize_base(base);
    let item = format!("{}/{{id}}", base);
    let link_path = format!("{}/link", item);
    let unlink_path = format!("{}/unlink", item);

    let mut table = RouteTable::new(state.descriptor.kind);

    if set.save {
        table.add(&base, post(handlers::save::<T>), &[("POST", CrudOperation::Save)]);
    }
    if set.all {
        table.add(&base, get(handlers::list::<T>), &[("GET", CrudOperation::List)]);
    }
    if set.page {
        table.add(
            &format!("{}.page", base),
            get(handlers::page::<T>),
            &[("GET", CrudOperation::Page)],
        );
    }
    if set.get {
        table.add(&item, get(handlers::get::<T>), &[("GET", CrudOperation::Get)]);
    }
    if set.delete {
        table.add(
            &item,
            delete(handlers::delete::<T>),
            &[("DELETE", CrudOperation::Delete)],
        );
    }
    if set.link_url {
        table.add(&link_path, get(link::<T>), &[("GET", CrudOperation::Link)]);
        table.add(&unlink_path, get(unlink::<T>), &[("GET", CrudOperation::Unlink)]);
    }
    if set.link_method {
        match placement {
            LinkMethodPlacement::Resource => table.add(
                &item,
                MethodRouter::new().fallback(link_by_method::<T>),
                &[("LINK", CrudOperation::Link), ("UNLINK", CrudOperation::Unlink)],
            ),
            LinkMethodPlacement::ActionPath => {
                table.add(
                    &link_path,
                    MethodRouter::new().fallback(link_method_only::<T>),
                    &[("LINK", CrudOperation::Link)],
                );
                table.add(
                    &unlink_path,
                    MethodRouter::new().fallback(unlink_method_only::<T>),
                    &[("UNLINK", CrudOperation::Unlink)],
                );
            }
        }
    }

    table.into_router(state)
}

/// Method routers grouped by path, merged as they are added
struct RouteTable<T> {
    kind: &'static str,
    paths: IndexMap<String, MethodRouter<CrudState<T>>>,
    infos: Vec<RouteInfo>,
}

impl<T: Entity> RouteTable<T> {
    fn new(kind: &'static str) -> Self {
        Self {
            kind,
            paths: IndexMap::new(),
            infos: Vec::new(),
        }
    }

    fn add(
        &mut self,
        path: &str,
        route: MethodRouter<CrudState<T>>,
        served: &[(&str, CrudOperation)],
    ) {
        for (method, operation) in served {
            tracing::debug!(kind = self.kind, method, path, ?operation, "route registered");
            self.infos.push(RouteInfo {
                method: method.to_string(),
                path: path.to_string(),
                operation: *operation,
            });
        }

        let route = match self.paths.swap_remove(path) {
            Some(existing) => existing.merge(route),
            None => route,
        };
        self.paths.insert(path.to_string(), route);
    }

    fn into_router(self, state: CrudState<T>) -> (Router, Vec<RouteInfo>) {
        let router = self
            .paths
            .into_iter()
            .fold(Router::new(), |router, (path, route)| router.route(&path, route))
            .with_state(state);

        (router, self.infos)
    }
}
