//! CrudMapper: fluent API registering entity handlers on a router

use super::router::{RouteInfo, RouteSet, build_entity_routes};
use super::state::CrudState;
use crate::config::{CrudConfig, LinkMethodPlacement};
use crate::core::entity::Entity;
use crate::core::query::DEFAULT_PAGE_LIMIT;
use crate::core::store::Store;
use crate::core::validation::{
    Capabilities, DeleteValidation, SaveValidation, ValidateDelete, ValidateSave, Validator,
};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Builder mapping entity types onto REST routes
///
/// # Example
///
/// ```ignore
/// let app = CrudMapper::new(Store::new(InMemoryBackend::new()))
///     .map::<Note>("/api/v1/note").full()
///     .map::<Category>("/api/v1/category")
///         .full()
///         .with_save_validation()
///         .with_delete_validation()
///     .build();
/// ```
pub struct CrudMapper {
    store: Store,
    router: Router,
    routes: Vec<RouteInfo>,
    default_limit: usize,
    placement: LinkMethodPlacement,
}

impl CrudMapper {
    /// Create a mapper whose handlers share `store`
    pub fn new(store: Store) -> Self {
        Self {
            store,
            router: Router::new(),
            routes: Vec::new(),
            default_limit: DEFAULT_PAGE_LIMIT,
            placement: LinkMethodPlacement::default(),
        }
    }

    /// Apply pagination and route settings
    ///
    /// Only affects entities mapped after this call.
    pub fn with_config(mut self, config: &CrudConfig) -> Self {
        self.default_limit = config.pagination.default_limit;
        self.placement = config.routes.link_method_placement;
        self
    }

    /// Add routes that are not entity handlers
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.router = self.router.merge(routes);
        self
    }

    /// Start mapping entity `T` under `base`
    pub fn map<T: Entity>(self, base: impl Into<String>) -> EntityMapping<T> {
        EntityMapping {
            mapper: self,
            base: base.into(),
            set: RouteSet::default(),
            capabilities: Capabilities::default(),
        }
    }

    /// Every route registered so far
    pub fn routes(&self) -> &[RouteInfo] {
        &self.routes
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Finish and return the router, with request tracing
    pub fn build(self) -> Router {
        self.router
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
    }

    /// Build and serve with graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        serve(self.build(), addr).await
    }
}

/// Handler selection and validation hooks for one entity
///
/// Routes are registered when the mapping is closed with [`done`](Self::done)
/// (or implicitly by [`map`](Self::map) / [`build`](Self::build)), so
/// validation hooks apply whatever order the calls come in.
pub struct EntityMapping<T: Entity> {
    mapper: CrudMapper,
    base: String,
    set: RouteSet,
    capabilities: Capabilities<T>,
}

impl<T: Entity> EntityMapping<T> {
    /// POST `B`
    pub fn save(mut self) -> Self {
        self.set.save = true;
        self
    }

    /// GET `B`
    pub fn all(mut self) -> Self {
        self.set.all = true;
        self
    }

    /// GET `B.page`
    pub fn page(mut self) -> Self {
        self.set.page = true;
        self
    }

    /// GET `B/{id}`
    pub fn get(mut self) -> Self {
        self.set.get = true;
        self
    }

    /// DELETE `B/{id}`
    pub fn delete(mut self) -> Self {
        self.set.delete = true;
        self
    }

    /// LINK / UNLINK methods
    pub fn link_method(mut self) -> Self {
        self.set.link_method = true;
        self
    }

    /// GET `B/{id}/link` and GET `B/{id}/unlink`
    pub fn link_url(mut self) -> Self {
        self.set.link_url = true;
        self
    }

    /// delete + get + page + save
    pub fn base(mut self) -> Self {
        self.set = RouteSet {
            all: self.set.all,
            link_method: self.set.link_method,
            link_url: self.set.link_url,
            ..RouteSet::base()
        };
        self
    }

    /// all + delete + get + link_method + link_url + page + save
    pub fn full(mut self) -> Self {
        self.set = RouteSet::full();
        self
    }

    /// Run [`ValidateSave`] before every save
    pub fn with_save_validation(mut self) -> Self
    where
        T: ValidateSave,
    {
        self.capabilities.save = Some(Arc::new(SaveValidation));
        self
    }

    /// Run [`ValidateDelete`] before every delete
    pub fn with_delete_validation(mut self) -> Self
    where
        T: ValidateDelete,
    {
        self.capabilities.delete = Some(Arc::new(DeleteValidation));
        self
    }

    /// Run a custom validator before every save
    pub fn with_save_validator(mut self, validator: impl Validator<T> + 'static) -> Self {
        self.capabilities.save = Some(Arc::new(validator));
        self
    }

    /// Run a custom validator before every delete
    pub fn with_delete_validator(mut self, validator: impl Validator<T> + 'static) -> Self {
        self.capabilities.delete = Some(Arc::new(validator));
        self
    }

    /// Register the selected routes and return to the mapper
    pub fn done(self) -> CrudMapper {
        let EntityMapping {
            mut mapper,
            base,
            set,
            capabilities,
            ..
        } = self;

        if set.is_empty() {
            tracing::warn!(base = base.as_str(), kind = T::kind(), "entity mapped without routes");
            return mapper;
        }

        let state = CrudState::<T>::new(mapper.store.clone())
            .with_capabilities(capabilities)
            .with_default_limit(mapper.default_limit);

        let (router, routes) = build_entity_routes(state, &base, set, mapper.placement);
        mapper.router = mapper.router.merge(router);
        mapper.routes.extend(routes);
        mapper
    }

    /// Close this mapping and start the next one
    pub fn map<U: Entity>(self, base: impl Into<String>) -> EntityMapping<U> {
        self.done().map(base)
    }

    /// Close this mapping and build the router
    pub fn build(self) -> Router {
        self.done().build()
    }
}

/// Serve a router with graceful shutdown
///
/// This will:
/// - Bind to the provided address
/// - Start serving requests
/// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
pub async fn serve(router: Router, addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!("failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
