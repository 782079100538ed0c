//! Generic CRUD handlers
//!
//! Each handler is instantiated once per mapped entity type and reads its
//! store, descriptor and validation hooks from [`CrudState`]. Only missing
//! records change the status line (404); validation and backend errors are
//! answered with HTTP 200 and an error body.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};

use crate::core::entity::Entity;
use crate::core::error::{CrudError, StorageError};
use crate::core::query::{PageQuery, PageRequest, QueryResult};
use crate::server::state::CrudState;

/// POST `B`: insert or update one entity
pub async fn save<T: Entity>(State(state): State<CrudState<T>>, body: Bytes) -> Response {
    let entity: T = match serde_json::from_slice(&body) {
        Ok(entity) => entity,
        Err(err) => return Json(CrudError::invalid_payload(err)).into_response(),
    };

    if let Err(err) = state.capabilities.check_save(&entity, &state.store).await {
        return Json(err).into_response();
    }

    let result = match state.store.save(&entity).await {
        Ok(saved) => QueryResult::ok(saved, 1),
        Err(err) => backend_failure(&state, "save", err),
    };

    Json(result).into_response()
}

/// GET `B`: every entity, ordered by id
pub async fn list<T: Entity>(State(state): State<CrudState<T>>) -> Response {
    match state.store.all::<T>().await {
        Ok(entities) => Json(entities).into_response(),
        Err(err) => Json(backend_failure::<T, Vec<T>>(&state, "list", err)).into_response(),
    }
}

/// GET `B.page?page=N&limit=M`: one page, newest first
pub async fn page<T: Entity>(
    State(state): State<CrudState<T>>,
    Query(query): Query<PageQuery>,
) -> Response {
    let request = PageRequest::new(query.page(), query.limit(), state.default_limit);

    match state.store.paginate::<T>(request).await {
        Ok(paginator) => Json(paginator).into_response(),
        Err(err) => Json(backend_failure::<T, T>(&state, "page", err)).into_response(),
    }
}

/// GET `B/{id}`
pub async fn get<T: Entity>(
    State(state): State<CrudState<T>>,
    Path(id): Path<String>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return CrudError::not_found().into_response();
    };

    match state.store.find::<T>(id).await {
        Ok(Some(entity)) => Json(entity).into_response(),
        Ok(None) => CrudError::not_found().into_response(),
        Err(err) => Json(backend_failure::<T, T>(&state, "get", err)).into_response(),
    }
}

/// DELETE `B/{id}`: echoes the deleted entity
pub async fn delete<T: Entity>(
    State(state): State<CrudState<T>>,
    Path(id): Path<String>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return CrudError::not_found().into_response();
    };

    let entity = match state.store.find::<T>(id).await {
        Ok(Some(entity)) => entity,
        Ok(None) => return CrudError::not_found().into_response(),
        Err(err) => return Json(backend_failure::<T, T>(&state, "delete", err)).into_response(),
    };

    if let Err(err) = state.capabilities.check_delete(&entity, &state.store).await {
        return Json(err).into_response();
    }

    match state.store.delete::<T>(id).await {
        Ok(true) => Json(entity).into_response(),
        Ok(false) => CrudError::not_found().into_response(),
        Err(err) => Json(backend_failure::<T, T>(&state, "delete", err)).into_response(),
    }
}

fn parse_id(raw: &str) -> Option<u64> {
    raw.trim().parse().ok()
}

fn backend_failure<T, V>(state: &CrudState<T>, operation: &str, err: StorageError) -> QueryResult<V> {
    tracing::warn!(
        kind = state.descriptor.kind,
        operation,
        error = %err,
        "backend error reported in body"
    );
    QueryResult::failed(err)
}
