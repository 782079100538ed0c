//! HTTP handlers for link and unlink
//!
//! A request names a root entity by id and, in its query string, the
//! association fields to change:
//!
//! ```text
//! GET /api/v1/category/1/link?categories=2&categories=3&notes=7
//! LINK /api/v1/category/1?categories=2
//! ```
//!
//! Every (field, target) pair is processed in order and reported on its own
//! in the response. A failing pair never stops the ones after it.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::Method,
    response::{IntoResponse, Response},
};
use indexmap::IndexMap;
use serde_json::Value;

use crate::core::association::AssociationAccessor;
use crate::core::entity::{Cardinality, Entity};
use crate::core::error::{CrudError, StorageError};
use crate::core::query::QueryResult;
use crate::links::outcome::{
    LinkFailure, LinkFault, LinkOperation, LinkOutcome, LinkReport, outcome_key,
};
use crate::server::state::CrudState;

/// Target ids grouped by query key, in request order
pub type LinkTargets = IndexMap<String, Vec<String>>;

/// Why a link request was rejected as a whole
#[derive(Debug)]
pub enum RootLookup {
    NotFound,
    Failed(StorageError),
}

/// Group raw query pairs by key; repeated keys accumulate
pub fn group_targets(pairs: Vec<(String, String)>) -> LinkTargets {
    let mut targets = LinkTargets::new();
    for (field, target) in pairs {
        targets.entry(field).or_default().push(target);
    }
    targets
}

/// GET `B/{id}/link`
pub async fn link<T: Entity>(
    State(state): State<CrudState<T>>,
    Path(id): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    respond(&state, &id, LinkOperation::Link, group_targets(pairs)).await
}

/// GET `B/{id}/unlink`
pub async fn unlink<T: Entity>(
    State(state): State<CrudState<T>>,
    Path(id): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    respond(&state, &id, LinkOperation::Unlink, group_targets(pairs)).await
}

/// `LINK` or `UNLINK` on `B/{id}`; any other method is rejected with 405
pub async fn link_by_method<T: Entity>(
    method: Method,
    state: State<CrudState<T>>,
    path: Path<String>,
    query: Query<Vec<(String, String)>>,
) -> Response {
    dispatch(
        &[LinkOperation::Link, LinkOperation::Unlink],
        method,
        state,
        path,
        query,
    )
    .await
}

/// `LINK` on `B/{id}/link`
pub async fn link_method_only<T: Entity>(
    method: Method,
    state: State<CrudState<T>>,
    path: Path<String>,
    query: Query<Vec<(String, String)>>,
) -> Response {
    dispatch(&[LinkOperation::Link], method, state, path, query).await
}

/// `UNLINK` on `B/{id}/unlink`
pub async fn unlink_method_only<T: Entity>(
    method: Method,
    state: State<CrudState<T>>,
    path: Path<String>,
    query: Query<Vec<(String, String)>>,
) -> Response {
    dispatch(&[LinkOperation::Unlink], method, state, path, query).await
}

async fn dispatch<T: Entity>(
    accepted: &[LinkOperation],
    method: Method,
    State(state): State<CrudState<T>>,
    Path(id): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    match LinkOperation::from_method(&method) {
        Some(operation) if accepted.contains(&operation) => {
            respond(&state, &id, operation, group_targets(pairs)).await
        }
        _ => CrudError::method_not_allowed().into_response(),
    }
}

async fn respond<T: Entity>(
    state: &CrudState<T>,
    root_id: &str,
    operation: LinkOperation,
    targets: LinkTargets,
) -> Response {
    match process(state, root_id, operation, &targets).await {
        Ok(report) => Json(report).into_response(),
        Err(RootLookup::NotFound) => CrudError::not_found().into_response(),
        Err(RootLookup::Failed(err)) => {
            tracing::warn!(
                kind = state.descriptor.kind,
                root_id,
                error = %err,
                "link root lookup failed"
            );
            Json(QueryResult::<Value>::failed(err)).into_response()
        }
    }
}

/// Apply every (field, target) pair of a request to the root `root_id`
pub async fn process<T: Entity>(
    state: &CrudState<T>,
    root_id: &str,
    operation: LinkOperation,
    targets: &LinkTargets,
) -> Result<LinkReport, RootLookup> {
    let id: u64 = root_id.trim().parse().map_err(|_| RootLookup::NotFound)?;
    let mut root = state
        .store
        .find_record(&state.descriptor, id)
        .await
        .map_err(RootLookup::Failed)?
        .ok_or(RootLookup::NotFound)?;

    let mut report = LinkReport::new();

    for (field, target_ids) in targets {
        for target_id in target_ids {
            let outcome = match apply(state, &mut root, id, field, target_id, operation).await {
                Ok((before, after)) => {
                    LinkOutcome::succeeded(operation, root_id, target_id, before, after)
                }
                Err(failure) => {
                    if let LinkFailure::Fault { fault, .. } = &failure {
                        tracing::warn!(
                            kind = state.descriptor.kind,
                            field = field.as_str(),
                            root_id,
                            target_id = target_id.as_str(),
                            error = %fault,
                            "{} fault",
                            operation
                        );
                    }
                    LinkOutcome::failed(operation, root_id, target_id, &failure)
                }
            };

            let key = outcome_key(field, root_id, target_id);
            tracing::debug!(key = key.as_str(), message = outcome.message.as_str(), "{}", operation);
            report.insert(key, outcome);
        }
    }

    Ok(report)
}

/// One (field, target) pair; returns the counts before and after
async fn apply<T: Entity>(
    state: &CrudState<T>,
    root: &mut Value,
    root_id: u64,
    field: &str,
    target_id: &str,
    operation: LinkOperation,
) -> Result<(usize, usize), LinkFailure> {
    let accessor = state
        .index
        .resolve(field)
        .ok_or(LinkFailure::FieldNotFound)?;

    let target_id: u64 = target_id
        .trim()
        .parse()
        .map_err(|_| LinkFailure::TargetNotFound)?;
    let target = accessor
        .resolve_target(&state.store, target_id)
        .await
        .map_err(LinkFailure::Lookup)?
        .ok_or(LinkFailure::TargetNotFound)?;

    let count_before = accessor
        .count(&state.store, root_id)
        .await
        .map_err(|e| LinkFailure::Fault {
            count_before: None,
            fault: LinkFault::Count(e),
        })?;
    let fault = |fault| LinkFailure::Fault {
        count_before: Some(count_before),
        fault,
    };

    match operation {
        LinkOperation::Link => {
            *root = attach(state, accessor, root, root_id, target_id, target)
                .await
                .map_err(fault)?;
        }
        LinkOperation::Unlink => {
            accessor
                .remove(&state.store, root_id, target_id)
                .await
                .map_err(|e| fault(LinkFault::Persist(e)))?;
        }
    }

    let count_after = accessor
        .count(&state.store, root_id)
        .await
        .map_err(|e| fault(LinkFault::Count(e)))?;

    Ok((count_before, count_after))
}

/// Append `target` on a copy of the root and add its association row
///
/// Only the row of this target is written; other rows of the root, in this
/// association or any other, are left as stored. The caller's root is only
/// replaced once the row is in place.
async fn attach<T: Entity>(
    state: &CrudState<T>,
    accessor: &AssociationAccessor,
    root: &Value,
    root_id: u64,
    target_id: u64,
    target: Value,
) -> Result<Value, LinkFault> {
    let mut candidate = root.clone();
    append(&mut candidate, accessor, target)?;

    serde_json::from_value::<T>(candidate.clone()).map_err(|e| LinkFault::Decode {
        kind: state.descriptor.kind,
        message: e.to_string(),
    })?;

    accessor
        .append(&state.store, root_id, target_id)
        .await
        .map_err(LinkFault::Persist)?;

    Ok(candidate)
}

fn append(root: &mut Value, accessor: &AssociationAccessor, target: Value) -> Result<(), LinkFault> {
    let field = accessor.field();
    let Some(object) = root.as_object_mut() else {
        return Err(LinkFault::NotAppendable { field });
    };
    let slot = object.entry(field).or_insert(Value::Null);

    match accessor.cardinality() {
        Cardinality::Many => {
            if slot.is_null() {
                *slot = Value::Array(Vec::new());
            }
            match slot.as_array_mut() {
                Some(items) => items.push(target),
                None => return Err(LinkFault::NotAppendable { field }),
            }
        }
        Cardinality::One => {
            if !slot.is_null() {
                return Err(LinkFault::AlreadyAssigned { field });
            }
            *slot = target;
        }
    }

    Ok(())
}
