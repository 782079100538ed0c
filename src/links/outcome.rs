//! Per-target outcomes of a link or unlink request

use crate::core::error::StorageError;
use axum::http::Method;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Count reported when it could not be read
pub const UNKNOWN_COUNT: i64 = -1;

/// Which mutation a request performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkOperation {
    Link,
    Unlink,
}

impl LinkOperation {
    /// Map the non-standard `LINK` / `UNLINK` HTTP methods
    pub fn from_method(method: &Method) -> Option<Self> {
        match method.as_str() {
            "LINK" => Some(Self::Link),
            "UNLINK" => Some(Self::Unlink),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Unlink => "unlink",
        }
    }
}

impl fmt::Display for LinkOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Ok,
    Err,
}

/// A fault raised while mutating an association
#[derive(Debug, thiserror::Error)]
pub enum LinkFault {
    #[error("to-one association '{field}' already holds a target")]
    AlreadyAssigned { field: &'static str },

    #[error("association '{field}' is not a collection")]
    NotAppendable { field: &'static str },

    #[error("{kind} does not accept the appended target: {message}")]
    Decode { kind: &'static str, message: String },

    #[error("{0}")]
    Persist(StorageError),

    #[error("{0}")]
    Count(StorageError),
}

/// Why one (field, target) pair did not succeed
#[derive(Debug)]
pub enum LinkFailure {
    /// The query key matches no association of the root
    FieldNotFound,

    /// The target id matches no record
    TargetNotFound,

    /// The backend failed while looking up the target
    Lookup(StorageError),

    /// The mutation step itself failed
    Fault {
        count_before: Option<usize>,
        fault: LinkFault,
    },
}

/// Result of one link/unlink attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkOutcome {
    pub message: String,
    pub status: OutcomeStatus,
    pub operation: LinkOperation,
    pub count_after: i64,
    pub count_before: i64,
}

impl LinkOutcome {
    pub fn succeeded(
        operation: LinkOperation,
        root_id: &str,
        target_id: &str,
        count_before: usize,
        count_after: usize,
    ) -> Self {
        let arrow = match operation {
            LinkOperation::Link => "->",
            LinkOperation::Unlink => "-/->",
        };

        Self {
            message: format!("ID:{} {} {} (ok)", root_id, arrow, target_id),
            status: OutcomeStatus::Ok,
            operation,
            count_after: as_count(count_after),
            count_before: as_count(count_before),
        }
    }

    pub fn failed(
        operation: LinkOperation,
        root_id: &str,
        target_id: &str,
        failure: &LinkFailure,
    ) -> Self {
        let (message, count_before) = match failure {
            LinkFailure::FieldNotFound => (
                format!("ID:{} -> {}(err)(Field Not Found)", root_id, target_id),
                None,
            ),
            LinkFailure::TargetNotFound => (
                format!("ID:{} -> {}(err)(Status Not Found)", root_id, target_id),
                None,
            ),
            LinkFailure::Lookup(err) => (
                format!("ID:{} -> {}(err)({})", root_id, target_id, err),
                None,
            ),
            LinkFailure::Fault {
                count_before,
                fault,
            } => (
                format!("ID:{} -> {} (err) {}.", root_id, target_id, fault),
                *count_before,
            ),
        };

        Self {
            message,
            status: OutcomeStatus::Err,
            operation,
            count_after: UNKNOWN_COUNT,
            count_before: count_before.map(as_count).unwrap_or(UNKNOWN_COUNT),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == OutcomeStatus::Ok
    }
}

fn as_count(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

/// Outcomes keyed by [`outcome_key`], in processing order
pub type LinkReport = IndexMap<String, LinkOutcome>;

/// Composite key of an outcome: field, root id and target id
///
/// `outcome_key("categories", "1", "2")` is `"categories1_2"`.
pub fn outcome_key(field: &str, root_id: &str, target_id: &str) -> String {
    format!("{}{}_{}", field, root_id, target_id)
}
