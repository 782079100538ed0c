//! Bridge from derive-based field rules to `CrudError`

use crate::core::error::CrudError;
use axum::http::StatusCode;
use validator::{Validate, ValidationErrors};

/// Run the `validator` rules of an entity
///
/// Intended for [`ValidateSave`](super::ValidateSave) implementations that
/// want declarative field checks:
///
/// ```rust,ignore
/// #[derive(Validate, ...)]
/// struct Author {
///     #[validate(length(min = 1))]
///     name: String,
/// }
///
/// #[async_trait]
/// impl ValidateSave for Author {
///     async fn validate_save(&self, _store: &Store) -> Result<(), CrudError> {
///         validate_fields(self)
///     }
/// }
/// ```
pub fn validate_fields<T: Validate>(entity: &T) -> Result<(), CrudError> {
    entity
        .validate()
        .map_err(|errors| CrudError::new(describe(&errors), StatusCode::BAD_REQUEST.as_u16()))
}

/// One `field: reason` entry per failing rule, sorted by field name
fn describe(errors: &ValidationErrors) -> String {
    let mut entries: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, failures)| {
            failures.iter().map(move |failure| {
                let reason = failure
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| failure.code.to_string());
                format!("{}: {}", field, reason)
            })
        })
        .collect();

    entries.sort();
    entries.join("; ")
}
