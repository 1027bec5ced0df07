use coven_schema::SchemaError;
use thiserror::Error;

/// Errors surfaced by the middleware when throwing was requested.
///
/// With `throw_on_error` off (the default), validation failures come back as
/// [`coven_schema::ValidationResult::Invalid`] instead.
#[derive(Debug, Error)]
pub enum MiddlewareError {
    #[error(transparent)]
    Validation(#[from] SchemaError),
}
