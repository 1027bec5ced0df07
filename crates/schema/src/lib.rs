//! Declarative schema validation for configuration documents.
//!
//! `coven-schema` checks untyped configuration documents (`serde_json::Value`)
//! against a composable [`Spec`] and yields either a sanitized value or a
//! structured list of path-qualified issues. Content loaders and the validation
//! middleware share this layer so that files on disk and inbound payloads are
//! checked by the same specifications.
//!
//! A [`Spec`] is a [`Schema`] root plus an ordered list of [`Refinement`]s —
//! named invariants evaluated on the already-structurally-valid value, able to
//! span multiple fields or entries.

pub mod error;
pub mod schema;
pub mod spec;
pub mod validate;

pub use error::{Issue, SchemaError, ValidationResult};
pub use schema::{FieldSchema, Schema, field, optional};
pub use spec::{Refinement, Severity, Spec};
pub use validate::{UnknownFields, ValidateOptions};
