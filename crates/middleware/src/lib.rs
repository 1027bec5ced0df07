//! Transport-agnostic validation middleware.
//!
//! One validation core, three call shapes: a bare [`ValidationMiddleware::validate`]
//! usable from anywhere, request guards that validate and sanitize one part
//! of an inbound request in-place, and event guards for socket-style
//! transports. All three share the same specs the content loaders use, so
//! inbound messages are checked against the exact shapes the game data obeys.

pub mod error;
pub mod event;
pub mod middleware;
pub mod request;
pub mod sanitize;

pub use error::MiddlewareError;
pub use event::{ErrorEvent, EventGuard, EventOutcome};
pub use middleware::{CallOptions, MiddlewareOptions, ValidationMiddleware};
pub use request::{Rejection, RequestPart, RequestParts};
pub use sanitize::{
    flatten_messages, sanitize_display_name, validate_access_code, validate_identifier,
};

// Transports need the spec types (including partial/deep-partial derivation)
// without depending on the schema crate directly.
pub use coven_schema::{Schema, Severity, Spec, UnknownFields, ValidationResult, field, optional};
