//! Event-interceptor call shape.
//!
//! Socket-style transports install one handler per event name per
//! connection. [`EventGuard`] is the factory: it holds the spec and the
//! instance policy, and stamps out closures the transport can register.

use coven_schema::{Spec, ValidationResult};
use serde_json::Value;

use crate::middleware::{ValidationMiddleware, log_failure, validate_options};
use crate::sanitize::flatten_messages;

/// Structured error payload emitted back to the sender of an invalid event.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ErrorEvent {
    /// Name of the event whose payload failed validation.
    pub event: String,
    pub error: String,
    pub messages: Vec<String>,
}

/// What the transport should do with a checked event.
#[derive(Clone, Debug, PartialEq)]
pub enum EventOutcome {
    /// Forward the validated, stripped payload to the real handler.
    Forward(Value),
    /// Emit the error event back to the sender; do not forward.
    Reject(ErrorEvent),
}

impl EventOutcome {
    pub fn is_forward(&self) -> bool {
        matches!(self, Self::Forward(_))
    }
}

/// Per-event validation policy; stamps out per-connection handlers.
#[derive(Clone, Debug)]
pub struct EventGuard {
    spec: Spec,
    options: crate::MiddlewareOptions,
}

impl ValidationMiddleware {
    pub fn event_guard(&self, spec: Spec) -> EventGuard {
        EventGuard {
            spec,
            options: self.options(),
        }
    }
}

impl EventGuard {
    /// Checks one payload for the named event.
    pub fn check(&self, event: &str, payload: &Value) -> EventOutcome {
        self.check_with(event, payload, |_| {})
    }

    /// Like [`check`](Self::check), additionally invoking the sender's
    /// completion callback with the error when the payload is rejected.
    pub fn check_with(
        &self,
        event: &str,
        payload: &Value,
        on_error: impl FnOnce(&ErrorEvent),
    ) -> EventOutcome {
        let result = self
            .spec
            .validate_with(payload, &validate_options(&self.options));
        match result {
            ValidationResult::Valid { value, .. } => EventOutcome::Forward(value),
            invalid => {
                if self.options.log_validation_errors {
                    log_failure(&self.spec, &invalid);
                }
                let error = ErrorEvent {
                    event: event.to_string(),
                    error: format!("invalid payload for {}", self.spec.name()),
                    messages: flatten_messages(&invalid),
                };
                on_error(&error);
                EventOutcome::Reject(error)
            }
        }
    }

    /// A closure for one connection, bound to a fixed event name.
    pub fn handler(&self, event: impl Into<String>) -> impl Fn(&Value) -> EventOutcome + '_ {
        let event = event.into();
        move |payload| self.check(&event, payload)
    }
}

#[cfg(test)]
mod tests {
    use coven_schema::{Schema, field};
    use serde_json::json;

    use super::*;

    fn guard() -> EventGuard {
        ValidationMiddleware::silent().event_guard(Spec::new(
            "castAbility",
            Schema::record([
                field("abilityId", Schema::string().non_empty()),
                field("targetId", Schema::string().non_empty()),
            ]),
        ))
    }

    #[test]
    fn valid_payload_is_forwarded_stripped() {
        let outcome = guard().check(
            "castAbility",
            &json!({"abilityId": "slash", "targetId": "p2", "cheat": true}),
        );
        assert_eq!(
            outcome,
            EventOutcome::Forward(json!({"abilityId": "slash", "targetId": "p2"}))
        );
    }

    #[test]
    fn invalid_payload_rejects_and_invokes_the_callback() {
        let mut seen = None;
        let outcome = guard().check_with("castAbility", &json!({"abilityId": ""}), |err| {
            seen = Some(err.clone());
        });

        assert!(!outcome.is_forward());
        let err = seen.expect("callback must fire on rejection");
        assert_eq!(err.event, "castAbility");
        assert_eq!(err.messages.len(), 2);
    }

    #[test]
    fn handler_binds_the_event_name() {
        let guard = guard();
        let handler = guard.handler("castAbility");
        let EventOutcome::Reject(err) = handler(&json!({})) else {
            panic!("expected rejection");
        };
        assert_eq!(err.event, "castAbility");
    }
}
