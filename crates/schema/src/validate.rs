//! Structural validation walker.
//!
//! Walks a document against a [`Schema`], collecting every issue found rather
//! than stopping at the first, and builds the sanitized copy returned to the
//! caller. Sanitization is where unknown-field policy is applied.

use serde_json::{Map, Value};

use crate::error::Issue;
use crate::schema::Schema;

/// Policy for record fields not named by the schema.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnknownFields {
    /// Drop unknown fields from the sanitized value.
    #[default]
    Strip,
    /// Report each unknown field as an error (strict mode).
    Reject,
}

/// Options applied to one validation pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValidateOptions {
    pub unknown_fields: UnknownFields,
}

impl ValidateOptions {
    pub fn strict() -> Self {
        Self {
            unknown_fields: UnknownFields::Reject,
        }
    }
}

fn child_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

fn index_path(path: &str, index: usize) -> String {
    format!("{path}[{index}]")
}

/// Validates `value` against `schema`, appending issues to `errors`.
///
/// Returns the sanitized value when this subtree is valid, `None` otherwise.
/// Issues are always appended for every problem found, so a `None` return
/// still leaves a complete error report behind.
pub(crate) fn check(
    schema: &Schema,
    value: &Value,
    path: &str,
    opts: &ValidateOptions,
    errors: &mut Vec<Issue>,
) -> Option<Value> {
    match schema {
        Schema::Any => Some(value.clone()),

        Schema::Bool => match value {
            Value::Bool(b) => Some(Value::Bool(*b)),
            _ => {
                errors.push(Issue::new(path, "must be a boolean"));
                None
            }
        },

        Schema::Int(spec) => {
            let Some(n) = value.as_i64() else {
                errors.push(Issue::new(path, "must be an integer"));
                return None;
            };
            let mut ok = true;
            if let Some(min) = spec.min
                && n < min
            {
                errors.push(Issue::new(path, format!("must be >= {min}")));
                ok = false;
            }
            if let Some(max) = spec.max
                && n > max
            {
                errors.push(Issue::new(path, format!("must be <= {max}")));
                ok = false;
            }
            ok.then(|| Value::from(n))
        }

        Schema::Float(spec) => {
            let Some(n) = value.as_f64() else {
                errors.push(Issue::new(path, "must be a number"));
                return None;
            };
            let mut ok = true;
            if let Some(min) = spec.min
                && n < min
            {
                errors.push(Issue::new(path, format!("must be >= {min}")));
                ok = false;
            }
            if let Some(max) = spec.max
                && n > max
            {
                errors.push(Issue::new(path, format!("must be <= {max}")));
                ok = false;
            }
            ok.then(|| value.clone())
        }

        Schema::Str(spec) => {
            let Some(s) = value.as_str() else {
                errors.push(Issue::new(path, "must be a string"));
                return None;
            };
            let mut ok = true;
            if spec.non_empty && s.trim().is_empty() {
                errors.push(Issue::new(path, "must not be empty"));
                ok = false;
            }
            if let Some(min) = spec.min_len
                && s.chars().count() < min
            {
                errors.push(Issue::new(path, format!("must be at least {min} characters")));
                ok = false;
            }
            if let Some(max) = spec.max_len
                && s.chars().count() > max
            {
                errors.push(Issue::new(path, format!("must be at most {max} characters")));
                ok = false;
            }
            if let Some(allowed) = &spec.one_of
                && !allowed.iter().any(|a| a == s)
            {
                errors.push(Issue::new(
                    path,
                    format!("must be one of: {}", allowed.join(", ")),
                ));
                ok = false;
            }
            ok.then(|| Value::from(s))
        }

        Schema::Record(record) => {
            let Some(map) = value.as_object() else {
                errors.push(Issue::new(path, "must be a record"));
                return None;
            };
            let before = errors.len();
            let mut sanitized = Map::new();

            for f in &record.fields {
                match map.get(&f.name) {
                    Some(child) => {
                        if let Some(clean) =
                            check(&f.schema, child, &child_path(path, &f.name), opts, errors)
                        {
                            sanitized.insert(f.name.clone(), clean);
                        }
                    }
                    None if f.required => {
                        errors.push(Issue::new(
                            child_path(path, &f.name),
                            "required field is missing",
                        ));
                    }
                    None => {}
                }
            }

            if opts.unknown_fields == UnknownFields::Reject {
                for key in map.keys() {
                    if !record.fields.iter().any(|f| &f.name == key) {
                        errors.push(Issue::new(child_path(path, key), "unknown field"));
                    }
                }
            }

            (errors.len() == before).then(|| Value::Object(sanitized))
        }

        Schema::Map(value_schema) => {
            let Some(map) = value.as_object() else {
                errors.push(Issue::new(path, "must be a record"));
                return None;
            };
            let before = errors.len();
            let mut sanitized = Map::new();
            for (key, child) in map {
                if let Some(clean) =
                    check(value_schema, child, &child_path(path, key), opts, errors)
                {
                    sanitized.insert(key.clone(), clean);
                }
            }
            (errors.len() == before).then(|| Value::Object(sanitized))
        }

        Schema::Seq(item_schema) => {
            let Some(items) = value.as_array() else {
                errors.push(Issue::new(path, "must be a sequence"));
                return None;
            };
            let before = errors.len();
            let mut sanitized = Vec::with_capacity(items.len());
            for (i, child) in items.iter().enumerate() {
                if let Some(clean) = check(item_schema, child, &index_path(path, i), opts, errors) {
                    sanitized.push(clean);
                }
            }
            (errors.len() == before).then(|| Value::Array(sanitized))
        }

        Schema::Union(variants) => {
            // First structurally matching variant wins; its sanitized value is
            // kept and no variant-local errors leak into the report.
            for variant in variants {
                let mut scratch = Vec::new();
                if let Some(clean) = check(variant, value, path, opts, &mut scratch)
                    && scratch.is_empty()
                {
                    return Some(clean);
                }
            }
            errors.push(Issue::new(path, "does not match any allowed variant"));
            None
        }
    }
}
