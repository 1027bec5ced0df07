//! Input-cleaning utilities shared by the transport layer.

use coven_schema::{Issue, ValidationResult};

/// Display names are clamped to this many characters after cleaning.
pub const DISPLAY_NAME_MAX_CHARS: usize = 24;

/// Room access codes are exactly this many characters.
pub const ACCESS_CODE_LEN: usize = 6;

/// Upper bound on identifier length.
pub const IDENTIFIER_MAX_LEN: usize = 64;

fn allowed_in_display_name(c: char) -> bool {
    !c.is_control() && !matches!(c, '<' | '>' | '{' | '}' | '[' | ']' | '\\' | '`' | '"')
}

/// Cleans a free-text display name: drops control and markup-capable
/// characters, trims surrounding whitespace, and clamps the length.
///
/// May return an empty string; callers decide whether that is acceptable.
pub fn sanitize_display_name(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| allowed_in_display_name(*c)).collect();
    let clamped: String = cleaned.trim().chars().take(DISPLAY_NAME_MAX_CHARS).collect();
    clamped.trim_end().to_string()
}

/// Room codes are exactly six uppercase ASCII alphanumerics.
pub fn validate_access_code(code: &str) -> bool {
    code.len() == ACCESS_CODE_LEN
        && code
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// Generic identifier shape: `[A-Za-z0-9_-]`, 1 to 64 characters.
pub fn validate_identifier(id: &str) -> bool {
    (1..=IDENTIFIER_MAX_LEN).contains(&id.len())
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Flat, human-readable lines from a validation outcome: every error, then
/// every warning, each path-qualified.
pub fn flatten_messages(result: &ValidationResult) -> Vec<String> {
    result
        .errors()
        .iter()
        .chain(result.warnings())
        .map(Issue::to_string)
        .collect()
}
