//! Input validation utilities.
//!
//! Centralized validation helpers used across API routes.

use std::sync::LazyLock;
use validator::Validate;

use crate::error::TsmpError;

static IGN_REGEX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[A-Za-z0-9_]{1,16}$").unwrap());

/// Validate a request body, returning a TsmpError::Validation on failure.
pub fn validate_request<T: Validate>(body: &T) -> Result<(), TsmpError> {
    body.validate().map_err(|e| TsmpError::Validation {
        message: format_validation_errors(e),
    })
}

/// Format validation errors into a human-readable string.
fn format_validation_errors(errors: validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for '{field}'"))
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

/// Whether `name` could be a Minecraft username at all.
///
/// Names failing this check can never resolve to a profile.
pub fn is_plausible_ign(name: &str) -> bool {
    IGN_REGEX.is_match(name)
}
