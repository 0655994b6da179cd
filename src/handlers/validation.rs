//! Form validation helpers.
//!
//! Mirrors the dashboard forms: every field is checked and all failures are
//! reported together as `VALIDATION_FAILED` details keyed by field name.

use serde_json::{Map, Value};

use crate::error::{ApiError, validation_error};

/// Message shown for a required field that is missing or too short.
pub const FILL_IN_FIELD: &str = "Please fill in this field";

/// Collects per-field validation failures
#[derive(Debug, Default)]
pub struct FormErrors {
    fields: Map<String, Value>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `value` to have at least `min` characters
    pub fn min_len(&mut self, field: &str, value: &str, min: usize) -> &mut Self {
        if value.chars().count() < min {
            self.add(field, FILL_IN_FIELD);
        }
        self
    }

    pub fn add(&mut self, field: &str, message: &str) -> &mut Self {
        self.fields
            .entry(field.to_string())
            .or_insert_with(|| Value::String(message.to_string()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `Ok(())` when no field failed, otherwise a 400 carrying every failure
    pub fn finish(self) -> Result<(), ApiError> {
        if self.fields.is_empty() {
            Ok(())
        } else {
            Err(validation_error(
                "Validation failed",
                Value::Object(self.fields),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn collects_all_failures() {
        let mut errors = FormErrors::new();
        errors
            .min_len("name", "A", 2)
            .min_len("city", "", 1)
            .min_len("state", "CA", 1);

        let err = errors.finish().unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        let details = err.details.unwrap();
        assert_eq!(details["name"], FILL_IN_FIELD);
        assert_eq!(details["city"], FILL_IN_FIELD);
        assert!(details.get("state").is_none());
    }

    #[test]
    fn counts_characters_not_bytes() {
        let mut errors = FormErrors::new();
        errors.min_len("name", "é", 2);
        assert!(!errors.is_empty());
    }

    #[test]
    fn empty_form_errors_pass() {
        assert!(FormErrors::new().finish().is_ok());
    }
}
