//! Field-level validation error map for 422 responses.
//!
//! Collects per-field messages across all rules before failing, so a single
//! response reports every invalid field (`{"message": ..., "errors":
//! {field: [messages]}}`).

use std::collections::BTreeMap;

use serde::Serialize;

/// Accumulator of per-field validation messages.
///
/// Fields are keyed the way they appear in the request payload; array-valued
/// fields use dotted indices (`items.0.quantity`).
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Creates an empty error map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message for a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_default().push(message.into());
    }

    /// Adds a message for an indexed array field (`items.3.quantity`).
    pub fn add_indexed(&mut self, prefix: &str, index: usize, field: &str, message: impl Into<String>) {
        self.add(format!("{prefix}.{index}.{field}"), message);
    }

    /// True if no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the messages recorded for a field, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    /// Merges another error map into this one.
    pub fn merge(&mut self, other: Self) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
    }

    /// Consumes the accumulator: `Ok(())` when empty, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Standard message for a required field.
#[must_use]
pub fn required(attribute: &str) -> String {
    format!("The {attribute} field is required.")
}

/// Standard message for a numeric lower bound.
#[must_use]
pub fn min_zero(attribute: &str) -> String {
    format!("The {attribute} must be at least 0.")
}

/// Standard message for an unparseable date.
#[must_use]
pub fn invalid_date(attribute: &str) -> String {
    format!("The {attribute} is not a valid date.")
}

/// Standard message for a cross-organization reference.
#[must_use]
pub fn not_in_organization(entity: &str) -> String {
    format!("The {entity} does not belong to the organization.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_map_is_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_messages_accumulate_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add("due_date", "The due date is not a valid date.");
        errors.add("due_date", "The due date must be on or after the issue date.");
        errors.add("total_amount", min_zero("total amount"));

        let errors = errors.into_result().unwrap_err();
        assert_eq!(errors.get("due_date").unwrap().len(), 2);
        assert_eq!(errors.get("total_amount").unwrap().len(), 1);
    }

    #[test]
    fn test_indexed_fields_use_dotted_keys() {
        let mut errors = ValidationErrors::new();
        errors.add_indexed("items", 2, "quantity", min_zero("product quantity"));
        assert!(errors.get("items.2.quantity").is_some());
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut errors = ValidationErrors::new();
        errors.add("email", required("email"));
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["email"][0], "The email field is required.");
    }

    #[test]
    fn test_cross_reference_message_shape() {
        assert_eq!(
            not_in_organization("customer"),
            "The customer does not belong to the organization."
        );
    }
}
