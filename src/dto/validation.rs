//! Validation helpers for DTOs.

use validator::{ValidationError, ValidationErrors};

/// Record `field` as missing when `value` is absent, passing the value through otherwise.
///
/// Lets a request collect every missing field before failing.
///
/// # Examples
///
/// ```ignore
/// let mut errors = ValidationErrors::new();
/// let round = require(&mut errors, "round_id", Some(1)); // Some(1)
/// let answer = require::<String>(&mut errors, "answer", None); // None, error recorded
/// ```
pub fn require<T>(errors: &mut ValidationErrors, field: &'static str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        let mut err = ValidationError::new("required");
        err.message = Some(format!("missing '{field}'").into());
        errors.add(field, err);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_values_pass_through() {
        let mut errors = ValidationErrors::new();
        assert_eq!(require(&mut errors, "round_id", Some(3)), Some(3));
        assert!(errors.field_errors().is_empty());
    }

    #[test]
    fn every_missing_field_is_recorded() {
        let mut errors = ValidationErrors::new();
        require::<i64>(&mut errors, "round_id", None);
        require::<String>(&mut errors, "answer", None);

        let fields = errors.field_errors();
        assert_eq!(fields.len(), 2);
        assert!(fields.contains_key("round_id"));
        assert!(fields.contains_key("answer"));
    }
}
