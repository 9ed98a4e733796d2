//! Form field coercion shared by every draft type.
//!
//! Form controls hold strings. At submit time optional numeric fields that
//! are blank or unparseable become `None` (omitted from the payload), never
//! zero or NaN. Required fields are checked before any conversion.

use crate::error::CrmError;

/// Parses an optional integer field. Blank or invalid input yields `None`.
pub fn optional_int(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Parses an optional decimal field. Blank, invalid, or non-finite input
/// yields `None`.
pub fn optional_number(raw: &str) -> Option<serde_json::Number> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(json_number)
}

/// Parses a required decimal field.
pub fn required_number(raw: &str, label: &str) -> Result<serde_json::Number, CrmError> {
    optional_number(raw).ok_or_else(|| CrmError::validation(format!("{label} must be a number")))
}

/// Blank optional text becomes `None`.
pub fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Converts a float to a JSON number, keeping integral values integral so
/// `450000` serializes as `450000` rather than `450000.0`.
pub fn json_number(value: f64) -> Option<serde_json::Number> {
    if !value.is_finite() {
        return None;
    }
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        return Some(serde_json::Number::from(value as i64));
    }
    serde_json::Number::from_f64(value)
}

/// Renders a stored number back into a form field.
pub fn number_to_field(value: Option<f64>) -> String {
    match value {
        Some(v) => json_number(v).map(|n| n.to_string()).unwrap_or_default(),
        None => String::new(),
    }
}

/// Fails when any `(label, value)` pair is blank, naming every blank field.
pub fn require(fields: &[(&str, &str)]) -> Result<(), CrmError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| *label)
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(CrmError::validation(missing_message(&missing)))
}

/// Fails when `value` is not one of `allowed`.
pub fn require_one_of(label: &str, value: &str, allowed: &[&str]) -> Result<(), CrmError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(CrmError::validation(format!("Unknown {label} '{value}'")))
    }
}

fn missing_message(labels: &[&str]) -> String {
    match labels {
        [] => String::new(),
        [one] => format!("{one} is required"),
        [first, middle @ .., last] => {
            let mut head = first.to_string();
            for label in middle {
                head.push_str(", ");
                head.push_str(&label.to_lowercase());
            }
            format!("{head} and {} are required", last.to_lowercase())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_invalid_optionals_are_none() {
        assert_eq!(optional_int(""), None);
        assert_eq!(optional_int("  "), None);
        assert_eq!(optional_int("three"), None);
        assert_eq!(optional_int(" 4 "), Some(4));
        assert!(optional_number("NaN").is_none());
        assert!(optional_number("inf").is_none());
        assert!(optional_number("").is_none());
    }

    #[test]
    fn integral_numbers_stay_integral() {
        assert_eq!(
            serde_json::Value::Number(optional_number("450000").unwrap()),
            serde_json::json!(450000)
        );
        assert_eq!(
            serde_json::Value::Number(optional_number("2.5").unwrap()),
            serde_json::json!(2.5)
        );
        assert_eq!(number_to_field(Some(3.0)), "3");
        assert_eq!(number_to_field(None), "");
    }

    #[test]
    fn require_names_all_missing_fields() {
        let err = require(&[("First name", " "), ("Email", "")]).unwrap_err();
        assert_eq!(err.message(), "First name and email are required");

        let err = require(&[("Address", ""), ("City", "Austin"), ("Zip code", "")]).unwrap_err();
        assert_eq!(err.message(), "Address and zip code are required");

        let err = require(&[("Name", ""), ("Specialty", ""), ("State", "")]).unwrap_err();
        assert_eq!(err.message(), "Name, specialty and state are required");

        assert!(require(&[("Name", "x")]).is_ok());
    }

    #[test]
    fn required_number_rejects_garbage() {
        let err = required_number("lots", "Listing price").unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert_eq!(err.message(), "Listing price must be a number");
    }

    #[test]
    fn require_one_of_checks_membership() {
        assert!(require_one_of("lead status", "new", &["new", "lost"]).is_ok());
        let err = require_one_of("lead status", "maybe", &["new", "lost"]).unwrap_err();
        assert_eq!(err.message(), "Unknown lead status 'maybe'");
    }
}
