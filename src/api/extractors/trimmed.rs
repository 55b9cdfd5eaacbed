//! Serde helpers that strip surrounding whitespace from request strings.
//!
//! Used with `#[serde(deserialize_with = ...)]` so `validator` rules run on
//! the trimmed value: a padded email is well-formed and a blank name is empty.

use serde::{Deserialize, Deserializer};

pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().to_string())
}

/// Optional variant. Pair it with `#[serde(default)]` so the field may be absent.
pub fn trimmed_option<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.map(|value| value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Debug, Deserialize, Validate)]
    struct Form {
        #[serde(deserialize_with = "trimmed")]
        #[validate(email)]
        email: String,
        #[serde(default, deserialize_with = "trimmed_option")]
        #[validate(length(min = 1))]
        name: Option<String>,
    }

    #[test]
    fn test_padded_email_validates_after_trim() {
        let form: Form = serde_json::from_str(r#"{"email": " Ana@X.com "}"#).unwrap();
        assert_eq!(form.email, "Ana@X.com");
        assert_eq!(form.name, None);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_blank_name_becomes_empty() {
        let form: Form =
            serde_json::from_str(r#"{"email": "ana@x.com", "name": "   "}"#).unwrap();
        assert_eq!(form.name.as_deref(), Some(""));

        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_null_optional_stays_none() {
        let form: Form =
            serde_json::from_str(r#"{"email": "ana@x.com", "name": null}"#).unwrap();
        assert_eq!(form.name, None);
    }
}
