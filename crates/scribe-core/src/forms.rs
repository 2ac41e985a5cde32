//! Typed form input.
//!
//! Every form is deserialized into a plain struct, trimmed, then validated.
//! Validation yields either the cleaned value or a list of field errors that
//! the HTTP layer hands back to the client; no side effect happens on error.

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

/// All rejected fields of one submission, sorted by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |e| FieldError {
                    field: field.clone(),
                    code: e.code.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid {}", field)),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
        FieldErrors(fields)
    }
}

/// Share-by-email form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ShareForm {
    #[validate(length(min = 1, max = 25, message = "Name must be between 1 and 25 characters"))]
    pub name: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(email(message = "Enter a valid recipient address"))]
    pub to: String,
    pub comments: String,
}

impl ShareForm {
    /// Trim and validate.
    pub fn validate_into(self) -> Result<Self, FieldErrors> {
        let cleaned = Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            to: self.to.trim().to_string(),
            comments: self.comments.trim().to_string(),
        };
        cleaned.validate()?;
        Ok(cleaned)
    }
}

/// Comment form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CommentForm {
    #[validate(length(min = 1, max = 80, message = "Name must be between 1 and 80 characters"))]
    pub name: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Comment body is required"))]
    pub body: String,
}

impl CommentForm {
    /// Trim and validate.
    pub fn validate_into(self) -> Result<Self, FieldErrors> {
        let cleaned = Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            body: self.body.trim().to_string(),
        };
        cleaned.validate()?;
        Ok(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share() -> ShareForm {
        ShareForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            to: "bob@example.com".into(),
            comments: String::new(),
        }
    }

    #[test]
    fn test_valid_share_form_is_trimmed() {
        let form = ShareForm {
            name: "  Ada ".into(),
            ..share()
        };
        let cleaned = form.validate_into().unwrap();
        assert_eq!(cleaned.name, "Ada");
    }

    #[test]
    fn test_share_form_reports_each_bad_field() {
        let form = ShareForm {
            name: "x".repeat(26),
            to: "not-an-address".into(),
            ..share()
        };
        let errors = form.validate_into().unwrap_err();
        assert!(errors.contains("name"));
        assert!(errors.contains("to"));
        assert!(!errors.contains("email"));
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "to"]);
    }

    #[test]
    fn test_blank_name_is_rejected_after_trim() {
        let form = ShareForm {
            name: "   ".into(),
            ..share()
        };
        assert!(form.validate_into().unwrap_err().contains("name"));
    }

    #[test]
    fn test_comment_form_requires_body() {
        let form = CommentForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            body: " \n ".into(),
        };
        let errors = form.validate_into().unwrap_err();
        assert!(errors.contains("body"));
        assert_eq!(errors.iter().count(), 1);
    }

    #[test]
    fn test_missing_fields_deserialize_as_empty() {
        let form: CommentForm = serde_json::from_str(r#"{"name":"Ada"}"#).unwrap();
        let errors = form.validate_into().unwrap_err();
        assert!(errors.contains("email"));
        assert!(errors.contains("body"));
    }
}
