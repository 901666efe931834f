//! Field validation for editor forms.
//!
//! # Example
//!
//! ```
//! use regex::Regex;
//! use soundcms_admin::form::{FieldValues, Validator};
//! use soundcms_lib::model::Value;
//!
//! let validator = Validator::new()
//!     .field("name")
//!         .required("Name is required")
//!         .max_length(64, "Name is too long")
//!     .field("coverImg")
//!         .pattern(Regex::new(r"^https?://").unwrap(), "Cover must be a URL")
//!     .build();
//!
//! let mut values = FieldValues::new();
//! values.insert("coverImg".into(), Value::from("ftp://x"));
//! let result = validator.validate(&values);
//!
//! assert_eq!(result.errors().len(), 2);
//! assert_eq!(result.first_error().unwrap().field_name, "name");
//! ```

use std::fmt;

use regex::Regex;
use soundcms_lib::model::Value;

use super::FieldValues;

/// Type alias for validation rule closures.
type Rule = Box<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// Information about a single field validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field name (from `.field()` call).
    pub field_name: String,
    /// Error message.
    pub message: String,
}

/// Result of validating one or more fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ValidationResult {
    /// All fields passed validation.
    #[default]
    Valid,
    /// One or more fields failed validation.
    Invalid(Vec<FieldError>),
}

impl ValidationResult {
    /// Check if all fields passed validation.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Check if any field failed validation.
    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// Get all validation errors.
    pub fn errors(&self) -> &[FieldError] {
        match self {
            Self::Valid => &[],
            Self::Invalid(errors) => errors,
        }
    }

    /// Get the first validation error (if any).
    pub fn first_error(&self) -> Option<&FieldError> {
        self.errors().first()
    }

    /// Error message for one field, if it failed.
    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors()
            .iter()
            .find(|e| e.field_name == field)
            .map(|e| e.message.as_str())
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first_error() {
            None => f.write_str("valid"),
            Some(first) if self.errors().len() == 1 => f.write_str(&first.message),
            Some(first) => write!(f, "{} (and {} more)", first.message, self.errors().len() - 1),
        }
    }
}

struct FieldEntry {
    name: String,
    rules: Vec<Rule>,
}

/// Rules for a set of form fields.
///
/// Fields are checked in the order they were added; each failing field
/// reports its first failing rule.
pub struct Validator {
    fields: Vec<FieldEntry>,
}

impl Validator {
    /// Create a new validator.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a field to validate.
    pub fn field(self, name: impl Into<String>) -> FieldBuilder {
        FieldBuilder {
            validator: self,
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// Check `values`; a missing field is checked as `Value::Null`.
    pub fn validate(&self, values: &FieldValues) -> ValidationResult {
        let mut errors = Vec::new();

        for field in &self.fields {
            let value = values.get(&field.name).unwrap_or(&Value::Null);
            let first_error = field.rules.iter().find_map(|rule| rule(value).err());
            if let Some(message) = first_error {
                errors.push(FieldError {
                    field_name: field.name.clone(),
                    message,
                });
            }
        }

        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(errors)
        }
    }

    /// Names of the validated fields.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("fields", &self.field_names())
            .finish()
    }
}

/// Builder for adding validation rules to a single field.
pub struct FieldBuilder {
    validator: Validator,
    name: String,
    rules: Vec<Rule>,
}

impl FieldBuilder {
    /// Add a custom validation rule.
    pub fn rule<F>(mut self, f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let msg = msg.into();
        self.rules
            .push(Box::new(move |v| if f(v) { Ok(()) } else { Err(msg.clone()) }));
        self
    }

    /// Require the field to be present and non-blank.
    pub fn required(self, msg: impl Into<String>) -> Self {
        self.rule(
            |v| match v {
                Value::String(s) => !s.trim().is_empty(),
                other => !other.is_empty(),
            },
            msg,
        )
    }

    /// Require minimum length: characters for text, items for lists.
    ///
    /// Empty values pass; use `required()` for presence.
    pub fn min_length(self, min: usize, msg: impl Into<String>) -> Self {
        self.rule(move |v| length(v).is_none_or(|len| len == 0 || len >= min), msg)
    }

    /// Require maximum length: characters for text, items for lists.
    pub fn max_length(self, max: usize, msg: impl Into<String>) -> Self {
        self.rule(move |v| length(v).is_none_or(|len| len <= max), msg)
    }

    /// Require the textual form to match `re`. Empty values pass.
    pub fn pattern(self, re: Regex, msg: impl Into<String>) -> Self {
        self.rule(move |v| v.is_empty() || re.is_match(&v.to_string()), msg)
    }

    /// Continue to the next field.
    pub fn field(self, name: impl Into<String>) -> FieldBuilder {
        self.build().field(name)
    }

    /// Finalize and run validation.
    pub fn validate(self, values: &FieldValues) -> ValidationResult {
        self.build().validate(values)
    }

    /// Finalize this field and return the validator.
    pub fn build(self) -> Validator {
        let mut validator = self.validator;
        validator.fields.push(FieldEntry {
            name: self.name,
            rules: self.rules,
        });
        validator
    }
}

impl From<FieldBuilder> for Validator {
    fn from(builder: FieldBuilder) -> Self {
        builder.build()
    }
}

fn length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::List(items) => Some(items.len()),
        _ => None,
    }
}
