//! Dynamic entity record

use std::collections::HashMap;

use chrono::DateTime;
use chrono::Utc;

use super::Value;
use crate::error::FieldError;

/// A dynamic row/record returned by (or sent to) the admin backend.
///
/// Records hold field values as a `HashMap<String, Value>`, allowing dynamic
/// access to any field. Typed getter methods provide safe access with proper
/// error handling.
///
/// # Example
///
/// ```
/// use soundcms_lib::model::Record;
///
/// let record = Record::with_id(7)
///     .set("name", "Rain on leaves")
///     .set("status", "ENABLED");
///
/// assert_eq!(record.id(), Some(7));
/// assert_eq!(record.get_string("name").unwrap(), Some("Rain on leaves"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    /// The primary key, once the backend has assigned one.
    pub(crate) id: Option<i64>,

    /// The field values.
    pub(crate) fields: HashMap<String, Value>,
}

impl Record {
    /// Creates a new empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new record with the given ID.
    pub fn with_id(id: i64) -> Self {
        Self {
            id: Some(id),
            fields: HashMap::new(),
        }
    }

    /// Creates a record from a field map, lifting an integer `id` field.
    pub fn from_fields(fields: HashMap<String, Value>) -> Self {
        let mut record = Self {
            id: None,
            fields,
        };
        if let Some(Value::Int(id)) = record.fields.get("id") {
            record.id = Some(*id);
            record.fields.remove("id");
        }
        record
    }

    // =========================================================================
    // Metadata accessors
    // =========================================================================

    /// Returns the record ID, if set.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Sets the record ID.
    pub fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the value for a field, treating a missing field as null.
    pub fn value_or_null(&self, field: &str) -> Value {
        if field == "id" {
            return Value::from(self.id);
        }
        self.fields.get(field).cloned().unwrap_or_default()
    }

    /// Returns `true` if the record contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Returns a mutable reference to all fields.
    pub fn fields_mut(&mut self) -> &mut HashMap<String, Value> {
        &mut self.fields
    }

    /// Returns `true` if the record has no id and no fields.
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.fields.is_empty()
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Inserts a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    // =========================================================================
    // Typed getters
    //
    // Return Err if field is missing or wrong type.
    // Return Ok(None) only if the field exists and is Value::Null.
    // =========================================================================

    /// Gets a string field value.
    pub fn get_string(&self, field: &str) -> Result<Option<&str>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(FieldError::wrong_type(
                field,
                "string",
                other.type_name(),
            )),
        }
    }

    /// Gets a boolean field value.
    pub fn get_bool(&self, field: &str) -> Result<Option<bool>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(FieldError::wrong_type(field, "bool", other.type_name())),
        }
    }

    /// Gets an integer field value.
    pub fn get_int(&self, field: &str) -> Result<Option<i64>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Int(n)) => Ok(Some(*n)),
            Some(other) => Err(FieldError::wrong_type(field, "int", other.type_name())),
        }
    }

    /// Gets a float field value.
    pub fn get_float(&self, field: &str) -> Result<Option<f64>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Float(n)) => Ok(Some(*n)),
            Some(Value::Int(n)) => Ok(Some(*n as f64)), // Allow widening
            Some(other) => Err(FieldError::wrong_type(field, "float", other.type_name())),
        }
    }

    /// Gets a DateTime field value, converted to UTC.
    pub fn get_datetime(&self, field: &str) -> Result<Option<DateTime<Utc>>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::DateTime(dt)) => Ok(Some(dt.with_timezone(&Utc))),
            Some(other) => Err(FieldError::wrong_type(
                field,
                "datetime",
                other.type_name(),
            )),
        }
    }

    /// Gets a list field value.
    pub fn get_list(&self, field: &str) -> Result<Option<&[Value]>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::List(items)) => Ok(Some(items.as_slice())),
            Some(other) => Err(FieldError::wrong_type(field, "list", other.type_name())),
        }
    }
}
