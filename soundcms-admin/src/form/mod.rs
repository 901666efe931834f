//! Editor form state.
//!
//! An [`EditorForm`] caches the record being edited and pushes it into a
//! [`FormBinding`] once one is connected. Applying initial values is always
//! a full reset followed by a write, so fields left over from a previously
//! edited record never survive a switch.

mod binding;
mod validation;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use log::{debug, warn};
use soundcms_lib::model::{Record, Value};
use thiserror::Error;

pub use binding::{FormBinding, FormStore};
pub use validation::{FieldBuilder, FieldError, ValidationResult, Validator};

use crate::state::State;
use crate::toast::{Messages, Toast};

/// Field key to value, ordered by key.
pub type FieldValues = BTreeMap<String, Value>;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("form is not connected to its inputs")]
    NotConnected,

    #[error("validation failed: {0}")]
    Invalid(ValidationResult),

    #[error("save failed: {0}")]
    Save(#[from] soundcms_lib::Error),
}

/// Field values of a record, with `id` as a regular field.
pub fn values_from_record(record: &Record) -> FieldValues {
    let mut values: FieldValues = record
        .fields()
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    if let Some(id) = record.id() {
        values.insert("id".to_string(), Value::Int(id));
    }
    values
}

/// A record from field values; an integer `id` field becomes the record id.
pub fn record_from_values(values: &FieldValues) -> Record {
    let fields: HashMap<String, Value> = values
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    Record::from_fields(fields)
}

#[derive(Default)]
struct FormState {
    binding: Option<Arc<dyn FormBinding>>,
    initial: FieldValues,
    dirty: bool,
    /// Bumped by every user edit.
    edits: u64,
}

/// State of one editor form.
///
/// Cheap to clone; clones share the same form.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use soundcms_admin::form::{EditorForm, FieldValues, FormStore};
/// use soundcms_admin::toast::Messages;
/// use soundcms_lib::model::Value;
///
/// let mut initial = FieldValues::new();
/// initial.insert("name".into(), Value::from("Rain"));
///
/// let form = EditorForm::new(initial, Messages::new());
/// let store = Arc::new(FormStore::new());
/// assert!(store.is_empty());
///
/// form.connect(store.clone());
/// assert_eq!(store.get("name"), Some(Value::from("Rain")));
///
/// form.edit_field("name", Value::from("Rainfall")).unwrap();
/// assert!(form.is_dirty());
/// assert_eq!(form.latest_values()["name"], Value::from("Rainfall"));
/// ```
#[derive(Clone)]
pub struct EditorForm {
    state: State<FormState>,
    messages: Messages,
}

impl EditorForm {
    /// A form that will show `initial` once connected.
    pub fn new(initial: FieldValues, messages: Messages) -> Self {
        Self {
            state: State::new(FormState {
                initial,
                ..FormState::default()
            }),
            messages,
        }
    }

    /// A form editing `record`.
    pub fn for_record(record: &Record, messages: Messages) -> Self {
        Self::new(values_from_record(record), messages)
    }

    /// The bound input handle, once connected.
    pub fn binding(&self) -> Option<Arc<dyn FormBinding>> {
        self.state.with(|s| s.binding.clone())
    }

    pub fn is_connected(&self) -> bool {
        self.state.with(|s| s.binding.is_some())
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// The cached initial snapshot.
    pub fn initial_values(&self) -> FieldValues {
        self.state.with(|s| s.initial.clone())
    }

    pub fn is_dirty(&self) -> bool {
        self.state.with(|s| s.dirty)
    }

    pub fn set_dirty(&self, dirty: bool) {
        self.state.update(|s| s.dirty = dirty);
    }

    /// Attach the input binding.
    ///
    /// A non-empty cached snapshot is applied right away.
    pub fn connect(&self, binding: Arc<dyn FormBinding>) {
        let initial = self.state.modify(|s| {
            s.binding = Some(Arc::clone(&binding));
            s.initial.clone()
        });
        debug!("form connected ({} initial field(s))", initial.len());
        if !initial.is_empty() {
            self.apply(binding.as_ref(), &initial);
        }
    }

    /// Detach the binding; values keep being served from the snapshot.
    pub fn disconnect(&self) {
        self.state.update(|s| s.binding = None);
    }

    /// Cache a new snapshot and, when connected, show it.
    ///
    /// Showing is a full reset followed by writing `values`, and clears the
    /// dirty flag. An empty snapshot is cached but leaves the fields as they
    /// are; use [`clear`](Self::clear) to empty the form.
    pub fn set_initial_values(&self, values: FieldValues) {
        let binding = self.state.modify(|s| {
            s.initial = values.clone();
            s.binding.clone()
        });
        match binding {
            Some(binding) if !values.is_empty() => self.apply(binding.as_ref(), &values),
            Some(_) => debug!("form: empty initial values cached, fields untouched"),
            None => debug!("form: not connected, initial values cached"),
        }
    }

    /// Live values when connected, otherwise the cached snapshot.
    pub fn latest_values(&self) -> FieldValues {
        match self.binding() {
            Some(binding) => binding.values(),
            None => self.initial_values(),
        }
    }

    /// The latest values as a record.
    pub fn to_record(&self) -> Record {
        record_from_values(&self.latest_values())
    }

    /// A user edit: write the field and mark the form dirty.
    pub fn edit_field(&self, key: &str, value: Value) -> Result<(), FormError> {
        let binding = self.binding().ok_or(FormError::NotConnected)?;
        binding.set_field(key, value);
        self.state.update(|s| {
            s.edits += 1;
            s.dirty = true;
        });
        Ok(())
    }

    /// Put the cached snapshot back into the fields.
    pub fn reset(&self) -> Result<(), FormError> {
        let binding = self.binding().ok_or(FormError::NotConnected)?;
        let initial = self.initial_values();
        self.apply(binding.as_ref(), &initial);
        Ok(())
    }

    /// Drop the snapshot and empty every field.
    pub fn clear(&self) {
        let binding = self.state.modify(|s| {
            s.initial.clear();
            s.dirty = false;
            s.binding.clone()
        });
        if let Some(binding) = binding {
            binding.reset_fields();
        }
    }

    fn apply(&self, binding: &dyn FormBinding, values: &FieldValues) {
        binding.reset_fields();
        binding.set_fields(values);
        self.set_dirty(false);
    }

    /// Check the latest values; a failure is reported as an error toast.
    pub fn validate(&self, validator: &Validator) -> ValidationResult {
        let result = validator.validate(&self.latest_values());
        if result.is_invalid() {
            self.messages.push(Toast::error(result.to_string()));
        }
        result
    }

    /// Validate, then hand the latest values to `save`.
    ///
    /// On success the dirty flag is cleared, the saved values become the new
    /// snapshot (with the id the backend assigned) and a success toast is
    /// pushed. Edits made while the save is in flight keep the form dirty.
    /// Failures are reported on the messaging channel as well as returned.
    pub async fn submit<F, Fut>(&self, validator: Option<&Validator>, save: F) -> Result<Record, FormError>
    where
        F: FnOnce(Record) -> Fut,
        Fut: Future<Output = Result<Record, soundcms_lib::Error>>,
    {
        if let Some(validator) = validator {
            let result = self.validate(validator);
            if result.is_invalid() {
                return Err(FormError::Invalid(result));
            }
        }

        let edits = self.state.with(|s| s.edits);
        let values = self.latest_values();
        match save(record_from_values(&values)).await {
            Ok(saved) => {
                let binding = self.state.modify(|s| {
                    s.initial = values;
                    if let Some(id) = saved.id() {
                        s.initial.insert("id".to_string(), Value::Int(id));
                    }
                    if s.edits == edits {
                        s.dirty = false;
                    } else {
                        debug!("form: edited during save, staying dirty");
                    }
                    s.binding.clone()
                });
                if let (Some(binding), Some(id)) = (binding, saved.id()) {
                    binding.set_field("id", Value::Int(id));
                }
                self.messages.push(Toast::success("Saved"));
                Ok(saved)
            }
            Err(err) => {
                warn!("form save failed: {}", err);
                self.messages.push(Toast::error(format!("Save failed: {}", err)));
                Err(FormError::Save(err))
            }
        }
    }
}

impl fmt::Debug for EditorForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.state.with(|s| {
            f.debug_struct("EditorForm")
                .field("connected", &s.binding.is_some())
                .field("dirty", &s.dirty)
                .field("initial", &s.initial)
                .finish()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_value_conversion() {
        let record = Record::with_id(3).set("name", "Rain");
        let values = values_from_record(&record);
        assert_eq!(values["id"], Value::Int(3));

        let back = record_from_values(&values);
        assert_eq!(back, record);
    }

    #[test]
    fn test_edit_requires_connection() {
        let form = EditorForm::new(FieldValues::new(), Messages::new());
        assert!(matches!(
            form.edit_field("name", Value::from("x")),
            Err(FormError::NotConnected)
        ));
        assert!(!form.is_dirty());
    }

    #[test]
    fn test_not_applied_before_connect() {
        let form = EditorForm::new(FieldValues::new(), Messages::new());
        let mut values = FieldValues::new();
        values.insert("name".into(), Value::from("Rain"));
        form.set_initial_values(values.clone());

        assert!(!form.is_connected());
        assert_eq!(form.latest_values(), values);
    }

    #[test]
    fn test_clear_empties_binding() {
        let record = Record::with_id(1).set("name", "Rain");
        let form = EditorForm::for_record(&record, Messages::new());
        let store = Arc::new(FormStore::new());
        form.connect(store.clone());
        assert_eq!(store.len(), 2);

        form.clear();
        assert!(store.is_empty());
        assert!(form.initial_values().is_empty());
    }

    #[test]
    fn test_validate_reports_toast() {
        let messages = Messages::new();
        let form = EditorForm::new(FieldValues::new(), messages.clone());
        let validator = Validator::new().field("name").required("Name is required").build();

        assert!(form.validate(&validator).is_invalid());
        assert_eq!(messages.drain()[0].message, "Name is required");
    }
}
