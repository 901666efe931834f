//! Module-scoped mapping wrapper

use std::sync::Arc;

use super::FieldMapping;
use super::to_backend_key;
use super::to_frontend_key;
use crate::api::ListParams;
use crate::model::Record;

/// A [`FieldMapping`] bound to one domain module.
///
/// Cheap to clone; the table itself is shared.
///
/// # Example
///
/// ```
/// use soundcms_lib::mapping::ModuleMapping;
/// use soundcms_lib::model::Record;
///
/// let mapping = ModuleMapping::sound();
/// assert!(mapping.is_supported("femaleAudioUrl"));
///
/// let row = Record::with_id(1).set("femaleAudioUrl", "a.mp3");
/// let wire = mapping.record_to_backend(&row);
/// assert!(wire.contains("female_audio_url"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModuleMapping {
    table: Arc<FieldMapping>,
}

impl ModuleMapping {
    /// Binds a mapping table.
    pub fn new(table: FieldMapping) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    /// Mapping for the sound module.
    pub fn sound() -> Self {
        Self::new(super::sound_mapping())
    }

    /// Mapping for the music module.
    pub fn music() -> Self {
        Self::new(super::music_mapping())
    }

    /// Returns the bound table.
    pub fn table(&self) -> &FieldMapping {
        &self.table
    }

    /// Frontend key -> backend key.
    pub fn to_backend(&self, frontend_key: &str) -> String {
        to_backend_key(frontend_key, Some(&self.table))
    }

    /// Backend key -> frontend key.
    pub fn to_frontend(&self, backend_key: &str) -> String {
        to_frontend_key(backend_key, Some(&self.table))
    }

    /// Frontend keys with an explicit entry, in declaration order.
    pub fn supported_keys(&self) -> Vec<&str> {
        self.table.frontend_keys().collect()
    }

    /// Returns `true` if the frontend key has an explicit entry.
    pub fn is_supported(&self, frontend_key: &str) -> bool {
        self.table.contains(frontend_key)
    }

    /// Renames every field of a frontend record to backend names.
    pub fn record_to_backend(&self, record: &Record) -> Record {
        self.rename(record, |key| self.to_backend(key))
    }

    /// Renames every field of a backend record to frontend names.
    pub fn record_to_frontend(&self, record: &Record) -> Record {
        self.rename(record, |key| self.to_frontend(key))
    }

    /// Translates the sort field and filter keys of list parameters.
    ///
    /// Search text and paging are left untouched.
    pub fn params_to_backend(&self, params: &ListParams) -> ListParams {
        let mut mapped = params.clone();
        mapped.sort_field = params.sort_field.as_deref().map(|f| self.to_backend(f));
        mapped.filters = params
            .filters
            .iter()
            .map(|(key, values)| (self.to_backend(key), values.clone()))
            .collect();
        mapped
    }

    fn rename(&self, record: &Record, f: impl Fn(&str) -> String) -> Record {
        let mut out = Record::new();
        out.id = record.id;
        for (key, value) in record.fields() {
            out.fields.insert(f(key), value.clone());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SortDirection;
    use crate::model::Value;

    #[test]
    fn test_record_round_trip() {
        let mapping = ModuleMapping::sound();
        let row = Record::with_id(4)
            .set("coverImg", "c.png")
            .set("femaleAudioUrl", "f.mp3")
            .set("playCount", 9i64);

        let wire = mapping.record_to_backend(&row);
        assert_eq!(wire.id(), Some(4));
        assert_eq!(wire.get("cover_img_url"), Some(&Value::from("c.png")));
        assert_eq!(wire.get("female_audio_url"), Some(&Value::from("f.mp3")));
        assert_eq!(wire.get("play_count"), Some(&Value::Int(9)));

        assert_eq!(mapping.record_to_frontend(&wire), row);
    }

    #[test]
    fn test_params_to_backend() {
        let mapping = ModuleMapping::sound();
        let params = ListParams::new()
            .search("rain")
            .filter("usage", vec!["SLEEP".to_string()])
            .sort("createTime", SortDirection::Descending);

        let mapped = mapping.params_to_backend(&params);
        assert_eq!(mapped.sort_field.as_deref(), Some("create_time"));
        assert!(mapped.filters.contains_key("usage_code"));
        assert_eq!(mapped.search, "rain");
    }

    #[test]
    fn test_supported_keys() {
        let mapping = ModuleMapping::sound();
        assert!(mapping.is_supported("coverImg"));
        assert!(!mapping.is_supported("unknownKey"));
        assert_eq!(mapping.supported_keys().first(), Some(&"name"));
    }
}
