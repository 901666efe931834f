//! Custom serialization for Record.
//!
//! Records travel as flat JSON objects. The primary key is an ordinary
//! `"id"` member on the wire and is lifted into [`Record::id`] on read.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::MapAccess;
use serde::de::Visitor;
use serde::ser::SerializeMap;

use super::Record;
use super::Value;

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = self.fields.len() + usize::from(self.id.is_some());
        let mut map = serializer.serialize_map(Some(len))?;

        if let Some(id) = self.id {
            map.serialize_entry("id", &id)?;
        }

        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }

        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RecordVisitor)
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map representing a record")
    }

    fn visit_map<M>(self, mut map: M) -> Result<Record, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut fields: HashMap<String, Value> = HashMap::new();

        while let Some(key) = map.next_key::<String>()? {
            let value: serde_json::Value = map.next_value()?;

            // Some modules send string ids
            if key == "id" {
                if let serde_json::Value::String(s) = &value {
                    if let Ok(id) = s.parse::<i64>() {
                        fields.insert(key, Value::Int(id));
                        continue;
                    }
                }
            }

            fields.insert(key, Value::from_json(value));
        }

        Ok(Record::from_fields(fields))
    }
}
