use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use vstore_types::EntityId;

/// Codec output: an entity id with decoded, named property values.
///
/// Field names are the camelCase form of the class property names. The id is
/// kept outside `fields` and re-inserted as `"id"` when the record is turned
/// into JSON, so a codec cannot accidentally drop or rewrite it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlainEntity {
    pub id: EntityId,
    pub fields: Map<String, JsonValue>,
}

impl PlainEntity {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.fields.get(key)
    }

    /// The record as a JSON object, `id` included.
    pub fn into_json(self) -> JsonValue {
        let mut object = self.fields;
        object.insert("id".into(), JsonValue::from(self.id.get()));
        JsonValue::Object(object)
    }

    /// Deserialize into a typed domain record.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.into_json())
    }
}
