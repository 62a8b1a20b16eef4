use serde::{Deserialize, Serialize};

use crate::class::PropertyType;
use crate::id::{ClassId, EntityId};

/// A raw property value as stored in the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    None,
    Bool(bool),
    Uint(u64),
    Int(i64),
    Text(String),
    Internal(EntityId),
    BoolVec(Vec<bool>),
    UintVec(Vec<u64>),
    IntVec(Vec<i64>),
    TextVec(Vec<String>),
    InternalVec(Vec<EntityId>),
}

impl Value {
    /// Whether this value is acceptable for a property of the given type.
    ///
    /// Text length limits are enforced by the writer, not here.
    pub fn matches(&self, kind: &PropertyType) -> bool {
        matches!(
            (self, kind),
            (Value::Bool(_), PropertyType::Bool)
                | (Value::Uint(_), PropertyType::Uint)
                | (Value::Int(_), PropertyType::Int)
                | (Value::Text(_), PropertyType::Text { .. })
                | (Value::Internal(_), PropertyType::Internal(_))
                | (Value::BoolVec(_), PropertyType::BoolVec)
                | (Value::UintVec(_), PropertyType::UintVec)
                | (Value::IntVec(_), PropertyType::IntVec)
                | (Value::TextVec(_), PropertyType::TextVec)
                | (Value::InternalVec(_), PropertyType::InternalVec(_))
        )
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }
}

/// A value bound to a property slot of the entity's class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyValue {
    pub in_class_index: u16,
    pub value: Value,
}

impl PropertyValue {
    pub fn new(in_class_index: u16, value: Value) -> Self {
        Self {
            in_class_index,
            value,
        }
    }
}

/// An instance record of a class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub class_id: ClassId,
    #[serde(default)]
    pub values: Vec<PropertyValue>,
}

impl Entity {
    pub fn new(id: EntityId, class_id: ClassId) -> Self {
        Self {
            id,
            class_id,
            values: Vec::new(),
        }
    }

    pub fn with_value(mut self, in_class_index: u16, value: Value) -> Self {
        self.values.push(PropertyValue::new(in_class_index, value));
        self
    }

    /// The value stored for a property slot, if any. `Value::None` counts as
    /// absent.
    pub fn value(&self, in_class_index: u16) -> Option<&Value> {
        self.values
            .iter()
            .find(|pv| pv.in_class_index == in_class_index)
            .map(|pv| &pv.value)
            .filter(|v| !v.is_none())
    }
}
