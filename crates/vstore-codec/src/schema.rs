//! Schema-driven default codec.
//!
//! Walks the class properties in order and decodes the entity value stored in
//! each slot. Reference properties stay bare ids unless the context asks for
//! internals to be expanded, in which case the referenced entity is loaded and
//! converted with its own class codec.

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use tracing::debug;
use vstore_store::StoreResult;
use vstore_types::{Class, ClassId, Entity, EntityId, Property, Value};

use crate::codec::{CodecContext, EntityCodec};
use crate::plain::PlainEntity;

/// JSON field name for a property name: camelCase over space, `_` and `-`
/// separated words.
///
/// `"Publication Status"` becomes `"publicationStatus"`, `"title"` stays
/// `"title"`.
pub fn field_key(property_name: &str) -> String {
    let mut key = String::with_capacity(property_name.len());
    let words = property_name
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|w| !w.is_empty());

    for (i, word) in words.enumerate() {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            if i == 0 {
                key.extend(first.to_lowercase());
            } else {
                key.extend(first.to_uppercase());
            }
            key.push_str(chars.as_str());
        }
    }
    key
}

/// Outcome of decoding one property.
enum Decoded {
    Field(JsonValue),
    Omitted,
    Invalid,
}

/// Default codec for a class, derived from its property list.
#[derive(Clone, Debug)]
pub struct SchemaCodec {
    class: Class,
    keys: Vec<String>,
}

impl SchemaCodec {
    pub fn new(class: Class) -> Self {
        let keys = class.properties.iter().map(|p| field_key(&p.name)).collect();
        Self { class, keys }
    }

    pub fn class(&self) -> &Class {
        &self.class
    }

    async fn decode(
        &self,
        entity: &Entity,
        index: u16,
        property: &Property,
        ctx: &CodecContext<'_>,
    ) -> StoreResult<Decoded> {
        let Some(value) = entity.value(index) else {
            return Ok(if property.required {
                debug!(entity = %entity.id, property = %property.name, "required value missing");
                Decoded::Invalid
            } else {
                Decoded::Omitted
            });
        };

        if !value.matches(&property.kind) {
            debug!(entity = %entity.id, property = %property.name, "value does not match property type");
            return Ok(Decoded::Invalid);
        }

        let json = match value {
            Value::Internal(id) => {
                if !ctx.expands_internals() {
                    JsonValue::from(id.get())
                } else {
                    let declared = property.kind.internal_class();
                    match expand(*id, declared, ctx).await? {
                        Some(nested) => nested,
                        None if property.required => return Ok(Decoded::Invalid),
                        None => return Ok(Decoded::Omitted),
                    }
                }
            }
            Value::InternalVec(ids) => {
                if !ctx.expands_internals() {
                    JsonValue::from(ids.iter().map(|id| id.get()).collect::<Vec<_>>())
                } else {
                    let declared = property.kind.internal_class();
                    let mut items = Vec::with_capacity(ids.len());
                    for id in ids {
                        if let Some(nested) = expand(*id, declared, ctx).await? {
                            items.push(nested);
                        }
                    }
                    JsonValue::Array(items)
                }
            }
            other => scalar_json(other),
        };
        Ok(Decoded::Field(json))
    }
}

#[async_trait]
impl EntityCodec for SchemaCodec {
    async fn to_plain(
        &self,
        entity: &Entity,
        ctx: &CodecContext<'_>,
    ) -> StoreResult<Option<PlainEntity>> {
        if entity.class_id != self.class.id {
            debug!(entity = %entity.id, class = %self.class.name, "entity belongs to another class");
            return Ok(None);
        }

        let mut fields = Map::new();
        for (index, property) in self.class.properties.iter().enumerate() {
            let Ok(slot) = u16::try_from(index) else {
                break;
            };
            match self.decode(entity, slot, property, ctx).await? {
                Decoded::Field(json) => {
                    fields.insert(self.keys[index].clone(), json);
                }
                Decoded::Omitted => {}
                Decoded::Invalid => return Ok(None),
            }
        }

        Ok(Some(PlainEntity {
            id: entity.id,
            fields,
        }))
    }
}

/// Load and convert a referenced entity. `None` when the reference cannot be
/// resolved to a convertible entity of the declared class.
async fn expand(
    id: EntityId,
    declared: Option<ClassId>,
    ctx: &CodecContext<'_>,
) -> StoreResult<Option<JsonValue>> {
    let Some(target) = ctx.loader.load_entity(id).await? else {
        debug!(entity = %id, "referenced entity not found");
        return Ok(None);
    };
    if declared.is_some_and(|class_id| class_id != target.class_id) {
        debug!(entity = %id, "referenced entity has unexpected class");
        return Ok(None);
    }
    let Some(codec) = ctx.resolver.resolve(target.class_id) else {
        return Ok(None);
    };
    let nested = codec.to_plain(&target, &ctx.nested()).await?;
    Ok(nested.map(PlainEntity::into_json))
}

fn scalar_json(value: &Value) -> JsonValue {
    match value {
        Value::None => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Uint(n) => JsonValue::from(*n),
        Value::Int(n) => JsonValue::from(*n),
        Value::Text(s) => JsonValue::String(s.clone()),
        Value::Internal(id) => JsonValue::from(id.get()),
        Value::BoolVec(v) => JsonValue::from(v.clone()),
        Value::UintVec(v) => JsonValue::from(v.clone()),
        Value::IntVec(v) => JsonValue::from(v.clone()),
        Value::TextVec(v) => JsonValue::from(v.clone()),
        Value::InternalVec(ids) => {
            JsonValue::from(ids.iter().map(|id| id.get()).collect::<Vec<_>>())
        }
    }
}
