use serde::{Deserialize, Serialize};

use crate::id::ClassId;

/// The declared type of a class property.
///
/// `Internal` properties hold references to entities of the given class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "of")]
pub enum PropertyType {
    Bool,
    Uint,
    Int,
    Text { max_len: u16 },
    Internal(ClassId),
    BoolVec,
    UintVec,
    IntVec,
    TextVec,
    InternalVec(ClassId),
}

impl PropertyType {
    /// The referenced class for `Internal` and `InternalVec` properties.
    pub fn internal_class(&self) -> Option<ClassId> {
        match self {
            PropertyType::Internal(id) | PropertyType::InternalVec(id) => Some(*id),
            _ => None,
        }
    }
}

/// A single property definition in a class schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    pub kind: PropertyType,
}

impl Property {
    pub fn new(name: impl Into<String>, kind: PropertyType) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            required: false,
            kind,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A schema definition. Immutable once created in the store.
///
/// Entity values refer to properties by their position in `properties`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub id: ClassId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl Class {
    pub fn new(id: ClassId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Property at the given in-class index.
    pub fn property(&self, index: u16) -> Option<&Property> {
        self.properties.get(usize::from(index))
    }

    /// Classes referenced by this class's internal properties.
    pub fn referenced_classes(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.properties.iter().filter_map(|p| p.kind.internal_class())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video_class() -> Class {
        Class::new(ClassId::new(2), "Video")
            .with_property(Property::new("title", PropertyType::Text { max_len: 255 }).required())
            .with_property(Property::new("language", PropertyType::Internal(ClassId::new(1))))
            .with_property(Property::new("links", PropertyType::TextVec))
    }

    #[test]
    fn property_lookup_by_index() {
        let class = video_class();
        assert_eq!(class.property(0).unwrap().name, "title");
        assert!(class.property(0).unwrap().required);
        assert!(class.property(3).is_none());
    }

    #[test]
    fn referenced_classes_lists_internals() {
        let refs: Vec<ClassId> = video_class().referenced_classes().collect();
        assert_eq!(refs, vec![ClassId::new(1)]);
    }

    #[test]
    fn serde_roundtrip() {
        let class = video_class();
        let json = serde_json::to_string(&class).unwrap();
        let parsed: Class = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, class);
    }
}
