use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::{debug, warn};
use vstore_types::{Class, ClassId};

use crate::codec::EntityCodec;
use crate::schema::SchemaCodec;

/// Codecs registered by class name, replacing the schema-derived codec for
/// that class.
#[derive(Clone, Default)]
pub struct CodecOverrides {
    by_name: BTreeMap<String, Arc<dyn EntityCodec>>,
}

impl CodecOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, class_name: impl Into<String>, codec: Arc<dyn EntityCodec>) {
        self.by_name.insert(class_name.into(), codec);
    }

    pub fn with(mut self, class_name: impl Into<String>, codec: Arc<dyn EntityCodec>) -> Self {
        self.insert(class_name, codec);
        self
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl std::fmt::Debug for CodecOverrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.by_name.keys()).finish()
    }
}

/// Immutable registry mapping a class id to its codec.
///
/// Built once from the complete class list. Every class gets a
/// [`SchemaCodec`] unless an override is registered under its name.
pub struct CodecResolver {
    codecs: HashMap<ClassId, Arc<dyn EntityCodec>>,
    class_ids: HashMap<String, ClassId>,
}

impl CodecResolver {
    pub fn new(classes: &[Class]) -> Self {
        Self::with_overrides(classes, &CodecOverrides::default())
    }

    pub fn with_overrides(classes: &[Class], overrides: &CodecOverrides) -> Self {
        let mut codecs: HashMap<ClassId, Arc<dyn EntityCodec>> = HashMap::new();
        let mut class_ids = HashMap::new();

        for class in classes {
            class_ids.insert(class.name.clone(), class.id);
            let codec = match overrides.by_name.get(&class.name) {
                Some(custom) => Arc::clone(custom),
                None => Arc::new(SchemaCodec::new(class.clone())) as Arc<dyn EntityCodec>,
            };
            codecs.insert(class.id, codec);
        }

        for name in overrides.by_name.keys() {
            if !class_ids.contains_key(name) {
                warn!(class = %name, "codec override names an unknown class; ignored");
            }
        }

        debug!(codecs = codecs.len(), overrides = overrides.len(), "codec registry built");
        Self { codecs, class_ids }
    }

    /// The codec registered for a class.
    pub fn resolve(&self, class_id: ClassId) -> Option<&dyn EntityCodec> {
        self.codecs.get(&class_id).map(|c| c.as_ref())
    }

    pub fn resolve_by_name(&self, class_name: &str) -> Option<&dyn EntityCodec> {
        self.class_ids
            .get(class_name)
            .and_then(|id| self.resolve(*id))
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}

impl std::fmt::Debug for CodecResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecResolver")
            .field("codecs", &self.codecs.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CodecContext, EntityLoader};
    use crate::plain::PlainEntity;
    use async_trait::async_trait;
    use vstore_store::StoreResult;
    use vstore_types::{Entity, EntityId, Property, PropertyType, Value};

    struct NoLoader;

    #[async_trait]
    impl EntityLoader for NoLoader {
        async fn load_entity(&self, _id: EntityId) -> StoreResult<Option<Entity>> {
            Ok(None)
        }
    }

    struct Constant;

    #[async_trait]
    impl EntityCodec for Constant {
        async fn to_plain(
            &self,
            entity: &Entity,
            _ctx: &CodecContext<'_>,
        ) -> StoreResult<Option<PlainEntity>> {
            Ok(Some(
                PlainEntity::new(entity.id).with_field("custom", serde_json::json!(true)),
            ))
        }
    }

    fn classes() -> Vec<Class> {
        vec![
            Class::new(ClassId::new(1), "Language").with_property(
                Property::new("value", PropertyType::Text { max_len: 64 }).required(),
            ),
            Class::new(ClassId::new(2), "Video"),
        ]
    }

    #[test]
    fn registers_every_class() {
        let resolver = CodecResolver::new(&classes());
        assert_eq!(resolver.len(), 2);
        assert!(resolver.resolve(ClassId::new(1)).is_some());
        assert!(resolver.resolve(ClassId::new(2)).is_some());
        assert!(resolver.resolve(ClassId::new(3)).is_none());
        assert!(resolver.resolve_by_name("Language").is_some());
        assert!(resolver.resolve_by_name("Nonexistent").is_none());
    }

    #[test]
    fn empty_class_list_builds_empty_registry() {
        let resolver = CodecResolver::new(&[]);
        assert!(resolver.is_empty());
    }

    #[tokio::test]
    async fn override_replaces_schema_codec() {
        let overrides = CodecOverrides::new()
            .with("Language", Arc::new(Constant))
            .with("Missing", Arc::new(Constant));
        let resolver = CodecResolver::with_overrides(&classes(), &overrides);
        assert_eq!(resolver.len(), 2);

        let entity = Entity::new(EntityId::new(1), ClassId::new(1))
            .with_value(0, Value::Text("English".into()));
        let ctx = CodecContext::new(&NoLoader, &resolver, false, 1);
        let plain = resolver
            .resolve(ClassId::new(1))
            .unwrap()
            .to_plain(&entity, &ctx)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(plain.get("custom"), Some(&serde_json::json!(true)));
        assert!(plain.get("value").is_none());
    }
}
