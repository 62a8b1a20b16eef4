//! Entity cache: partition of reference-class entities plus read-through
//! lookups for everything else.
//!
//! The store has no class-indexed query, so finding the entities of a class
//! means reading the whole entity range. For cacheable classes that scan is
//! paid once: the first load keeps every entity whose class is on the
//! cacheable allow-list (the *cache partition*) and later queries filter it in
//! memory. Entities of every other class are re-read on each query so they
//! always reflect the current ledger state.
//!
//! # Invariants
//!
//! - The partition's id set equals the ids of its entities.
//! - The partition only holds entities of cacheable classes.
//! - Results are in ascending entity id order.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use tracing::{debug, warn};
use vstore_codec::{CodecContext, CodecOverrides, CodecResolver, EntityLoader};
use vstore_store::{ObjectStore, StoreError, StoreResult};
use vstore_types::{ClassId, Entity, EntityId, IdRange};

use crate::catalog::ClassCatalog;
use crate::config::TransportConfig;

/// Materialized entities of the cacheable classes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CachePartition {
    entities: Vec<Entity>,
    cached_ids: HashSet<EntityId>,
}

impl CachePartition {
    /// Keep the entities whose class is in `class_ids`.
    pub fn from_scan(all: Vec<Entity>, class_ids: &HashSet<ClassId>) -> Self {
        let entities: Vec<Entity> = all
            .into_iter()
            .filter(|e| class_ids.contains(&e.class_id))
            .collect();
        let cached_ids = entities.iter().map(|e| e.id).collect();
        Self {
            entities,
            cached_ids,
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.cached_ids.contains(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        if !self.contains(id) {
            return None;
        }
        self.entities
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|i| &self.entities[i])
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Classifying cache over the entity space of one store.
pub struct EntityCache {
    store: Arc<dyn ObjectStore>,
    catalog: ClassCatalog,
    config: TransportConfig,
    overrides: CodecOverrides,
    partition: OnceCell<CachePartition>,
    codecs: OnceCell<CodecResolver>,
}

impl EntityCache {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        config: TransportConfig,
        overrides: CodecOverrides,
    ) -> Self {
        let catalog = ClassCatalog::new(
            Arc::clone(&store),
            config.first_class_id,
            config.cacheable_classes.clone(),
        );
        Self {
            store,
            catalog,
            config,
            overrides,
            partition: OnceCell::new(),
            codecs: OnceCell::new(),
        }
    }

    pub fn catalog(&self) -> &ClassCatalog {
        &self.catalog
    }

    /// Codec registry, built from the full class list on first use.
    pub async fn codec_resolver(&self) -> StoreResult<&CodecResolver> {
        self.codecs
            .get_or_try_init(|| async {
                let classes = self.catalog.load_all_classes().await?;
                Ok::<_, StoreError>(CodecResolver::with_overrides(classes, &self.overrides))
            })
            .await
    }

    /// Current entity id range, read from the store's counter.
    pub async fn all_entity_ids(&self) -> StoreResult<Vec<EntityId>> {
        let next = self.store.next_entity_id().await?;
        Ok(IdRange::new(self.config.first_entity_id, next).collect())
    }

    /// Batched fetch; ids with no record are skipped.
    async fn load_entities_by_ids(&self, ids: &[EntityId]) -> StoreResult<Vec<Entity>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let fetched = self.store.entities_by_ids(ids).await?;
        let entities: Vec<Entity> = fetched.into_iter().flatten().collect();
        if entities.len() < ids.len() {
            debug!(requested = ids.len(), found = entities.len(), "some entity ids had no record");
        }
        Ok(entities)
    }

    async fn scan(&self, ids: &[EntityId]) -> StoreResult<CachePartition> {
        let all = self.load_entities_by_ids(ids).await?;
        let class_ids = self.catalog.cacheable_class_ids().await?;
        let partition = CachePartition::from_scan(all, &class_ids);
        debug!(scanned = ids.len(), cached = partition.len(), "cache partition loaded");
        Ok(partition)
    }

    /// Load the cache partition if it is not loaded yet. One full scan per
    /// cache lifetime.
    pub async fn ensure_cached_partition_loaded(&self) -> StoreResult<&CachePartition> {
        self.partition
            .get_or_try_init(|| async {
                let ids = self.all_entity_ids().await?;
                self.scan(&ids).await
            })
            .await
    }

    /// The cached partition, loading it if needed.
    pub async fn internal_entities(&self) -> StoreResult<&[Entity]> {
        Ok(self.ensure_cached_partition_loaded().await?.entities())
    }

    pub fn is_partition_loaded(&self) -> bool {
        self.partition.initialized()
    }

    /// Every entity: cached ones from memory, all others freshly fetched.
    pub async fn all_entities(&self) -> StoreResult<Vec<Entity>> {
        let ids = self.all_entity_ids().await?;
        let partition = self.partition.get_or_try_init(|| self.scan(&ids)).await?;

        let uncached: Vec<EntityId> = ids
            .iter()
            .copied()
            .filter(|id| !partition.contains(*id))
            .collect();
        let fresh = self.load_entities_by_ids(&uncached).await?;
        debug!(fresh = fresh.len(), cached = partition.len(), "loaded fresh entities");

        let mut all = Vec::with_capacity(partition.len() + fresh.len());
        all.extend_from_slice(partition.entities());
        all.extend(fresh);
        all.sort_by_key(|e| e.id);
        Ok(all)
    }

    /// Entities of one class. Cacheable classes are answered from the
    /// partition; other classes pay a fresh fetch every call.
    pub async fn entities_of_class(&self, class_name: &str) -> StoreResult<Vec<Entity>> {
        let Some(class) = self.catalog.class_by_name(class_name).await? else {
            warn!(class = %class_name, "cannot find a class id by its name");
            return Ok(Vec::new());
        };
        let class_id = class.id;

        if self.catalog.is_cacheable(class_name) {
            let partition = self.ensure_cached_partition_loaded().await?;
            Ok(partition
                .entities()
                .iter()
                .filter(|e| e.class_id == class_id)
                .cloned()
                .collect())
        } else {
            let mut all = self.all_entities().await?;
            all.retain(|e| e.class_id == class_id);
            Ok(all)
        }
    }

    /// Single entity lookup: the partition if it is loaded, otherwise one
    /// single-id fetch. Never scans.
    pub async fn find_by_id(&self, id: EntityId) -> StoreResult<Option<Entity>> {
        if let Some(cached) = self.partition.get().and_then(|p| p.get(id)) {
            return Ok(Some(cached.clone()));
        }
        self.store.entity_by_id(id).await
    }

    /// Typed records of one class, in entity id order.
    ///
    /// Unknown classes and classes without a codec yield an empty list.
    /// Entities the codec cannot convert, or whose plain form does not fit
    /// `T`, are dropped.
    pub async fn typed_entities_of_class<T: DeserializeOwned>(
        &self,
        class_name: &str,
    ) -> StoreResult<Vec<T>> {
        let Some(class) = self.catalog.class_by_name(class_name).await? else {
            warn!(class = %class_name, "no class found by name");
            return Ok(Vec::new());
        };
        let class_id = class.id;

        let resolver = self.codec_resolver().await?;
        let Some(codec) = resolver.resolve(class_id) else {
            warn!(class = %class_name, "no entity codec found by class name");
            return Ok(Vec::new());
        };

        let ctx = CodecContext::new(
            self,
            resolver,
            self.config.requires_internals(class_name),
            self.config.internal_expansion_depth,
        );

        let entities = self.entities_of_class(class_name).await?;
        let mut out = Vec::with_capacity(entities.len());
        for entity in &entities {
            let Some(plain) = codec.to_plain(entity, &ctx).await? else {
                debug!(entity = %entity.id, class = %class_name, "entity not convertible; dropped");
                continue;
            };
            match plain.into_typed::<T>() {
                Ok(typed) => out.push(typed),
                Err(e) => {
                    debug!(entity = %entity.id, class = %class_name, error = %e, "typed decode failed; dropped");
                }
            }
        }
        Ok(out)
    }

    /// Drop the cache partition. The next cacheable query scans again.
    pub fn invalidate(&mut self) {
        if self.partition.take().is_some() {
            debug!("cache partition invalidated");
        }
    }
}

#[async_trait]
impl EntityLoader for EntityCache {
    async fn load_entity(&self, id: EntityId) -> StoreResult<Option<Entity>> {
        self.find_by_id(id).await
    }
}

impl std::fmt::Debug for EntityCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityCache")
            .field("catalog", &self.catalog)
            .field("cached", &self.partition.get().map(CachePartition::len))
            .field("codecs", &self.codecs.get().map(CodecResolver::len))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use vstore_codec::{EntityCodec, PlainEntity};
    use vstore_store::InMemoryObjectStore;
    use vstore_types::{Property, PropertyType, PropertyValue, Value};

    #[derive(Debug, PartialEq, Deserialize)]
    struct Named {
        id: EntityId,
        value: String,
    }

    fn text(s: &str) -> Vec<PropertyValue> {
        vec![PropertyValue::new(0, Value::Text(s.into()))]
    }

    fn value_property() -> Vec<Property> {
        vec![Property::new("value", PropertyType::Text { max_len: 64 }).required()]
    }

    /// Language (class 1, cacheable) with entities 1-3, Video (class 2,
    /// volatile) with entities 4-5.
    fn scenario_store() -> Arc<InMemoryObjectStore> {
        let store = Arc::new(InMemoryObjectStore::new());
        let language = store.create_class("Language", value_property()).unwrap();
        let video = store.create_class("Video", value_property()).unwrap();
        for name in ["English", "German", "French"] {
            store.create_entity(language, text(name)).unwrap();
        }
        for title in ["Intro", "Outro"] {
            store.create_entity(video, text(title)).unwrap();
        }
        store
    }

    fn cache(store: &Arc<InMemoryObjectStore>) -> EntityCache {
        EntityCache::new(store.clone(), TransportConfig::default(), CodecOverrides::new())
    }

    fn ids(entities: &[Entity]) -> Vec<u64> {
        entities.iter().map(|e| e.id.get()).collect()
    }

    // -----------------------------------------------------------------------
    // Partition loading
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn partition_loads_once() {
        let store = scenario_store();
        let cache = cache(&store);
        cache.ensure_cached_partition_loaded().await.unwrap();
        cache.ensure_cached_partition_loaded().await.unwrap();

        let stats = store.stats();
        assert_eq!(stats.next_entity_id, 1);
        assert_eq!(stats.entity_batches, 1);
        assert_eq!(stats.entities_fetched, 5);
    }

    #[tokio::test]
    async fn partition_holds_only_cacheable_classes() {
        let store = Arc::new(InMemoryObjectStore::new());
        let genre = store.create_class("MusicGenre", value_property()).unwrap();
        let track = store.create_class("MusicTrack", value_property()).unwrap();
        let mood = store.create_class("MusicMood", value_property()).unwrap();
        let album = store.create_class("MusicAlbum", value_property()).unwrap();
        for (i, class) in [genre, track, mood, album, genre, track, mood].iter().enumerate() {
            store.create_entity(*class, text(&format!("e{i}"))).unwrap();
        }

        let cache = cache(&store);
        let partition = cache.ensure_cached_partition_loaded().await.unwrap();
        let cacheable = [genre, mood];
        assert!(partition.entities().iter().all(|e| cacheable.contains(&e.class_id)));

        let all = cache.all_entities().await.unwrap();
        for entity in &all {
            assert_eq!(
                partition.contains(entity.id),
                cacheable.contains(&entity.class_id),
                "entity {} misclassified",
                entity.id
            );
        }
        assert_eq!(ids(partition.entities()), vec![1, 3, 5, 7]);
    }

    #[tokio::test]
    async fn partition_ids_mirror_entities() {
        let store = scenario_store();
        let cache = cache(&store);
        let partition = cache.ensure_cached_partition_loaded().await.unwrap();
        assert_eq!(partition.len(), 3);
        for entity in partition.entities() {
            assert!(partition.contains(entity.id));
        }
        assert!(!partition.contains(EntityId::new(4)));
    }

    #[tokio::test]
    async fn failed_scan_leaves_partition_unloaded() {
        let store = scenario_store();
        let cache = cache(&store);
        cache.catalog().load_all_classes().await.unwrap();
        store.set_unavailable(true);
        let err = cache.ensure_cached_partition_loaded().await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(!cache.is_partition_loaded());

        store.set_unavailable(false);
        assert_eq!(cache.internal_entities().await.unwrap().len(), 3);
    }

    // -----------------------------------------------------------------------
    // Class queries
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn cacheable_class_is_served_from_partition() {
        let store = scenario_store();
        let cache = cache(&store);

        let first = cache.entities_of_class("Language").await.unwrap();
        assert_eq!(ids(&first), vec![1, 2, 3]);
        let after_first = store.stats();
        assert_eq!(after_first.entity_batches, 1);

        let second = cache.entities_of_class("Language").await.unwrap();
        assert_eq!(ids(&second), vec![1, 2, 3]);
        assert_eq!(store.stats(), after_first);
    }

    #[tokio::test]
    async fn volatile_class_is_refetched_every_call() {
        let store = scenario_store();
        let cache = cache(&store);

        let first = cache.entities_of_class("Video").await.unwrap();
        assert_eq!(ids(&first), vec![4, 5]);
        let batches = store.stats().entity_batches;

        let second = cache.entities_of_class("Video").await.unwrap();
        assert_eq!(ids(&second), vec![4, 5]);
        let stats = store.stats();
        assert_eq!(stats.entity_batches, batches + 1);
        assert_eq!(stats.entity_batches, 3);
    }

    #[tokio::test]
    async fn volatile_updates_are_visible_but_cached_ones_are_not() {
        let store = scenario_store();
        let cache = cache(&store);
        cache.entities_of_class("Language").await.unwrap();

        store.update_entity(EntityId::new(1), text("Old English")).unwrap();
        store.update_entity(EntityId::new(4), text("New intro")).unwrap();

        let languages = cache.entities_of_class("Language").await.unwrap();
        assert_eq!(languages[0].value(0), Some(&Value::Text("English".into())));
        let videos = cache.entities_of_class("Video").await.unwrap();
        assert_eq!(videos[0].value(0), Some(&Value::Text("New intro".into())));
    }

    #[tokio::test]
    async fn new_volatile_entities_appear_on_next_call() {
        let store = scenario_store();
        let cache = cache(&store);
        assert_eq!(cache.entities_of_class("Video").await.unwrap().len(), 2);
        store.create_entity(ClassId::new(2), text("Credits")).unwrap();
        let videos = cache.entities_of_class("Video").await.unwrap();
        assert_eq!(ids(&videos), vec![4, 5, 6]);
    }

    #[tokio::test]
    async fn unknown_class_yields_empty() {
        let store = scenario_store();
        let cache = cache(&store);
        assert!(cache.entities_of_class("Nonexistent").await.unwrap().is_empty());
        assert_eq!(store.stats().entity_batches, 0);
    }

    #[tokio::test]
    async fn all_entities_is_ascending_union() {
        let store = scenario_store();
        let cache = cache(&store);
        let all = cache.all_entities().await.unwrap();
        assert_eq!(ids(&all), vec![1, 2, 3, 4, 5]);

        // Scan plus the fresh fetch of the volatile remainder.
        let stats = store.stats();
        assert_eq!(stats.entity_batches, 2);
        assert_eq!(stats.entities_fetched, 7);
    }

    #[tokio::test]
    async fn holes_in_the_range_are_skipped() {
        let store = scenario_store();
        store.remove_entity(EntityId::new(4)).unwrap();
        let cache = cache(&store);
        let videos = cache.entities_of_class("Video").await.unwrap();
        assert_eq!(ids(&videos), vec![5]);
    }

    #[tokio::test]
    async fn store_errors_propagate() {
        let store = scenario_store();
        let cache = cache(&store);
        store.set_unavailable(true);
        let err = cache.entities_of_class("Video").await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    // -----------------------------------------------------------------------
    // Single lookups
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn find_by_id_before_load_fetches_single() {
        let store = scenario_store();
        let cache = cache(&store);
        let found = cache.find_by_id(EntityId::new(2)).await.unwrap().unwrap();
        assert_eq!(found.id, EntityId::new(2));

        let stats = store.stats();
        assert_eq!(stats.entity_singles, 1);
        assert_eq!(stats.entity_batches, 0);
        assert_eq!(stats.next_entity_id, 0);
        assert!(!cache.is_partition_loaded());
    }

    #[tokio::test]
    async fn find_by_id_hits_partition() {
        let store = scenario_store();
        let cache = cache(&store);
        cache.ensure_cached_partition_loaded().await.unwrap();
        let before = store.stats();

        cache.find_by_id(EntityId::new(3)).await.unwrap().unwrap();
        assert_eq!(store.stats(), before);

        cache.find_by_id(EntityId::new(5)).await.unwrap().unwrap();
        let after = store.stats();
        assert_eq!(after.entity_singles, before.entity_singles + 1);
        assert_eq!(after.entity_batches, before.entity_batches);
    }

    #[tokio::test]
    async fn find_by_id_missing_is_none() {
        let store = scenario_store();
        let cache = cache(&store);
        assert!(cache.find_by_id(EntityId::new(99)).await.unwrap().is_none());
    }

    // -----------------------------------------------------------------------
    // Typed conversion
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn typed_entities_convert_in_order() {
        let store = scenario_store();
        let cache = cache(&store);
        let languages: Vec<Named> = cache.typed_entities_of_class("Language").await.unwrap();
        let values: Vec<&str> = languages.iter().map(|l| l.value.as_str()).collect();
        assert_eq!(values, vec!["English", "German", "French"]);
        assert_eq!(languages[0].id, EntityId::new(1));
    }

    #[tokio::test]
    async fn typed_unknown_class_is_empty() {
        let store = scenario_store();
        let cache = cache(&store);
        assert!(cache.catalog().class_by_name("Nonexistent").await.unwrap().is_none());
        let out: Vec<Named> = cache.typed_entities_of_class("Nonexistent").await.unwrap();
        assert!(out.is_empty());
    }

    struct RejectSeven;

    #[async_trait]
    impl EntityCodec for RejectSeven {
        async fn to_plain(
            &self,
            entity: &Entity,
            _ctx: &CodecContext<'_>,
        ) -> StoreResult<Option<PlainEntity>> {
            if entity.id == EntityId::new(7) {
                return Ok(None);
            }
            Ok(Some(
                PlainEntity::new(entity.id).with_field("value", serde_json::json!("ok")),
            ))
        }
    }

    #[tokio::test]
    async fn failed_conversion_drops_only_that_record() {
        let store = Arc::new(InMemoryObjectStore::new());
        let filler = store.create_class("Filler", vec![]).unwrap();
        let x = store.create_class("X", vec![]).unwrap();
        for _ in 0..5 {
            store.create_entity(filler, vec![]).unwrap();
        }
        for _ in 0..3 {
            store.create_entity(x, vec![]).unwrap();
        }

        let overrides = CodecOverrides::new().with("X", Arc::new(RejectSeven));
        let cache = EntityCache::new(store.clone(), TransportConfig::default(), overrides);
        let out: Vec<Named> = cache.typed_entities_of_class("X").await.unwrap();
        let out_ids: Vec<u64> = out.iter().map(|n| n.id.get()).collect();
        assert_eq!(out_ids, vec![6, 8]);
    }

    #[tokio::test]
    async fn undecodable_plain_record_is_dropped() {
        let store = scenario_store();
        store
            .create_entity(ClassId::new(1), vec![PropertyValue::new(0, Value::Uint(3))])
            .unwrap();
        let cache = cache(&store);
        let languages: Vec<Named> = cache.typed_entities_of_class("Language").await.unwrap();
        assert_eq!(languages.len(), 3);
    }

    #[tokio::test]
    async fn reconversion_of_unchanged_entity_is_identical() {
        let store = scenario_store();
        let cache = cache(&store);
        let first: Vec<Named> = cache.typed_entities_of_class("Video").await.unwrap();
        let second: Vec<Named> = cache.typed_entities_of_class("Video").await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn codec_registry_built_once() {
        let store = scenario_store();
        let cache = cache(&store);
        let a = cache.codec_resolver().await.unwrap() as *const CodecResolver;
        let b = cache.codec_resolver().await.unwrap() as *const CodecResolver;
        assert_eq!(a, b);
        assert_eq!(store.stats().class_batches, 1);
    }

    #[tokio::test]
    async fn invalidate_forces_rescan() {
        let store = scenario_store();
        let mut cache = cache(&store);
        cache.entities_of_class("Language").await.unwrap();
        store.update_entity(EntityId::new(1), text("Old English")).unwrap();

        cache.invalidate();
        assert!(!cache.is_partition_loaded());
        let languages = cache.entities_of_class("Language").await.unwrap();
        assert_eq!(languages[0].value(0), Some(&Value::Text("Old English".into())));
        assert_eq!(store.stats().entity_batches, 2);
    }

    #[tokio::test]
    async fn concurrent_first_calls_share_one_load() {
        let store = scenario_store();
        let cache = cache(&store);
        let (a, b) = tokio::join!(
            cache.entities_of_class("Language"),
            cache.entities_of_class("Language"),
        );
        assert_eq!(ids(&a.unwrap()), vec![1, 2, 3]);
        assert_eq!(ids(&b.unwrap()), vec![1, 2, 3]);

        let stats = store.stats();
        assert_eq!(stats.class_batches, 1);
        assert_eq!(stats.entity_batches, 1);
        assert_eq!(stats.next_entity_id, 1);
    }

    #[tokio::test]
    async fn reference_cycle_stops_at_expansion_depth() {
        let store = Arc::new(InMemoryObjectStore::new());
        // First class in an empty store; the property refers back to it.
        let video_id = ClassId::new(1);
        let video = store
            .create_class(
                "Video",
                vec![
                    Property::new("title", PropertyType::Text { max_len: 64 }).required(),
                    Property::new("next", PropertyType::Internal(video_id)),
                ],
            )
            .unwrap();
        assert_eq!(video, video_id);
        let first = store.create_entity(video, text("One")).unwrap();
        let second = store
            .create_entity(
                video,
                vec![
                    PropertyValue::new(0, Value::Text("Two".into())),
                    PropertyValue::new(1, Value::Internal(first)),
                ],
            )
            .unwrap();
        store
            .update_entity(
                first,
                vec![
                    PropertyValue::new(0, Value::Text("One".into())),
                    PropertyValue::new(1, Value::Internal(second)),
                ],
            )
            .unwrap();

        let cache = cache(&store);
        assert_eq!(cache.config.internal_expansion_depth, 2);
        let out: Vec<serde_json::Value> = cache.typed_entities_of_class("Video").await.unwrap();
        assert_eq!(out.len(), 2);

        let top = &out[0];
        assert_eq!(top["id"], serde_json::json!(1));
        assert_eq!(top["next"]["id"], serde_json::json!(2));
        assert_eq!(top["next"]["next"]["id"], serde_json::json!(1));
        // Third level is past the bound and stays a bare id.
        assert_eq!(top["next"]["next"]["next"], serde_json::json!(2));
    }
}
