//! The [`Transport`] facade and its builder.
//!
//! A transport owns one entity cache and one channel directory for the
//! lifetime of a session. Every read goes through it.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;
use vstore_codec::{CodecOverrides, EntityCodec};
use vstore_store::{ChannelRegistry, ObjectStore};
use vstore_types::{ChannelId, Class, ClassId, Entity, EntityId};

use crate::cache::EntityCache;
use crate::channels::ChannelDirectory;
use crate::config::TransportConfig;
use crate::error::{TransportError, TransportResult};
use crate::schemas::{
    ChannelEntity, ChannelValidationConstraints, ContentLicense, CurationStatus, FeaturedContent,
    Language, MediaObject, MusicAlbum, MusicGenre, MusicMood, MusicTheme, MusicTrack,
    PublicationStatus, TypedEntity, Video, VideoCategory,
};

/// Builder for [`Transport`].
#[derive(Default)]
pub struct TransportBuilder {
    store: Option<Arc<dyn ObjectStore>>,
    channels: Option<Arc<dyn ChannelRegistry>>,
    config: TransportConfig,
    overrides: CodecOverrides,
}

impl TransportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use one backend for both entities and channels.
    pub fn store<S>(self, store: Arc<S>) -> Self
    where
        S: ObjectStore + ChannelRegistry + 'static,
    {
        let channels: Arc<dyn ChannelRegistry> = store.clone();
        self.object_store(store).channel_registry(channels)
    }

    pub fn object_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn channel_registry(mut self, registry: Arc<dyn ChannelRegistry>) -> Self {
        self.channels = Some(registry);
        self
    }

    pub fn config(mut self, config: TransportConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the schema-derived codec of one class.
    pub fn codec(mut self, class_name: impl Into<String>, codec: Arc<dyn EntityCodec>) -> Self {
        self.overrides.insert(class_name, codec);
        self
    }

    pub fn build(self) -> TransportResult<Transport> {
        let store = self.store.ok_or(TransportError::MissingStore("object store"))?;
        let channels = self
            .channels
            .ok_or(TransportError::MissingStore("channel registry"))?;
        if !store.is_ready() {
            return Err(TransportError::StoreNotReady);
        }

        info!(
            cacheable = self.config.cacheable_classes.len(),
            overrides = self.overrides.len(),
            depth = self.config.internal_expansion_depth,
            "transport ready"
        );
        Ok(Transport {
            channels: ChannelDirectory::new(channels, self.config.first_channel_id),
            entities: EntityCache::new(store, self.config.clone(), self.overrides),
            config: self.config,
        })
    }
}

/// Read-side facade over a versioned store: class catalog, entity cache,
/// typed media records and channel projections.
#[derive(Debug)]
pub struct Transport {
    entities: EntityCache,
    channels: ChannelDirectory,
    config: TransportConfig,
}

impl Transport {
    pub fn builder() -> TransportBuilder {
        TransportBuilder::new()
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub fn can_cache_class(&self, class_name: &str) -> bool {
        self.config.can_cache_class(class_name)
    }

    // -----------------------------------------------------------------------
    // Classes
    // -----------------------------------------------------------------------

    pub async fn all_classes(&self) -> TransportResult<Vec<Class>> {
        Ok(self.entities.catalog().load_all_classes().await?.to_vec())
    }

    pub async fn class_by_name(&self, name: &str) -> TransportResult<Option<Class>> {
        Ok(self.entities.catalog().class_by_name(name).await?.cloned())
    }

    pub async fn class_by_id(&self, id: ClassId) -> TransportResult<Option<Class>> {
        Ok(self.entities.catalog().class_by_id(id).await?.cloned())
    }

    pub async fn class_id_by_name_map(&self) -> TransportResult<BTreeMap<String, ClassId>> {
        Ok(self.entities.catalog().class_id_by_name_map().await?)
    }

    // -----------------------------------------------------------------------
    // Entities
    // -----------------------------------------------------------------------

    pub async fn find_by_id(&self, id: EntityId) -> TransportResult<Option<Entity>> {
        Ok(self.entities.find_by_id(id).await?)
    }

    pub async fn all_entities(&self) -> TransportResult<Vec<Entity>> {
        Ok(self.entities.all_entities().await?)
    }

    pub async fn entities_of_class(&self, class_name: &str) -> TransportResult<Vec<Entity>> {
        Ok(self.entities.entities_of_class(class_name).await?)
    }

    pub async fn typed_entities_of_class<T>(&self, class_name: &str) -> TransportResult<Vec<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        Ok(self.entities.typed_entities_of_class(class_name).await?)
    }

    /// Typed records of the class `T` is bound to.
    pub async fn all_of_type<T: TypedEntity>(&self) -> TransportResult<Vec<T>> {
        self.typed_entities_of_class(T::CLASS_NAME).await
    }

    /// Drop cached reference entities; the next cacheable query scans again.
    pub fn invalidate_cache(&mut self) {
        self.entities.invalidate();
    }

    // -----------------------------------------------------------------------
    // Media
    // -----------------------------------------------------------------------

    pub async fn all_media_objects(&self) -> TransportResult<Vec<MediaObject>> {
        self.all_of_type().await
    }

    pub async fn all_videos(&self) -> TransportResult<Vec<Video>> {
        self.all_of_type().await
    }

    pub async fn all_music_tracks(&self) -> TransportResult<Vec<MusicTrack>> {
        self.all_of_type().await
    }

    pub async fn all_music_albums(&self) -> TransportResult<Vec<MusicAlbum>> {
        self.all_of_type().await
    }

    pub async fn all_content_licenses(&self) -> TransportResult<Vec<ContentLicense>> {
        self.all_of_type().await
    }

    pub async fn all_curation_statuses(&self) -> TransportResult<Vec<CurationStatus>> {
        self.all_of_type().await
    }

    pub async fn all_languages(&self) -> TransportResult<Vec<Language>> {
        self.all_of_type().await
    }

    pub async fn all_music_genres(&self) -> TransportResult<Vec<MusicGenre>> {
        self.all_of_type().await
    }

    pub async fn all_music_moods(&self) -> TransportResult<Vec<MusicMood>> {
        self.all_of_type().await
    }

    pub async fn all_music_themes(&self) -> TransportResult<Vec<MusicTheme>> {
        self.all_of_type().await
    }

    pub async fn all_publication_statuses(&self) -> TransportResult<Vec<PublicationStatus>> {
        self.all_of_type().await
    }

    pub async fn all_video_categories(&self) -> TransportResult<Vec<VideoCategory>> {
        self.all_of_type().await
    }

    /// The first featured-content record, if one exists.
    pub async fn featured_content(&self) -> TransportResult<Option<FeaturedContent>> {
        Ok(self.all_of_type::<FeaturedContent>().await?.into_iter().next())
    }

    // -----------------------------------------------------------------------
    // Channels
    // -----------------------------------------------------------------------

    pub async fn next_channel_id(&self) -> TransportResult<ChannelId> {
        Ok(self.channels.next_channel_id().await?)
    }

    pub async fn all_channel_ids(&self) -> TransportResult<Vec<ChannelId>> {
        Ok(self.channels.all_channel_ids().await?)
    }

    pub async fn all_channels(&self) -> TransportResult<Vec<ChannelEntity>> {
        Ok(self.channels.all_channels().await?)
    }

    pub async fn channel_validation_constraints(
        &self,
    ) -> TransportResult<ChannelValidationConstraints> {
        Ok(self.channels.channel_validation_constraints().await?)
    }
}
