use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use vstore_types::{ChannelId, ClassId, EntityId};

use crate::error::TransportResult;

/// Reference classes: rarely changed, and stale values are harmless to
/// readers, so their entities are loaded once per transport.
pub const DEFAULT_CACHEABLE_CLASSES: [&str; 8] = [
    "ContentLicense",
    "CurationStatus",
    "Language",
    "MusicGenre",
    "MusicMood",
    "MusicTheme",
    "PublicationStatus",
    "VideoCategory",
];

/// Classes whose typed form nests the entities they refer to.
pub const DEFAULT_CLASSES_REQUIRING_INTERNALS: [&str; 3] = ["Video", "MusicTrack", "MusicAlbum"];

/// Configuration for a [`Transport`](crate::Transport).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub first_class_id: ClassId,
    pub first_entity_id: EntityId,
    pub first_channel_id: ChannelId,
    /// Class names whose entities are cached for the transport's lifetime.
    pub cacheable_classes: BTreeSet<String>,
    /// Class names whose typed conversion expands entity references.
    pub classes_requiring_internals: BTreeSet<String>,
    /// How many levels of entity references are expanded below a top-level
    /// record. Also bounds recursion on reference cycles.
    pub internal_expansion_depth: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            first_class_id: ClassId::new(1),
            first_entity_id: EntityId::new(1),
            first_channel_id: ChannelId::new(1),
            cacheable_classes: DEFAULT_CACHEABLE_CLASSES.iter().map(|s| s.to_string()).collect(),
            classes_requiring_internals: DEFAULT_CLASSES_REQUIRING_INTERNALS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            internal_expansion_depth: 2,
        }
    }
}

impl TransportConfig {
    /// Parse a TOML document. Missing keys take their default values.
    pub fn from_toml_str(s: &str) -> TransportResult<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn with_cacheable_class(mut self, class_name: impl Into<String>) -> Self {
        self.cacheable_classes.insert(class_name.into());
        self
    }

    pub fn with_internals(mut self, class_name: impl Into<String>) -> Self {
        self.classes_requiring_internals.insert(class_name.into());
        self
    }

    pub fn can_cache_class(&self, class_name: &str) -> bool {
        self.cacheable_classes.contains(class_name)
    }

    pub fn requires_internals(&self, class_name: &str) -> bool {
        self.classes_requiring_internals.contains(class_name)
    }
}
