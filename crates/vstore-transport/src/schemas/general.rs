use serde::{Deserialize, Serialize};
use vstore_types::EntityId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentLicense {
    pub id: EntityId,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurationStatus {
    pub id: EntityId,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub id: EntityId,
    pub value: String,
    /// ISO 639-1 code.
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationStatus {
    pub id: EntityId,
    pub value: String,
}

/// Pointer to the stored media payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaObject {
    pub id: EntityId,
    pub value: String,
}

/// Curated front-page selection. References stay as ids.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedContent {
    pub id: EntityId,
    #[serde(default)]
    pub top_video: Option<EntityId>,
    #[serde(default)]
    pub featured_videos: Vec<EntityId>,
    #[serde(default)]
    pub featured_albums: Vec<EntityId>,
}
