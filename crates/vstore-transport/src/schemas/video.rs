use serde::{Deserialize, Serialize};
use vstore_types::EntityId;

use super::general::{ContentLicense, CurationStatus, Language, MediaObject, PublicationStatus};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoCategory {
    pub id: EntityId,
    pub value: String,
}

/// A video with its reference properties expanded into nested records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<Language>,
    /// Unix timestamp in seconds.
    #[serde(default)]
    pub first_released: Option<u64>,
    #[serde(default)]
    pub category: Option<VideoCategory>,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub object: Option<MediaObject>,
    #[serde(default)]
    pub publication_status: Option<PublicationStatus>,
    #[serde(default)]
    pub curation_status: Option<CurationStatus>,
    #[serde(default)]
    pub explicit: Option<bool>,
    #[serde(default)]
    pub license: Option<ContentLicense>,
    #[serde(default)]
    pub attribution: Option<String>,
    #[serde(default)]
    pub channel_id: Option<u64>,
}
