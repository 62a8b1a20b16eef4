use serde::{Deserialize, Serialize};
use vstore_types::EntityId;

use super::general::{ContentLicense, CurationStatus, Language, MediaObject, PublicationStatus};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicGenre {
    pub id: EntityId,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicMood {
    pub id: EntityId,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicTheme {
    pub id: EntityId,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicTrack {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub first_released: Option<u64>,
    #[serde(default)]
    pub genre: Option<MusicGenre>,
    #[serde(default)]
    pub mood: Option<MusicMood>,
    #[serde(default)]
    pub theme: Option<MusicTheme>,
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

/// An album. Its tracks are expanded one level deeper than its own
/// reference properties.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicAlbum {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub album_artist: Option<String>,
    #[serde(default)]
    pub album_composer: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub first_released: Option<u64>,
    #[serde(default)]
    pub genre: Option<MusicGenre>,
    #[serde(default)]
    pub mood: Option<MusicMood>,
    #[serde(default)]
    pub theme: Option<MusicTheme>,
    #[serde(default)]
    pub tracks: Vec<MusicTrack>,
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub lyrics: Option<String>,
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
