//! Typed records for the media classes.
//!
//! Each record deserializes from the plain form a codec produces: camelCase
//! field keys plus the entity `id`. Optional properties are `Option`s and
//! vector properties default to empty, so a record decodes from any plain
//! entity the schema codec accepts.

use serde::de::DeserializeOwned;

mod channel;
mod general;
mod music;
mod video;

pub use channel::{ChannelEntity, ChannelValidationConstraints, ValidationConstraint};
pub use general::{
    ContentLicense, CurationStatus, FeaturedContent, Language, MediaObject, PublicationStatus,
};
pub use music::{MusicAlbum, MusicGenre, MusicMood, MusicTheme, MusicTrack};
pub use video::{Video, VideoCategory};

/// A typed record bound to the class it is decoded from.
pub trait TypedEntity: DeserializeOwned + Send {
    const CLASS_NAME: &'static str;
}

macro_rules! typed_entity {
    ($($ty:ty => $class:literal),+ $(,)?) => {
        $(
            impl TypedEntity for $ty {
                const CLASS_NAME: &'static str = $class;
            }
        )+
    };
}

typed_entity! {
    ContentLicense => "ContentLicense",
    CurationStatus => "CurationStatus",
    FeaturedContent => "FeaturedContent",
    Language => "Language",
    MediaObject => "MediaObject",
    PublicationStatus => "PublicationStatus",
    MusicAlbum => "MusicAlbum",
    MusicGenre => "MusicGenre",
    MusicMood => "MusicMood",
    MusicTheme => "MusicTheme",
    MusicTrack => "MusicTrack",
    Video => "Video",
    VideoCategory => "VideoCategory",
}
