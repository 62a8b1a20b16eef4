use serde::{Deserialize, Serialize};

use crate::id::MemberId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelContentType {
    Video,
    Music,
    Ebook,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelPublicationStatus {
    #[default]
    Public,
    Unlisted,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelCurationStatus {
    #[default]
    Normal,
    Censored,
}

/// A channel as stored by the content working group module.
///
/// Channels live outside the class/entity space and are addressed by their
/// own id counter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub verified: bool,
    pub handle: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub banner: Option<String>,
    pub content: ChannelContentType,
    pub owner: MemberId,
    pub role_account: String,
    pub publication_status: ChannelPublicationStatus,
    pub curation_status: ChannelCurationStatus,
    /// Block number at which the channel was created.
    pub created: u64,
    pub principal_id: u64,
}

/// Length constraint as stored on chain: `max = min + max_min_diff`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputValidationLengthConstraint {
    pub min: u16,
    pub max_min_diff: u16,
}

impl InputValidationLengthConstraint {
    pub fn new(min: u16, max_min_diff: u16) -> Self {
        Self { min, max_min_diff }
    }

    pub fn max(&self) -> u32 {
        u32::from(self.min) + u32::from(self.max_min_diff)
    }
}

/// Channel fields that carry a length constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChannelConstraintKind {
    Handle,
    Title,
    Description,
    Avatar,
    Banner,
}

impl ChannelConstraintKind {
    pub const ALL: [ChannelConstraintKind; 5] = [
        ChannelConstraintKind::Handle,
        ChannelConstraintKind::Title,
        ChannelConstraintKind::Description,
        ChannelConstraintKind::Avatar,
        ChannelConstraintKind::Banner,
    ];
}
