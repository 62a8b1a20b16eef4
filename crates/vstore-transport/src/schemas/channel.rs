use serde::{Deserialize, Serialize};
use vstore_types::{
    Channel, ChannelContentType, ChannelCurationStatus, ChannelId, ChannelPublicationStatus,
    InputValidationLengthConstraint, MemberId,
};

/// A channel as presented to readers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelEntity {
    pub id: ChannelId,
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
    pub created: u64,
    pub principal_id: u64,
    /// Not derived from ledger data yet; always zero.
    pub reward_earned: u128,
    /// Not derived from ledger data yet; always zero.
    pub content_items_count: u32,
}

impl ChannelEntity {
    pub fn from_store(id: ChannelId, channel: Channel) -> Self {
        Self {
            id,
            verified: channel.verified,
            handle: channel.handle,
            title: channel.title,
            description: channel.description,
            avatar: channel.avatar,
            banner: channel.banner,
            content: channel.content,
            owner: channel.owner,
            role_account: channel.role_account,
            publication_status: channel.publication_status,
            curation_status: channel.curation_status,
            created: channel.created,
            principal_id: channel.principal_id,
            reward_earned: 0,
            content_items_count: 0,
        }
    }
}

/// Inclusive length bounds for one channel field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConstraint {
    pub min: u32,
    pub max: u32,
}

impl From<InputValidationLengthConstraint> for ValidationConstraint {
    fn from(c: InputValidationLengthConstraint) -> Self {
        Self {
            min: u32::from(c.min),
            max: c.max(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelValidationConstraints {
    pub handle: ValidationConstraint,
    pub title: ValidationConstraint,
    pub description: ValidationConstraint,
    pub avatar: ValidationConstraint,
    pub banner: ValidationConstraint,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_projects_max() {
        let c = ValidationConstraint::from(InputValidationLengthConstraint::new(5, 20));
        assert_eq!(c, ValidationConstraint { min: 5, max: 25 });
    }
}
