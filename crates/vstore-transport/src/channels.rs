//! Channel projections. Channels have their own id counter and are never
//! cached.

use std::sync::Arc;

use tracing::debug;
use vstore_store::{ChannelRegistry, StoreResult};
use vstore_types::{ChannelConstraintKind, ChannelId, IdRange};

use crate::schemas::{ChannelEntity, ChannelValidationConstraints, ValidationConstraint};

pub struct ChannelDirectory {
    registry: Arc<dyn ChannelRegistry>,
    first_id: ChannelId,
}

impl ChannelDirectory {
    pub fn new(registry: Arc<dyn ChannelRegistry>, first_id: ChannelId) -> Self {
        Self { registry, first_id }
    }

    pub async fn next_channel_id(&self) -> StoreResult<ChannelId> {
        self.registry.next_channel_id().await
    }

    pub async fn all_channel_ids(&self) -> StoreResult<Vec<ChannelId>> {
        let next = self.next_channel_id().await?;
        Ok(IdRange::new(self.first_id, next).collect())
    }

    /// Every channel in id order. Empty slots in the range are skipped.
    pub async fn all_channels(&self) -> StoreResult<Vec<ChannelEntity>> {
        let ids = self.all_channel_ids().await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let fetched = self.registry.channels_by_ids(&ids).await?;
        let channels: Vec<ChannelEntity> = ids
            .into_iter()
            .zip(fetched)
            .filter_map(|(id, channel)| channel.map(|c| ChannelEntity::from_store(id, c)))
            .collect();
        debug!(count = channels.len(), "channels loaded");
        Ok(channels)
    }

    async fn constraint(&self, kind: ChannelConstraintKind) -> StoreResult<ValidationConstraint> {
        Ok(self.registry.channel_constraint(kind).await?.into())
    }

    pub async fn channel_validation_constraints(&self) -> StoreResult<ChannelValidationConstraints> {
        Ok(ChannelValidationConstraints {
            handle: self.constraint(ChannelConstraintKind::Handle).await?,
            title: self.constraint(ChannelConstraintKind::Title).await?,
            description: self.constraint(ChannelConstraintKind::Description).await?,
            avatar: self.constraint(ChannelConstraintKind::Avatar).await?,
            banner: self.constraint(ChannelConstraintKind::Banner).await?,
        })
    }
}

impl std::fmt::Debug for ChannelDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelDirectory")
            .field("first_id", &self.first_id)
            .finish_non_exhaustive()
    }
}
