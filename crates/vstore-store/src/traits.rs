use async_trait::async_trait;
use vstore_types::{
    Channel, ChannelConstraintKind, ChannelId, Class, ClassId, Entity, EntityId,
    InputValidationLengthConstraint,
};

use crate::error::StoreResult;

/// Read boundary of the versioned store (classes and entities).
///
/// All implementations must satisfy these invariants:
/// - `next_class_id` / `next_entity_id` are exclusive upper bounds of the
///   assigned id ranges; ids are never reused.
/// - Batch lookups return exactly one slot per requested id, in the order the
///   ids were given. A slot is `None` when the record does not exist.
/// - Records are append-only; an entity read twice without an intervening
///   write yields the same value.
/// - Timeouts and retries, if any, are the implementation's business. Errors
///   surface unmodified to the caller.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Whether the store handle is connected and able to serve queries.
    fn is_ready(&self) -> bool {
        true
    }

    async fn next_class_id(&self) -> StoreResult<ClassId>;

    async fn next_entity_id(&self) -> StoreResult<EntityId>;

    async fn class_by_id(&self, id: ClassId) -> StoreResult<Option<Class>>;

    /// Read multiple classes in one round-trip.
    ///
    /// Default implementation calls `class_by_id()` for each ID. Backends
    /// should override to batch the query.
    async fn classes_by_ids(&self, ids: &[ClassId]) -> StoreResult<Vec<Option<Class>>> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            out.push(self.class_by_id(*id).await?);
        }
        Ok(out)
    }

    async fn entity_by_id(&self, id: EntityId) -> StoreResult<Option<Entity>>;

    /// Read multiple entities in one round-trip.
    ///
    /// Default implementation calls `entity_by_id()` for each ID. Backends
    /// should override to batch the query.
    async fn entities_by_ids(&self, ids: &[EntityId]) -> StoreResult<Vec<Option<Entity>>> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            out.push(self.entity_by_id(*id).await?);
        }
        Ok(out)
    }
}

/// Read boundary of the content working group module (channels).
#[async_trait]
pub trait ChannelRegistry: Send + Sync {
    async fn next_channel_id(&self) -> StoreResult<ChannelId>;

    async fn channel_by_id(&self, id: ChannelId) -> StoreResult<Option<Channel>>;

    /// Read multiple channels in one round-trip, preserving request order.
    async fn channels_by_ids(&self, ids: &[ChannelId]) -> StoreResult<Vec<Option<Channel>>> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            out.push(self.channel_by_id(*id).await?);
        }
        Ok(out)
    }

    /// Length constraint configured for one channel field.
    async fn channel_constraint(
        &self,
        kind: ChannelConstraintKind,
    ) -> StoreResult<InputValidationLengthConstraint>;
}
