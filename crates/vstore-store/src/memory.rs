use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::debug;
use vstore_types::{
    Channel, ChannelConstraintKind, ChannelId, Class, ClassId, Entity, EntityId,
    InputValidationLengthConstraint, Property, PropertyValue,
};

use crate::error::{StoreError, StoreResult};
use crate::traits::{ChannelRegistry, ObjectStore};

/// Snapshot of the query counters of an [`InMemoryObjectStore`].
///
/// Each batched lookup counts as one round-trip regardless of its size;
/// `entities_fetched` counts the ids requested across all entity lookups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FetchStats {
    pub next_class_id: u64,
    pub next_entity_id: u64,
    pub next_channel_id: u64,
    pub class_singles: u64,
    pub class_batches: u64,
    pub entity_singles: u64,
    pub entity_batches: u64,
    pub entities_fetched: u64,
    pub channel_singles: u64,
    pub channel_batches: u64,
    pub constraint_reads: u64,
}

#[derive(Default)]
struct Counters {
    next_class_id: AtomicU64,
    next_entity_id: AtomicU64,
    next_channel_id: AtomicU64,
    class_singles: AtomicU64,
    class_batches: AtomicU64,
    entity_singles: AtomicU64,
    entity_batches: AtomicU64,
    entities_fetched: AtomicU64,
    channel_singles: AtomicU64,
    channel_batches: AtomicU64,
    constraint_reads: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64, by: u64) {
        counter.fetch_add(by, Ordering::Relaxed);
    }

    fn snapshot(&self) -> FetchStats {
        let get = |c: &AtomicU64| c.load(Ordering::Relaxed);
        FetchStats {
            next_class_id: get(&self.next_class_id),
            next_entity_id: get(&self.next_entity_id),
            next_channel_id: get(&self.next_channel_id),
            class_singles: get(&self.class_singles),
            class_batches: get(&self.class_batches),
            entity_singles: get(&self.entity_singles),
            entity_batches: get(&self.entity_batches),
            entities_fetched: get(&self.entities_fetched),
            channel_singles: get(&self.channel_singles),
            channel_batches: get(&self.channel_batches),
            constraint_reads: get(&self.constraint_reads),
        }
    }
}

#[derive(Default)]
struct StoreState {
    /// Classes in id order; class `n` lives at index `n - 1`.
    classes: Vec<Class>,
    entities: BTreeMap<EntityId, Entity>,
    last_entity_id: u64,
    channels: BTreeMap<ChannelId, Channel>,
    last_channel_id: u64,
    constraints: HashMap<ChannelConstraintKind, InputValidationLengthConstraint>,
}

/// In-memory versioned store.
///
/// Intended for tests and embedding. Besides serving the read traits it
/// exposes the write operations the transaction layer would perform, counts
/// every query, and can simulate an unready or unreachable backend.
pub struct InMemoryObjectStore {
    state: RwLock<StoreState>,
    counters: Counters,
    ready: AtomicBool,
    unavailable: AtomicBool,
}

impl InMemoryObjectStore {
    /// Create a new empty, ready store.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            counters: Counters::default(),
            ready: AtomicBool::new(true),
            unavailable: AtomicBool::new(false),
        }
    }

    fn read_state(&self) -> StoreResult<RwLockReadGuard<'_, StoreState>> {
        self.state.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write_state(&self) -> StoreResult<RwLockWriteGuard<'_, StoreState>> {
        self.state.write().map_err(|_| StoreError::LockPoisoned)
    }

    fn check_reachable(&self) -> StoreResult<()> {
        if !self.ready.load(Ordering::Acquire) {
            return Err(StoreError::NotReady);
        }
        if self.unavailable.load(Ordering::Acquire) {
            return Err(StoreError::Unavailable("simulated outage".into()));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Create a class and return its id.
    pub fn create_class(
        &self,
        name: impl Into<String>,
        properties: Vec<Property>,
    ) -> StoreResult<ClassId> {
        let mut state = self.write_state()?;
        let id = ClassId::new(state.classes.len() as u64 + 1);
        let mut class = Class::new(id, name);
        class.properties = properties;
        debug!(class = %class.name, %id, "class created");
        state.classes.push(class);
        Ok(id)
    }

    /// Create an entity of an existing class and return its id.
    pub fn create_entity(
        &self,
        class_id: ClassId,
        values: Vec<PropertyValue>,
    ) -> StoreResult<EntityId> {
        let mut state = self.write_state()?;
        if !class_exists(&state, class_id) {
            return Err(StoreError::UnknownClass(class_id));
        }
        state.last_entity_id += 1;
        let id = EntityId::new(state.last_entity_id);
        state.entities.insert(
            id,
            Entity {
                id,
                class_id,
                values,
            },
        );
        Ok(id)
    }

    /// Replace the property values of an existing entity.
    pub fn update_entity(&self, id: EntityId, values: Vec<PropertyValue>) -> StoreResult<()> {
        let mut state = self.write_state()?;
        let entity = state
            .entities
            .get_mut(&id)
            .ok_or(StoreError::UnknownEntity(id))?;
        entity.values = values;
        Ok(())
    }

    /// Remove an entity while keeping its id assigned, leaving a hole in the
    /// id range.
    pub fn remove_entity(&self, id: EntityId) -> StoreResult<bool> {
        let mut state = self.write_state()?;
        Ok(state.entities.remove(&id).is_some())
    }

    /// Create a channel and return its id.
    pub fn create_channel(&self, channel: Channel) -> StoreResult<ChannelId> {
        let mut state = self.write_state()?;
        state.last_channel_id += 1;
        let id = ChannelId::new(state.last_channel_id);
        state.channels.insert(id, channel);
        Ok(id)
    }

    pub fn set_channel_constraint(
        &self,
        kind: ChannelConstraintKind,
        constraint: InputValidationLengthConstraint,
    ) -> StoreResult<()> {
        self.write_state()?.constraints.insert(kind, constraint);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Instrumentation
    // -----------------------------------------------------------------------

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }

    /// Make every subsequent query fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Release);
    }

    /// Current query counters.
    pub fn stats(&self) -> FetchStats {
        self.counters.snapshot()
    }
}

fn class_exists(state: &StoreState, id: ClassId) -> bool {
    id.get() >= 1 && id.get() <= state.classes.len() as u64
}

fn class_at(state: &StoreState, id: ClassId) -> Option<Class> {
    let index = usize::try_from(id.get()).ok()?.checked_sub(1)?;
    state.classes.get(index).cloned()
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    async fn next_class_id(&self) -> StoreResult<ClassId> {
        self.check_reachable()?;
        Counters::bump(&self.counters.next_class_id, 1);
        let state = self.read_state()?;
        Ok(ClassId::new(state.classes.len() as u64 + 1))
    }

    async fn next_entity_id(&self) -> StoreResult<EntityId> {
        self.check_reachable()?;
        Counters::bump(&self.counters.next_entity_id, 1);
        let state = self.read_state()?;
        Ok(EntityId::new(state.last_entity_id + 1))
    }

    async fn class_by_id(&self, id: ClassId) -> StoreResult<Option<Class>> {
        self.check_reachable()?;
        Counters::bump(&self.counters.class_singles, 1);
        let state = self.read_state()?;
        Ok(class_at(&state, id))
    }

    async fn classes_by_ids(&self, ids: &[ClassId]) -> StoreResult<Vec<Option<Class>>> {
        self.check_reachable()?;
        Counters::bump(&self.counters.class_batches, 1);
        let state = self.read_state()?;
        Ok(ids.iter().map(|id| class_at(&state, *id)).collect())
    }

    async fn entity_by_id(&self, id: EntityId) -> StoreResult<Option<Entity>> {
        self.check_reachable()?;
        Counters::bump(&self.counters.entity_singles, 1);
        Counters::bump(&self.counters.entities_fetched, 1);
        let state = self.read_state()?;
        Ok(state.entities.get(&id).cloned())
    }

    async fn entities_by_ids(&self, ids: &[EntityId]) -> StoreResult<Vec<Option<Entity>>> {
        self.check_reachable()?;
        Counters::bump(&self.counters.entity_batches, 1);
        Counters::bump(&self.counters.entities_fetched, ids.len() as u64);
        let state = self.read_state()?;
        Ok(ids.iter().map(|id| state.entities.get(id).cloned()).collect())
    }
}

#[async_trait]
impl ChannelRegistry for InMemoryObjectStore {
    async fn next_channel_id(&self) -> StoreResult<ChannelId> {
        self.check_reachable()?;
        Counters::bump(&self.counters.next_channel_id, 1);
        let state = self.read_state()?;
        Ok(ChannelId::new(state.last_channel_id + 1))
    }

    async fn channel_by_id(&self, id: ChannelId) -> StoreResult<Option<Channel>> {
        self.check_reachable()?;
        Counters::bump(&self.counters.channel_singles, 1);
        let state = self.read_state()?;
        Ok(state.channels.get(&id).cloned())
    }

    async fn channels_by_ids(&self, ids: &[ChannelId]) -> StoreResult<Vec<Option<Channel>>> {
        self.check_reachable()?;
        Counters::bump(&self.counters.channel_batches, 1);
        let state = self.read_state()?;
        Ok(ids.iter().map(|id| state.channels.get(id).cloned()).collect())
    }

    /// Unset constraints read as zero, like an empty storage slot.
    async fn channel_constraint(
        &self,
        kind: ChannelConstraintKind,
    ) -> StoreResult<InputValidationLengthConstraint> {
        self.check_reachable()?;
        Counters::bump(&self.counters.constraint_reads, 1);
        let state = self.read_state()?;
        Ok(state
            .constraints
            .get(&kind)
            .copied()
            .unwrap_or(InputValidationLengthConstraint::new(0, 0)))
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("InMemoryObjectStore");
        if let Ok(state) = self.state.read() {
            s.field("classes", &state.classes.len())
                .field("entities", &state.entities.len())
                .field("channels", &state.channels.len());
        }
        s.field("stats", &self.stats()).finish()
    }
}
