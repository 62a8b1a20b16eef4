use async_trait::async_trait;
use vstore_store::StoreResult;
use vstore_types::{Entity, EntityId};

use crate::plain::PlainEntity;
use crate::resolver::CodecResolver;

/// Read-through lookup of raw entities by id.
///
/// Codecs use this to follow entity references. Implementations should answer
/// from whatever cache they hold before going to the store.
#[async_trait]
pub trait EntityLoader: Send + Sync {
    async fn load_entity(&self, id: EntityId) -> StoreResult<Option<Entity>>;
}

/// Per-call inputs to a codec conversion.
#[derive(Clone, Copy)]
pub struct CodecContext<'a> {
    pub loader: &'a dyn EntityLoader,
    pub resolver: &'a CodecResolver,
    /// Expand entity-reference properties into nested records instead of
    /// leaving them as bare ids.
    pub load_internals: bool,
    /// Current nesting depth; top-level conversions run at depth 0.
    pub depth: usize,
    /// Deepest level at which references are still expanded.
    pub max_depth: usize,
}

impl<'a> CodecContext<'a> {
    pub fn new(
        loader: &'a dyn EntityLoader,
        resolver: &'a CodecResolver,
        load_internals: bool,
        max_depth: usize,
    ) -> Self {
        Self {
            loader,
            resolver,
            load_internals,
            depth: 0,
            max_depth,
        }
    }

    /// Whether references met at this depth should be expanded.
    pub fn expands_internals(&self) -> bool {
        self.load_internals && self.depth < self.max_depth
    }

    /// Context for converting a referenced entity one level down.
    pub fn nested(&self) -> Self {
        Self {
            depth: self.depth + 1,
            ..*self
        }
    }
}

impl std::fmt::Debug for CodecContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecContext")
            .field("load_internals", &self.load_internals)
            .field("depth", &self.depth)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

/// Conversion from a raw entity of one class to its plain form.
///
/// `Ok(None)` means this record could not be converted (malformed or partial
/// data); callers drop it and carry on with the rest of the batch. `Err` is a
/// store failure met while following references and must be propagated.
#[async_trait]
pub trait EntityCodec: Send + Sync {
    async fn to_plain(
        &self,
        entity: &Entity,
        ctx: &CodecContext<'_>,
    ) -> StoreResult<Option<PlainEntity>>;
}
