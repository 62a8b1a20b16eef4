//! Query interface to the versioned object store.
//!
//! The store is a schema-described key/value ledger holding class and entity
//! records, with a separate channel module. This crate defines the read-only
//! boundary the resolution layer consumes; writes belong to the transaction
//! layer and never pass through here.
//!
//! # Backends
//!
//! All backends implement [`ObjectStore`] and [`ChannelRegistry`]:
//!
//! - [`InMemoryObjectStore`] -- lock-protected store with fetch counters, for
//!   tests and embedding
//!
//! # Rules
//!
//! 1. Ids in each space are assigned monotonically from 1; `next_*_id` is the
//!    exclusive upper bound of the assigned range.
//! 2. Batch lookups return one slot per requested id, in request order.
//! 3. A missing record is `Ok(None)`, not an error.
//! 4. I/O failures are returned as [`StoreError`] and never retried here.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::{FetchStats, InMemoryObjectStore};
pub use traits::{ChannelRegistry, ObjectStore};
