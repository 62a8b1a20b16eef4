//! Entity resolution and caching layer over the versioned store.
//!
//! This crate provides:
//! - [`Transport`] facade, built with [`TransportBuilder`]
//! - Class catalog loaded once per transport
//! - Entity cache that keeps reference-class entities in memory and re-reads
//!   content entities on every query
//! - Typed media records ([`schemas`]) produced through the codec registry
//! - Channel projections and validation constraints
//!
//! ```ignore
//! let transport = Transport::builder().store(store).build()?;
//! let languages = transport.all_languages().await?;
//! let videos = transport.all_videos().await?;
//! ```

pub mod cache;
pub mod catalog;
pub mod channels;
pub mod config;
pub mod error;
pub mod schemas;
pub mod transport;

pub use cache::{CachePartition, EntityCache};
pub use catalog::ClassCatalog;
pub use channels::ChannelDirectory;
pub use config::{TransportConfig, DEFAULT_CACHEABLE_CLASSES, DEFAULT_CLASSES_REQUIRING_INTERNALS};
pub use error::{TransportError, TransportResult};
pub use schemas::TypedEntity;
pub use transport::{Transport, TransportBuilder};
