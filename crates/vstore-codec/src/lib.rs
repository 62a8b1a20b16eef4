//! Entity codecs for the versioned store.
//!
//! A codec turns a raw [`Entity`](vstore_types::Entity) into a
//! [`PlainEntity`]: the entity id plus a JSON object of named, decoded
//! property values, which deserializes into a typed domain record.
//!
//! # Key Types
//!
//! - [`EntityCodec`] -- per-class conversion capability
//! - [`CodecContext`] -- per-call inputs: entity loader, resolver, expansion flag
//! - [`SchemaCodec`] -- default codec driven by the class schema
//! - [`CodecResolver`] -- immutable registry from class id to codec
//!
//! Conversions may recurse: a codec that expands entity references loads the
//! referenced entity through the context's [`EntityLoader`] and converts it
//! with the codec registered for its class.

pub mod codec;
pub mod plain;
pub mod resolver;
pub mod schema;

pub use codec::{CodecContext, EntityCodec, EntityLoader};
pub use plain::PlainEntity;
pub use resolver::{CodecOverrides, CodecResolver};
pub use schema::{field_key, SchemaCodec};
