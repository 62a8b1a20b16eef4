//! Foundation types for the versioned store.
//!
//! This crate provides the identity and record types shared by every other
//! `vstore` crate. The store keeps two kinds of schema-described records,
//! classes and entities, plus channel records from a separate ledger module.
//!
//! # Key Types
//!
//! - [`ClassId`], [`EntityId`], [`ChannelId`] -- monotonically assigned ids
//! - [`IdRange`] -- dense ascending walk over an id space up to a "next id"
//! - [`Class`] / [`Property`] / [`PropertyType`] -- schema definitions
//! - [`Entity`] / [`PropertyValue`] / [`Value`] -- raw instance records
//! - [`Channel`] -- content working group channel record

pub mod channel;
pub mod class;
pub mod entity;
pub mod error;
pub mod id;
pub mod range;

pub use channel::{
    Channel, ChannelConstraintKind, ChannelContentType, ChannelCurationStatus,
    ChannelPublicationStatus, InputValidationLengthConstraint,
};
pub use class::{Class, Property, PropertyType};
pub use entity::{Entity, PropertyValue, Value};
pub use error::TypeError;
pub use id::{ChannelId, ClassId, EntityId, MemberId, SequentialId};
pub use range::IdRange;
