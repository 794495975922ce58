//! Data model for Wikibase claim trees.
//!
//! This module contains the in-memory tree built from an entity document:
//! - Identifiers (entity and property ids)
//! - Typed values and snaks
//! - Claims, qualifiers and references
//! - Entities and whole responses
//! - Builders (construction in code)

pub mod builder;
pub mod claim;
pub mod document;
pub mod entity;
pub mod id;
pub mod keyed;
pub mod reference;
pub mod snak;
pub mod value;

pub use builder::{ClaimBuilder, EntityBuilder, ReferenceBuilder};
pub use claim::{Claim, Rank};
pub use document::EntityDocument;
pub use entity::{Entity, LocalizedText};
pub use id::{entity_prefix, format_entity_id, normalize_property_id, parse_entity_id};
pub use keyed::KeyedList;
pub use reference::Reference;
pub use snak::{DataValue, Snak, SnakType, SnakValue};
pub use value::{
    value_types, EntityRef, GlobeCoordinate, Quantity, RenderedValue, Time, TypedValue, ValueType,
};
