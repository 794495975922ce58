//! Typed claim trees for Wikibase entity documents.
//!
//! This crate turns the JSON returned by a Wikibase entity API (Wikidata's
//! `wbgetentities`) into a typed tree of entities, claims, qualifiers,
//! references and values, and provides:
//!
//! - **Queries** over labels, descriptions, aliases and claims
//! - **Traversal** collecting every entity and property id in the tree
//! - **Canonical serialization** of the tree back to JSON
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use wikibase_claims::{parse, DocumentResolver, EntityBuilder, NoopResolver};
//!
//! let doc = json!({
//!     "entities": {
//!         "Q42": {
//!             "id": "Q42",
//!             "labels": {"en": {"language": "en", "value": "Douglas Adams"}},
//!             "claims": {
//!                 "P31": [{
//!                     "id": "Q42$F078E5B3-F9A8-480E-B7AC-D97778CBBEF9",
//!                     "type": "statement",
//!                     "rank": "normal",
//!                     "mainsnak": {
//!                         "snaktype": "value",
//!                         "property": "P31",
//!                         "datatype": "wikibase-item",
//!                         "datavalue": {
//!                             "type": "wikibase-entityid",
//!                             "value": {"entity-type": "item", "numeric-id": 5, "id": "Q5"}
//!                         }
//!                     }
//!                 }]
//!             }
//!         }
//!     }
//! });
//!
//! let entity = parse(&doc).unwrap();
//! assert_eq!(entity.label("en"), Some("Douglas Adams"));
//! assert_eq!(entity.gather_entity_ids(), vec!["Q42", "Q5"]);
//! assert_eq!(entity.gather_property_ids(), vec!["P31"]);
//!
//! // Entity references render through an explicit resolver.
//! let mut labels = DocumentResolver::new();
//! labels.add_entity(EntityBuilder::new("Q5").label("en", "human").build());
//! let values = entity.property_values("p31", "en", &labels).unwrap().unwrap();
//! assert_eq!(values[0].as_str(), Some("human"));
//!
//! let values = entity.property_values("P31", "en", &NoopResolver).unwrap().unwrap();
//! assert!(values[0].is_absent());
//! ```
//!
//! # Modules
//!
//! - [`model`]: Tree types (Entity, Claim, Snak, Reference, TypedValue)
//! - [`codec`]: Entity API decoding and canonical serialization
//! - [`walk`]: Tree visitor and identifier gathering
//! - [`resolve`]: Label resolvers for entity references
//! - [`config`]: Lookup endpoint and language defaults
//! - [`util`]: Wikibase time handling
//! - [`error`]: Error types
//!
//! # Label lookups
//!
//! Rendering a claim whose value references another entity needs that
//! entity's label. Every query that renders takes a [`LabelResolver`]; the
//! tree itself never performs I/O, and resolver errors are returned to the
//! caller unchanged.

pub mod codec;
pub mod config;
pub mod error;
pub mod model;
pub mod resolve;
pub mod util;
pub mod walk;

// Re-export commonly used types at crate root
pub use codec::{parse, parse_document, parse_document_str, parse_entity, parse_str, parse_tree, serialize_entity};
pub use config::{LookupConfig, DEFAULT_LANGUAGE};
pub use error::{ErrorCode, ParseError, ResolveError};
pub use model::{
    Claim, ClaimBuilder, DataValue, Entity, EntityBuilder, EntityDocument, EntityRef,
    GlobeCoordinate, KeyedList, LocalizedText, Quantity, Rank, Reference, ReferenceBuilder,
    RenderedValue, Snak, SnakType, SnakValue, Time, TypedValue, ValueType,
};
pub use model::id::{format_entity_id, normalize_property_id, parse_entity_id};
pub use resolve::{DocumentResolver, FetchResolver, Fetcher, LabelResolver, NoopResolver};
pub use walk::{gather_entity_ids, gather_property_ids, SnakSite, TreeVisitor};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
