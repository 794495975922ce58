//! JSON encoding and decoding of claim trees.
//!
//! - [`wire`]: the entity API response format
//! - [`tree`]: the canonical serialized form and its reader
//! - [`primitives`]: path-aware field access shared by both

pub mod primitives;
pub mod tree;
pub mod wire;

pub use primitives::ObjectReader;
pub use tree::{parse_tree, serialize_entity};
pub use wire::{decode_typed_value, parse, parse_document, parse_document_str, parse_entity, parse_str};
