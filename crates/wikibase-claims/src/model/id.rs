//! Entity and property identifiers.
//!
//! Wikibase identifiers are an entity-type letter followed by a numeric id
//! (`Q42`, `P31`, `L7`). Entity references on the wire carry the type name
//! and the number separately; [`format_entity_id`] joins them.

/// Entity type names paired with their identifier prefix.
const ENTITY_PREFIXES: &[(&str, char)] = &[
    ("item", 'Q'),
    ("property", 'P'),
    ("lexeme", 'L'),
    ("entity-schema", 'E'),
];

/// Prefix used when the entity type is not one of the known kinds.
pub const FALLBACK_PREFIX: char = 'Q';

/// Returns the identifier prefix for an entity type name.
///
/// Unknown types fall back to [`FALLBACK_PREFIX`].
pub fn entity_prefix(entity_type: &str) -> char {
    ENTITY_PREFIXES
        .iter()
        .find(|(name, _)| *name == entity_type)
        .map(|(_, prefix)| *prefix)
        .unwrap_or(FALLBACK_PREFIX)
}

/// Formats the canonical identifier of an entity reference.
///
/// ```
/// use wikibase_claims::format_entity_id;
/// assert_eq!(format_entity_id("item", 42), "Q42");
/// assert_eq!(format_entity_id("property", 31), "P31");
/// ```
pub fn format_entity_id(entity_type: &str, numeric_id: u64) -> String {
    format!("{}{}", entity_prefix(entity_type), numeric_id)
}

/// Splits a canonical identifier into its entity type name and numeric id.
///
/// Accepts either case for the prefix letter. Returns `None` for anything
/// that is not a known prefix followed by a decimal number.
pub fn parse_entity_id(id: &str) -> Option<(&'static str, u64)> {
    let mut chars = id.chars();
    let prefix = chars.next()?.to_ascii_uppercase();
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let numeric_id = digits.parse().ok()?;
    ENTITY_PREFIXES
        .iter()
        .find(|(_, p)| *p == prefix)
        .map(|(name, _)| (*name, numeric_id))
}

/// Normalizes a property id for lookup (`p31` becomes `P31`).
pub fn normalize_property_id(id: &str) -> String {
    id.to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_entity_id() {
        assert_eq!(format_entity_id("item", 5), "Q5");
        assert_eq!(format_entity_id("property", 580), "P580");
        assert_eq!(format_entity_id("lexeme", 1), "L1");
        assert_eq!(format_entity_id("something-new", 9), "Q9");
    }

    #[test]
    fn test_parse_entity_id() {
        assert_eq!(parse_entity_id("Q42"), Some(("item", 42)));
        assert_eq!(parse_entity_id("p31"), Some(("property", 31)));
        assert_eq!(parse_entity_id("L7"), Some(("lexeme", 7)));
        assert_eq!(parse_entity_id("Q"), None);
        assert_eq!(parse_entity_id("Q4x"), None);
        assert_eq!(parse_entity_id("X12"), None);
        assert_eq!(parse_entity_id(""), None);
    }

    #[test]
    fn test_parse_format_agree() {
        for id in ["Q1", "P31", "L99", "E10"] {
            let (kind, n) = parse_entity_id(id).unwrap();
            assert_eq!(format_entity_id(kind, n), id);
        }
    }

    #[test]
    fn test_normalize_property_id() {
        assert_eq!(normalize_property_id("p31"), "P31");
        assert_eq!(normalize_property_id("P31"), "P31");
    }
}
