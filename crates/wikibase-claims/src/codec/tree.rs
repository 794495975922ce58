//! Canonical JSON form of a claim tree, and reading it back.
//!
//! ```text
//! {
//!   "id": "Q42",
//!   "labels":       { <lang>: {"language", "value"} },
//!   "descriptions": { <lang>: {"language", "value"} },
//!   "aliases":      { <lang>: [{"language", "value"}] },
//!   "properties":   { <pid>: [{"id", "rank", "value", "qualifiers", "references"}] }
//! }
//! ```
//!
//! Every snak is written as `{"type": <data type>, "value": <value>}`. Maps
//! are written in document order.
//!
//! [`parse_tree`] reads this shape back. It cannot recover what the shape
//! leaves out: snak types of `null` values (read as `somevalue`), datavalue
//! tags (derived from the data type), hashes of qualifier snaks, statement
//! types, declared orders, and entity metadata other than the id.

use serde_json::{json, Map, Value};

use crate::codec::primitives::ObjectReader;
use crate::codec::wire::{decode_aliases, decode_globe, decode_quantity, decode_terms, decode_time};
use crate::error::ParseError;
use crate::model::claim::{Claim, Rank};
use crate::model::entity::{Entity, LocalizedText};
use crate::model::id::{normalize_property_id, parse_entity_id};
use crate::model::keyed::KeyedList;
use crate::model::reference::Reference;
use crate::model::snak::{DataValue, Snak, SnakType};
use crate::model::value::{EntityRef, TypedValue};

/// Data types whose values are entity references.
const ENTITY_DATA_TYPES: &[&str] = &[
    "wikibase-item",
    "wikibase-property",
    "wikibase-lexeme",
    "entity-schema",
];

// =============================================================================
// ENCODING
// =============================================================================

/// Serializes a whole entity.
pub fn serialize_entity(entity: &Entity) -> Value {
    encode_entity(entity)
}

pub(crate) fn encode_entity(entity: &Entity) -> Value {
    let aliases: Map<String, Value> = entity
        .aliases
        .iter()
        .flat_map(|a| a.iter())
        .map(|(lang, list)| (lang.to_string(), list.iter().map(encode_text).collect()))
        .collect();

    let properties: Map<String, Value> = entity
        .claims
        .iter()
        .flat_map(|c| c.iter())
        .map(|(pid, claims)| (pid.to_string(), claims.iter().map(encode_claim).collect()))
        .collect();

    json!({
        "id": entity.id,
        "labels": encode_terms(entity.labels.as_ref()),
        "descriptions": encode_terms(entity.descriptions.as_ref()),
        "aliases": aliases,
        "properties": properties,
    })
}

fn encode_text(text: &LocalizedText) -> Value {
    json!({"language": text.language, "value": text.value})
}

fn encode_terms(terms: Option<&KeyedList<LocalizedText>>) -> Value {
    let map: Map<String, Value> = terms
        .into_iter()
        .flat_map(KeyedList::iter)
        .map(|(lang, text)| (lang.to_string(), encode_text(text)))
        .collect();
    Value::Object(map)
}

fn encode_snak_groups(groups: Option<&KeyedList<Vec<Snak>>>) -> Value {
    let map: Map<String, Value> = groups
        .into_iter()
        .flat_map(KeyedList::iter)
        .map(|(pid, snaks)| (pid.to_string(), snaks.iter().map(encode_snak).collect()))
        .collect();
    Value::Object(map)
}

pub(crate) fn encode_claim(claim: &Claim) -> Value {
    json!({
        "id": claim.id,
        "rank": claim.rank.as_str(),
        "value": encode_snak(&claim.main_snak),
        "qualifiers": encode_snak_groups(claim.qualifiers.as_ref()),
        "references": claim.references().iter().map(encode_reference).collect::<Vec<_>>(),
    })
}

pub(crate) fn encode_reference(reference: &Reference) -> Value {
    json!({
        "hash": reference.hash,
        "value": encode_snak_groups(Some(&reference.snaks)),
    })
}

pub(crate) fn encode_snak(snak: &Snak) -> Value {
    json!({
        "type": snak.data_type,
        "value": snak.value.serialize(),
    })
}

// =============================================================================
// DECODING
// =============================================================================

/// Reads an entity from its canonical form.
///
/// Empty sections are read back as absent.
pub fn parse_tree(value: &Value) -> Result<Entity, ParseError> {
    let r = ObjectReader::from_value(value, "")?;

    let claims = match r.optional_object("properties")? {
        Some(groups) if !groups.is_empty() => {
            let mut out = KeyedList::new();
            for (key, _) in groups.entries() {
                let pid = normalize_property_id(key);
                let items = groups.optional_array(key)?.unwrap_or_default();
                let mut claims = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    let reader = ObjectReader::from_value(item, groups.element_path(key, i))?;
                    claims.push(decode_claim(&reader, &pid)?);
                }
                out.insert(pid, claims);
            }
            Some(out)
        }
        _ => None,
    };

    Ok(Entity {
        id: r.optional_str("id")?.map(str::to_string),
        labels: decode_terms(&r, "labels")?.filter(|t| !t.is_empty()),
        descriptions: decode_terms(&r, "descriptions")?.filter(|t| !t.is_empty()),
        aliases: decode_aliases(&r, "aliases")?.filter(|a| !a.is_empty()),
        claims,
        ..Entity::default()
    })
}

fn decode_claim(r: &ObjectReader<'_>, pid: &str) -> Result<Claim, ParseError> {
    let rank_name = r.required_str("rank")?;
    let rank = Rank::from_name(rank_name)
        .ok_or_else(|| r.invalid("rank", format!("unknown rank `{}`", rank_name)))?;
    let main_snak = decode_snak(&r.required_object("value")?, pid)?;

    let mut claim = Claim::new(r.required_str("id")?, rank, main_snak);
    if let Some(groups) = r.optional_object("qualifiers")? {
        if !groups.is_empty() {
            claim.qualifiers = Some(decode_snak_groups(&groups)?);
        }
    }
    if let Some(items) = r.optional_array("references")? {
        let mut refs = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let reader = ObjectReader::from_value(item, r.element_path("references", i))?;
            let snaks = match reader.optional_object("value")? {
                Some(groups) => decode_snak_groups(&groups)?,
                None => KeyedList::new(),
            };
            refs.push(Reference::new(reader.required_str("hash")?, snaks));
        }
        if !refs.is_empty() {
            claim.references = Some(refs);
        }
    }
    Ok(claim)
}

fn decode_snak_groups(groups: &ObjectReader<'_>) -> Result<KeyedList<Vec<Snak>>, ParseError> {
    let mut out = KeyedList::new();
    for (key, _) in groups.entries() {
        let pid = normalize_property_id(key);
        let items = groups.optional_array(key)?.unwrap_or_default();
        let mut snaks = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let reader = ObjectReader::from_value(item, groups.element_path(key, i))?;
            snaks.push(decode_snak(&reader, &pid)?);
        }
        out.insert(pid, snaks);
    }
    Ok(out)
}

fn decode_snak(r: &ObjectReader<'_>, pid: &str) -> Result<Snak, ParseError> {
    let data_type = r.optional_str("type")?;
    let Some(value) = r.get("value") else {
        return Ok(Snak::new(
            SnakType::SomeValue,
            pid,
            data_type.map(str::to_string),
            None,
        ));
    };
    let typed = typed_from_canonical(data_type.unwrap_or_default(), value, &r.child_path("value"));
    Ok(Snak::new(
        SnakType::Value,
        pid,
        data_type.map(str::to_string),
        Some(DataValue::from_typed(typed)),
    ))
}

/// Recovers a typed value from its projection using the declared data
/// type. Anything that does not fit the data type stays plain.
fn typed_from_canonical(data_type: &str, value: &Value, path: &str) -> TypedValue {
    let typed = match (data_type, value) {
        (dt, Value::String(s)) if ENTITY_DATA_TYPES.contains(&dt) => parse_entity_id(s)
            .map(|(entity_type, n)| TypedValue::EntityRef(EntityRef::new(entity_type, n))),
        ("time", v) => ObjectReader::from_value(v, path)
            .ok()
            .and_then(|r| decode_time(&r).ok())
            .map(TypedValue::Time),
        ("quantity", v) => ObjectReader::from_value(v, path)
            .ok()
            .and_then(|r| decode_quantity(&r).ok())
            .map(TypedValue::Quantity),
        ("globe-coordinate", v) => ObjectReader::from_value(v, path)
            .ok()
            .and_then(|r| decode_globe(&r).ok())
            .map(TypedValue::GlobeCoordinate),
        _ => None,
    };
    typed.unwrap_or_else(|| TypedValue::Plain(value.clone()))
}
