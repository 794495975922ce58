//! Decoding of entity API responses (`wbgetentities` JSON).
//!
//! Structurally required fields (a claim's `mainsnak`, a snak's `property`,
//! the payload of a known datavalue type) fail the whole parse. Optional
//! sections that are missing stay `None`.

use serde_json::Value;
use tracing::{debug, trace};

use crate::codec::primitives::ObjectReader;
use crate::error::ParseError;
use crate::model::claim::{Claim, Rank};
use crate::model::document::EntityDocument;
use crate::model::entity::{Entity, LocalizedText};
use crate::model::id::{normalize_property_id, parse_entity_id};
use crate::model::keyed::KeyedList;
use crate::model::reference::Reference;
use crate::model::snak::{DataValue, Snak, SnakType};
use crate::model::value::{
    value_types, EntityRef, GlobeCoordinate, Quantity, Time, TypedValue, ValueType,
};

// =============================================================================
// PUBLIC ENTRY POINTS
// =============================================================================

/// Parses a whole response (`{"entities": {..}, "success": 1}`).
pub fn parse_document(value: &Value) -> Result<EntityDocument, ParseError> {
    decode_document(&ObjectReader::from_value(value, "")?)
}

/// Parses a whole response from JSON text.
pub fn parse_document_str(text: &str) -> Result<EntityDocument, ParseError> {
    let value: Value = serde_json::from_str(text)?;
    parse_document(&value)
}

/// Parses a response and returns its first entity.
///
/// Fails with [`ParseError::NoEntities`] when the response has none.
pub fn parse(value: &Value) -> Result<Entity, ParseError> {
    parse_document(value)?
        .into_entities()
        .into_iter()
        .next()
        .map(|(_, entity)| entity)
        .ok_or(ParseError::NoEntities)
}

/// Like [`parse`], from JSON text.
pub fn parse_str(text: &str) -> Result<Entity, ParseError> {
    let value: Value = serde_json::from_str(text)?;
    parse(&value)
}

/// Parses a single entity object, without the response envelope.
pub fn parse_entity(value: &Value) -> Result<Entity, ParseError> {
    decode_entity(&ObjectReader::from_value(value, "")?)
}

// =============================================================================
// DOCUMENT AND ENTITY
// =============================================================================

fn decode_document(root: &ObjectReader<'_>) -> Result<EntityDocument, ParseError> {
    if let Some(error) = root.optional_object("error")? {
        let reason = error
            .optional_str("info")?
            .or(error.optional_str("code")?)
            .unwrap_or("API error")
            .to_string();
        return Err(ParseError::InvalidValue {
            path: error.path().to_string(),
            reason,
        });
    }

    let entities = root.required_object("entities")?;
    let mut out = KeyedList::new();
    for (key, value) in entities.entries() {
        let reader = ObjectReader::from_value(value, entities.child_path(key))?;
        out.insert(key, decode_entity(&reader)?);
    }

    let success = match root.get("success") {
        None => None,
        Some(Value::Bool(b)) => Some(*b),
        Some(Value::Number(n)) => Some(n.as_i64() == Some(1)),
        Some(_) => return Err(root.invalid("success", "expected 1 or a boolean")),
    };

    Ok(EntityDocument {
        entities: out,
        success,
    })
}

fn decode_entity(r: &ObjectReader<'_>) -> Result<Entity, ParseError> {
    let claims = match r.optional_object("claims")? {
        Some(groups) => Some(decode_claim_groups(&groups)?),
        None => None,
    };

    let entity = Entity {
        id: r.optional_str("id")?.map(str::to_string),
        entity_type: r.optional_str("type")?.map(str::to_string),
        page_id: r.optional_u64("pageid")?,
        namespace: r.optional_i64("ns")?,
        title: r.optional_str("title")?.map(str::to_string),
        last_revision_id: r.optional_u64("lastrevid")?,
        modified: r.optional_str("modified")?.map(str::to_string),
        labels: decode_terms(r, "labels")?,
        descriptions: decode_terms(r, "descriptions")?,
        aliases: decode_aliases(r, "aliases")?,
        claims,
    };

    trace!(
        id = entity.id.as_deref().unwrap_or_default(),
        claim_groups = entity.claims.as_ref().map_or(0, KeyedList::len),
        "decoded entity"
    );
    Ok(entity)
}

fn decode_text(r: &ObjectReader<'_>, lang: &str) -> Result<LocalizedText, ParseError> {
    let language = r.optional_str("language")?.unwrap_or(lang);
    Ok(LocalizedText::new(language, r.required_str("value")?))
}

/// Reads a `lang -> {"language", "value"}` map.
pub(crate) fn decode_terms(
    r: &ObjectReader<'_>,
    key: &str,
) -> Result<Option<KeyedList<LocalizedText>>, ParseError> {
    let Some(terms) = r.optional_object(key)? else {
        return Ok(None);
    };
    let mut out = KeyedList::new();
    for (lang, value) in terms.entries() {
        let text = ObjectReader::from_value(value, terms.child_path(lang))?;
        out.insert(lang, decode_text(&text, lang)?);
    }
    Ok(Some(out))
}

/// Reads a `lang -> [{"language", "value"}, ..]` map.
pub(crate) fn decode_aliases(
    r: &ObjectReader<'_>,
    key: &str,
) -> Result<Option<KeyedList<Vec<LocalizedText>>>, ParseError> {
    let Some(aliases) = r.optional_object(key)? else {
        return Ok(None);
    };
    let mut out = KeyedList::new();
    for (lang, _) in aliases.entries() {
        let items = aliases.optional_array(lang)?.unwrap_or_default();
        let mut list = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let text = ObjectReader::from_value(item, aliases.element_path(lang, i))?;
            list.push(decode_text(&text, lang)?);
        }
        out.insert(lang, list);
    }
    Ok(Some(out))
}

// =============================================================================
// CLAIMS
// =============================================================================

fn decode_claim_groups(groups: &ObjectReader<'_>) -> Result<KeyedList<Vec<Claim>>, ParseError> {
    let mut out: KeyedList<Vec<Claim>> = KeyedList::new();
    for (key, _) in groups.entries() {
        let items = groups.optional_array(key)?.unwrap_or_default();
        let mut claims = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let reader = ObjectReader::from_value(item, groups.element_path(key, i))?;
            claims.push(decode_claim(&reader)?);
        }
        append_group(&mut out, normalize_property_id(key), claims);
    }
    Ok(out)
}

/// Merges into an existing group when two keys differ only by case.
fn append_group<T>(groups: &mut KeyedList<Vec<T>>, key: String, mut items: Vec<T>) {
    if let Some(existing) = groups.insert(key.clone(), Vec::new()) {
        let mut merged = existing;
        merged.append(&mut items);
        items = merged;
    }
    groups.insert(key, items);
}

fn decode_claim(r: &ObjectReader<'_>) -> Result<Claim, ParseError> {
    let id = r.required_str("id")?;
    let rank = match r.optional_str("rank")? {
        None => Rank::default(),
        Some(name) => {
            Rank::from_name(name).ok_or_else(|| r.invalid("rank", format!("unknown rank `{}`", name)))?
        }
    };
    let main_snak = decode_snak(&r.required_object("mainsnak")?)?;

    let qualifiers = match r.optional_object("qualifiers")? {
        Some(groups) => Some(decode_snak_groups(&groups)?),
        None => None,
    };
    let qualifiers_order = match r.optional_array("qualifiers-order")? {
        Some(items) => Some(decode_id_list(r, "qualifiers-order", items)?),
        None => None,
    };
    let references = match r.optional_array("references")? {
        Some(items) => {
            let mut refs = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let reader = ObjectReader::from_value(item, r.element_path("references", i))?;
                refs.push(decode_reference(&reader)?);
            }
            Some(refs)
        }
        None => None,
    };

    Ok(Claim {
        id: id.to_string(),
        statement_type: r.optional_str("type")?.map(str::to_string),
        rank,
        main_snak,
        qualifiers,
        qualifiers_order,
        references,
    })
}

fn decode_reference(r: &ObjectReader<'_>) -> Result<Reference, ParseError> {
    let hash = r.required_str("hash")?;
    let snaks = match r.optional_object("snaks")? {
        Some(groups) => decode_snak_groups(&groups)?,
        None => KeyedList::new(),
    };
    let mut reference = Reference::new(hash, snaks);
    if let Some(items) = r.optional_array("snaks-order")? {
        reference.snaks_order = decode_id_list(r, "snaks-order", items)?;
    }
    Ok(reference)
}

fn decode_id_list(r: &ObjectReader<'_>, key: &str, items: &[Value]) -> Result<Vec<String>, ParseError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(normalize_property_id)
                .ok_or_else(|| ParseError::UnexpectedType {
                    path: r.element_path(key, i),
                    expected: "string",
                })
        })
        .collect()
}

fn decode_snak_groups(groups: &ObjectReader<'_>) -> Result<KeyedList<Vec<Snak>>, ParseError> {
    let mut out = KeyedList::new();
    for (key, _) in groups.entries() {
        let items = groups.optional_array(key)?.unwrap_or_default();
        let mut snaks = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let reader = ObjectReader::from_value(item, groups.element_path(key, i))?;
            snaks.push(decode_snak(&reader)?);
        }
        append_group(&mut out, normalize_property_id(key), snaks);
    }
    Ok(out)
}

// =============================================================================
// SNAKS AND VALUES
// =============================================================================

fn decode_snak(r: &ObjectReader<'_>) -> Result<Snak, ParseError> {
    let name = r.required_str("snaktype")?;
    let snak_type = SnakType::from_name(name)
        .ok_or_else(|| r.invalid("snaktype", format!("unknown snak type `{}`", name)))?;
    let property = normalize_property_id(r.required_str("property")?);
    let data_type = r.optional_str("datatype")?.map(str::to_string);

    let datavalue = match (snak_type, r.optional_object("datavalue")?) {
        (SnakType::NoValue, _) | (_, None) => None,
        (_, Some(dv)) => Some(decode_datavalue(&dv)?),
    };

    let mut snak = Snak::new(snak_type, property, data_type, datavalue);
    snak.hash = r.optional_str("hash")?.map(str::to_string);
    Ok(snak)
}

fn decode_datavalue(r: &ObjectReader<'_>) -> Result<DataValue, ParseError> {
    let tag = r.required_str("type")?;
    let value = match r.get("value") {
        Some(v) => decode_typed_value(tag, v, &r.child_path("value"))?,
        None if ValueType::from_tag(tag) == ValueType::NoValue => TypedValue::NoValue {
            declared_type: value_types::NO_VALUE.to_string(),
        },
        None => {
            return Err(ParseError::MissingField {
                path: r.path().to_string(),
                field: "value",
            })
        }
    };
    Ok(DataValue::new(tag, value))
}

/// Builds the typed value for a datavalue payload.
///
/// Unknown tags keep the payload as [`TypedValue::Plain`].
pub fn decode_typed_value(tag: &str, value: &Value, path: &str) -> Result<TypedValue, ParseError> {
    Ok(match ValueType::from_tag(tag) {
        ValueType::EntityId => decode_entity_ref(&ObjectReader::from_value(value, path)?)?,
        ValueType::Time => TypedValue::Time(decode_time(&ObjectReader::from_value(value, path)?)?),
        ValueType::Quantity => {
            TypedValue::Quantity(decode_quantity(&ObjectReader::from_value(value, path)?)?)
        }
        ValueType::GlobeCoordinate => {
            TypedValue::GlobeCoordinate(decode_globe(&ObjectReader::from_value(value, path)?)?)
        }
        ValueType::NoValue => TypedValue::NoValue {
            declared_type: value_types::NO_VALUE.to_string(),
        },
        ValueType::Other => {
            if !matches!(tag, "string" | "monolingualtext") {
                debug!(%path, tag, "unrecognized datavalue type kept as plain value");
            }
            TypedValue::Plain(value.clone())
        }
    })
}

/// Entity references carry `numeric-id` and `entity-type`; newer documents
/// may only give `id`. Ids without a numeric form (lexeme forms and senses)
/// stay plain.
fn decode_entity_ref(r: &ObjectReader<'_>) -> Result<TypedValue, ParseError> {
    let parsed = r.optional_str("id")?.and_then(parse_entity_id);
    let numeric_id = match (r.optional_u64("numeric-id")?, parsed) {
        (Some(n), _) => n,
        (None, Some((_, n))) => n,
        (None, None) if r.contains("id") => {
            debug!(path = r.path(), "entity id without numeric form kept as plain value");
            return Ok(TypedValue::Plain(r.required("id")?.clone()));
        }
        (None, None) => {
            return Err(ParseError::MissingField {
                path: r.path().to_string(),
                field: "numeric-id",
            })
        }
    };
    let entity_type = match (r.optional_str("entity-type")?, parsed) {
        (Some(t), _) => t,
        (None, Some((t, _))) => t,
        (None, None) => "item",
    };
    Ok(TypedValue::EntityRef(EntityRef::new(entity_type, numeric_id)))
}

pub(crate) fn decode_time(r: &ObjectReader<'_>) -> Result<Time, ParseError> {
    let precision = r.required_u64("precision")?;
    let precision = u8::try_from(precision)
        .map_err(|_| r.invalid("precision", format!("precision {} out of range", precision)))?;
    Ok(Time {
        time: r.required_str("time")?.to_string(),
        timezone: r.required_i64("timezone")?,
        before: r.required_i64("before")?,
        after: r.required_i64("after")?,
        precision,
        calendar_model: r.required_str("calendarmodel")?.to_string(),
    })
}

pub(crate) fn decode_quantity(r: &ObjectReader<'_>) -> Result<Quantity, ParseError> {
    Ok(Quantity {
        amount: r.required_str("amount")?.to_string(),
        unit: r.required_str("unit")?.to_string(),
        upper_bound: r.optional_str("upperBound")?.map(str::to_string),
        lower_bound: r.optional_str("lowerBound")?.map(str::to_string),
    })
}

pub(crate) fn decode_globe(r: &ObjectReader<'_>) -> Result<GlobeCoordinate, ParseError> {
    Ok(GlobeCoordinate {
        latitude: r.required_f64("latitude")?,
        longitude: r.required_f64("longitude")?,
        altitude: r.optional_f64("altitude")?,
        precision: r.optional_f64("precision")?,
        globe: r.required_str("globe")?.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ErrorCode;

    fn item_snak(pid: &str, numeric: u64) -> Value {
        json!({
            "snaktype": "value",
            "property": pid,
            "datatype": "wikibase-item",
            "datavalue": {
                "value": {"entity-type": "item", "numeric-id": numeric, "id": format!("Q{}", numeric)},
                "type": "wikibase-entityid"
            }
        })
    }

    fn claim(pid: &str, numeric: u64) -> Value {
        json!({
            "mainsnak": item_snak(pid, numeric),
            "type": "statement",
            "id": format!("Q1${}-{}", pid, numeric),
            "rank": "normal"
        })
    }

    #[test]
    fn test_parse_minimal_document() {
        let doc = json!({"entities": {"Q1": {"id": "Q1", "type": "item"}}, "success": 1});
        let parsed = parse_document(&doc).unwrap();
        assert_eq!(parsed.success(), Some(true));
        let entity = parsed.first().unwrap();
        assert_eq!(entity.id(), Some("Q1"));
        assert!(entity.labels().is_none());
        assert!(entity.properties().is_none());
    }

    #[test]
    fn test_parse_requires_entities() {
        let err = parse(&json!({"success": 1})).unwrap_err();
        assert_eq!(err.code(), ErrorCode::MissingField);
        assert!(matches!(parse(&json!({"entities": {}})), Err(ParseError::NoEntities)));
        assert!(matches!(parse(&json!({"entities": []})), Err(ParseError::NoEntities)));
    }

    #[test]
    fn test_api_error_is_reported() {
        let doc = json!({"error": {"code": "no-such-entity", "info": "Could not find an entity with the ID \"Q0\"."}});
        let err = parse_document(&doc).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidValue);
        assert!(err.to_string().contains("Could not find"));
    }

    #[test]
    fn test_parse_str_invalid_json() {
        assert_eq!(parse_str("{not json").unwrap_err().code(), ErrorCode::InvalidJson);
    }

    #[test]
    fn test_claim_keys_are_upper_cased() {
        let entity = parse_entity(&json!({
            "id": "Q1",
            "claims": {"p31": [claim("P31", 5)], "P31": [claim("P31", 6)]}
        }))
        .unwrap();
        let claims = entity.property("P31").unwrap();
        assert_eq!(claims.len(), 2);
        assert_eq!(entity.properties().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_mainsnak_is_fatal() {
        let err = parse_entity(&json!({
            "id": "Q1",
            "claims": {"P31": [{"id": "Q1$x", "rank": "normal"}]}
        }))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "[E001] missing required field `mainsnak` at claims.P31[0]"
        );
    }

    #[test]
    fn test_reference_without_hash_is_fatal() {
        let mut c = claim("P31", 5);
        c["references"] = json!([{"snaks": {"P143": [item_snak("P143", 328)]}}]);
        let err = parse_entity(&json!({"id": "Q1", "claims": {"P31": [c]}})).unwrap_err();
        assert!(matches!(err, ParseError::MissingField { field: "hash", .. }));
        assert_eq!(
            err.to_string(),
            "[E001] missing required field `hash` at claims.P31[0].references[0]"
        );
    }

    #[test]
    fn test_unknown_rank_is_invalid() {
        let mut c = claim("P31", 5);
        c["rank"] = json!("best");
        let err = parse_entity(&json!({"claims": {"P31": [c]}})).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidValue);
    }

    #[test]
    fn test_novalue_snak_takes_declared_type() {
        let entity = parse_entity(&json!({
            "id": "Q1",
            "claims": {"P570": [{
                "id": "Q1$d",
                "rank": "normal",
                "mainsnak": {"snaktype": "novalue", "property": "P570", "datatype": "time"}
            }]}
        }))
        .unwrap();
        let snak = entity.property("P570").unwrap()[0].main_snak();
        assert_eq!(snak.snak_type(), SnakType::NoValue);
        assert_eq!(
            snak.typed_value(),
            Some(&TypedValue::NoValue {
                declared_type: "time".to_string()
            })
        );
    }

    #[test]
    fn test_value_snak_without_datavalue() {
        let entity = parse_entity(&json!({
            "claims": {"P19": [{
                "id": "Q1$e",
                "mainsnak": {"snaktype": "value", "property": "P19", "datatype": "wikibase-item"}
            }]}
        }))
        .unwrap();
        assert!(entity.property("P19").unwrap()[0].main_snak().value().is_empty());
    }

    #[test]
    fn test_decode_typed_values() {
        let time = decode_typed_value(
            "time",
            &json!({"time": "+2001-01-15T00:00:00Z", "timezone": 0, "before": 0, "after": 0,
                    "precision": 11, "calendarmodel": "http://www.wikidata.org/entity/Q1985727"}),
            "v",
        )
        .unwrap();
        assert!(matches!(time, TypedValue::Time(ref t) if t.precision == 11));

        let quantity = decode_typed_value("quantity", &json!({"amount": "+10", "unit": "1"}), "v").unwrap();
        assert!(matches!(quantity, TypedValue::Quantity(ref q) if q.upper_bound.is_none()));

        let globe = decode_typed_value(
            "globecoordinate",
            &json!({"latitude": 52.5, "longitude": 13.4, "altitude": null, "precision": null,
                    "globe": "http://www.wikidata.org/entity/Q2"}),
            "v",
        )
        .unwrap();
        assert!(matches!(globe, TypedValue::GlobeCoordinate(ref g) if g.altitude.is_none()));

        let unknown = decode_typed_value("musical-notation", &json!("\\relative c' { c d e }"), "v").unwrap();
        assert_eq!(unknown, TypedValue::Plain(json!("\\relative c' { c d e }")));
    }

    #[test]
    fn test_incomplete_time_is_fatal() {
        let err = decode_typed_value("time", &json!({"time": "+2001-01-15T00:00:00Z"}), "x.value").unwrap_err();
        assert_eq!(err.code(), ErrorCode::MissingField);
        assert!(err.to_string().ends_with("at x.value"));
    }

    #[test]
    fn test_entity_ref_variants() {
        let by_id = decode_typed_value("wikibase-entityid", &json!({"id": "P31"}), "v").unwrap();
        assert_eq!(by_id, TypedValue::EntityRef(EntityRef::new("property", 31)));

        let form = decode_typed_value("wikibase-entityid", &json!({"id": "L1-F2", "entity-type": "form"}), "v").unwrap();
        assert_eq!(form, TypedValue::Plain(json!("L1-F2")));

        assert!(decode_typed_value("wikibase-entityid", &json!({"entity-type": "item"}), "v").is_err());
    }

    #[test]
    fn test_reference_order_and_hashes() {
        let mut c = claim("P31", 5);
        c["references"] = json!([{
            "hash": "fa278ebfc458360e5aed63d5058cca83c46134f1",
            "snaks": {
                "P143": [item_snak("P143", 328)],
                "P813": [{"snaktype": "somevalue", "property": "P813", "datatype": "time"}]
            },
            "snaks-order": ["P813", "P143"]
        }]);
        c["qualifiers"] = json!({"P580": [{"snaktype": "somevalue", "property": "P580", "hash": "abc", "datatype": "time"}]});
        c["qualifiers-order"] = json!(["P580"]);

        let entity = parse_entity(&json!({"claims": {"P31": [c]}})).unwrap();
        let claim = &entity.property("P31").unwrap()[0];
        let reference = &claim.references()[0];
        assert_eq!(reference.snaks_order(), ["P813".to_string(), "P143".to_string()]);
        assert_eq!(reference.snaks().keys().collect::<Vec<_>>(), vec!["P143", "P813"]);
        assert_eq!(claim.qualifier("P580").unwrap()[0].hash(), Some("abc"));
        assert_eq!(claim.qualifiers_order(), Some(&["P580".to_string()][..]));
    }
}
