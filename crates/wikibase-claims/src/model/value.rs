//! Typed values carried by snaks.
//!
//! A datavalue on the wire is `{"type": <tag>, "value": <payload>}`. The tag
//! selects one [`TypedValue`] variant; tags this crate does not model are kept
//! as [`TypedValue::Plain`] with the payload untouched.

use serde_json::{json, Value};

use crate::error::ResolveError;
use crate::model::id::format_entity_id;
use crate::resolve::LabelResolver;
use crate::util::time::{format_wikibase_time, parse_wikibase_time, TimeParseError, WikibaseTimestamp};

/// Datavalue type tags with a dedicated variant.
pub mod value_types {
    pub const ENTITY_ID: &str = "wikibase-entityid";
    pub const TIME: &str = "time";
    pub const QUANTITY: &str = "quantity";
    pub const GLOBE_COORDINATE: &str = "globecoordinate";
    /// Marker recorded for explicit "no value" snaks.
    pub const NO_VALUE: &str = "novalue";
}

/// The datavalue kinds the parser dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    EntityId,
    Time,
    Quantity,
    GlobeCoordinate,
    NoValue,
    /// Any other tag (`string`, `monolingualtext`, future types).
    Other,
}

impl ValueType {
    /// Classifies a wire type tag. Never fails.
    pub fn from_tag(tag: &str) -> ValueType {
        match tag {
            value_types::ENTITY_ID => ValueType::EntityId,
            value_types::TIME => ValueType::Time,
            value_types::QUANTITY => ValueType::Quantity,
            value_types::GLOBE_COORDINATE => ValueType::GlobeCoordinate,
            value_types::NO_VALUE => ValueType::NoValue,
            _ => ValueType::Other,
        }
    }
}

/// A reference to another entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityRef {
    /// Entity type name (`item`, `property`, ...).
    pub entity_type: String,
    pub numeric_id: u64,
}

impl EntityRef {
    pub fn new(entity_type: impl Into<String>, numeric_id: u64) -> Self {
        Self {
            entity_type: entity_type.into(),
            numeric_id,
        }
    }

    /// Canonical identifier, e.g. `Q42`.
    pub fn entity_id(&self) -> String {
        format_entity_id(&self.entity_type, self.numeric_id)
    }
}

/// A point in time with its precision and calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Time {
    /// Wikibase time string, e.g. `+1952-03-11T00:00:00Z`.
    pub time: String,
    /// Offset from UTC in minutes.
    pub timezone: i64,
    pub before: i64,
    pub after: i64,
    /// Precision code (9 = year, 10 = month, 11 = day).
    pub precision: u8,
    /// Calendar model entity URI.
    pub calendar_model: String,
}

impl Time {
    /// Parses the time string into its components.
    pub fn timestamp(&self) -> Result<WikibaseTimestamp, TimeParseError> {
        parse_wikibase_time(&self.time)
    }

    /// Formats the value at its own precision, e.g. `1952-03-11` or `1950s`.
    pub fn display(&self) -> Result<String, TimeParseError> {
        Ok(format_wikibase_time(&self.timestamp()?, self.precision))
    }
}

/// A decimal amount with an optional unit and uncertainty interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantity {
    /// Signed decimal string, e.g. `+1.75`.
    pub amount: String,
    /// Unit entity URI, or `1` for dimensionless quantities.
    pub unit: String,
    pub upper_bound: Option<String>,
    pub lower_bound: Option<String>,
}

impl Quantity {
    /// Identifier of the unit entity, if the quantity has a unit.
    ///
    /// `http://www.wikidata.org/entity/Q11573` yields `Q11573`.
    pub fn unit_id(&self) -> Option<&str> {
        if self.unit == "1" {
            return None;
        }
        self.unit.rsplit('/').next().filter(|s| !s.is_empty())
    }

    /// Amount without the leading `+`, followed by the unit id if any.
    pub fn display(&self) -> String {
        let amount = self.amount.strip_prefix('+').unwrap_or(&self.amount);
        match self.unit_id() {
            Some(unit) => format!("{} {}", amount, unit),
            None => amount.to_string(),
        }
    }
}

/// A position on a globe.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobeCoordinate {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    pub precision: Option<f64>,
    /// Globe entity URI.
    pub globe: String,
}

impl GlobeCoordinate {
    /// Hemisphere notation, e.g. `51.5°N, 0.1275°W`.
    pub fn display(&self) -> String {
        let ns = if self.latitude < 0.0 { 'S' } else { 'N' };
        let ew = if self.longitude < 0.0 { 'W' } else { 'E' };
        format!(
            "{}°{}, {}°{}",
            self.latitude.abs(),
            ns,
            self.longitude.abs(),
            ew
        )
    }
}

/// The payload of a snak.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Scalar or unmodelled payload, kept verbatim.
    Plain(Value),

    /// Reference to another entity.
    EntityRef(EntityRef),

    Time(Time),

    Quantity(Quantity),

    GlobeCoordinate(GlobeCoordinate),

    /// Explicit assertion that the property has no value.
    NoValue {
        /// Data type declared by the snak carrying this marker.
        declared_type: String,
    },
}

impl TypedValue {
    /// Returns the kind of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            TypedValue::Plain(_) => ValueType::Other,
            TypedValue::EntityRef(_) => ValueType::EntityId,
            TypedValue::Time(_) => ValueType::Time,
            TypedValue::Quantity(_) => ValueType::Quantity,
            TypedValue::GlobeCoordinate(_) => ValueType::GlobeCoordinate,
            TypedValue::NoValue { .. } => ValueType::NoValue,
        }
    }

    /// Canonical id of the referenced entity, without any lookup.
    pub fn entity_id(&self) -> Option<String> {
        match self {
            TypedValue::EntityRef(r) => Some(r.entity_id()),
            _ => None,
        }
    }

    /// Renders the value for display in `lang`.
    ///
    /// Entity references are resolved to the target's label through
    /// `resolver`; this is the only variant that performs a lookup, and a
    /// failing lookup is returned as is. Time, quantity and coordinate values
    /// render as themselves.
    pub fn render<R>(&self, lang: &str, resolver: &R) -> Result<RenderedValue<'_>, ResolveError>
    where
        R: LabelResolver + ?Sized,
    {
        Ok(match self {
            TypedValue::Plain(v) => RenderedValue::Plain(v),
            TypedValue::EntityRef(r) => {
                RenderedValue::Label(resolver.resolve_label(&r.entity_id(), lang)?)
            }
            TypedValue::NoValue { .. } => RenderedValue::Absent,
            _ => RenderedValue::Structured(self),
        })
    }

    /// JSON projection of the value.
    ///
    /// Entity references project to their canonical id string only;
    /// "no value" projects to `null`.
    pub fn serialize(&self) -> Value {
        match self {
            TypedValue::Plain(v) => v.clone(),
            TypedValue::EntityRef(r) => Value::String(r.entity_id()),
            TypedValue::Time(t) => json!({
                "time": t.time,
                "timezone": t.timezone,
                "before": t.before,
                "after": t.after,
                "precision": t.precision,
                "calendarmodel": t.calendar_model,
            }),
            TypedValue::Quantity(q) => json!({
                "amount": q.amount,
                "unit": q.unit,
                "upperBound": q.upper_bound,
                "lowerBound": q.lower_bound,
            }),
            TypedValue::GlobeCoordinate(g) => json!({
                "latitude": g.latitude,
                "longitude": g.longitude,
                "altitude": g.altitude,
                "precision": g.precision,
                "globe": g.globe,
            }),
            TypedValue::NoValue { .. } => Value::Null,
        }
    }
}

/// Result of rendering a snak value.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedValue<'a> {
    /// Plain payload as stored.
    Plain(&'a Value),
    /// Label of a referenced entity; `None` when it has no label in the
    /// requested language.
    Label(Option<String>),
    /// Time, quantity or coordinate value, unformatted.
    Structured(&'a TypedValue),
    /// "No value" marker or a snak without a datavalue.
    Absent,
}

impl RenderedValue<'_> {
    /// The rendered text, when the value is textual.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RenderedValue::Plain(Value::String(s)) => Some(s.as_str()),
            RenderedValue::Label(Some(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, RenderedValue::Absent | RenderedValue::Label(None))
    }

    /// String key used when rendered values index a map.
    ///
    /// Text renders as itself, other plain scalars and structured values as
    /// their compact JSON, and anything absent as the empty string.
    pub fn key(&self) -> String {
        match self {
            RenderedValue::Plain(Value::String(s)) => s.clone(),
            RenderedValue::Plain(Value::Null) => String::new(),
            RenderedValue::Plain(v) => v.to_string(),
            RenderedValue::Label(label) => label.clone().unwrap_or_default(),
            RenderedValue::Structured(v) => v.serialize().to_string(),
            RenderedValue::Absent => String::new(),
        }
    }

    /// JSON form of the rendered value.
    pub fn to_json(&self) -> Value {
        match self {
            RenderedValue::Plain(v) => (*v).clone(),
            RenderedValue::Label(Some(s)) => Value::String(s.clone()),
            RenderedValue::Label(None) | RenderedValue::Absent => Value::Null,
            RenderedValue::Structured(v) => v.serialize(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::NoopResolver;

    fn sample_time() -> Time {
        Time {
            time: "+1952-03-11T00:00:00Z".to_string(),
            timezone: 0,
            before: 0,
            after: 0,
            precision: 11,
            calendar_model: "http://www.wikidata.org/entity/Q1985727".to_string(),
        }
    }

    #[test]
    fn test_value_type_from_tag() {
        assert_eq!(ValueType::from_tag("wikibase-entityid"), ValueType::EntityId);
        assert_eq!(ValueType::from_tag("time"), ValueType::Time);
        assert_eq!(ValueType::from_tag("quantity"), ValueType::Quantity);
        assert_eq!(ValueType::from_tag("globecoordinate"), ValueType::GlobeCoordinate);
        assert_eq!(ValueType::from_tag("novalue"), ValueType::NoValue);
        assert_eq!(ValueType::from_tag("string"), ValueType::Other);
        assert_eq!(ValueType::from_tag("musical-notation"), ValueType::Other);
    }

    #[test]
    fn test_entity_ref_serializes_to_id() {
        let v = TypedValue::EntityRef(EntityRef::new("item", 5));
        assert_eq!(v.serialize(), json!("Q5"));
        assert_eq!(v.entity_id().as_deref(), Some("Q5"));
        assert_eq!(TypedValue::Plain(json!("Q5")).entity_id(), None);
    }

    #[test]
    fn test_no_value_serializes_to_null() {
        let v = TypedValue::NoValue {
            declared_type: "time".to_string(),
        };
        assert_eq!(v.serialize(), Value::Null);
        assert_eq!(v.render("en", &NoopResolver).unwrap(), RenderedValue::Absent);
    }

    #[test]
    fn test_structured_values_render_as_themselves() {
        let v = TypedValue::Time(sample_time());
        assert_eq!(v.render("en", &NoopResolver).unwrap(), RenderedValue::Structured(&v));
        assert_eq!(v.serialize()["calendarmodel"], json!("http://www.wikidata.org/entity/Q1985727"));
    }

    #[test]
    fn test_plain_renders_verbatim() {
        let v = TypedValue::Plain(json!("Douglas Adams"));
        let rendered = v.render("de", &NoopResolver).unwrap();
        assert_eq!(rendered.as_str(), Some("Douglas Adams"));
        assert_eq!(rendered.key(), "Douglas Adams");
    }

    #[test]
    fn test_rendered_keys() {
        let n = json!(42);
        assert_eq!(RenderedValue::Plain(&n).key(), "42");
        assert_eq!(RenderedValue::Label(None).key(), "");
        assert_eq!(RenderedValue::Absent.key(), "");
        assert!(RenderedValue::Label(None).is_absent());
    }

    #[test]
    fn test_time_display() {
        assert_eq!(sample_time().display().unwrap(), "1952-03-11");
        let bad = Time {
            time: "yesterday".to_string(),
            ..sample_time()
        };
        assert!(bad.display().is_err());

        let multibyte = Time {
            time: "+2001-01-01T00:00:0é".to_string(),
            ..sample_time()
        };
        assert!(multibyte.display().is_err());
    }

    #[test]
    fn test_quantity_display() {
        let q = Quantity {
            amount: "+1.75".to_string(),
            unit: "http://www.wikidata.org/entity/Q11573".to_string(),
            upper_bound: None,
            lower_bound: None,
        };
        assert_eq!(q.unit_id(), Some("Q11573"));
        assert_eq!(q.display(), "1.75 Q11573");

        let count = Quantity {
            amount: "+3".to_string(),
            unit: "1".to_string(),
            upper_bound: Some("+4".to_string()),
            lower_bound: Some("+2".to_string()),
        };
        assert_eq!(count.unit_id(), None);
        assert_eq!(count.display(), "3");
        assert_eq!(TypedValue::Quantity(count).serialize()["upperBound"], json!("+4"));
    }

    #[test]
    fn test_coordinate_display() {
        let g = GlobeCoordinate {
            latitude: 51.5,
            longitude: -0.1275,
            altitude: None,
            precision: Some(0.0001),
            globe: "http://www.wikidata.org/entity/Q2".to_string(),
        };
        assert_eq!(g.display(), "51.5°N, 0.1275°W");
        assert_eq!(TypedValue::GlobeCoordinate(g).serialize()["altitude"], Value::Null);
    }
}
