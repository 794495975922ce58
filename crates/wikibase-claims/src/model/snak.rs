//! Snaks: single typed property assertions.
//!
//! The same shape is used for a claim's main value, for qualifiers and for
//! the entries of a reference.

use serde_json::Value;

use crate::error::ResolveError;
use crate::model::value::{value_types, RenderedValue, TypedValue};
use crate::resolve::LabelResolver;

/// Whether a snak states a value, states that there is none, or states that
/// one exists but is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnakType {
    Value,
    NoValue,
    SomeValue,
}

impl SnakType {
    /// Parses the wire name (`value`, `novalue`, `somevalue`).
    pub fn from_name(name: &str) -> Option<SnakType> {
        match name {
            "value" => Some(SnakType::Value),
            "novalue" => Some(SnakType::NoValue),
            "somevalue" => Some(SnakType::SomeValue),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SnakType::Value => "value",
            SnakType::NoValue => "novalue",
            SnakType::SomeValue => "somevalue",
        }
    }
}

/// A typed value together with the wire tag it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct DataValue {
    value_type: String,
    value: TypedValue,
}

impl DataValue {
    pub fn new(value_type: impl Into<String>, value: TypedValue) -> Self {
        Self {
            value_type: value_type.into(),
            value,
        }
    }

    /// Wraps a value, deriving the wire tag from its variant.
    pub fn from_typed(value: TypedValue) -> Self {
        let value_type = match &value {
            TypedValue::EntityRef(_) => value_types::ENTITY_ID,
            TypedValue::Time(_) => value_types::TIME,
            TypedValue::Quantity(_) => value_types::QUANTITY,
            TypedValue::GlobeCoordinate(_) => value_types::GLOBE_COORDINATE,
            TypedValue::NoValue { .. } => value_types::NO_VALUE,
            TypedValue::Plain(Value::Object(o)) if o.contains_key("text") && o.contains_key("language") => {
                "monolingualtext"
            }
            TypedValue::Plain(_) => "string",
        };
        Self::new(value_type, value)
    }

    /// The "no value" marker, tagged `novalue` and carrying the snak's
    /// declared data type.
    pub fn no_value(declared_type: impl Into<String>) -> Self {
        Self::new(
            value_types::NO_VALUE,
            TypedValue::NoValue {
                declared_type: declared_type.into(),
            },
        )
    }

    /// The wire type tag (`wikibase-entityid`, `string`, `novalue`, ...).
    pub fn value_type(&self) -> &str {
        &self.value_type
    }

    pub fn value(&self) -> &TypedValue {
        &self.value
    }
}

/// What a snak holds in place of a datavalue.
#[derive(Debug, Clone, PartialEq)]
pub enum SnakValue {
    Data(DataValue),
    /// No datavalue: a `somevalue` snak, or a `value` snak whose document
    /// left the datavalue out.
    Empty,
}

impl SnakValue {
    pub fn data(&self) -> Option<&DataValue> {
        match self {
            SnakValue::Data(d) => Some(d),
            SnakValue::Empty => None,
        }
    }

    pub fn typed(&self) -> Option<&TypedValue> {
        self.data().map(DataValue::value)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SnakValue::Empty)
    }

    pub fn render<R>(&self, lang: &str, resolver: &R) -> Result<RenderedValue<'_>, ResolveError>
    where
        R: LabelResolver + ?Sized,
    {
        match self {
            SnakValue::Data(d) => d.value().render(lang, resolver),
            SnakValue::Empty => Ok(RenderedValue::Absent),
        }
    }

    pub fn serialize(&self) -> Value {
        match self {
            SnakValue::Data(d) => d.value().serialize(),
            SnakValue::Empty => Value::Null,
        }
    }
}

/// A single property assertion.
#[derive(Debug, Clone, PartialEq)]
pub struct Snak {
    pub(crate) snak_type: SnakType,
    pub(crate) property: String,
    pub(crate) data_type: Option<String>,
    pub(crate) hash: Option<String>,
    pub(crate) value: SnakValue,
}

impl Snak {
    /// Builds a snak, choosing its value from the snak type:
    ///
    /// - `novalue` always holds the "no value" marker tagged with `data_type`,
    ///   whatever `datavalue` says;
    /// - `value` holds `datavalue`, or [`SnakValue::Empty`] when it is missing;
    /// - `somevalue` holds `datavalue` if one was given, else `Empty`.
    pub fn new(
        snak_type: SnakType,
        property: impl Into<String>,
        data_type: Option<String>,
        datavalue: Option<DataValue>,
    ) -> Self {
        let value = match (snak_type, datavalue) {
            (SnakType::NoValue, _) => SnakValue::Data(DataValue::no_value(
                data_type.as_deref().unwrap_or(value_types::NO_VALUE),
            )),
            (_, Some(d)) => SnakValue::Data(d),
            (_, None) => SnakValue::Empty,
        };
        Self {
            snak_type,
            property: property.into(),
            data_type,
            hash: None,
            value,
        }
    }

    /// A `value` snak holding `value`.
    pub fn with_value(property: impl Into<String>, data_type: impl Into<String>, value: TypedValue) -> Self {
        Self::new(
            SnakType::Value,
            property,
            Some(data_type.into()),
            Some(DataValue::from_typed(value)),
        )
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    pub fn snak_type(&self) -> SnakType {
        self.snak_type
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    /// Declared data type (`wikibase-item`, `time`, `external-id`, ...).
    pub fn data_type(&self) -> Option<&str> {
        self.data_type.as_deref()
    }

    /// Content hash; present on qualifier and reference snaks.
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    pub fn value(&self) -> &SnakValue {
        &self.value
    }

    /// The datavalue, if the snak has one.
    pub fn datavalue(&self) -> Option<&DataValue> {
        self.value.data()
    }

    pub fn typed_value(&self) -> Option<&TypedValue> {
        self.value.typed()
    }

    pub fn render<R>(&self, lang: &str, resolver: &R) -> Result<RenderedValue<'_>, ResolveError>
    where
        R: LabelResolver + ?Sized,
    {
        self.value.render(lang, resolver)
    }

    /// Canonical JSON form: `{"type": <data type>, "value": <value>}`.
    pub fn serialize(&self) -> Value {
        crate::codec::tree::encode_snak(self)
    }
}
