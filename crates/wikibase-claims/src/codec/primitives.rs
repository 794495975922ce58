//! Field access for entity JSON.
//!
//! Every read goes through an [`ObjectReader`], which remembers the path of
//! the object it wraps so that errors point at the offending field.

use lazy_static::lazy_static;
use serde_json::{Map, Value};

use crate::error::ParseError;

lazy_static! {
    /// Stand-in for maps the API serializes as `[]` when empty.
    static ref EMPTY_OBJECT: Map<String, Value> = Map::new();
}

/// Reader over one JSON object.
///
/// JSON `null` is treated exactly like a missing field.
#[derive(Debug, Clone)]
pub struct ObjectReader<'a> {
    obj: &'a Map<String, Value>,
    path: String,
}

impl<'a> ObjectReader<'a> {
    /// Wraps an object found at `path`.
    pub fn new(obj: &'a Map<String, Value>, path: impl Into<String>) -> Self {
        Self {
            obj,
            path: path.into(),
        }
    }

    /// Wraps `value`, which must be an object. An empty array is read as an
    /// empty object.
    pub fn from_value(value: &'a Value, path: impl Into<String>) -> Result<Self, ParseError> {
        let path = path.into();
        match as_object(value) {
            Some(obj) => Ok(Self::new(obj, path)),
            None => Err(ParseError::UnexpectedType {
                path,
                expected: "object",
            }),
        }
    }

    /// Path of the wrapped object.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path of a field of the wrapped object.
    pub fn child_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    /// Path of the `index`th element of an array field.
    pub fn element_path(&self, key: &str, index: usize) -> String {
        format!("{}[{}]", self.child_path(key), index)
    }

    /// Error for a present field whose content cannot be used.
    pub fn invalid(&self, key: &str, reason: impl Into<String>) -> ParseError {
        ParseError::InvalidValue {
            path: self.child_path(key),
            reason: reason.into(),
        }
    }

    fn unexpected(&self, key: &str, expected: &'static str) -> ParseError {
        ParseError::UnexpectedType {
            path: self.child_path(key),
            expected,
        }
    }

    /// Field value; `None` when missing or `null`.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.obj.get(key).filter(|v| !v.is_null())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn required(&self, key: &'static str) -> Result<&'a Value, ParseError> {
        self.get(key).ok_or_else(|| ParseError::MissingField {
            path: self.path.clone(),
            field: key,
        })
    }

    pub fn required_str(&self, key: &'static str) -> Result<&'a str, ParseError> {
        self.required(key)?
            .as_str()
            .ok_or_else(|| self.unexpected(key, "string"))
    }

    pub fn optional_str(&self, key: &str) -> Result<Option<&'a str>, ParseError> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v.as_str().map(Some).ok_or_else(|| self.unexpected(key, "string")),
        }
    }

    pub fn required_u64(&self, key: &'static str) -> Result<u64, ParseError> {
        self.required(key)?
            .as_u64()
            .ok_or_else(|| self.unexpected(key, "unsigned integer"))
    }

    pub fn optional_u64(&self, key: &str) -> Result<Option<u64>, ParseError> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_u64()
                .map(Some)
                .ok_or_else(|| self.unexpected(key, "unsigned integer")),
        }
    }

    pub fn required_i64(&self, key: &'static str) -> Result<i64, ParseError> {
        self.required(key)?
            .as_i64()
            .ok_or_else(|| self.unexpected(key, "integer"))
    }

    pub fn optional_i64(&self, key: &str) -> Result<Option<i64>, ParseError> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v.as_i64().map(Some).ok_or_else(|| self.unexpected(key, "integer")),
        }
    }

    pub fn required_f64(&self, key: &'static str) -> Result<f64, ParseError> {
        self.required(key)?
            .as_f64()
            .ok_or_else(|| self.unexpected(key, "number"))
    }

    pub fn optional_f64(&self, key: &str) -> Result<Option<f64>, ParseError> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v.as_f64().map(Some).ok_or_else(|| self.unexpected(key, "number")),
        }
    }

    /// Nested object; `[]` counts as an empty object.
    pub fn optional_object(&self, key: &str) -> Result<Option<ObjectReader<'a>>, ParseError> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => as_object(v)
                .map(|obj| Some(ObjectReader::new(obj, self.child_path(key))))
                .ok_or_else(|| self.unexpected(key, "object")),
        }
    }

    pub fn required_object(&self, key: &'static str) -> Result<ObjectReader<'a>, ParseError> {
        self.optional_object(key)?.ok_or_else(|| ParseError::MissingField {
            path: self.path.clone(),
            field: key,
        })
    }

    pub fn optional_array(&self, key: &str) -> Result<Option<&'a [Value]>, ParseError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items.as_slice())),
            Some(_) => Err(self.unexpected(key, "array")),
        }
    }

    /// Fields of the wrapped object in document order.
    pub fn entries(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        self.obj.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.obj.is_empty()
    }
}

/// Views `value` as an object, reading an empty array as an empty object.
fn as_object(value: &Value) -> Option<&Map<String, Value>> {
    match value {
        Value::Object(obj) => Some(obj),
        Value::Array(items) if items.is_empty() => Some(&*EMPTY_OBJECT),
        _ => None,
    }
}
