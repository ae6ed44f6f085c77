//! Structured report payloads and their `key = value` rendering.
//!
//! Values are kept in insertion order. A value is either absent (never
//! rendered), structured JSON, or plain text. Sets and tuples are always
//! stored as their `Debug` text rather than as JSON arrays.

use std::collections::{BTreeSet, HashSet};
use std::fmt::{self, Debug, Display};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ReportError;

/// One payload value.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadValue {
    Null,
    Json(Value),
    Text(String),
}

impl PayloadValue {
    /// Serializes any value, falling back to its `Debug` text when it cannot
    /// be encoded as JSON.
    pub fn serialized<V: Serialize + Debug + ?Sized>(value: &V) -> Self {
        match serde_json::to_value(value) {
            Ok(json) => json.into(),
            Err(_) => PayloadValue::Text(format!("{value:?}")),
        }
    }

    pub fn text(value: impl Display) -> Self {
        PayloadValue::Text(value.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PayloadValue::Null)
    }

    fn to_json(&self) -> Value {
        match self {
            PayloadValue::Null => Value::Null,
            PayloadValue::Json(json) => json.clone(),
            PayloadValue::Text(text) => Value::String(text.clone()),
        }
    }
}

/// Strings render raw, other JSON compact, text as-is.
impl Display for PayloadValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadValue::Null => f.write_str("null"),
            PayloadValue::Json(Value::String(s)) => f.write_str(s),
            PayloadValue::Json(json) => write!(f, "{json}"),
            PayloadValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<Value> for PayloadValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => PayloadValue::Null,
            other => PayloadValue::Json(other),
        }
    }
}

impl From<&str> for PayloadValue {
    fn from(value: &str) -> Self {
        PayloadValue::Json(Value::String(value.to_string()))
    }
}

impl From<String> for PayloadValue {
    fn from(value: String) -> Self {
        PayloadValue::Json(Value::String(value))
    }
}

macro_rules! json_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for PayloadValue {
                fn from(value: $ty) -> Self {
                    PayloadValue::Json(Value::from(value))
                }
            }
        )*
    };
}

json_scalar!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f64> for PayloadValue {
    fn from(value: f64) -> Self {
        match serde_json::Number::from_f64(value) {
            Some(number) => PayloadValue::Json(Value::Number(number)),
            None => PayloadValue::Text(value.to_string()),
        }
    }
}

impl From<f32> for PayloadValue {
    fn from(value: f32) -> Self {
        f64::from(value).into()
    }
}

impl<T: Into<PayloadValue>> From<Option<T>> for PayloadValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(PayloadValue::Null, Into::into)
    }
}

impl<T: Serialize + Debug> From<Vec<T>> for PayloadValue {
    fn from(value: Vec<T>) -> Self {
        PayloadValue::serialized(&value)
    }
}

impl<T: Debug> From<HashSet<T>> for PayloadValue {
    fn from(value: HashSet<T>) -> Self {
        PayloadValue::Text(format!("{value:?}"))
    }
}

impl<T: Debug> From<BTreeSet<T>> for PayloadValue {
    fn from(value: BTreeSet<T>) -> Self {
        PayloadValue::Text(format!("{value:?}"))
    }
}

impl<A: Debug, B: Debug> From<(A, B)> for PayloadValue {
    fn from(value: (A, B)) -> Self {
        PayloadValue::Text(format!("{value:?}"))
    }
}

impl<A: Debug, B: Debug, C: Debug> From<(A, B, C)> for PayloadValue {
    fn from(value: (A, B, C)) -> Self {
        PayloadValue::Text(format!("{value:?}"))
    }
}

/// An ordered, string-keyed payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    fields: Vec<(String, PayloadValue)>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Payload::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PayloadValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a field. An existing key keeps its position and gets the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PayloadValue>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn insert_serialized<V: Serialize + Debug + ?Sized>(
        &mut self,
        key: impl Into<String>,
        value: &V,
    ) {
        self.insert(key, PayloadValue::serialized(value));
    }

    pub fn get(&self, key: &str) -> Option<&PayloadValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PayloadValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `key = value` lines in insertion order; absent values are skipped.
    pub fn lines(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| format!("{key} = {value}"))
            .collect()
    }

    /// JSON object form used in journal lines; absent values are skipped.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| (key.to_string(), value.to_json()))
            .collect();
        Value::Object(map)
    }

    fn from_object(object: Map<String, Value>) -> Self {
        let mut payload = Payload::new();
        for (key, value) in object {
            payload.insert(key, value);
        }
        payload
    }

    /// Holds the string `"Error"` under `name` or `title`.
    fn looks_like_error(&self) -> bool {
        ["name", "title"].iter().any(|key| {
            matches!(
                self.get(key),
                Some(PayloadValue::Json(Value::String(s))) if s == "Error"
            )
        })
    }
}

impl<K: Into<String>, V: Into<PayloadValue>> FromIterator<(K, V)> for Payload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut payload = Payload::new();
        for (key, value) in iter {
            payload.insert(key, value);
        }
        payload
    }
}

/// A payload that describes an error, forwarded by an upstream system.
/// Reporting one escalates the report to [`Severity::Error`](crate::Severity::Error).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorPayload(pub Payload);

/// The structured part of a report.
#[derive(Debug, Clone, PartialEq)]
pub enum Extra {
    Plain(Payload),
    Error(ErrorPayload),
}

impl Extra {
    pub fn payload(&self) -> &Payload {
        match self {
            Extra::Plain(payload) | Extra::Error(ErrorPayload(payload)) => payload,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Extra::Error(_))
    }

    /// Classifies an untyped JSON payload. Objects carrying `"Error"` under
    /// `name` or `title` become [`Extra::Error`].
    pub fn from_json(value: Value) -> Result<Self, ReportError> {
        let payload = match value {
            Value::Object(object) => Payload::from_object(object),
            Value::Null => Payload::new(),
            Value::Bool(_) => return Err(ReportError::MalformedPayload("a boolean")),
            Value::Number(_) => return Err(ReportError::MalformedPayload("a number")),
            Value::String(_) => return Err(ReportError::MalformedPayload("a string")),
            Value::Array(_) => return Err(ReportError::MalformedPayload("an array")),
        };
        if payload.looks_like_error() {
            Ok(Extra::Error(ErrorPayload(payload)))
        } else {
            Ok(Extra::Plain(payload))
        }
    }
}

impl From<Payload> for Extra {
    fn from(payload: Payload) -> Self {
        Extra::Plain(payload)
    }
}

impl From<ErrorPayload> for Extra {
    fn from(payload: ErrorPayload) -> Self {
        Extra::Error(payload)
    }
}

impl TryFrom<Value> for Extra {
    type Error = ReportError;

    fn try_from(value: Value) -> Result<Self, ReportError> {
        Extra::from_json(value)
    }
}
