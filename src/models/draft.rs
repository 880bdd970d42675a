use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

use super::Tags;

#[derive(Debug, Error, PartialEq)]
pub enum DraftError {
    #[error("Record input must be a JSON object")]
    NotAnObject,

    #[error("Field `{field}` must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

/// Loose input object, read with the record API's field-name fallbacks.
pub(crate) struct Loose<'a>(&'a Map<String, Value>);

impl<'a> Loose<'a> {
    pub fn new(value: &'a Value) -> Result<Self, DraftError> {
        value.as_object().map(Loose).ok_or(DraftError::NotAnObject)
    }

    /// First candidate key holding a non-empty value. `null` and `""` are
    /// skipped.
    fn first(&self, keys: &[&'static str]) -> Option<(&'static str, &'a Value)> {
        keys.iter().find_map(|key| match self.0.get(*key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(v) => Some((*key, v)),
        })
    }

    /// First candidate key that is present at all, even if falsy.
    fn present(&self, keys: &[&'static str]) -> Option<(&'static str, &'a Value)> {
        keys.iter()
            .find_map(|key| self.0.get(*key).map(|v| (*key, v)))
    }

    pub fn text(&self, keys: &[&'static str]) -> Result<Option<String>, DraftError> {
        match self.first(keys) {
            None => Ok(None),
            Some((_, Value::String(s))) => Ok(Some(s.clone())),
            Some((_, Value::Number(n))) => Ok(Some(n.to_string())),
            Some((_, Value::Bool(b))) => Ok(Some(b.to_string())),
            Some((field, _)) => Err(DraftError::InvalidField {
                field,
                expected: "a string",
            }),
        }
    }

    /// Boolean field, read by presence so an explicit `false` wins over a
    /// later key. An explicit `null` reads as `Some(false)`: checkbox
    /// columns have no null state, so the record is written unchecked
    /// rather than left to the create default.
    pub fn flag(&self, keys: &[&'static str]) -> Result<Option<bool>, DraftError> {
        match self.present(keys) {
            None => Ok(None),
            Some((_, Value::Bool(b))) => Ok(Some(*b)),
            Some((_, Value::Null)) => Ok(Some(false)),
            Some((field, _)) => Err(DraftError::InvalidField {
                field,
                expected: "a boolean",
            }),
        }
    }

    /// Record id, given as a number, a numeric string or an embedded
    /// record with `Id`.
    pub fn id(&self, keys: &[&'static str]) -> Result<Option<i64>, DraftError> {
        let invalid = |field: &'static str| DraftError::InvalidField {
            field,
            expected: "a record id",
        };

        match self.first(keys) {
            None => Ok(None),
            Some((field, Value::Number(n))) => n.as_i64().map(Some).ok_or(invalid(field)),
            Some((field, Value::String(s))) => {
                s.trim().parse().map(Some).map_err(|_| invalid(field))
            }
            Some((field, Value::Object(o))) => o
                .get("Id")
                .and_then(Value::as_i64)
                .map(Some)
                .ok_or(invalid(field)),
            Some((field, _)) => Err(invalid(field)),
        }
    }

    pub fn tags(&self, keys: &[&'static str]) -> Result<Option<Tags>, DraftError> {
        match self.first(keys) {
            None => Ok(None),
            Some((field, value)) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|_| DraftError::InvalidField {
                    field,
                    expected: "a list of tags",
                }),
        }
    }
}

/// Builder for the field-qualified record sent to the record API.
/// Unset optional fields are left out of the record entirely.
#[derive(Default)]
pub(crate) struct RecordBuilder(Map<String, Value>);

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(id: i64) -> Self {
        Self::new().set("Id", id)
    }

    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    pub fn opt<V: Into<Value>>(self, field: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(field, v),
            None => self,
        }
    }

    pub fn build(self) -> Map<String, Value> {
        self.0
    }
}

/// Current UTC time in the record API's timestamp format,
/// e.g. `2024-05-01T09:30:00.000Z`.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
