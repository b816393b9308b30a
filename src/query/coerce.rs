use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::query::error::QueryError;
use crate::store::Document;

/// Declared type of a mapped field. Adding a store representation means
/// adding a variant here and an arm in [`FieldKind::coerce`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Int,
    BigInt,
    Float,
    Bool,
    Timestamp,
    Uuid,
}

/// A document value converted to its declared field kind. `Absent` means the
/// target field keeps its default.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    Text(String),
    Int(i32),
    BigInt(i64),
    Float(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
    Absent,
}

impl Coerced {
    pub fn into_text(self) -> Option<String> {
        match self {
            Coerced::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_int(self) -> Option<i32> {
        match self {
            Coerced::Int(n) => Some(n),
            _ => None,
        }
    }

    pub fn into_big_int(self) -> Option<i64> {
        match self {
            Coerced::BigInt(n) => Some(n),
            _ => None,
        }
    }

    pub fn into_float(self) -> Option<f64> {
        match self {
            Coerced::Float(n) => Some(n),
            _ => None,
        }
    }

    pub fn into_bool(self) -> Option<bool> {
        match self {
            Coerced::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn into_timestamp(self) -> Option<DateTime<Utc>> {
        match self {
            Coerced::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    pub fn into_uuid(self) -> Option<Uuid> {
        match self {
            Coerced::Uuid(id) => Some(id),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoerceError {
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: String,
    },

    #[error("invalid timestamp value: {0}")]
    Timestamp(String),

    #[error("invalid UUID value: {0}")]
    InvalidUuid(String),
}

fn mismatch(expected: &'static str, value: &Value) -> CoerceError {
    CoerceError::Mismatch {
        expected,
        found: value.to_string(),
    }
}

/// Store-native identifiers travel in extended form `{"$oid": "..."}`.
/// They always render as the canonical string, whatever the target kind.
fn native_id(value: &Value) -> Option<&str> {
    let obj = value.as_object()?;
    if obj.len() != 1 {
        return None;
    }
    obj.get("$oid")?.as_str()
}

impl FieldKind {
    /// Convert a generic document value to this kind.
    pub fn coerce(self, value: &Value) -> Result<Coerced, CoerceError> {
        if value.is_null() {
            return Ok(Coerced::Absent);
        }
        if let Some(id) = native_id(value) {
            return Ok(Coerced::Text(id.to_string()));
        }

        match self {
            FieldKind::Text => Ok(match value {
                Value::String(s) => Coerced::Text(s.clone()),
                other => Coerced::Text(other.to_string()),
            }),
            FieldKind::Int => value
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .map(Coerced::Int)
                .ok_or_else(|| mismatch("a 32-bit integer", value)),
            FieldKind::BigInt => value
                .as_i64()
                .map(Coerced::BigInt)
                .ok_or_else(|| mismatch("a 64-bit integer", value)),
            FieldKind::Float => value
                .as_f64()
                .map(Coerced::Float)
                .ok_or_else(|| mismatch("a floating-point number", value)),
            FieldKind::Bool => value
                .as_bool()
                .map(Coerced::Bool)
                .ok_or_else(|| mismatch("a boolean", value)),
            FieldKind::Timestamp => match value {
                Value::String(s) => DateTime::parse_from_rfc3339(s)
                    .map(|dt| Coerced::Timestamp(dt.with_timezone(&Utc)))
                    .map_err(|_| CoerceError::Timestamp(s.clone())),
                Value::Number(n) => n
                    .as_i64()
                    .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
                    .map(Coerced::Timestamp)
                    .ok_or_else(|| CoerceError::Timestamp(n.to_string())),
                other => Err(mismatch("a timestamp", other)),
            },
            FieldKind::Uuid => match value {
                Value::String(s) => Uuid::parse_str(s)
                    .map(Coerced::Uuid)
                    .map_err(|_| CoerceError::InvalidUuid(s.clone())),
                other => Err(mismatch("a UUID string", other)),
            },
        }
    }
}

/// One entry of a type's static field registry.
pub struct FieldBinding<T> {
    /// Document key this field is read from.
    pub name: &'static str,
    pub kind: FieldKind,
    pub assign: fn(&mut T, Coerced),
}

/// A result type reflectable from store documents. The registry is built
/// once, at compile time, per type; there is no runtime field discovery.
pub trait DocumentMapped: Default {
    fn bindings() -> &'static [FieldBinding<Self>];
}

/// Reflect one document into `T`. Unknown document keys are ignored; fields
/// the document lacks keep their default value.
pub fn map_document<T: DocumentMapped + 'static>(doc: &Document) -> Result<T, QueryError> {
    let mut out = T::default();
    for binding in T::bindings() {
        if let Some(raw) = doc.get(binding.name) {
            let coerced = binding.kind.coerce(raw).map_err(|source| QueryError::Coercion {
                field: binding.name.to_string(),
                source,
            })?;
            if !matches!(coerced, Coerced::Absent) {
                (binding.assign)(&mut out, coerced);
            }
        }
    }
    Ok(out)
}
