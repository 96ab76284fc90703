//! Lenient serde adapters
//!
//! Every optional field of a canonical record goes through one of these
//! `deserialize_with` helpers. They read whatever JSON value is present and
//! run it through the reshape coercions, so a malformed optional field turns
//! into `None` instead of failing the whole record.

use crate::reshape::{coerce_bool, coerce_float, coerce_int, coerce_string, coerce_string_list};
use crate::types::JsonValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

/// Length of a pseudonymized owner identifier
pub const OWNER_HASH_LEN: usize = 8;

fn raw<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<JsonValue>, D::Error> {
    Option::<JsonValue>::deserialize(deserializer)
}

// ============================================================================
// Scalars
// ============================================================================

pub fn opt_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(raw(deserializer)?.as_ref().and_then(coerce_int))
}

pub fn opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(raw(deserializer)?.as_ref().and_then(coerce_float))
}

/// Strings only; any other JSON type is dropped
pub fn opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match raw(deserializer)? {
        Some(JsonValue::String(s)) => Some(s),
        _ => None,
    })
}

/// Strings, or numbers stored in their string form
pub fn opt_numeric_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(raw(deserializer)?.as_ref().and_then(coerce_string))
}

/// Null stays null; any other value is coerced
pub fn opt_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(match raw(deserializer)? {
        None | Some(JsonValue::Null) => None,
        Some(value) => Some(coerce_bool(&value)),
    })
}

/// Non-nullable flag; absent or unreadable is false
pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(raw(deserializer)?.as_ref().is_some_and(coerce_bool))
}

pub fn opt_string_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    Ok(raw(deserializer)?.as_ref().and_then(coerce_string_list))
}

/// A decimal kept in its textual form, validated as a finite number.
pub fn opt_decimal<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(raw(deserializer)?.and_then(|value| {
        coerce_float(&value)?;
        coerce_string(&value).map(|s| s.trim().trim_matches('"').to_string())
    }))
}

/// `YYYY-MM-DD`, or the date part of a timestamp
pub fn opt_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error> {
    Ok(match raw(deserializer)? {
        Some(JsonValue::String(s)) => parse_date(&s),
        _ => None,
    })
}

/// RFC 3339 timestamps; naive timestamps are taken as UTC
pub fn opt_datetime<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(match raw(deserializer)? {
        Some(JsonValue::String(s)) => parse_datetime(&s),
        _ => None,
    })
}

pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(s).map(|dt| dt.date_naive()))
}

pub(crate) fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(|naive| naive.and_utc())
}

// ============================================================================
// Nested values
// ============================================================================

/// A nested struct; unreadable shapes become `None`
pub fn opt_struct<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(raw(deserializer)?
        .filter(|value| !value.is_null())
        .and_then(|value| serde_json::from_value(value).ok()))
}

/// A list of nested structs. Elements that do not fit `T` are dropped;
/// anything other than an array becomes `None`.
pub fn opt_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match raw(deserializer)? {
        Some(JsonValue::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

/// Like [`opt_list`], with an empty list read as `None`
pub fn non_empty_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(opt_list(deserializer)?.filter(|items: &Vec<T>| !items.is_empty()))
}

/// An arbitrary JSON object, kept as is
pub fn opt_object<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<JsonValue>, D::Error> {
    Ok(raw(deserializer)?.filter(JsonValue::is_object))
}

// ============================================================================
// Serializers
// ============================================================================

/// Serialize a nested value as a compact JSON string (null when absent)
pub fn as_json_string<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    match value {
        Some(value) => {
            let text = serde_json::to_string(value).map_err(serde::ser::Error::custom)?;
            serializer.serialize_some(&text)
        }
        None => serializer.serialize_none(),
    }
}

/// Serialize an owner identifier as its pseudonym
pub fn pseudonymized<S: Serializer>(
    owner: &Option<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match owner {
        Some(owner) => serializer.serialize_some(&pseudonymize(owner)),
        None => serializer.serialize_none(),
    }
}

/// One-way pseudonym of an identity: the first eight hex digits of its
/// SHA-256 digest.
pub fn pseudonymize(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    let mut hex = String::with_capacity(OWNER_HASH_LEN);
    for byte in digest.iter().take(OWNER_HASH_LEN / 2) {
        hex.push_str(&format!("{byte:02x}"));
    }
    hex
}
