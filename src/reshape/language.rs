//! Per-language text fields
//!
//! The dumps store the main-language value of a text field under its bare
//! name (`product_name`) and every translation under a suffixed key
//! (`product_name_fr`). Flattening gathers them into a single list of
//! `{lang, text}` entries so the column type never depends on which
//! languages a product happens to carry.

use super::coerce::coerce_string;
use super::list_or_null;
use crate::types::{JsonObject, JsonValue};
use serde_json::json;

/// `lang` value used for the unsuffixed original value
pub const MAIN_LANGUAGE: &str = "main";

/// Flatten each named language field of `record` into a list of
/// `{lang, text}` objects.
///
/// The field is set to null when no language carries a non-empty value.
/// Keys whose suffix is not a two-character language code (debug fields,
/// `_with_allergens_fr`, ...) are left in place.
pub fn flatten_language_fields(record: &mut JsonObject, fields: &[&str]) {
    for field in fields {
        let mut entries = Vec::new();

        if let Some(text) = record.remove(*field).as_ref().and_then(non_empty_text) {
            entries.push(language_entry(MAIN_LANGUAGE, text));
        }

        let prefix = format!("{field}_");
        let translated: Vec<String> = record
            .keys()
            .filter(|key| {
                key.strip_prefix(prefix.as_str())
                    .is_some_and(is_language_code)
            })
            .cloned()
            .collect();

        for key in translated {
            let value = record.remove(&key);
            if let Some(text) = value.as_ref().and_then(non_empty_text) {
                entries.push(language_entry(&key[prefix.len()..], text));
            }
        }

        record.insert((*field).to_string(), list_or_null(entries));
    }
}

fn is_language_code(suffix: &str) -> bool {
    suffix.chars().count() == 2
}

fn non_empty_text(value: &JsonValue) -> Option<String> {
    coerce_string(value).filter(|text| !text.is_empty())
}

fn language_entry(lang: &str, text: String) -> JsonValue {
    json!({ "lang": lang, "text": text })
}
