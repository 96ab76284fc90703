//! Nutrient flattening
//!
//! Two incompatible encodings exist. Products written before schema version
//! 1003 carry a flat `nutriments` object whose keys are
//! `<nutrient><suffix>` (`fat_100g`, `fat_unit`, ...). Newer products carry
//! a nested `nutrition.aggregated_set` keyed by measurement basis and
//! preparation state. Both end up as a list of per-nutrient objects with the
//! same fields. The encoding is chosen from the record's declared
//! `schema_version`, never from the keys it happens to contain.

use super::coerce::coerce_int;
use super::list_or_null;
use crate::types::{JsonObject, JsonValue};
use std::collections::HashMap;

/// First schema version using the aggregated nutrition encoding
pub const AGGREGATED_NUTRITION_SCHEMA_VERSION: i64 = 1003;

/// Version assumed for records that do not declare one
pub const DEFAULT_SCHEMA_VERSION: i64 = 999;

/// Legacy key suffixes and the output field each maps to.
///
/// Ordered longest first so the first match is the longest one
/// (`_prepared_100g` must win over `_100g`).
const LEGACY_SUFFIXES: [(&str, &str); 8] = [
    ("_prepared_serving", "prepared_serving"),
    ("_prepared_value", "prepared_value"),
    ("_prepared_100g", "prepared_100g"),
    ("_prepared_unit", "prepared_unit"),
    ("_serving", "serving"),
    ("_value", "value"),
    ("_100g", "100g"),
    ("_unit", "unit"),
];

/// Every field of a flattened nutrient besides `name`
const NUTRIENT_FIELDS: [&str; 8] = [
    "value",
    "100g",
    "serving",
    "unit",
    "prepared_value",
    "prepared_100g",
    "prepared_serving",
    "prepared_unit",
];

/// Nutrient encoding generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NutrientGeneration {
    /// Flat `nutriments` object with suffixed keys
    Legacy,
    /// Nested `nutrition.aggregated_set`
    Aggregated,
}

impl NutrientGeneration {
    /// Select the generation for a declared schema version
    pub fn for_schema_version(version: Option<i64>) -> Self {
        if version.unwrap_or(DEFAULT_SCHEMA_VERSION) < AGGREGATED_NUTRITION_SCHEMA_VERSION {
            NutrientGeneration::Legacy
        } else {
            NutrientGeneration::Aggregated
        }
    }
}

/// Read the declared schema version of a record
pub fn schema_version(record: &JsonObject) -> Option<i64> {
    record.get("schema_version").and_then(coerce_int)
}

/// Replace the record's nutrient data with a flattened `nutriments` list.
pub fn flatten_nutriments(record: &mut JsonObject) {
    let legacy = record.remove("nutriments");

    let nutriments = match NutrientGeneration::for_schema_version(schema_version(record)) {
        NutrientGeneration::Legacy => legacy.as_ref().map(flatten_legacy),
        NutrientGeneration::Aggregated => record.get("nutrition").map(flatten_aggregated),
    };

    record.insert(
        "nutriments".to_string(),
        nutriments.map_or(JsonValue::Null, list_or_null),
    );
}

/// Flatten a legacy `nutriments` object.
///
/// Keys are grouped by nutrient name after stripping the longest known
/// suffix; keys without a known suffix are ignored. Nutrients keep the order
/// in which their first key was seen.
pub fn flatten_legacy(nutriments: &JsonValue) -> Vec<JsonValue> {
    let JsonValue::Object(nutriments) = nutriments else {
        return Vec::new();
    };

    let mut grouped: Vec<(String, JsonObject)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (key, value) in nutriments {
        let Some((name, field)) = split_legacy_key(key) else {
            continue;
        };

        let slot = *index.entry(name.to_string()).or_insert_with(|| {
            grouped.push((name.to_string(), JsonObject::new()));
            grouped.len() - 1
        });
        grouped[slot].1.insert(field.to_string(), value.clone());
    }

    grouped
        .into_iter()
        .map(|(name, fields)| nutrient_entry(name, fields))
        .collect()
}

fn split_legacy_key(key: &str) -> Option<(&str, &str)> {
    LEGACY_SUFFIXES.iter().find_map(|(suffix, field)| {
        key.strip_suffix(suffix)
            .filter(|name| !name.is_empty())
            .map(|name| (name, *field))
    })
}

/// Flatten a `nutrition` object carrying an `aggregated_set`.
///
/// `value` and `prepared_value` stay null: the aggregated set does not say
/// which basis an unqualified value refers to. As-sold values fill
/// `100g`/`serving` and `unit`; prepared values fill the `prepared_*`
/// counterparts. `per` of `100g` or `100ml` selects the 100g column,
/// anything else the serving column.
pub fn flatten_aggregated(nutrition: &JsonValue) -> Vec<JsonValue> {
    let Some(aggregated) = nutrition.get("aggregated_set").and_then(JsonValue::as_object) else {
        return Vec::new();
    };
    let Some(nutrients) = aggregated.get("nutrients").and_then(JsonValue::as_object) else {
        return Vec::new();
    };

    let per_100g = matches!(
        aggregated.get("per").and_then(JsonValue::as_str),
        Some("100g" | "100ml")
    );
    let as_sold = aggregated.get("preparation").and_then(JsonValue::as_str) == Some("as_sold");

    let (quantity_field, unit_field) = match (as_sold, per_100g) {
        (true, true) => ("100g", "unit"),
        (true, false) => ("serving", "unit"),
        (false, true) => ("prepared_100g", "prepared_unit"),
        (false, false) => ("prepared_serving", "prepared_unit"),
    };

    nutrients
        .iter()
        .map(|(name, data)| {
            let mut fields = JsonObject::new();
            if let Some(value) = data.get("value") {
                fields.insert(quantity_field.to_string(), value.clone());
            }
            if let Some(unit) = data.get("unit") {
                fields.insert(unit_field.to_string(), unit.clone());
            }
            nutrient_entry(name.clone(), fields)
        })
        .collect()
}

fn nutrient_entry(name: String, mut fields: JsonObject) -> JsonValue {
    let mut entry = JsonObject::new();
    entry.insert("name".to_string(), JsonValue::String(name));
    for field in NUTRIENT_FIELDS {
        entry.insert(
            field.to_string(),
            fields.remove(field).unwrap_or(JsonValue::Null),
        );
    }
    JsonValue::Object(entry)
}
