//! Reshape rules
//!
//! Pre-validation transforms that bring one raw dump record into the shape
//! the canonical record types accept.
//!
//! # Overview
//!
//! - Language fields: suffixed keys -> list of `{lang, text}`
//! - Images / owner fields: keyed objects -> list of structs
//! - Nutrients: two historical encodings -> list of per-nutrient structs
//! - Scalar coercion helpers shared with record validation
//!
//! Reshaping never fails. A malformed sub-field degrades to null or an
//! empty list; rejecting a whole record is left to validation.

mod coerce;
mod language;
mod maps;
mod nutriments;

pub use coerce::{coerce_bool, coerce_float, coerce_int, coerce_string, coerce_string_list};
pub use language::{flatten_language_fields, MAIN_LANGUAGE};
pub use maps::{reshape_images, reshape_owner_fields, ALLOWED_IMAGE_SIZES};
pub use nutriments::{
    flatten_aggregated, flatten_legacy, flatten_nutriments, schema_version, NutrientGeneration,
    AGGREGATED_NUTRITION_SCHEMA_VERSION, DEFAULT_SCHEMA_VERSION,
};

use crate::types::{JsonObject, JsonValue};

/// Apply the reshapes shared by every product flavor
pub fn reshape_product(record: &mut JsonObject, language_fields: &[&str]) {
    flatten_language_fields(record, language_fields);
    reshape_images(record);
    reshape_owner_fields(record);
}

fn list_or_null(items: Vec<JsonValue>) -> JsonValue {
    if items.is_empty() {
        JsonValue::Null
    } else {
        JsonValue::Array(items)
    }
}
