//! Keyed-map reshapes
//!
//! `images` and `owner_fields` arrive as JSON objects whose keys carry
//! meaning. They are turned into lists of structs with the key injected as
//! an explicit field, which keeps the output schema fixed no matter how many
//! distinct keys appear across products.

use super::coerce::coerce_int;
use super::list_or_null;
use crate::types::{JsonObject, JsonValue};
use serde_json::json;

/// Image size labels that may appear under an image's `sizes`
pub const ALLOWED_IMAGE_SIZES: [&str; 4] = ["100", "200", "400", "full"];

/// Turn the `images` object (`{"front_en": {...}, "3": {...}}`) into a list
/// of image objects carrying their original key under `key`.
///
/// Unknown size labels and null/empty size entries are dropped. Image
/// entries that are not objects are skipped.
pub fn reshape_images(record: &mut JsonObject) {
    let images: Vec<JsonValue> = match record.remove("images") {
        Some(JsonValue::Object(images)) => images
            .into_iter()
            .filter_map(|(key, image)| reshape_image(key, image))
            .collect(),
        _ => Vec::new(),
    };

    record.insert("images".to_string(), list_or_null(images));
}

fn reshape_image(key: String, image: JsonValue) -> Option<JsonValue> {
    let JsonValue::Object(mut image) = image else {
        return None;
    };

    let sizes = image
        .remove("sizes")
        .and_then(filter_sizes)
        .map_or(JsonValue::Null, JsonValue::Object);
    image.insert("sizes".to_string(), sizes);
    image.insert("key".to_string(), JsonValue::String(key));

    Some(JsonValue::Object(image))
}

fn filter_sizes(sizes: JsonValue) -> Option<JsonObject> {
    let JsonValue::Object(sizes) = sizes else {
        return None;
    };

    let kept: JsonObject = sizes
        .into_iter()
        .filter(|(label, size)| {
            ALLOWED_IMAGE_SIZES.contains(&label.as_str()) && is_present(size)
        })
        .collect();

    (!kept.is_empty()).then_some(kept)
}

fn is_present(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Object(map) => !map.is_empty(),
        _ => true,
    }
}

/// Turn the `owner_fields` object (`{"brands": 1690000000}`) into a list
/// of `{field_name, timestamp}` entries.
///
/// Entries whose timestamp cannot be read as an integer are dropped.
pub fn reshape_owner_fields(record: &mut JsonObject) {
    let owner_fields: Vec<JsonValue> = match record.remove("owner_fields") {
        Some(JsonValue::Object(fields)) => fields
            .into_iter()
            .filter_map(|(field_name, timestamp)| {
                coerce_int(&timestamp)
                    .map(|timestamp| json!({ "field_name": field_name, "timestamp": timestamp }))
            })
            .collect(),
        _ => Vec::new(),
    };

    record.insert("owner_fields".to_string(), list_or_null(owner_fields));
}
