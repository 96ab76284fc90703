//! Nested value types shared by product records

use super::serde_ext::{
    non_empty_list, opt_f64, opt_i64, opt_numeric_string, opt_string, opt_struct,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Images
// ============================================================================

/// Pixel dimensions of one rendered image size
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    #[serde(default, deserialize_with = "opt_i64")]
    pub h: Option<i64>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub w: Option<i64>,
}

/// The closed set of rendered sizes; other labels are ignored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageSizes {
    #[serde(rename = "100", default, deserialize_with = "opt_struct")]
    pub small: Option<ImageSize>,
    #[serde(rename = "200", default, deserialize_with = "opt_struct")]
    pub medium: Option<ImageSize>,
    #[serde(rename = "400", default, deserialize_with = "opt_struct")]
    pub large: Option<ImageSize>,
    #[serde(rename = "full", default, deserialize_with = "opt_struct")]
    pub full: Option<ImageSize>,
}

/// One uploaded or selected product image
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(default, deserialize_with = "opt_string")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub imgid: Option<i64>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub rev: Option<i64>,
    #[serde(default, deserialize_with = "opt_struct")]
    pub sizes: Option<ImageSizes>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub uploaded_t: Option<i64>,
    #[serde(default, deserialize_with = "opt_string")]
    pub uploader: Option<String>,
}

// ============================================================================
// Flattened maps
// ============================================================================

/// One language variant of a text field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageField {
    pub lang: String,
    pub text: String,
}

/// Last modification time of a field edited by the product owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerField {
    pub field_name: String,
    pub timestamp: i64,
}

/// One nutrient with its values per basis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrimentField {
    pub name: String,
    #[serde(default, deserialize_with = "opt_f64")]
    pub value: Option<f64>,
    #[serde(rename = "100g", default, deserialize_with = "opt_f64")]
    pub per_100g: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub serving: Option<f64>,
    #[serde(default, deserialize_with = "opt_string")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub prepared_value: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub prepared_100g: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub prepared_serving: Option<f64>,
    #[serde(default, deserialize_with = "opt_string")]
    pub prepared_unit: Option<String>,
}

// ============================================================================
// Packaging
// ============================================================================

/// One packaging component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackagingField {
    #[serde(default, deserialize_with = "opt_string")]
    pub material: Option<String>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub number_of_units: Option<i64>,
    #[serde(default, deserialize_with = "opt_string")]
    pub quantity_per_unit: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub quantity_per_unit_unit: Option<String>,
    #[serde(default, deserialize_with = "opt_numeric_string")]
    pub quantity_per_unit_value: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub recycling: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub shape: Option<String>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub weight_measured: Option<f64>,
}

// ============================================================================
// Ingredients
// ============================================================================

/// A node of the ingredient tree.
///
/// Absent fields are omitted when serialized, so re-parsing the JSON form
/// of a tree gives back the same tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "opt_f64", skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64", skip_serializing_if = "Option::is_none")]
    pub percent_min: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64", skip_serializing_if = "Option::is_none")]
    pub percent_max: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64", skip_serializing_if = "Option::is_none")]
    pub percent_estimate: Option<f64>,
    #[serde(default, deserialize_with = "opt_i64", skip_serializing_if = "Option::is_none")]
    pub is_in_taxonomy: Option<i64>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub vegan: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub vegetarian: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub from_palm_oil: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub ciqual_food_code: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub ciqual_proxy_food_code: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub ecobalyse_code: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub ecobalyse_proxy_code: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub processing: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub origins: Option<String>,
    #[serde(
        default,
        deserialize_with = "opt_numeric_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub quantity: Option<String>,
    #[serde(default, deserialize_with = "opt_f64", skip_serializing_if = "Option::is_none")]
    pub quantity_g: Option<f64>,
    #[serde(default, deserialize_with = "non_empty_list", skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<Ingredient>>,
}

// ============================================================================
// Categories
// ============================================================================

/// Food-composition codes attached to the product's category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoriesProperties {
    #[serde(rename = "agribalyse_food_code:en", default, deserialize_with = "opt_string")]
    pub agribalyse_food_code: Option<String>,
    #[serde(rename = "agribalyse_proxy_food_code:en", default, deserialize_with = "opt_string")]
    pub agribalyse_proxy_food_code: Option<String>,
    #[serde(rename = "ciqual_food_code:en", default, deserialize_with = "opt_string")]
    pub ciqual_food_code: Option<String>,
}
