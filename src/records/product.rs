//! Product records
//!
//! [`Product`] carries the fields every product flavor shares.
//! [`Composition`] adds the ingredient/allergen fields beauty and food have
//! in common, and [`FoodProduct`] the nutrition and environmental scores
//! only food exports. The flavor types compose these with
//! `#[serde(flatten)]`, so a serialized record is one flat object.

use super::common::{
    CategoriesProperties, Image, Ingredient, LanguageField, NutrimentField, OwnerField,
    PackagingField,
};
use super::serde_ext::{
    as_json_string, flag, non_empty_list, opt_bool, opt_f64, opt_i64, opt_list,
    opt_numeric_string, opt_object, opt_string, opt_string_list, opt_struct,
};
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};

/// Language fields of the generic product flavors
pub const PRODUCT_LANGUAGE_FIELDS: &[&str] = &["product_name", "generic_name", "packaging_text"];

/// Language fields of the food and beauty flavors
pub const COMPOSITION_LANGUAGE_FIELDS: &[&str] = &[
    "ingredients_text",
    "product_name",
    "packaging_text",
    "generic_name",
];

/// Fields shared by all product flavors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub code: String,

    #[serde(default, deserialize_with = "opt_string")]
    pub brands: Option<String>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub brands_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string")]
    pub categories: Option<String>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub categories_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub checkers_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub cities_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub complete: Option<i64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub completeness: Option<f64>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub correctors_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub countries_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub created_t: Option<i64>,
    #[serde(default, deserialize_with = "opt_string")]
    pub creator: Option<String>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub data_quality_errors_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub data_quality_info_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub data_quality_warnings_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub data_sources_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub editors: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub entry_dates_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "non_empty_list")]
    pub generic_name: Option<Vec<LanguageField>>,
    #[serde(default, deserialize_with = "non_empty_list")]
    pub images: Option<Vec<Image>>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub informers_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string")]
    pub labels: Option<String>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub labels_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string")]
    pub lang: Option<String>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub languages_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub last_edit_dates_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string")]
    pub last_editor: Option<String>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub last_image_t: Option<i64>,
    #[serde(default, deserialize_with = "opt_string")]
    pub last_modified_by: Option<String>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub last_modified_t: Option<i64>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub last_updated_t: Option<i64>,
    #[serde(default, deserialize_with = "opt_string")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub main_countries_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string")]
    pub manufacturing_places: Option<String>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub manufacturing_places_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub max_imgid: Option<i64>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub misc_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "flag")]
    pub obsolete: bool,
    #[serde(default, deserialize_with = "opt_string")]
    pub origins: Option<String>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub origins_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string")]
    pub owner: Option<String>,
    #[serde(default, deserialize_with = "non_empty_list")]
    pub owner_fields: Option<Vec<OwnerField>>,
    #[serde(default, deserialize_with = "opt_string")]
    pub packaging: Option<String>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub packaging_recycling_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub packaging_shapes_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub packaging_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "non_empty_list")]
    pub packaging_text: Option<Vec<LanguageField>>,
    #[serde(default, deserialize_with = "opt_list")]
    pub packagings: Option<Vec<PackagingField>>,
    #[serde(default, deserialize_with = "opt_bool")]
    pub packagings_complete: Option<bool>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub photographers: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub popularity_key: Option<i64>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub popularity_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "non_empty_list")]
    pub product_name: Option<Vec<LanguageField>>,
    #[serde(default, deserialize_with = "opt_numeric_string")]
    pub product_quantity: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub product_quantity_unit: Option<String>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub purchase_places_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string")]
    pub quantity: Option<String>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub rev: Option<i64>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub scans_n: Option<i64>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub states_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string")]
    pub stores: Option<String>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub stores_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub unique_scans_n: Option<i64>,
}

/// Ingredient and allergen fields shared by food and beauty products
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    #[serde(default, deserialize_with = "opt_i64")]
    pub additives_n: Option<i64>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub additives_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub allergens_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string")]
    pub emb_codes: Option<String>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub emb_codes_tags: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "non_empty_list",
        serialize_with = "as_json_string"
    )]
    pub ingredients: Option<Vec<Ingredient>>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub ingredients_analysis_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub ingredients_from_palm_oil_n: Option<i64>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub ingredients_n: Option<i64>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub ingredients_original_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub ingredients_percent_analysis: Option<i64>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub ingredients_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "non_empty_list")]
    pub ingredients_text: Option<Vec<LanguageField>>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub ingredients_with_specified_percent_n: Option<i64>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub ingredients_with_unspecified_percent_n: Option<i64>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub known_ingredients_n: Option<i64>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub minerals_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub nucleotides_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub nutrient_levels_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string")]
    pub nutrition_data_per: Option<String>,
    #[serde(default, deserialize_with = "opt_numeric_string")]
    pub serving_quantity: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub serving_size: Option<String>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub traces_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub unknown_ingredients_n: Option<i64>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub unknown_nutrients_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub vitamins_tags: Option<Vec<String>>,
}

/// Beauty product: base fields plus composition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeautyProduct {
    #[serde(flatten)]
    pub product: Product,
    #[serde(flatten)]
    pub composition: Composition,
}

/// Food product: base fields, composition, nutrition and scores
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodProduct {
    #[serde(flatten)]
    pub product: Product,
    #[serde(flatten)]
    pub composition: Composition,

    #[serde(default, deserialize_with = "opt_struct")]
    pub categories_properties: Option<CategoriesProperties>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub ciqual_food_name_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string")]
    pub compared_to_category: Option<String>,
    #[serde(
        default,
        deserialize_with = "opt_object",
        serialize_with = "as_json_string"
    )]
    pub ecoscore_data: Option<JsonValue>,
    #[serde(default, deserialize_with = "opt_string")]
    pub ecoscore_grade: Option<String>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub ecoscore_score: Option<i64>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub ecoscore_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub food_groups_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub ingredients_without_ciqual_codes: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub ingredients_without_ciqual_codes_n: Option<i64>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub new_additives_n: Option<i64>,
    #[serde(default, deserialize_with = "opt_bool")]
    pub no_nutrition_data: Option<bool>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub nova_group: Option<i64>,
    #[serde(default, deserialize_with = "opt_numeric_string")]
    pub nova_groups: Option<String>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub nova_groups_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "non_empty_list")]
    pub nutriments: Option<Vec<NutrimentField>>,
    #[serde(default, deserialize_with = "opt_string")]
    pub nutriscore_grade: Option<String>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub nutriscore_score: Option<i64>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub schema_version: Option<i64>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub with_non_nutritive_sweeteners: Option<i64>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub with_sweeteners: Option<i64>,
}
