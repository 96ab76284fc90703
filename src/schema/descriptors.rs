//! Arrow schemas per flavor
//!
//! Column types are declared here once and never inferred from data, so a
//! batch where an optional nested column happens to be all-null still gets
//! the same type as every other batch.

use arrow::datatypes::{DataType, Field, Fields, Schema, TimeUnit};
use std::sync::Arc;

/// Decimal precision of price amounts
pub const PRICE_PRECISION: u8 = 10;

/// Decimal scale of price amounts
pub const PRICE_SCALE: i8 = 3;

// ============================================================================
// Field helpers
// ============================================================================

fn field(name: &str, data_type: DataType) -> Field {
    Field::new(name, data_type, true)
}

fn list_of(item: DataType) -> DataType {
    DataType::List(Arc::new(Field::new("item", item, true)))
}

fn struct_of(fields: Vec<Field>) -> DataType {
    DataType::Struct(Fields::from(fields))
}

fn string(name: &str) -> Field {
    field(name, DataType::Utf8)
}

fn string_list(name: &str) -> Field {
    field(name, list_of(DataType::Utf8))
}

fn int32(name: &str) -> Field {
    field(name, DataType::Int32)
}

fn int64(name: &str) -> Field {
    field(name, DataType::Int64)
}

fn float32(name: &str) -> Field {
    field(name, DataType::Float32)
}

fn float64(name: &str) -> Field {
    field(name, DataType::Float64)
}

fn boolean(name: &str) -> Field {
    field(name, DataType::Boolean)
}

fn decimal(name: &str) -> Field {
    field(name, DataType::Decimal128(PRICE_PRECISION, PRICE_SCALE))
}

fn date(name: &str) -> Field {
    field(name, DataType::Date32)
}

fn timestamp(name: &str) -> Field {
    field(
        name,
        DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
    )
}

// ============================================================================
// Nested types
// ============================================================================

/// `list<struct<lang, text>>`
pub fn language_field_type() -> DataType {
    list_of(struct_of(vec![string("lang"), string("text")]))
}

fn image_size_type() -> DataType {
    struct_of(vec![int32("h"), int32("w")])
}

/// `list<struct<key, imgid, rev, sizes, uploaded_t, uploader>>`
pub fn images_type() -> DataType {
    let sizes = struct_of(
        ["100", "200", "400", "full"]
            .into_iter()
            .map(|label| field(label, image_size_type()))
            .collect(),
    );
    list_of(struct_of(vec![
        string("key"),
        int32("imgid"),
        int32("rev"),
        field("sizes", sizes),
        int64("uploaded_t"),
        string("uploader"),
    ]))
}

/// `list<struct<name, value, 100g, serving, unit, prepared_*>>`
pub fn nutriments_type() -> DataType {
    list_of(struct_of(vec![
        string("name"),
        float32("value"),
        float32("100g"),
        float32("serving"),
        string("unit"),
        float32("prepared_value"),
        float32("prepared_100g"),
        float32("prepared_serving"),
        string("prepared_unit"),
    ]))
}

/// `list<struct<material, number_of_units, quantity_per_unit*, ...>>`
pub fn packagings_type() -> DataType {
    list_of(struct_of(vec![
        string("material"),
        int64("number_of_units"),
        string("quantity_per_unit"),
        string("quantity_per_unit_unit"),
        string("quantity_per_unit_value"),
        string("recycling"),
        string("shape"),
        float32("weight_measured"),
    ]))
}

/// `list<struct<field_name, timestamp>>`
pub fn owner_fields_type() -> DataType {
    list_of(struct_of(vec![string("field_name"), int64("timestamp")]))
}

/// `struct<agribalyse_food_code:en, agribalyse_proxy_food_code:en, ciqual_food_code:en>`
pub fn categories_properties_type() -> DataType {
    struct_of(vec![
        string("agribalyse_food_code:en"),
        string("agribalyse_proxy_food_code:en"),
        string("ciqual_food_code:en"),
    ])
}

// ============================================================================
// Product schemas
// ============================================================================

fn product_fields() -> Vec<Field> {
    vec![
        Field::new("code", DataType::Utf8, false),
        string("brands"),
        string_list("brands_tags"),
        string("categories"),
        string_list("categories_tags"),
        string_list("checkers_tags"),
        string_list("cities_tags"),
        int32("complete"),
        float32("completeness"),
        string_list("correctors_tags"),
        string_list("countries_tags"),
        int64("created_t"),
        string("creator"),
        string_list("data_quality_errors_tags"),
        string_list("data_quality_info_tags"),
        string_list("data_quality_warnings_tags"),
        string_list("data_sources_tags"),
        string_list("editors"),
        string_list("entry_dates_tags"),
        field("generic_name", language_field_type()),
        field("images", images_type()),
        string_list("informers_tags"),
        string("labels"),
        string_list("labels_tags"),
        string("lang"),
        string_list("languages_tags"),
        string_list("last_edit_dates_tags"),
        string("last_editor"),
        int64("last_image_t"),
        string("last_modified_by"),
        int64("last_modified_t"),
        int64("last_updated_t"),
        string("link"),
        string_list("main_countries_tags"),
        string("manufacturing_places"),
        string_list("manufacturing_places_tags"),
        int32("max_imgid"),
        string_list("misc_tags"),
        Field::new("obsolete", DataType::Boolean, false),
        string("origins"),
        string_list("origins_tags"),
        string("owner"),
        field("owner_fields", owner_fields_type()),
        string("packaging"),
        string_list("packaging_recycling_tags"),
        string_list("packaging_shapes_tags"),
        string_list("packaging_tags"),
        field("packaging_text", language_field_type()),
        field("packagings", packagings_type()),
        boolean("packagings_complete"),
        string_list("photographers"),
        int64("popularity_key"),
        string_list("popularity_tags"),
        field("product_name", language_field_type()),
        string("product_quantity"),
        string("product_quantity_unit"),
        string_list("purchase_places_tags"),
        string("quantity"),
        int32("rev"),
        int32("scans_n"),
        string_list("states_tags"),
        string("stores"),
        string_list("stores_tags"),
        int32("unique_scans_n"),
    ]
}

fn composition_fields() -> Vec<Field> {
    vec![
        int32("additives_n"),
        string_list("additives_tags"),
        string_list("allergens_tags"),
        string("emb_codes"),
        string_list("emb_codes_tags"),
        string("ingredients"),
        string_list("ingredients_analysis_tags"),
        int32("ingredients_from_palm_oil_n"),
        int32("ingredients_n"),
        string_list("ingredients_original_tags"),
        int32("ingredients_percent_analysis"),
        string_list("ingredients_tags"),
        field("ingredients_text", language_field_type()),
        int32("ingredients_with_specified_percent_n"),
        int32("ingredients_with_unspecified_percent_n"),
        int32("known_ingredients_n"),
        string_list("minerals_tags"),
        string_list("nucleotides_tags"),
        string_list("nutrient_levels_tags"),
        string("nutrition_data_per"),
        string("serving_quantity"),
        string("serving_size"),
        string_list("traces_tags"),
        int32("unknown_ingredients_n"),
        string_list("unknown_nutrients_tags"),
        string_list("vitamins_tags"),
    ]
}

fn food_fields() -> Vec<Field> {
    vec![
        field("categories_properties", categories_properties_type()),
        string_list("ciqual_food_name_tags"),
        string("compared_to_category"),
        string("ecoscore_data"),
        string("ecoscore_grade"),
        int32("ecoscore_score"),
        string_list("ecoscore_tags"),
        string_list("food_groups_tags"),
        string_list("ingredients_without_ciqual_codes"),
        int32("ingredients_without_ciqual_codes_n"),
        int32("new_additives_n"),
        boolean("no_nutrition_data"),
        int32("nova_group"),
        string("nova_groups"),
        string_list("nova_groups_tags"),
        field("nutriments", nutriments_type()),
        string("nutriscore_grade"),
        int32("nutriscore_score"),
        int32("with_non_nutritive_sweeteners"),
        int32("with_sweeteners"),
    ]
}

fn sorted(mut fields: Vec<Field>) -> Vec<Field> {
    fields.sort_by(|a, b| a.name().cmp(b.name()));
    fields
}

/// Schema of the generic product flavors (products, pet food)
pub fn product_schema() -> Schema {
    Schema::new(sorted(product_fields()))
}

/// Schema of the beauty flavor
pub fn beauty_schema() -> Schema {
    let mut fields = product_fields();
    fields.extend(composition_fields());
    Schema::new(sorted(fields))
}

/// Schema of the food flavor.
///
/// `schema_version` comes last so readers can find the nutrient encoding
/// marker without scanning the sorted columns.
pub fn food_schema() -> Schema {
    let mut fields = product_fields();
    fields.extend(composition_fields());
    fields.extend(food_fields());
    let mut fields = sorted(fields);
    fields.push(int32("schema_version"));
    Schema::new(fields)
}

// ============================================================================
// Price schema
// ============================================================================

/// Schema of the joined price export: price columns, then `proof_*`, then
/// `location_*`.
pub fn price_schema() -> Schema {
    Schema::new(vec![
        int64("id"),
        string("type"),
        string("product_code"),
        string("product_name"),
        string("category_tag"),
        string_list("labels_tags"),
        string_list("origins_tags"),
        decimal("price"),
        boolean("price_is_discounted"),
        decimal("price_without_discount"),
        string("discount_type"),
        string("price_per"),
        string("currency"),
        int64("location_osm_id"),
        string("location_osm_type"),
        int32("location_id"),
        date("date"),
        int32("proof_id"),
        float32("receipt_quantity"),
        string("owner"),
        string("source"),
        timestamp("created"),
        timestamp("updated"),
        string("proof_file_path"),
        string("proof_mimetype"),
        string("proof_type"),
        date("proof_date"),
        string("proof_currency"),
        int32("proof_receipt_price_count"),
        decimal("proof_receipt_price_total"),
        string("proof_owner"),
        string("proof_source"),
        timestamp("proof_created"),
        timestamp("proof_updated"),
        string("location_type"),
        string("location_osm_display_name"),
        string("location_osm_tag_key"),
        string("location_osm_tag_value"),
        string("location_osm_address_postcode"),
        string("location_osm_address_city"),
        string("location_osm_address_country"),
        string("location_osm_address_country_code"),
        float64("location_osm_lat"),
        float64("location_osm_lon"),
        string("location_website_url"),
        string("location_source"),
        timestamp("location_created"),
        timestamp("location_updated"),
    ])
}
