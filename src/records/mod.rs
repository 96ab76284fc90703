//! Canonical record types
//!
//! Strongly-typed records for every flavor, built from one reshaped NDJSON
//! object. Validation is lenient everywhere except the mandatory
//! identifiers: `code` for products, `id` and `type` for price-domain
//! records. Optional fields that cannot be coerced are dropped to `None`.
//!
//! A validated record turns back into a flat JSON row with [`ProductRecord::into_row`]
//! or [`to_row`]; that row is what the columnar writer transposes.

mod common;
mod price;
mod product;
pub mod serde_ext;

pub use common::{
    CategoriesProperties, Image, ImageSize, ImageSizes, Ingredient, LanguageField,
    NutrimentField, OwnerField, PackagingField,
};
pub use price::{Location, Price, Proof, LOCATION_KEYS, PROOF_KEYS};
pub use product::{
    BeautyProduct, Composition, FoodProduct, Product, COMPOSITION_LANGUAGE_FIELDS,
    PRODUCT_LANGUAGE_FIELDS,
};
pub use serde_ext::{pseudonymize, OWNER_HASH_LEN};

use crate::error::{Error, Result};
use crate::reshape::{coerce_int, coerce_string, flatten_nutriments, reshape_product};
use crate::types::{JsonObject, JsonValue};
use serde::de::DeserializeOwned;
use serde::Serialize;

// ============================================================================
// Record kinds
// ============================================================================

/// Product record variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductKind {
    Food,
    Beauty,
    /// Base fields only (products, pet food)
    Generic,
}

/// Record type a flavor validates into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Product(ProductKind),
    /// Prices joined with proofs and locations
    Price,
}

// ============================================================================
// Product records
// ============================================================================

/// A validated product of any flavor
#[derive(Debug, Clone, PartialEq)]
pub enum ProductRecord {
    Food(Box<FoodProduct>),
    Beauty(Box<BeautyProduct>),
    Generic(Box<Product>),
}

impl ProductRecord {
    /// Reshape and validate one raw product.
    ///
    /// `line` is the 1-based source line, used in errors. Fails with
    /// [`Error::MandatoryFieldMissing`] when `code` is absent or null.
    pub fn from_json(
        kind: ProductKind,
        mut raw: JsonObject,
        line: usize,
        language_fields: &[&str],
    ) -> Result<Self> {
        let code = raw
            .get("code")
            .and_then(coerce_string)
            .ok_or_else(|| Error::missing_field(line, "code"))?;
        raw.insert("code".to_string(), JsonValue::String(code));

        reshape_product(&mut raw, language_fields);
        if kind == ProductKind::Food {
            flatten_nutriments(&mut raw);
        }

        let raw = JsonValue::Object(raw);
        let record = match kind {
            ProductKind::Food => ProductRecord::Food(Box::new(validate(raw, line)?)),
            ProductKind::Beauty => ProductRecord::Beauty(Box::new(validate(raw, line)?)),
            ProductKind::Generic => ProductRecord::Generic(Box::new(validate(raw, line)?)),
        };
        Ok(record)
    }

    /// The product barcode
    pub fn code(&self) -> &str {
        match self {
            ProductRecord::Food(food) => &food.product.code,
            ProductRecord::Beauty(beauty) => &beauty.product.code,
            ProductRecord::Generic(product) => &product.code,
        }
    }

    /// Serialize into a flat row keyed by output column name
    pub fn into_row(self) -> Result<JsonObject> {
        match self {
            ProductRecord::Food(food) => to_row(&food),
            ProductRecord::Beauty(beauty) => to_row(&beauty),
            ProductRecord::Generic(product) => to_row(&product),
        }
    }
}

// ============================================================================
// Price-domain records
// ============================================================================

/// Validate one raw price, proof or location.
///
/// `id` must read as an integer and `type` as a string; either missing is
/// a [`Error::MandatoryFieldMissing`].
pub fn parse_price_record<T: DeserializeOwned>(mut raw: JsonObject, line: usize) -> Result<T> {
    let id = raw
        .get("id")
        .and_then(coerce_int)
        .ok_or_else(|| Error::missing_field(line, "id"))?;
    let kind = raw
        .get("type")
        .and_then(coerce_string)
        .ok_or_else(|| Error::missing_field(line, "type"))?;
    raw.insert("id".to_string(), JsonValue::from(id));
    raw.insert("type".to_string(), JsonValue::String(kind));

    validate(JsonValue::Object(raw), line)
}

// ============================================================================
// Helpers
// ============================================================================

fn validate<T: DeserializeOwned>(raw: JsonValue, line: usize) -> Result<T> {
    serde_json::from_value(raw).map_err(|e| Error::decode(line, e.to_string()))
}

/// Serialize a record into a flat JSON row
pub fn to_row<T: Serialize>(record: &T) -> Result<JsonObject> {
    match serde_json::to_value(record)? {
        JsonValue::Object(row) => Ok(row),
        other => Err(Error::output(format!(
            "record serialized to a non-object value: {other}"
        ))),
    }
}
