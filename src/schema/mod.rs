//! Target schema descriptors
//!
//! Explicit Arrow schemas per flavor and the registry resolving a flavor to
//! its record type, schema and output naming.
//!
//! # Overview
//!
//! - **Descriptors**: column types declared up front, never inferred
//! - **Registry**: built once at startup and passed to the engine

mod descriptors;
mod types;

pub use descriptors::{
    beauty_schema, categories_properties_type, food_schema, images_type, language_field_type,
    nutriments_type, owner_fields_type, packagings_type, price_schema, product_schema,
    PRICE_PRECISION, PRICE_SCALE,
};
pub use types::{FlavorSpec, PRICE_REPOSITORY, PRODUCT_REPOSITORY};

use crate::error::{Error, Result};
use crate::records::{
    ProductKind, RecordKind, COMPOSITION_LANGUAGE_FIELDS, PRODUCT_LANGUAGE_FIELDS,
};
use crate::types::Flavor;
use std::collections::HashMap;
use std::sync::Arc;

/// Closed mapping from flavor to its descriptor
#[derive(Debug, Clone)]
pub struct FlavorRegistry {
    specs: HashMap<Flavor, FlavorSpec>,
}

impl FlavorRegistry {
    /// Build the registry of every known flavor
    pub fn new() -> Self {
        let product = Arc::new(product_schema());

        let specs = [
            FlavorSpec {
                flavor: Flavor::Food,
                kind: RecordKind::Product(ProductKind::Food),
                schema: Arc::new(food_schema()),
                language_fields: COMPOSITION_LANGUAGE_FIELDS,
                output_file_name: "food.parquet",
                push_repository: PRODUCT_REPOSITORY,
            },
            FlavorSpec {
                flavor: Flavor::Beauty,
                kind: RecordKind::Product(ProductKind::Beauty),
                schema: Arc::new(beauty_schema()),
                language_fields: COMPOSITION_LANGUAGE_FIELDS,
                output_file_name: "beauty.parquet",
                push_repository: PRODUCT_REPOSITORY,
            },
            FlavorSpec {
                flavor: Flavor::Products,
                kind: RecordKind::Product(ProductKind::Generic),
                schema: Arc::clone(&product),
                language_fields: PRODUCT_LANGUAGE_FIELDS,
                output_file_name: "products.parquet",
                push_repository: PRODUCT_REPOSITORY,
            },
            FlavorSpec {
                flavor: Flavor::PetFood,
                kind: RecordKind::Product(ProductKind::Generic),
                schema: product,
                language_fields: PRODUCT_LANGUAGE_FIELDS,
                output_file_name: "pet_food.parquet",
                push_repository: PRODUCT_REPOSITORY,
            },
            FlavorSpec {
                flavor: Flavor::Price,
                kind: RecordKind::Price,
                schema: Arc::new(price_schema()),
                language_fields: &[],
                output_file_name: "prices.parquet",
                push_repository: PRICE_REPOSITORY,
            },
        ];

        Self {
            specs: specs.into_iter().map(|spec| (spec.flavor, spec)).collect(),
        }
    }

    /// Look up a flavor's descriptor
    pub fn get(&self, flavor: Flavor) -> Result<&FlavorSpec> {
        self.specs
            .get(&flavor)
            .ok_or_else(|| Error::config(format!("No schema registered for flavor '{flavor}'")))
    }

    /// All descriptors, in [`Flavor::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = &FlavorSpec> {
        Flavor::ALL.iter().filter_map(|flavor| self.specs.get(flavor))
    }
}

impl Default for FlavorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
