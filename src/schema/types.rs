//! Flavor descriptor types

use crate::records::RecordKind;
use crate::types::Flavor;
use arrow::datatypes::SchemaRef;

/// Dataset repository receiving product exports
pub const PRODUCT_REPOSITORY: &str = "openfoodfacts/product-database";

/// Dataset repository receiving price exports
pub const PRICE_REPOSITORY: &str = "openfoodfacts/open-prices";

/// Everything the conversion needs to know about one flavor
#[derive(Debug, Clone)]
pub struct FlavorSpec {
    /// The flavor described
    pub flavor: Flavor,

    /// Record variant the flavor's lines validate into
    pub kind: RecordKind,

    /// Output column types
    pub schema: SchemaRef,

    /// Text fields flattened into per-language lists
    pub language_fields: &'static [&'static str],

    /// File name of the exported artifact
    pub output_file_name: &'static str,

    /// Remote repository the artifact is pushed to
    pub push_repository: &'static str,
}

impl FlavorSpec {
    /// Output column names, in schema order
    pub fn column_names(&self) -> Vec<&str> {
        self.schema
            .fields()
            .iter()
            .map(|field| field.name().as_str())
            .collect()
    }
}
