//! Price-domain records
//!
//! Prices reference proofs and locations by integer id. All three require
//! `id` and `type`; the owner of prices and proofs is pseudonymized on
//! serialization.

use super::serde_ext::{
    opt_bool, opt_date, opt_datetime, opt_decimal, opt_f64, opt_i64, opt_string,
    opt_string_list, pseudonymized,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Proof fields copied onto a joined price row as `proof_<key>`
pub const PROOF_KEYS: &[&str] = &[
    "file_path",
    "mimetype",
    "type",
    "date",
    "currency",
    "receipt_price_count",
    "receipt_price_total",
    "owner",
    "source",
    "created",
    "updated",
];

/// Location fields copied onto a joined price row as `location_<key>`
pub const LOCATION_KEYS: &[&str] = &[
    "type",
    "osm_display_name",
    "osm_tag_key",
    "osm_tag_value",
    "osm_address_postcode",
    "osm_address_city",
    "osm_address_country",
    "osm_address_country_code",
    "osm_lat",
    "osm_lon",
    "website_url",
    "source",
    "created",
    "updated",
];

/// A price observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "opt_string")]
    pub product_code: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub category_tag: Option<String>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub labels_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_string_list")]
    pub origins_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "opt_bool")]
    pub price_is_discounted: Option<bool>,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub price_without_discount: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub discount_type: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub price_per: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub location_osm_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_string")]
    pub location_osm_type: Option<String>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub location_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub proof_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub receipt_quantity: Option<f64>,
    #[serde(default, deserialize_with = "opt_string", serialize_with = "pseudonymized")]
    pub owner: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "opt_datetime")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "opt_datetime")]
    pub updated: Option<DateTime<Utc>>,
}

/// A receipt or price-tag photo backing one or more prices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proof {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "opt_string")]
    pub file_path: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub mimetype: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub image_thumb_path: Option<String>,
    #[serde(default, deserialize_with = "opt_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "opt_string")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub receipt_price_count: Option<i64>,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub receipt_price_total: Option<String>,
    #[serde(default, deserialize_with = "opt_string", serialize_with = "pseudonymized")]
    pub owner: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "opt_datetime")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "opt_datetime")]
    pub updated: Option<DateTime<Utc>>,
}

/// A shop, online or mapped in OpenStreetMap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "opt_i64")]
    pub osm_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_string")]
    pub osm_type: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub osm_name: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub osm_display_name: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub osm_tag_key: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub osm_tag_value: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub osm_address_postcode: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub osm_address_city: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub osm_address_country: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub osm_address_country_code: Option<String>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub osm_lat: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub osm_lon: Option<f64>,
    #[serde(default, deserialize_with = "opt_string")]
    pub website_url: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "opt_datetime")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "opt_datetime")]
    pub updated: Option<DateTime<Utc>>,
}
