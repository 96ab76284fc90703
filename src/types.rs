//! Common types used throughout the exporter
//!
//! JSON aliases, the closed flavor set and the invalid-record strategy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Flavor
// ============================================================================

/// Product domain exported by the pipeline
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Flavor {
    /// Open Food Facts
    #[value(alias = "off")]
    Food,
    /// Open Beauty Facts
    #[value(alias = "obf")]
    Beauty,
    /// Open Products Facts
    #[value(alias = "opf")]
    Products,
    /// Open Pet Food Facts
    #[value(alias = "opff")]
    PetFood,
    /// Open Prices
    #[value(alias = "op")]
    Price,
}

impl Flavor {
    /// Every flavor, in scheduling order
    pub const ALL: [Flavor; 5] = [
        Flavor::Food,
        Flavor::Beauty,
        Flavor::Products,
        Flavor::PetFood,
        Flavor::Price,
    ];

    /// Short project code used in file names
    pub fn code(self) -> &'static str {
        match self {
            Flavor::Food => "off",
            Flavor::Beauty => "obf",
            Flavor::Products => "opf",
            Flavor::PetFood => "opff",
            Flavor::Price => "op",
        }
    }

    /// Whether the flavor is a product flavor (as opposed to prices)
    pub fn is_product(self) -> bool {
        !matches!(self, Flavor::Price)
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Flavor::Food => "food",
            Flavor::Beauty => "beauty",
            Flavor::Products => "products",
            Flavor::PetFood => "pet_food",
            Flavor::Price => "price",
        };
        f.write_str(name)
    }
}

impl FromStr for Flavor {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "food" | "off" => Ok(Flavor::Food),
            "beauty" | "obf" => Ok(Flavor::Beauty),
            "products" | "opf" => Ok(Flavor::Products),
            "pet_food" | "petfood" | "pet-food" | "opff" => Ok(Flavor::PetFood),
            "price" | "prices" | "op" => Ok(Flavor::Price),
            other => Err(crate::Error::config(format!("Unknown flavor: {other}"))),
        }
    }
}

// ============================================================================
// Error Handling Strategy
// ============================================================================

/// What to do with a record that cannot be validated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStrategy {
    /// Abort the whole conversion on the first invalid record
    #[default]
    Fail,
    /// Log the invalid record, count it and keep going
    Skip,
}

impl FromStr for ErrorStrategy {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fail" | "abort" => Ok(ErrorStrategy::Fail),
            "skip" => Ok(ErrorStrategy::Skip),
            other => Err(crate::Error::invalid_config(
                "on_invalid_record",
                format!("expected 'fail' or 'skip', got '{other}'"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flavor_from_str() {
        assert_eq!("food".parse::<Flavor>().unwrap(), Flavor::Food);
        assert_eq!("obf".parse::<Flavor>().unwrap(), Flavor::Beauty);
        assert_eq!("opff".parse::<Flavor>().unwrap(), Flavor::PetFood);
        assert_eq!("prices".parse::<Flavor>().unwrap(), Flavor::Price);
        assert!("cosmetics".parse::<Flavor>().is_err());
    }

    #[test]
    fn test_flavor_serde() {
        let flavor: Flavor = serde_json::from_str("\"pet_food\"").unwrap();
        assert_eq!(flavor, Flavor::PetFood);
        assert_eq!(serde_json::to_string(&Flavor::Food).unwrap(), "\"food\"");
        assert_eq!(Flavor::PetFood.to_string(), "pet_food");
    }

    #[test]
    fn test_flavor_is_product() {
        assert!(Flavor::Food.is_product());
        assert!(Flavor::Products.is_product());
        assert!(!Flavor::Price.is_product());
    }

    #[test]
    fn test_error_strategy_default_is_fail() {
        assert_eq!(ErrorStrategy::default(), ErrorStrategy::Fail);
        assert_eq!("skip".parse::<ErrorStrategy>().unwrap(), ErrorStrategy::Skip);
        assert_eq!("ABORT".parse::<ErrorStrategy>().unwrap(), ErrorStrategy::Fail);
        assert!("retry".parse::<ErrorStrategy>().is_err());
    }
}
