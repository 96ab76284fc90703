//! Price join pipeline
//!
//! Proofs and locations are loaded into id-keyed maps first; prices are then
//! streamed and each row gets the referenced proof and location fields as
//! `proof_<key>` and `location_<key>` columns. A reference with no match
//! leaves those columns null.

use super::batch::BatchWriter;
use super::types::ConvertStats;
use super::ExportEngine;
use crate::error::Result;
use crate::records::{
    parse_price_record, to_row, Location, Price, Proof, LOCATION_KEYS, PROOF_KEYS,
};
use crate::schema::FlavorSpec;
use crate::source::JsonlReader;
use crate::types::{JsonObject, JsonValue};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Serialized proof or location rows keyed by id
type Lookup = HashMap<i64, JsonObject>;

/// Records that can be joined onto a price row
trait Referenced: DeserializeOwned + Serialize {
    fn id(&self) -> i64;
}

impl Referenced for Proof {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Referenced for Location {
    fn id(&self) -> i64 {
        self.id
    }
}

pub(super) fn convert_prices(
    engine: &ExportEngine,
    spec: &FlavorSpec,
    prices: &Path,
    proofs: &Path,
    locations: &Path,
    output: &Path,
) -> Result<ConvertStats> {
    let mut stats = ConvertStats::new();

    let proofs = load_lookup::<Proof>(engine, proofs, &mut stats)?;
    let locations = load_lookup::<Location>(engine, locations, &mut stats)?;
    info!(
        proofs = proofs.len(),
        locations = locations.len(),
        "Loaded price lookups"
    );

    let mut writer = BatchWriter::new(output, Arc::clone(&spec.schema), engine.options());

    for item in JsonlReader::open(prices)? {
        stats.add_read();
        let price = item.and_then(|(line, raw)| parse_price_record::<Price>(raw, line));
        let price = match price {
            Ok(price) => price,
            Err(e) => {
                engine.absorb(e, prices, &mut stats)?;
                continue;
            }
        };

        let mut row = to_row(&price)?;
        join(&mut row, "proof", PROOF_KEYS, price.proof_id, &proofs, price.id, &mut stats);
        join(
            &mut row,
            "location",
            LOCATION_KEYS,
            price.location_id,
            &locations,
            price.id,
            &mut stats,
        );
        writer.push(row, &mut stats)?;
    }

    writer.finish(&mut stats)?;
    Ok(stats)
}

/// Load a lookup stream. Invalid records follow the engine's strategy.
fn load_lookup<T: Referenced>(
    engine: &ExportEngine,
    path: &Path,
    stats: &mut ConvertStats,
) -> Result<Lookup> {
    let mut lookup = Lookup::new();
    for item in JsonlReader::open(path)? {
        let record = item.and_then(|(line, raw)| parse_price_record::<T>(raw, line));
        match record {
            Ok(record) => {
                lookup.insert(record.id(), to_row(&record)?);
            }
            Err(e) => engine.absorb(e, path, stats)?,
        }
    }
    Ok(lookup)
}

/// Copy `keys` of the referenced record onto `row` as `<prefix>_<key>`
pub(super) fn join(
    row: &mut JsonObject,
    prefix: &str,
    keys: &[&str],
    reference: Option<i64>,
    lookup: &Lookup,
    price_id: i64,
    stats: &mut ConvertStats,
) {
    let referenced = reference.and_then(|id| {
        let found = lookup.get(&id);
        if found.is_none() {
            debug!(price_id, reference = id, prefix, "Dangling reference");
            stats.add_join_miss();
        }
        found
    });

    for key in keys {
        let value = referenced
            .and_then(|record| record.get(*key))
            .cloned()
            .unwrap_or(JsonValue::Null);
        row.insert(format!("{prefix}_{key}"), value);
    }
}
