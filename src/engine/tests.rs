//! Tests for engine module

use super::*;
use crate::output::ParquetWriterConfig;
use crate::records::pseudonymize;
use crate::types::JsonObject;
use arrow::array::{Array, AsArray, RecordBatch};
use arrow::datatypes::Int64Type;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fs::File;
use tempfile::{tempdir, TempDir};

fn write_lines(dir: &TempDir, name: &str, lines: &[Value]) -> PathBuf {
    let path = dir.path().join(name);
    let body: Vec<String> = lines.iter().map(Value::to_string).collect();
    std::fs::write(&path, body.join("\n")).unwrap();
    path
}

fn read_back(path: &Path) -> (Vec<RecordBatch>, usize) {
    let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(path).unwrap()).unwrap();
    let row_groups = builder.metadata().num_row_groups();
    let batches = builder.build().unwrap().map(|b| b.unwrap()).collect();
    (batches, row_groups)
}

fn codes(batches: &[RecordBatch]) -> Vec<String> {
    batches
        .iter()
        .flat_map(|batch| {
            let column = batch.column_by_name("code").unwrap().as_string::<i32>();
            (0..column.len())
                .map(|i| column.value(i).to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}

// ============================================================================
// Options and Stats Tests
// ============================================================================

#[test]
fn test_convert_options_default() {
    let options = ConvertOptions::default();
    assert_eq!(options.batch_size, DEFAULT_BATCH_SIZE);
    assert_eq!(options.on_invalid, ErrorStrategy::Fail);
    assert!(!options.flush_per_batch);
}

#[test]
fn test_convert_options_builder() {
    let options = ConvertOptions::new()
        .with_batch_size(0)
        .with_error_strategy(ErrorStrategy::Skip)
        .with_flush_per_batch(true)
        .with_writer_config(ParquetWriterConfig::new().with_row_group_size(10));

    assert_eq!(options.batch_size, 1);
    assert_eq!(options.on_invalid, ErrorStrategy::Skip);
    assert!(options.flush_per_batch);
    assert_eq!(options.writer.row_group_size(), 10);
}

#[test]
fn test_convert_stats_counters() {
    let mut stats = ConvertStats::new();
    stats.add_read();
    stats.add_read();
    stats.add_skipped();
    stats.add_batch(1);
    stats.add_join_miss();
    stats.set_duration(42);

    assert_eq!(stats.records_read, 2);
    assert_eq!(stats.records_skipped, 1);
    assert_eq!(stats.records_written, 1);
    assert_eq!(stats.batches_written, 1);
    assert_eq!(stats.join_misses, 1);
    assert_eq!(stats.duration_ms, 42);
}

// ============================================================================
// Product Conversion Tests
// ============================================================================

#[test]
fn test_batches_keep_source_order() {
    let dir = tempdir().unwrap();
    let lines: Vec<Value> = (1..=5).map(|i| json!({"code": format!("{i:03}")})).collect();
    let source = write_lines(&dir, "beauty.jsonl", &lines);
    let output = dir.path().join("beauty.parquet");

    let engine = ExportEngine::default().with_options(
        ConvertOptions::new()
            .with_batch_size(2)
            .with_flush_per_batch(true),
    );
    let stats = engine
        .convert(&output, &SourcePaths::product(&source), Flavor::Beauty)
        .unwrap();

    assert_eq!(stats.records_read, 5);
    assert_eq!(stats.records_written, 5);
    assert_eq!(stats.batches_written, 3);

    let (batches, row_groups) = read_back(&output);
    assert_eq!(row_groups, 3);
    assert_eq!(codes(&batches), vec!["001", "002", "003", "004", "005"]);
}

#[test]
fn test_row_groups_accumulate_without_flush() {
    let dir = tempdir().unwrap();
    let lines: Vec<Value> = (1..=5).map(|i| json!({"code": i.to_string()})).collect();
    let source = write_lines(&dir, "products.jsonl", &lines);
    let output = dir.path().join("products.parquet");

    let engine = ExportEngine::default().with_options(ConvertOptions::new().with_batch_size(2));
    engine
        .convert(&output, &SourcePaths::product(&source), Flavor::Products)
        .unwrap();

    let (_, row_groups) = read_back(&output);
    assert_eq!(row_groups, 1);
}

#[test]
fn test_multiple_product_sources_append() {
    let dir = tempdir().unwrap();
    let first = write_lines(&dir, "a.jsonl", &[json!({"code": "a"})]);
    let second = write_lines(&dir, "b.jsonl", &[json!({"code": "b"})]);
    let output = dir.path().join("pet_food.parquet");

    let sources = SourcePaths::Products {
        paths: vec![first, second],
    };
    convert(&output, &sources, Flavor::PetFood).unwrap();

    let (batches, _) = read_back(&output);
    assert_eq!(codes(&batches), vec!["a", "b"]);
}

#[test]
fn test_empty_source_writes_empty_file_with_schema() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("empty.jsonl");
    std::fs::write(&source, "").unwrap();
    let output = dir.path().join("food.parquet");

    let stats = convert(&output, &SourcePaths::product(&source), Flavor::Food).unwrap();
    assert_eq!(stats.records_written, 0);
    assert_eq!(stats.batches_written, 0);

    let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(&output).unwrap()).unwrap();
    assert!(builder.schema().field_with_name("schema_version").is_ok());
}

#[test]
fn test_failure_mid_stream_leaves_no_output() {
    let dir = tempdir().unwrap();
    let lines = vec![json!({"code": "1"}), json!({"code": "2"}), json!({"rev": 3})];
    let source = write_lines(&dir, "food.jsonl", &lines);
    let output = dir.path().join("out").join("food.parquet");

    let engine = ExportEngine::default().with_options(ConvertOptions::new().with_batch_size(1));
    let err = engine
        .convert(&output, &SourcePaths::product(&source), Flavor::Food)
        .unwrap_err();

    assert!(matches!(err, Error::MandatoryFieldMissing { line: 3, .. }));
    assert!(!output.exists());
    assert_eq!(std::fs::read_dir(dir.path().join("out")).unwrap().count(), 0);
}

#[test]
fn test_skip_counts_bad_lines() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("food.jsonl");
    std::fs::write(
        &source,
        "{\"code\": \"1\"}\nnot json\n{\"rev\": 2}\n{\"code\": \"4\"}\n",
    )
    .unwrap();
    let output = dir.path().join("food.parquet");

    let engine = ExportEngine::default()
        .with_options(ConvertOptions::new().with_error_strategy(ErrorStrategy::Skip));
    let stats = engine
        .convert(&output, &SourcePaths::product(&source), Flavor::Food)
        .unwrap();

    assert_eq!(stats.records_read, 4);
    assert_eq!(stats.records_skipped, 2);
    assert_eq!(stats.records_written, 2);
}

#[test]
fn test_mismatched_sources_rejected() {
    let dir = tempdir().unwrap();
    let source = write_lines(&dir, "prices.jsonl", &[json!({"id": 1, "type": "PRODUCT"})]);
    let output = dir.path().join("prices.parquet");

    let err = convert(&output, &SourcePaths::product(&source), Flavor::Price).unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
    assert!(!output.exists());
}

// ============================================================================
// Price Join Tests
// ============================================================================

#[test]
fn test_price_join_and_misses() {
    let dir = tempdir().unwrap();
    let prices = write_lines(
        &dir,
        "prices.jsonl",
        &[
            json!({"id": 1, "type": "PRODUCT", "proof_id": 42, "location_id": 7, "price": "1.50"}),
            json!({"id": 2, "type": "PRODUCT", "proof_id": 99}),
            json!({"id": 3, "type": "CATEGORY"}),
        ],
    );
    let proofs = write_lines(
        &dir,
        "proofs.jsonl",
        &[json!({"id": 42, "type": "RECEIPT", "owner": "alice", "currency": "EUR"})],
    );
    let locations = write_lines(
        &dir,
        "locations.jsonl",
        &[json!({"id": 7, "type": "OSM", "osm_address_city": "Lyon"})],
    );
    let output = dir.path().join("prices.parquet");

    let stats = convert(
        &output,
        &SourcePaths::prices(&prices, &proofs, &locations),
        Flavor::Price,
    )
    .unwrap();
    assert_eq!(stats.records_written, 3);
    assert_eq!(stats.join_misses, 1);

    let (batches, _) = read_back(&output);
    let batch = &batches[0];

    let ids = batch.column_by_name("id").unwrap().as_primitive::<Int64Type>();
    assert_eq!(ids.values().to_vec(), vec![1, 2, 3]);

    let owner = batch.column_by_name("proof_owner").unwrap().as_string::<i32>();
    assert_eq!(owner.value(0), pseudonymize("alice"));
    assert!(owner.is_null(1));
    assert!(owner.is_null(2));

    let city = batch
        .column_by_name("location_osm_address_city")
        .unwrap()
        .as_string::<i32>();
    assert_eq!(city.value(0), "Lyon");
    assert!(city.is_null(1));
}

#[test]
fn test_join_fills_prefixed_columns() {
    let mut lookup = HashMap::new();
    lookup.insert(
        5,
        json!({"type": "OSM", "source": "web"})
            .as_object()
            .unwrap()
            .clone(),
    );
    let mut stats = ConvertStats::new();

    let mut row = JsonObject::new();
    prices::join(
        &mut row,
        "location",
        &["type", "source", "created"],
        Some(5),
        &lookup,
        1,
        &mut stats,
    );
    assert_eq!(row["location_type"], json!("OSM"));
    assert_eq!(row["location_source"], json!("web"));
    assert_eq!(row["location_created"], Value::Null);
    assert_eq!(stats.join_misses, 0);

    let mut row = JsonObject::new();
    prices::join(&mut row, "location", &["type"], None, &lookup, 2, &mut stats);
    assert_eq!(row["location_type"], Value::Null);
    assert_eq!(stats.join_misses, 0);
}
