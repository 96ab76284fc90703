//! Tests for output module

use super::*;
use crate::schema::{images_type, nutriments_type, PRICE_PRECISION, PRICE_SCALE};
use crate::types::JsonObject;
use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Decimal128Type, Field, Int32Type, Int64Type, Schema, SchemaRef, TimeUnit,
    TimestampMicrosecondType,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::json;
use std::fs::File;
use std::sync::Arc;
use tempfile::tempdir;

fn rows(values: Vec<serde_json::Value>) -> Vec<JsonObject> {
    values
        .into_iter()
        .map(|v| v.as_object().unwrap().clone())
        .collect()
}

fn simple_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("code", DataType::Utf8, false),
        Field::new("rev", DataType::Int32, true),
        Field::new("images", images_type(), true),
        Field::new("nutriments", nutriments_type(), true),
    ]))
}

// ============================================================================
// Row Transposition Tests
// ============================================================================

#[test]
fn test_rows_to_batch_empty() {
    let schema = simple_schema();
    let batch = rows_to_batch(&[], &schema).unwrap();
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.schema(), schema);
}

#[test]
fn test_all_null_nested_column_keeps_type() {
    let schema = simple_schema();
    let batch = rows_to_batch(
        &rows(vec![
            json!({"code": "1", "images": null}),
            json!({"code": "2"}),
        ]),
        &schema,
    )
    .unwrap();

    let images = batch.column_by_name("images").unwrap();
    assert_eq!(images.data_type(), &images_type());
    assert_eq!(images.null_count(), 2);
    assert_eq!(
        batch.column_by_name("nutriments").unwrap().data_type(),
        &nutriments_type()
    );
}

#[test]
fn test_list_of_struct_values() {
    let schema = simple_schema();
    let batch = rows_to_batch(
        &rows(vec![json!({
            "code": "1",
            "images": [{
                "key": "front_fr",
                "imgid": 3,
                "rev": 12,
                "sizes": {
                    "100": {"h": 100, "w": 75},
                    "200": null,
                    "400": null,
                    "full": {"h": 1200, "w": 900}
                },
                "uploaded_t": 1_600_000_000_i64,
                "uploader": "alice"
            }]
        })]),
        &schema,
    )
    .unwrap();

    let images = batch.column_by_name("images").unwrap().as_list::<i32>();
    assert_eq!(images.value_length(0), 1);
    let image = images.value(0);
    let image = image.as_struct();
    let imgid = image.column_by_name("imgid").unwrap().as_primitive::<Int32Type>();
    assert_eq!(imgid.value(0), 3);
    let uploaded = image
        .column_by_name("uploaded_t")
        .unwrap()
        .as_primitive::<Int64Type>();
    assert_eq!(uploaded.value(0), 1_600_000_000);

    let sizes = image.column_by_name("sizes").unwrap().as_struct();
    assert!(sizes.column_by_name("200").unwrap().is_null(0));
    let small = sizes.column_by_name("100").unwrap().as_struct();
    assert_eq!(
        small.column_by_name("h").unwrap().as_primitive::<Int32Type>().value(0),
        100
    );
}

#[test]
fn test_int32_overflow_becomes_null() {
    let schema = simple_schema();
    let batch = rows_to_batch(
        &rows(vec![
            json!({"code": "1", "rev": 7}),
            json!({"code": "2", "rev": 5_000_000_000_i64}),
        ]),
        &schema,
    )
    .unwrap();

    let rev = batch.column_by_name("rev").unwrap().as_primitive::<Int32Type>();
    assert_eq!(rev.value(0), 7);
    assert!(rev.is_null(1));
}

#[test]
fn test_date_timestamp_and_decimal_columns() {
    let schema: SchemaRef = Arc::new(Schema::new(vec![
        Field::new("date", DataType::Date32, true),
        Field::new(
            "created",
            DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
            true,
        ),
        Field::new(
            "price",
            DataType::Decimal128(PRICE_PRECISION, PRICE_SCALE),
            true,
        ),
    ]));
    let batch = rows_to_batch(
        &rows(vec![
            json!({"date": "1970-01-02", "created": "1970-01-01T00:00:01Z", "price": "2.99"}),
            json!({"date": "not a date", "created": null, "price": "abc"}),
        ]),
        &schema,
    )
    .unwrap();

    let date = batch.column(0).as_primitive::<Date32Type>();
    assert_eq!(date.value(0), 1);
    assert!(date.is_null(1));

    let created = batch.column(1).as_primitive::<TimestampMicrosecondType>();
    assert_eq!(created.value(0), 1_000_000);
    assert!(created.is_null(1));

    let price = batch.column(2).as_primitive::<Decimal128Type>();
    assert_eq!(price.value(0), 2990);
    assert!(price.is_null(1));
}

#[test]
fn test_non_string_value_in_string_column() {
    let schema: SchemaRef = Arc::new(Schema::new(vec![Field::new(
        "nova_groups",
        DataType::Utf8,
        true,
    )]));
    let batch = rows_to_batch(&rows(vec![json!({"nova_groups": 4})]), &schema).unwrap();
    assert_eq!(batch.column(0).as_string::<i32>().value(0), "4");
}

// ============================================================================
// Parquet Writer Tests
// ============================================================================

#[test]
fn test_parquet_writer_config_builder() {
    let config = ParquetWriterConfig::new()
        .with_row_group_size(1000)
        .with_dictionary(false);
    assert_eq!(config.row_group_size(), 1000);

    let config = ParquetWriterConfig::new().with_row_group_size(0);
    assert_eq!(config.row_group_size(), 1);
    assert_eq!(
        ParquetWriterConfig::default().row_group_size(),
        DEFAULT_ROW_GROUP_SIZE
    );
}

#[test]
fn test_parquet_writer_close_moves_file_into_place() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("food.parquet");
    let schema = simple_schema();

    let batch = rows_to_batch(
        &rows(vec![json!({"code": "1"}), json!({"code": "2"})]),
        &schema,
    )
    .unwrap();

    let mut writer =
        ParquetWriter::new(&path, Arc::clone(&schema), &ParquetWriterConfig::default()).unwrap();
    assert_eq!(writer.rows_written(), 0);
    writer.write(&batch).unwrap();
    assert_eq!(writer.rows_written(), 2);
    assert!(!path.exists());

    assert_eq!(writer.close().unwrap(), 2);
    assert!(path.exists());
    assert!(!dir.path().join("nested").join("food.parquet.tmp").exists());

    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&path).unwrap())
        .unwrap()
        .build()
        .unwrap();
    let total: usize = reader.map(|b| b.unwrap().num_rows()).sum();
    assert_eq!(total, 2);
}

#[test]
fn test_parquet_writer_flush_closes_row_group() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("groups.parquet");
    let schema = simple_schema();

    let mut writer =
        ParquetWriter::new(&path, Arc::clone(&schema), &ParquetWriterConfig::default()).unwrap();
    for code in ["1", "2", "3"] {
        let batch = rows_to_batch(&rows(vec![json!({"code": code})]), &schema).unwrap();
        writer.write(&batch).unwrap();
        writer.flush().unwrap();
    }
    writer.close().unwrap();

    let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(&path).unwrap()).unwrap();
    assert_eq!(builder.metadata().num_row_groups(), 3);
}

#[test]
fn test_parquet_writer_abort_leaves_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("aborted.parquet");
    let schema = simple_schema();

    let mut writer =
        ParquetWriter::new(&path, Arc::clone(&schema), &ParquetWriterConfig::default()).unwrap();
    let batch = rows_to_batch(&rows(vec![json!({"code": "1"})]), &schema).unwrap();
    writer.write(&batch).unwrap();
    writer.abort();

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_parquet_writer_empty_file_keeps_schema() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.parquet");
    let schema = simple_schema();

    let writer =
        ParquetWriter::new(&path, Arc::clone(&schema), &ParquetWriterConfig::default()).unwrap();
    assert_eq!(writer.close().unwrap(), 0);

    let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(&path).unwrap()).unwrap();
    assert_eq!(builder.schema().fields().len(), schema.fields().len());
    assert_eq!(builder.metadata().file_metadata().num_rows(), 0);
}
