//! Row to column transposition
//!
//! Turns a batch of flat JSON rows into an Arrow `RecordBatch` typed by an
//! explicit schema. Every column is built from the schema's data type, never
//! from the values, so an all-null batch gets the same column types as any
//! other. A value that does not fit its column type becomes null.

use crate::error::{Error, Result};
use crate::records::serde_ext::{parse_date, parse_datetime};
use crate::types::JsonObject;
use arrow::array::{
    ArrayRef, BooleanArray, Date32Array, Decimal128Array, Float32Array, Float64Array, Int32Array,
    Int64Array, ListArray, StringArray, StructArray, TimestampMicrosecondArray,
};
use arrow::buffer::{NullBuffer, OffsetBuffer};
use arrow::datatypes::{DataType, Field, Fields, SchemaRef, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::Datelike;
use serde_json::Value;
use std::sync::Arc;

/// Days between 0001-01-01 and 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Transpose rows into a record batch with the given schema.
///
/// Missing keys and JSON nulls both become nulls. Keys not in the schema
/// are ignored.
pub fn rows_to_batch(rows: &[JsonObject], schema: &SchemaRef) -> Result<RecordBatch> {
    if rows.is_empty() {
        return Ok(RecordBatch::new_empty(Arc::clone(schema)));
    }

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());

    for field in schema.fields() {
        let values: Vec<Option<&Value>> = rows
            .iter()
            .map(|row| row.get(field.name()).filter(|v| !v.is_null()))
            .collect();

        let array = build_array(&values, field.data_type())
            .map_err(|e| Error::output(format!("column '{}': {e}", field.name())))?;
        columns.push(array);
    }

    RecordBatch::try_new(Arc::clone(schema), columns)
        .map_err(|e| Error::output(format!("Failed to create RecordBatch: {e}")))
}

/// Build an Arrow array from JSON values
fn build_array(values: &[Option<&Value>], data_type: &DataType) -> Result<ArrayRef> {
    match data_type {
        DataType::Boolean => {
            let arr: BooleanArray = values.iter().map(|v| v.and_then(Value::as_bool)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Int32 => {
            let arr: Int32Array = values
                .iter()
                .map(|v| {
                    v.and_then(Value::as_i64)
                        .and_then(|i| i32::try_from(i).ok())
                })
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::Int64 => {
            let arr: Int64Array = values.iter().map(|v| v.and_then(Value::as_i64)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Float32 => {
            let arr: Float32Array = values
                .iter()
                .map(|v| v.and_then(Value::as_f64).map(|f| f as f32))
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::Float64 => {
            let arr: Float64Array = values.iter().map(|v| v.and_then(Value::as_f64)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Utf8 => {
            let arr: StringArray = values
                .iter()
                .map(|v| {
                    v.map(|v| match v {
                        Value::String(s) => s.clone(),
                        _ => v.to_string(),
                    })
                })
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::Decimal128(precision, scale) => {
            let arr: Decimal128Array = values
                .iter()
                .map(|v| v.and_then(|v| parse_decimal(v, *precision, *scale)))
                .collect();
            Ok(Arc::new(arr.with_precision_and_scale(*precision, *scale)?))
        }

        DataType::Date32 => {
            let arr: Date32Array = values
                .iter()
                .map(|v| {
                    v.and_then(Value::as_str)
                        .and_then(parse_date)
                        .map(|date| date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
                })
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::Timestamp(TimeUnit::Microsecond, tz) => {
            let arr: TimestampMicrosecondArray = values
                .iter()
                .map(|v| {
                    v.and_then(Value::as_str)
                        .and_then(parse_datetime)
                        .map(|dt| dt.timestamp_micros())
                })
                .collect();
            Ok(Arc::new(arr.with_timezone_opt(tz.clone())))
        }

        DataType::List(field) => build_list_array(values, field),

        DataType::Struct(fields) => build_struct_array(values, fields),

        other => Err(Error::output(format!("unsupported column type {other}"))),
    }
}

/// Build a list array from JSON arrays; anything else is a null list
fn build_list_array(values: &[Option<&Value>], field: &Arc<Field>) -> Result<ArrayRef> {
    let mut all_items: Vec<Option<&Value>> = Vec::new();
    let mut offsets: Vec<i32> = vec![0];
    let mut validity: Vec<bool> = Vec::with_capacity(values.len());

    for value in values {
        if let Some(Value::Array(arr)) = value {
            all_items.extend(arr.iter().map(|item| Some(item).filter(|v| !v.is_null())));
            validity.push(true);
        } else {
            validity.push(false);
        }
        // Both array and non-array cases need an offset
        let offset = i32::try_from(all_items.len())
            .map_err(|_| Error::output("Array too large for i32 offset"))?;
        offsets.push(offset);
    }

    let items_array = build_array(&all_items, field.data_type())?;
    let offset_buffer = OffsetBuffer::new(offsets.into());

    let list_array = ListArray::try_new(
        Arc::clone(field),
        offset_buffer,
        items_array,
        Some(NullBuffer::from(validity)),
    )?;
    Ok(Arc::new(list_array))
}

/// Build a struct array from JSON objects; anything else is a null struct
fn build_struct_array(values: &[Option<&Value>], fields: &Fields) -> Result<ArrayRef> {
    let mut child_arrays: Vec<ArrayRef> = Vec::with_capacity(fields.len());

    for field in fields {
        let child_values: Vec<Option<&Value>> = values
            .iter()
            .map(|v| {
                v.and_then(Value::as_object)
                    .and_then(|obj| obj.get(field.name()))
                    .filter(|v| !v.is_null())
            })
            .collect();

        let child_array = build_array(&child_values, field.data_type())?;
        child_arrays.push(child_array);
    }

    let validity: Vec<bool> = values.iter().map(|v| v.is_some_and(Value::is_object)).collect();

    let struct_array =
        StructArray::try_new(fields.clone(), child_arrays, Some(NullBuffer::from(validity)))?;
    Ok(Arc::new(struct_array))
}

/// Parse a decimal number into its unscaled integer at `scale`.
///
/// Digits beyond the scale are rounded half up. Values that do not fit
/// `precision` digits, or are not plain decimal notation, yield `None`.
fn parse_decimal(value: &Value, precision: u8, scale: i8) -> Option<i128> {
    let text = match value {
        Value::String(s) => s.trim().trim_matches('"').to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };

    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(&text)),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part
        .bytes()
        .chain(frac_part.bytes())
        .all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let scale = usize::try_from(scale).ok()?;
    let kept_fraction = frac_part
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(scale);

    let mut unscaled: i128 = 0;
    for digit in int_part.bytes().chain(kept_fraction) {
        unscaled = unscaled
            .checked_mul(10)?
            .checked_add(i128::from(digit - b'0'))?;
    }
    if frac_part.as_bytes().get(scale).is_some_and(|d| *d >= b'5') {
        unscaled = unscaled.checked_add(1)?;
    }

    if unscaled >= 10_i128.checked_pow(u32::from(precision))? {
        return None;
    }
    Some(if negative { -unscaled } else { unscaled })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!("2.99"), Some(2990) ; "string")]
    #[test_case(json!(1.5), Some(1500) ; "float")]
    #[test_case(json!(7), Some(7000) ; "integer")]
    #[test_case(json!("-0.25"), Some(-250) ; "negative")]
    #[test_case(json!("0.0005"), Some(1) ; "rounded up")]
    #[test_case(json!("0.0004"), Some(0) ; "rounded down")]
    #[test_case(json!("12345678"), None ; "overflows precision")]
    #[test_case(json!("abc"), None ; "garbage")]
    #[test_case(json!("."), None ; "lone dot")]
    fn test_parse_decimal(value: Value, expected: Option<i128>) {
        assert_eq!(parse_decimal(&value, 10, 3), expected);
    }
}
