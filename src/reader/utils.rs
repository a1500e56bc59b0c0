use arrow::array::{
    Array, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
    ListArray, StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use crate::value::Value;

use super::ReaderError;

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a dyn Array, ReaderError> {
    batch
        .column_by_name(name)
        .map(|c| c.as_ref())
        .ok_or_else(|| ReaderError::ColumnNotFound(name.to_string()))
}

fn type_error(name: &str, expected: &'static str, array: &dyn Array) -> ReaderError {
    ReaderError::ColumnType {
        column: name.to_string(),
        expected,
        found: array.data_type().clone(),
    }
}

/// Get a required Int64 column by name.
pub(super) fn get_int64_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a Int64Array, ReaderError> {
    let array = column(batch, name)?;
    array
        .as_any()
        .downcast_ref::<Int64Array>()
        .ok_or_else(|| type_error(name, "Int64", array))
}

/// Get a required Float64 column by name.
pub(super) fn get_float64_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a Float64Array, ReaderError> {
    let array = column(batch, name)?;
    array
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| type_error(name, "Float64", array))
}

/// Get a required List column by name.
pub(super) fn get_list_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a ListArray, ReaderError> {
    let array = column(batch, name)?;
    array
        .as_any()
        .downcast_ref::<ListArray>()
        .ok_or_else(|| type_error(name, "List<Float64>", array))
}

/// Get an optional column of any type by name.
pub(super) fn get_optional_column<'a>(batch: &'a RecordBatch, name: &str) -> Option<&'a dyn Array> {
    batch.column_by_name(name).map(|c| c.as_ref())
}

/// Read one Float64 list cell; null cells read as empty.
pub(super) fn f64_list_at(list: &ListArray, row: usize) -> Result<Vec<f64>, ReaderError> {
    if list.is_null(row) {
        return Ok(Vec::new());
    }
    let values = list.value(row);
    let values = values
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| ReaderError::ListItemType(values.data_type().clone()))?;
    Ok(values.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

macro_rules! cell {
    ($array:expr, $ty:ty, $row:expr) => {
        $array
            .as_any()
            .downcast_ref::<$ty>()
            .map(|a| a.value($row))
            .ok_or_else(|| ReaderError::UnsupportedType($array.data_type().clone()))?
    };
}

/// Read one scalar cell as a [`Value`]; nulls read as [`Value::Null`].
pub(super) fn value_at(array: &dyn Array, row: usize) -> Result<Value, ReaderError> {
    if array.is_null(row) {
        return Ok(Value::Null);
    }
    let value = match array.data_type() {
        DataType::Null => Value::Null,
        DataType::Boolean => Value::Bool(cell!(array, BooleanArray, row)),
        DataType::Int32 => Value::Int64(cell!(array, Int32Array, row) as i64),
        DataType::Int64 => Value::Int64(cell!(array, Int64Array, row)),
        DataType::Float32 => Value::Float64(cell!(array, Float32Array, row) as f64),
        DataType::Float64 => Value::Float64(cell!(array, Float64Array, row)),
        DataType::Utf8 => Value::Utf8(cell!(array, StringArray, row).to_string()),
        DataType::LargeUtf8 => Value::Utf8(cell!(array, LargeStringArray, row).to_string()),
        other => return Err(ReaderError::UnsupportedType(other.clone())),
    };
    Ok(value)
}
