//! Array builders for fixed and attribute-derived columns.

use std::collections::BTreeSet;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanBuilder, Float64Builder, Int64Builder, ListBuilder, StringBuilder,
};
use arrow::datatypes::{DataType, Field};

use crate::model::Attributes;
use crate::value::Value;

/// Storage type inferred for an attribute column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Only booleans
    Boolean,
    /// Only integers
    Int64,
    /// Floats, possibly mixed with integers; also used for all-missing columns
    Float64,
    /// Anything involving text or lists, rendered as literals
    Utf8,
}

impl ColumnKind {
    /// Arrow type for this kind
    pub fn data_type(self) -> DataType {
        match self {
            ColumnKind::Boolean => DataType::Boolean,
            ColumnKind::Int64 => DataType::Int64,
            ColumnKind::Float64 => DataType::Float64,
            ColumnKind::Utf8 => DataType::Utf8,
        }
    }
}

/// Infer the narrowest kind that holds every non-missing value.
pub fn infer_column_kind<'a, I>(values: I) -> ColumnKind
where
    I: IntoIterator<Item = &'a Value>,
{
    let (mut bools, mut ints, mut floats) = (false, false, false);
    for value in values {
        match value {
            v if v.is_missing() => {}
            Value::Bool(_) => bools = true,
            Value::Int64(_) => ints = true,
            Value::Float64(_) => floats = true,
            Value::Utf8(_) | Value::List(_) | Value::Null => return ColumnKind::Utf8,
        }
    }
    match (bools, ints || floats) {
        (true, true) => ColumnKind::Utf8,
        (true, false) => ColumnKind::Boolean,
        (false, _) if floats => ColumnKind::Float64,
        (false, _) if ints => ColumnKind::Int64,
        _ => ColumnKind::Float64,
    }
}

/// Build an array of `kind` from optional cells; absent and missing cells become null.
pub fn build_value_array(kind: ColumnKind, cells: &[Option<&Value>]) -> ArrayRef {
    fn present<'a>(cell: &Option<&'a Value>) -> Option<&'a Value> {
        cell.filter(|v| !v.is_missing())
    }
    match kind {
        ColumnKind::Boolean => {
            let mut builder = BooleanBuilder::with_capacity(cells.len());
            for cell in cells {
                builder.append_option(match present(cell) {
                    Some(Value::Bool(b)) => Some(*b),
                    _ => None,
                });
            }
            Arc::new(builder.finish())
        }
        ColumnKind::Int64 => {
            let mut builder = Int64Builder::with_capacity(cells.len());
            for cell in cells {
                builder.append_option(present(cell).and_then(Value::as_i64));
            }
            Arc::new(builder.finish())
        }
        ColumnKind::Float64 => {
            let mut builder = Float64Builder::with_capacity(cells.len());
            for cell in cells {
                builder.append_option(present(cell).and_then(Value::as_f64));
            }
            Arc::new(builder.finish())
        }
        ColumnKind::Utf8 => {
            let mut builder = StringBuilder::with_capacity(cells.len(), cells.len() * 16);
            for cell in cells {
                builder.append_option(present(cell).map(|v| v.to_string()));
            }
            Arc::new(builder.finish())
        }
    }
}

/// Build a Float64 array using append_slice for memcpy speed
#[inline]
pub fn build_f64_array(data: &[f64]) -> ArrayRef {
    let mut builder = Float64Builder::with_capacity(data.len());
    builder.append_slice(data);
    Arc::new(builder.finish())
}

/// Build a nullable Float64 array
#[inline]
pub fn build_optional_f64_array(data: &[Option<f64>]) -> ArrayRef {
    let mut builder = Float64Builder::with_capacity(data.len());
    for v in data {
        builder.append_option(v.filter(|x| !x.is_nan()));
    }
    Arc::new(builder.finish())
}

/// Build an Int64 array
#[inline]
pub fn build_i64_array(data: &[i64]) -> ArrayRef {
    let mut builder = Int64Builder::with_capacity(data.len());
    builder.append_slice(data);
    Arc::new(builder.finish())
}

/// Build a nullable Utf8 array
pub fn build_optional_str_array<'a, I>(data: I) -> ArrayRef
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut builder = StringBuilder::new();
    for v in data {
        builder.append_option(v);
    }
    Arc::new(builder.finish())
}

/// Build a `List<Float64>` array, one list per row.
///
/// The item field matches [`crate::schema::float_list_field`].
pub fn build_f64_list_array<'a, I>(rows: I) -> ArrayRef
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let item_field = Arc::new(Field::new("item", DataType::Float64, false));
    let mut builder = ListBuilder::new(Float64Builder::new()).with_field(item_field);
    for row in rows {
        builder.values().append_slice(row);
        builder.append(true);
    }
    Arc::new(builder.finish())
}

/// Union of attribute names across rows, sorted, without `reserved` names.
pub fn attribute_names<'a, I>(rows: I, reserved: &[&str]) -> Vec<String>
where
    I: IntoIterator<Item = &'a Attributes>,
{
    let names: BTreeSet<&String> = rows.into_iter().flat_map(|attrs| attrs.keys()).collect();
    names
        .into_iter()
        .filter(|name| !reserved.contains(&name.as_str()))
        .cloned()
        .collect()
}

/// Attribute columns as (field, array) pairs, one per name.
pub fn attribute_columns<'a>(
    rows: &[&'a Attributes],
    names: &[String],
) -> Vec<(Field, ArrayRef)> {
    names
        .iter()
        .map(|name| {
            let cells: Vec<Option<&Value>> = rows.iter().map(|attrs| attrs.get(name)).collect();
            let kind = infer_column_kind(cells.iter().flatten().copied());
            let field = Field::new(name, kind.data_type(), true);
            (field, build_value_array(kind, &cells))
        })
        .collect()
}
