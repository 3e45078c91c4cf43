use std::collections::BTreeMap;

use polars::prelude::*;

use crate::error::{LfError, Result, WeakLabelError};
use super::field::FieldValue;


/// Struct `Record` holds one data point as a map of named fields.
///
/// Records are immutable once handed to an applier;
/// preprocessors produce new records instead of mutating in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}


impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self { fields: BTreeMap::new() }
    }


    /// Builds a record from `(name, value)` pairs.
    pub fn from_pairs<S, V, I>(pairs: I) -> Self
        where S: ToString,
              V: Into<FieldValue>,
              I: IntoIterator<Item = (S, V)>,
    {
        let fields = pairs.into_iter()
            .map(|(name, value)| (name.to_string(), value.into()))
            .collect();
        Self { fields }
    }


    /// Returns a copy of `self` with the given field set.
    /// Used by preprocessors extending the schema.
    pub fn with<S, V>(&self, name: S, value: V) -> Self
        where S: ToString,
              V: Into<FieldValue>,
    {
        let mut fields = self.fields.clone();
        fields.insert(name.to_string(), value.into());
        Self { fields }
    }


    /// Returns the raw field value, if present.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }


    /// Returns the names of all fields, in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }


    /// Returns the integer field of the given name.
    pub fn int(&self, name: &str) -> std::result::Result<i64, LfError> {
        match self.field(name) {
            Some(FieldValue::Int(v)) => Ok(*v),
            Some(_) => Err(LfError::WrongType {
                field: name.to_string(), expected: "int",
            }),
            None => Err(LfError::MissingField(name.to_string())),
        }
    }


    /// Returns the floating point field of the given name.
    /// Integer fields are widened to `f64`.
    pub fn float(&self, name: &str) -> std::result::Result<f64, LfError> {
        match self.field(name) {
            Some(FieldValue::Float(v)) => Ok(*v),
            Some(FieldValue::Int(v)) => Ok(*v as f64),
            Some(_) => Err(LfError::WrongType {
                field: name.to_string(), expected: "float",
            }),
            None => Err(LfError::MissingField(name.to_string())),
        }
    }


    /// Returns the text field of the given name.
    pub fn text(&self, name: &str) -> std::result::Result<&str, LfError> {
        match self.field(name) {
            Some(FieldValue::Str(v)) => Ok(v.as_str()),
            Some(_) => Err(LfError::WrongType {
                field: name.to_string(), expected: "str",
            }),
            None => Err(LfError::MissingField(name.to_string())),
        }
    }


    /// Returns the boolean field of the given name.
    pub fn boolean(&self, name: &str) -> std::result::Result<bool, LfError> {
        match self.field(name) {
            Some(FieldValue::Bool(v)) => Ok(*v),
            Some(_) => Err(LfError::WrongType {
                field: name.to_string(), expected: "bool",
            }),
            None => Err(LfError::MissingField(name.to_string())),
        }
    }
}


/// Materializes every row of the given `DataFrame` as a [`Record`](Record).
///
/// Supported column types are integers, floats, text, and booleans;
/// null entries become [`FieldValue::Null`](FieldValue::Null).
pub fn records_from_dataframe(data: &DataFrame) -> Result<Vec<Record>> {
    let (n_row, _) = data.shape();

    let mut columns = Vec::with_capacity(data.width());
    for series in data.get_columns() {
        let name = series.name().to_string();
        let values = column_to_fields(series)?;
        columns.push((name, values));
    }

    let records = (0..n_row)
        .map(|i| {
            let fields = columns.iter()
                .map(|(name, values)| (name.clone(), values[i].clone()))
                .collect::<BTreeMap<_, _>>();
            Record { fields }
        })
        .collect::<Vec<_>>();
    Ok(records)
}


fn column_to_fields(series: &Series) -> Result<Vec<FieldValue>> {
    let values = match series.dtype() {
        DataType::Int64 => series.i64()?
            .into_iter()
            .map(|v| v.map(FieldValue::Int).unwrap_or(FieldValue::Null))
            .collect(),
        DataType::Int32 => series.i32()?
            .into_iter()
            .map(|v| v.map(|x| FieldValue::Int(x as i64))
                .unwrap_or(FieldValue::Null))
            .collect(),
        DataType::Float64 => series.f64()?
            .into_iter()
            .map(|v| v.map(FieldValue::Float).unwrap_or(FieldValue::Null))
            .collect(),
        DataType::Utf8 => series.utf8()?
            .into_iter()
            .map(|v| v.map(|s| FieldValue::Str(s.to_string()))
                .unwrap_or(FieldValue::Null))
            .collect(),
        DataType::Boolean => series.bool()?
            .into_iter()
            .map(|v| v.map(FieldValue::Bool).unwrap_or(FieldValue::Null))
            .collect(),
        other => {
            let msg = format!(
                "column `{}` has unsupported dtype {other}", series.name(),
            );
            return Err(WeakLabelError::DataFrame(
                PolarsError::ComputeError(msg.into())
            ));
        },
    };
    Ok(values)
}
