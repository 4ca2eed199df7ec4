use crate::{stmt::Value, Error, Result};

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

/// The semantic type of a column.
///
/// Declared storage types are folded into this small set when the catalog is
/// loaded; values are validated against it before any statement is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    String,
    Integer,
    Float,
    DateTime,
    /// Binary large object
    Blob,
    /// Character large object
    Clob,
}

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

impl ColumnType {
    /// Maps a declared database type to its semantic type.
    ///
    /// Length and precision specifiers are ignored, so `VARCHAR2(100)` and
    /// `NUMBER(10, 2)` resolve like `VARCHAR2` and `NUMBER`.
    pub fn from_declared(declared: &str) -> Result<ColumnType> {
        let base = declared
            .split('(')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_uppercase();

        let ty = match base.as_str() {
            "VARCHAR2" | "VARCHAR" | "NVARCHAR2" | "NVARCHAR" | "CHAR" | "NCHAR" | "CHARACTER"
            | "TEXT" | "RAW" => ColumnType::String,
            "NUMBER" | "INTEGER" | "INT" | "SMALLINT" | "BIGINT" | "NUMERIC" | "LONG" => {
                ColumnType::Integer
            }
            "FLOAT" | "REAL" | "DEC" | "DECIMAL" | "DOUBLE" | "DOUBLE PRECISION" => {
                ColumnType::Float
            }
            "DATE" | "TIMESTAMP" | "DATETIME" => ColumnType::DateTime,
            "CLOB" | "NCLOB" => ColumnType::Clob,
            "BLOB" => ColumnType::Blob,
            _ if base.starts_with("TIMESTAMP") => ColumnType::DateTime,
            _ => {
                return Err(Error::invalid_schema(format!(
                    "unsupported column type `{declared}`"
                )))
            }
        };

        Ok(ty)
    }

    pub fn is_lob(self) -> bool {
        matches!(self, ColumnType::Blob | ColumnType::Clob)
    }

    /// Returns `true` if `value` may be stored in a column of this type.
    ///
    /// Null is accepted here; nullability is a property of the column, not
    /// the type.
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (ColumnType::String | ColumnType::Clob, Value::String(_)) => true,
            (ColumnType::Integer, Value::I64(_)) => true,
            (ColumnType::Float, Value::F64(_)) => true,
            (ColumnType::DateTime, Value::DateTime(_)) => true,
            (ColumnType::Blob, Value::Bytes(_)) => true,
            _ => false,
        }
    }

    /// Converts a raw value read from the store into this column's
    /// representation.
    ///
    /// Drivers report values by storage class; stores without a native
    /// datetime type hand back text, and float columns may hold integral
    /// values.
    pub fn coerce(self, value: Value) -> Result<Value> {
        match (self, value) {
            (ColumnType::DateTime, Value::String(text)) => parse_datetime(&text).map(Value::DateTime),
            (ColumnType::Float, Value::I64(v)) => Ok(Value::F64(v as f64)),
            (ColumnType::Integer, Value::F64(v)) if v.fract() == 0.0 => Ok(Value::I64(v as i64)),
            (ColumnType::Clob, Value::Bytes(bytes)) => String::from_utf8(bytes)
                .map(Value::String)
                .map_err(|err| Error::from(anyhow::Error::from(err))),
            (_, value) => Ok(value),
        }
    }

    /// Renders a datetime the way text-backed stores keep it.
    pub fn format_datetime(value: &NaiveDateTime) -> String {
        value.format(DATETIME_FORMAT).to_string()
    }
}

fn parse_datetime(text: &str) -> Result<NaiveDateTime> {
    match NaiveDateTime::parse_from_str(text, DATETIME_FORMAT) {
        Ok(value) => Ok(value),
        Err(_) => {
            let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")?;
            Ok(date.and_time(chrono::NaiveTime::MIN))
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColumnType::String => "string",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::DateTime => "datetime",
            ColumnType::Blob => "blob",
            ColumnType::Clob => "clob",
        })
    }
}
