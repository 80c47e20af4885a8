// src/database/types.rs
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::{Map, Number, Value};
use sqlx::{
    error::BoxDynError,
    mysql::{MySql, MySqlRow, MySqlTypeInfo, MySqlValueRef},
    Column, Decode, Row, Type, TypeInfo, ValueRef,
};

use tracing::debug;

use crate::{errors::CatalogError, models::coerce_numeric_text};

/// Number decoded from any numeric or text column.
///
/// NULL and text without a numeric prefix become 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoercedFloat(pub f64);

impl Type<MySql> for CoercedFloat {
    fn type_info() -> MySqlTypeInfo {
        <f64 as Type<MySql>>::type_info()
    }

    fn compatible(_ty: &MySqlTypeInfo) -> bool {
        true
    }
}

/// Column value as read off the wire, before numeric coercion
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum RawNumber<'a> {
    Null,
    Float(f64),
    Signed(i64),
    Unsigned(u64),
    /// DECIMAL or character data
    Text(&'a str),
}

impl RawNumber<'_> {
    pub(crate) fn coerce(self) -> f64 {
        match self {
            Self::Null => 0.0,
            Self::Float(value) if value.is_finite() => value,
            Self::Float(_) => 0.0,
            Self::Signed(value) => value as f64,
            Self::Unsigned(value) => value as f64,
            Self::Text(text) => coerce_numeric_text(text),
        }
    }
}

impl<'r> Decode<'r, MySql> for CoercedFloat {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, BoxDynError> {
        if value.is_null() {
            return Ok(Self(RawNumber::Null.coerce()));
        }
        let ty = value.type_info().into_owned();

        let raw = if <f64 as Type<MySql>>::compatible(&ty) {
            RawNumber::Float(<f64 as Decode<MySql>>::decode(value)?)
        } else if <i64 as Type<MySql>>::compatible(&ty) {
            RawNumber::Signed(<i64 as Decode<MySql>>::decode(value)?)
        } else if <u64 as Type<MySql>>::compatible(&ty) {
            RawNumber::Unsigned(<u64 as Decode<MySql>>::decode(value)?)
        } else {
            // DECIMAL travels as text in both protocols
            RawNumber::Text(<&str as Decode<MySql>>::decode(value)?)
        };

        Ok(Self(raw.coerce()))
    }
}

impl From<CoercedFloat> for f64 {
    fn from(value: CoercedFloat) -> Self {
        value.0
    }
}

/// Convert a row of unknown shape into a JSON object, keeping column order.
pub(crate) fn row_to_json(row: &MySqlRow) -> Result<Map<String, Value>, CatalogError> {
    let mut object = Map::with_capacity(row.columns().len());
    for column in row.columns() {
        let value = column_to_json(row, column.ordinal(), column.name())?;
        object.insert(column.name().to_string(), value);
    }
    Ok(object)
}

fn column_to_json(row: &MySqlRow, index: usize, name: &str) -> Result<Value, CatalogError> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_string();

    let value = match type_name.as_str() {
        "BOOLEAN" => Value::Bool(row.try_get_unchecked::<bool, _>(index)?),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
            Value::from(row.try_get_unchecked::<i64, _>(index)?)
        }
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" | "BIT" => Value::from(row.try_get_unchecked::<u64, _>(index)?),
        "FLOAT" | "DOUBLE" => float_to_json(row.try_get_unchecked::<f64, _>(index)?),
        "DECIMAL" => decimal_to_json(row.try_get_unchecked::<String, _>(index)?),
        "DATE" => temporal_to_json(
            row,
            index,
            &type_name,
            row.try_get_unchecked::<NaiveDate, _>(index)
                .map(|date| date.format("%Y-%m-%d").to_string()),
        ),
        "DATETIME" => temporal_to_json(
            row,
            index,
            &type_name,
            row.try_get_unchecked::<NaiveDateTime, _>(index)
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        ),
        "TIMESTAMP" => temporal_to_json(
            row,
            index,
            &type_name,
            row.try_get_unchecked::<DateTime<Utc>, _>(index)
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        ),
        "TIME" => temporal_to_json(
            row,
            index,
            &type_name,
            row.try_get_unchecked::<NaiveTime, _>(index)
                .map(|time| time.format("%H:%M:%S").to_string()),
        ),
        "JSON" => row.try_get_unchecked::<sqlx::types::Json<Value>, _>(index)?.0,
        "CHAR" | "VARCHAR" | "TEXT" | "TINYTEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM"
        | "SET" => Value::from(row.try_get_unchecked::<String, _>(index)?),
        "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            let bytes = row.try_get_unchecked::<Vec<u8>, _>(index)?;
            Value::from(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => {
            return Err(CatalogError::UnsupportedColumnType {
                column: name.to_string(),
                type_name,
            })
        }
    };

    Ok(value)
}

/// Temporal value, or its stored text when chrono rejects it.
///
/// MySQL allows zero dates such as `0000-00-00`, which have no chrono
/// representation.
fn temporal_to_json(
    row: &MySqlRow,
    index: usize,
    type_name: &str,
    decoded: Result<String, sqlx::Error>,
) -> Value {
    match decoded {
        Ok(text) => Value::from(text),
        Err(e) => {
            debug!("Column {} is not a valid {}: {}", index, type_name, e);
            let stored = row.try_get_unchecked::<String, _>(index).ok();
            Value::from(stored_temporal_text(stored, type_name))
        }
    }
}

/// Stored text of an undecodable temporal value.
///
/// Binary protocol sends zero dates as an empty value, so anything that is
/// not printable text falls back to the type's zero literal.
fn stored_temporal_text(stored: Option<String>, type_name: &str) -> String {
    match stored {
        Some(text) if is_printable(&text) => text,
        _ => zero_temporal_text(type_name).to_string(),
    }
}

fn is_printable(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_graphic() || b == b' ')
}

fn zero_temporal_text(type_name: &str) -> &'static str {
    match type_name {
        "DATE" => "0000-00-00",
        "TIME" => "00:00:00",
        _ => "0000-00-00 00:00:00",
    }
}

fn float_to_json(value: f64) -> Value {
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}

/// DECIMAL as a JSON number when it fits an f64, otherwise as its text.
fn decimal_to_json(text: String) -> Value {
    match text.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(number) => Value::Number(number),
        None => Value::String(text),
    }
}
