//! Conversions between JSON values and SQLite values.
//!
//! Records cross this boundary untyped: a field is whatever JSON the client
//! sent, and comes back as whatever SQLite stored.

use medcert_core::Record;
use rusqlite::{
  Row,
  types::{Value as SqlValue, ValueRef},
};
use serde_json::Value as JsonValue;

/// Convert a JSON field value into an owned SQLite value for binding.
/// Absent fields bind as NULL.
pub fn bind_value(value: Option<&JsonValue>) -> SqlValue {
  match value {
    None | Some(JsonValue::Null) => SqlValue::Null,
    Some(JsonValue::Bool(b)) => SqlValue::Integer(i64::from(*b)),
    Some(JsonValue::Number(n)) => match n.as_i64() {
      Some(i) => SqlValue::Integer(i),
      None => SqlValue::Real(n.as_f64().unwrap_or(0.0)),
    },
    Some(JsonValue::String(s)) => SqlValue::Text(s.clone()),
    // Nested structures are not part of any schema; store their JSON text.
    Some(other) => SqlValue::Text(other.to_string()),
  }
}

/// Convert one SQLite column value back into JSON.
fn column_value(value: ValueRef<'_>) -> JsonValue {
  match value {
    ValueRef::Null => JsonValue::Null,
    ValueRef::Integer(i) => JsonValue::from(i),
    ValueRef::Real(f) => {
      serde_json::Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number)
    }
    ValueRef::Text(bytes) => {
      JsonValue::String(String::from_utf8_lossy(bytes).into_owned())
    }
    ValueRef::Blob(_) => JsonValue::Null,
  }
}

/// Read a full row into a [`Record`], keyed by the query's column names.
pub fn row_to_record(
  row: &Row<'_>,
  columns: &[String],
) -> rusqlite::Result<Record> {
  let mut record = Record::new();
  for (i, name) in columns.iter().enumerate() {
    record.insert(name.clone(), column_value(row.get_ref(i)?));
  }
  Ok(record)
}
