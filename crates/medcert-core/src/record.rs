//! [`Record`] — the loose field-name → value mapping exchanged with clients.
//!
//! Clients send certificate data as flat JSON objects; the store decides
//! which keys it recognizes via the table's schema descriptor. A `Record`
//! therefore wraps a plain [`serde_json::Map`] rather than a typed struct.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A flat JSON object keyed by wire field names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
  pub fn new() -> Self {
    Record(Map::new())
  }

  /// Wrap a [`Value`], provided it is a JSON object.
  pub fn from_value(value: Value) -> Option<Self> {
    match value {
      Value::Object(map) => Some(Record(map)),
      _ => None,
    }
  }

  pub fn get(&self, name: &str) -> Option<&Value> {
    self.0.get(name)
  }

  pub fn insert(&mut self, name: impl Into<String>, value: Value) {
    self.0.insert(name.into(), value);
  }

  pub fn contains(&self, name: &str) -> bool {
    self.0.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// The record id, if present and usable as a row key.
  ///
  /// Accepts a JSON number or a numeric string. Zero counts as absent, as
  /// does anything non-numeric.
  pub fn id(&self) -> Option<i64> {
    parse_id(self.0.get("id")?)
  }

  /// Whether a value counts as "not supplied": JSON null or empty string.
  ///
  /// The duplicate predicate and required-field validation both treat these
  /// as equivalent to an absent field.
  pub fn is_blank(value: &Value) -> bool {
    match value {
      Value::Null => true,
      Value::String(s) => s.is_empty(),
      _ => false,
    }
  }
}

/// Parse a client-supplied row id: a JSON number or a numeric string.
///
/// Zero counts as absent, as does anything non-numeric. Every endpoint that
/// takes an id accepts both spellings, so the delete paths share this with
/// [`Record::id`].
pub fn parse_id(value: &Value) -> Option<i64> {
  let id = match value {
    Value::Number(n) => n.as_i64()?,
    Value::String(s) => s.trim().parse().ok()?,
    _ => return None,
  };
  (id != 0).then_some(id)
}

/// Validate a range-query bound as a `YYYY-MM-DD` calendar date.
pub fn ensure_iso_date(s: &str) -> Result<()> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map(|_| ())
    .map_err(|_| Error::InvalidDateFormat(s.to_owned()))
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn id_accepts_numbers_and_numeric_strings() {
    let rec = Record::from_value(json!({ "id": 7 })).unwrap();
    assert_eq!(rec.id(), Some(7));

    let rec = Record::from_value(json!({ "id": "12" })).unwrap();
    assert_eq!(rec.id(), Some(12));
  }

  #[test]
  fn id_treats_zero_and_garbage_as_absent() {
    let rec = Record::from_value(json!({ "id": 0 })).unwrap();
    assert_eq!(rec.id(), None);

    let rec = Record::from_value(json!({ "id": "abc" })).unwrap();
    assert_eq!(rec.id(), None);

    let rec = Record::from_value(json!({ "nom": "Benali" })).unwrap();
    assert_eq!(rec.id(), None);
  }

  #[test]
  fn parse_id_standalone_values() {
    assert_eq!(parse_id(&json!(3)), Some(3));
    assert_eq!(parse_id(&json!(" 4 ")), Some(4));
    assert_eq!(parse_id(&json!("0")), None);
    assert_eq!(parse_id(&Value::Null), None);
    assert_eq!(parse_id(&json!(true)), None);
  }

  #[test]
  fn blank_values() {
    assert!(Record::is_blank(&Value::Null));
    assert!(Record::is_blank(&json!("")));
    assert!(!Record::is_blank(&json!("x")));
    assert!(!Record::is_blank(&json!(0)));
  }

  #[test]
  fn iso_dates() {
    ensure_iso_date("2024-03-01").unwrap();
    assert!(matches!(
      ensure_iso_date("2024/03/01").unwrap_err(),
      Error::InvalidDateFormat(_)
    ));
    assert!(matches!(
      ensure_iso_date("2024-13-41").unwrap_err(),
      Error::InvalidDateFormat(_)
    ));
  }
}
