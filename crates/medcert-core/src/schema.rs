//! Static schema descriptors for the five certificate tables.
//!
//! Every table is described once, as an ordered list of [`FieldDef`]s plus
//! the column used for date-range queries. Storage backends generate their
//! SQL (inserts, duplicate checks, updates, range selects) from these
//! descriptors with bound parameters; no column name ever comes from client
//! input.
//!
//! Wire names (table and column names) are kept identical to the legacy
//! database so an existing data file keeps working unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
  error::{Error, Result},
  record::Record,
};

// ─── Tables ──────────────────────────────────────────────────────────────────

/// The five certificate tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
  /// Work-stoppage certificates (`arrets_travail`).
  WorkStoppage,
  /// Work-stoppage extensions (`prolongation`).
  Extension,
  /// General health-check certificates (`cbv`).
  HealthCheck,
  /// Anti-rabies vaccination certificates (`antirabique`).
  AntiRabies,
  /// Death certificates (`dece`).
  Death,
}

impl Table {
  pub const ALL: [Table; 5] = [
    Table::WorkStoppage,
    Table::Extension,
    Table::HealthCheck,
    Table::AntiRabies,
    Table::Death,
  ];

  /// The SQL table name, which is also the name clients send on the wire.
  pub fn wire_name(self) -> &'static str {
    match self {
      Table::WorkStoppage => "arrets_travail",
      Table::Extension    => "prolongation",
      Table::HealthCheck  => "cbv",
      Table::AntiRabies   => "antirabique",
      Table::Death        => "dece",
    }
  }

  /// Parse a client-supplied table name.
  pub fn parse(name: &str) -> Result<Table> {
    Table::ALL
      .into_iter()
      .find(|t| t.wire_name() == name)
      .ok_or_else(|| Error::UnknownTable(name.to_owned()))
  }

  /// The schema descriptor for this table.
  pub fn schema(self) -> &'static TableSchema {
    match self {
      Table::WorkStoppage => &WORK_STOPPAGE,
      Table::Extension    => &EXTENSION,
      Table::HealthCheck  => &HEALTH_CHECK,
      Table::AntiRabies   => &ANTI_RABIES,
      Table::Death        => &DEATH,
    }
  }
}

impl fmt::Display for Table {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.wire_name())
  }
}

// ─── Fields ──────────────────────────────────────────────────────────────────

/// Storage type of a field, as far as the registry cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  Text,
  Integer,
  /// `YYYY-MM-DD` text; the store requires the format on range-query inputs
  /// but does not enforce it on write.
  Date,
}

/// One column of a certificate table.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
  pub name:     &'static str,
  pub kind:     FieldKind,
  /// Required fields must be present and non-blank on create.
  pub required: bool,
  /// Whether the field participates in the duplicate-detection predicate.
  pub dedup:    bool,
}

const fn req(name: &'static str, kind: FieldKind) -> FieldDef {
  FieldDef { name, kind, required: true, dedup: true }
}

const fn opt(name: &'static str, kind: FieldKind) -> FieldDef {
  FieldDef { name, kind, required: false, dedup: true }
}

const fn opt_no_dedup(name: &'static str, kind: FieldKind) -> FieldDef {
  FieldDef { name, kind, required: false, dedup: false }
}

// ─── Table schemas ───────────────────────────────────────────────────────────

/// Descriptor of one certificate table.
///
/// `id` and `created_at` are implicit: every table has an autoincrement id
/// and a server-stamped creation timestamp, both managed by the store and
/// never client-writable.
#[derive(Debug)]
pub struct TableSchema {
  pub table:      Table,
  pub fields:     &'static [FieldDef],
  /// Column filtered and sorted on by range queries.
  pub date_field: &'static str,
  /// Whether creates run the full-field duplicate check first.
  pub dedup_checked: bool,
}

impl TableSchema {
  /// Fields participating in the duplicate-detection predicate.
  pub fn dedup_fields(&self) -> impl Iterator<Item = &FieldDef> {
    self.fields.iter().filter(|f| f.dedup)
  }

  /// Validate a create payload: every required field present and non-blank,
  /// required integers integral and at least 1.
  pub fn validate_create(&self, record: &Record) -> Result<()> {
    for field in self.fields.iter().filter(|f| f.required) {
      let value = record.get(field.name);
      if value.is_none_or(Record::is_blank) {
        return Err(Error::MissingField(field.name));
      }
      if field.kind == FieldKind::Integer {
        // The lone required integer is the day count, which must be >= 1.
        match value.and_then(|v| v.as_i64()) {
          Some(n) if n >= 1 => {}
          _ => return Err(Error::InvalidField(field.name)),
        }
      }
    }
    Ok(())
  }
}

/// `arrets_travail` and `prolongation` share one column layout.
const STOPPAGE_FIELDS: &[FieldDef] = &[
  req("nom", FieldKind::Text),
  req("prenom", FieldKind::Text),
  req("medecin", FieldKind::Text),
  req("nombre_jours", FieldKind::Integer),
  req("date_certificat", FieldKind::Date),
  opt("date_naissance", FieldKind::Text),
  opt("age", FieldKind::Integer),
];

pub static WORK_STOPPAGE: TableSchema = TableSchema {
  table:         Table::WorkStoppage,
  fields:        STOPPAGE_FIELDS,
  date_field:    "date_certificat",
  dedup_checked: true,
};

pub static EXTENSION: TableSchema = TableSchema {
  table:         Table::Extension,
  fields:        STOPPAGE_FIELDS,
  date_field:    "date_certificat",
  dedup_checked: true,
};

pub static HEALTH_CHECK: TableSchema = TableSchema {
  table:         Table::HealthCheck,
  fields:        &[
    req("nom", FieldKind::Text),
    req("prenom", FieldKind::Text),
    req("medecin", FieldKind::Text),
    req("date_certificat", FieldKind::Date),
    opt("heure", FieldKind::Text),
    opt("date_naissance", FieldKind::Text),
    opt("titre", FieldKind::Text),
    opt("examen", FieldKind::Text),
  ],
  date_field:    "date_certificat",
  dedup_checked: true,
};

pub static ANTI_RABIES: TableSchema = TableSchema {
  table:         Table::AntiRabies,
  fields:        &[
    req("nom", FieldKind::Text),
    req("prenom", FieldKind::Text),
    req("medecin", FieldKind::Text),
    req("classe", FieldKind::Text),
    req("type_de_vaccin", FieldKind::Text),
    req("shema", FieldKind::Text),
    req("date_de_certificat", FieldKind::Date),
    opt("date_de_naissance", FieldKind::Text),
    opt("animal", FieldKind::Text),
    // Added by migration v2; a creation-time note, not identity.
    opt_no_dedup("heure_creation", FieldKind::Text),
  ],
  date_field:    "date_de_certificat",
  dedup_checked: true,
};

/// Death certificates: the widest and loosest schema. Nothing is required
/// and creates are never duplicate-checked. Both spellings of the death
/// date/time pairs are real columns, kept synchronized at the read/write
/// boundary (see [`DEATH_ALIASES`]).
pub static DEATH: TableSchema = TableSchema {
  table:         Table::Death,
  fields:        &[
    opt("nom", FieldKind::Text),
    opt("prenom", FieldKind::Text),
    opt("dateNaissance", FieldKind::Text),
    opt("datePresume", FieldKind::Text),
    opt("wilaya_naissance", FieldKind::Text),
    opt("sexe", FieldKind::Text),
    opt("pere", FieldKind::Text),
    opt("mere", FieldKind::Text),
    opt("communeNaissance", FieldKind::Text),
    opt("wilayaResidence", FieldKind::Text),
    opt("place", FieldKind::Text),
    opt("placefr", FieldKind::Text),
    opt("DSG", FieldKind::Text),
    opt("DECEMAT", FieldKind::Text),
    opt("DGRO", FieldKind::Text),
    opt("DACC", FieldKind::Text),
    opt("DAVO", FieldKind::Text),
    opt("AGESTATION", FieldKind::Text),
    opt("IDETER", FieldKind::Text),
    opt("GM", FieldKind::Text),
    opt("MN", FieldKind::Text),
    opt("AGEGEST", FieldKind::Text),
    opt("POIDNSC", FieldKind::Text),
    opt("AGEMERE", FieldKind::Text),
    opt("DPNAT", FieldKind::Text),
    opt("EMDPNAT", FieldKind::Text),
    opt("communeResidence", FieldKind::Text),
    opt("dateDeces", FieldKind::Text),
    opt("heureDeces", FieldKind::Text),
    opt("lieuDeces", FieldKind::Text),
    opt("autresLieuDeces", FieldKind::Text),
    opt("communeDeces", FieldKind::Text),
    opt("wilayaDeces", FieldKind::Text),
    opt("causeDeces", FieldKind::Text),
    opt("causeDirecte", FieldKind::Text),
    opt("etatMorbide", FieldKind::Text),
    opt("natureMort", FieldKind::Text),
    opt("natureMortAutre", FieldKind::Text),
    opt("obstacleMedicoLegal", FieldKind::Text),
    opt("contamination", FieldKind::Text),
    opt("prothese", FieldKind::Text),
    opt("POSTOPP2", FieldKind::Text),
    opt("CIM1", FieldKind::Text),
    opt("CIM2", FieldKind::Text),
    opt("CIM3", FieldKind::Text),
    opt("CIM4", FieldKind::Text),
    opt("CIM5", FieldKind::Text),
    opt("nom_ar", FieldKind::Text),
    opt("prenom_ar", FieldKind::Text),
    opt("perear", FieldKind::Text),
    opt("merear", FieldKind::Text),
    opt("lieu_naissance", FieldKind::Text),
    opt("conjoint", FieldKind::Text),
    opt("profession", FieldKind::Text),
    opt("adresse", FieldKind::Text),
    opt("date_entree", FieldKind::Text),
    opt("heure_entree", FieldKind::Text),
    opt("date_deces", FieldKind::Date),
    opt("heure_deces", FieldKind::Text),
    opt("wilaya_deces", FieldKind::Text),
    opt("medecin", FieldKind::Text),
    opt("code_p", FieldKind::Text),
    opt("code_c", FieldKind::Text),
    opt("code_n", FieldKind::Text),
  ],
  date_field:    "date_deces",
  dedup_checked: false,
};

/// Death-certificate alias pairs, `(display_name, stored_name)`.
///
/// The legacy frontend writes the camel-case spelling and reads both; on
/// write the camel value is copied into the snake column, on read the snake
/// value is copied back out under the camel name.
pub const DEATH_ALIASES: &[(&str, &str)] =
  &[("dateDeces", "date_deces"), ("heureDeces", "heure_deces")];

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn parse_known_table_names() {
    assert_eq!(Table::parse("arrets_travail").unwrap(), Table::WorkStoppage);
    assert_eq!(Table::parse("prolongation").unwrap(), Table::Extension);
    assert_eq!(Table::parse("cbv").unwrap(), Table::HealthCheck);
    assert_eq!(Table::parse("antirabique").unwrap(), Table::AntiRabies);
    assert_eq!(Table::parse("dece").unwrap(), Table::Death);
  }

  #[test]
  fn parse_unknown_table_name_errors() {
    let err = Table::parse("patients").unwrap_err();
    assert!(matches!(err, Error::UnknownTable(ref n) if n == "patients"));
  }

  #[test]
  fn validate_create_rejects_missing_required_field() {
    let record = Record::from_value(json!({
      "nom": "Benali",
      "prenom": "Amine",
      "medecin": "Dr. X",
      "classe": "",
      "type_de_vaccin": "VERO",
      "shema": "Zagreb",
      "date_de_certificat": "2024-03-01",
    }))
    .unwrap();

    let err = ANTI_RABIES.validate_create(&record).unwrap_err();
    assert!(matches!(err, Error::MissingField("classe")));
  }

  #[test]
  fn validate_create_rejects_non_integral_day_count() {
    let record = Record::from_value(json!({
      "nom": "Benali",
      "prenom": "Amine",
      "medecin": "Dr. X",
      "nombre_jours": "cinq",
      "date_certificat": "2024-03-01",
    }))
    .unwrap();

    let err = WORK_STOPPAGE.validate_create(&record).unwrap_err();
    assert!(matches!(err, Error::InvalidField("nombre_jours")));
  }

  #[test]
  fn validate_create_accepts_minimal_work_stoppage() {
    let record = Record::from_value(json!({
      "nom": "Benali",
      "prenom": "Amine",
      "medecin": "Dr. X",
      "nombre_jours": 5,
      "date_certificat": "2024-03-01",
    }))
    .unwrap();

    WORK_STOPPAGE.validate_create(&record).unwrap();
  }
}
