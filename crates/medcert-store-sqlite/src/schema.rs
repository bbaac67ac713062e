//! SQL schema and migrations for the medcert SQLite store.
//!
//! The base DDL is idempotent (`CREATE TABLE IF NOT EXISTS`) and executed
//! on every open; additive migrations are gated on `PRAGMA user_version`
//! and applied once, in a fixed order, at startup.

use rusqlite::Connection;

/// Base schema DDL. Table and column names match the legacy database file
/// so existing data files keep working unchanged.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS arrets_travail (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nom TEXT NOT NULL,
    prenom TEXT NOT NULL,
    medecin TEXT NOT NULL,
    nombre_jours INTEGER NOT NULL,
    date_certificat DATE NOT NULL,
    date_naissance TEXT,            -- free-form; any spelling the user typed
    age INTEGER,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

-- Extensions of a prior work stoppage; same layout, separate table.
CREATE TABLE IF NOT EXISTS prolongation (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nom TEXT NOT NULL,
    prenom TEXT NOT NULL,
    medecin TEXT NOT NULL,
    nombre_jours INTEGER NOT NULL,
    date_certificat DATE NOT NULL,
    date_naissance TEXT,
    age INTEGER,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS cbv (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nom TEXT NOT NULL,
    prenom TEXT NOT NULL,
    medecin TEXT NOT NULL,
    date_certificat DATE NOT NULL,
    heure TEXT,
    date_naissance TEXT,
    titre TEXT,
    examen TEXT,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS antirabique (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nom TEXT,
    prenom TEXT,
    medecin TEXT,
    classe TEXT,
    type_de_vaccin TEXT,
    shema TEXT,
    date_de_certificat DATE,
    date_de_naissance TEXT,
    animal TEXT,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

-- Death certificates. The camel/snake date pairs are both real columns,
-- kept synchronized at the read/write boundary.
CREATE TABLE IF NOT EXISTS dece (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nom TEXT,
    prenom TEXT,
    dateNaissance TEXT,
    datePresume TEXT,
    wilaya_naissance TEXT,
    sexe TEXT,
    pere TEXT,
    mere TEXT,
    communeNaissance TEXT,
    wilayaResidence TEXT,
    place TEXT,
    placefr TEXT,
    DSG TEXT,
    DECEMAT TEXT,
    DGRO TEXT,
    DACC TEXT,
    DAVO TEXT,
    AGESTATION TEXT,
    IDETER TEXT,
    GM TEXT,
    MN TEXT,
    AGEGEST TEXT,
    POIDNSC TEXT,
    AGEMERE TEXT,
    DPNAT TEXT,
    EMDPNAT TEXT,
    communeResidence TEXT,
    dateDeces TEXT,
    heureDeces TEXT,
    lieuDeces TEXT,
    autresLieuDeces TEXT,
    communeDeces TEXT,
    wilayaDeces TEXT,
    causeDeces TEXT,
    causeDirecte TEXT,
    etatMorbide TEXT,
    natureMort TEXT,
    natureMortAutre TEXT,
    obstacleMedicoLegal TEXT,
    contamination TEXT,
    prothese TEXT,
    POSTOPP2 TEXT,
    CIM1 TEXT,
    CIM2 TEXT,
    CIM3 TEXT,
    CIM4 TEXT,
    CIM5 TEXT,
    nom_ar TEXT,
    prenom_ar TEXT,
    perear TEXT,
    merear TEXT,
    lieu_naissance TEXT,
    conjoint TEXT,
    profession TEXT,
    adresse TEXT,
    date_entree TEXT,
    heure_entree TEXT,
    date_deces TEXT,
    heure_deces TEXT,
    wilaya_deces TEXT,
    medecin TEXT,
    code_p TEXT,
    code_c TEXT,
    code_n TEXT,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS arrets_travail_date_idx ON arrets_travail(date_certificat);
CREATE INDEX IF NOT EXISTS prolongation_date_idx   ON prolongation(date_certificat);
CREATE INDEX IF NOT EXISTS cbv_date_idx            ON cbv(date_certificat);
CREATE INDEX IF NOT EXISTS antirabique_date_idx    ON antirabique(date_de_certificat);
CREATE INDEX IF NOT EXISTS dece_date_idx           ON dece(date_deces);
";

/// Apply pending additive migrations, gated on `PRAGMA user_version`.
///
/// Version history:
/// - 1: base schema (tables above).
/// - 2: `antirabique.heure_creation TEXT` — creation-time note column.
///
/// Each step is itself idempotent, so a lost or reset version number cannot
/// corrupt anything; new columns read as NULL on pre-existing rows.
pub fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
  let version: i64 =
    conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

  if version < 2 {
    ensure_column(conn, "antirabique", "heure_creation", "TEXT")?;
    conn.pragma_update(None, "user_version", 2)?;
  }

  Ok(())
}

/// Append `column` to `table` if it is not already there. Never alters or
/// drops existing columns. Returns whether the column was added.
fn ensure_column(
  conn: &Connection,
  table: &str,
  column: &str,
  sql_type: &str,
) -> rusqlite::Result<bool> {
  let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
  let exists = stmt
    .query_map([], |row| row.get::<_, String>(1))?
    .collect::<rusqlite::Result<Vec<_>>>()?
    .iter()
    .any(|name| name == column);

  if exists {
    return Ok(false);
  }

  conn.execute_batch(&format!(
    "ALTER TABLE {table} ADD COLUMN {column} {sql_type}"
  ))?;
  Ok(true)
}
