//! [`SqliteStore`] — the SQLite implementation of [`CertificateStore`].

use std::path::Path;

use rusqlite::{params_from_iter, types::Value as SqlValue};

use medcert_core::{
  Record, Table,
  error::Error as CoreError,
  record::ensure_iso_date,
  schema::{DEATH_ALIASES, TableSchema},
  store::{CertificateStore, DeathPage, RangeResult},
};

use crate::{
  Error, Result,
  rows::{bind_value, row_to_record},
  schema::{SCHEMA, run_migrations},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A certificate registry backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path`, run schema initialisation and
  /// pending migrations. Any failure here is fatal to startup.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        run_migrations(conn)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run the full-field duplicate predicate for a dedup-checked table.
  ///
  /// Absent values and empty strings compare equal, so every column is
  /// matched through `COALESCE(col, '')`. Not atomic with the insert that
  /// follows; two concurrent identical creates can both pass.
  async fn duplicate_exists(
    &self,
    schema: &'static TableSchema,
    record: &Record,
  ) -> Result<bool> {
    let conditions = schema
      .dedup_fields()
      .map(|f| format!("COALESCE({}, '') = COALESCE(?, '')", f.name))
      .collect::<Vec<_>>()
      .join(" AND ");
    let sql = format!(
      "SELECT COUNT(*) FROM {} WHERE {conditions}",
      schema.table.wire_name()
    );
    let params: Vec<SqlValue> = schema
      .dedup_fields()
      .map(|f| bind_value(record.get(f.name)))
      .collect();

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(&sql, params_from_iter(params), |row| row.get(0))?)
      })
      .await?;
    Ok(count > 0)
  }

  /// Insert one row covering the named columns; returns the new row id.
  async fn insert_row(
    &self,
    table: Table,
    columns: Vec<&'static str>,
    params: Vec<SqlValue>,
  ) -> Result<i64> {
    let placeholders = vec!["?"; columns.len()].join(", ");
    let sql = format!(
      "INSERT INTO {} ({}) VALUES ({placeholders})",
      table.wire_name(),
      columns.join(", ")
    );

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(&sql, params_from_iter(params))?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(table = %table, id, "row inserted");
    Ok(id)
  }
}

// ─── Column lists ────────────────────────────────────────────────────────────

/// Explicit select list for a table: id, every data column, and the
/// creation timestamp formatted as `YYYY-MM-DD HH:MM:SS`.
fn select_columns(schema: &TableSchema) -> (String, Vec<String>) {
  let mut sql_parts = vec!["id".to_owned()];
  let mut names = vec!["id".to_owned()];
  for field in schema.fields {
    sql_parts.push(field.name.to_owned());
    names.push(field.name.to_owned());
  }
  sql_parts
    .push("strftime('%Y-%m-%d %H:%M:%S', created_at) AS created_at".to_owned());
  names.push("created_at".to_owned());
  (sql_parts.join(", "), names)
}

// ─── Death-certificate aliases ───────────────────────────────────────────────

/// Before a write: copy each camel-case alias the client supplied into its
/// snake-case stored column.
fn sync_aliases_for_write(record: &mut Record) {
  for &(display, stored) in DEATH_ALIASES {
    if let Some(value) = record.get(display).cloned() {
      record.insert(stored, value);
    }
  }
}

/// After a read: populate each camel-case alias from its snake-case stored
/// column so both names resolve to the same value.
fn populate_aliases_for_read(record: &mut Record) {
  for &(display, stored) in DEATH_ALIASES {
    if let Some(value) = record.get(stored).cloned() {
      record.insert(display, value);
    }
  }
}

// ─── CertificateStore impl ───────────────────────────────────────────────────

impl CertificateStore for SqliteStore {
  type Error = Error;

  async fn create(&self, table: Table, mut record: Record) -> Result<i64> {
    let schema = table.schema();

    if schema.dedup_checked {
      schema.validate_create(&record)?;
      if self.duplicate_exists(schema, &record).await? {
        return Err(CoreError::DuplicateRecord(table).into());
      }
      // Insert every schema column; absent optionals become NULL.
      let columns: Vec<&'static str> =
        schema.fields.iter().map(|f| f.name).collect();
      let params: Vec<SqlValue> = schema
        .fields
        .iter()
        .map(|f| bind_value(record.get(f.name)))
        .collect();
      return self.insert_row(table, columns, params).await;
    }

    // Death certificates: no dedup, arbitrary recognized subset,
    // unrecognized fields silently dropped.
    sync_aliases_for_write(&mut record);
    let present: Vec<&'static str> = schema
      .fields
      .iter()
      .map(|f| f.name)
      .filter(|&name| record.contains(name))
      .collect();
    if present.is_empty() {
      return Err(CoreError::EmptyPayload.into());
    }
    let params: Vec<SqlValue> =
      present.iter().map(|&name| bind_value(record.get(name))).collect();
    self.insert_row(table, present, params).await
  }

  async fn range_query(
    &self,
    table: Table,
    start: &str,
    end: &str,
  ) -> Result<RangeResult> {
    ensure_iso_date(start)?;
    ensure_iso_date(end)?;

    let schema = table.schema();
    let date_col = schema.date_field;
    let (columns_sql, column_names) = select_columns(schema);

    let count_sql = format!(
      "SELECT COUNT(*) FROM {} WHERE {date_col} BETWEEN ? AND ?",
      table.wire_name()
    );
    let select_sql = format!(
      "SELECT {columns_sql} FROM {} WHERE {date_col} BETWEEN ? AND ? \
       ORDER BY {date_col} DESC, nom ASC, prenom ASC",
      table.wire_name()
    );

    let (start, end) = (start.to_owned(), end.to_owned());
    let (total, mut rows): (i64, Vec<Record>) = self
      .conn
      .call(move |conn| {
        let total: i64 = conn.query_row(
          &count_sql,
          rusqlite::params![start, end],
          |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&select_sql)?;
        let rows = stmt
          .query_map(rusqlite::params![start, end], |row| {
            row_to_record(row, &column_names)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((total, rows))
      })
      .await?;

    if table == Table::Death {
      rows.iter_mut().for_each(populate_aliases_for_read);
    }

    Ok(RangeResult { rows, total: total as u64 })
  }

  async fn update(&self, table: Table, record: Record) -> Result<()> {
    if table == Table::Death {
      return self.update_death(record).await;
    }

    let schema = table.schema();
    let id = record.id().ok_or(CoreError::MissingId)?;

    // Full rewrite: every data column takes the caller-supplied value,
    // absent fields become NULL. Id and created_at are never touched.
    let assignments = schema
      .fields
      .iter()
      .map(|f| format!("{} = ?", f.name))
      .collect::<Vec<_>>()
      .join(", ");
    let sql = format!(
      "UPDATE {} SET {assignments} WHERE id = ?",
      table.wire_name()
    );
    let mut params: Vec<SqlValue> = schema
      .fields
      .iter()
      .map(|f| bind_value(record.get(f.name)))
      .collect();
    params.push(SqlValue::Integer(id));

    let affected = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, params_from_iter(params))?))
      .await?;

    if affected == 0 {
      return Err(CoreError::RecordNotFound(table, id).into());
    }
    tracing::debug!(table = %table, id, "row updated");
    Ok(())
  }

  async fn update_death(&self, mut record: Record) -> Result<()> {
    let table = Table::Death;
    let id = record.id().ok_or(CoreError::MissingId)?;

    sync_aliases_for_write(&mut record);
    let present: Vec<&'static str> = table
      .schema()
      .fields
      .iter()
      .map(|f| f.name)
      .filter(|&name| record.contains(name))
      .collect();
    if present.is_empty() {
      return Err(CoreError::EmptyPayload.into());
    }

    let assignments = present
      .iter()
      .map(|name| format!("{name} = ?"))
      .collect::<Vec<_>>()
      .join(", ");
    let sql =
      format!("UPDATE {} SET {assignments} WHERE id = ?", table.wire_name());
    let mut params: Vec<SqlValue> =
      present.iter().map(|&name| bind_value(record.get(name))).collect();
    params.push(SqlValue::Integer(id));

    let affected = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, params_from_iter(params))?))
      .await?;

    if affected == 0 {
      return Err(CoreError::RecordNotFound(table, id).into());
    }
    tracing::debug!(table = %table, id, "death certificate updated");
    Ok(())
  }

  async fn delete(&self, table: Table, id: i64) -> Result<()> {
    if id == 0 {
      return Err(CoreError::MissingId.into());
    }

    let sql = format!("DELETE FROM {} WHERE id = ?", table.wire_name());
    let affected = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, rusqlite::params![id])?))
      .await?;

    if affected == 0 {
      return Err(CoreError::RecordNotFound(table, id).into());
    }
    tracing::debug!(table = %table, id, "row deleted");
    Ok(())
  }

  async fn list_death(&self, offset: u32, limit: u32) -> Result<DeathPage> {
    let schema = Table::Death.schema();
    let (columns_sql, column_names) = select_columns(schema);

    let select_sql = format!(
      "SELECT {columns_sql} FROM dece \
       ORDER BY created_at DESC LIMIT ? OFFSET ?"
    );

    let (total, mut rows): (i64, Vec<Record>) = self
      .conn
      .call(move |conn| {
        let total: i64 =
          conn.query_row("SELECT COUNT(*) FROM dece", [], |row| row.get(0))?;

        let mut stmt = conn.prepare(&select_sql)?;
        let rows = stmt
          .query_map(rusqlite::params![i64::from(limit), i64::from(offset)], |row| {
            row_to_record(row, &column_names)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((total, rows))
      })
      .await?;

    rows.iter_mut().for_each(populate_aliases_for_read);

    Ok(DeathPage { rows, total: total as u64, offset, limit })
  }
}
