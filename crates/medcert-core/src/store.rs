//! The `CertificateStore` trait and supporting result types.
//!
//! The trait is implemented by storage backends (e.g.
//! `medcert-store-sqlite`). The HTTP layer depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{record::Record, schema::Table};

// ─── Result types ────────────────────────────────────────────────────────────

/// Rows matched by a date-range query, plus the independent total count.
///
/// Range queries are unbounded, so `returned` always equals `total`; both
/// are reported because the wire format carries both.
#[derive(Debug, Clone)]
pub struct RangeResult {
  pub rows:  Vec<Record>,
  pub total: u64,
}

impl RangeResult {
  pub fn returned(&self) -> u64 {
    self.rows.len() as u64
  }
}

/// One page of death certificates, ordered by creation time descending.
#[derive(Debug, Clone)]
pub struct DeathPage {
  pub rows:   Vec<Record>,
  pub total:  u64,
  pub offset: u32,
  pub limit:  u32,
}

impl DeathPage {
  pub fn returned(&self) -> u64 {
    self.rows.len() as u64
  }

  pub fn has_more(&self) -> bool {
    u64::from(self.offset) + self.returned() < self.total
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a certificate registry backend.
///
/// Every method is a single request-scoped interaction: no operation spans
/// multiple calls and nothing is cached between them. All methods return
/// `Send` futures so the trait can be used from multi-threaded async
/// runtimes (tokio with `axum`).
pub trait CertificateStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert one certificate and return its assigned id.
  ///
  /// For the dedup-checked tables this validates required fields and runs
  /// the full-field duplicate predicate first; an existing identical row
  /// fails the create and nothing is inserted. Death certificates skip both
  /// and instead reject an empty recognized-field subset. The
  /// check-then-insert pair is best-effort, not atomic against concurrent
  /// identical creates.
  fn create(
    &self,
    table: Table,
    record: Record,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// All rows whose date column falls in the closed interval
  /// `[start, end]`, newest first, then by `nom`/`prenom` ascending.
  ///
  /// Both bounds must be `YYYY-MM-DD`. An inverted interval is empty, not
  /// an error.
  fn range_query<'a>(
    &'a self,
    table: Table,
    start: &'a str,
    end: &'a str,
  ) -> impl Future<Output = Result<RangeResult, Self::Error>> + Send + 'a;

  /// Rewrite every data column of the row named by `record["id"]`.
  ///
  /// Fields absent from the payload are stored as NULL; id and creation
  /// timestamp are immutable. [`Table::Death`] updates are partial instead
  /// and are routed through [`update_death`](Self::update_death).
  fn update(
    &self,
    table: Table,
    record: Record,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Partial update of one death certificate: only supplied recognized
  /// fields are rewritten, unrecognized fields are silently dropped.
  fn update_death(
    &self,
    record: Record,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Hard-delete the row with the given id.
  fn delete(
    &self,
    table: Table,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// One page of death certificates, newest creation first.
  fn list_death(
    &self,
    offset: u32,
    limit: u32,
  ) -> impl Future<Output = Result<DeathPage, Self::Error>> + Send + '_;
}
