//! Error type for `medcert-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Domain failure: unknown table, duplicate record, missing id, and so
  /// on. Maps to a 400-class response at the HTTP layer.
  #[error(transparent)]
  Core(#[from] medcert_core::Error),

  /// Underlying storage failure, surfaced with its raw message. Maps to a
  /// 500-class response at the HTTP layer.
  #[error("Erreur de base de données: {0}")]
  Database(#[from] tokio_rusqlite::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
