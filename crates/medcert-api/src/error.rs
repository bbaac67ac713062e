//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
///
/// Domain failures are the caller's fault and map to 400; storage failures
/// map to 500. Either way the body is `{"success": false, "error": ...}`
/// and the process keeps serving.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Domain(#[from] medcert_core::Error),

  #[error("Erreur serveur: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<medcert_store_sqlite::Error> for ApiError {
  fn from(err: medcert_store_sqlite::Error) -> Self {
    match err {
      medcert_store_sqlite::Error::Core(core) => ApiError::Domain(core),
      medcert_store_sqlite::Error::Database(db) => {
        ApiError::Storage(Box::new(db))
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::Domain(_) => StatusCode::BAD_REQUEST,
      ApiError::Storage(_) => {
        tracing::error!(error = %self, "storage failure");
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    let body = json!({ "success": false, "error": self.to_string() });
    (status, Json(body)).into_response()
  }
}
