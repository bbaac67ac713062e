//! JSON HTTP API for the medcert certificate registry.
//!
//! Exposes an axum [`Router`] backed by any
//! [`medcert_core::store::CertificateStore`]. Endpoint paths, request
//! shapes, and response envelopes match the legacy service so the deployed
//! frontend keeps working against this implementation.
//!
//! Responses use one envelope everywhere: success →
//! `{"success": true, ...}`, validation failure → 400
//! `{"success": false, "error": ...}`, storage failure → 500.

pub mod certificates;
pub mod death;
pub mod error;
pub mod records;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Json, Router,
  http::{Method, StatusCode, header},
  routing::{get, post},
};
use medcert_core::store::CertificateStore;
use serde::Deserialize;
use serde_json::json;
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `MEDCERT_`-prefixed environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:          String,
  #[serde(default = "default_port")]
  pub port:          u16,
  /// Location of the SQLite data file; created on first run.
  #[serde(default = "default_database_path")]
  pub database_path: PathBuf,
}

fn default_host() -> String {
  "127.0.0.1".to_owned()
}

fn default_port() -> u16 {
  5000
}

fn default_database_path() -> PathBuf {
  PathBuf::from("database/data.db")
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full API router for `store`.
///
/// The returned `Router<()>` carries the CORS and request-tracing layers and
/// can be served directly.
pub fn router<S>(store: Arc<S>) -> Router<()>
where
  S: CertificateStore + 'static,
  S::Error: Into<ApiError>,
{
  // The legacy frontend is served from file:// and plain http origins.
  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
    .allow_headers([header::CONTENT_TYPE]);

  Router::new()
    .route("/api/test", get(liveness))
    // Creates
    .route("/api/ajouter_arret_travail", post(certificates::create_work_stoppage::<S>))
    .route("/api/ajouter_prolongation", post(certificates::create_extension::<S>))
    .route("/api/ajouter_cbv", post(certificates::create_health_check::<S>))
    .route("/api/ajouter_antirabique", post(certificates::create_anti_rabies::<S>))
    .route("/api/ajouter_dece", post(death::create::<S>))
    // Generic record operations
    .route("/api/recuperer_donnees", post(records::range_query::<S>))
    .route("/api/modifier_enregistrement", post(records::update::<S>))
    .route("/api/supprimer_enregistrement", post(records::delete::<S>))
    // Death-certificate specific paths
    .route("/api/modifier_dece", post(death::update::<S>))
    .route("/api/supprimer_dece", post(death::delete::<S>))
    .route(
      "/api/lister_dece",
      get(death::list_page::<S>).post(death::list_by_period::<S>),
    )
    .fallback(not_found)
    .layer(TraceLayer::new_for_http())
    .layer(cors)
    .with_state(store)
}

/// `GET /api/test` — liveness probe.
async fn liveness() -> Json<serde_json::Value> {
  Json(json!({ "success": true, "message": "API locale fonctionnelle" }))
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
  (
    StatusCode::NOT_FOUND,
    Json(json!({ "error": "Endpoint non trouvé" })),
  )
}
