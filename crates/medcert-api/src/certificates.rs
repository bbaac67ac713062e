//! Create handlers for the four dedup-checked certificate tables.
//!
//! | Path | Table |
//! |------|-------|
//! | `POST /api/ajouter_arret_travail` | `arrets_travail` |
//! | `POST /api/ajouter_prolongation`  | `prolongation` |
//! | `POST /api/ajouter_cbv`           | `cbv` |
//! | `POST /api/ajouter_antirabique`   | `antirabique` |
//!
//! Bodies are flat JSON objects of wire field names; a create whose full
//! field tuple matches an existing row is rejected with 400.

use std::sync::Arc;

use axum::{Json, extract::State};
use medcert_core::{Record, Table, store::CertificateStore};
use serde_json::{Value, json};

use crate::error::ApiError;

/// French confirmation shown by the frontend after a successful create.
pub(crate) fn created_message(table: Table) -> &'static str {
  match table {
    Table::WorkStoppage => "Arrêt de travail ajouté avec succès",
    Table::Extension => "Prolongation d'arrêt de travail ajoutée avec succès",
    Table::HealthCheck => "CBV santé ajouté avec succès",
    Table::AntiRabies => "Certificat antirabique ajouté avec succès",
    Table::Death => "Certificat de décès ajouté avec succès",
  }
}

pub(crate) async fn create_in<S>(
  store: &S,
  table: Table,
  record: Record,
) -> Result<Json<Value>, ApiError>
where
  S: CertificateStore,
  S::Error: Into<ApiError>,
{
  let id = store.create(table, record).await.map_err(Into::into)?;
  tracing::info!(table = %table, id, "certificate created");
  Ok(Json(json!({
    "success": true,
    "message": created_message(table),
    "id": id,
  })))
}

pub async fn create_work_stoppage<S>(
  State(store): State<Arc<S>>,
  Json(record): Json<Record>,
) -> Result<Json<Value>, ApiError>
where
  S: CertificateStore,
  S::Error: Into<ApiError>,
{
  create_in(store.as_ref(), Table::WorkStoppage, record).await
}

pub async fn create_extension<S>(
  State(store): State<Arc<S>>,
  Json(record): Json<Record>,
) -> Result<Json<Value>, ApiError>
where
  S: CertificateStore,
  S::Error: Into<ApiError>,
{
  create_in(store.as_ref(), Table::Extension, record).await
}

pub async fn create_health_check<S>(
  State(store): State<Arc<S>>,
  Json(record): Json<Record>,
) -> Result<Json<Value>, ApiError>
where
  S: CertificateStore,
  S::Error: Into<ApiError>,
{
  create_in(store.as_ref(), Table::HealthCheck, record).await
}

pub async fn create_anti_rabies<S>(
  State(store): State<Arc<S>>,
  Json(record): Json<Record>,
) -> Result<Json<Value>, ApiError>
where
  S: CertificateStore,
  S::Error: Into<ApiError>,
{
  create_in(store.as_ref(), Table::AntiRabies, record).await
}
