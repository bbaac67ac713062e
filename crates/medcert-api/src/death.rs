//! Death-certificate endpoints.
//!
//! | Method/Path | Operation |
//! |-------------|-----------|
//! | `POST /api/ajouter_dece` | create (no dedup, loose field set) |
//! | `POST /api/modifier_dece` | partial update |
//! | `POST /api/supprimer_dece` | delete by id |
//! | `POST /api/lister_dece` | range listing by death date |
//! | `GET /api/lister_dece?offset=&limit=` | page by creation time |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use medcert_core::{
  Record, Table, error::Error as CoreError, record::parse_id,
  store::CertificateStore,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{certificates::created_message, error::ApiError};

/// `POST /api/ajouter_dece`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(record): Json<Record>,
) -> Result<Json<Value>, ApiError>
where
  S: CertificateStore,
  S::Error: Into<ApiError>,
{
  let id = store.create(Table::Death, record).await.map_err(Into::into)?;
  tracing::info!(id, "death certificate created");
  Ok(Json(json!({
    "success": true,
    "message": created_message(Table::Death),
    "id": id,
  })))
}

/// `POST /api/modifier_dece` — partial update; only supplied recognized
/// fields are rewritten.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Json(record): Json<Record>,
) -> Result<Json<Value>, ApiError>
where
  S: CertificateStore,
  S::Error: Into<ApiError>,
{
  store.update_death(record).await.map_err(Into::into)?;
  Ok(Json(json!({
    "success": true,
    "message": "Certificat de décès modifié avec succès",
  })))
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
  /// Raw JSON: number or numeric string, as on the update paths.
  #[serde(default)]
  pub id: Value,
}

/// `POST /api/supprimer_dece`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Json(params): Json<DeleteParams>,
) -> Result<Json<Value>, ApiError>
where
  S: CertificateStore,
  S::Error: Into<ApiError>,
{
  let id = parse_id(&params.id).ok_or(CoreError::MissingId)?;
  store.delete(Table::Death, id).await.map_err(Into::into)?;
  Ok(Json(json!({
    "success": true,
    "message": "Certificat de décès supprimé avec succès",
  })))
}

// ─── Listings ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PeriodParams {
  #[serde(default, rename = "dateDebut")]
  pub date_debut: String,
  #[serde(default, rename = "dateFin")]
  pub date_fin:   String,
}

/// `POST /api/lister_dece` — all certificates whose death date falls in the
/// closed interval, newest death first.
pub async fn list_by_period<S>(
  State(store): State<Arc<S>>,
  Json(params): Json<PeriodParams>,
) -> Result<Json<Value>, ApiError>
where
  S: CertificateStore,
  S::Error: Into<ApiError>,
{
  let result = store
    .range_query(Table::Death, &params.date_debut, &params.date_fin)
    .await
    .map_err(Into::into)?;

  Ok(Json(json!({
    "success": true,
    "data": result.rows,
    "total": result.total,
    "returned": result.returned(),
  })))
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
  #[serde(default)]
  pub offset: u32,
  #[serde(default = "default_limit")]
  pub limit:  u32,
}

fn default_limit() -> u32 {
  20
}

/// `GET /api/lister_dece?offset=&limit=` — one page ordered by creation
/// time descending. The only paginated read path.
pub async fn list_page<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<PageParams>,
) -> Result<Json<Value>, ApiError>
where
  S: CertificateStore,
  S::Error: Into<ApiError>,
{
  let page = store
    .list_death(params.offset, params.limit)
    .await
    .map_err(Into::into)?;

  Ok(Json(json!({
    "success": true,
    "data": page.rows,
    "total": page.total,
    "returned": page.returned(),
    "has_more": page.has_more(),
    "offset": page.offset,
    "limit": page.limit,
  })))
}
