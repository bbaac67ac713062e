//! Generic record operations addressed by table name.
//!
//! | Path | Body | Operation |
//! |------|------|-----------|
//! | `POST /api/recuperer_donnees` | `{table, date_debut, date_fin}` | date-range query |
//! | `POST /api/modifier_enregistrement` | `{table, data}` | full-row update |
//! | `POST /api/supprimer_enregistrement` | `{table, id}` | hard delete |

use std::sync::Arc;

use axum::{Json, extract::State};
use medcert_core::{
  Record, Table, error::Error as CoreError, record::parse_id,
  store::CertificateStore,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ApiError;

// ─── Range query ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RangeParams {
  #[serde(default)]
  pub table:      String,
  #[serde(default)]
  pub date_debut: String,
  #[serde(default)]
  pub date_fin:   String,
}

/// `POST /api/recuperer_donnees`
pub async fn range_query<S>(
  State(store): State<Arc<S>>,
  Json(params): Json<RangeParams>,
) -> Result<Json<Value>, ApiError>
where
  S: CertificateStore,
  S::Error: Into<ApiError>,
{
  let table = Table::parse(&params.table)?;
  let result = store
    .range_query(table, &params.date_debut, &params.date_fin)
    .await
    .map_err(Into::into)?;

  Ok(Json(json!({
    "success": true,
    "data": result.rows,
    "total": result.total,
    "returned": result.returned(),
  })))
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateParams {
  #[serde(default)]
  pub table: String,
  #[serde(default)]
  pub data:  Record,
}

/// `POST /api/modifier_enregistrement`
///
/// Death certificates have their own update path with partial semantics
/// (`/api/modifier_dece`); here `dece` is not a valid target.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Json(params): Json<UpdateParams>,
) -> Result<Json<Value>, ApiError>
where
  S: CertificateStore,
  S::Error: Into<ApiError>,
{
  let table = Table::parse(&params.table)?;
  if table == Table::Death {
    return Err(CoreError::InvalidUpdateTarget(params.table).into());
  }

  store.update(table, params.data).await.map_err(Into::into)?;
  Ok(Json(json!({
    "success": true,
    "message": "Enregistrement modifié avec succès",
  })))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
  #[serde(default)]
  pub table: String,
  /// Left as raw JSON: clients send ids as numbers or numeric strings,
  /// same as on the update paths.
  #[serde(default)]
  pub id:    Value,
}

/// `POST /api/supprimer_enregistrement`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Json(params): Json<DeleteParams>,
) -> Result<Json<Value>, ApiError>
where
  S: CertificateStore,
  S::Error: Into<ApiError>,
{
  let table = Table::parse(&params.table)?;
  let id = parse_id(&params.id).ok_or(CoreError::MissingId)?;
  store.delete(table, id).await.map_err(Into::into)?;
  Ok(Json(json!({
    "success": true,
    "message": "Enregistrement supprimé avec succès",
  })))
}
