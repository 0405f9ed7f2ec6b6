//! Handlers for `/cases` endpoints.
//!
//! | Method   | Path            | Notes |
//! |----------|-----------------|-------|
//! | `GET`    | `/cases`        | Every case, in creation order |
//! | `POST`   | `/cases`        | Body: `{"name":"…","note":"…","subscriptions":[…]}` |
//! | `POST`   | `/cases/import` | Body: a transfer document |
//! | `GET`    | `/cases/{id}`   | `?mode=export` returns the export document |
//! | `PUT`    | `/cases`        | Body carries `id`; absent fields are reset |
//! | `PATCH`  | `/cases`        | Body carries `id`; absent fields are kept |
//! | `DELETE` | `/cases/{id}`   | 204 on success |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use casebook_core::{
  Error,
  case::{Case, CaseId, CaseUpdate, EditMode, NewCase},
  store::CaseStore,
  taxonomy::EventTaxonomy,
};
use casebook_sync::CaseSyncEngine;
use serde::Deserialize;

use crate::error::ApiError;

type Engine<S, T> = State<Arc<CaseSyncEngine<S, T>>>;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /cases`
pub async fn list<S, T>(State(engine): Engine<S, T>) -> Result<Json<Vec<Case>>, ApiError>
where
  S: CaseStore + 'static,
  T: EventTaxonomy + 'static,
  Error: From<S::Error>,
{
  Ok(Json(engine.list_cases().await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /cases`
pub async fn create<S, T>(
  State(engine): Engine<S, T>,
  body: Result<Json<NewCase>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CaseStore + 'static,
  T: EventTaxonomy + 'static,
  Error: From<S::Error>,
{
  let Json(body) = body?;
  let case = engine.create_case(body).await?;
  Ok((StatusCode::CREATED, Json(case)))
}

/// `POST /cases/import`
///
/// The raw body is handed to the transfer codec so that malformed documents
/// come back as `400` with the codec's message.
pub async fn import<S, T>(
  State(engine): Engine<S, T>,
  body: String,
) -> Result<impl IntoResponse, ApiError>
where
  S: CaseStore + 'static,
  T: EventTaxonomy + 'static,
  Error: From<S::Error>,
{
  let case = engine.import_json(&body).await?;
  Ok((StatusCode::CREATED, Json(case)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
  #[default]
  Full,
  Export,
}

#[derive(Debug, Default, Deserialize)]
pub struct GetParams {
  #[serde(default)]
  pub mode: View,
}

/// `GET /cases/{id}[?mode=export]`
pub async fn get_one<S, T>(
  State(engine): Engine<S, T>,
  Path(id): Path<i64>,
  Query(params): Query<GetParams>,
) -> Result<Response, ApiError>
where
  S: CaseStore + 'static,
  T: EventTaxonomy + 'static,
  Error: From<S::Error>,
{
  let id = CaseId(id);
  Ok(match params.mode {
    View::Full => Json(engine.get_case(id).await?).into_response(),
    View::Export => {
      let doc = engine.export_case(id).await?;
      let body = casebook_transfer::to_json(&doc).map_err(|e| ApiError::Store(Box::new(e)))?;
      ([(header::CONTENT_TYPE, "application/json")], body).into_response()
    }
  })
}

// ─── Edit ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct EditBody {
  pub id:     CaseId,
  #[serde(flatten)]
  pub update: CaseUpdate,
}

/// `PUT /cases`
pub async fn replace<S, T>(
  State(engine): Engine<S, T>,
  body: Result<Json<EditBody>, JsonRejection>,
) -> Result<Json<Case>, ApiError>
where
  S: CaseStore + 'static,
  T: EventTaxonomy + 'static,
  Error: From<S::Error>,
{
  let Json(body) = body?;
  Ok(Json(engine.edit_case(body.id, body.update, EditMode::Replace).await?))
}

/// `PATCH /cases`
pub async fn merge<S, T>(
  State(engine): Engine<S, T>,
  body: Result<Json<EditBody>, JsonRejection>,
) -> Result<Json<Case>, ApiError>
where
  S: CaseStore + 'static,
  T: EventTaxonomy + 'static,
  Error: From<S::Error>,
{
  let Json(body) = body?;
  Ok(Json(engine.edit_case(body.id, body.update, EditMode::Merge).await?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /cases/{id}`
pub async fn delete_one<S, T>(
  State(engine): Engine<S, T>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: CaseStore + 'static,
  T: EventTaxonomy + 'static,
  Error: From<S::Error>,
{
  engine.delete_case(CaseId(id)).await?;
  Ok(StatusCode::NO_CONTENT)
}
