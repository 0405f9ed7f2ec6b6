//! Handlers for the subscription index and the event vocabulary.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use casebook_core::{
  Error,
  case::EntityEvents,
  index::IndexState,
  store::CaseStore,
  taxonomy::EventTaxonomy,
};
use casebook_sync::{CaseSyncEngine, DriftReport};
use serde::Serialize;

use crate::error::ApiError;

/// One event category as listed to clients.
#[derive(Debug, Serialize)]
pub struct Category {
  #[serde(rename = "type")]
  pub category: String,
  pub events:   Vec<String>,
}

/// `GET /availablesubscriptions`
pub async fn available<S, T>(State(engine): State<Arc<CaseSyncEngine<S, T>>>) -> Json<Vec<Category>>
where
  S: CaseStore + 'static,
  T: EventTaxonomy + 'static,
  Error: From<S::Error>,
{
  let categories = engine
    .available_subscriptions()
    .into_iter()
    .map(|(category, events)| Category { category, events: events.into_iter().collect() })
    .collect();
  Json(categories)
}

/// `GET /subscriptions`
pub async fn snapshot<S, T>(State(engine): State<Arc<CaseSyncEngine<S, T>>>) -> Json<IndexState>
where
  S: CaseStore + 'static,
  T: EventTaxonomy + 'static,
  Error: From<S::Error>,
{
  Json(engine.index().snapshot())
}

/// `GET /subscriptions/{name}`; an unknown name yields `{}`.
pub async fn for_case<S, T>(
  State(engine): State<Arc<CaseSyncEngine<S, T>>>,
  Path(name): Path<String>,
) -> Json<EntityEvents>
where
  S: CaseStore + 'static,
  T: EventTaxonomy + 'static,
  Error: From<S::Error>,
{
  Json(engine.subscriptions(&name))
}

/// `POST /subscriptions/resync`
pub async fn resync<S, T>(
  State(engine): State<Arc<CaseSyncEngine<S, T>>>,
) -> Result<Json<DriftReport>, ApiError>
where
  S: CaseStore + 'static,
  T: EventTaxonomy + 'static,
  Error: From<S::Error>,
{
  Ok(Json(engine.resync().await?))
}
