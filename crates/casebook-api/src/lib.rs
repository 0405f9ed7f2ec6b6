//! JSON REST API for Casebook.
//!
//! Exposes an axum [`Router`] over a [`CaseSyncEngine`]. Every mutation goes
//! through the engine; subscription reads go straight to its index. Auth,
//! TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", casebook_api::api_router(engine.clone()))
//! ```

pub mod cases;
pub mod error;
pub mod subscriptions;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use casebook_core::{store::CaseStore, taxonomy::EventTaxonomy};
use casebook_sync::CaseSyncEngine;

pub use error::ApiError;

/// Build a fully-materialised API router for `engine`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, T>(engine: Arc<CaseSyncEngine<S, T>>) -> Router<()>
where
  S: CaseStore + 'static,
  T: EventTaxonomy + 'static,
  casebook_core::Error: From<S::Error>,
{
  Router::new()
    // Cases
    .route(
      "/cases",
      get(cases::list::<S, T>)
        .post(cases::create::<S, T>)
        .put(cases::replace::<S, T>)
        .patch(cases::merge::<S, T>),
    )
    .route("/cases/import", post(cases::import::<S, T>))
    .route("/cases/{id}", get(cases::get_one::<S, T>).delete(cases::delete_one::<S, T>))
    // Subscriptions
    .route("/availablesubscriptions", get(subscriptions::available::<S, T>))
    .route("/subscriptions", get(subscriptions::snapshot::<S, T>))
    .route("/subscriptions/resync", post(subscriptions::resync::<S, T>))
    .route("/subscriptions/{name}", get(subscriptions::for_case::<S, T>))
    .with_state(engine)
}
