//! Wiring for the Casebook server binary: configuration, event catalog, and
//! the top-level router.

use std::{
  collections::BTreeMap,
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use casebook_core::{
  store::CaseStore,
  taxonomy::{EventCatalog, EventTaxonomy},
};
use casebook_sync::CaseSyncEngine;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `CASEBOOK_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub store_path:        PathBuf,
  /// Load the subscription index from the store before serving.
  pub resync_on_startup: bool,
  /// Extra event names per category, merged into the built-in catalog.
  pub extra_events:      BTreeMap<String, Vec<String>>,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:              "127.0.0.1".to_string(),
      port:              5280,
      store_path:        PathBuf::from("casebook.db"),
      resync_on_startup: true,
      extra_events:      BTreeMap::new(),
    }
  }
}

impl ServerConfig {
  /// Layer `path` (optional) under `CASEBOOK_*` environment variables.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("CASEBOOK")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// The built-in catalog extended with `extra_events`.
  pub fn catalog(&self) -> EventCatalog {
    self
      .extra_events
      .iter()
      .fold(EventCatalog::builtin(), |catalog, (category, events)| {
        catalog.with_category(category.as_str(), events.iter().map(String::as_str))
      })
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API nested under `/api`, with request tracing.
pub fn app<S, T>(engine: Arc<CaseSyncEngine<S, T>>) -> Router
where
  S: CaseStore + 'static,
  T: EventTaxonomy + 'static,
  casebook_core::Error: From<S::Error>,
{
  Router::new()
    .nest("/api", casebook_api::api_router(engine))
    .layer(TraceLayer::new_for_http())
}
