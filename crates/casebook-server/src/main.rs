//! casebook-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite case store, loads the subscription index from it, and serves the
//! JSON API under `/api`.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use casebook_core::index::SubscriptionIndex;
use casebook_server::{ServerConfig, expand_tilde};
use casebook_store_sqlite::SqliteStore;
use casebook_sync::CaseSyncEngine;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Casebook case and subscription server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let server_cfg = ServerConfig::load(&cli.config)?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let engine = Arc::new(CaseSyncEngine::new(
    store,
    Arc::new(SubscriptionIndex::new()),
    Arc::new(server_cfg.catalog()),
  ));

  if server_cfg.resync_on_startup {
    engine
      .hydrate()
      .await
      .context("failed to load subscription index")?;
  } else {
    tracing::warn!("starting with an empty subscription index");
  }

  let app = casebook_server::app(engine);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
