//! Error type for `casebook-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Missing ids and name collisions, reported in core terms.
  #[error(transparent)]
  Core(#[from] casebook_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

impl From<Error> for casebook_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(core) => core,
      other => casebook_core::Error::Store(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
