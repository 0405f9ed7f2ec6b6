//! Error types for the casebook-transfer codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed case document: {0}")]
  Malformed(#[from] serde_json::Error),

  #[error("invalid case document: {0}")]
  Invalid(String),
}

impl From<Error> for casebook_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Invalid(msg) => casebook_core::Error::Validation(msg),
      other => casebook_core::Error::Validation(other.to_string()),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
