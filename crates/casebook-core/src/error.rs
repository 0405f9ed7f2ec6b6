//! Error types for `casebook-core`.

use thiserror::Error;

use crate::case::CaseId;

#[derive(Debug, Error)]
pub enum Error {
  /// The requested case id does not exist.
  #[error("Case does not exist.")]
  NotFound(CaseId),

  /// A create or rename would collide with an existing case name.
  #[error("case already exists: {0:?}")]
  DuplicateName(String),

  /// Malformed case payload or transfer document.
  #[error("validation error: {0}")]
  Validation(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn validation(msg: impl Into<String>) -> Self { Self::Validation(msg.into()) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
