//! Error type for `vouch-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  /// A stored column could not be decoded into its domain type.
  #[error("decode error: {0}")]
  Decode(String),

  #[error("candidate not found: {0}")]
  CandidateNotFound(uuid::Uuid),

  #[error("candidate {0} has already been reviewed")]
  AlreadyReviewed(uuid::Uuid),
}

impl From<Error> for vouch_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::CandidateNotFound(id) => Self::CandidateNotFound(id),
      Error::AlreadyReviewed(id) => Self::AlreadyReviewed(id),
      other => Self::Store(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
