//! Error types for `vouch-core`.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::collab::CollabError;

#[derive(Debug, Error)]
pub enum Error {
  #[error("candidate not found: {0}")]
  CandidateNotFound(Uuid),

  #[error("candidate {0} has already been reviewed")]
  AlreadyReviewed(Uuid),

  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("unsupported media type: {0:?}")]
  UnsupportedMediaType(String),

  #[error("document extraction failed: {0}")]
  Extraction(#[source] CollabError),

  #[error("registry lookup failed: {0}")]
  Registry(#[source] CollabError),

  /// The store rejected a new submission.
  #[error("submission could not be stored: {0}")]
  Submission(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Coarse classification of an [`Error`], letting callers decide whether a
/// retry is worthwhile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
  InvalidInput,
  NotFound,
  AlreadyReviewed,
  ExtractionFailure,
  SubmissionFailure,
  StoreFailure,
}

impl ErrorKind {
  pub fn is_retryable(self) -> bool {
    matches!(
      self,
      Self::ExtractionFailure | Self::SubmissionFailure | Self::StoreFailure
    )
  }
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::CandidateNotFound(_) => ErrorKind::NotFound,
      Self::AlreadyReviewed(_) => ErrorKind::AlreadyReviewed,
      Self::InvalidInput(_) | Self::UnsupportedMediaType(_) => {
        ErrorKind::InvalidInput
      }
      Self::Extraction(_) => ErrorKind::ExtractionFailure,
      Self::Registry(_) | Self::Submission(_) => ErrorKind::SubmissionFailure,
      Self::Store(_) => ErrorKind::StoreFailure,
    }
  }

  pub fn is_retryable(&self) -> bool { self.kind().is_retryable() }

  /// `true` when the underlying collaborator call timed out.
  pub fn is_timeout(&self) -> bool {
    match self {
      Self::Extraction(e) | Self::Registry(e) => e.is_timeout(),
      _ => false,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
