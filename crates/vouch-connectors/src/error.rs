//! Error types for `vouch-connectors`.

use std::time::Duration;

use thiserror::Error;
use vouch_core::collab::CollabError;

/// A failure constructing a collaborator client.
#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to build HTTP client: {0}")]
  Client(#[from] reqwest::Error),

  #[error("invalid base URL: {0:?}")]
  InvalidUrl(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Classify a transport-level failure.
pub(crate) fn classify(e: reqwest::Error, timeout: Duration) -> CollabError {
  if e.is_timeout() {
    CollabError::Timeout(timeout)
  } else if e.is_decode() {
    CollabError::Protocol(e.to_string())
  } else {
    CollabError::Unavailable(e.to_string())
  }
}

/// Build the error for a non-success HTTP status. Rate limiting and server
/// errors are transient; anything else means the request itself was wrong.
pub(crate) fn status_error(
  service: &str,
  status: reqwest::StatusCode,
  body: String,
) -> CollabError {
  let message = format!("{service} returned {status}: {body}");
  if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
    CollabError::Unavailable(message)
  } else {
    CollabError::Protocol(message)
  }
}

pub(crate) fn check_base_url(url: &str) -> Result<String> {
  let url = url.trim();
  if url.starts_with("http://") || url.starts_with("https://") {
    Ok(url.trim_end_matches('/').to_string())
  } else {
    Err(Error::InvalidUrl(url.to_string()))
  }
}
