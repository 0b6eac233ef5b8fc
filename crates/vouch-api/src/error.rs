//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error body has the same shape:
//!
//! ```json
//! {"error": "candidate not found: …", "kind": "not_found", "retryable": false}
//! ```

use axum::{
  Json,
  extract::rejection::{BytesRejection, JsonRejection, PathRejection, QueryRejection},
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use vouch_core::ErrorKind;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Service(#[from] vouch_core::Error),

  /// The request could not be parsed (bad JSON, path, query or body).
  #[error("{message}")]
  Rejected { status: StatusCode, message: String },

  #[error("reviewer credentials required")]
  Unauthorized,
}

impl ApiError {
  fn rejected(status: StatusCode, message: String) -> Self {
    // Keep axum's 413/415; every other parse failure is a plain 400.
    let status = match status {
      StatusCode::PAYLOAD_TOO_LARGE | StatusCode::UNSUPPORTED_MEDIA_TYPE => status,
      _ => StatusCode::BAD_REQUEST,
    };
    Self::Rejected { status, message }
  }

  /// Wire name of the error kind.
  pub fn kind(&self) -> String {
    match self {
      Self::Service(e) => e.kind().to_string(),
      Self::Rejected { .. } => ErrorKind::InvalidInput.to_string(),
      Self::Unauthorized => "unauthorized".to_string(),
    }
  }

  pub fn is_retryable(&self) -> bool {
    match self {
      Self::Service(e) => e.is_retryable(),
      Self::Rejected { .. } | Self::Unauthorized => false,
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Self::Service(e) => match e.kind() {
        ErrorKind::InvalidInput => match e {
          vouch_core::Error::UnsupportedMediaType(_) => {
            StatusCode::UNSUPPORTED_MEDIA_TYPE
          }
          _ => StatusCode::BAD_REQUEST,
        },
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::AlreadyReviewed => StatusCode::CONFLICT,
        ErrorKind::ExtractionFailure if e.is_timeout() => {
          StatusCode::GATEWAY_TIMEOUT
        }
        ErrorKind::ExtractionFailure => StatusCode::BAD_GATEWAY,
        ErrorKind::SubmissionFailure if e.is_timeout() => {
          StatusCode::GATEWAY_TIMEOUT
        }
        ErrorKind::SubmissionFailure | ErrorKind::StoreFailure => {
          StatusCode::SERVICE_UNAVAILABLE
        }
      },
      Self::Rejected { status, .. } => *status,
      Self::Unauthorized => StatusCode::UNAUTHORIZED,
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(r: JsonRejection) -> Self { Self::rejected(r.status(), r.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(r: QueryRejection) -> Self { Self::rejected(r.status(), r.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(r: PathRejection) -> Self { Self::rejected(r.status(), r.body_text()) }
}

impl From<BytesRejection> for ApiError {
  fn from(r: BytesRejection) -> Self { Self::rejected(r.status(), r.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, %status, "request failed");
    }

    let body = json!({
      "error": self.to_string(),
      "kind": self.kind(),
      "retryable": self.is_retryable(),
    });
    let mut res = (status, Json(body)).into_response();

    if matches!(self, Self::Unauthorized) {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"vouch\""),
      );
    }
    res
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use uuid::Uuid;
  use vouch_core::collab::CollabError;

  use super::*;

  fn status_of(e: vouch_core::Error) -> StatusCode { ApiError::from(e).status() }

  #[test]
  fn service_errors_map_to_statuses() {
    use vouch_core::Error as E;

    assert_eq!(status_of(E::CandidateNotFound(Uuid::nil())), StatusCode::NOT_FOUND);
    assert_eq!(status_of(E::AlreadyReviewed(Uuid::nil())), StatusCode::CONFLICT);
    assert_eq!(status_of(E::InvalidInput("x".into())), StatusCode::BAD_REQUEST);
    assert_eq!(
      status_of(E::UnsupportedMediaType("text/plain".into())),
      StatusCode::UNSUPPORTED_MEDIA_TYPE
    );
    assert_eq!(
      status_of(E::Extraction(CollabError::Unreadable("blurry".into()))),
      StatusCode::BAD_GATEWAY
    );
    assert_eq!(
      status_of(E::Extraction(CollabError::Timeout(Duration::from_secs(1)))),
      StatusCode::GATEWAY_TIMEOUT
    );
    assert_eq!(
      status_of(E::Registry(CollabError::Unavailable("down".into()))),
      StatusCode::SERVICE_UNAVAILABLE
    );
    assert_eq!(
      status_of(E::Registry(CollabError::Timeout(Duration::from_secs(1)))),
      StatusCode::GATEWAY_TIMEOUT
    );
    assert_eq!(
      status_of(E::Store("disk full".into())),
      StatusCode::SERVICE_UNAVAILABLE
    );
  }

  #[test]
  fn kinds_and_retryability() {
    let e = ApiError::from(vouch_core::Error::Submission("locked".into()));
    assert_eq!(e.kind(), "submission_failure");
    assert!(e.is_retryable());

    let e = ApiError::from(vouch_core::Error::AlreadyReviewed(Uuid::nil()));
    assert_eq!(e.kind(), "already_reviewed");
    assert!(!e.is_retryable());

    assert_eq!(ApiError::Unauthorized.kind(), "unauthorized");
  }

  #[test]
  fn unauthorized_sets_challenge_header() {
    let res = ApiError::Unauthorized.into_response();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key(header::WWW_AUTHENTICATE));
  }

  #[test]
  fn unprocessable_rejections_become_bad_request() {
    let e = ApiError::rejected(StatusCode::UNPROCESSABLE_ENTITY, "missing field".into());
    assert_eq!(e.status(), StatusCode::BAD_REQUEST);
    let e = ApiError::rejected(StatusCode::PAYLOAD_TOO_LARGE, "too big".into());
    assert_eq!(e.status(), StatusCode::PAYLOAD_TOO_LARGE);
  }
}
