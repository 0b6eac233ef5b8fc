//! HTTP Basic-auth extractor for reviewer routes.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use vouch_core::{
  collab::{DocumentExtractor, RegistryLookup},
  store::CandidateStore,
};

use crate::{AppState, error::ApiError};

/// Reviewer credentials accepted by this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Present in a handler means the caller may act as a reviewer.
pub struct Reviewer;

/// Verify Basic credentials from request headers.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<(), ApiError> {
  let encoded = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Basic "))
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;
  if username != config.username {
    return Err(ApiError::Unauthorized);
  }

  let parsed_hash = PasswordHash::new(&config.password_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthorized)
}

impl<S, R, X> FromRequestParts<AppState<S, R, X>> for Reviewer
where
  S: CandidateStore,
  R: RegistryLookup,
  X: DocumentExtractor,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, R, X>,
  ) -> Result<Self, Self::Rejection> {
    if let Some(auth) = &state.auth {
      verify_auth(&parts.headers, auth).inspect_err(|_| {
        tracing::debug!(path = %parts.uri.path(), "reviewer authentication failed");
      })?;
    }
    Ok(Reviewer)
  }
}
