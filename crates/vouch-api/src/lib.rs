//! JSON REST API for Vouch.
//!
//! Exposes an axum [`Router`] over a [`VerificationService`]. TLS and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", vouch_api::api_router(state))
//! ```
//!
//! Candidate routes (`/documents/extract`, `POST /candidates`) are always
//! open. Reviewer routes require HTTP Basic credentials when the state
//! carries an [`AuthConfig`].

pub mod auth;
pub mod candidates;
pub mod documents;
pub mod error;
pub mod registry;
pub mod summary;


use std::sync::Arc;

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post},
};
use vouch_core::{
  collab::{DocumentExtractor, RegistryLookup},
  service::{MAX_DOCUMENT_BYTES, VerificationService},
  store::CandidateStore,
};

pub use auth::AuthConfig;
pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S, R, X> {
  pub service: Arc<VerificationService<S, R, X>>,
  /// Reviewer credentials; `None` leaves reviewer routes open.
  pub auth:    Option<Arc<AuthConfig>>,
}

impl<S, R, X> AppState<S, R, X> {
  pub fn new(service: VerificationService<S, R, X>) -> Self {
    Self { service: Arc::new(service), auth: None }
  }

  pub fn with_auth(mut self, auth: AuthConfig) -> Self {
    self.auth = Some(Arc::new(auth));
    self
  }
}

impl<S, R, X> Clone for AppState<S, R, X> {
  fn clone(&self) -> Self {
    Self {
      service: Arc::clone(&self.service),
      auth:    self.auth.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, R, X>(state: AppState<S, R, X>) -> Router<()>
where
  S: CandidateStore + 'static,
  R: RegistryLookup + 'static,
  X: DocumentExtractor + 'static,
{
  Router::new()
    // Candidate flow
    .route(
      "/documents/extract",
      post(documents::extract::<S, R, X>)
        .layer(DefaultBodyLimit::max(MAX_DOCUMENT_BYTES)),
    )
    .route(
      "/candidates",
      get(candidates::list::<S, R, X>).post(candidates::create::<S, R, X>),
    )
    // Reviewer flow
    .route("/candidates/{id}", get(candidates::get_one::<S, R, X>))
    .route("/candidates/{id}/status", post(candidates::review::<S, R, X>))
    .route("/registry/lookup", get(registry::lookup::<S, R, X>))
    .route("/summary", get(summary::handler::<S, R, X>))
    .with_state(state)
}
