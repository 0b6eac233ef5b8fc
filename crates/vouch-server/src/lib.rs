//! HTTP server assembly for Vouch.
//!
//! Turns a [`ServerConfig`] into a running axum [`Router`]: the collaborator
//! clients are chosen from configuration, the API is nested under `/api`,
//! and a `/health` probe sits at the root.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{Json, Router, routing::get};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use vouch_api::{AppState, AuthConfig};
use vouch_connectors::{AnyExtractor, AnyRegistry, ExtractorConfig, RegistryConfig};
use vouch_core::{
  collab::{DocumentExtractor, RegistryLookup},
  service::VerificationService,
  store::CandidateStore,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `VOUCH_*` environment variables.
#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                   String,
  pub port:                   u16,
  /// SQLite database file. Unset keeps candidates in process memory.
  pub store_path:             Option<PathBuf>,
  /// Preload the in-memory store with two example candidates.
  pub seed_demo_data:         bool,
  pub registry:               RegistryConfig,
  pub extractor:              ExtractorConfig,
  pub reviewer_username:      Option<String>,
  /// argon2 PHC string; see `--hash-password`.
  pub reviewer_password_hash: Option<String>,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                   "127.0.0.1".to_string(),
      port:                   8080,
      store_path:             None,
      seed_demo_data:         true,
      registry:               RegistryConfig::default(),
      extractor:              ExtractorConfig::default(),
      reviewer_username:      None,
      reviewer_password_hash: None,
    }
  }
}

impl ServerConfig {
  /// Layer the optional file at `path` under `VOUCH_*` environment variables.
  /// Nested keys use a double underscore, e.g. `VOUCH_REGISTRY__BASE_URL`.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    Self::load_with_env(path, None)
  }

  /// As [`ServerConfig::load`], reading variables from `env` instead of the
  /// process environment when it is given.
  pub fn load_with_env(
    path: &Path,
    env: Option<config::Map<String, String>>,
  ) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("VOUCH")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true)
          .source(env),
      )
      .build()?
      .try_deserialize()
  }

  /// Reviewer credentials, when both halves are configured.
  pub fn reviewer_auth(&self) -> Option<AuthConfig> {
    match (&self.reviewer_username, &self.reviewer_password_hash) {
      (Some(username), Some(hash)) if !username.is_empty() && !hash.is_empty() => {
        Some(AuthConfig {
          username:      username.clone(),
          password_hash: hash.clone(),
        })
      }
      _ => None,
    }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Application state ────────────────────────────────────────────────────────

/// Build the handler state for `store` with collaborators chosen by `cfg`.
pub fn app_state<S>(
  store: S,
  cfg: &ServerConfig,
) -> vouch_connectors::Result<AppState<S, AnyRegistry, AnyExtractor>>
where
  S: CandidateStore,
{
  let registry = AnyRegistry::from_config(&cfg.registry)?;
  let extractor = AnyExtractor::from_config(&cfg.extractor)?;
  let state = AppState::new(VerificationService::new(
    Arc::new(store),
    registry,
    extractor,
  ));

  Ok(match cfg.reviewer_auth() {
    Some(auth) => state.with_auth(auth),
    None => {
      tracing::warn!("no reviewer credentials configured; reviewer routes are open");
      state
    }
  })
}

// ─── Router ───────────────────────────────────────────────────────────────────

async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

/// The full server router: `/health` plus the API under `/api`.
pub fn router<S, R, X>(state: AppState<S, R, X>) -> Router
where
  S: CandidateStore + 'static,
  R: RegistryLookup + 'static,
  X: DocumentExtractor + 'static,
{
  Router::new()
    .route("/health", get(health))
    .nest("/api", vouch_api::api_router(state))
    .layer(TraceLayer::new_for_http())
}
