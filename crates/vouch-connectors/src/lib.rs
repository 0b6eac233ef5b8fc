//! Clients for Vouch's external collaborators.
//!
//! | Collaborator | Simulated | Real |
//! |--------------|-----------|------|
//! | [`RegistryLookup`] | [`simulated::SimulatedRegistry`] | [`http_registry::HttpRegistry`] |
//! | [`DocumentExtractor`] | [`simulated::FixedExtractor`] | [`gemini::GeminiExtractor`] |
//!
//! [`AnyRegistry`] and [`AnyExtractor`] pick an implementation from
//! configuration at startup so the server is built against one concrete type
//! per collaborator.

pub mod error;
pub mod gemini;
pub mod http_registry;
pub mod simulated;

use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};
use vouch_core::collab::{
  CollabError, DocumentExtractor, ExtractedDocument, RegistryLookup,
  RegistryRecord,
};

pub use error::{Error, Result};
use gemini::GeminiExtractor;
use http_registry::HttpRegistry;
use simulated::{FixedExtractor, SimulatedRegistry};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Registry settings. Without a `base_url` the simulated registry is used.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
  pub base_url:           Option<String>,
  pub timeout_secs:       u64,
  /// Artificial latency of the simulated registry.
  pub simulated_delay_ms: u64,
}

impl Default for RegistryConfig {
  fn default() -> Self {
    Self {
      base_url:           None,
      timeout_secs:       10,
      simulated_delay_ms: 1500,
    }
  }
}

/// Extractor settings. Without an `api_key` the fixed demo extractor is used.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
  pub api_key:           Option<String>,
  pub model:             String,
  pub endpoint:          String,
  pub timeout_secs:      u64,
  /// Artificial latency of the fixed extractor.
  pub fallback_delay_ms: u64,
}

impl Default for ExtractorConfig {
  fn default() -> Self {
    Self {
      api_key:           None,
      model:             gemini::DEFAULT_MODEL.to_string(),
      endpoint:          gemini::DEFAULT_ENDPOINT.to_string(),
      timeout_secs:      60,
      fallback_delay_ms: 2000,
    }
  }
}

// ─── Registry dispatch ────────────────────────────────────────────────────────

/// A registry chosen at runtime.
pub enum AnyRegistry {
  Simulated(SimulatedRegistry),
  Http(HttpRegistry),
}

impl AnyRegistry {
  pub fn from_config(cfg: &RegistryConfig) -> Result<Self> {
    match cfg.base_url.as_deref().filter(|u| !u.trim().is_empty()) {
      Some(url) => {
        info!(url, "using HTTP registry");
        Ok(Self::Http(HttpRegistry::new(
          url,
          Duration::from_secs(cfg.timeout_secs),
        )?))
      }
      None => {
        info!(delay_ms = cfg.simulated_delay_ms, "using simulated registry");
        Ok(Self::Simulated(SimulatedRegistry::new(Duration::from_millis(
          cfg.simulated_delay_ms,
        ))))
      }
    }
  }
}

impl RegistryLookup for AnyRegistry {
  async fn lookup(
    &self,
    document_number: &str,
  ) -> std::result::Result<RegistryRecord, CollabError> {
    match self {
      Self::Simulated(r) => r.lookup(document_number).await,
      Self::Http(r) => r.lookup(document_number).await,
    }
  }
}

// ─── Extractor dispatch ───────────────────────────────────────────────────────

/// A document extractor chosen at runtime.
pub enum AnyExtractor {
  Fixed(FixedExtractor),
  Gemini(GeminiExtractor),
}

impl AnyExtractor {
  pub fn from_config(cfg: &ExtractorConfig) -> Result<Self> {
    match cfg.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
      Some(key) => {
        info!(model = %cfg.model, "using Gemini document extractor");
        Ok(Self::Gemini(GeminiExtractor::new(
          key,
          &cfg.model,
          &cfg.endpoint,
          Duration::from_secs(cfg.timeout_secs),
        )?))
      }
      None => {
        warn!("no extractor API key configured; returning demo document data");
        Ok(Self::Fixed(FixedExtractor::new(Duration::from_millis(
          cfg.fallback_delay_ms,
        ))))
      }
    }
  }
}

impl DocumentExtractor for AnyExtractor {
  async fn extract(
    &self,
    content: &[u8],
    media_type: &str,
  ) -> std::result::Result<ExtractedDocument, CollabError> {
    match self {
      Self::Fixed(x) => x.extract(content, media_type).await,
      Self::Gemini(x) => x.extract(content, media_type).await,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_select_simulated_collaborators() {
    let registry = AnyRegistry::from_config(&RegistryConfig::default()).unwrap();
    assert!(matches!(registry, AnyRegistry::Simulated(_)));

    let extractor = AnyExtractor::from_config(&ExtractorConfig {
      api_key: Some("  ".into()),
      ..ExtractorConfig::default()
    })
    .unwrap();
    assert!(matches!(extractor, AnyExtractor::Fixed(_)));
  }

  #[test]
  fn configured_endpoints_select_real_clients() {
    let registry = AnyRegistry::from_config(&RegistryConfig {
      base_url: Some("http://registry.internal".into()),
      ..RegistryConfig::default()
    })
    .unwrap();
    assert!(matches!(registry, AnyRegistry::Http(_)));

    let extractor = AnyExtractor::from_config(&ExtractorConfig {
      api_key: Some("key".into()),
      ..ExtractorConfig::default()
    })
    .unwrap();
    assert!(matches!(extractor, AnyExtractor::Gemini(_)));
  }

  #[test]
  fn malformed_registry_url_is_rejected() {
    let err = AnyRegistry::from_config(&RegistryConfig {
      base_url: Some("registry.internal".into()),
      ..RegistryConfig::default()
    });
    assert!(matches!(err, Err(Error::InvalidUrl(_))));
  }

  #[tokio::test]
  async fn dispatch_reaches_the_simulated_registry() {
    let registry = AnyRegistry::from_config(&RegistryConfig {
      simulated_delay_ms: 0,
      ..RegistryConfig::default()
    })
    .unwrap();
    let record = registry.lookup("9999 0000 0000").await.unwrap();
    assert_eq!(record, RegistryRecord::NotFound);
  }
}
