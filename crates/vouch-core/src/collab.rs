//! Contracts for the two external collaborators: the identity registry and
//! the document extractor.
//!
//! Concrete clients live in `vouch-connectors`. Both traits return `Send`
//! futures so implementations can be shared across axum handlers.

use std::{future::Future, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A failure talking to an external collaborator.
#[derive(Debug, Error)]
pub enum CollabError {
  #[error("timed out after {0:?}")]
  Timeout(Duration),

  #[error("service unavailable: {0}")]
  Unavailable(String),

  /// The collaborator answered, but could not make sense of the input (for
  /// example an unreadable document image).
  #[error("unreadable input: {0}")]
  Unreadable(String),

  #[error("unexpected response: {0}")]
  Protocol(String),
}

impl CollabError {
  pub fn is_timeout(&self) -> bool { matches!(self, Self::Timeout(_)) }
}

// ─── Registry ────────────────────────────────────────────────────────────────

/// The registry's coarse know-your-customer flag for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
  Verified,
  NotVerified,
}

/// Result of looking up an identity-document number in the registry.
///
/// A found record carries the registry's on-file fields, each of which may be
/// absent in a real registry response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RegistryRecord {
  NotFound,
  Found {
    /// UAN-equivalent tracking number.
    registry_id: Option<String>,
    name:        Option<String>,
    dob:         Option<String>,
    kyc:         Option<KycStatus>,
  },
}

impl RegistryRecord {
  pub fn is_found(&self) -> bool { matches!(self, Self::Found { .. }) }

  pub fn registry_id(&self) -> Option<&str> {
    match self {
      Self::Found { registry_id, .. } => registry_id.as_deref(),
      Self::NotFound => None,
    }
  }
}

/// Abstraction over the authoritative identity registry.
pub trait RegistryLookup: Send + Sync {
  /// Look up a free-form identity-document number.
  fn lookup<'a>(
    &'a self,
    document_number: &'a str,
  ) -> impl Future<Output = Result<RegistryRecord, CollabError>> + Send + 'a;
}

// ─── Document extraction ─────────────────────────────────────────────────────

/// Identity fields read off an uploaded document. All values are best-effort
/// and unvalidated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocument {
  pub name:            String,
  pub dob:             String,
  pub document_number: String,
}

/// Abstraction over a document-reading service.
pub trait DocumentExtractor: Send + Sync {
  /// Extract identity fields from `content` of the given media type.
  fn extract<'a>(
    &'a self,
    content: &'a [u8],
    media_type: &'a str,
  ) -> impl Future<Output = Result<ExtractedDocument, CollabError>> + Send + 'a;
}
