//! Stand-ins for the external collaborators, used when no real endpoint is
//! configured.
//!
//! The simulated registry answers from a tiny fixed rule set:
//!
//! | Document number contains | Result |
//! |--------------------------|--------|
//! | `1234` | found: Rahul Sharma, 1990-05-15, KYC verified |
//! | `9999` | not found |
//! | anything else | found: Simulated User, 1990-01-01, random registry id |

use std::time::Duration;

use rand_core::{OsRng, RngCore};
use tracing::debug;
use vouch_core::collab::{
  CollabError, DocumentExtractor, ExtractedDocument, KycStatus, RegistryLookup,
  RegistryRecord,
};

async fn pause(delay: Duration) {
  if !delay.is_zero() {
    tokio::time::sleep(delay).await;
  }
}

// ─── Registry ────────────────────────────────────────────────────────────────

/// An in-process registry with artificial latency.
#[derive(Debug, Clone, Default)]
pub struct SimulatedRegistry {
  delay: Duration,
}

impl SimulatedRegistry {
  pub fn new(delay: Duration) -> Self { Self { delay } }

  /// Rules match the number exactly as submitted, spaces included.
  fn answer(document_number: &str) -> RegistryRecord {
    if document_number.contains("1234") {
      RegistryRecord::Found {
        registry_id: Some("100900900123".into()),
        name:        Some("Rahul Sharma".into()),
        dob:         Some("1990-05-15".into()),
        kyc:         Some(KycStatus::Verified),
      }
    } else if document_number.contains("9999") {
      RegistryRecord::NotFound
    } else {
      RegistryRecord::Found {
        registry_id: Some(random_registry_id()),
        name:        Some("Simulated User".into()),
        dob:         Some("1990-01-01".into()),
        kyc:         Some(KycStatus::NotVerified),
      }
    }
  }
}

/// A 12-digit registry id with the `100` prefix.
fn random_registry_id() -> String {
  format!("100{:09}", OsRng.next_u64() % 1_000_000_000)
}

impl RegistryLookup for SimulatedRegistry {
  async fn lookup(
    &self,
    document_number: &str,
  ) -> Result<RegistryRecord, CollabError> {
    pause(self.delay).await;
    let record = Self::answer(document_number);
    debug!(found = record.is_found(), "simulated registry lookup");
    Ok(record)
  }
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// The document the fixed extractor returns by default.
pub fn demo_document() -> ExtractedDocument {
  ExtractedDocument {
    name:            "Rahul Sharma".into(),
    dob:             "1990-05-15".into(),
    document_number: "1234 1234 1234".into(),
  }
}

/// Returns the same document for every upload.
#[derive(Debug, Clone)]
pub struct FixedExtractor {
  delay:    Duration,
  document: ExtractedDocument,
}

impl FixedExtractor {
  pub fn new(delay: Duration) -> Self {
    Self { delay, document: demo_document() }
  }

  pub fn with_document(document: ExtractedDocument, delay: Duration) -> Self {
    Self { delay, document }
  }
}

impl DocumentExtractor for FixedExtractor {
  async fn extract(
    &self,
    content: &[u8],
    media_type: &str,
  ) -> Result<ExtractedDocument, CollabError> {
    pause(self.delay).await;
    debug!(bytes = content.len(), media_type, "fixed extractor returning demo data");
    Ok(self.document.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn known_numbers_follow_the_rule_table() {
    let registry = SimulatedRegistry::default();

    let rahul = registry.lookup("1234 1234 1234").await.unwrap();
    assert_eq!(rahul.registry_id(), Some("100900900123"));
    assert!(matches!(
      rahul,
      RegistryRecord::Found { ref name, .. } if name.as_deref() == Some("Rahul Sharma")
    ));

    assert_eq!(
      registry.lookup("5555 9999 0000").await.unwrap(),
      RegistryRecord::NotFound
    );
  }

  #[tokio::test]
  async fn other_numbers_get_a_simulated_record() {
    let registry = SimulatedRegistry::default();
    let record = registry.lookup("112233445566").await.unwrap();

    let RegistryRecord::Found { registry_id, name, kyc, .. } = record else {
      panic!("expected a found record");
    };
    let id = registry_id.unwrap();
    assert_eq!(id.len(), 12);
    assert!(id.starts_with("100"));
    assert!(id.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(name.as_deref(), Some("Simulated User"));
    assert_eq!(kyc, Some(KycStatus::NotVerified));
  }

  #[tokio::test]
  async fn rules_see_spaces_in_the_number() {
    let registry = SimulatedRegistry::default();

    let record = registry.lookup("12 34 5678 0000").await.unwrap();
    assert!(matches!(
      record,
      RegistryRecord::Found { ref name, .. } if name.as_deref() == Some("Simulated User")
    ));

    assert!(registry.lookup("99 99 0000 1111").await.unwrap().is_found());
  }

  #[tokio::test]
  async fn delay_is_applied() {
    let registry = SimulatedRegistry::new(Duration::from_millis(50));
    let started = tokio::time::Instant::now();
    registry.lookup("9999").await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(50));
  }

  #[tokio::test]
  async fn fixed_extractor_returns_its_document() {
    let x = FixedExtractor::new(Duration::ZERO);
    assert_eq!(x.extract(b"anything", "image/png").await.unwrap(), demo_document());

    let custom = ExtractedDocument {
      name:            "Priya Singh".into(),
      dob:             "1995-08-20".into(),
      document_number: "987654321012".into(),
    };
    let x = FixedExtractor::with_document(custom.clone(), Duration::ZERO);
    assert_eq!(x.extract(b"", "application/pdf").await.unwrap(), custom);
  }
}
