//! [`VerificationService`]: the candidate and reviewer workflows over an
//! injected store and the two external collaborators.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  candidate::{Candidate, NewCandidate, StatusSummary, VerificationStatus},
  collab::{DocumentExtractor, ExtractedDocument, RegistryLookup, RegistryRecord},
  decision::decide,
  store::CandidateStore,
};

/// Upper bound on an uploaded document.
pub const MAX_DOCUMENT_BYTES: usize = 5 * 1024 * 1024;

/// Exact media types accepted besides any `image/*`.
const DOCUMENT_MEDIA_TYPES: &[&str] =
  &["application/pdf", "text/xml", "application/xml"];

// ─── Submission ──────────────────────────────────────────────────────────────

/// A candidate's confirmed identity fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
  pub name:              String,
  pub dob:               String,
  pub document_number:   String,
  /// Caller-supplied confidence in `[0, 1]`; stored as-is.
  #[serde(default)]
  pub confidence:        Option<f64>,
  /// Whether the fields came from a successful document extraction. Manual
  /// entries leave the document-authenticity status pending.
  #[serde(default = "default_document_verified")]
  pub document_verified: bool,
}

fn default_document_verified() -> bool { true }

impl Submission {
  fn validate(&self) -> Result<()> {
    for (field, value) in [
      ("name", &self.name),
      ("dob", &self.dob),
      ("document_number", &self.document_number),
    ] {
      if value.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{field} must not be blank")));
      }
    }
    if let Some(c) = self.confidence
      && !(0.0..=1.0).contains(&c)
    {
      return Err(Error::InvalidInput(format!(
        "confidence must be between 0 and 1, got {c}"
      )));
    }
    Ok(())
  }
}

/// `true` for `image/*` and the document types in [`DOCUMENT_MEDIA_TYPES`].
/// Parameters such as `; charset=utf-8` are ignored.
pub fn is_supported_media_type(media_type: &str) -> bool {
  let essence = media_type
    .split(';')
    .next()
    .unwrap_or_default()
    .trim()
    .to_ascii_lowercase();
  essence.starts_with("image/") || DOCUMENT_MEDIA_TYPES.contains(&essence.as_str())
}

fn store_err(e: impl Into<Error>) -> Error { e.into() }

// ─── Service ─────────────────────────────────────────────────────────────────

/// The verification workflows.
///
/// Every method is an independent request/response operation; the service
/// holds no per-request state and can be shared behind an `Arc`.
pub struct VerificationService<S, R, X> {
  store:     Arc<S>,
  registry:  R,
  extractor: X,
}

impl<S, R, X> VerificationService<S, R, X>
where
  S: CandidateStore,
  R: RegistryLookup,
  X: DocumentExtractor,
{
  pub fn new(store: Arc<S>, registry: R, extractor: X) -> Self {
    Self { store, registry, extractor }
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  /// Read identity fields off an uploaded document.
  pub async fn extract(
    &self,
    content: &[u8],
    media_type: &str,
  ) -> Result<ExtractedDocument> {
    if content.is_empty() {
      return Err(Error::InvalidInput("document is empty".into()));
    }
    if content.len() > MAX_DOCUMENT_BYTES {
      return Err(Error::InvalidInput(format!(
        "document is {} bytes; the limit is {MAX_DOCUMENT_BYTES}",
        content.len()
      )));
    }
    if !is_supported_media_type(media_type) {
      return Err(Error::UnsupportedMediaType(media_type.to_owned()));
    }

    let extracted = self
      .extractor
      .extract(content, media_type)
      .await
      .inspect_err(|e| warn!(error = %e, media_type, "document extraction failed"))
      .map_err(Error::Extraction)?;

    info!(media_type, bytes = content.len(), "document extracted");
    Ok(extracted)
  }

  /// Look up the submission in the registry, decide its status, and store it.
  pub async fn submit(&self, submission: Submission) -> Result<Candidate> {
    submission.validate()?;

    let record = self.lookup(&submission.document_number).await?;
    let decision = decide(&submission.name, &submission.dob, &record);

    let input = NewCandidate {
      registry_id:     record.registry_id().map(str::to_owned),
      name:            submission.name,
      dob:             submission.dob,
      document_number: submission.document_number,
      document_status: if submission.document_verified {
        VerificationStatus::Verified
      } else {
        VerificationStatus::Pending
      },
      registry_status: decision.status,
      confidence:      submission.confidence,
      discrepancies:   decision.discrepancies,
    };

    let candidate = self.store.append(input).await.map_err(|e| {
      warn!(error = %e, "failed to store submission");
      match store_err(e) {
        Error::Store(inner) => Error::Submission(inner),
        other => other,
      }
    })?;

    info!(
      candidate_id = %candidate.candidate_id,
      status = %candidate.registry_status,
      discrepancies = candidate.discrepancies.len(),
      "candidate submitted"
    );
    Ok(candidate)
  }

  /// Query the registry directly.
  pub async fn lookup(&self, document_number: &str) -> Result<RegistryRecord> {
    self
      .registry
      .lookup(document_number)
      .await
      .inspect_err(|e| warn!(error = %e, "registry lookup failed"))
      .map_err(Error::Registry)
  }

  /// All candidates, most recent first.
  pub async fn list(
    &self,
    status: Option<VerificationStatus>,
  ) -> Result<Vec<Candidate>> {
    self.store.list(status).await.map_err(store_err)
  }

  pub async fn get(&self, id: Uuid) -> Result<Candidate> {
    self
      .store
      .get(id)
      .await
      .map_err(store_err)?
      .ok_or(Error::CandidateNotFound(id))
  }

  /// Apply the reviewer's one allowed status override.
  ///
  /// A review cannot move a candidate back to `pending`.
  pub async fn review(
    &self,
    id: Uuid,
    status: VerificationStatus,
  ) -> Result<Candidate> {
    if status == VerificationStatus::Pending {
      return Err(Error::InvalidInput(
        "a review cannot reset a candidate to pending".into(),
      ));
    }

    let candidate = self
      .store
      .update_status(id, status)
      .await
      .map_err(store_err)?;

    info!(candidate_id = %id, %status, "candidate reviewed");
    Ok(candidate)
  }

  /// Dashboard counters over every stored candidate.
  pub async fn summary(&self) -> Result<StatusSummary> {
    let all = self.list(None).await?;
    Ok(StatusSummary::tally(&all))
  }
}

#[cfg(test)]
mod tests {
  use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
  };

  use super::*;
  use crate::{
    collab::{CollabError, KycStatus},
    memory::MemoryStore,
  };

  /// Answers every lookup with a fixed record.
  struct StaticRegistry(RegistryRecord);

  impl RegistryLookup for StaticRegistry {
    async fn lookup(
      &self,
      _: &str,
    ) -> std::result::Result<RegistryRecord, CollabError> {
      Ok(self.0.clone())
    }
  }

  struct DownRegistry;

  impl RegistryLookup for DownRegistry {
    async fn lookup(
      &self,
      _: &str,
    ) -> std::result::Result<RegistryRecord, CollabError> {
      Err(CollabError::Timeout(Duration::from_secs(5)))
    }
  }

  #[derive(Default)]
  struct CountingExtractor {
    calls: AtomicUsize,
  }

  impl DocumentExtractor for CountingExtractor {
    async fn extract(
      &self,
      _: &[u8],
      _: &str,
    ) -> std::result::Result<ExtractedDocument, CollabError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      Ok(ExtractedDocument {
        name:            "Rahul Sharma".into(),
        dob:             "1990-05-15".into(),
        document_number: "1234 1234 1234".into(),
      })
    }
  }

  fn service<R: RegistryLookup>(
    registry: R,
  ) -> VerificationService<MemoryStore, R, CountingExtractor> {
    VerificationService::new(
      Arc::new(MemoryStore::new()),
      registry,
      CountingExtractor::default(),
    )
  }

  fn registry(name: &str, dob: &str) -> StaticRegistry {
    StaticRegistry(RegistryRecord::Found {
      registry_id: Some("101234567890".into()),
      name:        Some(name.into()),
      dob:         Some(dob.into()),
      kyc:         Some(KycStatus::Verified),
    })
  }

  fn submission(name: &str, dob: &str, number: &str) -> Submission {
    Submission {
      name:              name.into(),
      dob:               dob.into(),
      document_number:   number.into(),
      confidence:        Some(0.95),
      document_verified: true,
    }
  }

  #[tokio::test]
  async fn matching_submission_is_verified_and_stored() {
    let svc = service(registry("Priya Singh", "1995-08-20"));
    let c = svc
      .submit(submission("Priya Singh", "1995-08-20", "987654321012"))
      .await
      .unwrap();

    assert_eq!(c.registry_status, VerificationStatus::Verified);
    assert_eq!(c.document_status, VerificationStatus::Verified);
    assert!(c.discrepancies.is_empty());
    assert_eq!(c.registry_id.as_deref(), Some("101234567890"));
    assert_eq!(c.confidence, Some(0.95));
    assert_eq!(svc.list(None).await.unwrap(), vec![c]);
  }

  #[tokio::test]
  async fn name_mismatch_is_recorded() {
    let svc = service(registry("Amit Kumar Verma", "1992-02-10"));
    let c = svc
      .submit(submission("Amit Verma", "1992-02-10", "112233445566"))
      .await
      .unwrap();

    assert_eq!(c.registry_status, VerificationStatus::Mismatch);
    assert_eq!(c.discrepancies.len(), 1);
    assert!(c.discrepancies[0].starts_with("Name mismatch: "));
  }

  #[tokio::test]
  async fn unknown_document_is_no_record() {
    let svc = service(StaticRegistry(RegistryRecord::NotFound));
    let mut s = submission("New Joiner", "2001-01-01", "999999999999");
    s.document_verified = false;
    let c = svc.submit(s).await.unwrap();

    assert_eq!(c.registry_status, VerificationStatus::NoRecord);
    assert_eq!(c.document_status, VerificationStatus::Pending);
    assert!(c.registry_id.is_none());
    assert!(c.discrepancies.is_empty());
  }

  #[tokio::test]
  async fn registry_outage_is_a_retryable_submission_failure() {
    let svc = service(DownRegistry);
    let err = svc
      .submit(submission("Priya Singh", "1995-08-20", "987654321012"))
      .await
      .unwrap_err();

    assert_eq!(err.kind(), crate::ErrorKind::SubmissionFailure);
    assert!(err.is_retryable());
    assert!(err.is_timeout());
    assert!(svc.list(None).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn invalid_submissions_are_rejected_before_lookup() {
    let svc = service(DownRegistry);

    let blank = svc.submit(submission(" ", "1995-08-20", "1")).await.unwrap_err();
    assert!(matches!(blank, Error::InvalidInput(_)));

    let mut s = submission("Priya Singh", "1995-08-20", "1");
    s.confidence = Some(1.5);
    let err = svc.submit(s).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(!err.is_retryable());
  }

  #[tokio::test]
  async fn extract_checks_the_upload_before_calling_out() {
    let svc = service(DownRegistry);

    let err = svc.extract(b"", "image/png").await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    let err = svc.extract(b"%PDF", "application/zip").await.unwrap_err();
    assert!(matches!(err, Error::UnsupportedMediaType(_)));

    let too_big = vec![0u8; MAX_DOCUMENT_BYTES + 1];
    let err = svc.extract(&too_big, "image/jpeg").await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    assert_eq!(svc.extractor.calls.load(Ordering::SeqCst), 0);

    let doc = svc.extract(b"<xml/>", "text/xml; charset=utf-8").await.unwrap();
    assert_eq!(doc.name, "Rahul Sharma");
    assert_eq!(svc.extractor.calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn review_happens_once_and_never_to_pending() {
    let svc = service(StaticRegistry(RegistryRecord::NotFound));
    let c = svc
      .submit(submission("New Joiner", "2001-01-01", "999999999999"))
      .await
      .unwrap();

    let err = svc
      .review(c.candidate_id, VerificationStatus::Pending)
      .await
      .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    let reviewed = svc
      .review(c.candidate_id, VerificationStatus::Rejected)
      .await
      .unwrap();
    assert_eq!(reviewed.registry_status, VerificationStatus::Rejected);

    let err = svc
      .review(c.candidate_id, VerificationStatus::Verified)
      .await
      .unwrap_err();
    assert_eq!(err.kind(), crate::ErrorKind::AlreadyReviewed);

    let err = svc.get(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.kind(), crate::ErrorKind::NotFound);
  }

  #[tokio::test]
  async fn summary_reflects_stored_statuses() {
    let svc = service(registry("Priya Singh", "1995-08-20"));
    svc.submit(submission("Priya Singh", "1995-08-20", "1")).await.unwrap();
    svc.submit(submission("Someone Else", "1995-08-20", "2")).await.unwrap();

    let summary = svc.summary().await.unwrap();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.verified, 1);
    assert_eq!(summary.mismatch, 1);
  }
}
