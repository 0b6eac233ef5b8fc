//! Candidate records, the unit of work for both the onboarding flow and the
//! reviewer dashboard.
//!
//! A candidate is written once at submission. The only later mutation is a
//! single reviewer override of [`Candidate::registry_status`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Status ──────────────────────────────────────────────────────────────────

/// The closed set of verification states shared by the document-authenticity
/// and registry-match checks.
///
/// The snake_case form is used on the wire and in the database.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
  strum::IntoStaticStr,
  strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VerificationStatus {
  Pending,
  Verified,
  Mismatch,
  /// The registry has no record for the document number; usually a first-time
  /// joiner.
  NoRecord,
  Rejected,
}

// ─── Candidate ───────────────────────────────────────────────────────────────

/// A stored submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
  /// Assigned by the store on append.
  pub candidate_id:    Uuid,
  pub name:            String,
  /// Date of birth exactly as submitted; not validated.
  pub dob:             String,
  /// Identity-document number exactly as submitted.
  pub document_number: String,
  /// Outcome of the document-authenticity check.
  pub document_status: VerificationStatus,
  /// Outcome of the registry match; the one field a reviewer may override.
  pub registry_status: VerificationStatus,
  /// Registry-assigned tracking number, when the lookup found a record.
  pub registry_id:     Option<String>,
  /// Caller-supplied confidence in `[0, 1]`.
  pub confidence:      Option<f64>,
  /// Server-assigned; never changes after creation.
  pub submitted_at:    DateTime<Utc>,
  #[serde(default)]
  pub discrepancies:   Vec<String>,
  /// Set when a reviewer overrides `registry_status`. Once set, the record is
  /// frozen.
  pub reviewed_at:     Option<DateTime<Utc>>,
}

impl Candidate {
  pub fn is_reviewed(&self) -> bool { self.reviewed_at.is_some() }
}

// ─── NewCandidate ────────────────────────────────────────────────────────────

/// Input to [`crate::store::CandidateStore::append`].
/// `candidate_id` and `submitted_at` are always set by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCandidate {
  pub name:            String,
  pub dob:             String,
  pub document_number: String,
  pub document_status: VerificationStatus,
  pub registry_status: VerificationStatus,
  pub registry_id:     Option<String>,
  pub confidence:      Option<f64>,
  pub discrepancies:   Vec<String>,
}

impl NewCandidate {
  /// Materialise the stored record. Used by store implementations.
  pub fn into_candidate(
    self,
    candidate_id: Uuid,
    submitted_at: DateTime<Utc>,
  ) -> Candidate {
    Candidate {
      candidate_id,
      name: self.name,
      dob: self.dob,
      document_number: self.document_number,
      document_status: self.document_status,
      registry_status: self.registry_status,
      registry_id: self.registry_id,
      confidence: self.confidence,
      submitted_at,
      discrepancies: self.discrepancies,
      reviewed_at: None,
    }
  }
}

// ─── Dashboard summary ───────────────────────────────────────────────────────

/// Per-status counters over `registry_status`, as shown on the reviewer
/// dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
  pub total:     usize,
  pub pending:   usize,
  pub verified:  usize,
  pub mismatch:  usize,
  pub no_record: usize,
  pub rejected:  usize,
}

impl StatusSummary {
  pub fn tally<'a>(candidates: impl IntoIterator<Item = &'a Candidate>) -> Self {
    candidates.into_iter().fold(Self::default(), |mut acc, c| {
      acc.total += 1;
      match c.registry_status {
        VerificationStatus::Pending => acc.pending += 1,
        VerificationStatus::Verified => acc.verified += 1,
        VerificationStatus::Mismatch => acc.mismatch += 1,
        VerificationStatus::NoRecord => acc.no_record += 1,
        VerificationStatus::Rejected => acc.rejected += 1,
      }
      acc
    })
  }
}
