//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, statuses as their snake_case
//! names, discrepancies as a compact JSON array, and UUIDs as hyphenated
//! lowercase strings.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use vouch_core::candidate::{Candidate, VerificationStatus};

use crate::{Error, Result};

/// Column list shared by every `SELECT` that feeds [`RawCandidate::from_row`].
pub const CANDIDATE_COLUMNS: &str = "candidate_id, name, dob, document_number,
  document_status, registry_status, registry_id, confidence, submitted_at,
  discrepancies, reviewed_at";

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(e.to_string()))
}

// ─── VerificationStatus ──────────────────────────────────────────────────────

pub fn encode_status(s: VerificationStatus) -> &'static str { s.into() }

pub fn decode_status(s: &str) -> Result<VerificationStatus> {
  VerificationStatus::from_str(s)
    .map_err(|_| Error::Decode(format!("unknown verification status: {s:?}")))
}

// ─── Discrepancies ───────────────────────────────────────────────────────────

pub fn encode_discrepancies(d: &[String]) -> Result<String> {
  Ok(serde_json::to_string(d)?)
}

pub fn decode_discrepancies(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Raw values read directly from a `candidates` row.
pub struct RawCandidate {
  pub candidate_id:    String,
  pub name:            String,
  pub dob:             String,
  pub document_number: String,
  pub document_status: String,
  pub registry_status: String,
  pub registry_id:     Option<String>,
  pub confidence:      Option<f64>,
  pub submitted_at:    String,
  pub discrepancies:   String,
  pub reviewed_at:     Option<String>,
}

impl RawCandidate {
  /// Read a row selected with [`CANDIDATE_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      candidate_id:    row.get(0)?,
      name:            row.get(1)?,
      dob:             row.get(2)?,
      document_number: row.get(3)?,
      document_status: row.get(4)?,
      registry_status: row.get(5)?,
      registry_id:     row.get(6)?,
      confidence:      row.get(7)?,
      submitted_at:    row.get(8)?,
      discrepancies:   row.get(9)?,
      reviewed_at:     row.get(10)?,
    })
  }

  pub fn into_candidate(self) -> Result<Candidate> {
    Ok(Candidate {
      candidate_id:    decode_uuid(&self.candidate_id)?,
      name:            self.name,
      dob:             self.dob,
      document_number: self.document_number,
      document_status: decode_status(&self.document_status)?,
      registry_status: decode_status(&self.registry_status)?,
      registry_id:     self.registry_id,
      confidence:      self.confidence,
      submitted_at:    decode_dt(&self.submitted_at)?,
      discrepancies:   decode_discrepancies(&self.discrepancies)?,
      reviewed_at:     self.reviewed_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}
