//! The verification decision: compares what a candidate submitted with what
//! the registry holds and derives a status plus human-readable discrepancies.
//!
//! Matching is done on normalised values rather than raw strings:
//!
//! - Names are trimmed, `.` and `,` are treated as word separators, runs of
//!   whitespace collapse to one space, and the result is lowercased. Partial
//!   matches (missing middle names, transliterations) do not match.
//! - Dates of birth are parsed to a calendar date from any of
//!   [`DOB_FORMATS`]. If either side does not parse, the trimmed strings are
//!   compared instead.
//! - A registry field that is absent or blank never matches.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{candidate::VerificationStatus, collab::RegistryRecord};

/// Accepted date-of-birth layouts, tried in order.
pub const DOB_FORMATS: &[&str] =
  &["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y"];

/// Rendered in a discrepancy when the registry omitted the field.
const MISSING: &str = "<missing>";

/// Outcome of [`decide`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
  pub status:        VerificationStatus,
  /// One entry per failing field, name first.
  pub discrepancies: Vec<String>,
}

/// Decide the registry-match status for a submission.
pub fn decide(name: &str, dob: &str, record: &RegistryRecord) -> Decision {
  let RegistryRecord::Found {
    name: registry_name,
    dob: registry_dob,
    ..
  } = record
  else {
    return Decision {
      status:        VerificationStatus::NoRecord,
      discrepancies: Vec::new(),
    };
  };

  let mut discrepancies = Vec::new();

  if !registry_name.as_deref().is_some_and(|r| names_match(name, r)) {
    discrepancies.push(format!(
      "Name mismatch: Input({name}) vs Registry({})",
      registry_name.as_deref().unwrap_or(MISSING)
    ));
  }

  if !registry_dob.as_deref().is_some_and(|r| dobs_match(dob, r)) {
    discrepancies.push(format!(
      "DOB mismatch: Input({dob}) vs Registry({})",
      registry_dob.as_deref().unwrap_or(MISSING)
    ));
  }

  let status = if discrepancies.is_empty() {
    VerificationStatus::Verified
  } else {
    VerificationStatus::Mismatch
  };

  Decision { status, discrepancies }
}

// ─── Normalisation ───────────────────────────────────────────────────────────

/// Canonical comparison form of a personal name.
pub fn normalize_name(raw: &str) -> String {
  raw
    .split(|c: char| c.is_whitespace() || c == '.' || c == ',')
    .filter(|word| !word.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

/// Parse a date of birth from any of [`DOB_FORMATS`].
pub fn parse_dob(raw: &str) -> Option<NaiveDate> {
  let raw = raw.trim();
  DOB_FORMATS
    .iter()
    .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

fn names_match(submitted: &str, registry: &str) -> bool {
  let submitted = normalize_name(submitted);
  !submitted.is_empty() && submitted == normalize_name(registry)
}

fn dobs_match(submitted: &str, registry: &str) -> bool {
  match (parse_dob(submitted), parse_dob(registry)) {
    (Some(a), Some(b)) => a == b,
    _ => {
      let (a, b) = (submitted.trim(), registry.trim());
      !a.is_empty() && a == b
    }
  }
}
