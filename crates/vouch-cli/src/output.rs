//! Plain-text rendering of API responses.

use std::fmt::Write as _;

use chrono::Local;
use vouch_core::{
  candidate::{Candidate, StatusSummary},
  collab::{ExtractedDocument, RegistryRecord},
};

const NAME_WIDTH: usize = 24;

fn truncate(s: &str, width: usize) -> String {
  if s.chars().count() <= width {
    s.to_string()
  } else {
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
  }
}

/// One row per candidate, most recent first (as returned by the server).
pub fn candidate_table(candidates: &[Candidate]) -> String {
  if candidates.is_empty() {
    return "No candidates.\n".to_string();
  }

  let mut out = String::new();
  let _ = writeln!(
    out,
    "{:<36}  {:<NAME_WIDTH$}  {:<10}  {:<9}  {:<16}  {}",
    "ID", "NAME", "DOB", "STATUS", "SUBMITTED", "ISSUES"
  );
  for c in candidates {
    let submitted = c.submitted_at.with_timezone(&Local).format("%Y-%m-%d %H:%M");
    let status = if c.is_reviewed() {
      format!("{}*", c.registry_status)
    } else {
      c.registry_status.to_string()
    };
    let _ = writeln!(
      out,
      "{:<36}  {:<NAME_WIDTH$}  {:<10}  {:<9}  {:<16}  {}",
      c.candidate_id,
      truncate(&c.name, NAME_WIDTH),
      truncate(&c.dob, 10),
      status,
      submitted,
      c.discrepancies.len(),
    );
  }
  if candidates.iter().any(Candidate::is_reviewed) {
    out.push_str("* status set by a reviewer\n");
  }
  out
}

pub fn candidate_detail(c: &Candidate) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "Candidate        {}", c.candidate_id);
  let _ = writeln!(out, "Name             {}", c.name);
  let _ = writeln!(out, "Date of birth    {}", c.dob);
  let _ = writeln!(out, "Document number  {}", c.document_number);
  let _ = writeln!(out, "Document status  {}", c.document_status);
  let _ = writeln!(out, "Registry status  {}", c.registry_status);
  let _ = writeln!(
    out,
    "Registry id      {}",
    c.registry_id.as_deref().unwrap_or("-")
  );
  if let Some(confidence) = c.confidence {
    let _ = writeln!(out, "Confidence       {:.0}%", confidence * 100.0);
  }
  let _ = writeln!(
    out,
    "Submitted        {}",
    c.submitted_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
  );
  if let Some(at) = c.reviewed_at {
    let _ = writeln!(
      out,
      "Reviewed         {}",
      at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
    );
  }
  if c.discrepancies.is_empty() {
    out.push_str("Discrepancies    none\n");
  } else {
    out.push_str("Discrepancies\n");
    for d in &c.discrepancies {
      let _ = writeln!(out, "  - {d}");
    }
  }
  out
}

pub fn extracted(doc: &ExtractedDocument) -> String {
  format!(
    "Name             {}\nDate of birth    {}\nDocument number  {}\n",
    doc.name, doc.dob, doc.document_number
  )
}

pub fn registry_record(record: &RegistryRecord) -> String {
  match record {
    RegistryRecord::NotFound => "No registry record.\n".to_string(),
    RegistryRecord::Found { registry_id, name, dob, kyc } => {
      let kyc = match kyc {
        Some(k) => serde_json::to_value(k)
          .ok()
          .and_then(|v| v.as_str().map(str::to_owned))
          .unwrap_or_default(),
        None => "-".to_string(),
      };
      format!(
        "Registry id      {}\nName             {}\nDate of birth    {}\nKYC              {}\n",
        registry_id.as_deref().unwrap_or("-"),
        name.as_deref().unwrap_or("-"),
        dob.as_deref().unwrap_or("-"),
        kyc,
      )
    }
  }
}

pub fn summary(s: &StatusSummary) -> String {
  format!(
    "Total      {}\nVerified   {}\nMismatch   {}\nNo record  {}\nPending    {}\nRejected   {}\n",
    s.total, s.verified, s.mismatch, s.no_record, s.pending, s.rejected
  )
}
