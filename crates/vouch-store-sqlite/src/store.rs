//! [`SqliteStore`]: the SQLite implementation of [`CandidateStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use vouch_core::{
  candidate::{Candidate, NewCandidate, VerificationStatus},
  store::CandidateStore,
};

use crate::{
  encode::{
    CANDIDATE_COLUMNS, RawCandidate, encode_discrepancies, encode_dt,
    encode_status, encode_uuid,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Vouch candidate store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All
/// statements run on the connection's own thread, one at a time.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// What a conditional status update found.
enum UpdateOutcome {
  Updated(RawCandidate),
  Missing,
  AlreadyReviewed,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── CandidateStore impl ─────────────────────────────────────────────────────

impl CandidateStore for SqliteStore {
  type Error = Error;

  async fn append(&self, input: NewCandidate) -> Result<Candidate> {
    let candidate = input.into_candidate(Uuid::new_v4(), Utc::now());

    let id_str            = encode_uuid(candidate.candidate_id);
    let name              = candidate.name.clone();
    let dob               = candidate.dob.clone();
    let document_number   = candidate.document_number.clone();
    let document_status   = encode_status(candidate.document_status);
    let registry_status   = encode_status(candidate.registry_status);
    let registry_id       = candidate.registry_id.clone();
    let confidence        = candidate.confidence;
    let submitted_at_str  = encode_dt(candidate.submitted_at);
    let discrepancies_str = encode_discrepancies(&candidate.discrepancies)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO candidates (
             candidate_id, name, dob, document_number,
             document_status, registry_status, registry_id, confidence,
             submitted_at, discrepancies
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            id_str,
            name,
            dob,
            document_number,
            document_status,
            registry_status,
            registry_id,
            confidence,
            submitted_at_str,
            discrepancies_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(candidate)
  }

  async fn list(
    &self,
    status: Option<VerificationStatus>,
  ) -> Result<Vec<Candidate>> {
    let status_str = status.map(encode_status);

    let raws: Vec<RawCandidate> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {CANDIDATE_COLUMNS} FROM candidates
           WHERE ?1 IS NULL OR registry_status = ?1
           ORDER BY seq DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![status_str], RawCandidate::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCandidate::into_candidate).collect()
  }

  async fn get(&self, id: Uuid) -> Result<Option<Candidate>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawCandidate> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE candidate_id = ?1"
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawCandidate::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCandidate::into_candidate).transpose()
  }

  async fn update_status(
    &self,
    id: Uuid,
    status: VerificationStatus,
  ) -> Result<Candidate> {
    let id_str     = encode_uuid(id);
    let status_str = encode_status(status);
    let at_str     = encode_dt(Utc::now());

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let changed = tx.execute(
          "UPDATE candidates SET registry_status = ?2, reviewed_at = ?3
           WHERE candidate_id = ?1 AND reviewed_at IS NULL",
          rusqlite::params![id_str, status_str, at_str],
        )?;

        let sql = format!(
          "SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE candidate_id = ?1"
        );
        let row = tx
          .query_row(&sql, rusqlite::params![id_str], RawCandidate::from_row)
          .optional()?;

        let outcome = match (changed, row) {
          (0, None) => UpdateOutcome::Missing,
          (0, Some(_)) => UpdateOutcome::AlreadyReviewed,
          (_, Some(raw)) => UpdateOutcome::Updated(raw),
          (_, None) => UpdateOutcome::Missing,
        };

        tx.commit()?;
        Ok(outcome)
      })
      .await?;

    match outcome {
      UpdateOutcome::Updated(raw) => raw.into_candidate(),
      UpdateOutcome::Missing => Err(Error::CandidateNotFound(id)),
      UpdateOutcome::AlreadyReviewed => Err(Error::AlreadyReviewed(id)),
    }
  }
}
