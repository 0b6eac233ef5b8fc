//! The `CandidateStore` trait.
//!
//! The trait is implemented by storage backends ([`crate::memory::MemoryStore`]
//! and `vouch-store-sqlite`). The service layer and the HTTP surface depend on
//! this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::candidate::{Candidate, NewCandidate, VerificationStatus};

/// Abstraction over a candidate store backend.
///
/// Records are append-only apart from a single reviewer status override.
/// Implementations must be safe to call from concurrent requests; the ordering
/// of concurrent appends is unspecified, but each stored record keeps its
/// insertion position.
///
/// Backend errors must convert into [`crate::Error`] so that missing ids and
/// repeated reviews surface as [`crate::Error::CandidateNotFound`] and
/// [`crate::Error::AlreadyReviewed`].
pub trait CandidateStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  /// Persist a new candidate and return the stored record. The id and
  /// `submitted_at` timestamp are assigned by the store.
  fn append(
    &self,
    input: NewCandidate,
  ) -> impl Future<Output = Result<Candidate, Self::Error>> + Send + '_;

  /// All candidates, most recently appended first, optionally restricted to
  /// one `registry_status`.
  fn list(
    &self,
    status: Option<VerificationStatus>,
  ) -> impl Future<Output = Result<Vec<Candidate>, Self::Error>> + Send + '_;

  /// Retrieve a candidate by id. Returns `None` if not found.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Candidate>, Self::Error>> + Send + '_;

  /// Override `registry_status` and stamp `reviewed_at`.
  ///
  /// Fails without mutating anything if the id is unknown or the candidate has
  /// already been reviewed.
  fn update_status(
    &self,
    id: Uuid,
    status: VerificationStatus,
  ) -> impl Future<Output = Result<Candidate, Self::Error>> + Send + '_;
}
