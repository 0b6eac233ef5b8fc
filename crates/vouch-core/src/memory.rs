//! [`MemoryStore`]: the process-lifetime, in-memory [`CandidateStore`].
//!
//! State is lost on restart. Writers are serialised by an async `RwLock`, so
//! concurrent submissions never lose records.

use std::{collections::VecDeque, sync::Arc};

use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
  Error, Result,
  candidate::{Candidate, NewCandidate, VerificationStatus},
  store::CandidateStore,
};

/// An in-memory candidate store.
///
/// Cloning is cheap; clones share the same records.
#[derive(Clone, Default)]
pub struct MemoryStore {
  /// Most recent first.
  records: Arc<RwLock<VecDeque<Candidate>>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// A store pre-populated with the two demo candidates shown on a fresh
  /// reviewer dashboard.
  pub fn with_demo_data() -> Self {
    let now = Utc::now();
    let demo = [
      NewCandidate {
        name:            "Amit Verma".into(),
        dob:             "1992-02-10".into(),
        document_number: "112233445566".into(),
        document_status: VerificationStatus::Verified,
        registry_status: VerificationStatus::Mismatch,
        registry_id:     Some("109876543210".into()),
        confidence:      Some(0.45),
        discrepancies:   vec!["Name mismatch in registry records".into()],
      }
      .into_candidate(Uuid::new_v4(), now - Duration::seconds(12_000)),
      NewCandidate {
        name:            "Priya Singh".into(),
        dob:             "1995-08-20".into(),
        document_number: "987654321012".into(),
        document_status: VerificationStatus::Verified,
        registry_status: VerificationStatus::Verified,
        registry_id:     Some("101234567890".into()),
        confidence:      Some(0.98),
        discrepancies:   vec![],
      }
      .into_candidate(Uuid::new_v4(), now - Duration::days(1)),
    ];
    Self {
      records: Arc::new(RwLock::new(demo.into_iter().collect())),
    }
  }

  pub async fn len(&self) -> usize { self.records.read().await.len() }

  pub async fn is_empty(&self) -> bool { self.records.read().await.is_empty() }
}

impl CandidateStore for MemoryStore {
  type Error = Error;

  async fn append(&self, input: NewCandidate) -> Result<Candidate> {
    let candidate = input.into_candidate(Uuid::new_v4(), Utc::now());
    self.records.write().await.push_front(candidate.clone());
    Ok(candidate)
  }

  async fn list(
    &self,
    status: Option<VerificationStatus>,
  ) -> Result<Vec<Candidate>> {
    let records = self.records.read().await;
    Ok(
      records
        .iter()
        .filter(|c| status.is_none_or(|s| c.registry_status == s))
        .cloned()
        .collect(),
    )
  }

  async fn get(&self, id: Uuid) -> Result<Option<Candidate>> {
    let records = self.records.read().await;
    Ok(records.iter().find(|c| c.candidate_id == id).cloned())
  }

  async fn update_status(
    &self,
    id: Uuid,
    status: VerificationStatus,
  ) -> Result<Candidate> {
    let mut records = self.records.write().await;
    let candidate = records
      .iter_mut()
      .find(|c| c.candidate_id == id)
      .ok_or(Error::CandidateNotFound(id))?;

    if candidate.is_reviewed() {
      return Err(Error::AlreadyReviewed(id));
    }

    candidate.registry_status = status;
    candidate.reviewed_at = Some(Utc::now());
    Ok(candidate.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn new_candidate(name: &str) -> NewCandidate {
    NewCandidate {
      name:            name.into(),
      dob:             "1990-05-15".into(),
      document_number: "123412341234".into(),
      document_status: VerificationStatus::Verified,
      registry_status: VerificationStatus::Mismatch,
      registry_id:     Some("100900900123".into()),
      confidence:      Some(0.6),
      discrepancies:   vec!["Name mismatch: Input(x) vs Registry(y)".into()],
    }
  }

  #[tokio::test]
  async fn append_assigns_id_and_lists_it() {
    let store = MemoryStore::new();
    let stored = store.append(new_candidate("Rahul Sharma")).await.unwrap();
    assert!(!stored.is_reviewed());

    let all = store.list(None).await.unwrap();
    assert_eq!(all, vec![stored.clone()]);
    assert_eq!(store.get(stored.candidate_id).await.unwrap(), Some(stored));
  }

  #[tokio::test]
  async fn list_is_most_recent_first() {
    let store = MemoryStore::new();
    let a = store.append(new_candidate("First")).await.unwrap();
    let b = store.append(new_candidate("Second")).await.unwrap();
    let c = store.append(new_candidate("Third")).await.unwrap();

    let ids: Vec<_> = store
      .list(None)
      .await
      .unwrap()
      .into_iter()
      .map(|c| c.candidate_id)
      .collect();
    assert_eq!(ids, vec![c.candidate_id, b.candidate_id, a.candidate_id]);
  }

  #[tokio::test]
  async fn list_filters_by_registry_status() {
    let store = MemoryStore::with_demo_data();
    let mismatched = store.list(Some(VerificationStatus::Mismatch)).await.unwrap();
    assert_eq!(mismatched.len(), 1);
    assert_eq!(mismatched[0].name, "Amit Verma");
    assert!(store.list(Some(VerificationStatus::Rejected)).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn demo_data_is_newest_first() {
    let store = MemoryStore::with_demo_data();
    let all = store.list(None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all[0].submitted_at > all[1].submitted_at);
  }

  #[tokio::test]
  async fn update_status_once() {
    let store = MemoryStore::new();
    let stored = store.append(new_candidate("Rahul Sharma")).await.unwrap();

    let reviewed = store
      .update_status(stored.candidate_id, VerificationStatus::Verified)
      .await
      .unwrap();
    assert_eq!(reviewed.registry_status, VerificationStatus::Verified);
    assert!(reviewed.is_reviewed());

    let again = store
      .update_status(stored.candidate_id, VerificationStatus::Rejected)
      .await;
    assert!(matches!(again, Err(Error::AlreadyReviewed(id)) if id == stored.candidate_id));

    let current = store.get(stored.candidate_id).await.unwrap().unwrap();
    assert_eq!(current.registry_status, VerificationStatus::Verified);
  }

  #[tokio::test]
  async fn update_unknown_id_does_not_mutate() {
    let store = MemoryStore::with_demo_data();
    let before = store.list(None).await.unwrap();

    let result = store
      .update_status(Uuid::new_v4(), VerificationStatus::Rejected)
      .await;
    assert!(matches!(result, Err(Error::CandidateNotFound(_))));
    assert_eq!(store.list(None).await.unwrap(), before);
  }

  #[tokio::test]
  async fn concurrent_appends_are_all_kept() {
    let store = MemoryStore::new();
    let handles: Vec<_> = (0..32)
      .map(|i| {
        let store = store.clone();
        tokio::spawn(async move {
          store.append(new_candidate(&format!("Candidate {i}"))).await
        })
      })
      .collect();
    for h in handles {
      h.await.unwrap().unwrap();
    }
    assert_eq!(store.len().await, 32);
  }
}
