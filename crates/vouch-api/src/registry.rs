//! Handler for `GET /registry/lookup`.

use axum::{
  Json,
  extract::{Query, State, rejection::QueryRejection},
};
use serde::Deserialize;
use vouch_core::{
  collab::{DocumentExtractor, RegistryLookup, RegistryRecord},
  store::CandidateStore,
};

use crate::{AppState, auth::Reviewer, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct LookupParams {
  pub document_number: String,
}

/// `GET /registry/lookup?document_number=<number>`
pub async fn lookup<S, R, X>(
  _: Reviewer,
  State(state): State<AppState<S, R, X>>,
  params: Result<Query<LookupParams>, QueryRejection>,
) -> Result<Json<RegistryRecord>, ApiError>
where
  S: CandidateStore,
  R: RegistryLookup,
  X: DocumentExtractor,
{
  let Query(params) = params?;
  let number = params.document_number.trim();
  if number.is_empty() {
    return Err(
      vouch_core::Error::InvalidInput("document_number must not be blank".into())
        .into(),
    );
  }
  Ok(Json(state.service.lookup(number).await?))
}
