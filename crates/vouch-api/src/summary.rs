//! Handler for `GET /summary`: reviewer dashboard counters.

use axum::{Json, extract::State};
use vouch_core::{
  candidate::StatusSummary,
  collab::{DocumentExtractor, RegistryLookup},
  store::CandidateStore,
};

use crate::{AppState, auth::Reviewer, error::ApiError};

pub async fn handler<S, R, X>(
  _: Reviewer,
  State(state): State<AppState<S, R, X>>,
) -> Result<Json<StatusSummary>, ApiError>
where
  S: CandidateStore,
  R: RegistryLookup,
  X: DocumentExtractor,
{
  Ok(Json(state.service.summary().await?))
}
