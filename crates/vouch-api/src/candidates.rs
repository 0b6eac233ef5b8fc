//! Handlers for `/candidates` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/candidates` | Body: [`Submission`]; returns 201 + stored candidate |
//! | `GET`  | `/candidates` | Reviewer; optional `?status=`; most recent first |
//! | `GET`  | `/candidates/{id}` | Reviewer; single candidate |
//! | `POST` | `/candidates/{id}/status` | Reviewer; body [`ReviewBody`]; allowed once |

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;
use vouch_core::{
  candidate::{Candidate, VerificationStatus},
  collab::{DocumentExtractor, RegistryLookup},
  service::Submission,
  store::CandidateStore,
};

use crate::{AppState, auth::Reviewer, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /candidates`: run the registry check and store the result.
pub async fn create<S, R, X>(
  State(state): State<AppState<S, R, X>>,
  body: Result<Json<Submission>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CandidateStore,
  R: RegistryLookup,
  X: DocumentExtractor,
{
  let Json(submission) = body?;
  let candidate = state.service.submit(submission).await?;
  Ok((StatusCode::CREATED, Json(candidate)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Restrict to one registry status.
  pub status: Option<VerificationStatus>,
}

/// `GET /candidates[?status=...]`
pub async fn list<S, R, X>(
  _: Reviewer,
  State(state): State<AppState<S, R, X>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Candidate>>, ApiError>
where
  S: CandidateStore,
  R: RegistryLookup,
  X: DocumentExtractor,
{
  let Query(params) = params?;
  Ok(Json(state.service.list(params.status).await?))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /candidates/{id}`
pub async fn get_one<S, R, X>(
  _: Reviewer,
  State(state): State<AppState<S, R, X>>,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Candidate>, ApiError>
where
  S: CandidateStore,
  R: RegistryLookup,
  X: DocumentExtractor,
{
  let Path(id) = id?;
  Ok(Json(state.service.get(id).await?))
}

// ─── Review ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReviewBody {
  pub status: VerificationStatus,
}

/// `POST /candidates/{id}/status`: body `{"status":"verified"}`.
pub async fn review<S, R, X>(
  _: Reviewer,
  State(state): State<AppState<S, R, X>>,
  id: Result<Path<Uuid>, PathRejection>,
  body: Result<Json<ReviewBody>, JsonRejection>,
) -> Result<Json<Candidate>, ApiError>
where
  S: CandidateStore,
  R: RegistryLookup,
  X: DocumentExtractor,
{
  let Path(id) = id?;
  let Json(body) = body?;
  Ok(Json(state.service.review(id, body.status).await?))
}
