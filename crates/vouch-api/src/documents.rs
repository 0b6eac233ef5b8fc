//! Handler for `POST /documents/extract`.
//!
//! The request body is the raw file; its `Content-Type` names the media type.
//! Bodies above [`vouch_core::service::MAX_DOCUMENT_BYTES`] are refused with
//! `413` before reaching the extractor.

use axum::{
  Json,
  extract::{State, rejection::BytesRejection},
  http::{HeaderMap, header},
};
use bytes::Bytes;
use vouch_core::{
  collab::{DocumentExtractor, ExtractedDocument, RegistryLookup},
  store::CandidateStore,
};

use crate::{AppState, error::ApiError};

/// `POST /documents/extract`
pub async fn extract<S, R, X>(
  State(state): State<AppState<S, R, X>>,
  headers: HeaderMap,
  body: Result<Bytes, BytesRejection>,
) -> Result<Json<ExtractedDocument>, ApiError>
where
  S: CandidateStore,
  R: RegistryLookup,
  X: DocumentExtractor,
{
  let body = body?;
  let media_type = headers
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .unwrap_or_default();

  let document = state.service.extract(&body, media_type).await?;
  Ok(Json(document))
}
