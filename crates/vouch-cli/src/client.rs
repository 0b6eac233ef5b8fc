//! Async HTTP client wrapping the Vouch JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;
use uuid::Uuid;
use vouch_core::{
  candidate::{Candidate, StatusSummary, VerificationStatus},
  collab::{ExtractedDocument, RegistryRecord},
  service::Submission,
};

/// Connection settings for the Vouch API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Async HTTP client for the Vouch JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

/// Error body returned by the server.
#[derive(Debug, Deserialize)]
struct ErrorBody {
  error:     String,
  kind:      String,
  #[serde(default)]
  retryable: bool,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      // Extraction through a real model can take the better part of a minute.
      .timeout(Duration::from_secs(90))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  /// Send `req`, turning non-success responses into readable errors.
  async fn send<T: DeserializeOwned>(&self, what: &str, req: RequestBuilder) -> Result<T> {
    tracing::debug!(what, "sending request");
    let resp = self
      .auth(req)
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;
    decode(what, resp).await
  }

  // ── Candidate flow ────────────────────────────────────────────────────────

  /// `POST /api/documents/extract`
  pub async fn extract(&self, content: Vec<u8>, media_type: &str) -> Result<ExtractedDocument> {
    let req = self
      .client
      .post(self.url("/documents/extract"))
      .header(reqwest::header::CONTENT_TYPE, media_type)
      .body(content);
    self.send("POST /documents/extract", req).await
  }

  /// `POST /api/candidates`
  pub async fn submit(&self, submission: &Submission) -> Result<Candidate> {
    let req = self.client.post(self.url("/candidates")).json(submission);
    self.send("POST /candidates", req).await
  }

  // ── Reviewer flow ─────────────────────────────────────────────────────────

  /// `GET /api/candidates[?status=<status>]`
  pub async fn list(&self, status: Option<VerificationStatus>) -> Result<Vec<Candidate>> {
    let mut req = self.client.get(self.url("/candidates"));
    if let Some(status) = status {
      req = req.query(&[("status", status.as_ref())]);
    }
    self.send("GET /candidates", req).await
  }

  /// `GET /api/candidates/<id>`
  pub async fn get(&self, id: Uuid) -> Result<Candidate> {
    let req = self.client.get(self.url(&format!("/candidates/{id}")));
    self.send("GET /candidates/{id}", req).await
  }

  /// `POST /api/candidates/<id>/status`
  pub async fn review(&self, id: Uuid, status: VerificationStatus) -> Result<Candidate> {
    let req = self
      .client
      .post(self.url(&format!("/candidates/{id}/status")))
      .json(&json!({ "status": status }));
    self.send("POST /candidates/{id}/status", req).await
  }

  /// `GET /api/registry/lookup?document_number=<number>`
  pub async fn lookup(&self, document_number: &str) -> Result<RegistryRecord> {
    let req = self
      .client
      .get(self.url("/registry/lookup"))
      .query(&[("document_number", document_number)]);
    self.send("GET /registry/lookup", req).await
  }

  /// `GET /api/summary`
  pub async fn summary(&self) -> Result<StatusSummary> {
    let req = self.client.get(self.url("/summary"));
    self.send("GET /summary", req).await
  }
}

async fn decode<T: DeserializeOwned>(what: &str, resp: Response) -> Result<T> {
  let status = resp.status();
  if status.is_success() {
    return resp
      .json()
      .await
      .with_context(|| format!("deserialising {what} response"));
  }

  let text = resp.text().await.unwrap_or_default();
  match serde_json::from_str::<ErrorBody>(&text) {
    Ok(body) => {
      let hint = if body.retryable { "; retrying may help" } else { "" };
      Err(anyhow!("{what} → {status}: {} [{}{hint}]", body.error, body.kind))
    }
    Err(_) => Err(anyhow!("{what} → {status}: {text}")),
  }
}

#[cfg(test)]
mod tests {
  use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::get,
  };

  use super::*;

  async fn summary(headers: HeaderMap) -> axum::response::Response {
    if headers.get(header::AUTHORIZATION).is_none() {
      return (
        StatusCode::UNAUTHORIZED,
        Json(json!({
          "error": "reviewer credentials required",
          "kind": "unauthorized",
          "retryable": false,
        })),
      )
        .into_response();
    }
    Json(StatusSummary { total: 3, verified: 2, mismatch: 1, ..Default::default() })
      .into_response()
  }

  async fn fake_server() -> String {
    let app = Router::new()
      .route("/api/summary", get(summary))
      .route("/api/candidates", get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}/")
  }

  fn client(base_url: String, username: &str) -> ApiClient {
    ApiClient::new(ApiConfig {
      base_url,
      username: username.into(),
      password: "secret".into(),
    })
    .unwrap()
  }

  #[tokio::test]
  async fn credentials_are_sent_when_configured() {
    let base = fake_server().await;
    let summary = client(base, "reviewer").summary().await.unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.verified, 2);
  }

  #[tokio::test]
  async fn json_error_bodies_are_surfaced() {
    let base = fake_server().await;
    let err = client(base, "").summary().await.unwrap_err().to_string();
    assert!(err.contains("401"), "{err}");
    assert!(err.contains("reviewer credentials required"), "{err}");
    assert!(err.contains("[unauthorized]"), "{err}");
  }

  #[tokio::test]
  async fn plain_error_bodies_are_surfaced() {
    let base = fake_server().await;
    let err = client(base, "").list(None).await.unwrap_err().to_string();
    assert!(err.contains("502"), "{err}");
    assert!(err.contains("upstream down"), "{err}");
  }
}
