//! [`HttpRegistry`]: a JSON-over-HTTP identity registry client.
//!
//! The registry exposes a single endpoint:
//!
//! ```text
//! GET {base_url}/lookup?document_number=<number>
//! ```
//!
//! A `404` or a body with `"found": false` means the registry has no record.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;
use vouch_core::collab::{CollabError, KycStatus, RegistryLookup, RegistryRecord};

use crate::{
  Result,
  error::{check_base_url, classify, status_error},
};

pub struct HttpRegistry {
  client:   reqwest::Client,
  base_url: String,
  timeout:  Duration,
}

impl HttpRegistry {
  pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
    let base_url = check_base_url(base_url)?;
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(Self { client, base_url, timeout })
  }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
  found:       bool,
  #[serde(default)]
  registry_id: Option<String>,
  #[serde(default)]
  name:        Option<String>,
  #[serde(default)]
  dob:         Option<String>,
  #[serde(default)]
  kyc_status:  Option<KycStatus>,
}

impl From<LookupResponse> for RegistryRecord {
  fn from(r: LookupResponse) -> Self {
    if !r.found {
      return RegistryRecord::NotFound;
    }
    RegistryRecord::Found {
      registry_id: r.registry_id,
      name:        r.name,
      dob:         r.dob,
      kyc:         r.kyc_status,
    }
  }
}

impl RegistryLookup for HttpRegistry {
  async fn lookup(
    &self,
    document_number: &str,
  ) -> std::result::Result<RegistryRecord, CollabError> {
    let url = format!("{}/lookup", self.base_url);
    debug!(%url, "querying registry");

    let resp = self
      .client
      .get(&url)
      .query(&[("document_number", document_number)])
      .send()
      .await
      .map_err(|e| classify(e, self.timeout))?;

    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
      return Ok(RegistryRecord::NotFound);
    }
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(status_error("registry", status, body));
    }

    let body: LookupResponse =
      resp.json().await.map_err(|e| classify(e, self.timeout))?;
    Ok(body.into())
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use axum::{
    Json, Router,
    extract::Query,
    http::StatusCode as AxumStatus,
    response::{IntoResponse, Response},
    routing::get,
  };
  use serde_json::json;

  use super::*;

  async fn lookup_handler(
    Query(params): Query<HashMap<String, String>>,
  ) -> Response {
    match params.get("document_number").map(String::as_str) {
      Some("123412341234") => Json(json!({
        "found": true,
        "registry_id": "100900900123",
        "name": "Rahul Sharma",
        "dob": "1990-05-15",
        "kyc_status": "verified",
      }))
      .into_response(),
      Some("000000000000") => Json(json!({ "found": false })).into_response(),
      Some("500500500500") => {
        (AxumStatus::SERVICE_UNAVAILABLE, "maintenance").into_response()
      }
      Some("777777777777") => {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Json(json!({ "found": false })).into_response()
      }
      Some("888888888888") => (AxumStatus::OK, "not json").into_response(),
      _ => AxumStatus::NOT_FOUND.into_response(),
    }
  }

  /// Serve a fake registry on an ephemeral port and return its base URL.
  async fn fake_registry() -> String {
    let app = Router::new().route("/lookup", get(lookup_handler));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}")
  }

  fn client(base_url: &str) -> HttpRegistry {
    HttpRegistry::new(base_url, Duration::from_millis(500)).unwrap()
  }

  #[tokio::test]
  async fn found_record_is_mapped() {
    let registry = client(&fake_registry().await);
    let record = registry.lookup("123412341234").await.unwrap();
    assert_eq!(record, RegistryRecord::Found {
      registry_id: Some("100900900123".into()),
      name:        Some("Rahul Sharma".into()),
      dob:         Some("1990-05-15".into()),
      kyc:         Some(KycStatus::Verified),
    });
  }

  #[tokio::test]
  async fn not_found_body_and_404_both_mean_no_record() {
    let registry = client(&fake_registry().await);
    assert_eq!(
      registry.lookup("000000000000").await.unwrap(),
      RegistryRecord::NotFound
    );
    assert_eq!(
      registry.lookup("424242424242").await.unwrap(),
      RegistryRecord::NotFound
    );
  }

  #[tokio::test]
  async fn server_error_is_unavailable() {
    let registry = client(&fake_registry().await);
    let err = registry.lookup("500500500500").await.unwrap_err();
    assert!(matches!(err, CollabError::Unavailable(ref m) if m.contains("maintenance")));
  }

  #[tokio::test]
  async fn slow_registry_times_out() {
    let registry = client(&fake_registry().await);
    let err = registry.lookup("777777777777").await.unwrap_err();
    assert!(err.is_timeout());
  }

  #[tokio::test]
  async fn malformed_body_is_a_protocol_error() {
    let registry = client(&fake_registry().await);
    let err = registry.lookup("888888888888").await.unwrap_err();
    assert!(matches!(err, CollabError::Protocol(_)));
  }

  #[tokio::test]
  async fn unreachable_registry_is_unavailable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let registry = client(&format!("http://{addr}"));
    let err = registry.lookup("123412341234").await.unwrap_err();
    assert!(matches!(err, CollabError::Unavailable(_)));
  }

  #[test]
  fn trailing_slash_is_trimmed() {
    let registry = HttpRegistry::new("http://registry.local/", Duration::from_secs(1)).unwrap();
    assert_eq!(registry.base_url, "http://registry.local");
  }
}
