//! [`GeminiExtractor`]: document field extraction through the Gemini
//! `generateContent` API.
//!
//! The uploaded file is sent inline (base64) together with a fixed prompt and
//! a response schema, so the model answers with a JSON object of the form
//! `{"name": ..., "dob": ..., "aadhaarNumber": ...}`.

use std::time::Duration;

use base64::Engine as _;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;
use vouch_core::collab::{CollabError, DocumentExtractor, ExtractedDocument};

use crate::{
  Result,
  error::{check_base_url, classify, status_error},
};

pub const DEFAULT_ENDPOINT: &str =
  "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const PROMPT: &str = "Extract the Name, Date of Birth (YYYY-MM-DD format), \
                      and Aadhaar Number from this ID document. If it is an \
                      Aadhaar card, extract the 12 digit number.";

pub struct GeminiExtractor {
  client:   reqwest::Client,
  api_key:  String,
  model:    String,
  endpoint: String,
  timeout:  Duration,
}

impl GeminiExtractor {
  pub fn new(
    api_key: &str,
    model: &str,
    endpoint: &str,
    timeout: Duration,
  ) -> Result<Self> {
    let endpoint = check_base_url(endpoint)?;
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(Self {
      client,
      api_key: api_key.to_string(),
      model: model.to_string(),
      endpoint,
      timeout,
    })
  }

  fn url(&self) -> String {
    format!("{}/models/{}:generateContent", self.endpoint, self.model)
  }
}

/// Build the `generateContent` request body.
fn request_body(content: &[u8], media_type: &str) -> Value {
  let mime = media_type.split(';').next().unwrap_or(media_type).trim();
  json!({
    "contents": [{
      "parts": [
        {
          "inlineData": {
            "mimeType": mime,
            "data": base64::engine::general_purpose::STANDARD.encode(content),
          }
        },
        { "text": PROMPT },
      ]
    }],
    "generationConfig": {
      "responseMimeType": "application/json",
      "responseSchema": {
        "type": "OBJECT",
        "properties": {
          "name": { "type": "STRING" },
          "dob": { "type": "STRING" },
          "aadhaarNumber": { "type": "STRING" },
        },
        "required": ["name", "dob", "aadhaarNumber"],
      },
    },
  })
}

// ─── Response ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
  #[serde(default)]
  candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
  content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
  #[serde(default)]
  parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
  text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExtractedFields {
  #[serde(default)]
  name:            String,
  #[serde(default)]
  dob:             String,
  #[serde(default, rename = "aadhaarNumber")]
  document_number: String,
}

fn parse_response(
  resp: GenerateResponse,
) -> std::result::Result<ExtractedDocument, CollabError> {
  let text = resp
    .candidates
    .into_iter()
    .filter_map(|c| c.content)
    .flat_map(|c| c.parts)
    .find_map(|p| p.text)
    .filter(|t| !t.trim().is_empty())
    .ok_or_else(|| {
      CollabError::Unreadable("model returned no extraction".into())
    })?;

  let fields: ExtractedFields = serde_json::from_str(&text).map_err(|e| {
    CollabError::Protocol(format!("model returned invalid JSON: {e}"))
  })?;

  Ok(ExtractedDocument {
    name:            fields.name.trim().to_string(),
    dob:             fields.dob.trim().to_string(),
    document_number: fields.document_number.trim().to_string(),
  })
}

impl DocumentExtractor for GeminiExtractor {
  async fn extract(
    &self,
    content: &[u8],
    media_type: &str,
  ) -> std::result::Result<ExtractedDocument, CollabError> {
    debug!(model = %self.model, bytes = content.len(), "requesting extraction");

    let resp = self
      .client
      .post(self.url())
      .header("x-goog-api-key", &self.api_key)
      .json(&request_body(content, media_type))
      .send()
      .await
      .map_err(|e| classify(e, self.timeout))?;

    let status = resp.status();
    if status == StatusCode::BAD_REQUEST {
      // The API rejects images it cannot decode with a 400.
      let body = resp.text().await.unwrap_or_default();
      return Err(CollabError::Unreadable(body));
    }
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(status_error("extraction model", status, body));
    }

    let body: GenerateResponse =
      resp.json().await.map_err(|e| classify(e, self.timeout))?;
    parse_response(body)
  }
}
