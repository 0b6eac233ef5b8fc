//! `vouch`: command-line client for the Vouch verification service.
//!
//! # Usage
//!
//! ```text
//! vouch verify aadhaar.jpg
//! vouch --url http://localhost:8080 --user reviewer --password secret list --status mismatch
//! vouch --config ~/.config/vouch/config.toml review <id> verified
//! ```

mod client;
mod output;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;
use vouch_core::{candidate::VerificationStatus, service::Submission};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "vouch", about = "Client for the Vouch verification service")]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the Vouch server (default: http://localhost:8080).
  #[arg(long, env = "VOUCH_URL")]
  url: Option<String>,

  /// Reviewer username.
  #[arg(long, env = "VOUCH_USER")]
  user: Option<String>,

  /// Reviewer password (plaintext).
  #[arg(long, env = "VOUCH_PASSWORD")]
  password: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Read identity fields off a document without submitting.
  Extract(DocumentArgs),

  /// Extract a document and submit the fields it contains.
  Verify(DocumentArgs),

  /// Submit identity fields entered by hand.
  Submit {
    #[arg(long)]
    name:            String,
    #[arg(long)]
    dob:             String,
    #[arg(long)]
    document_number: String,
    /// Confidence in the entered fields, between 0 and 1.
    #[arg(long)]
    confidence:      Option<f64>,
  },

  /// List candidates, most recent first.
  List {
    #[arg(long, value_parser = parse_status)]
    status: Option<VerificationStatus>,
  },

  /// Show one candidate.
  Show { id: Uuid },

  /// Override a candidate's registry status (allowed once).
  Review {
    id:     Uuid,
    #[arg(value_parser = parse_status)]
    status: VerificationStatus,
  },

  /// Query the registry directly.
  Lookup { document_number: String },

  /// Dashboard counters.
  Summary,
}

#[derive(clap::Args, Debug)]
struct DocumentArgs {
  /// Image, PDF or XML file.
  file:       PathBuf,
  /// Media type; guessed from the file extension when omitted.
  #[arg(long)]
  media_type: Option<String>,
}

fn parse_status(s: &str) -> Result<VerificationStatus, String> {
  s.parse().map_err(|_| {
    format!("unknown status {s:?}; expected pending, verified, mismatch, no_record or rejected")
  })
}

/// Guess a document's media type from its extension.
fn guess_media_type(path: &Path) -> Option<&'static str> {
  let ext = path.extension()?.to_str()?.to_ascii_lowercase();
  Some(match ext.as_str() {
    "jpg" | "jpeg" => "image/jpeg",
    "png" => "image/png",
    "webp" => "image/webp",
    "gif" => "image/gif",
    "heic" => "image/heic",
    "pdf" => "application/pdf",
    "xml" => "application/xml",
    _ => return None,
  })
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

fn api_config(args: &Args) -> Result<ApiConfig> {
  let file_cfg: ConfigFile = match &args.config {
    Some(path) => {
      let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
      toml::from_str(&raw).context("parsing config file")?
    }
    None => ConfigFile::default(),
  };

  // CLI flags override config file, which overrides defaults.
  let pick = |flag: &Option<String>, file: &str| {
    flag
      .clone()
      .or_else(|| (!file.is_empty()).then(|| file.to_string()))
  };
  Ok(ApiConfig {
    base_url: pick(&args.url, &file_cfg.url)
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
    username: pick(&args.user, &file_cfg.username).unwrap_or_default(),
    password: pick(&args.password, &file_cfg.password).unwrap_or_default(),
  })
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();
  let client = ApiClient::new(api_config(&args)?)?;

  let text = match args.command {
    Command::Extract(doc) => {
      let (content, media_type) = read_document(&doc)?;
      output::extracted(&client.extract(content, &media_type).await?)
    }
    Command::Verify(doc) => {
      let (content, media_type) = read_document(&doc)?;
      let extracted = client.extract(content, &media_type).await?;
      let candidate = client
        .submit(&Submission {
          name:              extracted.name,
          dob:               extracted.dob,
          document_number:   extracted.document_number,
          confidence:        None,
          document_verified: true,
        })
        .await?;
      output::candidate_detail(&candidate)
    }
    Command::Submit { name, dob, document_number, confidence } => {
      let candidate = client
        .submit(&Submission {
          name,
          dob,
          document_number,
          confidence,
          document_verified: false,
        })
        .await?;
      output::candidate_detail(&candidate)
    }
    Command::List { status } => output::candidate_table(&client.list(status).await?),
    Command::Show { id } => output::candidate_detail(&client.get(id).await?),
    Command::Review { id, status } => {
      output::candidate_detail(&client.review(id, status).await?)
    }
    Command::Lookup { document_number } => {
      output::registry_record(&client.lookup(&document_number).await?)
    }
    Command::Summary => output::summary(&client.summary().await?),
  };

  print!("{text}");
  Ok(())
}

fn read_document(doc: &DocumentArgs) -> Result<(Vec<u8>, String)> {
  let media_type = match &doc.media_type {
    Some(m) => m.clone(),
    None => match guess_media_type(&doc.file) {
      Some(m) => m.to_string(),
      None => bail!(
        "cannot guess the media type of {}; pass --media-type",
        doc.file.display()
      ),
    },
  };
  let content = std::fs::read(&doc.file)
    .with_context(|| format!("reading {}", doc.file.display()))?;
  Ok((content, media_type))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn media_types_from_extensions() {
    assert_eq!(guess_media_type(Path::new("scan.JPG")), Some("image/jpeg"));
    assert_eq!(guess_media_type(Path::new("card.pdf")), Some("application/pdf"));
    assert_eq!(guess_media_type(Path::new("offline.xml")), Some("application/xml"));
    assert_eq!(guess_media_type(Path::new("notes.txt")), None);
    assert_eq!(guess_media_type(Path::new("no_extension")), None);
  }

  #[test]
  fn status_argument_parsing() {
    assert_eq!(parse_status("no_record"), Ok(VerificationStatus::NoRecord));
    assert!(parse_status("approved").is_err());
  }

  #[test]
  fn flags_override_defaults() {
    let args = Args::parse_from(["vouch", "--url", "http://vouch.internal", "summary"]);
    let cfg = api_config(&args).unwrap();
    assert_eq!(cfg.base_url, "http://vouch.internal");
    assert!(matches!(args.command, Command::Summary));
  }

  #[test]
  fn review_arguments() {
    let id = Uuid::new_v4();
    let args = Args::parse_from(["vouch", "review", &id.to_string(), "rejected"]);
    match args.command {
      Command::Review { id: parsed, status } => {
        assert_eq!(parsed, id);
        assert_eq!(status, VerificationStatus::Rejected);
      }
      other => panic!("unexpected command {other:?}"),
    }
  }
}
