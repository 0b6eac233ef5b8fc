//! SQL schema for the Vouch SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Rows are never deleted. The only UPDATE ever issued sets registry_status
-- and reviewed_at, and only while reviewed_at IS NULL.
CREATE TABLE IF NOT EXISTS candidates (
    seq              INTEGER PRIMARY KEY AUTOINCREMENT,  -- insertion order
    candidate_id     TEXT NOT NULL UNIQUE,
    name             TEXT NOT NULL,
    dob              TEXT NOT NULL,
    document_number  TEXT NOT NULL,
    document_status  TEXT NOT NULL,   -- VerificationStatus, snake_case
    registry_status  TEXT NOT NULL,   -- VerificationStatus, snake_case
    registry_id      TEXT,
    confidence       REAL,
    submitted_at     TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    discrepancies    TEXT NOT NULL DEFAULT '[]',
    reviewed_at      TEXT
);

CREATE INDEX IF NOT EXISTS candidates_status_idx ON candidates(registry_status);

PRAGMA user_version = 1;
";
