//! SQL schema for the Soiree SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS guests (
    guest_id      TEXT PRIMARY KEY,
    name          TEXT NOT NULL CHECK (length(trim(name)) > 0),
    number        TEXT,            -- free-text phone number
    checked_in_at TEXT,            -- RFC 3339 UTC; NULL until first check-in
    created_at    TEXT NOT NULL    -- RFC 3339 UTC; store-assigned
);

CREATE INDEX IF NOT EXISTS guests_checked_in_idx ON guests(checked_in_at);
CREATE INDEX IF NOT EXISTS guests_created_idx    ON guests(created_at);

PRAGMA user_version = 1;
";
