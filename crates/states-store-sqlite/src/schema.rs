//! SQL schema for the fun-fact SQLite store.
//!
//! Executed once at connection startup. Versioned through
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One document per state. Rows are upserted, never deleted.
CREATE TABLE IF NOT EXISTS funfact_entries (
    state_code  TEXT PRIMARY KEY,            -- uppercase two-letter code
    funfacts    TEXT NOT NULL DEFAULT '[]'   -- JSON array of strings
);

PRAGMA user_version = 1;
";
