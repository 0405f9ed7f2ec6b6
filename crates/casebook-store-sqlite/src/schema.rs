//! SQL schema for the Casebook SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- AUTOINCREMENT keeps deleted ids from ever being handed out again.
CREATE TABLE IF NOT EXISTS cases (
    case_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    name     TEXT NOT NULL UNIQUE,   -- case-sensitive (BINARY collation)
    note     TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS subscriptions (
    case_id   INTEGER NOT NULL REFERENCES cases(case_id) ON DELETE CASCADE,
    position  INTEGER NOT NULL,          -- order within the case
    entity_id TEXT    NOT NULL,
    events    TEXT    NOT NULL DEFAULT '[]',  -- JSON array of event names
    PRIMARY KEY (case_id, position),
    UNIQUE (case_id, entity_id)
);

PRAGMA user_version = 1;
";

/// Empties both tables and rewinds the id counter.
pub const TEAR_DOWN: &str = "
DELETE FROM subscriptions;
DELETE FROM cases;
DELETE FROM sqlite_sequence WHERE name = 'cases';
";
