//! SQL schema for the Cadre SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// The supervisor relation is stored once, on the subordinate's row. A
/// record's `subordinates` list is read back as the rows pointing at it,
/// ordered by `link_seq`, so the two sides cannot disagree.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS staff (
    staff_id      TEXT PRIMARY KEY,
    name          TEXT NOT NULL UNIQUE,
    join_date     TEXT NOT NULL,                 -- ISO 8601 UTC
    base_salary   REAL NOT NULL CHECK (base_salary >= 0),
    role          TEXT NOT NULL DEFAULT 'employee',
    supervisor_id TEXT REFERENCES staff(staff_id) ON DELETE SET NULL,
    link_seq      INTEGER NOT NULL DEFAULT 0,    -- position in supervisor's list
    CHECK (supervisor_id IS NULL OR supervisor_id != staff_id)
);

CREATE INDEX IF NOT EXISTS staff_role_idx       ON staff(role);
CREATE INDEX IF NOT EXISTS staff_supervisor_idx ON staff(supervisor_id, link_seq);

PRAGMA user_version = 1;
";
