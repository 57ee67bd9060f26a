//! SQL schema for the Tend SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Habits embed their completion log as a JSON array (one entry per date)
-- and cache the derived streak columns next to it. The cache is rewritten
-- on every write that touches `completions`.
CREATE TABLE IF NOT EXISTS habits (
    habit_id        TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    description     TEXT NOT NULL DEFAULT '',
    icon            TEXT NOT NULL,
    color           TEXT NOT NULL,
    category        TEXT NOT NULL DEFAULT 'other',
    frequency       TEXT NOT NULL,   -- JSON Frequency
    target          TEXT NOT NULL,   -- JSON Target
    reminder        TEXT NOT NULL,   -- JSON Reminder
    completions     TEXT NOT NULL DEFAULT '[]',
    streak_current  INTEGER NOT NULL DEFAULT 0,
    streak_longest  INTEGER NOT NULL DEFAULT 0,
    last_completed  TEXT,            -- YYYY-MM-DD or NULL
    is_archived     INTEGER NOT NULL DEFAULT 0,
    start_date      TEXT NOT NULL,   -- YYYY-MM-DD
    sort_order      INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL,   -- ISO 8601 UTC
    updated_at      TEXT NOT NULL
);

-- Goals embed sub-tasks and milestones as JSON arrays; `progress` and
-- `status` are caches of the derivation run on every save.
CREATE TABLE IF NOT EXISTS goals (
    goal_id      TEXT PRIMARY KEY,
    title        TEXT NOT NULL,
    description  TEXT NOT NULL DEFAULT '',
    icon         TEXT NOT NULL,
    color        TEXT NOT NULL,
    category     TEXT NOT NULL DEFAULT 'personal',
    priority     TEXT NOT NULL DEFAULT 'medium',
    status       TEXT NOT NULL DEFAULT 'not_started',
    progress     INTEGER NOT NULL DEFAULT 0,
    start_date   TEXT NOT NULL,
    target_date  TEXT NOT NULL,
    completed_at TEXT,               -- ISO 8601 UTC or NULL
    sub_tasks    TEXT NOT NULL DEFAULT '[]',
    milestones   TEXT NOT NULL DEFAULT '[]',
    notes        TEXT NOT NULL DEFAULT '',
    is_archived  INTEGER NOT NULL DEFAULT 0,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS habits_archived_idx ON habits(is_archived);
CREATE INDEX IF NOT EXISTS habits_category_idx ON habits(category);
CREATE INDEX IF NOT EXISTS goals_archived_idx  ON goals(is_archived);
CREATE INDEX IF NOT EXISTS goals_status_idx    ON goals(status);

PRAGMA user_version = 1;
";
