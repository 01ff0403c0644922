//! SQL schema for the Ludz SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS participants (
    participant_id TEXT PRIMARY KEY,
    name           TEXT NOT NULL UNIQUE,
    codename       TEXT NOT NULL UNIQUE,
    created_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS pubs (
    pub_id     TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Duplicate rule texts are allowed.
CREATE TABLE IF NOT EXISTS pub_rules (
    seq         INTEGER PRIMARY KEY AUTOINCREMENT,
    rule_id     TEXT NOT NULL UNIQUE,
    pub_id      TEXT NOT NULL REFERENCES pubs(pub_id),
    text        TEXT NOT NULL,
    recorded_at TEXT NOT NULL
);

-- The ledger. Strictly append-only: no UPDATE or DELETE is ever issued
-- against this table. `seq` fixes append order.
CREATE TABLE IF NOT EXISTS events (
    seq            INTEGER PRIMARY KEY AUTOINCREMENT,
    event_id       TEXT NOT NULL UNIQUE,
    participant_id TEXT NOT NULL REFERENCES participants(participant_id),
    pub_id         TEXT REFERENCES pubs(pub_id),
    kind           TEXT NOT NULL,   -- 'challenge' | 'forfeit'
    tier           INTEGER,         -- 1..3 for forfeits, NULL for challenges
    description    TEXT NOT NULL,
    recorded_at    TEXT NOT NULL,
    CHECK ((kind = 'forfeit') = (tier IS NOT NULL)),
    CHECK (tier IS NULL OR tier BETWEEN 1 AND 3)
);

-- The only table that sees UPDATEs.
CREATE TABLE IF NOT EXISTS easter_eggs (
    name   TEXT PRIMARY KEY,
    solved INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS events_participant_idx ON events(participant_id);
CREATE INDEX IF NOT EXISTS events_pub_idx         ON events(pub_id);
CREATE INDEX IF NOT EXISTS pub_rules_pub_idx      ON pub_rules(pub_id);

PRAGMA user_version = 1;
";
