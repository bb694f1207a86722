//! `SQLite` schema definitions for autoinsight.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the journeys table.
pub const CREATE_JOURNEYS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS journeys (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    recorded_at TEXT NOT NULL,
    source TEXT NOT NULL,
    source_hash TEXT NOT NULL,
    sample_count INTEGER NOT NULL,
    total_spikes INTEGER NOT NULL,
    explained_spikes INTEGER NOT NULL,
    score INTEGER NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create an index on `recorded_at` for listing.
pub const CREATE_RECORDED_AT_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_journeys_recorded_at ON journeys(recorded_at DESC)
";

/// SQL statement to create an index on `source_hash` for deduplication.
pub const CREATE_HASH_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_journeys_hash ON journeys(source_hash)
";

/// SQL statement to create an index on `score` for stats queries.
pub const CREATE_SCORE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_journeys_score ON journeys(score)
";

/// SQL statement to create the single-row sealed profile table.
///
/// The profile is stored exactly as the vault sealed it; storage never
/// sees plaintext profile data.
pub const CREATE_PROFILE_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS profile (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    sealed TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_JOURNEYS_TABLE,
    CREATE_RECORDED_AT_INDEX,
    CREATE_HASH_INDEX,
    CREATE_SCORE_INDEX,
    CREATE_PROFILE_TABLE,
    CREATE_METADATA_TABLE,
];
