//! Storage layer for autoinsight.
//!
//! This module provides `SQLite`-based persistent storage for scored
//! journeys and the single sealed profile blob, including journey
//! deduplication, aggregate stats for the analytics surface, and
//! pruning of old history.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::journey::Journey;
use crate::telemetry::PerformanceScore;

/// Storage engine for journeys and the sealed profile.
///
/// Provides persistent storage using `SQLite` with support for:
/// - Journey insertion with raw-data deduplication
/// - Recent-journey listing and aggregate stats
/// - Automatic pruning of old entries
/// - A single sealed profile row (opaque to storage)
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // Enable WAL mode for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a journey into storage.
    ///
    /// Returns the assigned ID, or `None` if the journey was deduplicated
    /// (i.e., the same raw dataset was already scored).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert_journey(&self, journey: &Journey) -> Result<Option<i64>> {
        if self.exists_by_hash(&journey.source_hash)? {
            debug!(
                "Skipping duplicate journey with hash {}",
                &journey.source_hash[..16]
            );
            return Ok(None);
        }

        self.conn.execute(
            r"
            INSERT INTO journeys
                (recorded_at, source, source_hash, sample_count,
                 total_spikes, explained_spikes, score)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
            params![
                journey.recorded_at.to_rfc3339(),
                journey.source,
                journey.source_hash,
                i64::from(journey.sample_count),
                i64::from(journey.score.total_spikes),
                i64::from(journey.score.explained_spikes),
                i64::from(journey.score.value),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted journey with id {}", id);
        Ok(Some(id))
    }

    /// Check if a journey with the given raw-data hash already exists.
    fn exists_by_hash(&self, hash: &str) -> Result<bool> {
        let count: i32 = self.conn.query_row(
            "SELECT COUNT(*) FROM journeys WHERE source_hash = ?1",
            [hash],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Get a journey by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_journey(&self, id: i64) -> Result<Option<Journey>> {
        let result = self
            .conn
            .query_row(
                r"
                SELECT id, recorded_at, source, source_hash, sample_count,
                       total_spikes, explained_spikes, score
                FROM journeys WHERE id = ?1
                ",
                [id],
                Self::row_to_journey,
            )
            .optional()?;
        Ok(result)
    }

    /// Get the most recently scored journeys.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn recent_journeys(&self, limit: usize) -> Result<Vec<Journey>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, recorded_at, source, source_hash, sample_count,
                   total_spikes, explained_spikes, score
            FROM journeys ORDER BY recorded_at DESC LIMIT ?1
            ",
        )?;

        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let journeys = stmt
            .query_map([limit_i64], Self::row_to_journey)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(journeys)
    }

    /// Count total journeys in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count_journeys(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM journeys", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Prune journeys older than the given duration.
    ///
    /// Returns the number of journeys deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn prune_older_than(&self, max_age: Duration) -> Result<usize> {
        let cutoff = (Utc::now() - max_age).to_rfc3339();

        let affected = self
            .conn
            .execute("DELETE FROM journeys WHERE recorded_at < ?1", [cutoff])?;

        if affected > 0 {
            info!("Pruned {} old journeys", affected);
        }
        Ok(affected)
    }

    /// Prune journeys to keep only the most recent N entries.
    ///
    /// Returns the number of journeys deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn prune_keep_recent(&self, keep_count: usize) -> Result<usize> {
        let keep_i64 = i64::try_from(keep_count).unwrap_or(i64::MAX);
        let affected = self.conn.execute(
            r"
            DELETE FROM journeys WHERE id NOT IN (
                SELECT id FROM journeys ORDER BY recorded_at DESC LIMIT ?1
            )
            ",
            [keep_i64],
        )?;

        if affected > 0 {
            info!("Pruned {} journeys to keep {} recent", affected, keep_count);
        }
        Ok(affected)
    }

    /// Get aggregate journey statistics for the analytics surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn journey_stats(&self) -> Result<JourneyStats> {
        let total_journeys = self.count_journeys()?;

        if total_journeys == 0 {
            return Ok(JourneyStats {
                total_journeys: 0,
                average_score: None,
                best_score: None,
                worst_score: None,
                newest_journey: None,
            });
        }

        let (average, best, worst): (f64, i64, i64) = self.conn.query_row(
            "SELECT AVG(score), MAX(score), MIN(score) FROM journeys",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        let newest: Option<String> = self
            .conn
            .query_row(
                "SELECT recorded_at FROM journeys ORDER BY recorded_at DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        let newest_journey = newest
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(JourneyStats {
            total_journeys,
            average_score: Some(average),
            best_score: u8::try_from(best).ok(),
            worst_score: u8::try_from(worst).ok(),
            newest_journey,
        })
    }

    /// Store the sealed profile blob, replacing any previous one.
    ///
    /// The blob is opaque to storage; sealing happens in the vault.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn store_sealed_profile(&self, sealed: &str) -> Result<()> {
        self.conn.execute(
            r"
            INSERT INTO profile (id, sealed, updated_at) VALUES (1, ?1, ?2)
            ON CONFLICT(id) DO UPDATE SET sealed = ?1, updated_at = ?2
            ",
            params![sealed, Utc::now().to_rfc3339()],
        )?;
        debug!("Stored sealed profile");
        Ok(())
    }

    /// Load the sealed profile blob, if one has been stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn load_sealed_profile(&self) -> Result<Option<String>> {
        let sealed = self
            .conn
            .query_row("SELECT sealed FROM profile WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(sealed)
    }

    /// Delete the stored profile.
    ///
    /// Returns `true` if a profile was deleted, `false` if none was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn clear_profile(&self) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM profile WHERE id = 1", [])?;
        Ok(affected > 0)
    }

    /// Convert a database row to a Journey struct.
    fn row_to_journey(row: &rusqlite::Row) -> rusqlite::Result<Journey> {
        let id: i64 = row.get(0)?;
        let recorded_at_str: String = row.get(1)?;
        let source: String = row.get(2)?;
        let source_hash: String = row.get(3)?;
        let sample_count: i64 = row.get(4)?;
        let total_spikes: i64 = row.get(5)?;
        let explained_spikes: i64 = row.get(6)?;
        let score: i64 = row.get(7)?;

        let recorded_at = DateTime::parse_from_rfc3339(&recorded_at_str)
            .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

        Ok(Journey {
            id: Some(id),
            recorded_at,
            source,
            source_hash,
            sample_count: u32::try_from(sample_count).unwrap_or(0),
            score: PerformanceScore {
                value: u8::try_from(score).unwrap_or(0),
                total_spikes: u32::try_from(total_spikes).unwrap_or(0),
                explained_spikes: u32::try_from(explained_spikes).unwrap_or(0),
            },
        })
    }
}

/// Aggregate statistics over the stored journeys.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct JourneyStats {
    /// Total number of journeys stored.
    pub total_journeys: i64,
    /// Mean score across all journeys.
    pub average_score: Option<f64>,
    /// Best (highest) score seen.
    pub best_score: Option<u8>,
    /// Worst (lowest) score seen.
    pub worst_score: Option<u8>,
    /// Timestamp of the most recent journey.
    pub newest_journey: Option<DateTime<Utc>>,
}
