//! Scored journey records.
//!
//! A journey is one scored ingest run: where the samples came from,
//! when they were scored, and what the detector concluded. The raw
//! samples themselves are discarded after scoring; only the blake3 hash
//! of the raw text survives, for deduplicating re-scored datasets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::telemetry::PerformanceScore;

/// One scored journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journey {
    /// Unique identifier for this journey (assigned by storage layer).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// When this journey was scored.
    pub recorded_at: DateTime<Utc>,

    /// Where the raw samples came from (a path or source label).
    pub source: String,

    /// BLAKE3 hash of the raw sample text, for deduplication.
    pub source_hash: String,

    /// Number of samples that survived parsing.
    pub sample_count: u32,

    /// What the spike detector concluded.
    pub score: PerformanceScore,
}

impl Journey {
    /// Create a new journey record from a scoring run.
    ///
    /// Computes the dedup hash from the raw sample text and stamps the
    /// record with the current time.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        raw_samples: &str,
        sample_count: u32,
        score: PerformanceScore,
    ) -> Self {
        Self {
            id: None,
            recorded_at: Utc::now(),
            source: source.into(),
            source_hash: Self::compute_hash(raw_samples),
            sample_count,
            score,
        }
    }

    /// Compute the BLAKE3 hash of raw sample text.
    #[must_use]
    pub fn compute_hash(raw: &str) -> String {
        blake3::hash(raw.as_bytes()).to_hex().to_string()
    }

    /// Check if this journey was scored from the given raw text.
    #[must_use]
    pub fn matches_hash(&self, hash: &str) -> bool {
        self.source_hash == hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "Time,X,Y,Z\n0,0.0,0.0,0.0\n1,20.0,0.0,0.0\n";

    fn sample_score() -> PerformanceScore {
        PerformanceScore {
            value: 90,
            total_spikes: 1,
            explained_spikes: 0,
        }
    }

    #[test]
    fn test_journey_new() {
        let journey = Journey::new("morning-run.csv", RAW, 2, sample_score());

        assert!(journey.id.is_none());
        assert_eq!(journey.source, "morning-run.csv");
        assert_eq!(journey.sample_count, 2);
        assert_eq!(journey.score.value, 90);
        assert!(!journey.source_hash.is_empty());
    }

    #[test]
    fn test_hash_consistency() {
        let hash1 = Journey::compute_hash(RAW);
        let hash2 = Journey::compute_hash(RAW);
        assert_eq!(hash1, hash2);

        let different = Journey::compute_hash("Time,X,Y,Z\n");
        assert_ne!(hash1, different);
    }

    #[test]
    fn test_matches_hash() {
        let journey = Journey::new("run.csv", RAW, 2, sample_score());
        assert!(journey.matches_hash(&Journey::compute_hash(RAW)));
        assert!(!journey.matches_hash("something else"));
    }

    #[test]
    fn test_journey_serialization() {
        let journey = Journey::new("run.csv", RAW, 2, sample_score());
        let json = serde_json::to_string(&journey).unwrap();
        let back: Journey = serde_json::from_str(&json).unwrap();

        assert_eq!(journey.source, back.source);
        assert_eq!(journey.source_hash, back.source_hash);
        assert_eq!(journey.score, back.score);
        // id is None, so it is omitted from the JSON entirely
        assert!(!json.contains("\"id\""));
    }
}
