//! Engine performance scoring.
//!
//! The score is a pure function of the sample sequence and the
//! disturbance windows: consecutive-sample vibration deltas above the
//! spike threshold count as spikes, spikes falling inside a known
//! disturbance window are explained away, and every unexplained spike
//! costs ten points off a perfect 100.

use serde::{Deserialize, Serialize};

use crate::telemetry::{DisturbanceWindow, VibrationSample};

/// Consecutive-sample delta above which a pair counts as a spike.
///
/// The comparison is strict; a delta of exactly 10.0 is not a spike.
pub const SPIKE_THRESHOLD: f64 = 10.0;

/// Points deducted per unexplained spike.
const SPIKE_PENALTY: i64 = 10;

/// The score reported when there is nothing to hold against the engine.
const HEALTHY_SCORE: u8 = 100;

/// The outcome of scoring one sample sequence.
///
/// Carries the bounded score plus the spike counts the dashboard
/// widgets break out. Same inputs always produce the same outcome;
/// nothing is retained between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceScore {
    /// Engine health score in `0..=100`.
    pub value: u8,
    /// Number of consecutive-sample deltas above the threshold.
    pub total_spikes: u32,
    /// Spikes whose timestamp fell inside a disturbance window.
    pub explained_spikes: u32,
}

impl PerformanceScore {
    /// The score for a sequence with nothing wrong in it.
    #[must_use]
    pub fn healthy() -> Self {
        Self {
            value: HEALTHY_SCORE,
            total_spikes: 0,
            explained_spikes: 0,
        }
    }

    /// Spikes no disturbance window accounted for.
    #[must_use]
    pub fn unexplained_spikes(&self) -> u32 {
        self.total_spikes - self.explained_spikes
    }

    /// Check whether the score is a perfect 100.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.value == HEALTHY_SCORE
    }
}

impl std::fmt::Display for PerformanceScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/100", self.value)
    }
}

/// Score a sample sequence against a set of disturbance windows.
///
/// The sequence is assumed already ordered ascending by time. Fewer
/// than two samples means no pair to examine, which reports as healthy;
/// a caller with no valid data sees 100, not an error. A sequence that
/// produced pairs but no spikes also reports healthy, as its own named
/// state rather than as a coincidence of the arithmetic.
///
/// A spike is explained when at least one window contains the *later*
/// timestamp of the pair; a long disturbance must cover the moment the
/// spike registered, not the moment before it. NaN axis values poison
/// their deltas into NaN, and a NaN delta is never a spike.
#[must_use]
pub fn score_samples(
    samples: &[VibrationSample],
    windows: &[DisturbanceWindow],
) -> PerformanceScore {
    if samples.len() < 2 {
        return PerformanceScore::healthy();
    }

    let mut total_spikes: u32 = 0;
    let mut explained_spikes: u32 = 0;

    for pair in samples.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        let delta = curr.delta_from(prev);

        if delta > SPIKE_THRESHOLD {
            total_spikes += 1;
            if windows.iter().any(|w| w.contains(curr.time)) {
                explained_spikes += 1;
            }
        }
    }

    if total_spikes == 0 {
        return PerformanceScore::healthy();
    }

    let unexplained = i64::from(total_spikes - explained_spikes);
    let value = (i64::from(HEALTHY_SCORE) - unexplained * SPIKE_PENALTY).max(0);

    PerformanceScore {
        // value is clamped to 0..=100 above
        value: u8::try_from(value).unwrap_or(HEALTHY_SCORE),
        total_spikes,
        explained_spikes,
    }
}
