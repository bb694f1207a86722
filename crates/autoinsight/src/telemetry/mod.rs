//! Vibration telemetry for autoinsight.
//!
//! This module defines the fundamental data structures for triaxial
//! vibration telemetry: the individual accelerometer sample and the
//! externally supplied disturbance window that can explain a spike.

pub mod ingest;
pub mod scoring;

use serde::{Deserialize, Serialize};

pub use ingest::{fetch_raw_soft, load_samples, parse_samples, FileSource, SampleSource};
pub use scoring::{score_samples, PerformanceScore, SPIKE_THRESHOLD};

/// A single triaxial vibration sample.
///
/// Samples arrive ordered ascending by `time`; nothing downstream
/// re-sorts them. A sample is immutable once parsed and is discarded
/// after scoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VibrationSample {
    /// Epoch-like integer timestamp of the reading.
    pub time: i64,
    /// Acceleration along the X axis.
    pub x: f64,
    /// Acceleration along the Y axis.
    pub y: f64,
    /// Acceleration along the Z axis.
    pub z: f64,
}

impl VibrationSample {
    /// Create a new sample.
    #[must_use]
    pub fn new(time: i64, x: f64, y: f64, z: f64) -> Self {
        Self { time, x, y, z }
    }

    /// Euclidean distance between this sample's axes and `prev`'s.
    ///
    /// If either sample carries a NaN axis the result is NaN, which
    /// compares false against any threshold downstream.
    #[must_use]
    pub fn delta_from(&self, prev: &Self) -> f64 {
        let dx = self.x - prev.x;
        let dy = self.y - prev.y;
        let dz = self.z - prev.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Check whether any axis of this sample is NaN.
    #[must_use]
    pub fn has_invalid_axis(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
}

/// An externally detected disturbance that can explain a vibration spike.
///
/// Windows come from an event-detection collaborator (road irregularity
/// detection in the dashboard app) and are treated as a read-only input
/// set. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisturbanceWindow {
    /// First timestamp covered by the disturbance.
    pub start_time: i64,
    /// Last timestamp covered by the disturbance.
    pub end_time: i64,
}

impl DisturbanceWindow {
    /// Create a new window.
    #[must_use]
    pub fn new(start_time: i64, end_time: i64) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    /// Check whether `time` falls inside this window, bounds included.
    #[must_use]
    pub fn contains(&self, time: i64) -> bool {
        time >= self.start_time && time <= self.end_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_new() {
        let sample = VibrationSample::new(42, 1.0, 2.0, 3.0);
        assert_eq!(sample.time, 42);
        assert!((sample.x - 1.0).abs() < f64::EPSILON);
        assert!((sample.y - 2.0).abs() < f64::EPSILON);
        assert!((sample.z - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_delta_from_single_axis() {
        let prev = VibrationSample::new(0, 0.0, 0.0, 0.0);
        let curr = VibrationSample::new(1, 20.0, 0.0, 0.0);
        assert!((curr.delta_from(&prev) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_delta_from_all_axes() {
        let prev = VibrationSample::new(0, 1.0, 2.0, 2.0);
        let curr = VibrationSample::new(1, 2.0, 4.0, 4.0);
        // sqrt(1 + 4 + 4) = 3
        assert!((curr.delta_from(&prev) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_delta_from_is_symmetric() {
        let a = VibrationSample::new(0, 1.5, -2.5, 0.5);
        let b = VibrationSample::new(1, -0.5, 3.5, 2.5);
        assert!((a.delta_from(&b) - b.delta_from(&a)).abs() < 1e-12);
    }

    #[test]
    fn test_delta_from_nan_propagates() {
        let prev = VibrationSample::new(0, 0.0, 0.0, 0.0);
        let curr = VibrationSample::new(1, f64::NAN, 0.0, 0.0);
        let delta = curr.delta_from(&prev);
        assert!(delta.is_nan());
        // NaN compares false against the threshold, so this pair can never spike
        assert!(!(delta > SPIKE_THRESHOLD));
    }

    #[test]
    fn test_has_invalid_axis() {
        assert!(!VibrationSample::new(0, 0.0, 0.0, 0.0).has_invalid_axis());
        assert!(VibrationSample::new(0, f64::NAN, 0.0, 0.0).has_invalid_axis());
        assert!(VibrationSample::new(0, 0.0, f64::NAN, 0.0).has_invalid_axis());
        assert!(VibrationSample::new(0, 0.0, 0.0, f64::NAN).has_invalid_axis());
    }

    #[test]
    fn test_window_contains_inclusive_bounds() {
        let window = DisturbanceWindow::new(10, 20);
        assert!(window.contains(10));
        assert!(window.contains(15));
        assert!(window.contains(20));
        assert!(!window.contains(9));
        assert!(!window.contains(21));
    }

    #[test]
    fn test_window_single_instant() {
        let window = DisturbanceWindow::new(5, 5);
        assert!(window.contains(5));
        assert!(!window.contains(4));
        assert!(!window.contains(6));
    }

    #[test]
    fn test_window_serde_uses_camel_case() {
        let window = DisturbanceWindow::new(100, 200);
        let json = serde_json::to_string(&window).unwrap();
        assert!(json.contains("startTime"));
        assert!(json.contains("endTime"));

        let parsed: DisturbanceWindow =
            serde_json::from_str(r#"{"startTime": 100, "endTime": 200}"#).unwrap();
        assert_eq!(parsed, window);
    }

    #[test]
    fn test_sample_serialization_roundtrip() {
        let sample = VibrationSample::new(7, 0.1, -0.2, 9.8);
        let json = serde_json::to_string(&sample).unwrap();
        let back: VibrationSample = serde_json::from_str(&json).unwrap();
        assert_eq!(sample, back);
    }
}
