//! `autoinsight` - Vehicle telemetry core for the Auto Insight dashboard
//!
//! This library ingests raw triaxial vibration telemetry, scores engine
//! health from unexplained vibration spikes, records scored journeys,
//! and seals the owner profile into opaque encrypted blobs.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod journey;
pub mod logging;
pub mod profile;
pub mod storage;
pub mod telemetry;
pub mod vault;

pub use config::Config;
pub use error::{Error, Result};
pub use journey::Journey;
pub use logging::init_logging;
pub use profile::VehicleProfile;
pub use storage::{JourneyStats, Storage};
pub use telemetry::{
    load_samples, parse_samples, score_samples, DisturbanceWindow, PerformanceScore,
    VibrationSample,
};
pub use vault::{RecordSealer, Vault};
