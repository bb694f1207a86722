//! Vibration sample ingest.
//!
//! Raw telemetry arrives as delimited text: one header line, then one
//! `time,x,y,z` record per line. Parsing is deliberately lenient; rows
//! that do not have exactly four fields are dropped without comment,
//! and unparseable axis values become NaN rather than aborting the
//! parse. A broken sensor therefore degrades to "no usable data", never
//! to a hard failure.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::telemetry::VibrationSample;

/// Number of comma-separated fields a data row must have.
const RECORD_FIELDS: usize = 4;

/// Parse raw delimited text into an ordered sample sequence.
///
/// The first line is always treated as a header and skipped. Each
/// remaining line must split into exactly four comma-separated fields
/// (`time,x,y,z`); lines with any other field count are silently
/// dropped. Axis fields that fail to parse become NaN and propagate
/// into scoring, where NaN deltas never register as spikes. A row whose
/// timestamp fails to parse is dropped like a malformed row, since an
/// integer timestamp has no NaN to carry the damage.
#[must_use]
pub fn parse_samples(raw: &str) -> Vec<VibrationSample> {
    let mut samples = Vec::new();

    for line in raw.lines().skip(1) {
        let fields: Vec<&str> = line.trim().split(',').collect();
        if fields.len() != RECORD_FIELDS {
            continue;
        }

        let time = match fields[0].trim().parse::<i64>() {
            Ok(time) => time,
            Err(_) => continue,
        };

        samples.push(VibrationSample {
            time,
            x: parse_axis(fields[1]),
            y: parse_axis(fields[2]),
            z: parse_axis(fields[3]),
        });
    }

    samples
}

/// Parse one axis field, mapping malformed text to NaN.
fn parse_axis(field: &str) -> f64 {
    field.trim().parse().unwrap_or(f64::NAN)
}

/// A source of raw vibration telemetry text.
///
/// Implementors fetch the delimited text from wherever it lives (a file
/// on disk here; the dashboard app fetches it over HTTP). The fetch is
/// the only suspending step of the pipeline; everything after it is a
/// synchronous scan.
#[async_trait::async_trait]
pub trait SampleSource: Send + Sync {
    /// The name of this source (for logging).
    fn name(&self) -> &'static str;

    /// Fetch the raw delimited text.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying source is unreachable or
    /// unreadable. Callers going through [`load_samples`] never see
    /// this error; it is logged and absorbed.
    async fn fetch_raw(&self) -> Result<String>;
}

/// A sample source backed by a file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source reading from the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path this source reads from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl SampleSource for FileSource {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn fetch_raw(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| Error::source_fetch("file", format!("{}: {err}", self.path.display())))
    }
}

/// Fetch raw telemetry text from a source, failing soft to empty.
///
/// Any fetch failure is logged at warn level and produces an empty
/// string, which parses to an empty sequence downstream. The caller
/// never has to handle an ingest error.
pub async fn fetch_raw_soft(source: &dyn SampleSource) -> String {
    match source.fetch_raw().await {
        Ok(raw) => raw,
        Err(err) => {
            warn!("sample source unavailable, treating as empty: {err}");
            String::new()
        }
    }
}

/// Fetch and parse samples from a source, failing soft to empty.
///
/// An unreachable source yields an empty sequence, which downstream
/// scoring treats as "insufficient data, assume healthy".
pub async fn load_samples(source: &dyn SampleSource) -> Vec<VibrationSample> {
    let raw = fetch_raw_soft(source).await;
    let samples = parse_samples(&raw);
    debug!(
        source = source.name(),
        count = samples.len(),
        "parsed vibration samples"
    );
    samples
}
