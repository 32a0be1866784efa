//! All-pairs path analysis
//!
//! Every simple path between every ordered pair of distinct nodes is probed
//! with a fresh reference signal. Each probe yields one [`PathRecord`]; a
//! failed or degenerate probe is recorded with its status instead of
//! aborting the batch.

use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

use crate::{
    AnalysisError, DegenerateResultError, PropagationError, SignalState, Topology,
    DEFAULT_MAX_PATHS, REFERENCE_POWER,
};

/// Analysis parameters
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Launch power of every probe (W)
    pub reference_power: f64,
    /// Maximum number of records (`None` = unlimited)
    pub max_paths: Option<usize>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            reference_power: REFERENCE_POWER,
            max_paths: Some(DEFAULT_MAX_PATHS),
        }
    }
}

impl AnalysisConfig {
    pub fn with_reference_power(mut self, power: f64) -> Self {
        self.reference_power = power;
        self
    }

    pub fn with_max_paths(mut self, max_paths: Option<usize>) -> Self {
        self.max_paths = max_paths;
        self
    }
}

/// Outcome of a single probe
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RecordStatus {
    Ok,
    Degenerate(DegenerateResultError),
    Failed(PropagationError),
}

impl RecordStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, RecordStatus::Ok)
    }

    /// Short machine-friendly label
    pub fn label(&self) -> &'static str {
        match self {
            RecordStatus::Ok => "ok",
            RecordStatus::Degenerate(_) => "degenerate",
            RecordStatus::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordStatus::Ok => write!(f, "ok"),
            RecordStatus::Degenerate(e) => write!(f, "degenerate: {e}"),
            RecordStatus::Failed(e) => write!(f, "failed: {e}"),
        }
    }
}

/// Result of probing one path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathRecord {
    pub path: Vec<String>,
    /// Accumulated latency (s)
    pub latency: f64,
    /// Accumulated noise power (W)
    pub noise: f64,
    /// `Some` only when `status` is `Ok`
    pub snr_db: Option<f64>,
    pub status: RecordStatus,
}

impl PathRecord {
    /// Turn a probe and its propagation result into a record
    pub fn from_probe(signal: SignalState, result: Result<(), PropagationError>) -> Self {
        let (snr_db, status) = match result {
            Err(e) => (None, RecordStatus::Failed(e)),
            Ok(()) => match signal.snr_db() {
                Ok(snr) => (Some(snr), RecordStatus::Ok),
                Err(e) => (None, RecordStatus::Degenerate(e)),
            },
        };

        Self {
            latency: signal.latency(),
            noise: signal.noise(),
            path: signal.path().to_vec(),
            snr_db,
            status,
        }
    }

    pub fn start(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }

    pub fn end(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }

    /// Path rendered as `A->B->C`
    pub fn path_label(&self, separator: &str) -> String {
        self.path.join(separator)
    }
}

/// Receives analysis events in emission order
pub trait AnalysisObserver {
    /// Paths for one ordered pair have been enumerated
    fn on_pair(&mut self, _start: &str, _end: &str, _path_count: usize) {}

    /// A record has been produced
    fn on_record(&mut self, _record: &PathRecord) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl AnalysisObserver for NoopObserver {}

impl<F> AnalysisObserver for F
where
    F: FnMut(&PathRecord),
{
    fn on_record(&mut self, record: &PathRecord) {
        self(record)
    }
}

impl Topology {
    /// Probe every simple path of every ordered pair with default parameters
    pub fn analyze_paths(&self) -> Result<Vec<PathRecord>, AnalysisError> {
        self.analyze_paths_with(&AnalysisConfig::default(), &mut NoopObserver)
    }

    /// Probe every simple path of every ordered pair
    ///
    /// Pairs are visited in node storage order, `start == end` pairs are
    /// skipped, and records for one pair follow path discovery order.
    pub fn analyze_paths_with(
        &self,
        config: &AnalysisConfig,
        observer: &mut dyn AnalysisObserver,
    ) -> Result<Vec<PathRecord>, AnalysisError> {
        if !(config.reference_power.is_finite() && config.reference_power > 0.0) {
            return Err(AnalysisError::InvalidReferencePower(config.reference_power));
        }

        let mut records = Vec::new();

        for start in self.node_ids() {
            for end in self.node_ids() {
                if start == end {
                    continue;
                }

                let paths = match config.max_paths {
                    Some(max) => self
                        .find_paths_bounded(start, end, max - records.len().min(max))
                        .map_err(|_| AnalysisError::PathLimitExceeded {
                            limit: max,
                            start: start.to_string(),
                            end: end.to_string(),
                        })?,
                    None => self.find_paths(start, end),
                };

                debug!("{} -> {}: {} paths", start, end, paths.len());
                observer.on_pair(start, end, paths.len());

                for path in paths {
                    let mut probe = SignalState::new(config.reference_power, path);
                    let result = self.propagate(&mut probe);
                    let record = PathRecord::from_probe(probe, result);

                    match &record.status {
                        RecordStatus::Ok => {}
                        RecordStatus::Degenerate(e) => {
                            warn!("Path {} is degenerate: {}", record.path_label("->"), e)
                        }
                        RecordStatus::Failed(e) => {
                            warn!("Probe over {} failed: {}", record.path_label("->"), e)
                        }
                    }

                    observer.on_record(&record);
                    records.push(record);
                }
            }
        }

        info!(
            "Analyzed {} paths across {} nodes",
            records.len(),
            self.node_count()
        );

        Ok(records)
    }
}

/// Summary of an analysis run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisStats {
    pub total: usize,
    pub ok: usize,
    pub degenerate: usize,
    pub failed: usize,
    /// Over records whose propagation completed
    pub min_latency: Option<f64>,
    pub max_latency: Option<f64>,
    pub best_snr_db: Option<f64>,
    pub worst_snr_db: Option<f64>,
}

impl AnalysisStats {
    pub fn from_records(records: &[PathRecord]) -> Self {
        let mut stats = Self {
            total: records.len(),
            ..Self::default()
        };

        for record in records {
            match record.status {
                RecordStatus::Ok => stats.ok += 1,
                RecordStatus::Degenerate(_) => stats.degenerate += 1,
                RecordStatus::Failed(_) => {
                    stats.failed += 1;
                    continue;
                }
            }

            let latency = record.latency;
            stats.min_latency = Some(stats.min_latency.map_or(latency, |m| m.min(latency)));
            stats.max_latency = Some(stats.max_latency.map_or(latency, |m| m.max(latency)));

            if let Some(snr) = record.snr_db {
                stats.best_snr_db = Some(stats.best_snr_db.map_or(snr, |b| b.max(snr)));
                stats.worst_snr_db = Some(stats.worst_snr_db.map_or(snr, |w| w.min(snr)));
            }
        }

        stats
    }
}
