//! Simulation Runner
//!
//! Wires a topology description to the analysis engine:
//! - Loads and validates node descriptors
//! - Builds and connects the topology once
//! - Runs all-pairs analysis under the configured parameters
//! - Answers single-path probes and path queries

use anyhow::Context;
use serde::Serialize;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use lightpath_core::{
    AnalysisObserver, AnalysisStats, NodeDescriptor, NoopObserver, PathRecord, SignalState,
    Topology, TopologyStats,
};

use crate::{load_topology_from_path, SimulationConfig};

/// Outcome of a full analysis run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub records: Vec<PathRecord>,
    pub stats: AnalysisStats,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl AnalysisReport {
    /// Records between `start` and `end`, in discovery order
    pub fn records_between<'a, 'b>(
        &'a self,
        start: &'b str,
        end: &'b str,
    ) -> impl Iterator<Item = &'a PathRecord> + 'b
    where
        'a: 'b,
    {
        self.records
            .iter()
            .filter(move |r| r.start() == Some(start) && r.end() == Some(end))
    }

    /// Highest-SNR path between two nodes
    pub fn best_snr(&self, start: &str, end: &str) -> Option<&PathRecord> {
        self.records_between(start, end)
            .filter(|r| r.snr_db.is_some())
            .max_by(|a, b| a.snr_db.partial_cmp(&b.snr_db).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Lowest-latency completed path between two nodes
    pub fn lowest_latency(&self, start: &str, end: &str) -> Option<&PathRecord> {
        self.records_between(start, end)
            .filter(|r| r.status.is_ok())
            .min_by(|a, b| a.latency.total_cmp(&b.latency))
    }
}

/// A connected topology plus the configuration to analyse it with
pub struct Simulation {
    topology: Topology,
    config: SimulationConfig,
}

impl Simulation {
    /// Build and connect a topology from descriptors
    pub fn from_descriptors(
        descriptors: Vec<NodeDescriptor>,
        config: SimulationConfig,
    ) -> Result<Self, anyhow::Error> {
        let mut topology = Topology::build(descriptors)?;
        topology.connect()?;
        Ok(Self { topology, config })
    }

    /// Load, build and connect a topology from a JSON description file
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        config: SimulationConfig,
    ) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let topology = load_topology_from_path(path)
            .with_context(|| format!("loading topology from {}", path.display()))?;
        info!("Loaded {} nodes from {}", topology.node_count(), path.display());
        Ok(Self { topology, config })
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run all-pairs analysis
    pub fn run(&self) -> Result<AnalysisReport, anyhow::Error> {
        self.run_observed(&mut NoopObserver)
    }

    /// Run all-pairs analysis, forwarding events to `observer`
    pub fn run_observed(
        &self,
        observer: &mut dyn AnalysisObserver,
    ) -> Result<AnalysisReport, anyhow::Error> {
        let analysis = self.config.analysis_config();
        info!(
            "Analyzing {} nodes at {} mW (path cap: {})",
            self.topology.node_count(),
            self.config.analysis.reference_power_mw,
            analysis
                .max_paths
                .map_or_else(|| "none".to_string(), |n| n.to_string())
        );

        let start = Instant::now();
        let records = self.topology.analyze_paths_with(&analysis, observer)?;
        let elapsed = start.elapsed();
        let stats = AnalysisStats::from_records(&records);

        if stats.failed > 0 || stats.degenerate > 0 {
            warn!(
                "{} failed and {} degenerate probes out of {}",
                stats.failed, stats.degenerate, stats.total
            );
        }
        debug!("Analysis took {:?}", elapsed);

        Ok(AnalysisReport {
            records,
            stats,
            elapsed,
        })
    }

    /// Probe a single path at the configured reference power
    pub fn probe<S: AsRef<str>>(&self, path: &[S]) -> PathRecord {
        let power = self.config.analysis_config().reference_power;
        let mut signal = SignalState::new(power, path.iter().map(|s| s.as_ref().to_string()));
        let result = self.topology.propagate(&mut signal);
        if let Err(e) = &result {
            warn!("Probe failed: {}", e);
        }
        PathRecord::from_probe(signal, result)
    }

    /// All simple paths between two nodes
    pub fn paths(&self, start: &str, end: &str) -> Vec<Vec<String>> {
        self.topology.find_paths(start, end)
    }

    /// Get topology statistics
    pub fn stats(&self) -> TopologyStats {
        self.topology.stats()
    }
}
