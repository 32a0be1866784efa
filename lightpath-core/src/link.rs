//! Directed physical links between two sites.

use serde::Serialize;

use crate::{ASE_NOISE_COEFFICIENT, FIBER_VELOCITY_FACTOR, SPEED_OF_LIGHT};

/// Build the id of the link running from `source` to `target`
pub fn link_id(source: &str, target: &str) -> String {
    let mut id = String::with_capacity(source.len() + target.len());
    id.push_str(source);
    id.push_str(target);
    id
}

/// A directed fiber span. An undirected edge is modelled as two links.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    /// `source` followed by `target`
    id: String,

    source: String,

    target: String,

    /// Span length (m)
    length: f64,

    /// Storage index of the target node, set by `Topology::connect`
    #[serde(skip)]
    successive: Option<usize>,
}

impl Link {
    pub fn new(source: &str, target: &str, length: f64) -> Self {
        Self {
            id: link_id(source, target),
            source: source.to_string(),
            target: target.to_string(),
            length,
            successive: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Index of the node this link leads to, once connected
    pub fn successive(&self) -> Option<usize> {
        self.successive
    }

    pub(crate) fn set_successive(&mut self, node: usize) {
        self.successive = Some(node);
    }

    /// Propagation delay over the span: `length / ((2/3) * c)`
    pub fn latency_generation(&self) -> f64 {
        self.length / (FIBER_VELOCITY_FACTOR * SPEED_OF_LIGHT)
    }

    /// ASE noise added to a signal of `signal_power` watts: `k * P * length`
    pub fn noise_generation(&self, signal_power: f64) -> f64 {
        ASE_NOISE_COEFFICIENT * signal_power * self.length
    }
}
