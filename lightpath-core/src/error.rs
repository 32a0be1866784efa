//! Error taxonomy for topology setup, probe propagation and analysis.

use serde::Serialize;
use thiserror::Error;

/// Malformed topology description or dangling reference.
///
/// Fatal to setup: construction and connection abort on the first one.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ConfigurationError {
    #[error("node {node:?} is missing required field `{field}`")]
    MissingField { node: String, field: String },

    #[error("node {node:?} has a non-finite position ({x}, {y})")]
    InvalidPosition { node: String, x: f64, y: f64 },

    #[error("duplicate node id {0:?}")]
    DuplicateNode(String),

    #[error("node {node:?} lists unknown neighbor {neighbor:?}")]
    UnknownNeighbor { node: String, neighbor: String },

    #[error("node {0:?} lists itself as a neighbor")]
    SelfLoop(String),

    #[error("node {node:?} lists neighbor {neighbor:?} more than once")]
    DuplicateNeighbor { node: String, neighbor: String },

    #[error("link id {link:?} is ambiguous: {first} and {second}")]
    LinkIdCollision {
        link: String,
        first: String,
        second: String,
    },

    #[error("dangling reference from {from:?} to {to:?}")]
    DanglingReference { from: String, to: String },
}

/// Failure of a single probe. Never aborts the surrounding batch.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum PropagationError {
    #[error("topology is not connected")]
    NotConnected,

    #[error("unknown node {0:?}")]
    UnknownNode(String),

    #[error("no link from {from:?} to {to:?}")]
    MissingLink { from: String, to: String },
}

/// A numeric result that cannot be expressed as a finite value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateResultError {
    #[error("accumulated noise is zero, SNR is undefined")]
    ZeroNoise,

    #[error("SNR is not a finite value")]
    NonFinite,
}

/// Conditions that abort an analysis batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("path limit of {limit} exceeded while enumerating {start} -> {end}")]
    PathLimitExceeded {
        limit: usize,
        start: String,
        end: String,
    },

    #[error("reference power must be positive and finite, got {0}")]
    InvalidReferencePower(f64),
}
