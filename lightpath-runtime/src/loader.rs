//! Topology description loader
//!
//! Reads node descriptors from JSON. Two layouts are accepted:
//!
//! ```text
//! {"A": {"position": [0.0, 1.0], "connected_nodes": ["B", "C"]}, ...}
//! [{"label": "A", "position": [0.0, 1.0], "connected_nodes": ["B", "C"]}, ...]
//! ```
//!
//! The object layout keeps the key order of the file, which becomes the
//! topology's storage order.

use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use lightpath_core::{ConfigurationError, NodeDescriptor, Position, Topology};

/// Errors from loading a topology description
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse topology JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported topology layout: expected a JSON object or array")]
    Layout,

    #[error("Node keyed {key:?} carries a conflicting label {label:?}")]
    LabelMismatch { key: String, label: String },

    #[error("Invalid topology: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// One node as written in the file; every field is optional so that a
/// missing one can be reported by name.
#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(default, alias = "id")]
    label: Option<String>,
    #[serde(default)]
    position: Option<(f64, f64)>,
    #[serde(default, alias = "neighbors")]
    connected_nodes: Option<Vec<String>>,
}

impl RawNode {
    fn into_descriptor(self, label: String) -> Result<NodeDescriptor, ConfigurationError> {
        let position = self.position.ok_or_else(|| ConfigurationError::MissingField {
            node: label.clone(),
            field: "position".to_string(),
        })?;
        let neighbors = self
            .connected_nodes
            .ok_or_else(|| ConfigurationError::MissingField {
                node: label.clone(),
                field: "connected_nodes".to_string(),
            })?;

        Ok(NodeDescriptor {
            id: label,
            position: Position::from(position),
            neighbors,
        })
    }
}

/// Parse node descriptors from a JSON string
pub fn load_descriptors_from_str(json: &str) -> Result<Vec<NodeDescriptor>, LoadError> {
    let descriptors = match json.trim_start().chars().next() {
        Some('{') => {
            let raw: IndexMap<String, RawNode> = serde_json::from_str(json)?;
            let mut descriptors = Vec::with_capacity(raw.len());
            for (key, mut node) in raw {
                if let Some(label) = node.label.take() {
                    if label != key {
                        return Err(LoadError::LabelMismatch { key, label });
                    }
                }
                descriptors.push(node.into_descriptor(key)?);
            }
            descriptors
        }
        Some('[') => {
            let raw: Vec<RawNode> = serde_json::from_str(json)?;
            raw.into_iter()
                .enumerate()
                .map(|(index, mut node)| {
                    let label = node.label.take().ok_or_else(|| {
                        ConfigurationError::MissingField {
                            node: format!("#{index}"),
                            field: "label".to_string(),
                        }
                    })?;
                    node.into_descriptor(label)
                })
                .collect::<Result<Vec<_>, _>>()?
        }
        _ => return Err(LoadError::Layout),
    };

    debug!("Loaded {} node descriptors", descriptors.len());
    Ok(descriptors)
}

/// Read node descriptors from a JSON file
pub fn load_descriptors_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<NodeDescriptor>, LoadError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_descriptors_from_str(&content)
}

/// Read, build and connect a topology in one step
pub fn load_topology_from_path<P: AsRef<Path>>(path: P) -> Result<Topology, LoadError> {
    let mut topology = Topology::build(load_descriptors_from_path(path)?)?;
    topology.connect()?;
    debug!("Connected topology with {} nodes", topology.node_count());
    Ok(topology)
}
