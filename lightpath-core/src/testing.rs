//! Shared fixtures for unit tests.

use crate::{NodeDescriptor, Topology};

/// Six-site reference network used throughout the tests
pub(crate) fn lab_descriptors() -> Vec<NodeDescriptor> {
    vec![
        NodeDescriptor::new("A", (0.0, 1.0), ["B", "D", "C"]),
        NodeDescriptor::new("B", (1.5, 2.5), ["A", "D", "F"]),
        NodeDescriptor::new("C", (0.0, -1.0), ["A", "D", "E"]),
        NodeDescriptor::new("D", (1.5, 0.5), ["A", "B", "C", "E", "F"]),
        NodeDescriptor::new("E", (3.0, -0.5), ["C", "D", "F"]),
        NodeDescriptor::new("F", (3.0, 2.0), ["B", "E", "D"]),
    ]
}

pub(crate) fn lab_topology() -> Topology {
    let mut topology = Topology::build(lab_descriptors()).unwrap();
    topology.connect().unwrap();
    topology
}

/// Fully meshed triangle A, B, C
pub(crate) fn triangle() -> Topology {
    let mut topology = Topology::build(vec![
        NodeDescriptor::new("A", (0.0, 0.0), ["B", "C"]),
        NodeDescriptor::new("B", (3.0, 0.0), ["A", "C"]),
        NodeDescriptor::new("C", (0.0, 4.0), ["A", "B"]),
    ])
    .unwrap();
    topology.connect().unwrap();
    topology
}
