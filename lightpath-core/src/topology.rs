//! Topology - the sites and fiber spans a probe can travel over
//!
//! The topology is the central structure of the engine:
//! - Links are derived from authored adjacency and node geometry
//! - `connect` resolves successive references once
//! - Probes walk a path, accumulating each span's physical effects
//!
//! After `connect` the topology is read-only; `propagate` and the analysis
//! entry points take `&self` and may be shared between independent probes.

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, trace, warn};

use crate::{
    link_id, ConfigurationError, Link, Node, NodeDescriptor, PropagationError, SignalState,
};

/// Sites and directed links of an optical-transport network
#[derive(Debug, Clone)]
pub struct Topology {
    /// Nodes in descriptor order (node id -> Node)
    nodes: IndexMap<String, Node>,

    /// Links in creation order (link id -> Link)
    links: IndexMap<String, Link>,

    /// Whether successive references have been resolved
    connected: bool,
}

impl Topology {
    /// Build a topology from node descriptors
    ///
    /// One directed link is created per (node, neighbor) pair, with the
    /// Euclidean distance between the two positions as its length. The
    /// topology still needs `connect` before signals can be propagated.
    pub fn build(descriptors: Vec<NodeDescriptor>) -> Result<Self, ConfigurationError> {
        let mut nodes: IndexMap<String, Node> = IndexMap::with_capacity(descriptors.len());

        for descriptor in descriptors {
            validate_descriptor(&descriptor)?;
            if nodes.contains_key(&descriptor.id) {
                return Err(ConfigurationError::DuplicateNode(descriptor.id));
            }
            let node = Node::new(&descriptor.id, descriptor.position, descriptor.neighbors);
            nodes.insert(descriptor.id, node);
        }

        let mut links: IndexMap<String, Link> = IndexMap::new();

        for node in nodes.values() {
            for neighbor in node.neighbors() {
                let target = nodes.get(neighbor).ok_or_else(|| {
                    ConfigurationError::UnknownNeighbor {
                        node: node.id().to_string(),
                        neighbor: neighbor.clone(),
                    }
                })?;

                let id = link_id(node.id(), neighbor);
                if let Some(existing) = links.get(&id) {
                    if existing.source() == node.id() && existing.target() == neighbor {
                        continue;
                    }
                    return Err(ConfigurationError::LinkIdCollision {
                        link: id,
                        first: format!("{} -> {}", existing.source(), existing.target()),
                        second: format!("{} -> {}", node.id(), neighbor),
                    });
                }

                let length = node.position().distance_to(&target.position());
                links.insert(id, Link::new(node.id(), neighbor, length));
            }
        }

        let topology = Self {
            nodes,
            links,
            connected: false,
        };

        for link in topology.asymmetric_links() {
            warn!(
                "Link {} has no reverse link: {} does not list {} as a neighbor",
                link.id(),
                link.target(),
                link.source()
            );
        }

        info!(
            "Built topology with {} nodes and {} links",
            topology.nodes.len(),
            topology.links.len()
        );

        Ok(topology)
    }

    /// Resolve successive references
    ///
    /// Every link is bound to its target node and every node to one outgoing
    /// link per neighbor. Calling this again recomputes identical bindings.
    /// On error the previous bindings are left untouched.
    pub fn connect(&mut self) -> Result<(), ConfigurationError> {
        let mut link_targets = Vec::with_capacity(self.links.len());
        for link in self.links.values() {
            let target = self.nodes.get_index_of(link.target()).ok_or_else(|| {
                ConfigurationError::DanglingReference {
                    from: link.id().to_string(),
                    to: link.target().to_string(),
                }
            })?;
            link_targets.push(target);
        }

        let mut node_links = Vec::with_capacity(self.nodes.len());
        for node in self.nodes.values() {
            let mut successive = IndexMap::with_capacity(node.neighbors().len());
            for neighbor in node.neighbors() {
                let id = link_id(node.id(), neighbor);
                let index = self.links.get_index_of(&id).ok_or_else(|| {
                    ConfigurationError::DanglingReference {
                        from: node.id().to_string(),
                        to: id.clone(),
                    }
                })?;
                successive.insert(neighbor.clone(), index);
            }
            node_links.push(successive);
        }

        for (link, target) in self.links.values_mut().zip(link_targets) {
            link.set_successive(target);
        }
        for (node, successive) in self.nodes.values_mut().zip(node_links) {
            node.set_successive(successive);
        }

        if !self.connected {
            debug!("Connected {} nodes and {} links", self.nodes.len(), self.links.len());
        }
        self.connected = true;
        Ok(())
    }

    /// Walk the remaining path of `signal`, accumulating latency and noise
    ///
    /// On success the remaining path is empty and the power is unchanged.
    /// On error the signal keeps whatever was accumulated before the failing
    /// hop, with its cursor on the node where the walk stopped.
    pub fn propagate(&self, signal: &mut SignalState) -> Result<(), PropagationError> {
        if !self.connected {
            return Err(PropagationError::NotConnected);
        }

        let Some(head) = signal.current() else {
            return Ok(());
        };
        let mut node = self
            .nodes
            .get(head)
            .ok_or_else(|| PropagationError::UnknownNode(head.to_string()))?;

        while let Some(next) = signal.next_hop() {
            let link = node
                .successive_link(next)
                .and_then(|index| self.link_at(index))
                .ok_or_else(|| PropagationError::MissingLink {
                    from: node.id().to_string(),
                    to: next.to_string(),
                })?;

            signal.add_latency(link.latency_generation());
            signal.add_noise(link.noise_generation(signal.power()));
            signal.advance();
            trace!("Crossed {} ({:.3} m)", link.id(), link.length());

            node = link
                .successive()
                .and_then(|index| self.node_at(index))
                .ok_or_else(|| PropagationError::UnknownNode(link.target().to_string()))?;
        }

        // Consume the final node
        signal.advance();
        Ok(())
    }

    /// Whether `connect` has run
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Get a node by id
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Get a node by storage index
    pub fn node_at(&self, index: usize) -> Option<&Node> {
        self.nodes.get_index(index).map(|(_, node)| node)
    }

    /// Storage index of a node
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    /// Get a link by id
    pub fn link(&self, id: &str) -> Option<&Link> {
        self.links.get(id)
    }

    /// Get the link running from `source` to `target`
    pub fn link_between(&self, source: &str, target: &str) -> Option<&Link> {
        self.links.get(&link_id(source, target))
    }

    /// Get a link by storage index
    pub fn link_at(&self, index: usize) -> Option<&Link> {
        self.links.get_index(index).map(|(_, link)| link)
    }

    /// Node a link leads to, once connected
    pub fn successive_node(&self, link: &Link) -> Option<&Node> {
        link.successive().and_then(|index| self.node_at(index))
    }

    /// Nodes in storage order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Node ids in storage order
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Links in creation order
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Links whose target does not list the source back
    pub fn asymmetric_links(&self) -> Vec<&Link> {
        self.links
            .values()
            .filter(|link| {
                self.nodes
                    .get(link.target())
                    .is_some_and(|target| !target.is_adjacent_to(link.source()))
            })
            .collect()
    }

    /// Get topology statistics
    pub fn stats(&self) -> TopologyStats {
        let total_length: f64 = self.links.values().map(Link::length).sum();
        let longest_link = self
            .links
            .values()
            .map(Link::length)
            .fold(0.0_f64, f64::max);

        TopologyStats {
            nodes: self.nodes.len(),
            links: self.links.len(),
            asymmetric_links: self.asymmetric_links().len(),
            total_length,
            longest_link,
            connected: self.connected,
        }
    }
}

fn validate_descriptor(descriptor: &NodeDescriptor) -> Result<(), ConfigurationError> {
    if descriptor.id.is_empty() {
        return Err(ConfigurationError::MissingField {
            node: String::new(),
            field: "id".to_string(),
        });
    }

    if !descriptor.position.is_finite() {
        return Err(ConfigurationError::InvalidPosition {
            node: descriptor.id.clone(),
            x: descriptor.position.x,
            y: descriptor.position.y,
        });
    }

    let mut seen = HashSet::with_capacity(descriptor.neighbors.len());
    for neighbor in &descriptor.neighbors {
        if neighbor == &descriptor.id {
            return Err(ConfigurationError::SelfLoop(descriptor.id.clone()));
        }
        if !seen.insert(neighbor.as_str()) {
            return Err(ConfigurationError::DuplicateNeighbor {
                node: descriptor.id.clone(),
                neighbor: neighbor.clone(),
            });
        }
    }

    Ok(())
}

/// Topology statistics
#[derive(Debug, Clone, Serialize)]
pub struct TopologyStats {
    pub nodes: usize,
    pub links: usize,
    pub asymmetric_links: usize,
    pub total_length: f64,
    pub longest_link: f64,
    pub connected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{lab_descriptors, lab_topology};
    use crate::Position;

    #[test]
    fn test_build_creates_directed_links() {
        let topology = Topology::build(lab_descriptors()).unwrap();

        assert_eq!(topology.node_count(), 6);
        assert_eq!(topology.link_count(), 20);
        assert!(!topology.is_connected());

        let ab = topology.link("AB").unwrap();
        let ba = topology.link("BA").unwrap();
        assert_eq!(ab.source(), "A");
        assert_eq!(ba.source(), "B");
        assert!((ab.length() - 4.5_f64.sqrt()).abs() < 1e-12);
        assert_eq!(ab.length(), ba.length());
        assert!(topology.asymmetric_links().is_empty());
    }

    #[test]
    fn test_storage_order_follows_descriptors() {
        let topology = Topology::build(lab_descriptors()).unwrap();
        let ids: Vec<_> = topology.node_ids().collect();
        assert_eq!(ids, ["A", "B", "C", "D", "E", "F"]);
        assert_eq!(topology.node_index("D"), Some(3));
    }

    #[test]
    fn test_build_rejects_unknown_neighbor() {
        let err = Topology::build(vec![
            NodeDescriptor::new("A", (0.0, 0.0), ["B"]),
            NodeDescriptor::new("B", (1.0, 0.0), ["A", "Z"]),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            ConfigurationError::UnknownNeighbor {
                node: "B".to_string(),
                neighbor: "Z".to_string(),
            }
        );
    }

    #[test]
    fn test_build_rejects_malformed_descriptors() {
        let missing_id =
            Topology::build(vec![NodeDescriptor::new("", (0.0, 0.0), Vec::<String>::new())]);
        assert!(matches!(missing_id, Err(ConfigurationError::MissingField { .. })));

        let bad_position =
            Topology::build(vec![NodeDescriptor::new("A", (f64::NAN, 0.0), Vec::<String>::new())]);
        assert!(matches!(bad_position, Err(ConfigurationError::InvalidPosition { .. })));

        let self_loop = Topology::build(vec![NodeDescriptor::new("A", (0.0, 0.0), ["A"])]);
        assert_eq!(self_loop.unwrap_err(), ConfigurationError::SelfLoop("A".to_string()));

        let duplicate = Topology::build(vec![
            NodeDescriptor::new("A", (0.0, 0.0), Vec::<String>::new()),
            NodeDescriptor::new("A", (1.0, 0.0), Vec::<String>::new()),
        ]);
        assert_eq!(duplicate.unwrap_err(), ConfigurationError::DuplicateNode("A".to_string()));

        let twice = Topology::build(vec![
            NodeDescriptor::new("A", (0.0, 0.0), ["B", "B"]),
            NodeDescriptor::new("B", (1.0, 0.0), ["A"]),
        ]);
        assert!(matches!(twice, Err(ConfigurationError::DuplicateNeighbor { .. })));
    }

    #[test]
    fn test_build_rejects_link_id_collision() {
        // "A" + "BC" and "AB" + "C" both concatenate to "ABC"
        let err = Topology::build(vec![
            NodeDescriptor::new("A", (0.0, 0.0), ["BC"]),
            NodeDescriptor::new("BC", (1.0, 0.0), Vec::<String>::new()),
            NodeDescriptor::new("AB", (2.0, 0.0), ["C"]),
            NodeDescriptor::new("C", (3.0, 0.0), Vec::<String>::new()),
        ])
        .unwrap_err();

        assert!(matches!(
            err,
            ConfigurationError::LinkIdCollision { ref link, .. } if link == "ABC"
        ));
    }

    #[test]
    fn test_asymmetric_adjacency_is_reported() {
        let topology = Topology::build(vec![
            NodeDescriptor::new("A", (0.0, 0.0), ["B"]),
            NodeDescriptor::new("B", (1.0, 0.0), Vec::<String>::new()),
        ])
        .unwrap();

        assert_eq!(topology.link_count(), 1);
        let asymmetric = topology.asymmetric_links();
        assert_eq!(asymmetric.len(), 1);
        assert_eq!(asymmetric[0].id(), "AB");
        assert_eq!(topology.stats().asymmetric_links, 1);
    }

    #[test]
    fn test_connect_binds_successive_references() {
        let topology = lab_topology();

        for node in topology.nodes() {
            assert_eq!(node.successive().len(), node.neighbors().len());
            for neighbor in node.neighbors() {
                let index = node.successive_link(neighbor).unwrap();
                let link = topology.link_at(index).unwrap();
                assert_eq!(link.id(), format!("{}{}", node.id(), neighbor));
                assert_eq!(topology.successive_node(link).unwrap().id(), neighbor);
            }
        }
    }

    #[test]
    fn test_connect_is_idempotent() {
        let mut topology = lab_topology();
        let before: Vec<_> = topology.nodes().map(|n| n.successive().clone()).collect();
        let links_before: Vec<_> = topology.links().map(|l| l.successive()).collect();

        topology.connect().unwrap();

        let after: Vec<_> = topology.nodes().map(|n| n.successive().clone()).collect();
        let links_after: Vec<_> = topology.links().map(|l| l.successive()).collect();
        assert_eq!(before, after);
        assert_eq!(links_before, links_after);
    }

    #[test]
    fn test_connect_rejects_dangling_reference() {
        let mut topology = Topology::build(vec![
            NodeDescriptor::new("A", (0.0, 0.0), ["B"]),
            NodeDescriptor::new("B", (1.0, 0.0), ["A"]),
        ])
        .unwrap();
        topology.nodes.insert(
            "C".to_string(),
            Node::new("C", Position::new(2.0, 0.0), vec!["A".to_string()]),
        );

        let err = topology.connect().unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::DanglingReference {
                from: "C".to_string(),
                to: "CA".to_string(),
            }
        );
        assert!(!topology.is_connected());
        assert!(topology.node("A").unwrap().successive().is_empty());
    }

    #[test]
    fn test_propagate_accumulates_per_link() {
        let topology = lab_topology();
        let mut signal = SignalState::new(1e-3, ["A", "B", "F", "E"]);

        topology.propagate(&mut signal).unwrap();

        let hops = [("A", "B"), ("B", "F"), ("F", "E")];
        let latency: f64 = hops
            .iter()
            .map(|(s, t)| topology.link_between(s, t).unwrap().latency_generation())
            .sum();
        let noise: f64 = hops
            .iter()
            .map(|(s, t)| topology.link_between(s, t).unwrap().noise_generation(1e-3))
            .sum();

        assert!((signal.latency() - latency).abs() < 1e-20);
        assert!((signal.noise() - noise).abs() < 1e-24);
        assert_eq!(signal.power(), 1e-3);
        assert!(signal.is_complete());
        assert!(signal.remaining().is_empty());
        assert_eq!(signal.path().len(), 4);
    }

    #[test]
    fn test_propagate_stops_at_missing_link() {
        let topology = lab_topology();
        // A and E are not adjacent
        let mut signal = SignalState::new(1e-3, ["B", "A", "E", "F"]);

        let err = topology.propagate(&mut signal).unwrap_err();

        assert_eq!(
            err,
            PropagationError::MissingLink {
                from: "A".to_string(),
                to: "E".to_string(),
            }
        );
        let ba = topology.link("BA").unwrap();
        assert_eq!(signal.latency(), ba.latency_generation());
        assert_eq!(signal.noise(), ba.noise_generation(1e-3));
        assert_eq!(signal.current(), Some("A"));
    }

    #[test]
    fn test_propagate_unknown_start() {
        let topology = lab_topology();
        let mut signal = SignalState::new(1e-3, ["Q", "A"]);

        assert_eq!(
            topology.propagate(&mut signal),
            Err(PropagationError::UnknownNode("Q".to_string()))
        );
        assert_eq!(signal.noise(), 0.0);
    }

    #[test]
    fn test_propagate_requires_connect() {
        let topology = Topology::build(lab_descriptors()).unwrap();
        let mut signal = SignalState::new(1e-3, ["A", "B"]);

        assert_eq!(
            topology.propagate(&mut signal),
            Err(PropagationError::NotConnected)
        );
    }

    #[test]
    fn test_stats() {
        let stats = lab_topology().stats();
        assert_eq!(stats.nodes, 6);
        assert_eq!(stats.links, 20);
        assert!(stats.connected);
        assert!(stats.longest_link > 0.0);
        assert!(stats.total_length >= stats.longest_link);
    }

    #[test]
    fn test_topology_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Topology>();
    }
}
