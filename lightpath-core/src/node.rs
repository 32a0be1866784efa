//! Topology vertices.

use indexmap::IndexMap;
use serde::Serialize;

use crate::Position;

/// A site in the topology
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    id: String,

    position: Position,

    /// Neighbor ids in authored order
    neighbors: Vec<String>,

    /// Neighbor id -> storage index of the outgoing link, set by `Topology::connect`
    #[serde(skip)]
    successive: IndexMap<String, usize>,
}

impl Node {
    pub fn new(id: &str, position: Position, neighbors: Vec<String>) -> Self {
        Self {
            id: id.to_string(),
            position,
            neighbors,
            successive: IndexMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn neighbors(&self) -> &[String] {
        &self.neighbors
    }

    /// Whether `id` appears in this node's authored adjacency
    pub fn is_adjacent_to(&self, id: &str) -> bool {
        self.neighbors.iter().any(|n| n == id)
    }

    /// Resolved outgoing links keyed by neighbor id
    pub fn successive(&self) -> &IndexMap<String, usize> {
        &self.successive
    }

    /// Index of the link leading to `neighbor`, once connected
    pub fn successive_link(&self, neighbor: &str) -> Option<usize> {
        self.successive.get(neighbor).copied()
    }

    pub(crate) fn set_successive(&mut self, successive: IndexMap<String, usize>) {
        self.successive = successive;
    }
}
