//! Simple-path enumeration.
//!
//! Depth-first search with an explicit stack of `(node, next neighbor)`
//! frames. Neighbors are tried in authored order, so the result order is
//! stable for a given topology.

use crate::{AnalysisError, Topology};

/// Outcome of a bounded walk: the paths found, and whether the bound cut it short
struct Walk {
    paths: Vec<Vec<String>>,
    truncated: bool,
}

impl Topology {
    /// Every simple path from `start` to `end`, in discovery order
    ///
    /// Returns an empty list when either id is unknown, when the two are not
    /// connected, or when `start == end`.
    pub fn find_paths(&self, start: &str, end: &str) -> Vec<Vec<String>> {
        self.walk_paths(start, end, usize::MAX).paths
    }

    /// Like `find_paths`, but fails once more than `limit` paths exist
    pub fn find_paths_bounded(
        &self,
        start: &str,
        end: &str,
        limit: usize,
    ) -> Result<Vec<Vec<String>>, AnalysisError> {
        let walk = self.walk_paths(start, end, limit);
        if walk.truncated {
            return Err(AnalysisError::PathLimitExceeded {
                limit,
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(walk.paths)
    }

    fn walk_paths(&self, start: &str, end: &str, limit: usize) -> Walk {
        let mut walk = Walk {
            paths: Vec::new(),
            truncated: false,
        };

        let (Some(start), Some(end)) = (self.node_index(start), self.node_index(end)) else {
            return walk;
        };
        if start == end {
            return walk;
        }

        let mut on_path = vec![false; self.node_count()];
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        on_path[start] = true;

        while let Some(frame) = stack.last_mut() {
            let (current, cursor) = *frame;
            let Some(node) = self.node_at(current) else {
                break;
            };

            let Some(neighbor) = node.neighbors().get(cursor) else {
                // Exhausted: backtrack
                stack.pop();
                on_path[current] = false;
                continue;
            };
            frame.1 += 1;

            let Some(next) = self.node_index(neighbor) else {
                continue;
            };
            if on_path[next] {
                continue;
            }

            if next == end {
                if walk.paths.len() >= limit {
                    walk.truncated = true;
                    return walk;
                }
                let mut path: Vec<String> = stack
                    .iter()
                    .filter_map(|&(index, _)| self.node_at(index))
                    .map(|n| n.id().to_string())
                    .collect();
                path.push(neighbor.clone());
                walk.paths.push(path);
                continue;
            }

            on_path[next] = true;
            stack.push((next, 0));
        }

        walk
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{lab_topology, triangle};
    use crate::NodeDescriptor;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn ids(paths: &[Vec<String>]) -> Vec<Vec<&str>> {
        paths
            .iter()
            .map(|p| p.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn test_triangle_paths_in_discovery_order() {
        let topology = triangle();
        let paths = topology.find_paths("A", "B");

        assert_eq!(ids(&paths), vec![vec!["A", "B"], vec!["A", "C", "B"]]);
    }

    #[test]
    fn test_lab_paths_are_simple_and_unique() {
        let topology = lab_topology();
        let paths = topology.find_paths("A", "F");

        assert!(!paths.is_empty());
        let unique: HashSet<_> = paths.iter().collect();
        assert_eq!(unique.len(), paths.len());

        for path in &paths {
            assert_eq!(path.first().map(String::as_str), Some("A"));
            assert_eq!(path.last().map(String::as_str), Some("F"));
            let distinct: HashSet<_> = path.iter().collect();
            assert_eq!(distinct.len(), path.len(), "repeated node in {:?}", path);
            for hop in path.windows(2) {
                assert!(topology.link_between(&hop[0], &hop[1]).is_some());
            }
        }
    }

    #[test]
    fn test_lab_path_count() {
        let topology = lab_topology();
        let paths = topology.find_paths("A", "B");
        assert_eq!(paths.len(), 12);
        assert_eq!(ids(&paths[..2]), vec![vec!["A", "B"], vec!["A", "D", "B"]]);
    }

    #[test]
    fn test_same_endpoint_yields_nothing() {
        assert!(triangle().find_paths("A", "A").is_empty());
    }

    #[test]
    fn test_unknown_or_disconnected_yields_nothing() {
        let mut topology = Topology::build(vec![
            NodeDescriptor::new("A", (0.0, 0.0), ["B"]),
            NodeDescriptor::new("B", (1.0, 0.0), ["A"]),
            NodeDescriptor::new("C", (5.0, 0.0), Vec::<String>::new()),
        ])
        .unwrap();
        topology.connect().unwrap();

        assert!(topology.find_paths("A", "C").is_empty());
        assert!(topology.find_paths("A", "Z").is_empty());
        assert!(topology.find_paths("Z", "A").is_empty());
    }

    #[test]
    fn test_paths_follow_link_direction() {
        let topology = Topology::build(vec![
            NodeDescriptor::new("A", (0.0, 0.0), ["B"]),
            NodeDescriptor::new("B", (1.0, 0.0), Vec::<String>::new()),
        ])
        .unwrap();

        assert_eq!(topology.find_paths("A", "B").len(), 1);
        assert!(topology.find_paths("B", "A").is_empty());
    }

    #[test]
    fn test_bounded_enumeration() {
        let topology = triangle();

        assert_eq!(topology.find_paths_bounded("A", "B", 2).unwrap().len(), 2);

        let err = topology.find_paths_bounded("A", "B", 1).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::PathLimitExceeded {
                limit: 1,
                start: "A".to_string(),
                end: "B".to_string(),
            }
        );
    }

    fn arb_graph() -> impl Strategy<Value = (usize, Vec<bool>)> {
        (2usize..7).prop_flat_map(|n| (Just(n), proptest::collection::vec(any::<bool>(), n * n)))
    }

    fn build_graph(n: usize, edges: &[bool]) -> Topology {
        let names: Vec<String> = (0..n).map(|i| format!("N{i}")).collect();
        let descriptors = (0..n)
            .map(|i| {
                let neighbors: Vec<String> = (0..n)
                    .filter(|&j| j != i && edges[i.min(j) * n + i.max(j)])
                    .map(|j| names[j].clone())
                    .collect();
                NodeDescriptor::new(&names[i], (i as f64, (i * i) as f64), neighbors)
            })
            .collect();
        let mut topology = Topology::build(descriptors).unwrap();
        topology.connect().unwrap();
        topology
    }

    proptest! {
        #[test]
        fn paths_never_repeat_nodes((n, edges) in arb_graph()) {
            let topology = build_graph(n, &edges);
            let ids: Vec<String> = topology.node_ids().map(str::to_string).collect();

            for start in &ids {
                for end in &ids {
                    let paths = topology.find_paths(start, end);
                    if start == end {
                        prop_assert!(paths.is_empty());
                    }
                    let unique: HashSet<_> = paths.iter().collect();
                    prop_assert_eq!(unique.len(), paths.len());
                    for path in &paths {
                        let distinct: HashSet<_> = path.iter().collect();
                        prop_assert_eq!(distinct.len(), path.len());
                        prop_assert_eq!(&path[0], start);
                        prop_assert_eq!(&path[path.len() - 1], end);
                        for hop in path.windows(2) {
                            prop_assert!(topology.link_between(&hop[0], &hop[1]).is_some());
                        }
                    }
                }
            }
        }
    }
}
