//! Plain-text rendering of a topology.

use std::fmt::Write;

use lightpath_core::Topology;

/// Render nodes, positions and outgoing links with their lengths
///
/// ```text
/// Topology:
///   Nodes: 2
///   Links: 2
///
///   A (0.00, 0.00) -> B [5.000 m]
///   B (3.00, 4.00) -> A [5.000 m]
/// ```
pub fn render_topology(topology: &Topology) -> String {
    let mut output = String::new();
    let stats = topology.stats();

    output.push_str("Topology:\n");
    let _ = writeln!(output, "  Nodes: {}", stats.nodes);
    let _ = writeln!(output, "  Links: {}", stats.links);
    let _ = writeln!(output, "  Total length: {:.3} m", stats.total_length);
    output.push('\n');

    for node in topology.nodes() {
        let position = node.position();
        let links: Vec<String> = node
            .neighbors()
            .iter()
            .filter_map(|neighbor| topology.link_between(node.id(), neighbor))
            .map(|link| format!("{} [{:.3} m]", link.target(), link.length()))
            .collect();

        let _ = writeln!(
            output,
            "  {} ({:.2}, {:.2}) -> {}",
            node.id(),
            position.x,
            position.y,
            if links.is_empty() { "(none)".to_string() } else { links.join(", ") }
        );
    }

    let asymmetric = topology.asymmetric_links();
    if !asymmetric.is_empty() {
        output.push_str("\n  One-way links:\n");
        for link in asymmetric {
            let _ = writeln!(output, "    {} -> {}", link.source(), link.target());
        }
    }

    output
}
