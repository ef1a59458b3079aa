//! Human- and machine-readable views of a network
//!
//! Reports only ever see snapshots and statistics; they cannot change the
//! network. Text output mirrors what an operator reads, JSON output is one
//! object per line.

use chordring_core::{Key, NetworkSnapshot, NetworkStats, NodeId, Route};
use serde_json::json;
use std::fmt::Display;
use std::io::{self, Write};

use crate::config::{ReportConfig, ReportFormat};

/// Longest bar drawn per node in the ring visualization
const MAX_BAR_WIDTH: usize = 40;

/// Writes reports in the configured format
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    format: ReportFormat,
    fingers: bool,
}

impl Reporter {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            format: config.format,
            fingers: config.fingers,
        }
    }

    /// Section title (text only)
    pub fn heading<W: Write>(&self, out: &mut W, title: &str) -> io::Result<()> {
        match self.format {
            ReportFormat::Text => writeln!(out, "\n=== {} ===", title),
            ReportFormat::Json => Ok(()),
        }
    }

    /// Every node with its neighbours and keys
    pub fn nodes<W: Write>(&self, out: &mut W, snapshot: &NetworkSnapshot) -> io::Result<()> {
        if self.format == ReportFormat::Json {
            return emit(out, json!({ "event": "nodes", "snapshot": snapshot }));
        }

        for node in &snapshot.nodes {
            let keys: Vec<Key> = node.keys.keys().copied().collect();
            writeln!(
                out,
                "Node {} -> Successor {}, Predecessor {}, Keys: {:?}",
                node.id, node.successor, node.predecessor, keys
            )?;

            if self.fingers {
                for (i, finger) in node.fingers.iter().enumerate() {
                    writeln!(out, "    finger[{}] start {:>3} -> {}", i, finger.start, finger.node)?;
                }
                writeln!(out, "    fingers -> {:?}", node.finger_nodes)?;
            }
        }
        Ok(())
    }

    /// Key-value pairs held by each node
    pub fn distribution<W: Write>(
        &self,
        out: &mut W,
        snapshot: &NetworkSnapshot,
    ) -> io::Result<()> {
        if self.format == ReportFormat::Json {
            let nodes: Vec<_> = snapshot
                .nodes
                .iter()
                .map(|node| json!({ "id": node.id, "arc_length": node.arc_length, "keys": node.keys }))
                .collect();
            return emit(out, json!({ "event": "distribution", "nodes": nodes }));
        }

        for node in &snapshot.nodes {
            let pairs: Vec<String> = node
                .keys
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect();
            let pairs = if pairs.is_empty() {
                "-".to_string()
            } else {
                pairs.join(", ")
            };
            writeln!(out, "Node {} (arc {}): {}", node.id, node.arc_length, pairs)?;
        }
        Ok(())
    }

    /// Load and lookup figures
    pub fn statistics<W: Write>(&self, out: &mut W, stats: &NetworkStats) -> io::Result<()> {
        if self.format == ReportFormat::Json {
            return emit(out, json!({ "event": "statistics", "stats": stats }));
        }

        writeln!(out, "Nodes: {}", stats.node_count)?;
        writeln!(
            out,
            "Stored copies: {} ({} distinct keys, {:.2} copies per key)",
            stats.total_entries, stats.distinct_keys, stats.replication_ratio
        )?;
        writeln!(
            out,
            "Load per node: min {}, max {}, mean {:.2}",
            stats.min_load, stats.max_load, stats.mean_load
        )?;
        writeln!(
            out,
            "Lookups: {} (mean {:.2} hops, longest path {})",
            stats.router.lookups,
            stats.router.mean_hops(),
            stats.router.longest_path
        )
    }

    /// ASCII ring: the clockwise chain of nodes and a key-count bar per node
    pub fn visualize<W: Write>(&self, out: &mut W, snapshot: &NetworkSnapshot) -> io::Result<()> {
        if self.format == ReportFormat::Json {
            let chain: Vec<NodeId> = snapshot.nodes.iter().map(|node| node.id).collect();
            return emit(out, json!({ "event": "ring", "ring_size": snapshot.ring_size, "chain": chain }));
        }

        writeln!(
            out,
            "Ring m={} ({} positions), R={}",
            snapshot.id_bits, snapshot.ring_size, snapshot.replication_factor
        )?;
        writeln!(out, "{}", ring_chain(snapshot))?;

        for node in &snapshot.nodes {
            let count = node.keys.len();
            let bar = "#".repeat(count.min(MAX_BAR_WIDTH));
            writeln!(out, "{:>6} |{:<width$} {}", node.id, bar, count, width = MAX_BAR_WIDTH)?;
        }
        Ok(())
    }

    /// Result of a store call
    pub fn stored<W: Write>(
        &self,
        out: &mut W,
        key: Key,
        value: &str,
        replicas: &[NodeId],
    ) -> io::Result<()> {
        match self.format {
            ReportFormat::Text => writeln!(out, "Key {}:{} stored on {:?}", key, value, replicas),
            ReportFormat::Json => emit(
                out,
                json!({ "event": "stored", "key": key, "value": value, "replicas": replicas }),
            ),
        }
    }

    /// Result of a lookup
    pub fn route<W: Write>(
        &self,
        out: &mut W,
        start: NodeId,
        key: Key,
        route: &Route,
    ) -> io::Result<()> {
        match self.format {
            ReportFormat::Text => writeln!(
                out,
                "Lookup key {} from node {}: path {:?} -> node {} ({} hops)",
                key,
                start,
                route.path,
                route.terminal,
                route.hops()
            ),
            ReportFormat::Json => emit(
                out,
                json!({ "event": "route", "start": start, "key": key, "route": route }),
            ),
        }
    }

    /// Result of a read through `find_key`
    pub fn found<W: Write>(
        &self,
        out: &mut W,
        key: Key,
        value: &str,
        holder: NodeId,
    ) -> io::Result<()> {
        match self.format {
            ReportFormat::Text => writeln!(out, "Key {} = {} (read from node {})", key, value, holder),
            ReportFormat::Json => emit(
                out,
                json!({ "event": "found", "key": key, "value": value, "holder": holder }),
            ),
        }
    }

    /// Result of a membership change
    pub fn membership<W: Write>(&self, out: &mut W, action: &str, id: NodeId) -> io::Result<()> {
        match self.format {
            ReportFormat::Text => writeln!(out, "Node {} {}", id, action),
            ReportFormat::Json => emit(out, json!({ "event": action, "id": id })),
        }
    }

    /// An operation the network refused
    pub fn rejected<W: Write>(
        &self,
        out: &mut W,
        operation: &str,
        error: &dyn Display,
    ) -> io::Result<()> {
        match self.format {
            ReportFormat::Text => writeln!(out, "! {} rejected: {}", operation, error),
            ReportFormat::Json => emit(
                out,
                json!({ "event": "rejected", "operation": operation, "error": error.to_string() }),
            ),
        }
    }
}

fn emit<W: Write>(out: &mut W, value: serde_json::Value) -> io::Result<()> {
    serde_json::to_writer(&mut *out, &value)?;
    writeln!(out)
}

/// "(3) --7--> (10) --10--> (3)": each node followed by the clockwise
/// distance to its successor
fn ring_chain(snapshot: &NetworkSnapshot) -> String {
    let Some(first) = snapshot.nodes.first() else {
        return "(empty)".to_string();
    };

    let mut chain = String::new();
    for node in &snapshot.nodes {
        let gap = if node.successor == node.id {
            snapshot.ring_size
        } else {
            (node.successor + snapshot.ring_size - node.id) % snapshot.ring_size
        };
        chain.push_str(&format!("({}) --{}--> ", node.id, gap));
    }
    chain.push_str(&format!("({})", first.id));
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use chordring_core::{ChordNetwork, RingConfig};

    fn create_scenario_network() -> ChordNetwork {
        let mut network = ChordNetwork::new(RingConfig::new(5, 2)).unwrap();
        for id in [3, 10, 20, 27] {
            network.add_node(id).unwrap();
        }
        for (key, value) in [(5, "A"), (12, "B"), (25, "C"), (30, "D")] {
            network.store_key(key, value).unwrap();
        }
        network
    }

    fn text_reporter() -> Reporter {
        Reporter::new(&ReportConfig::default())
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_nodes_text() {
        let snapshot = create_scenario_network().snapshot();
        let text = render(|out| text_reporter().nodes(out, &snapshot));

        assert!(text.contains("Node 3 -> Successor 10, Predecessor 27, Keys: [25, 30]"));
        assert!(text.contains("Node 27 -> Successor 3, Predecessor 20, Keys: [12, 25]"));
        assert!(!text.contains("finger["));
        assert!(!text.contains("fingers ->"));
    }

    #[test]
    fn test_nodes_with_fingers() {
        let snapshot = create_scenario_network().snapshot();
        let reporter = Reporter::new(&ReportConfig {
            fingers: true,
            ..ReportConfig::default()
        });
        let text = render(|out| reporter.nodes(out, &snapshot));

        assert!(text.contains("finger[0] start   4 -> 10"));
        assert!(text.contains("finger[4] start  19 -> 20"));
        assert!(text.contains("    fingers -> [10, 20]"));
        assert!(text.contains("    fingers -> [3, 20]"));
    }

    #[test]
    fn test_distribution_text() {
        let mut network = create_scenario_network();
        network.add_node(15).unwrap();
        let snapshot = network.snapshot();
        let text = render(|out| text_reporter().distribution(out, &snapshot));

        assert!(text.contains("Node 15 (arc 5): 5=A, 12=B"));
        assert!(text.contains("Node 20 (arc 5): -"));
    }

    #[test]
    fn test_statistics_text() {
        let stats = create_scenario_network().stats();
        let text = render(|out| text_reporter().statistics(out, &stats));

        assert!(text.contains("Nodes: 4"));
        assert!(text.contains("Stored copies: 8 (4 distinct keys, 2.00 copies per key)"));
        assert!(text.contains("Load per node: min 2, max 2, mean 2.00"));
    }

    #[test]
    fn test_visualize_text() {
        let snapshot = create_scenario_network().snapshot();
        let text = render(|out| text_reporter().visualize(out, &snapshot));

        assert!(text.contains("Ring m=5 (32 positions), R=2"));
        assert!(text.contains("(3) --7--> (10) --10--> (20) --7--> (27) --8--> (3)"));
        assert!(text.contains("     3 |##"));
    }

    #[test]
    fn test_ring_chain_edge_cases() {
        let mut network = ChordNetwork::new(RingConfig::new(5, 2)).unwrap();
        assert_eq!(ring_chain(&network.snapshot()), "(empty)");

        network.add_node(9).unwrap();
        assert_eq!(ring_chain(&network.snapshot()), "(9) --32--> (9)");
    }

    #[test]
    fn test_route_and_store_text() {
        let mut network = create_scenario_network();
        let route = network.route_lookup(3, 25).unwrap();
        let reporter = text_reporter();

        let text = render(|out| reporter.route(out, 3, 25, &route));
        assert_eq!(text, "Lookup key 25 from node 3: path [3, 27] -> node 27 (1 hops)\n");

        let text = render(|out| reporter.stored(out, 5, "A", &[10, 20]));
        assert_eq!(text, "Key 5:A stored on [10, 20]\n");
    }

    #[test]
    fn test_json_lines() {
        let network = create_scenario_network();
        let reporter = Reporter::new(&ReportConfig {
            format: ReportFormat::Json,
            ..ReportConfig::default()
        });

        let text = render(|out| {
            reporter.heading(out, "ignored")?;
            reporter.nodes(out, &network.snapshot())?;
            reporter.statistics(out, &network.stats())?;
            reporter.rejected(out, "join 3", &"Duplicate node id: 3")
        });

        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["event"], "nodes");
        assert_eq!(lines[0]["snapshot"]["nodes"][0]["id"], 3);
        assert_eq!(lines[1]["stats"]["total_entries"], 8);
        assert_eq!(lines[2]["operation"], "join 3");
    }
}
