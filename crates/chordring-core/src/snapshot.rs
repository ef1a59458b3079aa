//! Read-only views of network state for reporting

use crate::network::ChordNetwork;
use chordring_dht::{FingerEntry, Key, NodeId, Value};
use chordring_routing::RouterStats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// State of one node at snapshot time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub successor: NodeId,
    pub predecessor: NodeId,

    /// Length of the arc (predecessor, id] this node owns
    pub arc_length: u64,

    pub fingers: Vec<FingerEntry>,

    /// Nodes reachable through the finger table, in entry order
    pub finger_nodes: Vec<NodeId>,
    pub keys: BTreeMap<Key, Value>,
}

/// State of the whole network at snapshot time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub id_bits: u32,
    pub ring_size: u64,
    pub replication_factor: usize,

    /// Nodes in ascending id order
    pub nodes: Vec<NodeSnapshot>,
}

/// Keys held by one node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLoad {
    pub id: NodeId,
    pub keys: usize,
}

/// Aggregate load figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkStats {
    pub node_count: usize,

    /// Stored copies across all nodes
    pub total_entries: usize,

    /// Keys held by at least one node
    pub distinct_keys: usize,

    pub min_load: usize,
    pub max_load: usize,
    pub mean_load: f64,

    /// Average copies per distinct key
    pub replication_ratio: f64,

    pub per_node: Vec<NodeLoad>,
    pub router: RouterStats,
}

impl ChordNetwork {
    /// Capture every node's pointers, fingers and keys
    pub fn snapshot(&self) -> NetworkSnapshot {
        let space = self.ring.id_space();

        let nodes = self
            .nodes
            .values()
            .map(|node| {
                let arc_length = if node.predecessor() == node.id() {
                    space.size()
                } else {
                    space.distance(node.predecessor(), node.id())
                };

                NodeSnapshot {
                    id: node.id(),
                    successor: node.successor(),
                    predecessor: node.predecessor(),
                    arc_length,
                    fingers: node.finger_table().entries().to_vec(),
                    finger_nodes: node.finger_table().distinct_nodes(),
                    keys: node
                        .store()
                        .sorted_entries()
                        .into_iter()
                        .map(|(key, value)| (key, value.clone()))
                        .collect(),
                }
            })
            .collect();

        NetworkSnapshot {
            id_bits: space.bits(),
            ring_size: space.size(),
            replication_factor: self.replication.factor(),
            nodes,
        }
    }

    /// Summarize how keys are spread over the nodes
    pub fn stats(&self) -> NetworkStats {
        let per_node: Vec<NodeLoad> = self
            .nodes
            .values()
            .map(|node| NodeLoad {
                id: node.id(),
                keys: node.store().len(),
            })
            .collect();

        let total_entries: usize = per_node.iter().map(|load| load.keys).sum();
        let distinct_keys = self.all_keys().len();
        let node_count = per_node.len();

        let mean_load = if node_count == 0 {
            0.0
        } else {
            total_entries as f64 / node_count as f64
        };
        let replication_ratio = if distinct_keys == 0 {
            0.0
        } else {
            total_entries as f64 / distinct_keys as f64
        };

        NetworkStats {
            node_count,
            total_entries,
            distinct_keys,
            min_load: per_node.iter().map(|load| load.keys).min().unwrap_or(0),
            max_load: per_node.iter().map(|load| load.keys).max().unwrap_or(0),
            mean_load,
            replication_ratio,
            per_node,
            router: self.router_stats().clone(),
        }
    }
}
