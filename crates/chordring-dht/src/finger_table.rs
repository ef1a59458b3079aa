//! Chord finger table

use crate::error::Result;
use crate::ring::RingMembership;
use crate::NodeId;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One finger: a start offset on the ring and the node owning it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerEntry {
    /// (id + 2^i) mod 2^m
    pub start: u64,

    /// Successor of `start` at the last rebuild
    pub node: NodeId,
}

/// Per-node table of m shortcut pointers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerTable {
    entries: Vec<FingerEntry>,
}

impl FingerTable {
    /// Create an empty table (no stabilization has run yet)
    pub fn new() -> Self {
        FingerTable {
            entries: Vec::new(),
        }
    }

    /// Build a table for `node_id` against the current ring
    pub fn build(node_id: NodeId, ring: &RingMembership) -> Result<Self> {
        let mut table = FingerTable::new();
        table.rebuild(node_id, ring)?;
        Ok(table)
    }

    /// Recompute every entry from the current ring membership
    pub fn rebuild(&mut self, node_id: NodeId, ring: &RingMembership) -> Result<()> {
        let space = ring.id_space();
        let mut entries = Vec::with_capacity(space.bits() as usize);

        for i in 0..space.bits() {
            let start = space.finger_start(node_id, i);
            let node = ring.successor_of(start)?;
            entries.push(FingerEntry { start, node });
        }

        self.entries = entries;
        debug!(node_id, fingers = self.entries.len(), "rebuilt finger table");
        Ok(())
    }

    /// All entries, index i at position i
    pub fn entries(&self) -> &[FingerEntry] {
        &self.entries
    }

    /// Get entry `index`
    pub fn get(&self, index: usize) -> Option<&FingerEntry> {
        self.entries.get(index)
    }

    /// Get number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has never been built
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct finger nodes in entry order
    pub fn distinct_nodes(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = Vec::new();
        for entry in &self.entries {
            if !nodes.contains(&entry.node) {
                nodes.push(entry.node);
            }
        }
        nodes
    }
}
