//! A single node on the ring

use crate::error::Result;
use crate::finger_table::FingerTable;
use crate::ring::RingMembership;
use crate::storage::NodeStore;
use crate::NodeId;

/// A ring member: its routing pointers and its local storage
///
/// Successor, predecessor and finger entries are node ids resolved through
/// the ring, never references to other nodes.
#[derive(Debug, Clone)]
pub struct Node {
    /// Node identifier
    id: NodeId,

    /// Next node clockwise
    successor: NodeId,

    /// Previous node counter-clockwise
    predecessor: NodeId,

    /// m shortcut pointers
    finger_table: FingerTable,

    /// Locally held keys
    store: NodeStore,
}

impl Node {
    /// Create a node that has not been stabilized yet
    ///
    /// Until the first [`Node::stabilize`] the node is its own successor and
    /// predecessor and has an empty finger table.
    pub fn new(id: NodeId) -> Self {
        Node {
            id,
            successor: id,
            predecessor: id,
            finger_table: FingerTable::new(),
            store: NodeStore::new(),
        }
    }

    /// Get node id
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get successor id
    pub fn successor(&self) -> NodeId {
        self.successor
    }

    /// Get predecessor id
    pub fn predecessor(&self) -> NodeId {
        self.predecessor
    }

    /// Get finger table
    pub fn finger_table(&self) -> &FingerTable {
        &self.finger_table
    }

    /// Get local storage
    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    /// Get mutable local storage
    pub fn store_mut(&mut self) -> &mut NodeStore {
        &mut self.store
    }

    /// Recompute successor, predecessor and fingers from the ring
    pub fn stabilize(&mut self, ring: &RingMembership) -> Result<()> {
        let space = ring.id_space();
        self.successor = ring.successor_of(space.next(self.id))?;
        self.predecessor = ring.predecessor_of(self.id)?;
        self.finger_table.rebuild(self.id, ring)
    }
}
