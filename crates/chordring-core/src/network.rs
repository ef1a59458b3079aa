//! The ring as seen by callers
//!
//! [`ChordNetwork`] owns every node and the ring membership and exposes the
//! store, find and lookup operations. Join and leave live in
//! [`crate::membership`].

use chordring_dht::{
    DhtError, Key, Node, NodeId, ReplicationManager, Result, RingConfig, RingMembership, Value,
};
use chordring_routing::{Route, Router, RouterStats};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

/// A simulated Chord ring with all of its nodes
///
/// Every operation runs to completion before returning; mutating
/// operations take `&mut self`.
#[derive(Debug, Clone)]
pub struct ChordNetwork {
    /// Ring parameters
    pub(crate) config: RingConfig,

    /// Sorted member ids
    pub(crate) ring: RingMembership,

    /// Nodes by id, one per ring member
    pub(crate) nodes: BTreeMap<NodeId, Node>,

    /// Replica placement
    pub(crate) replication: ReplicationManager,

    /// Lookup router
    pub(crate) router: Router,
}

impl ChordNetwork {
    /// Create an empty network
    pub fn new(config: RingConfig) -> Result<Self> {
        let space = config.id_space()?;
        let replication = config.replication()?;

        Ok(ChordNetwork {
            config,
            ring: RingMembership::new(space),
            nodes: BTreeMap::new(),
            replication,
            router: Router::new(),
        })
    }

    /// Get ring parameters
    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    /// Get ring membership
    pub fn ring(&self) -> &RingMembership {
        &self.ring
    }

    /// Get number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the network has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find a node by id
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Nodes in ascending id order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// Join a node (see [`ChordNetwork::join`])
    pub fn add_node(&mut self, id: NodeId) -> Result<&Node> {
        self.join(id)
    }

    /// Remove a node (see [`ChordNetwork::leave`])
    pub fn remove_node(&mut self, id: NodeId) -> Result<()> {
        self.leave(id)
    }

    /// Node owning `key` under the current membership
    pub fn find_successor(&self, key: Key) -> Result<NodeId> {
        self.ring.successor_of(key)
    }

    /// Same as [`ChordNetwork::find_successor`]
    pub fn owner_of(&self, key: Key) -> Result<NodeId> {
        self.find_successor(key)
    }

    /// Write `value` under `key` on the key's replica set
    ///
    /// Returns the replica set: the owner followed by its successors.
    pub fn store_key(&mut self, key: Key, value: impl Into<Value>) -> Result<Vec<NodeId>> {
        let replicas = self.replication.replica_set(&self.ring, key)?;
        let value = value.into();

        for id in &replicas {
            let node = self.nodes.get_mut(id).ok_or(DhtError::NodeNotFound(*id))?;
            node.store_mut().insert(key, value.clone());
        }

        info!(key, replicas = ?replicas, "stored key");
        Ok(replicas)
    }

    /// Find a stored value
    ///
    /// Scans every node in ascending id order rather than only the key's
    /// replica set, and returns the first copy found with its holder.
    pub fn find_key(&self, key: Key) -> Result<(&Value, NodeId)> {
        self.nodes
            .values()
            .find_map(|node| node.store().get(key).map(|value| (value, node.id())))
            .ok_or(DhtError::KeyNotFound(key))
    }

    /// Route a lookup for `key` starting at node `start`
    pub fn route_lookup(&mut self, start: NodeId, key: Key) -> chordring_routing::Result<Route> {
        self.router.route(&self.ring, start, key)
    }

    /// Get lookup statistics
    pub fn router_stats(&self) -> &RouterStats {
        self.router.stats()
    }

    /// Every key held by at least one node
    pub fn all_keys(&self) -> BTreeSet<Key> {
        self.nodes
            .values()
            .flat_map(|node| node.store().keys())
            .collect()
    }
}
