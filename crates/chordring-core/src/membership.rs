//! Join/leave protocol
//!
//! Membership changes are applied in three steps: mutate the ring, rebuild
//! every node's pointers and finger table, then move keys. The rebuild is
//! global; there is no incremental finger repair.
//!
//! Migration only looks at the joining/leaving node and its successor.
//! Replica sets computed at store time are not recomputed, so after a join or
//! leave a key may have more or fewer than R copies.

use crate::network::ChordNetwork;
use chordring_dht::{DhtError, Key, Node, NodeId, NodeStore, Result};
use tracing::{debug, info, warn};

/// Whether a node joining at `joiner` pulls `key` from its successor
///
/// Keys at or below the joiner's id move. This also pulls keys below the
/// joiner's predecessor when the successor holds them as replicas.
///
/// When the joiner becomes the smallest id, keys above the largest id wrap
/// around to it but are greater than the joiner, so they stay on the old
/// minimum even though the ring now assigns them to the joiner.
pub fn pulled_by_joiner(key: Key, joiner: NodeId) -> bool {
    key <= joiner
}

impl ChordNetwork {
    /// Add a node at `id` and migrate keys into it
    ///
    /// After the ring and every finger table are rebuilt, the new node takes
    /// over from its successor each key for which [`pulled_by_joiner`] holds.
    pub fn join(&mut self, id: NodeId) -> Result<&Node> {
        self.ring.add(id)?;
        self.nodes.insert(id, Node::new(id));
        self.rebuild_all()?;

        let successor = self.ring.successor_of(self.ring.id_space().next(id))?;
        let moved = if successor == id {
            0
        } else {
            self.migrate_in(id, successor)?
        };

        info!(node_id = id, successor, moved, ring_size = self.ring.len(), "node joined");
        self.nodes.get(&id).ok_or(DhtError::NodeNotFound(id))
    }

    /// Remove the node at `id`, handing all of its keys to its successor
    ///
    /// Keys already on the successor are overwritten by the leaving node's
    /// copies. The last node may only leave once its store is empty.
    pub fn leave(&mut self, id: NodeId) -> Result<()> {
        if !self.ring.contains(id) {
            warn!(node_id = id, "leave for unknown node");
            return Err(DhtError::NodeNotFound(id));
        }

        let successor = self.ring.successor_of(self.ring.id_space().next(id))?;

        if successor == id {
            let held = self.nodes.get(&id).map_or(0, |node| node.store().len());
            if held > 0 {
                warn!(node_id = id, keys = held, "last node cannot leave while holding keys");
                return Err(DhtError::LastNodeHoldsKeys { id, keys: held });
            }
        }

        let mut departing = self.nodes.remove(&id).ok_or(DhtError::NodeNotFound(id))?;
        self.ring.remove(id)?;

        let handed = std::mem::take(departing.store_mut());
        let moved = handed.len();
        if successor != id {
            self.hand_over(handed, successor)?;
        }

        self.rebuild_all()?;

        info!(node_id = id, successor, moved, ring_size = self.ring.len(), "node left");
        Ok(())
    }

    /// Stabilize every node against the current ring
    pub fn rebuild_all(&mut self) -> Result<()> {
        for node in self.nodes.values_mut() {
            node.stabilize(&self.ring)?;
        }
        debug!(nodes = self.nodes.len(), "stabilized ring");
        Ok(())
    }

    /// Move qualifying keys from `successor` into the freshly joined node
    fn migrate_in(&mut self, joiner: NodeId, successor: NodeId) -> Result<usize> {
        let taken = self
            .nodes
            .get_mut(&successor)
            .ok_or(DhtError::NodeNotFound(successor))?
            .store_mut()
            .take_matching(|key| pulled_by_joiner(key, joiner));

        let node = self
            .nodes
            .get_mut(&joiner)
            .ok_or(DhtError::NodeNotFound(joiner))?;

        let moved = taken.len();
        for (key, value) in taken {
            debug!(key, from = successor, to = joiner, "migrated key");
            node.store_mut().insert(key, value);
        }
        Ok(moved)
    }

    /// Merge a departing node's store into its successor
    fn hand_over(&mut self, handed: NodeStore, successor: NodeId) -> Result<()> {
        let heir = self
            .nodes
            .get_mut(&successor)
            .ok_or(DhtError::NodeNotFound(successor))?;

        let overwritten = heir.store_mut().absorb(handed);
        if overwritten > 0 {
            debug!(to = successor, overwritten, "hand-over replaced existing copies");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chordring_dht::RingConfig;

    fn create_test_network(ids: &[NodeId]) -> ChordNetwork {
        let mut network = ChordNetwork::new(RingConfig::new(5, 2)).unwrap();
        for &id in ids {
            network.join(id).unwrap();
        }
        network
    }

    fn keys_of(network: &ChordNetwork, id: NodeId) -> Vec<Key> {
        network.get_node(id).unwrap().store().keys()
    }

    #[test]
    fn test_join_first_node() {
        let mut network = create_test_network(&[]);
        let node = network.join(10).unwrap();

        assert_eq!(node.id(), 10);
        assert_eq!(node.successor(), 10);
        assert_eq!(node.predecessor(), 10);
        assert_eq!(node.finger_table().len(), 5);
    }

    #[test]
    fn test_join_duplicate_rejected() {
        let mut network = create_test_network(&[3, 10]);
        assert!(matches!(network.join(10), Err(DhtError::DuplicateId(10))));
        assert_eq!(network.len(), 2);
    }

    #[test]
    fn test_join_out_of_range_rejected() {
        let mut network = create_test_network(&[3]);
        assert!(matches!(
            network.join(40),
            Err(DhtError::IdOutOfRange { id: 40, size: 32 })
        ));
        assert_eq!(network.len(), 1);
    }

    #[test]
    fn test_join_updates_every_node() {
        let mut network = create_test_network(&[3, 10, 20, 27]);
        network.join(15).unwrap();

        assert_eq!(network.get_node(10).unwrap().successor(), 15);
        assert_eq!(network.get_node(20).unwrap().predecessor(), 15);
        // finger 3 of node 3 starts at 11
        assert_eq!(network.get_node(3).unwrap().finger_table().get(3).unwrap().node, 15);
    }

    #[test]
    fn test_join_pulls_keys_from_successor() {
        let mut network = create_test_network(&[3, 10, 20, 27]);
        network.store_key(5, "A").unwrap();
        network.store_key(12, "B").unwrap();
        network.store_key(25, "C").unwrap();
        network.store_key(30, "D").unwrap();
        assert_eq!(keys_of(&network, 20), vec![5, 12]);

        network.join(15).unwrap();

        assert_eq!(keys_of(&network, 15), vec![5, 12]);
        assert!(keys_of(&network, 20).is_empty());
        // Untouched nodes keep their copies
        assert_eq!(keys_of(&network, 10), vec![5, 30]);
        assert_eq!(keys_of(&network, 27), vec![12, 25]);
    }

    #[test]
    fn test_join_above_largest_pulls_from_min() {
        let mut network = create_test_network(&[3, 10]);
        network.store_key(12, "B").unwrap(); // replicas [3, 10]

        network.join(20).unwrap();

        assert_eq!(keys_of(&network, 20), vec![12]);
        assert!(keys_of(&network, 3).is_empty());
        assert_eq!(keys_of(&network, 10), vec![12]);
    }

    #[test]
    fn test_leave_hands_keys_to_successor() {
        let mut network = create_test_network(&[3, 10, 20, 27]);
        network.store_key(5, "A").unwrap();
        network.store_key(30, "D").unwrap();
        assert_eq!(keys_of(&network, 10), vec![5, 30]);

        network.leave(10).unwrap();

        assert!(network.get_node(10).is_none());
        assert!(!network.ring().contains(10));
        assert_eq!(keys_of(&network, 20), vec![5, 30]);
        assert_eq!(network.get_node(3).unwrap().successor(), 20);
    }

    #[test]
    fn test_leave_overwrites_on_collision() {
        let mut network = create_test_network(&[3, 10, 20]);
        network.store_key(5, "A").unwrap(); // replicas [10, 20]
        network
            .nodes
            .get_mut(&10)
            .unwrap()
            .store_mut()
            .insert(5, "newer".to_string());

        network.leave(10).unwrap();

        let value = network.get_node(20).unwrap().store().get(5).cloned();
        assert_eq!(value.as_deref(), Some("newer"));
    }

    #[test]
    fn test_leave_largest_wraps_to_min() {
        let mut network = create_test_network(&[3, 10, 27]);
        network.store_key(25, "C").unwrap(); // replicas [27, 3]

        network.leave(27).unwrap();

        assert_eq!(keys_of(&network, 3), vec![25]);
        assert_eq!(network.get_node(10).unwrap().successor(), 3);
    }

    #[test]
    fn test_leave_unknown_node() {
        let mut network = create_test_network(&[3, 10]);
        assert_eq!(network.leave(4), Err(DhtError::NodeNotFound(4)));
        assert_eq!(network.len(), 2);
    }

    #[test]
    fn test_last_node_with_keys_cannot_leave() {
        let mut network = create_test_network(&[7]);
        network.store_key(3, "A").unwrap();

        assert_eq!(
            network.leave(7),
            Err(DhtError::LastNodeHoldsKeys { id: 7, keys: 1 })
        );
        assert_eq!(network.len(), 1);
        assert_eq!(keys_of(&network, 7), vec![3]);
    }

    #[test]
    fn test_last_empty_node_can_leave() {
        let mut network = create_test_network(&[7]);
        network.leave(7).unwrap();
        assert!(network.is_empty());
        assert!(network.ring().is_empty());
    }

    #[test]
    fn test_pulled_by_joiner() {
        assert!(pulled_by_joiner(5, 15));
        assert!(pulled_by_joiner(15, 15));
        assert!(!pulled_by_joiner(16, 15));
        // wrapped key owned by a new minimum is not pulled
        assert!(!pulled_by_joiner(30, 3));
    }
}
