//! Replica placement across successor lists

use crate::error::{DhtError, Result};
use crate::ring::RingMembership;
use crate::{Key, NodeId};

/// Chooses which nodes hold copies of a stored key
///
/// A key is held by its owner and the next `factor - 1` members clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplicationManager {
    factor: usize,
}

impl ReplicationManager {
    /// Create a manager placing `factor` copies of every key
    pub fn new(factor: usize) -> Result<Self> {
        if factor == 0 {
            return Err(DhtError::InvalidConfig(
                "replication_factor must be at least 1".to_string(),
            ));
        }
        Ok(ReplicationManager { factor })
    }

    /// Get the replica count (R)
    pub fn factor(&self) -> usize {
        self.factor
    }

    /// Owner of `key` followed by its successors, `factor` nodes in total
    ///
    /// Fewer nodes are returned when the ring is smaller than the factor.
    pub fn replica_set(&self, ring: &RingMembership, key: Key) -> Result<Vec<NodeId>> {
        ring.id_space().check(key)?;
        let owner = ring.successor_of(key)?;
        ring.successor_list(owner, self.factor)
    }
}
