//! Sorted ring membership

use crate::error::{DhtError, Result};
use crate::id_space::IdSpace;
use crate::NodeId;
use std::collections::BTreeSet;
use tracing::debug;

/// The set of node ids on the identifier circle, kept in ascending order
#[derive(Debug, Clone)]
pub struct RingMembership {
    /// Identifier space the ring lives in
    space: IdSpace,

    /// Member ids (ascending)
    members: BTreeSet<NodeId>,
}

impl RingMembership {
    /// Create an empty ring over `space`
    pub fn new(space: IdSpace) -> Self {
        RingMembership {
            space,
            members: BTreeSet::new(),
        }
    }

    /// Get the identifier space
    pub fn id_space(&self) -> IdSpace {
        self.space
    }

    /// Get number of member nodes
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if the ring has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Check if `id` is a member
    pub fn contains(&self, id: NodeId) -> bool {
        self.members.contains(&id)
    }

    /// Smallest member id
    pub fn min(&self) -> Option<NodeId> {
        self.members.first().copied()
    }

    /// Largest member id
    pub fn max(&self) -> Option<NodeId> {
        self.members.last().copied()
    }

    /// Member ids in ascending order
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.members.iter().copied()
    }

    /// Insert a node id
    pub fn add(&mut self, id: NodeId) -> Result<()> {
        self.space.check(id)?;

        if !self.members.insert(id) {
            return Err(DhtError::DuplicateId(id));
        }

        debug!(node_id = id, ring_size = self.members.len(), "added node to ring");
        Ok(())
    }

    /// Remove a node id
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        if !self.members.remove(&id) {
            return Err(DhtError::NodeNotFound(id));
        }

        debug!(node_id = id, ring_size = self.members.len(), "removed node from ring");
        Ok(())
    }

    /// Node responsible for `key`
    ///
    /// The smallest id >= `key`, or the smallest id overall when `key` is
    /// past the largest member.
    pub fn successor_of(&self, key: u64) -> Result<NodeId> {
        self.members
            .range(key..)
            .next()
            .or_else(|| self.members.first())
            .copied()
            .ok_or(DhtError::EmptyRing)
    }

    /// Largest id < `id`, or the largest id overall when none is smaller
    pub fn predecessor_of(&self, id: u64) -> Result<NodeId> {
        self.members
            .range(..id)
            .next_back()
            .or_else(|| self.members.last())
            .copied()
            .ok_or(DhtError::EmptyRing)
    }

    /// `count` consecutive members starting at `owner`, wrapping around
    ///
    /// `count` is capped at the ring size so no member appears twice.
    pub fn successor_list(&self, owner: NodeId, count: usize) -> Result<Vec<NodeId>> {
        if !self.contains(owner) {
            return Err(DhtError::NodeNotFound(owner));
        }

        let take = count.min(self.members.len());
        let after = self.members.range(owner..);
        let before = self.members.range(..owner);

        Ok(after.chain(before).copied().take(take).collect())
    }
}
