//! Greedy lookup router
//!
//! Each hop asks the ring for the successor of the target key directly
//! instead of walking finger tables, so a lookup settles after at most one
//! forward hop. Finger tables are still maintained for inspection; routing
//! over them would be a separate lookup strategy.

use crate::error::{Result, RoutingError};
use chordring_dht::{DhtError, Key, NodeId, RingMembership};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Outcome of a lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Visited node ids, starting node first
    pub path: Vec<NodeId>,

    /// Node the lookup settled on
    pub terminal: NodeId,
}

impl Route {
    /// Number of forward hops taken
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Router statistics
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterStats {
    pub lookups: u64,
    pub total_hops: u64,
    pub longest_path: usize,
}

impl RouterStats {
    /// Average forward hops per lookup
    pub fn mean_hops(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.total_hops as f64 / self.lookups as f64
        }
    }

    fn record(&mut self, route: &Route) {
        self.lookups += 1;
        self.total_hops += route.hops() as u64;
        self.longest_path = self.longest_path.max(route.path.len());
    }
}

/// Lookup router
///
/// Only ever sees ring membership; it cannot read or write node storage.
#[derive(Debug, Default, Clone)]
pub struct Router {
    stats: RouterStats,
}

impl Router {
    /// Create a new router
    pub fn new() -> Self {
        Router {
            stats: RouterStats::default(),
        }
    }

    /// Route a lookup for `key` starting at node `start`
    ///
    /// Hops to the key's successor and stops once the current node is the
    /// successor, the successor is at or past the key, or the successor is
    /// the smallest member (the lookup wrapped around the ring). The loop is
    /// bounded by the ring size.
    pub fn route(&mut self, ring: &RingMembership, start: NodeId, key: Key) -> Result<Route> {
        let min = ring.min().ok_or(DhtError::EmptyRing)?;
        if !ring.contains(start) {
            return Err(DhtError::NodeNotFound(start).into());
        }
        ring.id_space().check(key)?;

        let limit = ring.len();
        let mut path = vec![start];
        let mut current = start;

        for _ in 0..limit {
            let succ = ring.successor_of(key)?;

            if succ == current {
                return Ok(self.settle(path, succ, key));
            }

            path.push(succ);

            if succ >= key || succ == min {
                return Ok(self.settle(path, succ, key));
            }

            current = succ;
        }

        warn!(start, key, limit, "lookup did not settle");
        Err(RoutingError::HopLimitExceeded { limit })
    }

    /// Get router statistics
    pub fn stats(&self) -> &RouterStats {
        &self.stats
    }

    /// Reset router statistics
    pub fn clear_stats(&mut self) {
        self.stats = RouterStats::default();
    }

    fn settle(&mut self, path: Vec<NodeId>, terminal: NodeId, key: Key) -> Route {
        let route = Route { path, terminal };
        self.stats.record(&route);
        debug!(key, terminal, hops = route.hops(), "lookup settled");
        route
    }
}
