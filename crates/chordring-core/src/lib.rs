//! Chordring Core Library
//!
//! This is the main library that ties together all Chordring components:
//! - DHT (identifier space, ring membership, finger tables, node storage, replication)
//! - Routing (greedy key lookup)
//! - Membership protocol (join/leave with stabilization and key migration)
//! - Read-only snapshots and statistics for reporting

pub mod membership;
pub mod network;
pub mod snapshot;

pub use chordring_dht as dht;
pub use chordring_routing as routing;

pub use dht::{DhtError, Key, Node, NodeId, RingConfig, Value};
pub use network::ChordNetwork;
pub use routing::{Route, RoutingError};
pub use snapshot::{NetworkSnapshot, NetworkStats, NodeLoad, NodeSnapshot};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        // DHT types are accessible
        let config = dht::RingConfig::default();
        assert!(config.validate().is_ok());
        let space = dht::IdSpace::new(config.id_bits).unwrap();
        assert_eq!(space.size(), 32);

        // Routing types are accessible
        let router = routing::Router::new();
        assert_eq!(router.stats().lookups, 0);

        // The network facade is accessible
        let network = ChordNetwork::new(config).unwrap();
        assert!(network.is_empty());
    }
}
