//! Chordring DHT (Distributed Hash Table)
//!
//! This module implements the building blocks of a Chord identifier ring:
//! - Modulo-2^m identifier arithmetic
//! - Sorted ring membership with successor/predecessor queries
//! - Per-node finger tables
//! - Per-node key-value storage
//! - Replica placement across successor lists

pub mod config;
pub mod error;
pub mod finger_table;
pub mod id_space;
pub mod node;
pub mod replication;
pub mod ring;
pub mod storage;

pub use config::RingConfig;
pub use error::{DhtError, Result};
pub use finger_table::{FingerEntry, FingerTable};
pub use id_space::IdSpace;
pub use node::Node;
pub use replication::ReplicationManager;
pub use ring::RingMembership;
pub use storage::NodeStore;

/// Identifier of a node on the ring
pub type NodeId = u64;

/// Identifier of a stored key on the ring
pub type Key = u64;

/// Value held under a key
pub type Value = String;

/// Default number of identifier bits (m)
pub const DEFAULT_ID_BITS: u32 = 5;

/// Largest supported number of identifier bits
///
/// 2^m must fit in a `u64` together with the finger offset addition.
pub const MAX_ID_BITS: u32 = 63;

/// Default number of replicas per stored key (owner inclusive)
pub const DEFAULT_REPLICATION_FACTOR: usize = 2;
