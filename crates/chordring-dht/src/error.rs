//! DHT error types

use crate::{Key, NodeId};
use thiserror::Error;

/// DHT-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DhtError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Key not found: {0}")]
    KeyNotFound(Key),

    #[error("Ring is empty")]
    EmptyRing,

    #[error("Duplicate node id: {0}")]
    DuplicateId(NodeId),

    #[error("Identifier {id} outside ring of size {size}")]
    IdOutOfRange { id: u64, size: u64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Node {id} is the last node and still holds {keys} keys")]
    LastNodeHoldsKeys { id: NodeId, keys: usize },
}

/// Result type for DHT operations
pub type Result<T> = std::result::Result<T, DhtError>;
