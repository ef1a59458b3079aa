//! Routing error types

use thiserror::Error;

/// Routing-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    #[error("Lookup did not settle within {limit} hops")]
    HopLimitExceeded { limit: usize },

    #[error("DHT error: {0}")]
    Dht(#[from] chordring_dht::DhtError),
}

/// Result type for routing operations
pub type Result<T> = std::result::Result<T, RoutingError>;
