//! Chordring Lookup Routing
//!
//! This module implements hop-by-hop key lookup over a ring:
//! - Greedy successor routing from a starting node
//! - Traversed path and terminal (owning) node
//! - Lookup statistics for reporting

pub mod error;
pub mod router;

pub use error::{Result, RoutingError};
pub use router::{Route, Router, RouterStats};
