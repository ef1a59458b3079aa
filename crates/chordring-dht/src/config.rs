//! Ring parameters

use crate::error::Result;
use crate::id_space::IdSpace;
use crate::replication::ReplicationManager;
use crate::{DEFAULT_ID_BITS, DEFAULT_REPLICATION_FACTOR};
use serde::{Deserialize, Serialize};

/// Parameters fixed for the lifetime of a ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingConfig {
    /// Identifier bits (m); the ring has 2^m positions
    #[serde(default = "default_id_bits")]
    pub id_bits: u32,

    /// Copies kept of every stored key (R), owner inclusive
    #[serde(default = "default_replication_factor")]
    pub replication_factor: usize,
}

fn default_id_bits() -> u32 {
    DEFAULT_ID_BITS
}

fn default_replication_factor() -> usize {
    DEFAULT_REPLICATION_FACTOR
}

impl Default for RingConfig {
    fn default() -> Self {
        RingConfig {
            id_bits: DEFAULT_ID_BITS,
            replication_factor: DEFAULT_REPLICATION_FACTOR,
        }
    }
}

impl RingConfig {
    /// Create a config with explicit parameters
    pub fn new(id_bits: u32, replication_factor: usize) -> Self {
        RingConfig {
            id_bits,
            replication_factor,
        }
    }

    /// Check both parameters
    pub fn validate(&self) -> Result<()> {
        self.id_space()?;
        self.replication()?;
        Ok(())
    }

    /// Identifier space described by `id_bits`
    pub fn id_space(&self) -> Result<IdSpace> {
        IdSpace::new(self.id_bits)
    }

    /// Replica placement described by `replication_factor`
    pub fn replication(&self) -> Result<ReplicationManager> {
        ReplicationManager::new(self.replication_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DhtError;

    #[test]
    fn test_default_validates() {
        assert!(RingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_bits() {
        let config = RingConfig::new(0, 2);
        assert!(matches!(config.validate(), Err(DhtError::InvalidConfig(_))));
    }

    #[test]
    fn test_invalid_replication() {
        let config = RingConfig::new(5, 0);
        assert!(matches!(config.validate(), Err(DhtError::InvalidConfig(_))));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: RingConfig = serde_yaml::from_str("id_bits: 8\n").unwrap();
        assert_eq!(config.id_bits, 8);
        assert_eq!(config.replication_factor, DEFAULT_REPLICATION_FACTOR);
    }
}
