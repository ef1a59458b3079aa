//! Modulo-2^m identifier arithmetic

use crate::error::{DhtError, Result};
use crate::MAX_ID_BITS;
use serde::{Deserialize, Serialize};

/// The circular identifier space shared by node ids and keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct IdSpace {
    bits: u32,
}

impl IdSpace {
    /// Create an identifier space of 2^`bits` positions
    pub fn new(bits: u32) -> Result<Self> {
        if bits == 0 || bits > MAX_ID_BITS {
            return Err(DhtError::InvalidConfig(format!(
                "id_bits must be in 1..={} (got {})",
                MAX_ID_BITS, bits
            )));
        }
        Ok(IdSpace { bits })
    }

    /// Number of identifier bits (m)
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Number of positions on the ring (2^m)
    pub fn size(&self) -> u64 {
        1u64 << self.bits
    }

    /// Check whether an identifier lies on the ring
    pub fn contains(&self, id: u64) -> bool {
        id < self.size()
    }

    /// Reject identifiers outside the ring
    pub fn check(&self, id: u64) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(DhtError::IdOutOfRange {
                id,
                size: self.size(),
            })
        }
    }

    /// Reduce an arbitrary value onto the ring
    pub fn wrap(&self, value: u64) -> u64 {
        value & (self.size() - 1)
    }

    /// The position directly clockwise of `id`
    pub fn next(&self, id: u64) -> u64 {
        self.wrap(self.wrap(id) + 1)
    }

    /// Start of finger `index` for node `id`: (id + 2^index) mod 2^m
    pub fn finger_start(&self, id: u64, index: u32) -> u64 {
        debug_assert!(index < self.bits);
        self.wrap(self.wrap(id) + (1u64 << index))
    }

    /// Clockwise distance from `from` to `to`
    pub fn distance(&self, from: u64, to: u64) -> u64 {
        self.wrap(self.wrap(to) + self.size() - self.wrap(from))
    }
}

impl TryFrom<u32> for IdSpace {
    type Error = DhtError;

    fn try_from(bits: u32) -> Result<Self> {
        IdSpace::new(bits)
    }
}

impl From<IdSpace> for u32 {
    fn from(space: IdSpace) -> u32 {
        space.bits
    }
}
