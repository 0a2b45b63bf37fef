use crate::error::Error;

/// Default lower bound on the number of virtual nodes.
pub const DEFAULT_MIN_RING_SIZE: u64 = 1024;
/// Default upper bound on the number of virtual nodes.
pub const DEFAULT_MAX_RING_SIZE: u64 = 8 * 1024 * 1024;

/// Hash function used to place virtual nodes on the ring.
///
/// The caller must hash request keys with the same function for the
/// distribution guarantees to hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashFunction {
    /// xxHash64 with seed 0.
    XxHash64,
    /// MurmurHash2 (64A) with [`STD_HASH_SEED`](crate::hash::STD_HASH_SEED).
    MurmurHash2,
}

/// Configuration for building a [`Ring`](crate::Ring).
#[derive(Clone, Debug)]
pub struct RingConfig {
    /// Lower bound on ring size. The builder scales this up until the
    /// least-weighted host gets a whole number of virtual nodes.
    pub minimum_ring_size: u64,
    /// Upper bound on ring size. Caps the scaled size; distribution accuracy
    /// degrades once the cap bites (watch the `min_hashes_per_host` gauge).
    pub maximum_ring_size: u64,
    /// Hash function for virtual-node placement.
    pub hash_function: HashFunction,
    /// Hash each host by hostname instead of network address.
    pub use_hostname_for_hashing: bool,
    /// Build the shard acceleration index and use it in lookups.
    pub sharded: bool,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            minimum_ring_size: DEFAULT_MIN_RING_SIZE,
            maximum_ring_size: DEFAULT_MAX_RING_SIZE,
            hash_function: HashFunction::XxHash64,
            use_hostname_for_hashing: false,
            sharded: false,
        }
    }
}

impl RingConfig {
    /// Validate configuration values. Returns an error if any value is out
    /// of range. Call this before [`Ring::build`](crate::Ring::build); the
    /// builder assumes a validated configuration.
    pub fn validate(&self) -> Result<(), Error> {
        if self.minimum_ring_size > self.maximum_ring_size {
            return Err(Error::InvalidRingSize {
                min: self.minimum_ring_size,
                max: self.maximum_ring_size,
            });
        }
        Ok(())
    }
}
