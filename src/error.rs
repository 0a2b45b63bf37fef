use thiserror::Error;

/// Errors detectable before ring construction.
///
/// The builder itself is total over valid inputs; both variants are
/// caller-side configuration failures surfaced by
/// [`RingConfig::validate`](crate::RingConfig::validate) and
/// [`validate_host_keys`](crate::validate_host_keys).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Ring size bounds are inverted.
    #[error("ring hash: minimum_ring_size ({min}) > maximum_ring_size ({max})")]
    InvalidRingSize { min: u64, max: u64 },
    /// A host's selected hashing key is empty.
    #[error("ring hash: host has an empty hashing key")]
    EmptyHashKey,
}
