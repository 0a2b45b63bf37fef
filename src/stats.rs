//! Ring construction gauges.

use metriken::Gauge;

/// Set-once gauges describing a built ring.
///
/// Written at the end of construction and never touched by lookups. Nothing
/// is written for an empty host set. Operators should watch
/// `min_hashes_per_host`: a low value means the configured ring size is too
/// small for the weight spread and the request distribution is inaccurate.
pub struct RingStats {
    /// Number of virtual nodes on the ring.
    pub size: Gauge,
    /// Virtual nodes granted to the least-represented host.
    pub min_hashes_per_host: Gauge,
    /// Virtual nodes granted to the most-represented host.
    pub max_hashes_per_host: Gauge,
}

impl RingStats {
    pub const fn new() -> Self {
        Self {
            size: Gauge::new(),
            min_hashes_per_host: Gauge::new(),
            max_hashes_per_host: Gauge::new(),
        }
    }
}

impl Default for RingStats {
    fn default() -> Self {
        Self::new()
    }
}
