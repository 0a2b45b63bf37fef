//! ringhash — weighted consistent-hash ring for load balancing.
//!
//! Builds an immutable ketama-style ring from normalized `(host, weight)`
//! pairs and maps 64-bit request hashes to hosts. The mapping is stable
//! under small host-set changes (few keys remap when hosts join or leave),
//! each host's share of keys tracks its weight, and repeated lookups are a
//! bounded binary search — optionally narrowed by a precomputed shard index.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use ringhash::{Host, Ring, RingConfig, RingStats};
//!
//! struct Backend {
//!     name: &'static str,
//!     addr: &'static str,
//! }
//!
//! impl Host for Backend {
//!     fn hostname(&self) -> &[u8] {
//!         self.name.as_bytes()
//!     }
//!     fn address(&self) -> &[u8] {
//!         self.addr.as_bytes()
//!     }
//! }
//!
//! let hosts = vec![
//!     (Arc::new(Backend { name: "a", addr: "10.0.0.1:80" }), 0.5),
//!     (Arc::new(Backend { name: "b", addr: "10.0.0.2:80" }), 0.5),
//! ];
//!
//! let config = RingConfig::default();
//! config.validate().unwrap();
//!
//! let stats = RingStats::new();
//! let ring = Ring::build(&hosts, 1.0, &config, &stats);
//! let host = ring.choose(0x1234_5678_9ABC_DEF0, 0).unwrap();
//! assert!(host.name == "a" || host.name == "b");
//! ```
//!
//! A built ring is immutable: when the host set or weights change, build a
//! replacement and publish it with whatever pointer-swap discipline the
//! embedding framework uses. Any number of threads may call
//! [`Ring::choose`] concurrently with no synchronization.

pub mod config;
pub mod error;
pub mod hash;
pub mod host;
pub mod ring;
pub mod stats;

pub use config::{DEFAULT_MAX_RING_SIZE, DEFAULT_MIN_RING_SIZE, HashFunction, RingConfig};
pub use error::Error;
pub use host::{Host, validate_host_keys};
pub use ring::{Ring, RingEntry};
pub use stats::RingStats;
