//! Weighted ketama ring construction and lookup.

use std::io::Write;
use std::sync::Arc;

use tracing::{Level, trace};

use crate::config::{HashFunction, RingConfig};
use crate::hash::{STD_HASH_SEED, murmur2_64a, xxhash64};
use crate::host::Host;
use crate::stats::RingStats;

/// Bits beyond the first hash's most significant bit shifted away when
/// assigning shards. Larger values make fewer, wider shards.
const RSHIFT_INITIAL: u32 = 9;

/// One virtual node: a position on the ring and the host placed there.
pub struct RingEntry<H> {
    hash: u64,
    host: Arc<H>,
}

// Hand-written so cloning shares the `Arc` without requiring `H: Clone`.
impl<H> Clone for RingEntry<H> {
    fn clone(&self) -> Self {
        Self {
            hash: self.hash,
            host: Arc::clone(&self.host),
        }
    }
}

impl<H> RingEntry<H> {
    /// Ring position of this virtual node.
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Host owning this virtual node.
    pub fn host(&self) -> &Arc<H> {
        &self.host
    }
}

/// An immutable consistent-hash ring.
///
/// Built once from a weighted host snapshot, then queried from any number of
/// threads without synchronization. There is no update path: when the host
/// set changes, build a replacement ring and publish it atomically.
pub struct Ring<H> {
    /// Virtual nodes sorted ascending by hash.
    entries: Box<[RingEntry<H>]>,
    /// Dense shard windows into `entries`; empty when sharding is off.
    shard_starts: Box<[usize]>,
    /// Right shift mapping a hash to its raw shard value, in `[1, 64]`.
    rshift: u32,
}

impl<H> Clone for Ring<H> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            shard_starts: self.shard_starts.clone(),
            rshift: self.rshift,
        }
    }
}

impl<H: Host> Ring<H> {
    /// Build a ring from normalized `(host, weight)` pairs.
    ///
    /// Weights are positive and sum to ~1.0, and `min_normalized_weight` is
    /// the smallest of them (1.0 when all weights are equal); both are the
    /// caller's contract, as is validating `config` up front. Each host gets
    /// a run of virtual nodes proportional to its weight, keyed by the
    /// ketama enumeration `key || '_' || decimal(i)`.
    ///
    /// `stats` is written once at the end, unless the host vector is empty.
    pub fn build(
        normalized_host_weights: &[(Arc<H>, f64)],
        min_normalized_weight: f64,
        config: &RingConfig,
        stats: &RingStats,
    ) -> Self {
        trace!("ring hash: building ring");

        if normalized_host_weights.is_empty() {
            return Self {
                entries: Box::default(),
                shard_starts: Box::default(),
                rshift: 64,
            };
        }

        // Scale up the number of hashes per host so the least-weighted host
        // gets a whole number of positions on the ring, capped at
        // maximum_ring_size. Other hosts may land on fractional targets; the
        // running sums below handle that.
        let scale = ((min_normalized_weight * config.minimum_ring_size as f64).ceil()
            / min_normalized_weight)
            .min(config.maximum_ring_size as f64);
        let ring_size = scale.ceil() as u64;

        let mut entries: Vec<RingEntry<H>> = Vec::with_capacity(ring_size as usize);

        // `current_hashes` and `target_hashes` are running sums across the
        // whole host set; fractional targets carry over from host to host so
        // rounding never compounds. Each host's count is the floor or ceil
        // of `scale * weight`.
        let mut key_buf: Vec<u8> = Vec::with_capacity(196);
        let mut current_hashes = 0.0f64;
        let mut target_hashes = 0.0f64;
        let mut min_hashes_per_host = ring_size;
        let mut max_hashes_per_host = 0u64;
        for (host, weight) in normalized_host_weights {
            let key = host.hash_key(config.use_hostname_for_hashing);
            debug_assert!(!key.is_empty(), "host hashing key must be non-empty");

            key_buf.clear();
            key_buf.extend_from_slice(key);
            key_buf.push(b'_');
            let offset_start = key_buf.len();

            target_hashes += scale * weight;
            let mut i = 0u64;
            while current_hashes < target_hashes {
                key_buf.truncate(offset_start);
                write!(key_buf, "{i}").expect("writing to a Vec cannot fail");

                let hash = match config.hash_function {
                    HashFunction::XxHash64 => xxhash64(&key_buf, 0),
                    HashFunction::MurmurHash2 => murmur2_64a(&key_buf, STD_HASH_SEED),
                };

                trace!(
                    hash_key = %String::from_utf8_lossy(&key_buf),
                    hash,
                    "ring hash: adding hash"
                );
                entries.push(RingEntry {
                    hash,
                    host: Arc::clone(host),
                });
                i += 1;
                current_hashes += 1.0;
            }
            min_hashes_per_host = min_hashes_per_host.min(i);
            max_hashes_per_host = max_hashes_per_host.max(i);
        }

        // Stable: entries with equal hashes keep insertion order.
        entries.sort_by_key(|entry| entry.hash);

        if tracing::enabled!(Level::TRACE) {
            for entry in &entries {
                let key = entry.host.hash_key(config.use_hostname_for_hashing);
                trace!(
                    host = %String::from_utf8_lossy(key),
                    hash = entry.hash,
                    "ring hash: entry"
                );
            }
        }

        let (shard_starts, rshift) = if config.sharded {
            build_shard_index(&entries)
        } else {
            (Vec::new(), 64)
        };

        stats.size.set(entries.len() as i64);
        stats.min_hashes_per_host.set(min_hashes_per_host as i64);
        stats.max_hashes_per_host.set(max_hashes_per_host as i64);

        Self {
            entries: entries.into_boxed_slice(),
            shard_starts: shard_starts.into_boxed_slice(),
            rshift,
        }
    }
}

impl<H> Ring<H> {
    /// Map a 64-bit hash to a host.
    ///
    /// Returns the host owning the first virtual node clockwise of `h`,
    /// wrapping past the top of the ring. `attempt > 0` rotates the selected
    /// position that many steps; this perturbs the choice for retries but
    /// does not guarantee a different host. Returns `None` iff the ring is
    /// empty.
    pub fn choose(&self, h: u64, attempt: u32) -> Option<Arc<H>> {
        if self.entries.is_empty() {
            return None;
        }

        // Ported from libketama's ketama_get_server. The indices must be
        // signed: the exit check relies on `highp` going below zero.
        let len = self.entries.len() as i64;
        let (mut lowp, mut highp) = self.search_window(h);

        let mut midp;
        loop {
            midp = (lowp + highp) / 2;

            if midp == len {
                midp = 0;
                break;
            }

            let midval = self.entries[midp as usize].hash;
            let midval1 = if midp == 0 {
                0
            } else {
                self.entries[midp as usize - 1].hash
            };

            if h <= midval && h > midval1 {
                break;
            }

            if midval < h {
                lowp = midp + 1;
            } else {
                highp = midp - 1;
            }

            if lowp > highp {
                midp = 0;
                break;
            }
        }

        if attempt > 0 {
            midp = (midp + i64::from(attempt)) % len;
        }

        Some(Arc::clone(&self.entries[midp as usize].host))
    }

    /// The `[lowp, highp]` window the binary search starts from.
    ///
    /// With sharding enabled this is the query's shard window, provided the
    /// raw shard value is a valid dense index and the window actually
    /// brackets `h`. Hashes can leave shard values unpopulated, making the
    /// raw value overshoot the dense index, and a query above the last entry
    /// belongs to no window; both cases fall back to the whole ring.
    fn search_window(&self, h: u64) -> (i64, i64) {
        let len = self.entries.len() as i64;
        if self.shard_starts.is_empty() {
            return (0, len);
        }

        // The split keeps the shift defined when `rshift` is 64.
        let shard_index = ((h >> (self.rshift - 1)) >> 1) as usize;
        if shard_index + 1 >= self.shard_starts.len() {
            return (0, len);
        }

        let lowp = self.shard_starts[shard_index];
        let highp = self.shard_starts[shard_index + 1];
        let below = if lowp == 0 {
            0
        } else {
            self.entries[lowp - 1].hash
        };
        if h > below && h <= self.entries[highp - 1].hash {
            (lowp as i64, highp as i64)
        } else {
            (0, len)
        }
    }

    /// Virtual nodes in ring order.
    pub fn entries(&self) -> &[RingEntry<H>] {
        &self.entries
    }

    /// Number of virtual nodes on the ring.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the dense shard windows over sorted `entries`.
///
/// Returns the boundary list and the right shift mapping a hash to its raw
/// shard value. Window `i` covers `[shard_starts[i], shard_starts[i + 1])`;
/// window ids are dense consecutive integers, so the boundary list stays
/// compact instead of becoming a sparse table over raw shard values.
fn build_shard_index<H>(entries: &[RingEntry<H>]) -> (Vec<usize>, u32) {
    if entries.is_empty() {
        return (Vec::new(), 64);
    }

    // Position of the first hash's highest set bit, by iterated halving.
    // The first (smallest) hash bounds how coarse the shards can be.
    let mut msb = 0u32;
    let mut n = entries[0].hash / 2;
    while n != 0 {
        n /= 2;
        msb += 1;
    }
    let rshift = (RSHIFT_INITIAL + msb).min(64);

    // Worst case every entry is its own shard.
    let mut shard_starts = Vec::with_capacity(entries.len() + 1);
    shard_starts.push(0);
    let mut prev_shard = 0u64;
    for (k, entry) in entries.iter().enumerate() {
        let current_shard = (entry.hash >> (rshift - 1)) >> 1;
        if k > 0 && current_shard != prev_shard {
            shard_starts.push(k);
            prev_shard = current_shard;
        }
    }
    shard_starts.push(entries.len());

    (shard_starts, rshift)
}
