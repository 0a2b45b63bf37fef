//! Host identity as seen by the ring.

use std::sync::Arc;

use crate::error::Error;

/// An upstream host the ring can place and return.
///
/// The ring never inspects a host beyond the short byte strings exposed
/// here. Hosts are owned by the embedding framework, shared into the ring as
/// `Arc<H>`, and outlive any ring referencing them.
pub trait Host {
    /// Hostname bytes. Must be non-empty.
    fn hostname(&self) -> &[u8];

    /// Network address bytes (e.g. `10.0.0.1:6379`). Must be non-empty.
    fn address(&self) -> &[u8];

    /// The key fed to the ring hash for this host.
    fn hash_key(&self, use_hostname_for_hashing: bool) -> &[u8] {
        if use_hostname_for_hashing {
            self.hostname()
        } else {
            self.address()
        }
    }
}

/// Check that every host carries a non-empty hashing key.
///
/// Empty keys are a contract violation the builder only catches with a debug
/// assertion; callers that cannot vouch for their host set should run this
/// before [`Ring::build`](crate::Ring::build).
pub fn validate_host_keys<H: Host>(
    normalized_host_weights: &[(Arc<H>, f64)],
    use_hostname_for_hashing: bool,
) -> Result<(), Error> {
    for (host, _) in normalized_host_weights {
        if host.hash_key(use_hostname_for_hashing).is_empty() {
            return Err(Error::EmptyHashKey);
        }
    }
    Ok(())
}
