// Inline xxHash64 and MurmurHash2 (64A) implementations.
// Used only for placing virtual nodes and request keys on the ring,
// not for cryptographic purposes.

const PRIME64_1: u64 = 0x9E37_79B1_85EB_CA87;
const PRIME64_2: u64 = 0xC2B2_AE3D_27D4_EB4F;
const PRIME64_3: u64 = 0x1656_67B1_9E37_79F9;
const PRIME64_4: u64 = 0x85EB_CA77_C2B2_AE63;
const PRIME64_5: u64 = 0x27D4_EB2F_1656_67C5;

/// Seed libstdc++'s `std::hash` applies to byte strings. Rings built with
/// [`MurmurHash2`](crate::HashFunction::MurmurHash2) use it so their layout
/// matches deployments keyed by that hash family.
pub const STD_HASH_SEED: u64 = 0xc70f6907;

/// Compute the xxHash64 digest of `data`.
pub fn xxhash64(data: &[u8], seed: u64) -> u64 {
    let len = data.len() as u64;
    let mut rest = data;

    let mut h = if rest.len() >= 32 {
        let mut v1 = seed.wrapping_add(PRIME64_1).wrapping_add(PRIME64_2);
        let mut v2 = seed.wrapping_add(PRIME64_2);
        let mut v3 = seed;
        let mut v4 = seed.wrapping_sub(PRIME64_1);

        while rest.len() >= 32 {
            v1 = xx_round(v1, read_u64(rest, 0));
            v2 = xx_round(v2, read_u64(rest, 8));
            v3 = xx_round(v3, read_u64(rest, 16));
            v4 = xx_round(v4, read_u64(rest, 24));
            rest = &rest[32..];
        }

        let mut acc = v1
            .rotate_left(1)
            .wrapping_add(v2.rotate_left(7))
            .wrapping_add(v3.rotate_left(12))
            .wrapping_add(v4.rotate_left(18));
        acc = xx_merge(acc, v1);
        acc = xx_merge(acc, v2);
        acc = xx_merge(acc, v3);
        xx_merge(acc, v4)
    } else {
        seed.wrapping_add(PRIME64_5)
    };

    h = h.wrapping_add(len);

    while rest.len() >= 8 {
        h ^= xx_round(0, read_u64(rest, 0));
        h = h
            .rotate_left(27)
            .wrapping_mul(PRIME64_1)
            .wrapping_add(PRIME64_4);
        rest = &rest[8..];
    }
    if rest.len() >= 4 {
        h ^= u64::from(read_u32(rest, 0)).wrapping_mul(PRIME64_1);
        h = h
            .rotate_left(23)
            .wrapping_mul(PRIME64_2)
            .wrapping_add(PRIME64_3);
        rest = &rest[4..];
    }
    for &byte in rest {
        h ^= u64::from(byte).wrapping_mul(PRIME64_5);
        h = h.rotate_left(11).wrapping_mul(PRIME64_1);
    }

    h ^= h >> 33;
    h = h.wrapping_mul(PRIME64_2);
    h ^= h >> 29;
    h = h.wrapping_mul(PRIME64_3);
    h ^= h >> 32;
    h
}

#[inline]
fn xx_round(acc: u64, input: u64) -> u64 {
    acc.wrapping_add(input.wrapping_mul(PRIME64_2))
        .rotate_left(31)
        .wrapping_mul(PRIME64_1)
}

#[inline]
fn xx_merge(acc: u64, val: u64) -> u64 {
    (acc ^ xx_round(0, val))
        .wrapping_mul(PRIME64_1)
        .wrapping_add(PRIME64_4)
}

/// Compute the MurmurHash2 64A digest of `data`.
pub fn murmur2_64a(data: &[u8], seed: u64) -> u64 {
    const M: u64 = 0xC6A4_A793_5BD1_E995;
    const R: u32 = 47;

    let mut h = seed ^ (data.len() as u64).wrapping_mul(M);

    let mut chunks = data.chunks_exact(8);
    for chunk in &mut chunks {
        let mut k = u64::from_le_bytes(chunk.try_into().expect("8 bytes"));
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);
        h ^= k;
        h = h.wrapping_mul(M);
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        for (i, &byte) in tail.iter().enumerate() {
            h ^= u64::from(byte) << (8 * i);
        }
        h = h.wrapping_mul(M);
    }

    h ^= h >> R;
    h = h.wrapping_mul(M);
    h ^= h >> R;
    h
}

#[inline]
fn read_u64(data: &[u8], off: usize) -> u64 {
    u64::from_le_bytes(data[off..off + 8].try_into().expect("8 bytes"))
}

#[inline]
fn read_u32(data: &[u8], off: usize) -> u32 {
    u32::from_le_bytes(data[off..off + 4].try_into().expect("4 bytes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xxhash64_reference_vectors() {
        // Published xxHash64 sanity values, seed 0.
        assert_eq!(xxhash64(b"", 0), 0xEF46_DB37_51D8_E999);
        assert_eq!(xxhash64(b"a", 0), 0xD24E_C4F1_A98C_6E5B);
        assert_eq!(xxhash64(b"abc", 0), 0x44BC_2CF5_AD77_0999);
        // Exercises the 32-byte stripe loop (39-byte input).
        assert_eq!(
            xxhash64(b"Nobody inspects the spammish repetition", 0),
            0xFBCE_A83C_8A37_8BF1
        );
    }

    #[test]
    fn xxhash64_seeded() {
        assert_eq!(xxhash64(b"xxhash", 20141025), 13067679811253438005);
        assert_ne!(xxhash64(b"xxhash", 0), xxhash64(b"xxhash", 1));
    }

    #[test]
    fn xxhash64_all_tail_paths() {
        // Lengths hitting the 8-byte, 4-byte, and single-byte tails.
        let data: Vec<u8> = (0u8..64).collect();
        let mut seen = std::collections::HashSet::new();
        for len in 0..=data.len() {
            assert!(seen.insert(xxhash64(&data[..len], 0)));
        }
    }

    #[test]
    fn murmur2_64a_empty_seed_zero() {
        // With no data and seed 0 every mixing step is a no-op.
        assert_eq!(murmur2_64a(b"", 0), 0);
        assert_ne!(murmur2_64a(b"", STD_HASH_SEED), 0);
    }

    #[test]
    fn murmur2_64a_tail_lengths_distinct() {
        let data: Vec<u8> = (0u8..32).collect();
        let mut seen = std::collections::HashSet::new();
        for len in 0..=data.len() {
            assert!(seen.insert(murmur2_64a(&data[..len], STD_HASH_SEED)));
        }
    }

    #[test]
    fn murmur2_64a_deterministic() {
        let a = murmur2_64a(b"backend-1.example.com_42", STD_HASH_SEED);
        let b = murmur2_64a(b"backend-1.example.com_42", STD_HASH_SEED);
        assert_eq!(a, b);
        assert_ne!(a, murmur2_64a(b"backend-1.example.com_43", STD_HASH_SEED));
    }

    #[test]
    fn functions_disagree() {
        // Same key, different algorithms: the ring layouts must differ.
        assert_ne!(
            xxhash64(b"host_0", 0),
            murmur2_64a(b"host_0", STD_HASH_SEED)
        );
    }
}
