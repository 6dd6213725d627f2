//! Key hashing.

const HASH_MULTIPLIER: u64 = 65599;

/// Polynomial hash over the key's bytes: `h = h * 65599 + byte`.
///
/// Bytes are added as unsigned values with wrapping `u64` arithmetic. A
/// hash that sign-extends `char` (as C does on signed-`char` platforms)
/// therefore places keys containing bytes >= 0x80 in different buckets;
/// ASCII keys land identically.
#[inline]
pub(crate) fn hash_key(key: &str) -> u64 {
    key.bytes().fold(0u64, |h, b| {
        h.wrapping_mul(HASH_MULTIPLIER).wrapping_add(u64::from(b))
    })
}

/// Bucket index for `key` in an array of `bucket_count` chains.
///
/// Panics if `bucket_count` is zero; callers pass a tier's bucket count.
#[inline]
pub(crate) fn bucket_index(key: &str, bucket_count: usize) -> usize {
    debug_assert!(bucket_count > 0);
    (hash_key(key) % bucket_count as u64) as usize
}
