//! Polynomial string hash used to address buckets

/// Multiplier applied to the running hash before each byte is folded in
const MULTIPLIER: i32 = 31;

/// Maps `key` to a bucket index in `[0, table_size)`.
///
/// Each UTF-8 byte of the key is read as a signed 8-bit value and folded into a 32-bit
/// signed accumulator as `hash * 31 + byte`, wrapping on overflow. The magnitude of the
/// accumulator (taken unsigned, so `i32::MIN` is well defined) is then reduced modulo
/// `table_size`.
///
/// A `table_size` of zero maps every key to index 0.
#[must_use]
pub fn hash_index(key: &str, table_size: usize) -> usize {
    let hash = key.bytes().fold(0_i32, |hash, byte| {
        hash.wrapping_mul(MULTIPLIER).wrapping_add(i32::from(i8::from_ne_bytes([byte])))
    });
    let magnitude = u64::from(hash.unsigned_abs());

    u64::try_from(table_size)
        .ok()
        .and_then(|size| magnitude.checked_rem(size))
        .and_then(|index| usize::try_from(index).ok())
        .unwrap_or(0)
}
