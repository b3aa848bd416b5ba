//! Portable affinity-key hashing.
//!
//! The hash is fixed bit-for-bit so every implementation routes a key to the
//! same index:
//!
//! ```text
//! h = 0 (i32)
//! for each UTF-16 code unit u of key:
//!     h = h * 31 + u        (wrapping two's-complement)
//! index = |h| mod n         (|h| taken in 64 bits, so i32::MIN is valid)
//! ```
//!
//! This is the JVM `String.hashCode` polynomial. Note that modulo placement is
//! not consistent hashing: changing `n` moves most keys.

/// Hash an affinity key.
pub fn stable_hash(key: &str) -> i32 {
    key.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Map `key` onto `0..len`.
///
/// `len` must be non-zero.
pub fn bucket(key: &str, len: usize) -> usize {
    let magnitude = i64::from(stable_hash(key)).unsigned_abs();
    (magnitude % len as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values() {
        assert_eq!(stable_hash(""), 0);
        assert_eq!(stable_hash("a"), 97);
        assert_eq!(stable_hash("foo"), 101_574);
        assert_eq!(stable_hash("hello"), 99_162_322);
    }

    #[test]
    fn test_surrogate_pairs_hash_as_two_units() {
        // U+1F600 encodes as 0xD83D 0xDE00
        assert_eq!(stable_hash("\u{1F600}"), 0xD83D * 31 + 0xDE00);
    }

    #[test]
    fn test_negative_hash_uses_magnitude() {
        let h = stable_hash("payment-42-retry-xyz");
        let expected = (i64::from(h).unsigned_abs() % 7) as usize;
        assert_eq!(bucket("payment-42-retry-xyz", 7), expected);
    }

    #[test]
    fn test_min_value_does_not_overflow() {
        assert_eq!(stable_hash("polygenelubricants"), i32::MIN);
        // 2^31 mod 3 == 2
        assert_eq!(bucket("polygenelubricants", 3), 2);
    }

    #[test]
    fn test_empty_key_maps_to_first_slot() {
        assert_eq!(bucket("", 1), 0);
        assert_eq!(bucket("", 5), 0);
    }

    #[test]
    fn test_bucket_is_stable() {
        for len in 1..10 {
            assert_eq!(bucket("foo", len), bucket("foo", len));
            assert!(bucket("foo", len) < len);
        }
    }
}
