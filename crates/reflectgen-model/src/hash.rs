//! FNV-1a hashing of type names, used for stable type identity (spec §4.5).

const OFFSET_32: u32 = 0x811C_9DC5;
const PRIME_32: u32 = 0x0100_0193;

const OFFSET_64: u64 = 0xCBF2_9CE4_8422_2325;
const PRIME_64: u64 = 0x0000_0100_0000_01B3;

/// 32-bit FNV-1a over the UTF-8 bytes of `s`.
pub fn fnv1a_32(s: &str) -> u32 {
    let mut hash = OFFSET_32;
    for byte in s.as_bytes() {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(PRIME_32);
    }
    hash
}

/// 64-bit FNV-1a over the UTF-8 bytes of `s`.
pub fn fnv1a_64(s: &str) -> u64 {
    let mut hash = OFFSET_64;
    for byte in s.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(PRIME_64);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_the_offset_basis() {
        assert_eq!(fnv1a_32(""), OFFSET_32);
        assert_eq!(fnv1a_64(""), OFFSET_64);
    }

    #[test]
    fn known_vector_matches_reference_fnv1a() {
        // FNV-1a test vectors for the byte string "a".
        assert_eq!(fnv1a_32("a"), 0xe40c_292c);
        assert_eq!(fnv1a_64("a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn is_deterministic_across_calls() {
        let s = "ns::Inner::Point";
        assert_eq!(fnv1a_64(s), fnv1a_64(s));
        assert_eq!(fnv1a_32(s), fnv1a_32(s));
    }

    #[test]
    fn distinct_inputs_differ_with_overwhelming_probability() {
        assert_ne!(fnv1a_64("ns::Foo"), fnv1a_64("ns::Bar"));
    }
}
