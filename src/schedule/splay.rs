use md5::{Digest, Md5};

/// Deterministic startup delay in `[0, splay)`, or `None` when splay is
/// disabled.
///
/// The seed is the explicit `shard_seed` when one is configured, otherwise the
/// 128-bit MD5 digest of the node identity taken as an unsigned integer. The
/// same `(identity, shard_seed, splay)` triple always produces the same
/// offset: this spreads a fleet's wake-ups across the splay window while
/// staying reproducible for debugging.
pub fn derive_sleep_offset(splay: u64, identity: &str, shard_seed: Option<u64>) -> Option<u64> {
    if splay == 0 {
        return None;
    }
    let seed = shard_seed.map_or_else(|| identity_seed(identity), u128::from);
    #[allow(clippy::cast_possible_truncation)] // remainder is < splay, a u64
    let offset = (seed % u128::from(splay)) as u64;
    Some(offset)
}

/// MD5(identity) interpreted as a big-endian u128, equivalent to parsing the
/// digest's hex text as base 16.
fn identity_seed(identity: &str) -> u128 {
    let digest = Md5::digest(identity.as_bytes());
    u128::from_be_bytes(digest.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_splay_disables_the_offset() {
        assert_eq!(derive_sleep_offset(0, "node-01.example.net", None), None);
        assert_eq!(derive_sleep_offset(0, "node-01.example.net", Some(42)), None);
    }

    #[test]
    fn offset_is_stable_across_calls() {
        let first = derive_sleep_offset(300, "node-01.example.net", None);
        for _ in 0..10 {
            assert_eq!(derive_sleep_offset(300, "node-01.example.net", None), first);
        }
    }

    #[test]
    fn offset_stays_within_the_splay_window() {
        for splay in [1, 2, 7, 60, 300, 86_400] {
            for identity in ["a", "node-01", "node-02.example.net", ""] {
                let offset = derive_sleep_offset(splay, identity, None).unwrap();
                assert!(offset < splay, "offset {offset} out of range for splay {splay}");
            }
        }
    }

    #[test]
    fn shard_seed_overrides_the_identity() {
        assert_eq!(derive_sleep_offset(300, "ignored", Some(617)), Some(17));
        assert_eq!(derive_sleep_offset(300, "also-ignored", Some(617)), Some(17));
    }

    #[test]
    fn identity_seed_matches_hex_interpretation() {
        // MD5("node-01") = 3429e0b1fe17b7c6d7fe5c515e72a093
        let expected = u128::from_str_radix("3429e0b1fe17b7c6d7fe5c515e72a093", 16).unwrap();
        assert_eq!(identity_seed("node-01"), expected);
        assert_eq!(derive_sleep_offset(300, "node-01", None), Some(299));
    }

    #[test]
    fn different_identities_usually_land_on_different_offsets() {
        let a = derive_sleep_offset(1800, "node-01.example.net", None);
        let b = derive_sleep_offset(1800, "node-02.example.net", None);
        assert_ne!(a, b);
    }
}
