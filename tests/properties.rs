//! Property tests for the extraction and statistics pipeline.

use proptest::prelude::*;
use qrng::{get_extractor, reconcile, Bitstring, HashExtractor, Statistics, VonNeumannExtractor};

fn bitstring(max_len: usize) -> impl Strategy<Value = Bitstring> {
    prop::collection::vec(any::<bool>(), 0..max_len).prop_map(Bitstring::from_bits)
}

proptest! {
    #[test]
    fn von_neumann_keeps_at_most_half(bits in bitstring(512)) {
        let out = VonNeumannExtractor::new().extract(&bits);
        prop_assert!(out.len() <= bits.len() / 2);
    }

    #[test]
    fn von_neumann_decodes_unequal_pairs(pairs in prop::collection::vec(any::<bool>(), 0..128)) {
        // Only 01/10 pairs: every pair contributes exactly one bit.
        let raw = Bitstring::from_bits(pairs.iter().flat_map(|&b| [b, !b]));
        let out = VonNeumannExtractor::new().extract(&raw);
        prop_assert_eq!(out, Bitstring::from_bits(pairs));
    }

    #[test]
    fn hash_output_width_is_fixed(bits in bitstring(1024)) {
        let extractor = HashExtractor::default();
        let out = extractor.extract(&bits);
        prop_assert_eq!(out.len(), 256);
        prop_assert_eq!(out, extractor.extract(&bits));
    }

    #[test]
    fn unknown_mode_matches_von_neumann(mode in "[a-z_]{0,12}", bits in bitstring(256)) {
        prop_assume!(mode != "hash");
        prop_assert_eq!(
            get_extractor(&mode).extract(&bits),
            get_extractor("von_neumann").extract(&bits)
        );
    }

    #[test]
    fn reconcile_hits_exact_length(desired in 1usize..600, seed in bitstring(1200), use_hash in any::<bool>()) {
        // Raw input sized like the generator's 2x overcommit.
        let raw = Bitstring::from_bits(seed.iter().chain(std::iter::repeat(false)).take(desired * 2));
        let extractor = get_extractor(if use_hash { "hash" } else { "von_neumann" });

        let reconciled = reconcile(extractor.extract(&raw), &raw, desired);
        prop_assert_eq!(reconciled.bits.len(), desired);
    }

    #[test]
    fn statistics_stay_in_range(bits in bitstring(512)) {
        let stats = Statistics::estimate(&bits);
        prop_assert_eq!(stats.zeros + stats.ones, bits.len());
        prop_assert!((0.0..=1.0).contains(&stats.entropy_per_bit));
        prop_assert!((0.0..=1.0).contains(&stats.bias));
    }

    #[test]
    fn hex_matches_integer_value(value in any::<u128>(), nibbles in 1usize..=32) {
        let width = nibbles * 4;
        let masked = if width == 128 { value } else { value & ((1u128 << width) - 1) };
        let bits: Bitstring = format!("{:0width$b}", masked, width = width).parse().unwrap();

        let hex = bits.to_hex();
        prop_assert_eq!(hex.len(), nibbles);
        prop_assert_eq!(u128::from_str_radix(&hex, 16).unwrap(), masked);
    }
}
