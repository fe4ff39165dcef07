use crate::{decode, inspect, Decoder, Encoder, Encoding};
use proptest::prelude::*;

// Mid-2025 in nanoseconds; far enough from the i64 edges for any generated jitter
const BASE_TS: i64 = 1_750_000_000_000_000_000;

fn encode_all(ts: &[i64]) -> Vec<u8> {
    let enc: Encoder = ts.iter().copied().collect();
    enc.finalize().unwrap()
}

/// Generate tests for timestamps aligned to a specific granularity using a macro
macro_rules! proptest_granularity {
    ($step:expr, $mod_name:ident) => {
        mod $mod_name {
            use super::*;

            prop_compose! {
                /// Timestamps on a `$step` grid with jitter of up to ±10 steps, any order
                fn arb_grid()(
                    count in 0usize..500,
                )(
                    jitters in prop::collection::vec(-10i64..=10, count),
                ) -> Vec<i64> {
                    jitters.iter().enumerate()
                        .map(|(i, &j)| BASE_TS + (i as i64 + j) * ($step as i64))
                        .collect()
                }
            }

            proptest! {
                /// Property: decode(encode(ts)) == ts, including order
                #[test]
                fn prop_roundtrip(ts in arb_grid()) {
                    let bytes = encode_all(&ts);
                    prop_assert_eq!(decode(&bytes).unwrap(), ts);
                }

                /// Property: the divisor is at least the grid granularity
                #[test]
                fn prop_divisor_covers_grid(ts in arb_grid()) {
                    prop_assume!(ts.len() >= 2);
                    let bytes = encode_all(&ts);
                    let info = inspect(&bytes).unwrap().unwrap();
                    let grid = ($step as i64).min(1_000_000_000);
                    prop_assert!(info.encoding != Encoding::Raw);
                    prop_assert_eq!(info.divisor() % grid, 0,
                        "divisor {} does not cover grid {}", info.divisor(), grid);
                }

                /// Property: inspect() count matches the number of decoded timestamps
                #[test]
                fn prop_count_consistency(ts in arb_grid()) {
                    let bytes = encode_all(&ts);
                    let count = inspect(&bytes).unwrap().map_or(0, |info| info.count);
                    prop_assert_eq!(count, ts.len() as u64);
                }

                /// Property: perfectly regular grids collapse to a constant-delta block
                #[test]
                fn prop_regular_is_constant_delta(count in 1usize..2000) {
                    let ts: Vec<i64> = (0..count).map(|i| BASE_TS + i as i64 * ($step as i64)).collect();
                    let bytes = encode_all(&ts);
                    prop_assert_eq!(bytes[0] >> 4, 1);
                    prop_assert!(bytes.len() <= 1 + 8 + 10 + 10);
                    prop_assert_eq!(decode(&bytes).unwrap(), ts);
                }
            }
        }
    };
}

proptest_granularity!(1, nanoseconds);
proptest_granularity!(1_000, microseconds);
proptest_granularity!(1_000_000, milliseconds);
proptest_granularity!(1_000_000_000, seconds);
proptest_granularity!(60_000_000_000_i64, minutes);

proptest! {
    /// Property: arbitrary i64 sequences round-trip, whatever layout is chosen
    #[test]
    fn prop_roundtrip_any(ts in prop::collection::vec(any::<i64>(), 0..300)) {
        let bytes = encode_all(&ts);
        prop_assert_eq!(decode(&bytes).unwrap(), ts);
    }

    /// Property: next()/read() agrees with decode() and stays exhausted
    #[test]
    fn prop_pull_matches_decode(ts in prop::collection::vec(-1_000_000i64..1_000_000, 0..300)) {
        let bytes = encode_all(&ts);
        let mut dec = Decoder::new(&bytes).unwrap();
        let mut pulled = Vec::new();
        while dec.next() {
            pulled.push(dec.read().unwrap());
        }
        prop_assert_eq!(&pulled, &ts);
        prop_assert!(!dec.next());
        prop_assert_eq!(dec.read(), None);
    }

    /// Property: encoding is deterministic and does not consume the encoder
    #[test]
    fn prop_idempotent_serialization(ts in prop::collection::vec(any::<i64>(), 0..100)) {
        let enc: Encoder = ts.iter().copied().collect();
        prop_assert_eq!(enc.to_bytes().unwrap(), enc.to_bytes().unwrap());
    }

    /// Property: raw is chosen only when some zigzag delta needs more than 60 bits
    #[test]
    fn prop_raw_only_when_needed(ts in prop::collection::vec(any::<i64>(), 2..50)) {
        let bytes = encode_all(&ts);
        let info = inspect(&bytes).unwrap().unwrap();
        let max_zigzag = ts.windows(2)
            .map(|w| crate::varint::zigzag_encode(w[1].wrapping_sub(w[0])))
            .max()
            .unwrap_or(0);
        if info.encoding == Encoding::Raw {
            prop_assert!(max_zigzag >= 1 << 60);
            prop_assert_eq!(bytes.len(), 1 + 8 * ts.len());
        }
    }

    /// Property: small random deltas never fall back to raw
    #[test]
    fn prop_bounded_deltas_never_raw(deltas in prop::collection::vec(-(1i64 << 58)..(1i64 << 58), 1..200)) {
        let mut ts = vec![BASE_TS];
        for d in &deltas {
            let last = *ts.last().unwrap();
            ts.push(last.wrapping_add(*d));
        }
        let bytes = encode_all(&ts);
        prop_assert!(bytes[0] >> 4 != 0, "unexpected raw fallback");
        prop_assert_eq!(decode(&bytes).unwrap(), ts);
    }

    /// Property: decoding arbitrary bytes never panics
    #[test]
    fn prop_decode_arbitrary_bytes(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        if let Ok(mut dec) = Decoder::new(&bytes) {
            // Bounded: a constant-delta header may claim an enormous count
            for _ in 0..1000 {
                if !dec.next() {
                    break;
                }
            }
        }
        let _ = inspect(&bytes);
    }
}
