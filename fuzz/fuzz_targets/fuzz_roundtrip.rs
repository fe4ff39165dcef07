#![no_main]

use libfuzzer_sys::fuzz_target;
use tsdelta::{decode, inspect, Decoder, Encoder};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte picks a scale so granular (divisible) deltas get exercised
    let scale = 10_i64.pow(u32::from(data[0] % 12));
    let mut enc: Encoder = Encoder::new();
    let mut expected = Vec::new();
    let mut ts = 1_760_000_000_000_000_000_i64;

    // Remaining bytes are interpreted as i16 deltas in units of `scale`,
    // with a full i64 jump whenever the delta is i16::MIN
    for chunk in data[1..].chunks_exact(2) {
        let delta = i16::from_le_bytes([chunk[0], chunk[1]]);
        if delta == i16::MIN {
            ts = ts.wrapping_mul(-7).wrapping_add(i64::MAX / 3);
        } else {
            ts = ts.wrapping_add(i64::from(delta).wrapping_mul(scale));
        }
        enc.write(ts);
        expected.push(ts);
    }

    let bytes = enc.to_bytes().expect("encoding never fails");

    // Property 1: decode(encode(ts)) == ts
    assert_eq!(decode(&bytes).expect("own output must decode"), expected, "roundtrip mismatch");

    // Property 2: inspect() count matches
    let count = inspect(&bytes).expect("own output must inspect").map_or(0, |info| info.count);
    assert_eq!(count, expected.len() as u64, "count mismatch");

    // Property 3: exhaustion is sticky
    let mut dec = Decoder::new(&bytes).expect("own output must decode");
    while dec.next() {}
    assert!(!dec.next(), "next() returned true after exhaustion");
    assert_eq!(dec.read(), None, "read() returned a value after exhaustion");
});
