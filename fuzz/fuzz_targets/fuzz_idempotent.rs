#![no_main]

use libfuzzer_sys::fuzz_target;
use tsdelta::Encoder;

fuzz_target!(|data: &[u8]| {
    // Bytes are interpreted as little-endian i64 timestamps
    let enc: Encoder = data
        .chunks_exact(8)
        .map(|c| i64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
        .collect();

    // Property: Multiple to_bytes() calls return identical results
    let bytes1 = enc.to_bytes();
    let bytes2 = enc.to_bytes();
    let bytes3 = enc.clone().finalize();

    assert_eq!(bytes1, bytes2, "to_bytes() not idempotent (1st vs 2nd call)");
    assert_eq!(bytes2, bytes3, "finalize() differs from to_bytes()");
});
