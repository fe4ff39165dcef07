#![no_main]

use libfuzzer_sys::fuzz_target;
use tsdelta::{inspect, Decoder};

fuzz_target!(|data: &[u8]| {
    // Feed arbitrary bytes to the decoder - should never panic
    // May fail with a DecodeError for malformed input, but should not crash
    let _ = inspect(data);

    if let Ok(mut dec) = Decoder::new(data) {
        // A constant-delta header can claim up to 2^64 timestamps; stop early
        for _ in 0..100_000 {
            if !dec.next() {
                break;
            }
            assert!(dec.read().is_some(), "positioned decoder without a value");
        }
    }
});
