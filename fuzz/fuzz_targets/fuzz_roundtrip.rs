#![no_main]

use libfuzzer_sys::fuzz_target;
use th128rpy::{compress, decode, decompress, encode};

fuzz_target!(|data: &[u8]| {
    // The match search is quadratic in the window; keep inputs small
    if data.len() > 100_000 {
        return;
    }

    let out = decompress(&compress(data));
    assert!(out.terminated, "LZSS stream lost its terminator");
    assert_eq!(data, &out.data[..], "LZSS roundtrip failed");

    let encoded = encode(data);
    let decoded = decode(&encoded, data.len()).expect("pipeline decode failed");
    assert_eq!(data, &decoded[..], "Pipeline roundtrip failed");
});
