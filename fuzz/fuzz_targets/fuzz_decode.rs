#![no_main]

use libfuzzer_sys::fuzz_target;
use th128rpy::{decode, decompress, ReplayFile};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bitstreams and payloads must never panic
    let _ = decompress(data);
    let _ = decode(data, data.len() * 2);

    // Nor should arbitrary replay files
    if let Ok(replay) = ReplayFile::parse(data) {
        let _ = replay.decode_payload();
    }
});
