// Copyright 2024 Karpeles Lab Inc.
// Comprehensive tests for the replay codec

use th128rpy::{
    compress, decode, decompress, decrypt, decrypt_layers, encode, encrypt, CipherParams, Codec,
    Error, ReplayFile, ReplayHeader, HISTORY_SIZE, LAYER_A, LAYER_B, REPLAY_HEADER_SIZE,
    REPLAY_MAGIC,
};

fn test_cases() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("empty", Vec::new()),
        ("single_byte", vec![b'x']),
        ("small_text", b"Hello, Gensokyo!".to_vec()),
        ("repeated", vec![b'a'; 1000]),
        ("pattern", (0..1000).map(|i| (i % 256) as u8).collect()),
        ("one_window", (0..HISTORY_SIZE).map(|i| (i * 131 % 251) as u8).collect()),
        (
            "frames",
            // input frames repeat with small variations, like real replays
            (0..3000u32)
                .flat_map(|f| {
                    let keys = if f % 60 < 30 { 0x0001u16 } else { 0x0011 };
                    let mut frame = keys.to_le_bytes().to_vec();
                    frame.extend_from_slice(&((f / 7) as u16).to_le_bytes());
                    frame.extend_from_slice(&[0, 0]);
                    frame
                })
                .collect(),
        ),
    ]
}

#[test]
fn test_round_trip_all_layers() {
    for (name, data) in test_cases() {
        let compressed = compress(&data);
        let out = decompress(&compressed);
        assert!(out.terminated, "{}: missing terminator", name);
        assert_eq!(out.data, data, "{}: lzss round-trip failed", name);

        let encoded = encode(&data);
        assert_eq!(encoded.len(), compressed.len(), "{}: cipher changed length", name);
        let decoded = decode(&encoded, data.len())
            .unwrap_or_else(|e| panic!("{}: decode failed: {}", name, e));
        assert_eq!(data, decoded, "{}: pipeline round-trip failed", name);
    }
}

#[test]
fn test_compression_ratio() {
    let repeated = vec![0x55u8; 18 * 1000];
    let compressed = compress(&repeated);
    // one literal plus ~1000 max-length matches of 18 bits each
    assert!(compressed.len() < repeated.len() / 7);

    let frames = &test_cases()[6].1;
    assert!(compress(frames).len() < frames.len() / 2);
}

#[test]
fn test_layer_order_matters() {
    // mostly literals, so the stream is long enough for the outer layer
    let data: Vec<u8> = (0..4000u32)
        .map(|i| (i.wrapping_mul(2654435761) >> 13) as u8)
        .collect();
    let mut manual = compress(&data);
    encrypt(&mut manual, &LAYER_B);
    encrypt(&mut manual, &LAYER_A);
    assert_eq!(manual, encode(&data));

    let mut wrong = manual.clone();
    decrypt(&mut wrong, &LAYER_B);
    decrypt(&mut wrong, &LAYER_A);
    assert_ne!(wrong, compress(&data));

    assert_eq!(decrypt_layers(&manual), compress(&data));
}

#[test]
fn test_cipher_parameters() {
    assert_eq!(LAYER_A.block_size(), 0x800);
    assert_eq!(LAYER_A.base_mask(), 0x5e);
    assert_eq!(LAYER_A.mask_increment(), 0xe7);
    assert_eq!(LAYER_B.block_size(), 0x80);
    assert_eq!(LAYER_B.base_mask(), 0x7d);
    assert_eq!(LAYER_B.mask_increment(), 0x36);
    assert_eq!(Codec::default(), Codec::new(LAYER_A, LAYER_B));
    assert!(CipherParams::new(0, 0, 0).is_err());
}

#[test]
fn test_truncated_stream_reports_size() {
    let data = b"cut me short, cut me short, cut me short".repeat(30);
    let compressed = compress(&data);

    let mut truncated = compressed[..compressed.len() / 2].to_vec();
    encrypt(&mut truncated, &LAYER_B);
    encrypt(&mut truncated, &LAYER_A);

    match decode(&truncated, data.len()) {
        Err(Error::SizeMismatch { expected, actual }) => {
            assert_eq!(expected, data.len());
            assert!(actual < expected);
        }
        other => panic!("unexpected result: {:?}", other.map(|d| d.len())),
    }
}

#[test]
fn test_replay_file_reencode() {
    let raw = test_cases()[6].1.clone();
    let payload = encode(&raw);
    let user_data = b"USER\x14\x00\x00\x00\x00\x00\x00\x00comment!".to_vec();
    let header = ReplayHeader {
        magic: REPLAY_MAGIC,
        version: 2,
        unused: 0,
        user_data_offset: (REPLAY_HEADER_SIZE + payload.len()) as u32,
        game_version: 0x100,
        reserved: [0, 0],
        compressed_size: payload.len() as u32,
        uncompressed_size: raw.len() as u32,
    };
    let mut bytes = header.to_bytes();
    bytes.extend_from_slice(&payload);
    bytes.extend_from_slice(&user_data);

    let replay = ReplayFile::parse(&bytes).unwrap();
    let decoded = replay.decode_payload().unwrap();
    assert_eq!(decoded, raw);

    // re-encoding the decoded data reproduces the file exactly
    let rebuilt = replay.with_payload(&decoded).unwrap();
    assert_eq!(rebuilt.to_bytes(), bytes);
}
