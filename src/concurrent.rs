// Copyright 2024 Karpeles Lab Inc.
// Parallel batch processing using Rayon

use rayon::prelude::*;

use crate::error::Result;
use crate::pipeline::Codec;

/// Decode many independent payloads in parallel
///
/// Each item is `(encoded payload, expected uncompressed length)`. Results
/// come back in input order; one failing item does not affect the others.
///
/// # Example
///
/// ```ignore
/// use th128rpy::{decode_batch, encode};
///
/// let a = encode(b"first replay");
/// let b = encode(b"second replay");
/// let results = decode_batch(&[(&a[..], 12), (&b[..], 13)]);
/// assert_eq!(results[1].as_deref().unwrap(), b"second replay");
/// ```
pub fn decode_batch(items: &[(&[u8], usize)]) -> Vec<Result<Vec<u8>>> {
    decode_batch_with(&Codec::default(), items)
}

/// Like [`decode_batch`], with explicit cipher layers
pub fn decode_batch_with(codec: &Codec, items: &[(&[u8], usize)]) -> Vec<Result<Vec<u8>>> {
    items
        .par_iter()
        .map(|&(encoded, uncompressed_len)| codec.decode(encoded, uncompressed_len))
        .collect()
}

/// Encode many raw payloads in parallel, preserving order
pub fn encode_batch(items: &[&[u8]]) -> Vec<Vec<u8>> {
    encode_batch_with(&Codec::default(), items)
}

/// Like [`encode_batch`], with explicit cipher layers
pub fn encode_batch_with(codec: &Codec, items: &[&[u8]]) -> Vec<Vec<u8>> {
    items.par_iter().map(|raw| codec.encode(raw)).collect()
}
