// Copyright 2024 Karpeles Lab Inc.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Replay payload pipeline
//!
//! The game compresses the payload first and then encrypts it twice. The
//! layers do not commute, so decoding has to peel them in reverse order.

use crate::cipher::{decrypt, encrypt, CipherParams};
use crate::compress::compress;
use crate::constants::{LAYER_A, LAYER_B};
use crate::decompress::decompress;
use crate::error::{Error, Result};

/// Replay payload codec with configurable cipher layers
///
/// The default uses the parameters of Touhou 12.8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    outer: CipherParams,
    inner: CipherParams,
}

impl Codec {
    /// Create a codec. `outer` is the layer applied last when encoding.
    pub fn new(outer: CipherParams, inner: CipherParams) -> Self {
        Codec { outer, inner }
    }

    /// Decode an on-disk payload, checking the result against the declared
    /// uncompressed size.
    pub fn decode(&self, encoded: &[u8], uncompressed_len: usize) -> Result<Vec<u8>> {
        let compressed = self.decrypt_layers(encoded);

        tracing::debug!(compressed = compressed.len(), "decompressing replay data");
        let out = decompress(&compressed);
        if out.data.len() != uncompressed_len {
            return Err(Error::SizeMismatch {
                expected: uncompressed_len,
                actual: out.data.len(),
            });
        }

        Ok(out.data)
    }

    /// Encode a raw payload into its on-disk form
    pub fn encode(&self, raw: &[u8]) -> Vec<u8> {
        tracing::debug!(raw = raw.len(), "compressing replay data");
        let mut data = compress(raw);

        tracing::debug!(compressed = data.len(), "encrypting replay data");
        encrypt(&mut data, &self.inner);
        encrypt(&mut data, &self.outer);
        data
    }

    /// Strip both cipher layers, leaving the compressed token stream
    pub fn decrypt_layers(&self, encoded: &[u8]) -> Vec<u8> {
        tracing::debug!(encoded = encoded.len(), "decrypting replay data");
        let mut data = encoded.to_vec();
        decrypt(&mut data, &self.outer);
        decrypt(&mut data, &self.inner);
        data
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::new(LAYER_A, LAYER_B)
    }
}

/// Decode an on-disk replay payload into raw replay data.
///
/// Fails with [`Error::SizeMismatch`] when the decompressed size differs from
/// `uncompressed_len`.
///
/// # Example
///
/// ```rust
/// use th128rpy::{decode, encode};
///
/// let raw = b"stage data stage data stage data";
/// let encoded = encode(raw);
/// let decoded = decode(&encoded, raw.len()).expect("decode failed");
/// assert_eq!(&decoded[..], &raw[..]);
/// ```
pub fn decode(encoded: &[u8], uncompressed_len: usize) -> Result<Vec<u8>> {
    Codec::default().decode(encoded, uncompressed_len)
}

/// Encode raw replay data the way the game does
pub fn encode(raw: &[u8]) -> Vec<u8> {
    Codec::default().encode(raw)
}

/// Strip the game's cipher layers without decompressing
pub fn decrypt_layers(encoded: &[u8]) -> Vec<u8> {
    Codec::default().decrypt_layers(encoded)
}
