// Copyright 2024 Karpeles Lab Inc.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Block transposition cipher used to obfuscate replay payloads
//!
//! Within a block, ciphertext bytes are consumed in order and scattered in
//! reverse, interleaved in two halves. For a block of 8 the plaintext
//! positions are filled in the order
//!
//! ```text
//! 7 5 3 1 6 4 2 0
//! ```
//!
//! Every byte is XORed with a running mask that advances once per byte
//! over the whole buffer, so blocks cannot be processed independently.

use crate::error::{Error, Result};

/// Parameters of one cipher layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherParams {
    pub(crate) block_size: usize,
    pub(crate) base_mask: u8,
    pub(crate) mask_increment: u8,
}

impl CipherParams {
    /// Create cipher parameters. `block_size` must be non-zero.
    pub fn new(block_size: usize, base_mask: u8, mask_increment: u8) -> Result<Self> {
        if block_size == 0 {
            return Err(Error::InvalidInput("cipher block size must be non-zero".into()));
        }
        Ok(CipherParams {
            block_size,
            base_mask,
            mask_increment,
        })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn base_mask(&self) -> u8 {
        self.base_mask
    }

    pub fn mask_increment(&self) -> u8 {
        self.mask_increment
    }

    /// Number of leading bytes of a `len`-byte buffer the cipher touches.
    ///
    /// A trailing partial block shorter than a quarter block is left alone,
    /// and so is the last byte of an odd-length buffer. The odd byte is
    /// subtracted even when the partial block was already dropped.
    pub fn transformed_len(&self, len: usize) -> usize {
        let remainder = len % self.block_size;
        let mut n = len;
        if remainder < self.block_size / 4 {
            n -= remainder;
        }
        n.saturating_sub(len & 1)
    }
}

/// Offsets within a block of `size` bytes, in the order the decrypting side
/// fills them: every other byte from the end, then the ones in between.
fn scatter_order(size: usize) -> impl Iterator<Item = usize> {
    let odd = (0..size.div_ceil(2)).map(move |k| size - 1 - 2 * k);
    let even = (0..size / 2).map(move |k| size - 2 - 2 * k);
    odd.chain(even)
}

/// Remove one cipher layer in place
pub fn decrypt(data: &mut [u8], params: &CipherParams) {
    let encoded = data.to_vec();
    let mut mask = params.base_mask;

    for_each_block(data.len(), params, |start, size| {
        for (i, offset) in scatter_order(size).enumerate() {
            data[start + offset] = encoded[start + i] ^ mask;
            mask = mask.wrapping_add(params.mask_increment);
        }
    });
}

/// Apply one cipher layer in place; the inverse of [`decrypt`]
pub fn encrypt(data: &mut [u8], params: &CipherParams) {
    let decoded = data.to_vec();
    let mut mask = params.base_mask;

    for_each_block(data.len(), params, |start, size| {
        for (i, offset) in scatter_order(size).enumerate() {
            data[start + i] = decoded[start + offset] ^ mask;
            mask = mask.wrapping_add(params.mask_increment);
        }
    });
}

/// Walk the transformed prefix block by block, passing `(start, size)`.
/// The last block may be shorter than the block size.
fn for_each_block(len: usize, params: &CipherParams, mut f: impl FnMut(usize, usize)) {
    let end = params.transformed_len(len);
    let mut start = 0;
    while start < end {
        let size = params.block_size.min(end - start);
        f(start, size);
        start += size;
    }
}
