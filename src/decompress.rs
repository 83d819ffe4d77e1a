// Copyright 2024 Karpeles Lab Inc.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::bitio::BitReader;
use crate::constants::*;
use crate::window::History;

/// Output of [`decompress`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decompressed {
    /// Bytes produced before the stream ended
    pub data: Vec<u8>,

    /// Whether the stream ended on a terminator token.
    ///
    /// `false` means the source ran out first. The data is still returned.
    pub terminated: bool,
}

/// Decompress an LZSS token stream.
///
/// Token layout, packed MSB-first:
///
/// ```text
/// literal:        1 | byte (8 bits)
/// back-reference: 0 | index + 1 (13 bits) | length - 3 (4 bits)
/// terminator:     0 | 0 (13 bits)
/// ```
///
/// Bits past the end of `src` read as zero, so a terminator cut short at
/// the end of the buffer still ends the stream.
pub fn decompress(src: &[u8]) -> Decompressed {
    let mut history = History::new();
    let mut reader = BitReader::new(src);
    let mut dst = Vec::with_capacity(src.len() * 2);

    while !reader.is_exhausted() {
        let control_bit = reader.read_bits(1);
        if control_bit == 1 {
            let byte = reader.read_bits(8) as u8;
            history.set(dst.len(), byte);
            dst.push(byte);
            continue;
        }

        let encoded_index = reader.read_bits(HISTORY_INDEX_BITS);
        if encoded_index == TERMINATOR_INDEX {
            return Decompressed {
                data: dst,
                terminated: true,
            };
        }
        let index = (encoded_index - 1) as usize;
        let length = reader.read_bits(MATCH_LENGTH_BITS) as usize + MIN_MATCH_LENGTH;

        // Byte at a time: the source range may overlap what is being written
        for i in 0..length {
            let byte = history.get(index + i);
            history.set(dst.len(), byte);
            dst.push(byte);
        }
    }

    tracing::warn!(
        produced = dst.len(),
        "reached end of data but didn't find data terminator"
    );
    Decompressed {
        data: dst,
        terminated: false,
    }
}
