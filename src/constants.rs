// Copyright 2024 Karpeles Lab Inc.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::cipher::CipherParams;

/// Width of the back-reference index field, in bits
pub const HISTORY_INDEX_BITS: u32 = 13;

/// Size of the history window (8KB)
pub const HISTORY_SIZE: usize = 1 << HISTORY_INDEX_BITS;

/// Width of the back-reference length field, in bits
pub const MATCH_LENGTH_BITS: u32 = 4;

/// Shortest match worth a back-reference
pub const MIN_MATCH_LENGTH: usize = 3;

/// Longest match a back-reference can describe
pub const MAX_MATCH_LENGTH: usize = MIN_MATCH_LENGTH + (1 << MATCH_LENGTH_BITS) - 1;

/// Encoded index reserved for the stream terminator
pub const TERMINATOR_INDEX: u32 = 0;

/// Outer cipher layer (removed first when decoding)
pub const LAYER_A: CipherParams = CipherParams {
    block_size: 0x800,
    base_mask: 0x5e,
    mask_increment: 0xe7,
};

/// Inner cipher layer (removed second when decoding)
pub const LAYER_B: CipherParams = CipherParams {
    block_size: 0x80,
    base_mask: 0x7d,
    mask_increment: 0x36,
};

/// Magic bytes at the start of every replay file
pub const REPLAY_MAGIC: [u8; 4] = *b"128r";

/// Size of the fixed replay header
pub const REPLAY_HEADER_SIZE: usize = 0x24;
