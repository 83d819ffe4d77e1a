// Copyright 2024 Karpeles Lab Inc.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! # Touhou 12.8 replay codec
//!
//! This library reads and writes the payload of Touhou 12.8 (`.rpy`) replay
//! files. The game stores replay data compressed with a small LZSS variant
//! and then scrambled twice with a block transposition cipher.
//!
//! It provides:
//! - LZSS compression that reproduces the game's encoder byte for byte
//! - The two-layer cipher and its inverse
//! - Replay file framing (header, payload, user data)
//! - Parallel batch processing with the `concurrent` feature
//!
//! ## Example
//!
//! ```rust
//! use th128rpy::{decode, encode};
//!
//! let raw = b"replay data replay data replay data";
//! let encoded = encode(raw);
//! let decoded = decode(&encoded, raw.len()).expect("decoding failed");
//! assert_eq!(raw, &decoded[..]);
//! ```

mod bitio;
mod cipher;
mod compress;
mod constants;
mod container;
mod decompress;
mod error;
mod pipeline;
mod window;

#[cfg(feature = "concurrent")]
mod concurrent;

pub use bitio::{BitReader, BitWriter};
pub use cipher::{decrypt, encrypt, CipherParams};
pub use compress::{compress, max_compressed_len};
pub use constants::{
    HISTORY_SIZE, LAYER_A, LAYER_B, MAX_MATCH_LENGTH, MIN_MATCH_LENGTH, REPLAY_HEADER_SIZE,
    REPLAY_MAGIC,
};
pub use container::{ReplayFile, ReplayHeader};
pub use decompress::{decompress, Decompressed};
pub use error::{Error, Result};
pub use pipeline::{decode, decrypt_layers, encode, Codec};

#[cfg(feature = "concurrent")]
pub use concurrent::{decode_batch, decode_batch_with, encode_batch, encode_batch_with};
