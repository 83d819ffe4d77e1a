// Copyright 2024 Karpeles Lab Inc.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Replay file framing
//!
//! ```text
//! +--------+----------------------------+-----------+
//! | header | payload (compressed_size)  | user data |
//! | 0x24   | ciphered LZSS stream       |           |
//! +--------+----------------------------+-----------+
//! ```
//!
//! The user data starts at `user_data_offset` and runs to the end of the
//! file. Only the payload is decoded here; the record structures inside it
//! and the user data are passed through untouched.

use crate::constants::{REPLAY_HEADER_SIZE, REPLAY_MAGIC};
use crate::error::{Error, Result};
use crate::pipeline::Codec;

/// Fixed header at the start of a replay file; all fields little-endian
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayHeader {
    pub magic: [u8; 4],
    /// Replay format version (2 for the latest release)
    pub version: u32,
    pub unused: u32,
    /// Offset of the user data section from the start of the file
    pub user_data_offset: u32,
    /// Game version, e.g. 0x100 for 1.00
    pub game_version: u32,
    pub reserved: [u32; 2],
    pub compressed_size: u32,
    pub uncompressed_size: u32,
}

impl ReplayHeader {
    /// Parse the header from the start of `src`
    pub fn parse(src: &[u8]) -> Result<Self> {
        if src.len() < REPLAY_HEADER_SIZE {
            return Err(Error::Truncated {
                needed: REPLAY_HEADER_SIZE,
                available: src.len(),
            });
        }

        let magic = [src[0], src[1], src[2], src[3]];
        if magic != REPLAY_MAGIC {
            return Err(Error::InvalidMagic(magic));
        }

        let field = |i: usize| {
            let at = i * 4;
            u32::from_le_bytes([src[at], src[at + 1], src[at + 2], src[at + 3]])
        };

        Ok(ReplayHeader {
            magic,
            version: field(1),
            unused: field(2),
            user_data_offset: field(3),
            game_version: field(4),
            reserved: [field(5), field(6)],
            compressed_size: field(7),
            uncompressed_size: field(8),
        })
    }

    /// Append the encoded header to `dst`
    pub fn write_to(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&self.magic);
        for value in [
            self.version,
            self.unused,
            self.user_data_offset,
            self.game_version,
            self.reserved[0],
            self.reserved[1],
            self.compressed_size,
            self.uncompressed_size,
        ] {
            dst.extend_from_slice(&value.to_le_bytes());
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut dst = Vec::with_capacity(REPLAY_HEADER_SIZE);
        self.write_to(&mut dst);
        dst
    }
}

/// A replay file split into header, encoded payload and user data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayFile {
    pub header: ReplayHeader,
    /// Payload as stored on disk (compressed and encrypted)
    pub payload: Vec<u8>,
    pub user_data: Vec<u8>,
}

impl ReplayFile {
    /// Split a complete replay file
    pub fn parse(src: &[u8]) -> Result<Self> {
        let header = ReplayHeader::parse(src)?;

        let payload_end = REPLAY_HEADER_SIZE + header.compressed_size as usize;
        if payload_end > src.len() {
            return Err(Error::Truncated {
                needed: payload_end,
                available: src.len(),
            });
        }

        let user_data_offset = header.user_data_offset as usize;
        if user_data_offset < payload_end || user_data_offset > src.len() {
            return Err(Error::InvalidHeader(format!(
                "user data offset {:#x} outside {:#x}..={:#x}",
                user_data_offset,
                payload_end,
                src.len()
            )));
        }

        Ok(ReplayFile {
            header,
            payload: src[REPLAY_HEADER_SIZE..payload_end].to_vec(),
            user_data: src[user_data_offset..].to_vec(),
        })
    }

    /// Decode the payload into raw replay data
    pub fn decode_payload(&self) -> Result<Vec<u8>> {
        self.decode_payload_with(&Codec::default())
    }

    pub fn decode_payload_with(&self, codec: &Codec) -> Result<Vec<u8>> {
        codec.decode(&self.payload, self.header.uncompressed_size as usize)
    }

    /// Strip the cipher layers from the payload, keeping everything else.
    ///
    /// The result is not a valid replay anymore; it is meant for inspecting
    /// the compressed stream.
    pub fn decrypted(&self) -> Self {
        ReplayFile {
            header: self.header,
            payload: Codec::default().decrypt_layers(&self.payload),
            user_data: self.user_data.clone(),
        }
    }

    /// Replace the payload with a freshly encoded `raw`, fixing up the sizes
    /// and the user data offset. Other header fields and the user data are
    /// kept.
    pub fn with_payload(&self, raw: &[u8]) -> Result<Self> {
        self.with_payload_using(raw, &Codec::default())
    }

    pub fn with_payload_using(&self, raw: &[u8], codec: &Codec) -> Result<Self> {
        let payload = codec.encode(raw);

        let too_large = |what: &str, len: usize| {
            Error::InvalidInput(format!("{} of {} bytes does not fit the header", what, len))
        };
        let compressed_size =
            u32::try_from(payload.len()).map_err(|_| too_large("payload", payload.len()))?;
        let uncompressed_size =
            u32::try_from(raw.len()).map_err(|_| too_large("raw data", raw.len()))?;
        let user_data_offset = u32::try_from(REPLAY_HEADER_SIZE + payload.len())
            .map_err(|_| too_large("payload", payload.len()))?;

        Ok(ReplayFile {
            header: ReplayHeader {
                compressed_size,
                uncompressed_size,
                user_data_offset,
                ..self.header
            },
            payload,
            user_data: self.user_data.clone(),
        })
    }

    /// Serialize back to the on-disk layout
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut dst =
            Vec::with_capacity(REPLAY_HEADER_SIZE + self.payload.len() + self.user_data.len());
        self.header.write_to(&mut dst);
        dst.extend_from_slice(&self.payload);
        dst.extend_from_slice(&self.user_data);
        dst
    }
}
