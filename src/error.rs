// Copyright 2024 Karpeles Lab Inc.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt;

/// Result type for replay codec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for replay decoding/encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Decompression produced a different byte count than the header declares
    SizeMismatch { expected: usize, actual: usize },

    /// The file does not start with the replay magic
    InvalidMagic([u8; 4]),

    /// The input ends before a structure it declares
    Truncated { needed: usize, available: usize },

    /// A header field points outside the file
    InvalidHeader(String),

    /// Invalid input
    InvalidInput(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SizeMismatch { expected, actual } => write!(
                f,
                "th128rpy: got {} bytes but expected {}",
                actual, expected
            ),
            Error::InvalidMagic(magic) => {
                write!(f, "th128rpy: invalid magic {:02x?}", magic)
            }
            Error::Truncated { needed, available } => write!(
                f,
                "th128rpy: truncated input, need {} bytes but only {} available",
                needed, available
            ),
            Error::InvalidHeader(msg) => write!(f, "th128rpy: invalid header: {}", msg),
            Error::InvalidInput(msg) => write!(f, "th128rpy: invalid input: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
