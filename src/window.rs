// Copyright 2024 Karpeles Lab Inc.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::constants::HISTORY_SIZE;

/// Circular history of the most recent 8192 stream bytes
///
/// Indexed by absolute stream position; the position wraps modulo the
/// window size.
pub(crate) struct History {
    buf: Box<[u8; HISTORY_SIZE]>,
}

impl History {
    pub(crate) fn new() -> Self {
        History {
            buf: Box::new([0u8; HISTORY_SIZE]),
        }
    }

    #[inline]
    pub(crate) fn get(&self, pos: usize) -> u8 {
        self.buf[pos % HISTORY_SIZE]
    }

    #[inline]
    pub(crate) fn set(&mut self, pos: usize, byte: u8) {
        self.buf[pos % HISTORY_SIZE] = byte;
    }
}
