// Copyright 2024 Karpeles Lab Inc.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! MSB-first bit reader and writer for the LZSS token stream
//!
//! Both sides track a byte cursor and a one-bit mask inside the current
//! byte, starting at `0x80`.
//!
//! The reader treats everything past the end of its buffer as zero bits.
//! The compressor relies on this: it only stores the first two bits of the
//! terminator token and leaves the remaining index bits implicit.

/// Reads bit fields MSB-first from a byte slice
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    src: &'a [u8],
    pos: usize,
    mask: u8,
}

impl<'a> BitReader<'a> {
    /// Create a reader positioned at the first bit of `src`
    pub fn new(src: &'a [u8]) -> Self {
        BitReader {
            src,
            pos: 0,
            mask: 0x80,
        }
    }

    /// Read `num_bits` bits (1..=16), most significant first.
    ///
    /// Bits requested past the end of the buffer read as 0.
    pub fn read_bits(&mut self, num_bits: u32) -> u32 {
        debug_assert!((1..=16).contains(&num_bits));

        let mut result = 0u32;
        for _ in 0..num_bits {
            result <<= 1;
            let Some(&current) = self.src.get(self.pos) else {
                continue;
            };
            if current & self.mask != 0 {
                result |= 1;
            }
            self.mask >>= 1;
            if self.mask == 0 {
                self.mask = 0x80;
                self.pos += 1;
            }
        }
        result
    }

    /// True once every byte of the source has been consumed
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Index of the byte holding the next bit
    pub fn position(&self) -> usize {
        self.pos
    }
}

/// Writes bit fields MSB-first into a pre-zeroed byte slice
///
/// The writer only ever sets bits, so the destination must be zero-filled
/// and large enough for everything written to it.
#[derive(Debug)]
pub struct BitWriter<'a> {
    dst: &'a mut [u8],
    pos: usize,
    mask: u8,
}

impl<'a> BitWriter<'a> {
    /// Create a writer positioned at the first bit of `dst`
    pub fn new(dst: &'a mut [u8]) -> Self {
        BitWriter {
            dst,
            pos: 0,
            mask: 0x80,
        }
    }

    /// Write the low `num_bits` bits (1..=16) of `value`, most significant first
    pub fn write_bits(&mut self, value: u32, num_bits: u32) {
        debug_assert!((1..=16).contains(&num_bits));

        let mut value_mask = 1u32 << (num_bits - 1);
        while value_mask != 0 {
            if value & value_mask != 0 {
                self.dst[self.pos] |= self.mask;
            }
            value_mask >>= 1;
            self.mask >>= 1;
            if self.mask == 0 {
                self.mask = 0x80;
                self.pos += 1;
            }
        }
    }

    /// Number of completely written bytes
    ///
    /// A partially filled trailing byte is not counted.
    pub fn position(&self) -> usize {
        self.pos
    }
}
