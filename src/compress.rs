// Copyright 2024 Karpeles Lab Inc.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::bitio::BitWriter;
use crate::constants::*;
use crate::window::History;

/// Returns the buffer size `compress` allocates for `src_len` input bytes.
///
/// Every byte stored as a literal costs 9 bits, plus room for the
/// terminator.
pub fn max_compressed_len(src_len: usize) -> usize {
    src_len + src_len.div_ceil(8) + 2
}

/// Compress `src` into an LZSS token stream the game can read.
///
/// The output reproduces the game's own encoder byte for byte: matches are
/// searched nearest first, the first longest match wins, and the stream
/// ends with a terminator cut down to its first two bits.
pub fn compress(src: &[u8]) -> Vec<u8> {
    let mut dst = vec![0u8; max_compressed_len(src.len())];
    let mut history = History::new();
    let mut writer = BitWriter::new(&mut dst);
    let mut s = 0;

    while s < src.len() {
        let (match_index, match_length) = find_longest_match(&history, src, s);

        if match_length < MIN_MATCH_LENGTH {
            writer.write_bits(1, 1);
            writer.write_bits(src[s] as u32, 8);
            history.set(s, src[s]);
            s += 1;
        } else {
            writer.write_bits(0, 1);
            writer.write_bits(match_index as u32 + 1, HISTORY_INDEX_BITS);
            writer.write_bits(
                (match_length - MIN_MATCH_LENGTH) as u32,
                MATCH_LENGTH_BITS,
            );
            for _ in 0..match_length {
                history.set(s, src[s]);
                s += 1;
            }
        }
    }

    // Only the control bit and the first index bit; the reader supplies the
    // remaining zeros past the end of the buffer
    writer.write_bits(0, 2);

    let len = writer.position() + 1;
    dst.truncate(len);
    dst
}

/// Find the longest match for `src[s..]` in the window behind `s`.
///
/// Returns `(history index, length)`; length is 0 when nothing matched.
fn find_longest_match(history: &History, src: &[u8], s: usize) -> (usize, usize) {
    let mut best_index = 0;
    let mut best_length = 0;
    let window = s.min(HISTORY_SIZE);

    for candidate in (s - window..s).rev() {
        // index + 1 would wrap to the terminator value
        if candidate % HISTORY_SIZE == HISTORY_SIZE - 1 {
            continue;
        }

        let mut offset = 0;
        while offset < MAX_MATCH_LENGTH && s + offset < src.len() {
            // Past the current position the match overlaps itself; those
            // bytes are not in history yet, so take them from the source
            let byte = if candidate + offset < s {
                history.get(candidate + offset)
            } else {
                src[candidate + offset]
            };
            if byte != src[s + offset] {
                break;
            }
            offset += 1;
        }

        if offset > best_length {
            best_length = offset;
            best_index = candidate % HISTORY_SIZE;
        }
        if best_length == MAX_MATCH_LENGTH {
            break;
        }
    }

    (best_index, best_length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitio::BitReader;
    use crate::decompress::decompress;

    /// Token view of a compressed stream, for inspecting encoder choices
    #[derive(Debug, PartialEq)]
    enum Token {
        Literal(u8),
        Match { index: usize, length: usize },
    }

    fn tokens(src: &[u8]) -> Vec<Token> {
        let mut reader = BitReader::new(src);
        let mut out = Vec::new();
        while !reader.is_exhausted() {
            if reader.read_bits(1) == 1 {
                out.push(Token::Literal(reader.read_bits(8) as u8));
                continue;
            }
            let encoded = reader.read_bits(HISTORY_INDEX_BITS);
            if encoded == TERMINATOR_INDEX {
                break;
            }
            let length = reader.read_bits(MATCH_LENGTH_BITS) as usize + MIN_MATCH_LENGTH;
            out.push(Token::Match {
                index: encoded as usize - 1,
                length,
            });
        }
        out
    }

    #[test]
    fn test_empty_is_lone_terminator() {
        let compressed = compress(&[]);
        assert_eq!(compressed, vec![0x00]);
        let out = decompress(&compressed);
        assert!(out.terminated);
        assert!(out.data.is_empty());
    }

    #[test]
    fn test_single_byte() {
        let compressed = compress(&[0x42]);
        // 9 literal bits + 2 terminator bits
        assert_eq!(compressed.len(), 2);
        assert_eq!(decompress(&compressed).data, vec![0x42]);
    }

    #[test]
    fn test_run_of_aa() {
        let data = [0xAAu8; 20];
        let compressed = compress(&data);

        // one literal, then the run references itself from distance 1
        assert_eq!(
            tokens(&compressed),
            vec![
                Token::Literal(0xAA),
                Token::Match {
                    index: 0,
                    length: 18
                },
                Token::Literal(0xAA),
            ]
        );

        let out = decompress(&compressed);
        assert!(out.terminated);
        assert_eq!(out.data, data);
    }

    #[test]
    fn test_nearest_match_wins_ties() {
        let data = b"abcXabcYabc";
        let found = tokens(&compress(data));
        assert_eq!(
            found.last(),
            Some(&Token::Match {
                index: 4,
                length: 3
            })
        );
    }

    #[test]
    fn test_skips_index_colliding_with_terminator() {
        // the only earlier copy of the pattern starts at position 8191
        let mut data: Vec<u8> = (0..8191u32).map(|i| (i % 200) as u8 + 0x20).collect();
        data.extend_from_slice(b"\x01\x02\x03\x04");
        data.extend_from_slice(b"\x01\x02\x03\x04");

        let compressed = compress(&data);
        let found = tokens(&compressed);

        // the second copy cannot point back at 8191, so it starts as a
        // literal and the tail matches from position 8192 (index 0)
        assert_eq!(
            found[found.len() - 2..],
            [
                Token::Literal(0x01),
                Token::Match {
                    index: 0,
                    length: 3
                }
            ]
        );
        for token in found {
            if let Token::Match { index, length } = token {
                assert_ne!(index, HISTORY_SIZE - 1);
                assert!((MIN_MATCH_LENGTH..=MAX_MATCH_LENGTH).contains(&length));
            }
        }
        assert_eq!(decompress(&compressed).data, data);
    }

    #[test]
    fn test_output_never_exceeds_bound() {
        let data: Vec<u8> = (0..5000u32).map(|i| (i.wrapping_mul(2654435761) >> 13) as u8).collect();
        let compressed = compress(&data);
        assert!(compressed.len() <= max_compressed_len(data.len()));
        assert_eq!(decompress(&compressed).data, data);
    }
}
