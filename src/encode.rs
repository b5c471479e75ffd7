// Copyright 2024 Karpeles Lab Inc.
// Based on the Snappy compression format
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::constants::*;
use crate::matcher::{find_match_length, hash, load32, MatchTable};
use crate::tags::{emit_copy, emit_literal};
use crate::varint::encode_varint;

/// Compressor holding the matcher's scratch table so repeated encodes
/// reuse the allocation. There is no other state; each call starts from a
/// zeroed table.
pub struct Encoder {
    table: MatchTable,
}

impl Encoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Encoder {
            table: MatchTable::new(),
        }
    }

    /// Compress returns the encoded frame for src.
    pub fn compress(&mut self, src: &[u8]) -> Vec<u8> {
        let mut dst = Vec::new();
        self.compress_into(src, &mut dst);
        dst
    }

    /// Append the encoded frame for src to dst.
    /// Returns the number of frame bytes appended.
    pub fn compress_into(&mut self, src: &[u8], dst: &mut Vec<u8>) -> usize {
        assert!(
            src.len() as u64 <= u32::MAX as u64,
            "input exceeds the 32-bit frame limit"
        );

        let start = dst.len();
        dst.resize(start + max_compressed_len(src.len()), 0);

        // Varint-encoded length of the decompressed bytes, then one tag
        // stream per fragment. Offsets are fragment-relative, so copies
        // never reach across a fragment boundary.
        let mut d = start + encode_varint(&mut dst[start..], src.len() as u32);
        for fragment in src.chunks(MAX_FRAGMENT_SIZE) {
            d += compress_fragment(fragment, &mut dst[d..], &mut self.table);
        }

        dst.truncate(d);
        d - start
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Compress returns the encoded frame for src.
pub fn compress(src: &[u8]) -> Vec<u8> {
    Encoder::new().compress(src)
}

/// Upper bound on the frame size for any input of length n.
/// Valid for all n below 2^32.
pub fn max_compressed_len(n: usize) -> usize {
    32 + n + n / 6
}

/// Compress a single fragment into dst, returning the bytes written.
///
/// The tag stream alternates pending-literal flushes with copies found by
/// probing the hash table at the current position. Misses step the probe
/// forward by an amount that grows with the miss count, so incompressible
/// regions cost little more than a memcpy.
pub(crate) fn compress_fragment(src: &[u8], dst: &mut [u8], table: &mut MatchTable) -> usize {
    if src.len() < MIN_NON_LITERAL_FRAGMENT_SIZE {
        return emit_literal(dst, src);
    }

    let shift = table.prepare(src.len());
    let s_limit = src.len() - INPUT_MARGIN;
    let mut next_emit = 0;
    let mut s = 1;
    let mut d = 0;

    'outer: loop {
        let mut candidate;
        let mut skip = 32;

        // Search for the next match, skipping ahead on repeated misses.
        loop {
            let next_s = s + (skip >> 5);
            skip += 1;

            if next_s > s_limit {
                break 'outer;
            }

            let h = hash(load32(src, s), shift);
            candidate = table.get(h);
            table.set(h, s);

            if load32(src, s) == load32(src, candidate) {
                break;
            }

            s = next_s;
        }

        // Emit copies as long as matches chain back to back.
        loop {
            let base = s;
            let matched = 4 + find_match_length(&src[candidate + 4..], &src[base + 4..]);
            s += matched;

            if base > next_emit {
                d += emit_literal(&mut dst[d..], &src[next_emit..base]);
            }
            d += emit_copy(&mut dst[d..], base - candidate, matched);
            next_emit = s;

            if s >= s_limit {
                break 'outer;
            }

            // Re-prime the table just behind the cursor, then look for an
            // immediate match at the new position.
            let h1 = hash(load32(src, s - 1), shift);
            table.set(h1, s - 1);
            let h2 = hash(load32(src, s), shift);
            candidate = table.get(h2);
            table.set(h2, s);

            if load32(src, s) != load32(src, candidate) {
                s += 1;
                break;
            }
        }
    }

    // Flush the tail as a literal.
    if next_emit < src.len() {
        d += emit_literal(&mut dst[d..], &src[next_emit..]);
    }

    d
}
