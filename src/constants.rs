// Copyright 2024 Karpeles Lab Inc.
// Based on the Snappy compression format
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

/// Tag for literal chunks
pub const TAG_LITERAL: u8 = 0x00;

/// Tag for copy with 1-byte offset (11 bits)
pub const TAG_COPY1: u8 = 0x01;

/// Tag for copy with 2-byte offset (16 bits)
pub const TAG_COPY2: u8 = 0x02;

/// Tag for copy with 4-byte offset (32 bits)
pub const TAG_COPY4: u8 = 0x03;

/// Maximum fragment processed with a single hash table (32KB).
/// Copies never reference data across fragment boundaries, so encoder
/// offsets always fit the 2-byte copy form.
pub const MAX_FRAGMENT_SIZE: usize = 1 << 15;

/// The matcher never probes closer than this to the fragment end.
pub const INPUT_MARGIN: usize = 8;

/// Fragments shorter than this are emitted as a single literal.
pub const MIN_NON_LITERAL_FRAGMENT_SIZE: usize = 32;
