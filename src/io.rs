// Copyright 2024 Karpeles Lab Inc.
// Based on the Snappy compression format
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Pull-style sources and push-style sinks.
//!
//! These let the codec run against ring buffers, rope-like buffers and
//! other non-contiguous storage without changing the wire format: a
//! [`Source`] hands out contiguous runs of readable bytes, a [`Sink`]
//! receives byte runs by append. Flat slices and `Vec<u8>` are the
//! canonical implementations.

use crate::constants::MAX_FRAGMENT_SIZE;
use crate::decode::decompress;
use crate::encode::{compress_fragment, max_compressed_len};
use crate::error::Result;
use crate::matcher::MatchTable;
use crate::varint::{decode_varint, encode_varint};

/// A pull-style stream of bytes with a known remaining length.
pub trait Source {
    /// Number of bytes left to read.
    fn available(&self) -> usize;

    /// Borrow a contiguous run of readable bytes starting at the current
    /// position. Returns an empty slice only when the source is exhausted.
    fn peek(&self) -> &[u8];

    /// Consume n bytes. n must not exceed the length of the run last
    /// returned by peek().
    fn skip(&mut self, n: usize);
}

/// A push-style receiver of byte runs.
pub trait Sink {
    /// Append a run of bytes to the output.
    fn append(&mut self, bytes: &[u8]);
}

/// Source over a flat byte slice.
pub struct SliceSource<'a> {
    data: &'a [u8],
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        SliceSource { data }
    }
}

impl Source for SliceSource<'_> {
    fn available(&self) -> usize {
        self.data.len()
    }

    fn peek(&self) -> &[u8] {
        self.data
    }

    fn skip(&mut self, n: usize) {
        self.data = &self.data[n..];
    }
}

impl Sink for Vec<u8> {
    fn append(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

/// Compress everything remaining in source, appending the frame to sink.
/// Returns the number of frame bytes written.
///
/// Fragments are compressed straight out of peek() runs; bytes are only
/// gathered into a scratch buffer when a fragment spans a run boundary.
pub fn compress_source<S: Source, K: Sink>(source: &mut S, sink: &mut K) -> usize {
    let total = source.available();
    assert!(
        total as u64 <= u32::MAX as u64,
        "input exceeds the 32-bit frame limit"
    );

    let mut head = [0u8; 5];
    let n = encode_varint(&mut head, total as u32);
    sink.append(&head[..n]);
    let mut written = n;

    let mut table = MatchTable::new();
    let mut gather = Vec::new();
    let mut out = vec![0u8; max_compressed_len(MAX_FRAGMENT_SIZE)];

    let mut remaining = total;
    while remaining > 0 {
        let take = remaining.min(MAX_FRAGMENT_SIZE);

        let n = if source.peek().len() >= take {
            let n = compress_fragment(&source.peek()[..take], &mut out, &mut table);
            source.skip(take);
            n
        } else {
            gather.clear();
            while gather.len() < take {
                let run = source.peek();
                let m = run.len().min(take - gather.len());
                gather.extend_from_slice(&run[..m]);
                source.skip(m);
            }
            compress_fragment(&gather, &mut out, &mut table)
        };

        sink.append(&out[..n]);
        written += n;
        remaining -= take;
    }

    written
}

/// Decompress a whole frame from source, appending the output to sink.
/// Returns the number of output bytes. The source is fully consumed on
/// success; its position is unspecified on error.
///
/// Contiguous sources are decoded in place; fragmented ones are gathered
/// first, since copies may reference any earlier output byte.
pub fn decompress_source<S: Source, K: Sink>(source: &mut S, sink: &mut K) -> Result<usize> {
    let total = source.available();

    let out = if source.peek().len() >= total {
        let out = decompress(&source.peek()[..total])?;
        source.skip(total);
        out
    } else {
        let mut frame = Vec::with_capacity(total);
        while frame.len() < total {
            let run = source.peek();
            let m = run.len().min(total - frame.len());
            frame.extend_from_slice(&run[..m]);
            source.skip(m);
        }
        decompress(&frame)?
    };

    let n = out.len();
    sink.append(&out);
    Ok(n)
}

/// Read the declared decompressed length from source, consuming exactly
/// the preamble bytes.
pub fn decompressed_len_source<S: Source>(source: &mut S) -> Result<u32> {
    let mut buf = [0u8; 5];
    let mut n = 0;

    while n < 5 && source.available() > 0 {
        let byte = source.peek()[0];
        source.skip(1);
        buf[n] = byte;
        n += 1;
        if byte < 0x80 {
            break;
        }
    }

    let (value, _) = decode_varint(&buf[..n])?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compress, decompress, decompressed_len};

    /// Source that hands out data in fixed-size runs, for exercising the
    /// gather paths.
    struct ChunkedSource {
        data: Vec<u8>,
        pos: usize,
        run: usize,
    }

    impl ChunkedSource {
        fn new(data: Vec<u8>, run: usize) -> Self {
            ChunkedSource { data, pos: 0, run }
        }
    }

    impl Source for ChunkedSource {
        fn available(&self) -> usize {
            self.data.len() - self.pos
        }

        fn peek(&self) -> &[u8] {
            let end = (self.pos + self.run).min(self.data.len());
            &self.data[self.pos..end]
        }

        fn skip(&mut self, n: usize) {
            self.pos += n;
        }
    }

    #[test]
    fn test_slice_source_roundtrip() {
        let data = b"The quick brown fox jumps over the lazy dog. ".repeat(100);

        let mut frame = Vec::new();
        let written = compress_source(&mut SliceSource::new(&data), &mut frame);
        assert_eq!(written, frame.len());

        let mut out = Vec::new();
        let n = decompress_source(&mut SliceSource::new(&frame), &mut out).unwrap();
        assert_eq!(n, data.len());
        assert_eq!(out, data);
    }

    #[test]
    fn test_slice_source_matches_flat_compress() {
        // A contiguous source must produce the identical frame.
        let data = b"abcdefgh".repeat(20000); // several fragments
        let flat = compress(&data);

        let mut framed = Vec::new();
        compress_source(&mut SliceSource::new(&data), &mut framed);
        assert_eq!(flat, framed);
    }

    #[test]
    fn test_chunked_source_compress() {
        let data: Vec<u8> = (0u32..100_000)
            .map(|i| (i.wrapping_mul(2654435761) >> 24) as u8)
            .collect();

        // Runs smaller than, equal to and larger than a fragment.
        for run in [1, 7, 1000, 32768, 50000] {
            let mut frame = Vec::new();
            compress_source(&mut ChunkedSource::new(data.clone(), run), &mut frame);
            assert_eq!(decompress(&frame).unwrap(), data, "run={}", run);
        }
    }

    #[test]
    fn test_chunked_source_decompress() {
        let data = b"gather me across run boundaries ".repeat(4000);
        let frame = compress(&data);

        for run in [1, 13, 4096] {
            let mut out = Vec::new();
            let n =
                decompress_source(&mut ChunkedSource::new(frame.clone(), run), &mut out).unwrap();
            assert_eq!(n, data.len(), "run={}", run);
            assert_eq!(out, data, "run={}", run);
        }
    }

    #[test]
    fn test_decompressed_len_source() {
        for data in [&b""[..], b"x", &vec![b'y'; 100_000]] {
            let frame = compress(data);
            let (want, header_len) = decompressed_len(&frame).unwrap();

            let mut source = SliceSource::new(&frame);
            let got = decompressed_len_source(&mut source).unwrap();
            assert_eq!(got as usize, want);
            // Exactly the preamble was consumed.
            assert_eq!(source.available(), frame.len() - header_len);
        }
    }

    #[test]
    fn test_decompressed_len_source_rejects_bad_varint() {
        let mut source = SliceSource::new(&[0xf0]);
        assert!(decompressed_len_source(&mut source).is_err());

        let bytes = [0x80, 0x80, 0x80, 0x80, 0x80, 0x0a];
        let mut source = SliceSource::new(&bytes);
        assert!(decompressed_len_source(&mut source).is_err());
    }
}
