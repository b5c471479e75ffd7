// Copyright 2024 Karpeles Lab Inc.
// Based on the Snappy compression format
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! # brisklz
//!
//! Fast lossless block compression in the Snappy wire format, tuned for
//! throughput over ratio. A frame is a varint-encoded decompressed length
//! followed by a stream of literal and copy tags; the decoder accepts any
//! byte sequence and reports corruption instead of misbehaving.
//!
//! brisklz provides:
//! - Single-pass compression close to memory speed
//! - A safe decoder that never reads or writes out of bounds
//! - A validator that checks a frame without producing output
//! - Pull-style [`Source`] / push-style [`Sink`] integration points
//!
//! ## Example
//!
//! ```rust
//! use brisklz::{compress, decompress, is_valid_compressed};
//!
//! let data = b"Hello, World! Hello, World! Hello, World!";
//! let frame = compress(data);
//! assert!(is_valid_compressed(&frame));
//! let decompressed = decompress(&frame).expect("decompression failed");
//! assert_eq!(data, &decompressed[..]);
//! ```

mod constants;
mod decode;
mod encode;
mod error;
mod io;
mod matcher;
mod tags;
mod varint;

pub use decode::{decompress, decompress_into, decompressed_len, is_valid_compressed};
pub use encode::{compress, max_compressed_len, Encoder};
pub use error::{Error, Result};
pub use io::{
    compress_source, decompress_source, decompressed_len_source, Sink, SliceSource, Source,
};

#[cfg(test)]
mod tests;
