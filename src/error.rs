// Copyright 2024 Karpeles Lab Inc.
// Based on the Snappy compression format
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt;

/// Result type for compression/decompression operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for decompression and validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input is not a valid compressed frame
    Corrupt,

    /// The declared decompressed length cannot be addressed on this host
    TooLarge,

    /// Caller-supplied buffer too small
    BufferTooSmall,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Corrupt => write!(f, "brisklz: corrupt input"),
            Error::TooLarge => write!(f, "brisklz: declared length is too large"),
            Error::BufferTooSmall => write!(f, "brisklz: buffer too small"),
        }
    }
}

impl std::error::Error for Error {}
