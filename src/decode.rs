// Copyright 2024 Karpeles Lab Inc.
// Based on the Snappy compression format
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::constants::*;
use crate::error::{Error, Result};
use crate::tags::{parse_copy1, parse_copy2, parse_copy4, parse_literal_len};
use crate::varint::decode_varint;

/// Returns the declared decompressed length and the number of bytes the
/// length preamble occupied. Reads nothing past the preamble.
pub fn decompressed_len(src: &[u8]) -> Result<(usize, usize)> {
    let (v, n) = decode_varint(src)?;

    // On 32-bit hosts a frame this large cannot be addressed; refuse it
    // before anyone tries to allocate for it.
    #[cfg(target_pointer_width = "32")]
    if v >= 0x8000_0000 {
        return Err(Error::TooLarge);
    }

    Ok((v as usize, n))
}

/// Decompress returns the decoded form of a frame.
pub fn decompress(src: &[u8]) -> Result<Vec<u8>> {
    let (dlen, header_len) = decompressed_len(src)?;

    let mut dst = vec![0u8; dlen];
    decode_tags(&mut dst, &src[header_len..])?;

    Ok(dst)
}

/// Decompress into a caller-allocated buffer.
/// Returns the number of bytes written, which always equals the declared
/// length. Bytes of dst beyond the declared length are never touched.
pub fn decompress_into(dst: &mut [u8], src: &[u8]) -> Result<usize> {
    let (dlen, header_len) = decompressed_len(src)?;

    if dst.len() < dlen {
        return Err(Error::BufferTooSmall);
    }

    decode_tags(&mut dst[..dlen], &src[header_len..])?;

    Ok(dlen)
}

/// Structurally check a frame without producing output.
///
/// Performs the same traversal and the same checks as [`decompress`], so
/// the two agree on every input; this one allocates nothing.
pub fn is_valid_compressed(src: &[u8]) -> bool {
    match decompressed_len(src) {
        Ok((dlen, header_len)) => validate_tags(&src[header_len..], dlen),
        Err(_) => false,
    }
}

/// Tag loop: reconstruct dst from the tag stream.
///
/// Every read is bounded by the frame slice and every write by dst; any
/// tag that would breach either bound is Corrupt, as is finishing with a
/// produced count different from dst.len().
fn decode_tags(dst: &mut [u8], src: &[u8]) -> Result<()> {
    let mut d = 0; // destination index
    let mut s = 0; // source index

    while s < src.len() {
        match src[s] & 0x03 {
            TAG_LITERAL => {
                let (length, consumed) = parse_literal_len(&src[s..])?;
                s += consumed;

                if length > (dst.len() - d) as u64 || length > (src.len() - s) as u64 {
                    return Err(Error::Corrupt);
                }
                let length = length as usize;

                dst[d..d + length].copy_from_slice(&src[s..s + length]);
                d += length;
                s += length;
            }
            TAG_COPY1 => {
                let (offset, length, consumed) = parse_copy1(&src[s..])?;
                s += consumed;
                d = copy_match(dst, d, offset, length)?;
            }
            TAG_COPY2 => {
                let (offset, length, consumed) = parse_copy2(&src[s..])?;
                s += consumed;
                d = copy_match(dst, d, offset, length)?;
            }
            _ => {
                let (offset, length, consumed) = parse_copy4(&src[s..])?;
                s += consumed;
                d = copy_match(dst, d, offset, length)?;
            }
        }
    }

    // The tag stream must produce exactly the declared length.
    if d != dst.len() {
        return Err(Error::Corrupt);
    }

    Ok(())
}

/// Execute one copy, returning the new destination index.
///
/// An overlapping copy (offset < length) repeats the pattern between the
/// source position and the cursor, so it must run forward byte by byte.
#[inline]
fn copy_match(dst: &mut [u8], d: usize, offset: usize, length: usize) -> Result<usize> {
    if offset == 0 || offset > d || length > dst.len() - d {
        return Err(Error::Corrupt);
    }

    let src_start = d - offset;
    if offset >= length {
        dst.copy_within(src_start..src_start + length, d);
    } else {
        for i in 0..length {
            dst[d + i] = dst[src_start + i];
        }
    }

    Ok(d + length)
}

/// Validation twin of [`decode_tags`]: same parse, same checks, same
/// order, but only a produced-bytes counter instead of a buffer.
fn validate_tags(src: &[u8], declared_len: usize) -> bool {
    let dlen = declared_len as u64;
    let mut d: u64 = 0;
    let mut s = 0;

    while s < src.len() {
        match src[s] & 0x03 {
            TAG_LITERAL => {
                let (length, consumed) = match parse_literal_len(&src[s..]) {
                    Ok(v) => v,
                    Err(_) => return false,
                };
                s += consumed;

                if length > dlen - d || length > (src.len() - s) as u64 {
                    return false;
                }
                d += length;
                s += length as usize;
            }
            TAG_COPY1 => {
                let (offset, length, consumed) = match parse_copy1(&src[s..]) {
                    Ok(v) => v,
                    Err(_) => return false,
                };
                s += consumed;

                if offset == 0 || offset as u64 > d || length as u64 > dlen - d {
                    return false;
                }
                d += length as u64;
            }
            TAG_COPY2 => {
                let (offset, length, consumed) = match parse_copy2(&src[s..]) {
                    Ok(v) => v,
                    Err(_) => return false,
                };
                s += consumed;

                if offset == 0 || offset as u64 > d || length as u64 > dlen - d {
                    return false;
                }
                d += length as u64;
            }
            _ => {
                let (offset, length, consumed) = match parse_copy4(&src[s..]) {
                    Ok(v) => v,
                    Err(_) => return false,
                };
                s += consumed;

                if offset == 0 || offset as u64 > d || length as u64 > dlen - d {
                    return false;
                }
                d += length as u64;
            }
        }
    }

    d == dlen
}
