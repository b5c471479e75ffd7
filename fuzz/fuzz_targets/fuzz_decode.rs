#![no_main]

use brisklz::{decompress, decompressed_len, is_valid_compressed};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Don't let a tiny input declare a multi-gigabyte output; the decoder
    // would allocate it just to reject the frame.
    if let Ok((dlen, _)) = decompressed_len(data) {
        if dlen > 1 << 26 {
            return;
        }
    }

    // Arbitrary bytes must never panic, and the validator must agree with
    // the decoder on acceptance.
    let valid = is_valid_compressed(data);
    let decoded = decompress(data);
    assert_eq!(valid, decoded.is_ok(), "validator and decoder disagree");
});
