#![no_main]

use brisklz::{compress, decompress, is_valid_compressed, max_compressed_len};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Skip very large inputs to avoid OOM
    if data.len() > 1_000_000 {
        return;
    }

    let frame = compress(data);
    assert!(frame.len() <= max_compressed_len(data.len()), "bound exceeded");
    assert!(is_valid_compressed(&frame), "own frame rejected");

    let decoded = decompress(&frame).expect("own frame failed to decode");
    assert_eq!(data, &decoded[..], "roundtrip mismatch");
});
