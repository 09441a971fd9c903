#![no_main]
use libfuzzer_sys::fuzz_target;
use xmlcodec::{decode, encode};

// Whatever decodes must encode, and the encoding must decode again
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(tree) = decode(s) {
            if let Ok(xml) = encode(&tree) {
                assert!(decode(&xml).is_ok(), "re-decode failed for {xml:?}");
            }
        }
    }
});
