#![no_main]
use libfuzzer_sys::fuzz_target;

use cxxrt_core::alloc::{AllocRequest, is_aligned_to};

fuzz_target!(|data: &[u8]| {
    if data.len() < 9 {
        return;
    }
    let mut word = [0u8; 8];
    word.copy_from_slice(&data[..8]);
    let size = u64::from_le_bytes(word) as usize;
    // High bit set: raw byte as the alignment, often not a power of two.
    let align = if data[8] & 0x80 == 0 {
        1usize << (u32::from(data[8]) % usize::BITS)
    } else {
        usize::from(data[8] & 0x7f)
    };

    match AllocRequest::aligned(size, align) {
        Ok(req) => {
            assert!(align.is_power_of_two());
            assert!(req.size() >= size.max(1));
            assert!(is_aligned_to(req.size(), align));
        }
        Err(_) => {
            assert!(!align.is_power_of_two() || size.max(1).checked_add(align - 1).is_none());
        }
    }

    let plain = AllocRequest::plain(size);
    assert!(plain.size() >= 1);
});
