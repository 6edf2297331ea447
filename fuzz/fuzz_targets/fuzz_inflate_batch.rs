#![no_main]

use blockgz::inflate_batch;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only proceed if it could plausibly start a BGZF block.
    if data.len() < 4 || data[0] != 0x1f || data[1] != 0x8b {
        return;
    }

    // Batch calls may fail on invalid input - that's OK. Consumed/produced
    // accounting must stay within bounds either way.
    let mut dst = vec![0u8; 128 * 1024];
    if let Ok(info) = inflate_batch(&[data], &mut dst, 1, false) {
        assert!(info.bytes_read <= data.len());
        assert!(info.bytes_inflated <= dst.len());
        assert_eq!(
            info.bytes_inflated,
            info.block_sizes.iter().sum::<usize>()
        );
    }
});
