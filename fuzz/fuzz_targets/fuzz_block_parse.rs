#![no_main]

use blockgz::block::{parse_block, BlockParse, Cursor};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Walk as many blocks as the buffer holds. Malformed input and partial
    // blocks are expected outcomes - we're looking for panics and cursor
    // accounting bugs, not errors.
    let mut cursor = Cursor::new(data);
    loop {
        let before = cursor.position();
        match parse_block(&mut cursor) {
            BlockParse::Done(raw) => {
                assert!(cursor.position() > before);
                assert!(raw.wire_len <= data.len() - before);
            }
            BlockParse::NeedMoreBytes | BlockParse::Malformed(_) => {
                assert_eq!(cursor.position(), before);
                break;
            }
        }
        if cursor.remaining() == 0 {
            break;
        }
    }
});
