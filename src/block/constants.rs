/// GZip magic plus "FEXTRA present" flag byte; every BGZF block starts with these.
pub const BGZF_MAGIC: [u8; 4] = [0x1f, 0x8b, 0x08, 0x04];

/// Fixed portion of the block header: magic, mtime, xfl, os, xlen.
pub const BGZF_HEADER_SIZE: usize = 12;

/// Header plus the single "BC" subfield every emitted block carries.
pub const BGZF_FULL_HEADER_SIZE: usize = 18;

/// Block tailer (CRC32 + ISIZE).
pub const BGZF_FOOTER_SIZE: usize = 8;

/// Maximum total on-wire block size (BSIZE is a u16, so BSIZE + 1 <= 65536).
pub const MAX_BGZF_BLOCK_SIZE: usize = 65536;

/// Uncompressed bytes fed to each deflated block, leaving headroom so the
/// compressed form fits the on-wire limit.
pub const BLOCK_INFLATED_SIZE: usize = 65280;

/// Upper bound on blocks planned per batch call.
pub const BLOCK_BATCH_SIZE: usize = 300;

/// Required size of each caller-supplied deflate output buffer: worst-case
/// payload for a poorly compressible window, plus framing, plus padding.
pub const DEFLATE_BUFFER_SIZE: usize =
    BLOCK_INFLATED_SIZE + BGZF_FULL_HEADER_SIZE + BGZF_FOOTER_SIZE + 1024;

/// BGZF EOF sentinel: an empty block (28 bytes)
pub const BGZF_EOF: [u8; 28] = [
    0x1f, 0x8b, 0x08, 0x04, // gzip magic, method, flags (FEXTRA)
    0x00, 0x00, 0x00, 0x00, // mtime
    0x00, 0xff, // xfl, os
    0x06, 0x00, // xlen = 6
    0x42, 0x43, // subfield ID "BC"
    0x02, 0x00, // subfield length = 2
    0x1b, 0x00, // BSIZE = 27 (28 - 1)
    0x03, 0x00, // empty deflate block
    0x00, 0x00, 0x00, 0x00, // CRC32 = 0
    0x00, 0x00, 0x00, 0x00, // ISIZE = 0
];
