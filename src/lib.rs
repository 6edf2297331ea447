//! Batched parallel codec for the Blocked GZip Format (BGZF).
//!
//! BGZF wraps a byte stream as a concatenation of independently decodable
//! gzip members, each at most 64 KiB on the wire and carrying its own size
//! ("BC" subfield), CRC32, and inflated length. Because blocks are
//! self-contained, many of them can be inflated or deflated at once.
//!
//! The core is a pair of batched operations: [`inflate_batch`] scans input
//! chunks for blocks and inflates them in parallel into a caller-supplied
//! region, and [`deflate_batch`] splits an input buffer into fixed windows
//! and deflates each into its own framed block. [`BgzfReader`] and
//! [`BgzfWriter`] layer streaming I/O on top.

pub mod batch;
pub mod block;
pub mod codec;
pub mod error;
pub mod read;
pub mod write;

pub use batch::{deflate_batch, effective_threads, inflate_batch, DeflateResult, InflateResult};
pub use block::{
    BGZF_EOF, BLOCK_BATCH_SIZE, BLOCK_INFLATED_SIZE, DEFLATE_BUFFER_SIZE, MAX_BGZF_BLOCK_SIZE,
};
pub use error::{Error, Result};
pub use read::BgzfReader;
pub use write::{BgzfWriter, Deflater};
