//! Streaming BGZF input on top of the batch codec.
//!
//! The reader inflates into a pre-allocated buffer and hands bytes out of it,
//! carrying any partial trailing block in its input buffer across refills.

use std::io::{self, Read};

use crate::batch::inflate_batch;
use crate::block::MAX_BGZF_BLOCK_SIZE;
use crate::error::{Error, Result};

/// Default inflate buffer size (50 MiB). Should hold at least twice the data
/// of any single `read` call.
pub const DEFAULT_INFLATE_BUFFER_SIZE: usize = 50 * 1024 * 1024;

/// How much compressed input each refill pulls from the underlying reader.
const RAW_READ_CHUNK_SIZE: usize = 256 * 1024;

/// Streaming BGZF reader with a fixed-size inflate buffer.
pub struct BgzfReader<R: Read> {
    reader: R,
    input: Vec<u8>,
    inflate_buf: Vec<u8>,
    start: usize,
    stop: usize,
    num_threads: usize,
    eof: bool,
}

impl<R: Read> BgzfReader<R> {
    pub fn new(reader: R, num_threads: usize) -> Self {
        Self::with_buffer_size(reader, DEFAULT_INFLATE_BUFFER_SIZE, num_threads)
    }

    /// The buffer is clamped up to one maximum block so a batch can always
    /// admit at least one block.
    pub fn with_buffer_size(reader: R, buffer_size: usize, num_threads: usize) -> Self {
        let buffer_size = buffer_size.max(MAX_BGZF_BLOCK_SIZE);
        Self {
            reader,
            input: Vec::new(),
            inflate_buf: vec![0u8; buffer_size],
            start: 0,
            stop: 0,
            num_threads,
            eof: false,
        }
    }

    /// Get a reference to the inner reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Refill the drained inflate buffer from the underlying reader.
    fn fetch_and_inflate(&mut self) -> Result<()> {
        debug_assert_eq!(self.start, self.stop);
        self.start = 0;
        self.stop = 0;

        loop {
            if !self.eof {
                let n = (&mut self.reader)
                    .take(RAW_READ_CHUNK_SIZE as u64)
                    .read_to_end(&mut self.input)?;
                if n == 0 {
                    self.eof = true;
                }
            }
            if self.input.is_empty() {
                return Ok(());
            }

            let (bytes_read, bytes_inflated) = {
                let chunks = [self.input.as_slice()];
                let info =
                    inflate_batch(&chunks, &mut self.inflate_buf, self.num_threads, false)?;
                (info.bytes_read, info.bytes_inflated)
            };
            self.input.drain(..bytes_read);
            self.stop = bytes_inflated;

            if bytes_inflated > 0 {
                return Ok(());
            }
            // A partial trailing block that can never complete is a
            // truncated stream, not a clean end.
            if bytes_read == 0 && self.eof {
                return Err(Error::UnexpectedEof);
            }
            // Otherwise: only empty blocks were consumed, or the input holds
            // a partial block. Pull more and retry.
        }
    }
}

impl<R: Read> Read for BgzfReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.start == self.stop {
            self.fetch_and_inflate()?;
            if self.start == self.stop {
                return Ok(0);
            }
        }
        let n = buf.len().min(self.stop - self.start);
        buf[..n].copy_from_slice(&self.inflate_buf[self.start..self.start + n]);
        self.start += n;
        Ok(n)
    }
}
