//! Streaming BGZF output on top of the batch codec.

use std::io::{self, Write};

use crate::batch::deflate_batch;
use crate::block::{BGZF_EOF, BLOCK_BATCH_SIZE, BLOCK_INFLATED_SIZE, DEFLATE_BUFFER_SIZE};
use crate::error::{Error, Result};

/// Reusable deflate scratch: a bank of output buffers sized for worst-case
/// block expansion, handed to [`deflate_batch`] call after call.
pub struct Deflater {
    bufs: Vec<Vec<u8>>,
    num_threads: usize,
}

impl Deflater {
    /// A deflater with a full batch of output buffers.
    pub fn new(num_threads: usize) -> Self {
        Self { bufs: gen_buffers(BLOCK_BATCH_SIZE), num_threads }
    }

    /// A deflater with fewer buffers, capping how many blocks each call can
    /// emit.
    pub fn with_buffers(num_threads: usize, number_of_buffers: usize) -> Result<Self> {
        if number_of_buffers == 0 || number_of_buffers > BLOCK_BATCH_SIZE {
            return Err(Error::InvalidBufferCount {
                count: number_of_buffers,
                max: BLOCK_BATCH_SIZE,
            });
        }
        Ok(Self { bufs: gen_buffers(number_of_buffers), num_threads })
    }

    /// Deflate as much of `data` as one batch admits. Returns the number of
    /// input bytes consumed and the framed blocks in order; the views are
    /// valid until the next call.
    pub fn deflate(&mut self, data: &[u8]) -> Result<(usize, Vec<&[u8]>)> {
        let result = deflate_batch(data, &mut self.bufs, self.num_threads)?;
        let blocks = self
            .bufs
            .iter()
            .zip(&result.block_sizes)
            .map(|(buf, &size)| &buf[..size])
            .collect();
        Ok((result.bytes_consumed, blocks))
    }
}

fn gen_buffers(number_of_buffers: usize) -> Vec<Vec<u8>> {
    (0..number_of_buffers).map(|_| vec![0u8; DEFLATE_BUFFER_SIZE]).collect()
}

/// Streaming BGZF writer: buffers input, deflates it in parallel batches,
/// and appends the EOF sentinel on [`finish`](BgzfWriter::finish).
pub struct BgzfWriter<W: Write> {
    writer: W,
    buffer: Vec<u8>,
    deflater: Deflater,
}

impl<W: Write> BgzfWriter<W> {
    pub fn new(writer: W, num_threads: usize) -> Self {
        Self { writer, buffer: Vec::new(), deflater: Deflater::new(num_threads) }
    }

    /// Deflate buffered input in batch strides. Unless draining, a final
    /// sub-window remainder stays buffered so every non-final block gets a
    /// full window.
    fn compress(&mut self, drain: bool) -> Result<()> {
        while !self.buffer.is_empty() {
            let consumed = {
                let (consumed, blocks) = self.deflater.deflate(&self.buffer)?;
                for b in blocks {
                    self.writer.write_all(b)?;
                }
                consumed
            };
            self.buffer.drain(..consumed);
            if self.buffer.len() < BLOCK_INFLATED_SIZE && !drain {
                break;
            }
        }
        Ok(())
    }

    /// Drain buffered input, write the EOF sentinel, and flush.
    pub fn finish(mut self) -> Result<W> {
        self.compress(true)?;
        self.writer.write_all(&BGZF_EOF)?;
        self.writer.flush()?;
        Ok(self.writer)
    }

    /// Get a reference to the inner writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Get a mutable reference to the inner writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }
}

impl<W: Write> Write for BgzfWriter<W> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(data);
        if self.buffer.len() > BLOCK_BATCH_SIZE * BLOCK_INFLATED_SIZE {
            self.compress(false)?;
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
