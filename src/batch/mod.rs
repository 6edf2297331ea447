//! Batched block operations: plan on one thread, execute on many.

pub mod executor;
pub mod planner;

pub use executor::effective_threads;

use crate::block::{self, BGZF_FOOTER_SIZE, BGZF_FULL_HEADER_SIZE, BLOCK_BATCH_SIZE,
    DEFLATE_BUFFER_SIZE};
use crate::codec;
use crate::error::{Error, Result};

/// Result of one [`inflate_batch`] call.
#[derive(Debug, Default)]
pub struct InflateResult<'a> {
    /// Total bytes consumed across all source chunks.
    pub bytes_read: usize,
    /// Total bytes written to the destination region.
    pub bytes_inflated: usize,
    /// Inflated size of each processed block, in planning order.
    pub block_sizes: Vec<usize>,
    /// Number of blocks taken from each source chunk.
    pub blocks_per_chunk: Vec<usize>,
    /// Unconsumed suffix of each chunk that still has one, in chunk order.
    /// Feed these back as the prefix of the next call to resume.
    pub remaining: Vec<&'a [u8]>,
}

/// Scan `chunks` for BGZF blocks and inflate them in parallel into `dst`.
///
/// Planning stops at the batch bound, at the first block `dst` cannot admit,
/// or at a chunk's partial trailing block; none of these are errors. With
/// `atomic` set, each chunk is either consumed completely or not at all.
/// Workers verify every block's CRC32 and inflated size.
pub fn inflate_batch<'a>(
    chunks: &[&'a [u8]],
    dst: &mut [u8],
    num_threads: usize,
    atomic: bool,
) -> Result<InflateResult<'a>> {
    let plan = planner::plan_inflate(chunks, dst.len(), BLOCK_BATCH_SIZE, atomic)?;

    struct InflateJob<'b> {
        deflate: &'b [u8],
        out: &'b mut [u8],
        crc: u32,
    }

    // Carve pairwise-disjoint output slices in planning order; workers own
    // their slice for the duration of the batch.
    let mut jobs: Vec<InflateJob<'_>> = Vec::with_capacity(plan.blocks.len());
    let mut rest: &mut [u8] = dst;
    for planned in &plan.blocks {
        let region = std::mem::take(&mut rest);
        let (slot, tail) = region.split_at_mut(planned.inflated_size);
        rest = tail;
        jobs.push(InflateJob { deflate: planned.deflate, out: slot, crc: planned.crc });
    }

    executor::run_jobs(jobs, num_threads, codec::new_inflater, |z, job| {
        codec::inflate_block(z, job.deflate, job.out, job.crc)
    })?;

    Ok(InflateResult {
        bytes_read: plan.consumed.iter().sum(),
        bytes_inflated: plan.total_inflated,
        block_sizes: plan.blocks.iter().map(|b| b.inflated_size).collect(),
        blocks_per_chunk: plan.blocks_per_chunk,
        remaining: chunks
            .iter()
            .zip(&plan.consumed)
            .map(|(&chunk, &consumed)| &chunk[consumed..])
            .filter(|tail| !tail.is_empty())
            .collect(),
    })
}

/// Result of one [`deflate_batch`] call.
#[derive(Debug, Default)]
pub struct DeflateResult {
    /// Input bytes consumed by this call.
    pub bytes_consumed: usize,
    /// On-wire size of each emitted block; slice the output buffers to these.
    pub block_sizes: Vec<usize>,
}

/// Split `input` into fixed-size windows and deflate them in parallel, one
/// framed block per output buffer.
///
/// Each output buffer must be at least [`DEFLATE_BUFFER_SIZE`] bytes. The
/// call emits `min(windows, output buffers, batch bound)` blocks; the caller
/// re-invokes with the unconsumed input suffix to continue.
pub fn deflate_batch(
    input: &[u8],
    outputs: &mut [Vec<u8>],
    num_threads: usize,
) -> Result<DeflateResult> {
    for buf in outputs.iter() {
        if buf.len() < DEFLATE_BUFFER_SIZE {
            return Err(Error::BufferTooSmall { size: buf.len(), required: DEFLATE_BUFFER_SIZE });
        }
    }

    let max_windows = outputs.len().min(BLOCK_BATCH_SIZE);
    let windows = planner::plan_deflate_windows(input, max_windows);
    let bytes_consumed = windows.iter().map(|w| w.len()).sum();

    struct DeflateJob<'b> {
        window: &'b [u8],
        out: &'b mut [u8],
        size: &'b mut usize,
    }

    let mut sizes = vec![0usize; windows.len()];
    let jobs: Vec<DeflateJob<'_>> = windows
        .iter()
        .zip(outputs.iter_mut())
        .zip(sizes.iter_mut())
        .map(|((window, out), size)| DeflateJob { window, out: out.as_mut_slice(), size })
        .collect();

    executor::run_jobs(jobs, num_threads, codec::new_deflater, |z, job| {
        // The header is written after deflation because BSIZE depends on the
        // deflated length; the payload goes directly to its final offset.
        let payload_end = job.out.len() - BGZF_FOOTER_SIZE;
        let window =
            codec::deflate_window(z, job.window, &mut job.out[BGZF_FULL_HEADER_SIZE..payload_end])?;
        *job.size =
            block::write_frame(job.out, window.deflated_len, window.crc, window.inflated_len)?;
        Ok(())
    })?;

    Ok(DeflateResult { bytes_consumed, block_sizes: sizes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BGZF_EOF, MAX_BGZF_BLOCK_SIZE};

    fn deflate_buffers(n: usize) -> Vec<Vec<u8>> {
        (0..n).map(|_| vec![0u8; DEFLATE_BUFFER_SIZE]).collect()
    }

    #[test]
    fn test_deflate_empty_input_emits_eof_shaped_block() {
        let mut bufs = deflate_buffers(4);
        let result = deflate_batch(&[], &mut bufs, 1).unwrap();
        assert_eq!(result.bytes_consumed, 0);
        assert_eq!(result.block_sizes, vec![28]);
        assert_eq!(&bufs[0][..28], &BGZF_EOF);
    }

    #[test]
    fn test_deflate_rejects_undersized_buffers() {
        let mut bufs = vec![vec![0u8; MAX_BGZF_BLOCK_SIZE - 1]];
        let err = deflate_batch(b"data", &mut bufs, 1).unwrap_err();
        assert!(matches!(err, Error::BufferTooSmall { .. }));
    }

    #[test]
    fn test_inflate_empty_blocks_consume_without_output() {
        let mut data = Vec::new();
        for _ in 0..3 {
            data.extend_from_slice(&BGZF_EOF);
        }
        let mut dst = [0u8; 16];
        let result = inflate_batch(&[&data], &mut dst, 1, false).unwrap();
        assert_eq!(result.bytes_read, 3 * 28);
        assert_eq!(result.bytes_inflated, 0);
        assert_eq!(result.block_sizes, vec![0, 0, 0]);
        assert!(result.remaining.is_empty());
    }

    #[test]
    fn test_round_trip_small() {
        let mut bufs = deflate_buffers(1);
        let result = deflate_batch(b"ABCDEFGH", &mut bufs, 1).unwrap();
        assert_eq!(result.bytes_consumed, 8);
        let wire = &bufs[0][..result.block_sizes[0]];

        let mut dst = [0u8; 64];
        let inflated = inflate_batch(&[wire], &mut dst, 1, false).unwrap();
        assert_eq!(inflated.bytes_read, wire.len());
        assert_eq!(inflated.bytes_inflated, 8);
        assert_eq!(inflated.block_sizes, vec![8]);
        assert_eq!(&dst[..8], b"ABCDEFGH");
    }
}
