//! Batch planner.
//!
//! Single-threaded: walks the input, decides which blocks one call will
//! process, and performs all admission control up front so the executor's
//! workers stay branch-free on capacity.

use crate::block::{parse_block, BlockParse, Cursor, BLOCK_INFLATED_SIZE};
use crate::error::{Error, Result};

/// One planned inflate block, recorded before output slices are carved.
#[derive(Debug)]
pub struct PlannedBlock<'a> {
    /// Raw DEFLATE payload within the source chunk.
    pub deflate: &'a [u8],
    /// Expected CRC32 of the inflated payload.
    pub crc: u32,
    /// Declared inflated size; also the length of the output slice.
    pub inflated_size: usize,
}

/// Inflate plan for one batch call.
#[derive(Debug, Default)]
pub struct InflatePlan<'a> {
    pub blocks: Vec<PlannedBlock<'a>>,
    /// Bytes consumed from each source chunk.
    pub consumed: Vec<usize>,
    /// Blocks planned from each source chunk.
    pub blocks_per_chunk: Vec<usize>,
    /// Total inflated bytes the plan will produce.
    pub total_inflated: usize,
}

/// Plan as many whole blocks as the batch admits.
///
/// Chunks are walked in order. A partial trailing block leaves that chunk's
/// tail for the next call and planning moves on to the next chunk; hitting
/// the block bound or running out of output space stops the whole call with
/// the failing parse rewound. In atomic mode a chunk is either consumed
/// completely or rolled back completely.
pub fn plan_inflate<'a>(
    chunks: &[&'a [u8]],
    avail_out: usize,
    max_blocks: usize,
    atomic: bool,
) -> Result<InflatePlan<'a>> {
    let mut plan = InflatePlan {
        blocks: Vec::new(),
        consumed: vec![0; chunks.len()],
        blocks_per_chunk: vec![0; chunks.len()],
        total_inflated: 0,
    };

    let mut call_done = false;
    for (chunk_index, &chunk) in chunks.iter().enumerate() {
        let mut cursor = Cursor::new(chunk);
        let blocks_at_entry = plan.blocks.len();
        let inflated_at_entry = plan.total_inflated;

        loop {
            if plan.blocks.len() == max_blocks {
                call_done = true;
                break;
            }
            let saved = cursor;
            match parse_block(&mut cursor) {
                BlockParse::Done(raw) => {
                    let inflated_size = raw.inflated_size as usize;
                    if plan.total_inflated + inflated_size > avail_out {
                        cursor = saved;
                        call_done = true;
                        break;
                    }
                    plan.blocks.push(PlannedBlock {
                        deflate: raw.deflate,
                        crc: raw.crc,
                        inflated_size,
                    });
                    plan.blocks_per_chunk[chunk_index] += 1;
                    plan.total_inflated += inflated_size;
                }
                // Partial trailing block: this chunk keeps a tail.
                BlockParse::NeedMoreBytes => break,
                BlockParse::Malformed(reason) => {
                    return Err(Error::MalformedHeader { reason });
                }
            }
            if cursor.remaining() == 0 {
                break;
            }
        }

        plan.consumed[chunk_index] = cursor.position();

        // Atomic mode: a partially consumed chunk contributes nothing.
        if atomic
            && plan.consumed[chunk_index] < chunk.len()
            && plan.blocks.len() > blocks_at_entry
        {
            plan.blocks.truncate(blocks_at_entry);
            plan.blocks_per_chunk[chunk_index] = 0;
            plan.consumed[chunk_index] = 0;
            plan.total_inflated = inflated_at_entry;
        }

        if call_done {
            break;
        }
    }

    Ok(plan)
}

/// Split `input` into deflate windows: every full window is
/// `BLOCK_INFLATED_SIZE` bytes and any remainder becomes one explicit final
/// short window. An empty input still deflates to one empty block. The
/// window count is capped by `max_windows` (output buffers and batch bound).
pub fn plan_deflate_windows(input: &[u8], max_windows: usize) -> Vec<&[u8]> {
    if input.is_empty() {
        return if max_windows == 0 { Vec::new() } else { vec![&input[..0]] };
    }

    let full = input.len() / BLOCK_INFLATED_SIZE;
    let remainder = input.len() % BLOCK_INFLATED_SIZE;
    let count = (full + usize::from(remainder != 0)).min(max_windows);

    let mut windows = Vec::with_capacity(count);
    for i in 0..count {
        let start = i * BLOCK_INFLATED_SIZE;
        let end = (start + BLOCK_INFLATED_SIZE).min(input.len());
        windows.push(&input[start..end]);
    }
    windows
}
