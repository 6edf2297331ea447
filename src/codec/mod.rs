//! Single-block codec.
//!
//! One raw DEFLATE payload in, one verified output region out, and the
//! reverse. Block framing lives in [`crate::block`]; this module only talks
//! to the DEFLATE primitive and the CRC.

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

use crate::error::{Error, Result};

/// Fresh raw-inflate context (no zlib wrapper; the block header and tailer
/// are handled by the framing layer). Created once per worker and reset
/// between blocks.
pub fn new_inflater() -> Decompress {
    Decompress::new(false)
}

/// Fresh raw-deflate context: maximum level, default strategy, raw output.
pub fn new_deflater() -> Compress {
    Compress::new(Compression::best(), false)
}

/// Inflate one block's DEFLATE payload into `out` and verify it against the
/// tailer values. `out` must be exactly the tailer's inflated size.
pub fn inflate_block(
    z: &mut Decompress,
    deflate: &[u8],
    out: &mut [u8],
    expected_crc: u32,
) -> Result<()> {
    // An empty block still carries a terminated stream. Run it against a
    // scratch byte: backends refuse zero-space output, and anything the
    // stream produces is itself a size mismatch.
    if out.is_empty() {
        return inflate_empty_block(z, deflate, expected_crc);
    }

    z.reset(false);
    loop {
        let in_before = z.total_in() as usize;
        let out_before = z.total_out() as usize;
        let status =
            z.decompress(&deflate[in_before..], &mut out[out_before..], FlushDecompress::Finish)?;
        match status {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError => {
                // No forward progress: the stream disagrees with the declared
                // inflated size in one direction or the other.
                if z.total_in() as usize == in_before && z.total_out() as usize == out_before {
                    return Err(Error::SizeMismatch {
                        expected: out.len() as u32,
                        found: z.total_out() as u32,
                    });
                }
            }
        }
    }

    if z.total_out() as usize != out.len() {
        return Err(Error::SizeMismatch { expected: out.len() as u32, found: z.total_out() as u32 });
    }

    let crc = crc32fast::hash(out);
    if crc != expected_crc {
        return Err(Error::Crc32Mismatch { expected: expected_crc, found: crc });
    }

    Ok(())
}

fn inflate_empty_block(z: &mut Decompress, deflate: &[u8], expected_crc: u32) -> Result<()> {
    z.reset(false);
    let mut scratch = [0u8; 1];
    loop {
        let in_before = z.total_in() as usize;
        let status = z.decompress(&deflate[in_before..], &mut scratch, FlushDecompress::Finish)?;
        if z.total_out() > 0 {
            return Err(Error::SizeMismatch { expected: 0, found: z.total_out() as u32 });
        }
        match status {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError => {
                if z.total_in() as usize == in_before {
                    return Err(Error::SizeMismatch { expected: 0, found: 0 });
                }
            }
        }
    }

    if expected_crc != 0 {
        return Err(Error::Crc32Mismatch { expected: expected_crc, found: 0 });
    }
    Ok(())
}

/// Outcome of deflating one input window.
#[derive(Clone, Copy, Debug)]
pub struct DeflatedWindow {
    pub deflated_len: usize,
    pub crc: u32,
    pub inflated_len: u32,
}

/// Deflate one contiguous window into `out`, computing the CRC and sizes the
/// tailer needs. The caller sizes `out` for worst-case expansion of the
/// window, so a full buffer is an error rather than a resumption point.
pub fn deflate_window(z: &mut Compress, window: &[u8], out: &mut [u8]) -> Result<DeflatedWindow> {
    z.reset();
    loop {
        let in_before = z.total_in() as usize;
        let out_before = z.total_out() as usize;
        let status =
            z.compress(&window[in_before..], &mut out[out_before..], FlushCompress::Finish)?;
        match status {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError => {
                if z.total_in() as usize == in_before && z.total_out() as usize == out_before {
                    return Err(Error::BufferTooSmall {
                        size: out.len(),
                        required: out.len() + 1,
                    });
                }
            }
        }
    }

    Ok(DeflatedWindow {
        deflated_len: z.total_out() as usize,
        crc: crc32fast::hash(window),
        inflated_len: window.len() as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_window_round_trip() {
        let data = b"The quick brown fox jumps over the lazy dog";
        let mut out = vec![0u8; 1024];

        let mut deflater = new_deflater();
        let window = deflate_window(&mut deflater, data, &mut out).unwrap();
        assert_eq!(window.inflated_len as usize, data.len());
        assert_eq!(window.crc, crc32fast::hash(data));

        let mut inflated = vec![0u8; data.len()];
        let mut inflater = new_inflater();
        inflate_block(&mut inflater, &out[..window.deflated_len], &mut inflated, window.crc)
            .unwrap();
        assert_eq!(&inflated, data);
    }

    #[test]
    fn test_deflate_output_decodable_by_flate2() {
        let data = vec![0x55u8; 4096];
        let mut out = vec![0u8; 8192];
        let mut deflater = new_deflater();
        let window = deflate_window(&mut deflater, &data, &mut out).unwrap();

        let mut decoder = flate2::read::DeflateDecoder::new(&out[..window.deflated_len]);
        let mut decoded = Vec::new();
        decoder.read_to_end(&mut decoded).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_empty_window_is_empty_deflate_stream() {
        let mut out = vec![0u8; 64];
        let mut deflater = new_deflater();
        let window = deflate_window(&mut deflater, &[], &mut out).unwrap();
        assert_eq!(window.inflated_len, 0);
        assert_eq!(window.crc, 0);
        assert_eq!(&out[..window.deflated_len], &[0x03, 0x00]);
    }

    #[test]
    fn test_inflate_detects_crc_mismatch() {
        let data = b"ABCDEFGH";
        let mut out = vec![0u8; 64];
        let mut deflater = new_deflater();
        let window = deflate_window(&mut deflater, data, &mut out).unwrap();

        let mut inflated = vec![0u8; data.len()];
        let mut inflater = new_inflater();
        let err = inflate_block(
            &mut inflater,
            &out[..window.deflated_len],
            &mut inflated,
            window.crc ^ 1,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Crc32Mismatch { .. }));
    }

    #[test]
    fn test_inflate_detects_size_mismatch() {
        let data = b"ABCDEFGH";
        let mut out = vec![0u8; 64];
        let mut deflater = new_deflater();
        let window = deflate_window(&mut deflater, data, &mut out).unwrap();

        // Output region one byte longer than the stream actually inflates to.
        let mut inflated = vec![0u8; data.len() + 1];
        let mut inflater = new_inflater();
        let err = inflate_block(
            &mut inflater,
            &out[..window.deflated_len],
            &mut inflated,
            window.crc,
        )
        .unwrap_err();
        assert!(matches!(err, Error::SizeMismatch { .. }));
    }

    #[test]
    fn test_inflate_empty_block_payload() {
        let mut inflater = new_inflater();
        let mut out = [0u8; 0];
        inflate_block(&mut inflater, &[0x03, 0x00], &mut out, 0).unwrap();

        let err = inflate_block(&mut inflater, &[0x03, 0x00], &mut out, 0xdead).unwrap_err();
        assert!(matches!(err, Error::Crc32Mismatch { .. }));
    }

    #[test]
    fn test_contexts_are_reusable_across_blocks() {
        let mut deflater = new_deflater();
        let mut inflater = new_inflater();
        for payload in [&b"first block"[..], &b"second, different block"[..], &[]] {
            let mut out = vec![0u8; 256];
            let window = deflate_window(&mut deflater, payload, &mut out).unwrap();
            let mut inflated = vec![0u8; payload.len()];
            inflate_block(&mut inflater, &out[..window.deflated_len], &mut inflated, window.crc)
                .unwrap();
            assert_eq!(&inflated, payload);
        }
    }
}
