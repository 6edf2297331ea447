use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Block framing errors
    #[error("Malformed BGZF header: {reason}")]
    MalformedHeader { reason: &'static str },

    #[error("BGZF block too large: {size} bytes exceeds maximum {max}")]
    BlockTooLarge { size: usize, max: usize },

    // Verification errors
    #[error("CRC32 mismatch: expected 0x{expected:08x}, got 0x{found:08x}")]
    Crc32Mismatch { expected: u32, found: u32 },

    #[error("Inflated size mismatch: expected {expected} bytes, got {found}")]
    SizeMismatch { expected: u32, found: u32 },

    // DEFLATE primitive errors
    #[error("Raw inflate failed: {0}")]
    Inflate(#[from] flate2::DecompressError),

    #[error("Raw deflate failed: {0}")]
    Deflate(#[from] flate2::CompressError),

    // Caller contract errors
    #[error("Output buffer too small: {size} bytes, need at least {required}")]
    BufferTooSmall { size: usize, required: usize },

    #[error("Invalid buffer count: {count} (expected 1..={max})")]
    InvalidBufferCount { count: usize, max: usize },

    // Stream errors
    #[error("Unexpected end of input")]
    UnexpectedEof,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(err) => err,
            other => std::io::Error::new(std::io::ErrorKind::InvalidData, other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
