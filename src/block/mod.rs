pub mod constants;
pub mod frame;

pub use constants::*;
pub use frame::{parse_block, write_frame, BlockParse, Cursor, RawBlock};
