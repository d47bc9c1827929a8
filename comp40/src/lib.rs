//! Reference implementation of the COMP40 compressed image format.
//!
//! COMP40 is a lossy codec for full-color images. The image is cut into 2×2 pixel tiles and
//! every tile is stored in exactly one 32-bit codeword, which makes the compressed size a fixed
//! 8 bits per pixel regardless of image content.
//!
//! # Pipeline
//!
//! Per tile, compression runs:
//!
//! 1. RGB → component video (Y/Pb/Pr), see [`transform::rgb_to_component_video`]
//! 2. four luma samples → a 4-point discrete cosine transform (`a`, `b`, `c`, `d`), chroma
//!    averaged over the tile, see [`transform::block_to_dct`]
//! 3. quantization to small integers, see [`transform::quantize`]
//! 4. bit packing into a codeword, see [`codeword::pack`]
//!
//! Decompression runs the same steps backwards. Tiles never depend on each other, so the
//! `parallel` feature computes them on a rayon thread pool without changing the output.
//!
//! # Stream format
//!
//! ```plain
//! COMP40 Compressed image format 2\n
//! <width> <height>\n
//! <codewords>
//! ```
//!
//! - width and height are ASCII decimal and describe the decoded image (both even)
//! - `(width / 2) * (height / 2)` codewords follow, row-major over the tile grid, each stored
//!   big-endian with no padding
//!
//! See [consts] for the bit layout of a codeword.
#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
pub mod array2;
#[cfg(feature = "alloc")]
pub mod codec;
#[cfg(feature = "std")]
pub mod diff;
#[cfg(feature = "alloc")]
pub mod pixmap;

pub mod bitpack;
pub mod chroma;
pub mod codeword;
pub mod transform;
pub mod utils;

#[cfg(feature = "alloc")]
pub use codec::{compress_to_vec, decompress, read_header, CompressError, DecompressError};
#[cfg(feature = "std")]
pub use codec::{compress, decompress_from, StreamError};
#[cfg(feature = "alloc")]
pub use pixmap::Pixmap;
pub use transform::{Block, ComponentVideo, DctBlock, QuantizedBlock, Rgb};

/// Width and height of a compressed image, as stored in the stream header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderInfo {
    pub width: u32,
    pub height: u32,
}

pub mod consts {
    use crate::bitpack::Field;

    /// First line of every compressed stream.
    pub const MAGIC: &[u8] = b"COMP40 Compressed image format 2\n";

    /// Side length of a tile, in pixels.
    pub const BLOCK_SIZE: usize = 2;

    /// Width of a codeword in bits. Codewords are stored in four bytes.
    pub const CODEWORD_BITS: u32 = 32;

    /// Denominator of every decompressed image.
    pub const OUTPUT_DENOMINATOR: u16 = 255;

    /// Average luma of the tile.
    ///
    /// ```plain
    /// .- codeword -------------------------------------------------.
    /// | 31 .. 26 | 25 .. 20 | 19 .. 14 | 13 .. 8 | 7 .. 4 | 3 .. 0 |
    /// |----------+----------+----------+---------+--------+--------|
    /// |    a     |    b     |    c     |    d    |   pb   |   pr   |
    /// `------------------------------------------------------------`
    /// ```
    ///
    /// - 6-bit unsigned, `round(63 * a)`
    pub const A_FIELD: Field = Field::new(6, 26);

    /// Vertical luma gradient, 6-bit two's complement, `round(103 * b)`.
    pub const B_FIELD: Field = Field::new(6, 20);

    /// Horizontal luma gradient, 6-bit two's complement, `round(103 * c)`.
    pub const C_FIELD: Field = Field::new(6, 14);

    /// Diagonal luma gradient, 6-bit two's complement, `round(103 * d)`.
    pub const D_FIELD: Field = Field::new(6, 8);

    /// Index of the average Pb in the chroma table, 4-bit unsigned.
    pub const PB_FIELD: Field = Field::new(4, 4);

    /// Index of the average Pr in the chroma table, 4-bit unsigned.
    pub const PR_FIELD: Field = Field::new(4, 0);

    /// Scale applied to `a` before rounding. `63` is the largest 6-bit unsigned value.
    pub const A_SCALE: f32 = 63.0;

    /// Scale applied to `b`, `c` and `d` before rounding. `103 * 0.3` rounds to `31`, the largest
    /// 6-bit signed value.
    pub const BCD_SCALE: f32 = 103.0;

    /// `b`, `c` and `d` are clamped to `[-BCD_LIMIT, BCD_LIMIT]` before quantization.
    pub const BCD_LIMIT: f32 = 0.3;
}
