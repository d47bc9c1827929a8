use crate::{
    array2::{Array2, BlockedArray2, PlainArray2},
    bitpack::BitpackError,
    codeword,
    consts::{BLOCK_SIZE, CODEWORD_BITS, MAGIC},
    pixmap::Pixmap,
    transform::{self, Block, Rgb},
    HeaderInfo,
};
use alloc::{format, vec::Vec};
use byteorder::{BigEndian, ByteOrder};
use log::{debug, trace};
use snafu::{ensure, OptionExt, ResultExt, Snafu};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "std")]
mod std_api;
#[cfg(feature = "std")]
pub use std_api::*;

const CODEWORD_BYTES: usize = (CODEWORD_BITS / 8) as usize;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CompressError {
    #[snafu(display("a {width}x{height} image is too small, both dimensions must be at least 2"))]
    UndersizedImage { width: usize, height: usize },
    #[snafu(display("a {width}x{height} image can't be described by a stream header"))]
    OversizedImage { width: usize, height: usize },
    #[snafu(display("a quantized tile does not fit in a codeword"))]
    Pack { source: BitpackError },
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DecompressError {
    #[snafu(display("the input does not start with a COMP40 header"))]
    MalformedHeader,
    #[snafu(display(
        "the input ends early: {expected} bytes of codewords expected, {available} available"
    ))]
    TruncatedStream { expected: usize, available: usize },
}

/// Compresses `image` and appends the stream to `w`.
///
/// Odd widths and heights lose their last column or row.
pub fn compress_to_vec(image: &Pixmap, w: &mut Vec<u8>) -> Result<HeaderInfo, CompressError> {
    let (header, words) = compress_words(image)?;

    w.reserve(MAGIC.len() + 24 + words.as_slice().len() * CODEWORD_BYTES);
    w.extend_from_slice(MAGIC);
    w.extend_from_slice(format!("{} {}\n", header.width, header.height).as_bytes());

    words.map_row_major(|_, _, &word| {
        let mut bytes = [0; CODEWORD_BYTES];
        BigEndian::write_u32(&mut bytes, word);
        w.extend_from_slice(&bytes);
    });

    Ok(header)
}

/// Computes the codeword grid of `image`, one codeword per tile.
pub(crate) fn compress_words(
    image: &Pixmap,
) -> Result<(HeaderInfo, PlainArray2<u32>), CompressError> {
    let (width, height) = (image.width(), image.height());
    ensure!(
        width >= BLOCK_SIZE && height >= BLOCK_SIZE,
        UndersizedImageSnafu { width, height }
    );

    let (width, height) = image.even_dimensions();
    if (width, height) != (image.width(), image.height()) {
        trace!(
            "trimming {}x{} image to {width}x{height}",
            image.width(),
            image.height()
        );
    }
    let header = header_for(width, height)?;

    let tiles = BlockedArray2::from_region(image.pixels(), width, height, BLOCK_SIZE);
    let denominator = image.denominator();
    let encode = |tile: &[Rgb]| {
        let block = Block::from_array([tile[0], tile[1], tile[2], tile[3]]);
        codeword::pack(transform::encode_block(block, denominator))
    };

    #[cfg(feature = "parallel")]
    let words = tiles
        .as_slice()
        .par_chunks_exact(tiles.block_len())
        .map(encode)
        .collect::<Result<Vec<_>, _>>();
    #[cfg(not(feature = "parallel"))]
    let words = tiles.blocks().map(encode).collect::<Result<Vec<_>, _>>();
    let words = words.context(PackSnafu)?;

    // tiles come out block row by block row, which is the row-major order of the grid
    let mut grid = PlainArray2::new(width / BLOCK_SIZE, height / BLOCK_SIZE);
    let grid_width = grid.width();
    for (i, word) in words.into_iter().enumerate() {
        *grid.at_mut(i % grid_width, i / grid_width) = word;
    }

    debug!(
        "compressed {width}x{height} image into {} codewords",
        grid.as_slice().len()
    );

    Ok((header, grid))
}

/// Header dimensions are `u32`, wider images would be written with a truncated size.
fn header_for(width: usize, height: usize) -> Result<HeaderInfo, CompressError> {
    let (Ok(header_width), Ok(header_height)) = (u32::try_from(width), u32::try_from(height))
    else {
        return OversizedImageSnafu { width, height }.fail();
    };

    Ok(HeaderInfo {
        width: header_width,
        height: header_height,
    })
}

/// Parses the header of a compressed stream without decoding any codewords.
pub fn read_header(data: &[u8]) -> Result<HeaderInfo, DecompressError> {
    parse_header(data).map(|(header, _)| header)
}

fn parse_header(data: &[u8]) -> Result<(HeaderInfo, &[u8]), DecompressError> {
    let rest = data.strip_prefix(MAGIC).context(MalformedHeaderSnafu)?;
    let (width, rest) = parse_decimal(rest, b' ')?;
    let (height, rest) = parse_decimal(rest, b'\n')?;

    Ok((HeaderInfo { width, height }, rest))
}

/// Parses ASCII digits up to and including `terminator`.
fn parse_decimal(data: &[u8], terminator: u8) -> Result<(u32, &[u8]), DecompressError> {
    let end = data
        .iter()
        .position(|&b| b == terminator)
        .context(MalformedHeaderSnafu)?;
    let (digits, rest) = (&data[..end], &data[end + 1..]);
    ensure!(
        !digits.is_empty() && digits.iter().all(u8::is_ascii_digit),
        MalformedHeaderSnafu
    );

    let value = digits
        .iter()
        .try_fold(0u32, |acc, &digit| {
            acc.checked_mul(10)?.checked_add(u32::from(digit - b'0'))
        })
        .context(MalformedHeaderSnafu)?;

    Ok((value, rest))
}

/// Decompresses a stream into an image with denominator 255.
///
/// Bytes after the last codeword are ignored.
pub fn decompress(data: &[u8]) -> Result<Pixmap, DecompressError> {
    let (header, payload) = parse_header(data)?;
    let width = header.width as usize;
    let height = header.height as usize;
    let grid_width = width.div_ceil(BLOCK_SIZE);
    let grid_height = height.div_ceil(BLOCK_SIZE);

    let expected = grid_width
        .checked_mul(grid_height)
        .and_then(|n| n.checked_mul(CODEWORD_BYTES))
        .context(MalformedHeaderSnafu)?;
    ensure!(
        payload.len() >= expected,
        TruncatedStreamSnafu {
            expected,
            available: payload.len(),
        }
    );

    let words = PlainArray2::from_fn(grid_width, grid_height, |col, row| {
        let offset = (row * grid_width + col) * CODEWORD_BYTES;
        BigEndian::read_u32(&payload[offset..offset + CODEWORD_BYTES])
    });

    #[cfg(feature = "parallel")]
    let tiles = words
        .as_slice()
        .par_iter()
        .map(|&word| transform::decode_block(codeword::unpack(word)))
        .collect::<Vec<_>>();
    #[cfg(not(feature = "parallel"))]
    let tiles = {
        let mut tiles = Vec::with_capacity(words.as_slice().len());
        words.map_row_major(|_, _, &word| {
            tiles.push(transform::decode_block(codeword::unpack(word)));
        });
        tiles
    };

    let mut image = Pixmap::blank(width, height);
    let pixels = image.pixels_mut();
    for (i, tile) in tiles.into_iter().enumerate() {
        let col = i % grid_width * BLOCK_SIZE;
        let row = i / grid_width * BLOCK_SIZE;

        let positions = [(0, 0), (1, 0), (0, 1), (1, 1)];
        for ((dx, dy), pixel) in positions.into_iter().zip(tile.into_array()) {
            // odd dimensions leave half of the edge tiles outside the image
            if let Some(target) = pixels.get_mut(col + dx, row + dy) {
                *target = pixel;
            }
        }
    }

    debug!(
        "decompressed {width}x{height} image from {} codewords",
        words.as_slice().len()
    );

    Ok(image)
}
