use super::{compress_words, decompress, CompressError, DecompressError};
use crate::{consts::MAGIC, pixmap::Pixmap, HeaderInfo};
use byteorder::{BigEndian, WriteBytesExt};
use snafu::{ResultExt, Snafu};
use std::io::{Read, Write};

#[derive(Debug, Snafu)]
pub enum StreamError {
    #[snafu(display("failed to compress the image"))]
    Compress { source: CompressError },
    #[snafu(display("failed to decompress the stream"))]
    Decompress { source: DecompressError },
    ReadIo { source: std::io::Error },
    WriteIo { source: std::io::Error },
}

/// Compresses `image` into `w`.
///
/// Writes go straight to `w`, so wrap unbuffered writers in a [`std::io::BufWriter`].
pub fn compress<W: Write>(image: &Pixmap, mut w: W) -> Result<HeaderInfo, StreamError> {
    let (header, words) = compress_words(image).context(CompressSnafu)?;

    w.write_all(MAGIC).context(WriteIoSnafu)?;
    writeln!(w, "{} {}", header.width, header.height).context(WriteIoSnafu)?;
    for &word in words.as_slice() {
        w.write_u32::<BigEndian>(word).context(WriteIoSnafu)?;
    }
    w.flush().context(WriteIoSnafu)?;

    Ok(header)
}

/// Reads `r` to the end and decompresses it.
pub fn decompress_from<R: Read>(mut r: R) -> Result<Pixmap, StreamError> {
    let mut data = Vec::new();
    r.read_to_end(&mut data).context(ReadIoSnafu)?;

    decompress(&data).context(DecompressSnafu)
}
