//! Full-color raster images with an arbitrary channel denominator.

use crate::{
    array2::{Array2, PlainArray2},
    consts::{BLOCK_SIZE, OUTPUT_DENOMINATOR},
    transform::Rgb,
};
use alloc::vec::Vec;
use snafu::{ensure, OptionExt, Snafu};

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum PixmapError {
    #[snafu(display(
        "a {width}x{height} image needs {} samples, but {actual} were given",
        width * height * 3
    ))]
    SizeMismatch {
        width: usize,
        height: usize,
        actual: usize,
    },
    #[snafu(display("the denominator of an image must be positive"))]
    ZeroDenominator,
    #[snafu(display("sample {value} exceeds the denominator {denominator}"))]
    SampleOutOfRange { value: u16, denominator: u16 },
}

/// An image whose channels are in `[0, denominator]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixmap {
    denominator: u16,
    pixels: PlainArray2<Rgb>,
}

impl Pixmap {
    /// A black image.
    pub fn new(width: usize, height: usize, denominator: u16) -> Result<Self, PixmapError> {
        ensure!(denominator > 0, ZeroDenominatorSnafu);

        Ok(Self {
            denominator,
            pixels: PlainArray2::new(width, height),
        })
    }

    /// A black image with the denominator of decompressed images.
    pub(crate) fn blank(width: usize, height: usize) -> Self {
        Self {
            denominator: OUTPUT_DENOMINATOR,
            pixels: PlainArray2::new(width, height),
        }
    }

    pub fn from_pixels(pixels: PlainArray2<Rgb>, denominator: u16) -> Result<Self, PixmapError> {
        ensure!(denominator > 0, ZeroDenominatorSnafu);

        for pixel in pixels.as_slice() {
            for value in [pixel.red, pixel.green, pixel.blue] {
                ensure!(
                    value <= denominator,
                    SampleOutOfRangeSnafu { value, denominator }
                );
            }
        }

        Ok(Self {
            denominator,
            pixels,
        })
    }

    /// Builds an image from interleaved 8-bit RGB samples, row-major, with denominator 255.
    pub fn from_rgb8(width: usize, height: usize, samples: &[u8]) -> Result<Self, PixmapError> {
        let pixels = samples
            .chunks_exact(3)
            .map(|p| Rgb::new(p[0].into(), p[1].into(), p[2].into()))
            .collect();
        let pixels = PlainArray2::from_vec(width, height, pixels)
            .filter(|_| samples.len() % 3 == 0)
            .context(SizeMismatchSnafu {
                width,
                height,
                actual: samples.len(),
            })?;

        Ok(Self {
            denominator: OUTPUT_DENOMINATOR,
            pixels,
        })
    }

    /// Builds an image from interleaved RGB samples, row-major.
    pub fn from_rgb16(
        width: usize,
        height: usize,
        samples: &[u16],
        denominator: u16,
    ) -> Result<Self, PixmapError> {
        let pixels = samples
            .chunks_exact(3)
            .map(|p| Rgb::new(p[0], p[1], p[2]))
            .collect();
        let pixels = PlainArray2::from_vec(width, height, pixels)
            .filter(|_| samples.len() % 3 == 0)
            .context(SizeMismatchSnafu {
                width,
                height,
                actual: samples.len(),
            })?;

        Self::from_pixels(pixels, denominator)
    }

    /// Interleaved RGB samples rescaled to denominator 255, row-major.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let denominator = u32::from(self.denominator);
        let scale = |v: u16| ((u32::from(v) * 255 + denominator / 2) / denominator) as u8;

        let mut samples = Vec::with_capacity(self.pixels.as_slice().len() * 3);
        for pixel in self.pixels.as_slice() {
            samples.extend_from_slice(&[scale(pixel.red), scale(pixel.green), scale(pixel.blue)]);
        }

        samples
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.pixels.height()
    }

    #[inline]
    pub fn denominator(&self) -> u16 {
        self.denominator
    }

    #[inline]
    pub fn pixels(&self) -> &PlainArray2<Rgb> {
        &self.pixels
    }

    /// Dimensions rounded down to whole tiles.
    #[inline]
    pub fn even_dimensions(&self) -> (usize, usize) {
        (
            self.width() / BLOCK_SIZE * BLOCK_SIZE,
            self.height() / BLOCK_SIZE * BLOCK_SIZE,
        )
    }

    /// Channels written here must not exceed the denominator.
    #[inline]
    pub(crate) fn pixels_mut(&mut self) -> &mut PlainArray2<Rgb> {
        &mut self.pixels
    }
}
