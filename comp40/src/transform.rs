//! Conversions between the pixel representations of a tile.
//!
//! ```plain
//! Block<Rgb> <-> Block<ComponentVideo> <-> DctBlock <-> QuantizedBlock
//! ```
//!
//! Every conversion is pure and total. Values that leave their nominal range are clamped at the
//! points documented below, never rejected.

use crate::{
    chroma::{chroma_index, chroma_value},
    consts::{A_SCALE, BCD_LIMIT, BCD_SCALE, OUTPUT_DENOMINATOR},
    utils::{clamp, round_to_int},
};

/// A raster sample. Channels are in `[0, denominator]` of the image the pixel belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl Rgb {
    #[inline]
    pub const fn new(red: u16, green: u16, blue: u16) -> Self {
        Self { red, green, blue }
    }
}

/// A pixel in component video (Y/Pb/Pr) color space.
///
/// Nominally `y` is in `[0, 1]`, `pb` and `pr` are in `[-0.5, 0.5]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ComponentVideo {
    pub y: f32,
    pub pb: f32,
    pub pr: f32,
}

/// The four pixels of a 2×2 tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Block<T> {
    pub top_left: T,
    pub top_right: T,
    pub bottom_left: T,
    pub bottom_right: T,
}

impl<T> Block<T> {
    /// Builds a block from its pixels in row-major order.
    #[inline]
    pub fn from_array([top_left, top_right, bottom_left, bottom_right]: [T; 4]) -> Self {
        Self {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
        }
    }

    /// Returns the pixels in row-major order.
    #[inline]
    pub fn into_array(self) -> [T; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
        ]
    }

    #[inline]
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Block<U> {
        Block {
            top_left: f(self.top_left),
            top_right: f(self.top_right),
            bottom_left: f(self.bottom_left),
            bottom_right: f(self.bottom_right),
        }
    }
}

/// Frequency-domain form of a tile.
///
/// - `a`: average luma
/// - `b`: bottom row minus top row
/// - `c`: right column minus left column
/// - `d`: diagonal minus anti-diagonal
/// - `pb`, `pr`: chroma averaged over the tile
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DctBlock {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub pb: f32,
    pub pr: f32,
}

/// Integer codes of a tile, ready to be packed into a codeword.
///
/// In a well-formed block `a` fits 6 unsigned bits, `b`, `c`, `d` fit 6 signed bits, and `pb`,
/// `pr` are chroma table indices. Nothing here enforces that; [`crate::codeword::pack`] does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct QuantizedBlock {
    pub a: i32,
    pub b: i32,
    pub c: i32,
    pub d: i32,
    pub pb: u8,
    pub pr: u8,
}

pub fn rgb_to_component_video(pixel: Rgb, denominator: u16) -> ComponentVideo {
    let denominator = f32::from(denominator);
    let r = f32::from(pixel.red) / denominator;
    let g = f32::from(pixel.green) / denominator;
    let b = f32::from(pixel.blue) / denominator;

    ComponentVideo {
        y: 0.299 * r + 0.587 * g + 0.114 * b,
        pb: -0.168736 * r - 0.331264 * g + 0.5 * b,
        pr: 0.5 * r - 0.418688 * g - 0.081312 * b,
    }
}

/// Converts back to RGB scaled by `denominator`.
///
/// Channels are clamped to `[0, 255]` whatever the denominator, since decoded images always use
/// [`OUTPUT_DENOMINATOR`].
pub fn component_video_to_rgb(cv: ComponentVideo, denominator: u16) -> Rgb {
    let r = cv.y + 1.402 * cv.pr;
    let g = cv.y - 0.344136 * cv.pb - 0.714136 * cv.pr;
    let b = cv.y + 1.772 * cv.pb;

    let denominator = f32::from(denominator);
    let max = f32::from(OUTPUT_DENOMINATOR);
    let channel = |v: f32| clamp(round_to_int(v * denominator) as f32, max, 0.0) as u16;

    Rgb {
        red: channel(r),
        green: channel(g),
        blue: channel(b),
    }
}

pub fn block_to_dct(block: Block<ComponentVideo>) -> DctBlock {
    let [y1, y2, y3, y4] = block.map(|cv| cv.y).into_array();
    let [pb, pr] = block
        .into_array()
        .iter()
        .fold([0.0, 0.0], |[pb, pr], cv| [pb + cv.pb, pr + cv.pr]);

    DctBlock {
        a: (y4 + y3 + y2 + y1) / 4.0,
        b: (y4 + y3 - y2 - y1) / 4.0,
        c: (y4 - y3 + y2 - y1) / 4.0,
        d: (y4 - y3 - y2 + y1) / 4.0,
        pb: pb / 4.0,
        pr: pr / 4.0,
    }
}

pub fn dct_to_block(dct: DctBlock) -> Block<ComponentVideo> {
    let DctBlock { a, b, c, d, pb, pr } = dct;
    let pixel = |y| ComponentVideo { y, pb, pr };

    Block {
        top_left: pixel(a - b - c + d),
        top_right: pixel(a - b + c - d),
        bottom_left: pixel(a + b - c - d),
        bottom_right: pixel(a + b + c + d),
    }
}

pub fn quantize(dct: DctBlock) -> QuantizedBlock {
    let bcd = |v: f32| round_to_int(BCD_SCALE * clamp(v, BCD_LIMIT, -BCD_LIMIT));

    QuantizedBlock {
        a: round_to_int(A_SCALE * dct.a),
        b: bcd(dct.b),
        c: bcd(dct.c),
        d: bcd(dct.d),
        pb: chroma_index(dct.pb),
        pr: chroma_index(dct.pr),
    }
}

/// Exact inverse of the scaling in [`quantize`]. Nothing is clamped on the way back.
///
/// # Panics
///
/// Panics if a chroma index is out of the table's range, which [`crate::codeword::unpack`] can't
/// produce.
pub fn dequantize(q: QuantizedBlock) -> DctBlock {
    DctBlock {
        a: q.a as f32 / A_SCALE,
        b: q.b as f32 / BCD_SCALE,
        c: q.c as f32 / BCD_SCALE,
        d: q.d as f32 / BCD_SCALE,
        pb: chroma_value(q.pb),
        pr: chroma_value(q.pr),
    }
}

/// Runs the whole forward chain for one tile.
#[inline]
pub fn encode_block(pixels: Block<Rgb>, denominator: u16) -> QuantizedBlock {
    quantize(block_to_dct(
        pixels.map(|pixel| rgb_to_component_video(pixel, denominator)),
    ))
}

/// Runs the whole inverse chain for one tile. The result uses [`OUTPUT_DENOMINATOR`].
#[inline]
pub fn decode_block(q: QuantizedBlock) -> Block<Rgb> {
    dct_to_block(dequantize(q)).map(|cv| component_video_to_rgb(cv, OUTPUT_DENOMINATOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-5,
            "{actual} is not close to {expected}"
        );
    }

    fn assert_rgb_within_one(actual: Rgb, expected: Rgb) {
        let diff = |a: u16, b: u16| (i32::from(a) - i32::from(b)).abs();
        assert!(
            diff(actual.red, expected.red) <= 1
                && diff(actual.green, expected.green) <= 1
                && diff(actual.blue, expected.blue) <= 1,
            "{actual:?} differs from {expected:?} by more than one"
        );
    }

    #[test]
    fn white_and_black() {
        let white = rgb_to_component_video(Rgb::new(255, 255, 255), 255);
        assert_close(white.y, 1.0);
        assert_close(white.pb, 0.0);
        assert_close(white.pr, 0.0);

        let black = rgb_to_component_video(Rgb::new(0, 0, 0), 255);
        assert_eq!(black, ComponentVideo::default());
    }

    #[test]
    fn denominator_scales_channels() {
        let a = rgb_to_component_video(Rgb::new(15, 0, 5), 15);
        let b = rgb_to_component_video(Rgb::new(255, 0, 85), 255);
        assert_close(a.y, b.y);
        assert_close(a.pb, b.pb);
        assert_close(a.pr, b.pr);
    }

    #[test]
    fn component_video_roundtrip() {
        for red in (0..=255).step_by(15) {
            for green in (0..=255).step_by(15) {
                for blue in (0..=255).step_by(15) {
                    let pixel = Rgb::new(red, green, blue);
                    let cv = rgb_to_component_video(pixel, 255);
                    assert_rgb_within_one(component_video_to_rgb(cv, 255), pixel);
                }
            }
        }
    }

    #[test]
    fn output_is_clamped() {
        let too_bright = ComponentVideo {
            y: 1.5,
            pb: 0.0,
            pr: 0.0,
        };
        assert_eq!(
            component_video_to_rgb(too_bright, 255),
            Rgb::new(255, 255, 255)
        );

        let too_dark = ComponentVideo {
            y: -0.5,
            pb: -0.5,
            pr: -0.5,
        };
        assert_eq!(component_video_to_rgb(too_dark, 255).blue, 0);
    }

    #[test]
    fn butterfly_basis() {
        let luma = |tl, tr, bl, br| {
            Block::from_array([tl, tr, bl, br]).map(|y| ComponentVideo { y, pb: 0.0, pr: 0.0 })
        };

        let dct = block_to_dct(luma(0.0, 0.0, 0.0, 1.0));
        assert_eq!((dct.a, dct.b, dct.c, dct.d), (0.25, 0.25, 0.25, 0.25));

        let dct = block_to_dct(luma(1.0, 0.0, 0.0, 0.0));
        assert_eq!((dct.a, dct.b, dct.c, dct.d), (0.25, -0.25, -0.25, 0.25));

        // bottom row brighter than the top row
        let dct = block_to_dct(luma(0.0, 0.0, 1.0, 1.0));
        assert_eq!((dct.a, dct.b, dct.c, dct.d), (0.5, 0.5, 0.0, 0.0));

        // right column brighter than the left column
        let dct = block_to_dct(luma(0.0, 1.0, 0.0, 1.0));
        assert_eq!((dct.a, dct.b, dct.c, dct.d), (0.5, 0.0, 0.5, 0.0));
    }

    #[test]
    fn chroma_is_averaged() {
        let block = Block::from_array([0.1, 0.2, 0.3, 0.4]).map(|c| ComponentVideo {
            y: 0.5,
            pb: c,
            pr: -c,
        });
        let dct = block_to_dct(block);
        assert_close(dct.pb, 0.25);
        assert_close(dct.pr, -0.25);

        for cv in dct_to_block(dct).into_array() {
            assert_close(cv.pb, 0.25);
            assert_close(cv.pr, -0.25);
        }
    }

    #[test]
    fn dct_roundtrip() {
        let block = Block::from_array([0.1, 0.7, 0.35, 0.9]).map(|y| ComponentVideo {
            y,
            pb: 0.0,
            pr: 0.0,
        });
        let back = dct_to_block(block_to_dct(block));

        for (actual, expected) in back.into_array().iter().zip(block.into_array()) {
            assert_close(actual.y, expected.y);
        }
    }

    #[test]
    fn quantize_clamps_gradients() {
        let q = quantize(DctBlock {
            a: 1.0,
            b: 0.9,
            c: -0.9,
            d: 0.1,
            pb: 0.0,
            pr: 0.35,
        });

        assert_eq!(q.a, 63);
        assert_eq!(q.b, 31);
        assert_eq!(q.c, -31);
        assert_eq!(q.d, 10);
        assert_eq!(chroma_value(q.pb), 0.0);
        assert_eq!(q.pr, crate::chroma::MAX_INDEX);
    }

    #[test]
    fn dequantize_inverts_scaling() {
        let dct = dequantize(QuantizedBlock {
            a: 63,
            b: -31,
            c: 0,
            d: 10,
            pb: 8,
            pr: 0,
        });

        assert_close(dct.a, 1.0);
        assert_close(dct.b, -31.0 / 103.0);
        assert_eq!(dct.c, 0.0);
        assert_close(dct.d, 10.0 / 103.0);
        assert_eq!(dct.pb, chroma_value(8));
        assert_eq!(dct.pr, chroma_value(0));
    }

    #[test]
    fn uniform_block_roundtrip_arb() {
        arbtest::arbtest(|u| {
            let pixel = Rgb::new(
                u.int_in_range(0..=255)?,
                u.int_in_range(0..=255)?,
                u.int_in_range(0..=255)?,
            );
            let block = Block::from_array([pixel; 4]);

            let dct = block_to_dct(block.map(|p| rgb_to_component_video(p, 255)));
            for back in dct_to_block(dct).into_array() {
                assert_rgb_within_one(component_video_to_rgb(back, 255), pixel);
            }
            Ok(())
        });
    }

    #[test]
    fn grey_block_roundtrip_arb() {
        arbtest::arbtest(|u| {
            let mut grey = || -> arbtest::arbitrary::Result<Rgb> {
                let v = u.int_in_range(0..=255)?;
                Ok(Rgb::new(v, v, v))
            };
            let block = Block::from_array([grey()?, grey()?, grey()?, grey()?]);

            let dct = block_to_dct(block.map(|p| rgb_to_component_video(p, 255)));
            let back = dct_to_block(dct).into_array();
            for (back, pixel) in back.into_iter().zip(block.into_array()) {
                assert_rgb_within_one(component_video_to_rgb(back, 255), pixel);
            }
            Ok(())
        });
    }

    #[test]
    fn full_chain_is_bounded() {
        let block = Block::from_array([
            Rgb::new(200, 40, 40),
            Rgb::new(190, 50, 45),
            Rgb::new(205, 45, 35),
            Rgb::new(195, 42, 50),
        ]);

        let decoded = decode_block(encode_block(block, 255));
        for (actual, expected) in decoded.into_array().iter().zip(block.into_array()) {
            let diff = |a: u16, b: u16| (i32::from(a) - i32::from(b)).abs();
            let worst = diff(actual.red, expected.red)
                .max(diff(actual.green, expected.green))
                .max(diff(actual.blue, expected.blue));
            assert!(worst < 40, "{actual:?} vs {expected:?}");
        }
    }
}
