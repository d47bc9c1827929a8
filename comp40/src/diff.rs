//! Root-mean-square difference between two images.
//!
//! Used to measure how much detail a compression round trip loses. Channels are normalized by
//! each image's own denominator, so the result is in `[0, 1]` regardless of bit depth.

use crate::{array2::Array2, pixmap::Pixmap, transform::Rgb};
use snafu::{ensure, Snafu};

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum DiffError {
    #[snafu(display(
        "images of {a_width}x{a_height} and {b_width}x{b_height} differ by more than one row or column"
    ))]
    DimensionMismatch {
        a_width: usize,
        a_height: usize,
        b_width: usize,
        b_height: usize,
    },
    #[snafu(display("images without pixels can't be compared"))]
    EmptyImage,
}

/// Computes `sqrt(Σ(Δr² + Δg² + Δb²) / (3·w·h))` over the pixels both images share.
///
/// Widths and heights may differ by one, which is what compressing an odd-sized image does.
pub fn rms_difference(a: &Pixmap, b: &Pixmap) -> Result<f64, DiffError> {
    ensure!(
        a.width().abs_diff(b.width()) <= 1 && a.height().abs_diff(b.height()) <= 1,
        DimensionMismatchSnafu {
            a_width: a.width(),
            a_height: a.height(),
            b_width: b.width(),
            b_height: b.height(),
        }
    );

    let width = a.width().min(b.width());
    let height = a.height().min(b.height());
    ensure!(width > 0 && height > 0, EmptyImageSnafu);

    let (a_denominator, b_denominator) = (f64::from(a.denominator()), f64::from(b.denominator()));
    let normalize = |pixel: &Rgb, denominator: f64| {
        [pixel.red, pixel.green, pixel.blue].map(|v| f64::from(v) / denominator)
    };

    let mut sum = 0.0;
    a.pixels().map_row_major(|col, row, pixel| {
        if col >= width || row >= height {
            return;
        }

        let x = normalize(pixel, a_denominator);
        let y = normalize(b.pixels().at(col, row), b_denominator);
        sum += x.iter().zip(&y).map(|(x, y)| (x - y) * (x - y)).sum::<f64>();
    });

    Ok((sum / (3 * width * height) as f64).sqrt())
}
