//! Quantization table for the averaged Pb/Pr chroma of a tile.
//!
//! Sixteen representative values, denser around zero where most natural chroma lives. The table
//! contains `0.0` so that neutral greys survive compression without a color cast.
//!
//! With an even number of entries and a zero among them the table can't be symmetric. It is
//! skewed on purpose: the negative side keeps `-0.15`, the positive side has no `0.15`, so
//! positive chroma in `[0.10, 0.20]` is quantized about twice as coarsely as its negative
//! counterpart.

/// Largest index returned by [`chroma_index`].
pub const MAX_INDEX: u8 = 15;

const CHROMA_OF_INDEX: [f32; MAX_INDEX as usize + 1] = [
    -0.35, -0.20, -0.15, -0.10, -0.077, -0.055, -0.033, -0.011, 0.0, 0.011, 0.033, 0.055, 0.077,
    0.10, 0.20, 0.35,
];

/// Maps a chroma value to the index of the nearest table entry.
///
/// The input is clamped to `[-0.5, 0.5]` first. Ties resolve to the lower index. NaN maps to
/// index 0.
pub fn chroma_index(chroma: f32) -> u8 {
    let chroma = crate::utils::clamp(chroma, 0.5, -0.5);

    let mut best = 0;
    let mut best_distance = f32::INFINITY;
    for (index, &value) in CHROMA_OF_INDEX.iter().enumerate() {
        let distance = value - chroma;
        let distance = if distance < 0.0 { -distance } else { distance };
        if distance < best_distance {
            best = index;
            best_distance = distance;
        }
    }

    best as u8
}

/// Returns the representative chroma value of a table index.
///
/// # Panics
///
/// Panics if `index` is greater than [`MAX_INDEX`].
#[inline]
pub fn chroma_value(index: u8) -> f32 {
    CHROMA_OF_INDEX[usize::from(index)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_side_skips_fifteen_hundredths() {
        assert_eq!(chroma_value(chroma_index(-0.15)), -0.15);
        assert_eq!(chroma_value(chroma_index(0.14)), 0.10);
        assert_eq!(chroma_value(chroma_index(0.16)), 0.20);
    }

    #[test]
    fn table_is_strictly_increasing() {
        assert!(CHROMA_OF_INDEX.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn table_values_map_to_themselves() {
        for index in 0..=MAX_INDEX {
            assert_eq!(chroma_index(chroma_value(index)), index);
        }
    }

    #[test]
    fn neutral_chroma_is_exact() {
        assert_eq!(chroma_value(chroma_index(0.0)), 0.0);
        assert_eq!(chroma_value(chroma_index(1e-7)), 0.0);
        assert_eq!(chroma_value(chroma_index(-1e-7)), 0.0);
    }

    #[test]
    fn out_of_range_saturates() {
        assert_eq!(chroma_index(-3.0), 0);
        assert_eq!(chroma_index(0.5), MAX_INDEX);
        assert_eq!(chroma_index(f32::INFINITY), MAX_INDEX);
        assert_eq!(chroma_index(f32::NAN), 0);
    }

    #[test]
    fn index_is_monotonic_arb() {
        arbtest::arbtest(|u| {
            let a = u.int_in_range(-60_000i32..=60_000)? as f32 / 100_000.0;
            let b = u.int_in_range(-60_000i32..=60_000)? as f32 / 100_000.0;
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

            assert!(chroma_index(lo) <= chroma_index(hi));
            assert!(chroma_index(lo) <= MAX_INDEX);
            Ok(())
        });
    }
}
