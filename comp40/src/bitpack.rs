//! Signed and unsigned bit fields inside a 64-bit word.
//!
//! A field is described by its `width` in bits and the position of its least significant bit
//! (`lsb`). All operations are pure: updating a field returns a new word.

use snafu::{ensure, Snafu};

/// Number of bits in the scratch word.
pub const WORD_BITS: u32 = u64::BITS;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum BitpackError {
    /// The field does not fit in a 64-bit word. This is a bug in the caller, not bad data.
    #[snafu(display("a {width}-bit field at bit {lsb} does not fit in a 64-bit word"))]
    InvalidFieldSpec { width: u32, lsb: u32 },
    #[snafu(display("{value} does not fit in a {width}-bit field"))]
    Overflow { value: i128, width: u32 },
}

/// Returns `true` if `value` can be stored in an unsigned field of `width` bits.
///
/// No value fits in a zero-width field.
#[inline]
pub const fn fits_unsigned(value: u64, width: u32) -> bool {
    match width {
        0 => false,
        WORD_BITS.. => true,
        _ => value >> width == 0,
    }
}

/// Returns `true` if `value` can be stored in a two's complement field of `width` bits.
///
/// A one-bit field accepts `0` and `1`. Note that storing `1` and reading it back with
/// [`get_signed`] yields `-1`.
#[inline]
pub const fn fits_signed(value: i64, width: u32) -> bool {
    match width {
        0 => false,
        1 => value == 0 || value == 1,
        WORD_BITS.. => true,
        _ => {
            let half = 1i64 << (width - 1);
            -half <= value && value < half
        }
    }
}

/// Extracts an unsigned field, right-justified and zero-extended.
pub fn get_unsigned(word: u64, width: u32, lsb: u32) -> Result<u64, BitpackError> {
    Ok(Field::checked(width, lsb)?.get_unsigned(word))
}

/// Extracts a field and sign-extends it from its top bit.
pub fn get_signed(word: u64, width: u32, lsb: u32) -> Result<i64, BitpackError> {
    Ok(Field::checked(width, lsb)?.get_signed(word))
}

/// Returns `word` with the field replaced by the unsigned `value`.
pub fn new_unsigned(word: u64, width: u32, lsb: u32, value: u64) -> Result<u64, BitpackError> {
    Field::checked(width, lsb)?.replace_unsigned(word, value)
}

/// Returns `word` with the field replaced by the low `width` bits of the two's complement
/// representation of `value`.
pub fn new_signed(word: u64, width: u32, lsb: u32, value: i64) -> Result<u64, BitpackError> {
    Field::checked(width, lsb)?.replace_signed(word, value)
}

/// A validated `(width, lsb)` pair.
///
/// Fields with a layout known at compile time are built with [`Field::new`], which rejects an
/// invalid layout during constant evaluation. Fields built from run-time values go through
/// [`Field::checked`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    width: u32,
    lsb: u32,
}

impl Field {
    /// # Panics
    ///
    /// Panics if the field does not fit in a 64-bit word. In a `const` item this is a compile
    /// error.
    pub const fn new(width: u32, lsb: u32) -> Self {
        assert!(
            Self::is_valid(width, lsb),
            "bit field does not fit in a 64-bit word"
        );

        Self { width, lsb }
    }

    pub fn checked(width: u32, lsb: u32) -> Result<Self, BitpackError> {
        ensure!(
            Self::is_valid(width, lsb),
            InvalidFieldSpecSnafu { width, lsb }
        );

        Ok(Self { width, lsb })
    }

    #[inline]
    const fn is_valid(width: u32, lsb: u32) -> bool {
        width <= WORD_BITS && lsb <= WORD_BITS - width
    }

    #[inline]
    pub const fn width(self) -> u32 {
        self.width
    }

    #[inline]
    pub const fn lsb(self) -> u32 {
        self.lsb
    }

    /// Mask of `width` ones, right-justified.
    #[inline]
    const fn low_mask(self) -> u64 {
        if self.width == 0 {
            0
        } else {
            u64::MAX >> (WORD_BITS - self.width)
        }
    }

    /// Mask of the bits covered by the field, in place.
    #[inline]
    pub const fn mask(self) -> u64 {
        // a zero-width field may sit at bit 64, which can't be shifted to
        if self.width == 0 {
            0
        } else {
            self.low_mask() << self.lsb
        }
    }

    #[inline]
    pub const fn get_unsigned(self, word: u64) -> u64 {
        if self.width == 0 {
            0
        } else {
            (word >> self.lsb) & self.low_mask()
        }
    }

    #[inline]
    pub const fn get_signed(self, word: u64) -> i64 {
        if self.width == 0 {
            return 0;
        }

        let shift = WORD_BITS - self.width;
        ((self.get_unsigned(word) << shift) as i64) >> shift
    }

    pub fn replace_unsigned(self, word: u64, value: u64) -> Result<u64, BitpackError> {
        ensure!(
            fits_unsigned(value, self.width),
            OverflowSnafu {
                value: i128::from(value),
                width: self.width,
            }
        );

        Ok((word & !self.mask()) | (value << self.lsb))
    }

    pub fn replace_signed(self, word: u64, value: i64) -> Result<u64, BitpackError> {
        ensure!(
            fits_signed(value, self.width),
            OverflowSnafu {
                value: i128::from(value),
                width: self.width,
            }
        );

        Ok((word & !self.mask()) | ((value as u64 & self.low_mask()) << self.lsb))
    }
}
