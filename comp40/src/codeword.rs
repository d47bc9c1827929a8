//! Packing a [`QuantizedBlock`] into a 32-bit codeword and back.
//!
//! See [`consts::A_FIELD`](crate::consts::A_FIELD) for the layout.

use crate::{
    bitpack::{BitpackError, Field, OverflowSnafu},
    consts::{A_FIELD, B_FIELD, C_FIELD, D_FIELD, PB_FIELD, PR_FIELD},
    transform::QuantizedBlock,
};
use snafu::OptionExt;

/// Packs a quantized tile.
///
/// Fails with [`BitpackError::Overflow`] if any code doesn't fit its field. The fields don't
/// overlap and together fill the low 32 bits, so the result always fits a `u32`.
pub fn pack(q: QuantizedBlock) -> Result<u32, BitpackError> {
    let mut word = 0;

    word = A_FIELD.replace_unsigned(word, unsigned(q.a, A_FIELD)?)?;
    word = B_FIELD.replace_signed(word, i64::from(q.b))?;
    word = C_FIELD.replace_signed(word, i64::from(q.c))?;
    word = D_FIELD.replace_signed(word, i64::from(q.d))?;
    word = PB_FIELD.replace_unsigned(word, u64::from(q.pb))?;
    word = PR_FIELD.replace_unsigned(word, u64::from(q.pr))?;

    Ok(word as u32)
}

/// Unpacks a codeword. Every bit pattern is a valid codeword.
pub fn unpack(word: u32) -> QuantizedBlock {
    let word = u64::from(word);

    // the casts can't truncate: the fields are at most 6 bits wide
    QuantizedBlock {
        a: A_FIELD.get_unsigned(word) as i32,
        b: B_FIELD.get_signed(word) as i32,
        c: C_FIELD.get_signed(word) as i32,
        d: D_FIELD.get_signed(word) as i32,
        pb: PB_FIELD.get_unsigned(word) as u8,
        pr: PR_FIELD.get_unsigned(word) as u8,
    }
}

/// A negative code can't go into an unsigned field.
fn unsigned(value: i32, field: Field) -> Result<u64, BitpackError> {
    u64::try_from(value).ok().context(OverflowSnafu {
        value: i128::from(value),
        width: field.width(),
    })
}
