/// Rounds to the nearest integer, halves away from zero.
///
/// The quantizer's clamp ranges assume this rule.
#[inline]
pub fn round_to_int(x: f32) -> i32 {
    if x >= 0.0 {
        (x + 0.5) as i32
    } else {
        (x - 0.5) as i32
    }
}

/// Clamps `x` into `[min, max]`. Note the argument order.
#[inline]
pub fn clamp(x: f32, max: f32, min: f32) -> f32 {
    if x > max {
        max
    } else if x < min {
        min
    } else {
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_to_int(0.0), 0);
        assert_eq!(round_to_int(0.49), 0);
        assert_eq!(round_to_int(0.5), 1);
        assert_eq!(round_to_int(2.5), 3);
        assert_eq!(round_to_int(-0.49), 0);
        assert_eq!(round_to_int(-0.5), -1);
        assert_eq!(round_to_int(-2.5), -3);
        assert_eq!(round_to_int(30.9), 31);
        assert_eq!(round_to_int(-30.9), -31);
    }

    #[test]
    fn clamps() {
        assert_eq!(clamp(0.5, 0.3, -0.3), 0.3);
        assert_eq!(clamp(-0.5, 0.3, -0.3), -0.3);
        assert_eq!(clamp(0.1, 0.3, -0.3), 0.1);
        assert_eq!(clamp(300.0, 255.0, 0.0), 255.0);
        assert_eq!(clamp(-1.0, 255.0, 0.0), 0.0);
    }
}
