//! Small numeric helpers shared by the line and triangle rasterizers.

/// Divides `num` by `den` and rounds the quotient away from zero instead of
/// truncating toward zero, matching the fixed-point slope/gradient math used
/// throughout the rasterizer. `den` must be nonzero; its sign may be
/// negative (the triangle gradient matrix denominator is signed).
pub fn div_round_away_from_zero(num: i64, den: i64) -> i64 {
    debug_assert!(den != 0);
    let q = num / den;
    let r = num % den;
    if r == 0 {
        return q;
    }
    if (num < 0) == (den < 0) { q + 1 } else { q - 1 }
}
