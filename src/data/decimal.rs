// ---------------------------------------------------------------------------
// Fixed 3-decimal text, rounding the exact binary value
// ---------------------------------------------------------------------------

/// Format `v` with exactly 3 decimals.
///
/// Rounds the exact value of the `f64`; a value lying exactly halfway between
/// two 3-decimal neighbours rounds away from zero (`0.0625` → `0.063`).
/// `format!("{:.3}")` already rounds the exact value but breaks ties to even,
/// so only exact ties are redone here.
pub fn to_fixed3(v: f64) -> String {
    if !is_exact_half_tie(v) {
        return format!("{v:.3}");
    }
    // |v| * 1000 is exactly k + 0.5 and representable, so the multiply is exact.
    let n = (v.abs() * 1000.0).ceil() as u64;
    let sign = if v < 0.0 { "-" } else { "" };
    format!("{sign}{}.{:03}", n / 1000, n % 1000)
}

/// Round to 3 decimals through [`to_fixed3`], the way the text is shown.
pub fn round3(v: f64) -> f64 {
    to_fixed3(v).parse().unwrap_or(v)
}

/// Whether `v * 1000` has a fractional part of exactly one half, i.e.
/// `v * 2000` is an odd integer.
fn is_exact_half_tie(v: f64) -> bool {
    if !v.is_finite() || v.abs() >= 1e15 {
        return false;
    }
    let bits = v.to_bits();
    let exp_bits = ((bits >> 52) & 0x7ff) as i32;
    let frac = bits & ((1u64 << 52) - 1);
    let (mantissa, exp) = if exp_bits == 0 {
        (frac, -1074)
    } else {
        (frac | (1u64 << 52), exp_bits - 1075)
    };
    if mantissa == 0 || exp >= 0 {
        return false;
    }
    // 2000 = 2^4 * 125: mantissa * 2000 * 2^exp is an odd integer exactly
    // when its power-of-two factor cancels 2^exp.
    mantissa.trailing_zeros() as i32 + 4 == -exp
}
