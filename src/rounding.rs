//! Round-half-up decimal rounding
//!
//! Report figures must match previously issued reports digit for digit, so
//! ties always round away from zero rather than to even.

/// Slack, in scaled units, for values whose binary form sits just under a tie
const TIE_TOLERANCE: f64 = 1e-9;

/// Round `value` to `places` decimal places, ties away from zero
///
/// Scaled-integer arithmetic: multiply by 10^places, round the magnitude
/// half-up, divide back.
pub fn round_half_up(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let factor = 10f64.powi(places as i32);
    let scaled = value.abs() * factor;
    let whole = scaled.trunc();

    let rounded = if scaled - whole + TIE_TOLERANCE >= 0.5 {
        whole + 1.0
    } else {
        whole
    };

    (rounded / factor).copysign(value)
}
