//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Ceil a f64 and clamp it to the u64 range. NaN maps to 0, `+inf` to `u64::MAX`.
#[must_use]
pub fn ceil_f64_to_u64(value: f64) -> u64 {
    if value.is_nan() {
        return 0;
    }
    let max = cast::<u64, f64>(u64::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(0.0, max).ceil();
    cast::<f64, u64>(clamped).unwrap_or(u64::MAX)
}

/// Convert u64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn u64_to_f64(value: u64) -> f64 {
    cast::<u64, f64>(value).unwrap_or(0.0)
}

/// Convert a count to the exponent form used by cost curves.
#[must_use]
pub fn u32_to_i32_saturating(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceil_clamps_and_handles_nan() {
        assert_eq!(ceil_f64_to_u64(1.2), 2);
        assert_eq!(ceil_f64_to_u64(7.0), 7);
        assert_eq!(ceil_f64_to_u64(f64::NAN), 0);
        assert_eq!(ceil_f64_to_u64(-3.5), 0);
        assert_eq!(ceil_f64_to_u64(f64::NEG_INFINITY), 0);
    }

    #[test]
    fn ceil_saturates_overflow() {
        assert_eq!(ceil_f64_to_u64(f64::INFINITY), u64::MAX);
        assert_eq!(ceil_f64_to_u64(1e30), u64::MAX);
    }

    #[test]
    fn exponent_saturates() {
        assert_eq!(u32_to_i32_saturating(4), 4);
        assert_eq!(u32_to_i32_saturating(u32::MAX), i32::MAX);
    }
}
