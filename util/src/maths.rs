//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Limit a value to the closed range `[min, max]`.
pub fn clamp<T>(value: T, min: T, max: T) -> T
where
    T: Float,
{
    let mut ret = value;

    if ret > max {
        ret = max
    }
    if ret < min {
        ret = min
    }

    ret
}

/// Convert a distance in meters into yards.
pub fn m_to_yd<T>(meters: T) -> T
where
    T: Float,
{
    meters * T::from(YARDS_PER_METER).unwrap_or_else(T::one)
}

/// Number of whole steps of length `step` that fit into `duration`.
///
/// Ratios within `1e-9` of a whole number count as that number. Returns zero
/// if the ratio is not a finite positive number.
pub fn whole_steps(duration: f64, step: f64) -> usize {
    let n = (duration / step + 1e-9).floor();

    if n.is_finite() && n > 0.0 {
        n as usize
    } else {
        0
    }
}

/// The smallest representable value greater than `x`.
pub fn next_up(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f64::from_bits(1);
    }

    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

/// The largest representable value less than `x`.
pub fn next_down(x: f64) -> f64 {
    -next_up(-x)
}

/// Number of yards in one meter.
pub const YARDS_PER_METER: f64 = 1.09361;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5f64, 0f64, 1f64), 1.0);
        assert_eq!(clamp(-5f64, 0f64, 1f64), 0.0);
        assert_eq!(clamp(0.25f64, 0f64, 1f64), 0.25);
    }

    #[test]
    fn test_whole_steps() {
        assert_eq!(whole_steps(1.0, 0.0005), 2000);
        assert_eq!(whole_steps(1.0, 0.0006), 1666);
        assert_eq!(whole_steps(0.1, 0.02), 5);
        assert_eq!(whole_steps(1.0, 0.0), 0);
        assert_eq!(whole_steps(-1.0, 0.01), 0);
        assert_eq!(whole_steps(f64::NAN, 0.01), 0);
    }

    #[test]
    fn test_next_up_down() {
        for x in [-1.5f64, -1e-300, 0.0, 1e-300, 0.7, 3.0e10].iter() {
            assert!(next_up(*x) > *x);
            assert!(next_down(*x) < *x);
            assert_eq!(next_down(next_up(*x)), *x);
        }
        assert_eq!(next_up(0.0), f64::from_bits(1));
        assert_eq!(next_up(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_m_to_yd() {
        assert!((m_to_yd(100f64) - 109.361).abs() < 1e-9);
    }
}
