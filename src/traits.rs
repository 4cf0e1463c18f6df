use num_traits::{Float, FloatConst, FromPrimitive, ToPrimitive};
use std::fmt::Debug;

/// Default tolerance for floating-point comparisons
pub(crate) const FLOAT_TOLERANCE: f64 = 1e-10;

/// Scalar type accepted by the numeric kernels in `math`.
///
/// This aggregates `num_traits::Float` (sin, exp, powf, ...), `FloatConst`
/// (PI, E) and the primitive conversions the series expansions need.
pub trait MathScalar: Float + FloatConst + FromPrimitive + ToPrimitive + Debug + 'static {
    /// Lift an `f64` constant, `None` if the type cannot represent it
    fn lit(value: f64) -> Option<Self> {
        Self::from_f64(value)
    }
}

// Blanket implementation for any type that satisfies the bounds
impl<T> MathScalar for T where T: Float + FloatConst + FromPrimitive + ToPrimitive + Debug + 'static {}

/// Check if two floats agree within `FLOAT_TOLERANCE`, scaled for large values
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    if a.is_infinite() || b.is_infinite() {
        return a == b;
    }
    (a - b).abs() <= FLOAT_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

/// Check if a float is a whole number (within tolerance)
#[inline]
pub(crate) fn is_whole(n: f64) -> bool {
    n.is_finite() && (n - n.round()).abs() < FLOAT_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(0.1 + 0.2, 0.3));
        assert!(approx_eq(1e12 + 1e-3, 1e12));
        assert!(!approx_eq(1.0, 1.001));
        assert!(approx_eq(f64::INFINITY, f64::INFINITY));
        assert!(!approx_eq(f64::INFINITY, 1e308));
    }

    #[test]
    fn test_is_whole() {
        assert!(is_whole(3.0));
        assert!(is_whole(-2.0 + 1e-12));
        assert!(!is_whole(2.5));
        assert!(!is_whole(f64::NAN));
    }
}
