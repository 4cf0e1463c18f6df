//! Numeric kernels behind the special functions of the registry
//!
//! Functions that can hit a pole or leave their domain return `None`:
//!
//! - **Gamma family**: non-positive integers are poles
//! - **Zeta**: s = 1 is a pole
//! - **Incomplete gamma**: x < 0 is outside the real domain

use crate::traits::{FLOAT_TOLERANCE, MathScalar};

fn is_pole<T: MathScalar>(x: T) -> bool {
    x <= T::zero() && x.fract() == T::zero()
}

/// Γ(x) by the Lanczos approximation (g = 7), reflected below 1/2
pub fn eval_gamma<T: MathScalar>(x: T) -> Option<T> {
    const LANCZOS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];
    if is_pole(x) {
        return None;
    }
    let half = T::lit(0.5)?;
    let one = T::one();
    let pi = T::PI();

    if x < half {
        return Some(pi / ((pi * x).sin() * eval_gamma(one - x)?));
    }
    let x = x - one;
    let mut series = T::lit(LANCZOS[0])?;
    for (i, &coeff) in LANCZOS.iter().enumerate().skip(1) {
        series = series + T::lit(coeff)? / (x + T::from_usize(i)?);
    }
    let t = x + T::lit(7.0)? + half;
    let two_pi_sqrt = (T::lit(2.0)? * pi).sqrt();
    Some(two_pi_sqrt * t.powf(x + half) * (-t).exp() * series)
}

/// ψ(x) = Γ'(x)/Γ(x), recurrence up to 6 then the asymptotic series
pub fn eval_digamma<T: MathScalar>(x: T) -> Option<T> {
    if is_pole(x) {
        return None;
    }
    let half = T::lit(0.5)?;
    let one = T::one();
    let pi = T::PI();

    if x < half {
        return Some(eval_digamma(one - x)? - pi * (pi * x).cos() / (pi * x).sin());
    }
    let mut xv = x;
    let mut result = T::zero();
    let six = T::lit(6.0)?;
    while xv < six {
        result = result - one / xv;
        xv = xv + one;
    }
    result = result + xv.ln() - half / xv;
    let x2 = xv * xv;
    let t1 = one / (T::lit(12.0)? * x2);
    let t2 = one / (T::lit(120.0)? * x2 * x2);
    let t3 = one / (T::lit(252.0)? * x2 * x2 * x2);
    Some(result - t1 + t2 - t3)
}

/// Riemann ζ(s): Euler–Maclaurin tail for s > 1, functional equation below
pub fn eval_zeta<T: MathScalar>(s: T) -> Option<T> {
    let one = T::one();
    if (s - one).abs() < T::lit(FLOAT_TOLERANCE)? {
        return None;
    }
    if s > one {
        return eval_hurwitz_zeta(s, one);
    }
    let two = T::lit(2.0)?;
    let pi = T::PI();
    let reflected = eval_gamma(one - s)? * eval_zeta(one - s)?;
    Some(two.powf(s) * pi.powf(s - one) * (pi * s / two).sin() * reflected)
}

/// Hurwitz ζ(s, a) = Σ (n + a)^-s for s > 1 and a > 0
pub fn eval_hurwitz_zeta<T: MathScalar>(s: T, a: T) -> Option<T> {
    const TERMS: usize = 100;
    let one = T::one();
    if s <= one || a <= T::zero() {
        return None;
    }
    let mut sum = T::zero();
    for n in 0..TERMS {
        sum = sum + (T::from_usize(n)? + a).powf(-s);
    }
    let n = T::from_usize(TERMS)? + a;
    let tail = n.powf(one - s) / (s - one);
    let correction = T::lit(0.5)? * n.powf(-s) + s * n.powf(-s - one) / T::lit(12.0)?;
    Some(sum + tail + correction)
}

/// Lower incomplete gamma γ(s, x) by its power series
pub fn eval_lower_gamma<T: MathScalar>(s: T, x: T) -> Option<T> {
    const MAX_TERMS: usize = 500;
    if x < T::zero() || is_pole(s) {
        return None;
    }
    if x == T::zero() {
        return (s > T::zero()).then(T::zero);
    }
    let mut term = one_over(s)?;
    let mut sum = term;
    for k in 1..MAX_TERMS {
        term = term * x / (s + T::from_usize(k)?);
        sum = sum + term;
        if term.abs() < sum.abs() * T::epsilon() {
            break;
        }
    }
    Some(x.powf(s) * (-x).exp() * sum)
}

/// Upper incomplete gamma Γ(s, x) = Γ(s) − γ(s, x)
pub fn eval_upper_gamma<T: MathScalar>(s: T, x: T) -> Option<T> {
    Some(eval_gamma(s)? - eval_lower_gamma(s, x)?)
}

/// n! through Γ(n + 1); exact product for small whole n
pub fn eval_factorial<T: MathScalar>(n: T) -> Option<T> {
    if n.fract() == T::zero() && n >= T::zero() && n <= T::lit(170.0)? {
        let mut acc = T::one();
        let mut k = T::one();
        while k <= n {
            acc = acc * k;
            k = k + T::one();
        }
        return Some(acc);
    }
    eval_gamma(n + T::one())
}

/// Binomial coefficient, multiplicative form for whole k, Γ form otherwise
pub fn eval_binomial<T: MathScalar>(n: T, k: T) -> Option<T> {
    if k.fract() == T::zero() {
        if k < T::zero() {
            return Some(T::zero());
        }
        let mut acc = T::one();
        let mut i = T::zero();
        while i < k {
            acc = acc * (n - i) / (i + T::one());
            i = i + T::one();
        }
        return Some(acc);
    }
    let one = T::one();
    Some(eval_gamma(n + one)? / (eval_gamma(k + one)? * eval_gamma(n - k + one)?))
}

fn one_over<T: MathScalar>(x: T) -> Option<T> {
    (x != T::zero()).then(|| T::one() / x)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_gamma() {
        assert!(close(eval_gamma(5.0_f64).unwrap(), 24.0, 1e-9));
        assert!(close(
            eval_gamma(0.5_f64).unwrap(),
            std::f64::consts::PI.sqrt(),
            1e-9
        ));
        assert!(eval_gamma(0.0_f64).is_none());
        assert!(eval_gamma(-2.0_f64).is_none());
    }

    #[test]
    fn test_digamma_at_one_is_minus_euler_gamma() {
        assert!(close(eval_digamma(1.0_f64).unwrap(), -0.577_215_664_901_532_9, 1e-8));
    }

    #[test]
    fn test_zeta() {
        let pi2_6 = std::f64::consts::PI.powi(2) / 6.0;
        assert!(close(eval_zeta(2.0_f64).unwrap(), pi2_6, 1e-8));
        assert!(close(eval_zeta(-1.0_f64).unwrap(), -1.0 / 12.0, 1e-8));
        assert!(eval_zeta(1.0_f64).is_none());
    }

    #[test]
    fn test_incomplete_gamma_splits_gamma() {
        // γ(1, x) = 1 − e^−x
        let lower = eval_lower_gamma(1.0_f64, 2.0).unwrap();
        assert!(close(lower, 1.0 - (-2.0_f64).exp(), 1e-12));
        let upper = eval_upper_gamma(1.0_f64, 2.0).unwrap();
        assert!(close(upper, (-2.0_f64).exp(), 1e-9));
        assert!(eval_lower_gamma(1.0_f64, -1.0).is_none());
    }

    #[test]
    fn test_factorial_and_binomial() {
        assert_eq!(eval_factorial(5.0_f64), Some(120.0));
        assert_eq!(eval_factorial(0.0_f64), Some(1.0));
        assert!(close(eval_factorial(0.5_f64).unwrap(), 0.886_226_925_452_758, 1e-9));
        assert_eq!(eval_binomial(5.0_f64, 2.0), Some(10.0));
        assert_eq!(eval_binomial(5.0_f64, -1.0), Some(0.0));
    }
}
