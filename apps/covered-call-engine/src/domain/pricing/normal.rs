//! Standard normal CDF approximation.
//!
//! Abramowitz & Stegun formula 7.1.26 for `erf`, maximum absolute error
//! about 1.5e-7. The constants and evaluation order are fixed so results
//! match previously recorded premiums bit for bit.

// Polynomial evaluation is kept in its published nested form
#![allow(clippy::suboptimal_flops)]

const A1: f64 = 0.254_829_592;
const A2: f64 = -0.284_496_736;
const A3: f64 = 1.421_413_741;
const A4: f64 = -1.453_152_027;
const A5: f64 = 1.061_405_429;
const P: f64 = 0.327_591_1;

/// Cumulative distribution function of the standard normal distribution.
///
/// `N(0)` evaluates to `0.5 + 5e-10` rather than exactly one half: zero takes
/// the positive branch of the sign.
#[must_use]
pub fn norm_cdf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let z = x.abs() / std::f64::consts::SQRT_2;

    let t = 1.0 / (1.0 + P * z);
    let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-z * z).exp();

    0.5 * (1.0 + sign * y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(1.0, 0.841_344_736_167_636_3 ; "one sigma")]
    #[test_case(-1.0, 0.158_655_263_832_363_72 ; "minus one sigma")]
    #[test_case(1.96, 0.975_002_173_891_776_1 ; "ninety five percent")]
    fn matches_recorded_values(x: f64, expected: f64) {
        assert!((norm_cdf(x) - expected).abs() < 1e-15);
    }

    #[test]
    fn zero_takes_positive_branch() {
        assert!((norm_cdf(0.0) - 0.500_000_000_5).abs() < 1e-15);
    }

    #[test]
    fn symmetric_away_from_zero() {
        for x in [0.1, 0.5, 1.5, 2.5, 4.0] {
            assert!((norm_cdf(x) + norm_cdf(-x) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn within_published_error_bound_of_erf() {
        let mut x = -6.0;
        while x <= 6.0 {
            let exact = 0.5 * (1.0 + libm::erf(x / std::f64::consts::SQRT_2));
            assert!(
                (norm_cdf(x) - exact).abs() < 1.5e-7,
                "error too large at x = {x}"
            );
            x += 0.05;
        }
    }

    #[test]
    fn saturates_in_tails() {
        assert!(norm_cdf(10.0) > 0.999_999_9);
        assert!(norm_cdf(-10.0) < 1e-7);
        assert!(norm_cdf(-10.0) >= 0.0);
    }
}
