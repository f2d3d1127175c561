//! Flake size generation via the gamma quantile function.
//!
//! Observed snow particle sizes follow a two-parameter gamma distribution.
//! Feeding low-discrepancy uniforms through the distribution's quantile
//! function (inverse CDF) turns even coverage of [0,1) into even coverage of
//! the size spectrum.
//!
//! The quantile has no closed form: the regularized lower incomplete gamma
//! `P(a, x)` is evaluated with a series / continued-fraction split and
//! inverted by bracketing bisection, all in `f64`. Any non-convergence is
//! absorbed into a fixed fallback diameter - size generation is never allowed
//! to fault the simulation step.

use log::warn;

use crate::error::ConfigError;

/// Diameter substituted when the quantile solve fails. One model unit.
pub const FALLBACK_DIAMETER: f32 = 1.0;

/// Upper cutoff for the uniform input. The gamma quantile diverges at 1, so
/// inputs at or above this are pulled inside the open interval to keep every
/// diameter finite.
const MAX_QUANTILE_INPUT: f64 = 1.0 - 1e-6;

const MAX_SERIES_ITER: usize = 300;
const EPS: f64 = 1e-14;
const FPMIN: f64 = 1e-290;
const BISECT_STEPS: usize = 80;

/// Gamma size distribution with validated shape and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeDistribution {
    shape: f64,
    scale: f64,
}

impl SizeDistribution {
    /// Build a distribution, rejecting non-positive or non-finite parameters.
    pub fn new(shape: f32, scale: f32) -> Result<Self, ConfigError> {
        if !shape.is_finite() || shape <= 0.0 {
            return Err(ConfigError::NonPositiveShape(shape));
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ConfigError::NonPositiveScale(scale));
        }
        Ok(Self {
            shape: f64::from(shape),
            scale: f64::from(scale),
        })
    }

    /// Map a uniform sample in [0,1) to a flake diameter.
    ///
    /// `u` is clamped into the valid quantile domain first. Returns
    /// [`FALLBACK_DIAMETER`] if the inversion does not converge or `u` is not
    /// a number; both cases are logged and non-fatal.
    pub fn diameter(&self, u: f32) -> f32 {
        if !u.is_finite() {
            warn!("non-finite uniform sample {u}, substituting fallback diameter {FALLBACK_DIAMETER}");
            return FALLBACK_DIAMETER;
        }
        let p = f64::from(u).clamp(0.0, MAX_QUANTILE_INPUT);

        match gamma_quantile(self.shape, self.scale, p) {
            Some(d) if d.is_finite() && d >= 0.0 => d as f32,
            _ => {
                warn!(
                    "gamma quantile failed for u = {u} (shape {}, scale {}), substituting fallback diameter {FALLBACK_DIAMETER}",
                    self.shape, self.scale
                );
                FALLBACK_DIAMETER
            }
        }
    }

    /// Shape parameter.
    #[inline]
    pub fn shape(&self) -> f32 {
        self.shape as f32
    }

    /// Scale parameter.
    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale as f32
    }
}

/// Solve `P(shape, x / scale) = p` for x by bracketing bisection.
///
/// `P` is monotone in x, so doubling the upper bracket until it encloses `p`
/// and halving the interval a fixed number of times converges unconditionally.
fn gamma_quantile(shape: f64, scale: f64, p: f64) -> Option<f64> {
    if !(0.0..=MAX_QUANTILE_INPUT).contains(&p) {
        return None;
    }
    if p == 0.0 {
        return Some(0.0);
    }

    let ln_gamma_shape = ln_gamma(shape);

    let mut hi = shape.max(1.0);
    let mut doublings = 0;
    while reg_lower_gamma(shape, hi, ln_gamma_shape)? < p {
        hi *= 2.0;
        doublings += 1;
        if doublings > 200 {
            return None;
        }
    }

    let mut lo = 0.0;
    for _ in 0..BISECT_STEPS {
        let mid = 0.5 * (lo + hi);
        if reg_lower_gamma(shape, mid, ln_gamma_shape)? < p {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    Some(0.5 * (lo + hi) * scale)
}

/// Regularized lower incomplete gamma `P(a, x)`.
///
/// Series representation below `x = a + 1`, continued fraction (modified
/// Lentz) above - each converges fastest on its side of the split.
fn reg_lower_gamma(a: f64, x: f64, ln_gamma_a: f64) -> Option<f64> {
    if x < 0.0 || a <= 0.0 {
        return None;
    }
    if x == 0.0 {
        return Some(0.0);
    }

    let prefactor = (-x + a * x.ln() - ln_gamma_a).exp();

    if x < a + 1.0 {
        let mut ap = a;
        let mut term = 1.0 / a;
        let mut sum = term;
        for _ in 0..MAX_SERIES_ITER {
            ap += 1.0;
            term *= x / ap;
            sum += term;
            if term.abs() < sum.abs() * EPS {
                return Some((sum * prefactor).clamp(0.0, 1.0));
            }
        }
        None
    } else {
        let mut b = x + 1.0 - a;
        let mut c = 1.0 / FPMIN;
        let mut d = 1.0 / b;
        let mut h = d;
        for i in 1..=MAX_SERIES_ITER {
            let an = -(i as f64) * (i as f64 - a);
            b += 2.0;
            d = an * d + b;
            if d.abs() < FPMIN {
                d = FPMIN;
            }
            c = b + an / c;
            if c.abs() < FPMIN {
                c = FPMIN;
            }
            d = 1.0 / d;
            let del = d * c;
            h *= del;
            if (del - 1.0).abs() < EPS {
                return Some((1.0 - prefactor * h).clamp(0.0, 1.0));
            }
        }
        None
    }
}

/// Natural log of the gamma function, Lanczos approximation (g = 7).
fn ln_gamma(x: f64) -> f64 {
    use std::f64::consts::PI;

    const COEFFS: [f64; 8] = [
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_13,
        -176.615_029_162_140_59,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_571_6e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        // Reflection formula keeps the approximation in its accurate range.
        return (PI / (PI * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut acc = 0.999_999_999_999_809_93;
    for (i, &c) in COEFFS.iter().enumerate() {
        acc += c / (x + i as f64 + 1.0);
    }
    let t = x + 7.5;
    0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + acc.ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::velocity::terminal_speed;

    #[test]
    fn test_ln_gamma_known_values() {
        // Gamma(1) = Gamma(2) = 1, Gamma(5) = 24, Gamma(0.5) = sqrt(pi).
        assert!(ln_gamma(1.0).abs() < 1e-10);
        assert!(ln_gamma(2.0).abs() < 1e-10);
        assert!((ln_gamma(5.0) - 24.0f64.ln()).abs() < 1e-10);
        assert!((ln_gamma(0.5) - 0.5 * std::f64::consts::PI.ln()).abs() < 1e-10);
    }

    #[test]
    fn test_shape_one_reduces_to_exponential() {
        // For shape = 1 the gamma quantile is -scale * ln(1 - u).
        let dist = SizeDistribution::new(1.0, 1.0).unwrap();
        for &u in &[0.1, 0.25, 0.5, 0.75, 0.9, 0.99] {
            let expected = -(1.0 - f64::from(u)).ln();
            let got = f64::from(dist.diameter(u));
            assert!(
                (got - expected).abs() < 1e-5,
                "u = {u}: got {got}, expected {expected}"
            );
        }

        let scaled = SizeDistribution::new(1.0, 2.5).unwrap();
        let expected = -2.5 * 0.5f64.ln();
        assert!((f64::from(scaled.diameter(0.5)) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_known_gamma_median() {
        // Median of Gamma(shape 2, scale 1) solves 1 - e^-x (1 + x) = 1/2.
        let dist = SizeDistribution::new(2.0, 1.0).unwrap();
        let median = dist.diameter(0.5);
        assert!((median - 1.67835).abs() < 1e-4, "median = {median}");
    }

    #[test]
    fn test_finite_and_nonnegative_over_domain() {
        for &shape in &[0.3, 0.7, 1.0, 2.0, 5.0, 20.0] {
            for &scale in &[0.1, 1.0, 10.0] {
                let dist = SizeDistribution::new(shape, scale).unwrap();
                for i in 0..=100 {
                    let u = i as f32 / 100.0;
                    let d = dist.diameter(u);
                    assert!(d.is_finite() && d >= 0.0, "shape {shape} scale {scale} u {u} -> {d}");
                }
            }
        }
    }

    #[test]
    fn test_monotonic_in_u() {
        let dist = SizeDistribution::new(2.0, 1.0).unwrap();
        let mut prev = dist.diameter(0.0);
        for i in 1..=200 {
            let u = i as f32 / 200.0;
            let d = dist.diameter(u);
            assert!(d >= prev, "quantile decreased at u = {u}");
            prev = d;
        }
    }

    #[test]
    fn test_input_clamped_into_unit_interval() {
        let dist = SizeDistribution::new(2.0, 1.0).unwrap();
        assert_eq!(dist.diameter(-0.5), dist.diameter(0.0));
        assert_eq!(dist.diameter(1.5), dist.diameter(1.0));
        assert!(dist.diameter(1.0).is_finite());
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let dist = SizeDistribution::new(2.0, 1.0).unwrap();
        let first = dist.diameter(f32::NAN);
        let second = dist.diameter(f32::NAN);
        assert_eq!(first, FALLBACK_DIAMETER);
        assert_eq!(second, FALLBACK_DIAMETER);
        // The derived speed is equally deterministic.
        assert_eq!(terminal_speed(first), terminal_speed(second));
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        assert!(SizeDistribution::new(0.0, 1.0).is_err());
        assert!(SizeDistribution::new(-2.0, 1.0).is_err());
        assert!(SizeDistribution::new(2.0, 0.0).is_err());
        assert!(SizeDistribution::new(2.0, -1.0).is_err());
        assert!(SizeDistribution::new(f32::NAN, 1.0).is_err());
        assert!(SizeDistribution::new(2.0, f32::INFINITY).is_err());
    }
}
