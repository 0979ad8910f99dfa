//! Weibull reliability kernel.
//!
//! Every (unit, mechanism, configuration) triple is summarized as a Weibull
//! distribution `R(t) = exp(-(t/α)^β)` with shape `β` fixed at 2 by the
//! wearout models (JEDEC convention) and characteristic life `α` estimated
//! from a piecewise-stationary trace:
//!
//! ```text
//! α_i = mttf_i / Γ(1/β + 1)          per segment
//! α   = ΣΔt_i / Σ(Δt_i / α_i)        time-weighted harmonic average
//! ```
//!
//! `α = +∞` encodes "does not wear under this configuration" and propagates
//! through every query: reliability stays 1, the inverse is `+∞`, and an
//! infinite factor drops out of products.
//!
//! The product of two distributions with equal shape is again Weibull
//! (`1/α = ((1/α₁)^β + (1/α₂)^β)^(1/β)`); this is the survival function of
//! independent competing failure mechanisms.

use crate::error::{LatError, LatResult};
use serde::{Deserialize, Serialize};
use statrs::function::gamma::gamma;
use std::ops::Mul;

/// Weibull shape parameter shared by all wearout mechanisms.
pub const WEIBULL_SHAPE: f64 = 2.0;

/// Intermediate used when estimating a distribution from a trace: one
/// piecewise-stationary stretch of operation and the mean time to failure
/// the physics predicts for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MttfSegment {
    /// Segment length, seconds.
    pub duration: f64,
    /// Mean time to failure under the segment's conditions, seconds.
    /// `+∞` means the mechanism does not act during this segment.
    pub mttf: f64,
}

impl MttfSegment {
    pub fn new(duration: f64, mttf: f64) -> Self {
        Self { duration, mttf }
    }
}

/// A two-parameter Weibull distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weibull {
    alpha: f64,
    beta: f64,
}

impl Weibull {
    /// Construct from explicit parameters. `alpha` may be `+∞`.
    pub fn new(alpha: f64, beta: f64) -> LatResult<Self> {
        if !(alpha > 0.0) {
            return Err(LatError::Validation(format!(
                "Weibull rate parameter must be positive, got {alpha}"
            )));
        }
        if !beta.is_finite() || beta <= 0.0 {
            return Err(LatError::Validation(format!(
                "Weibull shape parameter must be positive and finite, got {beta}"
            )));
        }
        Ok(Self { alpha, beta })
    }

    /// Estimate a distribution from per-segment MTTFs via the
    /// time-weighted harmonic average of the per-segment rate parameters.
    ///
    /// Segments with infinite MTTF contribute nothing to the denominator;
    /// if every segment is infinite (or there are no segments at all) the
    /// result has `α = +∞`.
    pub fn from_segments(beta: f64, segments: &[MttfSegment]) -> Self {
        let g = gamma(1.0 / beta + 1.0);
        let mut total_time = 0.0;
        let mut weighted_inverse = 0.0;
        for segment in segments {
            total_time += segment.duration;
            if segment.mttf.is_finite() {
                let alpha_i = segment.mttf / g;
                weighted_inverse += segment.duration / alpha_i;
            }
        }
        let alpha = if weighted_inverse > 0.0 {
            total_time / weighted_inverse
        } else {
            f64::INFINITY
        };
        Self { alpha, beta }
    }

    /// The rate (characteristic life) parameter α.
    pub fn rate(&self) -> f64 {
        self.alpha
    }

    /// The shape parameter β.
    pub fn shape(&self) -> f64 {
        self.beta
    }

    /// `R(t) = exp(-(t/α)^β)`.
    pub fn reliability(&self, t: f64) -> f64 {
        if self.alpha.is_infinite() {
            return 1.0;
        }
        (-(t / self.alpha).powf(self.beta)).exp()
    }

    /// Inverse of [`Self::reliability`]: the age at which reliability has
    /// decayed to `r`. Callers must keep `r` in `(0, 1]`; `r = 0` would be
    /// `log(0)` and the event sampler excludes it.
    ///
    /// A non-wearing distribution (`α = +∞`) never decays below 1, so the
    /// inverse is `+∞` for `r < 1`; at `r = 1` no age has been consumed
    /// under any distribution and the inverse is 0.
    pub fn inverse(&self, r: f64) -> f64 {
        if self.alpha.is_infinite() {
            return if r < 1.0 { f64::INFINITY } else { 0.0 };
        }
        self.alpha * (-r.ln()).powf(1.0 / self.beta)
    }

    /// Mean time to failure, `α·Γ(1/β + 1)`.
    pub fn mttf(&self) -> f64 {
        self.alpha * gamma(1.0 / self.beta + 1.0)
    }
}

impl Mul for Weibull {
    type Output = Weibull;

    /// Product of survival functions of two independent mechanisms.
    ///
    /// Combining distributions with different shapes is a programmer error
    /// and panics: the closed form below only holds for equal β.
    fn mul(self, rhs: Weibull) -> Weibull {
        assert!(
            (self.beta - rhs.beta).abs() < 1e-12,
            "cannot combine Weibull distributions with different shapes ({} vs {})",
            self.beta,
            rhs.beta
        );
        let inverse_sum = (1.0 / self.alpha).powf(self.beta) + (1.0 / rhs.alpha).powf(self.beta);
        Weibull {
            alpha: inverse_sum.powf(-1.0 / self.beta),
            beta: self.beta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(duration: f64, mttf: f64) -> MttfSegment {
        MttfSegment::new(duration, mttf)
    }

    #[test]
    fn test_reliability_monotone_and_bounded() {
        let d = Weibull::new(1000.0, WEIBULL_SHAPE).unwrap();
        assert_eq!(d.reliability(0.0), 1.0);
        let mut prev = 1.0;
        for step in 1..=100 {
            let r = d.reliability(step as f64 * 100.0);
            assert!(r <= prev);
            prev = r;
        }
        assert!(d.reliability(1e9) < 1e-12);
    }

    #[test]
    fn test_inverse_round_trip() {
        let d = Weibull::new(2500.0, WEIBULL_SHAPE).unwrap();
        for r in [1.0, 0.999, 0.75, 0.5, 0.1, 1e-6] {
            let t = d.inverse(r);
            assert!((d.reliability(t) - r).abs() < 1e-9, "round trip at r={r}");
        }
    }

    #[test]
    fn test_mttf_identity() {
        let d = Weibull::new(1234.5, WEIBULL_SHAPE).unwrap();
        // Γ(1.5) = sqrt(pi)/2
        let expected = 1234.5 * std::f64::consts::PI.sqrt() / 2.0;
        assert!((d.mttf() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_product_matches_pointwise_reliability() {
        let a = Weibull::new(1000.0, WEIBULL_SHAPE).unwrap();
        let b = Weibull::new(4000.0, WEIBULL_SHAPE).unwrap();
        let product = a * b;
        for t in [0.0, 10.0, 500.0, 3000.0] {
            let expected = a.reliability(t) * b.reliability(t);
            assert!((product.reliability(t) - expected).abs() < 1e-12);
        }
    }

    #[test]
    #[should_panic(expected = "different shapes")]
    fn test_product_rejects_mixed_shapes() {
        let a = Weibull::new(1000.0, 2.0).unwrap();
        let b = Weibull::new(1000.0, 1.0).unwrap();
        let _ = a * b;
    }

    #[test]
    fn test_infinite_absorption() {
        let d = Weibull::from_segments(
            WEIBULL_SHAPE,
            &[segment(5.0, f64::INFINITY), segment(3.0, f64::INFINITY)],
        );
        assert!(d.rate().is_infinite());
        assert_eq!(d.reliability(1e12), 1.0);
        assert!(d.inverse(0.5).is_infinite());
        assert_eq!(d.inverse(1.0), 0.0);
        assert!(d.mttf().is_infinite());

        // An infinite factor drops out of a product.
        let finite = Weibull::new(800.0, WEIBULL_SHAPE).unwrap();
        let product = d * finite;
        assert!((product.rate() - 800.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_segments_single() {
        // A single segment reproduces mttf exactly: α = mttf / Γ(1.5) and
        // mttf() multiplies Γ(1.5) back in.
        let d = Weibull::from_segments(WEIBULL_SHAPE, &[segment(1.0, 3600.0)]);
        assert!((d.mttf() - 3600.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_segments_harmonic_weighting() {
        let g = std::f64::consts::PI.sqrt() / 2.0;
        let d = Weibull::from_segments(WEIBULL_SHAPE, &[segment(1.0, 100.0), segment(3.0, 400.0)]);
        let expected_alpha = 4.0 / (1.0 / (100.0 / g) + 3.0 / (400.0 / g));
        assert!((d.rate() - expected_alpha).abs() < 1e-9);
    }

    #[test]
    fn test_from_segments_infinite_mixed() {
        // Infinite segments dilute the aggregate by extending total time.
        let finite_only = Weibull::from_segments(WEIBULL_SHAPE, &[segment(1.0, 100.0)]);
        let diluted = Weibull::from_segments(
            WEIBULL_SHAPE,
            &[segment(1.0, 100.0), segment(1.0, f64::INFINITY)],
        );
        assert!((diluted.rate() - 2.0 * finite_only.rate()).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(Weibull::new(0.0, 2.0).is_err());
        assert!(Weibull::new(-1.0, 2.0).is_err());
        assert!(Weibull::new(1.0, 0.0).is_err());
        assert!(Weibull::new(1.0, f64::INFINITY).is_err());
    }
}
