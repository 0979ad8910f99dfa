//! # lat-mech: Transistor Wearout Physics
//!
//! Mean-time-to-failure models for the four wearout mechanisms tracked by
//! the lifetime simulator:
//!
//! - [`nbti`] - Negative bias temperature instability: forward simulation
//!   of threshold-voltage drift, inverted by linear interpolation.
//! - [`em`] - Electromigration: Black's equation on interconnect current
//!   density.
//! - [`hci`] - Hot-carrier injection: closed form in the ExtraTime
//!   parametrisation.
//! - [`tddb`] - Time-dependent dielectric breakdown: field/temperature
//!   acceleration.
//!
//! Each model maps one operating-trace segment ([`DataPoint`]) plus a duty
//! cycle to an MTTF in seconds; [`distribution`] folds per-segment MTTFs
//! into a Weibull with the shared JEDEC shape `β = 2`. All tuning constants
//! live in [`params::MechanismParams`] and can be overridden through a
//! parameter file (`key<TAB>value`, `#` comments).

use lat_core::{DataPoint, LatResult, Mechanism, MttfSegment, Weibull, WEIBULL_SHAPE};

pub mod em;
pub mod hci;
pub mod nbti;
pub mod params;
pub mod tddb;

pub use params::{load_params_file, MechanismParams};

/// Physical constants shared by the wearout models.
pub mod consts {
    /// Elementary charge, C.
    pub const Q: f64 = 1.60217662e-19;
    /// Boltzmann constant, eV/K.
    pub const K_B: f64 = 8.6173303e-5;
    /// Joule-to-electronvolt conversion, eV/J.
    pub const EV_PER_JOULE: f64 = 6.242e18;
    /// Default relative threshold-voltage shift considered a failure.
    pub const FAIL_DEFAULT: f64 = 0.05;
}

/// MTTF of one trace segment under `mechanism`.
///
/// `duty_cycle` is the fraction of time the transistors are under stress,
/// already derived from the unit kind's activity policy and clamped to
/// `[0, 1]`. `fail` overrides the relative ΔV_th failure threshold
/// (default: [`MechanismParams::fail_threshold`]).
pub fn time_to_failure(
    mechanism: Mechanism,
    point: &DataPoint,
    duty_cycle: f64,
    fail: Option<f64>,
    params: &MechanismParams,
) -> LatResult<f64> {
    let fail = fail.unwrap_or(params.fail_threshold);
    match mechanism {
        Mechanism::Nbti => nbti::time_to_failure(point, duty_cycle, fail, params),
        Mechanism::Em => em::time_to_failure(point, params),
        Mechanism::Hci => hci::time_to_failure(point, duty_cycle, fail, params),
        Mechanism::Tddb => tddb::time_to_failure(point, params),
    }
}

/// Fold per-segment MTTFs into a Weibull with the shared shape `β = 2`.
pub fn distribution(segments: &[MttfSegment]) -> Weibull {
    Weibull::from_segments(WEIBULL_SHAPE, segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lat_core::quantity;

    fn nominal_point() -> DataPoint {
        let mut dp = DataPoint::new(1.0, 1.0);
        dp.data.insert(quantity::VDD.to_string(), 1.0);
        dp.data.insert(quantity::TEMPERATURE.to_string(), 350.0);
        dp.data.insert(quantity::FREQUENCY.to_string(), 1e9);
        dp.data.insert(quantity::POWER.to_string(), 1.0);
        dp
    }

    #[test]
    fn test_zero_duty_cycle_disables_nbti_and_hci() {
        let params = MechanismParams::default();
        let dp = nominal_point();
        for mechanism in [Mechanism::Nbti, Mechanism::Hci] {
            let ttf = time_to_failure(mechanism, &dp, 0.0, None, &params).unwrap();
            assert!(ttf.is_infinite(), "{mechanism} should not act at dc=0");
        }
    }

    #[test]
    fn test_all_mechanisms_finite_at_nominal() {
        let params = MechanismParams::default();
        let dp = nominal_point();
        for mechanism in Mechanism::ALL {
            let ttf = time_to_failure(mechanism, &dp, 1.0, None, &params).unwrap();
            assert!(
                ttf.is_finite() && ttf > 0.0,
                "{mechanism} at nominal: {ttf}"
            );
        }
    }

    #[test]
    fn test_distribution_uses_shared_shape() {
        let d = distribution(&[MttfSegment::new(1.0, 1000.0)]);
        assert_eq!(d.shape(), WEIBULL_SHAPE);
        assert!((d.mttf() - 1000.0).abs() < 1e-6);
    }
}
