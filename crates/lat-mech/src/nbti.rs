//! Negative bias temperature instability.
//!
//! ΔV_th(t) is rebuilt from absolute `t` on every step of the forward
//! simulation rather than integrated incrementally; that is the
//! piecewise-stationary closed form of the underlying reaction-diffusion
//! model, and the two differ because the interface-trap term carries the
//! `t^(1/6)` power law. The loop walks in [`NbtiParams::dt`] steps until
//! the drift crosses the failure threshold, then solves the crossing time
//! by linear interpolation between the last two samples.
//!
//! [`NbtiParams::dt`]: crate::params::NbtiParams

use crate::consts;
use crate::params::MechanismParams;
use lat_core::{quantity, warn_once, DataPoint, LatResult};

/// Time to failure in seconds for one trace segment.
///
/// `duty_cycle = 0` means the PMOS gate is never under negative bias and
/// the mechanism does not act. A gate overdrive at or below zero can never
/// accumulate drift and reports an immediate failure threshold of zero.
pub fn time_to_failure(
    point: &DataPoint,
    duty_cycle: f64,
    fail: f64,
    params: &MechanismParams,
) -> LatResult<f64> {
    if duty_cycle <= 0.0 {
        return Ok(f64::INFINITY);
    }

    let vdd = point.require(quantity::VDD)?;
    let temperature = point.require(quantity::TEMPERATURE)?;
    let device = &params.device;
    let p = &params.nbti;

    // AC-to-DC equivalence of the recovery-aware model.
    let dc_eff = (duty_cycle / (1.0 + ((1.0 - duty_cycle) / 2.0).sqrt())).powf(1.0 / 6.0);

    let overdrive = vdd - device.v_t0_p;
    let v_fail = overdrive * (1.0 - (1.0 + fail).powf(-1.0 / device.alpha_power_law));
    let kt = consts::K_B * temperature;

    let mut t = 0.0;
    let mut delta_vth = 0.0;
    let mut prev = 0.0;
    while delta_vth < v_fail {
        prev = delta_vth;
        t += p.dt;

        let mut v = vdd - device.v_t0_p - delta_vth;
        if v < 0.0 {
            warn_once(&format!(
                "NBTI: negative gate overdrive at vdd={vdd} V; clamping stress to zero"
            ));
            v = 0.0;
        }

        let dn_it = p.a * v.powf(p.gamma_it) * (-p.e_a_it / kt).exp() * t.powf(1.0 / 6.0);
        let dn_ht = p.b * v.powf(p.gamma_ht) * (-p.e_a_ht / kt).exp();
        delta_vth = dc_eff * p.delta_vth_coeff * (dn_it + dn_ht);

        if delta_vth <= 0.0 {
            // No stress accumulates (clamped overdrive): the drift will
            // never reach any positive threshold.
            return Ok(0.0);
        }
    }

    if t == 0.0 {
        // Threshold was non-positive before the first step.
        return Ok(0.0);
    }

    // Solve ΔV_th(t*) = ΔV_fail between the last two samples.
    Ok((t - p.dt) + p.dt * (v_fail - prev) / (delta_vth - prev))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(vdd: f64, temperature: f64) -> DataPoint {
        let mut dp = DataPoint::new(1.0, 1.0);
        dp.data.insert(quantity::VDD.to_string(), vdd);
        dp.data.insert(quantity::TEMPERATURE.to_string(), temperature);
        dp
    }

    #[test]
    fn test_zero_duty_cycle_is_infinite() {
        let params = MechanismParams::default();
        let ttf = time_to_failure(&point(1.0, 350.0), 0.0, 0.05, &params).unwrap();
        assert!(ttf.is_infinite());
    }

    #[test]
    fn test_nominal_is_finite_positive() {
        let params = MechanismParams::default();
        let ttf = time_to_failure(&point(1.0, 350.0), 1.0, 0.05, &params).unwrap();
        assert!(ttf.is_finite());
        assert!(ttf > 0.0);
    }

    #[test]
    fn test_hotter_is_shorter() {
        let params = MechanismParams::default();
        let cool = time_to_failure(&point(1.0, 330.0), 1.0, 0.05, &params).unwrap();
        let hot = time_to_failure(&point(1.0, 380.0), 1.0, 0.05, &params).unwrap();
        assert!(hot < cool);
    }

    #[test]
    fn test_lower_duty_cycle_is_longer() {
        let params = MechanismParams::default();
        let busy = time_to_failure(&point(1.0, 350.0), 1.0, 0.05, &params).unwrap();
        let idle = time_to_failure(&point(1.0, 350.0), 0.1, 0.05, &params).unwrap();
        assert!(idle > busy);
    }

    #[test]
    fn test_subthreshold_vdd_reports_zero() {
        let params = MechanismParams::default();
        // vdd below |V_t0_p|: overdrive is negative, stress clamps to zero
        // and the (negative) threshold is already crossed.
        let ttf = time_to_failure(&point(0.2, 350.0), 1.0, 0.05, &params).unwrap();
        assert_eq!(ttf, 0.0);
    }

    #[test]
    fn test_interpolated_crossing_is_subgrid() {
        let params = MechanismParams::default();
        let ttf = time_to_failure(&point(1.0, 350.0), 1.0, 0.05, &params).unwrap();
        // The crossing almost surely falls between grid points.
        assert!(ttf % params.nbti.dt != 0.0);
    }
}
