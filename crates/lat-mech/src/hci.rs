//! Hot-carrier injection, closed form in the ExtraTime parametrisation.
//!
//! The lateral field at the drain follows from the velocity-saturated
//! drain voltage; the lucky-electron injection probability and the oxide
//! field set the interface-state generation rate, and the `t^n` power law
//! is inverted for the age at which ΔV_th reaches the failure threshold.
//! Stress scales with how often the device switches, so the result divides
//! by `duty_cycle · frequency`.

use crate::consts;
use crate::params::MechanismParams;
use lat_core::{quantity, warn_once, DataPoint, LatResult};

/// Time to failure in seconds for one trace segment.
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
    let frequency = point.require(quantity::FREQUENCY)?;
    let device = &params.device;
    let p = &params.hci;

    let overdrive = vdd - device.v_t0_n;
    if overdrive <= 0.0 {
        warn_once(&format!(
            "HCI: vdd={vdd} V is at or below the NMOS threshold; no hot carriers"
        ));
        return Ok(f64::INFINITY);
    }

    // Thermal voltage in volts.
    let v_t = consts::K_B / consts::EV_PER_JOULE * temperature / consts::Q;

    let v_gs = overdrive + 2.0 * v_t;
    let v_dsat = (v_gs * device.l * p.e_sat) / (v_gs + p.a_bulk * device.l * p.e_sat);
    let e_m = (vdd - v_dsat) / p.l;
    let e_ox = overdrive / device.t_ox;

    let a_hci = consts::Q / device.c_ox * p.k * (device.c_ox * overdrive).sqrt();
    let v_fail = overdrive * (1.0 - (1.0 + fail).powf(-1.0 / device.alpha_power_law));

    let phi_it_joule = p.phi_it / consts::EV_PER_JOULE;
    let stress = a_hci
        * (e_ox / p.e_0).exp()
        * (-phi_it_joule / (consts::Q * p.lambda * e_m)).exp();

    Ok((v_fail / stress).powf(1.0 / p.n) / (duty_cycle * frequency))
}
