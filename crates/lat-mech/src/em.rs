//! Electromigration, Black's equation: `TTF = A · j^(-n) · exp(E_a / kT)`.
//!
//! The current density `j` comes from the trace when available, with a
//! fallback chain: `current_density`, then `current / (w·h)`, then the
//! crude `power / vdd / (w·h)` estimate (warned once). A trace carrying
//! none of the three leaves the mechanism inactive.

use crate::consts;
use crate::params::MechanismParams;
use lat_core::{quantity, warn_once, DataPoint, LatResult};

/// Time to failure in seconds for one trace segment.
pub fn time_to_failure(point: &DataPoint, params: &MechanismParams) -> LatResult<f64> {
    let temperature = point.require(quantity::TEMPERATURE)?;
    let p = &params.em;
    let cross_section = p.width * p.height;

    let j = if let Some(j) = point.get(quantity::CURRENT_DENSITY) {
        j
    } else if let Some(current) = point.get(quantity::CURRENT) {
        current / cross_section
    } else if let Some(power) = point.get(quantity::POWER) {
        let vdd = point.require(quantity::VDD)?;
        warn_once("EM: trace has no current or current_density; estimating current as power/vdd");
        power / vdd / cross_section
    } else {
        warn_once(
            "EM: trace carries no current, current_density, or power; \
             treating electromigration as inactive",
        );
        return Ok(f64::INFINITY);
    };

    if j <= 0.0 {
        return Ok(f64::INFINITY);
    }

    Ok(p.a * j.powf(-p.n) * (p.e_a / (consts::K_B * temperature)).exp())
}
