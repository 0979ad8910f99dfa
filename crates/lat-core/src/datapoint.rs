//! Operating-trace segments.
//!
//! A trace is an ordered sequence of [`DataPoint`]s, each describing one
//! piecewise-constant segment of a unit's operating conditions (supply
//! voltage, temperature, clock frequency, activity, power, ...). Quantities
//! are stored by name so traces can carry any subset; missing quantities
//! are filled from per-unit defaults when the trace is attached.

use crate::error::{LatError, LatResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Canonical quantity names used by the wearout models.
pub mod quantity {
    /// Supply voltage, volts.
    pub const VDD: &str = "vdd";
    /// Junction temperature, kelvin.
    pub const TEMPERATURE: &str = "temperature";
    /// Clock frequency, hertz (declared in MHz in traces and defaults).
    pub const FREQUENCY: &str = "frequency";
    /// Activity: a duty-cycle fraction for generic units, a switching-event
    /// count for logic units. The convention is per unit kind.
    pub const ACTIVITY: &str = "activity";
    /// Dissipated power, watts.
    pub const POWER: &str = "power";
    /// Peak (nameplate) power, watts.
    pub const PEAK_POWER: &str = "peak_power";
    /// Supply current, amperes.
    pub const CURRENT: &str = "current";
    /// Interconnect current density, A/m^2.
    pub const CURRENT_DENSITY: &str = "current_density";
}

/// Scale factor applied to the `frequency` quantity: traces and defaults
/// declare MHz, the models consume Hz.
pub const MHZ_TO_HZ: f64 = 1e6;

/// One piecewise-constant segment of an operating trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Absolute end time of the segment, seconds; strictly increasing
    /// within a trace.
    pub time: f64,
    /// Segment length, seconds: `time - prev.time` (first segment: `time`).
    pub duration: f64,
    /// Quantity name -> value.
    pub data: HashMap<String, f64>,
}

impl DataPoint {
    pub fn new(time: f64, duration: f64) -> Self {
        Self {
            time,
            duration,
            data: HashMap::new(),
        }
    }

    /// Look up a quantity, if the segment carries it.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.data.get(name).copied()
    }

    /// Look up a quantity required by a wearout model.
    pub fn require(&self, name: &str) -> LatResult<f64> {
        self.get(name).ok_or_else(|| {
            LatError::Validation(format!("data point at t={} is missing '{name}'", self.time))
        })
    }

    /// Fill quantities the segment does not carry from per-unit defaults.
    ///
    /// Defaults declare `frequency` in MHz, like the trace column before
    /// conversion, so it is scaled here.
    pub fn fill_defaults(&mut self, defaults: &HashMap<String, f64>) {
        for (name, value) in defaults {
            let value = if name == quantity::FREQUENCY {
                value * MHZ_TO_HZ
            } else {
                *value
            };
            self.data.entry(name.clone()).or_insert(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_defaults_keeps_trace_values() {
        let mut dp = DataPoint::new(1.0, 1.0);
        dp.data.insert(quantity::VDD.to_string(), 0.9);

        let mut defaults = HashMap::new();
        defaults.insert(quantity::VDD.to_string(), 1.0);
        defaults.insert(quantity::TEMPERATURE.to_string(), 350.0);
        dp.fill_defaults(&defaults);

        assert_eq!(dp.get(quantity::VDD), Some(0.9));
        assert_eq!(dp.get(quantity::TEMPERATURE), Some(350.0));
    }

    #[test]
    fn test_fill_defaults_scales_frequency() {
        let mut dp = DataPoint::new(1.0, 1.0);
        let mut defaults = HashMap::new();
        defaults.insert(quantity::FREQUENCY.to_string(), 1000.0);
        dp.fill_defaults(&defaults);
        assert_eq!(dp.get(quantity::FREQUENCY), Some(1e9));
    }

    #[test]
    fn test_require_names_missing_quantity() {
        let dp = DataPoint::new(2.0, 1.0);
        let err = dp.require(quantity::POWER).unwrap_err();
        assert!(err.to_string().contains("power"));
    }
}
