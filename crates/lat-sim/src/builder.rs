//! Unit reliability builder.
//!
//! For each unit and each configuration it carries a trace for, this
//! module derives the per-mechanism duty cycle of every trace segment,
//! evaluates the mechanism MTTF for the segment's operating point, folds
//! the segments into one Weibull per mechanism, and composes the
//! mechanisms into the unit's overall distribution (the survival product
//! of independent competing failures).
//!
//! The duty-cycle policy is the only place the unit kind matters; see
//! [`duty_cycle`] for the per-kind conventions.

use anyhow::{Context, Result};
use lat_core::{
    quantity, Configuration, DataPoint, LatResult, Mechanism, MttfSegment, System, Unit,
    UnitKind, Weibull, WEIBULL_SHAPE,
};
use lat_mech::MechanismParams;
use std::collections::{BTreeMap, HashMap};

/// Per-mechanism duty cycle of one trace segment, clamped to `[0, 1]`.
///
/// Conventions per unit kind (documented, not reconciled):
/// - **Generic**: `activity` is read directly as a duty-cycle fraction.
/// - **Core**: `power / peak_power`.
/// - **Logic**: `activity` is a switching-event count; the base duty cycle
///   is `min(activity / (duration · frequency), 1)`. NBTI sees
///   `1 - base²/2`, the expected stress over the population of transistors
///   in the block; the other mechanisms see `base`.
/// - **Memory**: HCI never acts (static-zero storage dominates the SRAM
///   bit population); every other mechanism is fully stressed.
pub fn duty_cycle(kind: UnitKind, point: &DataPoint, mechanism: Mechanism) -> LatResult<f64> {
    let raw = match kind {
        UnitKind::Generic => point.require(quantity::ACTIVITY)?,
        UnitKind::Core => {
            point.require(quantity::POWER)? / point.require(quantity::PEAK_POWER)?
        }
        UnitKind::Logic => {
            let events = point.require(quantity::ACTIVITY)?;
            let frequency = point.require(quantity::FREQUENCY)?;
            let base = (events / (point.duration * frequency)).min(1.0);
            if mechanism == Mechanism::Nbti {
                1.0 - base * base / 2.0
            } else {
                base
            }
        }
        UnitKind::Memory => {
            if mechanism == Mechanism::Hci {
                0.0
            } else {
                1.0
            }
        }
    };
    Ok(raw.clamp(0.0, 1.0))
}

/// Derive per-mechanism and overall distributions for every unit in the
/// system. Run once, before simulation; the results are read-only after.
pub fn compute_reliability(
    system: &mut System,
    mechanisms: &[Mechanism],
    params: &MechanismParams,
) -> Result<()> {
    for unit in &mut system.units {
        compute_unit_reliability(unit, mechanisms, params)
            .with_context(|| format!("computing reliability for unit '{}'", unit.name))?;
    }
    Ok(())
}

/// Derive distributions for one unit across all of its configurations.
pub fn compute_unit_reliability(
    unit: &mut Unit,
    mechanisms: &[Mechanism],
    params: &MechanismParams,
) -> Result<()> {
    unit.ensure_fresh_trace();

    let mut per_mechanism: HashMap<Configuration, BTreeMap<Mechanism, Weibull>> = HashMap::new();
    let mut overall: HashMap<Configuration, Weibull> = HashMap::new();

    for (config, trace) in &unit.traces {
        let mut distributions = BTreeMap::new();
        for &mechanism in mechanisms {
            let mut segments = Vec::with_capacity(trace.len());
            for point in trace {
                let dc = duty_cycle(unit.kind, point, mechanism)?;
                let mttf = lat_mech::time_to_failure(mechanism, point, dc, None, params)
                    .with_context(|| {
                        format!("{mechanism} MTTF at t={} under '{config}'", point.time)
                    })?;
                segments.push(MttfSegment::new(point.duration, mttf));
            }
            distributions.insert(mechanism, lat_mech::distribution(&segments));
        }

        let product = distributions
            .values()
            .copied()
            .reduce(|a, b| a * b)
            .unwrap_or_else(|| Weibull::from_segments(WEIBULL_SHAPE, &[]));
        per_mechanism.insert(config.clone(), distributions);
        overall.insert(config.clone(), product);
    }

    unit.per_mechanism = per_mechanism;
    unit.overall = overall;
    Ok(())
}
