//! Event-driven Monte-Carlo failure simulation.
//!
//! Each iteration resets the per-unit state and walks the system forward
//! event by event until the root of the failure dependency tree fails:
//!
//! 1. Every surviving unit adopts the current failure frontier as its
//!    configuration.
//! 2. Every healthy unit samples its next failure time from its residual
//!    reliability: draw `r ~ U(0, current_reliability]` and take
//!    `inverse(r) - inverse(current_reliability)` under the current
//!    configuration.
//! 3. Time advances to the earliest event (ties break on the lowest unit
//!    id, so a run is deterministic given the seed).
//! 4. Every healthy unit ages by the elapsed time; a unit whose
//!    configuration changed first translates its equivalent age so that
//!    `reliability(config, age) == current_reliability` holds across the
//!    switch.
//! 5. The failing unit consumes a spare or fails for good; failures
//!    propagate up the tree and newly failed components get the current
//!    time recorded as their TTF. Units walled off behind a failed group
//!    are retired without a TTF of their own.
//!
//! An iteration whose earliest event is `+∞` (nothing left that can fail,
//! but the root still holds) is reported with a warning and contributes no
//! TTFs. Failure records are therefore buffered per iteration and only
//! committed when the root actually failed.
//!
//! Iterations are independent; each derives its RNG stream from
//! `base_seed + iteration`, which makes the rayon-parallel path
//! bit-identical to the sequential one.

use anyhow::{bail, Context, Result};
use lat_core::{ComponentRef, Group, System, Unit};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Knobs for a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Monte-Carlo iterations.
    pub iterations: usize,
    /// Base RNG seed; drawn from entropy when absent.
    pub seed: Option<u64>,
    /// Worker threads; 0 auto-detects, 1 forces the sequential path.
    pub threads: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            seed: None,
            threads: 1,
        }
    }
}

/// What a run did, for logging and manifests.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    pub iterations: usize,
    /// Iterations that ended without a root failure (no finite event).
    pub stalled: usize,
    /// The base seed actually used (recorded so runs can be reproduced).
    pub seed: u64,
}

struct IterationOutcome {
    /// Component name -> failure time, committed only on root failure.
    records: HashMap<String, f64>,
    stalled: bool,
}

/// Run the Monte-Carlo simulation, appending observed TTFs to every
/// component of the system.
///
/// Requires [`crate::compute_reliability`] to have populated the
/// distributions first.
pub fn run(system: &mut System, config: &SimulationConfig) -> Result<SimulationSummary> {
    for unit in &system.units {
        if unit.overall.is_empty() {
            bail!(
                "unit '{}' has no distributions; call compute_reliability before run",
                unit.name
            );
        }
    }

    let base_seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    tracing::info!(
        iterations = config.iterations,
        seed = base_seed,
        "starting Monte-Carlo simulation"
    );

    let outcomes: Vec<IterationOutcome> = if config.threads == 1 {
        (0..config.iterations)
            .map(|iteration| run_iteration(system, iteration, base_seed))
            .collect()
    } else {
        let threads = if config.threads == 0 {
            num_cpus::get()
        } else {
            config.threads
        };
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("building Rayon thread pool for Monte-Carlo iterations")?;
        let template = &*system;
        pool.install(|| {
            (0..config.iterations)
                .into_par_iter()
                .map_init(
                    || template.clone(),
                    |scratch, iteration| run_iteration(scratch, iteration, base_seed),
                )
                .collect()
        })
    };

    let mut stalled = 0;
    for outcome in &outcomes {
        if outcome.stalled {
            stalled += 1;
        } else {
            commit_records(system, &outcome.records);
        }
    }
    // Leave the registry in a defined state for the aggregation phase.
    system.reset();

    Ok(SimulationSummary {
        iterations: config.iterations,
        stalled,
        seed: base_seed,
    })
}

fn run_iteration(system: &mut System, iteration: usize, base_seed: u64) -> IterationOutcome {
    let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(iteration as u64));
    system.reset();

    let mut t = 0.0;
    let mut recorded: HashSet<String> = HashSet::new();
    let mut records: HashMap<String, f64> = HashMap::new();

    while !system.root_failed() {
        let frontier = system.failure_frontier();
        for unit in &mut system.units {
            if !unit.failed() {
                unit.set_configuration(&frontier);
            }
        }

        // Earliest next failure among healthy units; first (lowest id)
        // wins a tie.
        let mut next: Option<(usize, f64)> = None;
        for (index, unit) in system.units.iter().enumerate() {
            if unit.failed() {
                continue;
            }
            let dt = sample_next_event(unit, &mut rng);
            match next {
                Some((_, best)) if dt >= best => {}
                _ => next = Some((index, dt)),
            }
        }

        let finite_next = next.filter(|(_, dt)| dt.is_finite());
        let Some((failing, dt)) = finite_next else {
            tracing::warn!(
                iteration,
                "no finite next failure event; the root cannot be driven to failure"
            );
            return IterationOutcome {
                records: HashMap::new(),
                stalled: true,
            };
        };

        for unit in &mut system.units {
            if !unit.failed() {
                advance_unit(unit, dt);
            }
        }
        system.units[failing].failure();
        t += dt;

        collect_new_failures(system, t, &mut recorded, &mut records);
        promote_unreachable_units(system, &mut recorded);
    }

    // Promotion cascades can fail further components (the root included)
    // after the in-loop sweep; pick those up at the final time.
    collect_new_failures(system, t, &mut recorded, &mut records);

    IterationOutcome {
        records,
        stalled: false,
    }
}

/// Incremental time until this unit's next failure under its current
/// configuration, sampled from the residual reliability.
fn sample_next_event(unit: &Unit, rng: &mut StdRng) -> f64 {
    // 1 - gen::<f64>() is in (0, 1], keeping r away from the log(0) pole.
    let r = unit.current_reliability * (1.0 - rng.gen::<f64>());
    let at_failure = unit.inverse(&unit.config, r);
    if at_failure.is_infinite() {
        return f64::INFINITY;
    }
    at_failure - unit.inverse(&unit.config, unit.current_reliability)
}

/// Age a surviving unit by `dt`, translating equivalent age across a
/// configuration change.
///
/// The residual reliability is configuration-invariant; inverting it under
/// the previous and the current configuration yields two equivalent ages,
/// and their difference shifts the running age so that
/// `reliability(config, age) == current_reliability` keeps holding. A
/// non-finite shift (one side non-wearing) is skipped: there is no finite
/// age to translate, and the subsequent reliability refresh is what keeps
/// the invariant.
fn advance_unit(unit: &mut Unit, dt: f64) {
    unit.age += dt;
    if let Some(prev) = unit.prev_config.clone() {
        let r = unit.current_reliability;
        let shift = unit.inverse(&prev, r) - unit.inverse(&unit.config, r);
        if shift.is_finite() {
            unit.age -= shift;
        }
    }
    unit.current_reliability = unit.reliability(&unit.config, unit.age);
}

/// Record the failure time of every component that is failed but not yet
/// in `recorded`.
fn collect_new_failures(
    system: &System,
    t: f64,
    recorded: &mut HashSet<String>,
    records: &mut HashMap<String, f64>,
) {
    let mut newly: Vec<String> = Vec::new();
    system.walk(&mut |component| {
        let failed = match component {
            ComponentRef::Group(group) => system.group_failed(group),
            ComponentRef::Unit(unit) => unit.failed(),
        };
        if failed && !recorded.contains(component.name()) {
            newly.push(component.name().to_string());
        }
    });
    for name in newly {
        recorded.insert(name.clone());
        records.insert(name, t);
    }
}

/// Retire units that sit behind an already-failed group: they can no
/// longer influence the root and stop consuming events. They are marked
/// failed without a TTF of their own.
fn promote_unreachable_units(system: &mut System, recorded: &mut HashSet<String>) {
    let reachable = system.reachable_units();
    for unit in &mut system.units {
        if !unit.failed() && !reachable.contains(&unit.id) {
            unit.set_failed();
            recorded.insert(unit.name.clone());
        }
    }
}

fn commit_records(system: &mut System, records: &HashMap<String, f64>) {
    for unit in &mut system.units {
        if let Some(&t) = records.get(&unit.name) {
            unit.ttfs.push(t);
        }
    }
    commit_group(&mut system.root, records);
}

fn commit_group(group: &mut Group, records: &HashMap<String, f64>) {
    if let Some(&t) = records.get(&group.name) {
        group.ttfs.push(t);
    }
    for child in &mut group.children {
        if let lat_core::Component::Group(sub) = child {
            commit_group(sub, records);
        }
    }
}
