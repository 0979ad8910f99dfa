//! # lat-sim: Monte-Carlo Lifetime Simulation
//!
//! Ties the data model (lat-core) and the wearout physics (lat-mech)
//! together:
//!
//! - [`builder`] - Derives, for every unit and every surviving
//!   configuration it was profiled under, the per-mechanism and overall
//!   Weibull distributions from its operating traces.
//! - [`simulate`] - The event-driven Monte-Carlo loop: sample each healthy
//!   unit's next failure from its residual reliability, advance to the
//!   earliest event, re-age every survivor under the new failure frontier
//!   (translating equivalent age across configuration changes), consume
//!   redundancy, and repeat until the root of the failure dependency tree
//!   gives out.
//! - [`stats`] - Aggregation of observed failure times into mean, sample
//!   deviation, and the 95% normal confidence interval, plus aging-rate
//!   queries.
//!
//! Iterations are independent: each one derives its own RNG stream from
//! the base seed, so a run is reproducible and the rayon-parallel path
//! produces bit-identical results to the sequential one.

pub mod builder;
pub mod simulate;
pub mod stats;

pub use builder::{compute_reliability, duty_cycle};
pub use simulate::{run, SimulationConfig, SimulationSummary};
pub use stats::{collect_stats, mean, mttf_interval, sample_stddev, ComponentStats};
