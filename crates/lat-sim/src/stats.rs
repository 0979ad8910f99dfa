//! Aggregation of observed failure times.
//!
//! Statistics stay deliberately plain: sample mean, sample standard
//! deviation, and the fixed 95% normal confidence interval. A component
//! with no observed failures reports NaN, which must not poison the other
//! components' rows.

use lat_core::{ComponentRef, System};
use serde::Serialize;
use std::collections::HashSet;

/// The normal quantile backing the 95% interval.
const Z_95: f64 = 1.96;

/// Sample mean; NaN when no samples were observed.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n-1 denominator); NaN below two samples.
pub fn sample_stddev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Confidence interval around the sample mean.
///
/// The `confidence` parameter is accepted for interface stability but
/// ignored: the interval is always the 95% normal approximation
/// `mean ± 1.96·s/√n`.
pub fn mttf_interval(values: &[f64], _confidence: f64) -> (f64, f64) {
    let m = mean(values);
    let s = sample_stddev(values);
    let half_width = Z_95 * s / (values.len() as f64).sqrt();
    (m - half_width, m + half_width)
}

/// One row of the simulation summary.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentStats {
    pub name: String,
    pub samples: usize,
    pub mttf: f64,
    pub stddev: f64,
    pub interval_low: f64,
    pub interval_high: f64,
}

impl ComponentStats {
    fn from_ttfs(name: &str, ttfs: &[f64]) -> Self {
        let (interval_low, interval_high) = mttf_interval(ttfs, 0.95);
        Self {
            name: name.to_string(),
            samples: ttfs.len(),
            mttf: mean(ttfs),
            stddev: sample_stddev(ttfs),
            interval_low,
            interval_high,
        }
    }
}

/// Summarize every component in tree order (root first). A unit shared by
/// several groups appears once.
pub fn collect_stats(system: &System) -> Vec<ComponentStats> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut rows = Vec::new();
    system.walk(&mut |component| {
        if !seen.insert(component.name().to_string()) {
            return;
        }
        let row = match component {
            ComponentRef::Group(group) => ComponentStats::from_ttfs(&group.name, &group.ttfs),
            ComponentRef::Unit(unit) => ComponentStats::from_ttfs(&unit.name, &unit.ttfs),
        };
        rows.push(row);
    });
    // Units declared but absent from the tree still get a row.
    for unit in &system.units {
        if seen.insert(unit.name.clone()) {
            rows.push(ComponentStats::from_ttfs(&unit.name, &unit.ttfs));
        }
    }
    rows
}
