//! # lat-core: SoC Lifetime Modeling Core
//!
//! Provides the fundamental data structures for unit-level lifetime analysis
//! of heterogeneous systems-on-chip.
//!
//! ## Design Philosophy
//!
//! A system is a **failure dependency tree** over architectural units:
//! - **Units**: leaf components (cores, logic blocks, memories) that wear
//!   out under NBTI/EM/HCI/TDDB stress and may carry spares.
//! - **Groups**: internal nodes that fail when strictly more than a
//!   threshold of their children have failed.
//!
//! Units live in a flat registry (`Vec<Unit>` indexed by dense [`UnitId`])
//! and the tree references them by id. Groups own their sub-groups
//! exclusively; unit handles are weak in the sense that nothing in the tree
//! keeps a unit alive — the registry does. This sidesteps shared-ownership
//! cycles entirely: a unit may appear in several groups, and mutation
//! during simulation goes through the registry.
//!
//! ## Quick Start
//!
//! ```rust
//! use lat_core::*;
//!
//! // Two cores behind a group that tolerates one failure.
//! let cpu0 = Unit::new(UnitId::new(0), "cpu0".to_string(), UnitKind::Core);
//! let cpu1 = Unit::new(UnitId::new(1), "cpu1".to_string(), UnitKind::Core);
//!
//! let mut root = Group::new("soc".to_string(), 1);
//! root.push(Component::Unit(UnitId::new(0)));
//! root.push(Component::Unit(UnitId::new(1)));
//!
//! let mut system = System::new(vec![cpu0, cpu1], root);
//! assert!(!system.root_failed());
//!
//! // One core down: the group holds.
//! system.unit_mut(UnitId::new(0)).set_failed();
//! assert!(!system.root_failed());
//!
//! // Both down: the group fails.
//! system.unit_mut(UnitId::new(1)).set_failed();
//! assert!(system.root_failed());
//! ```
//!
//! ## Modules
//!
//! - [`weibull`] - Reliability kernel (rate estimation, products, queries)
//! - [`config`] - Failure configurations (trace keys / failure frontier)
//! - [`datapoint`] - Operating-trace segments and quantity names
//! - [`diagnostics`] - Validation collector and de-duplicated warnings
//!
//! ## Integration with lat-io and lat-sim
//!
//! The lat-io crate builds [`System`]s from the XML system description and
//! CSV traces; lat-sim derives per-configuration distributions and runs the
//! Monte-Carlo failure simulation against the registry.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

pub mod config;
pub mod datapoint;
pub mod diagnostics;
pub mod error;
pub mod weibull;

pub use config::Configuration;
pub use datapoint::{quantity, DataPoint, MHZ_TO_HZ};
pub use diagnostics::{warn_once, DiagnosticIssue, Diagnostics, Severity};
pub use error::{LatError, LatResult};
pub use weibull::{MttfSegment, Weibull, WEIBULL_SHAPE};

/// Dense unit identifier, assigned in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(usize);

impl UnitId {
    #[inline]
    pub fn new(value: usize) -> Self {
        UnitId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

/// Wearout mechanisms modeled by lat-mech.
///
/// The enum lives here because it keys per-unit distribution maps; the
/// physics itself is in the lat-mech crate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Mechanism {
    /// Negative bias temperature instability.
    Nbti,
    /// Electromigration.
    Em,
    /// Hot-carrier injection.
    Hci,
    /// Time-dependent dielectric breakdown.
    Tddb,
}

impl Mechanism {
    pub const ALL: [Mechanism; 4] = [
        Mechanism::Nbti,
        Mechanism::Em,
        Mechanism::Hci,
        Mechanism::Tddb,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Mechanism::Nbti => "nbti",
            Mechanism::Em => "em",
            Mechanism::Hci => "hci",
            Mechanism::Tddb => "tddb",
        }
    }
}

impl std::fmt::Display for Mechanism {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Mechanism {
    type Err = LatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nbti" => Ok(Mechanism::Nbti),
            "em" => Ok(Mechanism::Em),
            "hci" => Ok(Mechanism::Hci),
            "tddb" => Ok(Mechanism::Tddb),
            other => Err(LatError::Parse(format!(
                "unknown mechanism '{other}' (expected nbti, em, hci, or tddb)"
            ))),
        }
    }
}

/// Unit kind: selects the duty-cycle policy applied to trace activity.
///
/// The `activity` column means different things per kind (a 0..1 fraction
/// for generic units, a switching-event count for logic); the convention is
/// documented on [`quantity::ACTIVITY`] and not silently reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// Generic unit: `activity` is read directly as a duty cycle.
    Generic,
    /// Core: duty cycle is `power / peak_power`.
    Core,
    /// Logic block: `activity` is a switching-event count, normalized by
    /// `duration * frequency`; NBTI integrates over the transistor
    /// population as `1 - base^2/2`.
    Logic,
    /// SRAM: always stressed except for HCI (static-zero storage dominates).
    Memory,
}

impl UnitKind {
    /// Quantity defaults merged into every trace segment of a unit of this
    /// kind. `frequency` is in MHz like the trace column.
    pub fn default_quantities(&self) -> HashMap<String, f64> {
        let mut defaults = HashMap::new();
        defaults.insert(quantity::VDD.to_string(), 1.0);
        defaults.insert(quantity::TEMPERATURE.to_string(), 350.0);
        defaults.insert(quantity::FREQUENCY.to_string(), 1000.0);
        defaults.insert(quantity::ACTIVITY.to_string(), 0.0);
        if matches!(self, UnitKind::Core) {
            defaults.insert(quantity::POWER.to_string(), 1.0);
            defaults.insert(quantity::PEAK_POWER.to_string(), 1.0);
        }
        defaults
    }

    pub fn name(&self) -> &'static str {
        match self {
            UnitKind::Generic => "unit",
            UnitKind::Core => "core",
            UnitKind::Logic => "logic",
            UnitKind::Memory => "memory",
        }
    }
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for UnitKind {
    type Err = LatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unit" => Ok(UnitKind::Generic),
            "core" => Ok(UnitKind::Core),
            "logic" => Ok(UnitKind::Logic),
            "memory" => Ok(UnitKind::Memory),
            other => Err(LatError::Config(format!(
                "unknown unit type '{other}' (expected unit, core, logic, or memory)"
            ))),
        }
    }
}

/// A leaf component: one architectural unit with its traces, distributions,
/// and mutable simulation state.
///
/// Traces and distributions are read-only after the pre-compute phase; the
/// remaining fields are reset per Monte-Carlo iteration and mutated inside
/// the event loop.
#[derive(Debug, Clone)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub kind: UnitKind,
    /// Redundant copies (1 = no redundancy).
    pub copies: u32,
    /// Copies still alive; the unit is failed once this reaches 0.
    pub remaining: u32,
    /// Serial (cold) spares: each local failure rejuvenates the unit.
    pub serial: bool,
    /// Quantity defaults merged into trace segments (`frequency` in MHz).
    pub defaults: HashMap<String, f64>,
    /// Operating traces per surviving configuration.
    pub traces: HashMap<Configuration, Vec<DataPoint>>,
    /// Per-configuration, per-mechanism distributions.
    pub per_mechanism: HashMap<Configuration, BTreeMap<Mechanism, Weibull>>,
    /// Per-configuration product over mechanisms.
    pub overall: HashMap<Configuration, Weibull>,
    /// Equivalent age under the current configuration, seconds.
    pub age: f64,
    /// Residual survivability since the last rejuvenation, in (0, 1].
    pub current_reliability: f64,
    /// Current configuration (always a key of `traces`).
    pub config: Configuration,
    /// Configuration before the last [`Self::set_configuration`]; `None`
    /// until the first set after construction, reset, or rejuvenation.
    pub prev_config: Option<Configuration>,
    failed: bool,
    /// Observed failure times across Monte-Carlo iterations.
    pub ttfs: Vec<f64>,
}

impl Unit {
    pub fn new(id: UnitId, name: String, kind: UnitKind) -> Self {
        Self {
            id,
            name,
            kind,
            copies: 1,
            remaining: 1,
            serial: false,
            defaults: kind.default_quantities(),
            traces: HashMap::new(),
            per_mechanism: HashMap::new(),
            overall: HashMap::new(),
            age: 0.0,
            current_reliability: 1.0,
            config: Configuration::fresh(),
            prev_config: None,
            failed: false,
            ttfs: Vec::new(),
        }
    }

    /// Configure redundancy: `count` total copies, serial (cold spares) or
    /// parallel.
    pub fn with_redundancy(mut self, serial: bool, count: u32) -> Self {
        self.copies = count.max(1);
        self.remaining = self.copies;
        self.serial = serial;
        self
    }

    /// Override a quantity default (from `<default VAR="..."/>`).
    pub fn set_default(&mut self, name: &str, value: f64) {
        self.defaults.insert(name.to_string(), value);
    }

    /// Attach a trace for a configuration, merging unit defaults into each
    /// segment.
    pub fn attach_trace(&mut self, config: Configuration, mut points: Vec<DataPoint>) {
        for point in &mut points {
            point.fill_defaults(&self.defaults);
        }
        self.traces.insert(config, points);
    }

    /// Guarantee the fresh trace exists, synthesizing a single default
    /// segment if the description declared none.
    pub fn ensure_fresh_trace(&mut self) {
        if !self.traces.contains_key(&Configuration::fresh()) {
            warn_once(&format!(
                "unit '{}' has no fresh trace; synthesizing one from defaults",
                self.name
            ));
            let point = DataPoint::new(1.0, 1.0);
            self.attach_trace(Configuration::fresh(), vec![point]);
        }
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Mark the unit failed without consuming spares; used when an
    /// enclosing group has already failed and the unit became irrelevant.
    pub fn set_failed(&mut self) {
        self.failed = true;
        self.remaining = 0;
    }

    /// Clear per-iteration state. Distributions and traces are untouched.
    pub fn reset(&mut self) {
        self.age = 0.0;
        self.current_reliability = 1.0;
        self.failed = false;
        self.remaining = self.copies;
        self.prev_config = None;
    }

    /// Adopt the current failure frontier as this unit's configuration,
    /// saving the previous one for equivalent-age translation. Frontiers
    /// with no matching trace fall back to fresh with a warning.
    pub fn set_configuration(&mut self, frontier: &Configuration) {
        self.prev_config = Some(self.config.clone());
        if self.traces.contains_key(frontier) {
            self.config = frontier.clone();
        } else {
            if !frontier.is_fresh() {
                warn_once(&format!(
                    "unit '{}' has no trace for configuration '{frontier}'; falling back to fresh",
                    self.name
                ));
            }
            self.config = Configuration::fresh();
        }
    }

    /// The overall distribution for a configuration. Every configuration
    /// stored in `config`/`prev_config` is a trace key, so a miss here is a
    /// programmer error (reliabilities not computed, or a configuration
    /// that bypassed [`Self::set_configuration`]).
    pub fn distribution(&self, config: &Configuration) -> &Weibull {
        self.overall.get(config).unwrap_or_else(|| {
            panic!(
                "unit '{}' has no distribution for configuration '{config}'",
                self.name
            )
        })
    }

    /// `R_config(t)`.
    pub fn reliability(&self, config: &Configuration, t: f64) -> f64 {
        self.distribution(config).reliability(t)
    }

    /// Age at which reliability under `config` decays to `r`.
    pub fn inverse(&self, config: &Configuration, r: f64) -> f64 {
        self.distribution(config).inverse(r)
    }

    /// Consume one copy. Terminal once `remaining` hits 0; otherwise a
    /// serial spare starts fresh (age, residual reliability, and the
    /// equivalent-age baseline all cleared).
    pub fn failure(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.failed = true;
        } else if self.serial {
            self.age = 0.0;
            self.current_reliability = 1.0;
            self.prev_config = None;
        }
    }

    /// Aggregate aging rate (α of the overall distribution) under a
    /// configuration, or 0 if the unit itself is failed in it.
    pub fn aging_rate(&self, config: &Configuration) -> f64 {
        if config.contains(&self.name) {
            return 0.0;
        }
        self.overall.get(config).map(Weibull::rate).unwrap_or(0.0)
    }

    /// Per-mechanism aging rate under the fresh configuration.
    pub fn mechanism_aging_rate(&self, mechanism: Mechanism) -> Option<f64> {
        self.per_mechanism
            .get(&Configuration::fresh())?
            .get(&mechanism)
            .map(Weibull::rate)
    }
}

/// An internal node of the failure dependency tree.
#[derive(Debug, Clone)]
pub struct Group {
    pub name: String,
    /// Tolerated failures: the group fails when strictly more than this
    /// many children are failed (0 = intolerant).
    pub failures: usize,
    pub children: Vec<Component>,
    /// Observed failure times across Monte-Carlo iterations.
    pub ttfs: Vec<f64>,
}

impl Group {
    pub fn new(name: String, failures: usize) -> Self {
        Self {
            name,
            failures,
            children: Vec::new(),
            ttfs: Vec::new(),
        }
    }

    pub fn push(&mut self, child: Component) {
        self.children.push(child);
    }
}

/// A node of the failure dependency tree: an owned sub-group or a unit
/// handle into the registry.
#[derive(Debug, Clone)]
pub enum Component {
    Group(Group),
    Unit(UnitId),
}

/// Borrowed view of a tree node, yielded by the traversal helpers.
#[derive(Debug, Clone, Copy)]
pub enum ComponentRef<'a> {
    Group(&'a Group),
    Unit(&'a Unit),
}

impl<'a> ComponentRef<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            ComponentRef::Group(group) => &group.name,
            ComponentRef::Unit(unit) => &unit.name,
        }
    }
}

/// The failure dependency tree plus the flat unit registry.
#[derive(Debug, Clone)]
pub struct System {
    /// Registry indexed by `UnitId` (dense, declaration order).
    pub units: Vec<Unit>,
    pub root: Group,
}

impl System {
    pub fn new(units: Vec<Unit>, root: Group) -> Self {
        Self { units, root }
    }

    pub fn unit(&self, id: UnitId) -> &Unit {
        &self.units[id.value()]
    }

    pub fn unit_mut(&mut self, id: UnitId) -> &mut Unit {
        &mut self.units[id.value()]
    }

    pub fn unit_by_name(&self, name: &str) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.name == name)
    }

    /// Failure predicate for any tree node.
    pub fn component_failed(&self, component: &Component) -> bool {
        match component {
            Component::Group(group) => self.group_failed(group),
            Component::Unit(id) => self.unit(*id).failed(),
        }
    }

    /// A group fails when strictly more than `failures` children are failed.
    pub fn group_failed(&self, group: &Group) -> bool {
        group
            .children
            .iter()
            .filter(|child| self.component_failed(child))
            .count()
            > group.failures
    }

    pub fn root_failed(&self) -> bool {
        self.group_failed(&self.root)
    }

    /// Prefix DFS over every node, root included.
    pub fn walk<'a, F>(&'a self, op: &mut F)
    where
        F: FnMut(ComponentRef<'a>),
    {
        self.walk_group(&self.root, op);
    }

    fn walk_group<'a, F>(&'a self, group: &'a Group, op: &mut F)
    where
        F: FnMut(ComponentRef<'a>),
    {
        op(ComponentRef::Group(group));
        for child in &group.children {
            match child {
                Component::Group(sub) => self.walk_group(sub, op),
                Component::Unit(id) => op(ComponentRef::Unit(self.unit(*id))),
            }
        }
    }

    /// Prefix DFS that descends into a group's children only when `op`
    /// returns true for it. The return value for unit leaves is ignored.
    pub fn conditional_walk<'a, F>(&'a self, op: &mut F)
    where
        F: FnMut(ComponentRef<'a>) -> bool,
    {
        self.conditional_walk_group(&self.root, op);
    }

    fn conditional_walk_group<'a, F>(&'a self, group: &'a Group, op: &mut F)
    where
        F: FnMut(ComponentRef<'a>) -> bool,
    {
        if !op(ComponentRef::Group(group)) {
            return;
        }
        for child in &group.children {
            match child {
                Component::Group(sub) => self.conditional_walk_group(sub, op),
                Component::Unit(id) => {
                    op(ComponentRef::Unit(self.unit(*id)));
                }
            }
        }
    }

    /// The visible failure frontier: names of the topmost failed
    /// components. Descent stops at a failed node, so individual failed
    /// leaves beneath a failed group are not listed.
    pub fn failure_frontier(&self) -> Configuration {
        let mut frontier = Configuration::fresh();
        self.conditional_walk(&mut |component| {
            let failed = match component {
                ComponentRef::Group(group) => self.group_failed(group),
                ComponentRef::Unit(unit) => unit.failed(),
            };
            if failed {
                frontier.insert(component.name());
            }
            !failed
        });
        frontier
    }

    /// Units still reachable from the root without crossing a failed node.
    /// The complement (against the registry) is the set of units an
    /// already-failed enclosing group has made irrelevant.
    pub fn reachable_units(&self) -> HashSet<UnitId> {
        let mut reachable = HashSet::new();
        self.conditional_walk(&mut |component| match component {
            ComponentRef::Group(group) => !self.group_failed(group),
            ComponentRef::Unit(unit) => {
                if !unit.failed() {
                    reachable.insert(unit.id);
                }
                true
            }
        });
        reachable
    }

    /// Reset per-iteration unit state; accumulated `ttfs` are kept.
    pub fn reset(&mut self) {
        for unit in &mut self.units {
            unit.reset();
        }
    }

    /// Every configuration any unit was profiled under, fresh first (the
    /// canonical column set for the aging-rate tables).
    pub fn known_configurations(&self) -> Vec<Configuration> {
        // BTreeSet ordering puts the empty (fresh) configuration first.
        self.units
            .iter()
            .flat_map(|unit| unit.overall.keys().cloned())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Validate structural sanity before simulation.
    ///
    /// Populates the provided `Diagnostics` with any warnings/errors found.
    pub fn validate_into(&self, diag: &mut Diagnostics) {
        if self.units.is_empty() {
            diag.add_error("structure", "system has no units");
            return;
        }

        // Registry ids must match their slot; everything downstream
        // indexes on that.
        for (index, unit) in self.units.iter().enumerate() {
            if unit.id.value() != index {
                diag.add_error_with_entity(
                    "structure",
                    &format!("unit id {} stored at registry slot {index}", unit.id.value()),
                    &unit.name,
                );
            }
        }

        // Names must be unique across units and groups.
        let mut seen: HashSet<&str> = HashSet::new();
        for unit in &self.units {
            if !seen.insert(unit.name.as_str()) {
                diag.add_error_with_entity("structure", "duplicate component name", &unit.name);
            }
        }
        let mut group_issues: Vec<DiagnosticIssue> = Vec::new();
        self.walk(&mut |component| {
            if let ComponentRef::Group(group) = component {
                if !seen.insert(group.name.as_str()) {
                    group_issues.push(DiagnosticIssue {
                        severity: Severity::Error,
                        category: "structure".to_string(),
                        message: "duplicate component name".to_string(),
                        entity: Some(group.name.clone()),
                    });
                }
                if group.children.is_empty() {
                    group_issues.push(DiagnosticIssue {
                        severity: Severity::Warning,
                        category: "structure".to_string(),
                        message: "group has no children".to_string(),
                        entity: Some(group.name.clone()),
                    });
                } else if group.failures >= group.children.len() {
                    group_issues.push(DiagnosticIssue {
                        severity: Severity::Warning,
                        category: "structure".to_string(),
                        message: format!(
                            "group tolerates {} failures but has only {} children; it can never fail",
                            group.failures,
                            group.children.len()
                        ),
                        entity: Some(group.name.clone()),
                    });
                }
            }
        });
        for issue in group_issues {
            match issue.severity {
                Severity::Error => diag.add_error_with_entity(
                    &issue.category,
                    &issue.message,
                    issue.entity.as_deref().unwrap_or(""),
                ),
                Severity::Warning => diag.add_warning_with_entity(
                    &issue.category,
                    &issue.message,
                    issue.entity.as_deref().unwrap_or(""),
                ),
            }
        }

        // Units declared but absent from the tree never influence the root.
        let mut referenced = HashSet::new();
        self.walk(&mut |component| {
            if let ComponentRef::Unit(unit) = component {
                referenced.insert(unit.id);
            }
        });
        for unit in &self.units {
            if !referenced.contains(&unit.id) {
                diag.add_warning_with_entity(
                    "structure",
                    "unit is not referenced by the failure dependency tree",
                    &unit.name,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_unit_system(failures: usize) -> System {
        let a = Unit::new(UnitId::new(0), "a".to_string(), UnitKind::Generic);
        let b = Unit::new(UnitId::new(1), "b".to_string(), UnitKind::Generic);
        let mut root = Group::new("root".to_string(), failures);
        root.push(Component::Unit(UnitId::new(0)));
        root.push(Component::Unit(UnitId::new(1)));
        System::new(vec![a, b], root)
    }

    #[test]
    fn test_group_failure_threshold_is_strict() {
        let mut system = two_unit_system(1);
        assert!(!system.root_failed());
        system.unit_mut(UnitId::new(0)).set_failed();
        // Exactly at the threshold: holds.
        assert!(!system.root_failed());
        system.unit_mut(UnitId::new(1)).set_failed();
        // Strictly above: fails.
        assert!(system.root_failed());
    }

    #[test]
    fn test_zero_tolerance_group() {
        let mut system = two_unit_system(0);
        system.unit_mut(UnitId::new(0)).set_failed();
        assert!(system.root_failed());
    }

    #[test]
    fn test_failure_frontier_stops_at_topmost() {
        // root -> cluster(a, b), c ; cluster tolerates 0 failures.
        let a = Unit::new(UnitId::new(0), "a".to_string(), UnitKind::Generic);
        let b = Unit::new(UnitId::new(1), "b".to_string(), UnitKind::Generic);
        let c = Unit::new(UnitId::new(2), "c".to_string(), UnitKind::Generic);
        let mut cluster = Group::new("cluster".to_string(), 0);
        cluster.push(Component::Unit(UnitId::new(0)));
        cluster.push(Component::Unit(UnitId::new(1)));
        let mut root = Group::new("root".to_string(), 1);
        root.push(Component::Group(cluster));
        root.push(Component::Unit(UnitId::new(2)));
        let mut system = System::new(vec![a, b, c], root);

        assert!(system.failure_frontier().is_fresh());

        system.unit_mut(UnitId::new(0)).set_failed();
        // The cluster is failed (0-tolerance); the frontier names the
        // cluster, not the unit inside it.
        let frontier = system.failure_frontier();
        assert!(frontier.contains("cluster"));
        assert!(!frontier.contains("a"));
        assert_eq!(frontier.len(), 1);
    }

    #[test]
    fn test_reachable_units_excludes_failed_subtree() {
        let a = Unit::new(UnitId::new(0), "a".to_string(), UnitKind::Generic);
        let b = Unit::new(UnitId::new(1), "b".to_string(), UnitKind::Generic);
        let c = Unit::new(UnitId::new(2), "c".to_string(), UnitKind::Generic);
        let mut cluster = Group::new("cluster".to_string(), 0);
        cluster.push(Component::Unit(UnitId::new(0)));
        cluster.push(Component::Unit(UnitId::new(1)));
        let mut root = Group::new("root".to_string(), 1);
        root.push(Component::Group(cluster));
        root.push(Component::Unit(UnitId::new(2)));
        let mut system = System::new(vec![a, b, c], root);

        system.unit_mut(UnitId::new(0)).set_failed();
        let reachable = system.reachable_units();
        // b sits under the failed cluster; c is still visible.
        assert!(!reachable.contains(&UnitId::new(0)));
        assert!(!reachable.contains(&UnitId::new(1)));
        assert!(reachable.contains(&UnitId::new(2)));
    }

    #[test]
    fn test_reset_fidelity() {
        let mut unit = Unit::new(UnitId::new(0), "a".to_string(), UnitKind::Generic)
            .with_redundancy(false, 3);
        unit.age = 42.0;
        unit.current_reliability = 0.5;
        unit.failure();
        unit.failure();
        unit.failure();
        assert!(unit.failed());

        unit.reset();
        assert_eq!(unit.age, 0.0);
        assert_eq!(unit.current_reliability, 1.0);
        assert!(!unit.failed());
        assert_eq!(unit.remaining, 3);
        assert!(unit.prev_config.is_none());
    }

    #[test]
    fn test_serial_rejuvenation() {
        let mut unit = Unit::new(UnitId::new(0), "a".to_string(), UnitKind::Generic)
            .with_redundancy(true, 3);
        unit.age = 100.0;
        unit.current_reliability = 0.3;
        unit.prev_config = Some(Configuration::fresh());

        unit.failure();
        assert!(!unit.failed());
        assert_eq!(unit.remaining, 2);
        assert_eq!(unit.age, 0.0);
        assert_eq!(unit.current_reliability, 1.0);
        assert!(unit.prev_config.is_none());

        unit.failure();
        unit.failure();
        assert!(unit.failed());
        assert_eq!(unit.remaining, 0);
    }

    #[test]
    fn test_set_configuration_fallback_to_fresh() {
        let mut unit = Unit::new(UnitId::new(0), "a".to_string(), UnitKind::Generic);
        unit.ensure_fresh_trace();

        let unknown: Configuration = ["x"].into_iter().collect();
        unit.set_configuration(&unknown);
        assert!(unit.config.is_fresh());
        assert_eq!(unit.prev_config, Some(Configuration::fresh()));
    }

    #[test]
    fn test_set_configuration_known_key() {
        let mut unit = Unit::new(UnitId::new(0), "a".to_string(), UnitKind::Generic);
        unit.ensure_fresh_trace();
        let other: Configuration = ["b"].into_iter().collect();
        unit.attach_trace(other.clone(), vec![DataPoint::new(1.0, 1.0)]);

        unit.set_configuration(&other);
        assert_eq!(unit.config, other);
    }

    #[test]
    fn test_attach_trace_fills_defaults() {
        let mut unit = Unit::new(UnitId::new(0), "core0".to_string(), UnitKind::Core);
        unit.attach_trace(Configuration::fresh(), vec![DataPoint::new(1.0, 1.0)]);
        let dp = &unit.traces[&Configuration::fresh()][0];
        assert_eq!(dp.get(quantity::VDD), Some(1.0));
        assert_eq!(dp.get(quantity::TEMPERATURE), Some(350.0));
        assert_eq!(dp.get(quantity::FREQUENCY), Some(1e9));
        assert_eq!(dp.get(quantity::POWER), Some(1.0));
        assert_eq!(dp.get(quantity::PEAK_POWER), Some(1.0));
    }

    #[test]
    fn test_validate_flags_never_failing_group() {
        let system = two_unit_system(2);
        let mut diag = Diagnostics::new();
        system.validate_into(&mut diag);
        assert!(!diag.has_errors());
        assert!(diag
            .warnings()
            .any(|issue| issue.message.contains("can never fail")));
    }

    #[test]
    fn test_validate_flags_duplicate_names() {
        let a = Unit::new(UnitId::new(0), "a".to_string(), UnitKind::Generic);
        let a2 = Unit::new(UnitId::new(1), "a".to_string(), UnitKind::Generic);
        let mut root = Group::new("root".to_string(), 0);
        root.push(Component::Unit(UnitId::new(0)));
        root.push(Component::Unit(UnitId::new(1)));
        let system = System::new(vec![a, a2], root);
        let mut diag = Diagnostics::new();
        system.validate_into(&mut diag);
        assert!(diag.has_errors());
    }

    #[test]
    fn test_walk_visits_every_node() {
        let system = two_unit_system(1);
        let mut names = Vec::new();
        system.walk(&mut |component| names.push(component.name().to_string()));
        assert_eq!(names, vec!["root", "a", "b"]);
    }
}
