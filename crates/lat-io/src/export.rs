//! CSV result exporters.
//!
//! Three artifacts, all with the component/unit name in column 0:
//!
//! - unit aging rates: one column per known configuration, cells are the
//!   overall distribution's α under that configuration (0 when the unit
//!   itself is failed in it);
//! - mechanism aging rates: one column per mechanism, α of the
//!   per-mechanism distribution under the fresh configuration;
//! - TTF dump: variable-length rows of raw observed failure times in
//!   seconds, for offline analysis.

use anyhow::{Context, Result};
use lat_core::{ComponentRef, Mechanism, System};
use std::collections::HashSet;
use std::path::Path;

/// Per-unit aggregate aging rate under every known configuration.
pub fn write_unit_rates_csv(path: &Path, system: &System) -> Result<()> {
    let configs = system.known_configurations();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating unit rate table '{}'", path.display()))?;

    let mut header = vec!["unit".to_string()];
    header.extend(configs.iter().map(|config| config.to_string()));
    writer.write_record(&header)?;

    for unit in &system.units {
        let mut row = vec![unit.name.clone()];
        row.extend(
            configs
                .iter()
                .map(|config| unit.aging_rate(config).to_string()),
        );
        writer.write_record(&row)?;
    }
    writer
        .flush()
        .with_context(|| format!("writing unit rate table '{}'", path.display()))
}

/// Per-unit, per-mechanism aging rate under the fresh configuration.
pub fn write_mechanism_rates_csv(
    path: &Path,
    system: &System,
    mechanisms: &[Mechanism],
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating mechanism rate table '{}'", path.display()))?;

    let mut header = vec!["unit".to_string()];
    header.extend(mechanisms.iter().map(|m| m.to_string()));
    writer.write_record(&header)?;

    for unit in &system.units {
        let mut row = vec![unit.name.clone()];
        row.extend(mechanisms.iter().map(|&m| {
            unit.mechanism_aging_rate(m)
                .unwrap_or(0.0)
                .to_string()
        }));
        writer.write_record(&row)?;
    }
    writer
        .flush()
        .with_context(|| format!("writing mechanism rate table '{}'", path.display()))
}

/// Raw observed failure times, one variable-length row per component in
/// tree order (shared units once).
pub fn write_ttf_dump_csv(path: &Path, system: &System) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("creating TTF dump '{}'", path.display()))?;
    writer.write_record(["component"])?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut rows: Vec<(String, Vec<f64>)> = Vec::new();
    system.walk(&mut |component| {
        if !seen.insert(component.name().to_string()) {
            return;
        }
        let ttfs = match component {
            ComponentRef::Group(group) => group.ttfs.clone(),
            ComponentRef::Unit(unit) => unit.ttfs.clone(),
        };
        rows.push((component.name().to_string(), ttfs));
    });
    for unit in &system.units {
        if seen.insert(unit.name.clone()) {
            rows.push((unit.name.clone(), unit.ttfs.clone()));
        }
    }

    for (name, ttfs) in rows {
        let mut row = vec![name];
        row.extend(ttfs.iter().map(|t| t.to_string()));
        writer.write_record(&row)?;
    }
    writer
        .flush()
        .with_context(|| format!("writing TTF dump '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lat_core::{
        Component, Configuration, Group, Unit, UnitId, UnitKind, Weibull, WEIBULL_SHAPE,
    };
    use std::collections::BTreeMap;

    fn test_system() -> System {
        let mut unit = Unit::new(UnitId::new(0), "u0".to_string(), UnitKind::Generic);
        unit.overall.insert(
            Configuration::fresh(),
            Weibull::new(1000.0, WEIBULL_SHAPE).unwrap(),
        );
        let degraded: Configuration = ["u0"].into_iter().collect();
        unit.overall
            .insert(degraded, Weibull::new(500.0, WEIBULL_SHAPE).unwrap());
        let mut mechs = BTreeMap::new();
        mechs.insert(Mechanism::Nbti, Weibull::new(2000.0, WEIBULL_SHAPE).unwrap());
        unit.per_mechanism.insert(Configuration::fresh(), mechs);
        unit.ttfs = vec![1.5, 2.5];

        let mut root = Group::new("root".to_string(), 0);
        root.push(Component::Unit(UnitId::new(0)));
        root.ttfs = vec![1.5, 2.5];
        System::new(vec![unit], root)
    }

    #[test]
    fn test_unit_rates_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rates.csv");
        write_unit_rates_csv(&path, &test_system()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), "unit,fresh,u0");
        // The unit is failed in the configuration named after it: rate 0.
        assert_eq!(lines.next().unwrap(), "u0,1000,0");
    }

    #[test]
    fn test_mechanism_rates_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mech.csv");
        write_mechanism_rates_csv(&path, &test_system(), &[Mechanism::Nbti, Mechanism::Em])
            .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), "unit,nbti,em");
        // EM was not computed for this unit: rate 0.
        assert_eq!(lines.next().unwrap(), "u0,2000,0");
    }

    #[test]
    fn test_ttf_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ttfs.csv");
        write_ttf_dump_csv(&path, &test_system()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "component");
        assert_eq!(lines[1], "root,1.5,2.5");
        assert_eq!(lines[2], "u0,1.5,2.5");
    }
}
