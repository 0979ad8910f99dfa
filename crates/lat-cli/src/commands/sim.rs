use anyhow::{bail, Context, Result};
use lat_core::{Diagnostics, Mechanism};
use lat_io::{
    load_system, write_mechanism_rates_csv, write_ttf_dump_csv, write_unit_rates_csv,
    LoadOptions,
};
use lat_mech::{load_params_file, MechanismParams};
use lat_sim::{collect_stats, compute_reliability, ComponentStats, SimulationConfig};
use std::io::Write;
use std::path::Path;
use tabwriter::TabWriter;
use tracing::{info, warn};

use crate::cli::{delimiter_byte, SimArgs};
use crate::common::TimeUnit;

/// Run the full pipeline: load, validate, derive distributions, simulate,
/// aggregate, and emit the requested artifacts.
pub fn run(args: &SimArgs) -> Result<()> {
    let delimiter = delimiter_byte(args.delimiter)?;

    let mut params = MechanismParams::default();
    if let Some(path) = &args.params {
        load_params_file(path, &mut params)?;
    }
    let mechanisms = parse_mechanisms(args.mechanisms.as_deref())?;

    let mut system = load_system(&args.system, &LoadOptions { delimiter })?;

    let mut diag = Diagnostics::new();
    system.validate_into(&mut diag);
    for issue in diag.warnings() {
        warn!("{issue}");
    }
    if diag.has_errors() {
        for issue in diag.errors() {
            eprintln!("{issue}");
        }
        bail!(
            "'{}' failed validation with {} error(s)",
            args.system.display(),
            diag.error_count()
        );
    }

    compute_reliability(&mut system, &mechanisms, &params)
        .context("deriving per-configuration reliability distributions")?;

    let summary = lat_sim::run(
        &mut system,
        &SimulationConfig {
            iterations: args.iterations,
            seed: args.seed,
            threads: args.threads,
        },
    )?;
    if summary.stalled > 0 {
        warn!(
            "{} of {} iterations stalled without a root failure",
            summary.stalled, summary.iterations
        );
    }

    let stats = collect_stats(&system);
    print_summary_table(&stats, args.time_unit)?;

    if let Some(path) = &args.summary_csv {
        write_summary_csv(path, &stats)?;
        info!("summary statistics written to {}", path.display());
    }
    if let Some(path) = &args.unit_rates {
        write_unit_rates_csv(path, &system)?;
        info!("unit aging rates written to {}", path.display());
    }
    if let Some(path) = &args.mechanism_rates {
        write_mechanism_rates_csv(path, &system, &mechanisms)?;
        info!("mechanism aging rates written to {}", path.display());
    }
    if let Some(path) = &args.ttf_dump {
        write_ttf_dump_csv(path, &system)?;
        info!("raw TTFs written to {}", path.display());
    }

    println!(
        "Simulated {} iterations (seed {})",
        summary.iterations, summary.seed
    );
    Ok(())
}

/// Parse the `--mechanisms` list; all four when absent.
fn parse_mechanisms(list: Option<&str>) -> Result<Vec<Mechanism>> {
    let Some(list) = list else {
        return Ok(Mechanism::ALL.to_vec());
    };
    let mut mechanisms = Vec::new();
    for entry in list.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let mechanism: Mechanism = entry.parse()?;
        if !mechanisms.contains(&mechanism) {
            mechanisms.push(mechanism);
        }
    }
    if mechanisms.is_empty() {
        bail!("--mechanisms selected none of nbti, em, hci, tddb");
    }
    Ok(mechanisms)
}

fn print_summary_table(stats: &[ComponentStats], unit: TimeUnit) -> Result<()> {
    let mut tw = TabWriter::new(std::io::stdout());
    writeln!(tw, "component\tsamples\tmttf ({unit})\tstddev\t95% interval")?;
    for row in stats {
        writeln!(
            tw,
            "{}\t{}\t{:.4}\t{:.4}\t[{:.4}, {:.4}]",
            row.name,
            row.samples,
            unit.convert(row.mttf),
            unit.convert(row.stddev),
            unit.convert(row.interval_low),
            unit.convert(row.interval_high),
        )?;
    }
    tw.flush().context("writing summary table")?;
    Ok(())
}

/// Summary rows as CSV, times in seconds.
fn write_summary_csv(path: &Path, stats: &[ComponentStats]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating summary '{}'", path.display()))?;
    for row in stats {
        writer.serialize(row)?;
    }
    writer
        .flush()
        .with_context(|| format!("writing summary '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mechanisms_default_is_all() {
        assert_eq!(parse_mechanisms(None).unwrap(), Mechanism::ALL.to_vec());
    }

    #[test]
    fn test_parse_mechanisms_subset() {
        let parsed = parse_mechanisms(Some("nbti, em")).unwrap();
        assert_eq!(parsed, vec![Mechanism::Nbti, Mechanism::Em]);
    }

    #[test]
    fn test_parse_mechanisms_deduplicates() {
        let parsed = parse_mechanisms(Some("tddb,tddb")).unwrap();
        assert_eq!(parsed, vec![Mechanism::Tddb]);
    }

    #[test]
    fn test_parse_mechanisms_rejects_unknown() {
        assert!(parse_mechanisms(Some("rust")).is_err());
        assert!(parse_mechanisms(Some("")).is_err());
    }
}
