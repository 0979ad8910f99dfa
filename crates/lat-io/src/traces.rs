//! Operating-trace parsing.
//!
//! A trace file is delimiter-separated with one header row: column 0 must
//! be `time` (absolute seconds, strictly increasing), the remaining
//! columns are quantity names. Segment durations are derived as the delta
//! to the previous row; the first row's duration is its own time. The
//! `frequency` column is declared in MHz and converted to Hz here.

use anyhow::{anyhow, bail, Context, Result};
use csv::ReaderBuilder;
use lat_core::{quantity, DataPoint, MHZ_TO_HZ};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub fn parse_trace_file(path: &Path, delimiter: u8) -> Result<Vec<DataPoint>> {
    let file = File::open(path)
        .with_context(|| format!("opening trace file '{}'", path.display()))?;
    parse_trace(file, delimiter)
        .with_context(|| format!("parsing trace file '{}'", path.display()))
}

pub fn parse_trace<R: Read>(reader: R, delimiter: u8) -> Result<Vec<DataPoint>> {
    let mut csv = ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv.headers().context("reading trace header row")?.clone();
    let first = headers.get(0).unwrap_or("");
    if !first.eq_ignore_ascii_case("time") {
        bail!("first trace column must be 'time', got '{first}'");
    }
    let names: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

    let mut points = Vec::new();
    let mut prev_time = 0.0;
    for (index, record) in csv.records().enumerate() {
        // +2: one for the header row, one for 1-based numbering.
        let row = index + 2;
        let record = record.with_context(|| format!("reading trace row {row}"))?;
        if record.len() != names.len() + 1 {
            bail!(
                "trace row {row} has {} fields, expected {}",
                record.len(),
                names.len() + 1
            );
        }

        let mut fields = record.iter();
        let time: f64 = fields
            .next()
            .ok_or_else(|| anyhow!("trace row {row} is empty"))?
            .parse()
            .with_context(|| format!("parsing time in trace row {row}"))?;
        if time <= prev_time {
            bail!(
                "trace times must be strictly increasing (row {row}: {time} after {prev_time})"
            );
        }

        let mut point = DataPoint::new(time, time - prev_time);
        for (name, field) in names.iter().zip(fields) {
            let mut value: f64 = field.parse().with_context(|| {
                format!("parsing '{name}' in trace row {row}")
            })?;
            if name == quantity::FREQUENCY {
                value *= MHZ_TO_HZ;
            }
            point.data.insert(name.clone(), value);
        }
        prev_time = time;
        points.push(point);
    }

    if points.is_empty() {
        bail!("trace contains no data rows");
    }
    Ok(points)
}
