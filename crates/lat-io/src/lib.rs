//! # lat-io: System Descriptions, Traces, and Result Export
//!
//! - [`system`] - Loads the XML system description (unit declarations with
//!   defaults, redundancy, and per-configuration trace files, plus the
//!   failure dependency tree) into a [`lat_core::System`].
//! - [`traces`] - Parses delimited operating traces (header row `time` +
//!   quantity names, float cells, MHz clock column).
//! - [`export`] - Writes the CSV artifacts: per-unit aging rates,
//!   per-mechanism aging rates, and the raw TTF dump.
//!
//! Loading fails fast: malformed XML, unknown unit kinds, unresolvable
//! unit references, and unparseable numbers all abort with context naming
//! the offending file and entity. Missing quantities and missing fresh
//! traces are repaired with de-duplicated warnings instead.

pub mod export;
pub mod system;
pub mod traces;

pub use export::{write_mechanism_rates_csv, write_ttf_dump_csv, write_unit_rates_csv};
pub use system::{load_system, load_system_str, LoadOptions};
pub use traces::{parse_trace, parse_trace_file};
