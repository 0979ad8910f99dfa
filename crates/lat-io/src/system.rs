//! System description loader.
//!
//! The XML shape:
//!
//! ```xml
//! <system>
//!   <unit type="core" name="cpu0">
//!     <default vdd="1.0"/>
//!     <redundancy type="serial" count="2"/>
//!     <trace file="cpu0.csv" failed=""/>
//!     <trace file="cpu0_no_gpu.csv" failed="gpu"/>
//!   </unit>
//!   <unit type="memory" name="l2"/>
//!   <group name="soc" failures="0">
//!     <unit name="cpu0"/>
//!     <unit name="l2"/>
//!   </group>
//! </system>
//! ```
//!
//! Unit declarations come first and are assigned dense ids in order; the
//! single top-level `<group>` is the failure dependency tree, resolving
//! `<unit name="…"/>` references against the registry. `failed=""` marks
//! the fresh trace; trace paths resolve relative to the XML file's
//! directory.

use anyhow::{anyhow, bail, Context, Result};
use lat_core::{Component, Configuration, Group, System, Unit, UnitId, UnitKind};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::traces::parse_trace_file;

/// Loader knobs.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Trace file delimiter.
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// A declared unit waiting for its trace files.
struct PendingUnit {
    unit: Unit,
    /// (file, failed-list) per `<trace>` element.
    traces: Vec<(String, String)>,
}

/// The tree section before unit references are resolved.
struct RawGroup {
    name: String,
    failures: usize,
    children: Vec<RawChild>,
}

enum RawChild {
    Group(RawGroup),
    Unit(String),
}

/// Load a system description and all trace files it references.
pub fn load_system(path: &Path, options: &LoadOptions) -> Result<System> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading system description '{}'", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    load_system_str(&text, base_dir, options)
        .with_context(|| format!("loading system description '{}'", path.display()))
}

/// Load a system description from a string; trace paths resolve against
/// `base_dir`.
pub fn load_system_str(xml: &str, base_dir: &Path, options: &LoadOptions) -> Result<System> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut pending: Vec<PendingUnit> = Vec::new();
    let mut current: Option<PendingUnit> = None;
    let mut group_stack: Vec<RawGroup> = Vec::new();
    let mut root: Option<RawGroup> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                open_element(
                    e,
                    false,
                    &mut pending,
                    &mut current,
                    &mut group_stack,
                    &mut root,
                )?;
            }
            Ok(Event::Empty(ref e)) => {
                open_element(
                    e,
                    true,
                    &mut pending,
                    &mut current,
                    &mut group_stack,
                    &mut root,
                )?;
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"unit" => {
                    if group_stack.is_empty() {
                        if let Some(done) = current.take() {
                            pending.push(done);
                        }
                    }
                }
                b"group" => {
                    let done = group_stack
                        .pop()
                        .ok_or_else(|| anyhow!("unbalanced </group>"))?;
                    close_group(done, &mut group_stack, &mut root)?;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => bail!(
                "XML parse error at position {}: {err}",
                reader.buffer_position()
            ),
        }
    }

    if current.is_some() {
        bail!("unterminated <unit> element");
    }
    if !group_stack.is_empty() {
        bail!("unterminated <group> element");
    }
    let root = root.ok_or_else(|| anyhow!("system description has no <group> tree"))?;

    // Materialize the registry and pull in the trace files.
    let mut units = Vec::with_capacity(pending.len());
    let mut by_name: HashMap<String, UnitId> = HashMap::new();
    for entry in pending {
        let mut unit = entry.unit;
        if by_name.contains_key(&unit.name) {
            bail!("duplicate unit name '{}'", unit.name);
        }
        for (file, failed) in &entry.traces {
            let trace_path = base_dir.join(file);
            let points = parse_trace_file(&trace_path, options.delimiter)
                .with_context(|| format!("trace for unit '{}'", unit.name))?;
            unit.attach_trace(Configuration::from_failed_list(failed), points);
        }
        unit.ensure_fresh_trace();
        by_name.insert(unit.name.clone(), unit.id);
        units.push(unit);
    }

    let root = resolve_group(root, &by_name)?;
    Ok(System::new(units, root))
}

fn open_element(
    event: &BytesStart,
    self_closing: bool,
    pending: &mut Vec<PendingUnit>,
    current: &mut Option<PendingUnit>,
    group_stack: &mut Vec<RawGroup>,
    root: &mut Option<RawGroup>,
) -> Result<()> {
    match event.local_name().as_ref() {
        b"system" => {}
        b"unit" if !group_stack.is_empty() => {
            // Reference inside the tree section.
            let name = require_attribute(event, "name")
                .context("<unit> reference inside a group")?;
            if let Some(parent) = group_stack.last_mut() {
                parent.children.push(RawChild::Unit(name));
            }
        }
        b"unit" => {
            // Declaration.
            if current.is_some() {
                bail!("<unit> declarations cannot nest");
            }
            let name = require_attribute(event, "name").context("<unit> declaration")?;
            let kind: UnitKind = match attribute_value(event, "type")? {
                Some(kind) => kind
                    .parse()
                    .with_context(|| format!("unit '{name}'"))?,
                None => UnitKind::Generic,
            };
            let declared = PendingUnit {
                unit: Unit::new(UnitId::new(pending.len()), name, kind),
                traces: Vec::new(),
            };
            if self_closing {
                pending.push(declared);
            } else {
                *current = Some(declared);
            }
        }
        b"default" => {
            let unit = current
                .as_mut()
                .ok_or_else(|| anyhow!("<default> outside of a <unit> declaration"))?;
            for attr in event.attributes().with_checks(false) {
                let attr = attr?;
                let key = std::str::from_utf8(attr.key.local_name().as_ref())
                    .context("non-UTF-8 attribute name in <default>")?
                    .to_string();
                let value: f64 = attr
                    .unescape_value()?
                    .trim()
                    .parse()
                    .with_context(|| {
                        format!("parsing default '{key}' of unit '{}'", unit.unit.name)
                    })?;
                unit.unit.set_default(&key, value);
            }
        }
        b"redundancy" => {
            let unit = current
                .as_mut()
                .ok_or_else(|| anyhow!("<redundancy> outside of a <unit> declaration"))?;
            let serial = match require_attribute(event, "type")?.as_str() {
                "serial" => true,
                "parallel" => false,
                other => bail!(
                    "unknown redundancy type '{other}' on unit '{}'",
                    unit.unit.name
                ),
            };
            let count: u32 = require_attribute(event, "count")?
                .parse()
                .with_context(|| {
                    format!("parsing redundancy count of unit '{}'", unit.unit.name)
                })?;
            unit.unit.serial = serial;
            unit.unit.copies = count.max(1);
            unit.unit.remaining = unit.unit.copies;
        }
        b"trace" => {
            let unit = current
                .as_mut()
                .ok_or_else(|| anyhow!("<trace> outside of a <unit> declaration"))?;
            let file = require_attribute(event, "file")
                .with_context(|| format!("<trace> of unit '{}'", unit.unit.name))?;
            let failed = attribute_value(event, "failed")?.unwrap_or_default();
            unit.traces.push((file, failed));
        }
        b"group" => {
            let name = require_attribute(event, "name").context("<group>")?;
            let failures: usize = match attribute_value(event, "failures")? {
                Some(value) => value
                    .parse()
                    .with_context(|| format!("parsing failures of group '{name}'"))?,
                None => 0,
            };
            let group = RawGroup {
                name,
                failures,
                children: Vec::new(),
            };
            if self_closing {
                close_group(group, group_stack, root)?;
            } else {
                group_stack.push(group);
            }
        }
        _ => {}
    }
    Ok(())
}

fn close_group(
    group: RawGroup,
    group_stack: &mut Vec<RawGroup>,
    root: &mut Option<RawGroup>,
) -> Result<()> {
    if let Some(parent) = group_stack.last_mut() {
        parent.children.push(RawChild::Group(group));
    } else {
        if root.is_some() {
            bail!("system description has more than one top-level <group>");
        }
        *root = Some(group);
    }
    Ok(())
}

fn resolve_group(raw: RawGroup, by_name: &HashMap<String, UnitId>) -> Result<Group> {
    let mut group = Group::new(raw.name, raw.failures);
    for child in raw.children {
        match child {
            RawChild::Group(sub) => {
                let resolved = resolve_group(sub, by_name)?;
                group.push(Component::Group(resolved));
            }
            RawChild::Unit(name) => {
                let id = by_name.get(&name).ok_or_else(|| {
                    anyhow!("group '{}' references unknown unit '{name}'", group.name)
                })?;
                group.push(Component::Unit(*id));
            }
        }
    }
    Ok(group)
}

fn attribute_value(event: &BytesStart, name: &str) -> Result<Option<String>> {
    for attr in event.attributes().with_checks(false) {
        let attr = attr?;
        if attr.key.local_name().as_ref() == name.as_bytes() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn require_attribute(event: &BytesStart, name: &str) -> Result<String> {
    attribute_value(event, name)?.ok_or_else(|| anyhow!("missing required attribute '{name}'"))
}
