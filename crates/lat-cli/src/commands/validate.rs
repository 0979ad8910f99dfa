use anyhow::{bail, Result};
use lat_core::{ComponentRef, Diagnostics};
use lat_io::{load_system, LoadOptions};

use crate::cli::{delimiter_byte, ValidateArgs};

/// Load the system description (including every referenced trace file) and
/// report structural issues without running a simulation.
pub fn run(args: &ValidateArgs) -> Result<()> {
    let delimiter = delimiter_byte(args.delimiter)?;
    let system = load_system(&args.system, &LoadOptions { delimiter })?;

    let mut diag = Diagnostics::new();
    system.validate_into(&mut diag);
    for issue in diag.iter() {
        println!("{issue}");
    }
    if diag.has_errors() {
        bail!(
            "'{}' failed validation with {} error(s)",
            args.system.display(),
            diag.error_count()
        );
    }

    let mut groups = 0usize;
    system.walk(&mut |component| {
        if matches!(component, ComponentRef::Group(_)) {
            groups += 1;
        }
    });
    println!(
        "{}: {} units, {} groups, {} warning(s)",
        args.system.display(),
        system.units.len(),
        groups,
        diag.warning_count()
    );
    Ok(())
}
