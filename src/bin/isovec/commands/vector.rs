use std::io::Write;

use anyhow::{Context, Result};

use isovec::{Fraction, NaturalSelection};

use crate::cli::{FractionKind, IsotopesArgs, Unit, VectorArgs};
use crate::display::write_vector_table;
use crate::io::create_output;

pub fn run_isotopes(args: IsotopesArgs) -> Result<()> {
    let (library, substance) = super::load_substance(&args.vector.source)?;
    let natural = super::natural_selection(&library, args.natural.natural.as_deref())?;
    let fraction = Fraction::from(args.vector.fraction);

    let isotopes = substance
        .isotopes(fraction, &natural)
        .with_context(|| format!("Failed to collect isotopes of \"{}\"", substance.name()))?;
    let rows: Vec<(String, f64)> = isotopes
        .into_iter()
        .map(|(isotope, x)| (isotope.name().to_string(), x))
        .collect();

    let suffix = if matches!(natural, NaturalSelection::None) {
        ""
    } else {
        ", natural elements collapsed"
    };
    let title = format!("Isotopes of {}{suffix}", substance.name());
    write(&args.vector, &title, &rows)
}

pub fn run_elements(args: VectorArgs) -> Result<()> {
    let (_, substance) = super::load_substance(&args.source)?;

    let elements = substance
        .elements(Fraction::from(args.fraction))
        .with_context(|| format!("Failed to collect elements of \"{}\"", substance.name()))?;
    let rows: Vec<(String, f64)> = elements
        .into_iter()
        .map(|(element, x)| (element.to_string(), x))
        .collect();

    let title = format!("Elements of {}", substance.name());
    write(&args, &title, &rows)
}

fn write(args: &VectorArgs, title: &str, rows: &[(String, f64)]) -> Result<()> {
    let (unit, scale) = unit(args.fraction, args.unit);
    let mut out = create_output(args.output.output.as_deref())?;
    write_vector_table(&mut out, title, rows, &unit, scale)?;
    out.flush()?;
    Ok(())
}

/// Column label and factor applied to plain fractions.
fn unit(fraction: FractionKind, unit: Unit) -> (String, f64) {
    let kind = match fraction {
        FractionKind::Atomic => "at.",
        FractionKind::Weight => "wt.",
    };
    match unit {
        Unit::Fraction => (format!("{kind} fraction"), 1.0),
        Unit::Percent => (format!("{kind}%"), 1e2),
        Unit::Permille => (format!("{kind}‰"), 1e3),
        Unit::Ppm => (format!("{kind}ppm"), 1e6),
    }
}
