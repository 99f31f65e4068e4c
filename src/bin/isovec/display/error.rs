use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    for cause in err.chain().skip(1) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 57) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
    }

    let hints = hints(err);
    if !hints.is_empty() {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

fn hints(err: &Error) -> Vec<String> {
    let mut collector = HintCollector::default();
    collector.collect(err);
    collector.hints
}

#[derive(Default)]
struct HintCollector {
    hints: Vec<String>,
}

impl HintCollector {
    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn collect(&mut self, err: &Error) {
        use isovec::SubstanceError;
        use isovec::data::Error as DataError;
        use isovec::io::Error as IoError;

        if let Some(e) = err.downcast_ref::<IoError>() {
            self.collect_io_hints(e);
        } else if let Some(e) = err.downcast_ref::<SubstanceError>() {
            self.collect_substance_hints(e);
        } else if let Some(e) = err.downcast_ref::<DataError>() {
            self.collect_data_hints(e);
        } else if let Some(e) = err.downcast_ref::<std::io::Error>() {
            self.collect_std_io_hints(e);
        }
    }

    fn collect_io_hints(&mut self, err: &isovec::io::Error) {
        use isovec::io::Error as IoError;

        match err {
            IoError::Io { source } => self.collect_std_io_hints(source),

            IoError::Toml(_) => {
                self.add("The definition file is not valid TOML or has unknown keys");
                self.add(
                    "Each substance is a [[substance]] table with name, kind and composition",
                );
            }

            IoError::UnknownReference { reference, .. } => {
                self.add(format!(
                    "\"{reference}\" is neither an earlier substance, an isotope nor a natural element"
                ));
                self.add("Substances must be defined before they are referenced");
                self.add("Isotopes are written as U-235 and natural elements by symbol (Fe)");
            }

            IoError::DuplicateDefinition(_) => {
                self.add("Substance names must be unique within a definition file");
            }

            IoError::InvalidDefinition { .. } => {
                self.add("Fractions must be finite numbers");
                self.add("Only substances of kind \"element\" can be natural");
            }

            IoError::Substance(e) => self.collect_substance_hints(e),
        }
    }

    fn collect_substance_hints(&mut self, err: &isovec::SubstanceError) {
        use isovec::SubstanceError;

        match err {
            SubstanceError::InvalidConstituentType { .. } => {
                self.add("Elements are made of isotopes and molecules of elements");
                self.add("Use a mixture to combine arbitrary constituents");
            }

            SubstanceError::MixedFractionSign { .. } => {
                self.add("Without a mode, positive values are atomic and negative weight fractions");
                self.add("Set mode = \"atomic\" or mode = \"weight\" to state it explicitly");
            }

            SubstanceError::DisallowedInputMode { .. } => {
                self.add("Molecules only take atom counts or atomic fractions");
                self.add("Elements cannot be given in volume fractions");
            }

            SubstanceError::MissingPhysicalProperty { constituent, .. } => {
                self.add(format!(
                    "Give \"{constituent}\" the missing property in its definition"
                ));
                self.add("Volume fractions need a density for every constituent");
            }

            SubstanceError::UnknownMode { .. } => {
                self.add("Valid modes are legacy, atomic, weight, volume and skip");
            }

            SubstanceError::AtomicNumberMismatch { .. } => {
                self.add("All isotopes of an element must have the same atomic number");
                self.add("Use a mixture to combine isotopes of different elements");
            }

            SubstanceError::EmptyComposition { .. } => {
                self.add("Give at least one constituent with a non-zero fraction");
            }

            SubstanceError::Conversion { .. } => {
                self.add("Check that all fractions are finite and not all zero");
            }
        }
    }

    fn collect_data_hints(&mut self, err: &isovec::data::Error) {
        use isovec::data::Error as DataError;

        match err {
            DataError::Symbol(_) => {
                self.add("Element symbols are case sensitive, e.g. Fe or U");
            }
            DataError::UnknownIsotope { .. } => {
                self.add("The isotope is not in the embedded nuclide table");
                self.add("Only isotopes with a measured mass are tabulated");
            }
            DataError::NoNaturalComposition(_) => {
                self.add("The element has no stable or primordial isotopes");
                self.add("Name one of its isotopes instead, e.g. Tc-99");
            }
            DataError::InvalidName(_) => {
                self.add("Isotopes are written as U-235, U235, Tc-99m or Hf-178m2");
            }
        }
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the file exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Ensure you have read/write access as needed");
            }

            ErrorKind::InvalidData => {
                self.add("The file is not valid UTF-8 text");
            }

            ErrorKind::BrokenPipe => {
                self.add("Output consumer terminated early");
            }

            _ => {
                self.add("Check file path, permissions, and disk space");
            }
        }
    }
}
