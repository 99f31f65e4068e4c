mod card;
mod list;
mod nuclide;
mod tree;
mod vector;

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use log::{debug, info};

use isovec::io::Library;
use isovec::{Constituent, Element, NaturalSelection, data};

use crate::cli::{Command, FractionKind, SourceOptions};

pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::List(args) => list::run(args),
        Command::Tree(args) => tree::run(args),
        Command::Isotopes(args) => vector::run_isotopes(args),
        Command::Elements(args) => vector::run_elements(args),
        Command::Card(args) => card::run(args),
        Command::Nuclide(args) => nuclide::run(args),
    }
}

fn load_library(path: &Path) -> Result<Library> {
    let library = Library::from_path(path)
        .with_context(|| format!("Failed to load definitions from {}", path.display()))?;
    info!(
        "loaded {} substance(s) from {}",
        library.len(),
        path.display()
    );
    Ok(library)
}

/// The requested substance, or the last one defined.
fn load_substance(source: &SourceOptions) -> Result<(Library, Constituent)> {
    let library = load_library(&source.file)?;
    let substance = match &source.substance {
        Some(name) => library.get(name).cloned().ok_or_else(|| {
            anyhow!(
                "No substance named \"{name}\" in {} (defined: {})",
                source.file.display(),
                library.names().collect::<Vec<_>>().join(", ")
            )
        })?,
        None => library
            .last()
            .cloned()
            .ok_or_else(|| anyhow!("{} defines no substances", source.file.display()))?,
    };
    debug!("selected {} \"{}\"", substance.kind(), substance.name());
    Ok((library, substance))
}

/// `None` keeps all isotopes; an empty list collapses every natural element.
/// Listed names resolve to elements of the library first, then to natural
/// elements by symbol.
fn natural_selection(library: &Library, names: Option<&[String]>) -> Result<NaturalSelection> {
    let Some(names) = names else {
        return Ok(NaturalSelection::None);
    };
    if names.is_empty() {
        return Ok(NaturalSelection::All);
    }
    let elements = names
        .iter()
        .map(|name| resolve_element(library, name))
        .collect::<Result<Vec<_>>>()?;
    Ok(NaturalSelection::only(elements))
}

fn resolve_element(library: &Library, name: &str) -> Result<std::sync::Arc<Element>> {
    if let Some(constituent) = library.get(name) {
        return constituent
            .as_element()
            .cloned()
            .ok_or_else(|| anyhow!("\"{name}\" is a {}, not an element", constituent.kind()));
    }
    data::natural_element_by_symbol(name)
        .with_context(|| format!("Unknown element \"{name}\""))
}

impl From<FractionKind> for isovec::Fraction {
    fn from(kind: FractionKind) -> Self {
        match kind {
            FractionKind::Atomic => isovec::Fraction::Atomic,
            FractionKind::Weight => isovec::Fraction::Weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFINITIONS: &str = r#"
[[substance]]
name = "carbon"
kind = "element"
natural = true
composition = { C-12 = 0.9893, C-13 = 0.0107 }

[[substance]]
name = "steel"
kind = "mixture"
composition = [["Fe", -0.98], ["carbon", -0.02]]
"#;

    #[test]
    fn natural_selection_variants() {
        let library = Library::from_toml_str(DEFINITIONS).unwrap();
        assert!(matches!(
            natural_selection(&library, None).unwrap(),
            NaturalSelection::None
        ));
        assert!(matches!(
            natural_selection(&library, Some(&[])).unwrap(),
            NaturalSelection::All
        ));

        let names = ["carbon".to_string(), "Fe".to_string()];
        let NaturalSelection::Only(elements) = natural_selection(&library, Some(&names)).unwrap()
        else {
            panic!("expected a list of elements");
        };
        let zs: Vec<u32> = elements.iter().map(|e| e.z()).collect();
        assert_eq!(zs, vec![6, 26]);
    }

    #[test]
    fn non_elements_cannot_be_collapsed() {
        let library = Library::from_toml_str(DEFINITIONS).unwrap();
        let err = natural_selection(&library, Some(&["steel".to_string()])).unwrap_err();
        assert_eq!(err.to_string(), "\"steel\" is a Mixture, not an element");
        assert!(natural_selection(&library, Some(&["Qq".to_string()])).is_err());
    }
}
