//! TOML substance definition files.
//!
//! A definition file is a list of `[[substance]]` tables, each defining one
//! element, molecule or mixture:
//!
//! ```toml
//! [[substance]]
//! name = "water"
//! kind = "molecule"
//! density = 0.998
//! composition = { H = 2, O = 1 }
//!
//! [[substance]]
//! name = "enriched uranium"
//! kind = "element"
//! mode = "weight"
//! composition = [["U-235", 0.05], ["U-238", 0.95]]
//! ```
//!
//! Composition keys reference, in this order of precedence, a substance
//! defined earlier in the file, an isotope (`U-235`) or a naturally occurring
//! element by its symbol (`Fe`). Compositions given as tables are processed
//! in key order; use an array of pairs to keep the written order.

use std::fs;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::data;
use crate::io::error::Error;
use crate::substance::{
    self, Constituent, Element, InputMode, Mixture, Molecule, SubstanceOptions,
};

#[derive(Debug, Deserialize)]
struct DefinitionFile {
    #[serde(default, rename = "substance")]
    substances: Vec<SubstanceDefinition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Kind {
    Element,
    Molecule,
    Mixture,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CompositionDefinition {
    Table(toml::Table),
    Pairs(Vec<(String, f64)>),
}

impl Default for CompositionDefinition {
    fn default() -> Self {
        CompositionDefinition::Pairs(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SubstanceDefinition {
    name: String,
    kind: Kind,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    natural: bool,
    #[serde(default)]
    composition: CompositionDefinition,
    #[serde(default)]
    molar_mass: Option<f64>,
    #[serde(default)]
    density: Option<f64>,
    #[serde(default)]
    symbol: Option<String>,
}

impl SubstanceDefinition {
    fn entries(&self) -> Result<Vec<(String, f64)>, Error> {
        match &self.composition {
            CompositionDefinition::Pairs(pairs) => Ok(pairs.clone()),
            CompositionDefinition::Table(table) => table
                .iter()
                .map(|(key, value)| {
                    let fraction = match value {
                        toml::Value::Integer(i) => *i as f64,
                        toml::Value::Float(f) => *f,
                        other => {
                            return Err(Error::invalid(
                                &self.name,
                                format!("fraction of \"{key}\" must be a number, found {other}"),
                            ));
                        }
                    };
                    Ok((key.clone(), fraction))
                })
                .collect(),
        }
    }

    fn options(&self) -> SubstanceOptions {
        SubstanceOptions {
            molar_mass: self.molar_mass,
            density: self.density,
            symbol: self.symbol.clone(),
        }
    }
}

/// Substances loaded from a definition file, in definition order.
#[derive(Debug, Clone, Default)]
pub struct Library {
    substances: Vec<Constituent>,
}

impl Library {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, Error> {
        let file: DefinitionFile = toml::from_str(source)?;
        let mut library = Self::default();
        for definition in file.substances {
            let substance = library.build(&definition)?;
            debug!("defined {} \"{}\"", substance.kind(), substance.name());
            library.substances.push(substance);
        }
        Ok(library)
    }

    fn build(&self, definition: &SubstanceDefinition) -> Result<Constituent, Error> {
        let name = definition.name.trim();
        if name.is_empty() {
            return Err(Error::invalid(&definition.name, "name must not be empty"));
        }
        if self.get(name).is_some() {
            return Err(Error::DuplicateDefinition(name.to_string()));
        }
        if definition.natural && definition.kind != Kind::Element {
            return Err(Error::invalid(name, "only elements can be natural"));
        }

        let mode = match &definition.mode {
            Some(mode) => mode
                .parse::<InputMode>()
                .map_err(|e| substance::Error::unknown_mode(name, e))?,
            None => InputMode::Legacy,
        };

        let mut composition = Vec::new();
        for (reference, fraction) in definition.entries()? {
            if !fraction.is_finite() {
                return Err(Error::invalid(
                    name,
                    format!("fraction of \"{reference}\" is not a finite number"),
                ));
            }
            composition.push((self.resolve(name, &reference)?, fraction));
        }

        let options = definition.options();
        let constituent: Constituent = match definition.kind {
            Kind::Element if definition.natural => {
                Element::new_natural(name, composition, mode, options)?.into()
            }
            Kind::Element => Element::new(name, composition, mode, options)?.into(),
            Kind::Molecule => Molecule::new(name, composition, mode, options)?.into(),
            Kind::Mixture => Mixture::new(name, composition, mode, options)?.into(),
        };
        Ok(constituent)
    }

    fn resolve(&self, substance: &str, reference: &str) -> Result<Constituent, Error> {
        let reference = reference.trim();
        if let Some(defined) = self.get(reference) {
            return Ok(defined.clone());
        }
        if let Ok(isotope) = data::parse_isotope(reference) {
            return Ok(isotope.into());
        }
        if let Ok(element) = data::natural_element_by_symbol(reference) {
            return Ok(element.into());
        }
        Err(Error::UnknownReference {
            substance: substance.to_string(),
            reference: reference.to_string(),
        })
    }

    pub fn get(&self, name: &str) -> Option<&Constituent> {
        self.substances.iter().find(|s| s.name() == name)
    }

    /// The substance defined last.
    pub fn last(&self) -> Option<&Constituent> {
        self.substances.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constituent> {
        self.substances.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.substances.iter().map(Constituent::name)
    }

    pub fn len(&self) -> usize {
        self.substances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.substances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::substance::{ConstituentKind, Fraction, NaturalSelection};

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    const WATER: &str = r#"
[[substance]]
name = "water"
kind = "molecule"
density = 0.998
composition = { H = 2, O = 1 }

[[substance]]
name = "enriched uranium"
kind = "element"
mode = "weight"
composition = [["U-235", 0.05], ["U-238", 0.95]]

[[substance]]
name = "slurry"
kind = "mixture"
mode = "weight"
composition = [["water", 0.9], ["enriched uranium", 0.1]]
"#;

    #[test]
    fn loads_substances_in_order() {
        let library = Library::from_toml_str(WATER).unwrap();
        let names: Vec<&str> = library.names().collect();
        assert_eq!(names, vec!["water", "enriched uranium", "slurry"]);
        assert_eq!(library.last().unwrap().name(), "slurry");

        let water = library.get("water").unwrap();
        assert_eq!(water.kind(), ConstituentKind::Molecule);
        assert_eq!(water.density(), 0.998);
        assert!(approx_eq(water.molar_mass(), 18.015, 1e-2));
    }

    #[test]
    fn references_resolve_to_definitions_isotopes_and_elements() {
        let library = Library::from_toml_str(WATER).unwrap();
        let slurry = library.get("slurry").unwrap();
        let core = slurry.core().unwrap();
        let kinds: Vec<ConstituentKind> =
            core.composition().constituents().map(Constituent::kind).collect();
        assert_eq!(kinds, vec![ConstituentKind::Molecule, ConstituentKind::Element]);

        let isotopes = slurry
            .isotopes(Fraction::Weight, &NaturalSelection::None)
            .unwrap();
        let u235 = isotopes[&data::isotope(92, 235).unwrap()];
        assert!(approx_eq(u235, 0.005, 1e-9));
    }

    #[test]
    fn natural_flag_enables_collapsing() {
        let source = r#"
[[substance]]
name = "steel"
kind = "mixture"
mode = "weight"
composition = [["Fe", 0.98], ["C", 0.02]]
"#;
        let library = Library::from_toml_str(source).unwrap();
        let steel = library.get("steel").unwrap();
        let isotopes = steel
            .isotopes(Fraction::Atomic, &NaturalSelection::All)
            .unwrap();
        let names: Vec<&str> = isotopes.keys().map(|i| i.name()).collect();
        assert_eq!(names, vec!["C-nat", "Fe-nat"]);
    }

    #[test]
    fn unknown_reference_is_reported() {
        let source = r#"
[[substance]]
name = "mystery"
kind = "mixture"
composition = { unobtainium = 1.0 }
"#;
        let err = Library::from_toml_str(source).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownReference { ref substance, ref reference }
                if substance == "mystery" && reference == "unobtainium"
        ));
    }

    #[test]
    fn duplicate_definitions_are_rejected() {
        let source = r#"
[[substance]]
name = "a"
kind = "mixture"
composition = { Fe = 1 }

[[substance]]
name = "a"
kind = "mixture"
composition = { C = 1 }
"#;
        assert!(matches!(
            Library::from_toml_str(source),
            Err(Error::DuplicateDefinition(name)) if name == "a"
        ));
    }

    #[test]
    fn construction_errors_are_passed_through() {
        let source = r#"
[[substance]]
name = "heavy water"
kind = "molecule"
mode = "weight"
composition = { H-2 = 0.2, O = 0.8 }
"#;
        let err = Library::from_toml_str(source).unwrap_err();
        assert!(matches!(
            err,
            Error::Substance(crate::substance::Error::InvalidConstituentType { .. })
        ));

        let source = r#"
[[substance]]
name = "x"
kind = "mixture"
mode = "mass"
"#;
        let err = Library::from_toml_str(source).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown input mode \"mass\" for substance \"x\""
        );
    }

    #[test]
    fn unknown_mode_names_the_definition() {
        let source = r#"
[[substance]]
name = "water"
kind = "molecule"
composition = { H = 2, O = 1 }

[[substance]]
name = "steel"
kind = "mixture"
mode = "mass"
composition = [["Fe", 0.98], ["C", 0.02]]
"#;
        let err = Library::from_toml_str(source).unwrap_err();
        assert!(err.to_string().contains("\"steel\""));
        let Error::Substance(inner) = err else {
            panic!("expected a substance error");
        };
        assert_eq!(inner.substance(), Some("steel"));
    }

    #[test]
    fn malformed_files_are_rejected() {
        assert!(matches!(
            Library::from_toml_str("[[substance]]\nname = 1"),
            Err(Error::Toml(_))
        ));
        let source = r#"
[[substance]]
name = "x"
kind = "mixture"
composition = { Fe = "lots" }
"#;
        assert!(matches!(
            Library::from_toml_str(source),
            Err(Error::InvalidDefinition { .. })
        ));
        let source = r#"
[[substance]]
name = "x"
kind = "molecule"
natural = true
"#;
        assert!(matches!(
            Library::from_toml_str(source),
            Err(Error::InvalidDefinition { .. })
        ));
    }
}
