//! Embedded nuclide reference data.
//!
//! Relative atomic masses of ground state isotopes and the isotopic
//! composition of the naturally occurring elements are compiled into the
//! library and parsed on first use.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use serde::Deserialize;
use thiserror::Error;

use crate::model::isotope::Isotope;
use crate::model::periodic::{self, ParseSymbolError};
use crate::substance::{Element, InputMode, SubstanceOptions};

const NUCLIDES_TOML: &str = include_str!("../resources/nuclides.toml");

static NUCLIDES: OnceLock<Nuclides> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Symbol(#[from] ParseSymbolError),

    #[error("no nuclide data for {symbol}-{a}")]
    UnknownIsotope { symbol: String, a: u32 },

    #[error("element {0} does not occur naturally")]
    NoNaturalComposition(String),

    #[error("invalid isotope name '{0}', expected a name such as 'U-235' or 'Tc-99m'")]
    InvalidName(String),
}

#[derive(Debug, Deserialize)]
struct NuclideTable {
    #[serde(default, rename = "isotope")]
    isotopes: Vec<IsotopeRecord>,
    #[serde(default, rename = "element")]
    elements: Vec<ElementRecord>,
}

#[derive(Debug, Deserialize)]
struct IsotopeRecord {
    z: u32,
    a: u32,
    mass: f64,
}

#[derive(Debug, Deserialize)]
struct ElementRecord {
    z: u32,
    name: String,
    /// `[mass number, atomic fraction]` pairs.
    isotopes: Vec<(u32, f64)>,
}

struct Nuclides {
    isotopes: BTreeMap<(u32, u32), Isotope>,
    natural: BTreeMap<u32, Arc<Element>>,
}

impl Nuclides {
    fn parse(source: &str) -> Result<Self, String> {
        let table: NuclideTable = toml::from_str(source).map_err(|e| e.to_string())?;

        let isotopes: BTreeMap<(u32, u32), Isotope> = table
            .isotopes
            .into_iter()
            .map(|r| ((r.z, r.a), Isotope::new(r.z, r.a, r.mass)))
            .collect();

        let mut natural = BTreeMap::new();
        for record in table.elements {
            let composition = record
                .isotopes
                .iter()
                .map(|&(a, x)| {
                    isotopes
                        .get(&(record.z, a))
                        .cloned()
                        .map(|isotope| (isotope, x))
                        .ok_or_else(|| format!("{} lists unknown isotope A = {a}", record.name))
                })
                .collect::<Result<Vec<_>, _>>()?;
            let element = Element::new_natural(
                record.name,
                composition,
                InputMode::Atomic,
                SubstanceOptions::default(),
            )
            .map_err(|e| e.to_string())?;
            natural.insert(record.z, Arc::new(element));
        }

        Ok(Self { isotopes, natural })
    }
}

fn nuclides() -> &'static Nuclides {
    NUCLIDES.get_or_init(|| {
        Nuclides::parse(NUCLIDES_TOML).unwrap_or_else(|e| {
            panic!("Failed to parse embedded nuclide data ({e}). This is a library bug.")
        })
    })
}

/// Ground state isotope `(z, a)`, if tabulated.
pub fn isotope(z: u32, a: u32) -> Option<Isotope> {
    nuclides().isotopes.get(&(z, a)).cloned()
}

/// Ground state isotope of the element with the given symbol.
pub fn isotope_by_symbol(symbol: &str, a: u32) -> Result<Isotope, Error> {
    let z = periodic::atomic_number(symbol)?;
    isotope(z, a).ok_or_else(|| Error::UnknownIsotope {
        symbol: symbol.to_string(),
        a,
    })
}

/// Parses names such as `U-235`, `U235`, `Tc-99m` or `Hf-178m2`.
///
/// Isomeric states take the relative atomic mass of the ground state.
///
/// ```
/// let tc = isovec::data::parse_isotope("Tc-99m")?;
/// assert_eq!((tc.z(), tc.a(), tc.i()), (43, 99, 1));
/// assert_eq!(tc.name(), "Tc-99m");
/// # Ok::<(), isovec::data::Error>(())
/// ```
pub fn parse_isotope(name: &str) -> Result<Isotope, Error> {
    let invalid = || Error::InvalidName(name.to_string());

    let trimmed = name.trim();
    let split = trimmed
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(invalid)?;
    let (symbol, rest) = trimmed.split_at(split);
    let symbol = symbol.strip_suffix('-').unwrap_or(symbol);

    let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let (a, state) = rest.split_at(digits);
    let a: u32 = a.parse().map_err(|_| invalid())?;
    let i = match state {
        "" | "g" => 0,
        "m" => 1,
        s => s
            .strip_prefix('m')
            .and_then(|n| n.parse().ok())
            .ok_or_else(invalid)?,
    };

    let ground = isotope_by_symbol(symbol, a)?;
    Ok(match i {
        0 => ground,
        i => Isotope::with_state(ground.z(), a, i, ground.a_r()),
    })
}

/// All tabulated isotopes of element `z`, by mass number.
pub fn isotopes_of(z: u32) -> Vec<Isotope> {
    nuclides()
        .isotopes
        .range((z, 0)..=(z, u32::MAX))
        .map(|(_, isotope)| isotope.clone())
        .collect()
}

/// Element `z` with its natural isotopic composition.
pub fn natural_element(z: u32) -> Option<Arc<Element>> {
    nuclides().natural.get(&z).cloned()
}

pub fn natural_element_by_symbol(symbol: &str) -> Result<Arc<Element>, Error> {
    let z = periodic::atomic_number(symbol)?;
    natural_element(z).ok_or_else(|| Error::NoNaturalComposition(symbol.to_string()))
}

/// All naturally occurring elements, by atomic number.
pub fn natural_elements() -> impl Iterator<Item = &'static Arc<Element>> {
    nuclides().natural.values()
}
