use std::fmt::Write as _;
use std::sync::Arc;

use log::warn;

use super::{
    Composition, Constituent, ConstituentKind, Element, Error, InputMode, Substance,
    SubstanceCore, SubstanceOptions, atomic_fractions, check_constituents, collect_raw,
    resolve_mode,
};

/// Largest multiplier tried when recovering integer atom counts.
const MAX_MULTIPLIER: u32 = 1000;

/// Relative tolerance for treating a count as an integer.
const COUNT_TOLERANCE: f64 = 1e-6;

/// A molecule: elements with atom counts.
///
/// Input values are atom counts (`H: 2, O: 1`) or atomic fractions. Weight
/// and volume input are rejected. The molar mass is `Σ Nᵢ Mᵢ` over the atom
/// counts `Nᵢ` recovered from the input.
///
/// A molecule without constituents is valid; it then only carries its molar
/// mass and density overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    core: SubstanceCore,
    atoms: u64,
    counts: Vec<f64>,
}

impl Molecule {
    pub fn new<I, C>(
        name: impl Into<String>,
        elements: I,
        mode: InputMode,
        options: SubstanceOptions,
    ) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (C, f64)>,
        C: Into<Constituent>,
    {
        let name = name.into();
        let raw = collect_raw(elements);
        check_constituents::<Self>(&name, &raw)?;
        let mode = resolve_mode::<Self>(&name, &raw, mode)?;

        let atomic = atomic_fractions::<Self>(&name, raw, mode)?;
        let total: f64 = atomic
            .iter()
            .map(|&(_, v)| v)
            .filter(|&v| v > 0.0 && v.is_finite())
            .sum();
        let composition = Composition::normalized(atomic);
        let (atoms, counts) = stoichiometry(&name, &composition.fractions(), total);

        let molar_mass = options
            .molar_mass
            .unwrap_or_else(|| formula_mass(&composition, &counts));
        let symbol = options
            .symbol
            .unwrap_or_else(|| formula(&composition, &counts));
        let core = SubstanceCore::new(
            Self::KIND,
            name,
            symbol,
            composition,
            molar_mass,
            options.density.filter(|&rho| rho > 0.0).unwrap_or(0.0),
        );

        Ok(Self {
            core,
            atoms,
            counts,
        })
    }

    pub fn from_atomic<I, C>(
        name: impl Into<String>,
        elements: I,
        options: SubstanceOptions,
    ) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (C, f64)>,
        C: Into<Constituent>,
    {
        Self::new(name, elements, InputMode::Atomic, options)
    }

    pub fn legacy<I, C>(name: impl Into<String>, elements: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (C, f64)>,
        C: Into<Constituent>,
    {
        Self::new(
            name,
            elements,
            InputMode::Legacy,
            SubstanceOptions::default(),
        )
    }

    /// Total number of atoms per molecule.
    #[inline]
    pub fn atoms(&self) -> u64 {
        self.atoms
    }

    /// Elements with their number of atoms per molecule.
    ///
    /// Counts are integral unless no integer formula could be found.
    pub fn atom_counts(&self) -> impl Iterator<Item = (&Arc<Element>, f64)> {
        self.core
            .composition()
            .constituents()
            .zip(self.counts.iter().copied())
            .filter_map(|(c, n)| c.as_element().map(|e| (e, n)))
    }
}

impl Substance for Molecule {
    const KIND: ConstituentKind = ConstituentKind::Molecule;
    const ALLOWED_CONSTITUENTS: &'static [ConstituentKind] = &[ConstituentKind::Element];
    const ALLOWED_MODES: &'static [InputMode] =
        &[InputMode::Legacy, InputMode::Atomic, InputMode::Skip];

    fn core(&self) -> &SubstanceCore {
        &self.core
    }

    fn to_constituent(&self) -> Constituent {
        Constituent::Molecule(Arc::new(self.clone()))
    }
}

/// Recovers atom counts from normalised fractions and the raw input total.
///
/// Counts given directly (`H: 2, O: 1`) are kept. Fractions are scaled by the
/// smallest multiplier up to [`MAX_MULTIPLIER`] that makes every count an
/// integer. If there is none, the fractional counts of the raw input are kept.
fn stoichiometry(name: &str, fractions: &[f64], total: f64) -> (u64, Vec<f64>) {
    if fractions.is_empty() {
        return (0, Vec::new());
    }

    let integral = |n: f64| {
        fractions.iter().all(|&x| {
            let count = x * n;
            count.round() >= 1.0 && (count - count.round()).abs() <= COUNT_TOLERANCE * n
        })
    };

    let rounded = total.round();
    let multiplier = if rounded >= 1.0
        && (total - rounded).abs() <= COUNT_TOLERANCE * rounded
        && integral(rounded)
    {
        Some(rounded)
    } else {
        (1..=MAX_MULTIPLIER).map(f64::from).find(|&n| integral(n))
    };

    match multiplier {
        Some(n) => {
            let counts = fractions.iter().map(|&x| (x * n).round()).collect();
            (n as u64, counts)
        }
        None => {
            warn!(
                "molecule \"{name}\": no integer formula with at most {MAX_MULTIPLIER} atoms, keeping fractional counts"
            );
            let counts = fractions.iter().map(|&x| x * total).collect();
            ((total.round() as u64).max(1), counts)
        }
    }
}

/// `Σ Nᵢ Mᵢ`, or 0 if any element has an unknown molar mass.
fn formula_mass(composition: &Composition, counts: &[f64]) -> f64 {
    if composition.constituents().all(|c| c.molar_mass() > 0.0) {
        composition
            .constituents()
            .zip(counts)
            .map(|(c, n)| n * c.molar_mass())
            .sum()
    } else {
        0.0
    }
}

/// Chemical formula such as `H2O` built from the element symbols.
fn formula(composition: &Composition, counts: &[f64]) -> String {
    let mut formula = String::new();
    for (constituent, &n) in composition.constituents().zip(counts) {
        let symbol = constituent
            .core()
            .map_or_else(|| constituent.name(), |core| core.symbol());
        formula.push_str(symbol);
        if n.fract() == 0.0 {
            if n > 1.0 {
                let _ = write!(formula, "{n:.0}");
            }
        } else {
            let _ = write!(formula, "{n:.2}");
        }
    }
    formula
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::isotope::Isotope;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    fn hydrogen() -> Element {
        Element::legacy("hydrogen", [(Isotope::new(1, 1, 1.00782503223), 1.0)]).unwrap()
    }

    fn oxygen() -> Element {
        Element::legacy("oxygen", [(Isotope::new(8, 16, 15.99491461957), 1.0)]).unwrap()
    }

    fn carbon() -> Element {
        Element::legacy("carbon", [(Isotope::new(6, 12, 12.0), 1.0)]).unwrap()
    }

    #[test]
    fn counts_are_kept() {
        let water = Molecule::legacy("water", [(hydrogen(), 2.0), (oxygen(), 1.0)]).unwrap();
        assert_eq!(water.atoms(), 3);
        assert_eq!(water.symbol(), "H2O");
        let counts: Vec<f64> = water.atom_counts().map(|(_, n)| n).collect();
        assert_eq!(counts, vec![2.0, 1.0]);
        let expected = 2.0 * hydrogen().molar_mass() + oxygen().molar_mass();
        assert!(approx_eq(water.molar_mass(), expected, 1e-9));
    }

    #[test]
    fn fractions_recover_integer_counts() {
        let co2 = Molecule::legacy(
            "carbon dioxide",
            [(carbon(), 1.0 / 3.0), (oxygen(), 2.0 / 3.0)],
        )
        .unwrap();
        assert_eq!(co2.atoms(), 3);
        assert_eq!(co2.symbol(), "CO2");
        let x: Vec<f64> = co2.composition().fractions();
        assert!(approx_eq(x[0], 1.0 / 3.0, 1e-12));
    }

    #[test]
    fn fractional_counts_fall_back() {
        let odd = Molecule::legacy("odd", [(carbon(), 1.0), (oxygen(), 1.0e-4 * 1.234567)])
            .unwrap();
        let counts: Vec<f64> = odd.atom_counts().map(|(_, n)| n).collect();
        assert!(approx_eq(counts[0], 1.0, 1e-12));
        assert!(approx_eq(counts[1], 1.234567e-4, 1e-12));
        assert_eq!(odd.atoms(), 1);
    }

    #[test]
    fn weight_mode_is_disabled() {
        let err = Molecule::new(
            "water",
            [(hydrogen(), 0.111), (oxygen(), 0.889)],
            InputMode::Weight,
            SubstanceOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::DisallowedInputMode {
                mode: InputMode::Weight,
                ..
            }
        ));

        let err = Molecule::legacy("water", [(hydrogen(), -0.111), (oxygen(), -0.889)])
            .unwrap_err();
        assert!(matches!(err, Error::DisallowedInputMode { .. }));
    }

    #[test]
    fn empty_molecule_carries_overrides() {
        let alcohol = Molecule::new(
            "alcohol",
            Vec::<(Element, f64)>::new(),
            InputMode::Atomic,
            SubstanceOptions::default()
                .with_molar_mass(46.07)
                .with_density(0.789),
        )
        .unwrap();
        assert!(alcohol.composition().is_empty());
        assert_eq!(alcohol.atoms(), 0);
        assert_eq!(alcohol.molar_mass(), 46.07);
        assert!(approx_eq(alcohol.molar_volume(), 46.07 / 0.789, 1e-12));
    }

    #[test]
    fn isotopes_are_rejected() {
        let err = Molecule::legacy("h2", [(Isotope::new(1, 1, 1.0078), 2.0)]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConstituentType {
                constituent_kind: ConstituentKind::Isotope,
                ..
            }
        ));
    }

    #[test]
    fn stoichiometry_of_counts_and_fractions() {
        assert_eq!(stoichiometry("m", &[0.5, 0.5], 2.0), (2, vec![1.0, 1.0]));
        assert_eq!(stoichiometry("m", &[0.25, 0.75], 1.0), (4, vec![1.0, 3.0]));
        assert_eq!(stoichiometry("m", &[], 0.0), (0, Vec::new()));
    }

    #[test]
    fn large_counts_are_not_truncated() {
        let big = Molecule::legacy("big", [(hydrogen(), 4.0e9), (oxygen(), 2.0e9)]).unwrap();
        assert_eq!(big.atoms(), 6_000_000_000);
        let counts: Vec<f64> = big.atom_counts().map(|(_, n)| n).collect();
        assert_eq!(counts, vec![4.0e9, 2.0e9]);
        assert_eq!(counts.iter().sum::<f64>() as u64, big.atoms());
    }
}
