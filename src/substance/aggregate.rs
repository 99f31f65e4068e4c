//! Flattening of composition graphs into isotope and element vectors.
//!
//! Both walks multiply the fractions along every path from the root and sum
//! the products per leaf. With [`Fraction::Weight`] each level contributes
//! its weight fractions instead of its atomic fractions, which requires the
//! molar mass of every constituent on the way down.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use super::{Constituent, Element, Error, Substance};
use crate::model::isotope::Isotope;

/// Kind of fraction reported by aggregation queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Fraction {
    #[default]
    Atomic,
    Weight,
}

/// Natural elements to collapse into their surrogate isotope.
///
/// Only elements flagged as natural are ever collapsed.
#[derive(Debug, Clone, Default)]
pub enum NaturalSelection {
    /// Keep every isotope.
    #[default]
    None,
    /// Collapse every natural element.
    All,
    /// Collapse the listed natural elements, matched by atomic number and name.
    Only(Vec<Arc<Element>>),
}

impl NaturalSelection {
    pub fn only<I, E>(elements: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<Element>>,
    {
        NaturalSelection::Only(elements.into_iter().map(Into::into).collect())
    }

    /// Whether `element` is replaced by its surrogate isotope.
    pub fn collapses(&self, element: &Element) -> bool {
        if !element.is_natural() {
            return false;
        }
        match self {
            NaturalSelection::None => false,
            NaturalSelection::All => true,
            NaturalSelection::Only(elements) => elements
                .iter()
                .any(|e| e.z() == element.z() && e.name() == element.name()),
        }
    }
}

impl From<bool> for NaturalSelection {
    fn from(all: bool) -> Self {
        if all {
            NaturalSelection::All
        } else {
            NaturalSelection::None
        }
    }
}

/// Map key identifying an element by atomic number, molar mass and name.
///
/// Two elements with the same atomic number but different isotopic
/// compositions stay separate entries.
#[derive(Debug, Clone)]
pub struct ElementKey(pub Arc<Element>);

impl ElementKey {
    fn cmp_key(&self, other: &Self) -> Ordering {
        self.0
            .z()
            .cmp(&other.0.z())
            .then_with(|| self.0.molar_mass().total_cmp(&other.0.molar_mass()))
            .then_with(|| self.0.name().cmp(other.0.name()))
    }
}

impl Deref for ElementKey {
    type Target = Element;

    fn deref(&self) -> &Element {
        &self.0
    }
}

impl PartialEq for ElementKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_key(other) == Ordering::Equal
    }
}

impl Eq for ElementKey {}

impl PartialOrd for ElementKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ElementKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_key(other)
    }
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.name())
    }
}

impl Constituent {
    /// Isotope vector of the composition graph below this constituent.
    ///
    /// Fractions sum to one for a non-empty graph. Natural elements matched
    /// by `natural` contribute their surrogate isotope instead of their own
    /// isotopes.
    pub fn isotopes(
        &self,
        fraction: Fraction,
        natural: &NaturalSelection,
    ) -> Result<BTreeMap<Isotope, f64>, Error> {
        let mut isotopes = BTreeMap::new();
        collect_isotopes(self, 1.0, fraction, natural, &mut isotopes)?;
        Ok(isotopes)
    }

    /// Element vector of the composition graph below this constituent.
    ///
    /// Isotope constituents are not part of any element and are skipped.
    pub fn elements(&self, fraction: Fraction) -> Result<BTreeMap<ElementKey, f64>, Error> {
        let mut elements = BTreeMap::new();
        collect_elements(self, 1.0, fraction, &mut elements)?;
        Ok(elements)
    }
}

fn collect_isotopes(
    constituent: &Constituent,
    share: f64,
    fraction: Fraction,
    natural: &NaturalSelection,
    isotopes: &mut BTreeMap<Isotope, f64>,
) -> Result<(), Error> {
    match constituent {
        Constituent::Isotope(isotope) => {
            *isotopes.entry(isotope.clone()).or_insert(0.0) += share;
        }
        Constituent::Element(element) if natural.collapses(element) => {
            *isotopes.entry(element.surrogate()).or_insert(0.0) += share;
        }
        _ => {
            if let Some(core) = constituent.core() {
                let fractions = core.fractions(fraction)?;
                for (child, f) in core.composition().constituents().zip(fractions) {
                    collect_isotopes(child, share * f, fraction, natural, isotopes)?;
                }
            }
        }
    }
    Ok(())
}

fn collect_elements(
    constituent: &Constituent,
    share: f64,
    fraction: Fraction,
    elements: &mut BTreeMap<ElementKey, f64>,
) -> Result<(), Error> {
    match constituent {
        Constituent::Isotope(_) => {}
        Constituent::Element(element) => {
            *elements
                .entry(ElementKey(Arc::clone(element)))
                .or_insert(0.0) += share;
        }
        _ => {
            if let Some(core) = constituent.core() {
                let fractions = core.fractions(fraction)?;
                for (child, f) in core.composition().constituents().zip(fractions) {
                    collect_elements(child, share * f, fraction, elements)?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::substance::{InputMode, Mixture, Molecule, SubstanceOptions};

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    fn hydrogen() -> Element {
        Element::legacy(
            "hydrogen",
            [
                (Isotope::new(1, 1, 1.00782503223), 0.999885),
                (Isotope::new(1, 2, 2.01410177812), 0.000115),
            ],
        )
        .unwrap()
    }

    fn oxygen() -> Element {
        Element::new_natural(
            "oxygen",
            [
                (Isotope::new(8, 16, 15.99491461957), 0.99757),
                (Isotope::new(8, 17, 16.99913175650), 0.00038),
                (Isotope::new(8, 18, 17.99915961286), 0.00205),
            ],
            InputMode::Atomic,
            SubstanceOptions::default(),
        )
        .unwrap()
    }

    fn water() -> Molecule {
        Molecule::legacy("water", [(hydrogen(), 2.0), (oxygen(), 1.0)]).unwrap()
    }

    #[test]
    fn isotope_fractions_multiply_along_paths() {
        let isotopes = water()
            .isotopes(Fraction::Atomic, &NaturalSelection::None)
            .unwrap();
        assert_eq!(isotopes.len(), 5);
        let h1 = isotopes[&Isotope::new(1, 1, 1.00782503223)];
        assert!(approx_eq(h1, 2.0 / 3.0 * 0.999885, 1e-12));
        let total: f64 = isotopes.values().sum();
        assert!(approx_eq(total, 1.0, 1e-12));
    }

    #[test]
    fn weight_fractions_sum_to_one() {
        let isotopes = water()
            .isotopes(Fraction::Weight, &NaturalSelection::None)
            .unwrap();
        let total: f64 = isotopes.values().sum();
        assert!(approx_eq(total, 1.0, 1e-12));
        let o16 = isotopes[&Isotope::new(8, 16, 15.99491461957)];
        assert!(o16 > 0.88 && o16 < 0.89);
    }

    #[test]
    fn natural_elements_collapse_to_surrogate() {
        let isotopes = water()
            .isotopes(Fraction::Atomic, &NaturalSelection::All)
            .unwrap();
        let names: Vec<&str> = isotopes.keys().map(Isotope::name).collect();
        assert_eq!(names, vec!["H-1", "H-2", "O-nat"]);
        assert!(approx_eq(isotopes[&Isotope::natural(8, 0.0)], 1.0 / 3.0, 1e-12));
    }

    #[test]
    fn selection_only_matches_listed_elements() {
        let hydrogen = hydrogen().into_natural();
        let water = Molecule::legacy("water", [(hydrogen.clone(), 2.0), (oxygen(), 1.0)]).unwrap();
        let isotopes = water
            .isotopes(Fraction::Atomic, &NaturalSelection::only([hydrogen]))
            .unwrap();
        let names: Vec<&str> = isotopes.keys().map(Isotope::name).collect();
        assert_eq!(names, vec!["H-nat", "O-16", "O-17", "O-18"]);
    }

    #[test]
    fn non_natural_elements_never_collapse() {
        assert!(!NaturalSelection::All.collapses(&hydrogen()));
        assert!(NaturalSelection::from(true).collapses(&oxygen()));
        assert!(!NaturalSelection::from(false).collapses(&oxygen()));
    }

    #[test]
    fn elements_merge_across_branches() {
        let water = water();
        let mix = Mixture::legacy(
            "wet hydrogen",
            [
                (Constituent::from(water), 1.0),
                (Constituent::from(hydrogen()), 1.0),
            ],
        )
        .unwrap();
        let elements = mix.elements(Fraction::Atomic).unwrap();
        assert_eq!(elements.len(), 2);
        let names: Vec<String> = elements.keys().map(ToString::to_string).collect();
        assert_eq!(names, vec!["hydrogen", "oxygen"]);
        let total: f64 = elements.values().sum();
        assert!(approx_eq(total, 1.0, 1e-12));
    }

    #[test]
    fn weight_aggregation_needs_molar_masses() {
        let unknown = Molecule::new(
            "unknown",
            Vec::<(Element, f64)>::new(),
            InputMode::Atomic,
            SubstanceOptions::default(),
        )
        .unwrap();
        let mix = Mixture::legacy(
            "mix",
            [
                (Constituent::from(unknown), 1.0),
                (Constituent::from(hydrogen()), 1.0),
            ],
        )
        .unwrap();
        let err = mix
            .isotopes(Fraction::Weight, &NaturalSelection::None)
            .unwrap_err();
        assert!(matches!(err, Error::MissingPhysicalProperty { .. }));
    }

    #[test]
    fn empty_molecule_has_no_isotopes() {
        let alcohol = Molecule::new(
            "alcohol",
            Vec::<(Element, f64)>::new(),
            InputMode::Atomic,
            SubstanceOptions::default().with_molar_mass(46.07),
        )
        .unwrap();
        assert!(
            alcohol
                .isotopes(Fraction::Atomic, &NaturalSelection::None)
                .unwrap()
                .is_empty()
        );
    }
}
