//! Substances and their composition.
//!
//! A substance owns a normalised map from constituents to atomic (mole)
//! fractions. Three kinds exist, each accepting a fixed set of constituent
//! kinds:
//!
//! | kind         | constituents                     |
//! |--------------|----------------------------------|
//! | [`Element`]  | isotopes of one atomic number    |
//! | [`Molecule`] | elements                         |
//! | [`Mixture`]  | elements, molecules and mixtures |
//!
//! All kinds share the construction pipeline in this module: constituent
//! kinds are validated, the input mode is resolved, raw values are converted
//! to atomic fractions and finally normalised. The [`Substance`] trait exposes
//! the derived quantities and the recursive queries (isotope and element
//! vectors, trees) on top of the shared [`SubstanceCore`].

mod aggregate;
mod element;
mod error;
mod input;
mod mixture;
mod molecule;

pub use aggregate::{ElementKey, Fraction, NaturalSelection};
pub use element::Element;
pub use error::Error;
pub use input::{InputMode, ParseInputModeError, SubstanceOptions};
pub use mixture::Mixture;
pub use molecule::Molecule;

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use log::debug;

use crate::conversion::{self, AVOGADRO};
use crate::model::isotope::Isotope;
use crate::tree::{Tree, TreeOptions};

/// Runtime kind of a [`Constituent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstituentKind {
    Isotope,
    Element,
    Molecule,
    Mixture,
}

impl fmt::Display for ConstituentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstituentKind::Isotope => write!(f, "Isotope"),
            ConstituentKind::Element => write!(f, "Element"),
            ConstituentKind::Molecule => write!(f, "Molecule"),
            ConstituentKind::Mixture => write!(f, "Mixture"),
        }
    }
}

/// A node of a composition graph.
///
/// Substances are shared through [`Arc`], so one element may appear in many
/// molecules and mixtures. Two constituents are equal when they are of the
/// same kind and share their key: `(Z, A, I)` for isotopes, the name for
/// substances.
#[derive(Debug, Clone)]
pub enum Constituent {
    Isotope(Isotope),
    Element(Arc<Element>),
    Molecule(Arc<Molecule>),
    Mixture(Arc<Mixture>),
}

impl Constituent {
    pub fn kind(&self) -> ConstituentKind {
        match self {
            Constituent::Isotope(_) => ConstituentKind::Isotope,
            Constituent::Element(_) => ConstituentKind::Element,
            Constituent::Molecule(_) => ConstituentKind::Molecule,
            Constituent::Mixture(_) => ConstituentKind::Mixture,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Constituent::Isotope(isotope) => isotope.name(),
            _ => self.core().map(SubstanceCore::name).unwrap_or_default(),
        }
    }

    /// Molar mass [g/mol]; 0 if unknown.
    pub fn molar_mass(&self) -> f64 {
        match self {
            Constituent::Isotope(isotope) => isotope.molar_mass(),
            _ => self.core().map_or(0.0, SubstanceCore::molar_mass),
        }
    }

    /// Density [g/cm^3]; 0 if unknown. Isotopes never carry a density.
    pub fn density(&self) -> f64 {
        self.core().map_or(0.0, SubstanceCore::density)
    }

    /// Molar volume [cm^3/mol]; 0 if unknown.
    pub fn molar_volume(&self) -> f64 {
        self.core().map_or(0.0, SubstanceCore::molar_volume)
    }

    /// Shared substance data, `None` for isotopes.
    pub fn core(&self) -> Option<&SubstanceCore> {
        match self {
            Constituent::Isotope(_) => None,
            Constituent::Element(element) => Some(element.core()),
            Constituent::Molecule(molecule) => Some(molecule.core()),
            Constituent::Mixture(mixture) => Some(mixture.core()),
        }
    }

    pub fn as_isotope(&self) -> Option<&Isotope> {
        match self {
            Constituent::Isotope(isotope) => Some(isotope),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&Arc<Element>> {
        match self {
            Constituent::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_substance(&self) -> bool {
        !matches!(self, Constituent::Isotope(_))
    }

    /// Builds a tree mirroring the composition graph below this constituent.
    pub fn input_tree(&self, options: &TreeOptions) -> Tree {
        crate::tree::build::input_tree(self, options)
    }

    /// Builds a flattened tree: this constituent, its elements and their isotopes.
    pub fn composition_tree(&self, options: &TreeOptions) -> Result<Tree, Error> {
        crate::tree::build::composition_tree(self, options)
    }
}

impl PartialEq for Constituent {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Constituent::Isotope(a), Constituent::Isotope(b)) => a == b,
            _ => self.kind() == other.kind() && self.name() == other.name(),
        }
    }
}

impl Eq for Constituent {}

impl Hash for Constituent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            Constituent::Isotope(isotope) => isotope.hash(state),
            _ => self.name().hash(state),
        }
    }
}

impl fmt::Display for Constituent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Isotope> for Constituent {
    fn from(isotope: Isotope) -> Self {
        Constituent::Isotope(isotope)
    }
}

impl From<&Isotope> for Constituent {
    fn from(isotope: &Isotope) -> Self {
        Constituent::Isotope(isotope.clone())
    }
}

macro_rules! impl_from_substance {
    ($($kind:ident),*) => {
        $(
            impl From<$kind> for Constituent {
                fn from(substance: $kind) -> Self {
                    Constituent::$kind(Arc::new(substance))
                }
            }

            impl From<Arc<$kind>> for Constituent {
                fn from(substance: Arc<$kind>) -> Self {
                    Constituent::$kind(substance)
                }
            }

            impl From<&Arc<$kind>> for Constituent {
                fn from(substance: &Arc<$kind>) -> Self {
                    Constituent::$kind(Arc::clone(substance))
                }
            }
        )*
    };
}

impl_from_substance!(Element, Molecule, Mixture);

/// Insertion ordered constituent → atomic fraction map.
///
/// Keys are unique, fractions are strictly positive and sum to one, unless the
/// composition is empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composition {
    entries: Vec<(Constituent, f64)>,
}

impl Composition {
    /// Merges repeated keys, drops non-positive entries and normalises.
    pub(crate) fn normalized(raw: Vec<(Constituent, f64)>) -> Self {
        let mut entries: Vec<(Constituent, f64)> = Vec::with_capacity(raw.len());
        for (constituent, fraction) in raw {
            match entries.iter_mut().find(|(c, _)| *c == constituent) {
                Some((_, existing)) => *existing += fraction,
                None => entries.push((constituent, fraction)),
            }
        }

        entries.retain(|&(_, f)| f > 0.0 && f.is_finite());
        let total: f64 = entries.iter().map(|&(_, f)| f).sum();
        for (_, fraction) in &mut entries {
            *fraction /= total;
        }

        Self { entries }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Constituent, f64)> {
        self.entries.iter().map(|(c, f)| (c, *f))
    }

    pub fn constituents(&self) -> impl Iterator<Item = &Constituent> {
        self.entries.iter().map(|(c, _)| c)
    }

    pub fn fractions(&self) -> Vec<f64> {
        self.entries.iter().map(|&(_, f)| f).collect()
    }

    /// Atomic fraction of `constituent`, if present.
    pub fn fraction_of(&self, constituent: &Constituent) -> Option<f64> {
        self.entries
            .iter()
            .find(|(c, _)| c == constituent)
            .map(|&(_, f)| f)
    }

    fn names(&self) -> Vec<&str> {
        self.constituents().map(Constituent::name).collect()
    }

    fn molar_masses(&self) -> Vec<f64> {
        self.constituents().map(Constituent::molar_mass).collect()
    }

    fn molar_volumes(&self) -> Vec<f64> {
        self.constituents().map(Constituent::molar_volume).collect()
    }

    /// `Σ xᵢMᵢ`, or 0 if any constituent has an unknown molar mass.
    pub(crate) fn mean_molar_mass(&self) -> f64 {
        if self.constituents().all(|c| c.molar_mass() > 0.0) {
            self.iter().map(|(c, x)| x * c.molar_mass()).sum()
        } else {
            0.0
        }
    }
}

impl<'a> IntoIterator for &'a Composition {
    type Item = &'a (Constituent, f64);
    type IntoIter = std::slice::Iter<'a, (Constituent, f64)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Data shared by every substance kind.
#[derive(Debug, Clone, PartialEq)]
pub struct SubstanceCore {
    kind: ConstituentKind,
    name: String,
    symbol: String,
    composition: Composition,
    molar_mass: f64,
    density: f64,
}

impl SubstanceCore {
    pub(crate) fn new(
        kind: ConstituentKind,
        name: String,
        symbol: String,
        composition: Composition,
        molar_mass: f64,
        density: f64,
    ) -> Self {
        debug!(
            "created {kind} \"{name}\" with {} constituents (M = {molar_mass} g/mol, rho = {density} g/cm^3)",
            composition.len()
        );
        Self {
            kind,
            name,
            symbol,
            composition,
            molar_mass,
            density,
        }
    }

    #[inline]
    pub fn kind(&self) -> ConstituentKind {
        self.kind
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[inline]
    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    #[inline]
    pub fn molar_mass(&self) -> f64 {
        self.molar_mass
    }

    #[inline]
    pub fn density(&self) -> f64 {
        self.density
    }

    /// `M / ρ` [cm^3/mol], or 0 if either is unknown.
    pub fn molar_volume(&self) -> f64 {
        if self.molar_mass != 0.0 && self.density != 0.0 {
            self.molar_mass / self.density
        } else {
            0.0
        }
    }

    /// `N_A / V_m` [1/cm^3], or 0 if the molar volume is unknown.
    pub fn number_density(&self) -> f64 {
        match self.molar_volume() {
            v if v > 0.0 => AVOGADRO / v,
            _ => 0.0,
        }
    }

    /// Fractions of the constituents in composition order.
    pub(crate) fn fractions(&self, fraction: Fraction) -> Result<Vec<f64>, Error> {
        match fraction {
            Fraction::Atomic => Ok(self.composition.fractions()),
            Fraction::Weight => self.weight_fractions(),
        }
    }

    pub(crate) fn weight_fractions(&self) -> Result<Vec<f64>, Error> {
        conversion::at_to_wt(
            &self.composition.fractions(),
            &self.composition.molar_masses(),
        )
        .map_err(|e| self.conversion_error(e))
    }

    pub(crate) fn volume_fractions(&self) -> Result<Vec<f64>, Error> {
        conversion::at_to_vol(
            &self.composition.fractions(),
            &self.composition.molar_volumes(),
        )
        .map_err(|e| self.conversion_error(e))
    }

    fn conversion_error(&self, source: conversion::ConversionError) -> Error {
        Error::from_conversion(self.kind, &self.name, &self.composition.names(), source)
    }

    fn zip(&self, fractions: Vec<f64>) -> Vec<(Constituent, f64)> {
        self.composition
            .constituents()
            .cloned()
            .zip(fractions)
            .collect()
    }
}

/// Common interface of [`Element`], [`Molecule`] and [`Mixture`].
///
/// Implementors declare which constituent kinds and input modes they accept
/// and hand out their [`SubstanceCore`]; everything else is provided.
pub trait Substance {
    /// Kind reported in errors and trees.
    const KIND: ConstituentKind;

    /// Constituent kinds accepted as composition keys.
    const ALLOWED_CONSTITUENTS: &'static [ConstituentKind];

    /// Input modes accepted after legacy sign resolution.
    const ALLOWED_MODES: &'static [InputMode];

    fn core(&self) -> &SubstanceCore;

    /// Wraps a copy of this substance as a graph node.
    fn to_constituent(&self) -> Constituent;

    fn name(&self) -> &str {
        self.core().name()
    }

    fn symbol(&self) -> &str {
        self.core().symbol()
    }

    /// Constituents with their atomic (mole) fractions.
    fn composition(&self) -> &Composition {
        self.core().composition()
    }

    /// Molar mass [g/mol]; 0 if unknown.
    fn molar_mass(&self) -> f64 {
        self.core().molar_mass()
    }

    /// Density [g/cm^3]; 0 if unknown.
    fn density(&self) -> f64 {
        self.core().density()
    }

    /// Molar volume [cm^3/mol]; 0 if unknown.
    fn molar_volume(&self) -> f64 {
        self.core().molar_volume()
    }

    /// Number density [1/cm^3]; 0 if unknown.
    fn number_density(&self) -> f64 {
        self.core().number_density()
    }

    /// Constituents with their weight fractions.
    fn composition_in_weight(&self) -> Result<Vec<(Constituent, f64)>, Error> {
        let core = self.core();
        Ok(core.zip(core.weight_fractions()?))
    }

    /// Constituents with their volume fractions.
    fn composition_in_volume(&self) -> Result<Vec<(Constituent, f64)>, Error> {
        let core = self.core();
        Ok(core.zip(core.volume_fractions()?))
    }

    /// All isotopes of the composition graph with their summed fractions.
    fn isotopes(
        &self,
        fraction: Fraction,
        natural: &NaturalSelection,
    ) -> Result<BTreeMap<Isotope, f64>, Error> {
        self.to_constituent().isotopes(fraction, natural)
    }

    /// All elements of the composition graph with their summed fractions.
    fn elements(&self, fraction: Fraction) -> Result<BTreeMap<ElementKey, f64>, Error> {
        self.to_constituent().elements(fraction)
    }

    /// Tree mirroring the composition graph down to the isotopes.
    fn input_tree(&self, options: &TreeOptions) -> Tree {
        self.to_constituent().input_tree(options)
    }

    /// Tree of the elements of the substance and their isotopes.
    fn composition_tree(&self, options: &TreeOptions) -> Result<Tree, Error> {
        self.to_constituent().composition_tree(options)
    }
}

/// Collects the raw `(constituent, value)` pairs of a constructor call.
pub(crate) fn collect_raw<I, C>(composition: I) -> Vec<(Constituent, f64)>
where
    I: IntoIterator<Item = (C, f64)>,
    C: Into<Constituent>,
{
    composition
        .into_iter()
        .map(|(constituent, value)| (constituent.into(), value))
        .collect()
}

/// Rejects constituents outside the capability set of `S`.
pub(crate) fn check_constituents<S: Substance>(
    name: &str,
    raw: &[(Constituent, f64)],
) -> Result<(), Error> {
    match raw
        .iter()
        .find(|(c, _)| !S::ALLOWED_CONSTITUENTS.contains(&c.kind()))
    {
        Some((c, _)) => Err(Error::invalid_constituent(
            S::KIND,
            name,
            c.name(),
            c.kind(),
            S::ALLOWED_CONSTITUENTS,
        )),
        None => Ok(()),
    }
}

/// Resolves legacy sign encoding and checks the mode against `S`.
pub(crate) fn resolve_mode<S: Substance>(
    name: &str,
    raw: &[(Constituent, f64)],
    mode: InputMode,
) -> Result<InputMode, Error> {
    let mode = match mode {
        InputMode::Legacy => {
            let mut non_zero = raw.iter().map(|&(_, v)| v).filter(|&v| v != 0.0);
            let positive = non_zero.clone().all(|v| v > 0.0);
            if positive {
                InputMode::Atomic
            } else if non_zero.all(|v| v < 0.0) {
                InputMode::Weight
            } else {
                return Err(Error::MixedFractionSign {
                    kind: S::KIND,
                    substance: name.to_string(),
                });
            }
        }
        mode => mode,
    };

    if S::ALLOWED_MODES.contains(&mode) {
        Ok(mode)
    } else {
        Err(Error::DisallowedInputMode {
            kind: S::KIND,
            substance: name.to_string(),
            mode,
        })
    }
}

/// Converts raw values interpreted by a resolved `mode` to atomic fractions.
///
/// The result is not yet normalised.
pub(crate) fn atomic_fractions<S: Substance>(
    name: &str,
    raw: Vec<(Constituent, f64)>,
    mode: InputMode,
) -> Result<Vec<(Constituent, f64)>, Error> {
    let convert = |raw: Vec<(Constituent, f64)>,
                   property: fn(&Constituent) -> f64,
                   f: fn(&[f64], &[f64]) -> Result<Vec<f64>, conversion::ConversionError>|
     -> Result<Vec<(Constituent, f64)>, Error> {
        let values: Vec<f64> = raw.iter().map(|(_, v)| v.abs()).collect();
        let properties: Vec<f64> = raw.iter().map(|(c, _)| property(c)).collect();
        match f(&values, &properties) {
            Ok(x) => Ok(raw.into_iter().map(|(c, _)| c).zip(x).collect()),
            Err(e) => {
                let names: Vec<&str> = raw.iter().map(|(c, _)| c.name()).collect();
                Err(Error::from_conversion(S::KIND, name, &names, e))
            }
        }
    };

    match mode {
        InputMode::Legacy | InputMode::Atomic => {
            Ok(raw.into_iter().map(|(c, v)| (c, v.abs())).collect())
        }
        InputMode::Weight => convert(raw, Constituent::molar_mass, conversion::wt_to_at),
        InputMode::Volume => convert(raw, Constituent::molar_volume, conversion::vol_to_at),
        InputMode::Skip => Ok(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    fn o16() -> Isotope {
        Isotope::new(8, 16, 15.99491461957)
    }

    fn o18() -> Isotope {
        Isotope::new(8, 18, 17.99915961286)
    }

    #[test]
    fn normalized_merges_duplicates_and_drops_zeros() {
        let composition = Composition::normalized(vec![
            (o16().into(), 1.0),
            (o18().into(), 0.0),
            (o16().into(), 1.0),
            (Isotope::new(8, 17, 16.99).into(), 2.0),
        ]);
        assert_eq!(composition.len(), 2);
        assert!(approx_eq(
            composition.fraction_of(&o16().into()).unwrap(),
            0.5,
            1e-12
        ));
        assert!(composition.fraction_of(&o18().into()).is_none());
    }

    #[test]
    fn normalized_empty_input_stays_empty() {
        let composition = Composition::normalized(Vec::new());
        assert!(composition.is_empty());
        assert_eq!(composition.mean_molar_mass(), 0.0);
    }

    #[test]
    fn normalized_keeps_insertion_order() {
        let composition = Composition::normalized(vec![(o18().into(), 1.0), (o16().into(), 3.0)]);
        let names: Vec<&str> = composition.constituents().map(Constituent::name).collect();
        assert_eq!(names, vec!["O-18", "O-16"]);
    }

    #[test]
    fn constituent_equality_by_key() {
        let a: Constituent = o16().into();
        let b: Constituent = Isotope::new(8, 16, 16.0).named("sixteen").into();
        assert_eq!(a, b);
        assert_ne!(a, Constituent::from(o18()));
    }

    #[test]
    fn constituent_kind_display() {
        assert_eq!(ConstituentKind::Molecule.to_string(), "Molecule");
        assert_eq!(Constituent::from(o16()).kind(), ConstituentKind::Isotope);
    }

    #[test]
    fn isotope_constituent_has_no_density() {
        let c: Constituent = o16().into();
        assert!(c.core().is_none());
        assert_eq!(c.density(), 0.0);
        assert_eq!(c.molar_volume(), 0.0);
        assert!(c.molar_mass() > 15.9);
    }
}
