use std::sync::Arc;

use super::{
    Composition, Constituent, ConstituentKind, Error, InputMode, Substance, SubstanceCore,
    SubstanceOptions, atomic_fractions, check_constituents, collect_raw, resolve_mode,
};
use crate::conversion::MOLAR_MASS_CONSTANT;
use crate::model::isotope::Isotope;
use crate::model::periodic;

/// A chemical element: a set of isotopes sharing one atomic number.
///
/// Elements accept legacy, atomic, weight and skip input. Volume input is
/// rejected since isotopes carry no density.
///
/// # Examples
///
/// ```
/// use isovec::{Element, Isotope, Substance, SubstanceOptions};
///
/// let enriched = Element::from_weight(
///     "enriched uranium",
///     [
///         (Isotope::new(92, 235, 235.0439301), 0.05),
///         (Isotope::new(92, 238, 238.0507884), 0.95),
///     ],
///     SubstanceOptions::default(),
/// )?;
/// assert_eq!(enriched.z(), 92);
/// assert_eq!(enriched.symbol(), "U");
/// assert!(enriched.composition().len() == 2);
/// # Ok::<(), isovec::SubstanceError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    core: SubstanceCore,
    z: u32,
    natural: bool,
}

impl Element {
    /// Creates an element from isotopes interpreted according to `mode`.
    pub fn new<I, C>(
        name: impl Into<String>,
        isotopes: I,
        mode: InputMode,
        options: SubstanceOptions,
    ) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (C, f64)>,
        C: Into<Constituent>,
    {
        Self::build(name.into(), collect_raw(isotopes), mode, options, false)
    }

    /// Creates an element of natural isotopic abundance.
    ///
    /// Natural elements can be collapsed into a single surrogate isotope when
    /// isotope vectors are aggregated.
    pub fn new_natural<I, C>(
        name: impl Into<String>,
        isotopes: I,
        mode: InputMode,
        options: SubstanceOptions,
    ) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (C, f64)>,
        C: Into<Constituent>,
    {
        Self::build(name.into(), collect_raw(isotopes), mode, options, true)
    }

    pub fn from_atomic<I, C>(
        name: impl Into<String>,
        isotopes: I,
        options: SubstanceOptions,
    ) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (C, f64)>,
        C: Into<Constituent>,
    {
        Self::new(name, isotopes, InputMode::Atomic, options)
    }

    pub fn from_weight<I, C>(
        name: impl Into<String>,
        isotopes: I,
        options: SubstanceOptions,
    ) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (C, f64)>,
        C: Into<Constituent>,
    {
        Self::new(name, isotopes, InputMode::Weight, options)
    }

    /// Creates an element from sign encoded fractions: positive values are
    /// atomic, negative values weight fractions.
    pub fn legacy<I, C>(name: impl Into<String>, isotopes: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (C, f64)>,
        C: Into<Constituent>,
    {
        Self::new(
            name,
            isotopes,
            InputMode::Legacy,
            SubstanceOptions::default(),
        )
    }

    fn build(
        name: String,
        raw: Vec<(Constituent, f64)>,
        mode: InputMode,
        options: SubstanceOptions,
        natural: bool,
    ) -> Result<Self, Error> {
        check_constituents::<Self>(&name, &raw)?;
        let mode = resolve_mode::<Self>(&name, &raw, mode)?;

        let z = match raw.first().and_then(|(c, _)| c.as_isotope()) {
            Some(first) => first.z(),
            None => return Err(Self::empty(&name)),
        };
        if let Some(other) = raw
            .iter()
            .filter_map(|(c, _)| c.as_isotope())
            .find(|isotope| isotope.z() != z)
        {
            return Err(Error::AtomicNumberMismatch {
                substance: name,
                isotope: other.name().to_string(),
                expected: z,
                found: other.z(),
            });
        }

        let composition = Composition::normalized(atomic_fractions::<Self>(&name, raw, mode)?);
        if composition.is_empty() {
            return Err(Self::empty(&name));
        }

        let molar_mass = options
            .molar_mass
            .unwrap_or_else(|| composition.mean_molar_mass());
        let symbol = options
            .symbol
            .unwrap_or_else(|| periodic::symbol(z).unwrap_or("X").to_string());
        let core = SubstanceCore::new(
            Self::KIND,
            name,
            symbol,
            composition,
            molar_mass,
            options.density.filter(|&rho| rho > 0.0).unwrap_or(0.0),
        );

        Ok(Self { core, z, natural })
    }

    fn empty(name: &str) -> Error {
        Error::EmptyComposition {
            kind: Self::KIND,
            substance: name.to_string(),
        }
    }

    /// Atomic number shared by all isotopes.
    #[inline]
    pub fn z(&self) -> u32 {
        self.z
    }

    #[inline]
    pub fn is_natural(&self) -> bool {
        self.natural
    }

    /// Marks the element as being of natural isotopic abundance.
    pub fn into_natural(mut self) -> Self {
        self.natural = true;
        self
    }

    /// Periodic table symbol, independent of any symbol override.
    pub fn element_symbol(&self) -> &'static str {
        periodic::symbol(self.z).unwrap_or("X")
    }

    /// Relative atomic mass consistent with [`Substance::molar_mass`].
    pub fn a_r(&self) -> f64 {
        self.core.molar_mass() / (MOLAR_MASS_CONSTANT * 1e3)
    }

    /// Single isotope standing in for the whole element: mass number 0,
    /// named `<symbol>-nat`, carrying the element's relative atomic mass.
    pub fn surrogate(&self) -> Isotope {
        Isotope::natural(self.z, self.a_r())
    }

    /// Isotopes with their atomic fractions.
    pub fn isotopes_iter(&self) -> impl Iterator<Item = (&Isotope, f64)> {
        self.core
            .composition()
            .iter()
            .filter_map(|(c, x)| c.as_isotope().map(|isotope| (isotope, x)))
    }
}

impl Substance for Element {
    const KIND: ConstituentKind = ConstituentKind::Element;
    const ALLOWED_CONSTITUENTS: &'static [ConstituentKind] = &[ConstituentKind::Isotope];
    const ALLOWED_MODES: &'static [InputMode] = &[
        InputMode::Legacy,
        InputMode::Atomic,
        InputMode::Weight,
        InputMode::Skip,
    ];

    fn core(&self) -> &SubstanceCore {
        &self.core
    }

    fn to_constituent(&self) -> Constituent {
        Constituent::Element(Arc::new(self.clone()))
    }
}
