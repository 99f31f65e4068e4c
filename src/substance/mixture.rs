use std::sync::Arc;

use super::{
    Composition, Constituent, ConstituentKind, Error, InputMode, Substance, SubstanceCore,
    SubstanceOptions, atomic_fractions, check_constituents, collect_raw, resolve_mode,
};
use crate::conversion;

/// A mixture of elements, molecules and other mixtures.
///
/// All input modes are accepted. Without a density override the density
/// follows the rule of mixtures, `ρ = (Σ wᵢ/ρᵢ)⁻¹`, provided every
/// constituent has a known molar mass and density.
///
/// # Examples
///
/// ```
/// use isovec::{InputMode, Mixture, Molecule, Substance, SubstanceOptions};
///
/// let liquid = |name: &str, m: f64, rho: f64| {
///     Molecule::new(
///         name,
///         Vec::<(isovec::Element, f64)>::new(),
///         InputMode::Atomic,
///         SubstanceOptions::default().with_molar_mass(m).with_density(rho),
///     )
/// };
/// let vodka = Mixture::from_volume(
///     "vodka",
///     [(liquid("alcohol", 46.07, 0.789)?, 0.4), (liquid("water", 18.015, 0.998)?, 0.6)],
///     SubstanceOptions::default(),
/// )?;
/// let w = vodka.composition_in_weight()?;
/// assert!((w[0].1 - 0.3451).abs() < 1e-3);
/// # Ok::<(), isovec::SubstanceError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Mixture {
    core: SubstanceCore,
}

impl Mixture {
    pub fn new<I, C>(
        name: impl Into<String>,
        constituents: I,
        mode: InputMode,
        options: SubstanceOptions,
    ) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (C, f64)>,
        C: Into<Constituent>,
    {
        let name = name.into();
        let raw = collect_raw(constituents);
        check_constituents::<Self>(&name, &raw)?;
        let mode = resolve_mode::<Self>(&name, &raw, mode)?;

        let composition = Composition::normalized(atomic_fractions::<Self>(&name, raw, mode)?);
        let molar_mass = options
            .molar_mass
            .unwrap_or_else(|| composition.mean_molar_mass());
        let density = options
            .density
            .filter(|&rho| rho > 0.0)
            .unwrap_or_else(|| rule_of_mixtures(&composition));
        let symbol = options.symbol.unwrap_or_else(|| name.clone());
        let core = SubstanceCore::new(Self::KIND, name, symbol, composition, molar_mass, density);

        Ok(Self { core })
    }

    pub fn from_atomic<I, C>(
        name: impl Into<String>,
        constituents: I,
        options: SubstanceOptions,
    ) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (C, f64)>,
        C: Into<Constituent>,
    {
        Self::new(name, constituents, InputMode::Atomic, options)
    }

    pub fn from_weight<I, C>(
        name: impl Into<String>,
        constituents: I,
        options: SubstanceOptions,
    ) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (C, f64)>,
        C: Into<Constituent>,
    {
        Self::new(name, constituents, InputMode::Weight, options)
    }

    pub fn from_volume<I, C>(
        name: impl Into<String>,
        constituents: I,
        options: SubstanceOptions,
    ) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (C, f64)>,
        C: Into<Constituent>,
    {
        Self::new(name, constituents, InputMode::Volume, options)
    }

    pub fn legacy<I, C>(name: impl Into<String>, constituents: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (C, f64)>,
        C: Into<Constituent>,
    {
        Self::new(
            name,
            constituents,
            InputMode::Legacy,
            SubstanceOptions::default(),
        )
    }
}

impl Substance for Mixture {
    const KIND: ConstituentKind = ConstituentKind::Mixture;
    const ALLOWED_CONSTITUENTS: &'static [ConstituentKind] = &[
        ConstituentKind::Element,
        ConstituentKind::Molecule,
        ConstituentKind::Mixture,
    ];
    const ALLOWED_MODES: &'static [InputMode] = &[
        InputMode::Legacy,
        InputMode::Atomic,
        InputMode::Weight,
        InputMode::Volume,
        InputMode::Skip,
    ];

    fn core(&self) -> &SubstanceCore {
        &self.core
    }

    fn to_constituent(&self) -> Constituent {
        Constituent::Mixture(Arc::new(self.clone()))
    }
}

/// `(Σ wᵢ/ρᵢ)⁻¹`, or 0 if any molar mass or density is unknown.
fn rule_of_mixtures(composition: &Composition) -> f64 {
    if composition.is_empty() || composition.constituents().any(|c| c.density() <= 0.0) {
        return 0.0;
    }
    let Ok(w) = conversion::at_to_wt(&composition.fractions(), &composition.molar_masses())
    else {
        return 0.0;
    };
    let specific_volume: f64 = w
        .iter()
        .zip(composition.constituents())
        .map(|(w, c)| w / c.density())
        .sum();
    if specific_volume > 0.0 {
        1.0 / specific_volume
    } else {
        0.0
    }
}
