//! Conversion between atomic, weight and volume fractions.
//!
//! All conversions operate on parallel slices: a fraction vector and the
//! matching physical property of each constituent. The property that links
//! two representations is
//!
//! | conversion        | property        |
//! |-------------------|-----------------|
//! | atomic ⇄ weight   | molar mass `M`  |
//! | weight ⇄ volume   | density `ρ`     |
//! | atomic ⇄ volume   | molar volume `V_m` |
//!
//! Results are normalised; an input whose fractions are all zero converts to
//! zeros. A zero (unknown) property is rejected with
//! [`ConversionError::MissingProperty`].
//!
//! The parts-per helpers ([`percent`], [`ppm`], …) scale literal values for
//! use in composition maps.

use std::fmt;

use thiserror::Error;

/// Avogadro constant [1/mol].
pub const AVOGADRO: f64 = 6.022_140_76e23;

/// Molar mass constant M_u [kg/mol].
pub const MOLAR_MASS_CONSTANT: f64 = 0.999_999_999_65e-3;

/// Physical property required by a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    MolarMass,
    Density,
    MolarVolume,
}

impl Property {
    pub fn unit(&self) -> &'static str {
        match self {
            Property::MolarMass => "g/mol",
            Property::Density => "g/cm^3",
            Property::MolarVolume => "cm^3/mol",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::MolarMass => write!(f, "molar mass"),
            Property::Density => write!(f, "density"),
            Property::MolarVolume => write!(f, "molar volume"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("{fractions} fractions given for {properties} property values")]
    LengthMismatch { fractions: usize, properties: usize },

    #[error("entry {index} has no {property} (value {value})")]
    MissingProperty {
        property: Property,
        index: usize,
        value: f64,
    },
}

/// Atomic to weight fractions: `wᵢ = xᵢMᵢ / Σ x_z M_z`.
pub fn at_to_wt(x: &[f64], molar_masses: &[f64]) -> Result<Vec<f64>, ConversionError> {
    convert(x, molar_masses, Property::MolarMass, |f, m| f * m)
}

/// Weight to atomic fractions: `xᵢ = (wᵢ/Mᵢ) / Σ (w_z/M_z)`.
pub fn wt_to_at(w: &[f64], molar_masses: &[f64]) -> Result<Vec<f64>, ConversionError> {
    convert(w, molar_masses, Property::MolarMass, |f, m| f / m)
}

/// Volume to weight fractions: `wᵢ = φᵢρᵢ / Σ φ_z ρ_z`.
pub fn vol_to_wt(phi: &[f64], densities: &[f64]) -> Result<Vec<f64>, ConversionError> {
    convert(phi, densities, Property::Density, |f, rho| f * rho)
}

/// Weight to volume fractions: `φᵢ = (wᵢ/ρᵢ) / Σ (w_z/ρ_z)`.
pub fn wt_to_vol(w: &[f64], densities: &[f64]) -> Result<Vec<f64>, ConversionError> {
    convert(w, densities, Property::Density, |f, rho| f / rho)
}

/// Volume to atomic fractions: `xᵢ = (φᵢ/V_m,ᵢ) / Σ (φ_z/V_m,z)`.
pub fn vol_to_at(phi: &[f64], molar_volumes: &[f64]) -> Result<Vec<f64>, ConversionError> {
    convert(phi, molar_volumes, Property::MolarVolume, |f, v| f / v)
}

/// Atomic to volume fractions: `φᵢ = xᵢV_m,ᵢ / Σ x_z V_m,z`.
pub fn at_to_vol(x: &[f64], molar_volumes: &[f64]) -> Result<Vec<f64>, ConversionError> {
    convert(x, molar_volumes, Property::MolarVolume, |f, v| f * v)
}

fn convert(
    fractions: &[f64],
    properties: &[f64],
    property: Property,
    weigh: impl Fn(f64, f64) -> f64,
) -> Result<Vec<f64>, ConversionError> {
    if fractions.len() != properties.len() {
        return Err(ConversionError::LengthMismatch {
            fractions: fractions.len(),
            properties: properties.len(),
        });
    }

    if let Some((index, &value)) = properties
        .iter()
        .enumerate()
        .find(|&(_, &p)| !(p > 0.0 && p.is_finite()))
    {
        return Err(ConversionError::MissingProperty {
            property,
            index,
            value,
        });
    }

    let weighted: Vec<f64> = fractions
        .iter()
        .zip(properties)
        .map(|(&f, &p)| weigh(f, p))
        .collect();
    let total: f64 = weighted.iter().sum();

    if total == 0.0 {
        return Ok(vec![0.0; weighted.len()]);
    }

    Ok(weighted.into_iter().map(|v| v / total).collect())
}

/// Value given in percent (10⁻²).
#[inline]
pub fn percent(value: f64) -> f64 {
    value * 1e-2
}

/// Value given in per mille (10⁻³).
#[inline]
pub fn permille(value: f64) -> f64 {
    value * 1e-3
}

/// Value given in per myriad, i.e. basis points (10⁻⁴).
#[inline]
pub fn permyriad(value: f64) -> f64 {
    value * 1e-4
}

/// Value given in per cent mille, pcm (10⁻⁵).
#[inline]
pub fn percent_mille(value: f64) -> f64 {
    value * 1e-5
}

/// Value given in parts per million (10⁻⁶).
#[inline]
pub fn ppm(value: f64) -> f64 {
    value * 1e-6
}

/// Value given in parts per billion (10⁻⁹).
#[inline]
pub fn ppb(value: f64) -> f64 {
    value * 1e-9
}

/// Value given in parts per trillion (10⁻¹²).
#[inline]
pub fn ppt(value: f64) -> f64 {
    value * 1e-12
}

/// Value given in parts per quadrillion (10⁻¹⁵).
#[inline]
pub fn ppq(value: f64) -> f64 {
    value * 1e-15
}
