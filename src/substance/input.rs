//! Construction inputs: how raw fractions are interpreted and which derived
//! quantities are overridden.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown input mode \"{0}\"")]
pub struct ParseInputModeError(pub(crate) String);

/// Interpretation of the raw values of a composition map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputMode {
    /// The sign decides: all positive values are atomic fractions, all
    /// negative values are weight fractions (magnitudes are used).
    #[default]
    Legacy,

    /// Atomic (mole) fractions or atom counts; signs are ignored.
    Atomic,

    /// Weight fractions; signs are ignored.
    Weight,

    /// Volume fractions; signs are ignored.
    Volume,

    /// Values are taken as atomic fractions without any validation.
    Skip,
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputMode::Legacy => write!(f, "legacy"),
            InputMode::Atomic => write!(f, "atomic"),
            InputMode::Weight => write!(f, "weight"),
            InputMode::Volume => write!(f, "volume"),
            InputMode::Skip => write!(f, "skip"),
        }
    }
}

impl FromStr for InputMode {
    type Err = ParseInputModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" | "_legacy" => Ok(InputMode::Legacy),
            "atomic" | "at" | "mole" | "mol" => Ok(InputMode::Atomic),
            "weight" | "wt" => Ok(InputMode::Weight),
            "volume" | "vol" => Ok(InputMode::Volume),
            "skip" | "_skip" => Ok(InputMode::Skip),
            _ => Err(ParseInputModeError(s.to_string())),
        }
    }
}

/// Optional overrides applied when a substance is constructed.
///
/// # Examples
///
/// ```
/// use isovec::SubstanceOptions;
///
/// let water = SubstanceOptions::default()
///     .with_molar_mass(18.01528)
///     .with_density(1.0)
///     .with_symbol("H2O");
/// assert_eq!(water.density, Some(1.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubstanceOptions {
    /// Molar mass [g/mol] used instead of the derived value.
    pub molar_mass: Option<f64>,

    /// Density [g/cm^3]. Without it the density is unknown (0), except for
    /// mixtures, which derive it from their constituents when possible.
    pub density: Option<f64>,

    /// Short symbol used instead of the kind's default symbol.
    pub symbol: Option<String>,
}

impl SubstanceOptions {
    pub fn with_molar_mass(mut self, molar_mass: f64) -> Self {
        self.molar_mass = Some(molar_mass);
        self
    }

    /// Zero or less counts as an unknown density.
    pub fn with_density(mut self, density: f64) -> Self {
        self.density = Some(density);
        self
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_mode_aliases() {
        assert_eq!("at".parse::<InputMode>().unwrap(), InputMode::Atomic);
        assert_eq!("mole".parse::<InputMode>().unwrap(), InputMode::Atomic);
        assert_eq!("wt".parse::<InputMode>().unwrap(), InputMode::Weight);
        assert_eq!("vol".parse::<InputMode>().unwrap(), InputMode::Volume);
        assert_eq!("_legacy".parse::<InputMode>().unwrap(), InputMode::Legacy);
        assert_eq!("_skip".parse::<InputMode>().unwrap(), InputMode::Skip);
    }

    #[test]
    fn input_mode_unknown() {
        let err = "mass".parse::<InputMode>().unwrap_err();
        assert_eq!(err.to_string(), "unknown input mode \"mass\"");
    }

    #[test]
    fn input_mode_display_parses_back() {
        for mode in [
            InputMode::Legacy,
            InputMode::Atomic,
            InputMode::Weight,
            InputMode::Volume,
            InputMode::Skip,
        ] {
            assert_eq!(mode.to_string().parse::<InputMode>().unwrap(), mode);
        }
    }

    #[test]
    fn default_options_override_nothing() {
        let options = SubstanceOptions::default();
        assert!(options.molar_mass.is_none());
        assert!(options.density.is_none());
        assert!(options.symbol.is_none());
    }
}
