//! Error types for substance construction and composition queries.
//!
//! Every variant names the substance it was raised for, so callers can tell
//! which definition in a larger composition graph is at fault. Construction
//! either succeeds completely or fails with one of these errors; no partially
//! initialised substance is ever returned.

use thiserror::Error;

use super::input::{InputMode, ParseInputModeError};
use super::ConstituentKind;
use crate::conversion::{ConversionError, Property};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A composition key is not of a kind the substance accepts.
    #[error(
        "could not create {kind} \"{substance}\" with {constituent_kind} \"{constituent}\" as constituent; valid constituents: {allowed}"
    )]
    InvalidConstituentType {
        kind: ConstituentKind,
        substance: String,
        constituent: String,
        constituent_kind: ConstituentKind,
        allowed: String,
    },

    /// Legacy input mixes positive (atomic) and negative (weight) fractions.
    #[error(
        "could not create {kind} \"{substance}\": mixing of atomic and weight fractions is not allowed"
    )]
    MixedFractionSign {
        kind: ConstituentKind,
        substance: String,
    },

    /// The input mode cannot be used for this kind of substance.
    #[error("input mode '{mode}' is disabled for {kind} \"{substance}\"")]
    DisallowedInputMode {
        kind: ConstituentKind,
        substance: String,
        mode: InputMode,
    },

    /// A conversion needs a property that a constituent does not have.
    #[error("{kind} \"{substance}\": constituent \"{constituent}\" has no {property}")]
    MissingPhysicalProperty {
        kind: ConstituentKind,
        substance: String,
        constituent: String,
        property: Property,
    },

    /// The input mode string is not recognised.
    #[error("unknown input mode \"{mode}\" for substance \"{substance}\"")]
    UnknownMode { substance: String, mode: String },

    /// The isotopes of an element belong to different elements.
    #[error(
        "atomic number of all isotopes of element \"{substance}\" must match: expected Z = {expected}, but {isotope} has Z = {found}"
    )]
    AtomicNumberMismatch {
        substance: String,
        isotope: String,
        expected: u32,
        found: u32,
    },

    /// The substance needs at least one constituent.
    #[error("{kind} \"{substance}\" needs at least one constituent")]
    EmptyComposition {
        kind: ConstituentKind,
        substance: String,
    },

    /// Any other failure of the conversion algebra.
    #[error("{kind} \"{substance}\": fraction conversion failed: {source}")]
    Conversion {
        kind: ConstituentKind,
        substance: String,
        #[source]
        source: ConversionError,
    },
}

impl Error {
    /// Attaches the substance name to a rejected input mode string.
    pub fn unknown_mode(substance: &str, e: ParseInputModeError) -> Self {
        Self::UnknownMode {
            substance: substance.to_string(),
            mode: e.0,
        }
    }

    /// Creates an [`InvalidConstituentType`](Error::InvalidConstituentType) error.
    pub fn invalid_constituent(
        kind: ConstituentKind,
        substance: &str,
        constituent: impl Into<String>,
        constituent_kind: ConstituentKind,
        allowed: &[ConstituentKind],
    ) -> Self {
        let allowed = allowed
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Self::InvalidConstituentType {
            kind,
            substance: substance.to_string(),
            constituent: constituent.into(),
            constituent_kind,
            allowed,
        }
    }

    /// Maps a conversion failure onto the constituent that caused it.
    ///
    /// `constituents` are the names in the order of the converted vector.
    pub fn from_conversion(
        kind: ConstituentKind,
        substance: &str,
        constituents: &[&str],
        source: ConversionError,
    ) -> Self {
        match source {
            ConversionError::MissingProperty {
                property, index, ..
            } if index < constituents.len() => Self::MissingPhysicalProperty {
                kind,
                substance: substance.to_string(),
                constituent: constituents[index].to_string(),
                property,
            },
            source => Self::Conversion {
                kind,
                substance: substance.to_string(),
                source,
            },
        }
    }

    /// Name of the substance the error was raised for, if any.
    pub fn substance(&self) -> Option<&str> {
        match self {
            Error::InvalidConstituentType { substance, .. }
            | Error::MixedFractionSign { substance, .. }
            | Error::DisallowedInputMode { substance, .. }
            | Error::MissingPhysicalProperty { substance, .. }
            | Error::AtomicNumberMismatch { substance, .. }
            | Error::EmptyComposition { substance, .. }
            | Error::UnknownMode { substance, .. }
            | Error::Conversion { substance, .. } => Some(substance),
        }
    }
}
