use thiserror::Error;

use crate::substance;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse definition file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("substance \"{substance}\" references unknown constituent \"{reference}\"")]
    UnknownReference { substance: String, reference: String },

    #[error("substance \"{0}\" is defined more than once")]
    DuplicateDefinition(String),

    #[error("invalid definition of substance \"{substance}\": {details}")]
    InvalidDefinition { substance: String, details: String },

    #[error(transparent)]
    Substance(#[from] substance::Error),
}

impl Error {
    pub fn invalid(substance: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            substance: substance.into(),
            details: details.into(),
        }
    }
}
