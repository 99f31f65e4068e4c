//! Reading substance definitions and writing material cards.
//!
//! - [`definition`] loads a [`Library`] of substances from a TOML file.
//! - [`serpent`] writes the isotope vector of a substance as a material card
//!   for the Serpent Monte Carlo code.

pub mod definition;
pub mod error;
pub mod serpent;

pub use definition::Library;
pub use error::Error;
pub use serpent::MaterialCard;
