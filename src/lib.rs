//! Isotopic composition of substances.
//!
//! Substances are built bottom-up from isotopes: elements from isotopes,
//! molecules from elements, mixtures from any of these. Every substance keeps
//! a normalised map of its constituents' atomic fractions and derives molar
//! mass, density, molar volume and number density from it. The composition
//! graph can be flattened into isotope or element vectors and rendered as an
//! annotated tree.
//!
//! # Features
//!
//! - **Fraction algebra** — conversion between atomic, weight and volume
//!   fractions via molar mass, density and molar volume
//! - **Typed substances** — elements, molecules and mixtures with validated
//!   constituents and input modes
//! - **Aggregation** — isotope and element vectors in atomic or weight
//!   fractions, optionally collapsing natural elements into one surrogate
//! - **Trees** — text rendering of the composition graph with fractions,
//!   molar masses and densities
//! - **Reference data** — isotope masses and natural abundances of the
//!   naturally occurring elements
//! - **I/O** — substance definition files and Serpent material cards
//!
//! # Quick Start
//!
//! ```
//! use isovec::{data, Fraction, InputMode, Molecule, NaturalSelection};
//! use isovec::{Substance, SubstanceOptions, TreeOptions};
//!
//! let h = data::natural_element_by_symbol("H")?;
//! let o = data::natural_element_by_symbol("O")?;
//!
//! let water = Molecule::new(
//!     "water",
//!     [(h, 2.0), (o, 1.0)],
//!     InputMode::Atomic,
//!     SubstanceOptions::default().with_density(0.998),
//! )?;
//! assert_eq!(water.symbol(), "H2O");
//! assert!((water.molar_mass() - 18.015).abs() < 1e-2);
//! assert!((water.number_density() - 3.336e22).abs() < 1e20);
//!
//! // H-1, H-2, O-16, O-17, O-18
//! let isotopes = water.isotopes(Fraction::Atomic, &NaturalSelection::None)?;
//! assert_eq!(isotopes.len(), 5);
//! let total: f64 = isotopes.values().sum();
//! assert!((total - 1.0).abs() < 1e-12);
//!
//! let tree = water.input_tree(&TreeOptions::default());
//! assert_eq!(tree.len(), 8);
//! println!("{tree}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Module Organization
//!
//! - [`conversion`] — Fraction conversions and parts-per helpers
//! - [`data`] — Embedded isotope and natural element reference data
//! - [`tree`] — Generic labelled trees and their text rendering
//! - [`io`] — Definition files and Serpent material cards
//! - [`periodic`] — Element symbols and names by atomic number
//!
//! # Data Types
//!
//! - [`Isotope`] — Nuclide identified by `(Z, A, I)` with its relative atomic mass
//! - [`Element`] — Isotopes of one atomic number
//! - [`Molecule`] — Elements with atom counts
//! - [`Mixture`] — Elements, molecules and mixtures
//! - [`Constituent`] — Any node of a composition graph
//! - [`Substance`] — Shared interface of elements, molecules and mixtures
//!
//! ## Configuration
//!
//! - [`InputMode`] — Interpretation of raw composition values
//! - [`SubstanceOptions`] — Molar mass, density and symbol overrides
//! - [`Fraction`] — Atomic or weight fractions in aggregation queries
//! - [`NaturalSelection`] — Natural elements to collapse into surrogates
//! - [`TreeOptions`] — Quantities shown in trees
//! - [`RenderOptions`] — Character set and number formats of rendered trees

mod model;
mod substance;

pub mod conversion;
pub mod data;
pub mod io;
pub mod tree;

pub use model::isotope::Isotope;
pub use model::periodic;

pub use substance::{
    Composition, Constituent, ConstituentKind, Element, ElementKey, Fraction, InputMode, Mixture,
    Molecule, NaturalSelection, ParseInputModeError, Substance, SubstanceCore, SubstanceOptions,
};

pub use substance::Error as SubstanceError;

pub use tree::{CharSet, Node, NodeId, Quantity, RenderOptions, Tree, TreeOptions};
