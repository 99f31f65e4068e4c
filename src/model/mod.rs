//! Leaf value types of every composition graph.
//!
//! - [`isotope`] – Nuclides identified by `(Z, A, I)` with their relative atomic mass.
//! - [`periodic`] – Element symbols and names indexed by atomic number.
//!
//! Everything above the isotope level (elements, molecules, mixtures) lives in
//! [`crate::substance`].

pub mod isotope;
pub mod periodic;
